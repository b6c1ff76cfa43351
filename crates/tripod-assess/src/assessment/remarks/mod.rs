//! Three-band classification of subcategory averages with static remark text.

mod table;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::catalog::{Category, Subcategory};

/// Lower bound (inclusive) of the green band on the 0-9 subcategory scale.
pub const GREEN_THRESHOLD: f64 = 8.0;
/// Lower bound (inclusive) of the amber band.
pub const AMBER_THRESHOLD: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Red,
    Amber,
    Green,
}

impl Band {
    pub fn classify(average: f64) -> Self {
        if average >= GREEN_THRESHOLD {
            Self::Green
        } else if average >= AMBER_THRESHOLD {
            Self::Amber
        } else {
            Self::Red
        }
    }

    pub const fn ordered() -> [Self; 3] {
        [Self::Red, Self::Amber, Self::Green]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Amber => "AMBER",
            Self::Green => "GREEN",
        }
    }

    /// Wording used on printed scorecards.
    pub const fn grade_label(self) -> &'static str {
        match self {
            Self::Red => "Below Average",
            Self::Amber => "Average",
            Self::Green => "Above Average",
        }
    }
}

/// Band plus the remark selected for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub band: Band,
    pub remark: &'static str,
}

/// One row of the remark context attached to an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemarkEntry {
    pub category: Category,
    pub subcategory: Subcategory,
    pub average: f64,
    pub band: Band,
    pub remark: String,
}

/// Lookup of remark text keyed by (category, subcategory, band).
#[derive(Debug, Clone, Default)]
pub struct RemarkTable;

impl RemarkTable {
    pub fn standard() -> Self {
        Self
    }

    /// Empty remark when the subcategory does not belong to the category.
    pub fn remark(&self, category: Category, subcategory: Subcategory, band: Band) -> &'static str {
        if subcategory.category() != category {
            return "";
        }
        table::remark(subcategory, band)
    }

    pub fn classify(
        &self,
        category: Category,
        subcategory: Subcategory,
        average: f64,
    ) -> Classification {
        let band = Band::classify(average);
        Classification {
            band,
            remark: self.remark(category, subcategory, band),
        }
    }

    /// Classification for records keyed by display strings; unknown labels keep the band only.
    pub fn classify_label(
        &self,
        category_label: &str,
        behaviour_label: &str,
        average: f64,
    ) -> Classification {
        let band = Band::classify(average);
        let remark = match (
            Category::from_label(category_label),
            Subcategory::from_label(behaviour_label),
        ) {
            (Some(category), Some(subcategory)) => self.remark(category, subcategory, band),
            _ => "",
        };
        Classification { band, remark }
    }

    /// Ordered remark rows for every subcategory present in `averages`.
    pub fn remark_context(&self, averages: &BTreeMap<Subcategory, f64>) -> Vec<RemarkEntry> {
        Subcategory::ordered()
            .into_iter()
            .filter_map(|subcategory| {
                let average = *averages.get(&subcategory)?;
                let category = subcategory.category();
                let classification = self.classify(category, subcategory, average);
                Some(RemarkEntry {
                    category,
                    subcategory,
                    average,
                    band: classification.band,
                    remark: classification.remark.to_string(),
                })
            })
            .collect()
    }
}
