mod summary;
pub mod views;

pub use views::{
    BandCount, CategoryAverageEntry, CategoryCard, CompanyOverview, ManagerScorecard,
    SubcategoryRow,
};
