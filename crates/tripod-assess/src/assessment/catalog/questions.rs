use super::Category;

const TRUSTING: [&str; 12] = [
    "Does your manager follow through on commitments in a way that makes you feel you can rely on them?",
    "Does your manager interact with team members in a way that feels consistent and predictable?",
    "Do you often feel unsure about how your manager will respond in similar situations?",
    "Does your manager distribute work based on skills and workload rather than personal preference?",
    "Does your manager give opportunities to different team members over time, not just a select few?",
    "Do you notice that the same people repeatedly receive favourable or easier assignments?",
    "When you are stuck, does your manager make themselves available to help you move forward?",
    "Does your manager check if you have the resources or guidance you need to complete your work?",
    "Do you often feel left on your own when facing challenges at work?",
    "Do you feel comfortable approaching your manager with concerns, ideas, or feedback?",
    "Does your manager respond calmly and constructively when team members speak up?",
    "Do people in the team hesitate to bring up issues because of how your manager might react?",
];

const TASKING: [&str; 12] = [
    "Does your manager clarify what is expected from you in tasks or projects?",
    "Does your manager explain responsibilities in a way that reduces uncertainty?",
    "Do you frequently have to guess or assume what your manager wants from you?",
    "Does your manager plan work ahead so you know what to prepare for?",
    "Does your manager organise tasks in a way that prevents last-minute confusion?",
    "Do you often receive unclear or sudden instructions that disrupt your workflow?",
    "Does your manager help the team understand which tasks are most important?",
    "Does your manager explain why certain tasks need attention first?",
    "Do you sometimes feel the team works on low-priority tasks while important ones wait?",
    "Does your manager check in on progress in a way that helps you stay on track?",
    "Does your manager notice early when tasks are falling behind and step in to support?",
    "Do delays or problems often go unnoticed by your manager until they become serious?",
];

const TENDING: [&str; 12] = [
    "Does your manager take steps to support your professional growth?",
    "Does your manager guide you when you need to develop a new skill?",
    "Do you feel that learning or improvement is mostly left to you without guidance?",
    "Does your manager encourage the team to work together and support each other?",
    "Does your manager help resolve friction so the team can collaborate smoothly?",
    "Do you notice silos, groupism, or disconnect within the team that your manager does not address?",
    "When disagreements occur, does your manager help resolve them constructively?",
    "Does your manager help restore positive working relationships after conflicts?",
    "Do conflicts often linger or resurface because they are not adequately addressed?",
    "Does your manager acknowledge good work in a way that feels meaningful?",
    "Does your manager notice and appreciate improvements or extra effort?",
    "Do you feel that good work often goes unnoticed or is taken for granted?",
];

/// Prompts in sequence order; position n is question `<prefix>_n`.
pub(super) fn prompts(category: Category) -> &'static [&'static str; 12] {
    match category {
        Category::Trusting => &TRUSTING,
        Category::Tasking => &TASKING,
        Category::Tending => &TENDING,
    }
}
