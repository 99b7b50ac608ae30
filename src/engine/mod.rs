pub mod difficulty;
pub mod feedback;
pub mod metrics;
pub mod selector;
pub mod vark;
