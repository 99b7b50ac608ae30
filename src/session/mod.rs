pub mod attempt;
pub mod quiz;
pub mod result;
