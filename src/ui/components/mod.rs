pub mod attempt_table;
pub mod chart;
pub mod history;
pub mod menu;
pub mod progress_bar;
pub mod question_card;
pub mod questionnaire;
pub mod session_detail;
pub mod summary;
