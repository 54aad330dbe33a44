pub mod essay_idea;
pub mod lab;
pub mod outreach_log;
pub mod professor;
pub mod student;
pub mod user;
