pub mod auth;
pub mod common;
pub mod essay;
pub mod lab;
pub mod outreach;
pub mod profile;
