pub mod lab;
pub mod professor;
