pub mod common;
pub mod error;
pub mod project;
pub mod style;
pub mod widget;
