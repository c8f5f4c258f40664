pub mod app;
pub mod measurement;
pub mod probe;
pub mod rating;
pub mod report;
pub mod ui;
