pub mod aggregate;
pub mod cli;
pub mod report;
pub mod schema;
pub mod tables;
