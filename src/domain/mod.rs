pub mod error;
pub mod lookups;
pub mod submission;
