pub mod fields;
pub mod limit;
