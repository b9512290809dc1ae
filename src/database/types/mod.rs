//! Value types for literals and bind parameters

pub mod value;

pub use value::SqlValue;
