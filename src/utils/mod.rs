//! Shared helpers for the query builder

pub mod unique_list;

pub use unique_list::UniqueList;
