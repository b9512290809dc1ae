//! Query models: criteria, predicates and their rendering

pub mod query_builder;
