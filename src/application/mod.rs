//! Application services orchestrating domain logic over ports.

pub mod analytics;
