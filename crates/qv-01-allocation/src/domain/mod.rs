//! Domain module for the allocation engine
//!
//! ## Core Modules
//! - allocation: per-option percentages and quadratic weights

pub mod allocation;

pub use allocation::{quadratic_weight, Allocation, AllocationEntry};
