//! Derived read-only views composed from the base collections.
//!
//! # Responsibility
//! - Build aggregation views across persons, items and assignments.
//!
//! # Invariants
//! - Views never mutate the store.

pub mod board;
