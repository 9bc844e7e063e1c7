//! Domain model for persons, work items and their assignments.
//!
//! # Responsibility
//! - Define the canonical records persisted by the repository layer.
//! - Own field-level validation rules and identifier conventions.
//!
//! # Invariants
//! - Person ids start with `'f'`, item ids with `'t'`, both at least 4 chars.
//! - A validated record is safe to hand to any repository write path.

pub mod assignment;
pub mod item;
pub mod person;
pub mod validate;
