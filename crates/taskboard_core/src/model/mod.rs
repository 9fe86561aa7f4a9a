//! Domain model for the user → board → list → task hierarchy.
//!
//! # Responsibility
//! - Define entity records and their ordering rules.
//! - Own the arena-backed tree that services mutate in place.
//!
//! # Invariants
//! - Each board, list and task has exactly one parent.
//! - Board, list and task ids come from one shared `IdGenerator`.

pub mod date;
pub mod entity;
pub mod id;
pub mod ordering;
pub mod tree;
pub mod workspace;
