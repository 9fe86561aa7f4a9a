//! Flat-file persistence for the board tree.
//!
//! # Responsibility
//! - Describe the four persisted tables.
//! - Abstract raw table storage behind `TableStore`.
//! - Map the tree to and from table rows.
//!
//! # Invariants
//! - Table I/O failures degrade to empty data (load) or a reported skip
//!   (save); they never abort the whole pass.

pub mod table;
pub mod table_store;
pub mod tree_mapper;
