//! Core use-case services.
//!
//! # Responsibility
//! - Validate user input before it mutates the tree.
//! - Keep menu/CLI layers decoupled from tree and storage details.

pub mod account_service;
pub mod board_service;
pub mod report_service;
