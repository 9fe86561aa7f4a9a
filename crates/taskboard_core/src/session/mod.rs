//! Interactive session flow.
//!
//! # Responsibility
//! - Model the menu hierarchy as explicit states and commands so a
//!   front-end only maps input to `Command` values and renders `Outcome`s.
//!
//! # See also
//! - `service` for the validation each command goes through.

pub mod machine;

pub use machine::{Command, Outcome, Session, SessionError, SessionState};
