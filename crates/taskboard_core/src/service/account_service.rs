//! Signup and login use-cases.
//!
//! # Responsibility
//! - Validate credentials before they reach the tree.
//! - Authenticate by exact username + password match.
//!
//! # Invariants
//! - Usernames are unique and compared case-sensitively.
//! - Passwords are stored and compared as plain text.
//! - Credentials never contain the table quote character or line breaks,
//!   so they always survive a save/load cycle.

use crate::codec::QUOTE;
use crate::model::entity::User;
use crate::model::tree::{BoardTree, TreeError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from account use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountServiceError {
    /// Username is empty or contains a forbidden character.
    InvalidUsername,
    /// Password is empty or contains a forbidden character.
    InvalidPassword,
    /// Username already belongs to another user.
    UsernameTaken(String),
    /// No user matches the username/password pair.
    InvalidCredentials,
}

impl Display for AccountServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUsername => write!(
                f,
                "username must be non-empty and must not contain quotes or line breaks"
            ),
            Self::InvalidPassword => write!(
                f,
                "password must be non-empty and must not contain quotes or line breaks"
            ),
            Self::UsernameTaken(username) => write!(f, "username is already taken: {username}"),
            Self::InvalidCredentials => write!(f, "invalid username or password"),
        }
    }
}

impl Error for AccountServiceError {}

/// Account facade over the user level of the tree.
pub struct AccountService<'t> {
    tree: &'t mut BoardTree,
}

impl<'t> AccountService<'t> {
    pub fn new(tree: &'t mut BoardTree) -> Self {
        Self { tree }
    }

    /// Returns whether `username` is registered.
    pub fn user_exists(&self, username: &str) -> bool {
        self.tree.contains_user(username)
    }

    /// Registers a new user at the head of the user sequence.
    pub fn signup(&mut self, username: &str, password: &str) -> Result<&User, AccountServiceError> {
        if !is_valid_credential(username) {
            return Err(AccountServiceError::InvalidUsername);
        }
        if !is_valid_credential(password) {
            return Err(AccountServiceError::InvalidPassword);
        }
        if let Err(TreeError::DuplicateUser(taken)) =
            self.tree.insert_user(User::new(username, password))
        {
            warn!("event=signup module=service status=rejected reason=username_taken");
            return Err(AccountServiceError::UsernameTaken(taken));
        }
        info!("event=signup module=service status=ok users={}", self.tree.user_count());
        self.tree
            .user(username)
            .ok_or(AccountServiceError::InvalidCredentials)
    }

    /// Returns the user matching both `username` and `password`.
    pub fn login(&self, username: &str, password: &str) -> Result<&User, AccountServiceError> {
        match self.tree.user(username) {
            Some(user) if user.password == password => {
                info!("event=login module=service status=ok");
                Ok(user)
            }
            _ => {
                warn!("event=login module=service status=rejected");
                Err(AccountServiceError::InvalidCredentials)
            }
        }
    }
}

fn is_valid_credential(value: &str) -> bool {
    !value.is_empty() && !value.contains([QUOTE, '\n', '\r'])
}
