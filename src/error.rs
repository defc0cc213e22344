//! Error kinds shared by the store, the validators and the reports.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FinanceError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinanceError {
    #[error("Invalid amount '{0}': must be a number greater than 0 and at most 1,000,000,000,000")]
    InvalidAmount(String),

    #[error("Invalid date '{0}': use {1}")]
    InvalidDate(String, &'static str),

    #[error("Invalid ID '{0}': enter a number")]
    InvalidId(String),

    #[error("Unknown user ID: {0}")]
    UnknownUser(i64),

    #[error("Unknown category ID: {0}")]
    UnknownCategory(i64),

    #[error("{0} cannot be empty")]
    EmptyName(&'static str),

    #[error("Invalid filter '{value}': expected one of {expected}")]
    InvalidFilter {
        value: String,
        expected: &'static str,
    },

    #[error("A user with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl FinanceError {
    /// Errors caused by user input, which an interactive caller can re-ask for.
    pub(crate) fn is_validation(&self) -> bool {
        !matches!(self, Self::StoreUnavailable(_))
    }
}

impl From<rusqlite::Error> for FinanceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
