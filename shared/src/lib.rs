// shared/src/lib.rs

use serde::{Deserialize, Serialize};

/// Failure reported by the upstream price service itself
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("unknown item '{0}'")]
    UnknownItem(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Other(String),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("getting price for '{item_code}' from service: {source}")]
    Upstream {
        item_code: String,
        #[source]
        source: LookupError,
    },
    #[error("batch lookup failed for {failed} of {requested} item(s): {first}")]
    PartialBatch {
        /// First failure observed, in completion order
        first: Box<Error>,
        /// Prices from the lookups that did succeed, in request order
        collected: Vec<ItemPrice>,
        failed: usize,
        requested: usize,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl Error {
    /// Successful results carried by a failed batch. Informational only:
    /// the set is incomplete whenever this returns `Some`.
    pub fn partial_results(&self) -> Option<&[ItemPrice]> {
        match self {
            Error::PartialBatch { collected, .. } => Some(collected),
            _ => None,
        }
    }

    /// The error that decided a batch failure, or `self` for any other error
    pub fn first_error(&self) -> &Error {
        match self {
            Error::PartialBatch { first, .. } => first,
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A resolved price labeled with the identifier it belongs to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemPrice {
    pub item_code: String,
    pub price: f64,
}

impl ItemPrice {
    pub fn new(item_code: impl Into<String>, price: f64) -> Self {
        Self {
            item_code: item_code.into(),
            price,
        }
    }
}

pub mod config;
