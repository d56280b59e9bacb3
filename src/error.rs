// src/error.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy: construction failures and generator failures
//!
//! Construction errors fail fast with a descriptive message; nothing
//! partially constructed is ever returned. Generator failures are opaque
//! payloads propagated unmodified from the failing column.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A dataset was built with a row count of zero.
    #[error("datasets must contain at least 1 row")]
    EmptyDataset,

    /// Category quotas claim more than the whole dataset.
    #[error("category quotas sum to {percent}%, which is greater than 100%")]
    QuotaOverflow { percent: f64 },

    /// A random column was built with nothing to choose from.
    #[error("random columns must have at least 1 choice")]
    NoChoices,

    /// A column generator failed while materializing a row.
    ///
    /// The payload is whatever the generator returned; the dataset does not
    /// catch, retry, or substitute a default.
    #[error(transparent)]
    Generator(#[from] anyhow::Error),
}
