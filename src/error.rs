// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the aggregator. Empty input is never one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("invalid range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("amounts too large to compute {0}")]
    Overflow(&'static str),
}

impl AggregateError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AggregateError::InvalidRange { .. })
    }
}

/// A record that breaks the data-model invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record {id}: amount must be greater than zero")]
    NonPositiveAmount { id: i64 },

    #[error("record {id}: {field} must not be empty")]
    EmptyLabel { id: i64, field: &'static str },
}
