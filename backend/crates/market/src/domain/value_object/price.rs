//! Price Value Object
//!
//! A non-negative integer amount. Form submissions arrive as strings and
//! are parsed here; the persisted value is always an integer.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(i64);

impl Price {
    /// Create from an integer amount
    pub fn new(amount: i64) -> AppResult<Self> {
        if amount < 0 {
            return Err(AppError::bad_request("Price cannot be negative"));
        }
        Ok(Self(amount))
    }

    /// Parse a form-submitted string amount
    pub fn parse(s: &str) -> AppResult<Self> {
        let amount: i64 = s
            .trim()
            .parse()
            .map_err(|_| AppError::bad_request("Price must be a whole number"))?;
        Self::new(amount)
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(amount: i64) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
