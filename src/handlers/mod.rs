// handlers/mod.rs - two security tiers
//
// Public (no token) → Protected (valid x-auth-token required)
pub mod protected;
pub mod public;

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};

use crate::error::ApiError;

/// Collects per-field validation failures for a request body
#[derive(Debug, Default)]
pub(crate) struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok && !self.errors.contains_key(field) {
            self.errors.insert(field.to_string(), message.to_string());
        }
        self
    }

    pub fn require(&mut self, field: &str, value: Option<&str>, message: &str) -> &mut Self {
        let present = value.is_some_and(|v| !v.trim().is_empty());
        self.check(field, present, message)
    }

    pub fn finish(&mut self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(ApiError::validation_error(
            "Invalid request body",
            Some(std::mem::take(&mut self.errors)),
        ))
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|d| d.date_naive()))
}

/// Trims and drops empty values
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
