//! Contact form state
//!
//! Submission is local only: a form whose required fields are filled flips
//! its `sent` flag, nothing is transmitted.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(skip)]
    sent: bool,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            sent: false,
        }
    }

    /// Check required fields in form order, reporting the first blank one
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(Error::MissingField(field));
            }
        }
        Ok(())
    }

    pub fn submit(&mut self) -> Result<()> {
        self.validate()?;
        self.sent = true;
        tracing::debug!(name = %self.name, "Contact form accepted");
        Ok(())
    }

    #[inline]
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Clear the fields and the sent flag for another message
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
