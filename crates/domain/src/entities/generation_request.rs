//! Generation request entity

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::OptionValue;

/// A fully resolved request for one model invocation
///
/// Built fresh for every invocation from operator input. Options are kept in
/// a sorted map so that two requests built from the same input compare and
/// serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    model_id: String,
    prompt: String,
    options: BTreeMap<String, OptionValue>,
}

impl GenerationRequest {
    /// Create a request, rejecting a blank model identifier
    pub fn new(
        model_id: impl Into<String>,
        prompt: impl Into<String>,
        options: BTreeMap<String, OptionValue>,
    ) -> Result<Self, DomainError> {
        let model_id = model_id.into();
        if model_id.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "model id must not be empty".to_string(),
            ));
        }

        Ok(Self {
            model_id,
            prompt: prompt.into(),
            options,
        })
    }

    /// Identifier of the remote foundation model
    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub const fn options(&self) -> &BTreeMap<String, OptionValue> {
        &self.options
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    fn require(&self, name: &str) -> Result<&OptionValue, DomainError> {
        self.options
            .get(name)
            .ok_or_else(|| DomainError::MissingOption(name.to_string()))
    }

    /// Read a numeric option as a float
    pub fn float(&self, name: &str) -> Result<f64, DomainError> {
        let value = self.require(name)?;
        value
            .as_f64()
            .ok_or_else(|| DomainError::type_mismatch(name, "float", value.type_name()))
    }

    pub fn int(&self, name: &str) -> Result<i64, DomainError> {
        let value = self.require(name)?;
        value
            .as_i64()
            .ok_or_else(|| DomainError::type_mismatch(name, "int", value.type_name()))
    }

    pub fn text(&self, name: &str) -> Result<&str, DomainError> {
        let value = self.require(name)?;
        value
            .as_str()
            .ok_or_else(|| DomainError::type_mismatch(name, "text", value.type_name()))
    }

    pub fn list(&self, name: &str) -> Result<&[String], DomainError> {
        let value = self.require(name)?;
        value
            .as_list()
            .ok_or_else(|| DomainError::type_mismatch(name, "list", value.type_name()))
    }
}
