use std::collections::BTreeMap;

use anyhow::{Error, Result, anyhow};
use jsonschema::{
    Keyword, ValidationError as SchemaError, Validator,
    error::ValidationErrorKind,
    paths::{LazyLocation, Location},
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::validation::ValidationError;

const NOT_EMPTY_KEYWORD: &str = "notEmpty";

/// A JSON schema compiled once at start-up and reused for every message.
pub struct SchemaValidator {
    name: &'static str,
    validator: Validator,
}

impl SchemaValidator {
    pub fn compile(name: &'static str, schema: &Value) -> Result<Self, Error> {
        let validator = jsonschema::options()
            .with_keyword(NOT_EMPTY_KEYWORD, not_empty_factory)
            .build(schema)
            .map_err(|e| anyhow!("Failed to compile {} schema: {}", name, e))?;

        debug!(schema = name, "Schema compiled");

        Ok(Self { name, validator })
    }

    pub fn from_json(name: &'static str, schema: &str) -> Result<Self, Error> {
        let schema: Value = serde_json::from_str(schema)
            .map_err(|e| anyhow!("Invalid {} schema document: {}", name, e))?;
        Self::compile(name, &schema)
    }

    /// Returns every violation found in `data`, or `None` when it conforms.
    pub fn validate(&self, data: &Value) -> Option<Vec<ValidationError>> {
        let errors: Vec<ValidationError> = self
            .validator
            .iter_errors(data)
            .map(|error| to_validation_error(&error))
            .collect();

        if errors.is_empty() {
            return None;
        }

        debug!(
            schema = self.name,
            error_count = errors.len(),
            data = %data,
            "Schema validation failed"
        );

        Some(errors)
    }
}

fn to_validation_error(error: &SchemaError<'_>) -> ValidationError {
    let mut params = BTreeMap::new();

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            params.insert(
                "missingProperty".to_string(),
                property.to_string().trim_matches('"').to_string(),
            );
        }
        ValidationErrorKind::Enum { options } => {
            params.insert("allowedValues".to_string(), options.to_string());
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            params.insert("additionalProperty".to_string(), unexpected.join(", "));
        }
        ValidationErrorKind::MinLength { limit } => {
            params.insert("limit".to_string(), limit.to_string());
        }
        ValidationErrorKind::Format { format } => {
            params.insert("format".to_string(), format.to_string());
        }
        _ => {}
    }

    ValidationError {
        path: error.instance_path.to_string(),
        message: error.to_string(),
        params,
    }
}

/// Rejects strings that are empty once surrounding whitespace is removed.
struct NotEmptyValidator;

impl Keyword for NotEmptyValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        location: &LazyLocation,
    ) -> Result<(), SchemaError<'i>> {
        if self.is_valid(instance) {
            return Ok(());
        }

        let path: Location = location.into();
        let message = format!("Validation Error - data{} String cannot be empty", path);

        Err(SchemaError::custom(
            Location::new(),
            path,
            instance,
            message,
        ))
    }

    fn is_valid(&self, instance: &Value) -> bool {
        match instance {
            Value::String(text) => !text.trim().is_empty(),
            _ => true,
        }
    }
}

fn not_empty_factory<'a>(
    _parent: &'a Map<String, Value>,
    value: &'a Value,
    path: Location,
) -> Result<Box<dyn Keyword>, SchemaError<'a>> {
    if value.as_bool() == Some(true) {
        Ok(Box::new(NotEmptyValidator))
    } else {
        Err(SchemaError::custom(
            Location::new(),
            path,
            value,
            "The 'notEmpty' keyword must be set to true",
        ))
    }
}
