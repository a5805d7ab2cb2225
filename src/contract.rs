// Contract validation of API responses against OpenAPI response schemas.
// An endpoint without a registered schema passes; a registered schema is
// enforced with every violation reported at once.

use jsonschema::validator_for;
use serde_json::Value;
use thiserror::Error;

use crate::openapi::{Method, SchemaSource};

#[derive(Error, Debug)]
#[error("Contract validation failed for {method} {endpoint} {status}: {details}")]
pub struct ContractViolationError {
    pub endpoint: String,
    pub method: Method,
    pub status: u16,
    pub details: String,
}

#[derive(Debug, Clone, Default)]
pub struct ContractValidator {
    schemas: SchemaSource,
}

impl ContractValidator {
    pub fn new(schemas: SchemaSource) -> Self {
        Self { schemas }
    }

    pub fn schemas(&self) -> &SchemaSource {
        &self.schemas
    }

    // Validate a response body against the schema registered for
    // (endpoint, method, status). No schema registered -> trivially Ok.
    pub fn validate(
        &self,
        endpoint: &str,
        method: Method,
        status: u16,
        body: &Value,
    ) -> Result<(), ContractViolationError> {
        let Some(schema) = self.schemas.response_schema(endpoint, method, status) else {
            return Ok(());
        };

        let validator = validator_for(schema).map_err(|e| ContractViolationError {
            endpoint: endpoint.to_string(),
            method,
            status,
            details: format!("schema did not compile: {e}"),
        })?;

        let violations: Vec<String> = validator
            .iter_errors(body)
            .map(|e| format!("{} {}", e.instance_path, e))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ContractViolationError {
                endpoint: endpoint.to_string(),
                method,
                status,
                details: violations.join("; "),
            })
        }
    }
}
