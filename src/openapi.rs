// Schema source backed by a statically loaded OpenAPI document.
// Lookup only; contract coverage is partial, so absent schemas are normal.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaSourceError {
    #[error("Failed to read OpenAPI document {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse OpenAPI document {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    // Key used by the OpenAPI paths object
    pub fn key(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemaSource {
    spec: Value,
}

impl SchemaSource {
    pub fn from_value(spec: Value) -> Self {
        Self { spec }
    }

    pub fn from_file(path: &str) -> Result<Self, SchemaSourceError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SchemaSourceError::Io {
            path: path.to_string(),
            source,
        })?;
        let spec = serde_json::from_str(&raw).map_err(|source| SchemaSourceError::Parse {
            path: path.to_string(),
            source,
        })?;
        Ok(Self { spec })
    }

    // paths.{key}.{method}.responses.{status}.content.application/json.schema
    pub fn response_schema(&self, path_key: &str, method: Method, status: u16) -> Option<&Value> {
        self.operation(path_key, method)?
            .get("responses")?
            .get(status.to_string())?
            .get("content")?
            .get("application/json")?
            .get("schema")
    }

    // paths.{key}.{method}.requestBody.content.application/json.schema
    pub fn request_schema(&self, path_key: &str, method: Method) -> Option<&Value> {
        self.operation(path_key, method)?
            .get("requestBody")?
            .get("content")?
            .get("application/json")?
            .get("schema")
    }

    fn operation(&self, path_key: &str, method: Method) -> Option<&Value> {
        self.spec.get("paths")?.get(path_key)?.get(method.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_spec() -> Value {
        json!({
            "paths": {
                "/hotels/rates": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "type": "object" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "object", "required": ["data"] }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn resolves_registered_response_schema() {
        let source = SchemaSource::from_value(sample_spec());
        let schema = source
            .response_schema("/hotels/rates", Method::Post, 200)
            .unwrap();
        assert_eq!(schema["required"][0], "data");
    }

    #[test]
    fn unregistered_lookups_yield_none() {
        let source = SchemaSource::from_value(sample_spec());
        assert!(source
            .response_schema("/hotels/rates", Method::Post, 500)
            .is_none());
        assert!(source
            .response_schema("/bookings/{bookingId}", Method::Put, 200)
            .is_none());
        assert!(source.request_schema("/rates/book", Method::Post).is_none());
    }

    #[test]
    fn resolves_request_schema() {
        let source = SchemaSource::from_value(sample_spec());
        assert!(source
            .request_schema("/hotels/rates", Method::Post)
            .is_some());
    }
}
