// Environment wiring for live runs: base URL, API key and a per-run
// correlation id. Missing required values are startup-fatal.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Missing env var: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Env {
    pub base_url: String,
    pub api_key: String,
    pub run_id: String,
}

impl Env {
    // Read configuration from process environment variables.
    // BASE_URL and API_KEY are required; RUN_ID is generated when absent so
    // every run still carries a correlation id.
    pub fn from_process() -> Result<Self, EnvError> {
        Ok(Self {
            base_url: required("BASE_URL")?,
            api_key: required("API_KEY")?,
            run_id: std::env::var("RUN_ID").unwrap_or_else(|_| generate_run_id()),
        })
    }
}

fn required(name: &'static str) -> Result<String, EnvError> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(EnvError::Missing(name)),
    }
}

fn generate_run_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("RUN-{}-{}", Utc::now().timestamp_millis(), suffix.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_run_id_has_expected_shape() {
        let id = generate_run_id();
        let parts: Vec<&str> = id.splitn(3, '-').collect();
        assert_eq!(parts[0], "RUN");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn missing_required_var_is_fatal() {
        // Deliberately not set anywhere in the test environment
        let err = required("HOTEL_BOOKING_E2E_NO_SUCH_VAR").unwrap_err();
        assert!(matches!(err, EnvError::Missing(_)));
        assert_eq!(
            err.to_string(),
            "Missing env var: HOTEL_BOOKING_E2E_NO_SUCH_VAR"
        );
    }
}
