//! International backend served over HTTP by a libpostal-style parser
//! service.
//!
//! The service is called as `GET {base_url}/parse?address=...`. Accepted
//! response bodies:
//!
//! - `{"components": {"road": ["main st"], "city": "paris"}}`
//! - `[["main st", "road"], ["paris", "city"]]`
//! - `[{"label": "road", "value": "main st"}]`

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::backend::{Availability, InternationalBackend, LabeledToken};
use crate::error::BackendError;

const USER_AGENT: &str = concat!("addrkit/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct RemoteInternationalBackend {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RemoteInternationalBackend {
    /// # Errors
    ///
    /// When the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Failed(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn classify(&self, error: &reqwest::Error) -> BackendError {
        if error.is_timeout() {
            BackendError::Timeout {
                millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else if error.is_connect() {
            BackendError::Unavailable {
                reason: error.to_string(),
            }
        } else {
            BackendError::Failed(error.to_string())
        }
    }
}

impl InternationalBackend for RemoteInternationalBackend {
    fn name(&self) -> &str {
        "libpostal-remote"
    }

    fn availability(&self) -> Availability {
        if self.base_url.is_empty() {
            Availability::Unavailable {
                reason: "no service URL configured".to_string(),
            }
        } else {
            Availability::Available
        }
    }

    fn parse(&self, input: &str) -> Result<Vec<LabeledToken>, BackendError> {
        let endpoint = format!("{}/parse", self.base_url);
        let url = reqwest::Url::parse_with_params(&endpoint, &[("address", input)])
            .map_err(|e| BackendError::Failed(format!("invalid service URL: {e}")))?;

        tracing::debug!(url = %self.base_url, "calling remote address parser");
        let response = self.client.get(url).send().map_err(|e| self.classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(BackendError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .map_err(|e| BackendError::Failed(format!("invalid response body: {e}")))?;
        let tokens = tokens_from_json(&body)?;
        if tokens.is_empty() {
            return Err(BackendError::NoMatch);
        }
        Ok(tokens)
    }
}

/// Reads labeled tokens from any of the accepted response shapes.
///
/// # Errors
///
/// When the body matches none of them.
pub fn tokens_from_json(body: &Value) -> Result<Vec<LabeledToken>, BackendError> {
    match body {
        Value::Object(map) => match map.get("components") {
            Some(Value::Object(components)) => {
                let mut tokens = Vec::new();
                for (label, value) in components {
                    match value {
                        Value::String(text) => {
                            tokens.push(LabeledToken::new(text.as_str(), label.as_str()));
                        }
                        Value::Array(values) => tokens.extend(
                            values
                                .iter()
                                .filter_map(Value::as_str)
                                .map(|text| LabeledToken::new(text, label.as_str())),
                        ),
                        _ => {}
                    }
                }
                Ok(tokens)
            }
            Some(Value::Array(items)) => tokens_from_items(items),
            _ => Err(unrecognized()),
        },
        Value::Array(items) => tokens_from_items(items),
        _ => Err(unrecognized()),
    }
}

fn tokens_from_items(items: &[Value]) -> Result<Vec<LabeledToken>, BackendError> {
    items
        .iter()
        .map(|item| match item {
            Value::Array(pair) => match (
                pair.first().and_then(Value::as_str),
                pair.get(1).and_then(Value::as_str),
            ) {
                (Some(text), Some(label)) => Ok(LabeledToken::new(text, label)),
                _ => Err(unrecognized()),
            },
            Value::Object(entry) => match (
                entry.get("value").and_then(Value::as_str),
                entry.get("label").and_then(Value::as_str),
            ) {
                (Some(text), Some(label)) => Ok(LabeledToken::new(text, label)),
                _ => Err(unrecognized()),
            },
            _ => Err(unrecognized()),
        })
        .collect()
}

fn unrecognized() -> BackendError {
    BackendError::Failed("unrecognized response shape".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn component_map_shape() {
        let tokens = tokens_from_json(&json!({
            "components": {"road": ["rue de rivoli"], "city": "paris"}
        }))
        .unwrap();
        assert!(tokens.contains(&LabeledToken::new("rue de rivoli", "road")));
        assert!(tokens.contains(&LabeledToken::new("paris", "city")));
    }

    #[test]
    fn pair_and_object_shapes() {
        let pairs =
            tokens_from_json(&json!([["10", "house_number"], ["downing street", "road"]])).unwrap();
        assert_eq!(pairs[1], LabeledToken::new("downing street", "road"));

        let objects = tokens_from_json(&json!([{"label": "city", "value": "london"}])).unwrap();
        assert_eq!(objects, vec![LabeledToken::new("london", "city")]);
    }

    #[test]
    fn other_shapes_are_rejected() {
        assert!(tokens_from_json(&json!("london")).is_err());
        assert!(tokens_from_json(&json!([[1, 2]])).is_err());
    }

    #[test]
    fn blank_url_is_unavailable() {
        let backend = RemoteInternationalBackend::new("", Duration::from_secs(1)).unwrap();
        assert!(!backend.availability().is_available());
        let configured =
            RemoteInternationalBackend::new("http://localhost:4400/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(configured.base_url(), "http://localhost:4400");
        assert!(configured.availability().is_available());
    }
}
