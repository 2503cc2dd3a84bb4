pub mod llm;
pub mod search;

mod error;

pub use error::{Error, Result};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};

const X_API_KEY: &str = "x-api-key";

/// How a provider expects its API key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthScheme {
	/// `Authorization: Bearer <key>`.
	Bearer,
	/// `x-api-key: <key>`.
	XApiKey,
}

pub fn auth_headers(
	scheme: AuthScheme,
	api_key: &str,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	match scheme {
		AuthScheme::Bearer => {
			headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
		},
		AuthScheme::XApiKey => {
			headers.insert(HeaderName::from_static(X_API_KEY), HeaderValue::from_str(api_key)?);
		},
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

fn require_key<'a>(api_key: Option<&'a str>, label: &str) -> Result<&'a str> {
	api_key.ok_or_else(|| Error::InvalidConfig {
		message: format!("providers.{label}.api_key is not set."),
	})
}
