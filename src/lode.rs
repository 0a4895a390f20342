use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::LodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LodeResponse {
    pub status: u16,
    pub body: String,
}

impl LodeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait LodeClient: Send + Sync {
    fn fetch(&self, url: &str) -> Result<LodeResponse, LodeError>;
}

#[derive(Clone)]
pub struct LodeHttpClient {
    client: Client,
}

impl LodeHttpClient {
    pub fn new() -> Result<Self, LodeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("static-lode/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| LodeError::LodeHttp(err.to_string()))?,
        );
        // no request timeout
        let client = Client::builder()
            .default_headers(headers)
            .timeout(None::<Duration>)
            .build()
            .map_err(|err| LodeError::LodeHttp(err.to_string()))?;
        Ok(Self { client })
    }
}

impl LodeClient for LodeHttpClient {
    fn fetch(&self, url: &str) -> Result<LodeResponse, LodeError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| LodeError::LodeHttp(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| LodeError::LodeHttp(err.to_string()))?;
        Ok(LodeResponse { status, body })
    }
}
