use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, WeatherError};

pub const USER_AGENT: &str = concat!("locast/", env!("CARGO_PKG_VERSION"));

/// Query parameters whose values never end up in logs or error messages.
const SECRET_PARAMS: &[&str] = &["api_key", "appid", "key"];

/// Thin wrapper over a shared `reqwest::Client`.
///
/// Every call reads the response body to completion before returning, so the
/// connection is released on success and failure alike.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let inner = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherError::Config(format!("failed to build http client: {e}")))?;

        Ok(Self { inner })
    }

    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.inner.get(url)
    }

    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        self.inner.post(url)
    }

    pub(crate) async fn fetch(&self, request: RequestBuilder) -> Result<Fetched> {
        let request = request.build().map_err(|source| WeatherError::Transport {
            url: source.url().map(redact).unwrap_or_default(),
            source: source.without_url(),
        })?;

        let url = redact(request.url());
        tracing::debug!(%url, method = %request.method(), "sending request");

        let response = self
            .inner
            .execute(request)
            .await
            .map_err(|source| WeatherError::Transport {
                url: url.clone(),
                source: source.without_url(),
            })?;

        let status = response.status();
        let status_error = response.error_for_status_ref().err().map(reqwest::Error::without_url);

        let text = response
            .text()
            .await
            .map_err(|source| WeatherError::Read {
                url: url.clone(),
                source: source.without_url(),
            })?;

        tracing::debug!(%url, %status, bytes = text.len(), "received response");

        Ok(Fetched { url, status_error, text })
    }
}

/// A fully drained response. `url` is already redacted and the `reqwest`
/// errors carry no URL of their own.
#[derive(Debug)]
pub(crate) struct Fetched {
    pub url: String,
    /// Set when the server answered with a non-2xx status.
    pub status_error: Option<reqwest::Error>,
    pub text: String,
}

impl Fetched {
    /// Decode the body as JSON. A non-2xx status only fails the call when the
    /// body does not decode, and then as a transport failure.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        self.json_checked(|_| Ok(()))
    }

    /// Like [`Fetched::json`], but `check` inspects the raw document first so
    /// an error embedded in the payload wins over the structural decode.
    pub fn json_checked<T, F>(self, check: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce(&Value) -> Result<()>,
    {
        let value: Value = match serde_json::from_str(&self.text) {
            Ok(value) => value,
            Err(source) => {
                return Err(match self.status_error {
                    Some(status) => WeatherError::Transport { url: self.url, source: status },
                    None => WeatherError::Decode { url: self.url, source },
                });
            }
        };

        check(&value)?;

        serde_json::from_value(value).map_err(|source| match self.status_error {
            Some(status) => WeatherError::Transport { url: self.url, source: status },
            None => WeatherError::Decode { url: self.url, source },
        })
    }

    pub fn into_text(self) -> Result<String> {
        match self.status_error {
            Some(source) => Err(WeatherError::Transport { url: self.url, source }),
            None => Ok(self.text),
        }
    }
}

fn redact(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if SECRET_PARAMS.contains(&k.as_ref()) {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
