use thiserror::Error;

/// Failures of the location and forecast pipeline.
///
/// Every variant is terminal for a single lookup: nothing is retried and no
/// default is substituted.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection failure, or a non-2xx status whose body did not decode.
    #[error("http request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("reading response body from {url} failed: {source}")]
    Read {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("decoding the response from {url} failed: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no locations found for '{query}'")]
    NoResults { query: String },

    /// Application-level error embedded in an otherwise successful response.
    #[error("the response returned: {message}")]
    Provider { message: String },

    #[error("no icon found for {icon}")]
    IconNotFound { icon: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    /// The remote URL involved, when the failure happened on the wire.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Transport { url, .. } | Self::Read { url, .. } | Self::Decode { url, .. } => {
                Some(url.as_str())
            }
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Read { .. })
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_surfaces_message() {
        let err = WeatherError::Provider { message: "invalid api key".into() };
        assert_eq!(err.to_string(), "the response returned: invalid api key");
        assert!(err.url().is_none());
        assert!(!err.is_transport());
    }

    #[test]
    fn decode_error_names_url() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = WeatherError::Decode { url: "http://example.test/search".into(), source };

        assert_eq!(err.url(), Some("http://example.test/search"));
        assert!(err.to_string().contains("http://example.test/search"));
    }

    #[test]
    fn no_results_names_query() {
        let err = WeatherError::NoResults { query: "Atlantis".into() };
        assert!(err.to_string().contains("Atlantis"));
    }
}
