use crate::{
    Config,
    error::{Result, WeatherError},
    http::HttpClient,
    model::{ForecastDocument, ForecastRequest},
    provider::{onecall::OneCallProvider, relay::RelayProvider},
};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

pub mod onecall;
pub mod relay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Relay,
    OneCall,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Relay => "relay",
            ProviderId::OneCall => "onecall",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Relay, ProviderId::OneCall]
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OneCall)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        match name.trim().to_ascii_lowercase().as_str() {
            "relay" => Ok(Self::Relay),
            // Older configs named the One Call provider after its vendor.
            "onecall" | "openweather" => Ok(Self::OneCall),
            _ => anyhow::bail!("Unknown provider '{name}', expected one of: relay, onecall"),
        }
    }
}

/// A remote service that returns a [`ForecastDocument`] for a coordinate.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn get_forecast(&self, request: &ForecastRequest) -> Result<ForecastDocument>;
}

/// Build the provider `id` with its endpoint and credentials from `config`.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
    http: HttpClient,
) -> Result<Box<dyn ForecastProvider>> {
    Ok(match id {
        ProviderId::Relay => Box::new(RelayProvider::new(http, &config.endpoints.relay_forecast)),
        ProviderId::OneCall => {
            let api_key = config.provider_api_key(id).ok_or_else(|| {
                WeatherError::Config(format!(
                    "{id} needs an API key; run `locast configure {id}` to store one"
                ))
            })?;
            Box::new(OneCallProvider::new(
                http,
                &config.endpoints.onecall_forecast,
                api_key.to_owned(),
            ))
        }
    })
}

/// Reject documents that carry an application-level error.
///
/// Some providers answer 200 with `{"error": "..."}`; OpenWeather answers
/// with `{"cod": 401, "message": "..."}`. Either way the message is surfaced
/// instead of a zero-valued forecast.
pub(crate) fn embedded_error(value: &Value) -> Result<()> {
    let message = match value.get("error") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Object(o)) => o.get("message").and_then(Value::as_str),
        _ => None,
    }
    .or_else(|| value.get("cod").and(value.get("message")).and_then(Value::as_str));

    match message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(message) => Err(WeatherError::Provider { message: message.to_string() }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_names_parse_back() {
        for id in ProviderId::all() {
            assert_eq!(ProviderId::try_from(id.as_str()).unwrap(), *id);
        }
        assert_eq!(ProviderId::try_from(" OpenWeather ").unwrap(), ProviderId::OneCall);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = ProviderId::try_from("darksky").unwrap_err();
        assert!(err.to_string().contains("Unknown provider 'darksky'"));
    }

    #[test]
    fn onecall_without_key_points_at_configure() {
        let cfg = Config::default();
        let err =
            provider_from_config(ProviderId::OneCall, &cfg, HttpClient::new().unwrap()).unwrap_err();
        assert!(matches!(err, WeatherError::Config(_)));
        assert!(err.to_string().contains("locast configure onecall"));
    }

    #[test]
    fn relay_needs_no_api_key() {
        let cfg = Config::default();
        let provider =
            provider_from_config(ProviderId::Relay, &cfg, HttpClient::new().unwrap()).unwrap();
        assert_eq!(provider.id(), ProviderId::Relay);
    }

    #[test]
    fn embedded_error_shapes() {
        let err = embedded_error(&serde_json::json!({"error": "location not found"})).unwrap_err();
        assert_eq!(err.to_string(), "the response returned: location not found");

        let err =
            embedded_error(&serde_json::json!({"error": {"message": "quota exceeded"}})).unwrap_err();
        assert!(matches!(err, WeatherError::Provider { ref message } if message == "quota exceeded"));

        let err = embedded_error(&serde_json::json!({"cod": 401, "message": "Invalid API key"}))
            .unwrap_err();
        assert!(matches!(err, WeatherError::Provider { ref message } if message == "Invalid API key"));
    }

    #[test]
    fn empty_or_missing_error_is_fine() {
        assert!(embedded_error(&serde_json::json!({"lat": 1.0, "lon": 2.0})).is_ok());
        assert!(embedded_error(&serde_json::json!({"error": ""})).is_ok());
        assert!(embedded_error(&serde_json::json!({"error": null})).is_ok());
    }
}
