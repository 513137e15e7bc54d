//! Best-effort location of the caller from their public IP address.

use std::fmt;

use serde_json::Value;

use crate::{
    error::{Result, WeatherError},
    http::HttpClient,
    model::{Coordinate, IpLocationInfo},
};

/// What IP geolocation yields in place of a user query.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationToken {
    PostalCode(String),
    Coordinate(Coordinate),
}

impl fmt::Display for LocationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationToken::PostalCode(zip) => f.write_str(zip),
            LocationToken::Coordinate(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutoLocation {
    pub token: LocationToken,
    pub info: IpLocationInfo,
}

#[derive(Debug, Clone)]
pub struct AutoLocator {
    http: HttpClient,
    ip_echo_url: String,
    ip_geolocation_url: String,
}

impl AutoLocator {
    pub fn new(
        http: HttpClient,
        ip_echo_url: impl Into<String>,
        ip_geolocation_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            ip_echo_url: ip_echo_url.into(),
            ip_geolocation_url: ip_geolocation_url.into(),
        }
    }

    /// The caller's public IP as reported by the echo service.
    pub async fn public_ip(&self) -> Result<String> {
        let body = self.http.fetch(self.http.get(&self.ip_echo_url)).await?.into_text()?;
        let ip = body.trim_end().to_string();

        if ip.is_empty() {
            return Err(WeatherError::Provider {
                message: format!("{} returned an empty body", self.ip_echo_url),
            });
        }

        Ok(ip)
    }

    pub async fn ip_location(&self, ip: &str) -> Result<IpLocationInfo> {
        let url = format!("{}/{}", self.ip_geolocation_url.trim_end_matches('/'), ip);
        self.http.fetch(self.http.get(&url)).await?.json_checked(lookup_failure)
    }

    /// Public IP first, then its region. A failure at either step stops here.
    pub async fn locate(&self) -> Result<AutoLocation> {
        let ip = self.public_ip().await?;
        tracing::debug!(%ip, "discovered public ip");

        let info = self.ip_location(&ip).await?;
        let token = token_from(&info).ok_or_else(|| WeatherError::Provider {
            message: format!("no postal code or coordinate known for {ip}"),
        })?;

        tracing::info!(%ip, %token, "auto-located");
        Ok(AutoLocation { token, info })
    }
}

/// Postal code when there is one, the coordinate otherwise.
pub fn token_from(info: &IpLocationInfo) -> Option<LocationToken> {
    let zip = info.zip.trim();
    if !zip.is_empty() {
        return Some(LocationToken::PostalCode(zip.to_string()));
    }
    info.coordinate().map(LocationToken::Coordinate)
}

fn lookup_failure(value: &Value) -> Result<()> {
    if value.get("status").and_then(Value::as_str) != Some("fail") {
        return Ok(());
    }

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("ip geolocation failed")
        .to_string();

    Err(WeatherError::Provider { message })
}
