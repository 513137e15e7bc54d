use async_trait::async_trait;

use crate::{
    error::Result,
    http::HttpClient,
    model::{ForecastDocument, ForecastRequest},
    provider::embedded_error,
};

use super::{ForecastProvider, ProviderId};

/// OpenWeather One Call 3.0, queried directly with an API key.
#[derive(Debug, Clone)]
pub struct OneCallProvider {
    http: HttpClient,
    url: String,
    api_key: String,
}

impl OneCallProvider {
    pub fn new(http: HttpClient, url: impl Into<String>, api_key: String) -> Self {
        Self { http, url: url.into(), api_key }
    }
}

#[async_trait]
impl ForecastProvider for OneCallProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OneCall
    }

    async fn get_forecast(&self, request: &ForecastRequest) -> Result<ForecastDocument> {
        let latitude = request.latitude.to_string();
        let longitude = request.longitude.to_string();
        let exclude = request.exclude_param();

        let mut params = vec![
            ("lat", latitude.as_str()),
            ("lon", longitude.as_str()),
            ("units", request.units.as_str()),
            ("appid", self.api_key.as_str()),
        ];
        if !exclude.is_empty() {
            params.push(("exclude", exclude.as_str()));
        }

        let req = self.http.get(&self.url).query(&params);
        self.http.fetch(req).await?.json_checked(embedded_error)
    }
}
