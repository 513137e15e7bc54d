use async_trait::async_trait;

use crate::{
    error::Result,
    http::HttpClient,
    model::{ForecastDocument, ForecastRequest},
    provider::embedded_error,
};

use super::{ForecastProvider, ProviderId};

/// Forecast relay that takes the request as a JSON body and needs no key.
#[derive(Debug, Clone)]
pub struct RelayProvider {
    http: HttpClient,
    url: String,
}

impl RelayProvider {
    pub fn new(http: HttpClient, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }
}

#[async_trait]
impl ForecastProvider for RelayProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Relay
    }

    async fn get_forecast(&self, request: &ForecastRequest) -> Result<ForecastDocument> {
        let req = self.http.post(&self.url).json(request);
        self.http.fetch(req).await?.json_checked(embedded_error)
    }
}
