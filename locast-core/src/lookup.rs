use crate::{
    Config,
    error::Result,
    geocode::Geocoder,
    http::HttpClient,
    icon::IconStore,
    locate::AutoLocator,
    model::{ForecastDocument, ForecastRequest, Section, Units},
    provider::{ForecastProvider, provider_from_config},
    resolve::{LocationResolver, ResolvedLocation},
};

/// Everything the presentation layer needs for one run.
#[derive(Debug, Clone)]
pub struct Report {
    pub location: ResolvedLocation,
    pub forecast: ForecastDocument,
    pub units: Units,
}

/// Resolve a location, then fetch its forecast. Strictly one after the other.
#[derive(Debug)]
pub struct Lookup {
    resolver: LocationResolver,
    provider: Box<dyn ForecastProvider>,
    units: Units,
    exclude: Vec<Section>,
}

impl Lookup {
    pub fn new(resolver: LocationResolver, provider: Box<dyn ForecastProvider>) -> Self {
        Self { resolver, provider, units: Units::default(), exclude: Vec::new() }
    }

    /// Wire every collaborator from `config`, sharing one HTTP client.
    pub fn from_config(config: &Config, http: HttpClient) -> Result<Self> {
        let endpoints = &config.endpoints;

        let resolver = LocationResolver::new(
            Geocoder::new(http.clone(), &endpoints.geocode_search, config.geocoding_api_key()),
            AutoLocator::new(http.clone(), &endpoints.ip_echo, &endpoints.ip_geolocation),
        );

        let provider_id = config
            .default_provider_id()
            .map_err(|e| crate::WeatherError::Config(e.to_string()))?;
        let provider = provider_from_config(provider_id, config, http)?;

        Ok(Self::new(resolver, provider).with_units(config.units))
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn excluding(mut self, sections: impl IntoIterator<Item = Section>) -> Self {
        self.exclude.extend(sections);
        self
    }

    pub async fn run(&self, query: &str) -> Result<Report> {
        let location = self.resolver.resolve(query).await?;
        tracing::debug!(
            provider = %self.provider.id(),
            coordinate = %location.coordinate,
            "fetching forecast"
        );

        let request = ForecastRequest::new(location.coordinate, self.units)
            .excluding(self.exclude.iter().copied());
        let forecast = self.provider.get_forecast(&request).await?;

        Ok(Report { location, forecast, units: self.units })
    }
}

/// Icon store pointed at the configured endpoint.
pub fn icon_store_from_config(config: &Config, http: HttpClient) -> IconStore {
    IconStore::new(http, &config.endpoints.icons)
}
