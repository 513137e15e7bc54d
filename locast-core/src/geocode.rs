//! Forward geocoding against an importance-ranked search service.

use crate::{
    error::{Result, WeatherError},
    http::HttpClient,
    model::GeocodeResult,
};

#[derive(Debug, Clone)]
pub struct Geocoder {
    http: HttpClient,
    search_url: String,
    api_key: Option<String>,
}

impl Geocoder {
    pub fn new(http: HttpClient, search_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self { http, search_url: search_url.into(), api_key }
    }

    /// All candidates for `query`, in provider order.
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeResult>> {
        let mut params = vec![("q", query)];
        if let Some(key) = self.api_key.as_deref() {
            params.push(("api_key", key));
        }

        let request = self.http.get(&self.search_url).query(&params);
        self.http.fetch(request).await?.json()
    }

    /// The most relevant candidate for `query`.
    pub async fn locate(&self, query: &str) -> Result<GeocodeResult> {
        let candidates = self.search(query).await?;
        tracing::debug!(query, candidates = candidates.len(), "geocode search returned");

        let best = select_most_important(candidates)
            .ok_or_else(|| WeatherError::NoResults { query: query.to_string() })?;

        tracing::info!(
            query,
            place = %best.display_name,
            importance = best.importance,
            "selected geocode candidate"
        );
        Ok(best)
    }
}

/// Pick the candidate with the highest importance.
///
/// Candidates are stably sorted by descending importance and the first one
/// wins, so ties go to whichever the provider listed first.
pub fn select_most_important(mut candidates: Vec<GeocodeResult>) -> Option<GeocodeResult> {
    candidates.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    candidates.into_iter().next()
}
