use crate::{
    error::Result,
    geocode::Geocoder,
    locate::{AutoLocator, LocationToken},
    model::{Coordinate, GeocodeResult, IpLocationInfo},
};

/// How a lookup finds its coordinate, chosen once from the user's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationStrategy {
    ExplicitQuery(String),
    AutoLocate,
}

impl LocationStrategy {
    pub fn from_query(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            LocationStrategy::AutoLocate
        } else {
            LocationStrategy::ExplicitQuery(query.to_string())
        }
    }
}

/// A coordinate plus whatever the lookup learned about the place.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub display_name: String,
    /// The geocode candidate that was selected, if geocoding ran.
    pub place: Option<GeocodeResult>,
    /// The IP lookup, if the location was auto-detected.
    pub ip_location: Option<IpLocationInfo>,
}

impl ResolvedLocation {
    fn from_place(place: GeocodeResult, ip_location: Option<IpLocationInfo>) -> Self {
        Self {
            coordinate: place.coordinate(),
            display_name: place.display_name.clone(),
            place: Some(place),
            ip_location,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    geocoder: Geocoder,
    auto_locator: AutoLocator,
}

impl LocationResolver {
    pub fn new(geocoder: Geocoder, auto_locator: AutoLocator) -> Self {
        Self { geocoder, auto_locator }
    }

    /// Geocode `query`, or auto-locate the caller when it is blank.
    pub async fn resolve(&self, query: &str) -> Result<ResolvedLocation> {
        match LocationStrategy::from_query(query) {
            LocationStrategy::ExplicitQuery(query) => {
                let place = self.geocoder.locate(&query).await?;
                Ok(ResolvedLocation::from_place(place, None))
            }
            LocationStrategy::AutoLocate => self.resolve_automatically().await,
        }
    }

    async fn resolve_automatically(&self) -> Result<ResolvedLocation> {
        let auto = self.auto_locator.locate().await?;

        match auto.token {
            LocationToken::PostalCode(zip) => {
                let place = self.geocoder.locate(&zip).await?;
                Ok(ResolvedLocation::from_place(place, Some(auto.info)))
            }
            LocationToken::Coordinate(coordinate) => Ok(ResolvedLocation {
                coordinate,
                display_name: auto.info.place_name(),
                place: None,
                ip_location: Some(auto.info),
            }),
        }
    }
}
