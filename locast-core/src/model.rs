use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// One candidate returned by a geocoding search.
///
/// Providers disagree on whether numbers arrive as JSON numbers or numeric
/// strings; both are accepted and normalized here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeResult {
    #[serde(default, deserialize_with = "flexible::number")]
    pub place_id: u64,
    #[serde(default)]
    pub licence: String,
    #[serde(default)]
    pub osm_type: String,
    #[serde(default, deserialize_with = "flexible::optional")]
    pub osm_id: Option<u64>,
    #[serde(rename = "boundingbox", default)]
    pub bounding_box: Option<BoundingBox>,
    #[serde(rename = "lat", deserialize_with = "flexible::number")]
    pub latitude: f64,
    #[serde(rename = "lon", deserialize_with = "flexible::number")]
    pub longitude: f64,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "class", default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Provider relevance ranking, higher is more relevant.
    #[serde(default)]
    pub importance: f64,
}

impl GeocodeResult {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Wire order is south, north, west, east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}

impl<'de> Deserialize<'de> for BoundingBox {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [south, north, west, east] = <[flexible::Flexible<f64>; 4]>::deserialize(deserializer)?;

        Ok(Self {
            south: flexible::parse::<_, D::Error>(south)?,
            north: flexible::parse::<_, D::Error>(north)?,
            west: flexible::parse::<_, D::Error>(west)?,
            east: flexible::parse::<_, D::Error>(east)?,
        })
    }
}

/// Result of an IP-to-region lookup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IpLocationInfo {
    pub status: String,
    pub message: Option<String>,
    pub country: String,
    pub country_code: String,
    pub region: String,
    pub region_name: String,
    pub city: String,
    pub zip: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub timezone: String,
    pub isp: String,
    pub org: String,
    #[serde(rename = "as")]
    pub autonomous_system: String,
    /// The IP address the lookup was made for.
    pub query: String,
}

impl IpLocationInfo {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.lat?, self.lon?))
    }

    /// "City, Region" with whichever parts are known.
    pub fn place_name(&self) -> String {
        [self.city.as_str(), self.region.as_str(), self.country_code.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .take(2)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Kelvin and metres per second.
    Standard,
    Metric,
    #[default]
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Standard => "K",
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            Units::Standard | Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "standard" => Ok(Units::Standard),
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: standard, metric, imperial."
            )),
        }
    }
}

/// Forecast sections a request can leave out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Current,
    Minutely,
    Hourly,
    Daily,
    Alerts,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Current => "current",
            Section::Minutely => "minutely",
            Section::Hourly => "hourly",
            Section::Daily => "daily",
            Section::Alerts => "alerts",
        }
    }
}

impl TryFrom<&str> for Section {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "current" | "currently" => Ok(Section::Current),
            "minutely" => Ok(Section::Minutely),
            "hourly" => Ok(Section::Hourly),
            "daily" => Ok(Section::Daily),
            "alerts" => Ok(Section::Alerts),
            _ => Err(anyhow::anyhow!(
                "Unknown forecast section '{value}'. \
                 Supported sections: current, minutely, hourly, daily, alerts."
            )),
        }
    }
}

/// What the forecast endpoint is asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRequest {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    pub units: Units,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Section>,
}

impl ForecastRequest {
    pub fn new(coordinate: Coordinate, units: Units) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            units,
            exclude: Vec::new(),
        }
    }

    pub fn excluding(mut self, sections: impl IntoIterator<Item = Section>) -> Self {
        for section in sections {
            if !self.exclude.contains(&section) {
                self.exclude.push(section);
            }
        }
        self
    }

    /// Comma-separated form used in query strings.
    pub fn exclude_param(&self) -> String {
        self.exclude.iter().map(Section::as_str).collect::<Vec<_>>().join(",")
    }
}

/// Multi-horizon forecast for one coordinate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastDocument {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(default)]
    pub timezone: String,
    /// Seconds east of UTC.
    #[serde(default)]
    pub timezone_offset: i32,
    #[serde(default, alias = "currently")]
    pub current: Option<CurrentWeather>,
    #[serde(default)]
    pub minutely: Vec<MinutelyPrecipitation>,
    #[serde(default)]
    pub hourly: Vec<HourlyWeather>,
    #[serde(default)]
    pub daily: Vec<DailyWeather>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConditionInfo {
    pub id: u32,
    #[serde(rename = "main")]
    pub category: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentWeather {
    #[serde(rename = "dt")]
    pub time: i64,
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
    #[serde(rename = "temp")]
    pub temperature: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub humidity: u32,
    #[serde(default)]
    pub dew_point: f64,
    #[serde(rename = "uvi", default)]
    pub uv_index: f64,
    #[serde(rename = "clouds", default)]
    pub cloud_cover: u32,
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(rename = "wind_deg", default)]
    pub wind_degrees: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    #[serde(rename = "weather", default)]
    pub conditions: Vec<ConditionInfo>,
}

impl CurrentWeather {
    pub fn condition(&self) -> Option<&ConditionInfo> {
        self.conditions.first()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MinutelyPrecipitation {
    #[serde(rename = "dt")]
    pub time: i64,
    #[serde(default)]
    pub precipitation: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyWeather {
    #[serde(rename = "dt")]
    pub time: i64,
    #[serde(rename = "temp")]
    pub temperature: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub humidity: u32,
    #[serde(default)]
    pub dew_point: f64,
    #[serde(rename = "uvi", default)]
    pub uv_index: f64,
    #[serde(rename = "clouds", default)]
    pub cloud_cover: u32,
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(rename = "wind_deg", default)]
    pub wind_degrees: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    #[serde(rename = "weather", default)]
    pub conditions: Vec<ConditionInfo>,
    #[serde(rename = "pop", default)]
    pub precipitation_probability: f64,
}

impl HourlyWeather {
    pub fn condition(&self) -> Option<&ConditionInfo> {
        self.conditions.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DailyTemperature {
    pub day: f64,
    pub min: f64,
    pub max: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DailyFeelsLike {
    pub day: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyWeather {
    #[serde(rename = "dt")]
    pub time: i64,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
    #[serde(default)]
    pub moonrise: i64,
    #[serde(default)]
    pub moonset: i64,
    #[serde(default)]
    pub moon_phase: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(rename = "temp", default)]
    pub temperature: DailyTemperature,
    #[serde(default)]
    pub feels_like: DailyFeelsLike,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub humidity: u32,
    #[serde(default)]
    pub dew_point: f64,
    #[serde(rename = "uvi", default)]
    pub uv_index: f64,
    #[serde(rename = "clouds", default)]
    pub cloud_cover: u32,
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(rename = "wind_deg", default)]
    pub wind_degrees: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    #[serde(rename = "weather", default)]
    pub conditions: Vec<ConditionInfo>,
    #[serde(rename = "pop", default)]
    pub precipitation_probability: f64,
    /// Accumulated rain in mm, absent on dry days.
    #[serde(default)]
    pub rain: Option<f64>,
    #[serde(default)]
    pub snow: Option<f64>,
}

impl DailyWeather {
    pub fn condition(&self) -> Option<&ConditionInfo> {
        self.conditions.first()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Alert {
    #[serde(rename = "sender_name", default)]
    pub sender: String,
    pub event: String,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Decoding for numbers that some providers send as strings.
mod flexible {
    use std::{fmt::Display, str::FromStr};

    use serde::{Deserialize, Deserializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum Flexible<T> {
        Value(T),
        Text(String),
    }

    pub(super) fn parse<T, E>(value: Flexible<T>) -> Result<T, E>
    where
        T: FromStr,
        T::Err: Display,
        E: de::Error,
    {
        match value {
            Flexible::Value(v) => Ok(v),
            Flexible::Text(s) => s
                .trim()
                .parse()
                .map_err(|e| E::custom(format!("invalid numeric string '{s}': {e}"))),
        }
    }

    pub(super) fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        parse(Flexible::<T>::deserialize(deserializer)?)
    }

    pub(super) fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        Option::<Flexible<T>>::deserialize(deserializer)?.map(parse).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocode_result_accepts_string_encoded_numbers() {
        let json = r#"{
            "place_id": 318254891,
            "licence": "Data © OpenStreetMap contributors",
            "osm_type": "node",
            "osm_id": 158623191,
            "boundingbox": ["40.0248306", "40.0648306", "-75.4588053", "-75.4188053"],
            "lat": "40.0448306",
            "lon": "-75.4388053",
            "display_name": "Berwyn, Easttown Township, Chester County, Pennsylvania",
            "class": "place",
            "type": "village",
            "importance": 0.469575729943735
        }"#;

        let result: GeocodeResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.place_id, 318254891);
        assert_eq!(result.osm_id, Some(158623191));
        assert_eq!(result.coordinate(), Coordinate::new(40.0448306, -75.4388053));
        assert_eq!(result.category, "place");
        assert_eq!(result.kind, "village");

        let bbox = result.bounding_box.unwrap();
        assert_eq!(bbox.south, 40.0248306);
        assert_eq!(bbox.east, -75.4188053);
        assert!(bbox.contains(result.coordinate()));
    }

    #[test]
    fn geocode_result_accepts_numeric_coordinates_and_string_ids() {
        let json = r#"{
            "place_id": "42",
            "lat": 51.5,
            "lon": -0.12,
            "display_name": "London",
            "importance": 0.9
        }"#;

        let result: GeocodeResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.place_id, 42);
        assert_eq!(result.osm_id, None);
        assert_eq!(result.bounding_box, None);
        assert_eq!(result.latitude, 51.5);
    }

    #[test]
    fn geocode_result_rejects_non_numeric_latitude() {
        let json = r#"{"place_id": 1, "lat": "north-ish", "lon": "0"}"#;
        let err = serde_json::from_str::<GeocodeResult>(json).unwrap_err();
        assert!(err.to_string().contains("north-ish"));
    }

    #[test]
    fn bounding_box_requires_four_entries() {
        let json = r#"{"place_id": 1, "lat": 0, "lon": 0, "boundingbox": ["1", "2", "3"]}"#;
        assert!(serde_json::from_str::<GeocodeResult>(json).is_err());
    }

    #[test]
    fn ip_location_decodes_ip_api_payload() {
        let json = r#"{
            "status": "success",
            "country": "United States",
            "countryCode": "US",
            "region": "PA",
            "regionName": "Pennsylvania",
            "city": "Philadelphia",
            "zip": "19143",
            "lat": 39.9486,
            "lon": -75.2339,
            "timezone": "America/New_York",
            "isp": "Verizon Communications",
            "org": "MCI Communications Services, Inc. d/b/a Verizon Business",
            "as": "AS701 Verizon Business",
            "query": "71.185.185.227"
        }"#;

        let info: IpLocationInfo = serde_json::from_str(json).unwrap();

        assert_eq!(info.zip, "19143");
        assert_eq!(info.region_name, "Pennsylvania");
        assert_eq!(info.autonomous_system, "AS701 Verizon Business");
        assert_eq!(info.coordinate(), Some(Coordinate::new(39.9486, -75.2339)));
        assert_eq!(info.place_name(), "Philadelphia, PA");
    }

    #[test]
    fn forecast_document_accepts_legacy_currently_key() {
        let json = r#"{
            "lat": 40.0389,
            "lon": -75.4483,
            "timezone": "America/New_York",
            "timezone_offset": -14400,
            "currently": {
                "dt": 1745601315,
                "temp": 296.58,
                "feels_like": 296.47,
                "wind_deg": 180,
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}]
            }
        }"#;

        let doc: ForecastDocument = serde_json::from_str(json).unwrap();
        let current = doc.current.unwrap();

        assert_eq!(current.time, 1745601315);
        assert_eq!(current.wind_degrees, 180.0);
        assert_eq!(current.condition().map(|c| c.icon.as_str()), Some("01d"));
        assert!(doc.hourly.is_empty());
        assert!(doc.alerts.is_empty());
    }

    #[test]
    fn daily_weather_decodes_nested_temperatures() {
        let json = r#"{
            "dt": 1745596800,
            "sunrise": 1745575746,
            "sunset": 1745625000,
            "moonrise": 1745570880,
            "moonset": 1745616600,
            "moon_phase": 0.92,
            "summary": "Expect a day of partly cloudy with rain",
            "temp": {"day": 296.56, "min": 285.29, "max": 297.04, "night": 290.12, "eve": 296.23, "morn": 285.29},
            "feels_like": {"day": 296.44, "night": 290.09, "eve": 296.03, "morn": 284.65},
            "pressure": 1022,
            "humidity": 57,
            "dew_point": 287.56,
            "wind_speed": 4.83,
            "wind_deg": 164,
            "wind_gust": 12.15,
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "clouds": 20,
            "pop": 0.99,
            "rain": 0.4,
            "uvi": 5.99
        }"#;

        let day: DailyWeather = serde_json::from_str(json).unwrap();

        assert_eq!(day.temperature.max, 297.04);
        assert_eq!(day.feels_like.morn, 284.65);
        assert_eq!(day.precipitation_probability, 0.99);
        assert_eq!(day.rain, Some(0.4));
        assert_eq!(day.snow, None);
        assert_eq!(day.condition().map(|c| c.category.as_str()), Some("Rain"));
    }

    #[test]
    fn forecast_request_serializes_for_relay() {
        let request = ForecastRequest::new(Coordinate::new(40.04, -75.44), Units::Metric)
            .excluding([Section::Minutely, Section::Minutely, Section::Alerts]);

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "lat": 40.04,
                "lon": -75.44,
                "units": "metric",
                "exclude": ["minutely", "alerts"]
            })
        );
        assert_eq!(request.exclude_param(), "minutely,alerts");
    }

    #[test]
    fn units_parse_case_insensitively() {
        assert_eq!(Units::try_from("Metric").unwrap(), Units::Metric);
        assert!(Units::try_from("kelvin").is_err());
        assert_eq!(Units::default().temperature_symbol(), "°F");
    }

    #[test]
    fn section_accepts_legacy_currently() {
        assert_eq!(Section::try_from("currently").unwrap(), Section::Current);
        assert!(Section::try_from("weekly").is_err());
    }
}
