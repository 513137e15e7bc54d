use console::Style;

use crate::{
    error::{Result, WeatherError},
    http::HttpClient,
};

/// Foreground colors used for icon glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconColor {
    Blue,
    Yellow,
    LightYellow,
    White,
    Black,
}

impl IconColor {
    fn style(&self) -> Style {
        let style = Style::new().force_styling(true);
        match self {
            IconColor::Blue => style.blue(),
            IconColor::Yellow => style.yellow(),
            IconColor::LightYellow => style.yellow().bright(),
            IconColor::White => style.white(),
            IconColor::Black => style.black(),
        }
    }

    /// Wrap `text` in this color's escape sequences.
    pub fn paint(&self, text: &str) -> String {
        self.style().apply_to(text).to_string()
    }
}

/// Color for an icon-store name; unmapped names are blue.
pub fn icon_color(icon: &str) -> IconColor {
    match icon {
        "clear-day" | "partly-cloudy-day" => IconColor::Yellow,
        "clear-night" | "partly-cloudy-night" => IconColor::LightYellow,
        "snow" => IconColor::White,
        "wind" | "thunderstorm" | "tornado" => IconColor::Black,
        _ => IconColor::Blue,
    }
}

/// Icon-store name for a forecast condition icon code such as `01d`.
///
/// Codes the store has no art for pass through unchanged.
pub fn icon_name_for_condition(code: &str) -> &str {
    let night = code.ends_with('n');
    match code.get(..2) {
        Some("01") if night => "clear-night",
        Some("01") => "clear-day",
        Some("02") if night => "partly-cloudy-night",
        Some("02") => "partly-cloudy-day",
        Some("03" | "04") => "cloudy",
        Some("09" | "10") => "rain",
        Some("11") => "thunderstorm",
        Some("13") => "snow",
        Some("50") => "fog",
        _ => code,
    }
}

/// Fetches ASCII-art glyphs from the remote icon store.
#[derive(Debug, Clone)]
pub struct IconStore {
    http: HttpClient,
    base_url: String,
}

impl IconStore {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    /// Fetch the glyph for `icon` and wrap it in the icon's color.
    pub async fn get_icon(&self, icon: &str) -> Result<String> {
        let url = format!("{}/{}.txt", self.base_url.trim_end_matches('/'), icon);
        let fetched = self.http.fetch(self.http.get(&url)).await?;

        // A missing object comes back as an XML error document, usually with
        // a 403 or 404 status.
        if fetched.text.contains("<?xml") {
            return Err(WeatherError::IconNotFound { icon: icon.to_string() });
        }

        let glyph = fetched.into_text()?;
        Ok(icon_color(icon).paint(&glyph))
    }
}
