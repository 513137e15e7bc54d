//! Human-friendly text for a forecast report.

use console::style;
use locast_core::{
    Report,
    format::{EpochFormat, ForecastZone, bearing_from_degrees, round},
    icon::{IconStore, icon_name_for_condition},
    model::{Alert, CurrentWeather, DailyWeather, HourlyWeather},
};

const HOURS_SHOWN: usize = 12;

/// Icon for the current condition. Icons are decoration, so a failure is
/// logged and the report is printed without one.
pub async fn fetch_icon(store: &IconStore, report: &Report) -> Option<String> {
    let code = report.forecast.current.as_ref()?.condition()?.icon.as_str();
    let name = icon_name_for_condition(code);

    match store.get_icon(name).await {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::warn!(icon = name, error = %e, "skipping icon");
            None
        }
    }
}

pub fn render(report: &Report, icon: Option<&str>) -> String {
    let forecast = &report.forecast;
    let zone = ForecastZone::new(&forecast.timezone, forecast.timezone_offset);

    let mut output = format!(
        "{} {}\n\n",
        style(&report.location.display_name).bold(),
        style(format!("({})", report.location.coordinate)).dim()
    );

    if let Some(icon) = icon {
        output.push_str(icon);
        if !icon.ends_with('\n') {
            output.push('\n');
        }
        output.push('\n');
    }

    if let Some(current) = &forecast.current {
        output.push_str(&render_current(current, report, &zone));
    }

    for alert in &forecast.alerts {
        output.push_str(&render_alert(alert, &zone));
    }

    if !forecast.hourly.is_empty() {
        output.push_str(&format!("{}\n", style("Next hours").cyan().bold()));
        for hour in forecast.hourly.iter().take(HOURS_SHOWN) {
            output.push_str(&render_hour(hour, report, &zone));
        }
        output.push('\n');
    }

    if !forecast.daily.is_empty() {
        output.push_str(&format!("{}\n", style("Coming days").cyan().bold()));
        for day in &forecast.daily {
            output.push_str(&render_day(day, report, &zone));
        }
    }

    output
}

fn render_current(current: &CurrentWeather, report: &Report, zone: &ForecastZone) -> String {
    let temp = report.units.temperature_symbol();
    let description =
        current.condition().map(|c| c.description.as_str()).unwrap_or("unknown conditions");

    let mut output = format!(
        "Current weather is {} for {}\n",
        style(description).cyan(),
        zone.format(current.time, EpochFormat::Full)
    );

    output.push_str(&format!(
        "The temperature is {}{temp}, but it feels like {}{temp}\n",
        style(round(current.temperature, 0)).bold(),
        round(current.feels_like, 0)
    ));

    output.push_str(&format!(
        "{}\n",
        wind_phrase(current.wind_speed, current.wind_degrees, report.units.speed_symbol())
    ));

    output.push_str(&format!(
        "Humidity {}%, UV index {}, cloud cover {}%\n",
        current.humidity,
        round(current.uv_index, 1),
        current.cloud_cover
    ));

    if let (Some(sunrise), Some(sunset)) = (current.sunrise, current.sunset) {
        output.push_str(&format!(
            "Sunrise {}, sunset {}\n",
            zone.format(sunrise, EpochFormat::Time),
            zone.format(sunset, EpochFormat::Time)
        ));
    }

    output.push('\n');
    output
}

fn wind_phrase(speed: f64, degrees: f64, unit: &str) -> String {
    match bearing_from_degrees(degrees) {
        "" => format!("Winds are {} {unit}", round(speed, 0)),
        bearing => format!("Winds are {} {unit} from the {bearing}", round(speed, 0)),
    }
}

fn render_alert(alert: &Alert, zone: &ForecastZone) -> String {
    let mut output = format!("{}\n", style(&alert.event).red().bold());

    if !alert.sender.is_empty() {
        output.push_str(&format!("  Issued by {}\n", alert.sender));
    }
    output.push_str(&format!(
        "  {} until {}\n",
        zone.format(alert.start, EpochFormat::Full),
        zone.format(alert.end, EpochFormat::Full)
    ));
    if !alert.description.is_empty() {
        for line in alert.description.lines() {
            output.push_str(&format!("  {line}\n"));
        }
    }

    output.push('\n');
    output
}

fn render_hour(hour: &HourlyWeather, report: &Report, zone: &ForecastZone) -> String {
    let description = hour.condition().map(|c| c.description.as_str()).unwrap_or_default();

    format!(
        "  {:>10}  {:>5}{}  {:>3}%  {}\n",
        zone.format(hour.time, EpochFormat::Time),
        round(hour.temperature, 0),
        report.units.temperature_symbol(),
        round(hour.precipitation_probability * 100.0, 0),
        description
    )
}

fn render_day(day: &DailyWeather, report: &Report, zone: &ForecastZone) -> String {
    let temp = report.units.temperature_symbol();
    let summary = if day.summary.is_empty() {
        day.condition().map(|c| c.description.as_str()).unwrap_or_default()
    } else {
        day.summary.as_str()
    };

    format!(
        "  {}: {}, {}{temp} to {}{temp}, {}% chance of precipitation\n",
        style(zone.format(day.time, EpochFormat::Date)).bold(),
        summary,
        round(day.temperature.min, 0),
        round(day.temperature.max, 0),
        round(day.precipitation_probability * 100.0, 0)
    )
}
