use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password};
use locast_core::{
    Config, HttpClient, Lookup, ProviderId, Section, Units, lookup::icon_store_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "locast", version, about = "Weather forecast for a place, or for wherever you are")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store credentials for a forecast provider, or for geocoding.
    Configure {
        /// "relay", "onecall" or "geocoding".
        provider: String,
    },

    /// Show the forecast for a location.
    Show {
        /// Free-text location, e.g. "Berwyn, PA". Omit to locate by IP address.
        location: Vec<String>,

        /// standard, metric or imperial.
        #[arg(long, short)]
        units: Option<String>,

        /// Comma-separated sections to skip: current, minutely, hourly, daily, alerts.
        #[arg(long, short, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Forecast provider to use instead of the configured default.
        #[arg(long, short)]
        provider: Option<String>,

        /// Skip fetching the ASCII-art icon.
        #[arg(long)]
        hide_icon: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { location, units, exclude, provider, hide_icon } => {
                let mut config = Config::load()?;

                if let Some(units) = units {
                    config.units = Units::try_from(units.as_str())?;
                }
                if let Some(provider) = provider {
                    config.set_default_provider(ProviderId::try_from(provider.as_str())?);
                }
                let exclude = exclude
                    .iter()
                    .map(|s| Section::try_from(s.as_str()))
                    .collect::<anyhow::Result<Vec<_>>>()?;

                let http = HttpClient::new()?;
                let lookup = Lookup::from_config(&config, http.clone())?.excluding(exclude);
                let report = lookup.run(&location.join(" ")).await?;

                let icon = if hide_icon {
                    None
                } else {
                    render::fetch_icon(&icon_store_from_config(&config, http), &report).await
                };

                print!("{}", render::render(&report, icon.as_deref()));
                Ok(())
            }
        }
    }
}

fn configure(target: &str) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if target.eq_ignore_ascii_case("geocoding") {
        let key = Password::new("Geocoding API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read geocoding API key")?;
        config.set_geocoding_api_key(key.trim().to_string());
    } else {
        let id = ProviderId::try_from(target)?;

        if id.requires_api_key() {
            let key = Password::new(&format!("API key for {id}:"))
                .without_confirmation()
                .prompt()
                .with_context(|| format!("Failed to read API key for {id}"))?;
            config.upsert_provider_api_key(id, key.trim().to_string());
        }

        let make_default = Confirm::new(&format!("Use {id} as the default forecast provider?"))
            .with_default(true)
            .prompt()
            .context("Failed to read confirmation")?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
