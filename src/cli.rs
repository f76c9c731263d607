use crate::config::{HostEnvironment, ResolvedConfig};
use crate::constants::DEFAULT_CONFIG_FILE;
use crate::converter::convert;
use crate::errors::AppResult;
use crate::exporter::export_countries;
use crate::fetcher::fetch_entries;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

fn command() -> Command<'static> {
    Command::new("iso3166-countries")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .after_help("Without arguments, Iso3166Countries.toml is read from the application root if present.\nExample:\n  iso3166-countries --url https://example.com/list_en.xml")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a TOML configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .help("Source document URL, overrides source_url from the configuration")
                .action(ArgAction::Set),
        )
}

/// Parses command-line arguments and runs the export once.
///
/// The workflow:
/// 1. Detects the hosting environment to find the application root
/// 2. Loads the configuration (explicit file, default file, or built-in defaults)
/// 3. Fetches, converts and exports the country list
///
/// # Errors
///
/// Returns an error if the configuration is invalid or any pipeline stage fails.
pub async fn cli() -> AppResult<()> {
    let matches = command().get_matches();
    let host = HostEnvironment::detect()?;
    let config = load_config(&matches, &host)?;
    let export_dir = host.resolve(&config.export_dir);

    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    run_workflow(&client, &config, &export_dir).await?;
    Ok(())
}

fn load_config(matches: &ArgMatches, host: &HostEnvironment) -> AppResult<ResolvedConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ResolvedConfig::from_toml_file(path)?,
        None => {
            let default_path = host.resolve(Path::new(DEFAULT_CONFIG_FILE));
            if default_path.is_file() {
                ResolvedConfig::from_toml_file(&default_path)?
            } else {
                info!(
                    path = %default_path.display(),
                    "No configuration file found, using defaults"
                );
                ResolvedConfig::default()
            }
        }
    };

    if let Some(url) = matches.get_one::<String>("url") {
        config.source_url = Some(url.clone());
    }
    Ok(config)
}

/// Runs fetch, convert and export once.
///
/// # Returns
///
/// The path of the exported file, or `None` when the source document did not
/// have the expected shape and nothing was written.
///
/// # Errors
///
/// Returns the first failure of any stage; no stage is retried.
pub async fn run_workflow(
    client: &reqwest::Client,
    config: &ResolvedConfig,
    export_dir: &Path,
) -> AppResult<Option<PathBuf>> {
    let url = config.source_url()?;
    let rules = config.override_rules()?;

    let entries = fetch_entries(client, &url, config).await?;
    let Some(countries) = convert(entries.as_deref(), &rules, config)? else {
        warn!(url = %url, "Source document had no usable entries, nothing exported");
        return Ok(None);
    };

    let exported = export_countries(&countries, export_dir, &config.export_filename).await?;
    info!(countries = countries.len(), "All operations completed successfully");
    Ok(exported)
}
