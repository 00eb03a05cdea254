use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tvscrape_rs::{RetryConfig, ScrapeClient, ScrapeError, SiteConfig, output, pipeline};
use url::Url;

/// Extract embedded channel or event data from a site into canonical JSON
#[derive(Debug, Parser)]
#[command(name = "tvscrape", version)]
struct Cli {
    /// Built-in site preset (canales, agenda, agenda-script)
    #[arg(short, long, conflicts_with = "config")]
    site: Option<String>,

    /// Site description in TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start URL, overriding the site's
    #[arg(short, long)]
    url: Option<Url>,

    /// Inline marker regex, overriding the site's
    #[arg(short, long)]
    marker: Option<String>,

    /// Keyword matched against script/iframe sources, overriding the site's
    #[arg(long)]
    reference: Option<String>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// User-Agent to present
    #[arg(long)]
    user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 20)]
    timeout: u64,

    /// Retries for transient failures
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn site_from(cli: &Cli) -> Result<SiteConfig, ScrapeError> {
    let mut site = match (&cli.config, &cli.site) {
        (Some(path), _) => SiteConfig::load(path)?,
        (None, Some(id)) => SiteConfig::preset(id)?,
        (None, None) => {
            return Err(ScrapeError::Config("either --site or --config is required".into()));
        }
    };
    if let Some(url) = &cli.url {
        site = site.with_start_url(url.clone());
    }
    if let Some(marker) = &cli.marker {
        site = site.with_marker(marker.clone());
    }
    if let Some(keyword) = &cli.reference {
        site = site.with_reference(keyword.clone());
    }
    Ok(site)
}

async fn run(cli: Cli) -> Result<(), ScrapeError> {
    let site = site_from(&cli)?;

    let mut builder = ScrapeClient::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .retry(RetryConfig {
            max_retries: cli.retries,
            ..RetryConfig::default()
        });
    if let Some(ua) = &cli.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    let client = builder.build()?;

    let doc = pipeline::run(&client, &site).await?;
    match &cli.output {
        Some(path) => output::write_document(&doc, path)?,
        None => println!("{}", output::to_json_pretty(&doc)?),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
