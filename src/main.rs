// Interactive critical CSS generator
//
// Prompts for a local HTML file or a page URL, resolves one of its
// stylesheets and writes the critical CSS next to the HTML file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use critical_css_generator::utils::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use critical_css_generator::{
    ChromiumRenderer, DialoguerPrompter, GeneratorConfig, Session, console,
};

#[derive(Parser, Debug)]
#[command(name = "critical-css-generator", version, about)]
struct Cli {
    /// Viewport width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Viewport height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Render budget in milliseconds
    #[arg(long = "timeout-ms")]
    timeout_ms: Option<u64>,

    /// Directory fetched pages and stylesheets are mirrored into
    /// [default: current directory]
    #[arg(long = "domain-root")]
    domain_root: Option<PathBuf>,

    /// Skip the before/after screenshots
    #[arg(long = "no-screenshots")]
    no_screenshots: bool,

    /// Show the browser window while rendering
    #[arg(long)]
    headful: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn default_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.default_directive())),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let working_dir = std::env::current_dir().context("Failed to read the current directory")?;

    let mut builder = GeneratorConfig::builder()
        .domain_root(cli.domain_root.clone().unwrap_or_else(|| working_dir.clone()))
        .save_screenshots(!cli.no_screenshots)
        .headless(!cli.headful)
        .viewport(
            cli.width.unwrap_or(DEFAULT_VIEWPORT_WIDTH),
            cli.height.unwrap_or(DEFAULT_VIEWPORT_HEIGHT),
        );
    if let Some(timeout_ms) = cli.timeout_ms {
        builder = builder.render_timeout_ms(timeout_ms);
    }
    let config = builder.build().context("Invalid configuration")?;

    console::banner();

    let renderer = ChromiumRenderer::new(config.headless());
    let mut session = Session::new(config, renderer, DialoguerPrompter::new(), working_dir)?;
    session.run().await;

    Ok(())
}
