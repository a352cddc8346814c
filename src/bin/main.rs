use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use wapcheck::{Provider, RunOptions};

#[derive(Parser)]
#[command(name = "wapcheck")]
#[command(about = "Mobile-web UI check for the Twitch WAP search flow")]
#[command(version)]
struct Cli {
    /// Drive a real/emulated Android device through Appium instead of
    /// Chrome mobile emulation
    #[arg(long)]
    device: bool,

    /// Run the emulated browser headless
    #[arg(long)]
    headless: bool,

    /// Search keyword
    #[arg(long, default_value = "StarCraft II")]
    keyword: String,

    /// Per-locator wait timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Directory for failure artifacts
    #[arg(long, default_value = "artifacts")]
    artifacts_dir: PathBuf,

    /// Directory for the flow's screenshot
    #[arg(long, default_value = "screenshots")]
    screenshots_dir: PathBuf,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> wapcheck::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let provider = if cli.device {
        Provider::Device
    } else {
        Provider::Emulation {
            headless: cli.headless,
        }
    };

    let opts = RunOptions {
        keyword: cli.keyword,
        timeout: Duration::from_secs(cli.timeout_secs),
        artifacts_dir: cli.artifacts_dir,
        screenshots_dir: cli.screenshots_dir,
        ..Default::default()
    };

    let session = provider.connect().await?;
    let report = wapcheck::scenario::run(session, &opts).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        if report.success {
            println!("✓ Success");
        } else {
            println!("✗ Failed");
            if let Some(ref error) = report.error {
                println!("  Error: {}", error);
            }
            if let Some(ref artifacts) = report.artifacts {
                println!("  Artifacts ({}):", artifacts.id);
                for outcome in [
                    &artifacts.screenshot,
                    &artifacts.markup,
                    &artifacts.metadata,
                ] {
                    if let Some(path) = outcome.path() {
                        println!("    {}", path.display());
                    }
                }
            }
        }
        if let Some(ref url) = report.final_url {
            println!("  Final URL: {}", url);
        }
        println!("  Duration: {}ms", report.duration_ms);
    }

    if !report.success {
        std::process::exit(1);
    }

    Ok(())
}
