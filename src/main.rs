use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use threadline::core::config::{CliOverrides, load_config, resolve};
use threadline::tui;

#[derive(Parser)]
#[command(name = "threadline", about = "Threaded comments in the terminal")]
struct Args {
    /// Deepest reply level drawn (top-level comments are level 0)
    #[arg(long)]
    max_depth: Option<usize>,

    /// JSON feed to load instead of the built-in fixture
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Base URL new comments are POSTed to (`{url}/comments`)
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger - writes to threadline.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("threadline.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = load_config().map_err(|e| std::io::Error::other(e.to_string()))?;
    let config = resolve(
        &file_config,
        &CliOverrides {
            max_depth: args.max_depth,
            fixture: args.fixture,
            endpoint: args.endpoint,
        },
    );

    log::info!(
        "Threadline starting up (max_depth={}, fixture={:?}, endpoint={:?})",
        config.max_depth,
        config.fixture,
        config.endpoint_url
    );

    tui::run(config)
}
