use clap::Parser;
use folio::core::config::{self, CliOverrides};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio", about = "Terminal reader for a small static blog")]
struct Args {
    /// Posts document: a file path, an http(s) URL, or a name relative to --base-url
    #[arg(short, long)]
    source: Option<String>,

    /// Base URL that relative sources are resolved against
    #[arg(short, long)]
    base_url: Option<String>,

    /// Where to write the log
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // A broken config file falls back to defaults rather than aborting
    let file_config = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Warning: {e}; using defaults");
            config::FolioConfig::default()
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            source: args.source,
            base_url: args.base_url,
            log_file: args.log_file,
        },
    );

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!(
        "Folio starting up (source: {}, base_url: {:?}, home_limit: {})",
        resolved.source,
        resolved.base_url,
        resolved.home_limit
    );

    folio::tui::run(resolved)
}
