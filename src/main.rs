use clap::Parser;
use page_harvest::config::SnapshotConfig;
use page_harvest::{FetchMode, Snapshot, SnapshotError};
use serde::Serialize;

mod args;
use args::{Args, Operation, convert_mode};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting snapshot for URL: {}", args.url);

    let mut config = match &args.config {
        Some(path) => match SnapshotConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config from {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => SnapshotConfig::default(),
    };

    if let Some(webdriver_url) = &args.webdriver_url {
        config.render.webdriver_url = webdriver_url.clone();
        config.screenshot.webdriver_url = webdriver_url.clone();
    }

    let mode = convert_mode(args.mode);
    if mode == FetchMode::Rendered || args.op == Operation::Screenshot {
        ::log::info!(
            "Rendered mode requires a WebDriver server; set WEBDRIVER_URL if not using {}",
            config.render.webdriver_url
        );
    }

    let snapshot = Snapshot::new(&args.url).with_mode(mode).with_config(config);

    let output = match args.op {
        Operation::Content => snapshot.content().await.and_then(to_json),
        Operation::Palette => snapshot.palette().await.and_then(to_json),
        Operation::Screenshot => snapshot.screenshot().await.and_then(to_json),
    };

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            ::log::error!("Snapshot failed: {}", e.detail());
            let body = serde_json::json!({
                "status": e.status_code(),
                "error": e.to_string(),
            });
            println!("{}", body);
            std::process::exit(1);
        }
    }
}

fn to_json<T: Serialize>(value: T) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(&value).map_err(|e| SnapshotError::Internal(e.to_string()))
}
