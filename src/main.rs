use invoice_extractor::config::{Config, TaggerBackend};
use invoice_extractor::engine::Extractor;
use invoice_extractor::tagger::{RemoteTagger, SpanTagger};
use std::io::Read;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // init tracing
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter("info")
        .init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("usage: invoice-extract <text-file|-> [config.toml]");
        std::process::exit(2);
    };

    let cfg = match args.next() {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    let text = read_input(&input)?;
    info!(chars = text.len(), "Loaded input text");

    let tagger: Option<Box<dyn SpanTagger>> = match cfg.tagger.backend {
        TaggerBackend::Heuristics => {
            info!("Backend set to heuristics — using pattern extraction only");
            None
        }
        TaggerBackend::Remote => {
            let remote = &cfg.tagger.remote;
            info!(url = %remote.base_url, "Using remote tagging backend");
            let tagger =
                RemoteTagger::new(&remote.base_url, Duration::from_secs(remote.timeout_secs))?;
            if !tagger.health().await {
                warn!(
                    url = %remote.base_url,
                    "Tagging service unreachable — extraction will degrade to patterns"
                );
            }
            Some(Box::new(tagger))
        }
    };

    let extractor = Extractor::new(tagger, cfg.thresholds);
    let fields = extractor.extract(&text).await;

    let (filled, total) = fields.coverage();
    info!(filled, total, "Extraction result");
    println!("{}", serde_json::to_string_pretty(&fields)?);

    Ok(())
}

fn read_input(input: &str) -> Result<String, Box<dyn std::error::Error>> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}
