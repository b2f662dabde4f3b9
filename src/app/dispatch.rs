use crate::cli::{Cli, Commands};
use anyhow::{Context, Result};
use pageroast::Config;
use pageroast::gating::RoastView;
use pageroast::media::detection::{detect_image_mime, mime_from_extension};
use pageroast::roast::{CritiqueEngine, ImageInput};
use pageroast::store::{RoastStore, SqliteRoastStore};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::app::status::render_status;

/// Read a local image and tag it with its sniffed (or extension-derived) MIME type.
async fn read_image_file(path: &Path) -> Result<ImageInput> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("read image file {}", path.display()))?;
    let mime = detect_image_mime(&data)
        .or_else(|| {
            path.file_name()
                .and_then(|name| name.to_str())
                .and_then(mime_from_extension)
        })
        .with_context(|| format!("{} is not a recognized image", path.display()))?;
    Ok(ImageInput::Bytes {
        data,
        mime: mime.to_string(),
    })
}

async fn run_critique(config: &Config, image_url: Option<String>, file: Option<&Path>) -> Result<()> {
    let engine = CritiqueEngine::from_config(&config.llm)?;
    let input = match (image_url, file) {
        (Some(url), _) => ImageInput::Url(url),
        (None, Some(path)) => read_image_file(path).await?,
        (None, None) => anyhow::bail!("either --image-url or --file is required"),
    };

    let analysis = engine.analyze(input).await?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

async fn run_show(config: &Config, id: &str) -> Result<()> {
    let store =
        SqliteRoastStore::connect(&config.database.resolved_url(&config.workspace_dir)).await?;
    let record = store.get(id).await?;
    println!("{}", serde_json::to_string_pretty(&RoastView::from(record))?);
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Arc<Config>) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let mut config = (*config).clone();
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if config.gateway.port == 0 {
                info!("Starting pageroast on {} (random port)", config.gateway.host);
            } else {
                info!(
                    "Starting pageroast on {}:{}",
                    config.gateway.host, config.gateway.port
                );
            }
            pageroast::gateway::run_gateway(Arc::new(config)).await
        }

        Commands::Critique { image_url, file } => {
            run_critique(&config, image_url, file.as_deref()).await
        }

        Commands::Show { id } => run_show(&config, &id).await,

        Commands::Check => {
            println!("{}", render_status(&config));
            println!();
            config.validate()?;
            println!("Configuration OK");
            Ok(())
        }
    }
}
