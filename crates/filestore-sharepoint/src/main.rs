mod config;

use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use filestore_core::RemoteFileStore;
use filestore_sharepoint::{SharePointOptions, SharePointStore, StaticCookieAuth};
use tokio::io::AsyncWriteExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Command, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    let chunk_size = NonZeroUsize::new(config.chunk_size_bytes())
        .context("--chunk-size-mib must be greater than zero")?;
    let options = SharePointOptions::new(config.base_url.clone(), config.site_path.clone())
        .with_chunk_size(chunk_size);

    info!("Connecting to {}", options.site_url());
    let auth = StaticCookieAuth::new(config.auth_cookie.clone());
    let store: Arc<dyn RemoteFileStore> = Arc::new(SharePointStore::create(options, &auth).await?);

    run(store, config.command, chunk_size).await
}

async fn run(
    store: Arc<dyn RemoteFileStore>,
    command: Command,
    chunk_size: NonZeroUsize,
) -> anyhow::Result<()> {
    match command {
        Command::Ls { folder } => {
            let listing = store.list_folder_contents(&folder).await?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Command::Get { file, output } => match output {
            Some(local) => {
                store.download_to_local(&file, &local).await?;
                info!("Saved {} to {}", file, local.display());
            }
            None => {
                let data = store.download_as_buffer(&file).await?;
                let mut stdout = tokio::io::stdout();
                stdout.write_all(&data).await?;
                stdout.flush().await?;
            }
        },
        Command::Put {
            local,
            folder,
            name,
            chunked,
        } => {
            let name = match name {
                Some(name) => name,
                None => local
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .with_context(|| format!("cannot derive a file name from {}", local.display()))?,
            };
            let data = tokio::fs::read(&local)
                .await
                .with_context(|| format!("failed to read {}", local.display()))?;

            if !data.is_empty() && (chunked || data.len() > chunk_size.get()) {
                store.upload_large(&folder, &name, &data).await?;
            } else {
                store.upload_small(&folder, &name, &data).await?;
            }
            info!("Uploaded {} ({} bytes) to {}", name, data.len(), folder);
        }
        Command::Mkdir { parent, name } => {
            store.create_folder(&parent, &name).await?;
            info!("Created folder {} in {}", name, parent);
        }
        Command::Rm { folder, name } => {
            store.delete_file(&folder, &name).await?;
            info!("Deleted {} from {}", name, folder);
        }
    }

    Ok(())
}
