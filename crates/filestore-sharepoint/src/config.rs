use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Configuration for the filestore-sharepoint CLI.
#[derive(Parser, Debug, Clone)]
#[command(name = "filestore-sharepoint")]
#[command(about = "List, download, upload and delete files on a SharePoint site")]
pub struct Config {
    /// Scheme and host of the tenant, e.g. https://contoso.sharepoint.com
    #[arg(long, env = "SP_BASE_URL")]
    pub base_url: String,

    /// Site path, e.g. /sites/engineering
    #[arg(long, env = "SP_SITE_PATH")]
    pub site_path: String,

    /// Authentication cookie (or token) obtained out of band
    #[arg(long, env = "SP_AUTH_COOKIE", hide_env_values = true)]
    pub auth_cookie: String,

    /// Chunk size for chunked uploads (MiB)
    #[arg(long, default_value = "100", env = "SP_CHUNK_SIZE_MIB")]
    pub chunk_size_mib: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List folders and files of a folder (newest first, JSON)
    Ls {
        /// Folder path, relative to the site or server-relative
        folder: String,
    },

    /// Download a file
    Get {
        /// File path, relative to the site or server-relative
        file: String,

        /// Local destination (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Upload a local file into a folder
    Put {
        /// Local file to upload
        local: PathBuf,

        /// Destination folder
        folder: String,

        /// Remote file name (defaults to the local file name)
        #[arg(long)]
        name: Option<String>,

        /// Force a chunked upload session even for small files
        #[arg(long)]
        chunked: bool,
    },

    /// Create a folder
    Mkdir {
        /// Parent folder
        parent: String,

        /// New folder name
        name: String,
    },

    /// Delete a file
    Rm {
        /// Folder containing the file
        folder: String,

        /// File name
        name: String,
    },
}

impl Config {
    /// Chunk size in bytes.
    pub fn chunk_size_bytes(&self) -> usize {
        self.chunk_size_mib.saturating_mul(1024 * 1024)
    }
}
