use super::app_config::LogLevel;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Parser)]
#[command(
    name = "media-fetch",
    version,
    about = "Fetch editor media with the right size and credentials",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, global = true, value_name = "PATH", env = "MEDIA_FETCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, global = true, value_name = "PATH", env = "MEDIA_FETCH_LOG_PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, global = true, value_enum, env = "MEDIA_FETCH_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// HTTP timeout in seconds.
    #[arg(long, global = true, value_name = "SECS", env = "MEDIA_FETCH_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Public resizing CDN host.
    #[arg(long, global = true, value_name = "HOST", env = "MEDIA_FETCH_CDN_HOST")]
    pub cdn_host: Option<String>,

    /// Managed-platform REST API root.
    #[arg(long, global = true, value_name = "URL", env = "MEDIA_FETCH_API_BASE_URL")]
    pub api_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and decode images, saving them as PNG.
    Fetch(FetchArgs),

    /// Resolve the playable URL and poster of a video.
    ResolveVideo(ResolveVideoArgs),

    /// Manage stored credentials.
    Credentials {
        #[command(subcommand)]
        action: CredentialsCommand,
    },
}

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct FetchArgs {
    /// Media URLs to fetch.
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<Url>,

    /// Target width in points.
    #[arg(long, default_value_t = 640.0, conflicts_with = "display")]
    pub width: f64,

    /// Target height in points; 0 keeps the aspect ratio.
    #[arg(long, default_value_t = 0.0)]
    pub height: f64,

    /// Display scale; defaults to the configured display.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Size to the configured display instead of `--width`.
    #[arg(long)]
    pub display: bool,

    /// Media is hosted on the managed platform.
    #[arg(long)]
    pub managed: bool,

    /// The site is private.
    #[arg(long)]
    pub private: bool,

    /// The self-hosted site uses HTTP basic auth.
    #[arg(long)]
    pub basic_auth: bool,

    /// Directory decoded images are written to.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct ResolveVideoArgs {
    /// Remote video identifier on the managed platform.
    #[arg(long)]
    pub video_id: Option<String>,

    /// Fallback URL used when no identifier is known.
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CredentialsCommand {
    /// Store HTTP basic auth credentials for a self-hosted host.
    SetBasic {
        /// Host the credentials apply to.
        #[arg(long)]
        host: String,

        /// Basic auth username.
        #[arg(long)]
        username: String,

        /// Basic auth password; read from stdin when absent.
        #[arg(long, env = "MEDIA_FETCH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Store the managed-platform access token.
    SetToken {
        /// Access token; read from stdin when absent.
        #[arg(long, env = "MEDIA_FETCH_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Remove the access token and basic auth credentials.
    Clear {
        /// Hosts whose basic auth credentials are removed.
        #[arg(long = "host", value_name = "HOST")]
        hosts: Vec<String>,
    },
}
