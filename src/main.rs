use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use futures_util::future::join_all;
use image::ImageFormat;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;
use zeroize::Zeroizing;

use media_fetch::application::MediaFetcher;
use media_fetch::domain::entities::{
    AccessToken, BasicAuthCredentials, FetchId, FetchedMedia, HostingContext, MediaLocator,
    TargetSize,
};
use media_fetch::domain::errors::MediaError;
use media_fetch::domain::ports::CredentialStore;
use media_fetch::infrastructure::config::{
    Command, CredentialsCommand, FetchArgs, ResolveVideoArgs,
};
use media_fetch::infrastructure::{
    AppConfig, CdnSizing, CliArgs, CredentialAuthenticator, HttpMediaTransport,
    KeyringCredentialStore, RestVideoLookup, SerialDispatcher, StorageManager,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn build_fetcher(config: &AppConfig, store: &Arc<dyn CredentialStore>) -> Result<MediaFetcher> {
    let sizing = Arc::new(CdnSizing::new(config.sizing.cdn_host.clone()));
    let authenticator = Arc::new(CredentialAuthenticator::new(Arc::clone(store)));
    let transport = Arc::new(HttpMediaTransport::new(&config.http)?);
    let lookup =
        Arc::new(RestVideoLookup::new(&config.api, &config.http)?.with_credentials(Arc::clone(store)));

    Ok(
        MediaFetcher::new(sizing, authenticator, transport, Arc::new(SerialDispatcher::spawn()))
            .with_runtime(tokio::runtime::Handle::current())
            .with_display(config.display_metrics())
            .with_video_lookup(lookup),
    )
}

async fn run_fetch(fetcher: &MediaFetcher, args: FetchArgs) -> Result<()> {
    tokio::fs::create_dir_all(&args.output).await?;

    let display = fetcher.display();
    let size = if args.display {
        display.max_target_size()
    } else {
        TargetSize::new(args.width, args.height)
    };
    let scale = args.scale.unwrap_or(display.scale);
    let hosting = HostingContext {
        is_file_local: false,
        is_hosted_on_managed_platform: args.managed,
        is_private: args.private,
        has_basic_auth_credentials: args.basic_auth,
    };

    let mut handles = Vec::with_capacity(args.urls.len());
    let mut pending = Vec::with_capacity(args.urls.len());

    for url in args.urls {
        let (tx, mut rx) = mpsc::unbounded_channel::<Result<FetchedMedia, MediaError>>();
        let failure_tx = tx.clone();
        let hosting = HostingContext {
            is_file_local: url.scheme() == "file",
            ..hosting
        };

        handles.push(fetcher.fetch(
            &url,
            size,
            scale,
            hosting,
            move |media| {
                let _ = tx.send(Ok(media));
            },
            move |err| {
                let _ = failure_tx.send(Err(err));
            },
        ));

        pending.push(async move { (url, rx.recv().await) });
    }

    let outcomes = join_all(pending).await;
    let total = outcomes.len();
    let mut failed = 0usize;

    for (url, outcome) in outcomes {
        match outcome {
            Some(Ok(media)) => match save_png(&media, &args.output).await {
                Ok(path) => println!(
                    "{url} -> {} ({}x{}, {} bytes)",
                    path.display(),
                    media.width(),
                    media.height(),
                    media.byte_len
                ),
                Err(e) => {
                    failed += 1;
                    error!(url = %url, error = %e, "Failed to save image");
                    println!("{url} failed: {e}");
                }
            },
            Some(Err(e)) => {
                failed += 1;
                println!("{url} failed: {e}");
            }
            None => {
                failed += 1;
                warn!(url = %url, "Fetch ended without a result");
                println!("{url} cancelled");
            }
        }
    }

    drop(handles);

    if failed > 0 {
        return Err(eyre!("{failed} of {total} downloads failed"));
    }
    Ok(())
}

async fn save_png(media: &FetchedMedia, output: &Path) -> Result<PathBuf> {
    let path = output.join(format!("{}.png", FetchId::from_url(&media.url)));
    let image = Arc::clone(&media.image);
    let target = path.clone();

    tokio::task::spawn_blocking(move || image.save_with_format(&target, ImageFormat::Png))
        .await??;

    Ok(path)
}

async fn run_resolve_video(fetcher: &MediaFetcher, args: ResolveVideoArgs) -> Result<()> {
    let locator = MediaLocator {
        remote_video_id: args.video_id,
        fallback_remote_url: args.url,
        upload_id: None,
    };

    let source = fetcher.resolve_video_source(&locator).await?;

    println!("video:  {}", source.video_url);
    match source.poster_url {
        Some(poster) => println!("poster: {poster}"),
        None => println!("poster: none"),
    }
    Ok(())
}

fn read_secret(prompt: &str) -> Result<Zeroizing<String>> {
    eprint!("{prompt}: ");
    let mut line = Zeroizing::new(String::new());
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_string()))
}

async fn run_credentials(store: &dyn CredentialStore, action: CredentialsCommand) -> Result<()> {
    match action {
        CredentialsCommand::SetBasic {
            host,
            username,
            password,
        } => {
            let password = match password {
                Some(password) => Zeroizing::new(password),
                None => read_secret("Password")?,
            };
            let host = Url::parse(&format!("https://{host}"))
                .ok()
                .and_then(|url| url.host_str().map(str::to_string))
                .ok_or_else(|| eyre!("invalid host: {host}"))?;
            let credentials = BasicAuthCredentials::new(username, password.as_str())
                .ok_or_else(|| eyre!("username must be non-empty and must not contain ':'"))?;

            store.store_basic_auth(&host, &credentials).await?;
            println!("Stored basic auth credentials for {host}");
        }
        CredentialsCommand::SetToken { token } => {
            let token = match token {
                Some(token) => Zeroizing::new(token),
                None => read_secret("Access token")?,
            };
            let token = AccessToken::new(token.as_str())
                .ok_or_else(|| eyre!("access token must not be blank"))?;

            store.store_access_token(&token).await?;
            println!("Stored access token {}", token.masked());
        }
        CredentialsCommand::Clear { hosts } => {
            store.clear(&hosts).await?;
            println!("Cleared stored credentials");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(&args);

    init_logging(&config)?;
    info!(version = media_fetch::VERSION, "Starting media-fetch");

    let store: Arc<dyn CredentialStore> = Arc::new(KeyringCredentialStore::new());

    match args.command {
        Command::Fetch(fetch) => run_fetch(&build_fetcher(&config, &store)?, fetch).await,
        Command::ResolveVideo(resolve) => {
            run_resolve_video(&build_fetcher(&config, &store)?, resolve).await
        }
        Command::Credentials { action } => run_credentials(store.as_ref(), action).await,
    }
}
