//! Public entry point for editor media fetching.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, error, warn};
use url::Url;

use super::services::{FetchDependencies, FetchHandle, FetchTask, UrlStrategy};
use super::use_cases::ResolveVideoSourceUseCase;
use crate::domain::entities::{
    DisplayMetrics, FetchRequest, FetchedMedia, HostingContext, MediaLocator, ResolvedUrl,
    TargetSize, VideoSource,
};
use crate::domain::errors::MediaError;
use crate::domain::ports::{
    DeliveryContext, MediaTransport, PosterFrameExtractor, RequestAuthenticator, SizingTransform,
    VideoLookupPort,
};

/// Fetches editor media with the right sizing and credentials.
pub struct MediaFetcher {
    strategy: UrlStrategy,
    deps: FetchDependencies,
    display: DisplayMetrics,
    video: Option<ResolveVideoSourceUseCase>,
    poster_extractor: Option<Arc<dyn PosterFrameExtractor>>,
}

impl MediaFetcher {
    /// Creates a fetcher from its collaborators.
    #[must_use]
    pub fn new(
        sizing: Arc<dyn SizingTransform>,
        authenticator: Arc<dyn RequestAuthenticator>,
        transport: Arc<dyn MediaTransport>,
        delivery: Arc<dyn DeliveryContext>,
    ) -> Self {
        Self {
            strategy: UrlStrategy::new(sizing),
            deps: FetchDependencies {
                authenticator,
                transport,
                delivery,
                runtime: None,
            },
            display: DisplayMetrics::default(),
            video: None,
            poster_extractor: None,
        }
    }

    /// Sets the display used by [`Self::fetch_for_display`].
    #[must_use]
    pub const fn with_display(mut self, display: DisplayMetrics) -> Self {
        self.display = display;
        self
    }

    /// Spawns fetches on `runtime`, so `fetch` can be called from threads
    /// outside it.
    #[must_use]
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.deps.runtime = Some(runtime);
        self
    }

    /// Enables managed-platform video lookups.
    #[must_use]
    pub fn with_video_lookup(mut self, lookup: Arc<dyn VideoLookupPort>) -> Self {
        self.video = Some(ResolveVideoSourceUseCase::new(lookup));
        self
    }

    /// Enables poster frame extraction.
    #[must_use]
    pub fn with_poster_extractor(mut self, extractor: Arc<dyn PosterFrameExtractor>) -> Self {
        self.poster_extractor = Some(extractor);
        self
    }

    /// Returns the configured display.
    #[must_use]
    pub const fn display(&self) -> DisplayMetrics {
        self.display
    }

    /// Computes the URL a request would fetch.
    #[must_use]
    pub fn resolve_url(&self, request: &FetchRequest) -> ResolvedUrl {
        self.strategy.resolve(request)
    }

    /// Starts fetching `source_url` and returns immediately.
    ///
    /// Exactly one of `on_success`/`on_failure` runs on the delivery
    /// context, unless the returned handle is cancelled first.
    pub fn fetch<S, F>(
        &self,
        source_url: &Url,
        size: TargetSize,
        scale: f64,
        hosting: HostingContext,
        on_success: S,
        on_failure: F,
    ) -> FetchHandle
    where
        S: FnOnce(FetchedMedia) + Send + 'static,
        F: FnOnce(MediaError) + Send + 'static,
    {
        let request = FetchRequest::new(source_url.clone(), size, scale, hosting);
        let resolved = self.strategy.resolve(&request);

        let task = FetchTask::new(
            resolved.into_url(),
            hosting,
            self.deps.clone(),
            Box::new(on_success),
            Box::new(on_failure),
        );
        debug!(id = %task.id(), source = %source_url, "Starting media fetch");
        task.start();

        FetchHandle::new(task)
    }

    /// Like [`Self::fetch`], sized for the largest dimension of the display.
    pub fn fetch_for_display<S, F>(
        &self,
        source_url: &Url,
        hosting: HostingContext,
        on_success: S,
        on_failure: F,
    ) -> FetchHandle
    where
        S: FnOnce(FetchedMedia) + Send + 'static,
        F: FnOnce(MediaError) + Send + 'static,
    {
        self.fetch(
            source_url,
            self.display.max_target_size(),
            self.display.scale,
            hosting,
            on_success,
            on_failure,
        )
    }

    /// Resolves where a video attachment can be played from.
    ///
    /// # Errors
    /// Returns [`MediaError::Resolution`] when no video URL can be found,
    /// including when a lookup is needed but none is configured.
    pub async fn resolve_video_source(
        &self,
        locator: &MediaLocator,
    ) -> Result<VideoSource, MediaError> {
        match &self.video {
            Some(use_case) => use_case.execute(locator).await,
            None if locator.remote_video_id.is_none() => {
                ResolveVideoSourceUseCase::new(Arc::new(NoLookup))
                    .execute(locator)
                    .await
            }
            None => Err(MediaError::resolution("video lookup is not configured")),
        }
    }

    /// Extracts a poster frame from a video and delivers it on the
    /// delivery context.
    pub fn fetch_poster_image<S, F>(&self, source_url: &Url, on_success: S, on_failure: F)
    where
        S: FnOnce(Arc<image::DynamicImage>) + Send + 'static,
        F: FnOnce(MediaError) + Send + 'static,
    {
        let delivery = Arc::clone(&self.deps.delivery);
        let Some(extractor) = self.poster_extractor.clone() else {
            delivery.dispatch(Box::new(move || {
                on_failure(MediaError::decode("poster extraction is not configured"));
            }));
            return;
        };

        let Some(runtime) = self.deps.runtime_handle() else {
            warn!(url = %source_url, "No tokio runtime available for poster extraction");
            delivery.dispatch(Box::new(move || {
                on_failure(MediaError::decode("no async runtime available"));
            }));
            return;
        };

        let source = source_url.clone();
        runtime.spawn(async move {
            let outcome = extractor.extract_poster(&source).await;
            if let Err(e) = &outcome {
                error!(url = %source, error = %e, "Unable to grab frame from video");
            }
            delivery.dispatch(Box::new(move || match outcome {
                Ok(image) => on_success(Arc::new(image)),
                Err(e) => on_failure(e),
            }));
        });
    }
}

impl std::fmt::Debug for MediaFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFetcher")
            .field("display", &self.display)
            .field("video_lookup", &self.video.is_some())
            .finish_non_exhaustive()
    }
}

/// Lookup used when only the fallback path can apply.
struct NoLookup;

#[async_trait::async_trait]
impl VideoLookupPort for NoLookup {
    async fn lookup_video_urls(
        &self,
        _video_id: &str,
    ) -> Result<crate::domain::entities::VideoUrls, MediaError> {
        Err(MediaError::resolution("video lookup is not configured"))
    }
}
