//! Cancellable media fetch task.
//!
//! A task moves `Pending -> Running -> Finished`. `Finished` is entered
//! exactly once, by whichever of network completion, authentication
//! failure or cancellation gets there first; the winner alone may touch the
//! callbacks. Terminal callbacks always run on the delivery context.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};
use url::Url;

use crate::domain::entities::{FetchId, FetchedMedia, HostingContext};
use crate::domain::errors::MediaError;
use crate::domain::ports::{DeliveryContext, DeliveryJob, MediaTransport, RequestAuthenticator};

/// Callback invoked with the fetched media.
pub type SuccessCallback = Box<dyn FnOnce(FetchedMedia) + Send + 'static>;

/// Callback invoked with the fetch error.
pub type FailureCallback = Box<dyn FnOnce(MediaError) + Send + 'static>;

/// Lifecycle state of a fetch task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TaskState {
    /// Created, network operation not yet issued.
    Pending = 0,
    /// Authenticated request dispatched.
    Running = 1,
    /// Terminal.
    Finished = 2,
}

impl TaskState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Pending,
            1 => Self::Running,
            _ => Self::Finished,
        }
    }
}

/// Collaborators shared by every task.
#[derive(Clone)]
pub struct FetchDependencies {
    /// Builds authenticated requests.
    pub authenticator: Arc<dyn RequestAuthenticator>,
    /// Performs the transfer.
    pub transport: Arc<dyn MediaTransport>,
    /// Serialized context for terminal callbacks.
    pub delivery: Arc<dyn DeliveryContext>,
    /// Runtime tasks are spawned on; the caller's runtime when `None`.
    pub runtime: Option<Handle>,
}

impl FetchDependencies {
    /// Runtime to spawn on, if one is configured or the caller is inside one.
    pub(crate) fn runtime_handle(&self) -> Option<Handle> {
        self.runtime.clone().or_else(|| Handle::try_current().ok())
    }
}

struct Callbacks {
    on_success: SuccessCallback,
    on_failure: FailureCallback,
}

impl Callbacks {
    fn into_job(self, outcome: Result<FetchedMedia, MediaError>) -> DeliveryJob {
        Box::new(move || match outcome {
            Ok(media) => (self.on_success)(media),
            Err(e) => (self.on_failure)(e),
        })
    }
}

/// One authenticated, cancellable fetch.
pub struct FetchTask {
    id: FetchId,
    url: Url,
    hosting: HostingContext,
    state: AtomicU8,
    started: AtomicBool,
    cancel_token: CancellationToken,
    callbacks: Mutex<Option<Callbacks>>,
    deps: FetchDependencies,
}

impl FetchTask {
    /// Creates a pending task for an already resolved URL.
    #[must_use]
    pub fn new(
        url: Url,
        hosting: HostingContext,
        deps: FetchDependencies,
        on_success: SuccessCallback,
        on_failure: FailureCallback,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: FetchId::from_url(&url),
            url,
            hosting,
            state: AtomicU8::new(TaskState::Pending as u8),
            started: AtomicBool::new(false),
            cancel_token: CancellationToken::new(),
            callbacks: Mutex::new(Some(Callbacks {
                on_success,
                on_failure,
            })),
            deps,
        })
    }

    /// Returns the task id.
    #[must_use]
    pub const fn id(&self) -> &FetchId {
        &self.id
    }

    /// Returns the URL being fetched.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Returns true once the task reached its terminal state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state() == TaskState::Finished
    }

    /// Spawns the fetch on the tokio runtime. Later calls are ignored.
    ///
    /// Without a reachable runtime the task fails through the delivery
    /// context instead of panicking.
    pub fn start(self: &Arc<Self>) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.is_finished() {
            trace!(id = %self.id, "Task finished before start");
            return;
        }

        let Some(runtime) = self.deps.runtime_handle() else {
            warn!(id = %self.id, "No tokio runtime available for media fetch");
            self.complete(Err(MediaError::transfer("no async runtime available")));
            return;
        };

        let task = Arc::clone(self);
        runtime.spawn(async move {
            task.run().await;
        });
    }

    /// Aborts the in-flight work and finishes the task without delivering
    /// any callback. Safe to call repeatedly or after completion.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
        if self.finish() {
            drop(self.callbacks.lock().take());
            debug!(id = %self.id, url = %self.url, "Fetch cancelled");
        }
    }

    async fn run(self: Arc<Self>) {
        let outcome = tokio::select! {
            biased;
            () = self.cancel_token.cancelled() => None,
            outcome = self.perform() => outcome,
        };

        match outcome {
            Some(outcome) => self.complete(outcome),
            None => trace!(id = %self.id, "Fetch stopped by cancellation"),
        }
    }

    /// Authenticates, transfers and decodes. `None` if cancelled between
    /// authentication and dispatch.
    async fn perform(&self) -> Option<Result<FetchedMedia, MediaError>> {
        let request = match self
            .deps
            .authenticator
            .authenticate(&self.url, &self.hosting)
            .await
        {
            Ok(request) => request,
            Err(e) => return Some(Err(e)),
        };

        if !self.begin_running() {
            return None;
        }
        debug!(id = %self.id, url = %self.url, "Dispatching media request");

        let response = match self.deps.transport.fetch(request).await {
            Ok(response) => response,
            Err(e) => return Some(Err(e)),
        };

        let Some(body) = response.body.filter(|body| !body.is_empty()) else {
            return Some(Err(MediaError::unknown_transfer()));
        };

        Some(
            decode(body)
                .await
                .map(|(image, byte_len)| FetchedMedia {
                    url: self.url.clone(),
                    image: Arc::new(image),
                    byte_len,
                    content_type: response.content_type,
                }),
        )
    }

    /// Delivers `outcome` if this is the first terminal signal; later
    /// signals are dropped.
    pub(crate) fn complete(&self, outcome: Result<FetchedMedia, MediaError>) {
        if !self.finish() {
            trace!(id = %self.id, "Dropping completion for finished task");
            return;
        }
        let Some(callbacks) = self.callbacks.lock().take() else {
            return;
        };

        match &outcome {
            Ok(media) => debug!(
                id = %self.id,
                width = media.width(),
                height = media.height(),
                bytes = media.byte_len,
                "Media downloaded"
            ),
            Err(e) => error!(
                id = %self.id,
                url = %self.url,
                error = %e,
                "Unable to download media for attachment"
            ),
        }

        self.deps.delivery.dispatch(callbacks.into_job(outcome));
    }

    fn begin_running(&self) -> bool {
        self.state
            .compare_exchange(
                TaskState::Pending as u8,
                TaskState::Running as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    /// Moves to `Finished`. Returns true only for the caller that did it.
    fn finish(&self) -> bool {
        self.state.swap(TaskState::Finished as u8, Ordering::SeqCst) != TaskState::Finished as u8
    }
}

impl fmt::Debug for FetchTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchTask")
            .field("id", &self.id)
            .field("url", &self.url.as_str())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

async fn decode(body: Bytes) -> Result<(image::DynamicImage, usize), MediaError> {
    let byte_len = body.len();
    tokio::task::spawn_blocking(move || image::load_from_memory(&body))
        .await
        .map_err(|e| MediaError::decode(format!("decode task panicked: {e}")))?
        .map(|image| (image, byte_len))
        .map_err(|e| MediaError::decode(e.to_string()))
}

/// Caller-side handle to a running fetch. Only allows cancellation.
#[derive(Clone)]
pub struct FetchHandle {
    task: Arc<FetchTask>,
}

impl FetchHandle {
    pub(crate) const fn new(task: Arc<FetchTask>) -> Self {
        Self { task }
    }

    /// Cancels the fetch. No callback fires afterwards.
    pub fn cancel(&self) {
        self.task.cancel();
    }

    #[cfg(test)]
    pub(crate) fn task(&self) -> &Arc<FetchTask> {
        &self.task
    }
}

impl fmt::Debug for FetchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchHandle")
            .field("id", self.task.id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::TransferResponse;
    use crate::domain::ports::mocks::{MockAuthenticator, MockTransport, png_bytes};
    use crate::infrastructure::dispatch::{DeliveryQueue, SerialDispatcher};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio_test::assert_ok;

    #[derive(Default)]
    struct Counters {
        success: AtomicUsize,
        failure: AtomicUsize,
        last_error: Mutex<Option<MediaError>>,
    }

    impl Counters {
        fn total(&self) -> usize {
            self.success.load(Ordering::SeqCst) + self.failure.load(Ordering::SeqCst)
        }
    }

    fn build_task(
        authenticator: Arc<MockAuthenticator>,
        transport: Arc<MockTransport>,
    ) -> (Arc<FetchTask>, Arc<Counters>, DeliveryQueue) {
        let (dispatcher, queue) = SerialDispatcher::new();
        let counters = Arc::new(Counters::default());
        let on_success = {
            let counters = counters.clone();
            Box::new(move |_media: FetchedMedia| {
                counters.success.fetch_add(1, Ordering::SeqCst);
            })
        };
        let on_failure = {
            let counters = counters.clone();
            Box::new(move |e: MediaError| {
                counters.failure.fetch_add(1, Ordering::SeqCst);
                *counters.last_error.lock() = Some(e);
            })
        };
        let deps = FetchDependencies {
            authenticator,
            transport,
            delivery: Arc::new(dispatcher),
            runtime: None,
        };
        let task = FetchTask::new(
            Url::parse("https://example.com/photo.jpg").unwrap(),
            HostingContext::public(),
            deps,
            on_success,
            on_failure,
        );
        (task, counters, queue)
    }

    async fn settle(queue: &mut DeliveryQueue) -> usize {
        let mut ran = 0;
        for _ in 0..40 {
            tokio::time::sleep(Duration::from_millis(5)).await;
            ran += queue.run_pending();
        }
        ran
    }

    #[tokio::test]
    async fn test_success_delivers_once() {
        let transport = Arc::new(MockTransport::with_png(4, 3));
        let (task, counters, mut queue) =
            build_task(Arc::new(MockAuthenticator::new(true)), transport);

        task.start();
        let job = assert_ok!(
            tokio::time::timeout(Duration::from_secs(5), queue.next_job()).await
        );
        job.expect("delivery job")();

        assert_eq!(counters.success.load(Ordering::SeqCst), 1);
        assert_eq!(counters.failure.load(Ordering::SeqCst), 0);
        assert!(task.is_finished());
    }

    #[tokio::test]
    async fn test_authentication_failure_reported() {
        let transport = Arc::new(MockTransport::with_png(1, 1));
        let (task, counters, mut queue) =
            build_task(Arc::new(MockAuthenticator::new(false)), transport.clone());

        task.start();
        settle(&mut queue).await;

        assert_eq!(counters.failure.load(Ordering::SeqCst), 1);
        assert_eq!(transport.started(), 0);
        assert!(matches!(
            counters.last_error.lock().as_ref(),
            Some(MediaError::Authentication { .. })
        ));
    }

    #[tokio::test]
    async fn test_transport_error_passed_through() {
        let transport = Arc::new(MockTransport::responding(Err(MediaError::http_status(
            403,
            Some("Forbidden"),
        ))));
        let (task, counters, mut queue) =
            build_task(Arc::new(MockAuthenticator::new(true)), transport);

        task.start();
        settle(&mut queue).await;

        assert_eq!(counters.failure.load(Ordering::SeqCst), 1);
        assert_eq!(counters.last_error.lock().as_ref().and_then(MediaError::status), Some(403));
    }

    #[tokio::test]
    async fn test_empty_payload_is_unknown_transfer_failure() {
        let transport = Arc::new(MockTransport::responding(Ok(TransferResponse::empty())));
        let (task, counters, mut queue) =
            build_task(Arc::new(MockAuthenticator::new(true)), transport);

        task.start();
        settle(&mut queue).await;

        assert_eq!(
            counters.last_error.lock().clone(),
            Some(MediaError::unknown_transfer())
        );
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_decode_error() {
        let transport = Arc::new(MockTransport::responding(Ok(TransferResponse::with_body(
            "<html>not an image</html>",
        ))));
        let (task, counters, mut queue) =
            build_task(Arc::new(MockAuthenticator::new(true)), transport);

        task.start();
        settle(&mut queue).await;

        assert!(matches!(
            counters.last_error.lock().as_ref(),
            Some(MediaError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_cancel_immediately_is_silent() {
        let (transport, gate) =
            MockTransport::gated(Ok(TransferResponse::with_body(png_bytes(2, 2))));
        let transport = Arc::new(transport);
        let (task, counters, mut queue) =
            build_task(Arc::new(MockAuthenticator::new(true)), transport.clone());

        task.start();
        task.cancel();
        gate.notify_one();

        assert_eq!(settle(&mut queue).await, 0);
        assert!(task.is_finished());
        assert_eq!(counters.total(), 0);
        assert_eq!(transport.finished(), 0);
    }

    #[tokio::test]
    async fn test_cancel_while_running_aborts_transfer() {
        let (transport, gate) =
            MockTransport::gated(Ok(TransferResponse::with_body(png_bytes(2, 2))));
        let transport = Arc::new(transport);
        let (task, counters, mut queue) =
            build_task(Arc::new(MockAuthenticator::new(true)), transport.clone());

        task.start();
        for _ in 0..100 {
            if transport.started() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(task.state(), TaskState::Running);

        task.cancel();
        gate.notify_one();
        settle(&mut queue).await;

        assert_eq!(counters.total(), 0);
        assert_eq!(transport.finished(), 0);
    }

    #[tokio::test]
    async fn test_cancel_before_start_never_fetches() {
        let transport = Arc::new(MockTransport::with_png(1, 1));
        let authenticator = Arc::new(MockAuthenticator::new(true));
        let (task, counters, mut queue) = build_task(authenticator.clone(), transport.clone());

        task.cancel();
        task.start();
        settle(&mut queue).await;

        assert_eq!(authenticator.calls(), 0);
        assert_eq!(transport.started(), 0);
        assert_eq!(counters.total(), 0);
    }

    #[tokio::test]
    async fn test_repeated_signals_deliver_at_most_once() {
        let transport = Arc::new(MockTransport::with_png(1, 1));
        let (task, counters, mut queue) =
            build_task(Arc::new(MockAuthenticator::new(true)), transport);

        task.complete(Err(MediaError::transfer("first")));
        task.complete(Err(MediaError::transfer("second")));
        task.cancel();
        task.cancel();
        queue.run_pending();

        assert_eq!(counters.total(), 1);
        assert_eq!(
            counters.last_error.lock().clone(),
            Some(MediaError::transfer("first"))
        );
    }

    #[tokio::test]
    async fn test_late_completion_after_cancel_dropped() {
        let transport = Arc::new(MockTransport::with_png(1, 1));
        let (task, counters, mut queue) =
            build_task(Arc::new(MockAuthenticator::new(true)), transport);

        task.cancel();
        task.complete(Err(MediaError::unknown_transfer()));
        queue.run_pending();

        assert_eq!(counters.total(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_signals_race_to_single_delivery() {
        for _ in 0..50 {
            let transport = Arc::new(MockTransport::with_png(1, 1));
            let (task, counters, mut queue) =
                build_task(Arc::new(MockAuthenticator::new(true)), transport);

            let mut joins = Vec::new();
            for i in 0..8 {
                let task = task.clone();
                joins.push(tokio::spawn(async move {
                    if i % 3 == 0 {
                        task.cancel();
                    } else {
                        task.complete(Err(MediaError::transfer(format!("signal {i}"))));
                    }
                }));
            }
            for join in joins {
                join.await.unwrap();
            }
            queue.run_pending();

            assert!(counters.total() <= 1);
            assert!(task.is_finished());
        }
    }

    #[tokio::test]
    async fn test_start_twice_fetches_once() {
        let transport = Arc::new(MockTransport::with_png(1, 1));
        let (task, counters, mut queue) =
            build_task(Arc::new(MockAuthenticator::new(true)), transport.clone());

        task.start();
        task.start();
        settle(&mut queue).await;

        assert_eq!(transport.started(), 1);
        assert_eq!(counters.success.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_start_outside_runtime_uses_configured_handle() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let transport = Arc::new(MockTransport::with_png(3, 2));
        let (mut task, counters, mut queue) =
            build_task(Arc::new(MockAuthenticator::new(true)), transport);
        Arc::get_mut(&mut task).unwrap().deps.runtime = Some(runtime.handle().clone());

        let starter = Arc::clone(&task);
        std::thread::spawn(move || starter.start()).join().unwrap();

        let job = runtime
            .block_on(async { tokio::time::timeout(Duration::from_secs(5), queue.next_job()).await })
            .unwrap();
        job.expect("delivery job")();

        assert_eq!(counters.success.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_start_without_any_runtime_fails_instead_of_panicking() {
        let transport = Arc::new(MockTransport::with_png(1, 1));
        let (task, counters, mut queue) =
            build_task(Arc::new(MockAuthenticator::new(true)), transport.clone());

        std::thread::spawn(move || task.start()).join().unwrap();
        queue.run_pending();

        assert_eq!(counters.failure.load(Ordering::SeqCst), 1);
        assert_eq!(transport.started(), 0);
    }
}
