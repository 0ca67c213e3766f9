//! Callback delivery port definition.

/// Unit of work run on the delivery context.
pub type DeliveryJob = Box<dyn FnOnce() + Send + 'static>;

/// A single serialized execution context for terminal callbacks.
///
/// Jobs run one at a time, in dispatch order, never concurrently with
/// each other.
pub trait DeliveryContext: Send + Sync {
    /// Queues `job` to run on the context.
    fn dispatch(&self, job: DeliveryJob);
}
