//! The zero-argument producer the coordinator fans out over.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use foodtrend_core::Record;

use crate::error::SourceError;

/// Boxed future returned by one harvester invocation.
pub type HarvestFuture = Pin<Box<dyn Future<Output = Result<Vec<Record>, SourceError>> + Send>>;

/// A named source of records.
///
/// The producer is called once per collection cycle. It owns everything it
/// needs (clients, credentials) so the returned future is `'static` and can
/// run on its own task.
pub struct Harvester {
    name: String,
    produce: Arc<dyn Fn() -> HarvestFuture + Send + Sync>,
}

impl Harvester {
    pub fn new<F, Fut>(name: impl Into<String>, produce: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Record>, SourceError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            produce: Arc::new(move || -> HarvestFuture { Box::pin(produce()) }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The producer only runs once the returned future is first polled, so
    /// a producer that panics outright fails inside whichever task polls it.
    pub fn harvest(&self) -> HarvestFuture {
        let produce = Arc::clone(&self.produce);
        Box::pin(async move { produce().await })
    }
}

impl std::fmt::Debug for Harvester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harvester")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
