//! Lazily initialized, process-wide resource handle.
//!
//! A [`LazyResourceHandle`] owns the recipe for an expensive resource (a
//! [`ResourceLoader`]) and builds the resource the first time somebody
//! needs it, either through an explicit [`warmup`](LazyResourceHandle::warmup)
//! or on first use. Initialization is single-flight: concurrent first
//! callers wait on the one attempt in progress instead of racing to load
//! their own copy, and all of them receive its outcome, success or
//! failure. A failed attempt leaves the handle uninitialized so the next
//! caller to arrive afterwards starts over.
//!
//! The handle is shared through an `Arc` and injected into whatever needs
//! it; there is no global instance.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{HandleError, InitializationError, OperationError};
use crate::observability::metrics;

// ============================================================================
// Loader Seam
// ============================================================================

/// Static description of a resource. Never changes over the handle's life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    /// Identifier of the resource (e.g. a model name).
    pub model_name: String,
    /// Kind of resource (e.g. `"Lexicon"`).
    pub model_type: String,
    /// Human-readable size of the resource.
    pub parameters: String,
    /// License the resource is distributed under.
    pub license: String,
}

/// Builds the resource guarded by a [`LazyResourceHandle`].
#[async_trait]
pub trait ResourceLoader: Send + Sync + 'static {
    /// The loaded resource. Shared read-only between callers.
    type Resource: Send + Sync + 'static;

    /// Static metadata about the resource this loader produces.
    fn descriptor(&self) -> &ResourceDescriptor;

    /// Constructs the resource.
    ///
    /// # Errors
    ///
    /// Returns an [`InitializationError`] naming the cause when the
    /// resource cannot be built.
    async fn load(&self) -> Result<Self::Resource, InitializationError>;
}

// ============================================================================
// Handle
// ============================================================================

/// Observable lifecycle state of a [`LazyResourceHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleState {
    /// Nothing loaded yet, or the last attempt failed.
    Uninitialized,
    /// A load attempt is in progress.
    Initializing,
    /// Resource is loaded. Permanent.
    Ready,
}

impl fmt::Display for HandleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("uninitialized"),
            Self::Initializing => f.write_str("initializing"),
            Self::Ready => f.write_str("ready"),
        }
    }
}

/// Static metadata plus current readiness, as reported by
/// [`LazyResourceHandle::describe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceInfo {
    /// Static descriptor fields.
    #[serde(flatten)]
    pub descriptor: ResourceDescriptor,
    /// Whether the resource has been loaded.
    pub loaded: bool,
}

/// Process-wide handle to a lazily loaded resource.
pub struct LazyResourceHandle<L: ResourceLoader> {
    loader: L,
    resource: OnceLock<Arc<L::Resource>>,
    /// Held for the duration of a load attempt. Holds the error of the
    /// most recent failed attempt.
    attempt: Mutex<Option<InitializationError>>,
    /// Number of failed attempts so far.
    failures: AtomicU64,
    initializing: AtomicBool,
    load_timeout: Option<Duration>,
}

impl<L: ResourceLoader> LazyResourceHandle<L> {
    /// Creates an uninitialized handle. Nothing is loaded until first use.
    #[must_use]
    pub const fn new(loader: L) -> Self {
        Self {
            loader,
            resource: OnceLock::new(),
            attempt: Mutex::const_new(None),
            failures: AtomicU64::new(0),
            initializing: AtomicBool::new(false),
            load_timeout: None,
        }
    }

    /// Bounds each initialization attempt. An attempt that runs longer
    /// fails with [`InitializationError::Timeout`].
    #[must_use]
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = Some(timeout);
        self
    }

    /// Returns the loaded resource, loading it first if necessary.
    ///
    /// Once a load has succeeded every call returns the same instance
    /// without touching the loader again. Callers that arrive while an
    /// attempt is in progress wait for it and share its outcome.
    ///
    /// # Errors
    ///
    /// Returns the loader's [`InitializationError`]. The handle stays
    /// uninitialized and the next call made after the failure retries.
    pub async fn acquire(&self) -> Result<Arc<L::Resource>, InitializationError> {
        if let Some(resource) = self.resource.get() {
            return Ok(Arc::clone(resource));
        }

        let failures_seen = self.failures.load(Ordering::Acquire);
        let mut last_error = self.attempt.lock().await;

        if let Some(resource) = self.resource.get() {
            return Ok(Arc::clone(resource));
        }
        // An attempt failed while we waited for the lock: that was our attempt too.
        if self.failures.load(Ordering::Acquire) != failures_seen
            && let Some(e) = last_error.as_ref()
        {
            return Err(e.clone());
        }

        match self.initialize().await {
            Ok(resource) => {
                *last_error = None;
                Ok(Arc::clone(self.resource.get_or_init(|| resource)))
            }
            Err(e) => {
                *last_error = Some(e.clone());
                self.failures.fetch_add(1, Ordering::AcqRel);
                Err(e)
            }
        }
    }

    /// Loads the resource ahead of the first request.
    ///
    /// Failure is logged and otherwise ignored; the resource will be loaded
    /// again on first use. Returns whether the handle is ready afterwards.
    pub async fn warmup(&self) -> bool {
        match self.acquire().await {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    resource = %self.name(),
                    error = %e,
                    "warmup failed, resource will load on first use"
                );
                false
            }
        }
    }

    /// Whether the resource is loaded. Never triggers a load.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.resource.get().is_some()
    }

    /// Current lifecycle state. Never triggers a load.
    #[must_use]
    pub fn state(&self) -> HandleState {
        if self.is_ready() {
            HandleState::Ready
        } else if self.initializing.load(Ordering::Acquire) {
            HandleState::Initializing
        } else {
            HandleState::Uninitialized
        }
    }

    /// Static metadata about the resource, independent of readiness.
    #[must_use]
    pub fn describe(&self) -> ResourceInfo {
        ResourceInfo {
            descriptor: self.loader.descriptor().clone(),
            loaded: self.is_ready(),
        }
    }

    /// Resource identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.loader.descriptor().model_name
    }

    /// Runs `op` against the resource, loading it first if necessary.
    ///
    /// `op` runs on the blocking thread pool so long operations do not
    /// stall the async workers. `summary` describes the triggering input
    /// and is attached to any [`OperationError`].
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::Initialization`] when the resource cannot be
    /// loaded and [`HandleError::Operation`] when `op` fails or panics.
    pub async fn use_resource<T, E, F>(&self, summary: &str, op: F) -> Result<T, HandleError>
    where
        F: FnOnce(&L::Resource) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let resource = self.acquire().await?;
        let operation_error = |cause: String| {
            HandleError::Operation(OperationError {
                input: summary.to_string(),
                cause,
            })
        };

        tokio::task::spawn_blocking(move || op(&resource))
            .await
            .map_err(|e| operation_error(format!("operation aborted: {e}")))?
            .map_err(|e| operation_error(e.to_string()))
    }

    /// One load attempt. Only ever runs with the attempt lock held.
    async fn initialize(&self) -> Result<Arc<L::Resource>, InitializationError> {
        let _flag = InitializingFlag::raise(&self.initializing);
        let name = self.name();
        info!(resource = %name, "loading resource");
        let started = Instant::now();

        let outcome = match self.load_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.loader.load())
                .await
                .unwrap_or_else(|_| {
                    Err(InitializationError::Timeout {
                        resource: name.to_string(),
                        timeout,
                    })
                }),
            None => self.loader.load().await,
        };

        let elapsed = started.elapsed();
        metrics::record_model_load(outcome.is_ok(), elapsed);

        match outcome {
            Ok(resource) => {
                info!(
                    resource = %name,
                    elapsed_ms = elapsed.as_millis(),
                    "resource loaded"
                );
                Ok(Arc::new(resource))
            }
            Err(e) => {
                warn!(resource = %name, error = %e, "resource failed to load");
                Err(e)
            }
        }
    }
}

impl<L: ResourceLoader> fmt::Debug for LazyResourceHandle<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyResourceHandle")
            .field("resource", &self.name())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// RAII guard that marks a load attempt as in progress.
///
/// Clears the flag on every exit path, including a cancelled caller
/// dropping the attempt mid-await.
struct InitializingFlag<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InitializingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self { flag }
    }
}

impl Drop for InitializingFlag<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        debug!("load attempt finished");
    }
}

// ============================================================================
// Tests
// ============================================================================
