//! # Social-Mesh Runtime
//!
//! Wires the User, Social and Activity modules onto one query bus and one
//! event bus, then runs the background handlers.
//!
//! ## Modular Structure
//!
//! - `container/` - configuration and the wired module instances
//! - `handlers/` - notification fan-out and the registry janitor
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, `SM_CONFIG_FILE`, `SM_*` variables)
//! 2. Build modules and register their query responders
//! 3. Subscribe the notification handler to domain events
//! 4. Start the query bus (response routers)
//! 5. Spawn notification and janitor tasks
//!
//! ## Shutdown Sequence
//!
//! 1. Signal background tasks
//! 2. Stop responders
//! 3. Shut the query bus down: every waiter still blocked falls back
//! 4. Flush final stats to the metrics registry

pub mod container;
pub mod error;
pub mod handlers;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shared_bus::EventFilter;
use social_telemetry::record_query_stats;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub use container::{load_config, ModuleContainer, NotificationConfig, RuntimeConfig};
pub use error::RuntimeError;
pub use handlers::{Notification, NotificationCenter, SweepReport};

/// How long shutdown waits for background tasks to notice the signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// The runtime orchestrating all modules.
pub struct SocialRuntime {
    container: Arc<ModuleContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    started: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SocialRuntime {
    /// Build the runtime. Must be called from within a Tokio runtime.
    pub fn new(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        info!("Creating Social-Mesh runtime");
        let container = Arc::new(ModuleContainer::new(config)?);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            container,
            shutdown_tx,
            shutdown_rx,
            started: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Start the bus and the background handlers.
    pub fn start(&self) -> Result<(), RuntimeError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(RuntimeError::AlreadyStarted);
        }

        // Subscribe before anything can publish.
        let subscription = self.container.events.subscribe(EventFilter::all());
        self.container.queries.start();

        let notifications = Arc::clone(&self.container.notifications);
        let mut notify_shutdown = self.shutdown_rx.clone();
        let notify_task = tokio::spawn(async move {
            tokio::select! {
                _ = handlers::run_notifications(notifications, subscription) => {}
                _ = notify_shutdown.changed() => {
                    info!("[notifications] Shutdown signal received");
                }
            }
        });

        let queries = Arc::clone(&self.container.queries);
        let activities = Arc::clone(&self.container.activities);
        let interval = self.container.config.bus.sweep_interval();
        let mut janitor_shutdown = self.shutdown_rx.clone();
        let janitor_task = tokio::spawn(async move {
            tokio::select! {
                _ = handlers::cleanup_task(queries, activities, interval) => {}
                _ = janitor_shutdown.changed() => {
                    info!("[janitor] Shutdown signal received");
                }
            }
        });

        self.tasks.lock().extend([notify_task, janitor_task]);
        info!(
            served = ?self.container.served_kinds(),
            sweep_interval_ms = interval.as_millis() as u64,
            "Social-Mesh runtime started"
        );
        Ok(())
    }

    /// Shut down gracefully. Returns how many queries were still pending.
    pub async fn shutdown(&self) -> usize {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        self.container.stop_responders();
        let abandoned = self.container.queries.shutdown();
        if abandoned > 0 {
            warn!(abandoned = abandoned, "Queries abandoned at shutdown");
        }

        let tasks: Vec<_> = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            if tokio::time::timeout(SHUTDOWN_GRACE, task).await.is_err() {
                warn!("Background task did not stop in time");
            }
        }

        for snapshot in self.container.queries.stats_snapshots() {
            record_query_stats(&snapshot);
        }
        info!("Shutdown complete");
        abandoned
    }

    /// The wired modules.
    pub fn container(&self) -> Arc<ModuleContainer> {
        Arc::clone(&self.container)
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}
