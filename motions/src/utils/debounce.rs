//! Keyed debouncing for bursts of document change events.
//!
//! Saving a file usually produces several file system notifications in a
//! row, and an editor can emit a change per keystroke. The [`Debouncer`]
//! holds the latest value per key and emits it once the key has been quiet
//! for the configured interval, so a document is recounted once per burst
//! with its final content.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::time::Duration;
//! use tokio::sync::mpsc;
//! use list_motions::utils::debounce::Debouncer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (output_tx, mut output_rx) = mpsc::channel(16);
//!     let debouncer = Debouncer::new(Duration::from_millis(100), output_tx);
//!
//!     let path = PathBuf::from("/notes/todo.md");
//!     debouncer.send(path.clone(), "- [ ] a".to_string()).await.unwrap();
//!     debouncer.send(path.clone(), "- [x] a".to_string()).await.unwrap();
//!
//!     let (key, content) = output_rx.recv().await.unwrap();
//!     assert_eq!(key, path);
//!     assert_eq!(content, "- [x] a");
//! }
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Input queue capacity of the background task.
const INPUT_CAPACITY: usize = 1024;

/// Error type for debouncer operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DebouncerError {
    /// The background task has stopped.
    #[error("debouncer channel closed")]
    ChannelClosed,
}

/// Coalesces values per key, emitting the last one after a quiet interval.
#[derive(Debug)]
pub struct Debouncer<K, V> {
    input_tx: mpsc::Sender<(K, V)>,
    task: JoinHandle<()>,
}

impl<K, V> Debouncer<K, V>
where
    K: Clone + Eq + Hash + Send + Debug + 'static,
    V: Send + 'static,
{
    /// Spawns the debounce task. Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(interval: Duration, output_tx: mpsc::Sender<(K, V)>) -> Self {
        let (input_tx, input_rx) = mpsc::channel(INPUT_CAPACITY);
        let task = tokio::spawn(run_debounce_loop(interval, input_rx, output_tx));
        Self { input_tx, task }
    }

    /// Queues `value` for `key`, replacing any pending value and
    /// restarting the key's timer.
    ///
    /// # Errors
    ///
    /// Returns [`DebouncerError::ChannelClosed`] if the task has stopped.
    pub async fn send(&self, key: K, value: V) -> Result<(), DebouncerError> {
        self.input_tx
            .send((key, value))
            .await
            .map_err(|_| DebouncerError::ChannelClosed)
    }

    /// Stops accepting input, flushes pending values and waits for the task.
    pub async fn shutdown(self) {
        drop(self.input_tx);
        if let Err(e) = self.task.await {
            warn!(error = %e, "Debounce task ended abnormally");
        }
    }
}

struct Pending<V> {
    value: V,
    deadline: Instant,
}

async fn run_debounce_loop<K, V>(
    interval: Duration,
    mut input_rx: mpsc::Receiver<(K, V)>,
    output_tx: mpsc::Sender<(K, V)>,
) where
    K: Clone + Eq + Hash + Debug,
{
    let mut pending: HashMap<K, Pending<V>> = HashMap::new();

    debug!(interval_ms = interval.as_millis(), "Starting debounce loop");

    loop {
        let next_deadline = pending.values().map(|p| p.deadline).min();

        tokio::select! {
            event = input_rx.recv() => match event {
                Some((key, value)) => {
                    trace!(key = ?key, "Debouncing event");
                    let deadline = Instant::now() + interval;
                    pending.insert(key, Pending { value, deadline });
                }
                None => {
                    debug!(pending = pending.len(), "Input closed, flushing");
                    for (key, p) in pending.drain() {
                        emit(&output_tx, key, p.value).await;
                    }
                    break;
                }
            },

            () = sleep_until_next(next_deadline) => {
                let now = Instant::now();
                let expired: Vec<K> = pending
                    .iter()
                    .filter(|(_, p)| p.deadline <= now)
                    .map(|(k, _)| k.clone())
                    .collect();
                for key in expired {
                    if let Some(p) = pending.remove(&key) {
                        emit(&output_tx, key, p.value).await;
                    }
                }
            }
        }
    }

    debug!("Debounce loop terminated");
}

async fn sleep_until_next(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn emit<K: Debug, V>(output_tx: &mpsc::Sender<(K, V)>, key: K, value: V) {
    trace!(key = ?key, "Emitting debounced event");
    if output_tx.send((key, value)).await.is_err() {
        warn!("Debounce output channel closed");
    }
}
