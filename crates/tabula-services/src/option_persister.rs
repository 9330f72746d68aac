//! Coalescing persistence of column display options
//!
//! Option edits show up in [`OptionPersister::current`] immediately. Writes
//! to the store are held until a column has been quiet for the configured
//! period, then the latest value is persisted in a single call. Leaving the
//! table flushes without waiting for the quiet period.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tabula_core::FieldOptions;
use tabula_settings::OptionSettings;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use crate::{ColumnKey, ColumnOptionsStore, ServiceError, ServiceResult};

/// Quiet period used when settings don't provide one
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

enum Command {
    Submit {
        key: ColumnKey,
        options: FieldOptions,
        at: Instant,
    },
    Flush(oneshot::Sender<()>),
}

struct Pending {
    options: FieldOptions,
    deadline: Instant,
}

/// Debounced writer for column options, one background task per instance
pub struct OptionPersister {
    tx: mpsc::UnboundedSender<Command>,
    cache: Arc<RwLock<HashMap<ColumnKey, FieldOptions>>>,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for OptionPersister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionPersister")
            .field("cached", &self.cache.read().len())
            .finish_non_exhaustive()
    }
}

impl OptionPersister {
    /// Spawn the persister on the current Tokio runtime
    pub fn spawn(store: Arc<dyn ColumnOptionsStore>, quiet_period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, quiet_period, rx));
        tracing::debug!(quiet_ms = quiet_period.as_millis() as u64, "option persister started");
        Self {
            tx,
            cache: Arc::new(RwLock::new(HashMap::new())),
            task,
        }
    }

    /// Spawn with the configured quiet period
    pub fn from_settings(store: Arc<dyn ColumnOptionsStore>, settings: &OptionSettings) -> Self {
        Self::spawn(store, settings.quiet_period())
    }

    /// Record new options for a column and (re)start its quiet period
    pub fn submit(&self, key: ColumnKey, options: FieldOptions) -> ServiceResult<()> {
        self.cache.write().insert(key.clone(), options.clone());
        self.tx
            .send(Command::Submit {
                key,
                options,
                at: Instant::now(),
            })
            .map_err(|_| ServiceError::PersisterClosed)
    }

    /// Latest submitted options for a column, persisted or not
    pub fn current(&self, key: &ColumnKey) -> Option<FieldOptions> {
        self.cache.read().get(key).cloned()
    }

    /// Persist everything pending now and wait for it
    pub async fn flush(&self) -> ServiceResult<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(done_tx))
            .map_err(|_| ServiceError::PersisterClosed)?;
        done_rx.await.map_err(|_| ServiceError::PersisterClosed)
    }

    /// Ask for everything pending to be persisted now, without waiting
    pub fn request_flush(&self) -> ServiceResult<()> {
        let (done_tx, _) = oneshot::channel();
        self.tx
            .send(Command::Flush(done_tx))
            .map_err(|_| ServiceError::PersisterClosed)
    }

    /// Persist everything pending and stop the background task
    pub async fn shutdown(self) -> ServiceResult<()> {
        let Self { tx, task, .. } = self;
        drop(tx);
        task.await
            .map_err(|err| ServiceError::Collaborator(format!("option persister task: {err}")))
    }
}

async fn run(
    store: Arc<dyn ColumnOptionsStore>,
    quiet_period: Duration,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    let mut pending: IndexMap<ColumnKey, Pending> = IndexMap::new();

    loop {
        let next_deadline = pending.values().map(|p| p.deadline).min();

        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Submit { key, options, at }) => {
                    // Re-inserting keeps the column's original queue position
                    pending.insert(key, Pending { options, deadline: at + quiet_period });
                }
                Some(Command::Flush(done)) => {
                    persist_all(store.as_ref(), &mut pending).await;
                    let _ = done.send(());
                }
                None => {
                    persist_all(store.as_ref(), &mut pending).await;
                    break;
                }
            },
            _ = sleep_until(next_deadline.unwrap_or_else(Instant::now)), if next_deadline.is_some() => {
                let now = Instant::now();
                let due: Vec<ColumnKey> = pending
                    .iter()
                    .filter(|(_, p)| p.deadline <= now)
                    .map(|(key, _)| key.clone())
                    .collect();
                for key in due {
                    if let Some(entry) = pending.shift_remove(&key) {
                        persist(store.as_ref(), &key, &entry.options).await;
                    }
                }
            }
        }
    }

    tracing::debug!("option persister stopped");
}

async fn persist_all(store: &dyn ColumnOptionsStore, pending: &mut IndexMap<ColumnKey, Pending>) {
    for (key, entry) in pending.drain(..) {
        persist(store, &key, &entry.options).await;
    }
}

async fn persist(store: &dyn ColumnOptionsStore, key: &ColumnKey, options: &FieldOptions) {
    match store.persist_options(key, options).await {
        Ok(()) => tracing::debug!(
            data_source = %key.data_source_id,
            table = %key.table_name,
            column = %key.column,
            "persisted column options"
        ),
        Err(err) => tracing::warn!(
            data_source = %key.data_source_id,
            table = %key.table_name,
            column = %key.column,
            error = %err,
            "failed to persist column options"
        ),
    }
}
