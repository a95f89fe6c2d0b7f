//! Ordered, fire-and-forget persistence.
//!
//! The actor enqueues writes after it has mutated its in-memory state and
//! never waits for them. A single writer task applies them in enqueue order,
//! so a later write to a key always lands after an earlier one. Failures are
//! logged and dropped.

use std::sync::Arc;

use chat_core::KeyValueStore;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::codec::encode;

enum PersistOp {
    Set { key: String, value: Vec<u8> },
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer
#[derive(Clone)]
pub struct PersistQueue {
    tx: mpsc::UnboundedSender<PersistOp>,
}

impl PersistQueue {
    /// Spawn the writer task on the current runtime
    ///
    /// The task ends once every handle has been dropped and the queue drained.
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_writer(store, rx));
        (Self { tx }, handle)
    }

    /// Serialize `value` and store it under `key`
    pub fn save<T: Serialize + ?Sized>(&self, key: impl Into<String>, value: &T) {
        let key = key.into();
        match encode(&key, value) {
            Ok(value) => self.enqueue(PersistOp::Set { key, value }),
            Err(e) => warn!(key = %key, error = %e, "Failed to encode record, not persisted"),
        }
    }

    /// Wait until every operation enqueued before this call has been applied
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        self.enqueue(PersistOp::Flush(tx));
        let _ = rx.await;
    }

    fn enqueue(&self, op: PersistOp) {
        if self.tx.send(op).is_err() {
            warn!("Persistence writer stopped, dropping operation");
        }
    }
}

async fn run_writer(store: Arc<dyn KeyValueStore>, mut rx: mpsc::UnboundedReceiver<PersistOp>) {
    while let Some(op) = rx.recv().await {
        match op {
            PersistOp::Set { key, value } => {
                if let Err(e) = store.set(&key, value).await {
                    warn!(key = %key, error = %e, "Failed to persist record");
                }
            }
            PersistOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Persistence writer finished");
}
