//! Background execution of backend calls.
//!
//! The UI loop never awaits. It hands requests to the [`Worker`], which spawns
//! them on the tokio runtime and posts an [`Outcome`] back over a channel that
//! the loop drains once per tick.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use super::list::Mutation;
use crate::api::UsersApi;
use crate::error::ApiError;
use crate::model::Record;

/// Completion of a background request.
#[derive(Debug)]
pub enum Outcome {
    Listed {
        generation: u64,
        result: Result<Vec<Record>, ApiError>,
    },
    Written {
        mutation: Mutation,
        /// Form session that issued the write, if any.
        origin: Option<u64>,
        result: Result<(), ApiError>,
    },
}

pub struct Worker {
    api: Arc<dyn UsersApi>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<Outcome>,
    rx: mpsc::UnboundedReceiver<Outcome>,
}

impl Worker {
    pub fn new(api: Arc<dyn UsersApi>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            runtime,
            tx,
            rx,
        }
    }

    /// Fetch the collection for reload `generation`.
    pub fn fetch(&self, generation: u64) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = api.list().await.map(|payload| payload.into_records());
            let _ = tx.send(Outcome::Listed { generation, result });
        });
    }

    /// Send a create, update or delete. `origin` is echoed back in the outcome.
    pub fn write(&self, mutation: Mutation, origin: Option<u64>) {
        debug!(?mutation, ?origin, "worker: write queued");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = mutation.send(api.as_ref()).await;
            let _ = tx.send(Outcome::Written {
                mutation,
                origin,
                result,
            });
        });
    }

    /// Completed requests, oldest first. Never blocks.
    pub fn drain(&mut self) -> Vec<Outcome> {
        let mut done = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            done.push(outcome);
        }
        done
    }

    /// Wait for the next completion. Used by tests that drive the worker.
    pub async fn next(&mut self) -> Option<Outcome> {
        self.rx.recv().await
    }
}
