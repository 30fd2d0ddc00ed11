//! Owns every running encounter.
//!
//! Each encounter gets its own worker task and command channel. Encounters
//! share only the read-only [`GameContent`] and the character store.
//!
//! Settled encounters are reaped from the registry on the next call that
//! lists or starts encounters. Their workers keep serving handles that are
//! still held and stop when the last one is dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use shards_core::RngOracle;

use crate::api::{EncounterHandle, EncounterId, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::content::GameContent;
use crate::repository::CharacterStore;
use crate::rng::SeededRng;
use crate::session::{CombatSession, EncounterSpec};
use crate::workers::EncounterWorker;

struct Entry {
    handle: EncounterHandle,
    worker: JoinHandle<()>,
}

pub struct EncounterRegistry {
    content: Arc<GameContent>,
    store: Arc<dyn CharacterStore>,
    config: RuntimeConfig,
    next_id: AtomicU64,
    encounters: Mutex<HashMap<EncounterId, Entry>>,
    finished_tx: mpsc::UnboundedSender<EncounterId>,
    finished_rx: Mutex<mpsc::UnboundedReceiver<EncounterId>>,
    shutdown_tx: watch::Sender<bool>,
}

impl EncounterRegistry {
    pub fn new(content: Arc<GameContent>, store: Arc<dyn CharacterStore>) -> Self {
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            content,
            store,
            config: RuntimeConfig::default(),
            next_id: AtomicU64::new(1),
            encounters: Mutex::new(HashMap::new()),
            finished_tx,
            finished_rx: Mutex::new(finished_rx),
            shutdown_tx,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn content(&self) -> &Arc<GameContent> {
        &self.content
    }

    pub fn store(&self) -> &Arc<dyn CharacterStore> {
        &self.store
    }

    /// Starts an encounter seeded with `seed`, or from entropy when `None`.
    pub async fn start(&self, spec: EncounterSpec, seed: Option<u64>) -> Result<EncounterHandle> {
        let rng = seed.map_or_else(SeededRng::from_entropy, SeededRng::new);
        info!(player = %spec.player_id, seed = rng.seed(), "seeding encounter");
        self.start_with_rng(spec, Box::new(rng)).await
    }

    /// Starts an encounter that rolls with a caller-supplied RNG.
    pub async fn start_with_rng(
        &self,
        spec: EncounterSpec,
        rng: Box<dyn RngOracle>,
    ) -> Result<EncounterHandle> {
        self.reap_finished().await;
        let session =
            CombatSession::start(spec, Arc::clone(&self.content), Arc::clone(&self.store), rng)?;

        let id = EncounterId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let handle = EncounterHandle::new(id, command_tx);
        let worker = EncounterWorker::new(
            id,
            session,
            command_rx,
            self.finished_tx.clone(),
            self.shutdown_tx.subscribe(),
        );
        let worker = tokio::spawn(worker.run());

        self.encounters.lock().await.insert(
            id,
            Entry {
                handle: handle.clone(),
                worker,
            },
        );

        info!(encounter = %id, "encounter registered");
        Ok(handle)
    }

    pub async fn get(&self, id: EncounterId) -> Result<EncounterHandle> {
        self.encounters
            .lock()
            .await
            .get(&id)
            .map(|entry| entry.handle.clone())
            .ok_or(RuntimeError::EncounterNotFound(id))
    }

    /// Removes every settled encounter and returns how many went.
    pub async fn reap_finished(&self) -> usize {
        let mut finished = self.finished_rx.lock().await;
        let mut encounters = self.encounters.lock().await;

        let mut reaped = 0;
        while let Ok(id) = finished.try_recv() {
            if encounters.remove(&id).is_some() {
                debug!(encounter = %id, "settled encounter reaped");
                reaped += 1;
            }
        }
        reaped
    }

    /// Unsettled encounter ids, sorted.
    pub async fn ids(&self) -> Vec<EncounterId> {
        self.reap_finished().await;
        let mut ids: Vec<EncounterId> = self.encounters.lock().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub async fn len(&self) -> usize {
        self.reap_finished().await;
        self.encounters.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reap_finished().await;
        self.encounters.lock().await.is_empty()
    }

    /// Drops an encounter between rounds. Nothing is written for an
    /// unfinished fight.
    pub async fn abandon(&self, id: EncounterId) -> Result<()> {
        let entry = self
            .encounters
            .lock()
            .await
            .remove(&id)
            .ok_or(RuntimeError::EncounterNotFound(id))?;

        entry.worker.abort();
        info!(encounter = %id, "encounter abandoned");
        Ok(())
    }

    /// Stops every worker, reaped ones included, and waits for the
    /// registered ones to exit.
    ///
    /// Workers finish the command in hand first, so no round is cut short.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown_tx.send_replace(true);
        let entries: Vec<Entry> = self.encounters.lock().await.drain().map(|(_, e)| e).collect();

        for entry in entries {
            match entry.worker.await {
                Ok(()) => {}
                Err(err) if err.is_cancelled() => {}
                Err(err) => return Err(RuntimeError::WorkerJoin(err)),
            }
        }
        Ok(())
    }
}
