//! Refresh coordinator for the active country index generation.
//!
//! A single `tokio::sync::RwLock` guards the dataset provider and the active
//! generation. Lookups take it shared for one call. Builds take it exclusive
//! for their whole duration, provider I/O included, so lookups wait while a
//! refresh downloads and parses. The initial build holds the lock from before
//! the storage is handed out until it finishes, so no lookup can observe an
//! unbuilt index.
//!
//! The active generation is also published to a small snapshot slot outside
//! the build lock, so status reporting keeps describing the serving
//! generation while a refresh holds the lock.

mod error;

use std::sync::{Arc, PoisonError, RwLock as SnapshotLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::datasource::CountryDataSource;
use crate::index::CountryRangeIndex;
use crate::models::Country;

pub use error::StorageError;

/// Lifecycle phase reported by [`CountryStorage::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoragePhase {
    /// No generation has been built yet (or the first build failed).
    Uninitialized,
    /// A build currently holds the exclusive lock.
    Building,
    /// A generation is active.
    Ready,
}

/// Point-in-time description of the storage.
#[derive(Debug, Clone, Serialize)]
pub struct StorageStatus {
    pub phase: StoragePhase,
    pub generation: u64,
    pub countries: usize,
    pub ranges: usize,
    pub built_at: Option<DateTime<Utc>>,
    pub next_update: Option<DateTime<Utc>>,
}

struct Generation {
    index: CountryRangeIndex,
    number: u64,
    built_at: DateTime<Utc>,
    next_update: Option<DateTime<Utc>>,
}

/// Last swapped-in generation, readable without the build lock.
type Published = Arc<SnapshotLock<Option<Arc<Generation>>>>;

struct StorageState<S> {
    source: S,
    active: Option<Arc<Generation>>,
    published: Published,
    generations_built: u64,
}

/// Shared handle to the active country index and its dataset provider.
pub struct CountryStorage<S> {
    state: Arc<RwLock<StorageState<S>>>,
    published: Published,
}

impl<S> Clone for CountryStorage<S> {
    fn clone(&self) -> Self {
        CountryStorage {
            state: Arc::clone(&self.state),
            published: Arc::clone(&self.published),
        }
    }
}

impl<S> CountryStorage<S>
where
    S: CountryDataSource + Send + Sync + 'static,
{
    /// Creates the storage and starts its first build in the background.
    ///
    /// The exclusive lock is taken before this returns, so every lookup made
    /// through the returned handle waits for the first build. The build task's
    /// result is returned to the caller, which decides whether a failed first
    /// build is fatal.
    pub async fn initialize(source: S) -> (Self, JoinHandle<Result<(), StorageError>>) {
        let published: Published = Arc::new(SnapshotLock::new(None));
        let state = Arc::new(RwLock::new(StorageState {
            source,
            active: None,
            published: Arc::clone(&published),
            generations_built: 0,
        }));
        let mut guard = Arc::clone(&state).write_owned().await;

        let handle = tokio::spawn(async move {
            let result = build(&mut guard).await;
            if let Err(e) = &result {
                log::error!("unable to initialize storage: {:#}", e);
            }
            result
        });

        (CountryStorage { state, published }, handle)
    }

    /// Runs one full build cycle and swaps in the new generation.
    ///
    /// Lookups block until this returns. On error the active generation is
    /// left untouched.
    pub async fn refresh(&self) -> Result<(), StorageError> {
        let mut guard = self.state.write().await;
        build(&mut guard).await
    }

    /// Looks up the country owning `ip` in the active generation.
    pub async fn find_country(&self, ip: u32) -> Option<Country> {
        let state = self.state.read().await;
        state.active.as_ref()?.index.find_country(ip).cloned()
    }

    /// Recommended time of the next refresh, if the provider publishes updates.
    pub async fn next_update(&self) -> Option<DateTime<Utc>> {
        let state = self.state.read().await;
        state.active.as_ref()?.next_update
    }

    /// Describes the storage without waiting for a running build.
    ///
    /// While a build holds the lock the phase is `Building` and the figures
    /// are those of the generation still serving lookups, if any.
    pub fn status(&self) -> StorageStatus {
        let building = self.state.try_read().is_err();
        let generation = self
            .published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let phase = match (building, &generation) {
            (true, _) => StoragePhase::Building,
            (false, Some(_)) => StoragePhase::Ready,
            (false, None) => StoragePhase::Uninitialized,
        };

        match generation {
            Some(generation) => StorageStatus {
                phase,
                generation: generation.number,
                countries: generation.index.countries_len(),
                ranges: generation.index.ranges_len(),
                built_at: Some(generation.built_at),
                next_update: generation.next_update,
            },
            None => StorageStatus {
                phase,
                generation: 0,
                countries: 0,
                ranges: 0,
                built_at: None,
                next_update: None,
            },
        }
    }
}

/// Loads the dataset, builds a generation and makes it active.
///
/// `cleanup` runs on every path out of this function after `load` was called.
async fn build<S: CountryDataSource>(state: &mut StorageState<S>) -> Result<(), StorageError> {
    info!("rebuilding the storage...");
    let started = Instant::now();

    let result = load_generation(state, started).await;
    if let Err(e) = state.source.cleanup() {
        warn!("failed to clean up dataset source: {:#}", e);
    }

    let generation = result?;
    info!(
        "extracted & rebuilt generation {} ({} ranges), took {:.3} sec",
        generation.number,
        generation.index.ranges_len(),
        started.elapsed().as_secs_f64()
    );
    let generation = Arc::new(generation);
    state.active = Some(Arc::clone(&generation));
    *state
        .published
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(generation);
    Ok(())
}

async fn load_generation<S: CountryDataSource>(
    state: &mut StorageState<S>,
    started: Instant,
) -> Result<Generation, StorageError> {
    debug!("extracting the data...");
    state.source.load().await.map_err(StorageError::Load)?;
    debug!("done, took {:.3} sec", started.elapsed().as_secs_f64());

    let build_started = Instant::now();
    let index = CountryRangeIndex::build(state.source.countries(), state.source.ipv4_blocks());
    debug!(
        "built the tree, took {:.3} sec",
        build_started.elapsed().as_secs_f64()
    );

    let next_update = state
        .source
        .supports_updates()
        .then(|| state.source.next_update_time());
    state.generations_built += 1;
    Ok(Generation {
        index,
        number: state.generations_built,
        built_at: Utc::now(),
        next_update,
    })
}
