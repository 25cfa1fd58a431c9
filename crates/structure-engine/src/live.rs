//! Live queries
//!
//! A `LiveQuery` re-runs a read whenever one of the tables it watches is
//! written, and publishes the latest result as a `LoadState`. It is cold:
//! the first `subscribe()` starts a driver task, and the driver stops once
//! nobody has been subscribed for the idle timeout. It keeps refreshing
//! during that grace period. The last value stays available and is replayed
//! to the next subscriber, which restarts the driver.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::stream::{self, Stream};
use rusqlite::Connection;
use structure_core::errors::ExError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::database::{Database, Table, TableVersions};

/// Progress of an asynchronous load
#[derive(Debug, Clone)]
pub enum LoadState<T> {
    Loading,
    Success(T),
    Failed(ExError),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            LoadState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ExError> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LoadState<U> {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Success(value) => LoadState::Success(f(value)),
            LoadState::Failed(err) => LoadState::Failed(err),
        }
    }

    /// Like `map`, for mappings that can fail
    pub fn and_then<U, F>(self, f: F) -> LoadState<U>
    where
        F: FnOnce(T) -> Result<U, ExError>,
    {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Success(value) => match f(value) {
                Ok(mapped) => LoadState::Success(mapped),
                Err(err) => LoadState::Failed(err),
            },
            LoadState::Failed(err) => LoadState::Failed(err),
        }
    }
}

impl<T> From<Result<T, ExError>> for LoadState<T> {
    fn from(result: Result<T, ExError>) -> Self {
        match result {
            Ok(value) => LoadState::Success(value),
            Err(err) => LoadState::Failed(err),
        }
    }
}

type QueryFn<T> = dyn Fn(&Connection) -> Result<T, ExError> + Send + Sync;

struct LiveInner<T> {
    name: &'static str,
    db: Database,
    tables: Vec<Table>,
    query: Arc<QueryFn<T>>,
    idle_timeout: Duration,
    state: watch::Sender<LoadState<T>>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

/// Reactive, shareable query over the store
pub struct LiveQuery<T> {
    inner: Arc<LiveInner<T>>,
}

impl<T> Clone for LiveQuery<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> LiveQuery<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F>(
        name: &'static str,
        db: Database,
        tables: &[Table],
        idle_timeout: Duration,
        query: F,
    ) -> Self
    where
        F: Fn(&Connection) -> Result<T, ExError> + Send + Sync + 'static,
    {
        let (state, _) = watch::channel(LoadState::Loading);
        Self {
            inner: Arc::new(LiveInner {
                name,
                db,
                tables: tables.to_vec(),
                query: Arc::new(query),
                idle_timeout,
                state,
                driver: Mutex::new(None),
            }),
        }
    }

    /// Start observing; starts the driver if it is not running
    ///
    /// Must be called within a tokio runtime.
    pub fn subscribe(&self) -> Subscription<T> {
        let mut driver = self
            .inner
            .driver
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let rx = self.inner.state.subscribe();

        if driver.as_ref().map_or(true, JoinHandle::is_finished) {
            tracing::debug!(query = self.inner.name, "starting live query driver");
            *driver = Some(tokio::spawn(drive(self.inner.clone())));
        }

        Subscription { rx }
    }

    /// True while a driver task is running
    pub fn is_active(&self) -> bool {
        self.inner
            .driver
            .lock()
            .map(|d| d.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Latest published value without subscribing
    pub fn latest(&self) -> LoadState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }
}

async fn drive<T>(inner: Arc<LiveInner<T>>)
where
    T: Clone + Send + Sync + 'static,
{
    let mut versions = inner.db.subscribe_versions();
    let mut seen = versions.borrow_and_update().project(&inner.tables);
    refresh(&inner).await;

    loop {
        tokio::select! {
            changed = versions.changed() => {
                if changed.is_err() {
                    break;
                }
                catch_up(&inner, &mut versions, &mut seen).await;
            }
            _ = inner.state.closed() => {
                if idle(&inner, &mut versions, &mut seen).await {
                    break;
                }
            }
        }
    }

    tracing::debug!(query = inner.name, "live query driver stopped");
}

/// Grace period with no subscribers; returns true when the driver should stop
///
/// Writes keep refreshing the value meanwhile so that a subscriber returning
/// within the grace period sees fresh data.
async fn idle<T>(
    inner: &LiveInner<T>,
    versions: &mut watch::Receiver<TableVersions>,
    seen: &mut Vec<u64>,
) -> bool
where
    T: Clone + Send + Sync + 'static,
{
    let grace = tokio::time::sleep(inner.idle_timeout);
    tokio::pin!(grace);

    loop {
        tokio::select! {
            changed = versions.changed() => {
                if changed.is_err() {
                    return true;
                }
                catch_up(inner, versions, seen).await;
            }
            _ = &mut grace => {
                // Decided under the driver lock so that a concurrent
                // subscribe() either keeps this driver or starts a new one
                let mut driver = inner
                    .driver
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                if inner.state.receiver_count() == 0 {
                    *driver = None;
                    return true;
                }
                return false;
            }
        }
    }
}

async fn catch_up<T>(
    inner: &LiveInner<T>,
    versions: &mut watch::Receiver<TableVersions>,
    seen: &mut Vec<u64>,
) where
    T: Clone + Send + Sync + 'static,
{
    let current = versions.borrow_and_update().project(&inner.tables);
    if current != *seen {
        *seen = current;
        refresh(inner).await;
    }
}

async fn refresh<T>(inner: &LiveInner<T>)
where
    T: Clone + Send + Sync + 'static,
{
    let query = inner.query.clone();
    let result = inner.db.read(move |conn| query(conn)).await;
    if let Err(err) = &result {
        tracing::warn!(query = inner.name, err_code = err.code(), error = %err, "live query failed");
    }
    inner.state.send_replace(LoadState::from(result));
}

/// One observer of a live query
///
/// Dropping it unsubscribes.
pub struct Subscription<T> {
    rx: watch::Receiver<LoadState<T>>,
}

impl<T> Subscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Latest value, marking it seen
    pub fn current(&mut self) -> LoadState<T> {
        self.rx.borrow_and_update().clone()
    }

    /// Wait for the next published value
    ///
    /// Returns `None` once the query has been dropped for good.
    pub async fn changed(&mut self) -> Option<LoadState<T>> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }

    /// Wait until the value is no longer `Loading`
    pub async fn loaded(&mut self) -> LoadState<T> {
        let loaded = self
            .rx
            .wait_for(|state| !state.is_loading())
            .await
            .map(|state| state.clone());
        match loaded {
            Ok(state) => state,
            Err(_) => self.current(),
        }
    }

    /// Every value from now on: the current one first, then each change
    pub fn into_stream(self) -> impl Stream<Item = LoadState<T>> {
        stream::unfold((self.rx, true), |(mut rx, first)| async move {
            if !first {
                rx.changed().await.ok()?;
            }
            let state = rx.borrow_and_update().clone();
            Some((state, (rx, false)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use structure_store::SqliteRepo;

    fn routine_names(db: &Database, idle: Duration) -> LiveQuery<Vec<String>> {
        LiveQuery::new("routine_names", db.clone(), &[Table::Routine], idle, |conn| {
            Ok(SqliteRepo::load_all_routines(conn)?
                .into_iter()
                .map(|r| r.name)
                .collect())
        })
    }

    #[tokio::test]
    async fn test_loading_then_success() {
        let db = Database::open(&EngineConfig::in_memory()).await.unwrap();
        let query = routine_names(&db, Duration::from_millis(50));

        assert!(query.latest().is_loading());
        let mut sub = query.subscribe();
        let state = sub.loaded().await;
        assert_eq!(state.success(), Some(&Vec::new()));
    }

    #[tokio::test]
    async fn test_unrelated_table_write_does_not_refresh() {
        let db = Database::open(&EngineConfig::in_memory()).await.unwrap();
        let query = routine_names(&db, Duration::from_secs(5));
        let mut sub = query.subscribe();
        sub.loaded().await;

        db.write(&[Table::MovementUserData], |_| Ok(())).await.unwrap();
        let waited = tokio::time::timeout(Duration::from_millis(100), sub.changed()).await;
        assert!(waited.is_err());
    }

    #[test]
    fn test_load_state_and_then() {
        let state: LoadState<u32> = LoadState::Success(2);
        let failed = state.and_then(|_| -> Result<u32, ExError> {
            Err(ExError::new(structure_core::ExErrorKind::NotFound))
        });
        assert!(failed.error().is_some());
        assert!(LoadState::<u32>::Loading.map(|v| v + 1).is_loading());
    }
}
