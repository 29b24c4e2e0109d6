use log::debug;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Reported to joined callers when a fetch task ends without a result.
pub const FETCH_ABORTED: &str = "fetch ended without a result";

type Outcome<V> = Option<Result<V, String>>;
type Registry<K, V> = Arc<Mutex<HashMap<K, watch::Receiver<Outcome<V>>>>>;

/// Identifies one remote operation for deduplication
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchKey {
    ByTitle { title: String, category: String },
    Page {
        category: String,
        query: String,
        cursor: u32,
    },
    TopRecipes,
    Categories,
}

/// Registry of in-flight fetches.
///
/// The first caller for a key spawns the fetch; callers arriving while it
/// runs wait on the same result. The fetch runs on its own task, so it
/// completes even when every caller has gone away.
pub struct SingleFlight<K, V> {
    in_flight: Registry<K, V>,
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        SingleFlight {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of keys currently being fetched
    pub fn in_flight(&self) -> usize {
        lock(&self.in_flight).len()
    }

    /// Run `fetch` for `key`, or join the fetch already running for it.
    pub async fn run<F>(&self, key: K, fetch: F) -> Result<V, String>
    where
        F: Future<Output = Result<V, String>> + Send + 'static,
    {
        let mut rx = {
            let mut in_flight = lock(&self.in_flight);
            let running = in_flight.get(&key).cloned();

            match running {
                Some(rx) => {
                    debug!("Joining in-flight fetch for {:?}", key);
                    rx
                }
                None => {
                    let (tx, rx) = watch::channel(None);
                    in_flight.insert(key.clone(), rx.clone());

                    let deregister = Deregister {
                        registry: Arc::clone(&self.in_flight),
                        key,
                    };
                    tokio::spawn(async move {
                        // Locals drop in reverse, so on unwind the key goes first
                        let tx = tx;
                        let deregister = deregister;
                        let outcome = fetch.await;
                        drop(deregister);
                        // No receivers left means the result is discarded
                        let _ = tx.send(Some(outcome));
                    });
                    rx
                }
            }
        };

        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone(),
            Err(_) => None,
        };
        outcome.unwrap_or_else(|| Err(FETCH_ABORTED.to_string()))
    }
}

impl<K, V> Default for SingleFlight<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Removes a key from the registry when its fetch task ends, including when
/// the fetch panics. Dropped before the sender, so a joiner never finds a
/// key whose result can no longer arrive.
struct Deregister<K: Eq + Hash, V> {
    registry: Registry<K, V>,
    key: K,
}

impl<K: Eq + Hash, V> Drop for Deregister<K, V> {
    fn drop(&mut self) {
        lock(&self.registry).remove(&self.key);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
