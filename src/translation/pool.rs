/*!
 * Explicit pool of pre-constructed translation client handles.
 *
 * Clients are not assumed safe for simultaneous use by multiple workers, so
 * the pool hands out one handle per worker slot: a semaphore bounds the
 * number of outstanding handles to the pool size, and a checked-out client
 * returns to the pool when its guard drops.
 */

use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Fixed-size pool of client handles, one per worker slot
pub struct ClientPool<C> {
    /// Bounds outstanding checkouts to the number of clients
    slots: Semaphore,

    /// Idle clients; popped on checkout, pushed back on drop of the guard
    clients: Mutex<Vec<Arc<C>>>,

    /// Pool size, fixed at construction
    size: usize,
}

/// Guard for a checked-out client; returns it to the pool on drop
pub struct PooledClient<'a, C> {
    pool: &'a ClientPool<C>,
    client: Option<Arc<C>>,
    _permit: SemaphorePermit<'a>,
}

impl<C> ClientPool<C> {
    /// Create a pool from pre-constructed clients; pool size equals the
    /// number of clients.
    pub fn new(clients: Vec<C>) -> Self {
        let size = clients.len();
        Self {
            slots: Semaphore::new(size),
            clients: Mutex::new(clients.into_iter().map(Arc::new).collect()),
            size,
        }
    }

    /// Number of worker slots in the pool
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check out a client, waiting for a free slot if all are in use.
    pub async fn acquire(&self) -> PooledClient<'_, C> {
        // The semaphore is never closed, so acquire cannot fail
        let permit = self.slots.acquire().await.unwrap();
        let client = self
            .clients
            .lock()
            .pop()
            .expect("client pool invariant violated: permit held but no idle client");

        PooledClient {
            pool: self,
            client: Some(client),
            _permit: permit,
        }
    }
}

impl<C> Deref for PooledClient<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.client
            .as_ref()
            .expect("client taken before guard drop")
    }
}

impl<C> Drop for PooledClient<'_, C> {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            self.pool.clients.lock().push(client);
        }
    }
}
