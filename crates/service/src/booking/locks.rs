use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

type Key = (Uuid, NaiveDate);

/// In-process async mutexes keyed by `(stylist_id, date)`.
#[derive(Default)]
pub struct BookingLocks {
    inner: DashMap<Key, Arc<Mutex<()>>>,
}

impl BookingLocks {
    pub fn new() -> Self { Self::default() }

    pub async fn acquire(&self, stylist_id: Uuid, date: NaiveDate) -> BookingGuard<'_> {
        let key = (stylist_id, date);
        let lock = Arc::clone(self.inner.entry(key).or_default().value());
        let guard = lock.lock_owned().await;
        BookingGuard { locks: self, key, guard: Some(guard) }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize { self.inner.len() }

    pub fn is_empty(&self) -> bool { self.inner.is_empty() }
}

pub struct BookingGuard<'a> {
    locks: &'a BookingLocks,
    key: Key,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for BookingGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // only the map still references the mutex: nobody holds or waits on it
        self.locks.inner.remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
