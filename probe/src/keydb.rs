//! Cache connectivity: the string get/set contract, a KeyDB/Redis backend,
//! and an in-process backend for tests and benches.
//!
//! Connections are acquired per pass through [`CacheConnector::connect`] and
//! released when the returned store is dropped.

use crate::error::Result;
use redis::{Commands, pipe};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Number of keys to batch in a single Redis pipeline round-trip.
pub const PIPELINE_BATCH_SIZE: usize = 4096;

/// String-keyed, string-valued store. Writing an existing key replaces it.
pub trait CacheStore {
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Returns `None` for a key that was never written.
    fn get(&mut self, key: &str) -> Result<Option<String>>;

    /// Writes every entry. No atomicity across entries.
    fn set_batch(&mut self, entries: &[(String, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// Hands out a cache connection scoped to one unit of work.
pub trait CacheConnector {
    type Store: CacheStore;

    fn connect(&self) -> Result<Self::Store>;
}

// ---------------------------------------------------------------------------
//  KeyDB / Redis
// ---------------------------------------------------------------------------

pub struct KeyDbConnector {
    client: redis::Client,
}

impl KeyDbConnector {
    /// Parses the URL; does not touch the network.
    pub fn open(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    /// Round-trips a PING on a short-lived connection.
    pub fn ping(&self) -> Result<()> {
        let mut con = self.client.get_connection()?;
        let _: String = redis::cmd("PING").query(&mut con)?;
        Ok(())
    }
}

impl CacheConnector for KeyDbConnector {
    type Store = KeyDbConnection;

    fn connect(&self) -> Result<KeyDbConnection> {
        let con = self.client.get_connection()?;
        Ok(KeyDbConnection { con })
    }
}

pub struct KeyDbConnection {
    con: redis::Connection,
}

impl CacheStore for KeyDbConnection {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.con.set::<_, _, ()>(key, value)?;
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self.con.get(key)?;
        Ok(value)
    }

    fn set_batch(&mut self, entries: &[(String, String)]) -> Result<()> {
        for batch in entries.chunks(PIPELINE_BATCH_SIZE) {
            let mut pipeline = pipe();
            for (key, value) in batch {
                pipeline.cmd("SET").arg(key).arg(value).ignore();
            }
            pipeline.query::<()>(&mut self.con)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
//  In-process
// ---------------------------------------------------------------------------

/// Cache kept in process memory. Clones share the same entries, so every
/// connection handed out by [`CacheConnector::connect`] sees the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Sorted copy of every entry.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl CacheConnector for MemoryCache {
    type Store = MemoryCache;

    fn connect(&self) -> Result<MemoryCache> {
        Ok(self.clone())
    }
}

impl CacheStore for MemoryCache {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }
}
