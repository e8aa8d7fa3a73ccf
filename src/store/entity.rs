use redb::ReadableTable;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

use crate::db::{tables, Db};
use crate::error::Result;
use crate::store::index;

/// Contract every stored entity kind implements
///
/// An entity is "a `T` plus a key-extraction function plus an initial
/// value"; the persistence mechanics below are written once against this
/// trait and instantiated per concrete type (User, Habit, EmailRef).
pub trait EntityKind: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Key namespace: records are stored under `<ENTITY_NAME>:<id>`
    const ENTITY_NAME: &'static str;
    /// Listing index that tracks all IDs of this kind
    const INDEX_NAME: &'static str;

    /// The ID this record is stored under
    fn key_of(&self) -> String;

    /// The state reads return when no record exists
    fn initial_state(id: &str) -> Self;
}

/// Typed, key-addressed persistence over one KV record per entity
///
/// All operations run the synchronous redb work on the blocking pool, one
/// transaction per call. `mutate` is read-modify-write without
/// compare-and-swap: concurrent mutations of the same key race and the
/// last writer wins.
pub struct Entity<T>(PhantomData<T>);

impl<T: EntityKind> Entity<T> {
    fn storage_key(id: &str) -> String {
        format!("{}:{}", T::ENTITY_NAME, id)
    }

    /// True iff a record is present under this entity's key
    pub async fn exists(db: &Db, id: &str) -> Result<bool> {
        let db = db.clone();
        let key = Self::storage_key(id);
        tokio::task::spawn_blocking(move || -> Result<bool> {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(tables::ENTITIES)?;
            Ok(table.get(key.as_str())?.is_some())
        })
        .await?
    }

    /// Read the stored state, or the kind's initial state when absent
    ///
    /// Absence is not an error here; callers that need "missing" as a
    /// distinct case check `exists` first.
    pub async fn get_state(db: &Db, id: &str) -> Result<T> {
        let db = db.clone();
        let id = id.to_string();
        let key = Self::storage_key(&id);
        tokio::task::spawn_blocking(move || -> Result<T> {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(tables::ENTITIES)?;
            match table.get(key.as_str())? {
                Some(bytes) => Ok(serde_json::from_slice(bytes.value())?),
                None => Ok(T::initial_state(&id)),
            }
        })
        .await?
    }

    /// Write a brand-new record and add its ID to the kind's listing index
    ///
    /// Both writes happen in one transaction, so an ID appears in the
    /// listing index exactly when its record exists. Key freshness is the
    /// caller's responsibility; uniqueness of natural keys is enforced by
    /// a separate uniqueness record, not here.
    pub async fn create(db: &Db, state: T) -> Result<()> {
        let db = db.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let id = state.key_of();
            let key = Self::storage_key(&id);
            let bytes = serde_json::to_vec(&state)?;

            let write_txn = db.begin_write()?;
            {
                let mut entities = write_txn.open_table(tables::ENTITIES)?;
                entities.insert(key.as_str(), bytes.as_slice())?;
                drop(entities);

                let mut indexes = write_txn.open_table(tables::INDEXES)?;
                index::add_id(&mut indexes, T::INDEX_NAME, id.as_str())?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await?
    }

    /// Write a record without touching any listing index
    ///
    /// Used for records that are looked up but never enumerated, such as
    /// the email uniqueness entry.
    pub async fn put(db: &Db, state: T) -> Result<()> {
        let db = db.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let key = Self::storage_key(&state.key_of());
            let bytes = serde_json::to_vec(&state)?;

            let write_txn = db.begin_write()?;
            {
                let mut entities = write_txn.open_table(tables::ENTITIES)?;
                entities.insert(key.as_str(), bytes.as_slice())?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await?
    }

    /// Read-modify-write: apply `f` to the current state, persist, and
    /// return the new state
    ///
    /// The only sanctioned path for in-place updates.
    pub async fn mutate<F>(db: &Db, id: &str, f: F) -> Result<T>
    where
        F: FnOnce(T) -> T + Send + 'static,
    {
        let db = db.clone();
        let id = id.to_string();
        let key = Self::storage_key(&id);
        tokio::task::spawn_blocking(move || -> Result<T> {
            let write_txn = db.begin_write()?;
            let next = {
                let mut entities = write_txn.open_table(tables::ENTITIES)?;
                let current: T = match entities.get(key.as_str())? {
                    Some(bytes) => serde_json::from_slice(bytes.value())?,
                    None => T::initial_state(&id),
                };
                let next = f(current);
                let bytes = serde_json::to_vec(&next)?;
                entities.insert(key.as_str(), bytes.as_slice())?;
                next
            };
            write_txn.commit()?;
            Ok(next)
        })
        .await?
    }

    /// Remove the record and its listing-index membership
    ///
    /// Returns whether a record was actually removed.
    pub async fn delete(db: &Db, id: &str) -> Result<bool> {
        let db = db.clone();
        let id = id.to_string();
        let key = Self::storage_key(&id);
        tokio::task::spawn_blocking(move || -> Result<bool> {
            let write_txn = db.begin_write()?;
            let removed = {
                let mut entities = write_txn.open_table(tables::ENTITIES)?;
                let removed = entities.remove(key.as_str())?.is_some();
                drop(entities);

                let mut indexes = write_txn.open_table(tables::INDEXES)?;
                index::remove_id(&mut indexes, T::INDEX_NAME, id.as_str())?;
                removed
            };
            write_txn.commit()?;
            Ok(removed)
        })
        .await?
    }

    /// List all IDs of this kind, in creation order
    pub async fn list_ids(db: &Db) -> Result<Vec<String>> {
        let db = db.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(tables::INDEXES)?;
            index::read_ids(&table, T::INDEX_NAME)
        })
        .await?
    }
}
