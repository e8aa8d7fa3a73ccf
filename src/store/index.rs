use redb::{ReadableTable, Table};

use crate::db::{tables, Db};
use crate::error::Result;

/// Read an index's ID list from any readable table handle
///
/// A missing index key is an empty index, not an error.
pub(crate) fn read_ids<T>(table: &T, key: &str) -> Result<Vec<String>>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    Ok(match table.get(key)? {
        Some(bytes) => serde_json::from_slice(bytes.value())?,
        None => Vec::new(),
    })
}

/// Add an ID to an index within an open write transaction (idempotent)
pub(crate) fn add_id(
    table: &mut Table<&'static str, &'static [u8]>,
    key: &str,
    id: &str,
) -> Result<()> {
    let mut ids = read_ids(&*table, key)?;
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
        let bytes = serde_json::to_vec(&ids)?;
        table.insert(key, bytes.as_slice())?;
    }
    Ok(())
}

/// Remove an ID from an index within an open write transaction (idempotent)
pub(crate) fn remove_id(
    table: &mut Table<&'static str, &'static [u8]>,
    key: &str,
    id: &str,
) -> Result<()> {
    let mut ids = read_ids(&*table, key)?;
    let before = ids.len();
    ids.retain(|existing| existing != id);
    if ids.len() != before {
        let bytes = serde_json::to_vec(&ids)?;
        table.insert(key, bytes.as_slice())?;
    }
    Ok(())
}

/// An ordered list of entity IDs stored under a single index key
///
/// Used for per-user habit listings (`habits:<userId>`). Membership order is
/// insertion order; `add` and `remove` are idempotent.
pub struct Index {
    db: Db,
    name: String,
}

impl Index {
    pub fn new(db: Db, name: impl Into<String>) -> Self {
        Self {
            db,
            name: name.into(),
        }
    }

    /// List all IDs in insertion order
    pub async fn list(&self) -> Result<Vec<String>> {
        let db = self.db.clone();
        let name = self.name.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(tables::INDEXES)?;
            read_ids(&table, name.as_str())
        })
        .await?
    }

    /// Add an ID; a no-op if it is already present
    pub async fn add(&self, id: &str) -> Result<()> {
        let db = self.db.clone();
        let name = self.name.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(tables::INDEXES)?;
                add_id(&mut table, name.as_str(), id.as_str())?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await?
    }

    /// Remove an ID; a no-op if it is absent
    pub async fn remove(&self, id: &str) -> Result<()> {
        let db = self.db.clone();
        let name = self.name.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(tables::INDEXES)?;
                remove_id(&mut table, name.as_str(), id.as_str())?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await?
    }
}
