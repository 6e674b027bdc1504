//! `SQLite`-backed item storage.
//!
//! [`SqliteRepository`] owns a single connection. It is moved into the item actor,
//! which is the only code that ever touches it, so no locking is needed here.
//! Prices are stored as TEXT holding the decimal quantized to cents.

use std::path::Path;
use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Params, Row, Transaction};
use rust_decimal::Decimal;
use tracing::{debug, error, info};

use crate::framework::{Repository, StorageError};
use crate::inventory_actor::ItemFilter;
use crate::model::{quantize_price, Condition, InventoryItem};

/// Schema SQL embedded at compile time.
const SCHEMA_SQL: &str = include_str!("schema.sql");

const COLUMNS: &str = "id, name, description, quantity, price, product_id, restock_level, condition";

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Backend(e.to_string())
    }
}

/// The inventory table behind a `rusqlite` connection.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens or creates the database at `path` and applies the schema.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening item store");
        Self::initialize(Connection::open(path)?)
    }

    /// Creates an in-memory store, mostly for tests.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Items whose name equals `name`.
    pub fn find_by_name(&self, name: &str) -> Result<Vec<InventoryItem>, StorageError> {
        debug!(name, "Processing name query");
        self.select("WHERE name = ?1", params![name])
    }

    /// Items in `condition`.
    pub fn find_by_condition(&self, condition: Condition) -> Result<Vec<InventoryItem>, StorageError> {
        debug!(%condition, "Processing condition query");
        self.select("WHERE condition = ?1", params![condition.as_str()])
    }

    fn select(&self, clause: &str, params: impl Params) -> Result<Vec<InventoryItem>, StorageError> {
        let sql = format!("SELECT {COLUMNS} FROM inventory_item {clause} ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params, row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Runs `work` in one transaction: commit on success, roll back on failure.
    fn in_transaction<R>(
        &mut self,
        operation: &'static str,
        work: impl FnOnce(&Transaction<'_>) -> rusqlite::Result<R>,
    ) -> Result<R, StorageError> {
        let tx = self.conn.transaction()?;
        match work(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                error!(operation, error = %e, "Rolling back");
                if let Err(rollback) = tx.rollback() {
                    error!(operation, error = %rollback, "Rollback failed");
                }
                Err(e.into())
            }
        }
    }
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<InventoryItem> {
    let price: String = row.get(4)?;
    let price = Decimal::from_str(&price)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    let condition: Option<String> = row.get(7)?;
    let condition = condition
        .map(|text| text.parse::<Condition>())
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

    Ok(InventoryItem {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        quantity: row.get(3)?,
        price,
        product_id: row.get(5)?,
        restock_level: row.get(6)?,
        condition,
    })
}

impl Repository<InventoryItem> for SqliteRepository {
    fn create(&mut self, item: &mut InventoryItem) -> Result<i64, StorageError> {
        info!(name = %item.name, "Creating item");
        let id = self.in_transaction("create", |tx| {
            tx.execute(
                "INSERT INTO inventory_item \
                 (name, description, quantity, price, product_id, restock_level, condition) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    item.name,
                    item.description,
                    item.quantity,
                    quantize_price(item.price).to_string(),
                    item.product_id,
                    item.restock_level,
                    item.condition.map(Condition::as_str),
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })?;
        item.id = Some(id);
        Ok(id)
    }

    fn update(&mut self, item: &InventoryItem) -> Result<(), StorageError> {
        let id = item.id.ok_or(StorageError::MissingIdentity)?;
        info!(id, name = %item.name, "Saving item");
        self.in_transaction("update", |tx| {
            tx.execute(
                "UPDATE inventory_item SET \
                 name = ?1, description = ?2, quantity = ?3, price = ?4, \
                 product_id = ?5, restock_level = ?6, condition = ?7 \
                 WHERE id = ?8",
                params![
                    item.name,
                    item.description,
                    item.quantity,
                    quantize_price(item.price).to_string(),
                    item.product_id,
                    item.restock_level,
                    item.condition.map(Condition::as_str),
                    id,
                ],
            )?;
            Ok(())
        })
    }

    fn delete(&mut self, item: &InventoryItem) -> Result<(), StorageError> {
        // Never persisted, nothing to remove.
        let Some(id) = item.id else {
            return Ok(());
        };
        info!(id, name = %item.name, "Deleting item");
        self.in_transaction("delete", |tx| {
            tx.execute("DELETE FROM inventory_item WHERE id = ?1", params![id])?;
            Ok(())
        })
    }

    fn find(&self, id: &i64) -> Result<Option<InventoryItem>, StorageError> {
        debug!(id, "Processing lookup");
        let sql = format!("SELECT {COLUMNS} FROM inventory_item WHERE id = ?1");
        let item = self
            .conn
            .query_row(&sql, params![id], row_to_item)
            .optional()?;
        Ok(item)
    }

    fn find_all(&self) -> Result<Vec<InventoryItem>, StorageError> {
        debug!("Processing all items");
        self.select("", params![])
    }

    fn find_by(&self, filter: &ItemFilter) -> Result<Vec<InventoryItem>, StorageError> {
        match filter {
            ItemFilter::Name(name) => self.find_by_name(name),
            ItemFilter::Condition(condition) => self.find_by_condition(*condition),
            ItemFilter::Id(id) => Ok(self.find(id)?.into_iter().collect()),
        }
    }
}
