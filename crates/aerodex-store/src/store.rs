//! The entry record store.
//!
//! Minimal transactional persistence over one SQLite connection: schema
//! creation with spatial reference metadata, prepared-statement queries,
//! and insert/load/list/delete for classified entries. Geometry columns
//! hold well-known text in SRID 4326.

use crate::{Result, StoreError};
use aerodex_core::{Entry, EntryType, PointGeometry, PolygonGeometry};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// SRID stored in the spatial reference table.
const WGS84_SRID: i64 = 4326;

/// Schema statements; all idempotent.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS spatial_ref_sys (
    srid INTEGER NOT NULL PRIMARY KEY,
    auth_name TEXT NOT NULL,
    auth_srid INTEGER NOT NULL,
    ref_sys_name TEXT NOT NULL,
    proj4text TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS geometry_columns (
    f_table_name TEXT NOT NULL,
    f_geometry_column TEXT NOT NULL,
    geometry_type TEXT NOT NULL,
    coord_dimension INTEGER NOT NULL,
    srid INTEGER NOT NULL,
    PRIMARY KEY (f_table_name, f_geometry_column)
);

CREATE TABLE IF NOT EXISTS entries (
    path TEXT NOT NULL PRIMARY KEY,
    hash TEXT,
    type INTEGER NOT NULL,
    meta TEXT NOT NULL,
    mtime INTEGER NOT NULL,
    size INTEGER NOT NULL,
    depth INTEGER NOT NULL,
    point_geom TEXT,
    polygon_geom TEXT
);
";

/// Columns selected when loading entries.
const ENTRY_COLUMNS: &str =
    "path, hash, type, meta, mtime, size, depth, point_geom, polygon_geom";

/// A raw row before decoding into an [`Entry`].
type RawEntry = (
    String,
    Option<String>,
    i64,
    String,
    i64,
    i64,
    i64,
    Option<String>,
    Option<String>,
);

/// Durable persistence for entry records.
///
/// One connection per open handle; multi-writer coordination is the
/// engine's own locking, not managed here.
#[derive(Debug, Default)]
pub struct RecordStore {
    conn: Option<Connection>,
}

impl RecordStore {
    /// Create a closed store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or create the backing file.
    ///
    /// Fails when this instance already holds an open connection.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if self.conn.is_some() {
            return Err(StoreError::AlreadyOpen);
        }
        self.conn = Some(Connection::open(path)?);
        Ok(())
    }

    /// Open an in-memory database. Useful for tests and dry runs.
    pub fn open_in_memory(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Err(StoreError::AlreadyOpen);
        }
        self.conn = Some(Connection::open_in_memory()?);
        Ok(())
    }

    /// Close the connection. Safe to call repeatedly or when never opened.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((conn, err)) = conn.close() {
                debug!(%err, "deferring connection close");
                drop(conn);
            }
        }
    }

    /// True while a connection is open.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(StoreError::NotOpen)
    }

    /// Execute statements with no result set.
    pub fn exec(&self, sql: &str) -> Result<()> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }

    /// Initialize the schema: spatial reference metadata, geometry column
    /// registration, and the entries table. Idempotent.
    pub fn create_tables(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;

        conn.execute(
            "INSERT OR IGNORE INTO spatial_ref_sys
                 (srid, auth_name, auth_srid, ref_sys_name, proj4text)
             VALUES (?1, 'epsg', ?1, 'WGS 84', '+proj=longlat +datum=WGS84 +no_defs')",
            params![WGS84_SRID],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO geometry_columns
                 (f_table_name, f_geometry_column, geometry_type, coord_dimension, srid)
             VALUES ('entries', 'point_geom', 'POINT Z', 3, ?1),
                    ('entries', 'polygon_geom', 'POLYGON Z', 3, ?1)",
            params![WGS84_SRID],
        )?;
        Ok(())
    }

    /// Check whether a table exists.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Insert an entry, replacing any previous record at the same path.
    pub fn insert_entry(&self, entry: &Entry) -> Result<()> {
        let meta = serde_json::to_string(&Value::Object(entry.attributes.clone()))?;
        self.conn()?.execute(
            "INSERT OR REPLACE INTO entries
                 (path, hash, type, meta, mtime, size, depth, point_geom, polygon_geom)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entry.path,
                entry.hash,
                entry.entry_type.code(),
                meta,
                entry.modified_time,
                entry.size as i64,
                entry.depth,
                entry.point_geometry.as_ref().map(|g| g.to_wkt()),
                entry.polygon_geometry.as_ref().map(|g| g.to_wkt()),
            ],
        )?;
        Ok(())
    }

    /// Check whether an entry exists at a path.
    pub fn entry_exists(&self, path: &str) -> Result<bool> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM entries WHERE path = ?1",
            params![path],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Load the entry at a path, if any.
    pub fn load_entry(&self, path: &str) -> Result<Option<Entry>> {
        let raw: Option<RawEntry> = self
            .conn()?
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE path = ?1"),
                params![path],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                        row.get(7)?,
                        row.get(8)?,
                    ))
                },
            )
            .optional()?;

        raw.map(decode_entry).transpose()
    }

    /// Load every entry, ordered by path.
    pub fn list_entries(&self) -> Result<Vec<Entry>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {ENTRY_COLUMNS} FROM entries ORDER BY path"))?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(decode_entry(row?)?);
        }
        Ok(entries)
    }

    /// Delete the entry at a path. Returns whether a record was removed.
    pub fn delete_entry(&self, path: &str) -> Result<bool> {
        let affected = self
            .conn()?
            .execute("DELETE FROM entries WHERE path = ?1", params![path])?;
        Ok(affected > 0)
    }

    /// Number of stored entries.
    pub fn count_entries(&self) -> Result<i64> {
        Ok(self
            .conn()?
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?)
    }
}

fn decode_entry(raw: RawEntry) -> Result<Entry> {
    let (path, hash, type_code, meta, mtime, size, depth, point_wkt, polygon_wkt) = raw;

    let entry_type =
        EntryType::from_code(type_code as i32).ok_or_else(|| StoreError::InvalidRecord {
            path: path.clone(),
            reason: format!("unknown type code {type_code}"),
        })?;

    let attributes: Map<String, Value> = match serde_json::from_str(&meta)? {
        Value::Object(map) => map,
        other => {
            return Err(StoreError::InvalidRecord {
                path,
                reason: format!("meta column is not an object: {other}"),
            })
        }
    };

    let point_geometry = match point_wkt {
        Some(wkt) => Some(PointGeometry::from_wkt(&wkt).ok_or_else(|| {
            StoreError::InvalidRecord {
                path: path.clone(),
                reason: format!("unparseable point geometry: {wkt}"),
            }
        })?),
        None => None,
    };
    let polygon_geometry = match polygon_wkt {
        Some(wkt) => Some(PolygonGeometry::from_wkt(&wkt).ok_or_else(|| {
            StoreError::InvalidRecord {
                path: path.clone(),
                reason: format!("unparseable polygon geometry: {wkt}"),
            }
        })?),
        None => None,
    };

    Ok(Entry {
        path,
        hash,
        entry_type,
        attributes,
        modified_time: mtime,
        size: size as u64,
        depth: depth as u32,
        point_geometry,
        polygon_geometry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerodex_core::Point3;
    use serde_json::json;

    fn open_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.open_in_memory().unwrap();
        store
    }

    fn sample_entry() -> Entry {
        let mut entry = Entry::new("flight1/DJI_0042.JPG", EntryType::GeoImage);
        entry.hash = Some("abc123".into());
        entry.modified_time = 1_623_751_200;
        entry.size = 5_242_880;
        entry.depth = 1;
        entry.attributes.insert("make".into(), json!("DJI"));
        entry.attributes.insert("imageWidth".into(), json!(4000));
        entry.point_geometry = Some(PointGeometry::new(9.0, 45.0, 102.36));
        entry.polygon_geometry = Some(PolygonGeometry::new(vec![
            Point3::new(8.999, 45.001, 52.0),
            Point3::new(8.999, 44.999, 52.0),
            Point3::new(9.001, 44.999, 52.0),
            Point3::new(9.001, 45.001, 52.0),
            Point3::new(8.999, 45.001, 52.0),
        ]));
        entry
    }

    #[test]
    fn test_open_twice_fails() {
        let mut store = open_store();
        assert!(matches!(
            store.open_in_memory(),
            Err(StoreError::AlreadyOpen)
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut store = RecordStore::new();
        store.close();
        store.open_in_memory().unwrap();
        store.close();
        store.close();
        assert!(!store.is_open());

        // Closed store can be reopened
        store.open_in_memory().unwrap();
        assert!(store.is_open());
    }

    #[test]
    fn test_operations_require_open_connection() {
        let store = RecordStore::new();
        assert!(matches!(store.exec("SELECT 1"), Err(StoreError::NotOpen)));
        assert!(matches!(store.create_tables(), Err(StoreError::NotOpen)));
    }

    #[test]
    fn test_table_exists_around_create_tables() {
        let store = open_store();
        assert!(!store.table_exists("entries").unwrap());

        store.create_tables().unwrap();
        assert!(store.table_exists("entries").unwrap());
        assert!(store.table_exists("spatial_ref_sys").unwrap());
        assert!(store.table_exists("geometry_columns").unwrap());
        assert!(!store.table_exists("missing").unwrap());
    }

    #[test]
    fn test_create_tables_is_idempotent() {
        let store = open_store();
        store.create_tables().unwrap();
        store.create_tables().unwrap();

        let srid_rows: i64 = store
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM spatial_ref_sys", [], |r| r.get(0))
            .unwrap();
        assert_eq!(srid_rows, 1);
    }

    #[test]
    fn test_insert_and_load_roundtrip() {
        let store = open_store();
        store.create_tables().unwrap();

        let entry = sample_entry();
        store.insert_entry(&entry).unwrap();

        let loaded = store.load_entry(&entry.path).unwrap().unwrap();
        assert_eq!(loaded, entry);
    }

    #[test]
    fn test_entry_exists_and_delete() {
        let store = open_store();
        store.create_tables().unwrap();
        let entry = sample_entry();

        assert!(!store.entry_exists(&entry.path).unwrap());
        store.insert_entry(&entry).unwrap();
        assert!(store.entry_exists(&entry.path).unwrap());

        assert!(store.delete_entry(&entry.path).unwrap());
        assert!(!store.entry_exists(&entry.path).unwrap());
        assert!(!store.delete_entry(&entry.path).unwrap());
    }

    #[test]
    fn test_replace_keeps_path_unique() {
        let store = open_store();
        store.create_tables().unwrap();

        let mut entry = sample_entry();
        store.insert_entry(&entry).unwrap();
        entry.size = 99;
        store.insert_entry(&entry).unwrap();

        assert_eq!(store.count_entries().unwrap(), 1);
        assert_eq!(store.load_entry(&entry.path).unwrap().unwrap().size, 99);
    }

    #[test]
    fn test_list_entries_ordered() {
        let store = open_store();
        store.create_tables().unwrap();

        let mut b = Entry::new("b.txt", EntryType::Generic);
        b.size = 1;
        let mut a = Entry::new("a.txt", EntryType::Generic);
        a.size = 2;
        store.insert_entry(&b).unwrap();
        store.insert_entry(&a).unwrap();

        let entries = store.list_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "a.txt");
        assert_eq!(entries[1].path, "b.txt");
        assert!(entries[0].point_geometry.is_none());
    }

    #[test]
    fn test_sql_error_carries_engine_message() {
        let store = open_store();
        let err = store.exec("NOT VALID SQL").unwrap_err();
        assert!(err.to_string().contains("SQL error"));
    }

    #[test]
    fn test_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("index.db");

        let mut store = RecordStore::new();
        store.open(&db_path).unwrap();
        store.create_tables().unwrap();
        store.insert_entry(&sample_entry()).unwrap();
        store.close();

        let mut reopened = RecordStore::new();
        reopened.open(&db_path).unwrap();
        assert_eq!(reopened.count_entries().unwrap(), 1);
    }
}
