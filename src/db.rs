// 💾 Snapshot Store - SQLite file holding the whole fleet between sessions
//
// A save always writes a fresh database next to the target and renames it
// over the old one, so a stale or corrupt snapshot is replaced whole.

use crate::entities::{BoatRecord, BoatType};
use crate::error::{FleetError, Result};
use crate::fleet::Fleet;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default snapshot file name, relative to the working directory
pub const DEFAULT_SNAPSHOT: &str = "FleetData.db";

/// Bookkeeping written alongside the boats
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotMeta {
    pub saved_at: DateTime<Utc>,
    pub boat_count: i64,
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS boats (
            position INTEGER PRIMARY KEY,
            boat_type TEXT NOT NULL,
            name TEXT NOT NULL,
            year INTEGER NOT NULL,
            make TEXT NOT NULL,
            feet REAL NOT NULL,
            purchase_price REAL NOT NULL,
            expense REAL NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS snapshot_meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            saved_at TEXT NOT NULL,
            boat_count INTEGER NOT NULL
        )",
        [],
    )?;

    Ok(())
}

// ============================================================================
// WRITE
// ============================================================================

/// Write every boat (in order) plus the meta row inside one transaction
pub fn insert_fleet(conn: &mut Connection, fleet: &Fleet, saved_at: DateTime<Utc>) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;

    tx.execute("DELETE FROM boats", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO boats (
                position, boat_type, name, year, make, feet, purchase_price, expense
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;

        for (position, boat) in fleet.boats().iter().enumerate() {
            stmt.execute(params![
                position as i64,
                boat.boat_type.as_str(),
                boat.name,
                boat.year,
                boat.make,
                boat.feet,
                boat.purchase_price,
                boat.expense,
            ])?;
        }
    }

    tx.execute(
        "INSERT OR REPLACE INTO snapshot_meta (id, saved_at, boat_count) VALUES (1, ?1, ?2)",
        params![saved_at.to_rfc3339(), fleet.len() as i64],
    )?;

    tx.commit()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Serialize the whole fleet to `path`, replacing any previous snapshot
pub fn save_snapshot(path: &Path, fleet: &Fleet) -> Result<()> {
    let tmp = temp_path(path);
    remove_if_exists(&tmp).map_err(|e| FleetError::persistence(&tmp, e))?;

    let write = || -> rusqlite::Result<()> {
        let mut conn = Connection::open(&tmp)?;
        setup_database(&conn)?;
        insert_fleet(&mut conn, fleet, Utc::now())?;
        conn.close().map_err(|(_, e)| e)
    };

    if let Err(e) = write() {
        let _ = remove_if_exists(&tmp);
        return Err(FleetError::persistence(path, e));
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = remove_if_exists(&tmp);
        return Err(FleetError::persistence(path, e));
    }

    info!(path = %path.display(), boats = fleet.len(), "saved fleet snapshot");
    Ok(())
}

// ============================================================================
// READ
// ============================================================================

/// Read all boats in saved order
pub fn get_all_boats(conn: &Connection) -> rusqlite::Result<Vec<BoatRecord>> {
    let mut stmt = conn.prepare(
        "SELECT boat_type, name, year, make, feet, purchase_price, expense
         FROM boats
         ORDER BY position ASC",
    )?;

    let boats = stmt
        .query_map([], |row| {
            let boat_type: String = row.get(0)?;
            let boat_type = boat_type
                .parse::<BoatType>()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

            Ok(BoatRecord {
                boat_type,
                name: row.get(1)?,
                year: row.get(2)?,
                make: row.get(3)?,
                feet: row.get(4)?,
                purchase_price: row.get(5)?,
                expense: row.get(6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(boats)
}

pub fn get_snapshot_meta(conn: &Connection) -> rusqlite::Result<SnapshotMeta> {
    let (saved_at, boat_count): (String, i64) = conn.query_row(
        "SELECT saved_at, boat_count FROM snapshot_meta WHERE id = 1",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let saved_at = DateTime::parse_from_rfc3339(&saved_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    Ok(SnapshotMeta { saved_at, boat_count })
}

/// Load the fleet saved at `path`
///
/// A missing file, a file that is not a snapshot, or a boat count that does
/// not match the meta row is a `PersistenceError`.
pub fn load_snapshot(path: &Path) -> Result<Fleet> {
    if !path.exists() {
        return Err(FleetError::persistence(path, "no snapshot found"));
    }

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| FleetError::persistence(path, e))?;

    let meta = get_snapshot_meta(&conn).map_err(|e| FleetError::persistence(path, e))?;
    let boats = get_all_boats(&conn).map_err(|e| FleetError::persistence(path, e))?;

    if boats.len() as i64 != meta.boat_count {
        return Err(FleetError::persistence(
            path,
            format!(
                "snapshot lists {} boats but holds {}",
                meta.boat_count,
                boats.len()
            ),
        ));
    }

    debug!(saved_at = %meta.saved_at, "snapshot meta");
    info!(path = %path.display(), boats = boats.len(), "loaded fleet snapshot");
    Ok(Fleet::from_boats(boats))
}

/// Load the snapshot, or start with an empty fleet if it cannot be read
pub fn load_or_empty(path: &Path) -> Fleet {
    match load_snapshot(path) {
        Ok(fleet) => fleet,
        Err(e) => {
            warn!(error = %e, "starting with an empty fleet");
            Fleet::new()
        }
    }
}
