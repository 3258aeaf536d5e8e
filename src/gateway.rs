// 🚪 Persistence Gateway - where the fleet comes from and where it goes

use crate::db;
use crate::error::{FleetError, Result};
use crate::fleet::Fleet;
use crate::parser;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Produce the initial fleet for a session
///
/// With an import source the CSV wins over any existing snapshot and is
/// immediately saved as the new snapshot. A bad import line is fatal; a failed
/// save is only reported. Without an import source the snapshot is loaded,
/// falling back to an empty fleet. Save failures are written to `out`.
pub fn startup<W: Write>(import: Option<&Path>, snapshot: &Path, out: &mut W) -> Result<Fleet> {
    match import {
        Some(csv_path) => {
            let fleet = parser::import_fleet(csv_path)?;
            // reported inside save_or_report; the imported fleet is still usable
            let _ = save_or_report(snapshot, &fleet, out);
            Ok(fleet)
        }
        None => {
            info!(path = %snapshot.display(), "loading fleet snapshot");
            Ok(db::load_or_empty(snapshot))
        }
    }
}

/// Save the snapshot; a failure is logged, shown on `out` and handed back
pub fn save_or_report<W: Write>(snapshot: &Path, fleet: &Fleet, out: &mut W) -> Result<()> {
    db::save_snapshot(snapshot, fleet).inspect_err(|e| {
        warn!(error = %e, "could not save fleet snapshot");
        let _ = writeln!(out, "{}", save_error_message(e));
    })
}

pub fn save_error_message(err: &FleetError) -> String {
    format!("Error saving fleet data: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_import_takes_precedence_and_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("fleet.csv");
        let snapshot = dir.path().join("FleetData.db");

        // an older snapshot that the import must replace
        let mut old = Fleet::new();
        old.add_boat("SAILING", "Old Salt", "1980", "Hunter", "27", "8000").unwrap();
        db::save_snapshot(&snapshot, &old).unwrap();

        fs::write(&csv, "POWER,Marlin,2015,Boston Whaler,22,35000.00\n").unwrap();

        let fleet = startup(Some(&csv), &snapshot, &mut Vec::new()).unwrap();
        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet.total_paid(), 35000.00);

        let reloaded = startup(None, &snapshot, &mut Vec::new()).unwrap();
        assert_eq!(reloaded, fleet);
    }

    #[test]
    fn test_bad_import_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("fleet.csv");
        let snapshot = dir.path().join("FleetData.db");
        fs::write(&csv, "POWER,Marlin,twenty-fifteen,Boston Whaler,22,35000.00\n").unwrap();

        let err = startup(Some(&csv), &snapshot, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, FleetError::Import { line: 1, .. }));
        assert!(!snapshot.exists());
    }

    #[test]
    fn test_no_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let fleet = startup(None, &dir.path().join("FleetData.db"), &mut Vec::new()).unwrap();
        assert!(fleet.is_empty());
    }

    #[test]
    fn test_unwritable_snapshot_does_not_fail_import() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("fleet.csv");
        let snapshot = dir.path().join("missing_dir").join("FleetData.db");
        fs::write(&csv, "SAILING,Blue Moon,1999,Catalina,30,12000\n").unwrap();

        let mut out = Vec::new();
        let fleet = startup(Some(&csv), &snapshot, &mut out).unwrap();
        assert_eq!(fleet.len(), 1);

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.matches("Error saving fleet data:").count(), 1);
    }

    #[test]
    fn test_save_or_report_writes_same_line_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("missing_dir").join("FleetData.db");

        let mut out = Vec::new();
        let err = save_or_report(&snapshot, &Fleet::new(), &mut out).unwrap_err();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n", save_error_message(&err))
        );
    }

    #[test]
    fn test_successful_save_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        save_or_report(&dir.path().join("FleetData.db"), &Fleet::new(), &mut out).unwrap();
        assert!(out.is_empty());
    }
}
