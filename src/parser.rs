// 📥 CSV Import - seeds a fleet from a plain text listing
//
// Format (no header), one boat per line:
//   category,name,year,manufacturer,feet,purchasePrice
// e.g. POWER,Marlin,2015,Boston Whaler,22,35000.00

use crate::entities::BoatRecord;
use crate::error::{FleetError, Result};
use crate::fleet::Fleet;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Number of comma-separated fields on every boat line
pub const FIELD_COUNT: usize = 6;

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        // field count is checked per line so the error can say which line
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source)
}

/// Turn one CSV record into a boat; errors are `InvalidInput`
pub fn record_to_boat(record: &StringRecord) -> Result<BoatRecord> {
    if record.len() != FIELD_COUNT {
        return Err(FleetError::InvalidInput(format!(
            "expected {} fields, found {}",
            FIELD_COUNT,
            record.len()
        )));
    }

    BoatRecord::from_fields(
        &record[0], &record[1], &record[2], &record[3], &record[4], &record[5],
    )
}

/// Parse the single line typed at the add prompt
pub fn parse_boat_line(line: &str) -> Result<BoatRecord> {
    let mut rdr = reader(line.as_bytes());
    let mut record = StringRecord::new();

    let found = rdr
        .read_record(&mut record)
        .map_err(|e| FleetError::InvalidInput(e.to_string()))?;
    if !found {
        return Err(FleetError::InvalidInput("no boat data entered".to_string()));
    }

    record_to_boat(&record)
}

/// Read every boat from an in-memory or on-disk source
///
/// The first bad line aborts the whole import with `ImportError`; blank lines
/// are skipped. Expense starts at 0 for every boat.
pub fn read_fleet<R: Read>(source: R) -> Result<Fleet> {
    let mut fleet = Fleet::new();

    for (index, result) in reader(source).records().enumerate() {
        let record = result.map_err(|e| FleetError::Import {
            line: e.position().map(|p| p.line() as usize).unwrap_or(index + 1),
            reason: e.to_string(),
        })?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 1);

        let boat = record_to_boat(&record).map_err(|e| FleetError::Import {
            line,
            reason: match e {
                FleetError::InvalidInput(reason) => reason,
                other => other.to_string(),
            },
        })?;

        debug!(line, name = %boat.name, "imported boat");
        fleet.push(boat);
    }

    Ok(fleet)
}

/// Import a fleet from a CSV file
pub fn import_fleet(path: &Path) -> Result<Fleet> {
    let file = File::open(path).map_err(|e| FleetError::Import {
        line: 0,
        reason: format!("cannot open {}: {}", path.display(), e),
    })?;

    let fleet = read_fleet(file)?;
    info!(path = %path.display(), boats = fleet.len(), "imported fleet from CSV");
    Ok(fleet)
}
