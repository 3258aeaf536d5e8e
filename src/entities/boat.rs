// ⛵ Boat Entity - One record in the fleet ledger
//
// Purchase price is fixed at creation; accumulated expense only grows through
// Fleet::record_expense and never passes the purchase price.

use crate::error::{FleetError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// BOAT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoatType {
    Power,
    Sailing,
}

impl BoatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoatType::Power => "POWER",
            BoatType::Sailing => "SAILING",
        }
    }
}

impl fmt::Display for BoatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width specifiers in the report apply
        f.pad(self.as_str())
    }
}

impl FromStr for BoatType {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "POWER" => Ok(BoatType::Power),
            "SAILING" => Ok(BoatType::Sailing),
            other => Err(FleetError::InvalidInput(format!(
                "unknown boat type '{}' (expected POWER or SAILING)",
                other
            ))),
        }
    }
}

// ============================================================================
// BOAT RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoatRecord {
    pub boat_type: BoatType,

    /// Lookup key, matched case-insensitively
    pub name: String,

    pub year: i32,

    /// Manufacturer
    pub make: String,

    pub feet: f64,

    pub purchase_price: f64,

    /// Accumulated expense, starts at 0
    pub expense: f64,
}

impl BoatRecord {
    /// Create a new record with no expenses yet
    pub fn new(
        boat_type: BoatType,
        name: String,
        year: i32,
        make: String,
        feet: f64,
        purchase_price: f64,
    ) -> Self {
        BoatRecord {
            boat_type,
            name,
            year,
            make,
            feet,
            purchase_price,
            expense: 0.0,
        }
    }

    /// Build a record from the six raw text fields of an import line or add command
    ///
    /// Fails with `InvalidInput` if the category is unknown, the year is not an
    /// integer, or feet/price are not finite non-negative numbers.
    pub fn from_fields(
        category: &str,
        name: &str,
        year: &str,
        make: &str,
        feet: &str,
        purchase_price: &str,
    ) -> Result<Self> {
        let boat_type: BoatType = category.parse()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(FleetError::InvalidInput("boat name is empty".to_string()));
        }

        let year = year
            .trim()
            .parse::<i32>()
            .map_err(|_| FleetError::InvalidInput(format!("year '{}' is not an integer", year.trim())))?;

        let feet = parse_amount("feet", feet)?;
        let purchase_price = parse_amount("purchase price", purchase_price)?;

        Ok(Self::new(
            boat_type,
            name.to_string(),
            year,
            make.trim().to_string(),
            feet,
            purchase_price,
        ))
    }

    /// How much can still be spent before hitting the purchase price
    pub fn remaining_budget(&self) -> f64 {
        self.purchase_price - self.expense
    }

    /// Case-insensitive name comparison used for every lookup
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl fmt::Display for BoatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<8} {:<20} {:>4} {:<12} {:>4}' : Paid ${:>10.2} : Spent ${:>10.2}",
            self.boat_type,
            self.name,
            self.year,
            self.make,
            self.feet.trunc() as i64,
            self.purchase_price,
            self.expense
        )
    }
}

/// Parse a finite, non-negative real
pub(crate) fn parse_amount(label: &str, raw: &str) -> Result<f64> {
    let raw = raw.trim();
    let value = raw
        .parse::<f64>()
        .map_err(|_| FleetError::InvalidInput(format!("{} '{}' is not a number", label, raw)))?;

    if !value.is_finite() || value < 0.0 {
        return Err(FleetError::InvalidInput(format!(
            "{} must be a non-negative number, got '{}'",
            label, raw
        )));
    }

    Ok(value)
}
