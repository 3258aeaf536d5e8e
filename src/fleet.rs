// 🚤 Fleet Ledger
// Ordered boat records, aggregate totals and the expense-vs-budget rule.
//
// The fleet is always an owned value handed to whoever mutates it; there is no
// process-wide list.

use crate::entities::{BoatRecord, BoatType};
use crate::entities::boat::parse_amount;
use crate::error::{FleetError, Result};
use serde::Serialize;

/// Width of the per-boat columns before " : Paid", so the totals line lines up
pub const REPORT_LABEL_WIDTH: usize = 53;

// ============================================================================
// FLEET
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fleet {
    boats: Vec<BoatRecord>,
}

/// Serializable view used by the JSON report
#[derive(Debug, Clone, Serialize)]
pub struct FleetSummary<'a> {
    pub boats: &'a [BoatRecord],
    pub total_paid: f64,
    pub total_spent: f64,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_boats(boats: Vec<BoatRecord>) -> Self {
        Fleet { boats }
    }

    pub fn boats(&self) -> &[BoatRecord] {
        &self.boats
    }

    pub fn len(&self) -> usize {
        self.boats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boats.is_empty()
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Append an already-typed record (insertion order is report order)
    pub fn push(&mut self, boat: BoatRecord) {
        self.boats.push(boat);
    }

    /// Parse the six raw fields and append the boat with zero expense
    ///
    /// No duplicate-name check: a second boat with the same name is appended
    /// and shadowed by the first one on lookups.
    pub fn add_boat(
        &mut self,
        category: &str,
        name: &str,
        year: &str,
        make: &str,
        feet: &str,
        purchase_price: &str,
    ) -> Result<&BoatRecord> {
        let boat = BoatRecord::from_fields(category, name, year, make, feet, purchase_price)?;
        self.boats.push(boat);
        Ok(&self.boats[self.boats.len() - 1])
    }

    /// Remove the first boat whose name matches case-insensitively
    pub fn remove_boat(&mut self, name: &str) -> Result<BoatRecord> {
        let index = self.position(name).ok_or_else(|| FleetError::NotFound {
            name: name.to_string(),
        })?;
        Ok(self.boats.remove(index))
    }

    /// Record an expense against a boat, returning its new accumulated expense
    ///
    /// Rejected with `BudgetExceeded` when `amount` is strictly greater than
    /// the remaining budget; spending exactly the remainder is allowed. A
    /// rejected call leaves the boat untouched.
    pub fn record_expense(&mut self, name: &str, amount: f64) -> Result<f64> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(FleetError::InvalidInput(format!(
                "expense must be a non-negative number, got {}",
                amount
            )));
        }

        let index = self.position(name).ok_or_else(|| FleetError::NotFound {
            name: name.to_string(),
        })?;
        let boat = &mut self.boats[index];

        let remaining = boat.remaining_budget();
        if amount > remaining {
            return Err(FleetError::BudgetExceeded {
                name: boat.name.clone(),
                remaining,
            });
        }

        // f64 rounding can land the sum a hair past the price; clamp so that
        // spending exactly the remainder leaves a budget of exactly 0
        let new_total = boat.expense + amount;
        boat.expense = if amount == remaining || new_total > boat.purchase_price {
            boat.purchase_price
        } else {
            new_total
        };
        Ok(boat.expense)
    }

    /// Same as `record_expense` but takes the amount as typed by the user
    pub fn record_expense_str(&mut self, name: &str, amount: &str) -> Result<f64> {
        let amount = parse_amount("expense", amount)?;
        self.record_expense(name, amount)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn find(&self, name: &str) -> Option<&BoatRecord> {
        self.boats.iter().find(|boat| boat.name_matches(name))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.boats.iter().position(|boat| boat.name_matches(name))
    }

    pub fn count_by_type(&self, boat_type: BoatType) -> usize {
        self.boats.iter().filter(|b| b.boat_type == boat_type).count()
    }

    pub fn total_paid(&self) -> f64 {
        self.boats.iter().map(|b| b.purchase_price).sum()
    }

    pub fn total_spent(&self) -> f64 {
        self.boats.iter().map(|b| b.expense).sum()
    }

    /// One line per boat in fleet order, then the totals line
    ///
    /// Lazy and recomputed from the current state on every call.
    pub fn report(&self) -> impl Iterator<Item = String> + '_ {
        self.boats
            .iter()
            .map(|boat| boat.to_string())
            .chain(std::iter::once_with(move || self.totals_line()))
    }

    pub fn totals_line(&self) -> String {
        format!(
            "{:<width$} : Paid ${:>10.2} : Spent ${:>10.2}",
            "Total",
            self.total_paid(),
            self.total_spent(),
            width = REPORT_LABEL_WIDTH
        )
    }

    pub fn summary(&self) -> FleetSummary<'_> {
        FleetSummary {
            boats: &self.boats,
            total_paid: self.total_paid(),
            total_spent: self.total_spent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marlin_fleet() -> Fleet {
        let mut fleet = Fleet::new();
        fleet
            .add_boat("POWER", "Marlin", "2015", "Boston Whaler", "22", "35000.00")
            .unwrap();
        fleet
    }

    fn sample_fleet() -> Fleet {
        let mut fleet = marlin_fleet();
        fleet
            .add_boat("SAILING", "Blue Moon", "1999", "Catalina", "30", "12000.50")
            .unwrap();
        fleet
            .add_boat("sailing", "Osprey", "2021", "Beneteau", "41.5", "250000")
            .unwrap();
        fleet
    }

    #[test]
    fn test_marlin_totals() {
        let fleet = marlin_fleet();
        assert_eq!(fleet.total_paid(), 35000.00);
        assert_eq!(fleet.total_spent(), 0.00);
    }

    #[test]
    fn test_expense_exactly_remaining_then_one_cent_more() {
        let mut fleet = marlin_fleet();

        let spent = fleet.record_expense("Marlin", 35000.00).unwrap();
        assert_eq!(spent, 35000.00);
        assert_eq!(fleet.find("marlin").unwrap().remaining_budget(), 0.0);

        let err = fleet.record_expense("Marlin", 0.01).unwrap_err();
        assert_eq!(
            err,
            FleetError::BudgetExceeded {
                name: "Marlin".to_string(),
                remaining: 0.0
            }
        );
        assert_eq!(err.to_string(), "Expense not permitted, only $0.00 left to spend.");
        assert_eq!(fleet.total_spent(), 35000.00);
    }

    #[test]
    fn test_spending_remainder_after_prior_expense_zeroes_budget() {
        // every cent-rounded prior expense on this price; some of them make
        // expense + (price - expense) round above price in f64
        let price = 1386.74;
        for prior_cents in 1..138674u32 {
            let prior = f64::from(prior_cents) / 100.0;
            let mut fleet = Fleet::new();
            fleet.push(BoatRecord::new(BoatType::Power, "M".into(), 2000, "Mako".into(), 20.0, price));
            fleet.record_expense("M", prior).unwrap();

            let remaining = fleet.find("M").unwrap().remaining_budget();
            let spent = fleet.record_expense("M", remaining).unwrap();

            let boat = fleet.find("M").unwrap();
            assert_eq!(spent, price, "prior expense {}", prior);
            assert!(boat.expense <= boat.purchase_price, "prior expense {}", prior);
            assert_eq!(boat.remaining_budget(), 0.0, "prior expense {}", prior);

            // a zero expense on a fully spent boat is still allowed
            assert_eq!(fleet.record_expense("M", 0.0).unwrap(), price);
            assert_eq!(
                fleet.record_expense("M", 0.01).unwrap_err().to_string(),
                "Expense not permitted, only $0.00 left to spend."
            );
        }
    }

    #[test]
    fn test_rejected_expense_is_idempotent() {
        let mut fleet = marlin_fleet();
        fleet.record_expense("Marlin", 30000.0).unwrap();
        let before = fleet.clone();

        let first = fleet.record_expense("MARLIN", 6000.0).unwrap_err();
        let second = fleet.record_expense("MARLIN", 6000.0).unwrap_err();

        assert_eq!(first, second);
        assert!(matches!(first, FleetError::BudgetExceeded { remaining, .. } if remaining == 5000.0));
        assert_eq!(fleet, before);
    }

    #[test]
    fn test_expense_on_missing_boat() {
        let mut fleet = marlin_fleet();
        let err = fleet.record_expense("Ghost", 1.0).unwrap_err();
        assert_eq!(err, FleetError::NotFound { name: "Ghost".to_string() });
    }

    #[test]
    fn test_negative_expense_rejected() {
        let mut fleet = marlin_fleet();
        assert!(matches!(
            fleet.record_expense("Marlin", -5.0),
            Err(FleetError::InvalidInput(_))
        ));
        assert!(matches!(
            fleet.record_expense_str("Marlin", "lots"),
            Err(FleetError::InvalidInput(_))
        ));
        assert_eq!(fleet.total_spent(), 0.0);
    }

    #[test]
    fn test_remove_nonexistent_leaves_fleet_unchanged() {
        let mut fleet = sample_fleet();
        let before = fleet.clone();

        let err = fleet.remove_boat("Nonexistent").unwrap_err();
        assert_eq!(err.to_string(), "Cannot find boat Nonexistent");
        assert_eq!(fleet, before);
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut fleet = sample_fleet();
        fleet
            .add_boat("POWER", "MARLIN", "2020", "Grady", "25", "50000")
            .unwrap();

        let removed = fleet.remove_boat("marlin").unwrap();
        assert_eq!(removed.year, 2015);
        assert_eq!(fleet.len(), 3);
        assert_eq!(fleet.find("Marlin").unwrap().year, 2020);
    }

    #[test]
    fn test_total_paid_tracks_adds_and_removes_not_expenses() {
        let mut fleet = sample_fleet();
        let expected: f64 = fleet.boats().iter().map(|b| b.purchase_price).sum();
        assert_eq!(fleet.total_paid(), expected);

        fleet.record_expense("Osprey", 1000.0).unwrap();
        assert_eq!(fleet.total_paid(), expected);

        let removed = fleet.remove_boat("Blue Moon").unwrap();
        assert_eq!(fleet.total_paid(), expected - removed.purchase_price);
    }

    #[test]
    fn test_add_boat_invalid_input_skips() {
        let mut fleet = marlin_fleet();
        let err = fleet
            .add_boat("CANOE", "Tippy", "2001", "Old Town", "16", "900")
            .unwrap_err();
        assert!(matches!(err, FleetError::InvalidInput(_)));
        assert_eq!(fleet.len(), 1);
    }

    #[test]
    fn test_report_is_restartable_and_ordered() {
        let mut fleet = sample_fleet();

        let lines: Vec<String> = fleet.report().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Marlin"));
        assert!(lines[1].contains("Blue Moon"));
        assert!(lines[2].contains("Osprey"));
        assert_eq!(
            lines[3],
            "Total                                                 : Paid $ 297000.50 : Spent $      0.00"
        );

        fleet.record_expense("Blue Moon", 500.0).unwrap();
        let again: Vec<String> = fleet.report().collect();
        assert!(again[3].ends_with("Spent $    500.00"));
    }

    #[test]
    fn test_empty_fleet_report_has_only_totals() {
        let fleet = Fleet::new();
        let lines: Vec<String> = fleet.report().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Total"));
        assert_eq!(fleet.total_paid(), 0.0);
    }

    #[test]
    fn test_count_by_type() {
        let fleet = sample_fleet();
        assert_eq!(fleet.count_by_type(BoatType::Power), 1);
        assert_eq!(fleet.count_by_type(BoatType::Sailing), 2);
    }
}
