// Entity Models
// A boat is identified by its name (case-insensitive, first match wins);
// everything else on the record is a plain value.

pub mod boat;

pub use boat::{BoatRecord, BoatType};
