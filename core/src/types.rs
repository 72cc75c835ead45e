//! Shared primitive types used across the crate.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the store when a simulation is persisted.
pub type SimulationId = i64;

/// Loan category tag. Opaque: carried through persistence untouched,
/// nothing in the calculation keys off it. Categories live in an external
/// catalog, so any code is accepted. 0 means "not given".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanType(pub i64);

impl LoanType {
    pub const UNSPECIFIED: LoanType = LoanType(0);
    pub const FIRST_HOME: LoanType = LoanType(1);
    pub const SECOND_HOME: LoanType = LoanType(2);
    pub const COMMERCIAL_PROPERTY: LoanType = LoanType(3);
    pub const RENOVATION: LoanType = LoanType(4);

    pub fn code(self) -> i64 {
        self.0
    }
}

impl From<i64> for LoanType {
    fn from(code: i64) -> Self {
        LoanType(code)
    }
}
