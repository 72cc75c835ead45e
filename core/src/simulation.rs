//! Simulation request and record types.
//!
//! Monetary amounts and rates are exact decimals here and in storage.
//! Conversion to f64 happens only at the calculator boundary.

use crate::{
    calculator,
    error::{SimError, SimResult},
    types::{LoanType, SimulationId},
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters needed to price a loan, with no persistence attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Decimal,
    pub annual_interest_rate_percent: Decimal,
    pub term_years: i64,
}

impl LoanTerms {
    pub fn new(principal: Decimal, annual_interest_rate_percent: Decimal, term_years: i64) -> Self {
        Self {
            principal,
            annual_interest_rate_percent,
            term_years,
        }
    }

    /// Check the record invariants: positive principal and term, non-negative rate.
    pub fn validate(&self) -> SimResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(SimError::invalid(
                "principal",
                format!("must be positive, got {}", self.principal),
            ));
        }
        if self.term_years <= 0 {
            return Err(SimError::invalid(
                "term_years",
                format!("must be positive, got {}", self.term_years),
            ));
        }
        if self.annual_interest_rate_percent < Decimal::ZERO {
            return Err(SimError::invalid(
                "annual_interest_rate_percent",
                format!("must not be negative, got {}", self.annual_interest_rate_percent),
            ));
        }
        Ok(())
    }

    /// Monthly payment for these terms, unrounded.
    pub fn monthly_payment(&self) -> SimResult<f64> {
        let principal = to_f64("principal", self.principal)?;
        let rate = to_f64("annual_interest_rate_percent", self.annual_interest_rate_percent)?;
        calculator::compute_monthly_payment(principal, rate, self.term_years)
    }
}

fn to_f64(field: &'static str, value: Decimal) -> SimResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| SimError::invalid(field, format!("{value} is not representable as f64")))
}

/// A simulation request before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSimulation {
    pub principal: Decimal,
    pub term_years: i64,
    pub annual_interest_rate_percent: Decimal,
    #[serde(default)]
    pub loan_type: LoanType,
}

impl NewSimulation {
    pub fn terms(&self) -> LoanTerms {
        LoanTerms::new(self.principal, self.annual_interest_rate_percent, self.term_years)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.terms().validate()
    }
}

/// A persisted simulation. Never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub id: SimulationId,
    pub principal: Decimal,
    pub term_years: i64,
    pub annual_interest_rate_percent: Decimal,
    pub loan_type: LoanType,
}

impl SimulationRecord {
    pub fn from_new(id: SimulationId, simulation: &NewSimulation) -> Self {
        Self {
            id,
            principal: simulation.principal,
            term_years: simulation.term_years,
            annual_interest_rate_percent: simulation.annual_interest_rate_percent,
            loan_type: simulation.loan_type,
        }
    }

    /// The request this record was created from.
    pub fn to_new(&self) -> NewSimulation {
        NewSimulation {
            principal: self.principal,
            term_years: self.term_years,
            annual_interest_rate_percent: self.annual_interest_rate_percent,
            loan_type: self.loan_type,
        }
    }

    pub fn terms(&self) -> LoanTerms {
        LoanTerms::new(self.principal, self.annual_interest_rate_percent, self.term_years)
    }
}
