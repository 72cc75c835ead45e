//! Simulation service: the two entry points over store + calculator.
//!
//! simulate(): validate, persist, then compute from the same parameters.
//!   The record is written first. If computation fails afterwards the
//!   record stays; there is no rollback.
//! quote(): validate and compute. Nothing is written.

use crate::{
    config::SimulationLimits,
    error::SimResult,
    simulation::{LoanTerms, NewSimulation, SimulationRecord},
    store::SimulationRepository,
    types::SimulationId,
};
use serde::Serialize;

/// Result of a persisted simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationQuote {
    pub record: SimulationRecord,
    pub monthly_payment: f64,
}

pub struct SimulationService<R: SimulationRepository> {
    repo: R,
    limits: SimulationLimits,
}

impl<R: SimulationRepository> SimulationService<R> {
    pub fn new(repo: R, limits: SimulationLimits) -> Self {
        Self { repo, limits }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Persist the simulation and return its monthly payment.
    pub fn simulate(&self, simulation: &NewSimulation) -> SimResult<SimulationQuote> {
        self.check(&simulation.terms())?;

        let record = self.repo.create(simulation)?;
        let monthly_payment = record.terms().monthly_payment().map_err(|e| {
            log::warn!("simulation {} stored but payment failed: {e}", record.id);
            e
        })?;

        Ok(SimulationQuote {
            record,
            monthly_payment,
        })
    }

    /// Monthly payment for `terms` without persisting anything.
    pub fn quote(&self, terms: &LoanTerms) -> SimResult<f64> {
        self.check(terms)?;
        terms.monthly_payment()
    }

    pub fn find(&self, id: SimulationId) -> SimResult<Option<SimulationRecord>> {
        self.repo.find_by_id(id)
    }

    fn check(&self, terms: &LoanTerms) -> SimResult<()> {
        terms
            .validate()
            .and_then(|_| self.limits.check(terms))
            .map_err(|e| {
                log::warn!("rejected simulation request: {e}");
                e
            })
    }
}
