//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The service and the runner go through `SimulationRepository`.

use crate::{
    config::DatabaseConfig,
    config::DEFAULT_BUSY_TIMEOUT_MS,
    error::{SimError, SimResult},
    simulation::{NewSimulation, SimulationRecord},
    types::{LoanType, SimulationId},
};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

/// Create-then-read access to persisted simulations.
pub trait SimulationRepository {
    /// Persist `simulation` and return it with its newly assigned id.
    fn create(&self, simulation: &NewSimulation) -> SimResult<SimulationRecord>;

    fn find_by_id(&self, id: SimulationId) -> SimResult<Option<SimulationRecord>>;
}

pub struct SimulationStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
    busy_timeout: Duration,
}

impl SimulationStore {
    pub fn open(path: &str) -> SimResult<Self> {
        Self::open_with_timeout(path, Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))
    }

    pub fn from_config(config: &DatabaseConfig) -> SimResult<Self> {
        if config.path == ":memory:" {
            return Self::in_memory();
        }
        Self::open_with_timeout(&config.path, Duration::from_millis(config.busy_timeout_ms))
    }

    fn open_with_timeout(path: &str, busy_timeout: Duration) -> SimResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // Writers on other connections wait instead of failing with SQLITE_BUSY.
        conn.busy_timeout(busy_timeout)?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self {
            conn,
            path: Some(path.to_string()),
            busy_timeout,
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self {
            conn,
            path: None,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        })
    }

    /// Open a new connection to the same database, for use on another thread.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    pub fn reopen(&self) -> SimResult<Self> {
        match &self.path {
            Some(p) => Self::open_with_timeout(p, self.busy_timeout),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_credit_simulation.sql"))?;
        Ok(())
    }

    pub fn count(&self) -> SimResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM credit_simulation", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl SimulationRepository for SimulationStore {
    fn create(&self, simulation: &NewSimulation) -> SimResult<SimulationRecord> {
        simulation.validate()?;

        self.conn.execute(
            "INSERT INTO credit_simulation (principal, term_years, annual_interest_rate_percent, loan_type)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                simulation.principal.to_string(),
                simulation.term_years,
                simulation.annual_interest_rate_percent.to_string(),
                simulation.loan_type.code(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();

        log::info!(
            "simulation {id} stored: principal={} years={} rate={}% loan_type={:?}",
            simulation.principal,
            simulation.term_years,
            simulation.annual_interest_rate_percent,
            simulation.loan_type
        );
        Ok(SimulationRecord::from_new(id, simulation))
    }

    fn find_by_id(&self, id: SimulationId) -> SimResult<Option<SimulationRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, principal, term_years, annual_interest_rate_percent, loan_type
                 FROM credit_simulation WHERE id = ?1",
                params![id],
                |row| {
                    Ok(StoredRow {
                        id: row.get(0)?,
                        principal: row.get(1)?,
                        term_years: row.get(2)?,
                        annual_interest_rate_percent: row.get(3)?,
                        loan_type: row.get(4)?,
                    })
                },
            )
            .optional()?;
        row.map(StoredRow::decode).transpose()
    }
}

/// Raw column values, decoded into a record after the query completes.
struct StoredRow {
    id: SimulationId,
    principal: String,
    term_years: i64,
    annual_interest_rate_percent: String,
    loan_type: i64,
}

impl StoredRow {
    fn decode(self) -> SimResult<SimulationRecord> {
        let id = self.id;
        let principal = Decimal::from_str(&self.principal).map_err(|e| {
            SimError::InvalidData(format!("simulation {id}: principal {:?}: {e}", self.principal))
        })?;
        let annual_interest_rate_percent = Decimal::from_str(&self.annual_interest_rate_percent)
            .map_err(|e| {
                SimError::InvalidData(format!(
                    "simulation {id}: rate {:?}: {e}",
                    self.annual_interest_rate_percent
                ))
            })?;
        let record = SimulationRecord {
            id,
            principal,
            term_years: self.term_years,
            annual_interest_rate_percent,
            loan_type: LoanType(self.loan_type),
        };
        record
            .terms()
            .validate()
            .map_err(|e| SimError::InvalidData(format!("simulation {id}: {e}")))?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migrated() -> SimulationStore {
        let store = SimulationStore::in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    #[test]
    fn migrate_is_idempotent() {
        let store = migrated();
        store.migrate().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn corrupt_principal_is_invalid_data() {
        let store = migrated();
        store
            .conn
            .execute(
                "INSERT INTO credit_simulation (principal, term_years, annual_interest_rate_percent, loan_type)
                 VALUES ('lots', 20, '4.5', 1)",
                [],
            )
            .unwrap();
        let id = store.conn.last_insert_rowid();
        assert!(matches!(store.find_by_id(id), Err(SimError::InvalidData(_))));
    }

    #[test]
    fn loan_type_outside_catalog_reads_back_as_is() {
        let store = migrated();
        store
            .conn
            .execute(
                "INSERT INTO credit_simulation (principal, term_years, annual_interest_rate_percent, loan_type)
                 VALUES ('1000', 20, '4.5', 42)",
                [],
            )
            .unwrap();
        let id = store.conn.last_insert_rowid();
        let record = store.find_by_id(id).unwrap().unwrap();
        assert_eq!(record.loan_type, LoanType(42));
    }

    #[test]
    fn schema_rejects_non_positive_term() {
        let store = migrated();
        let result = store.conn.execute(
            "INSERT INTO credit_simulation (principal, term_years, annual_interest_rate_percent, loan_type)
             VALUES ('1000', 0, '4.5', 1)",
            [],
        );
        assert!(result.is_err());
    }
}
