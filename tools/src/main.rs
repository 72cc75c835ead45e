//! simulation-runner: headless front end for the credit simulation core.
//!
//! Usage:
//!   simulation-runner --principal 100000000 --rate 4.5 --years 20
//!   simulation-runner --principal 100000000 --rate 4.5 --years 20 --loan-type 1 --persist
//!   simulation-runner --ipc-mode --db simulations.db

use anyhow::{Context, Result};
use credit_simulation_core::{
    calculator::round_for_display,
    config::SimulationConfig,
    error::SimError,
    service::SimulationService,
    simulation::{LoanTerms, NewSimulation},
    store::{SimulationRepository, SimulationStore},
    types::{LoanType, SimulationId},
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::env;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    Simulate(NewSimulation),
    Compute(LoanTerms),
    Get { id: SimulationId },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let persist = args.iter().any(|a| a == "--persist");
    let data_dir = find_arg(&args, "--data-dir").unwrap_or("./data");

    let mut config = SimulationConfig::load(data_dir)?;
    if let Some(db) = find_arg(&args, "--db") {
        config.database.path = db.to_string();
    }

    let store = SimulationStore::from_config(&config.database)
        .with_context(|| format!("opening {}", config.database.path))?;
    store.migrate()?;
    let service = SimulationService::new(store, config.limits);

    if ipc_mode {
        run_ipc_loop(&service)
    } else {
        run_once(&service, &args, persist)
    }
}

fn run_once<R: SimulationRepository>(
    service: &SimulationService<R>,
    args: &[String],
    persist: bool,
) -> Result<()> {
    let principal: Decimal = require_arg(args, "--principal")?;
    let rate: Decimal = require_arg(args, "--rate")?;
    let term_years: i64 = require_arg(args, "--years")?;

    if persist {
        let simulation = NewSimulation {
            principal,
            term_years,
            annual_interest_rate_percent: rate,
            loan_type: loan_type_arg(args)?,
        };
        let quote = service.simulate(&simulation)?;
        println!("=== SIMULATION {} ===", quote.record.id);
        print_payment(&quote.record.terms(), quote.monthly_payment);
    } else {
        let terms = LoanTerms::new(principal, rate, term_years);
        let payment = service.quote(&terms)?;
        print_payment(&terms, payment);
    }
    Ok(())
}

fn print_payment(terms: &LoanTerms, payment: f64) {
    println!("  principal:       {}", terms.principal);
    println!("  term:            {} years", terms.term_years);
    println!("  annual rate:     {}%", terms.annual_interest_rate_percent);
    println!("  monthly payment: {payment}");
    println!("  rounded:         {:.0}", round_for_display(payment, 0));
}

fn run_ipc_loop<R: SimulationRepository>(service: &SimulationService<R>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        match handle_line(service, &buffer) {
            Some(response) => {
                writeln!(stdout, "{response}")?;
                stdout.flush()?;
            }
            None => break,
        }
    }
    Ok(())
}

/// Answer one request line. `None` means the client asked to quit.
fn handle_line<R: SimulationRepository>(service: &SimulationService<R>, line: &str) -> Option<Value> {
    let request: IpcRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("malformed request: {e}");
            return Some(json!({ "error": e.to_string(), "kind": "malformed_request" }));
        }
    };

    let response = match request {
        IpcRequest::Quit => return None,
        IpcRequest::Simulate(simulation) => service.simulate(&simulation).map(|quote| {
            json!({ "id": quote.record.id, "monthly_payment": quote.monthly_payment })
        }),
        IpcRequest::Compute(terms) => service
            .quote(&terms)
            .map(|payment| json!({ "monthly_payment": payment })),
        IpcRequest::Get { id } => service.find(id).map(|record| json!({ "record": record })),
    };

    Some(response.unwrap_or_else(|e| error_response(&e)))
}

fn error_response(err: &SimError) -> Value {
    json!({ "error": err.to_string(), "kind": err.kind() })
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn require_arg<T: FromStr>(args: &[String], flag: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    let raw = find_arg(args, flag).with_context(|| format!("missing required {flag}"))?;
    raw.parse()
        .map_err(|e| anyhow::anyhow!("invalid value for {flag} ({raw}): {e}"))
}

/// `--loan-type` is persisted, so a bad value is an error, not a default.
fn loan_type_arg(args: &[String]) -> Result<LoanType> {
    let code = find_arg(args, "--loan-type")
        .map(|raw| {
            raw.parse::<i64>()
                .with_context(|| format!("invalid value for --loan-type ({raw})"))
        })
        .transpose()?;
    Ok(code.map(LoanType).unwrap_or_default())
}
