//! Amortization calculator properties.

use credit_simulation_core::{calculator::compute_monthly_payment, error::SimError};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

const SEED: u64 = 0x5EED_CAFE_F00D_0001;
const SAMPLES: usize = 2_000;

fn rng() -> Pcg64Mcg {
    Pcg64Mcg::seed_from_u64(SEED)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}

/// 100,000,000 over 20 years at 4.5 % is the reference quote.
#[test]
fn reference_quote_matches() {
    let payment = compute_monthly_payment(100_000_000.0, 4.5, 20).unwrap();
    assert!(
        close(payment, 632_649.376_219_970_8),
        "expected 632649.3762199708, got {payment}"
    );
}

#[test]
fn valid_inputs_give_positive_finite_payment() {
    let mut rng = rng();
    for _ in 0..SAMPLES {
        let principal = rng.gen_range(0.01..1e12);
        let rate = rng.gen_range(0.0..100.0);
        let years = rng.gen_range(1..=50i64);

        let payment = compute_monthly_payment(principal, rate, years).unwrap();
        assert!(
            payment.is_finite() && payment > 0.0,
            "P={principal} rate={rate} years={years} -> {payment}"
        );
    }
}

#[test]
fn zero_rate_is_straight_line() {
    let mut rng = rng();
    for _ in 0..SAMPLES {
        let principal = rng.gen_range(1.0..1e10);
        let years = rng.gen_range(1..=40i64);

        let payment = compute_monthly_payment(principal, 0.0, years).unwrap();
        assert!(close(payment, principal / (years * 12) as f64));
    }
}

#[test]
fn payment_increases_with_rate() {
    let mut rng = rng();
    for _ in 0..SAMPLES {
        let principal = rng.gen_range(1_000.0..1e9);
        let years = rng.gen_range(1..=40i64);
        let low = rng.gen_range(0.0..50.0);
        let high = low + rng.gen_range(0.05..10.0);

        let a = compute_monthly_payment(principal, low, years).unwrap();
        let b = compute_monthly_payment(principal, high, years).unwrap();
        assert!(b > a, "P={principal} years={years}: {low}% -> {a}, {high}% -> {b}");
    }
}

#[test]
fn payment_decreases_with_term() {
    let mut rng = rng();
    for _ in 0..SAMPLES {
        let principal = rng.gen_range(1_000.0..1e9);
        let rate = rng.gen_range(0.1..30.0);
        let short = rng.gen_range(1..=35i64);
        let long = short + rng.gen_range(1..=5i64);

        let a = compute_monthly_payment(principal, rate, short).unwrap();
        let b = compute_monthly_payment(principal, rate, long).unwrap();
        assert!(b < a, "P={principal} rate={rate}: {short}y -> {a}, {long}y -> {b}");
    }
}

#[test]
fn negative_principal_rejected() {
    assert!(matches!(
        compute_monthly_payment(-1.0, 4.5, 20),
        Err(SimError::InvalidArgument { field: "principal", .. })
    ));
}

#[test]
fn zero_term_rejected() {
    assert!(matches!(
        compute_monthly_payment(100.0, 4.5, 0),
        Err(SimError::InvalidArgument { field: "term_years", .. })
    ));
}

#[test]
fn negative_term_rejected() {
    assert!(matches!(
        compute_monthly_payment(100.0, 4.5, -5),
        Err(SimError::InvalidArgument { field: "term_years", .. })
    ));
}

#[test]
fn negative_rate_rejected() {
    assert!(matches!(
        compute_monthly_payment(100.0, -0.5, 10),
        Err(SimError::InvalidArgument { field: "annual_rate_percent", .. })
    ));
}

#[test]
fn deterministic() {
    let a = compute_monthly_payment(250_000.0, 6.25, 30).unwrap();
    let b = compute_monthly_payment(250_000.0, 6.25, 30).unwrap();
    assert_eq!(a.to_bits(), b.to_bits());
}
