//! Amortization calculator.
//!
//! Fixed-rate, fully amortizing loan, monthly payments:
//!
//!   r = annual_rate_percent / 12 / 100
//!   n = term_years * 12
//!   M = P * r * (1+r)^n / ((1+r)^n - 1)
//!
//! M is evaluated as P * r / (1 - (1+r)^-n) through ln_1p/exp_m1. Same value,
//! but tiny rates keep a non-zero denominator and large rates cannot overflow.
//! A zero rate has no formula value and is special-cased to P / n.

use crate::error::{SimError, SimResult};

pub const MONTHS_PER_YEAR: i64 = 12;

/// Monthly payment for a loan of `principal` at `annual_rate_percent`
/// (4.5 means 4.5 %) over `term_years`. The result is not rounded.
pub fn compute_monthly_payment(
    principal: f64,
    annual_rate_percent: f64,
    term_years: i64,
) -> SimResult<f64> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(SimError::invalid(
            "principal",
            format!("must be positive and finite, got {principal}"),
        ));
    }
    if term_years <= 0 {
        return Err(SimError::invalid(
            "term_years",
            format!("must be positive, got {term_years}"),
        ));
    }
    if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
        return Err(SimError::invalid(
            "annual_rate_percent",
            format!("must be non-negative and finite, got {annual_rate_percent}"),
        ));
    }

    let monthly_rate = annual_rate_percent / 12.0 / 100.0;
    let payments = term_years as f64 * MONTHS_PER_YEAR as f64;

    let payment = if monthly_rate == 0.0 {
        principal / payments
    } else {
        // 1 - (1+r)^-n, always in (0, 1] for r > 0
        let paid_fraction = -(-payments * monthly_rate.ln_1p()).exp_m1();
        principal * monthly_rate / paid_fraction
    };

    if !payment.is_finite() || payment <= 0.0 {
        return Err(SimError::invalid(
            "principal",
            format!("monthly payment {payment} is not representable for these terms"),
        ));
    }

    log::debug!(
        "monthly payment: principal={principal} rate={annual_rate_percent}% years={term_years} -> {payment}"
    );
    Ok(payment)
}

/// Round a payment for presentation. The calculator itself never rounds.
pub fn round_for_display(payment: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (payment * factor).round() / factor
}
