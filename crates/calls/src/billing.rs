//! Billing estimate for a service day.
//!
//! Two-term linear formula: a base fee for the first active call plus a flat
//! fee per additional active call. Money is in integer cents.

use serde::{Deserialize, Serialize};

/// Fee for the first active call of the day.
pub const BASE_FEE_INITIAL_CALL_CENTS: u64 = 12_000;
/// Fee for each active call beyond the first.
pub const FEE_PER_EXTRA_ACTIVE_CENTS: u64 = 2_000;
/// Minutes covered by the base fee before overrun applies.
pub const TIME_LIMIT_INITIAL_MINUTES: u64 = 120;
/// Fee per started hour beyond the covered window.
pub const FEE_PER_EXTRA_HOUR_CENTS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingEstimate {
    pub base_fee_cents: u64,
    pub extra_active_fee_cents: u64,
    pub active_count: u64,
    pub total_fee_cents: u64,
}

/// Estimate the day's fee from the number of active calls.
///
/// Counts are normalized to >= 0; the formula is monotone in the count.
pub fn calculate_billing(active_count: usize) -> BillingEstimate {
    let active_count = active_count as u64;
    let extra = active_count.saturating_sub(1);
    let extra_active_fee_cents = extra * FEE_PER_EXTRA_ACTIVE_CENTS;

    BillingEstimate {
        base_fee_cents: BASE_FEE_INITIAL_CALL_CENTS,
        extra_active_fee_cents,
        active_count,
        total_fee_cents: BASE_FEE_INITIAL_CALL_CENTS + extra_active_fee_cents,
    }
}

/// Overrun fee for time beyond the covered window, per started hour.
pub fn time_overrun_fee_cents(total_minutes: u64) -> u64 {
    let overrun = total_minutes.saturating_sub(TIME_LIMIT_INITIAL_MINUTES);
    let started_hours = overrun.div_ceil(60);
    started_hours * FEE_PER_EXTRA_HOUR_CENTS
}
