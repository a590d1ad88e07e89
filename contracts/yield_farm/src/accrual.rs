//! Linear yield accrual.
//!
//! Yield for a window is
//!
//! ```text
//! balance * yield_rate * elapsed / (SECONDS_PER_DAY * YIELD_RATE_SCALE)
//! ```
//!
//! where `yield_rate` is reward units per staked unit per day, scaled by
//! [`YIELD_RATE_SCALE`]. The product is never formed directly: both
//! divisions are split into quotient and remainder so the only values that
//! can overflow are the yield itself and `balance * elapsed / SECONDS_PER_DAY`.
//!
//! Each settlement pays whole reward units and keeps the sub-unit remainder
//! in `Account::yield_carry`, so settling often never pays less than
//! settling once over the same span.

use soroban_sdk::Env;

use crate::clock;
use crate::ledger::Account;
use crate::ContractError;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Fixed-point scale of `yield_rate`. A rate equal to the scale pays one
/// reward unit per staked unit per day.
pub const YIELD_RATE_SCALE: i128 = 1_000_000_000;

/// Highest accepted `yield_rate`: 1 000 reward units per staked unit per day.
pub const MAX_YIELD_RATE: i128 = 1_000 * YIELD_RATE_SCALE;

const DAY: i128 = SECONDS_PER_DAY as i128;

/// Denominator of the formula; also the modulus of `yield_carry`.
const UNIT: i128 = DAY * YIELD_RATE_SCALE;

/// Yield earned by `balance` over `elapsed` seconds at `yield_rate`,
/// plus a carried remainder `carry` (`0 <= carry < UNIT`).
///
/// Returns the whole reward units owed and the new remainder.
pub fn accrue(
    balance: i128,
    yield_rate: i128,
    elapsed: u64,
    carry: i128,
) -> Result<(i128, i128), ContractError> {
    if balance <= 0 || yield_rate <= 0 || elapsed == 0 {
        return Ok((0, carry));
    }
    let elapsed = i128::from(elapsed);

    // balance * elapsed == DAY * staked_days + day_rem
    let partial = (balance % DAY) * elapsed;
    let staked_days = (balance / DAY)
        .checked_mul(elapsed)
        .and_then(|v| v.checked_add(partial / DAY))
        .ok_or(ContractError::ArithmeticOverflow)?;
    let day_rem = partial % DAY;

    // staked_days * yield_rate / SCALE, with the sub-day remainder folded in.
    let whole = (staked_days / YIELD_RATE_SCALE)
        .checked_mul(yield_rate)
        .ok_or(ContractError::ArithmeticOverflow)?;
    let numerator = ((staked_days % YIELD_RATE_SCALE) * DAY + day_rem)
        .checked_mul(yield_rate)
        .and_then(|v| v.checked_add(carry))
        .ok_or(ContractError::ArithmeticOverflow)?;

    let amount = whole
        .checked_add(numerator / UNIT)
        .ok_or(ContractError::ArithmeticOverflow)?;
    Ok((amount, numerator % UNIT))
}

/// Yield earned by `balance` over `elapsed` seconds, rounded toward zero.
pub fn compute_yield(balance: i128, yield_rate: i128, elapsed: u64) -> Result<i128, ContractError> {
    accrue(balance, yield_rate, elapsed, 0).map(|(amount, _)| amount)
}

fn accrue_window(
    env: &Env,
    account: &Account,
    yield_rate: i128,
) -> Result<(i128, i128), ContractError> {
    accrue(
        account.balance,
        yield_rate,
        clock::elapsed(env, Some(account)),
        account.yield_carry,
    )
}

/// Yield accrued in the account's open window, without touching state.
pub fn window_yield(
    env: &Env,
    account: Option<&Account>,
    yield_rate: i128,
) -> Result<i128, ContractError> {
    match account {
        Some(account) => accrue_window(env, account, yield_rate).map(|(amount, _)| amount),
        None => Ok(0),
    }
}

/// Settle the open window into `unclaimed_yield` and reset the clock.
///
/// Must run before any change to `balance` so the window is priced on the
/// principal that was actually staked during it. Returns the yield accrued
/// in this window.
pub fn settle(env: &Env, account: &mut Account, yield_rate: i128) -> Result<i128, ContractError> {
    let (accrued, carry) = accrue_window(env, account, yield_rate)?;
    account.unclaimed_yield = account
        .unclaimed_yield
        .checked_add(accrued)
        .ok_or(ContractError::ArithmeticOverflow)?;
    account.yield_carry = carry;
    clock::reset(env, account);
    Ok(accrued)
}

/// Settle, then drain everything the account is owed.
pub fn harvest(env: &Env, account: &mut Account, yield_rate: i128) -> Result<i128, ContractError> {
    settle(env, account, yield_rate)?;
    let owed = account.unclaimed_yield;
    account.unclaimed_yield = 0;
    Ok(owed)
}
