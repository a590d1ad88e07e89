//! Per-account settlement clock.

use soroban_sdk::Env;

use crate::ledger::Account;

pub fn now(env: &Env) -> u64 {
    env.ledger().timestamp()
}

/// Seconds since the account was last settled.
///
/// An address that has never interacted has no open window and reports 0.
pub fn elapsed(env: &Env, account: Option<&Account>) -> u64 {
    match account {
        Some(account) => now(env).saturating_sub(account.last_settlement),
        None => 0,
    }
}

/// Close the current window. The timestamp never moves backwards.
pub fn reset(env: &Env, account: &mut Account) {
    account.last_settlement = account.last_settlement.max(now(env));
}
