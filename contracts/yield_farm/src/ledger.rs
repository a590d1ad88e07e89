//! Per-account staking records and the escrow total.
//!
//! Every account lives in persistent storage under `(ACCT, address)`. The
//! instance-level `TOT_STK` counter mirrors the sum of all balances and,
//! by construction, the stake tokens held by the contract.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ContractError;

const ACCOUNT: Symbol = symbol_short!("ACCT");
const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");

/// A staker's position.
///
/// `is_staking` is not stored: it is `balance > 0` by definition.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Account {
    /// Staked principal in stake-token base units.
    pub balance: i128,
    /// Ledger timestamp of the last settlement.
    pub last_settlement: u64,
    /// Yield settled on a balance change but not yet minted.
    pub unclaimed_yield: i128,
    /// Sub-unit remainder of past settlements, in units of
    /// `1 / (SECONDS_PER_DAY * YIELD_RATE_SCALE)` reward units.
    pub yield_carry: i128,
}

impl Account {
    /// A fresh record for an address that has never interacted.
    pub fn opened_at(now: u64) -> Self {
        Account {
            balance: 0,
            last_settlement: now,
            unclaimed_yield: 0,
            yield_carry: 0,
        }
    }

    pub fn is_staking(&self) -> bool {
        self.balance > 0
    }
}

fn account_key(who: &Address) -> (Symbol, Address) {
    (ACCOUNT, who.clone())
}

pub fn load_account(env: &Env, who: &Address) -> Option<Account> {
    env.storage().persistent().get(&account_key(who))
}

/// Load the record for `who`, opening one at the current ledger time if absent.
pub fn load_or_open(env: &Env, who: &Address) -> Account {
    load_account(env, who).unwrap_or_else(|| Account::opened_at(env.ledger().timestamp()))
}

pub fn store_account(env: &Env, who: &Address, account: &Account) {
    env.storage().persistent().set(&account_key(who), account);
}

pub fn total_staked(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
}

fn set_total_staked(env: &Env, total: i128) {
    env.storage().instance().set(&TOTAL_STAKED, &total);
}

/// Add `amount` to the account and the escrow total. Returns the new total.
///
/// Nothing is written if either addition overflows; the caller persists the
/// account record itself.
pub fn credit(env: &Env, account: &mut Account, amount: i128) -> Result<i128, ContractError> {
    let new_balance = account
        .balance
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    let new_total = total_staked(env)
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;

    account.balance = new_balance;
    set_total_staked(env, new_total);
    Ok(new_total)
}

/// Remove `amount` from the account and the escrow total. Returns the new total.
pub fn debit(env: &Env, account: &mut Account, amount: i128) -> Result<i128, ContractError> {
    if amount > account.balance {
        return Err(ContractError::InsufficientBalance);
    }
    let new_balance = account
        .balance
        .checked_sub(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    let new_total = total_staked(env)
        .checked_sub(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;

    account.balance = new_balance;
    set_total_staked(env, new_total);
    Ok(new_total)
}
