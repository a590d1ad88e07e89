#![no_std]

pub mod accrual;
pub mod clock;
pub mod escrow;
pub mod events;
pub mod ledger;
pub mod minter;

use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, Symbol};

use ledger::Account;
use minter::MintCapability;

pub use accrual::{MAX_YIELD_RATE, SECONDS_PER_DAY, YIELD_RATE_SCALE};

// ── Storage key constants ────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidAmount = 3,
    InsufficientBalance = 4,
    TransferFailed = 5,
    MintUnauthorized = 6,
    ArithmeticOverflow = 7,
    InvalidRate = 8,
    TokensIdentical = 9,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Immutable farm parameters written by `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FarmConfig {
    /// SEP-41 token users deposit as principal.
    pub stake_token: Address,
    /// Token minted as yield; the farm must be its admin to pay out.
    pub reward_token: Address,
    /// Reward units per staked unit per day, scaled by `YIELD_RATE_SCALE`.
    pub yield_rate: i128,
}

/// Snapshot of a user's position returned by `get_staker_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerInfo {
    pub staked: i128,
    pub is_staking: bool,
    pub yield_time: u64,
    /// Open-window yield plus yield carried from earlier settlements.
    pub pending_yield: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct YieldFarmContract;

#[contractimpl]
impl YieldFarmContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the farm.
    ///
    /// * `stake_token`  – SEP-41 token users stake.
    /// * `reward_token` – mintable token paid as yield.
    /// * `yield_rate`   – reward units per staked unit per day, scaled by
    ///   `YIELD_RATE_SCALE`, at most `MAX_YIELD_RATE`.
    pub fn initialize(
        env: Env,
        stake_token: Address,
        reward_token: Address,
        yield_rate: i128,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&CONFIG) {
            return Err(ContractError::AlreadyInitialized);
        }
        if !(0..=MAX_YIELD_RATE).contains(&yield_rate) {
            return Err(ContractError::InvalidRate);
        }
        if stake_token == reward_token {
            return Err(ContractError::TokensIdentical);
        }

        let config = FarmConfig {
            stake_token: stake_token.clone(),
            reward_token: reward_token.clone(),
            yield_rate,
        };
        env.storage().instance().set(&CONFIG, &config);

        events::publish_initialized(&env, stake_token, reward_token, yield_rate);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens.
    ///
    /// The staker must have approved the farm for at least `amount`. Yield
    /// for the window that just closed is settled on the old balance first.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        let config = Self::load_config(&env)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        // 1. Settle against the pre-deposit balance.
        let mut account = ledger::load_or_open(&env, &staker);
        accrual::settle(&env, &mut account, config.yield_rate)?;

        // 2. Effects: credit and persist before touching the token.
        let new_total = ledger::credit(&env, &mut account, amount)?;
        ledger::store_account(&env, &staker, &account);

        // 3. Interaction: pull the principal into escrow.
        escrow::pull(&env, &config.stake_token, &staker, amount)?;

        events::publish_staked(&env, staker, amount, account.balance, new_total);

        Ok(())
    }

    // ── Unstaking ───────────────────────────────────────────────────────────

    /// Return `amount` of principal to the staker.
    ///
    /// Yield accrued so far is settled and kept for the next
    /// `withdraw_yield`; a partial unstake forfeits nothing.
    pub fn unstake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        let config = Self::load_config(&env)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let mut account = ledger::load_or_open(&env, &staker);
        if amount > account.balance {
            return Err(ContractError::InsufficientBalance);
        }

        // 1. Settle against the pre-withdrawal balance.
        accrual::settle(&env, &mut account, config.yield_rate)?;

        // 2. Effects.
        let new_total = ledger::debit(&env, &mut account, amount)?;
        ledger::store_account(&env, &staker, &account);

        // 3. Interaction.
        escrow::release(&env, &config.stake_token, &staker, amount)?;

        events::publish_unstaked(&env, staker, amount, account.balance, new_total);

        Ok(())
    }

    // ── Yield ───────────────────────────────────────────────────────────────

    /// Mint everything `staker` has accrued and reset their clock.
    ///
    /// Fails with `MintUnauthorized` unless the farm is the reward token's
    /// admin. With nothing accrued the call still succeeds, resets the clock
    /// and returns 0.
    pub fn withdraw_yield(env: Env, staker: Address) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        staker.require_auth();

        let capability = MintCapability::acquire(&env, &config.reward_token)?;

        let mut account = ledger::load_or_open(&env, &staker);
        let owed = accrual::harvest(&env, &mut account, config.yield_rate)?;

        // Clock and carried yield are reset before the mint call.
        ledger::store_account(&env, &staker, &account);

        if owed > 0 {
            capability.mint(&env, &staker, owed)?;
        }

        events::publish_yield_withdrawn(&env, staker, owed);

        Ok(owed)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn is_staking(env: Env, staker: Address) -> bool {
        ledger::load_account(&env, &staker)
            .map(|a| a.is_staking())
            .unwrap_or(false)
    }

    pub fn staking_balance(env: Env, staker: Address) -> i128 {
        ledger::load_account(&env, &staker)
            .map(|a| a.balance)
            .unwrap_or(0)
    }

    /// Seconds since the staker's last settlement; 0 for unknown addresses.
    pub fn calculate_yield_time(env: Env, staker: Address) -> u64 {
        let account = ledger::load_account(&env, &staker);
        clock::elapsed(&env, account.as_ref())
    }

    /// Yield accrued in the staker's current window.
    ///
    /// Excludes `unclaimed_yield`: yield settled by an earlier `stake` or
    /// `unstake` is carried separately and minted by the next
    /// `withdraw_yield` on top of this amount, the same way a carried reward
    /// balance is paid out alongside the live window. Use
    /// `get_staker_info().pending_yield` for the total a withdrawal mints.
    pub fn calculate_yield_total(env: Env, staker: Address) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        let account = ledger::load_account(&env, &staker);
        accrual::window_yield(&env, account.as_ref(), config.yield_rate)
    }

    /// Yield settled by earlier stakes or unstakes and not yet minted.
    pub fn unclaimed_yield(env: Env, staker: Address) -> i128 {
        ledger::load_account(&env, &staker)
            .map(|a| a.unclaimed_yield)
            .unwrap_or(0)
    }

    /// Return the combined position for a user.
    ///
    /// `pending_yield` is exactly what `withdraw_yield` would mint now.
    pub fn get_staker_info(env: Env, staker: Address) -> Result<StakerInfo, ContractError> {
        let config = Self::load_config(&env)?;
        let account = ledger::load_account(&env, &staker);

        let window = accrual::window_yield(&env, account.as_ref(), config.yield_rate)?;
        let Account {
            balance,
            unclaimed_yield,
            ..
        } = account.clone().unwrap_or_default();
        let pending_yield = unclaimed_yield
            .checked_add(window)
            .ok_or(ContractError::ArithmeticOverflow)?;

        Ok(StakerInfo {
            staked: balance,
            is_staking: balance > 0,
            yield_time: clock::elapsed(&env, account.as_ref()),
            pending_yield,
        })
    }

    /// Return the sum of all staked principal held in escrow.
    pub fn get_total_staked(env: Env) -> i128 {
        ledger::total_staked(&env)
    }

    pub fn get_config(env: Env) -> Result<FarmConfig, ContractError> {
        Self::load_config(&env)
    }

    /// Whether the farm currently holds minting authority over the reward token.
    pub fn has_mint_authority(env: Env) -> bool {
        match Self::load_config(&env) {
            Ok(config) => minter::holds_authority(&env, &config.reward_token),
            Err(_) => false,
        }
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&CONFIG)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn load_config(env: &Env) -> Result<FarmConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
