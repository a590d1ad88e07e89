//! Minting authority over the reward token.
//!
//! The reward token is any contract exposing `admin` and `mint` with the
//! Stellar Asset Contract signatures. Only its admin may mint, so the farm
//! can pay yield only after the current admin hands that role to the farm
//! (`set_admin(farm)` on a SAC).

use soroban_sdk::{contractclient, Address, Env};

use crate::ContractError;

/// The subset of the reward token's interface the farm depends on.
#[contractclient(name = "MintableTokenClient")]
pub trait MintableToken {
    fn admin(env: Env) -> Address;
    fn mint(env: Env, to: Address, amount: i128);
}

/// Proof that this contract is the reward token's minter.
///
/// Obtainable only through [`MintCapability::acquire`]; the accrual path
/// mints exclusively through it.
pub struct MintCapability {
    token: Address,
}

impl MintCapability {
    pub fn acquire(env: &Env, reward_token: &Address) -> Result<Self, ContractError> {
        if !holds_authority(env, reward_token) {
            return Err(ContractError::MintUnauthorized);
        }
        Ok(MintCapability {
            token: reward_token.clone(),
        })
    }

    pub fn mint(&self, env: &Env, to: &Address, amount: i128) -> Result<(), ContractError> {
        match MintableTokenClient::new(env, &self.token).try_mint(to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::MintUnauthorized),
        }
    }
}

/// Whether the reward token currently names this contract as its admin.
pub fn holds_authority(env: &Env, reward_token: &Address) -> bool {
    match MintableTokenClient::new(env, reward_token).try_admin() {
        Ok(Ok(admin)) => admin == env.current_contract_address(),
        _ => false,
    }
}
