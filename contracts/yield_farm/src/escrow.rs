//! Stake-token custody.
//!
//! Deposits are pulled with `transfer_from`, the farm acting as spender, so
//! the staker must `approve` the farm beforehand. Any failure of the token
//! call, including a missing allowance, surfaces as `TransferFailed`.

use soroban_sdk::{token, Address, Env};

use crate::ContractError;

/// Move `amount` from `from` into the farm.
pub fn pull(
    env: &Env,
    stake_token: &Address,
    from: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    let farm = env.current_contract_address();
    let client = token::TokenClient::new(env, stake_token);
    match client.try_transfer_from(&farm, from, &farm, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}

/// Return `amount` of principal from the farm to `to`.
pub fn release(
    env: &Env,
    stake_token: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    let farm = env.current_contract_address();
    match token::TokenClient::new(env, stake_token).try_transfer(&farm, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}
