#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for the staking ledger.
//!
//! Invariants tested:
//! - `stake(x)` raises the balance by exactly `x` and sets `is_staking`
//! - `unstake` above the balance is always rejected and changes nothing
//! - `stake(x)` then `unstake(x)` restores the previous balance
//! - After any sequence of operations, the escrow balance, `get_total_staked`
//!   and the sum of account balances agree, and `is_staking == balance > 0`

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use yield_farm::{ContractError, YIELD_RATE_SCALE};

use crate::common::Farm;

const STAKERS: usize = 3;
const FUNDS: i128 = 10_000;

#[derive(Arbitrary, Debug, Clone)]
enum Op {
    Stake {
        #[proptest(strategy = "0usize..STAKERS")]
        who: usize,
        #[proptest(strategy = "-5i128..=2_500i128")]
        amount: i128,
    },
    Unstake {
        #[proptest(strategy = "0usize..STAKERS")]
        who: usize,
        #[proptest(strategy = "-5i128..=2_500i128")]
        amount: i128,
    },
    WithdrawYield {
        #[proptest(strategy = "0usize..STAKERS")]
        who: usize,
    },
    Advance {
        #[proptest(strategy = "0u64..=172_800u64")]
        seconds: u64,
    },
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Staking any positive amount raises the balance by exactly that amount.
    #[test]
    fn prop_stake_increases_balance_exactly(
        prior in 0i128..=5_000i128,
        amount in 1i128..=5_000i128,
    ) {
        let farm = Farm::new(YIELD_RATE_SCALE);
        let staker = farm.staker(prior + amount);

        if prior > 0 {
            farm.client.stake(&staker, &prior);
        }
        farm.client.stake(&staker, &amount);

        prop_assert_eq!(farm.client.staking_balance(&staker), prior + amount);
        prop_assert!(farm.client.is_staking(&staker));
    }

    /// Unstaking more than the balance fails and leaves the balance alone.
    #[test]
    fn prop_unstake_above_balance_rejected(
        balance in 0i128..=5_000i128,
        excess in 1i128..=5_000i128,
    ) {
        let farm = Farm::new(YIELD_RATE_SCALE);
        let staker = farm.staker(balance.max(1));
        if balance > 0 {
            farm.client.stake(&staker, &balance);
        }

        match farm.client.try_unstake(&staker, &(balance + excess)) {
            Err(Ok(e)) => prop_assert_eq!(e, ContractError::InsufficientBalance),
            _ => prop_assert!(false, "Expected InsufficientBalance error"),
        }
        prop_assert_eq!(farm.client.staking_balance(&staker), balance);
    }

    /// `stake(x)` followed by `unstake(x)` is a round trip on the balance.
    #[test]
    fn prop_stake_unstake_round_trip(
        prior in 0i128..=5_000i128,
        x in 1i128..=5_000i128,
        wait in 0u64..=86_400u64,
    ) {
        let farm = Farm::new(YIELD_RATE_SCALE);
        let staker = farm.staker(prior + x);
        if prior > 0 {
            farm.client.stake(&staker, &prior);
        }
        farm.advance(wait);

        farm.client.stake(&staker, &x);
        farm.client.unstake(&staker, &x);

        prop_assert_eq!(farm.client.staking_balance(&staker), prior);
        prop_assert_eq!(farm.client.is_staking(&staker), prior > 0);
    }

    /// Random operation sequences never break conservation or the derived flag.
    #[test]
    fn prop_random_ops_conserve_escrow(ops in prop::collection::vec(any::<Op>(), 1..24)) {
        let farm = Farm::new(YIELD_RATE_SCALE);
        let stakers: Vec<_> = (0..STAKERS).map(|_| farm.staker(FUNDS)).collect();
        let mut model = [0i128; STAKERS];

        for op in ops {
            match op {
                Op::Stake { who, amount } => {
                    let result = farm.client.try_stake(&stakers[who], &amount);
                    let wallet = FUNDS - model[who];
                    if amount <= 0 {
                        prop_assert!(matches!(result, Err(Ok(ContractError::InvalidAmount))));
                    } else if amount > wallet {
                        prop_assert!(matches!(result, Err(Ok(ContractError::TransferFailed))));
                    } else {
                        prop_assert!(result.is_ok());
                        model[who] += amount;
                    }
                }
                Op::Unstake { who, amount } => {
                    let result = farm.client.try_unstake(&stakers[who], &amount);
                    if amount <= 0 {
                        prop_assert!(matches!(result, Err(Ok(ContractError::InvalidAmount))));
                    } else if amount > model[who] {
                        prop_assert!(matches!(result, Err(Ok(ContractError::InsufficientBalance))));
                    } else {
                        prop_assert!(result.is_ok());
                        model[who] -= amount;
                    }
                }
                Op::WithdrawYield { who } => {
                    prop_assert!(farm.client.try_withdraw_yield(&stakers[who]).is_ok());
                }
                Op::Advance { seconds } => farm.advance(seconds),
            }

            let mut sum = 0i128;
            for (i, staker) in stakers.iter().enumerate() {
                let balance = farm.client.staking_balance(staker);
                prop_assert_eq!(balance, model[i]);
                prop_assert_eq!(farm.client.is_staking(staker), balance > 0);
                sum += balance;
            }
            prop_assert_eq!(farm.client.get_total_staked(), sum);
            prop_assert_eq!(farm.escrow_balance(), sum);
        }
    }
}
