#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};
use yield_farm::{YieldFarmContract, YieldFarmContractClient, YIELD_RATE_SCALE};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { who: u8, amount: i64 },
    Unstake { who: u8, amount: i64 },
    WithdrawYield { who: u8 },
    Advance { seconds: u32 },
}

const FUNDS: i128 = 1_000_000_000_000;

fuzz_target!(|input: (u32, Vec<FuzzAction>)| {
    let (rate, actions) = input;

    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_700_000_000);

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(YieldFarmContract, ());
    let client = YieldFarmContractClient::new(&env, &contract_id);

    // Up to ~4x per day keeps the interesting range without trivial overflow.
    let yield_rate = i128::from(rate) % (4 * YIELD_RATE_SCALE);
    client.initialize(&stake_token, &reward_token, &yield_rate);
    StellarAssetClient::new(&env, &reward_token).set_admin(&contract_id);

    let stake = TokenClient::new(&env, &stake_token);
    let mut users = vec![];
    for _ in 0..4 {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &stake_token).mint(&user, &FUNDS);
        stake.approve(&user, &contract_id, &i128::MAX, &10_000);
        users.push(user);
    }

    for action in actions {
        match action {
            FuzzAction::Stake { who, amount } => {
                let user = &users[who as usize % users.len()];
                let _ = client.try_stake(user, &i128::from(amount));
            }
            FuzzAction::Unstake { who, amount } => {
                let user = &users[who as usize % users.len()];
                let _ = client.try_unstake(user, &i128::from(amount));
            }
            FuzzAction::WithdrawYield { who } => {
                let user = &users[who as usize % users.len()];
                let _ = client.try_withdraw_yield(user);
            }
            FuzzAction::Advance { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now.saturating_add(u64::from(seconds)));
            }
        }

        // Conservation must hold after every step, successful or not.
        let mut sum = 0i128;
        for user in &users {
            let balance = client.staking_balance(user);
            assert!(balance >= 0);
            assert_eq!(client.is_staking(user), balance > 0);
            sum += balance;
        }
        assert_eq!(client.get_total_staked(), sum);
        assert_eq!(stake.balance(&contract_id), sum);
    }
});
