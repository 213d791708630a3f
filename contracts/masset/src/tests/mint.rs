extern crate std;

use pretty_assertions::assert_eq;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{vec, Address, Env};

use super::setup::{
    deploy_masset_contract, deploy_token_contract, default_fees, open_limits, seed_equal,
    three_asset_basket, units, zero_fees, RATIO_18_DP,
};
use mosaic::constants::{FULL_SCALE, WEIGHT_PRECISION};
use mosaic::error::ErrorCode;
use mosaic::types::WeightLimits;

fn bounded_limits() -> WeightLimits {
    WeightLimits {
        min: WEIGHT_PRECISION / 5,
        max: WEIGHT_PRECISION * 2 / 5,
    }
}

#[test]
fn balanced_multi_mint_prices_at_par() {
    let env = Env::default();
    let fixture = three_asset_basket(&env, 120, default_fees(), 0, bounded_limits());

    let expected_gross: i128 = 300 * FULL_SCALE as i128;
    let expected_fee = expected_gross * 10 / 10_000;

    let preview = fixture.engine.preview_mint_multi(&vec![
        &env,
        units(100, 6),
        units(100, 8),
        units(100, 18),
    ]);
    let minted = seed_equal(&env, &fixture, 100);

    // A balanced deposit into an empty basket mints exactly the deposited
    // normalized value, less the mint fee.
    assert_eq!(minted, expected_gross - expected_fee);
    assert_eq!(preview, minted);

    let composition = fixture.engine.query_composition();
    assert_eq!(composition.masset_supply, minted as u128);
    assert_eq!(composition.surplus, expected_fee as u128);
    assert_eq!(composition.total_normalized, 300 * FULL_SCALE);
    for entry in composition.bassets.iter() {
        assert!(entry.weight >= WEIGHT_PRECISION / 5);
        assert!(entry.weight <= WEIGHT_PRECISION * 2 / 5);
    }
}

#[test]
fn single_asset_mint_carries_a_slippage_penalty() {
    let env = Env::default();
    let fixture = three_asset_basket(&env, 120, zero_fees(), 0, open_limits());
    let seeded = seed_equal(&env, &fixture, 100);

    let preview = fixture.engine.preview_mint_single(&2, &units(10, 18));
    let minted = fixture
        .engine
        .mint_single(&fixture.user, &2, &units(10, 18), &0);

    assert_eq!(preview, minted);
    // Skewing the basket mints strictly less than the deposited value but
    // stays close to par at this amplification.
    assert!(minted <= units(10, 18));
    assert!(minted > units(10, 18) - units(1, 16));

    let composition = fixture.engine.query_composition();
    assert_eq!(composition.masset_supply, (seeded + minted) as u128);
}

#[test]
fn mint_rejects_weight_bound_violations() {
    let env = Env::default();
    let fixture = three_asset_basket(&env, 120, zero_fees(), 0, bounded_limits());
    seed_equal(&env, &fixture, 100);

    // 160 / 360 of total value in one asset breaches the 40% ceiling.
    let result = fixture
        .engine
        .try_mint_single(&fixture.user, &0, &units(60, 6), &0);
    assert_eq!(result, Err(Ok(ErrorCode::WeightLimitExceeded)));

    // The failed call must leave the ledger untouched.
    let composition = fixture.engine.query_composition();
    assert_eq!(composition.masset_supply, 300 * FULL_SCALE);
    assert_eq!(composition.total_normalized, 300 * FULL_SCALE);
}

#[test]
fn mint_enforces_minimum_output() {
    let env = Env::default();
    let fixture = three_asset_basket(&env, 120, default_fees(), 0, open_limits());

    let result = fixture.engine.try_mint_multi(
        &fixture.user,
        &vec![&env, units(100, 6), units(100, 8), units(100, 18)],
        &(300 * FULL_SCALE as i128),
    );
    assert_eq!(result, Err(Ok(ErrorCode::SlippageExceeded)));
}

#[test]
fn mint_input_validation() {
    let env = Env::default();
    let fixture = three_asset_basket(&env, 120, zero_fees(), 0, open_limits());

    let result = fixture
        .engine
        .try_mint_multi(&fixture.user, &vec![&env, 0i128, 0, 0], &0);
    assert_eq!(result, Err(Ok(ErrorCode::ZeroAmount)));

    let result = fixture
        .engine
        .try_mint_multi(&fixture.user, &vec![&env, units(1, 6), units(1, 8)], &0);
    assert_eq!(result, Err(Ok(ErrorCode::InputLengthMismatch)));

    let result = fixture
        .engine
        .try_mint_single(&fixture.user, &9, &units(1, 6), &0);
    assert_eq!(result, Err(Ok(ErrorCode::BassetNotFound)));

    let result = fixture.engine.try_preview_mint_single(&9, &units(1, 6));
    assert_eq!(result, Err(Ok(ErrorCode::BassetNotFound)));
}

#[test]
fn first_mint_must_seed_every_active_asset() {
    let env = Env::default();
    let fixture = three_asset_basket(&env, 120, zero_fees(), 0, open_limits());

    let result = fixture
        .engine
        .try_mint_multi(&fixture.user, &vec![&env, units(100, 6), 0, 0], &0);
    assert_eq!(result, Err(Ok(ErrorCode::MathError)));
}

#[test]
fn transfer_fee_flag_uses_measured_amounts() {
    let env = Env::default();
    env.mock_all_auths();
    env.cost_estimate().budget().reset_unlimited();

    let admin = Address::generate(&env);
    let governor = Address::generate(&env);
    let user = Address::generate(&env);

    let engine = deploy_masset_contract(
        &env,
        &admin,
        &governor,
        &super::setup::amp(120),
        &zero_fees(),
        0,
    );
    let (token, asset) = deploy_token_contract(&env, &admin);
    engine.register_basset(&token.address, &RATIO_18_DP, &open_limits(), &true);
    asset.mint(&user, &units(1_000, 18));

    // The asset charges no actual fee, so the measured delta equals the
    // nominal amount and the mint prices at par.
    let minted = engine.mint_multi(&user, &vec![&env, units(500, 18)], &0);
    assert_eq!(minted, units(500, 18));
    assert_eq!(token.balance(&engine.address), units(500, 18));
}
