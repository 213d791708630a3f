extern crate std;

use pretty_assertions::assert_eq;
use soroban_sdk::{vec, Env};

use super::setup::{open_limits, seed_equal, three_asset_basket, units, zero_fees, RATIO_18_DP};
use mosaic::constants::FULL_SCALE;
use mosaic::error::ErrorCode;
use mosaic::types::{BassetStatus, PriceObservation};

fn break_asset(env: &Env, fixture: &super::setup::BasketFixture, index: u32) {
    fixture.engine.update_prices(&vec![
        env,
        PriceObservation {
            basset_index: index,
            price: 850_000,
            timestamp: env.ledger().timestamp(),
        },
    ]);
}

#[test]
fn shortfall_below_the_floor_latches_the_basket() {
    let env = Env::default();
    let floor = FULL_SCALE * 95 / 100;
    let fixture = three_asset_basket(&env, 120, zero_fees(), floor, open_limits());
    seed_equal(&env, &fixture, 100);

    break_asset(&env, &fixture, 2);
    fixture.engine.mark_liquidating(&2);
    assert_eq!(
        fixture.engine.query_basset_status(&2),
        BassetStatus::Liquidating
    );
    assert_eq!(fixture.engine.query_active_bassets().indices.len(), 2);

    // 80 of the 100 notional units come back: 280 / 300 backing, under the
    // 95% floor.
    fixture
        .engine
        .complete_liquidation(&2, &(80 * FULL_SCALE));

    let composition = fixture.engine.query_composition();
    assert_eq!(composition.collateralisation_ratio, 933_333_333_333_333_333);
    assert!(composition.failed);
    assert_eq!(
        fixture.engine.query_basset_status(&2),
        BassetStatus::Liquidated
    );
    assert!(composition
        .expired_bassets
        .contains(&fixture.token_c.address));

    // Every mutating operation is rejected once the basket has failed.
    let result = fixture
        .engine
        .try_mint_single(&fixture.user, &0, &units(1, 6), &0);
    assert_eq!(result, Err(Ok(ErrorCode::BasketFailed)));

    let result = fixture
        .engine
        .try_swap(&fixture.user, &0, &1, &units(1, 6), &0);
    assert_eq!(result, Err(Ok(ErrorCode::BasketFailed)));

    let result = fixture.engine.try_redeem_proportional(
        &fixture.user,
        &units(1, 18),
        &vec![&env, 0i128, 0, 0],
    );
    assert_eq!(result, Err(Ok(ErrorCode::BasketFailed)));

    let result = fixture.engine.try_update_prices(&vec![
        &env,
        PriceObservation {
            basset_index: 0,
            price: 1_000_000,
            timestamp: 0,
        },
    ]);
    assert_eq!(result, Err(Ok(ErrorCode::BasketFailed)));

    let result = fixture.engine.try_set_weight_limits(&0, &open_limits());
    assert_eq!(result, Err(Ok(ErrorCode::BasketFailed)));

    let result = fixture.engine.try_blacklist_basset(&0);
    assert_eq!(result, Err(Ok(ErrorCode::BasketFailed)));

    let result = fixture.engine.try_complete_liquidation(&2, &0u128);
    assert_eq!(result, Err(Ok(ErrorCode::BasketFailed)));
}

#[test]
fn partial_recovery_scales_proportional_redemptions() {
    let env = Env::default();
    let floor = FULL_SCALE * 90 / 100;
    let fixture = three_asset_basket(&env, 120, zero_fees(), floor, open_limits());
    let minted = seed_equal(&env, &fixture, 100);

    break_asset(&env, &fixture, 2);
    fixture.engine.mark_liquidating(&2);
    fixture
        .engine
        .complete_liquidation(&2, &(80 * FULL_SCALE));

    // 93.33% backed, above the 90% floor: the basket keeps operating with
    // redemptions scaled down by the collateralisation ratio.
    let composition = fixture.engine.query_composition();
    assert_eq!(composition.collateralisation_ratio, 933_333_333_333_333_333);
    assert!(!composition.failed);

    let outputs = fixture.engine.redeem_proportional(
        &fixture.user,
        &(minted / 10),
        &vec![&env, 0i128, 0, 0],
    );
    assert_eq!(outputs, vec![&env, 9_333_333i128, 933_333_333, 0]);
}

#[test]
fn only_broken_assets_can_be_marked() {
    let env = Env::default();
    let fixture = three_asset_basket(&env, 120, zero_fees(), 0, open_limits());
    seed_equal(&env, &fixture, 100);

    let result = fixture.engine.try_mark_liquidating(&0);
    assert_eq!(result, Err(Ok(ErrorCode::IllegalStatusTransition)));
}

#[test]
fn settlement_requires_an_active_liquidation() {
    let env = Env::default();
    let fixture = three_asset_basket(&env, 120, zero_fees(), 0, open_limits());
    seed_equal(&env, &fixture, 100);

    let result = fixture.engine.try_complete_liquidation(&0, &0u128);
    assert_eq!(result, Err(Ok(ErrorCode::LiquidationNotActive)));

    break_asset(&env, &fixture, 2);
    let result = fixture.engine.try_complete_liquidation(&2, &0u128);
    assert_eq!(result, Err(Ok(ErrorCode::LiquidationNotActive)));
}

#[test]
fn liquidated_addresses_stay_expired() {
    let env = Env::default();
    let fixture = three_asset_basket(&env, 120, zero_fees(), 0, open_limits());
    seed_equal(&env, &fixture, 100);

    break_asset(&env, &fixture, 2);
    fixture.engine.mark_liquidating(&2);
    fixture
        .engine
        .complete_liquidation(&2, &(100 * FULL_SCALE));

    let result = fixture
        .engine
        .try_register_basset(&fixture.token_c.address, &RATIO_18_DP, &open_limits(), &false);
    assert_eq!(result, Err(Ok(ErrorCode::BassetAlreadyExists)));
}
