//! Recollateralization Coordinator: orchestrates the isolated unwind of a
//! broken-peg asset and settles the recovered value back into the basket's
//! collateralisation accounting.

use mosaic::{
    constants::FULL_SCALE,
    error::{ErrorCode, MosaicResult},
    types::BassetStatus,
    validate,
};
use soroban_sdk::{log, Env};

use crate::storage::{Basket, Config};

/// Move a broken-peg asset into `Liquidating`, recording the normalized
/// notional owed to the basket. Returns the notional.
pub fn mark_liquidating(env: &Env, basket: &mut Basket, index: u32) -> MosaicResult<u128> {
    basket.ensure_not_failed(env)?;

    let mut basset = basket.get_basset(env, index)?;
    validate!(
        env,
        basset.status.is_broken(),
        ErrorCode::IllegalStatusTransition,
        "only a broken-peg basset can be liquidated"
    )?;

    let notional = basset.normalized_balance(env)?;
    basset.status = basset.status.transition(env, BassetStatus::Liquidating)?;
    basset.liquidation_notional = notional;
    basket.set_basset(env, index, basset)?;

    Ok(notional)
}

/// Outcome of a settled liquidation.
pub struct Settlement {
    pub notional: u128,
    pub recovered_value: u128,
    pub collateralisation_ratio: u128,
    pub basket_failed: bool,
}

/// Settle a completed unwind: transition to `Liquidated`, fold the
/// recovered value into the backing, recompute the collateralisation ratio
/// and latch the basket as failed if the ratio fell through the floor.
pub fn complete_liquidation(
    env: &Env,
    basket: &mut Basket,
    config: &Config,
    index: u32,
    recovered_value: u128,
) -> MosaicResult<Settlement> {
    basket.ensure_not_failed(env)?;

    let mut basset = basket.get_basset(env, index)?;
    if basset.status != BassetStatus::Liquidating {
        log!(env, "Basset {} has no active liquidation", index);
        return Err(ErrorCode::LiquidationNotActive);
    }

    let notional = basset.liquidation_notional;
    basset.status = basset.status.transition(env, BassetStatus::Liquidated)?;
    // The unwound collateral left the basket; only the recovered value
    // remains as a backing credit.
    basset.vault_balance = 0;
    let address = basset.address.clone();
    basket.set_basset(env, index, basset)?;
    basket.expired_bassets.push_back(address);

    basket.recovered_value = basket
        .recovered_value
        .checked_add(recovered_value)
        .ok_or(ErrorCode::MathError)?;

    let ratio = basket.backing_ratio(env)?;
    basket.collateralisation_ratio = ratio.min(FULL_SCALE);

    if ratio < config.collateralisation_floor {
        log!(
            env,
            "Catastrophic under-collateralisation: ratio {} below floor {}",
            ratio,
            config.collateralisation_floor
        );
        basket.failed = true;
    }

    Ok(Settlement {
        notional,
        recovered_value,
        collateralisation_ratio: basket.collateralisation_ratio,
        basket_failed: basket.failed,
    })
}
