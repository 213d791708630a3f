//! Peg Monitor: turns externally sourced price observations into basset
//! status transitions.
//!
//! The monitor never trusts stale data: observations older than the
//! staleness window are skipped rather than driving any transition. Only
//! the transitions in the status table ever occur; assets already isolated
//! (`Liquidating`, `Liquidated`, `Blacklisted`, `Failed`) are left alone.

use mosaic::{
    constants::{BPS_PRECISION, PRICE_PRECISION},
    error::{ErrorCode, MosaicResult},
    math::casting::Cast,
    types::{BassetStatus, PegConfig, PriceObservation},
    validate,
};
use soroban_sdk::{contracttype, log, vec, Env, Vec};

use crate::storage::Basket;

/// One applied transition, for event emission.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusChange {
    pub basset_index: u32,
    pub old_status: BassetStatus,
    pub new_status: BassetStatus,
    pub deviation_bps: u64,
}

/// Deviation of an observed price from the peg, in basis points.
pub fn deviation_bps(env: &Env, price: i128) -> MosaicResult<u64> {
    validate!(env, price > 0, ErrorCode::OracleNonPositive)?;
    let diff = (price - PRICE_PRECISION).unsigned_abs();
    let bps = diff
        .checked_mul(BPS_PRECISION as u128)
        .ok_or(ErrorCode::MathError)?
        / (PRICE_PRECISION as u128);
    bps.cast(env)
}

/// Assess a batch of observations against the basket, mutating statuses in
/// place. Returns the applied transitions. A non-empty batch in which every
/// observation is stale fails with `StaleOracleData` so callers learn their
/// feed has gone quiet.
pub fn assess(
    env: &Env,
    basket: &mut Basket,
    config: &PegConfig,
    observations: &Vec<PriceObservation>,
    now: u64,
) -> MosaicResult<Vec<StatusChange>> {
    let mut changes: Vec<StatusChange> = vec![env];
    let mut fresh_count: u32 = 0;

    for obs in observations.iter() {
        let age = now.saturating_sub(obs.timestamp);
        if obs.timestamp > now || age > config.staleness_secs {
            log!(env, "Skipping stale observation for basset {}", obs.basset_index);
            continue;
        }
        fresh_count += 1;

        let mut basset = basket.get_basset(env, obs.basset_index)?;
        let deviation = deviation_bps(env, obs.price)?;

        let old_status = basset.status;
        let target = if deviation > config.deviation_threshold_bps {
            if obs.price < PRICE_PRECISION {
                BassetStatus::BrokenBelowPeg
            } else {
                BassetStatus::BrokenAbovePeg
            }
        } else {
            BassetStatus::Normal
        };

        // The monitor only moves assets between Normal and the broken-peg
        // states; anything further along the liquidation path is owned by
        // the coordinator.
        let monitor_owned = old_status.is_normal() || old_status.is_broken();
        if !monitor_owned || target == old_status {
            continue;
        }

        // A swing from one side of the peg to the other has no direct
        // broken-to-broken edge in the table; it passes through Normal.
        basset.status = if old_status.is_broken() && target != BassetStatus::Normal {
            let restored = old_status.transition(env, BassetStatus::Normal)?;
            restored.transition(env, target)?
        } else {
            old_status.transition(env, target)?
        };
        basket.set_basset(env, obs.basset_index, basset)?;
        changes.push_back(StatusChange {
            basset_index: obs.basset_index,
            old_status,
            new_status: target,
            deviation_bps: deviation,
        });
    }

    if !observations.is_empty() && fresh_count == 0 {
        return Err(ErrorCode::StaleOracleData);
    }

    Ok(changes)
}
