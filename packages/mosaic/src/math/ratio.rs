//! Decimal normalization.
//!
//! Every collateral asset carries a fixed `ratio` mapping its native decimal
//! precision onto the internal normalized scale:
//! `ratio = RATIO_SCALE * 10^(18 - decimals)`. All conversions are pure and
//! round down on the way out of the basket so rounding dust always accrues
//! to the basket, never to the caller.

use soroban_sdk::{log, Env};

use crate::constants::RATIO_SCALE;
use crate::error::{ErrorCode, MosaicResult};
use crate::math::bn::{mul_div_ceil, mul_div_floor};

/// Ratio for an asset with the given native decimal precision.
pub fn ratio_from_decimals(env: &Env, decimals: u32) -> MosaicResult<u128> {
    if decimals > 18 {
        log!(env, "Unsupported decimal precision: {}", decimals);
        return Err(ErrorCode::InvalidRatio);
    }
    Ok(RATIO_SCALE * 10_u128.pow(18 - decimals))
}

/// Raw native units -> normalized units, rounding down.
pub fn normalize(env: &Env, raw: u128, ratio: u128) -> MosaicResult<u128> {
    mul_div_floor(env, raw, ratio, RATIO_SCALE)
}

/// Raw native units -> normalized units, rounding up. Used when the result
/// is charged to the caller.
pub fn normalize_ceil(env: &Env, raw: u128, ratio: u128) -> MosaicResult<u128> {
    mul_div_ceil(env, raw, ratio, RATIO_SCALE)
}

/// Normalized units -> raw native units, rounding down so the basket is
/// never over-debited.
pub fn denormalize(env: &Env, normalized: u128, ratio: u128) -> MosaicResult<u128> {
    if ratio == 0 {
        log!(env, "Zero ratio in denormalize");
        return Err(ErrorCode::InvalidRatio);
    }
    mul_div_floor(env, normalized, RATIO_SCALE, ratio)
}
