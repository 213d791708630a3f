//! Big number support for the invariant solver and ratio scaling.

use soroban_sdk::{log, Env};
use uint::construct_uint;

use crate::error::{ErrorCode, MosaicResult};

construct_uint! {
    /// 256-bit unsigned integer. Products of two normalized (1e18 scale)
    /// quantities overflow u128, so all solver intermediates live here.
    pub struct U256(4);
}

impl U256 {
    /// Convert back down to u128, failing if the value no longer fits.
    pub fn to_u128(self, env: &Env) -> MosaicResult<u128> {
        if self > U256::from(u128::MAX) {
            log!(env, "Bn conversion error thrown at {}:{}", file!(), line!());
            return Err(ErrorCode::BnConversionError);
        }
        Ok(self.as_u128())
    }
}

/// `value * numerator / denominator` with a 256-bit intermediate,
/// rounding down.
pub fn mul_div_floor(env: &Env, value: u128, numerator: u128, denominator: u128) -> MosaicResult<u128> {
    if denominator == 0 {
        log!(env, "Math error thrown at {}:{}", file!(), line!());
        return Err(ErrorCode::MathError);
    }
    let result = U256::from(value)
        .checked_mul(U256::from(numerator))
        .ok_or_else(crate::math_error!(env))?
        .checked_div(U256::from(denominator))
        .ok_or_else(crate::math_error!(env))?;

    result.to_u128(env)
}

/// `value * numerator / denominator` with a 256-bit intermediate,
/// rounding up.
pub fn mul_div_ceil(env: &Env, value: u128, numerator: u128, denominator: u128) -> MosaicResult<u128> {
    if denominator == 0 {
        log!(env, "Math error thrown at {}:{}", file!(), line!());
        return Err(ErrorCode::MathError);
    }
    let product = U256::from(value)
        .checked_mul(U256::from(numerator))
        .ok_or_else(crate::math_error!(env))?;
    let den = U256::from(denominator);
    let quotient = product / den;
    let result = if product % den > U256::zero() {
        quotient
            .checked_add(U256::one())
            .ok_or_else(crate::math_error!(env))?
    } else {
        quotient
    };

    result.to_u128(env)
}
