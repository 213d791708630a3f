//! Invariant Validator: prices mint, swap and redeem operations against the
//! amplified invariant and enforces the basket's economic guards.
//!
//! Every function here is pure over a basket snapshot: it returns the
//! post-operation basket alongside the priced quantities and never touches
//! storage. Mutating entry points and read-only previews share these paths,
//! so a preview is bit-identical to the committed result for the same
//! ledger state.

use mosaic::{
    constants::{BPS_PRECISION, FULL_SCALE},
    error::{ErrorCode, MosaicResult},
    math::bn::mul_div_floor,
    math::casting::Cast,
    math::ratio::{denormalize, normalize},
    math::safe_math::SafeMath,
    validate,
};
use soroban_sdk::{log, vec, Env, Vec};

use crate::invariant::{amplified_coefficient, compute_d, compute_y};
use crate::storage::{Basket, Config};

/// Position of a basket index within the active set. Non-Normal assets have
/// no position and cannot take part in pricing.
fn active_position(env: &Env, basket: &Basket, index: u32) -> MosaicResult<u32> {
    let basset = basket.get_basset(env, index)?;
    if !basset.status.is_normal() {
        log!(env, "Basset {} is not in Normal status", index);
        return Err(ErrorCode::InvalidAssetStatus);
    }
    let mut position = 0;
    for i in basket.active_indices(env).iter() {
        if i == index {
            return Ok(position);
        }
        position += 1;
    }
    Err(ErrorCode::InvalidAssetStatus)
}

fn fee_amount(env: &Env, gross: u128, fee_bps: u64) -> MosaicResult<u128> {
    gross
        .safe_mul(fee_bps as u128, env)?
        .safe_div(BPS_PRECISION as u128, env)
}

/// Every active asset's share of total normalized value must sit within its
/// configured bounds. An empty basket trivially passes.
pub fn enforce_weight_limits(env: &Env, basket: &Basket) -> MosaicResult<()> {
    let total = basket.total_active_normalized(env)?;
    if total == 0 {
        return Ok(());
    }
    let indices = basket.active_indices(env);
    let weights = basket.active_weights(env)?;
    for (pos, index) in indices.iter().enumerate() {
        let basset = basket.get_basset(env, index)?;
        let weight = weights.get(pos as u32).ok_or(ErrorCode::MathError)?;
        validate!(
            env,
            weight >= basset.weight_limits.min && weight <= basset.weight_limits.max,
            ErrorCode::WeightLimitExceeded,
            "basset {} weight {} outside bounds",
            index,
            weight
        )?;
    }
    Ok(())
}

/// An operation may not push the backing ratio below the configured floor
/// unless it improves the ratio.
fn enforce_collateralisation(
    env: &Env,
    pre: &Basket,
    post: &Basket,
    config: &Config,
) -> MosaicResult<()> {
    let pre_ratio = pre.backing_ratio(env)?;
    let post_ratio = post.backing_ratio(env)?;
    validate!(
        env,
        post_ratio >= config.collateralisation_floor || post_ratio >= pre_ratio,
        ErrorCode::InsufficientCollateralisation,
        "backing ratio {} below floor {}",
        post_ratio,
        config.collateralisation_floor
    )
}

fn ann_for(env: &Env, config: &Config, n: u32) -> MosaicResult<u128> {
    amplified_coefficient(env, config.amplification.a, n)
}

/// Price a multi-asset mint. `amounts` are raw native units aligned with
/// basket indices (zero to skip an asset). Returns the post-deposit basket,
/// the minted mAsset quantity (normalized) and the fee withheld.
pub fn compute_mint(
    env: &Env,
    basket: &Basket,
    config: &Config,
    amounts: &Vec<i128>,
) -> MosaicResult<(Basket, u128, u128)> {
    basket.ensure_not_failed(env)?;
    validate!(
        env,
        amounts.len() == basket.bassets.len(),
        ErrorCode::InputLengthMismatch
    )?;

    let mut working = basket.clone();
    let mut any_deposit = false;
    for (i, amount) in amounts.iter().enumerate() {
        if amount == 0 {
            continue;
        }
        let index = i as u32;
        let raw: u128 = amount.cast(env)?;
        let mut basset = working.get_basset(env, index)?;
        if !basset.status.is_normal() {
            log!(env, "Mint into non-Normal basset {}", index);
            return Err(ErrorCode::InvalidAssetStatus);
        }
        basset.vault_balance = basset
            .vault_balance
            .safe_add(raw.cast(env)?, env)?;
        working.set_basset(env, index, basset)?;
        any_deposit = true;
    }
    validate!(env, any_deposit, ErrorCode::ZeroAmount)?;

    let n = basket.active_indices(env).len();
    let ann = ann_for(env, config, n)?;
    let d0 = compute_d(env, &basket.active_balances(env)?, ann)?;
    let d1 = compute_d(env, &working.active_balances(env)?, ann)?;

    let gross = d1.safe_sub(d0, env)?;
    let fee = fee_amount(env, gross, config.fees.mint_fee_bps)?;
    let minted = gross.safe_sub(fee, env)?;
    validate!(env, minted > 0, ErrorCode::ZeroAmount)?;

    working.masset_supply = working.masset_supply.safe_add(minted, env)?;
    working.surplus = working.surplus.safe_add(fee, env)?;

    enforce_weight_limits(env, &working)?;
    enforce_collateralisation(env, basket, &working, config)?;

    Ok((working, minted, fee))
}

/// Single-asset mint expressed through the multi-asset path.
pub fn compute_mint_single(
    env: &Env,
    basket: &Basket,
    config: &Config,
    index: u32,
    amount: i128,
) -> MosaicResult<(Basket, u128, u128)> {
    basket.get_basset(env, index)?;
    let mut amounts = vec![env];
    for i in 0..basket.bassets.len() {
        amounts.push_back(if i == index { amount } else { 0 });
    }
    compute_mint(env, basket, config, &amounts)
}

/// Price a swap holding the invariant constant. Returns the post-swap
/// basket, the raw output quantity and the fee withheld (normalized).
pub fn compute_swap(
    env: &Env,
    basket: &Basket,
    config: &Config,
    input_index: u32,
    output_index: u32,
    amount: i128,
) -> MosaicResult<(Basket, u128, u128)> {
    basket.ensure_not_failed(env)?;
    validate!(env, amount > 0, ErrorCode::ZeroAmount)?;
    validate!(
        env,
        input_index != output_index,
        ErrorCode::InvalidAssetStatus,
        "swap input and output must differ"
    )?;

    let in_pos = active_position(env, basket, input_index)?;
    let out_pos = active_position(env, basket, output_index)?;

    let input = basket.get_basset(env, input_index)?;
    let output = basket.get_basset(env, output_index)?;

    let raw_in: u128 = amount.cast(env)?;
    let in_norm = normalize(env, raw_in, input.ratio)?;

    let n = basket.active_indices(env).len();
    let ann = ann_for(env, config, n)?;
    let balances = basket.active_balances(env)?;
    let d = compute_d(env, &balances, ann)?;

    let mut bumped = balances.clone();
    let x_in = bumped.get(in_pos).ok_or(ErrorCode::MathError)?;
    bumped.set(in_pos, x_in.safe_add(in_norm, env)?);

    let x_out = bumped.get(out_pos).ok_or(ErrorCode::MathError)?;
    let y = compute_y(env, &bumped, d, ann, out_pos)?;
    let gross_norm = x_out.safe_sub(y, env)?;

    let fee_norm = fee_amount(env, gross_norm, config.fees.swap_fee_bps)?;
    let net_norm = gross_norm.safe_sub(fee_norm, env)?;
    let raw_out = denormalize(env, net_norm, output.ratio)?;
    validate!(env, raw_out > 0, ErrorCode::ZeroAmount)?;

    let mut working = basket.clone();
    let mut input = input;
    input.vault_balance = input.vault_balance.safe_add(raw_in.cast(env)?, env)?;
    working.set_basset(env, input_index, input)?;
    let mut output = output;
    output.vault_balance = output
        .vault_balance
        .safe_sub(raw_out.cast(env)?, env)?;
    working.set_basset(env, output_index, output)?;

    // The retained fee stays in the vault; surplus records the matching
    // mAsset claim.
    working.surplus = working.surplus.safe_add(fee_norm, env)?;

    enforce_weight_limits(env, &working)?;
    enforce_collateralisation(env, basket, &working, config)?;

    Ok((working, raw_out, fee_norm))
}

/// Weight-preserving redemption: burn mAsset and return every active asset
/// pro rata, scaled by the collateralisation ratio. Shares are measured
/// against all outstanding claims (supply plus surplus) so the collateral
/// backing accrued fees stays in the vaults. Returns the post-redeem
/// basket, raw outputs aligned with basket indices, and the total fee
/// withheld (normalized).
pub fn compute_redeem_proportional(
    env: &Env,
    basket: &Basket,
    config: &Config,
    masset_amount: u128,
) -> MosaicResult<(Basket, Vec<i128>, u128)> {
    basket.ensure_not_failed(env)?;
    validate!(env, masset_amount > 0, ErrorCode::ZeroAmount)?;
    validate!(
        env,
        masset_amount <= basket.masset_supply,
        ErrorCode::SlippageExceeded,
        "redeem amount exceeds outstanding supply"
    )?;

    let outstanding = basket.outstanding(env)?;
    let mut working = basket.clone();
    let mut outputs: Vec<i128> = vec![env];
    let mut total_fee_norm: u128 = 0;

    for (i, basset) in basket.bassets.iter().enumerate() {
        if !basset.status.is_normal() {
            outputs.push_back(0);
            continue;
        }
        let vault: u128 = basset.vault_balance.cast(env)?;
        let share = mul_div_floor(env, vault, masset_amount, outstanding)?;
        let scaled = mul_div_floor(env, share, basket.collateralisation_ratio, FULL_SCALE)?;
        let fee_raw = fee_amount(env, scaled, config.fees.redemption_fee_bps)?;
        let net_raw = scaled.safe_sub(fee_raw, env)?;

        let mut updated = basset.clone();
        updated.vault_balance = updated
            .vault_balance
            .safe_sub(net_raw.cast(env)?, env)?;
        working.set_basset(env, i as u32, updated)?;

        total_fee_norm = total_fee_norm.safe_add(normalize(env, fee_raw, basset.ratio)?, env)?;
        outputs.push_back(net_raw.cast(env)?);
    }

    working.masset_supply = working.masset_supply.safe_sub(masset_amount, env)?;
    working.surplus = working.surplus.safe_add(total_fee_norm, env)?;

    enforce_collateralisation(env, basket, &working, config)?;

    Ok((working, outputs, total_fee_norm))
}

/// Redeem into one asset: reduce the invariant by the net burned quantity
/// and solve for the asset's new balance. Returns the post-redeem basket,
/// the raw output and the fee withheld (normalized).
pub fn compute_redeem_single(
    env: &Env,
    basket: &Basket,
    config: &Config,
    index: u32,
    masset_amount: u128,
) -> MosaicResult<(Basket, u128, u128)> {
    basket.ensure_not_failed(env)?;
    validate!(env, masset_amount > 0, ErrorCode::ZeroAmount)?;

    let pos = active_position(env, basket, index)?;
    let basset = basket.get_basset(env, index)?;

    let fee = fee_amount(env, masset_amount, config.fees.redemption_fee_bps)?;
    let net = masset_amount.safe_sub(fee, env)?;

    let n = basket.active_indices(env).len();
    let ann = ann_for(env, config, n)?;
    let balances = basket.active_balances(env)?;
    let d0 = compute_d(env, &balances, ann)?;
    let d2 = d0.safe_sub(net, env)?;

    let x = balances.get(pos).ok_or(ErrorCode::MathError)?;
    let y = compute_y(env, &balances, d2, ann, pos)?;
    let out_norm = x.safe_sub(y, env)?;
    let raw_out = denormalize(env, out_norm, basset.ratio)?;
    validate!(env, raw_out > 0, ErrorCode::ZeroAmount)?;

    let mut working = basket.clone();
    let mut updated = basset;
    updated.vault_balance = updated
        .vault_balance
        .safe_sub(raw_out.cast(env)?, env)?;
    working.set_basset(env, index, updated)?;
    working.masset_supply = working.masset_supply.safe_sub(masset_amount, env)?;
    working.surplus = working.surplus.safe_add(fee, env)?;

    enforce_weight_limits(env, &working)?;
    enforce_collateralisation(env, basket, &working, config)?;

    Ok((working, raw_out, fee))
}

/// Redeem exact raw quantities of a subset of assets, computing the mAsset
/// that must be burned. Returns the post-redeem basket, the required burn
/// (normalized, fee included) and the fee portion.
pub fn compute_redeem_exact(
    env: &Env,
    basket: &Basket,
    config: &Config,
    amounts: &Vec<i128>,
) -> MosaicResult<(Basket, u128, u128)> {
    basket.ensure_not_failed(env)?;
    validate!(
        env,
        amounts.len() == basket.bassets.len(),
        ErrorCode::InputLengthMismatch
    )?;

    let mut working = basket.clone();
    let mut any_withdrawal = false;
    for (i, amount) in amounts.iter().enumerate() {
        if amount == 0 {
            continue;
        }
        let index = i as u32;
        let raw: u128 = amount.cast(env)?;
        let mut basset = working.get_basset(env, index)?;
        if !basset.status.is_normal() {
            log!(env, "Redeem from non-Normal basset {}", index);
            return Err(ErrorCode::InvalidAssetStatus);
        }
        basset.vault_balance = basset
            .vault_balance
            .safe_sub(raw.cast(env)?, env)?;
        working.set_basset(env, index, basset)?;
        any_withdrawal = true;
    }
    validate!(env, any_withdrawal, ErrorCode::ZeroAmount)?;

    let n = basket.active_indices(env).len();
    let ann = ann_for(env, config, n)?;
    let d0 = compute_d(env, &basket.active_balances(env)?, ann)?;
    let d1 = compute_d(env, &working.active_balances(env)?, ann)?;

    let gross = d0.safe_sub(d1, env)?;
    let fee = fee_amount(env, gross, config.fees.redemption_fee_bps)?;
    let required = gross.safe_add(fee, env)?;

    working.masset_supply = working.masset_supply.safe_sub(required, env)?;
    working.surplus = working.surplus.safe_add(fee, env)?;

    enforce_weight_limits(env, &working)?;
    enforce_collateralisation(env, basket, &working, config)?;

    Ok((working, required, fee))
}
