use mosaic::{
    constants::{FULL_SCALE, RATIO_SCALE},
    error::{ErrorCode, MosaicResult},
    math::casting::Cast,
    math::safe_math::SafeMath,
    types::{
        AmplificationConfig, BassetStatus, FeeConfig, PegConfig, PriceObservation, WeightLimits,
    },
    validate,
};
use soroban_sdk::{
    contract, contractimpl, contractmeta, log, token, vec, Address, Env, Vec,
};

use crate::{
    events::MassetEvents,
    liquidation, peg,
    masset::MassetTrait,
    msg::{ActiveBassetsResponse, BassetResponse, CompositionResponse, ConfigResponse},
    storage::{
        get_basket, get_config, is_initialized, save_basket, save_config, set_initialized, Basket,
        Basset, Config,
    },
    validator,
};

contractmeta!(
    key = "Description",
    val = "Multi-collateral stable-asset basket priced by an amplified invariant"
);

#[contract]
pub struct Masset;

/// Pull collateral from the sender, reconciling fee-on-transfer assets by
/// measuring the vault balance delta instead of trusting the nominal
/// amount.
fn collect_deposits(
    env: &Env,
    basket: &Basket,
    sender: &Address,
    amounts: &Vec<i128>,
) -> MosaicResult<Vec<i128>> {
    let this = env.current_contract_address();
    let mut received: Vec<i128> = vec![env];
    for (i, amount) in amounts.iter().enumerate() {
        if amount == 0 {
            received.push_back(0);
            continue;
        }
        validate!(env, amount > 0, ErrorCode::ZeroAmount)?;
        let basset = basket.get_basset(env, i as u32)?;
        let client = token::Client::new(env, &basset.address);
        let actual = if basset.is_transfer_fee_charged {
            let before = client.balance(&this);
            client.transfer(sender, &this, &amount);
            client.balance(&this).safe_sub(before, env)?
        } else {
            client.transfer(sender, &this, &amount);
            amount
        };
        received.push_back(actual);
    }
    Ok(received)
}

fn pay_out(env: &Env, basket: &Basket, recipient: &Address, index: u32, amount: i128) -> MosaicResult<()> {
    if amount == 0 {
        return Ok(());
    }
    let basset = basket.get_basset(env, index)?;
    let client = token::Client::new(env, &basset.address);
    client.transfer(&env.current_contract_address(), recipient, &amount);
    Ok(())
}

#[contractimpl]
impl MassetTrait for Masset {
    #[allow(clippy::too_many_arguments)]
    fn initialize(
        env: Env,
        admin: Address,
        governor: Address,
        max_bassets: u32,
        amplification: AmplificationConfig,
        fees: FeeConfig,
        peg: PegConfig,
        collateralisation_floor: u128,
    ) -> Result<(), ErrorCode> {
        if is_initialized(&env) {
            log!(
                &env,
                "Masset: Initialize: initializing contract twice is not allowed"
            );
            return Err(ErrorCode::AlreadyInitialized);
        }

        amplification.validate(&env)?;
        fees.validate(&env)?;
        validate!(
            &env,
            collateralisation_floor <= FULL_SCALE,
            ErrorCode::InvalidWeightLimits,
            "collateralisation floor above full scale"
        )?;
        validate!(&env, max_bassets > 0, ErrorCode::MaxBassetsReached)?;

        set_initialized(&env);
        save_config(
            &env,
            Config {
                admin: admin.clone(),
                governor: governor.clone(),
                amplification,
                fees,
                peg,
                collateralisation_floor,
            },
        );
        save_basket(&env, &Basket::new(&env, max_bassets));

        MassetEvents::initialize(&env, admin, governor, max_bassets);
        Ok(())
    }

    fn register_basset(
        env: Env,
        address: Address,
        ratio: u128,
        weight_limits: WeightLimits,
        is_transfer_fee_charged: bool,
    ) -> Result<u32, ErrorCode> {
        let config = get_config(&env);
        config.admin.require_auth();

        let mut basket = get_basket(&env);
        basket.ensure_not_failed(&env)?;
        validate!(
            &env,
            basket.bassets.len() < basket.max_bassets,
            ErrorCode::MaxBassetsReached
        )?;
        validate!(
            &env,
            !basket.contains_address(&address),
            ErrorCode::BassetAlreadyExists,
            "basset address already registered or expired"
        )?;
        validate!(
            &env,
            ratio >= RATIO_SCALE && ratio <= RATIO_SCALE * FULL_SCALE,
            ErrorCode::InvalidRatio
        )?;
        weight_limits.validate(&env)?;

        let index = basket.bassets.len();
        basket.bassets.push_back(Basset {
            address: address.clone(),
            status: BassetStatus::Normal,
            ratio,
            vault_balance: 0,
            is_transfer_fee_charged,
            weight_limits,
            liquidation_notional: 0,
        });
        save_basket(&env, &basket);

        MassetEvents::basset_registered(&env, address, index, ratio, is_transfer_fee_charged);
        Ok(index)
    }

    fn set_weight_limits(
        env: Env,
        basset_index: u32,
        limits: WeightLimits,
    ) -> Result<(), ErrorCode> {
        let config = get_config(&env);
        config.admin.require_auth();
        limits.validate(&env)?;

        let mut basket = get_basket(&env);
        basket.ensure_not_failed(&env)?;
        let mut basset = basket.get_basset(&env, basset_index)?;
        basset.weight_limits = limits;
        basket.set_basset(&env, basset_index, basset)?;
        save_basket(&env, &basket);

        MassetEvents::weight_limits_updated(&env, basset_index, limits);
        Ok(())
    }

    fn set_amplification_config(
        env: Env,
        amplification: AmplificationConfig,
    ) -> Result<(), ErrorCode> {
        let mut config = get_config(&env);
        config.admin.require_auth();
        amplification.validate(&env)?;
        config.amplification = amplification;
        save_config(&env, config);

        MassetEvents::amplification_updated(&env, amplification.a);
        Ok(())
    }

    fn set_fees(env: Env, fees: FeeConfig) -> Result<(), ErrorCode> {
        let mut config = get_config(&env);
        config.admin.require_auth();
        fees.validate(&env)?;
        config.fees = fees;
        save_config(&env, config);

        MassetEvents::fees_updated(&env, fees);
        Ok(())
    }

    fn set_peg_config(env: Env, peg: PegConfig) -> Result<(), ErrorCode> {
        let mut config = get_config(&env);
        config.admin.require_auth();
        config.peg = peg;
        save_config(&env, config);

        MassetEvents::peg_config_updated(&env, peg);
        Ok(())
    }

    fn blacklist_basset(env: Env, basset_index: u32) -> Result<(), ErrorCode> {
        let config = get_config(&env);
        config.governor.require_auth();

        let mut basket = get_basket(&env);
        basket.ensure_not_failed(&env)?;
        let mut basset = basket.get_basset(&env, basset_index)?;
        basset.status = basset.status.transition(&env, BassetStatus::Blacklisted)?;
        let address = basset.address.clone();
        basket.set_basset(&env, basset_index, basset)?;
        basket.expired_bassets.push_back(address);
        save_basket(&env, &basket);

        MassetEvents::basset_blacklisted(&env, basset_index);
        Ok(())
    }

    // ################################################################
    //                           Exchange
    // ################################################################

    fn mint_multi(
        env: Env,
        sender: Address,
        amounts: Vec<i128>,
        min_output: i128,
    ) -> Result<i128, ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        let basket = get_basket(&env);
        basket.ensure_not_failed(&env)?;
        validate!(
            &env,
            amounts.len() == basket.bassets.len(),
            ErrorCode::InputLengthMismatch
        )?;

        let received = collect_deposits(&env, &basket, &sender, &amounts)?;
        let (working, minted, fee) = validator::compute_mint(&env, &basket, &config, &received)?;

        let minted_out: i128 = minted.cast(&env)?;
        validate!(
            &env,
            minted_out >= min_output,
            ErrorCode::SlippageExceeded,
            "minted {} below minimum {}",
            minted_out,
            min_output
        )?;

        save_basket(&env, &working);
        MassetEvents::minted(&env, sender, received, minted_out, fee);
        Ok(minted_out)
    }

    fn mint_single(
        env: Env,
        sender: Address,
        basset_index: u32,
        amount: i128,
        min_output: i128,
    ) -> Result<i128, ErrorCode> {
        let basket = get_basket(&env);
        basket.get_basset(&env, basset_index)?;
        let mut amounts: Vec<i128> = vec![&env];
        for i in 0..basket.bassets.len() {
            amounts.push_back(if i == basset_index { amount } else { 0 });
        }
        Self::mint_multi(env, sender, amounts, min_output)
    }

    fn swap(
        env: Env,
        sender: Address,
        input_index: u32,
        output_index: u32,
        amount: i128,
        min_output: i128,
    ) -> Result<i128, ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        let basket = get_basket(&env);
        basket.ensure_not_failed(&env)?;

        // Pull the input first so fee-on-transfer assets are priced on the
        // measured amount.
        let input = basket.get_basset(&env, input_index)?;
        validate!(&env, amount > 0, ErrorCode::ZeroAmount)?;
        let this = env.current_contract_address();
        let client = token::Client::new(&env, &input.address);
        let actual_in = if input.is_transfer_fee_charged {
            let before = client.balance(&this);
            client.transfer(&sender, &this, &amount);
            client.balance(&this).safe_sub(before, &env)?
        } else {
            client.transfer(&sender, &this, &amount);
            amount
        };

        let (working, raw_out, fee) =
            validator::compute_swap(&env, &basket, &config, input_index, output_index, actual_in)?;

        let out: i128 = raw_out.cast(&env)?;
        validate!(
            &env,
            out >= min_output,
            ErrorCode::SlippageExceeded,
            "swap output {} below minimum {}",
            out,
            min_output
        )?;

        pay_out(&env, &basket, &sender, output_index, out)?;
        save_basket(&env, &working);
        MassetEvents::swapped(&env, sender, input_index, output_index, actual_in, out, fee);
        Ok(out)
    }

    fn redeem_proportional(
        env: Env,
        sender: Address,
        masset_amount: i128,
        min_outputs: Vec<i128>,
    ) -> Result<Vec<i128>, ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        let basket = get_basket(&env);
        basket.ensure_not_failed(&env)?;
        validate!(
            &env,
            min_outputs.len() == basket.bassets.len(),
            ErrorCode::InputLengthMismatch
        )?;
        validate!(&env, masset_amount > 0, ErrorCode::ZeroAmount)?;

        let (working, outputs, fee) = validator::compute_redeem_proportional(
            &env,
            &basket,
            &config,
            masset_amount.cast(&env)?,
        )?;

        for (i, output) in outputs.iter().enumerate() {
            let index = i as u32;
            let minimum = min_outputs.get(index).ok_or(ErrorCode::InputLengthMismatch)?;
            validate!(
                &env,
                output >= minimum,
                ErrorCode::SlippageExceeded,
                "output {} for basset {} below minimum",
                output,
                index
            )?;
            pay_out(&env, &basket, &sender, index, output)?;
        }

        save_basket(&env, &working);
        MassetEvents::redeemed(&env, sender, masset_amount, outputs.clone(), fee);
        Ok(outputs)
    }

    fn redeem_single(
        env: Env,
        sender: Address,
        basset_index: u32,
        masset_amount: i128,
        min_output: i128,
    ) -> Result<i128, ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        let basket = get_basket(&env);
        basket.ensure_not_failed(&env)?;
        validate!(&env, masset_amount > 0, ErrorCode::ZeroAmount)?;

        let (working, raw_out, fee) = validator::compute_redeem_single(
            &env,
            &basket,
            &config,
            basset_index,
            masset_amount.cast(&env)?,
        )?;

        let out: i128 = raw_out.cast(&env)?;
        validate!(
            &env,
            out >= min_output,
            ErrorCode::SlippageExceeded,
            "redeem output {} below minimum {}",
            out,
            min_output
        )?;

        pay_out(&env, &basket, &sender, basset_index, out)?;
        save_basket(&env, &working);

        let mut outputs: Vec<i128> = vec![&env];
        for i in 0..basket.bassets.len() {
            outputs.push_back(if i == basset_index { out } else { 0 });
        }
        MassetEvents::redeemed(&env, sender, masset_amount, outputs, fee);
        Ok(out)
    }

    fn redeem_exact(
        env: Env,
        sender: Address,
        amounts: Vec<i128>,
        max_masset: i128,
    ) -> Result<i128, ErrorCode> {
        sender.require_auth();

        let config = get_config(&env);
        let basket = get_basket(&env);
        basket.ensure_not_failed(&env)?;

        let (working, required, fee) =
            validator::compute_redeem_exact(&env, &basket, &config, &amounts)?;

        let burned: i128 = required.cast(&env)?;
        validate!(
            &env,
            burned <= max_masset,
            ErrorCode::SlippageExceeded,
            "required burn {} above maximum {}",
            burned,
            max_masset
        )?;

        for (i, amount) in amounts.iter().enumerate() {
            pay_out(&env, &basket, &sender, i as u32, amount)?;
        }

        save_basket(&env, &working);
        MassetEvents::redeemed(&env, sender, burned, amounts, fee);
        Ok(burned)
    }

    // ################################################################
    //                          Peg monitor
    // ################################################################

    fn update_prices(
        env: Env,
        observations: Vec<PriceObservation>,
    ) -> Result<u32, ErrorCode> {
        let config = get_config(&env);
        let mut basket = get_basket(&env);
        basket.ensure_not_failed(&env)?;

        let now = env.ledger().timestamp();
        let changes = peg::assess(&env, &mut basket, &config.peg, &observations, now)?;

        if !changes.is_empty() {
            save_basket(&env, &basket);
        }
        for change in changes.iter() {
            MassetEvents::basset_status(
                &env,
                change.basset_index,
                change.old_status,
                change.new_status,
                change.deviation_bps,
            );
        }
        Ok(changes.len())
    }

    // ################################################################
    //                       Recollateralization
    // ################################################################

    fn mark_liquidating(env: Env, basset_index: u32) -> Result<(), ErrorCode> {
        let config = get_config(&env);
        config.governor.require_auth();

        let mut basket = get_basket(&env);
        let notional = liquidation::mark_liquidating(&env, &mut basket, basset_index)?;
        save_basket(&env, &basket);

        MassetEvents::liquidation_started(&env, basset_index, notional);
        Ok(())
    }

    fn complete_liquidation(
        env: Env,
        basset_index: u32,
        recovered_value: u128,
    ) -> Result<(), ErrorCode> {
        let config = get_config(&env);
        config.governor.require_auth();

        let mut basket = get_basket(&env);
        let settlement = liquidation::complete_liquidation(
            &env,
            &mut basket,
            &config,
            basset_index,
            recovered_value,
        )?;
        save_basket(&env, &basket);

        MassetEvents::liquidation_completed(
            &env,
            basset_index,
            settlement.notional,
            settlement.recovered_value,
            settlement.collateralisation_ratio,
        );
        if settlement.basket_failed {
            MassetEvents::basket_failed(&env, settlement.collateralisation_ratio);
        }
        Ok(())
    }

    // ################################################################
    //                            Queries
    // ################################################################

    fn query_config(env: Env) -> Result<ConfigResponse, ErrorCode> {
        Ok(ConfigResponse {
            config: get_config(&env),
        })
    }

    fn query_composition(env: Env) -> Result<CompositionResponse, ErrorCode> {
        let basket = get_basket(&env);
        let indices = basket.active_indices(&env);
        let weights = basket.active_weights(&env)?;

        let mut bassets: Vec<BassetResponse> = vec![&env];
        for (i, basset) in basket.bassets.iter().enumerate() {
            let index = i as u32;
            let mut weight: u128 = 0;
            let mut position = 0;
            for active in indices.iter() {
                if active == index {
                    weight = weights.get(position).unwrap_or(0);
                    break;
                }
                position += 1;
            }
            bassets.push_back(BassetResponse {
                index,
                normalized_balance: basset.normalized_balance(&env)?,
                weight,
                basset,
            });
        }

        Ok(CompositionResponse {
            bassets,
            total_normalized: basket.total_active_normalized(&env)?,
            masset_supply: basket.masset_supply,
            surplus: basket.surplus,
            collateralisation_ratio: basket.collateralisation_ratio,
            backing_ratio: basket.backing_ratio(&env)?,
            failed: basket.failed,
            expired_bassets: basket.expired_bassets.clone(),
        })
    }

    fn query_basset(env: Env, basset_index: u32) -> Result<BassetResponse, ErrorCode> {
        let basket = get_basket(&env);
        let basset = basket.get_basset(&env, basset_index)?;
        let composition = Self::query_composition(env.clone())?;
        let entry = composition
            .bassets
            .get(basset_index)
            .ok_or(ErrorCode::BassetNotFound)?;
        Ok(BassetResponse {
            index: basset_index,
            normalized_balance: basset.normalized_balance(&env)?,
            weight: entry.weight,
            basset,
        })
    }

    fn query_basset_status(env: Env, basset_index: u32) -> Result<BassetStatus, ErrorCode> {
        let basket = get_basket(&env);
        Ok(basket.get_basset(&env, basset_index)?.status)
    }

    fn query_active_bassets(env: Env) -> Result<ActiveBassetsResponse, ErrorCode> {
        let basket = get_basket(&env);
        let indices = basket.active_indices(&env);
        let mut bassets: Vec<Basset> = vec![&env];
        for index in indices.iter() {
            bassets.push_back(basket.get_basset(&env, index)?);
        }
        Ok(ActiveBassetsResponse { indices, bassets })
    }

    fn preview_mint_multi(env: Env, amounts: Vec<i128>) -> Result<i128, ErrorCode> {
        let config = get_config(&env);
        let basket = get_basket(&env);
        let (_, minted, _) = validator::compute_mint(&env, &basket, &config, &amounts)?;
        minted.cast(&env)
    }

    fn preview_mint_single(env: Env, basset_index: u32, amount: i128) -> Result<i128, ErrorCode> {
        let config = get_config(&env);
        let basket = get_basket(&env);
        let (_, minted, _) =
            validator::compute_mint_single(&env, &basket, &config, basset_index, amount)?;
        minted.cast(&env)
    }

    fn preview_swap(
        env: Env,
        input_index: u32,
        output_index: u32,
        amount: i128,
    ) -> Result<i128, ErrorCode> {
        let config = get_config(&env);
        let basket = get_basket(&env);
        let (_, raw_out, _) =
            validator::compute_swap(&env, &basket, &config, input_index, output_index, amount)?;
        raw_out.cast(&env)
    }

    fn preview_redeem_proportional(
        env: Env,
        masset_amount: i128,
    ) -> Result<Vec<i128>, ErrorCode> {
        let config = get_config(&env);
        let basket = get_basket(&env);
        let (_, outputs, _) = validator::compute_redeem_proportional(
            &env,
            &basket,
            &config,
            masset_amount.cast(&env)?,
        )?;
        Ok(outputs)
    }

    fn preview_redeem_single(
        env: Env,
        basset_index: u32,
        masset_amount: i128,
    ) -> Result<i128, ErrorCode> {
        let config = get_config(&env);
        let basket = get_basket(&env);
        let (_, raw_out, _) = validator::compute_redeem_single(
            &env,
            &basket,
            &config,
            basset_index,
            masset_amount.cast(&env)?,
        )?;
        raw_out.cast(&env)
    }

    fn preview_redeem_exact(env: Env, amounts: Vec<i128>) -> Result<i128, ErrorCode> {
        let config = get_config(&env);
        let basket = get_basket(&env);
        let (_, required, _) = validator::compute_redeem_exact(&env, &basket, &config, &amounts)?;
        required.cast(&env)
    }
}
