use mosaic::types::{BassetStatus, FeeConfig, PegConfig, WeightLimits};
use soroban_sdk::{Address, Env, Symbol, Vec};

pub struct MassetEvents {}

impl MassetEvents {
    /// Emitted once when the basket engine is initialized
    ///
    /// - topics - `["initialize", admin: Address, governor: Address]`
    /// - data - `[max_bassets: u32]`
    pub fn initialize(env: &Env, admin: Address, governor: Address, max_bassets: u32) {
        let topics = (Symbol::new(env, "initialize"), admin, governor);
        env.events().publish(topics, max_bassets);
    }

    /// Emitted when a collateral asset joins the basket
    ///
    /// - topics - `["basset_registered", address: Address, index: u32]`
    /// - data - `[ratio: u128, is_transfer_fee_charged: bool]`
    pub fn basset_registered(
        env: &Env,
        address: Address,
        index: u32,
        ratio: u128,
        is_transfer_fee_charged: bool,
    ) {
        let topics = (Symbol::new(env, "basset_registered"), address, index);
        env.events().publish(topics, (ratio, is_transfer_fee_charged));
    }

    /// Emitted when an asset's weight bounds change
    ///
    /// - topics - `["weight_limits_updated", index: u32]`
    /// - data - `[min: u128, max: u128]`
    pub fn weight_limits_updated(env: &Env, index: u32, limits: WeightLimits) {
        let topics = (Symbol::new(env, "weight_limits_updated"), index);
        env.events().publish(topics, (limits.min, limits.max));
    }

    /// Emitted when the amplification coefficient changes
    ///
    /// - topics - `["amplification_updated"]`
    /// - data - `[a: u64]`
    pub fn amplification_updated(env: &Env, a: u64) {
        let topics = (Symbol::new(env, "amplification_updated"),);
        env.events().publish(topics, a);
    }

    /// Emitted when fee rates change
    ///
    /// - topics - `["fees_updated"]`
    /// - data - `[mint_fee_bps: u64, swap_fee_bps: u64, redemption_fee_bps: u64]`
    pub fn fees_updated(env: &Env, fees: FeeConfig) {
        let topics = (Symbol::new(env, "fees_updated"),);
        env.events().publish(
            topics,
            (fees.mint_fee_bps, fees.swap_fee_bps, fees.redemption_fee_bps),
        );
    }

    /// Emitted when peg monitoring parameters change
    ///
    /// - topics - `["peg_config_updated"]`
    /// - data - `[deviation_threshold_bps: u64, staleness_secs: u64]`
    pub fn peg_config_updated(env: &Env, peg: PegConfig) {
        let topics = (Symbol::new(env, "peg_config_updated"),);
        env.events()
            .publish(topics, (peg.deviation_threshold_bps, peg.staleness_secs));
    }

    /// Emitted when mAsset is minted against deposited collateral
    ///
    /// - topics - `["minted", sender: Address]`
    /// - data - `[amounts: Vec<i128>, masset_minted: i128, fee: u128]`
    pub fn minted(env: &Env, sender: Address, amounts: Vec<i128>, masset_minted: i128, fee: u128) {
        let topics = (Symbol::new(env, "minted"), sender);
        env.events().publish(topics, (amounts, masset_minted, fee));
    }

    /// Emitted on a collateral-for-collateral swap
    ///
    /// - topics - `["swapped", sender: Address, input_index: u32, output_index: u32]`
    /// - data - `[amount_in: i128, amount_out: i128, fee: u128]`
    pub fn swapped(
        env: &Env,
        sender: Address,
        input_index: u32,
        output_index: u32,
        amount_in: i128,
        amount_out: i128,
        fee: u128,
    ) {
        let topics = (
            Symbol::new(env, "swapped"),
            sender,
            input_index,
            output_index,
        );
        env.events().publish(topics, (amount_in, amount_out, fee));
    }

    /// Emitted when mAsset is burned for collateral
    ///
    /// - topics - `["redeemed", sender: Address]`
    /// - data - `[masset_burned: i128, outputs: Vec<i128>, fee: u128]`
    pub fn redeemed(env: &Env, sender: Address, masset_burned: i128, outputs: Vec<i128>, fee: u128) {
        let topics = (Symbol::new(env, "redeemed"), sender);
        env.events().publish(topics, (masset_burned, outputs, fee));
    }

    /// Emitted for each peg-driven status transition
    ///
    /// - topics - `["basset_status", index: u32]`
    /// - data - `[old_status: BassetStatus, new_status: BassetStatus, deviation_bps: u64]`
    pub fn basset_status(
        env: &Env,
        index: u32,
        old_status: BassetStatus,
        new_status: BassetStatus,
        deviation_bps: u64,
    ) {
        let topics = (Symbol::new(env, "basset_status"), index);
        env.events()
            .publish(topics, (old_status, new_status, deviation_bps));
    }

    /// Emitted when an asset is handed to the liquidation collaborator
    ///
    /// - topics - `["liquidation_started", index: u32]`
    /// - data - `[notional: u128]`
    pub fn liquidation_started(env: &Env, index: u32, notional: u128) {
        let topics = (Symbol::new(env, "liquidation_started"), index);
        env.events().publish(topics, notional);
    }

    /// Emitted when a liquidation settles
    ///
    /// - topics - `["liquidation_completed", index: u32]`
    /// - data - `[notional: u128, recovered_value: u128, collateralisation_ratio: u128]`
    pub fn liquidation_completed(
        env: &Env,
        index: u32,
        notional: u128,
        recovered_value: u128,
        collateralisation_ratio: u128,
    ) {
        let topics = (Symbol::new(env, "liquidation_completed"), index);
        env.events()
            .publish(topics, (notional, recovered_value, collateralisation_ratio));
    }

    /// Emitted once when the catastrophic-failure latch is set
    ///
    /// - topics - `["basket_failed"]`
    /// - data - `[collateralisation_ratio: u128]`
    pub fn basket_failed(env: &Env, collateralisation_ratio: u128) {
        let topics = (Symbol::new(env, "basket_failed"),);
        env.events().publish(topics, collateralisation_ratio);
    }

    /// Emitted when an asset is blacklisted by governance
    ///
    /// - topics - `["basset_blacklisted", index: u32]`
    /// - data - ()
    pub fn basset_blacklisted(env: &Env, index: u32) {
        let topics = (Symbol::new(env, "basset_blacklisted"), index);
        env.events().publish(topics, ());
    }
}
