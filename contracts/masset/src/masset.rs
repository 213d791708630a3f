use mosaic::error::ErrorCode;
use mosaic::types::{
    AmplificationConfig, BassetStatus, FeeConfig, PegConfig, PriceObservation, WeightLimits,
};
use soroban_sdk::{Address, Env, Vec};

use crate::msg::{ActiveBassetsResponse, BassetResponse, CompositionResponse, ConfigResponse};

pub trait MassetTrait {
    // ################################################################
    //                      Lifecycle / governance
    // ################################################################

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
    ) -> Result<(), ErrorCode>;

    /// Register a collateral asset. The ratio maps the asset's native
    /// decimal precision onto the normalized scale and is immutable after
    /// registration. Re-registration of a live or expired address is
    /// rejected.
    fn register_basset(
        env: Env,
        address: Address,
        ratio: u128,
        weight_limits: WeightLimits,
        is_transfer_fee_charged: bool,
    ) -> Result<u32, ErrorCode>;

    fn set_weight_limits(env: Env, basset_index: u32, limits: WeightLimits)
        -> Result<(), ErrorCode>;

    fn set_amplification_config(
        env: Env,
        amplification: AmplificationConfig,
    ) -> Result<(), ErrorCode>;

    fn set_fees(env: Env, fees: FeeConfig) -> Result<(), ErrorCode>;

    fn set_peg_config(env: Env, peg: PegConfig) -> Result<(), ErrorCode>;

    /// Permanently remove an asset from active use. The record stays in the
    /// ledger for audit.
    fn blacklist_basset(env: Env, basset_index: u32) -> Result<(), ErrorCode>;

    // ################################################################
    //                           Exchange
    // ################################################################

    /// Deposit collateral across several assets and mint mAsset priced by
    /// the invariant delta. `amounts` are raw native units aligned with
    /// basset indices; zero skips an asset. Fails when any post-deposit
    /// weight leaves its bounds or the result is below `min_output`.
    fn mint_multi(
        env: Env,
        sender: Address,
        amounts: Vec<i128>,
        min_output: i128,
    ) -> Result<i128, ErrorCode>;

    /// Mint against one asset. Shifts basket weight more than `mint_multi`
    /// and so typically incurs more slippage.
    fn mint_single(
        env: Env,
        sender: Address,
        basset_index: u32,
        amount: i128,
        min_output: i128,
    ) -> Result<i128, ErrorCode>;

    /// Exchange one collateral for another holding the invariant constant.
    /// The swap fee is taken from the output side.
    fn swap(
        env: Env,
        sender: Address,
        input_index: u32,
        output_index: u32,
        amount: i128,
        min_output: i128,
    ) -> Result<i128, ErrorCode>;

    /// Burn mAsset and withdraw every active asset pro rata. The
    /// lowest-slippage exit; outputs are scaled by the collateralisation
    /// ratio.
    fn redeem_proportional(
        env: Env,
        sender: Address,
        masset_amount: i128,
        min_outputs: Vec<i128>,
    ) -> Result<Vec<i128>, ErrorCode>;

    fn redeem_single(
        env: Env,
        sender: Address,
        basset_index: u32,
        masset_amount: i128,
        min_output: i128,
    ) -> Result<i128, ErrorCode>;

    /// Withdraw exact raw quantities; the required mAsset burn (fee
    /// included) is computed from the invariant delta and bounded by
    /// `max_masset`.
    fn redeem_exact(
        env: Env,
        sender: Address,
        amounts: Vec<i128>,
        max_masset: i128,
    ) -> Result<i128, ErrorCode>;

    // ################################################################
    //                          Peg monitor
    // ################################################################

    /// Feed a batch of externally sourced price observations. Stale
    /// observations are skipped; fresh ones beyond the deviation threshold
    /// drive status transitions. Returns the number of transitions applied.
    fn update_prices(
        env: Env,
        observations: Vec<PriceObservation>,
    ) -> Result<u32, ErrorCode>;

    // ################################################################
    //                       Recollateralization
    // ################################################################

    /// Hand a broken-peg asset to the liquidation collaborator. Records the
    /// normalized notional owed to the basket.
    fn mark_liquidating(env: Env, basset_index: u32) -> Result<(), ErrorCode>;

    /// Settle a completed unwind. Recomputes the collateralisation ratio
    /// and, on catastrophic shortfall, latches the basket as failed.
    fn complete_liquidation(
        env: Env,
        basset_index: u32,
        recovered_value: u128,
    ) -> Result<(), ErrorCode>;

    // ################################################################
    //                            Queries
    // ################################################################

    fn query_config(env: Env) -> Result<ConfigResponse, ErrorCode>;

    fn query_composition(env: Env) -> Result<CompositionResponse, ErrorCode>;

    fn query_basset(env: Env, basset_index: u32) -> Result<BassetResponse, ErrorCode>;

    fn query_basset_status(env: Env, basset_index: u32) -> Result<BassetStatus, ErrorCode>;

    fn query_active_bassets(env: Env) -> Result<ActiveBassetsResponse, ErrorCode>;

    // Read-only simulations of the exchange operations. Same code paths as
    // the mutating calls, so results are bit-identical for identical state.

    fn preview_mint_multi(env: Env, amounts: Vec<i128>) -> Result<i128, ErrorCode>;

    fn preview_mint_single(env: Env, basset_index: u32, amount: i128) -> Result<i128, ErrorCode>;

    fn preview_swap(
        env: Env,
        input_index: u32,
        output_index: u32,
        amount: i128,
    ) -> Result<i128, ErrorCode>;

    fn preview_redeem_proportional(
        env: Env,
        masset_amount: i128,
    ) -> Result<Vec<i128>, ErrorCode>;

    fn preview_redeem_single(
        env: Env,
        basset_index: u32,
        masset_amount: i128,
    ) -> Result<i128, ErrorCode>;

    fn preview_redeem_exact(env: Env, amounts: Vec<i128>) -> Result<i128, ErrorCode>;
}
