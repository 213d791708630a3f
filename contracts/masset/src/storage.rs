use mosaic::{
    constants::{
        FULL_SCALE, PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD, WEIGHT_PRECISION,
    },
    error::{ErrorCode, MosaicResult},
    math::bn::mul_div_floor,
    math::ratio::normalize,
    types::{AmplificationConfig, BassetStatus, FeeConfig, PegConfig, WeightLimits},
    validate,
};
use soroban_sdk::{contracttype, log, vec, Address, Env, Vec};

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Config = 1,
    Basket = 2,
    Initialized = 3,
}

// ################################################################
//                            Config
// ################################################################

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub admin: Address,
    /// Address allowed to drive status transitions and liquidations.
    pub governor: Address,
    pub amplification: AmplificationConfig,
    pub fees: FeeConfig,
    pub peg: PegConfig,
    /// Floor on effective backing per outstanding mAsset, at FULL_SCALE.
    pub collateralisation_floor: u128,
}

pub fn save_config(env: &Env, config: Config) {
    env.storage().persistent().set(&DataKey::Config, &config);
    env.storage().persistent().extend_ttl(
        &DataKey::Config,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

pub fn get_config(env: &Env) -> Config {
    let config = env
        .storage()
        .persistent()
        .get(&DataKey::Config)
        .expect("Masset: Config not set");

    env.storage().persistent().extend_ttl(
        &DataKey::Config,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );

    config
}

// ################################################################
//                         Basket ledger
// ################################################################

/// One collateral asset in the basket. Created once at registration and
/// never deleted; terminal statuses exclude it from pricing while keeping
/// the record for settlement and audit.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Basset {
    pub address: Address,
    pub status: BassetStatus,
    /// Fixed-point scaling factor to the normalized scale. Immutable after
    /// registration.
    pub ratio: u128,
    /// Raw vault balance in the asset's native decimals.
    pub vault_balance: i128,
    /// When set, deposits credit the measured post-transfer delta rather
    /// than the nominal amount.
    pub is_transfer_fee_charged: bool,
    pub weight_limits: WeightLimits,
    /// Normalized value owed to the basket while the asset unwinds.
    pub liquidation_notional: u128,
}

impl Basset {
    pub fn normalized_balance(&self, env: &Env) -> MosaicResult<u128> {
        let raw = if self.vault_balance < 0 {
            return Err(ErrorCode::MathError);
        } else {
            self.vault_balance as u128
        };
        normalize(env, raw, self.ratio)
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Basket {
    /// Insertion order is index order; indices are stable identifiers.
    pub bassets: Vec<Basset>,
    pub max_bassets: u32,
    /// Addresses permanently removed from all future registration.
    pub expired_bassets: Vec<Address>,
    /// Catastrophic-failure latch. Once set, every mutating operation is
    /// rejected.
    pub failed: bool,
    /// Outstanding mAsset held by users, normalized scale.
    pub masset_supply: u128,
    /// Accrued fees, denominated in mAsset and claimable by governance.
    pub surplus: u128,
    /// Effective backing per outstanding mAsset, at FULL_SCALE. Recomputed
    /// on recollateralization events.
    pub collateralisation_ratio: u128,
    /// Sum of recovered values from completed liquidations, normalized.
    pub recovered_value: u128,
}

impl Basket {
    pub fn new(env: &Env, max_bassets: u32) -> Self {
        Basket {
            bassets: vec![env],
            max_bassets,
            expired_bassets: vec![env],
            failed: false,
            masset_supply: 0,
            surplus: 0,
            collateralisation_ratio: FULL_SCALE,
            recovered_value: 0,
        }
    }

    pub fn ensure_not_failed(&self, env: &Env) -> MosaicResult<()> {
        validate!(env, !self.failed, ErrorCode::BasketFailed)
    }

    pub fn get_basset(&self, env: &Env, index: u32) -> MosaicResult<Basset> {
        match self.bassets.get(index) {
            Some(basset) => Ok(basset),
            None => {
                log!(env, "Unknown basset index: {}", index);
                Err(ErrorCode::BassetNotFound)
            }
        }
    }

    pub fn contains_address(&self, address: &Address) -> bool {
        self.bassets.iter().any(|b| b.address == *address)
            || self.expired_bassets.contains(address)
    }

    /// Indices of all bassets currently eligible for invariant pricing,
    /// in index order.
    pub fn active_indices(&self, env: &Env) -> Vec<u32> {
        let mut indices = vec![env];
        for (i, basset) in self.bassets.iter().enumerate() {
            if basset.status.is_normal() {
                indices.push_back(i as u32);
            }
        }
        indices
    }

    /// Normalized balances of the active bassets, aligned with
    /// `active_indices`.
    pub fn active_balances(&self, env: &Env) -> MosaicResult<Vec<u128>> {
        let mut balances = vec![env];
        for basset in self.bassets.iter() {
            if basset.status.is_normal() {
                balances.push_back(basset.normalized_balance(env)?);
            }
        }
        Ok(balances)
    }

    pub fn total_active_normalized(&self, env: &Env) -> MosaicResult<u128> {
        let mut total: u128 = 0;
        for balance in self.active_balances(env)?.iter() {
            total = total.checked_add(balance).ok_or(ErrorCode::MathError)?;
        }
        Ok(total)
    }

    /// mAsset claims outstanding against the basket, including accrued fees.
    pub fn outstanding(&self, env: &Env) -> MosaicResult<u128> {
        self.masset_supply
            .checked_add(self.surplus)
            .ok_or_else(mosaic::math_error!(env))
    }

    /// Current backing ratio: active normalized collateral plus recovered
    /// liquidation value, per outstanding mAsset. FULL_SCALE when there is
    /// nothing outstanding.
    pub fn backing_ratio(&self, env: &Env) -> MosaicResult<u128> {
        let outstanding = self.outstanding(env)?;
        if outstanding == 0 {
            return Ok(FULL_SCALE);
        }
        let backing = self
            .total_active_normalized(env)?
            .checked_add(self.recovered_value)
            .ok_or_else(mosaic::math_error!(env))?;
        mul_div_floor(env, backing, FULL_SCALE, outstanding)
    }

    /// Weight of each active basset as a share of total active normalized
    /// value, at WEIGHT_PRECISION scale. Aligned with `active_indices`.
    pub fn active_weights(&self, env: &Env) -> MosaicResult<Vec<u128>> {
        let balances = self.active_balances(env)?;
        let mut total: u128 = 0;
        for balance in balances.iter() {
            total = total.checked_add(balance).ok_or(ErrorCode::MathError)?;
        }
        let mut weights = vec![env];
        for balance in balances.iter() {
            if total == 0 {
                weights.push_back(0);
            } else {
                weights.push_back(mul_div_floor(env, balance, WEIGHT_PRECISION, total)?);
            }
        }
        Ok(weights)
    }

    pub fn set_basset(&mut self, env: &Env, index: u32, basset: Basset) -> MosaicResult<()> {
        if index >= self.bassets.len() {
            log!(env, "Unknown basset index: {}", index);
            return Err(ErrorCode::BassetNotFound);
        }
        self.bassets.set(index, basset);
        Ok(())
    }
}

pub fn save_basket(env: &Env, basket: &Basket) {
    env.storage().persistent().set(&DataKey::Basket, basket);
    env.storage().persistent().extend_ttl(
        &DataKey::Basket,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

pub fn get_basket(env: &Env) -> Basket {
    let basket = env
        .storage()
        .persistent()
        .get(&DataKey::Basket)
        .expect("Masset: Basket not set");

    env.storage().persistent().extend_ttl(
        &DataKey::Basket,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );

    basket
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Initialized)
        .unwrap_or(false)
}

pub fn set_initialized(env: &Env) {
    env.storage().persistent().set(&DataKey::Initialized, &true);
    env.storage().persistent().extend_ttl(
        &DataKey::Initialized,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}
