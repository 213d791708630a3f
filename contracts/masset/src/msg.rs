use soroban_sdk::{contracttype, Address, Vec};

use crate::storage::{Basset, Config};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigResponse {
    pub config: Config,
}

/// Snapshot of one basset with its derived pricing inputs.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BassetResponse {
    pub index: u32,
    pub basset: Basset,
    pub normalized_balance: u128,
    /// Share of total active normalized value, WEIGHT_PRECISION scale.
    /// Zero for assets outside the active set.
    pub weight: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompositionResponse {
    pub bassets: Vec<BassetResponse>,
    pub total_normalized: u128,
    pub masset_supply: u128,
    pub surplus: u128,
    pub collateralisation_ratio: u128,
    pub backing_ratio: u128,
    pub failed: bool,
    pub expired_bassets: Vec<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActiveBassetsResponse {
    pub indices: Vec<u32>,
    pub bassets: Vec<Basset>,
}
