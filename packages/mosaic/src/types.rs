use soroban_sdk::{contracttype, log, Env};

use crate::constants::{MAX_AMP, MAX_FEE_BPS, MIN_AMP, WEIGHT_PRECISION};
use crate::error::{ErrorCode, MosaicResult};

/// Health of a single collateral asset. Only `Normal` assets participate in
/// invariant pricing; everything else is excluded from the active set but
/// kept in the ledger for settlement and audit.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BassetStatus {
    Normal,
    BrokenBelowPeg,
    BrokenAbovePeg,
    Blacklisted,
    Liquidating,
    Liquidated,
    Failed,
}

impl BassetStatus {
    pub fn is_normal(&self) -> bool {
        matches!(self, BassetStatus::Normal)
    }

    pub fn is_broken(&self) -> bool {
        matches!(
            self,
            BassetStatus::BrokenBelowPeg | BassetStatus::BrokenAbovePeg
        )
    }

    /// The single source of truth for the status state machine. A broken-peg
    /// asset must pass through `Liquidating` before it can reach
    /// `Liquidated`; `Failed` is reachable from anywhere but reserved for
    /// catastrophic basket-level events.
    pub fn can_transition_to(&self, next: BassetStatus) -> bool {
        use BassetStatus::*;
        if next == Failed {
            return true;
        }
        match self {
            Normal => matches!(next, BrokenBelowPeg | BrokenAbovePeg | Blacklisted),
            BrokenBelowPeg | BrokenAbovePeg => {
                matches!(next, Normal | Liquidating | Blacklisted)
            }
            Liquidating => matches!(next, Liquidated),
            Blacklisted | Liquidated | Failed => false,
        }
    }

    pub fn transition(&self, env: &Env, next: BassetStatus) -> MosaicResult<BassetStatus> {
        if !self.can_transition_to(next) {
            log!(env, "Illegal basset status transition");
            return Err(ErrorCode::IllegalStatusTransition);
        }
        Ok(next)
    }
}

/// Bounds on one asset's share of total normalized basket value, at
/// `WEIGHT_PRECISION` scale.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WeightLimits {
    pub min: u128,
    pub max: u128,
}

impl WeightLimits {
    pub fn validate(&self, env: &Env) -> MosaicResult<()> {
        if self.min > self.max || self.max > WEIGHT_PRECISION {
            log!(env, "Invalid weight limits");
            return Err(ErrorCode::InvalidWeightLimits);
        }
        Ok(())
    }
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AmplificationLimits {
    pub min: u64,
    pub max: u64,
}

/// Controls how close the invariant sits to constant-sum (high `a`) versus
/// constant-product (low `a`).
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AmplificationConfig {
    pub a: u64,
    pub limits: AmplificationLimits,
}

impl AmplificationConfig {
    pub fn validate(&self, env: &Env) -> MosaicResult<()> {
        let in_global_bounds =
            self.limits.min >= MIN_AMP && self.limits.max <= MAX_AMP && self.limits.min <= self.limits.max;
        if !in_global_bounds || self.a < self.limits.min || self.a > self.limits.max {
            log!(env, "Invalid amplification config");
            return Err(ErrorCode::InvalidAmplification);
        }
        Ok(())
    }
}

/// Fee rates in basis points. Fees round down in favor of the basket and
/// accrue to the basket surplus.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    pub mint_fee_bps: u64,
    pub swap_fee_bps: u64,
    pub redemption_fee_bps: u64,
}

impl FeeConfig {
    pub fn validate(&self, env: &Env) -> MosaicResult<()> {
        if self.mint_fee_bps > MAX_FEE_BPS
            || self.swap_fee_bps > MAX_FEE_BPS
            || self.redemption_fee_bps > MAX_FEE_BPS
        {
            log!(env, "Fee rate above cap");
            return Err(ErrorCode::InvalidFee);
        }
        Ok(())
    }
}

/// Peg monitoring parameters: how far an observed price may drift from the
/// peg (in bps) and how old an observation may be before it is ignored.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PegConfig {
    pub deviation_threshold_bps: u64,
    pub staleness_secs: u64,
}

/// One externally sourced price observation. `price` is at
/// `PRICE_PRECISION` scale where the peg is exactly `PRICE_PRECISION`.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PriceObservation {
    pub basset_index: u32,
    pub price: i128,
    pub timestamp: u64,
}

#[cfg(test)]
mod test {
    use soroban_sdk::Env;
    use test_case::test_case;

    use super::BassetStatus::{self, *};
    use super::{AmplificationConfig, AmplificationLimits, FeeConfig, WeightLimits};
    use crate::error::ErrorCode;

    #[test_case(Normal, BrokenBelowPeg, true)]
    #[test_case(Normal, BrokenAbovePeg, true)]
    #[test_case(Normal, Blacklisted, true)]
    #[test_case(Normal, Liquidating, false; "normal cannot skip to liquidating")]
    #[test_case(Normal, Liquidated, false)]
    #[test_case(BrokenBelowPeg, Normal, true; "peg restoration")]
    #[test_case(BrokenAbovePeg, Normal, true)]
    #[test_case(BrokenBelowPeg, Liquidating, true)]
    #[test_case(BrokenBelowPeg, Liquidated, false; "cannot skip liquidating")]
    #[test_case(Liquidating, Liquidated, true)]
    #[test_case(Liquidating, Normal, false)]
    #[test_case(Liquidated, Normal, false; "liquidated is terminal")]
    #[test_case(Blacklisted, Normal, false; "blacklisted is terminal")]
    #[test_case(Failed, Normal, false; "failed is terminal")]
    #[test_case(Liquidated, Failed, true; "anything can fail")]
    #[test_case(Normal, Failed, true)]
    fn transition_table(from: BassetStatus, to: BassetStatus, legal: bool) {
        assert_eq!(from.can_transition_to(to), legal);
    }

    #[test]
    fn illegal_transition_is_rejected() {
        let env = Env::default();
        assert_eq!(
            BrokenBelowPeg.transition(&env, Liquidated),
            Err(ErrorCode::IllegalStatusTransition)
        );
        assert_eq!(BrokenBelowPeg.transition(&env, Normal), Ok(Normal));
    }

    #[test]
    fn config_validation() {
        let env = Env::default();
        assert!(WeightLimits { min: 1, max: 0 }.validate(&env).is_err());
        assert!(WeightLimits {
            min: 0,
            max: crate::constants::WEIGHT_PRECISION + 1
        }
        .validate(&env)
        .is_err());

        let fees = FeeConfig {
            mint_fee_bps: 0,
            swap_fee_bps: 10_001,
            redemption_fee_bps: 0,
        };
        assert_eq!(fees.validate(&env), Err(ErrorCode::InvalidFee));

        let amp = AmplificationConfig {
            a: 5,
            limits: AmplificationLimits { min: 10, max: 100 },
        };
        assert_eq!(amp.validate(&env), Err(ErrorCode::InvalidAmplification));
    }
}
