/// Internal normalized scale. Every bAsset quantity is brought to this
/// precision before any invariant math runs.
pub const FULL_SCALE: u128 = 1_000_000_000_000_000_000;

/// Fixed-point scale of a bAsset ratio. A bAsset with `d` native decimals
/// registers with `ratio = RATIO_SCALE * 10^(18 - d)`.
pub const RATIO_SCALE: u128 = 100_000_000;

/// Basis point precision used for fees and peg deviation.
pub const BPS_PRECISION: u64 = 10_000;

/// Scale of basket weights and of the collateralisation ratio.
pub const WEIGHT_PRECISION: u128 = FULL_SCALE;

/// Oracle price scale. A bAsset sitting exactly on its peg reports
/// `PRICE_PRECISION`.
pub const PRICE_PRECISION: i128 = 1_000_000;

/// Upper bound on any single fee rate.
pub const MAX_FEE_BPS: u64 = 1_000;

/// Bounds on the amplification coefficient.
pub const MIN_AMP: u64 = 1;
pub const MAX_AMP: u64 = 1_000_000;

/// Iteration budget for the invariant root finder. The solver converges to
/// within one unit of normalized precision or the call fails.
pub const MAX_SOLVER_ITERATIONS: u32 = 256;

pub const DAY_IN_LEDGERS: u32 = 17_280;

pub const PERSISTENT_BUMP_AMOUNT: u32 = 120 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - 20 * DAY_IN_LEDGERS;
