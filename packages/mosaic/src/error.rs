use soroban_sdk::contracterror;

pub type MosaicResult<T> = Result<T, ErrorCode>;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ErrorCode {
    AlreadyInitialized = 1,
    NotAuthorized = 2,
    WeightLimitExceeded = 3,
    SlippageExceeded = 4,
    InsufficientCollateralisation = 5,
    BasketFailed = 6,
    InvalidAssetStatus = 7,
    StaleOracleData = 8,
    OracleNonPositive = 9,
    IllegalStatusTransition = 10,
    InvariantDidNotConverge = 11,
    MathError = 12,
    CastingFailure = 13,
    BnConversionError = 14,
    BassetAlreadyExists = 15,
    BassetNotFound = 16,
    MaxBassetsReached = 17,
    InvalidRatio = 18,
    InvalidFee = 19,
    InvalidWeightLimits = 20,
    InvalidAmplification = 21,
    ZeroAmount = 22,
    InputLengthMismatch = 23,
    LiquidationNotActive = 24,
}
