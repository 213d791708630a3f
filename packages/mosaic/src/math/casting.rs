use soroban_sdk::{log, Env};

use crate::error::{ErrorCode, MosaicResult};

pub trait Cast: Sized {
    /// Perform a checked integer cast, logging the location on failure.
    fn cast<T: CastFrom<Self>>(self, env: &Env) -> MosaicResult<T> {
        T::cast_from(self, env)
    }
}

pub trait CastFrom<S>: Sized {
    fn cast_from(value: S, env: &Env) -> MosaicResult<Self>;
}

macro_rules! impl_cast_from {
    ($from:ty, $to:ty) => {
        impl CastFrom<$from> for $to {
            #[inline(always)]
            fn cast_from(value: $from, env: &Env) -> MosaicResult<$to> {
                match <$to>::try_from(value) {
                    Ok(result) => Ok(result),
                    Err(_) => {
                        log!(env, "Casting error thrown at {}:{}", file!(), line!());
                        Err(ErrorCode::CastingFailure)
                    }
                }
            }
        }
    };
}

impl_cast_from!(u128, i128);
impl_cast_from!(u128, u64);
impl_cast_from!(u128, i64);
impl_cast_from!(u128, u32);
impl_cast_from!(i128, u128);
impl_cast_from!(i128, i64);
impl_cast_from!(i128, u64);
impl_cast_from!(u64, u128);
impl_cast_from!(u64, i128);
impl_cast_from!(u64, i64);
impl_cast_from!(i64, i128);
impl_cast_from!(i64, u64);
impl_cast_from!(u32, u128);
impl_cast_from!(u32, i128);
impl_cast_from!(u32, u64);

impl Cast for u128 {}
impl Cast for u64 {}
impl Cast for u32 {}
impl Cast for i128 {}
impl Cast for i64 {}
impl Cast for i32 {}
