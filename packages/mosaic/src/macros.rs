#[macro_export]
macro_rules! validate {
    ($env:expr, $assert:expr, $err:expr) => {{
        if $assert {
            Ok(())
        } else {
            let error_code: ErrorCode = $err;
            soroban_sdk::log!($env, "Error {} thrown at {}:{}", error_code, file!(), line!());
            Err(error_code)
        }
    }};
    (
        $env:expr,
        $assert:expr,
        $err:expr,
        $($arg:tt)+
    ) => {{
        if $assert {
            Ok(())
        } else {
            let error_code: ErrorCode = $err;
            soroban_sdk::log!($env, "Error {} thrown at {}:{}", error_code, file!(), line!());
            soroban_sdk::log!($env, $($arg)*);
            Err(error_code)
        }
    }};
}

#[macro_export]
macro_rules! math_error {
    ($env:expr) => {{
        || {
            soroban_sdk::log!($env, "Math error thrown at {}:{}", file!(), line!());
            $crate::error::ErrorCode::MathError
        }
    }};
}
