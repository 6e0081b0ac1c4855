//! Textual conversion of raw argument text into typed option values.
//!
//! Every conversion is exhaustive: trailing unconverted characters or an
//! out-of-range numeric literal fail the whole conversion rather than
//! truncating. Empty input is meaningful here — it is what a value-less
//! flag receives — so `bool` maps it to `true` while every other
//! implementation rejects it.

use thiserror::Error;

/// Why a raw argument string failed to convert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// No text was supplied where the target type needs some.
    #[error("a value is required")]
    Empty,
    /// Text was present but is not a valid literal for the target type.
    /// Carries the underlying parse message.
    #[error("{0}")]
    Invalid(String),
}

/// Conversion from a raw command-line token into a typed option value.
///
/// Deliberately narrower than [`std::str::FromStr`]: implementations decide
/// what empty input means instead of uniformly failing on it.
pub trait FromArg: Sized {
    /// Convert `raw` into a value, consuming the whole string.
    fn from_arg(raw: &str) -> Result<Self, ValueError>;
}

impl FromArg for String {
    fn from_arg(raw: &str) -> Result<Self, ValueError> {
        Ok(raw.to_owned())
    }
}

impl FromArg for bool {
    /// A flag invoked with no attached text counts as switched on.
    fn from_arg(raw: &str) -> Result<Self, ValueError> {
        match raw {
            "" | "true" => Ok(true),
            "false" => Ok(false),
            other => Err(ValueError::Invalid(format!(
                "expected `true` or `false`, got {other:?}"
            ))),
        }
    }
}

macro_rules! impl_from_arg_via_from_str {
    ($($ty:ty),* $(,)?) => {$(
        impl FromArg for $ty {
            fn from_arg(raw: &str) -> Result<Self, ValueError> {
                if raw.is_empty() {
                    return Err(ValueError::Empty);
                }
                raw.parse::<$ty>().map_err(|e| ValueError::Invalid(e.to_string()))
            }
        }
    )*};
}

impl_from_arg_via_from_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char,
);
