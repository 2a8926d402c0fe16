//! Type-directed conversion of environment strings into field values
//!
//! The set of supported field types is closed. [`convert`] looks the slot's
//! type up by `TypeId` and runs the matching parser; any other type is
//! reported as [`ConvertError::Unsupported`] rather than rejected at compile
//! time, so one odd field never stops the rest of a struct from binding.

use crate::error::ConvertError;
use num_complex::{Complex32, Complex64};
use std::any::Any;
use std::str::FromStr;
use std::time::Duration;

/// Convert `value` to the type of `slot` and store it there.
///
/// `slot` is only written on success.
///
/// | Field type | Accepted input |
/// |---|---|
/// | `String` | anything, verbatim |
/// | `i8` .. `i128`, `isize` | base-10 integer in range |
/// | `u8` .. `u128`, `usize` | base-10 unsigned integer in range |
/// | `bool` | `1 t T TRUE true True`, `0 f F FALSE false False` |
/// | `f32`, `f64` | base-10 float |
/// | `Duration` | duration literal such as `30s`, `1h30m`, `250ms` |
/// | `Complex32`, `Complex64` | `re+imi`, optionally in parentheses |
/// | `Vec<String>` | comma separated, elements kept untrimmed |
///
/// # Errors
///
/// [`ConvertError::Parse`] if the literal is invalid for the type,
/// [`ConvertError::Unsupported`] if the type is not in the table above.
///
/// ```
/// use std::time::Duration;
///
/// let mut timeout = Duration::ZERO;
/// envar::convert("30s", &mut timeout).unwrap();
/// assert_eq!(timeout, Duration::from_secs(30));
///
/// let mut port: u16 = 0;
/// assert!(envar::convert("http", &mut port).is_err());
/// assert_eq!(port, 0);
/// ```
pub fn convert<T: Any>(value: &str, slot: &mut T) -> Result<(), ConvertError> {
    let slot: &mut dyn Any = slot;

    macro_rules! dispatch {
        ($($ty:ty => $parse:expr),+ $(,)?) => {
            $(
                if let Some(slot) = slot.downcast_mut::<$ty>() {
                    *slot = $parse(value)?;
                    return Ok(());
                }
            )+
        };
    }

    dispatch! {
        String => parse_string,
        i8 => parse_number::<i8>,
        i16 => parse_number::<i16>,
        i32 => parse_number::<i32>,
        i64 => parse_number::<i64>,
        i128 => parse_number::<i128>,
        isize => parse_number::<isize>,
        u8 => parse_number::<u8>,
        u16 => parse_number::<u16>,
        u32 => parse_number::<u32>,
        u64 => parse_number::<u64>,
        u128 => parse_number::<u128>,
        usize => parse_number::<usize>,
        bool => parse_bool,
        f32 => parse_number::<f32>,
        f64 => parse_number::<f64>,
        Duration => parse_duration,
        Complex32 => parse_complex::<f32>,
        Complex64 => parse_complex::<f64>,
        Vec<String> => parse_list,
    }

    Err(ConvertError::unsupported::<T>(value))
}

fn parse_string(value: &str) -> Result<String, ConvertError> {
    Ok(value.to_string())
}

fn parse_number<T>(value: &str) -> Result<T, ConvertError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConvertError::parse::<T>(value, e))
}

fn parse_bool(value: &str) -> Result<bool, ConvertError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ConvertError::parse::<bool>(value, "invalid boolean literal")),
    }
}

fn parse_duration(value: &str) -> Result<Duration, ConvertError> {
    // humantime insists on a unit, even for zero
    if value == "0" {
        return Ok(Duration::ZERO);
    }
    humantime::parse_duration(value).map_err(|e| ConvertError::parse::<Duration>(value, e))
}

fn parse_complex<T>(value: &str) -> Result<num_complex::Complex<T>, ConvertError>
where
    num_complex::Complex<T>: FromStr,
    <num_complex::Complex<T> as FromStr>::Err: std::fmt::Display,
{
    let literal = value
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(value);
    literal
        .parse()
        .map_err(|e| ConvertError::parse::<num_complex::Complex<T>>(value, e))
}

fn parse_list(value: &str) -> Result<Vec<String>, ConvertError> {
    Ok(value.split(',').map(str::to_string).collect())
}
