//! Argument marshaling: textual values to native bit patterns.
//!
//! Each marshaled argument owns its native representation for the full
//! duration of the call; string arguments own the NUL-terminated backing
//! buffer and pass its address. Conversions are locale-independent and
//! use `.` as the decimal separator.

use std::ffi::{c_char, c_void, CString};

use libffi::middle::{Arg, Type};

use crate::error::{CliffiError, Result};
use crate::types::TypeTag;

/// A single argument converted to its native representation.
///
/// The enum payload is the argument slot: the dispatcher passes the
/// address of the stored value to libffi, so a `MarshaledArg` must
/// outlive the call it participates in.
#[derive(Debug)]
pub enum MarshaledArg {
    Char(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    UChar(u8),
    UShort(u16),
    UInt(u32),
    ULong(u64),
    Float(f32),
    Double(f64),
    Bool(u8),
    Str {
        /// Owned NUL-terminated copy of the token; must outlive the call
        text: CString,
        /// Address of `text`'s bytes, the value actually passed
        ptr: *const c_char,
    },
    Pointer(*mut c_void),
}

impl MarshaledArg {
    /// Convert a textual value to the native representation for `tag`.
    pub fn marshal(tag: TypeTag, value: &str) -> Result<Self> {
        match tag {
            TypeTag::Char => marshal_char(value),
            TypeTag::Short => parse_signed(tag, value, i16::MIN as i64, i16::MAX as i64)
                .map(|v| MarshaledArg::Short(v as i16)),
            TypeTag::Int => parse_signed(tag, value, i32::MIN as i64, i32::MAX as i64)
                .map(|v| MarshaledArg::Int(v as i32)),
            TypeTag::Long => {
                parse_signed(tag, value, i64::MIN, i64::MAX).map(MarshaledArg::Long)
            }
            TypeTag::UChar => parse_unsigned(tag, value, u8::MAX as u64)
                .map(|v| MarshaledArg::UChar(v as u8)),
            TypeTag::UShort => parse_unsigned(tag, value, u16::MAX as u64)
                .map(|v| MarshaledArg::UShort(v as u16)),
            TypeTag::UInt => parse_unsigned(tag, value, u32::MAX as u64)
                .map(|v| MarshaledArg::UInt(v as u32)),
            TypeTag::ULong => {
                parse_unsigned(tag, value, u64::MAX).map(MarshaledArg::ULong)
            }
            TypeTag::Float => value
                .trim()
                .parse::<f32>()
                .map(MarshaledArg::Float)
                .map_err(|e| conversion_error(tag, value, e.to_string())),
            TypeTag::Double => value
                .trim()
                .parse::<f64>()
                .map(MarshaledArg::Double)
                .map_err(|e| conversion_error(tag, value, e.to_string())),
            TypeTag::Bool => marshal_bool(value),
            TypeTag::Str => {
                let text = CString::new(value).map_err(|_| {
                    conversion_error(tag, value, "embedded NUL byte".into())
                })?;
                let ptr = text.as_ptr();
                Ok(MarshaledArg::Str { text, ptr })
            }
            TypeTag::Pointer => marshal_pointer(value),
            TypeTag::Void => Err(conversion_error(
                tag,
                value,
                "void carries no value".into(),
            )),
        }
    }

    /// The declared type tag this value was marshaled as.
    pub fn tag(&self) -> TypeTag {
        match self {
            MarshaledArg::Char(_) => TypeTag::Char,
            MarshaledArg::Short(_) => TypeTag::Short,
            MarshaledArg::Int(_) => TypeTag::Int,
            MarshaledArg::Long(_) => TypeTag::Long,
            MarshaledArg::UChar(_) => TypeTag::UChar,
            MarshaledArg::UShort(_) => TypeTag::UShort,
            MarshaledArg::UInt(_) => TypeTag::UInt,
            MarshaledArg::ULong(_) => TypeTag::ULong,
            MarshaledArg::Float(_) => TypeTag::Float,
            MarshaledArg::Double(_) => TypeTag::Double,
            MarshaledArg::Bool(_) => TypeTag::Bool,
            MarshaledArg::Str { .. } => TypeTag::Str,
            MarshaledArg::Pointer(_) => TypeTag::Pointer,
        }
    }

    /// The libffi classification for this argument slot.
    pub fn ffi_type(&self) -> Type {
        self.tag().ffi_type()
    }

    /// Borrow this value as a libffi argument slot.
    ///
    /// The returned `Arg` holds the address of the stored value; it is
    /// only valid while `self` is alive and not moved.
    pub fn as_arg(&self) -> Arg {
        match self {
            MarshaledArg::Char(v) => Arg::new(v),
            MarshaledArg::Short(v) => Arg::new(v),
            MarshaledArg::Int(v) => Arg::new(v),
            MarshaledArg::Long(v) => Arg::new(v),
            MarshaledArg::UChar(v) => Arg::new(v),
            MarshaledArg::UShort(v) => Arg::new(v),
            MarshaledArg::UInt(v) => Arg::new(v),
            MarshaledArg::ULong(v) => Arg::new(v),
            MarshaledArg::Float(v) => Arg::new(v),
            MarshaledArg::Double(v) => Arg::new(v),
            MarshaledArg::Bool(v) => Arg::new(v),
            MarshaledArg::Str { ptr, .. } => Arg::new(ptr),
            MarshaledArg::Pointer(v) => Arg::new(v),
        }
    }
}

/// Marshal every (tag, value) pair in declared order.
pub fn marshal_all(args: &[(TypeTag, String)]) -> Result<Vec<MarshaledArg>> {
    args.iter()
        .map(|(tag, value)| MarshaledArg::marshal(*tag, value))
        .collect()
}

fn conversion_error(tag: TypeTag, value: &str, reason: String) -> CliffiError {
    CliffiError::ValueConversion {
        tag,
        value: value.to_string(),
        reason,
    }
}

/// Parse a signed integer literal: base 10, or base 16 with `0x`/`0X`.
/// Rejects values outside `[min, max]` rather than wrapping.
fn parse_signed(tag: TypeTag, text: &str, min: i64, max: i64) -> Result<i64> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let magnitude = parse_magnitude(digits)
        .map_err(|reason| conversion_error(tag, text, reason))?;
    // bound the magnitude before narrowing so the i128 cast cannot wrap
    if magnitude > i64::MAX as u128 + 1 {
        return Err(conversion_error(
            tag,
            text,
            format!("value out of range for {tag} ({min}..={max})"),
        ));
    }
    let value = if negative {
        -(magnitude as i128)
    } else {
        magnitude as i128
    };
    if value < min as i128 || value > max as i128 {
        return Err(conversion_error(
            tag,
            text,
            format!("value out of range for {tag} ({min}..={max})"),
        ));
    }
    Ok(value as i64)
}

/// Parse an unsigned integer literal. Negative input is rejected outright.
fn parse_unsigned(tag: TypeTag, text: &str, max: u64) -> Result<u64> {
    let trimmed = text.trim();
    if trimmed.starts_with('-') {
        return Err(conversion_error(
            tag,
            text,
            format!("negative value for unsigned {tag}"),
        ));
    }
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let magnitude = parse_magnitude(digits)
        .map_err(|reason| conversion_error(tag, text, reason))?;
    if magnitude > max as u128 {
        return Err(conversion_error(
            tag,
            text,
            format!("value out of range for {tag} (0..={max})"),
        ));
    }
    Ok(magnitude as u64)
}

fn parse_magnitude(digits: &str) -> std::result::Result<u128, String> {
    let parsed = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        u128::from_str_radix(hex, 16)
    } else {
        digits.parse::<u128>()
    };
    parsed.map_err(|e| e.to_string())
}

/// `char` accepts either an integer literal or a single ASCII character,
/// matching the original tool's conversion rule.
fn marshal_char(value: &str) -> Result<MarshaledArg> {
    let looks_numeric = value
        .trim()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+');
    if looks_numeric {
        return parse_signed(TypeTag::Char, value, i8::MIN as i64, i8::MAX as i64)
            .map(|v| MarshaledArg::Char(v as i8));
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(MarshaledArg::Char(c as i8)),
        _ => Err(conversion_error(
            TypeTag::Char,
            value,
            "expected an integer or a single ASCII character".into(),
        )),
    }
}

fn marshal_bool(value: &str) -> Result<MarshaledArg> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(MarshaledArg::Bool(1)),
        "false" | "0" => Ok(MarshaledArg::Bool(0)),
        _ => Err(conversion_error(
            TypeTag::Bool,
            value,
            "expected true/false or 0/1".into(),
        )),
    }
}

/// Pointers are given as hexadecimal addresses (`0x` prefix optional);
/// `null`, `NULL`, and `0` yield the null pointer. The address is not
/// validated or dereferenced.
fn marshal_pointer(value: &str) -> Result<MarshaledArg> {
    let trimmed = value.trim();
    if trimmed == "0" || trimmed.eq_ignore_ascii_case("null") {
        return Ok(MarshaledArg::Pointer(std::ptr::null_mut()));
    }
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    usize::from_str_radix(hex, 16)
        .map(|addr| MarshaledArg::Pointer(addr as *mut c_void))
        .map_err(|e| conversion_error(TypeTag::Pointer, value, e.to_string()))
}
