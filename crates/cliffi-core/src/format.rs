//! Return-value formatting.
//!
//! Reinterprets the raw return slot according to the declared return
//! type and renders a human-readable string. Floats use fixed
//! six-decimal notation, matching C's `%f`.

use std::ffi::CStr;

use crate::invoke::ReturnValue;

/// Render one return value for display.
///
/// String returns are read from the callee-supplied address up to the
/// NUL terminator; the caller must guarantee the pointer is valid and
/// terminated (a NULL return renders `(null)` instead of being read).
pub fn format_return(value: &ReturnValue) -> String {
    match value {
        ReturnValue::Char(v) => ((*v as u8) as char).to_string(),
        ReturnValue::Short(v) => v.to_string(),
        ReturnValue::Int(v) => v.to_string(),
        ReturnValue::Long(v) => v.to_string(),
        ReturnValue::UChar(v) => v.to_string(),
        ReturnValue::UShort(v) => v.to_string(),
        ReturnValue::UInt(v) => v.to_string(),
        ReturnValue::ULong(v) => v.to_string(),
        ReturnValue::Float(v) => format!("{v:.6}"),
        ReturnValue::Double(v) => format!("{v:.6}"),
        ReturnValue::Bool(v) => v.to_string(),
        ReturnValue::Str(ptr) => {
            if ptr.is_null() {
                "(null)".to_string()
            } else {
                // SAFETY: caller trust; the declared return type promises
                // a valid NUL-terminated string.
                let text = unsafe { CStr::from_ptr(*ptr) };
                format!("\"{}\"", text.to_string_lossy())
            }
        }
        ReturnValue::Pointer(ptr) => format!("{:#x}", *ptr as usize),
        ReturnValue::Void => "(void)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_integers() {
        assert_eq!(format_return(&ReturnValue::Int(5)), "5");
        assert_eq!(format_return(&ReturnValue::Int(-7)), "-7");
        assert_eq!(format_return(&ReturnValue::Long(i64::MIN)), i64::MIN.to_string());
        assert_eq!(format_return(&ReturnValue::ULong(u64::MAX)), u64::MAX.to_string());
        assert_eq!(format_return(&ReturnValue::UChar(255)), "255");
    }

    #[test]
    fn test_format_floats_fixed_six_decimals() {
        assert_eq!(format_return(&ReturnValue::Double(3.0)), "3.000000");
        assert_eq!(format_return(&ReturnValue::Float(2.5)), "2.500000");
        assert_eq!(format_return(&ReturnValue::Double(-0.125)), "-0.125000");
    }

    #[test]
    fn test_format_bool_and_char() {
        assert_eq!(format_return(&ReturnValue::Bool(true)), "true");
        assert_eq!(format_return(&ReturnValue::Bool(false)), "false");
        assert_eq!(format_return(&ReturnValue::Char(b'a' as i8)), "a");
    }

    #[test]
    fn test_format_string() {
        let bytes = b"hello\0";
        let value = ReturnValue::Str(bytes.as_ptr().cast());
        assert_eq!(format_return(&value), "\"hello\"");
        assert_eq!(
            format_return(&ReturnValue::Str(std::ptr::null())),
            "(null)"
        );
    }

    #[test]
    fn test_format_pointer_and_void() {
        let addr: usize = 0xdead_beef;
        let value = ReturnValue::Pointer(addr as *mut _);
        assert_eq!(format_return(&value), "0xdeadbeef");
        assert_eq!(format_return(&ReturnValue::Void), "(void)");
    }
}
