//! Call dispatch over libffi.
//!
//! Builds the native call frame (ordered argument slots plus one return
//! slot) from the marshaled arguments and executes the call through
//! `libffi::middle`. Argument order is preserved exactly as declared;
//! nothing here reorders or normalizes the slots.
//!
//! If the declared signature does not match the callee's actual ABI the
//! call may crash the process. That is the documented trust boundary of
//! this tool, not a recoverable error.

use std::ffi::{c_char, c_void};

use libffi::middle::{Arg, Cif, CodePtr, Type};
use log::debug;

use crate::error::{CliffiError, Result};
use crate::marshal::MarshaledArg;
use crate::types::TypeTag;

/// The raw return slot of one call, typed by the declared return tag.
#[derive(Debug, Clone, Copy)]
pub enum ReturnValue {
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
    Bool(bool),
    /// Address returned by the callee; read lazily by the formatter
    Str(*const c_char),
    Pointer(*mut c_void),
    Void,
}

/// Invoke the function at `address` with the given return type and
/// marshaled arguments, in declared order.
pub fn invoke(
    address: *mut c_void,
    return_type: TypeTag,
    args: &[MarshaledArg],
) -> Result<ReturnValue> {
    if address.is_null() {
        return Err(CliffiError::CallDispatch(
            "function address is null".into(),
        ));
    }

    let arg_types: Vec<Type> = args.iter().map(MarshaledArg::ffi_type).collect();
    let ffi_args: Vec<Arg> = args.iter().map(MarshaledArg::as_arg).collect();
    let cif = Cif::new(arg_types, return_type.ffi_type());
    let code = CodePtr(address);

    debug!(
        "dispatching call at {:p} with {} argument(s), returning {}",
        address,
        args.len(),
        return_type
    );

    // SAFETY: the argument slots point into `args`, which outlives the
    // call, and the frame layout matches the declared tags. Whether the
    // declared signature matches the callee is the caller's claim.
    let value = unsafe {
        match return_type {
            TypeTag::Char => ReturnValue::Char(cif.call::<i8>(code, &ffi_args)),
            TypeTag::Short => ReturnValue::Short(cif.call::<i16>(code, &ffi_args)),
            TypeTag::Int => ReturnValue::Int(cif.call::<i32>(code, &ffi_args)),
            TypeTag::Long => ReturnValue::Long(cif.call::<i64>(code, &ffi_args)),
            TypeTag::UChar => ReturnValue::UChar(cif.call::<u8>(code, &ffi_args)),
            TypeTag::UShort => ReturnValue::UShort(cif.call::<u16>(code, &ffi_args)),
            TypeTag::UInt => ReturnValue::UInt(cif.call::<u32>(code, &ffi_args)),
            TypeTag::ULong => ReturnValue::ULong(cif.call::<u64>(code, &ffi_args)),
            TypeTag::Float => ReturnValue::Float(cif.call::<f32>(code, &ffi_args)),
            TypeTag::Double => ReturnValue::Double(cif.call::<f64>(code, &ffi_args)),
            TypeTag::Bool => ReturnValue::Bool(cif.call::<u8>(code, &ffi_args) != 0),
            TypeTag::Str => ReturnValue::Str(cif.call::<*const c_char>(code, &ffi_args)),
            TypeTag::Pointer => {
                ReturnValue::Pointer(cif.call::<*mut c_void>(code, &ffi_args))
            }
            TypeTag::Void => {
                cif.call::<()>(code, &ffi_args);
                ReturnValue::Void
            }
        }
    };

    Ok(value)
}
