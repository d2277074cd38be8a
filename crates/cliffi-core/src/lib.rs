//! Dynamic invocation engine for calling exported functions in shared
//! libraries without compiled calling code.
//!
//! The pipeline is fully synchronous and runs once per invocation:
//!
//! ```text
//! CLI tokens -> CallDescriptor -> MarshaledArg buffers
//!            -> resolved symbol -> libffi call -> formatted return value
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cliffi_core::{execute, CallDescriptor};
//!
//! let tokens: Vec<String> = ["i", "add", "i", "2", "i", "3"]
//!     .iter().map(|t| t.to_string()).collect();
//! let descriptor = CallDescriptor::parse("./libtest.so", &tokens)?;
//! let line = execute(&descriptor)?;
//! assert_eq!(line, "5");
//! # Ok::<(), cliffi_core::CliffiError>(())
//! ```
//!
//! The engine trusts the caller's declared signature. If it does not
//! match the library's actual ABI, the native call may crash the
//! process; that is a documented trust boundary, not a defect.

mod error;
mod format;
mod invoke;
mod library;
mod marshal;
mod parser;
mod types;

pub use error::{CliffiError, Result};
pub use format::format_return;
pub use invoke::{invoke, ReturnValue};
pub use library::NativeLibrary;
pub use marshal::{marshal_all, MarshaledArg};
pub use parser::CallDescriptor;
pub use types::TypeTag;

use log::debug;

/// Run the full pipeline for one descriptor and return the formatted
/// return value.
///
/// Marshaling happens before the library is opened, so every value
/// conversion error is reported without touching the filesystem. The
/// library handle and argument buffers are dropped when this returns,
/// on success and on every error path.
pub fn execute(descriptor: &CallDescriptor) -> Result<String> {
    let args = marshal_all(&descriptor.args)?;

    let library = NativeLibrary::open(&descriptor.library_path)?;
    debug!(
        "loaded '{}', resolving '{}'",
        library.path(),
        descriptor.function_name
    );
    let address = library.resolve(&descriptor.function_name)?;

    let value = invoke(address, descriptor.return_type, &args)?;
    Ok(format_return(&value))
}
