//! Shared library loading and symbol resolution.
//!
//! Thin wrapper over the platform dynamic loader (via `libloading`).
//! The handle is owned here and closed exactly once when the value is
//! dropped, on every exit path; callers only borrow resolved addresses.

use std::ffi::c_void;
use std::path::Path;

use libloading::Library;

use crate::error::{CliffiError, Result};

/// A loaded shared library.
#[derive(Debug)]
pub struct NativeLibrary {
    library: Library,
    /// Path as loaded, kept for diagnostics
    path: String,
}

impl NativeLibrary {
    /// Open a shared library.
    ///
    /// The exact path is tried first. A bare name with no directory
    /// separator and no extension is retried as the platform library
    /// filename (`libfoo.so`, `libfoo.dylib`, `foo.dll`), which lets the
    /// loader search its standard paths.
    pub fn open(path: &str) -> Result<Self> {
        let first = unsafe { Library::new(path) };
        match first {
            Ok(library) => Ok(Self {
                library,
                path: path.to_string(),
            }),
            Err(source) => {
                if let Some(fallback) = Self::platform_fallback_name(path) {
                    if let Ok(library) = unsafe { Library::new(&fallback) } {
                        return Ok(Self {
                            library,
                            path: fallback,
                        });
                    }
                }
                Err(CliffiError::LibraryLoad {
                    path: path.to_string(),
                    source,
                })
            }
        }
    }

    /// Platform filename to retry for a bare library name, if any.
    fn platform_fallback_name(path: &str) -> Option<String> {
        let p = Path::new(path);
        if p.components().count() != 1 || p.extension().is_some() {
            return None;
        }
        #[cfg(target_os = "windows")]
        {
            Some(format!("{path}.dll"))
        }
        #[cfg(target_os = "macos")]
        {
            Some(format!("lib{path}.dylib"))
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            Some(format!("lib{path}.so"))
        }
    }

    /// Resolve an exported function to its address.
    ///
    /// The address is only meaningful while this library stays loaded;
    /// the caller must not use it past the owning `NativeLibrary`.
    pub fn resolve(&self, name: &str) -> Result<*mut c_void> {
        // libloading appends the terminating NUL and rejects interior NULs
        let symbol: libloading::Symbol<'_, unsafe extern "C" fn()> = unsafe {
            self.library.get(name.as_bytes()).map_err(|source| {
                CliffiError::SymbolNotFound {
                    name: name.to_string(),
                    path: self.path.clone(),
                    source,
                }
            })?
        };

        Ok(*symbol as usize as *mut c_void)
    }

    /// Path this library was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }
}
