//! Signature parser: CLI tokens to a structured call descriptor.
//!
//! Token layout: `[return_tag, function_name, (arg_tag, arg_value)*]`.
//! The library path is the first CLI positional and arrives separately,
//! outside this grammar.

use crate::error::{CliffiError, Result};
use crate::types::TypeTag;

/// Everything needed to perform one call, built once and immutable.
#[derive(Debug, Clone)]
pub struct CallDescriptor {
    /// Path (or bare name) of the shared library
    pub library_path: String,
    /// Exported symbol to invoke
    pub function_name: String,
    /// Declared return type
    pub return_type: TypeTag,
    /// Declared (type, raw text value) pairs, in call order
    pub args: Vec<(TypeTag, String)>,
}

impl CallDescriptor {
    /// Parse the signature token stream.
    ///
    /// Fails with `InvalidReturnType` if the first token is not a tag,
    /// `UnknownTypeTag` for an argument tag outside the vocabulary (or
    /// `void`, which is return-only), and `MalformedArgumentList` when a
    /// trailing type tag has no value token.
    pub fn parse(library_path: &str, tokens: &[String]) -> Result<Self> {
        let mut iter = tokens.iter();

        let return_token = iter
            .next()
            .ok_or_else(|| CliffiError::Usage("missing return type tag".into()))?;
        let return_type = TypeTag::parse(return_token)
            .ok_or_else(|| CliffiError::InvalidReturnType(return_token.clone()))?;

        let function_name = iter
            .next()
            .ok_or_else(|| CliffiError::Usage("missing function name".into()))?;
        if function_name.is_empty() {
            return Err(CliffiError::Usage("function name is empty".into()));
        }

        let mut args = Vec::new();
        while let Some(tag_token) = iter.next() {
            let tag = TypeTag::parse(tag_token)
                .ok_or_else(|| CliffiError::UnknownTypeTag(tag_token.clone()))?;
            if tag.is_return_only() {
                return Err(CliffiError::UnknownTypeTag(tag_token.clone()));
            }
            let value = iter
                .next()
                .ok_or_else(|| CliffiError::MalformedArgumentList(tag_token.clone()))?;
            args.push((tag, value.clone()));
        }

        Ok(CallDescriptor {
            library_path: library_path.to_string(),
            function_name: function_name.clone(),
            return_type,
            args,
        })
    }
}
