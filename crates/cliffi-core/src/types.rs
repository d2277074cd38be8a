//! The closed vocabulary of supported type tags.
//!
//! Every type-directed behavior in the engine (native size, parse rule,
//! format rule, libffi classification) routes through this single table,
//! so adding a tag touches one file rather than every call site.

use std::fmt;

use libffi::middle::Type;

/// One primitive, pointer, or void type the tool can marshal.
///
/// Tokens follow the classic single-character flags (`i` for int, `s` for
/// string, uppercase for unsigned) with case-insensitive word aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    /// 8-bit signed integer, also accepts a single character literal
    Char,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 8-bit unsigned integer
    UChar,
    /// 16-bit unsigned integer
    UShort,
    /// 32-bit unsigned integer
    UInt,
    /// 64-bit unsigned integer
    ULong,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// Boolean, passed as an 8-bit integer (0/1)
    Bool,
    /// NUL-terminated string (char*), marshaled as an owned buffer's address
    Str,
    /// Arbitrary pointer (void*) given by address
    Pointer,
    /// No value; legal only as a return type
    Void,
}

impl TypeTag {
    /// Parse a type tag token.
    ///
    /// Single-character flags are case-sensitive (`i` is int, `I` is
    /// unsigned int); word aliases are matched case-insensitively.
    /// Unknown tokens yield `None`, never a default.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "c" => Some(TypeTag::Char),
            "h" => Some(TypeTag::Short),
            "i" => Some(TypeTag::Int),
            "l" => Some(TypeTag::Long),
            "C" => Some(TypeTag::UChar),
            "H" => Some(TypeTag::UShort),
            "I" => Some(TypeTag::UInt),
            "L" => Some(TypeTag::ULong),
            "f" => Some(TypeTag::Float),
            "d" => Some(TypeTag::Double),
            "b" => Some(TypeTag::Bool),
            "s" => Some(TypeTag::Str),
            "p" | "P" => Some(TypeTag::Pointer),
            "v" => Some(TypeTag::Void),
            _ => match token.to_ascii_lowercase().as_str() {
                "char" => Some(TypeTag::Char),
                "short" => Some(TypeTag::Short),
                "int" => Some(TypeTag::Int),
                "long" => Some(TypeTag::Long),
                "uchar" => Some(TypeTag::UChar),
                "ushort" => Some(TypeTag::UShort),
                "uint" => Some(TypeTag::UInt),
                "ulong" => Some(TypeTag::ULong),
                "float" => Some(TypeTag::Float),
                "double" => Some(TypeTag::Double),
                "bool" => Some(TypeTag::Bool),
                "str" | "string" => Some(TypeTag::Str),
                "ptr" | "pointer" => Some(TypeTag::Pointer),
                "void" => Some(TypeTag::Void),
                _ => None,
            },
        }
    }

    /// Byte size of the native representation.
    pub fn native_size(self) -> usize {
        match self {
            TypeTag::Char | TypeTag::UChar | TypeTag::Bool => 1,
            TypeTag::Short | TypeTag::UShort => 2,
            TypeTag::Int | TypeTag::UInt | TypeTag::Float => 4,
            TypeTag::Long | TypeTag::ULong | TypeTag::Double => 8,
            TypeTag::Str | TypeTag::Pointer => std::mem::size_of::<*const u8>(),
            TypeTag::Void => 0,
        }
    }

    /// The libffi classification used to build the call frame.
    pub fn ffi_type(self) -> Type {
        match self {
            TypeTag::Char => Type::i8(),
            TypeTag::Short => Type::i16(),
            TypeTag::Int => Type::i32(),
            TypeTag::Long => Type::i64(),
            TypeTag::UChar => Type::u8(),
            TypeTag::UShort => Type::u16(),
            TypeTag::UInt => Type::u32(),
            TypeTag::ULong => Type::u64(),
            TypeTag::Float => Type::f32(),
            TypeTag::Double => Type::f64(),
            TypeTag::Bool => Type::u8(),
            TypeTag::Str | TypeTag::Pointer => Type::pointer(),
            TypeTag::Void => Type::void(),
        }
    }

    /// Human-readable name, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Char => "char",
            TypeTag::Short => "short",
            TypeTag::Int => "int",
            TypeTag::Long => "long",
            TypeTag::UChar => "uchar",
            TypeTag::UShort => "ushort",
            TypeTag::UInt => "uint",
            TypeTag::ULong => "ulong",
            TypeTag::Float => "float",
            TypeTag::Double => "double",
            TypeTag::Bool => "bool",
            TypeTag::Str => "string",
            TypeTag::Pointer => "pointer",
            TypeTag::Void => "void",
        }
    }

    /// `void` carries no value and is only meaningful as a return type.
    pub fn is_return_only(self) -> bool {
        matches!(self, TypeTag::Void)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TAGS: [TypeTag; 14] = [
        TypeTag::Char,
        TypeTag::Short,
        TypeTag::Int,
        TypeTag::Long,
        TypeTag::UChar,
        TypeTag::UShort,
        TypeTag::UInt,
        TypeTag::ULong,
        TypeTag::Float,
        TypeTag::Double,
        TypeTag::Bool,
        TypeTag::Str,
        TypeTag::Pointer,
        TypeTag::Void,
    ];

    #[test]
    fn test_parse_single_char_flags() {
        assert_eq!(TypeTag::parse("i"), Some(TypeTag::Int));
        assert_eq!(TypeTag::parse("d"), Some(TypeTag::Double));
        assert_eq!(TypeTag::parse("s"), Some(TypeTag::Str));
        assert_eq!(TypeTag::parse("v"), Some(TypeTag::Void));
    }

    #[test]
    fn test_parse_case_distinguishes_signedness() {
        assert_eq!(TypeTag::parse("c"), Some(TypeTag::Char));
        assert_eq!(TypeTag::parse("C"), Some(TypeTag::UChar));
        assert_eq!(TypeTag::parse("h"), Some(TypeTag::Short));
        assert_eq!(TypeTag::parse("H"), Some(TypeTag::UShort));
        assert_eq!(TypeTag::parse("i"), Some(TypeTag::Int));
        assert_eq!(TypeTag::parse("I"), Some(TypeTag::UInt));
        assert_eq!(TypeTag::parse("l"), Some(TypeTag::Long));
        assert_eq!(TypeTag::parse("L"), Some(TypeTag::ULong));
    }

    #[test]
    fn test_parse_word_aliases() {
        assert_eq!(TypeTag::parse("int"), Some(TypeTag::Int));
        assert_eq!(TypeTag::parse("Double"), Some(TypeTag::Double));
        assert_eq!(TypeTag::parse("STRING"), Some(TypeTag::Str));
        assert_eq!(TypeTag::parse("ptr"), Some(TypeTag::Pointer));
        assert_eq!(TypeTag::parse("ulong"), Some(TypeTag::ULong));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(TypeTag::parse("x"), None);
        assert_eq!(TypeTag::parse("int32"), None);
        assert_eq!(TypeTag::parse(""), None);
        assert_eq!(TypeTag::parse("struct"), None);
    }

    #[test]
    fn test_native_sizes() {
        assert_eq!(TypeTag::Char.native_size(), 1);
        assert_eq!(TypeTag::Short.native_size(), 2);
        assert_eq!(TypeTag::Int.native_size(), 4);
        assert_eq!(TypeTag::Long.native_size(), 8);
        assert_eq!(TypeTag::Double.native_size(), 8);
        assert_eq!(TypeTag::Void.native_size(), 0);
        assert_eq!(
            TypeTag::Pointer.native_size(),
            std::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_every_tag_has_exactly_one_classification() {
        for tag in ALL_TAGS {
            // ffi_type must be total over the vocabulary
            let _ = tag.ffi_type();
            assert!(!tag.name().is_empty());
        }
    }

    #[test]
    fn test_only_void_is_return_only() {
        for tag in ALL_TAGS {
            assert_eq!(tag.is_return_only(), tag == TypeTag::Void);
        }
    }
}
