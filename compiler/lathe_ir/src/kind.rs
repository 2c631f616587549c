//! Type classification tags.

use std::fmt;

/// Classification of an IR type, as reported by the engine.
///
/// Exactly one kind applies to a type handle at query time. The set is
/// closed: the value layer dispatches on it with exhaustive matches, and
/// `Metadata` is deliberately present so the unsupported case is an explicit
/// match arm rather than a fallthrough.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    /// Fixed-length homogeneous aggregate.
    Array,
    /// 64-bit IEEE float.
    Double,
    /// 32-bit IEEE float.
    Float,
    /// Function signature type.
    Function,
    /// 128-bit IEEE float.
    Fp128,
    /// Arbitrary-width integer. The width is a separate query
    /// ([`Engine::int_width`](crate::Engine::int_width)).
    Integer,
    /// Basic-block label.
    Label,
    /// Engine metadata. Has no value wrapper; classification fails on it.
    Metadata,
    /// Pointer.
    Pointer,
    /// 128-bit PowerPC double-double.
    PpcFp128,
    /// Heterogeneous aggregate.
    Struct,
    /// Fixed-length SIMD vector.
    Vector,
    /// No value.
    Void,
    /// 80-bit x87 extended precision float.
    X86Fp80,
    /// 64-bit x86 MMX vector.
    X86Mmx,
}

impl TypeKind {
    /// Whether this kind is one of the five floating-point formats.
    #[inline]
    pub fn is_floating_point(self) -> bool {
        FloatKind::of(self).is_some()
    }
}

/// The five floating-point formats, as a closed sub-vocabulary of
/// [`TypeKind`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FloatKind {
    /// 32-bit IEEE single.
    Single,
    /// 64-bit IEEE double.
    Double,
    /// 128-bit IEEE quad.
    Fp128,
    /// PowerPC double-double.
    PpcFp128,
    /// x87 80-bit extended.
    X86Fp80,
}

impl FloatKind {
    /// The floating-point format for a type kind, if it is one.
    pub fn of(kind: TypeKind) -> Option<FloatKind> {
        match kind {
            TypeKind::Float => Some(FloatKind::Single),
            TypeKind::Double => Some(FloatKind::Double),
            TypeKind::Fp128 => Some(FloatKind::Fp128),
            TypeKind::PpcFp128 => Some(FloatKind::PpcFp128),
            TypeKind::X86Fp80 => Some(FloatKind::X86Fp80),
            _ => None,
        }
    }

    /// The type kind this format classifies as.
    pub fn kind(self) -> TypeKind {
        match self {
            FloatKind::Single => TypeKind::Float,
            FloatKind::Double => TypeKind::Double,
            FloatKind::Fp128 => TypeKind::Fp128,
            FloatKind::PpcFp128 => TypeKind::PpcFp128,
            FloatKind::X86Fp80 => TypeKind::X86Fp80,
        }
    }

    /// Storage width in bits.
    pub fn bits(self) -> u32 {
        match self {
            FloatKind::Single => 32,
            FloatKind::Double => 64,
            FloatKind::Fp128 | FloatKind::PpcFp128 => 128,
            FloatKind::X86Fp80 => 80,
        }
    }
}

impl fmt::Display for FloatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FloatKind::Single => "float",
            FloatKind::Double => "double",
            FloatKind::Fp128 => "fp128",
            FloatKind::PpcFp128 => "ppc_fp128",
            FloatKind::X86Fp80 => "x86_fp80",
        };
        f.write_str(name)
    }
}
