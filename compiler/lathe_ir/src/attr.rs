//! Value attribute flags.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Attribute flags attachable to a value.
    ///
    /// Stored as a bitset on both sides of the engine boundary: the engine
    /// keeps the authoritative set per value, the value layer keeps a local
    /// mirror (see `AttributeCollection` in `lathe_value`). Union and
    /// difference on the mirror are O(1) flag arithmetic.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct Attributes: u32 {
        /// Zero-extend when widening at a call boundary.
        const Z_EXT = 1 << 0;
        /// Sign-extend when widening at a call boundary.
        const S_EXT = 1 << 1;
        /// Never returns.
        const NO_RETURN = 1 << 2;
        /// Never unwinds.
        const NO_UNWIND = 1 << 3;
        /// Not aliased by any other accessible pointer.
        const NO_ALIAS = 1 << 4;
        /// Must not be inlined.
        const NO_INLINE = 1 << 5;
        /// Must be inlined.
        const ALWAYS_INLINE = 1 << 6;
        /// Reads no memory.
        const READ_NONE = 1 << 7;
        /// Reads but never writes memory.
        const READ_ONLY = 1 << 8;
        /// Writes but never reads memory.
        const WRITE_ONLY = 1 << 9;
        /// Rarely executed.
        const COLD = 1 << 10;
        /// Never null.
        const NON_NULL = 1 << 11;
    }
}

impl Attributes {
    /// Number of individual attributes set.
    pub fn count(self) -> u32 {
        self.bits().count_ones()
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            f.write_str(&name.to_lowercase())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display_lists_set_flags() {
        let attrs = Attributes::READ_ONLY | Attributes::COLD;
        assert_eq!(attrs.to_string(), "read_only cold");
        assert_eq!(attrs.count(), 2);
    }
}
