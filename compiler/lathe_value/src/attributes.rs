//! Per-value attribute collection.

use std::cell::Cell;
use std::fmt;

use lathe_ir::{Attributes, Engine, ValueHandle};
use tracing::trace;

use crate::error::ValueResult;

/// A per-value mirror of the engine's attribute set.
///
/// `add` and `remove` forward to the engine first and update the local set
/// only after the engine call succeeds, so a failed mutation never leaves
/// the mirror ahead of the engine. `contains` reads the local set only and
/// never re-queries.
///
/// # Invariant
///
/// The mirror is authoritative only while this instance is the sole mutator
/// of the owning value's attributes. Mutating the same value's attributes
/// through another collection instance, or through the engine directly,
/// takes the mirror out of sync; that is out of contract, not detected.
#[derive(Clone)]
pub struct AttributeCollection<'e> {
    engine: &'e dyn Engine,
    owner: ValueHandle,
    local: Cell<Attributes>,
}

impl<'e> AttributeCollection<'e> {
    pub(crate) fn new(engine: &'e dyn Engine, owner: ValueHandle) -> Self {
        AttributeCollection {
            engine,
            owner,
            local: Cell::new(Attributes::empty()),
        }
    }

    /// Add attributes. A no-op when every requested flag is already set.
    pub fn add(&self, attrs: Attributes) -> ValueResult<()> {
        let current = self.local.get();
        if current.contains(attrs) {
            return Ok(());
        }
        self.engine.add_attribute(self.owner, attrs)?;
        self.local.set(current | attrs);
        trace!(owner = ?self.owner, %attrs, "attribute added");
        Ok(())
    }

    /// Remove attributes. A no-op when none of the requested flags is set.
    pub fn remove(&self, attrs: Attributes) -> ValueResult<()> {
        let current = self.local.get();
        if !current.intersects(attrs) {
            return Ok(());
        }
        self.engine.remove_attribute(self.owner, attrs)?;
        self.local.set(current - attrs);
        trace!(owner = ?self.owner, %attrs, "attribute removed");
        Ok(())
    }

    /// Whether every requested flag is present, per the local mirror.
    pub fn contains(&self, attrs: Attributes) -> bool {
        self.local.get().contains(attrs)
    }

    /// The mirrored flag set.
    pub fn as_flags(&self) -> Attributes {
        self.local.get()
    }

    /// Whether no attributes are set.
    pub fn is_empty(&self) -> bool {
        self.local.get().is_empty()
    }
}

impl fmt::Display for AttributeCollection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = self.local.get();
        if flags.is_empty() {
            f.write_str("(no attributes)")
        } else {
            fmt::Display::fmt(&flags, f)
        }
    }
}

impl fmt::Debug for AttributeCollection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttributeCollection({:?}, {:?})", self.owner, self.local.get())
    }
}
