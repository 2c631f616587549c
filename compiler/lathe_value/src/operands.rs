//! Operand access for user values.

use lathe_ir::{Engine, ValueHandle};

use crate::error::{ValueError, ValueResult};
use crate::value::{AnyValue, Value};

/// A value with operands (constants, instructions, globals).
pub trait UserValue<'e>: AnyValue<'e> {
    /// A view over this value's operands.
    ///
    /// The view is stateless: size and element identity are re-queried from
    /// the engine on every access, so a replacement made through any path
    /// is visible on the next read. A fresh view per call is therefore
    /// equivalent to a shared one.
    fn operands(&self) -> OperandCollection<'e> {
        OperandCollection::new(self.engine(), self.handle())
    }
}

/// Indexable, iterable view over a user value's operands.
///
/// Never caches: this is a window onto engine state, not a snapshot.
pub struct OperandCollection<'e> {
    engine: &'e dyn Engine,
    owner: ValueHandle,
}

impl<'e> OperandCollection<'e> {
    pub(crate) fn new(engine: &'e dyn Engine, owner: ValueHandle) -> Self {
        OperandCollection { engine, owner }
    }

    /// Current operand count, queried per call.
    pub fn len(&self) -> ValueResult<usize> {
        Ok(self.engine.operand_count(self.owner)?)
    }

    /// Whether there are no operands.
    pub fn is_empty(&self) -> ValueResult<bool> {
        Ok(self.len()? == 0)
    }

    /// The operand at `index`, or `None` when the index is out of bounds or
    /// the slot is empty.
    ///
    /// The result is the root [`Value`] type: operand access does not
    /// reclassify, so the concrete subtype is lost. Callers that need the
    /// concrete variant reclassify explicitly.
    pub fn get(&self, index: usize) -> ValueResult<Option<Value<'e>>> {
        let slot = self.engine.operand(self.owner, index)?;
        Ok(slot.map(|handle| Value::from_handle(self.engine, handle)))
    }

    /// Replace the operand at `index`. Out-of-bounds writes are an error,
    /// unlike out-of-bounds reads.
    pub fn set(&self, index: usize, value: &dyn AnyValue<'e>) -> ValueResult<()> {
        let len = self.len()?;
        if index >= len {
            return Err(ValueError::OutOfRange { index, len });
        }
        Ok(self.engine.set_operand(self.owner, index, value.handle())?)
    }

    /// Iterate operands in index order. Each call starts a fresh pass;
    /// bounds are recomputed as the iteration advances.
    pub fn iter(&self) -> Operands<'e> {
        Operands {
            engine: self.engine,
            owner: self.owner,
            index: 0,
        }
    }
}

impl<'e> IntoIterator for &OperandCollection<'e> {
    type Item = Value<'e>;
    type IntoIter = Operands<'e>;

    fn into_iter(self) -> Operands<'e> {
        self.iter()
    }
}

/// Iterator over a user value's operands.
pub struct Operands<'e> {
    engine: &'e dyn Engine,
    owner: ValueHandle,
    index: usize,
}

impl<'e> Iterator for Operands<'e> {
    type Item = Value<'e>;

    fn next(&mut self) -> Option<Value<'e>> {
        // An engine failure ends the iteration; iterators have no error
        // channel and a dead handle has nothing left to yield.
        let slot = self.engine.operand(self.owner, self.index).ok()??;
        self.index += 1;
        Some(Value::from_handle(self.engine, slot))
    }
}
