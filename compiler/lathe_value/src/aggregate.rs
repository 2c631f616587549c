//! Aggregate constants: arrays, vectors, structs, strings.

use lathe_ir::{ContextHandle, Engine, ValueHandle};
use smallvec::SmallVec;

use crate::constant::ConstantValue;
use crate::error::{ValueError, ValueResult};
use crate::operands::UserValue;
use crate::types::Type;
use crate::value::{value_wrapper, AnyValue, Value, Wrap};

/// Element buffer for aggregate construction.
type ElementBuf = SmallVec<[ValueHandle; 8]>;

fn collect_handles<'e>(elements: &[&dyn AnyValue<'e>]) -> ElementBuf {
    elements.iter().map(|v| v.handle()).collect()
}

/// Run a generator `count` times and pack the produced elements.
fn generate_handles<'e, V, F>(count: usize, mut producer: F) -> ValueResult<ElementBuf>
where
    V: AnyValue<'e>,
    F: FnMut(usize) -> ValueResult<V>,
{
    (0..count).map(|i| Ok(producer(i)?.handle())).collect()
}

/// Shared element-access operations of aggregate constants.
///
/// Aggregates are immutable: `insert` folds a functional update and yields
/// a fresh constant, the receiver is untouched.
pub trait AggregateValue<'e>: ConstantValue<'e> + Wrap<'e> {
    /// Fold the element at `index` out of the aggregate.
    fn extract(&self, index: u32) -> ValueResult<Value<'e>> {
        let handle = self.engine().const_extract_value(self.handle(), index)?;
        Ok(Value::from_handle(self.engine(), handle))
    }

    /// Fold a replacement of the element at `index`, producing a fresh
    /// aggregate of the same concrete type.
    fn insert(&self, element: &dyn AnyValue<'e>, index: u32) -> ValueResult<Self> {
        let handle =
            self.engine()
                .const_insert_value(self.handle(), element.handle(), index)?;
        Ok(Self::from_handle(self.engine(), handle))
    }
}

value_wrapper! {
    /// A constant array. Element count is the element buffer's length.
    ConstantArray
}

impl<'e> ConstantArray<'e> {
    /// Build from an explicit element sequence, each of `element_type`.
    pub fn new(element_type: Type<'e>, elements: &[&dyn AnyValue<'e>]) -> ValueResult<Self> {
        let engine = element_type.engine();
        let buf = collect_handles(elements);
        let handle = engine.const_array(element_type.handle(), &buf)?;
        Ok(Self::from_handle(engine, handle))
    }

    /// Build from a count and an element generator.
    pub fn from_fn<V, F>(element_type: Type<'e>, count: usize, producer: F) -> ValueResult<Self>
    where
        V: AnyValue<'e>,
        F: FnMut(usize) -> ValueResult<V>,
    {
        let engine = element_type.engine();
        let buf = generate_handles(count, producer)?;
        let handle = engine.const_array(element_type.handle(), &buf)?;
        Ok(Self::from_handle(engine, handle))
    }
}

impl<'e> UserValue<'e> for ConstantArray<'e> {}
impl<'e> ConstantValue<'e> for ConstantArray<'e> {}
impl<'e> AggregateValue<'e> for ConstantArray<'e> {}

value_wrapper! {
    /// A constant vector. The element type is derived from the first
    /// element, so a vector is never empty.
    ConstantVector
}

impl<'e> ConstantVector<'e> {
    /// Build from an explicit, non-empty element sequence.
    pub fn new(engine: &'e dyn Engine, elements: &[&dyn AnyValue<'e>]) -> ValueResult<Self> {
        if elements.is_empty() {
            return Err(ValueError::InvalidArgument(
                "vector requires at least one element",
            ));
        }
        let buf = collect_handles(elements);
        let handle = engine.const_vector(&buf)?;
        Ok(Self::from_handle(engine, handle))
    }

    /// Build from a count and an element generator.
    pub fn from_fn<V, F>(engine: &'e dyn Engine, count: usize, producer: F) -> ValueResult<Self>
    where
        V: AnyValue<'e>,
        F: FnMut(usize) -> ValueResult<V>,
    {
        if count == 0 {
            return Err(ValueError::InvalidArgument(
                "vector requires at least one element",
            ));
        }
        let buf = generate_handles(count, producer)?;
        let handle = engine.const_vector(&buf)?;
        Ok(Self::from_handle(engine, handle))
    }

    /// Fold the element selected by the integer constant `index`.
    pub fn extract_element(&self, index: &dyn AnyValue<'e>) -> ValueResult<Value<'e>> {
        let handle = self
            .engine()
            .const_extract_element(self.handle(), index.handle())?;
        Ok(Value::from_handle(self.engine(), handle))
    }

    /// Fold a replacement of the element selected by `index`, producing a
    /// fresh vector.
    pub fn insert_element(
        &self,
        element: &dyn AnyValue<'e>,
        index: &dyn AnyValue<'e>,
    ) -> ValueResult<Self> {
        let handle = self.engine().const_insert_element(
            self.handle(),
            element.handle(),
            index.handle(),
        )?;
        Ok(Self::from_handle(self.engine(), handle))
    }

    /// Fold a shuffle of this vector with `other` under `mask`.
    ///
    /// Element-type compatibility between the operands and the mask's shape
    /// are the engine's checks.
    pub fn shuffle(&self, other: &ConstantVector<'e>, mask: &dyn AnyValue<'e>) -> ValueResult<Self> {
        let handle =
            self.engine()
                .const_shuffle_vector(self.handle(), other.handle(), mask.handle())?;
        Ok(Self::from_handle(self.engine(), handle))
    }
}

impl<'e> UserValue<'e> for ConstantVector<'e> {}
impl<'e> ConstantValue<'e> for ConstantVector<'e> {}
impl<'e> AggregateValue<'e> for ConstantVector<'e> {}

value_wrapper! {
    /// An anonymous constant struct.
    ConstantStruct
}

impl<'e> ConstantStruct<'e> {
    /// Build in the global context.
    pub fn new(
        engine: &'e dyn Engine,
        elements: &[&dyn AnyValue<'e>],
        packed: bool,
    ) -> ValueResult<Self> {
        let buf = collect_handles(elements);
        let handle = engine.const_struct(&buf, packed)?;
        Ok(Self::from_handle(engine, handle))
    }

    /// Build in an explicit context. Equivalent to [`ConstantStruct::new`]
    /// apart from which engine entry point is invoked.
    pub fn new_in_context(
        engine: &'e dyn Engine,
        context: ContextHandle,
        elements: &[&dyn AnyValue<'e>],
        packed: bool,
    ) -> ValueResult<Self> {
        let buf = collect_handles(elements);
        let handle = engine.const_struct_in_context(context, &buf, packed)?;
        Ok(Self::from_handle(engine, handle))
    }

    /// Build in the global context from a count and an element generator.
    pub fn from_fn<V, F>(
        engine: &'e dyn Engine,
        count: usize,
        packed: bool,
        producer: F,
    ) -> ValueResult<Self>
    where
        V: AnyValue<'e>,
        F: FnMut(usize) -> ValueResult<V>,
    {
        let buf = generate_handles(count, producer)?;
        let handle = engine.const_struct(&buf, packed)?;
        Ok(Self::from_handle(engine, handle))
    }
}

impl<'e> UserValue<'e> for ConstantStruct<'e> {}
impl<'e> ConstantValue<'e> for ConstantStruct<'e> {}
impl<'e> AggregateValue<'e> for ConstantStruct<'e> {}

value_wrapper! {
    /// A constant string: an `[n x i8]` array over the text's bytes.
    ConstantString
}

impl<'e> ConstantString<'e> {
    /// Build in the global context.
    pub fn new(engine: &'e dyn Engine, text: &str, null_terminated: bool) -> ValueResult<Self> {
        let handle = engine.const_string(text, null_terminated)?;
        Ok(Self::from_handle(engine, handle))
    }

    /// Build in an explicit context.
    pub fn new_in_context(
        engine: &'e dyn Engine,
        context: ContextHandle,
        text: &str,
        null_terminated: bool,
    ) -> ValueResult<Self> {
        let handle = engine.const_string_in_context(context, text, null_terminated)?;
        Ok(Self::from_handle(engine, handle))
    }
}

impl<'e> UserValue<'e> for ConstantString<'e> {}
impl<'e> ConstantValue<'e> for ConstantString<'e> {}
impl<'e> AggregateValue<'e> for ConstantString<'e> {}
