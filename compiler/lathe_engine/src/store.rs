//! Interned type table and value store.

use lathe_ir::{
    Attributes, EngineError, EngineResult, GlobalKind, FloatKind, Linkage, TypeHandle,
    ValueHandle, Visibility,
};
use rustc_hash::FxHashMap;

/// Structural description of a type. Interned: structurally equal types
/// share one handle.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) enum TypeData {
    Int { bits: u32 },
    Real { format: FloatKind },
    Pointer { pointee: TypeHandle },
    Array { element: TypeHandle, len: u32 },
    Vector { element: TypeHandle, len: u32 },
    Struct { fields: Vec<TypeHandle>, packed: bool },
    Function { ret: TypeHandle, params: Vec<TypeHandle> },
    Void,
    Label,
    Metadata,
    X86Mmx,
}

#[derive(Default)]
pub(crate) struct TypeTable {
    data: Vec<TypeData>,
    intern: FxHashMap<TypeData, TypeHandle>,
}

impl TypeTable {
    pub fn intern(&mut self, data: TypeData) -> TypeHandle {
        if let Some(&handle) = self.intern.get(&data) {
            return handle;
        }
        #[allow(clippy::cast_possible_truncation, reason = "type count stays far below u32::MAX")]
        let handle = TypeHandle::new(self.data.len() as u32);
        self.data.push(data.clone());
        self.intern.insert(data, handle);
        handle
    }

    pub fn get(&self, handle: TypeHandle) -> EngineResult<&TypeData> {
        self.data
            .get(handle.id() as usize)
            .ok_or(EngineError::UnknownHandle)
    }
}

/// Metadata of a global variable or alias.
#[derive(Clone, Debug)]
pub(crate) struct GlobalData {
    pub kind: GlobalKind,
    pub linkage: Linkage,
    pub visibility: Visibility,
    pub section: Option<String>,
    pub alignment: u32,
    pub thread_local: bool,
    pub is_constant: bool,
    pub initializer: Option<ValueHandle>,
}

impl GlobalData {
    pub fn new(kind: GlobalKind) -> Self {
        GlobalData {
            kind,
            linkage: Linkage::default(),
            visibility: Visibility::default(),
            section: None,
            alignment: 0,
            thread_local: false,
            is_constant: false,
            initializer: None,
        }
    }
}

/// What a value is. Aggregate elements live in the owning
/// [`ValueData::operands`]; strings keep their bytes unmaterialized until
/// an element is extracted.
#[derive(Clone, Debug)]
pub(crate) enum Payload {
    Int { bits: u64 },
    Real { bits: u64 },
    Null,
    Undef,
    Aggregate,
    Str { bytes: Vec<u8> },
    Gep { in_bounds: bool },
    Global(Box<GlobalData>),
    Function,
    Block,
}

#[derive(Clone, Debug)]
pub(crate) struct ValueData {
    pub ty: TypeHandle,
    pub payload: Payload,
    pub name: String,
    pub attrs: Attributes,
    pub operands: Vec<ValueHandle>,
}

impl ValueData {
    pub fn new(ty: TypeHandle, payload: Payload) -> Self {
        ValueData {
            ty,
            payload,
            name: String::new(),
            attrs: Attributes::empty(),
            operands: Vec::new(),
        }
    }

    pub fn with_operands(ty: TypeHandle, payload: Payload, operands: Vec<ValueHandle>) -> Self {
        ValueData {
            ty,
            payload,
            name: String::new(),
            attrs: Attributes::empty(),
            operands,
        }
    }
}

/// Uniquing key for scalar constants. One engine-side value exists per
/// `(type, key)` pair, so repeated construction observes one identity.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) enum UniqueKey {
    Int(u64),
    Real(u64),
    Null,
    Undef,
}

#[derive(Default)]
pub(crate) struct Store {
    pub types: TypeTable,
    pub values: Vec<ValueData>,
    pub uniq: FxHashMap<(TypeHandle, UniqueKey), ValueHandle>,
    pub contexts: u32,
}

impl Store {
    pub fn value(&self, handle: ValueHandle) -> EngineResult<&ValueData> {
        usize::try_from(handle.id())
            .ok()
            .and_then(|i| self.values.get(i))
            .ok_or(EngineError::UnknownHandle)
    }

    pub fn value_mut(&mut self, handle: ValueHandle) -> EngineResult<&mut ValueData> {
        usize::try_from(handle.id())
            .ok()
            .and_then(|i| self.values.get_mut(i))
            .ok_or(EngineError::UnknownHandle)
    }

    pub fn push(&mut self, data: ValueData) -> ValueHandle {
        let handle = ValueHandle::new(self.values.len() as u64);
        self.values.push(data);
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structurally_equal_types_share_a_handle() {
        let mut table = TypeTable::default();
        let a = table.intern(TypeData::Int { bits: 32 });
        let b = table.intern(TypeData::Int { bits: 32 });
        let c = table.intern(TypeData::Int { bits: 64 });
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.get(a).unwrap(), &TypeData::Int { bits: 32 });
    }

    #[test]
    fn unknown_type_handle_is_an_error() {
        let table = TypeTable::default();
        assert_eq!(
            table.get(TypeHandle::new(7)).unwrap_err(),
            EngineError::UnknownHandle
        );
    }
}
