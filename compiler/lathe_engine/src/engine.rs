//! The folding engine: store wiring plus the [`Engine`] implementation.

use std::cell::RefCell;

use lathe_ir::{
    Attributes, CastOp, ContextHandle, Engine, EngineError, EngineResult, FloatKind, GlobalKind,
    IntBinOp, IntPredicate, IntUnaryOp, Linkage, RealBinOp, RealPredicate, TypeHandle, TypeKind,
    ValueHandle, Visibility,
};
use tracing::{debug, trace};

use crate::fold;
use crate::print;
use crate::store::{GlobalData, Payload, Store, TypeData, UniqueKey, ValueData};

/// In-memory constant-folding engine.
///
/// Single-threaded by design: state lives behind a `RefCell` and every
/// call completes synchronously. Handles are indices into the engine's own
/// tables and stay valid for the engine's lifetime.
#[derive(Default)]
pub struct FoldingEngine {
    store: RefCell<Store>,
}

impl FoldingEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        FoldingEngine::default()
    }

    /// Create a fresh context. Contexts scope nothing observable in this
    /// engine beyond identity; they exist so both construction paths of
    /// context-scoped constants are exercisable.
    pub fn create_context(&self) -> ContextHandle {
        let mut store = self.store.borrow_mut();
        store.contexts += 1;
        ContextHandle::new(store.contexts)
    }

    /// Add a global variable of `value_type`, initially a declaration.
    pub fn add_global(&self, value_type: TypeHandle, name: &str) -> EngineResult<ValueHandle> {
        let mut store = self.store.borrow_mut();
        store.types.get(value_type)?;
        let ty = store.types.intern(TypeData::Pointer {
            pointee: value_type,
        });
        let mut data = ValueData::new(ty, Payload::Global(Box::new(GlobalData::new(GlobalKind::Variable))));
        data.name = name.to_string();
        let handle = store.push(data);
        debug!(?handle, name, "global variable added");
        Ok(handle)
    }

    /// Add an alias for `aliasee`.
    pub fn add_alias(&self, aliasee: ValueHandle, name: &str) -> EngineResult<ValueHandle> {
        let mut store = self.store.borrow_mut();
        let ty = store.value(aliasee)?.ty;
        let mut global = GlobalData::new(GlobalKind::Alias);
        global.initializer = Some(aliasee);
        let mut data = ValueData::new(ty, Payload::Global(Box::new(global)));
        data.name = name.to_string();
        let handle = store.push(data);
        debug!(?handle, name, "global alias added");
        Ok(handle)
    }

    /// Add a function declaration of `fn_type`.
    pub fn add_function(&self, fn_type: TypeHandle, name: &str) -> EngineResult<ValueHandle> {
        let mut store = self.store.borrow_mut();
        match store.types.get(fn_type)? {
            TypeData::Function { .. } => {}
            _ => return Err(EngineError::IncompatibleOperands { op: "function" }),
        }
        let mut data = ValueData::new(fn_type, Payload::Function);
        data.name = name.to_string();
        let handle = store.push(data);
        debug!(?handle, name, "function added");
        Ok(handle)
    }

    /// Add a basic-block label value.
    pub fn add_block(&self, name: &str) -> ValueHandle {
        let mut store = self.store.borrow_mut();
        let ty = store.types.intern(TypeData::Label);
        let mut data = ValueData::new(ty, Payload::Block);
        data.name = name.to_string();
        store.push(data)
    }

    // -- Internal helpers --

    fn intern_type(&self, data: TypeData) -> TypeHandle {
        self.store.borrow_mut().types.intern(data)
    }

    fn type_data(&self, ty: TypeHandle) -> EngineResult<TypeData> {
        Ok(self.store.borrow().types.get(ty)?.clone())
    }

    fn intern_scalar(&self, ty: TypeHandle, key: UniqueKey, payload: Payload) -> ValueHandle {
        let mut store = self.store.borrow_mut();
        if let Some(&handle) = store.uniq.get(&(ty, key.clone())) {
            return handle;
        }
        let handle = store.push(ValueData::new(ty, payload));
        store.uniq.insert((ty, key), handle);
        handle
    }

    /// Uniqued integer constant; `bits` is masked to the type's width.
    fn const_int_raw(&self, ty: TypeHandle, bits: u64) -> EngineResult<ValueHandle> {
        let width = self.int_bits_of(ty)?;
        let masked = fold::mask(width, bits);
        Ok(self.intern_scalar(ty, UniqueKey::Int(masked), Payload::Int { bits: masked }))
    }

    /// Uniqued floating constant; the value is rounded to the format.
    fn const_real_raw(&self, ty: TypeHandle, value: f64) -> EngineResult<ValueHandle> {
        let format = match self.type_data(ty)? {
            TypeData::Real { format } => format,
            _ => return Err(EngineError::IncompatibleOperands { op: "real constant" }),
        };
        let rounded = round_to_format(format, value);
        let bits = rounded.to_bits();
        Ok(self.intern_scalar(ty, UniqueKey::Real(bits), Payload::Real { bits }))
    }

    fn int_bits_of(&self, ty: TypeHandle) -> EngineResult<u32> {
        match self.type_data(ty)? {
            TypeData::Int { bits } => Ok(bits),
            _ => Err(EngineError::IncompatibleOperands { op: "int width" }),
        }
    }

    /// Read an integer constant operand: its type, width and masked bits.
    fn int_operand(&self, value: ValueHandle) -> EngineResult<(TypeHandle, u32, u64)> {
        let store = self.store.borrow();
        let data = store.value(value)?;
        let width = match store.types.get(data.ty)? {
            TypeData::Int { bits } => *bits,
            _ => return Err(EngineError::IncompatibleOperands { op: "int operand" }),
        };
        match data.payload {
            Payload::Int { bits } => Ok((data.ty, width, bits)),
            _ => Err(EngineError::NotAConstant),
        }
    }

    /// Read a floating constant operand: its type, format and value.
    fn real_operand(&self, value: ValueHandle) -> EngineResult<(TypeHandle, FloatKind, f64)> {
        let store = self.store.borrow();
        let data = store.value(value)?;
        let format = match store.types.get(data.ty)? {
            TypeData::Real { format } => *format,
            _ => return Err(EngineError::IncompatibleOperands { op: "real operand" }),
        };
        match data.payload {
            Payload::Real { bits } => Ok((data.ty, format, f64::from_bits(bits))),
            _ => Err(EngineError::NotAConstant),
        }
    }

    fn element_type_at(&self, ty: TypeHandle, index: usize) -> EngineResult<TypeHandle> {
        match self.type_data(ty)? {
            TypeData::Array { element, len } | TypeData::Vector { element, len } => {
                if index < len as usize {
                    Ok(element)
                } else {
                    Err(EngineError::IncompatibleOperands { op: "element index" })
                }
            }
            TypeData::Struct { fields, .. } => fields
                .get(index)
                .copied()
                .ok_or(EngineError::IncompatibleOperands { op: "element index" }),
            _ => Err(EngineError::IncompatibleOperands { op: "element index" }),
        }
    }

    fn aggregate_len(&self, ty: TypeHandle) -> EngineResult<usize> {
        match self.type_data(ty)? {
            TypeData::Array { len, .. } | TypeData::Vector { len, .. } => Ok(len as usize),
            TypeData::Struct { fields, .. } => Ok(fields.len()),
            _ => Err(EngineError::IncompatibleOperands { op: "aggregate" }),
        }
    }

    /// Elements of an aggregate constant, materializing zero/undef fills
    /// and string bytes into scalar constants where needed.
    fn materialize_elements(&self, aggregate: ValueHandle) -> EngineResult<Vec<ValueHandle>> {
        let (ty, payload, operands) = {
            let store = self.store.borrow();
            let data = store.value(aggregate)?;
            (data.ty, data.payload.clone(), data.operands.clone())
        };
        match payload {
            Payload::Aggregate => Ok(operands),
            Payload::Str { bytes } => {
                let i8_ty = self.intern_type(TypeData::Int { bits: 8 });
                bytes
                    .iter()
                    .map(|byte| self.const_int_raw(i8_ty, u64::from(*byte)))
                    .collect()
            }
            Payload::Null => {
                let len = self.aggregate_len(ty)?;
                (0..len)
                    .map(|i| {
                        let elem_ty = self.element_type_at(ty, i)?;
                        self.const_null(elem_ty)
                    })
                    .collect()
            }
            Payload::Undef => {
                let len = self.aggregate_len(ty)?;
                (0..len)
                    .map(|i| {
                        let elem_ty = self.element_type_at(ty, i)?;
                        self.const_undef(elem_ty)
                    })
                    .collect()
            }
            _ => Err(EngineError::IncompatibleOperands { op: "aggregate" }),
        }
    }

    fn validate_context(&self, context: ContextHandle) -> EngineResult<()> {
        if context.id() <= self.store.borrow().contexts {
            Ok(())
        } else {
            Err(EngineError::UnknownHandle)
        }
    }

    /// Read a constant integer index (for element selection).
    fn index_value(&self, index: ValueHandle) -> EngineResult<usize> {
        let (_, _, bits) = self.int_operand(index)?;
        usize::try_from(bits).map_err(|_| EngineError::IncompatibleOperands { op: "index" })
    }
}

fn round_to_format(format: FloatKind, value: f64) -> f64 {
    match format {
        FloatKind::Single => f64::from(value as f32),
        // The wider formats share the f64 payload; see the crate docs.
        _ => value,
    }
}

fn bit_size(data: &TypeData) -> Option<u32> {
    match data {
        TypeData::Int { bits } => Some(*bits),
        TypeData::Real { format } => Some(format.bits()),
        TypeData::Pointer { .. } => Some(64),
        _ => None,
    }
}

impl Engine for FoldingEngine {
    fn type_of(&self, value: ValueHandle) -> EngineResult<TypeHandle> {
        Ok(self.store.borrow().value(value)?.ty)
    }

    fn type_kind(&self, ty: TypeHandle) -> EngineResult<TypeKind> {
        let kind = match self.store.borrow().types.get(ty)? {
            TypeData::Int { .. } => TypeKind::Integer,
            TypeData::Real { format } => format.kind(),
            TypeData::Pointer { .. } => TypeKind::Pointer,
            TypeData::Array { .. } => TypeKind::Array,
            TypeData::Vector { .. } => TypeKind::Vector,
            TypeData::Struct { .. } => TypeKind::Struct,
            TypeData::Function { .. } => TypeKind::Function,
            TypeData::Void => TypeKind::Void,
            TypeData::Label => TypeKind::Label,
            TypeData::Metadata => TypeKind::Metadata,
            TypeData::X86Mmx => TypeKind::X86Mmx,
        };
        Ok(kind)
    }

    fn int_width(&self, ty: TypeHandle) -> EngineResult<u32> {
        self.int_bits_of(ty)
    }

    fn int_type(&self, bits: u32) -> TypeHandle {
        self.intern_type(TypeData::Int { bits })
    }

    fn real_type(&self, format: FloatKind) -> TypeHandle {
        self.intern_type(TypeData::Real { format })
    }

    fn pointer_type(&self, pointee: TypeHandle) -> TypeHandle {
        self.intern_type(TypeData::Pointer { pointee })
    }

    fn array_type(&self, element: TypeHandle, len: u32) -> TypeHandle {
        self.intern_type(TypeData::Array { element, len })
    }

    fn vector_type(&self, element: TypeHandle, len: u32) -> TypeHandle {
        self.intern_type(TypeData::Vector { element, len })
    }

    fn struct_type(&self, fields: &[TypeHandle], packed: bool) -> TypeHandle {
        self.intern_type(TypeData::Struct {
            fields: fields.to_vec(),
            packed,
        })
    }

    fn function_type(&self, ret: TypeHandle, params: &[TypeHandle]) -> TypeHandle {
        self.intern_type(TypeData::Function {
            ret,
            params: params.to_vec(),
        })
    }

    fn void_type(&self) -> TypeHandle {
        self.intern_type(TypeData::Void)
    }

    fn label_type(&self) -> TypeHandle {
        self.intern_type(TypeData::Label)
    }

    fn metadata_type(&self) -> TypeHandle {
        self.intern_type(TypeData::Metadata)
    }

    fn x86_mmx_type(&self) -> TypeHandle {
        self.intern_type(TypeData::X86Mmx)
    }

    fn type_to_string(&self, ty: TypeHandle) -> EngineResult<String> {
        print::type_string(&self.store.borrow(), ty)
    }

    fn global_context(&self) -> ContextHandle {
        ContextHandle::GLOBAL
    }

    fn const_int(&self, ty: TypeHandle, value: u64, sign_extend: bool) -> EngineResult<ValueHandle> {
        // Widths are capped at 64, so the extension flag changes nothing
        // representable here; the value is masked either way.
        let _ = sign_extend;
        self.const_int_raw(ty, value)
    }

    fn const_int_from_string(
        &self,
        ty: TypeHandle,
        text: &str,
        radix: u32,
    ) -> EngineResult<ValueHandle> {
        if !(2..=36).contains(&radix) {
            return Err(EngineError::MalformedLiteral {
                text: text.to_string(),
            });
        }
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let magnitude = u64::from_str_radix(digits, radix).map_err(|_| {
            EngineError::MalformedLiteral {
                text: text.to_string(),
            }
        })?;
        let bits = if negative {
            magnitude.wrapping_neg()
        } else {
            magnitude
        };
        self.const_int_raw(ty, bits)
    }

    fn const_real(&self, ty: TypeHandle, value: f64) -> EngineResult<ValueHandle> {
        self.const_real_raw(ty, value)
    }

    fn const_real_from_string(&self, ty: TypeHandle, text: &str) -> EngineResult<ValueHandle> {
        let value: f64 = text.trim().parse().map_err(|_| EngineError::MalformedLiteral {
            text: text.to_string(),
        })?;
        self.const_real_raw(ty, value)
    }

    fn const_null(&self, ty: TypeHandle) -> EngineResult<ValueHandle> {
        match self.type_data(ty)? {
            TypeData::Int { .. } => self.const_int_raw(ty, 0),
            TypeData::Real { .. } => self.const_real_raw(ty, 0.0),
            TypeData::Pointer { .. }
            | TypeData::Array { .. }
            | TypeData::Vector { .. }
            | TypeData::Struct { .. } => Ok(self.intern_scalar(ty, UniqueKey::Null, Payload::Null)),
            _ => Err(EngineError::IncompatibleOperands { op: "null" }),
        }
    }

    fn const_pointer_null(&self, ty: TypeHandle) -> EngineResult<ValueHandle> {
        match self.type_data(ty)? {
            TypeData::Pointer { .. } => Ok(self.intern_scalar(ty, UniqueKey::Null, Payload::Null)),
            _ => Err(EngineError::IncompatibleOperands { op: "pointer-null" }),
        }
    }

    fn const_undef(&self, ty: TypeHandle) -> EngineResult<ValueHandle> {
        self.store.borrow().types.get(ty)?;
        Ok(self.intern_scalar(ty, UniqueKey::Undef, Payload::Undef))
    }

    fn const_all_ones(&self, ty: TypeHandle) -> EngineResult<ValueHandle> {
        self.int_bits_of(ty)?;
        self.const_int_raw(ty, u64::MAX)
    }

    fn const_array(
        &self,
        element: TypeHandle,
        elements: &[ValueHandle],
    ) -> EngineResult<ValueHandle> {
        for value in elements {
            if self.type_of(*value)? != element {
                return Err(EngineError::IncompatibleOperands { op: "const array" });
            }
        }
        #[allow(clippy::cast_possible_truncation, reason = "element counts stay small")]
        let ty = self.array_type(element, elements.len() as u32);
        let mut store = self.store.borrow_mut();
        Ok(store.push(ValueData::with_operands(ty, Payload::Aggregate, elements.to_vec())))
    }

    fn const_vector(&self, elements: &[ValueHandle]) -> EngineResult<ValueHandle> {
        let Some(first) = elements.first() else {
            return Err(EngineError::IncompatibleOperands { op: "const vector" });
        };
        let element = self.type_of(*first)?;
        for value in elements {
            if self.type_of(*value)? != element {
                return Err(EngineError::IncompatibleOperands { op: "const vector" });
            }
        }
        #[allow(clippy::cast_possible_truncation, reason = "element counts stay small")]
        let ty = self.vector_type(element, elements.len() as u32);
        let mut store = self.store.borrow_mut();
        Ok(store.push(ValueData::with_operands(ty, Payload::Aggregate, elements.to_vec())))
    }

    fn const_struct(&self, elements: &[ValueHandle], packed: bool) -> EngineResult<ValueHandle> {
        let mut fields = Vec::with_capacity(elements.len());
        for value in elements {
            fields.push(self.type_of(*value)?);
        }
        let ty = self.struct_type(&fields, packed);
        let mut store = self.store.borrow_mut();
        Ok(store.push(ValueData::with_operands(ty, Payload::Aggregate, elements.to_vec())))
    }

    fn const_struct_in_context(
        &self,
        context: ContextHandle,
        elements: &[ValueHandle],
        packed: bool,
    ) -> EngineResult<ValueHandle> {
        self.validate_context(context)?;
        self.const_struct(elements, packed)
    }

    fn const_string(&self, text: &str, null_terminated: bool) -> EngineResult<ValueHandle> {
        let mut bytes = text.as_bytes().to_vec();
        if null_terminated {
            bytes.push(0);
        }
        let i8_ty = self.int_type(8);
        #[allow(clippy::cast_possible_truncation, reason = "string lengths stay small")]
        let ty = self.array_type(i8_ty, bytes.len() as u32);
        let mut store = self.store.borrow_mut();
        Ok(store.push(ValueData::new(ty, Payload::Str { bytes })))
    }

    fn const_string_in_context(
        &self,
        context: ContextHandle,
        text: &str,
        null_terminated: bool,
    ) -> EngineResult<ValueHandle> {
        self.validate_context(context)?;
        self.const_string(text, null_terminated)
    }

    fn const_int_binary(
        &self,
        op: IntBinOp,
        lhs: ValueHandle,
        rhs: ValueHandle,
    ) -> EngineResult<ValueHandle> {
        let (lty, width, lbits) = self.int_operand(lhs)?;
        let (rty, _, rbits) = self.int_operand(rhs)?;
        if lty != rty {
            return Err(EngineError::IncompatibleOperands { op: op.mnemonic() });
        }
        let folded = fold::int_binary(op, width, lbits, rbits)?;
        trace!(op = op.mnemonic(), width, "folded int binary");
        self.const_int_raw(lty, folded)
    }

    fn const_int_unary(&self, op: IntUnaryOp, value: ValueHandle) -> EngineResult<ValueHandle> {
        let (ty, width, bits) = self.int_operand(value)?;
        let folded = fold::int_unary(op, width, bits)?;
        self.const_int_raw(ty, folded)
    }

    fn const_int_compare(
        &self,
        predicate: IntPredicate,
        lhs: ValueHandle,
        rhs: ValueHandle,
    ) -> EngineResult<ValueHandle> {
        let (lty, width, lbits) = self.int_operand(lhs)?;
        let (rty, _, rbits) = self.int_operand(rhs)?;
        if lty != rty {
            return Err(EngineError::IncompatibleOperands { op: "icmp" });
        }
        let verdict = fold::icmp(predicate, width, lbits, rbits);
        let bool_ty = self.int_type(1);
        self.const_int_raw(bool_ty, u64::from(verdict))
    }

    fn const_real_binary(
        &self,
        op: RealBinOp,
        lhs: ValueHandle,
        rhs: ValueHandle,
    ) -> EngineResult<ValueHandle> {
        let (lty, _, lvalue) = self.real_operand(lhs)?;
        let (rty, _, rvalue) = self.real_operand(rhs)?;
        if lty != rty {
            return Err(EngineError::IncompatibleOperands { op: op.mnemonic() });
        }
        let folded = fold::real_binary(op, lvalue, rvalue);
        trace!(op = op.mnemonic(), "folded real binary");
        self.const_real_raw(lty, folded)
    }

    fn const_real_neg(&self, value: ValueHandle) -> EngineResult<ValueHandle> {
        let (ty, _, v) = self.real_operand(value)?;
        self.const_real_raw(ty, -v)
    }

    fn const_real_compare(
        &self,
        predicate: RealPredicate,
        lhs: ValueHandle,
        rhs: ValueHandle,
    ) -> EngineResult<ValueHandle> {
        let (lty, _, lvalue) = self.real_operand(lhs)?;
        let (rty, _, rvalue) = self.real_operand(rhs)?;
        if lty != rty {
            return Err(EngineError::IncompatibleOperands { op: "fcmp" });
        }
        let verdict = fold::fcmp(predicate, lvalue, rvalue);
        let bool_ty = self.int_type(1);
        self.const_int_raw(bool_ty, u64::from(verdict))
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "bit-exact conversion semantics for widths at or below 64"
    )]
    fn const_cast(
        &self,
        op: CastOp,
        value: ValueHandle,
        target: TypeHandle,
    ) -> EngineResult<ValueHandle> {
        let (src_ty, payload) = {
            let store = self.store.borrow();
            let data = store.value(value)?;
            (data.ty, data.payload.clone())
        };
        let src = self.type_data(src_ty)?;
        let tgt = self.type_data(target)?;
        trace!(op = op.mnemonic(), "folding cast");

        let incompatible = || EngineError::IncompatibleOperands { op: op.mnemonic() };

        match op {
            CastOp::Trunc => match (&src, &tgt, &payload) {
                (
                    TypeData::Int { bits: sw },
                    TypeData::Int { bits: tw },
                    Payload::Int { bits },
                ) if tw < sw => self.const_int_raw(target, *bits),
                _ => Err(incompatible()),
            },
            CastOp::ZeroExtend => match (&src, &tgt, &payload) {
                (
                    TypeData::Int { bits: sw },
                    TypeData::Int { bits: tw },
                    Payload::Int { bits },
                ) if tw > sw => self.const_int_raw(target, *bits),
                _ => Err(incompatible()),
            },
            CastOp::SignExtend => match (&src, &tgt, &payload) {
                (
                    TypeData::Int { bits: sw },
                    TypeData::Int { bits: tw },
                    Payload::Int { bits },
                ) if tw > sw => self.const_int_raw(target, fold::sign_extend(*sw, *bits) as u64),
                _ => Err(incompatible()),
            },
            CastOp::TruncOrBitcast => match (&src, &tgt, &payload) {
                (
                    TypeData::Int { bits: sw },
                    TypeData::Int { bits: tw },
                    Payload::Int { bits },
                ) if tw <= sw => self.const_int_raw(target, *bits),
                _ => Err(incompatible()),
            },
            CastOp::ZextOrBitcast => match (&src, &tgt, &payload) {
                (
                    TypeData::Int { bits: sw },
                    TypeData::Int { bits: tw },
                    Payload::Int { bits },
                ) if tw >= sw => self.const_int_raw(target, *bits),
                _ => Err(incompatible()),
            },
            CastOp::IntCast { signed } => match (&src, &tgt, &payload) {
                (
                    TypeData::Int { bits: sw },
                    TypeData::Int { bits: tw },
                    Payload::Int { bits },
                ) => {
                    if tw > sw && signed {
                        self.const_int_raw(target, fold::sign_extend(*sw, *bits) as u64)
                    } else {
                        // Narrowing masks, widening unsigned zero-extends,
                        // same width passes through.
                        self.const_int_raw(target, *bits)
                    }
                }
                _ => Err(incompatible()),
            },
            CastOp::Bitcast => match (&src, &tgt) {
                (TypeData::Int { bits: sw }, TypeData::Int { bits: tw }) if sw == tw => {
                    match payload {
                        Payload::Int { bits } => self.const_int_raw(target, bits),
                        _ => Err(incompatible()),
                    }
                }
                (TypeData::Int { bits: sw }, TypeData::Real { format }) => {
                    let Payload::Int { bits } = payload else {
                        return Err(incompatible());
                    };
                    match (*sw, *format) {
                        (32, FloatKind::Single) => {
                            self.const_real_raw(target, f64::from(f32::from_bits(bits as u32)))
                        }
                        (64, FloatKind::Double) => {
                            self.const_real_raw(target, f64::from_bits(bits))
                        }
                        _ => Err(incompatible()),
                    }
                }
                (TypeData::Real { format }, TypeData::Int { bits: tw }) => {
                    let Payload::Real { bits } = payload else {
                        return Err(incompatible());
                    };
                    let value = f64::from_bits(bits);
                    match (*format, *tw) {
                        (FloatKind::Single, 32) => {
                            self.const_int_raw(target, u64::from((value as f32).to_bits()))
                        }
                        (FloatKind::Double, 64) => self.const_int_raw(target, value.to_bits()),
                        _ => Err(incompatible()),
                    }
                }
                (TypeData::Real { .. }, TypeData::Real { .. })
                    if bit_size(&src) == bit_size(&tgt) =>
                {
                    let Payload::Real { bits } = payload else {
                        return Err(incompatible());
                    };
                    self.const_real_raw(target, f64::from_bits(bits))
                }
                (TypeData::Pointer { .. }, TypeData::Pointer { .. }) => {
                    let (data, operands) = {
                        let store = self.store.borrow();
                        let d = store.value(value)?;
                        (d.payload.clone(), d.operands.clone())
                    };
                    match data {
                        Payload::Null => self.const_pointer_null(target),
                        Payload::Int { bits } => {
                            Ok(self.intern_scalar(target, UniqueKey::Int(bits), Payload::Int { bits }))
                        }
                        payload => {
                            let mut store = self.store.borrow_mut();
                            Ok(store.push(ValueData::with_operands(target, payload, operands)))
                        }
                    }
                }
                _ => Err(incompatible()),
            },
            CastOp::FpTrunc | CastOp::FpExtend | CastOp::FpCast => {
                let (TypeData::Real { format: sf }, TypeData::Real { format: tf }) = (&src, &tgt)
                else {
                    return Err(incompatible());
                };
                let widening = tf.bits() > sf.bits();
                match op {
                    CastOp::FpTrunc if widening || sf == tf => return Err(incompatible()),
                    CastOp::FpExtend if !widening => return Err(incompatible()),
                    _ => {}
                }
                let Payload::Real { bits } = payload else {
                    return Err(incompatible());
                };
                self.const_real_raw(target, f64::from_bits(bits))
            }
            CastOp::SignedToFp | CastOp::UnsignedToFp => {
                let (TypeData::Int { bits: sw }, TypeData::Real { .. }) = (&src, &tgt) else {
                    return Err(incompatible());
                };
                let Payload::Int { bits } = payload else {
                    return Err(incompatible());
                };
                let value = if matches!(op, CastOp::SignedToFp) {
                    fold::sign_extend(*sw, bits) as f64
                } else {
                    bits as f64
                };
                self.const_real_raw(target, value)
            }
            CastOp::FpToSigned | CastOp::FpToUnsigned => {
                let (TypeData::Real { .. }, TypeData::Int { bits: tw }) = (&src, &tgt) else {
                    return Err(incompatible());
                };
                let Payload::Real { bits } = payload else {
                    return Err(incompatible());
                };
                let truncated = f64::from_bits(bits).trunc();
                if !truncated.is_finite() {
                    return Err(incompatible());
                }
                let width = i32::try_from(*tw).map_err(|_| incompatible())?;
                if matches!(op, CastOp::FpToSigned) {
                    let bound = 2f64.powi(width - 1);
                    if truncated < -bound || truncated >= bound {
                        return Err(incompatible());
                    }
                    self.const_int_raw(target, (truncated as i64) as u64)
                } else {
                    if truncated < 0.0 || truncated >= 2f64.powi(width) {
                        return Err(incompatible());
                    }
                    self.const_int_raw(target, truncated as u64)
                }
            }
            CastOp::IntToPointer => {
                let (TypeData::Int { .. }, TypeData::Pointer { .. }) = (&src, &tgt) else {
                    return Err(incompatible());
                };
                let Payload::Int { bits } = payload else {
                    return Err(incompatible());
                };
                Ok(self.intern_scalar(target, UniqueKey::Int(bits), Payload::Int { bits }))
            }
            CastOp::PointerToInt => {
                let (TypeData::Pointer { .. }, TypeData::Int { .. }) = (&src, &tgt) else {
                    return Err(incompatible());
                };
                match payload {
                    Payload::Null => self.const_int_raw(target, 0),
                    Payload::Int { bits } => self.const_int_raw(target, bits),
                    // Globals and GEP expressions have no numeric address
                    // in this engine.
                    _ => Err(incompatible()),
                }
            }
        }
    }

    fn const_gep(
        &self,
        base: ValueHandle,
        indices: &[ValueHandle],
        in_bounds: bool,
    ) -> EngineResult<ValueHandle> {
        let base_ty = self.type_of(base)?;
        match self.type_data(base_ty)? {
            TypeData::Pointer { .. } => {}
            _ => return Err(EngineError::IncompatibleOperands { op: "gep" }),
        }
        for index in indices {
            self.int_operand(*index)?;
        }
        let mut operands = Vec::with_capacity(indices.len() + 1);
        operands.push(base);
        operands.extend_from_slice(indices);
        let mut store = self.store.borrow_mut();
        Ok(store.push(ValueData::with_operands(
            base_ty,
            Payload::Gep { in_bounds },
            operands,
        )))
    }

    fn const_extract_value(
        &self,
        aggregate: ValueHandle,
        index: u32,
    ) -> EngineResult<ValueHandle> {
        let elements = self.materialize_elements(aggregate)?;
        elements
            .get(index as usize)
            .copied()
            .ok_or(EngineError::IncompatibleOperands { op: "extractvalue" })
    }

    fn const_insert_value(
        &self,
        aggregate: ValueHandle,
        element: ValueHandle,
        index: u32,
    ) -> EngineResult<ValueHandle> {
        let ty = self.type_of(aggregate)?;
        let expected = self.element_type_at(ty, index as usize)?;
        if self.type_of(element)? != expected {
            return Err(EngineError::IncompatibleOperands { op: "insertvalue" });
        }
        let mut elements = self.materialize_elements(aggregate)?;
        elements[index as usize] = element;
        let mut store = self.store.borrow_mut();
        Ok(store.push(ValueData::with_operands(ty, Payload::Aggregate, elements)))
    }

    fn const_extract_element(
        &self,
        vector: ValueHandle,
        index: ValueHandle,
    ) -> EngineResult<ValueHandle> {
        let ty = self.type_of(vector)?;
        match self.type_data(ty)? {
            TypeData::Vector { .. } => {}
            _ => return Err(EngineError::IncompatibleOperands { op: "extractelement" }),
        }
        let i = self.index_value(index)?;
        let elements = self.materialize_elements(vector)?;
        elements
            .get(i)
            .copied()
            .ok_or(EngineError::IncompatibleOperands { op: "extractelement" })
    }

    fn const_insert_element(
        &self,
        vector: ValueHandle,
        element: ValueHandle,
        index: ValueHandle,
    ) -> EngineResult<ValueHandle> {
        let ty = self.type_of(vector)?;
        let i = self.index_value(index)?;
        let expected = self.element_type_at(ty, i)?;
        if self.type_of(element)? != expected {
            return Err(EngineError::IncompatibleOperands { op: "insertelement" });
        }
        let mut elements = self.materialize_elements(vector)?;
        elements[i] = element;
        let mut store = self.store.borrow_mut();
        Ok(store.push(ValueData::with_operands(ty, Payload::Aggregate, elements)))
    }

    fn const_shuffle_vector(
        &self,
        lhs: ValueHandle,
        rhs: ValueHandle,
        mask: ValueHandle,
    ) -> EngineResult<ValueHandle> {
        let lhs_ty = self.type_of(lhs)?;
        let rhs_ty = self.type_of(rhs)?;
        if lhs_ty != rhs_ty {
            return Err(EngineError::IncompatibleOperands { op: "shufflevector" });
        }
        let element = match self.type_data(lhs_ty)? {
            TypeData::Vector { element, .. } => element,
            _ => return Err(EngineError::IncompatibleOperands { op: "shufflevector" }),
        };
        match self.type_data(self.type_of(mask)?)? {
            TypeData::Vector { element: mask_elem, .. } => {
                match self.type_data(mask_elem)? {
                    TypeData::Int { .. } => {}
                    _ => return Err(EngineError::IncompatibleOperands { op: "shufflevector" }),
                }
            }
            _ => return Err(EngineError::IncompatibleOperands { op: "shufflevector" }),
        }
        let mut combined = self.materialize_elements(lhs)?;
        combined.extend(self.materialize_elements(rhs)?);
        let lanes = self.materialize_elements(mask)?;
        let mut picked = Vec::with_capacity(lanes.len());
        for lane in lanes {
            let i = self.index_value(lane)?;
            let value = combined
                .get(i)
                .copied()
                .ok_or(EngineError::IncompatibleOperands { op: "shufflevector" })?;
            picked.push(value);
        }
        #[allow(clippy::cast_possible_truncation, reason = "lane counts stay small")]
        let ty = self.vector_type(element, picked.len() as u32);
        let mut store = self.store.borrow_mut();
        Ok(store.push(ValueData::with_operands(ty, Payload::Aggregate, picked)))
    }

    fn int_zero_extended_value(&self, value: ValueHandle) -> EngineResult<u64> {
        let (_, _, bits) = self.int_operand(value)?;
        Ok(bits)
    }

    fn int_sign_extended_value(&self, value: ValueHandle) -> EngineResult<i64> {
        let (_, width, bits) = self.int_operand(value)?;
        Ok(fold::sign_extend(width, bits))
    }

    fn real_value(&self, value: ValueHandle) -> EngineResult<f64> {
        let (_, _, v) = self.real_operand(value)?;
        Ok(v)
    }

    fn value_name(&self, value: ValueHandle) -> EngineResult<String> {
        Ok(self.store.borrow().value(value)?.name.clone())
    }

    fn set_value_name(&self, value: ValueHandle, name: &str) -> EngineResult<()> {
        let mut store = self.store.borrow_mut();
        store.value_mut(value)?.name = name.to_string();
        Ok(())
    }

    fn is_constant(&self, value: ValueHandle) -> EngineResult<bool> {
        let constant = !matches!(self.store.borrow().value(value)?.payload, Payload::Block);
        Ok(constant)
    }

    fn is_null(&self, value: ValueHandle) -> EngineResult<bool> {
        let store = self.store.borrow();
        let verdict = match store.value(value)?.payload {
            Payload::Null => true,
            Payload::Int { bits } => bits == 0,
            Payload::Real { bits } => f64::from_bits(bits) == 0.0,
            _ => false,
        };
        Ok(verdict)
    }

    fn is_undef(&self, value: ValueHandle) -> EngineResult<bool> {
        Ok(matches!(
            self.store.borrow().value(value)?.payload,
            Payload::Undef
        ))
    }

    fn value_to_string(&self, value: ValueHandle) -> EngineResult<String> {
        print::value_string(&self.store.borrow(), value)
    }

    fn operand_count(&self, value: ValueHandle) -> EngineResult<usize> {
        Ok(self.store.borrow().value(value)?.operands.len())
    }

    fn operand(&self, value: ValueHandle, index: usize) -> EngineResult<Option<ValueHandle>> {
        Ok(self.store.borrow().value(value)?.operands.get(index).copied())
    }

    fn set_operand(
        &self,
        value: ValueHandle,
        index: usize,
        operand: ValueHandle,
    ) -> EngineResult<()> {
        self.store.borrow().value(operand)?;
        let mut store = self.store.borrow_mut();
        let data = store.value_mut(value)?;
        let slot = data
            .operands
            .get_mut(index)
            .ok_or(EngineError::IncompatibleOperands { op: "set-operand" })?;
        *slot = operand;
        Ok(())
    }

    fn add_attribute(&self, value: ValueHandle, attrs: Attributes) -> EngineResult<()> {
        let mut store = self.store.borrow_mut();
        let data = store.value_mut(value)?;
        data.attrs |= attrs;
        Ok(())
    }

    fn remove_attribute(&self, value: ValueHandle, attrs: Attributes) -> EngineResult<()> {
        let mut store = self.store.borrow_mut();
        let data = store.value_mut(value)?;
        data.attrs -= attrs;
        Ok(())
    }

    fn attributes(&self, value: ValueHandle) -> EngineResult<Attributes> {
        Ok(self.store.borrow().value(value)?.attrs)
    }

    fn global_kind(&self, value: ValueHandle) -> EngineResult<Option<GlobalKind>> {
        let store = self.store.borrow();
        match &store.value(value)?.payload {
            Payload::Global(data) => Ok(Some(data.kind)),
            _ => Ok(None),
        }
    }

    fn alignment(&self, value: ValueHandle) -> EngineResult<u32> {
        self.with_global(value, |data| Ok(data.alignment))
    }

    fn set_alignment(&self, value: ValueHandle, bytes: u32) -> EngineResult<()> {
        self.with_global_mut(value, |data| {
            data.alignment = bytes;
            Ok(())
        })
    }

    fn linkage(&self, value: ValueHandle) -> EngineResult<Linkage> {
        self.with_global(value, |data| Ok(data.linkage))
    }

    fn set_linkage(&self, value: ValueHandle, linkage: Linkage) -> EngineResult<()> {
        self.with_global_mut(value, |data| {
            data.linkage = linkage;
            Ok(())
        })
    }

    fn visibility(&self, value: ValueHandle) -> EngineResult<Visibility> {
        self.with_global(value, |data| Ok(data.visibility))
    }

    fn set_visibility(&self, value: ValueHandle, visibility: Visibility) -> EngineResult<()> {
        self.with_global_mut(value, |data| {
            data.visibility = visibility;
            Ok(())
        })
    }

    fn section(&self, value: ValueHandle) -> EngineResult<Option<String>> {
        self.with_global(value, |data| Ok(data.section.clone()))
    }

    fn set_section(&self, value: ValueHandle, section: Option<&str>) -> EngineResult<()> {
        self.with_global_mut(value, |data| {
            data.section = section.map(str::to_string);
            Ok(())
        })
    }

    fn is_declaration(&self, value: ValueHandle) -> EngineResult<bool> {
        self.with_global(value, |data| Ok(data.initializer.is_none()))
    }

    fn is_global_constant(&self, value: ValueHandle) -> EngineResult<bool> {
        self.with_global(value, |data| Ok(data.is_constant))
    }

    fn set_global_constant(&self, value: ValueHandle, constant: bool) -> EngineResult<()> {
        self.with_global_mut(value, |data| {
            data.is_constant = constant;
            Ok(())
        })
    }

    fn initializer(&self, value: ValueHandle) -> EngineResult<Option<ValueHandle>> {
        self.with_global(value, |data| Ok(data.initializer))
    }

    fn set_initializer(&self, value: ValueHandle, init: ValueHandle) -> EngineResult<()> {
        self.store.borrow().value(init)?;
        self.with_global_mut(value, |data| {
            data.initializer = Some(init);
            Ok(())
        })
    }

    fn is_thread_local(&self, value: ValueHandle) -> EngineResult<bool> {
        self.with_global(value, |data| match data.kind {
            GlobalKind::Variable => Ok(data.thread_local),
            GlobalKind::Alias => Err(EngineError::IncompatibleOperands { op: "thread-local" }),
        })
    }

    fn set_thread_local(&self, value: ValueHandle, enabled: bool) -> EngineResult<()> {
        self.with_global_mut(value, |data| match data.kind {
            GlobalKind::Variable => {
                data.thread_local = enabled;
                Ok(())
            }
            GlobalKind::Alias => Err(EngineError::IncompatibleOperands { op: "thread-local" }),
        })
    }
}

impl FoldingEngine {
    fn with_global<T>(
        &self,
        value: ValueHandle,
        read: impl FnOnce(&GlobalData) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let store = self.store.borrow();
        match &store.value(value)?.payload {
            Payload::Global(data) => read(data),
            _ => Err(EngineError::NotAGlobal),
        }
    }

    fn with_global_mut<T>(
        &self,
        value: ValueHandle,
        write: impl FnOnce(&mut GlobalData) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let mut store = self.store.borrow_mut();
        match &mut store.value_mut(value)?.payload {
            Payload::Global(data) => write(data),
            _ => Err(EngineError::NotAGlobal),
        }
    }
}
