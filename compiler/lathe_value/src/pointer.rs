//! Pointer constants.

use crate::constant::ConstantValue;
use crate::operands::UserValue;
use crate::value::value_wrapper;

value_wrapper! {
    /// A constant of pointer type: a null pointer, a global's address, a
    /// folded GEP expression, or an integer converted to pointer.
    PointerConstant
}

impl<'e> UserValue<'e> for PointerConstant<'e> {}
impl<'e> ConstantValue<'e> for PointerConstant<'e> {}
