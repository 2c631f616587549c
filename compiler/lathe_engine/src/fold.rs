//! Pure integer/floating fold arithmetic.
//!
//! Integer values travel as `u64` bit patterns already masked to their
//! width; signedness is a matter of interpretation at each operation, not
//! of representation. All helpers are pure so the semantics are testable
//! without a store.

use lathe_ir::{
    EngineError, EngineResult, IntBinOp, IntPredicate, IntUnaryOp, RealBinOp, RealPredicate,
    WrapMode,
};

/// Mask a bit pattern to `bits` wide.
#[inline]
pub(crate) fn mask(bits: u32, value: u64) -> u64 {
    if bits >= 64 {
        value
    } else {
        value & ((1u64 << bits) - 1)
    }
}

/// Interpret a masked pattern as a signed value of `bits` wide.
#[inline]
#[allow(clippy::cast_possible_wrap, reason = "bit pattern reinterpretation")]
pub(crate) fn sign_extend(bits: u32, value: u64) -> i64 {
    if bits >= 64 {
        value as i64
    } else {
        let shift = 64 - bits;
        ((value << shift) as i64) >> shift
    }
}

fn in_signed_range(bits: u32, value: i128) -> bool {
    let half = 1i128 << (bits - 1);
    value >= -half && value < half
}

fn in_unsigned_range(bits: u32, value: i128) -> bool {
    value >= 0 && value < (1i128 << bits)
}

#[allow(clippy::cast_possible_truncation, reason = "low 64 bits are the result")]
fn apply_wrap(op: IntBinOp, mode: WrapMode, bits: u32, signed: i128, unsigned: i128) -> EngineResult<u64> {
    match mode {
        WrapMode::Wrapping => Ok(mask(bits, signed as u64)),
        WrapMode::NoSignedWrap => {
            if in_signed_range(bits, signed) {
                Ok(mask(bits, signed as u64))
            } else {
                Err(EngineError::SignedWrap { op: op.mnemonic() })
            }
        }
        WrapMode::NoUnsignedWrap => {
            if in_unsigned_range(bits, unsigned) {
                Ok(mask(bits, unsigned as u64))
            } else {
                Err(EngineError::UnsignedWrap { op: op.mnemonic() })
            }
        }
    }
}

/// Fold a binary integer operation over two masked patterns of `bits`
/// wide. Shift amounts at or beyond the width reject the fold rather than
/// producing an unspecified pattern.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "bit pattern arithmetic")]
pub(crate) fn int_binary(op: IntBinOp, bits: u32, lhs: u64, rhs: u64) -> EngineResult<u64> {
    let sl = i128::from(sign_extend(bits, lhs));
    let sr = i128::from(sign_extend(bits, rhs));
    let ul = i128::from(lhs);
    let ur = i128::from(rhs);
    match op {
        IntBinOp::Add(mode) => apply_wrap(op, mode, bits, sl + sr, ul + ur),
        IntBinOp::Sub(mode) => apply_wrap(op, mode, bits, sl - sr, ul - ur),
        IntBinOp::Mul(mode) => apply_wrap(op, mode, bits, sl * sr, ul * ur),
        IntBinOp::SignedDiv { exact } => {
            if sr == 0 {
                return Err(EngineError::DivisionByZero);
            }
            if exact && sl % sr != 0 {
                return Err(EngineError::InexactDivision);
            }
            // i128 division of 64-bit-range operands cannot overflow.
            Ok(mask(bits, (sl / sr) as u64))
        }
        IntBinOp::UnsignedDiv => {
            if ur == 0 {
                return Err(EngineError::DivisionByZero);
            }
            Ok(mask(bits, (ul / ur) as u64))
        }
        IntBinOp::SignedRem => {
            if sr == 0 {
                return Err(EngineError::DivisionByZero);
            }
            Ok(mask(bits, (sl % sr) as u64))
        }
        IntBinOp::UnsignedRem => {
            if ur == 0 {
                return Err(EngineError::DivisionByZero);
            }
            Ok(mask(bits, (ul % ur) as u64))
        }
        IntBinOp::And => Ok(lhs & rhs),
        IntBinOp::Or => Ok(lhs | rhs),
        IntBinOp::Xor => Ok(lhs ^ rhs),
        IntBinOp::ShiftLeft => {
            let amount = shift_amount(op, bits, rhs)?;
            Ok(mask(bits, lhs << amount))
        }
        IntBinOp::LogicalShiftRight => {
            let amount = shift_amount(op, bits, rhs)?;
            Ok(lhs >> amount)
        }
        IntBinOp::ArithmeticShiftRight => {
            let amount = shift_amount(op, bits, rhs)?;
            Ok(mask(bits, (sign_extend(bits, lhs) >> amount) as u64))
        }
    }
}

#[allow(clippy::cast_possible_truncation, reason = "checked against bit width")]
fn shift_amount(op: IntBinOp, bits: u32, rhs: u64) -> EngineResult<u32> {
    if rhs >= u64::from(bits) {
        return Err(EngineError::IncompatibleOperands { op: op.mnemonic() });
    }
    Ok(rhs as u32)
}

/// Fold a unary integer operation.
#[allow(clippy::cast_possible_truncation, reason = "low 64 bits are the result")]
pub(crate) fn int_unary(op: IntUnaryOp, bits: u32, value: u64) -> EngineResult<u64> {
    match op {
        IntUnaryOp::Neg(mode) => {
            let signed = -i128::from(sign_extend(bits, value));
            let unsigned = -i128::from(value);
            match mode {
                WrapMode::Wrapping => Ok(mask(bits, signed as u64)),
                WrapMode::NoSignedWrap => {
                    if in_signed_range(bits, signed) {
                        Ok(mask(bits, signed as u64))
                    } else {
                        Err(EngineError::SignedWrap { op: op.mnemonic() })
                    }
                }
                WrapMode::NoUnsignedWrap => {
                    // 0 - v underflows for every nonzero v.
                    if in_unsigned_range(bits, unsigned) {
                        Ok(mask(bits, unsigned as u64))
                    } else {
                        Err(EngineError::UnsignedWrap { op: op.mnemonic() })
                    }
                }
            }
        }
        IntUnaryOp::Not => Ok(mask(bits, !value)),
    }
}

/// Evaluate an integer comparison over masked patterns.
pub(crate) fn icmp(predicate: IntPredicate, bits: u32, lhs: u64, rhs: u64) -> bool {
    let sl = sign_extend(bits, lhs);
    let sr = sign_extend(bits, rhs);
    match predicate {
        IntPredicate::Eq => lhs == rhs,
        IntPredicate::Ne => lhs != rhs,
        IntPredicate::UnsignedGreater => lhs > rhs,
        IntPredicate::UnsignedGreaterOrEqual => lhs >= rhs,
        IntPredicate::UnsignedLess => lhs < rhs,
        IntPredicate::UnsignedLessOrEqual => lhs <= rhs,
        IntPredicate::SignedGreater => sl > sr,
        IntPredicate::SignedGreaterOrEqual => sl >= sr,
        IntPredicate::SignedLess => sl < sr,
        IntPredicate::SignedLessOrEqual => sl <= sr,
    }
}

/// Fold a binary floating operation. IEEE semantics: division by zero
/// yields an infinity, invalid operations yield NaN; nothing errors.
pub(crate) fn real_binary(op: RealBinOp, lhs: f64, rhs: f64) -> f64 {
    match op {
        RealBinOp::Add => lhs + rhs,
        RealBinOp::Sub => lhs - rhs,
        RealBinOp::Mul => lhs * rhs,
        RealBinOp::Div => lhs / rhs,
        RealBinOp::Rem => lhs % rhs,
    }
}

/// Evaluate a floating comparison.
#[allow(clippy::float_cmp, reason = "IEEE comparison semantics are the point")]
pub(crate) fn fcmp(predicate: RealPredicate, lhs: f64, rhs: f64) -> bool {
    let ordered = !lhs.is_nan() && !rhs.is_nan();
    match predicate {
        RealPredicate::AlwaysFalse => false,
        RealPredicate::AlwaysTrue => true,
        RealPredicate::Ordered => ordered,
        RealPredicate::Unordered => !ordered,
        RealPredicate::OrderedEq => ordered && lhs == rhs,
        RealPredicate::OrderedNe => ordered && lhs != rhs,
        RealPredicate::OrderedGreater => ordered && lhs > rhs,
        RealPredicate::OrderedGreaterOrEqual => ordered && lhs >= rhs,
        RealPredicate::OrderedLess => ordered && lhs < rhs,
        RealPredicate::OrderedLessOrEqual => ordered && lhs <= rhs,
        RealPredicate::UnorderedEq => !ordered || lhs == rhs,
        RealPredicate::UnorderedNe => !ordered || lhs != rhs,
        RealPredicate::UnorderedGreater => !ordered || lhs > rhs,
        RealPredicate::UnorderedGreaterOrEqual => !ordered || lhs >= rhs,
        RealPredicate::UnorderedLess => !ordered || lhs < rhs,
        RealPredicate::UnorderedLessOrEqual => !ordered || lhs <= rhs,
    }
}
