//! Textual rendering of types and constants.

use std::fmt::Write as _;

use lathe_ir::{EngineResult, TypeHandle, ValueHandle};

use crate::fold::sign_extend;
use crate::store::{Payload, Store, TypeData};

pub(crate) fn type_string(store: &Store, ty: TypeHandle) -> EngineResult<String> {
    let rendered = match store.types.get(ty)? {
        TypeData::Int { bits } => format!("i{bits}"),
        TypeData::Real { format } => format.to_string(),
        TypeData::Pointer { .. } => "ptr".to_string(),
        TypeData::Array { element, len } => {
            format!("[{len} x {}]", type_string(store, *element)?)
        }
        TypeData::Vector { element, len } => {
            format!("<{len} x {}>", type_string(store, *element)?)
        }
        TypeData::Struct { fields, packed } => {
            let mut body = String::new();
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    body.push_str(", ");
                }
                body.push_str(&type_string(store, *field)?);
            }
            if *packed {
                format!("<{{ {body} }}>")
            } else {
                format!("{{ {body} }}")
            }
        }
        TypeData::Function { ret, params } => {
            let mut body = String::new();
            for (i, param) in params.iter().enumerate() {
                if i > 0 {
                    body.push_str(", ");
                }
                body.push_str(&type_string(store, *param)?);
            }
            format!("{} ({body})", type_string(store, *ret)?)
        }
        TypeData::Void => "void".to_string(),
        TypeData::Label => "label".to_string(),
        TypeData::Metadata => "metadata".to_string(),
        TypeData::X86Mmx => "x86_mmx".to_string(),
    };
    Ok(rendered)
}

pub(crate) fn value_string(store: &Store, handle: ValueHandle) -> EngineResult<String> {
    let data = store.value(handle)?;
    let ty = type_string(store, data.ty)?;
    let rendered = match &data.payload {
        Payload::Int { bits } => {
            let width = match store.types.get(data.ty)? {
                TypeData::Int { bits } => *bits,
                // Pointer-typed pattern from inttoptr.
                _ => 64,
            };
            format!("{ty} {}", sign_extend(width, *bits))
        }
        Payload::Real { bits } => {
            // Payloads hold f64 bit patterns for every format, already
            // rounded to the format at construction.
            format!("{ty} {}", f64::from_bits(*bits))
        }
        Payload::Null => match store.types.get(data.ty)? {
            TypeData::Pointer { .. } => format!("{ty} null"),
            _ => format!("{ty} zeroinitializer"),
        },
        Payload::Undef => format!("{ty} undef"),
        Payload::Aggregate => {
            let (open, close) = match store.types.get(data.ty)? {
                TypeData::Vector { .. } => ("<", ">"),
                TypeData::Struct { .. } => ("{ ", " }"),
                _ => ("[", "]"),
            };
            let mut body = String::new();
            for (i, element) in data.operands.iter().enumerate() {
                if i > 0 {
                    body.push_str(", ");
                }
                body.push_str(&value_string(store, *element)?);
            }
            format!("{ty} {open}{body}{close}")
        }
        Payload::Str { bytes } => {
            let mut body = String::new();
            for byte in bytes {
                if byte.is_ascii_graphic() || *byte == b' ' {
                    body.push(char::from(*byte));
                } else {
                    let _ = write!(body, "\\{byte:02X}");
                }
            }
            format!("{ty} c\"{body}\"")
        }
        Payload::Gep { in_bounds } => {
            let keyword = if *in_bounds {
                "getelementptr inbounds"
            } else {
                "getelementptr"
            };
            let mut body = String::new();
            for (i, operand) in data.operands.iter().enumerate() {
                if i > 0 {
                    body.push_str(", ");
                }
                body.push_str(&value_string(store, *operand)?);
            }
            format!("{keyword} ({body})")
        }
        Payload::Global(_) | Payload::Function => format!("{ty} @{}", data.name),
        Payload::Block => format!("%{}", data.name),
    };
    Ok(rendered)
}
