//! Numeric promotion lattice and the per-operator arithmetic typing
//! rules. Grounded on the front-end specification's type-rule section:
//! ordered (same-signedness) integers promote to the wider type of the
//! pair; mixed signed/unsigned promotes to the wider signed type when it
//! can represent the unsigned operand, else falls back to `float64`; any
//! mix with a float promotes to the widest float involved.

use ferritec_par::ast::Primitive;

pub fn is_integer(p: Primitive) -> bool {
    use Primitive::*;
    matches!(p, Int8 | Int16 | Int32 | Int64 | UInt8 | UInt16 | UInt32 | UInt64)
}

pub fn is_signed_integer(p: Primitive) -> bool {
    use Primitive::*;
    matches!(p, Int8 | Int16 | Int32 | Int64)
}

pub fn is_float(p: Primitive) -> bool {
    matches!(p, Primitive::Float32 | Primitive::Float64)
}

pub fn is_numeric(p: Primitive) -> bool {
    is_integer(p) || is_float(p)
}

fn width(p: Primitive) -> u8 {
    use Primitive::*;
    match p {
        Int8 | UInt8 => 8,
        Int16 | UInt16 => 16,
        Int32 | UInt32 => 32,
        Int64 | UInt64 => 64,
        Float32 => 32,
        Float64 => 64,
        _ => 0,
    }
}

fn signed_of_width(w: u8) -> Primitive {
    match w {
        8 => Primitive::Int8,
        16 => Primitive::Int16,
        32 => Primitive::Int32,
        _ => Primitive::Int64,
    }
}

fn unsigned_of_width(w: u8) -> Primitive {
    match w {
        8 => Primitive::UInt8,
        16 => Primitive::UInt16,
        32 => Primitive::UInt32,
        _ => Primitive::UInt64,
    }
}

/// The widest integer type spanning `a` and `b`, ignoring signedness
/// mismatches (used by `//` and `%`, which require both operands
/// already be integers).
pub fn widest_integer(a: Primitive, b: Primitive) -> Primitive {
    widest_numeric(a, b)
}

/// The promoted type of a numeric pair, per the promotion lattice.
/// Returns `None` if either type is not numeric.
pub fn promote(a: Primitive, b: Primitive) -> Option<Primitive> {
    if !is_numeric(a) || !is_numeric(b) {
        return None;
    }
    Some(widest_numeric(a, b))
}

fn widest_numeric(a: Primitive, b: Primitive) -> Primitive {
    if a == b {
        return a;
    }
    if is_float(a) || is_float(b) {
        return if a == Primitive::Float64 || b == Primitive::Float64 {
            Primitive::Float64
        } else {
            Primitive::Float32
        };
    }
    match (is_signed_integer(a), is_signed_integer(b)) {
        (true, true) => signed_of_width(width(a).max(width(b))),
        (false, false) => unsigned_of_width(width(a).max(width(b))),
        _ => {
            let (signed, unsigned) = if is_signed_integer(a) { (a, b) } else { (b, a) };
            if width(signed) > width(unsigned) {
                signed
            } else {
                Primitive::Float64
            }
        }
    }
}

/// True if assigning/initializing a value of type `from` into a slot of
/// type `to` narrows it (and so should warn), per the spec's "demotions
/// issue warnings" note.
pub fn is_demotion(from: Primitive, to: Primitive) -> bool {
    if from == to || !is_numeric(from) || !is_numeric(to) {
        return false;
    }
    if is_float(from) && !is_float(to) {
        return true;
    }
    if !is_float(from) && is_float(to) {
        return false;
    }
    width(from) > width(to)
}

/// Division always widens to a float: `float64` if either operand is a
/// 64-bit float, `float32` otherwise.
pub fn division_result(a: Primitive, b: Primitive) -> Primitive {
    if a == Primitive::Float64 || b == Primitive::Float64 {
        Primitive::Float64
    } else {
        Primitive::Float32
    }
}
