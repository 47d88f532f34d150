//! Width-tagged numbers carried by [`Value::Number`](super::Value::Number).

use std::fmt;

/// Static numeric type of a field or a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl NumberType {
    pub fn name(self) -> &'static str {
        match self {
            NumberType::I8 => "i8",
            NumberType::I16 => "i16",
            NumberType::I32 => "i32",
            NumberType::I64 => "i64",
            NumberType::U8 => "u8",
            NumberType::U16 => "u16",
            NumberType::U32 => "u32",
            NumberType::U64 => "u64",
            NumberType::F32 => "f32",
            NumberType::F64 => "f64",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, NumberType::F32 | NumberType::F64)
    }
}

impl fmt::Display for NumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A number that remembers the width it was produced with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Number {
    pub fn number_type(&self) -> NumberType {
        match self {
            Number::I8(_) => NumberType::I8,
            Number::I16(_) => NumberType::I16,
            Number::I32(_) => NumberType::I32,
            Number::I64(_) => NumberType::I64,
            Number::U8(_) => NumberType::U8,
            Number::U16(_) => NumberType::U16,
            Number::U32(_) => NumberType::U32,
            Number::U64(_) => NumberType::U64,
            Number::F32(_) => NumberType::F32,
            Number::F64(_) => NumberType::F64,
        }
    }

    pub fn is_float(&self) -> bool {
        self.number_type().is_float()
    }

    /// Lossy view as `f64`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::I8(n) => f64::from(n),
            Number::I16(n) => f64::from(n),
            Number::I32(n) => f64::from(n),
            Number::I64(n) => n as f64,
            Number::U8(n) => f64::from(n),
            Number::U16(n) => f64::from(n),
            Number::U32(n) => f64::from(n),
            Number::U64(n) => n as f64,
            Number::F32(n) => f64::from(n),
            Number::F64(n) => n,
        }
    }

    /// Exact integral view. Floats qualify only when they carry no fraction.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Number::I8(n) => Some(i128::from(n)),
            Number::I16(n) => Some(i128::from(n)),
            Number::I32(n) => Some(i128::from(n)),
            Number::I64(n) => Some(i128::from(n)),
            Number::U8(n) => Some(i128::from(n)),
            Number::U16(n) => Some(i128::from(n)),
            Number::U32(n) => Some(i128::from(n)),
            Number::U64(n) => Some(i128::from(n)),
            Number::F32(n) => integral(f64::from(n)),
            Number::F64(n) => integral(n),
        }
    }

    /// Builds a number of type `ty` from an integer, `None` when out of range.
    pub fn from_i128(value: i128, ty: NumberType) -> Option<Number> {
        Some(match ty {
            NumberType::I8 => Number::I8(i8::try_from(value).ok()?),
            NumberType::I16 => Number::I16(i16::try_from(value).ok()?),
            NumberType::I32 => Number::I32(i32::try_from(value).ok()?),
            NumberType::I64 => Number::I64(i64::try_from(value).ok()?),
            NumberType::U8 => Number::U8(u8::try_from(value).ok()?),
            NumberType::U16 => Number::U16(u16::try_from(value).ok()?),
            NumberType::U32 => Number::U32(u32::try_from(value).ok()?),
            NumberType::U64 => Number::U64(u64::try_from(value).ok()?),
            NumberType::F32 => Number::F32(value as f32),
            NumberType::F64 => Number::F64(value as f64),
        })
    }

    /// Builds a number of type `ty` from a float. Integer targets reject
    /// fractional, non-finite and out-of-range inputs.
    pub fn from_f64(value: f64, ty: NumberType) -> Option<Number> {
        match ty {
            NumberType::F32 => {
                let narrowed = value as f32;
                // Finite inputs beyond the f32 range must not become infinity.
                (narrowed.is_finite() || !value.is_finite()).then_some(Number::F32(narrowed))
            }
            NumberType::F64 => Some(Number::F64(value)),
            _ => Number::from_i128(integral(value)?, ty),
        }
    }

    /// Checked conversion to another width.
    pub fn to_type(self, ty: NumberType) -> Option<Number> {
        if self.number_type() == ty {
            return Some(self);
        }
        match self.as_i128() {
            Some(n) if !self.is_float() => Number::from_i128(n, ty),
            _ => Number::from_f64(self.as_f64(), ty),
        }
    }
}

fn integral(value: f64) -> Option<i128> {
    let fits = value.is_finite()
        && value.fract() == 0.0
        && value >= i128::MIN as f64
        && value < i128::MAX as f64;
    fits.then_some(value as i128)
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I8(n) => n.fmt(f),
            Number::I16(n) => n.fmt(f),
            Number::I32(n) => n.fmt(f),
            Number::I64(n) => n.fmt(f),
            Number::U8(n) => n.fmt(f),
            Number::U16(n) => n.fmt(f),
            Number::U32(n) => n.fmt(f),
            Number::U64(n) => n.fmt(f),
            Number::F32(n) => n.fmt(f),
            Number::F64(n) => n.fmt(f),
        }
    }
}

macro_rules! number_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n)
                }
            }
        )*
    };
}

number_from! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}
