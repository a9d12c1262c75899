//! Number value type.

use core::fmt::{self, Debug, Display, Formatter};

use crate::value::Value;

#[derive(Clone, Copy, PartialEq)]
enum N {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

/// A number: a signed or unsigned integer, or a finite float.
///
/// Integers are normalized so that every non-negative integer is stored the
/// same way regardless of the Rust type it came from, which keeps `1u8` and
/// `1i64` equal.
#[derive(Clone, Copy, PartialEq)]
pub struct VNumber(N);

impl VNumber {
    /// Create a number from a signed integer.
    pub const fn from_i64(v: i64) -> Self {
        if v < 0 {
            Self(N::NegInt(v))
        } else {
            Self(N::PosInt(v as u64))
        }
    }

    /// Create a number from an unsigned integer.
    pub const fn from_u64(v: u64) -> Self {
        Self(N::PosInt(v))
    }

    /// Create a number from a float. Returns `None` for NaN and infinities.
    pub fn from_f64(v: f64) -> Option<Self> {
        v.is_finite().then_some(Self(N::Float(v)))
    }

    /// Zero.
    pub const fn zero() -> Self {
        Self(N::PosInt(0))
    }

    /// Returns the number as an `i64` if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self.0 {
            N::PosInt(u) => i64::try_from(u).ok(),
            N::NegInt(i) => Some(i),
            N::Float(_) => None,
        }
    }

    /// Returns the number as a `u64` if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self.0 {
            N::PosInt(u) => Some(u),
            N::NegInt(_) | N::Float(_) => None,
        }
    }

    /// Returns the number as an `f64` (lossy for large integers).
    pub fn as_f64(&self) -> f64 {
        match self.0 {
            N::PosInt(u) => u as f64,
            N::NegInt(i) => i as f64,
            N::Float(f) => f,
        }
    }

    /// Returns `true` if the number is stored as a float.
    pub fn is_float(&self) -> bool {
        matches!(self.0, N::Float(_))
    }
}

impl Default for VNumber {
    fn default() -> Self {
        Self::zero()
    }
}

impl Display for VNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            N::PosInt(u) => Display::fmt(&u, f),
            N::NegInt(i) => Display::fmt(&i, f),
            N::Float(x) => Display::fmt(&x, f),
        }
    }
}

impl Debug for VNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

// === From implementations ===

macro_rules! impl_from_int {
    ($($t:ty => $method:ident),* $(,)?) => {
        $(
            impl From<$t> for VNumber {
                fn from(v: $t) -> Self {
                    Self::$method(v as _)
                }
            }

            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Number(VNumber::from(v))
                }
            }
        )*
    };
}

impl_from_int! {
    i8 => from_i64,
    i16 => from_i64,
    i32 => from_i64,
    i64 => from_i64,
    isize => from_i64,
    u8 => from_u64,
    u16 => from_u64,
    u32 => from_u64,
    u64 => from_u64,
    usize => from_u64,
}

impl TryFrom<f64> for VNumber {
    type Error = ();

    fn try_from(v: f64) -> Result<Self, Self::Error> {
        Self::from_f64(v).ok_or(())
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::from(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        VNumber::from_f64(v).map_or(Value::Null, Value::Number)
    }
}

impl From<VNumber> for Value {
    fn from(n: VNumber) -> Self {
        Value::Number(n)
    }
}
