//! A single cell of a [`Sample`](crate::Sample).
use serde::{Serialize, Deserialize};

use std::fmt;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};


/// A feature value or a class label.
///
/// `Value` has total equality, hashing and ordering so that it can be
/// used as a branch key and as a class label.
/// Floats are compared by their bit pattern (`-0.0` is normalized to `0.0`)
/// and ordered with `f64::total_cmp`.
/// Across variants, the order is `Bool < Int < Float < Str < Missing`.
///
/// `Missing` only appears in prediction input.
/// Training rejects missing cells, so no branch or label is ever `Missing`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Int(i64),
    /// A floating point value.
    Float(f64),
    /// A string value.
    Str(String),
    /// A null cell.
    Missing,
}


impl Value {
    #[inline]
    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_)  => 0,
            Self::Int(_)   => 1,
            Self::Float(_) => 2,
            Self::Str(_)   => 3,
            Self::Missing  => 4,
        }
    }


    /// Returns `true` for a null cell.
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }


    /// Returns the numeric view of this value, if any.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(x)   => Some(*x as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }
}


#[inline(always)]
fn float_bits(x: f64) -> u64 {
    if x == 0.0 { 0f64.to_bits() } else { x.to_bits() }
}


impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a),  Self::Bool(b))  => a == b,
            (Self::Int(a),   Self::Int(b))   => a == b,
            (Self::Float(a), Self::Float(b)) => float_bits(*a) == float_bits(*b),
            (Self::Str(a),   Self::Str(b))   => a == b,
            (Self::Missing,  Self::Missing)  => true,
            _ => false,
        }
    }
}


impl Eq for Value {}


impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Bool(x)  => x.hash(state),
            Self::Int(x)   => x.hash(state),
            Self::Float(x) => float_bits(*x).hash(state),
            Self::Str(x)   => x.hash(state),
            Self::Missing  => {},
        }
    }
}


impl PartialOrd for Value {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}


impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a),  Self::Bool(b))  => a.cmp(b),
            (Self::Int(a),   Self::Int(b))   => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => {
                let a = if *a == 0.0 { 0.0 } else { *a };
                let b = if *b == 0.0 { 0.0 } else { *b };
                a.total_cmp(&b)
            },
            (Self::Str(a),   Self::Str(b))   => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}


impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(x)  => write!(f, "{x}"),
            Self::Int(x)   => write!(f, "{x}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(x)   => write!(f, "{x}"),
            Self::Missing  => write!(f, "null"),
        }
    }
}


impl From<bool> for Value {
    #[inline]
    fn from(x: bool) -> Self { Self::Bool(x) }
}


impl From<i64> for Value {
    #[inline]
    fn from(x: i64) -> Self { Self::Int(x) }
}


impl From<i32> for Value {
    #[inline]
    fn from(x: i32) -> Self { Self::Int(x as i64) }
}


impl From<f64> for Value {
    #[inline]
    fn from(x: f64) -> Self { Self::Float(x) }
}


impl From<&str> for Value {
    #[inline]
    fn from(x: &str) -> Self { Self::Str(x.to_string()) }
}


impl From<String> for Value {
    #[inline]
    fn from(x: String) -> Self { Self::Str(x) }
}
