//! Typed values produced by argument conversion.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A converted argument value.
///
/// Conversion produces one of a closed set of variants; the dispatcher stores
/// the canonical `Display` form in the invocation's named-argument map, so
/// every variant's rendering must round-trip through its own `ArgType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    /// 32-bit integer
    Int(i32),

    /// 64-bit integer
    Long(i64),

    /// Floating point number
    Float(f64),

    /// Boolean
    Bool(bool),

    /// Opaque string, e.g. a resolved domain entity
    Str(String),

    /// Words collected by a variadic final argument
    Words(Vec<String>),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Int(v) => write!(f, "{}", v),
            ArgValue::Long(v) => write!(f, "{}", v),
            ArgValue::Float(v) => write!(f, "{}", v),
            ArgValue::Bool(v) => write!(f, "{}", v),
            ArgValue::Str(v) => write!(f, "{}", v),
            ArgValue::Words(words) => write!(f, "{}", words.join(" ")),
        }
    }
}
