//! Typed state values with a cached content hash.
//!
//! A [`StateValue`] carries a 128-bit [`ValueHash`] derived from a canonical byte encoding of its
//! [`Value`]. The hash is a fast-path pre-check only: two values compare equal when their hashes
//! match *and* their payloads are structurally identical, so a hash collision can never make two
//! different values indistinguishable.

use core::fmt;

use sha2::{Digest, Sha256};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Domain prefix mixed into every value hash (null-terminated).
const DOMAIN_STATE_VALUE: &[u8] = b"GOAP::STATE_VALUE::V1\0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Text,
}

impl ValueKind {
    fn tag(self) -> u8 {
        match self {
            ValueKind::Bool => 0x01,
            ValueKind::Int => 0x02,
            ValueKind::Float => 0x03,
            ValueKind::Vec2 => 0x04,
            ValueKind::Vec3 => 0x05,
            ValueKind::Text => 0x06,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Vec2 => "vec2",
            ValueKind::Vec3 => "vec3",
            ValueKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// The supported state types.
///
/// With the `serde` feature the representation is untagged, so authoring files can write plain
/// `true`, `3`, `0.5`, `[1.0, 2.0]` or `"idle"`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Text(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric view of scalar values (`true` is 1, `false` is 0). Vectors and text have none.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Canonical encoding: kind tag followed by the little-endian payload. Text is length-prefixed.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16);
        out.push(self.kind().tag());
        match self {
            Value::Bool(v) => out.push(u8::from(*v)),
            Value::Int(v) => out.extend_from_slice(&v.to_le_bytes()),
            Value::Float(v) => out.extend_from_slice(&v.to_bits().to_le_bytes()),
            Value::Vec2(v) => {
                for c in v {
                    out.extend_from_slice(&c.to_bits().to_le_bytes());
                }
            }
            Value::Vec3(v) => {
                for c in v {
                    out.extend_from_slice(&c.to_bits().to_le_bytes());
                }
            }
            Value::Text(v) => {
                out.extend_from_slice(&(v.len() as u64).to_le_bytes());
                out.extend_from_slice(v.as_bytes());
            }
        }
        out
    }

    /// Structural identity. Floats compare by bit pattern, matching the canonical encoding.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Vec2(a), Value::Vec2(b)) => {
                a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (Value::Vec3(a), Value::Vec3(b)) => {
                a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Vec2([x, y]) => write!(f, "({x}, {y})"),
            Value::Vec3([x, y, z]) => write!(f, "({x}, {y}, {z})"),
            Value::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<[f32; 2]> for Value {
    fn from(value: [f32; 2]) -> Self {
        Value::Vec2(value)
    }
}

impl From<[f32; 3]> for Value {
    fn from(value: [f32; 3]) -> Self {
        Value::Vec3(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// First 128 bits of SHA-256 over the domain-separated canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueHash(pub u128);

impl ValueHash {
    pub fn of(value: &Value) -> Self {
        let digest = Sha256::new()
            .chain_update(DOMAIN_STATE_VALUE)
            .chain_update(value.canonical_bytes())
            .finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Self(u128::from_le_bytes(bytes))
    }

    /// Low 64 bits, for trace events and log fields.
    pub fn short(self) -> u64 {
        self.0 as u64
    }
}

impl fmt::Display for ValueHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// A [`Value`] plus its cached [`ValueHash`].
///
/// The value can only be changed through [`StateValue::set`], which recomputes the hash, so the
/// cached hash is never stale.
#[derive(Debug, Clone)]
pub struct StateValue {
    value: Value,
    hash: ValueHash,
}

impl StateValue {
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        let hash = ValueHash::of(&value);
        Self { value, hash }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    pub fn hash(&self) -> ValueHash {
        self.hash
    }

    pub fn set(&mut self, value: impl Into<Value>) {
        self.value = value.into();
        self.hash = ValueHash::of(&self.value);
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl PartialEq for StateValue {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.value.same_as(&other.value)
    }
}

impl Eq for StateValue {}

impl From<Value> for StateValue {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
