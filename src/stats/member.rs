//! Named, optional stats members.
//!
//! Record structs store members as plain `Option<T>` fields. This module
//! provides the uniform view used for reflection and serialization: an ordered
//! list of `(name, Option<MemberValue>)` pairs per record.

use std::fmt;

use serde::{Serialize, Serializer};

/// A defined member value.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberValue {
    Bool(bool),
    Int32(i32),
    Uint32(u32),
    Uint64(u64),
    Double(f64),
    String(String),
}

impl From<bool> for MemberValue {
    fn from(v: bool) -> Self {
        MemberValue::Bool(v)
    }
}

impl From<i32> for MemberValue {
    fn from(v: i32) -> Self {
        MemberValue::Int32(v)
    }
}

impl From<u32> for MemberValue {
    fn from(v: u32) -> Self {
        MemberValue::Uint32(v)
    }
}

impl From<u64> for MemberValue {
    fn from(v: u64) -> Self {
        MemberValue::Uint64(v)
    }
}

impl From<f64> for MemberValue {
    fn from(v: f64) -> Self {
        MemberValue::Double(v)
    }
}

impl From<String> for MemberValue {
    fn from(v: String) -> Self {
        MemberValue::String(v)
    }
}

impl fmt::Display for MemberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberValue::Bool(v) => write!(f, "{}", v),
            MemberValue::Int32(v) => write!(f, "{}", v),
            MemberValue::Uint32(v) => write!(f, "{}", v),
            MemberValue::Uint64(v) => write!(f, "{}", v),
            MemberValue::Double(v) => write!(f, "{}", v),
            MemberValue::String(v) => write!(f, "\"{}\"", v),
        }
    }
}

impl Serialize for MemberValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MemberValue::Bool(v) => serializer.serialize_bool(*v),
            MemberValue::Int32(v) => serializer.serialize_i32(*v),
            MemberValue::Uint32(v) => serializer.serialize_u32(*v),
            MemberValue::Uint64(v) => serializer.serialize_u64(*v),
            MemberValue::Double(v) => serializer.serialize_f64(*v),
            MemberValue::String(v) => serializer.serialize_str(v),
        }
    }
}

/// One named member of a record, defined or not.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsMember {
    pub name: &'static str,
    pub value: Option<MemberValue>,
}

impl StatsMember {
    pub fn new<T>(name: &'static str, value: &Option<T>) -> Self
    where
        T: Clone + Into<MemberValue>,
    {
        Self {
            name,
            value: value.clone().map(Into::into),
        }
    }

    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }
}
