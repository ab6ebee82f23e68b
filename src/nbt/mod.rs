//! Tagged NBT value trees.
//!
//! Every decoder reads structure files into an [`NbtValue`] tree and then
//! walks it with the accessors here. Java Edition streams are parsed with
//! `quartz_nbt`; the two Bedrock layouts go through the reader in this module.
//! Compounds keep the key order of the file. Numeric accessors accept any integer
//! tag width and transparently unwrap boxed `{value: ...}` compounds, so
//! decoders never care how a particular writer encoded a number.

mod reader;
#[cfg(test)]
pub(crate) mod writer;

pub use reader::read_root;

use crate::error::{Result, StructureError};
use indexmap::IndexMap;

/// Byte layout of an NBT stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NbtFlavor {
    /// Java Edition files.
    BigEndian,
    /// Bedrock Edition files on disk.
    LittleEndian,
    /// Bedrock network encoding: zigzag varints for ints, longs and lengths.
    LittleVarint,
}

/// Compound entries in file order.
pub type NbtCompound = IndexMap<String, NbtValue>;

/// A single NBT tag payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<NbtValue>),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl NbtValue {
    /// Unwrap a boxed `{value: ...}` (optionally `{type, value}`) compound.
    pub fn unboxed(&self) -> &NbtValue {
        match self {
            NbtValue::Compound(map)
                if map.contains_key("value")
                    && map.keys().all(|k| k == "value" || k == "type") =>
            {
                map.get("value").map(|v| v.unboxed()).unwrap_or(self)
            }
            other => other,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.unboxed() {
            NbtValue::Byte(v) => Some(*v as i64),
            NbtValue::Short(v) => Some(*v as i64),
            NbtValue::Int(v) => Some(*v as i64),
            NbtValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.unboxed() {
            NbtValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&NbtCompound> {
        match self {
            NbtValue::Compound(map) => match self.unboxed() {
                NbtValue::Compound(inner) => Some(inner),
                _ => Some(map),
            },
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[NbtValue]> {
        match self.unboxed() {
            NbtValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Bytes of a byte array, or of a list of small integers.
    pub fn to_byte_vec(&self) -> Option<Vec<u8>> {
        match self.unboxed() {
            NbtValue::ByteArray(bytes) => Some(bytes.iter().map(|b| *b as u8).collect()),
            NbtValue::List(items) => items.iter().map(|v| v.as_i64().map(|n| n as u8)).collect(),
            _ => None,
        }
    }

    /// Integers of an int array, or of a list of integer tags.
    pub fn to_i32_vec(&self) -> Option<Vec<i32>> {
        match self.unboxed() {
            NbtValue::IntArray(ints) => Some(ints.clone()),
            NbtValue::List(items) => items.iter().map(|v| v.as_i64().map(|n| n as i32)).collect(),
            _ => None,
        }
    }

    /// Words of a long array, or of a list of long tags.
    pub fn to_i64_vec(&self) -> Option<Vec<i64>> {
        match self.unboxed() {
            NbtValue::LongArray(longs) => Some(longs.clone()),
            NbtValue::List(items) => items.iter().map(|v| v.as_i64()).collect(),
            _ => None,
        }
    }

    /// Render a scalar as a block property value.
    pub fn to_property_string(&self) -> Option<String> {
        match self.unboxed() {
            NbtValue::Byte(0) => Some("false".to_string()),
            NbtValue::Byte(1) => Some("true".to_string()),
            NbtValue::Byte(v) => Some(v.to_string()),
            NbtValue::Short(v) => Some(v.to_string()),
            NbtValue::Int(v) => Some(v.to_string()),
            NbtValue::Long(v) => Some(v.to_string()),
            NbtValue::Float(v) => Some(v.to_string()),
            NbtValue::Double(v) => Some(v.to_string()),
            NbtValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            NbtValue::Byte(_) => "byte",
            NbtValue::Short(_) => "short",
            NbtValue::Int(_) => "int",
            NbtValue::Long(_) => "long",
            NbtValue::Float(_) => "float",
            NbtValue::Double(_) => "double",
            NbtValue::ByteArray(_) => "byte_array",
            NbtValue::String(_) => "string",
            NbtValue::List(_) => "list",
            NbtValue::Compound(_) => "compound",
            NbtValue::IntArray(_) => "int_array",
            NbtValue::LongArray(_) => "long_array",
        }
    }
}

/// Required-field lookups that name the missing field in their error.
pub trait CompoundExt {
    fn field(&self, key: &str) -> Result<&NbtValue>;
    fn compound(&self, key: &str) -> Result<&NbtCompound>;
    fn int(&self, key: &str) -> Result<i64>;
    fn string(&self, key: &str) -> Result<&str>;
    fn list(&self, key: &str) -> Result<&[NbtValue]>;
}

fn wrong_type(key: &str, expected: &str, found: &NbtValue) -> StructureError {
    StructureError::Parse(format!(
        "field '{}' should be {}, found {}",
        key,
        expected,
        found.unboxed().type_name()
    ))
}

impl CompoundExt for NbtCompound {
    fn field(&self, key: &str) -> Result<&NbtValue> {
        self.get(key).ok_or_else(|| StructureError::missing_field(key))
    }

    fn compound(&self, key: &str) -> Result<&NbtCompound> {
        let value = self.field(key)?;
        value
            .as_compound()
            .ok_or_else(|| wrong_type(key, "a compound", value))
    }

    fn int(&self, key: &str) -> Result<i64> {
        let value = self.field(key)?;
        value.as_i64().ok_or_else(|| wrong_type(key, "an integer", value))
    }

    fn string(&self, key: &str) -> Result<&str> {
        let value = self.field(key)?;
        value.as_str().ok_or_else(|| wrong_type(key, "a string", value))
    }

    fn list(&self, key: &str) -> Result<&[NbtValue]> {
        let value = self.field(key)?;
        value.as_list().ok_or_else(|| wrong_type(key, "a list", value))
    }
}
