//! NBT readers.
//!
//! Java Edition streams (big-endian, compound root) are handed to
//! `quartz_nbt` and converted into [`NbtValue`] trees. Bedrock streams use
//! little-endian numbers, optionally with zigzag varints, which that crate
//! does not read; [`NbtReader`] covers them.

use super::{NbtCompound, NbtFlavor, NbtValue};
use crate::error::{Result, StructureError};
use byteorder::{LittleEndian, ReadBytesExt};
use quartz_nbt::io::Flavor;
use quartz_nbt::NbtTag;
use std::io::{Cursor, Read};

const TAG_END: u8 = 0;
const TAG_BYTE: u8 = 1;
const TAG_SHORT: u8 = 2;
const TAG_INT: u8 = 3;
const TAG_LONG: u8 = 4;
const TAG_FLOAT: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_BYTE_ARRAY: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_LIST: u8 = 9;
const TAG_COMPOUND: u8 = 10;
const TAG_INT_ARRAY: u8 = 11;
const TAG_LONG_ARRAY: u8 = 12;

const MAX_DEPTH: usize = 512;

/// Read the root tag of an NBT stream, returning its name and payload.
pub fn read_root(data: &[u8], flavor: NbtFlavor) -> Result<(String, NbtValue)> {
    if data.is_empty() {
        return Err(StructureError::Parse("empty NBT buffer".to_string()));
    }
    if flavor == NbtFlavor::BigEndian {
        return read_java(data);
    }

    let mut reader = NbtReader {
        cursor: Cursor::new(data),
        flavor,
    };
    let tag = reader.u8()?;
    if tag == TAG_END {
        return Err(StructureError::Parse("NBT root tag is TAG_End".to_string()));
    }
    let name = reader.string()?;
    let value = reader.payload(tag, 0)?;
    Ok((name, value))
}

fn read_java(data: &[u8]) -> Result<(String, NbtValue)> {
    let mut cursor = Cursor::new(data);
    let (root, name) = quartz_nbt::io::read_nbt(&mut cursor, Flavor::Uncompressed)
        .map_err(|e| StructureError::Parse(format!("invalid NBT data: {}", e)))?;
    Ok((name, convert_compound(&root)))
}

fn convert_compound(compound: &quartz_nbt::NbtCompound) -> NbtValue {
    let map: NbtCompound = compound
        .inner()
        .iter()
        .map(|(key, tag)| (key.clone(), convert_tag(tag)))
        .collect();
    NbtValue::Compound(map)
}

fn convert_tag(tag: &NbtTag) -> NbtValue {
    match tag {
        NbtTag::Byte(v) => NbtValue::Byte(*v),
        NbtTag::Short(v) => NbtValue::Short(*v),
        NbtTag::Int(v) => NbtValue::Int(*v),
        NbtTag::Long(v) => NbtValue::Long(*v),
        NbtTag::Float(v) => NbtValue::Float(*v),
        NbtTag::Double(v) => NbtValue::Double(*v),
        NbtTag::ByteArray(bytes) => NbtValue::ByteArray(bytes.clone()),
        NbtTag::String(s) => NbtValue::String(s.clone()),
        NbtTag::List(list) => NbtValue::List(list.iter().map(convert_tag).collect()),
        NbtTag::Compound(compound) => convert_compound(compound),
        NbtTag::IntArray(ints) => NbtValue::IntArray(ints.clone()),
        NbtTag::LongArray(longs) => NbtValue::LongArray(longs.clone()),
    }
}

/// Bedrock NBT reader.
struct NbtReader<'a> {
    cursor: Cursor<&'a [u8]>,
    flavor: NbtFlavor,
}

fn eof(err: std::io::Error) -> StructureError {
    StructureError::Parse(format!("truncated NBT data: {}", err))
}

impl<'a> NbtReader<'a> {
    fn u8(&mut self) -> Result<u8> {
        self.cursor.read_u8().map_err(eof)
    }

    fn i8(&mut self) -> Result<i8> {
        self.cursor.read_i8().map_err(eof)
    }

    fn i16(&mut self) -> Result<i16> {
        self.cursor.read_i16::<LittleEndian>().map_err(eof)
    }

    fn i32(&mut self) -> Result<i32> {
        match self.flavor {
            NbtFlavor::LittleVarint => {
                let raw = self.varint(5)? as u32;
                Ok(((raw >> 1) as i32) ^ -((raw & 1) as i32))
            }
            _ => self.cursor.read_i32::<LittleEndian>().map_err(eof),
        }
    }

    fn i64(&mut self) -> Result<i64> {
        match self.flavor {
            NbtFlavor::LittleVarint => {
                let raw = self.varint(10)?;
                Ok(((raw >> 1) as i64) ^ -((raw & 1) as i64))
            }
            _ => self.cursor.read_i64::<LittleEndian>().map_err(eof),
        }
    }

    fn f32(&mut self) -> Result<f32> {
        self.cursor.read_f32::<LittleEndian>().map_err(eof)
    }

    fn f64(&mut self) -> Result<f64> {
        self.cursor.read_f64::<LittleEndian>().map_err(eof)
    }

    /// Unsigned little-endian base-128 varint.
    fn varint(&mut self, max_bytes: usize) -> Result<u64> {
        let mut result = 0u64;
        for i in 0..max_bytes {
            let byte = self.u8()?;
            result |= ((byte & 0x7f) as u64) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(StructureError::Parse("varint too long in NBT data".to_string()))
    }

    fn length(&mut self) -> Result<usize> {
        let len = self.i32()?;
        if len < 0 {
            return Err(StructureError::Parse(format!("negative NBT length {}", len)));
        }
        let len = len as usize;
        let remaining = self.cursor.get_ref().len() - self.cursor.position() as usize;
        // Every element takes at least one byte, so longer lengths are corrupt.
        if len > remaining {
            return Err(StructureError::Parse(format!(
                "NBT length {} exceeds remaining {} bytes",
                len, remaining
            )));
        }
        Ok(len)
    }

    fn string(&mut self) -> Result<String> {
        let len = match self.flavor {
            NbtFlavor::LittleVarint => self.varint(5)? as usize,
            _ => self.cursor.read_u16::<LittleEndian>().map_err(eof)? as usize,
        };
        let mut buf = vec![0u8; len];
        self.cursor.read_exact(&mut buf).map_err(eof)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn payload(&mut self, tag: u8, depth: usize) -> Result<NbtValue> {
        if depth > MAX_DEPTH {
            return Err(StructureError::Parse("NBT nesting too deep".to_string()));
        }
        Ok(match tag {
            TAG_BYTE => NbtValue::Byte(self.i8()?),
            TAG_SHORT => NbtValue::Short(self.i16()?),
            TAG_INT => NbtValue::Int(self.i32()?),
            TAG_LONG => NbtValue::Long(self.i64()?),
            TAG_FLOAT => NbtValue::Float(self.f32()?),
            TAG_DOUBLE => NbtValue::Double(self.f64()?),
            TAG_BYTE_ARRAY => {
                let len = self.length()?;
                let mut buf = vec![0u8; len];
                self.cursor.read_exact(&mut buf).map_err(eof)?;
                NbtValue::ByteArray(buf.into_iter().map(|b| b as i8).collect())
            }
            TAG_STRING => NbtValue::String(self.string()?),
            TAG_LIST => {
                let item_tag = self.u8()?;
                let len = self.length()?;
                if item_tag == TAG_END && len > 0 {
                    return Err(StructureError::Parse(
                        "non-empty NBT list of TAG_End".to_string(),
                    ));
                }
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.payload(item_tag, depth + 1)?);
                }
                NbtValue::List(items)
            }
            TAG_COMPOUND => {
                let mut map = NbtCompound::new();
                loop {
                    let child = self.u8()?;
                    if child == TAG_END {
                        break;
                    }
                    let name = self.string()?;
                    let value = self.payload(child, depth + 1)?;
                    map.insert(name, value);
                }
                NbtValue::Compound(map)
            }
            TAG_INT_ARRAY => {
                let len = self.length()?;
                let mut ints = Vec::with_capacity(len);
                for _ in 0..len {
                    ints.push(self.i32()?);
                }
                NbtValue::IntArray(ints)
            }
            TAG_LONG_ARRAY => {
                let len = self.length()?;
                let mut longs = Vec::with_capacity(len);
                for _ in 0..len {
                    longs.push(self.i64()?);
                }
                NbtValue::LongArray(longs)
            }
            other => {
                return Err(StructureError::Parse(format!("unknown NBT tag id {}", other)));
            }
        })
    }
}
