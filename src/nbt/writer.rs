//! Minimal NBT writer used to build decoder test fixtures.

use super::{NbtFlavor, NbtValue};
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

pub(crate) fn write_root(name: &str, value: &NbtValue, flavor: NbtFlavor) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(tag_id(value));
    write_string(&mut out, name, flavor);
    write_payload(&mut out, value, flavor);
    out
}

fn tag_id(value: &NbtValue) -> u8 {
    match value {
        NbtValue::Byte(_) => 1,
        NbtValue::Short(_) => 2,
        NbtValue::Int(_) => 3,
        NbtValue::Long(_) => 4,
        NbtValue::Float(_) => 5,
        NbtValue::Double(_) => 6,
        NbtValue::ByteArray(_) => 7,
        NbtValue::String(_) => 8,
        NbtValue::List(_) => 9,
        NbtValue::Compound(_) => 10,
        NbtValue::IntArray(_) => 11,
        NbtValue::LongArray(_) => 12,
    }
}

fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

fn write_i32(out: &mut Vec<u8>, v: i32, flavor: NbtFlavor) {
    match flavor {
        NbtFlavor::BigEndian => out.write_i32::<BigEndian>(v).unwrap(),
        NbtFlavor::LittleEndian => out.write_i32::<LittleEndian>(v).unwrap(),
        NbtFlavor::LittleVarint => write_varint(out, ((v << 1) ^ (v >> 31)) as u32 as u64),
    }
}

fn write_i64(out: &mut Vec<u8>, v: i64, flavor: NbtFlavor) {
    match flavor {
        NbtFlavor::BigEndian => out.write_i64::<BigEndian>(v).unwrap(),
        NbtFlavor::LittleEndian => out.write_i64::<LittleEndian>(v).unwrap(),
        NbtFlavor::LittleVarint => write_varint(out, ((v << 1) ^ (v >> 63)) as u64),
    }
}

fn write_string(out: &mut Vec<u8>, s: &str, flavor: NbtFlavor) {
    match flavor {
        NbtFlavor::BigEndian => out.write_u16::<BigEndian>(s.len() as u16).unwrap(),
        NbtFlavor::LittleEndian => out.write_u16::<LittleEndian>(s.len() as u16).unwrap(),
        NbtFlavor::LittleVarint => write_varint(out, s.len() as u64),
    }
    out.extend_from_slice(s.as_bytes());
}

fn write_payload(out: &mut Vec<u8>, value: &NbtValue, flavor: NbtFlavor) {
    let big = flavor == NbtFlavor::BigEndian;
    match value {
        NbtValue::Byte(v) => out.push(*v as u8),
        NbtValue::Short(v) => {
            if big {
                out.write_i16::<BigEndian>(*v).unwrap()
            } else {
                out.write_i16::<LittleEndian>(*v).unwrap()
            }
        }
        NbtValue::Int(v) => write_i32(out, *v, flavor),
        NbtValue::Long(v) => write_i64(out, *v, flavor),
        NbtValue::Float(v) => {
            if big {
                out.write_f32::<BigEndian>(*v).unwrap()
            } else {
                out.write_f32::<LittleEndian>(*v).unwrap()
            }
        }
        NbtValue::Double(v) => {
            if big {
                out.write_f64::<BigEndian>(*v).unwrap()
            } else {
                out.write_f64::<LittleEndian>(*v).unwrap()
            }
        }
        NbtValue::ByteArray(bytes) => {
            write_i32(out, bytes.len() as i32, flavor);
            out.extend(bytes.iter().map(|b| *b as u8));
        }
        NbtValue::String(s) => write_string(out, s, flavor),
        NbtValue::List(items) => {
            out.push(items.first().map(tag_id).unwrap_or(0));
            write_i32(out, items.len() as i32, flavor);
            for item in items {
                write_payload(out, item, flavor);
            }
        }
        NbtValue::Compound(map) => {
            for (name, child) in map {
                out.push(tag_id(child));
                write_string(out, name, flavor);
                write_payload(out, child, flavor);
            }
            out.push(0);
        }
        NbtValue::IntArray(ints) => {
            write_i32(out, ints.len() as i32, flavor);
            for v in ints {
                write_i32(out, *v, flavor);
            }
        }
        NbtValue::LongArray(longs) => {
            write_i32(out, longs.len() as i32, flavor);
            for v in longs {
                write_i64(out, *v, flavor);
            }
        }
    }
}

/// Shorthand for building compound fixtures.
pub(crate) fn compound<const N: usize>(entries: [(&str, NbtValue); N]) -> NbtValue {
    NbtValue::Compound(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}
