//! The in-memory NBT tree.

/// Tag type ids as they appear on the wire.
pub mod id {
    pub const END: u8 = 0;
    pub const BYTE: u8 = 1;
    pub const SHORT: u8 = 2;
    pub const INT: u8 = 3;
    pub const LONG: u8 = 4;
    pub const FLOAT: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const BYTE_ARRAY: u8 = 7;
    pub const STRING: u8 = 8;
    pub const LIST: u8 = 9;
    pub const COMPOUND: u8 = 10;
    pub const INT_ARRAY: u8 = 11;
    pub const LONG_ARRAY: u8 = 12;
}

/// A single NBT value.
///
/// Compounds keep their entries in the order they were read; litematic
/// region order is significant to callers.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<TagValue>),
    Compound(Vec<(String, TagValue)>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl TagValue {
    pub fn type_id(&self) -> u8 {
        match self {
            TagValue::End => id::END,
            TagValue::Byte(_) => id::BYTE,
            TagValue::Short(_) => id::SHORT,
            TagValue::Int(_) => id::INT,
            TagValue::Long(_) => id::LONG,
            TagValue::Float(_) => id::FLOAT,
            TagValue::Double(_) => id::DOUBLE,
            TagValue::ByteArray(_) => id::BYTE_ARRAY,
            TagValue::String(_) => id::STRING,
            TagValue::List(_) => id::LIST,
            TagValue::Compound(_) => id::COMPOUND,
            TagValue::IntArray(_) => id::INT_ARRAY,
            TagValue::LongArray(_) => id::LONG_ARRAY,
        }
    }

    /// Human-readable tag type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            TagValue::End => "End",
            TagValue::Byte(_) => "Byte",
            TagValue::Short(_) => "Short",
            TagValue::Int(_) => "Int",
            TagValue::Long(_) => "Long",
            TagValue::Float(_) => "Float",
            TagValue::Double(_) => "Double",
            TagValue::ByteArray(_) => "ByteArray",
            TagValue::String(_) => "String",
            TagValue::List(_) => "List",
            TagValue::Compound(_) => "Compound",
            TagValue::IntArray(_) => "IntArray",
            TagValue::LongArray(_) => "LongArray",
        }
    }

    /// An empty compound.
    pub fn compound() -> Self {
        TagValue::Compound(Vec::new())
    }

    /// Insert or replace a compound entry. No-op on other tag types.
    pub fn insert(&mut self, key: impl Into<String>, value: TagValue) {
        if let TagValue::Compound(entries) = self {
            let key = key.into();
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: TagValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a compound entry by key.
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.as_compound()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn as_compound(&self) -> Option<&[(String, TagValue)]> {
        match self {
            TagValue::Compound(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn into_compound(self) -> Option<Vec<(String, TagValue)>> {
        match self {
            TagValue::Compound(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TagValue]> {
        match self {
            TagValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> Option<i8> {
        match self {
            TagValue::Byte(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<i16> {
        match self {
            TagValue::Short(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            TagValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            TagValue::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            TagValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            TagValue::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            TagValue::LongArray(v) => Some(v),
            _ => None,
        }
    }

    /// Any integral tag widened to i64.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            TagValue::Byte(n) => Some(*n as i64),
            TagValue::Short(n) => Some(*n as i64),
            TagValue::Int(n) => Some(*n as i64),
            TagValue::Long(n) => Some(*n),
            _ => None,
        }
    }
}
