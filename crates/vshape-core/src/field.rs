//! # Field Descriptors
//!
//! A field descriptor is one attribute column of a shapefile's dBASE table:
//! name, type code, width and decimal precision. Template and source both
//! speak in descriptors, and the comparator works on sequences of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// dBASE attribute type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// `C`: fixed-width text.
    Character,
    /// `N`: decimal number stored as text.
    Number,
    /// `D`: date as `YYYYMMDD`.
    Date,
    /// `L`: logical (`T`/`F`/`?`).
    Logical,
    /// `F`: floating point stored as text.
    Float,
    /// `M`: memo block reference.
    Memo,
}

impl FieldType {
    /// Returns the single-letter dBASE type code.
    pub fn code(&self) -> char {
        match self {
            Self::Character => 'C',
            Self::Number => 'N',
            Self::Date => 'D',
            Self::Logical => 'L',
            Self::Float => 'F',
            Self::Memo => 'M',
        }
    }

    /// Decode a dBASE type code. Codes are case-sensitive, as written by
    /// shapefile producers.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'C' => Some(Self::Character),
            'N' => Some(Self::Number),
            'D' => Some(Self::Date),
            'L' => Some(Self::Logical),
            'F' => Some(Self::Float),
            'M' => Some(Self::Memo),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Self::from_code(c).ok_or_else(|| format!("unknown field type code '{s}'"))
            }
            _ => Err(format!("field type must be a single letter, got '{s}'")),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.code().to_string()
    }
}

/// How much of a descriptor must agree for a template field to match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareStrength {
    /// Name and type.
    NameType,
    /// Name, type and length.
    #[default]
    NameTypeLength,
    /// Name, type, length and decimal precision.
    Exact,
}

impl CompareStrength {
    /// Returns the configuration spelling of this strength.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NameType => "name_type",
            Self::NameTypeLength => "name_type_length",
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for CompareStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompareStrength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name_type" => Ok(Self::NameType),
            "name_type_length" => Ok(Self::NameTypeLength),
            "exact" => Ok(Self::Exact),
            other => Err(format!(
                "unknown comparison strength '{other}' (expected name_type, name_type_length or exact)"
            )),
        }
    }
}

/// One attribute column: `(name, type, length, decimal)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Column name as stored in the table header.
    pub name: String,
    /// dBASE type code.
    pub field_type: FieldType,
    /// Column width in bytes. Always greater than zero.
    pub length: u16,
    /// Digits after the decimal point.
    pub decimal: u8,
}

impl FieldDescriptor {
    /// Build a descriptor.
    pub fn new(name: impl Into<String>, field_type: FieldType, length: u16, decimal: u8) -> Self {
        Self {
            name: name.into(),
            field_type,
            length,
            decimal,
        }
    }

    /// True iff name and type agree.
    pub fn matches_name_type(&self, other: &Self) -> bool {
        self.name == other.name && self.field_type == other.field_type
    }

    /// True iff name, type and length agree.
    pub fn matches_name_type_length(&self, other: &Self) -> bool {
        self.matches_name_type(other) && self.length == other.length
    }

    /// True iff the descriptors agree under `strength`.
    pub fn matches(&self, other: &Self, strength: CompareStrength) -> bool {
        match strength {
            CompareStrength::NameType => self.matches_name_type(other),
            CompareStrength::NameTypeLength => self.matches_name_type_length(other),
            CompareStrength::Exact => self == other,
        }
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "['{}', '{}', {}, {}]",
            self.name, self.field_type, self.length, self.decimal
        )
    }
}
