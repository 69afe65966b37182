//! # dBASE Attribute Table
//!
//! Reads the `.dbf` member of a shapefile triad: the fixed 32-byte header,
//! the field descriptor array up to the `0x0D` terminator, and fixed-width
//! records each led by a one-byte deletion flag.
//!
//! Cells are decoded as text (Latin-1, so every byte maps to a character)
//! and trimmed. An unknown logical (`?` in an `L` column) is stored as an
//! empty cell; `?` in any other column is ordinary text. The deletion flag is not a field; it is surfaced through
//! [`Record::is_deleted`].

use vshape_core::{FieldDescriptor, FieldType, Record};

const HEADER_LEN: usize = 32;
const DESCRIPTOR_LEN: usize = 32;
const TERMINATOR: u8 = 0x0D;
const NAME_LEN: usize = 11;
const DELETED: u8 = b'*';
const UNKNOWN_LOGICAL: &str = "?";

/// Failure decoding a dBASE table.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DbfError {
    #[error("table truncated: expected at least {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("field descriptor array has no terminator")]
    MissingTerminator,

    #[error("field '{name}' has unsupported type code '{code}'")]
    UnsupportedType { name: String, code: char },

    #[error("field '{name}' has zero length")]
    ZeroLength { name: String },

    #[error("header length {declared} ends before the field descriptors at {required}")]
    HeaderLengthMismatch { declared: usize, required: usize },

    #[error("record length {declared} does not match field widths {computed}")]
    RecordLengthMismatch { declared: usize, computed: usize },
}

/// A decoded attribute table.
#[derive(Debug, Clone)]
pub struct DbfTable {
    pub fields: Vec<FieldDescriptor>,
    pub records: Vec<Record>,
}

impl DbfTable {
    /// Decode a complete `.dbf` file image.
    pub fn parse(bytes: &[u8]) -> Result<Self, DbfError> {
        ensure_len(bytes, HEADER_LEN)?;

        let record_count = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        let record_len = u16::from_le_bytes([bytes[10], bytes[11]]) as usize;

        let (fields, terminator) = parse_descriptors(bytes)?;
        if header_len < terminator + 1 {
            return Err(DbfError::HeaderLengthMismatch {
                declared: header_len,
                required: terminator + 1,
            });
        }

        let computed = 1 + fields.iter().map(|f| f.length as usize).sum::<usize>();
        if computed != record_len {
            return Err(DbfError::RecordLengthMismatch {
                declared: record_len,
                computed,
            });
        }

        ensure_len(bytes, header_len + record_count * record_len)?;

        let records = (0..record_count)
            .map(|i| {
                let start = header_len + i * record_len;
                decode_record(&bytes[start..start + record_len], &fields)
            })
            .collect();

        Ok(Self { fields, records })
    }
}

fn ensure_len(bytes: &[u8], expected: usize) -> Result<(), DbfError> {
    if bytes.len() < expected {
        Err(DbfError::Truncated {
            expected,
            found: bytes.len(),
        })
    } else {
        Ok(())
    }
}

/// Field descriptors and the offset of their terminator byte.
fn parse_descriptors(bytes: &[u8]) -> Result<(Vec<FieldDescriptor>, usize), DbfError> {
    let mut fields = Vec::new();
    let mut offset = HEADER_LEN;

    loop {
        match bytes.get(offset) {
            None => return Err(DbfError::MissingTerminator),
            Some(&TERMINATOR) => break,
            Some(_) => {}
        }
        ensure_len(bytes, offset + DESCRIPTOR_LEN)?;
        let raw = &bytes[offset..offset + DESCRIPTOR_LEN];

        let name = decode_name(&raw[..NAME_LEN]);
        let code = raw[11] as char;
        let field_type = FieldType::from_code(code).ok_or_else(|| DbfError::UnsupportedType {
            name: name.clone(),
            code,
        })?;
        let length = raw[16] as u16;
        let decimal = raw[17];
        if length == 0 {
            return Err(DbfError::ZeroLength { name });
        }

        fields.push(FieldDescriptor::new(name, field_type, length, decimal));
        offset += DESCRIPTOR_LEN;
    }

    Ok((fields, offset))
}

fn decode_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    latin1(&raw[..end]).trim().to_string()
}

fn decode_record(raw: &[u8], fields: &[FieldDescriptor]) -> Record {
    let mut offset = 1;
    let values: Vec<String> = fields
        .iter()
        .map(|f| {
            let width = f.length as usize;
            let cell = latin1(&raw[offset..offset + width]);
            offset += width;
            let cell = cell.trim_matches(|c: char| c == ' ' || c == '\0');
            if f.field_type == FieldType::Logical && cell == UNKNOWN_LOGICAL {
                String::new()
            } else {
                cell.to_string()
            }
        })
        .collect();

    let record = Record::new(values);
    if raw[0] == DELETED {
        record.into_deleted()
    } else {
        record
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode a minimal dBASE III table.
    fn encode(fields: &[(&str, char, u8, u8)], rows: &[(Vec<&str>, bool)]) -> Vec<u8> {
        let header_len = HEADER_LEN + DESCRIPTOR_LEN * fields.len() + 1;
        let record_len = 1 + fields.iter().map(|f| f.2 as usize).sum::<usize>();

        let mut out = vec![0u8; HEADER_LEN];
        out[0] = 0x03;
        out[4..8].copy_from_slice(&(rows.len() as u32).to_le_bytes());
        out[8..10].copy_from_slice(&(header_len as u16).to_le_bytes());
        out[10..12].copy_from_slice(&(record_len as u16).to_le_bytes());

        for (name, code, len, dec) in fields {
            let mut d = [0u8; DESCRIPTOR_LEN];
            d[..name.len()].copy_from_slice(name.as_bytes());
            d[11] = *code as u8;
            d[16] = *len;
            d[17] = *dec;
            out.extend_from_slice(&d);
        }
        out.push(TERMINATOR);

        for (cells, deleted) in rows {
            out.push(if *deleted { DELETED } else { b' ' });
            for ((_, _, len, _), cell) in fields.iter().zip(cells.iter()) {
                let mut padded = cell.as_bytes().to_vec();
                padded.resize(*len as usize, b' ');
                out.extend_from_slice(&padded);
            }
        }
        out.push(0x1A);
        out
    }

    #[test]
    fn parses_descriptors_and_records() {
        let bytes = encode(
            &[("NAME", 'C', 10, 0), ("AREA", 'N', 12, 3)],
            &[(vec!["river", "10.500"], false), (vec!["", "3.000"], true)],
        );
        let table = DbfTable::parse(&bytes).unwrap();

        assert_eq!(
            table.fields,
            vec![
                FieldDescriptor::new("NAME", FieldType::Character, 10, 0),
                FieldDescriptor::new("AREA", FieldType::Number, 12, 3),
            ]
        );
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].get(0), Some("river"));
        assert_eq!(table.records[0].get(1), Some("10.500"));
        assert!(!table.records[0].is_deleted());
        assert!(!table.records[1].has_value(0));
        assert!(table.records[1].is_deleted());
    }

    #[test]
    fn no_fields_no_records() {
        let bytes = encode(&[], &[]);
        let table = DbfTable::parse(&bytes).unwrap();
        assert!(table.fields.is_empty());
        assert!(table.records.is_empty());
    }

    #[test]
    fn truncated_records_are_rejected() {
        let mut bytes = encode(&[("NAME", 'C', 10, 0)], &[(vec!["a"], false), (vec!["b"], false)]);
        bytes.truncate(bytes.len() - 8);
        assert!(matches!(
            DbfTable::parse(&bytes),
            Err(DbfError::Truncated { .. })
        ));
    }

    #[test]
    fn truncated_header_is_rejected() {
        assert!(matches!(
            DbfTable::parse(&[0x03, 0, 0]),
            Err(DbfError::Truncated { expected: 32, found: 3 })
        ));
    }

    #[test]
    fn missing_terminator_is_rejected() {
        let mut bytes = encode(&[("NAME", 'C', 10, 0)], &[]);
        bytes.truncate(HEADER_LEN + DESCRIPTOR_LEN);
        assert_eq!(DbfTable::parse(&bytes).unwrap_err(), DbfError::MissingTerminator);
    }

    #[test]
    fn unsupported_type_is_rejected() {
        let bytes = encode(&[("BLOB", 'B', 10, 0)], &[]);
        assert!(matches!(
            DbfTable::parse(&bytes),
            Err(DbfError::UnsupportedType { code: 'B', .. })
        ));
    }

    #[test]
    fn record_length_must_match_fields() {
        let mut bytes = encode(&[("NAME", 'C', 10, 0)], &[]);
        bytes[10..12].copy_from_slice(&20u16.to_le_bytes());
        assert!(matches!(
            DbfTable::parse(&bytes),
            Err(DbfError::RecordLengthMismatch { declared: 20, computed: 11 })
        ));
    }

    #[test]
    fn header_length_inside_descriptors_is_rejected() {
        let mut bytes = encode(&[("NAME", 'C', 4, 0)], &[(vec!["abcd"], false)]);
        bytes[8..10].copy_from_slice(&40u16.to_le_bytes());
        assert_eq!(
            DbfTable::parse(&bytes).unwrap_err(),
            DbfError::HeaderLengthMismatch {
                declared: 40,
                required: 65
            }
        );
    }

    #[test]
    fn unknown_logical_is_null_but_text_question_mark_is_not() {
        let bytes = encode(
            &[("NOTE", 'C', 4, 0), ("FLAG", 'L', 1, 0)],
            &[(vec!["?", "?"], false), (vec!["ok", "T"], false)],
        );
        let table = DbfTable::parse(&bytes).unwrap();
        assert_eq!(table.records[0].get(0), Some("?"));
        assert!(table.records[0].has_value(0));
        assert!(!table.records[0].has_value(1));
        assert_eq!(table.records[1].get(1), Some("T"));
    }
}
