//! # Template Loading
//!
//! The template is the declared schema a shapefile must conform to. It is a
//! YAML document with these sections:
//!
//! ```yaml
//! match_mode: positional          # or by_name; optional
//! fields:                         # ordered; key -> [name, type, length, decimal(, strength)]
//!   featureid: '["FEATUREID", "C", 20, 0]'
//!   area: ["AREA", "N", 19, 11, "name_type"]
//! values:                         # key -> allowed values
//!   typecode: '["FH", "FR"]'
//! required: [featureid, area]     # keys whose cells must not be null
//! ```
//!
//! Entries may be JSON-encoded strings (the legacy `vshape.cfg` form) or
//! native YAML lists. `Fields` and `Values` are accepted as section aliases.
//!
//! A loaded [`Template`] is immutable and is passed by reference into every
//! check. Allowed values and required flags are keyed by field key, never by
//! position; positions are resolved against the actual fields at validation
//! time.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use vshape_core::{CompareStrength, ConfigError, FieldDescriptor, FieldType};

use crate::compare::MatchMode;

/// Closed set of permitted values for an enumerated field.
pub type AllowList = BTreeSet<String>;

/// One declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateField {
    /// Logical key used by the `values` and `required` sections.
    pub key: String,
    /// Expected descriptor.
    pub descriptor: FieldDescriptor,
    /// How much of the descriptor must match.
    pub strength: CompareStrength,
    /// Whether every record must hold a value in this field.
    pub required: bool,
}

/// The declared schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    fields: Vec<TemplateField>,
    allowed: BTreeMap<String, AllowList>,
    match_mode: MatchMode,
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    #[serde(alias = "Fields")]
    fields: serde_yaml::Mapping,
    #[serde(default, alias = "Values")]
    values: serde_yaml::Mapping,
    #[serde(default, alias = "Required")]
    required: Vec<String>,
    #[serde(default)]
    match_mode: MatchMode,
}

impl Template {
    /// Read and parse a template file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read, and any error of
    /// [`Template::from_yaml_str`] for its content.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let template = Self::from_yaml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            fields = template.fields.len(),
            allow_lists = template.allowed.len(),
            "loaded template"
        );
        Ok(template)
    }

    /// Parse a template document.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Parse` if the document is not YAML or has no `fields`.
    /// - `ConfigError::MalformedField` if a field entry is not a
    ///   `[name, type, length, decimal]` list with an optional strength.
    /// - `ConfigError::MalformedValues` if an allow-list is not a list of strings.
    /// - `ConfigError::UnknownKey` if `values` or `required` names an undeclared key.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawTemplate =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut fields = Vec::with_capacity(raw.fields.len());
        for (key, entry) in &raw.fields {
            let key = section_key(key, "fields")?;
            let (descriptor, strength) = decode_field(&key, entry)?;
            fields.push(TemplateField {
                key,
                descriptor,
                strength,
                required: false,
            });
        }

        for key in &raw.required {
            let field = fields
                .iter_mut()
                .find(|f| &f.key == key)
                .ok_or_else(|| unknown_key("required", key))?;
            field.required = true;
        }

        let mut allowed = BTreeMap::new();
        for (key, entry) in &raw.values {
            let key = section_key(key, "values")?;
            if !fields.iter().any(|f| f.key == key) {
                return Err(unknown_key("values", &key));
            }
            let list = decode_values(&key, entry)?;
            allowed.insert(key, list);
        }

        Ok(Self {
            fields,
            allowed,
            match_mode: raw.match_mode,
        })
    }

    /// Declared fields in template order.
    pub fn fields(&self) -> &[TemplateField] {
        &self.fields
    }

    /// Expected descriptors in template order.
    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        self.fields.iter().map(|f| f.descriptor.clone()).collect()
    }

    /// Allowed values for `key`, or `None` if the field is not enumerated.
    pub fn allowed_values(&self, key: &str) -> Option<&AllowList> {
        self.allowed.get(key)
    }

    /// Enumerated fields with their allow-lists, in template order.
    pub fn allow_lists(&self) -> impl Iterator<Item = (&TemplateField, &AllowList)> {
        self.fields
            .iter()
            .filter_map(|f| self.allowed.get(&f.key).map(|list| (f, list)))
    }

    /// Fields whose cells must not be null, in template order.
    pub fn required_fields(&self) -> impl Iterator<Item = &TemplateField> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Template position of `key`.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// The same template under a different match mode.
    pub fn with_match_mode(self, match_mode: MatchMode) -> Self {
        Self { match_mode, ..self }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn unknown_key(section: &str, key: &str) -> ConfigError {
    ConfigError::UnknownKey {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn section_key(key: &serde_yaml::Value, section: &str) -> Result<String, ConfigError> {
    key.as_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Parse(format!("non-string key in section '{section}': {key:?}")))
}

/// Turn an entry into JSON, decoding it first if it is a JSON-encoded string.
fn entry_to_json(entry: &serde_yaml::Value) -> Result<Value, String> {
    match entry {
        serde_yaml::Value::String(s) => serde_json::from_str(s).map_err(|e| format!("invalid JSON: {e}")),
        other => serde_json::to_value(other).map_err(|e| e.to_string()),
    }
}

fn decode_field(
    key: &str,
    entry: &serde_yaml::Value,
) -> Result<(FieldDescriptor, CompareStrength), ConfigError> {
    let malformed = |reason: String| ConfigError::MalformedField {
        key: key.to_string(),
        reason,
    };

    let value = entry_to_json(entry).map_err(malformed)?;
    let items = value
        .as_array()
        .ok_or_else(|| malformed(format!("expected a list, got {value}")))?;
    if !(4..=5).contains(&items.len()) {
        return Err(malformed(format!(
            "expected [name, type, length, decimal] with an optional strength, got {} elements",
            items.len()
        )));
    }

    let name = items[0]
        .as_str()
        .ok_or_else(|| malformed("name must be a string".to_string()))?;
    let field_type: FieldType = items[1]
        .as_str()
        .ok_or_else(|| malformed("type must be a string".to_string()))?
        .parse()
        .map_err(malformed)?;
    let length = items[2]
        .as_u64()
        .and_then(|n| u16::try_from(n).ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| malformed(format!("length must be a positive integer, got {}", items[2])))?;
    let decimal = items[3]
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| malformed(format!("decimal must be a small non-negative integer, got {}", items[3])))?;
    let strength = match items.get(4) {
        None => CompareStrength::default(),
        Some(v) => v
            .as_str()
            .ok_or_else(|| malformed("strength must be a string".to_string()))?
            .parse()
            .map_err(malformed)?,
    };

    Ok((FieldDescriptor::new(name, field_type, length, decimal), strength))
}

fn decode_values(key: &str, entry: &serde_yaml::Value) -> Result<AllowList, ConfigError> {
    let malformed = |reason: String| ConfigError::MalformedValues {
        key: key.to_string(),
        reason,
    };
    let value = entry_to_json(entry).map_err(malformed)?;
    let list: Vec<String> =
        serde_json::from_value(value).map_err(|e| malformed(format!("expected a list of strings: {e}")))?;
    Ok(list.into_iter().collect())
}
