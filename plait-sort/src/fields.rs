//! Field key extraction
//!
//! Input fields are named positionally (`a,b` or `,b` where an empty name is
//! a placeholder for a field that is not a key). The sort order lists the
//! names that make up the key, most significant first, and defaults to the
//! input field order.

use crate::error::SortError;
use crate::record::FieldValue;
use ordered_float::OrderedFloat;
use std::fmt::Debug;

/// Composite sort key; compared lexicographically slot by slot.
pub type Key<K> = Vec<K>;

/// Splits a comma-separated name list, keeping empty placeholders.
pub fn split_names(names: &str) -> Vec<String> {
    names.split(',').map(|name| name.trim().to_string()).collect()
}

/// Maps key slots to input field positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyProjection {
    slots: Vec<usize>,
}

impl KeyProjection {
    /// Resolves `order` (or `fields` when no order is given) against the input
    /// field names. Empty order entries are ignored and empty field names
    /// never match.
    pub fn resolve(fields: &[String], order: Option<&[String]>) -> Result<Self, SortError> {
        let order = order.unwrap_or(fields);
        let mut slots = Vec::with_capacity(order.len());
        for name in order.iter().filter(|name| !name.is_empty()) {
            let Some(position) = fields.iter().position(|field| field == name) else {
                return Err(SortError::OrderFieldNotFound {
                    field: name.clone(),
                    fields: fields.join(","),
                });
            };
            slots.push(position);
        }
        Ok(KeyProjection { slots })
    }

    /// Input field position read by each key slot
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Number of fields a record needs to fill every slot
    pub fn required_fields(&self) -> usize {
        self.slots.iter().max().map_or(0, |max| max + 1)
    }

    /// Builds the key of one record. `field` returns the value at a position,
    /// or `None` when the record is too short.
    pub fn extract<'a, K, F>(
        &self,
        record: usize,
        found: usize,
        field: F,
    ) -> Result<Key<K>, SortError>
    where
        K: KeyPart,
        F: Fn(usize) -> Option<FieldValue<'a>>,
    {
        self.slots
            .iter()
            .map(|&position| {
                let value = field(position).ok_or_else(|| SortError::MissingField {
                    record,
                    expected: self.required_fields(),
                    found,
                })?;
                K::from_field(value).map_err(|value| SortError::BadField {
                    record,
                    field: position,
                    value,
                })
            })
            .collect()
    }
}

/// One slot of a sort key
pub trait KeyPart: Ord + Clone + Debug {
    /// Converts a field value; on failure returns the offending text.
    fn from_field(value: FieldValue<'_>) -> Result<Self, String>;
}

/// String keys compare the raw field bytes.
impl KeyPart for Vec<u8> {
    fn from_field(value: FieldValue<'_>) -> Result<Self, String> {
        Ok(match value {
            FieldValue::Text(text) => text.into_owned(),
            FieldValue::Number(n) => n.to_string().into_bytes(),
        })
    }
}

impl KeyPart for OrderedFloat<f64> {
    fn from_field(value: FieldValue<'_>) -> Result<Self, String> {
        match value {
            FieldValue::Number(n) => Ok(OrderedFloat(n)),
            FieldValue::Text(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(OrderedFloat(0.0));
                }
                trimmed
                    .parse::<f64>()
                    .map(OrderedFloat)
                    .map_err(|_| text.into_owned())
            }
        }
    }
}
