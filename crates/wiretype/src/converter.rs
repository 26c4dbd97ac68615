// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Converters between wire values and storage key/value entries.

use crate::datum::Datum;
use crate::error::{Error, Result};
use crate::generic::GenericRecord;
use crate::schema::Schema;
use std::sync::Arc;

/// Splits wire values into storage entries and joins them back.
///
/// Implementations are stateless and shared as `&'static` values.
pub trait Converter: Send + Sync {
    /// Key and value schemas for entries of a value schema.
    fn entry_schemas(&self, schema: &Schema) -> Result<(Schema, Schema)>;

    /// Split a wire value into a key and a value.
    fn to_entry(&self, datum: Datum) -> Result<(Datum, Datum)>;

    /// Join a key and a value into a wire value of `schema`.
    fn from_entry(&self, key: Datum, value: Datum, schema: &Arc<Schema>) -> Result<Datum>;
}

/// Stores the whole value as the key, with a null value.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyConverter;

impl Converter for KeyConverter {
    fn entry_schemas(&self, schema: &Schema) -> Result<(Schema, Schema)> {
        Ok((schema.clone(), Schema::Null))
    }

    fn to_entry(&self, datum: Datum) -> Result<(Datum, Datum)> {
        Ok((datum, Datum::Null))
    }

    fn from_entry(&self, key: Datum, _value: Datum, _schema: &Arc<Schema>) -> Result<Datum> {
        Ok(key)
    }
}

/// Splits a two-field record into its first field (key) and second (value).
#[derive(Debug, Clone, Copy, Default)]
pub struct PairConverter;

impl Converter for PairConverter {
    fn entry_schemas(&self, schema: &Schema) -> Result<(Schema, Schema)> {
        match schema.fields() {
            Some([key, value]) => Ok((key.schema.clone(), value.schema.clone())),
            _ => Err(Error::mismatch("two-field record schema", schema.kind())),
        }
    }

    fn to_entry(&self, datum: Datum) -> Result<(Datum, Datum)> {
        let record = datum
            .into_record()
            .ok_or_else(|| Error::mismatch("pair record", "non-record value"))?;
        let mut values = record.into_values().into_iter();
        match (values.next(), values.next(), values.next()) {
            (Some(key), Some(value), None) => Ok((key, value)),
            _ => Err(Error::mismatch("pair record", "record without exactly two fields")),
        }
    }

    fn from_entry(&self, key: Datum, value: Datum, schema: &Arc<Schema>) -> Result<Datum> {
        GenericRecord::from_values(Arc::clone(schema), vec![key, value]).map(Datum::Record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RecordSchemaBuilder;

    #[test]
    fn test_pair_converter_roundtrip() {
        let schema = Arc::new(
            RecordSchemaBuilder::new("Pair")
                .field("key", Schema::String)
                .field("value", Schema::Long)
                .build(),
        );
        let (key_schema, value_schema) = PairConverter.entry_schemas(&schema).expect("schemas");
        assert_eq!(key_schema, Schema::String);
        assert_eq!(value_schema, Schema::Long);

        let joined = PairConverter
            .from_entry(Datum::from("k"), Datum::Long(4), &schema)
            .expect("join");
        let (key, value) = PairConverter.to_entry(joined).expect("split");
        assert_eq!(key, Datum::from("k"));
        assert_eq!(value, Datum::Long(4));
    }

    #[test]
    fn test_key_converter() {
        let schema = Arc::new(Schema::String);
        let (key, value) = KeyConverter.to_entry(Datum::from("v")).expect("split");
        assert!(value.is_null());
        assert_eq!(
            KeyConverter.from_entry(key, value, &schema).expect("join"),
            Datum::from("v")
        );
    }

    #[test]
    fn test_pair_converter_rejects_non_pairs() {
        assert!(PairConverter.to_entry(Datum::Int(1)).is_err());
        assert!(PairConverter.entry_schemas(&Schema::Int).is_err());
    }
}
