// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder for custom descriptors.

use super::{AnyPType, Binding, InputFn, OutputFn, PType, TypeClass};
use crate::error::{Error, Result};
use crate::schema::{Schema, SchemaHolder};
use std::sync::Arc;

enum SchemaSource {
    Parsed(Schema),
    Text(String),
}

/// Builder for [`PType`].
///
/// # Example
///
/// ```rust
/// use wiretype::{Binding, Datum, InputFn, OutputFn, PType, TypeClass};
/// use wiretype::schema::Schema;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Celsius(f64);
///
/// let ptype = PType::builder(TypeClass::of::<Celsius>(), Binding::none())
///     .schema(Schema::Double)
///     .input_fn(InputFn::decode_with(|d: Datum| {
///         Ok(Celsius(d.as_double().unwrap_or_default()))
///     }))
///     .output_fn(OutputFn::encode_with(|c: &Celsius| Ok(Datum::Double(c.0))))
///     .build()
///     .unwrap();
///
/// assert_eq!(ptype.decode(Datum::Double(21.5)).unwrap(), Celsius(21.5));
/// ```
pub struct PTypeBuilder<T> {
    class: TypeClass,
    binding: Binding<T>,
    schema: Option<SchemaSource>,
    input_fn: InputFn<T>,
    output_fn: OutputFn<T>,
    sub_types: Vec<Arc<dyn AnyPType>>,
    table: bool,
}

impl<T: 'static> PTypeBuilder<T> {
    pub(crate) fn new(class: TypeClass, binding: Binding<T>) -> Self {
        Self {
            class,
            binding,
            schema: None,
            input_fn: InputFn::Identity,
            output_fn: OutputFn::Identity,
            sub_types: Vec::new(),
            table: false,
        }
    }

    /// Use an already parsed schema.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(SchemaSource::Parsed(schema));
        self
    }

    /// Use schema text; it is parsed lazily, on first use.
    pub fn schema_text(mut self, text: impl Into<String>) -> Self {
        self.schema = Some(SchemaSource::Text(text.into()));
        self
    }

    pub fn input_fn(mut self, input_fn: InputFn<T>) -> Self {
        self.input_fn = input_fn;
        self
    }

    pub fn output_fn(mut self, output_fn: OutputFn<T>) -> Self {
        self.output_fn = output_fn;
        self
    }

    /// Append a nested descriptor; order is part of the identity.
    pub fn sub_type<S: 'static>(mut self, sub_type: &PType<S>) -> Self {
        self.sub_types.push(Arc::new(sub_type.clone()));
        self
    }

    /// Append already type-erased nested descriptors.
    pub fn sub_types(mut self, sub_types: impl IntoIterator<Item = Arc<dyn AnyPType>>) -> Self {
        self.sub_types.extend(sub_types);
        self
    }

    /// Mark values as key/value table entries.
    pub fn table(mut self, table: bool) -> Self {
        self.table = table;
        self
    }

    /// Validate the configuration and build the descriptor.
    pub fn build(self) -> Result<PType<T>> {
        let schema = match self.schema {
            Some(SchemaSource::Parsed(schema)) => {
                schema.validate()?;
                SchemaHolder::new(schema)
            }
            Some(SchemaSource::Text(text)) => SchemaHolder::from_text(text)?,
            None => {
                return Err(Error::InvalidConfiguration(format!(
                    "descriptor for {} has no schema",
                    self.class
                )))
            }
        };
        if self.input_fn.is_identity() && !self.binding.can_read() {
            return Err(Error::InvalidConfiguration(format!(
                "{} needs a decode function: the type has no wire reader",
                self.class
            )));
        }
        if self.output_fn.is_identity() && !self.binding.can_write() {
            return Err(Error::InvalidConfiguration(format!(
                "{} needs an encode function: the type has no wire writer",
                self.class
            )));
        }

        let ptype = PType::from_parts(
            self.class,
            schema,
            self.input_fn,
            self.output_fn,
            self.sub_types,
            self.binding,
            self.table,
        );
        log::debug!(
            "[ptype] built {} as {} with {} sub-types",
            ptype.type_class(),
            ptype.representation(),
            ptype.sub_types().len()
        );
        Ok(ptype)
    }
}
