// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors.
//!
//! A [`PType<T>`] describes how application values of type `T` map to wire
//! [`Datum`]s: the schema, the two mapping functions, the ordered nested
//! descriptors and the physical [`Representation`]. Descriptors are built
//! once, shared cheaply (clones share caches) and sent to workers with
//! [`PType::transfer`].
//!
//! # Example
//!
//! ```rust
//! use wiretype::{ptypes, Representation};
//!
//! let pair = ptypes::pairs(&ptypes::strings(), &ptypes::longs()).unwrap();
//! assert_eq!(pair.representation(), Representation::Reflected);
//! assert_eq!(pair.sub_types().len(), 2);
//! ```

mod binding;
mod builder;
mod class;
pub mod copier;

pub use binding::{Binding, DynamicFactory, ReadFn, ReflectedFactory, WriteFn};
pub use builder::PTypeBuilder;
pub use class::{classify, Representation, TypeClass};

use crate::converter::{Converter, KeyConverter, PairConverter};
use crate::datum::Datum;
use crate::error::{Error, Result};
use crate::schema::{Schema, SchemaHolder};
use copier::{DeepCopier, DeepCopierFactory};
use once_cell::race::OnceBox;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Mapping function slot: identity or a custom function.
pub enum MapFn<F: ?Sized> {
    /// The binding's reader or writer handles the value directly.
    Identity,
    /// Custom mapping.
    Custom(Arc<F>),
}

/// Datum to value mapping.
pub type InputFn<T> = MapFn<dyn Fn(Datum) -> Result<T> + Send + Sync>;

/// Value to datum mapping.
pub type OutputFn<T> = MapFn<dyn Fn(&T) -> Result<Datum> + Send + Sync>;

impl<F: ?Sized> MapFn<F> {
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

impl<T> MapFn<dyn Fn(Datum) -> Result<T> + Send + Sync> {
    /// Custom decode function.
    pub fn decode_with(f: impl Fn(Datum) -> Result<T> + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }
}

impl<T> MapFn<dyn Fn(&T) -> Result<Datum> + Send + Sync> {
    /// Custom encode function.
    pub fn encode_with(f: impl Fn(&T) -> Result<Datum> + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }
}

impl<F: ?Sized> Clone for MapFn<F> {
    fn clone(&self) -> Self {
        match self {
            Self::Identity => Self::Identity,
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

impl<F: ?Sized> Default for MapFn<F> {
    fn default() -> Self {
        Self::Identity
    }
}

impl<F: ?Sized> fmt::Debug for MapFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("Identity"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Type-erased view of a descriptor, used for nested descriptors.
pub trait AnyPType: Send + Sync + fmt::Debug {
    fn type_class(&self) -> &TypeClass;

    fn sub_types(&self) -> &[Arc<dyn AnyPType>];

    fn schema_holder(&self) -> &SchemaHolder;

    fn representation(&self) -> Representation;

    fn as_any(&self) -> &dyn Any;

    /// Copy carrying configuration only, as sent to a worker.
    fn transfer_any(&self) -> Arc<dyn AnyPType>;

    /// Feed the identity (class and nested descriptors) into `state`.
    fn hash_descriptor(&self, state: &mut dyn Hasher);
}

fn descriptors_equal(a: &dyn AnyPType, b: &dyn AnyPType) -> bool {
    a.type_class() == b.type_class()
        && a.sub_types().len() == b.sub_types().len()
        && a
            .sub_types()
            .iter()
            .zip(b.sub_types())
            .all(|(x, y)| descriptors_equal(x.as_ref(), y.as_ref()))
}

impl PartialEq for dyn AnyPType {
    fn eq(&self, other: &Self) -> bool {
        descriptors_equal(self, other)
    }
}

impl Eq for dyn AnyPType {}

impl Hash for dyn AnyPType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_descriptor(state);
    }
}

struct Inner<T> {
    type_class: TypeClass,
    schema: SchemaHolder,
    input_fn: InputFn<T>,
    output_fn: OutputFn<T>,
    sub_types: Vec<Arc<dyn AnyPType>>,
    binding: Binding<T>,
    representation: Representation,
    table: bool,
    copier: OnceBox<Box<dyn DeepCopier<T>>>,
}

/// Descriptor of an application type `T` and its wire form.
///
/// Two descriptors are equal when their classes are equal and their nested
/// descriptors are equal element-wise, in order. Schema and mapping functions
/// do not take part in equality or hashing.
pub struct PType<T> {
    inner: Arc<Inner<T>>,
}

impl<T: 'static> PType<T> {
    /// Start building a descriptor for `class` with the given capabilities.
    pub fn builder(class: TypeClass, binding: Binding<T>) -> PTypeBuilder<T> {
        PTypeBuilder::new(class, binding)
    }

    pub(crate) fn from_parts(
        type_class: TypeClass,
        schema: SchemaHolder,
        input_fn: InputFn<T>,
        output_fn: OutputFn<T>,
        sub_types: Vec<Arc<dyn AnyPType>>,
        binding: Binding<T>,
        table: bool,
    ) -> Self {
        let representation = classify(&type_class, &sub_types);
        Self {
            inner: Arc::new(Inner {
                type_class,
                schema,
                input_fn,
                output_fn,
                sub_types,
                binding,
                representation,
                table,
                copier: OnceBox::new(),
            }),
        }
    }

    pub fn type_class(&self) -> &TypeClass {
        &self.inner.type_class
    }

    /// Parsed schema, parsed from text on first use.
    pub fn schema(&self) -> Result<&Arc<Schema>> {
        self.inner.schema.get()
    }

    /// Canonical schema text.
    pub fn schema_text(&self) -> &str {
        self.inner.schema.text()
    }

    pub fn schema_holder(&self) -> &SchemaHolder {
        &self.inner.schema
    }

    pub fn representation(&self) -> Representation {
        self.inner.representation
    }

    pub fn sub_types(&self) -> &[Arc<dyn AnyPType>] {
        &self.inner.sub_types
    }

    pub fn input_fn(&self) -> &InputFn<T> {
        &self.inner.input_fn
    }

    pub fn output_fn(&self) -> &OutputFn<T> {
        &self.inner.output_fn
    }

    pub fn is_primitive(&self) -> bool {
        self.inner.type_class.is_primitive()
    }

    /// Whether values are key/value table entries.
    pub fn is_table(&self) -> bool {
        self.inner.table
    }

    /// Converter between wire values and storage entries.
    pub fn converter(&self) -> &'static dyn Converter {
        if self.inner.table {
            &PairConverter
        } else {
            &KeyConverter
        }
    }

    /// Map a wire value to an application value.
    pub fn decode(&self, datum: Datum) -> Result<T> {
        match (&self.inner.input_fn, &self.inner.binding.read) {
            (MapFn::Custom(f), _) => f(datum),
            (MapFn::Identity, Some(read)) => read(datum),
            (MapFn::Identity, None) => Err(self.no_capability("reader")),
        }
    }

    /// Map an application value to a wire value.
    pub fn encode(&self, value: &T) -> Result<Datum> {
        match (&self.inner.output_fn, &self.inner.binding.write) {
            (MapFn::Custom(f), _) => f(value),
            (MapFn::Identity, Some(write)) => write(value),
            (MapFn::Identity, None) => Err(self.no_capability("writer")),
        }
    }

    /// Copy of this descriptor carrying configuration only.
    ///
    /// The result starts with empty schema and copier caches, as a
    /// descriptor received by a remote worker would.
    pub fn transfer(&self) -> Self {
        let inner = &self.inner;
        log::debug!(
            "[ptype] transferring {} ({} bytes of schema text)",
            inner.type_class,
            inner.schema.text().len()
        );
        Self {
            inner: Arc::new(Inner {
                type_class: inner.type_class,
                schema: inner.schema.clone(),
                input_fn: inner.input_fn.clone(),
                output_fn: inner.output_fn.clone(),
                sub_types: inner.sub_types.iter().map(|s| s.transfer_any()).collect(),
                binding: inner.binding.clone(),
                representation: inner.representation,
                table: inner.table,
                copier: OnceBox::new(),
            }),
        }
    }

    /// Deep copier for this descriptor's representation, built on first use.
    pub fn copier(&self) -> Result<&dyn DeepCopier<T>> {
        let copier = self.inner.copier.get_or_try_init(|| {
            let schema = Arc::clone(self.schema()?);
            DeepCopierFactory::create(
                self.inner.representation,
                &self.inner.type_class,
                schema,
                &self.wire_binding(),
            )
            .map(Box::new)
        })?;
        Ok(&**copier)
    }

    /// Check equality against a descriptor of any type.
    pub fn same_as(&self, other: &dyn AnyPType) -> bool {
        descriptors_equal(self, other)
    }

    fn wire_binding(&self) -> Binding<T> {
        let mut binding = self.inner.binding.clone();
        if let MapFn::Custom(f) = &self.inner.input_fn {
            binding.read = Some(Arc::clone(f));
        }
        if let MapFn::Custom(f) = &self.inner.output_fn {
            binding.write = Some(Arc::clone(f));
        }
        binding
    }

    fn no_capability(&self, what: &str) -> Error {
        Error::InvalidConfiguration(format!(
            "{} has an identity mapping but no wire {}",
            self.inner.type_class, what
        ))
    }
}

impl<T: Clone + 'static> PType<T> {
    /// Value safe to keep after the wire buffer it came from is reused.
    ///
    /// With an identity input mapping over a non-primitive class the reader
    /// may hand out instances that alias reused buffers, so a deep copy is
    /// returned. Otherwise the value is returned as is.
    pub fn detached_value<'a>(&self, value: &'a T) -> Result<Cow<'a, T>> {
        if self.inner.input_fn.is_identity() && !self.is_primitive() {
            let copy = self.copier()?.deep_copy(value)?;
            Ok(Cow::Owned(copy))
        } else {
            Ok(Cow::Borrowed(value))
        }
    }
}

impl<T: 'static> AnyPType for PType<T> {
    fn type_class(&self) -> &TypeClass {
        &self.inner.type_class
    }

    fn sub_types(&self) -> &[Arc<dyn AnyPType>] {
        &self.inner.sub_types
    }

    fn schema_holder(&self) -> &SchemaHolder {
        &self.inner.schema
    }

    fn representation(&self) -> Representation {
        self.inner.representation
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn transfer_any(&self) -> Arc<dyn AnyPType> {
        Arc::new(self.transfer())
    }

    fn hash_descriptor(&self, mut state: &mut dyn Hasher) {
        self.inner.type_class.hash(&mut state);
        state.write_usize(self.inner.sub_types.len());
        for sub in &self.inner.sub_types {
            sub.hash_descriptor(state);
        }
    }
}

impl<T> Clone for PType<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> PartialEq for PType<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<T: 'static> Eq for PType<T> {}

impl<T: 'static> Hash for PType<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_descriptor(state);
    }
}

impl<T> fmt::Debug for PType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PType")
            .field("type_class", &self.inner.type_class.name())
            .field("representation", &self.inner.representation)
            .field("schema", &self.inner.schema)
            .field("sub_types", &self.inner.sub_types)
            .field("table", &self.inner.table)
            .finish_non_exhaustive()
    }
}
