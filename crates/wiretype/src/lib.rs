// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # wiretype - schema-driven type descriptors
//!
//! Describes, at the type level, how an application record type maps to a
//! schema-driven binary wire and storage form. One descriptor type,
//! [`PType<T>`], covers three physical representations:
//!
//! | Representation | Record kind | Copy strategy |
//! |----------------|-------------|---------------|
//! | [`Representation::Compiled`] | `#[derive(CompiledRecord)]` types | encode and decode through [`codec`] |
//! | [`Representation::Dynamic`] | [`GenericRecord`] | structural, schema-guided |
//! | [`Representation::Reflected`] | `#[derive(Reflect)]` structs | field by field through accessors |
//!
//! ## Quick Start
//!
//! ```rust
//! use wiretype::{ptypes, Reflect, Representation};
//!
//! #[derive(Debug, Default, Clone, PartialEq, Reflect)]
//! struct Reading {
//!     sensor: String,
//!     value: f64,
//! }
//!
//! let ptype = ptypes::reflects::<Reading>();
//! assert_eq!(ptype.representation(), Representation::Reflected);
//!
//! let reading = Reading { sensor: "t1".into(), value: 21.5 };
//! let detached = ptype.detached_value(&reading).unwrap();
//! assert_eq!(*detached, reading);
//! ```
//!
//! ## Modules Overview
//!
//! - [`schema`] - schemas, canonical text and the lazily parsed holder
//! - [`ptypes`] - descriptor constructors (start here)
//! - [`ptype`] - the descriptor, classification and copy strategies
//! - [`codec`] - binary encoding of wire values
//! - [`converter`] - wire value to storage entry conversion

pub mod codec;
pub mod converter;
pub mod datum;
pub mod error;
pub mod generic;
pub mod ptype;
pub mod ptypes;
pub mod record;
pub mod schema;

pub use converter::{Converter, KeyConverter, PairConverter};
pub use datum::Datum;
pub use error::{Error, Result};
pub use generic::GenericRecord;
pub use ptype::copier::{DeepCopier, DeepCopierFactory};
pub use ptype::{
    classify, AnyPType, Binding, InputFn, MapFn, OutputFn, PType, PTypeBuilder, Representation,
    TypeClass,
};
pub use record::{CompiledRecord, FieldAccessor, Reflect, WireField};
pub use schema::{Schema, SchemaHolder};

// Derive macros share names with the traits they implement.
pub use wiretype_codegen::{CompiledRecord, Reflect};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
