// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type identity and representation classification.

use super::AnyPType;
use crate::generic::GenericRecord;
use crate::record::CompiledRecord;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of an application type plus the capability flags that drive
/// classification.
///
/// Equality and hashing use the `TypeId` only; the flags are a function of
/// how the class was declared for that type.
#[derive(Debug, Clone, Copy)]
pub struct TypeClass {
    id: TypeId,
    name: &'static str,
    compiled: bool,
    primitive: bool,
}

impl TypeClass {
    /// Plain class with no capability flags.
    ///
    /// Never marks `T` as compiled, even when it implements
    /// [`CompiledRecord`]; use [`TypeClass::compiled`] or
    /// `ptypes::records` for generated types.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            compiled: false,
            primitive: false,
        }
    }

    /// Class of a type generated ahead of time from a schema.
    pub fn compiled<T: CompiledRecord>() -> Self {
        Self {
            compiled: true,
            ..Self::of::<T>()
        }
    }

    /// Class of a leaf value type.
    pub fn primitive<T: 'static>() -> Self {
        Self {
            primitive: true,
            ..Self::of::<T>()
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full Rust type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    pub fn is_primitive(&self) -> bool {
        self.primitive
    }

    /// Check whether this class is exactly `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeClass {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeClass {}

impl Hash for TypeClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Physical representation strategy of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Generated record type with a fixed layout.
    Compiled,
    /// Schema-only [`GenericRecord`].
    Dynamic,
    /// Plain struct mapped through an accessor table.
    Reflected,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Compiled => "compiled",
            Self::Dynamic => "dynamic",
            Self::Reflected => "reflected",
        };
        f.write_str(name)
    }
}

/// Classify a descriptor from its class and its direct sub-descriptors.
///
/// Compiled wins if the class or any direct sub-descriptor's class is
/// compiled; only one level is inspected. Otherwise the class decides:
/// exactly [`GenericRecord`] is dynamic, anything else is reflected.
pub fn classify(class: &TypeClass, sub_types: &[Arc<dyn AnyPType>]) -> Representation {
    if class.is_compiled() || sub_types.iter().any(|s| s.type_class().is_compiled()) {
        Representation::Compiled
    } else if class.is::<GenericRecord>() {
        Representation::Dynamic
    } else {
        Representation::Reflected
    }
}
