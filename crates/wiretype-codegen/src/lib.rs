// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Parsed input shared by both derives.
struct RecordInput {
    ident: syn::Ident,
    record_name: String,
    fields: Vec<FieldInfo>,
}

struct FieldInfo {
    name: syn::Ident,
    ty: syn::Type,
}

impl FieldInfo {
    fn name_str(&self) -> String {
        self.name.to_string()
    }
}

/// `#[derive(CompiledRecord)]`: fixed-layout record with a generated schema.
///
/// Every field type must implement `wiretype::WireField`. The schema is built
/// once per type; values are written positionally in declaration order.
///
/// Example:
/// ```ignore
/// use wiretype::CompiledRecord;
///
/// #[derive(CompiledRecord)]
/// #[wire(name = "SensorReading")]
/// struct Reading {
///     sensor_id: i32,
///     temperature: f64,
///     tags: Vec<String>,
/// }
/// ```
#[proc_macro_derive(CompiledRecord, attributes(wire))]
pub fn derive_compiled_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let record = match parse_record(&input) {
        Ok(record) => record,
        Err(e) => return e.to_compile_error().into(),
    };

    let ident = &record.ident;
    let record_name = &record.record_name;
    let arity = record.fields.len();
    let names: Vec<_> = record.fields.iter().map(|f| &f.name).collect();
    let name_strs: Vec<_> = record.fields.iter().map(FieldInfo::name_str).collect();
    let types: Vec<_> = record.fields.iter().map(|f| &f.ty).collect();

    let expanded = quote! {
        const _: () = {
            static SCHEMA: ::wiretype::__private::Lazy<::std::sync::Arc<::wiretype::Schema>> =
                ::wiretype::__private::Lazy::new(|| {
                    ::std::sync::Arc::new(
                        ::wiretype::schema::RecordSchemaBuilder::new(#record_name)
                            #(.field(#name_strs, <#types as ::wiretype::WireField>::field_schema()))*
                            .build(),
                    )
                });

            impl ::wiretype::CompiledRecord for #ident {
                fn schema() -> ::wiretype::Schema {
                    ::std::clone::Clone::clone(&**SCHEMA)
                }

                fn to_datum(&self) -> ::wiretype::Datum {
                    ::wiretype::record::record_datum(
                        &SCHEMA,
                        ::std::vec![#(::wiretype::WireField::to_field(&self.#names)),*],
                    )
                }

                fn from_datum(datum: ::wiretype::Datum) -> ::wiretype::Result<Self> {
                    #[allow(unused_mut, unused_variables)]
                    let mut values = ::wiretype::record::record_values(datum, #record_name, #arity)?;
                    ::std::result::Result::Ok(Self {
                        #(#names: ::wiretype::record::next_field(&mut values, #name_strs)?),*
                    })
                }
            }

            impl ::wiretype::WireField for #ident {
                fn field_schema() -> ::wiretype::Schema {
                    <Self as ::wiretype::CompiledRecord>::schema()
                }

                fn to_field(&self) -> ::wiretype::Datum {
                    <Self as ::wiretype::CompiledRecord>::to_datum(self)
                }

                fn from_field(datum: ::wiretype::Datum) -> ::wiretype::Result<Self> {
                    <Self as ::wiretype::CompiledRecord>::from_datum(datum)
                }
            }
        };
    };

    TokenStream::from(expanded)
}

/// `#[derive(Reflect)]`: accessor table for a plain struct.
///
/// The struct must implement `Default`; reflected copies start from it.
///
/// Example:
/// ```ignore
/// use wiretype::Reflect;
///
/// #[derive(Default, Reflect)]
/// struct Account {
///     owner: String,
///     balance: f64,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(wire))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let record = match parse_record(&input) {
        Ok(record) => record,
        Err(e) => return e.to_compile_error().into(),
    };

    let ident = &record.ident;
    let record_name = &record.record_name;

    let accessors: Vec<_> = record
        .fields
        .iter()
        .map(|f| {
            let name = &f.name;
            let name_str = f.name_str();
            let ty = &f.ty;
            quote! {
                ::wiretype::FieldAccessor {
                    name: #name_str,
                    schema: <#ty as ::wiretype::WireField>::field_schema,
                    get: |value: &#ident| ::wiretype::WireField::to_field(&value.#name),
                    set: |value: &mut #ident, datum: ::wiretype::Datum| {
                        value.#name = <#ty as ::wiretype::WireField>::from_field(datum)?;
                        ::std::result::Result::Ok(())
                    },
                }
            }
        })
        .collect();

    let expanded = quote! {
        const _: () = {
            static SCHEMA: ::wiretype::__private::Lazy<::std::sync::Arc<::wiretype::Schema>> =
                ::wiretype::__private::Lazy::new(|| {
                    ::std::sync::Arc::new(<#ident as ::wiretype::Reflect>::schema())
                });

            impl ::wiretype::Reflect for #ident {
                fn accessors() -> ::std::vec::Vec<::wiretype::FieldAccessor<Self>> {
                    ::std::vec![#(#accessors),*]
                }

                fn record_name() -> &'static str {
                    #record_name
                }
            }

            impl ::wiretype::WireField for #ident {
                fn field_schema() -> ::wiretype::Schema {
                    ::std::clone::Clone::clone(&**SCHEMA)
                }

                fn to_field(&self) -> ::wiretype::Datum {
                    ::wiretype::record::reflect_to_datum(self, &SCHEMA)
                }

                fn from_field(datum: ::wiretype::Datum) -> ::wiretype::Result<Self> {
                    ::wiretype::record::reflect_from_datum(datum)
                }
            }
        };
    };

    TokenStream::from(expanded)
}

fn parse_record(input: &DeriveInput) -> syn::Result<RecordInput> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Generic records are not supported",
        ));
    }

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Only named fields are supported",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(input, "Only structs are supported")),
    };

    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let Some(name) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        fields.push(FieldInfo {
            name,
            ty: field.ty.clone(),
        });
    }

    let mut record_name = input.ident.to_string();
    for attr in &input.attrs {
        if !attr.path().is_ident("wire") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(meta.error("record name must not be empty"));
                }
                record_name = lit.value();
                Ok(())
            } else {
                Err(meta.error("unsupported wire attribute"))
            }
        })?;
    }

    Ok(RecordInput {
        ident: input.ident.clone(),
        record_name,
        fields,
    })
}
