/*!
Procedural macros for elif-schema type introspection.

`#[derive(Introspect)]` publishes a one-level description of a type that the
schema resolver walks lazily:

- structs with named fields become objects, fields in declaration order
- single-field tuple structs are transparent over their inner type
- enums with unit variants become string enums
- enums whose variants each wrap one type become sealed unions
- unions are opaque

Supported attributes: `#[introspect(rename = "...")]` on containers, fields
and variants, `#[introspect(skip)]` on fields and variants, and
`#[introspect(tag = "...")]` on sealed enums to name the discriminator.
*/

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    ext::IdentExt, parse_macro_input, parse_quote, Attribute, Data, DataEnum, DeriveInput, Fields,
    LitStr,
};

/// Derive macro to implement `elif_schema::Introspect` for structs, enums and unions
#[proc_macro_derive(Introspect, attributes(introspect))]
pub fn derive_introspect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    generate_introspect_impl(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Parsed `#[introspect(...)]` attributes
#[derive(Default)]
struct IntrospectAttrs {
    rename: Option<String>,
    skip: bool,
    tag: Option<String>,
}

fn parse_attrs(attrs: &[Attribute]) -> Result<IntrospectAttrs, syn::Error> {
    let mut parsed = IntrospectAttrs::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("introspect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                parsed.rename = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                parsed.skip = true;
                Ok(())
            } else if meta.path.is_ident("tag") {
                let value: LitStr = meta.value()?.parse()?;
                parsed.tag = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported introspect attribute, expected `rename`, `skip` or `tag`"))
            }
        })?;
    }

    Ok(parsed)
}

/// Generate implementation for the Introspect trait
fn generate_introspect_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;
    let container = parse_attrs(&input.attrs)?;

    if container.skip {
        return Err(syn::Error::new_spanned(
            name,
            "`skip` is only supported on fields and variants",
        ));
    }
    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Introspect cannot be derived for types with lifetime parameters",
        ));
    }

    let ident_str = name.unraw().to_string();
    let display_name = container.rename.clone().unwrap_or_else(|| ident_str.clone());
    let type_params: Vec<_> = input.generics.type_params().map(|p| &p.ident).collect();

    let shape = match &input.data {
        Data::Struct(data_struct) => {
            if let Some(tag) = &container.tag {
                return Err(syn::Error::new_spanned(
                    name,
                    format!("`tag = \"{}\"` is only supported on enums", tag),
                ));
            }
            generate_struct_shape(&ident_str, &display_name, &type_params, &data_struct.fields, name)?
        }
        Data::Enum(data_enum) => generate_enum_shape(
            &ident_str,
            &display_name,
            &type_params,
            container.tag.as_deref(),
            data_enum,
            name,
        )?,
        Data::Union(_) => quote! { ::elif_schema::TypeShape::Opaque },
    };

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::elif_schema::Introspect));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::elif_schema::Introspect for #name #ty_generics #where_clause {
            fn shape() -> ::elif_schema::TypeShape {
                #shape
            }
        }
    })
}

/// Generate the shape of a struct
fn generate_struct_shape(
    ident_str: &str,
    display_name: &str,
    type_params: &[&syn::Ident],
    fields: &Fields,
    span: &syn::Ident,
) -> Result<TokenStream2, syn::Error> {
    match fields {
        Fields::Named(named_fields) => {
            let mut field_names = Vec::new();
            let mut field_types = Vec::new();

            for field in &named_fields.named {
                let attrs = parse_attrs(&field.attrs)?;
                if attrs.tag.is_some() {
                    return Err(syn::Error::new_spanned(field, "`tag` is only supported on enums"));
                }
                if attrs.skip {
                    continue;
                }

                let field_name = match (attrs.rename, &field.ident) {
                    (Some(rename), _) => rename,
                    (None, Some(ident)) => ident.unraw().to_string(),
                    (None, None) => unreachable!("named fields always have an ident"),
                };
                field_names.push(field_name);
                field_types.push(&field.ty);
            }

            Ok(quote! {
                ::elif_schema::TypeShape::Struct(::elif_schema::StructShape {
                    path: ::core::concat!(::core::module_path!(), "::", #ident_str),
                    name: #display_name,
                    generics: ::std::vec![#(::elif_schema::TypeHandle::of::<#type_params>()),*],
                    fields: ::std::vec![
                        #(::elif_schema::FieldShape::new(
                            #field_names,
                            ::elif_schema::TypeHandle::of::<#field_types>(),
                        )),*
                    ],
                })
            })
        }
        Fields::Unnamed(unnamed_fields) if unnamed_fields.unnamed.len() == 1 => {
            // Newtype: same wire shape as the wrapped type
            let inner = &unnamed_fields.unnamed[0].ty;
            Ok(quote! {
                ::elif_schema::TypeShape::Transparent(::elif_schema::TypeHandle::of::<#inner>())
            })
        }
        Fields::Unnamed(_) => Err(syn::Error::new_spanned(
            span,
            "Introspect supports named-field structs and single-field tuple structs only",
        )),
        Fields::Unit => Err(syn::Error::new_spanned(
            span,
            "Introspect cannot be derived for unit structs",
        )),
    }
}

/// Generate the shape of an enum: string constants or a sealed union
fn generate_enum_shape(
    ident_str: &str,
    display_name: &str,
    type_params: &[&syn::Ident],
    tag: Option<&str>,
    data_enum: &DataEnum,
    span: &syn::Ident,
) -> Result<TokenStream2, syn::Error> {
    let mut variants = Vec::new();
    for variant in &data_enum.variants {
        let attrs = parse_attrs(&variant.attrs)?;
        if attrs.tag.is_some() {
            return Err(syn::Error::new_spanned(
                variant,
                "`tag` belongs on the enum, not on a variant",
            ));
        }
        if !attrs.skip {
            let name = attrs
                .rename
                .unwrap_or_else(|| variant.ident.unraw().to_string());
            variants.push((name, variant));
        }
    }

    let all_unit = variants
        .iter()
        .all(|(_, variant)| matches!(variant.fields, Fields::Unit));

    if all_unit {
        if tag.is_some() {
            return Err(syn::Error::new_spanned(
                span,
                "`tag` requires variants that each wrap one type",
            ));
        }
        let constants = variants.iter().map(|(name, _)| name);
        return Ok(quote! {
            ::elif_schema::TypeShape::Enum(::elif_schema::EnumShape {
                path: ::core::concat!(::core::module_path!(), "::", #ident_str),
                name: #display_name,
                constants: ::std::vec![#(#constants),*],
            })
        });
    }

    let mut variant_names = Vec::new();
    let mut variant_types = Vec::new();
    for (name, variant) in &variants {
        match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                variant_names.push(name);
                variant_types.push(&fields.unnamed[0].ty);
            }
            _ => {
                return Err(syn::Error::new_spanned(
                    variant,
                    "enums must have only unit variants or only single-field tuple variants",
                ));
            }
        }
    }

    let discriminator = match tag {
        Some(tag) => quote! { ::core::option::Option::Some(#tag) },
        None => quote! { ::core::option::Option::None },
    };

    Ok(quote! {
        ::elif_schema::TypeShape::Sealed(::elif_schema::SealedShape {
            path: ::core::concat!(::core::module_path!(), "::", #ident_str),
            name: #display_name,
            generics: ::std::vec![#(::elif_schema::TypeHandle::of::<#type_params>()),*],
            variants: ::std::vec![
                #(::elif_schema::VariantShape::new(
                    #variant_names,
                    ::elif_schema::TypeHandle::of::<#variant_types>(),
                )),*
            ],
            discriminator: #discriminator,
        })
    })
}
