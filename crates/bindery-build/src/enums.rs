use crate::{
    EmitError, TypeBuilder,
    helper::{ident, item_path},
};
use bindery_schema::registry::EnumDescriptor;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::BTreeSet;

/// `BindableEnum` implementations for the enums this unit owns.
pub fn generate_impls(builder: &TypeBuilder) -> Result<TokenStream, EmitError> {
    let mut tokens = quote!();

    for desc in &builder.enums {
        tokens.extend(enum_impl(builder, desc)?);
    }

    Ok(tokens)
}

fn enum_impl(builder: &TypeBuilder, desc: &EnumDescriptor) -> Result<TokenStream, EmitError> {
    let rt = &builder.runtime;
    let path = item_path(builder.options, &desc.full_name)?;
    let full_name = &desc.full_name;
    let flags = desc.flags;

    let mut infos = Vec::new();
    let mut to_int = Vec::new();
    let mut from_int = Vec::new();
    let mut seen = BTreeSet::new();

    for value in &desc.values {
        let variant = ident(&value.name)?;
        let int_value = value.int_value;
        let name = &value.name;
        let aliases = value.aliases.iter().map(|(locale, text)| {
            quote!(#rt::AliasInfo::new(#locale, #text))
        });

        infos.push(quote! {
            #rt::EnumValueInfo::new(#int_value, #name, &[#(#aliases),*])
        });
        to_int.push(quote!(Self::#variant => #int_value));

        // first name wins for a repeated value
        if seen.insert(int_value) {
            from_int.push(quote!(#int_value => ::std::option::Option::Some(Self::#variant)));
        }
    }

    Ok(quote! {
        impl #rt::BindableEnum for #path {
            fn enum_info() -> &'static #rt::EnumInfo {
                static INFO: #rt::EnumInfo = #rt::EnumInfo::new(
                    #full_name,
                    #flags,
                    &[#(#infos),*],
                );
                static REGISTERED: ::std::sync::Once = ::std::sync::Once::new();

                REGISTERED.call_once(|| #rt::enums::register(&INFO));

                &INFO
            }

            fn to_int(self) -> i32 {
                match self {
                    #(#to_int,)*
                }
            }

            fn from_int(value: i32) -> ::std::option::Option<Self> {
                match value {
                    #(#from_int,)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    })
}

/// `register_enums`, run once from `type_info`. Touches `enum_info` of every
/// enum the type's own properties use; the enum's own impl registers it.
pub fn generate_registration(builder: &TypeBuilder) -> Result<TokenStream, EmitError> {
    let names = builder.referenced_enums();
    if names.is_empty() {
        return Ok(quote!());
    }

    let rt = &builder.runtime;
    let paths = names
        .iter()
        .map(|name| item_path(builder.options, name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        fn register_enums() {
            static REGISTERED: ::std::sync::Once = ::std::sync::Once::new();

            REGISTERED.call_once(|| {
                #(
                    let _ = <#paths as #rt::BindableEnum>::enum_info();
                )*
            });
        }
    })
}
