use crate::{EmitError, TypeBuilder};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// `TYPE_INFO`: one entry per merged property.
pub fn generate(builder: &TypeBuilder) -> Result<TokenStream, EmitError> {
    let ty = builder.ty;
    let rt = &builder.runtime;

    let type_name = &ty.simple_name;
    let full_name = &ty.full_name;
    let sealed = ty.is_sealed;

    let entries = ty.merged_properties.iter().map(|prop| {
        let category = format_ident!("{}", prop.category.to_string());
        let name = &prop.property_name;
        let type_full_name = &prop.type_full_name;
        let inherited = prop.is_inherited();

        quote! {
            #rt::BindablePropertyInfo::new(
                #rt::BindableType::#category,
                #name,
                #type_full_name,
                #inherited,
            )
        }
    });

    Ok(quote! {
        /// Binding metadata for this type.
        pub const TYPE_INFO: #rt::BindableTypeInfo = #rt::BindableTypeInfo::new(
            #type_name,
            #full_name,
            #sealed,
            &[#(#entries),*],
        );
    })
}
