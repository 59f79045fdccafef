use crate::{
    EmitError, TypeBuilder,
    helper::{doc_attrs, ident, item_path, parse_path, parse_type, storage_type},
};
use bindery_schema::prelude::*;
use proc_macro2::TokenStream;
use quote::quote;

/// The struct declaration: declared fields, the embedded base and the
/// change-event slot.
pub fn generate(builder: &TypeBuilder) -> Result<TokenStream, EmitError> {
    let ty = builder.ty;
    let rt = &builder.runtime;
    let name = ident(&ty.simple_name)?;
    let doc = doc_attrs(ty.doc.as_deref());

    let vis = match ty.accessibility {
        Accessibility::Public => quote!(pub),
        _ => quote!(pub(crate)),
    };

    let derives = ty
        .derives
        .iter()
        .map(|d| parse_path(d))
        .collect::<Result<Vec<_>, _>>()?;
    let derive_attr = if derives.is_empty() {
        quote!()
    } else {
        quote!(#[derive(#(#derives),*)])
    };

    let mut fields = quote!();

    if let Some(base) = base_type(builder)? {
        fields.extend(quote! {
            pub(crate) base: #base,
        });
    }

    for field in &ty.fields {
        let field_ident = ident(&field.name)?;
        let field_doc = doc_attrs(field.doc.as_deref());
        let field_ty = storage_type(
            builder.options,
            rt,
            field.category,
            &field.declared_type,
            field.enum_name.as_deref(),
        )?;

        fields.extend(quote! {
            #field_doc
            pub(crate) #field_ident: #field_ty,
        });
    }

    if builder.use_change_event() {
        let event_doc = if builder.ty.ancestor_declared_change_event {
            " Raised after a bindable property changes. Shadows the change event of the embedded base."
        } else {
            " Raised after a bindable property changes."
        };

        fields.extend(quote! {
            #[doc = #event_doc]
            pub on_property_changed: #rt::ChangeEvent<Self>,
        });
    }

    Ok(quote! {
        #doc
        #derive_attr
        #vis struct #name {
            #fields
        }
    })
}

// base_type
// program-declared bases live under the root path, others are taken as written
fn base_type(builder: &TypeBuilder) -> Result<Option<TokenStream>, EmitError> {
    let ty = builder.ty;
    let Some(base) = ty.base.as_deref() else {
        return Ok(None);
    };

    if ty.base_type_chain.first().is_some_and(|b| b == base) {
        let path = item_path(builder.options, base)?;
        return Ok(Some(quote!(#path)));
    }

    let written = parse_type(base)?;

    Ok(Some(quote!(#written)))
}
