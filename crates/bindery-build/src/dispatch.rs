use crate::{
    EmitError, TypeBuilder,
    helper::{ident, item_path},
};
use bindery_schema::prelude::*;
use proc_macro2::TokenStream;
use quote::quote;

/// The four `update_*` methods of `BindableModel`.
pub fn generate(builder: &TypeBuilder) -> Result<TokenStream, EmitError> {
    let mut tokens = quote!();

    for kind in DispatchKind::ALL {
        tokens.extend(update_method(builder, kind)?);
    }

    Ok(tokens)
}

fn update_method(builder: &TypeBuilder, kind: DispatchKind) -> Result<TokenStream, EmitError> {
    let rt = &builder.runtime;
    let inline = builder.inline_attr();

    let (method, value_ty) = match kind {
        DispatchKind::Int => (quote!(update_int), quote!(i32)),
        DispatchKind::Float => (quote!(update_float), quote!(f32)),
        DispatchKind::String => (quote!(update_string), quote!(&str)),
        DispatchKind::Bool => (quote!(update_bool), quote!(bool)),
    };

    let mut arms = Vec::new();
    for prop in builder.ty.dispatch_properties(kind) {
        arms.push((prop.property_name.clone(), assign(builder, prop, kind)?));
    }

    let delegate = builder.delegate_path().map(|base| {
        quote! {
            #rt::BindableModel::#method(&mut #base, property_name, value);
        }
    });

    if arms.is_empty() && delegate.is_none() {
        return Ok(quote! {
            #inline
            fn #method(&mut self, _property_name: &str, _value: #value_ty) {}
        });
    }

    let body = builder.select(&arms);

    Ok(quote! {
        #inline
        fn #method(&mut self, property_name: &str, value: #value_ty) {
            #delegate
            #body
        }
    })
}

// assign
// statement that stores the incoming value through the generated setter
fn assign(
    builder: &TypeBuilder,
    prop: &PropertyDescriptor,
    kind: DispatchKind,
) -> Result<TokenStream, EmitError> {
    let rt = &builder.runtime;
    let setter = ident(&prop.setter_name())?;

    let tokens = match kind {
        DispatchKind::Int => match prop.enum_name.as_deref() {
            Some(enum_name) => {
                let path = item_path(builder.options, enum_name)?;
                quote! {
                    if let ::std::option::Option::Some(value) =
                        <#path as #rt::BindableEnum>::from_int(value)
                    {
                        self.#setter(value);
                    }
                }
            }
            None => quote!(self.#setter(value);),
        },
        DispatchKind::String => quote!(self.#setter(value.to_owned());),
        DispatchKind::Float | DispatchKind::Bool => quote!(self.#setter(value);),
    };

    Ok(tokens)
}
