use crate::{
    EmitError, TypeBuilder,
    helper::{ident, property_value},
};
use proc_macro2::TokenStream;
use quote::quote;

/// `push_all` and `push_one`.
pub fn generate(builder: &TypeBuilder) -> Result<TokenStream, EmitError> {
    let rt = &builder.runtime;
    let inline = builder.inline_attr();

    let mut sends = Vec::new();
    for prop in builder.ty.accessor_properties() {
        let getter = ident(&prop.getter_name())?;
        let value = property_value(rt, prop.category, &quote!(self.#getter()));
        let name = &prop.property_name;

        sends.push((name.clone(), quote!(sink.update_ui(#name, #value);)));
    }

    let delegate = builder.delegate_path();
    let delegate_all = delegate.as_ref().map(|base| {
        quote!(#rt::BindableModel::push_all(&#base, sink);)
    });
    let delegate_one = delegate.as_ref().map(|base| {
        quote!(#rt::BindableModel::push_one(&#base, property_name, sink);)
    });

    let push_all = if sends.is_empty() && delegate_all.is_none() {
        quote! {
            #inline
            fn push_all(&self, _sink: &mut dyn #rt::ModelSink) {}
        }
    } else {
        let all = sends.iter().map(|(_, send)| send);
        quote! {
            #inline
            fn push_all(&self, sink: &mut dyn #rt::ModelSink) {
                #delegate_all
                #(#all)*
            }
        }
    };

    let push_one = if sends.is_empty() && delegate_one.is_none() {
        quote! {
            #inline
            fn push_one(&self, _property_name: &str, _sink: &mut dyn #rt::ModelSink) {}
        }
    } else {
        let body = builder.select(&sends);
        quote! {
            #inline
            fn push_one(&self, property_name: &str, sink: &mut dyn #rt::ModelSink) {
                #delegate_one
                #body
            }
        }
    };

    Ok(quote! {
        #push_all
        #push_one
    })
}
