use crate::{EmitError, TypeBuilder, dispatch, push};
use proc_macro2::TokenStream;
use quote::quote;

/// `impl BindableModel`.
pub fn generate(builder: &TypeBuilder) -> Result<TokenStream, EmitError> {
    let rt = &builder.runtime;
    let path = &builder.self_path;
    let inline = builder.inline_attr();

    // an ancestor registers its own enums from its own type_info
    let ancestor = builder.delegate_path().map(|base| {
        quote! {
            let _ = #rt::BindableModel::type_info(&#base);
        }
    });
    let register = (!builder.referenced_enums().is_empty()).then(|| {
        quote! {
            #path::register_enums();
        }
    });

    let dispatch = dispatch::generate(builder)?;
    let push = push::generate(builder)?;

    Ok(quote! {
        impl #rt::BindableModel for #path {
            #inline
            fn type_info(&self) -> &'static #rt::BindableTypeInfo {
                static TYPE_INFO: #rt::BindableTypeInfo = #path::TYPE_INFO;

                #ancestor
                #register

                &TYPE_INFO
            }

            #dispatch
            #push
        }
    })
}
