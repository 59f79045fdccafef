use crate::{
    EmitError,
    helper::{self, ident, item_path, parse_path, parse_type},
};
use bindery_schema::prelude::*;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

///
/// EventBuilder
///
/// Emits the `EventRegister` impl for one event type. The struct itself is
/// either a bindable unit or written by hand; ancestors are reached through
/// embedded `base` fields.
///

pub(crate) struct EventBuilder<'a> {
    options: &'a Options,
    ty: &'a EventTypeDescriptor,
    runtime: syn::Path,
    self_path: syn::Path,
}

impl<'a> EventBuilder<'a> {
    pub(crate) fn new(
        options: &'a Options,
        ty: &'a EventTypeDescriptor,
    ) -> Result<Self, EmitError> {
        Ok(Self {
            options,
            ty,
            runtime: parse_path(&options.runtime_path)?,
            self_path: item_path(options, &ty.full_name)?,
        })
    }

    pub(crate) fn generate(self) -> Result<TokenStream, EmitError> {
        let rt = &self.runtime;
        let path = &self.self_path;
        let inline = self.inline_attr();

        let register = self.register_body();
        let invoke = self.invoke_method()?;

        tracing::trace!(type_name = %self.ty.full_name, calls = self.ty.calls.len(), "event unit emitted");

        Ok(quote! {
            impl #rt::EventRegister for #path {
                #inline
                fn register_event_calls(&self, calls: &mut ::std::vec::Vec<&'static #rt::EventCall>) {
                    #register
                }

                #inline
                #invoke
            }
        })
    }

    fn inline_attr(&self) -> TokenStream {
        match self.ty.method_kind() {
            MethodKind::Final => quote!(#[inline]),
            MethodKind::Overridable | MethodKind::Refinement => quote!(),
        }
    }

    fn delegate_path(&self) -> Option<TokenStream> {
        self.ty.register_ancestor_depth.map(helper::base_access)
    }

    // register_body
    // ancestor calls come first
    fn register_body(&self) -> TokenStream {
        let rt = &self.runtime;
        let delegate = self.delegate_path().map(|base| {
            quote!(#rt::EventRegister::register_event_calls(&#base, calls);)
        });

        if self.ty.calls.is_empty() {
            return delegate.unwrap_or_else(|| quote!(let _ = calls;));
        }

        let full_name = &self.ty.full_name;
        let mut statics = Vec::new();

        for call in &self.ty.calls {
            let event_name = &call.event_name;
            let method_name = &call.method_name;
            let views = &call.views;
            let arguments = call
                .arguments
                .iter()
                .map(|arg| {
                    let kind = format_ident!("{}", arg.kind.to_string());
                    let type_full_name = &arg.type_full_name;
                    let name = &arg.name;

                    quote!(#rt::ArgumentInfo::new(#type_full_name, #rt::ArgumentKind::#kind, #name))
                });
            let return_type = match &call.returns {
                Some(ty) => quote!(::std::option::Option::Some(#ty)),
                None => quote!(::std::option::Option::None),
            };

            statics.push(quote! {
                #rt::EventCall::new(
                    #event_name,
                    &[#(#views),*],
                    #method_name,
                    #full_name,
                    &[#(#arguments),*],
                    #return_type,
                )
            });
        }

        quote! {
            static CALLS: &[#rt::EventCall] = &[#(#statics),*];

            #delegate
            calls.extend(CALLS.iter());
        }
    }

    fn invoke_method(&self) -> Result<TokenStream, EmitError> {
        let rt = &self.runtime;
        let delegate = self.delegate_path();

        if self.ty.calls.is_empty() && delegate.is_none() {
            return Ok(quote! {
                fn invoke(
                    &mut self,
                    _call: &#rt::EventCall,
                    _args: ::std::vec::Vec<#rt::ArgValue>,
                ) -> #rt::Invoked {
                    ::std::result::Result::Ok(::std::option::Option::None)
                }
            });
        }

        let takes_args = self.ty.calls.iter().any(|c| !c.arguments.is_empty());
        let args_param = if takes_args || delegate.is_some() {
            format_ident!("args")
        } else {
            format_ident!("_args")
        };

        let full_name = &self.ty.full_name;
        let elsewhere = match &delegate {
            Some(base) => quote!(#rt::EventRegister::invoke(&mut #base, call, args)),
            None => quote!(::std::result::Result::Ok(::std::option::Option::None)),
        };
        let reader = takes_args.then(|| quote!(let mut args = #rt::Args::new(call, args);));

        let arms = self
            .ty
            .calls
            .iter()
            .map(|call| Ok((call.method_name.clone(), self.call_arm(call)?)))
            .collect::<Result<Vec<_>, EmitError>>()?;
        let select = helper::select(self.options, &quote!(call.method_name), &arms);

        Ok(quote! {
            fn invoke(
                &mut self,
                call: &#rt::EventCall,
                #args_param: ::std::vec::Vec<#rt::ArgValue>,
            ) -> #rt::Invoked {
                if call.type_full_name != #full_name {
                    return #elsewhere;
                }

                #reader
                #select

                ::std::result::Result::Ok(::std::option::Option::None)
            }
        })
    }

    // call_arm
    // unpack each argument in order, then call and box any result
    fn call_arm(&self, call: &EventCallDescriptor) -> Result<TokenStream, EmitError> {
        let method = ident(&call.method_name)?;
        let mut unpack = Vec::new();
        let mut passed = Vec::new();

        for (i, arg) in call.arguments.iter().enumerate() {
            let local = format_ident!("arg{i}");
            let ty = self.argument_type(arg)?;
            let read = match arg.kind {
                ArgumentKind::Enum => quote!(args.enumeration()?),
                ArgumentKind::Custom => quote!(args.custom()?),
                _ => quote!(args.value()?),
            };

            if arg.by_ref {
                unpack.push(quote!(let mut #local: #ty = #read;));
                passed.push(quote!(&mut #local));
            } else {
                unpack.push(quote!(let #local: #ty = #read;));
                passed.push(quote!(#local));
            }
        }

        let receiver = if call.is_static { quote!(Self::) } else { quote!(self.) };
        let invocation = quote!(#receiver #method(#(#passed),*));

        let finish = if call.returns.is_some() {
            quote! {
                let result: ::std::boxed::Box<dyn ::std::any::Any> =
                    ::std::boxed::Box::new(#invocation);
                return ::std::result::Result::Ok(::std::option::Option::Some(result));
            }
        } else {
            quote! {
                #invocation;
                return ::std::result::Result::Ok(::std::option::Option::None);
            }
        };

        Ok(quote! {
            #(#unpack)*
            #finish
        })
    }

    fn argument_type(&self, arg: &ArgumentDescriptor) -> Result<TokenStream, EmitError> {
        let rt = &self.runtime;

        let tokens = match arg.kind {
            ArgumentKind::Bool => quote!(bool),
            ArgumentKind::Float => quote!(f32),
            ArgumentKind::Int => quote!(i32),
            ArgumentKind::String => quote!(::std::string::String),
            ArgumentKind::Sprite => quote!(#rt::Sprite),
            ArgumentKind::Enum => match &arg.enum_name {
                Some(name) => {
                    let path = item_path(self.options, name)?;
                    quote!(#path)
                }
                None => return Err(EmitError::InvalidType(arg.declared_type.clone())),
            },
            ArgumentKind::Custom => {
                let ty = parse_type(&arg.declared_type)?;
                quote!(#ty)
            }
            ArgumentKind::Unsupported => {
                return Err(EmitError::InvalidType(arg.declared_type.clone()));
            }
        };

        Ok(tokens)
    }
}
