use crate::{
    EmitError, TypeBuilder,
    helper::{
        base_access, doc_attrs, getter_body, getter_type, ident, incoming_value, property_value,
        snapshot, statements, storage_type,
    },
};
use bindery_schema::prelude::*;
use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Getter and setter for every own, non-suppressed property.
pub fn generate(builder: &TypeBuilder) -> Result<TokenStream, EmitError> {
    let mut tokens = quote!();

    for prop in builder.ty.accessor_properties() {
        tokens.extend(getter(builder, prop)?);
        tokens.extend(setter(builder, prop)?);
    }

    Ok(tokens)
}

fn getter(builder: &TypeBuilder, prop: &PropertyDescriptor) -> Result<TokenStream, EmitError> {
    let field = field_ident(prop)?;
    let name = ident(&prop.getter_name())?;
    let doc = doc_attrs(prop.doc.as_deref());
    let ret = getter_type(builder.options, &builder.runtime, prop)?;
    let on_get = statements(prop.injected.get(InjectionPoint::OnGet))?;
    let body = getter_body(prop.category, &field);

    Ok(quote! {
        #doc
        #[must_use]
        pub fn #name(&self) -> #ret {
            #(#on_get)*
            #body
        }
    })
}

fn setter(builder: &TypeBuilder, prop: &PropertyDescriptor) -> Result<TokenStream, EmitError> {
    let ty = builder.ty;
    let rt = &builder.runtime;
    let field = field_ident(prop)?;
    let name = ident(&prop.setter_name())?;
    let property_name = &prop.property_name;
    let value_ty = storage_type(
        builder.options,
        rt,
        prop.category,
        &prop.declared_type,
        prop.enum_name.as_deref(),
    )?;

    let before = statements(prop.injected.get(InjectionPoint::OnSetBeforeChange))?;
    let after = statements(prop.injected.get(InjectionPoint::OnSetAfterChange))?;
    let notify = incoming_value(rt, prop.category);
    let events = builder.use_change_event();

    // also-notify targets: capture, then push and compare after the write
    let mut captures = quote!();
    let mut follow_ups = quote!();
    for target in &prop.also_notify {
        let Some(target_prop) = ty.merged(target) else {
            continue;
        };

        let read = read_expr(builder, target_prop)?;
        let pushed = property_value(rt, target_prop.category, &read);
        follow_ups.extend(quote! {
            #rt::update_ui(&*self, #target, #pushed);
        });

        if events {
            let local = format_ident!("prev_{}", target.to_case(Case::Snake));
            let snap = snapshot(target_prop.category, &read, &local);
            let capture = snap.capture;
            let changed = snap.changed;

            captures.extend(quote! {
                let #local = #capture;
            });
            follow_ups.extend(quote! {
                if #changed {
                    self.fire_property_changed(#target, &#local);
                }
            });
        }
    }

    let write = if events {
        quote! {
            let old_value = ::std::mem::replace(&mut self.#field, value);
            self.fire_property_changed(#property_name, &old_value);
        }
    } else {
        quote! {
            self.#field = value;
        }
    };

    let float_allow = if prop.category == ValueCategory::Float {
        quote!(#[allow(clippy::float_cmp)])
    } else {
        quote!()
    };

    Ok(quote! {
        #float_allow
        pub fn #name(&mut self, value: #value_ty) {
            if self.#field == value {
                return;
            }

            #(#before)*
            #rt::update_ui(&*self, #property_name, #notify);
            #captures
            #write
            #(#after)*
            #follow_ups
        }
    })
}

// read_expr
// current value of a merged property in getter shape
fn read_expr(builder: &TypeBuilder, prop: &PropertyDescriptor) -> Result<TokenStream, EmitError> {
    let depth = builder
        .ty
        .depth_of(&prop.declaring_type)
        .ok_or_else(|| EmitError::InvalidPath(prop.declaring_type.clone()))?;
    let owner = base_access(depth);
    let getter = ident(&prop.getter_name())?;

    Ok(quote!(#owner.#getter()))
}

fn field_ident(prop: &PropertyDescriptor) -> Result<proc_macro2::Ident, EmitError> {
    let field = prop
        .field_name
        .as_deref()
        .ok_or_else(|| EmitError::InvalidIdent(prop.property_name.clone()))?;

    ident(field)
}
