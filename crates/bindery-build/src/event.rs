use crate::TypeBuilder;
use proc_macro2::TokenStream;
use quote::quote;

/// Private helper that raises `on_property_changed`. The slot is taken out
/// while handlers run so they can borrow the owner.
pub fn generate(builder: &TypeBuilder) -> TokenStream {
    if !builder.use_change_event() {
        return quote!();
    }

    let rt = &builder.runtime;

    quote! {
        fn fire_property_changed(
            &mut self,
            property_name: &str,
            old_value: &dyn ::std::any::Any,
        ) {
            let mut event: #rt::ChangeEvent<Self> = ::std::mem::take(&mut self.on_property_changed);
            event.invoke(property_name, &*self, old_value);
            event.absorb(&mut self.on_property_changed);
            self.on_property_changed = event;
        }
    }
}
