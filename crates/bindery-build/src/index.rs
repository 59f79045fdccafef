use crate::{GeneratedUnit, render};
use bindery_schema::prelude::*;
use quote::quote;
use std::collections::BTreeMap;

/// Index name for types declared outside any namespace.
pub const ROOT_INDEX: &str = "__root";

/// `game::ui` is indexed in `game.ui.g.rs`.
#[must_use]
pub fn index_file_name(namespace: Option<&str>) -> String {
    let stem = namespace.map_or_else(|| ROOT_INDEX.to_string(), |ns| ns.replace("::", "."));

    format!("{stem}.g.rs")
}

/// One index per namespace that includes the namespace's units.
pub fn generate<'a>(
    options: &Options,
    units: impl IntoIterator<Item = &'a GeneratedUnit>,
) -> Vec<GeneratedUnit> {
    let mut by_namespace: BTreeMap<Option<&str>, Vec<&str>> = BTreeMap::new();

    for unit in units {
        by_namespace
            .entry(unit.namespace.as_deref())
            .or_default()
            .push(unit.file_name.as_str());
    }

    by_namespace
        .into_iter()
        .map(|(namespace, files)| {
            let code = quote! {
                #( include!(#files); )*
            };

            GeneratedUnit {
                file_name: index_file_name(namespace),
                type_name: None,
                namespace: namespace.map(ToString::to_string),
                code: render(options, &code),
            }
        })
        .collect()
}
