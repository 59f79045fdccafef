use crate::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Locale recorded for aliases declared without one.
pub const LOCALE_NONE: &str = "none";

///
/// EnumValue
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EnumValue {
    pub int_value: i32,
    pub name: String,

    /// `(locale, text)` pairs.
    pub aliases: Vec<(String, String)>,
}

///
/// EnumDescriptor
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EnumDescriptor {
    pub full_name: String,
    pub flags: bool,
    pub values: Vec<EnumValue>,
}

impl EnumDescriptor {
    #[must_use]
    pub fn from_decl(decl: &EnumDecl) -> Self {
        let values = decl
            .values
            .iter()
            .map(|v| EnumValue {
                int_value: v.value,
                name: v.name.clone(),
                aliases: v
                    .aliases
                    .iter()
                    .map(|a| {
                        let locale = a.locale.as_deref().unwrap_or(LOCALE_NONE);
                        (locale.to_string(), a.text.clone())
                    })
                    .collect(),
            })
            .collect();

        Self {
            full_name: decl.full_name(),
            flags: decl.flags,
            values,
        }
    }
}

///
/// EnumRegistry
///
/// Append-only table of enums referenced by bindable properties, plus the
/// set of enums whose descriptor has already been written into some unit.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EnumRegistry {
    enums: BTreeMap<String, EnumDescriptor>,
    emitted: BTreeSet<String>,
}

impl EnumRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enums: BTreeMap::new(),
            emitted: BTreeSet::new(),
        }
    }

    /// Record an enum on first reference. Returns false if it was known.
    pub fn register(&mut self, descriptor: EnumDescriptor) -> bool {
        if self.enums.contains_key(&descriptor.full_name) {
            return false;
        }

        tracing::trace!(enum_name = %descriptor.full_name, "enum registered");
        self.enums.insert(descriptor.full_name.clone(), descriptor);

        true
    }

    #[must_use]
    pub fn get(&self, full_name: &str) -> Option<&EnumDescriptor> {
        self.enums.get(full_name)
    }

    #[must_use]
    pub fn contains(&self, full_name: &str) -> bool {
        self.enums.contains_key(full_name)
    }

    #[must_use]
    pub fn is_emitted(&self, full_name: &str) -> bool {
        self.emitted.contains(full_name)
    }

    /// Enums among `names` that still need their descriptor emitted, in
    /// first-seen order and without repeats.
    #[must_use]
    pub fn pending<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<&EnumDescriptor> {
        let mut seen = BTreeSet::new();

        names
            .into_iter()
            .filter(|name| !self.is_emitted(name) && seen.insert(*name))
            .filter_map(|name| self.enums.get(name))
            .collect()
    }

    /// Record that a unit carrying `full_name`'s descriptor was produced.
    pub fn mark_emitted(&mut self, full_name: &str) {
        self.emitted.insert(full_name.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnumDescriptor> {
        self.enums.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.enums.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_enum() -> EnumDescriptor {
        EnumDescriptor::from_decl(&EnumDecl {
            name: "Class".into(),
            namespace: Some("game".into()),
            flags: false,
            values: vec![EnumValueDecl {
                name: "Mage".into(),
                value: 2,
                aliases: vec![
                    AliasDecl {
                        locale: Some("en".into()),
                        text: "Mage".into(),
                    },
                    AliasDecl {
                        locale: None,
                        text: "M".into(),
                    },
                ],
            }],
        })
    }

    #[test]
    fn aliases_default_to_none_locale() {
        let desc = class_enum();
        assert_eq!(desc.full_name, "game::Class");
        assert_eq!(
            desc.values[0].aliases,
            [
                ("en".to_string(), "Mage".to_string()),
                (LOCALE_NONE.to_string(), "M".to_string())
            ]
        );
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = EnumRegistry::new();
        assert!(registry.register(class_enum()));
        assert!(!registry.register(class_enum()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn pending_skips_emitted_and_repeats() {
        let mut registry = EnumRegistry::new();
        registry.register(class_enum());

        let pending = registry.pending(["game::Class", "game::Class", "game::Unknown"]);
        assert_eq!(pending.len(), 1);

        registry.mark_emitted("game::Class");
        assert!(registry.pending(["game::Class"]).is_empty());
    }
}
