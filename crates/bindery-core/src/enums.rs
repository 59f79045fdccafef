use serde::Serialize;
use std::{
    collections::BTreeMap,
    sync::{LazyLock, RwLock},
};

/// Locale marker for aliases declared without a locale.
pub const LOCALE_NONE: &str = "none";

///
/// AliasInfo
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct AliasInfo {
    pub locale: &'static str,
    pub text: &'static str,
}

impl AliasInfo {
    #[must_use]
    pub const fn new(locale: &'static str, text: &'static str) -> Self {
        Self { locale, text }
    }
}

///
/// EnumValueInfo
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct EnumValueInfo {
    pub int_value: i32,
    pub name: &'static str,
    pub aliases: &'static [AliasInfo],
}

impl EnumValueInfo {
    #[must_use]
    pub const fn new(int_value: i32, name: &'static str, aliases: &'static [AliasInfo]) -> Self {
        Self {
            int_value,
            name,
            aliases,
        }
    }

    /// Alias text for `locale`, if one was declared.
    #[must_use]
    pub fn alias(&self, locale: &str) -> Option<&'static str> {
        self.aliases
            .iter()
            .find(|a| a.locale == locale)
            .map(|a| a.text)
    }
}

///
/// EnumInfo
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct EnumInfo {
    pub full_name: &'static str,
    pub flags: bool,
    pub values: &'static [EnumValueInfo],
}

impl EnumInfo {
    #[must_use]
    pub const fn new(full_name: &'static str, flags: bool, values: &'static [EnumValueInfo]) -> Self {
        Self {
            full_name,
            flags,
            values,
        }
    }

    #[must_use]
    pub fn value(&self, int_value: i32) -> Option<&'static EnumValueInfo> {
        self.values.iter().find(|v| v.int_value == int_value)
    }

    #[must_use]
    pub fn value_by_name(&self, name: &str) -> Option<&'static EnumValueInfo> {
        self.values.iter().find(|v| v.name == name)
    }
}

///
/// ENUMS
/// process-wide registry filled by generated registration blocks
///

static ENUMS: LazyLock<RwLock<BTreeMap<&'static str, &'static EnumInfo>>> =
    LazyLock::new(|| RwLock::new(BTreeMap::new()));

/// Register an enum descriptor. Registering the same name twice keeps the
/// first descriptor.
pub fn register(info: &'static EnumInfo) {
    let mut enums = ENUMS
        .write()
        .expect("enum registry RwLock poisoned while acquiring write lock");

    if enums.contains_key(info.full_name) {
        return;
    }

    tracing::debug!(
        enum_name = info.full_name,
        values = info.values.len(),
        "registered enum"
    );
    enums.insert(info.full_name, info);
}

/// Look up a registered enum descriptor by full name.
pub fn get(full_name: &str) -> Option<&'static EnumInfo> {
    ENUMS
        .read()
        .expect("enum registry RwLock poisoned while acquiring read lock")
        .get(full_name)
        .copied()
}

/// Full names of every registered enum, sorted.
pub fn registered() -> Vec<&'static str> {
    ENUMS
        .read()
        .expect("enum registry RwLock poisoned while acquiring read lock")
        .keys()
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    static COLOR: EnumInfo = EnumInfo::new(
        "tests::Color",
        false,
        &[
            EnumValueInfo::new(0, "Red", &[AliasInfo::new("en", "red"), AliasInfo::new(LOCALE_NONE, "R")]),
            EnumValueInfo::new(1, "Green", &[]),
        ],
    );

    static COLOR_SHADOW: EnumInfo = EnumInfo::new("tests::Color", true, &[]);

    #[test]
    fn register_keeps_first_descriptor() {
        register(&COLOR);
        register(&COLOR_SHADOW);

        let info = get("tests::Color").expect("registered");
        assert!(!info.flags);
        assert_eq!(info.values.len(), 2);
        assert!(registered().contains(&"tests::Color"));
    }

    #[test]
    fn lookup_values_and_aliases() {
        let red = COLOR.value(0).expect("Red");
        assert_eq!(red.name, "Red");
        assert_eq!(red.alias("en"), Some("red"));
        assert_eq!(red.alias(LOCALE_NONE), Some("R"));
        assert_eq!(red.alias("fr"), None);
        assert_eq!(COLOR.value_by_name("Green").map(|v| v.int_value), Some(1));
        assert!(COLOR.value(9).is_none());
    }
}
