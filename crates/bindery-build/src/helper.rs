use crate::EmitError;
use bindery_schema::prelude::*;
use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};
use syn::parse_str;

const STRICT_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

// words that cannot be raw identifiers either
const RESERVED: &[&str] = &["_", "crate", "self", "Self", "super"];

/// Identifier for `name`, escaped with `r#` when it is a keyword.
pub fn ident(name: &str) -> Result<Ident, EmitError> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && name.chars().all(|c| c == '_' || c.is_alphanumeric());

    if !valid || RESERVED.contains(&name) {
        return Err(EmitError::InvalidIdent(name.to_string()));
    }

    if STRICT_KEYWORDS.contains(&name) {
        Ok(Ident::new_raw(name, Span::call_site()))
    } else {
        Ok(Ident::new(name, Span::call_site()))
    }
}

pub fn parse_path(path: &str) -> Result<syn::Path, EmitError> {
    parse_str(path).map_err(|_| EmitError::InvalidPath(path.to_string()))
}

pub fn parse_type(ty: &str) -> Result<syn::Type, EmitError> {
    parse_str(ty).map_err(|_| EmitError::InvalidType(ty.to_string()))
}

/// Path of a program-declared item inside the consuming crate.
pub fn item_path(options: &Options, full_name: &str) -> Result<syn::Path, EmitError> {
    parse_path(&format!("{}::{full_name}", options.root_path))
}

/// Injected statements, each parsed on its own.
pub fn statements(code: &[String]) -> Result<Vec<syn::Stmt>, EmitError> {
    code.iter()
        .map(|s| {
            parse_str::<syn::Stmt>(&format!("{s};"))
                .map_err(|_| EmitError::InvalidInjection(s.clone()))
        })
        .collect()
}

/// `self` followed by `.base` `depth` times.
pub fn base_access(depth: usize) -> TokenStream {
    let hops = (0..depth).map(|_| quote!(.base));

    quote!(self #(#hops)*)
}

/// Tokens for the stored type of a classified field.
pub fn storage_type(
    options: &Options,
    rt: &syn::Path,
    category: ValueCategory,
    declared_type: &str,
    enum_name: Option<&str>,
) -> Result<TokenStream, EmitError> {
    let enum_ty = || match enum_name {
        Some(name) => item_path(options, name).map(|p| quote!(#p)),
        None => Err(EmitError::InvalidType(declared_type.to_string())),
    };

    let tokens = match category {
        ValueCategory::Bool => quote!(bool),
        ValueCategory::Float => quote!(f32),
        ValueCategory::Int => quote!(i32),
        ValueCategory::String => quote!(::std::string::String),
        ValueCategory::Sprite => quote!(#rt::Sprite),
        ValueCategory::Enum | ValueCategory::FlagsEnum => enum_ty()?,
        ValueCategory::ListBool => quote!(::std::vec::Vec<bool>),
        ValueCategory::ListFloat => quote!(::std::vec::Vec<f32>),
        ValueCategory::ListInt => quote!(::std::vec::Vec<i32>),
        ValueCategory::ListString => quote!(::std::vec::Vec<::std::string::String>),
        ValueCategory::ListSprite => quote!(::std::vec::Vec<#rt::Sprite>),
        ValueCategory::ListEnum => {
            let inner = enum_ty()?;
            quote!(::std::vec::Vec<#inner>)
        }
        ValueCategory::Unsupported => {
            let ty = parse_type(declared_type)?;
            quote!(#ty)
        }
    };

    Ok(tokens)
}

/// Return type of the generated getter.
pub fn getter_type(
    options: &Options,
    rt: &syn::Path,
    prop: &PropertyDescriptor,
) -> Result<TokenStream, EmitError> {
    let stored = storage_type(
        options,
        rt,
        prop.category,
        &prop.declared_type,
        prop.enum_name.as_deref(),
    )?;

    let tokens = match prop.category {
        c if c.is_copy() => stored,
        ValueCategory::String => quote!(&str),
        ValueCategory::Sprite => quote!(&#rt::Sprite),
        c if c.is_list() => {
            let element = storage_type(
                options,
                rt,
                element_category(c),
                &prop.declared_type,
                prop.enum_name.as_deref(),
            )?;
            quote!(&[#element])
        }
        _ => return Err(EmitError::InvalidType(prop.declared_type.clone())),
    };

    Ok(tokens)
}

/// Expression borrowing the stored field in getter shape.
pub fn getter_body(category: ValueCategory, field: &Ident) -> TokenStream {
    match category {
        c if c.is_copy() => quote!(self.#field),
        ValueCategory::String => quote!(self.#field.as_str()),
        c if c.is_list() => quote!(self.#field.as_slice()),
        _ => quote!(&self.#field),
    }
}

const fn element_category(list: ValueCategory) -> ValueCategory {
    match list {
        ValueCategory::ListBool => ValueCategory::Bool,
        ValueCategory::ListEnum => ValueCategory::Enum,
        ValueCategory::ListFloat => ValueCategory::Float,
        ValueCategory::ListInt => ValueCategory::Int,
        ValueCategory::ListSprite => ValueCategory::Sprite,
        ValueCategory::ListString => ValueCategory::String,
        other => other,
    }
}

/// `PropertyValue` built from `expr`, which has getter shape.
pub fn property_value(rt: &syn::Path, category: ValueCategory, expr: &TokenStream) -> TokenStream {
    match category {
        ValueCategory::Enum | ValueCategory::FlagsEnum => quote! {
            #rt::PropertyValue::Int(#rt::BindableEnum::to_int(#expr))
        },
        ValueCategory::ListEnum => quote! {
            #rt::PropertyValue::ListEnum(::std::borrow::Cow::Owned(
                #expr.iter().map(|v| #rt::BindableEnum::to_int(*v)).collect()
            ))
        },
        _ => quote!(#rt::PropertyValue::from(#expr)),
    }
}

/// `PropertyValue` for a setter's incoming owned `value`.
pub fn incoming_value(rt: &syn::Path, category: ValueCategory) -> TokenStream {
    let value = format_ident!("value");

    match category {
        c if c.is_copy() => property_value(rt, c, &quote!(#value)),
        ValueCategory::String => property_value(rt, category, &quote!(#value.as_str())),
        ValueCategory::Sprite => property_value(rt, category, &quote!(&#value)),
        c => property_value(rt, c, &quote!(#value.as_slice())),
    }
}

///
/// Snapshot
///
/// How an also-notify target's value is captured before a write and
/// compared afterwards.
///

pub struct Snapshot {
    pub capture: TokenStream,
    pub changed: TokenStream,
}

pub fn snapshot(category: ValueCategory, read: &TokenStream, local: &Ident) -> Snapshot {
    match category {
        c if c.is_copy() => Snapshot {
            capture: quote!(#read),
            changed: quote!(#read != #local),
        },
        ValueCategory::String => Snapshot {
            capture: quote!(#read.to_owned()),
            changed: quote!(#read != #local.as_str()),
        },
        c if c.is_list() => Snapshot {
            capture: quote!(#read.to_vec()),
            changed: quote!(#read != #local.as_slice()),
        },
        _ => Snapshot {
            capture: quote!(#read.clone()),
            changed: quote!(*#read != #local),
        },
    }
}

/// Select among `arms` by comparing `subject` to each name: a `match` at or
/// above the branch threshold, an `if` chain below it.
pub fn select(
    options: &Options,
    subject: &TokenStream,
    arms: &[(String, TokenStream)],
) -> TokenStream {
    if arms.is_empty() {
        return quote!();
    }

    if options.use_branch_table(arms.len()) {
        let names = arms.iter().map(|(name, _)| name);
        let bodies = arms.iter().map(|(_, body)| body);

        return quote! {
            match #subject {
                #( #names => { #bodies } )*
                _ => {}
            }
        };
    }

    let mut chain = quote!();
    for (i, (name, body)) in arms.iter().enumerate() {
        let branch = quote! {
            if #subject == #name {
                #body
            }
        };

        if i == 0 {
            chain.extend(branch);
        } else {
            chain.extend(quote!(else #branch));
        }
    }

    chain
}

/// `#[doc = …]` lines for optional documentation.
pub fn doc_attrs(doc: Option<&str>) -> TokenStream {
    let lines = doc
        .into_iter()
        .flat_map(str::lines)
        .map(|line| format!(" {}", line.trim_end()));

    quote!(#(#[doc = #lines])*)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_become_raw() {
        assert_eq!(ident("type").expect("raw").to_string(), "r#type");
        assert_eq!(ident("health").expect("plain").to_string(), "health");
        assert!(matches!(ident("self"), Err(EmitError::InvalidIdent(_))));
        assert!(matches!(ident("9lives"), Err(EmitError::InvalidIdent(_))));
        assert!(matches!(ident(""), Err(EmitError::InvalidIdent(_))));
    }

    #[test]
    fn base_access_repeats() {
        assert_eq!(base_access(0).to_string(), "self");
        assert_eq!(base_access(2).to_string(), "self . base . base");
    }

    #[test]
    fn injected_statements_parse_individually() {
        let ok = statements(&["self.count += 1".into(), "tracing::info!(\"x\")".into()]);
        assert_eq!(ok.expect("valid").len(), 2);

        let bad = statements(&["let = ;".into()]);
        assert!(matches!(bad, Err(EmitError::InvalidInjection(_))));
    }

    #[test]
    fn select_switches_on_arm_count() {
        let options = Options::default();
        let subject = quote!(call.method_name);
        let arm = |name: &str| (name.to_string(), quote!(run();));

        assert!(select(&options, &subject, &[]).is_empty());

        let chain = select(&options, &subject, &[arm("a"), arm("b")]).to_string();
        assert!(chain.starts_with("if call . method_name == \"a\""));
        assert!(chain.contains("else if call . method_name == \"b\""));

        let table = select(&options, &subject, &[arm("a"), arm("b"), arm("c")]).to_string();
        assert!(table.starts_with("match call . method_name"));
        assert!(table.contains("\"c\" => { run () ; }"));
    }

    #[test]
    fn storage_types_by_category() {
        let options = Options::default();
        let rt = parse_path("::bindery").expect("rt");

        let ty = storage_type(&options, &rt, ValueCategory::ListEnum, "Vec<Class>", Some("game::Class"))
            .expect("list enum");
        assert_eq!(ty.to_string(), ":: std :: vec :: Vec < crate :: game :: Class >");

        let ty = storage_type(&options, &rt, ValueCategory::Unsupported, "HashMap<u8, u8>", None)
            .expect("verbatim");
        assert_eq!(ty.to_string(), "HashMap < u8 , u8 >");

        assert!(storage_type(&options, &rt, ValueCategory::Unsupported, "Vec<", None).is_err());
    }
}
