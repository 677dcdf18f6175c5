//! Helper functions for retrieving and parsing meta attributes.

use syn::{ Attribute, Meta, NestedMeta, MetaNameValue, Lit };
use syn::punctuated::Punctuated;
use syn::token::Comma;
use crate::error::Result;

/// Keys accepted in a container-level `#[model(...)]` attribute.
pub const CONTAINER_KEYS: &[&str] = &["name"];

/// Keys accepted in a field-level `#[model(...)]` attribute.
pub const FIELD_KEYS: &[&str] = &["unique", "immutable"];

/// The items nested in every `#[name(...)]` attribute with the given name.
fn nested_metas(attrs: &[Attribute], name: &str) -> Vec<NestedMeta> {
    attrs
        .iter()
        .filter_map(|attr| match attr.interpret_meta()? {
            Meta::List(list) => if list.ident == name {
                Some(list.nested)
            } else {
                None
            },
            _ => None,
        })
        .flat_map(|nested| nested.into_iter())
        .collect()
}

/// The identifier a nested meta item is keyed by.
fn meta_key(meta: &Meta) -> String {
    match *meta {
        Meta::Word(ref ident) => ident.to_string(),
        Meta::List(ref list) => list.ident.to_string(),
        Meta::NameValue(ref name_value) => name_value.ident.to_string(),
    }
}

/// Returns the inner, `...` part of the first `#[name(...)]` attribute
/// with the specified name (like `#[serde(rename = "foo")]`).
fn meta(attrs: &[Attribute], name: &str, key: &str) -> Option<Meta> {
    nested_metas(attrs, name).into_iter().find_map(|nested| match nested {
        NestedMeta::Meta(meta) => if meta_key(&meta) == key {
            Some(meta)
        } else {
            None
        },
        NestedMeta::Literal(_) => None,
    })
}

/// Search for an attribute, provided that it's a name-value pair.
fn name_value(attrs: &[Attribute], name: &str, key: &str) -> Result<Option<MetaNameValue>> {
    match meta(attrs, name, key) {
        Some(Meta::NameValue(name_value)) => Ok(Some(name_value)),
        Some(_) => {
            err_fmt!("attribute must have form `#[{}({} = \"...\")]`", name, key)
        }
        None => Ok(None),
    }
}

/// Search for an attribute, provided that it's a single word.
fn has_meta_word(attrs: &[Attribute], name: &str, key: &str) -> Result<bool> {
    match meta(attrs, name, key) {
        Some(Meta::Word(_)) => Ok(true),
        Some(_) => {
            err_fmt!("attribute must have form `#[{}({})]`", name, key)
        }
        None => Ok(false),
    }
}

/// Search for a `Serde` attribute, provided that it's a name-value pair.
/// The split form `#[serde(key(serialize = "...", deserialize = "..."))]`
/// yields its `serialize` half, or `None` if only `deserialize` is given.
pub fn serde_name_value(attrs: &[Attribute], key: &str) -> Result<Option<MetaNameValue>> {
    match meta(attrs, "serde", key) {
        Some(Meta::NameValue(name_value)) => Ok(Some(name_value)),
        Some(Meta::List(list)) => serialize_name_value(key, list.nested),
        Some(Meta::Word(_)) => {
            err_fmt!("attribute must have form `#[serde({} = \"...\")]`", key)
        }
        None => Ok(None),
    }
}

/// The `serialize = "..."` item of a split `Serde` attribute.
fn serialize_name_value(key: &str, nested: Punctuated<NestedMeta, Comma>) -> Result<Option<MetaNameValue>> {
    let mut serialize = None;

    for item in nested {
        match item {
            NestedMeta::Meta(Meta::NameValue(name_value)) => {
                if name_value.ident == "serialize" {
                    serialize = Some(name_value);
                } else if name_value.ident != "deserialize" {
                    return err_fmt!("unexpected key `{}` in `#[serde({}(...))]`",
                                    name_value.ident, key);
                }
            }
            _ => return err_fmt!(
                "attribute must have form `#[serde({}(serialize = \"...\", deserialize = \"...\"))]`",
                key
            ),
        }
    }

    Ok(serialize)
}

/// Search for a `Serde` attribute, provided that it's a single word.
pub fn has_serde_word(attrs: &[Attribute], key: &str) -> Result<bool> {
    has_meta_word(attrs, "serde", key)
}

/// Search for a `#[model(key = "...")]` attribute.
pub fn model_name_value(attrs: &[Attribute], key: &str) -> Result<Option<MetaNameValue>> {
    name_value(attrs, "model", key)
}

/// Reads a boolean `#[model(...)]` flag, which may be given either as a
/// single word (`#[model(unique)]`) or explicitly (`#[model(unique = false)]`).
pub fn model_flag(attrs: &[Attribute], key: &str) -> Result<bool> {
    match meta(attrs, "model", key) {
        Some(Meta::Word(_)) => Ok(true),
        Some(Meta::NameValue(ref name_value)) => value_as_bool(key, &name_value.lit),
        Some(Meta::List(_)) => {
            err_fmt!("attribute must have form `#[model({})]` or `#[model({} = bool)]`", key, key)
        }
        None => Ok(false),
    }
}

/// Rejects `#[model(...)]` items not listed in `allowed`, so that typos
/// don't go unnoticed. A bare `#[model]` or `#[model = ...]` is an error too.
pub fn check_model_keys(attrs: &[Attribute], allowed: &[&str]) -> Result<()> {
    for attr in attrs {
        match attr.interpret_meta() {
            Some(Meta::Word(ref ident)) if ident == "model" => return err_fmt!(
                "bare `#[model]` attribute; expected `#[model(...)]` with one of {:?}", allowed
            ),
            Some(Meta::NameValue(ref name_value)) if name_value.ident == "model" => return err_fmt!(
                "`#[model = ...]` is not supported; expected `#[model(...)]` with one of {:?}",
                allowed
            ),
            _ => {}
        }
    }

    for nested in nested_metas(attrs, "model") {
        let key = match nested {
            NestedMeta::Meta(ref meta) => meta_key(meta),
            NestedMeta::Literal(_) => return err_fmt!(
                "`#[model(...)]` expects one of {:?}, not a literal", allowed
            ),
        };

        if !allowed.contains(&key.as_str()) {
            return err_fmt!("unknown key `{}` in `#[model(...)]`; expected one of {:?}",
                            key, allowed);
        }
    }

    Ok(())
}

/// Extracts a boolean value from an attribute value.
/// Returns `Err` if the value is not a `LitBool`.
pub fn value_as_bool(key: &str, lit: &Lit) -> Result<bool> {
    match *lit {
        Lit::Bool(ref lit) => Ok(lit.value),
        _ => err_fmt!("value for key `{}` must be a bool", key)
    }
}

/// Extracts a string value from an attribute value.
/// Returns `Err` if the value is not a `LitStr` nor a valid UTF-8 `LitByteStr`.
pub fn value_as_str(nv: &MetaNameValue) -> Result<String> {
    match nv.lit {
        Lit::Str(ref string) => Ok(string.value()),
        Lit::ByteStr(ref string) => {
            String::from_utf8(string.value()).map_err(Into::into)
        }
        _ => err_fmt!("value for key `{}` must be a valid UTF-8 string",
                      nv.ident.to_string())
    }
}
