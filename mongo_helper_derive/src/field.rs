//! Collecting the serialized fields of a model struct.

use syn::{ Field, Fields, Attribute };
use crate::{
    case::RenameRule,
    meta::{ self, FIELD_KEYS },
    error::Result,
};

/// The key MongoDB stores the primary key under. It can never be updated.
const ID_FIELD: &str = "_id";

/// A struct field as it appears in the stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedField {
    /// Serialized name.
    pub name: String,
    /// `#[model(unique)]`.
    pub unique: bool,
    /// Neither `#[model(immutable)]` nor the `_id` field.
    pub mutable: bool,
}

/// Collects the serialized fields of a struct, honoring the container's
/// `#[serde(rename_all = "...")]` attribute.
pub fn collect_fields(container_attrs: &[Attribute], fields: &Fields) -> Result<Vec<SerializedField>> {
    let named = match *fields {
        Fields::Named(ref named) => &named.named,
        Fields::Unnamed(_) => return err_fmt!(
            "tuple structs can't be models; their documents would have no field names"
        ),
        Fields::Unit => return err_fmt!(
            "unit structs can't be models; a document needs at least an `_id` field"
        ),
    };

    let rename_all = match meta::serde_name_value(container_attrs, "rename_all")? {
        Some(nv) => Some(meta::value_as_str(&nv)?.parse::<RenameRule>()?),
        None => None,
    };

    let mut collected = Vec::with_capacity(named.len());

    for field in named {
        if let Some(serialized) = serialized_field(field, rename_all)? {
            collected.push(serialized);
        }
    }

    Ok(collected)
}

/// A single serialized field, or `None` if it is never serialized.
fn serialized_field(field: &Field, rename_all: Option<RenameRule>) -> Result<Option<SerializedField>> {
    meta::check_model_keys(&field.attrs, FIELD_KEYS)?;

    if meta::has_serde_word(&field.attrs, "skip")?
        || meta::has_serde_word(&field.attrs, "skip_serializing")? {
        return Ok(None);
    }

    if meta::has_serde_word(&field.attrs, "flatten")? {
        return err_fmt!("`#[serde(flatten)]` fields are not supported in models");
    }

    let name = serialized_name(field, rename_all)?;
    let unique = meta::model_flag(&field.attrs, "unique")?;
    let mutable = name != ID_FIELD && !meta::model_flag(&field.attrs, "immutable")?;

    Ok(Some(SerializedField { name, unique, mutable }))
}

/// The name of a field in the serialized document.
fn serialized_name(field: &Field, rename_all: Option<RenameRule>) -> Result<String> {
    if let Some(nv) = meta::serde_name_value(&field.attrs, "rename")? {
        return meta::value_as_str(&nv);
    }

    let ident = match field.ident {
        Some(ref ident) => ident.to_string(),
        None => return err_fmt!("model fields must be named"),
    };
    let name = ident.trim_start_matches("r#").to_owned();

    Ok(match rename_all {
        Some(rule) => rule.apply_to_field(name),
        None => name,
    })
}
