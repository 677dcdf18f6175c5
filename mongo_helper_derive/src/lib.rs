//! This crate only contains the `#[derive(Model)]` proc-macro for
//! `mongo_helper`. For documentation, please see the main
//! [`mongo_helper`][1] crate.
//!
//! The derive reads the following attributes:
//!
//! * `#[model(name = "...")]` on the struct names the model and its
//!   collection. Without it, `#[serde(rename = "...")]` is used, and
//!   failing that, the name of the struct itself.
//! * `#[model(unique)]` and `#[model(immutable)]` on a field. Both also
//!   accept an explicit boolean, e.g. `#[model(unique = false)]`.
//! * Serde's `rename`, `rename_all`, `skip` and `skip_serializing`, so
//!   that field names match the serialized documents. For the split
//!   `rename(serialize = "...", deserialize = "...")` form, the
//!   `serialize` name is the one stored.
//!
//! The `_id` field is always immutable.
//!
//! [1]: https://docs.rs/mongo_helper

#![crate_type = "proc-macro"]
#![doc(html_root_url = "https://docs.rs/mongo_helper_derive/0.1.0")]
#![deny(missing_debug_implementations, missing_copy_implementations,
        trivial_casts, trivial_numeric_casts,
        unsafe_code,
        unstable_features,
        unused_import_braces, unused_qualifications,
        /* missing_docs (https://github.com/rust-lang/rust/issues/42008) */)]
#![allow(clippy::single_match, clippy::match_same_arms, clippy::match_ref_pats,
         clippy::clone_on_ref_ptr, clippy::needless_pass_by_value)]
#![deny(clippy::wrong_pub_self_convention, clippy::used_underscore_binding,
        clippy::similar_names, clippy::pub_enum_variant_names,
        clippy::missing_docs_in_private_items,
        clippy::non_ascii_literal, clippy::unicode_not_nfc,
        clippy::result_unwrap_used, clippy::option_unwrap_used,
        clippy::option_map_unwrap_or_else, clippy::option_map_unwrap_or,
        clippy::int_plus_one, clippy::string_add_assign, clippy::if_not_else,
        clippy::invalid_upcast_comparisons,
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap, clippy::cast_possible_truncation,
        clippy::mutex_integer, clippy::mut_mut, clippy::items_after_statements,
        clippy::print_stdout, clippy::mem_forget, clippy::maybe_infinite_iter)]

#[macro_use]
extern crate quote;
extern crate syn;
extern crate proc_macro;
extern crate proc_macro2;

#[macro_use]
mod error;
mod meta;
mod case;
mod field;

use proc_macro::TokenStream;
use syn::{ DeriveInput, Data, Attribute, Ident };
use self::meta::CONTAINER_KEYS;
use self::field::collect_fields;
use self::error::Result;

/// The top-level entry point of this proc-macro. Only here to be exported
/// and to handle `Result::Err` return values by `panic!()`ing.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    impl_model(input).unwrap_or_else(|error| panic!("{}", error))
}

/// Implements `Model` for the specified type.
fn impl_model(input: TokenStream) -> Result<TokenStream> {
    let parsed_ast: DeriveInput = syn::parse(input)?;
    let ty = parsed_ast.ident;

    if !parsed_ast.generics.params.is_empty() {
        return err_fmt!("`{}` can't be a model: generic models are not supported", ty);
    }

    meta::check_model_keys(&parsed_ast.attrs, CONTAINER_KEYS)?;

    let fields = match parsed_ast.data {
        Data::Struct(ref s) => collect_fields(&parsed_ast.attrs, &s.fields)?,
        _ => return err_fmt!(
            "`{}` can't be a model: only `struct`s map to top-level documents", ty
        ),
    };

    let model_name = model_name(&ty, &parsed_ast.attrs)?;
    let field_names = fields.iter().map(|f| &f.name);
    let uniques = fields.iter().map(|f| f.unique);
    let mutables = fields.iter().map(|f| f.mutable);

    let generated = quote! {
        impl ::mongo_helper::model::Model for #ty {
            const NAME: &'static str = #model_name;

            fn fields() -> ::std::vec::Vec<::mongo_helper::field::FieldDescriptor> {
                vec![
                    #(::mongo_helper::field::FieldDescriptor::new(#field_names, #uniques, #mutables),)*
                ]
            }
        }
    };

    Ok(generated.into())
}

/// The name of the model, and of its collection.
fn model_name(ty: &Ident, attrs: &[Attribute]) -> Result<String> {
    let name = match meta::model_name_value(attrs, "name")? {
        Some(nv) => meta::value_as_str(&nv)?,
        None => match meta::serde_name_value(attrs, "rename")? {
            Some(nv) => meta::value_as_str(&nv)?,
            None => ty.to_string().trim_start_matches("r#").to_owned(),
        },
    };

    if name.is_empty() {
        err_fmt!("`{}` can't be a model: its name must not be empty", ty)
    } else {
        Ok(name)
    }
}
