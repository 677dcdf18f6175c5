//! # mongo_helper: typed model operations on top of MongoDB
//!
//! This library lets you describe your domain types once and get a typed
//! set of create, find, update and delete operations for each of them,
//! bound to a MongoDB collection named after the model.
//!
//! ### The Prelude
//!
//! The most frequently used traits and types of this crate, as well as of
//! the `mongodb` and `bson` crates, are re-exported from
//! [`prelude`](prelude/index.html):
//!
//! ```rust
//! #[macro_use]
//! extern crate mongo_helper_derive;
//! extern crate mongo_helper;
//!
//! use mongo_helper::prelude::*;
//! #
//! # fn main() {}
//! ```
//!
//! ### Models
//!
//! A model is a `Serialize + Deserialize` struct stored as top-level
//! documents of its own collection. The [`Model`](model/trait.Model.html)
//! trait names the model (and thus the collection) and lists its fields.
//! Each field may be **unique**, meaning its values are expected not to
//! repeat across the collection, and **immutable**, meaning update
//! operations are not allowed to touch it.
//!
//! Deriving is the usual way. Field names follow Serde's renaming rules,
//! and the `_id` field is always immutable:
//!
//! ```
//! # #[macro_use]
//! # extern crate serde_derive;
//! # #[macro_use]
//! # extern crate mongo_helper_derive;
//! # extern crate mongo_helper;
//! #
//! # use mongo_helper::prelude::*;
//! #
//! #[derive(Debug, Serialize, Deserialize, Model)]
//! #[model(name = "users")]
//! #[serde(rename_all = "camelCase")]
//! struct User {
//!     #[serde(rename = "_id")]
//!     id: ObjectId,
//!     #[model(unique, immutable)]
//!     user_name: String,
//!     #[model(unique)]
//!     email: String,
//!     display_name: String,
//! }
//!
//! # fn main() -> MongoHelperResult<()> {
//! let meta = ModelMeta::of::<User>()?;
//!
//! assert_eq!(User::NAME, "users");
//! assert_eq!(meta.uniques(), ["userName", "email"]);
//! assert!(!meta.field("_id").map_or(true, FieldDescriptor::is_mutable));
//! #
//! # Ok(())
//! # }
//! ```
//!
//! Implementing the trait by hand gives full control, including extra
//! indexes and per-operation driver options:
//!
//! ```
//! # #[macro_use]
//! # extern crate serde_derive;
//! # extern crate mongo_helper;
//! #
//! # use mongo_helper::prelude::*;
//! #
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Order {
//!     number: u32,
//!     customer: String,
//! }
//!
//! impl Model for Order {
//!     const NAME: &'static str = "orders";
//!
//!     fn fields() -> Vec<FieldDescriptor> {
//!         vec![
//!             FieldDescriptor::new("number", true, false),
//!             FieldDescriptor::new("customer", false, true),
//!         ]
//!     }
//!
//!     fn indexes() -> Vec<IndexModel> {
//!         vec![
//!             IndexModel {
//!                 keys: doc!{ "customer": 1 },
//!                 options: IndexOptions::default(),
//!             }
//!         ]
//!     }
//! }
//! #
//! # fn main() {}
//! ```
//!
//! ### Schemas and Operations
//!
//! A [`SchemaHolder`](schema/struct.SchemaHolder.html) binds a set of
//! models to a database. It keeps one
//! [`ModelDescriptor`](model/struct.ModelDescriptor.html) per model, which
//! in turn creates the model's [`Operations`](ops/struct.Operations.html)
//! on first use and hands out the same instance afterwards.
//!
//! ```no_run
//! # #[macro_use]
//! # extern crate serde_derive;
//! # #[macro_use]
//! # extern crate mongo_helper_derive;
//! # #[macro_use]
//! # extern crate mongo_helper;
//! #
//! # use mongo_helper::prelude::*;
//! # use mongo_helper::{ filters, updates };
//! #
//! #[derive(Debug, Serialize, Deserialize, Model)]
//! #[model(name = "products")]
//! struct Product {
//!     #[model(unique, immutable)]
//!     sku: String,
//!     price: u32,
//!     stock: u32,
//! }
//!
//! schema!(Shop { Product });
//!
//! # fn main() -> MongoHelperResult<()> {
//! let helper = MongoHelper::connect("localhost", 27017)?;
//! let schema = helper.load::<Shop>("shop")?;
//! schema.create_indexes()?;
//!
//! let products = schema.operations::<Product>()?;
//!
//! products.create().many(vec![
//!     Product { sku: "A-1".into(), price: 100, stock: 5 },
//!     Product { sku: "B-2".into(), price: 250, stock: 0 },
//! ])?;
//!
//! let in_stock = products.find().count(doc!{ "stock": { "$gt": 0 } })?;
//! assert_eq!(in_stock, 1);
//!
//! products.update().set_by_unique("B-2", "stock", &10)?;
//! products.update().many(doc!{}, updates::inc("price", &5)?)?;
//!
//! let b2 = products.find().unique_or_err(filters::eq("sku", "B-2")?)?;
//! assert_eq!((b2.price, b2.stock), (255, 10));
//!
//! // The SKU is immutable, so this is rejected before reaching the server.
//! assert!(products.update().set_by_unique("A-1", "sku", "A-2").is_err());
//!
//! assert!(products.delete().by_unique("A-1")?);
//! #
//! # Ok(())
//! # }
//! ```
//!
//! ### Configuration
//!
//! [`HelperConfig`](config/struct.HelperConfig.html) describes the
//! connection in JSON; [`MongoHelper::from_config`](helper/struct.MongoHelper.html#method.from_config)
//! connects accordingly.
//!
//! ### Logging
//!
//! The library logs through the `log` facade: model registration and index
//! creation at `debug` level, every collection operation at `trace` level.
//! Install any logger implementation in your binary to see them.

#![doc(html_root_url = "https://docs.rs/mongo_helper/0.1.0")]
#![deny(missing_debug_implementations, missing_copy_implementations,
        trivial_casts, trivial_numeric_casts,
        unsafe_code,
        unstable_features,
        anonymous_parameters, bare_trait_objects,
        variant_size_differences,
        unused_import_braces, unused_qualifications, missing_docs)]
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
        clippy::cast_precision_loss, clippy::cast_lossless,
        clippy::cast_possible_wrap, clippy::cast_possible_truncation,
        clippy::mutex_integer, clippy::mut_mut, clippy::items_after_statements,
        clippy::print_stdout, clippy::mem_forget, clippy::maybe_infinite_iter)]

#[macro_use]
extern crate bitflags;
extern crate mongodb;
#[macro_use]
extern crate bson;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;
extern crate serde;
extern crate serde_json;
extern crate backtrace;
extern crate typemap;
extern crate once_cell;

pub mod error;
pub mod field;
pub mod model;
pub mod coll;
pub mod cursor;
pub mod filters;
pub mod updates;
pub mod ops;
pub mod schema;
pub mod helper;
pub mod config;
pub mod bsn;
pub mod utils;
pub mod prelude;
