//! The most commonly used traits and types of this crate, plus the ones
//! from crates `bson` and `mongodb` that you will need alongside them.

pub use crate::{
    helper::MongoHelper,
    config::HelperConfig,
    schema::{ SchemaHolder, SchemaBuilder, Schema, AnyModel },
    model::{ Model, ModelMeta, ModelDescriptor },
    field::{ FieldDescriptor, FieldFlags },
    coll::{ Collection, UpdateOneResult, UpdateManyResult },
    cursor::Cursor,
    ops::*,
    error::ErrorExt,
    error::Error as MongoHelperError,
    error::ErrorKind as MongoHelperErrorKind,
    error::Result as MongoHelperResult,
};
pub use bson::{ Bson, Document, oid::ObjectId, doc, bson };
pub use mongodb::{
    Client, ClientOptions, ThreadedClient,
    db::{ Database, ThreadedDatabase },
    coll::options::{ IndexModel, IndexOptions, FindOptions },
};
