//! Models, their cached metadata, and per-model descriptors.

use std::any::type_name;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;
use std::fmt;
use serde::{ Serialize, Deserialize };
use bson::{ Bson, Document };
use mongodb::common::WriteConcern;
use mongodb::coll::options::{
    IndexModel,
    IndexOptions,
    FindOptions,
    CountOptions,
    InsertManyOptions,
};
use mongodb::db::{ Database, ThreadedDatabase };
use once_cell::sync::OnceCell;
use crate::{
    coll::Collection,
    field::FieldDescriptor,
    ops::Operations,
    error::{ Error, ErrorKind, Result },
};

/// Update operators understood by the server.
const UPDATE_OPERATORS: &[&str] = &[
    "$set", "$unset", "$setOnInsert", "$inc", "$mul", "$min", "$max",
    "$rename", "$currentDate", "$push", "$pull", "$pullAll", "$addToSet",
    "$pop", "$bit",
];

/// Implemented by every type stored as a top-level document of its own
/// collection. Usually `#[derive(Model)]`d, which fills in `NAME` and
/// `fields()` from the struct definition and its `#[model(...)]` and
/// `#[serde(...)]` attributes.
pub trait Model: Serialize + for<'a> Deserialize<'a> + 'static {
    /// The name of the model, which is also the name of its collection.
    const NAME: &'static str;

    /// The serialized fields of the model, in declaration order.
    fn fields() -> Vec<FieldDescriptor>;

    /// Indexes created in addition to the ones backing unique fields.
    fn indexes() -> Vec<IndexModel> {
        Vec::new()
    }

    /// Options for a count-only query.
    fn count_options() -> CountOptions {
        Default::default()
    }

    /// Options for a regular query.
    fn query_options() -> FindOptions {
        Default::default()
    }

    /// Options for single and batch insertions.
    fn insert_options() -> InsertManyOptions {
        Default::default()
    }

    /// Options for a (strictly non-upsert) update operation.
    fn update_options() -> WriteConcern {
        Default::default()
    }

    /// Options for a delete operation.
    fn delete_options() -> WriteConcern {
        Default::default()
    }
}

/// Everything known about a model that does not depend on a database
/// connection: its name, its fields, and which of them are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMeta {
    /// Model and collection name.
    name: &'static str,
    /// Name of the Rust type implementing the model.
    type_name: &'static str,
    /// Names of the unique fields, in declaration order.
    uniques: Vec<String>,
    /// All fields, by serialized name.
    fields: BTreeMap<String, FieldDescriptor>,
}

impl ModelMeta {
    /// Collects the metadata of model `M`.
    pub fn of<M: Model>() -> Result<Self> {
        if M::NAME.is_empty() {
            return Err(Error::new(
                ErrorKind::IllFormedModel,
                format!("model type `{}` has an empty name", type_name::<M>())
            ));
        }

        let mut uniques = Vec::new();
        let mut fields = BTreeMap::new();

        for field in M::fields() {
            match fields.entry(field.name().to_owned()) {
                Entry::Occupied(entry) => return Err(Error::new(
                    ErrorKind::DuplicateField,
                    format!("field `{}` is declared more than once", entry.key())
                ).for_model(M::NAME)),
                Entry::Vacant(entry) => {
                    if field.is_unique() {
                        uniques.push(field.name().to_owned());
                    }
                    entry.insert(field);
                }
            }
        }

        Ok(ModelMeta {
            name: M::NAME,
            type_name: type_name::<M>(),
            uniques,
            fields,
        })
    }

    /// The model (and collection) name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The name of the Rust type backing the model.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Names of the unique fields, in declaration order.
    pub fn uniques(&self) -> &[String] {
        &self.uniques
    }

    /// All fields of the model, keyed by serialized name.
    pub fn fields(&self) -> &BTreeMap<String, FieldDescriptor> {
        &self.fields
    }

    /// Looks up a single field by serialized name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// The field used by unique-value convenience lookups.
    pub fn first_unique_field_name(&self) -> Result<&str> {
        self.uniques.first().map(String::as_str).ok_or_else(|| Error::new(
            ErrorKind::MissingUniqueField,
            format!("model `{}` has no unique field", self.name)
        ).for_model(self.name))
    }

    /// Ensures that `update` only consists of known update operators, each
    /// with at least one target, and that none of them touches an immutable
    /// field. Fields not declared on the model are let through.
    pub fn check_update(&self, update: &Document) -> Result<()> {
        if update.is_empty() {
            return Err(self.ill_formed_update("update document is empty"));
        }

        for (operator, operand) in update.iter() {
            if !operator.starts_with('$') {
                return Err(self.ill_formed_update(format!(
                    "`{}` is not an update operator; replacing documents is not supported",
                    operator
                )));
            }

            if !UPDATE_OPERATORS.contains(&operator.as_str()) {
                return Err(self.ill_formed_update(format!(
                    "unknown update operator `{}`", operator
                )));
            }

            let targets = match *operand {
                Bson::Document(ref targets) => targets,
                _ => return Err(self.ill_formed_update(format!(
                    "operand of `{}` must be a document", operator
                ))),
            };

            if targets.is_empty() {
                return Err(self.ill_formed_update(format!(
                    "`{}` has no target fields", operator
                )));
            }

            for (path, value) in targets.iter() {
                self.check_mutable(operator, path)?;

                // `$rename` writes to the field named by its value, too.
                if operator == "$rename" {
                    if let Bson::String(ref new_path) = *value {
                        self.check_mutable(operator, new_path)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Fails if the top-level field of `path` is a declared immutable field.
    fn check_mutable(&self, operator: &str, path: &str) -> Result<()> {
        let root = path.split('.').next().unwrap_or(path);

        match self.fields.get(root) {
            Some(field) if !field.is_mutable() => Err(Error::new(
                ErrorKind::ImmutableField,
                format!("`{}` can't modify immutable field `{}`", operator, root)
            ).for_model(self.name)),
            _ => Ok(()),
        }
    }

    /// Helper for building an `IllFormedUpdate` error.
    fn ill_formed_update<S: Into<String>>(&self, message: S) -> Error {
        Error::new(ErrorKind::IllFormedUpdate, message.into()).for_model(self.name)
    }

    /// One unique, ascending index per unique field.
    pub fn unique_indexes(&self) -> Vec<IndexModel> {
        self.uniques
            .iter()
            .map(|name| {
                let mut keys = Document::new();
                keys.insert(name.clone(), Bson::I32(1));

                IndexModel {
                    keys,
                    options: IndexOptions {
                        name: Some(format!("{}_unique", name)),
                        unique: Some(true),
                        ..Default::default()
                    },
                }
            })
            .collect()
    }
}

/// The cached, per-model descriptor: metadata, the collection handle,
/// and the lazily created operations facade.
pub struct ModelDescriptor<M: Model> {
    /// Connection-independent metadata, shared with the operations.
    meta: Arc<ModelMeta>,
    /// The collection named after the model.
    collection: Collection<M>,
    /// The database the collection lives in.
    database: Database,
    /// Created on first use, then reused.
    operations: OnceCell<Operations<M>>,
}

impl<M: Model> ModelDescriptor<M> {
    /// Builds the descriptor of `M`, bound to its collection in `database`.
    pub fn of(database: &Database) -> Result<Self> {
        let meta = ModelMeta::of::<M>()?;

        debug!("loaded model `{}` ({}): {} field(s), unique: {:?}",
               meta.name(), meta.type_name(), meta.fields().len(), meta.uniques());

        if meta.uniques().is_empty() {
            warn!("model `{}` has no unique field; unique-value lookups will fail", M::NAME);
        }

        Ok(ModelDescriptor {
            meta: Arc::new(meta),
            collection: database.collection(M::NAME).into(),
            database: database.clone(),
            operations: OnceCell::new(),
        })
    }

    /// The connection-independent metadata.
    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    /// The model (and collection) name.
    pub fn model_name(&self) -> &'static str {
        self.meta.name()
    }

    /// Names of the unique fields, in declaration order.
    pub fn uniques(&self) -> &[String] {
        self.meta.uniques()
    }

    /// All fields of the model, keyed by serialized name.
    pub fn fields(&self) -> &BTreeMap<String, FieldDescriptor> {
        self.meta.fields()
    }

    /// The typed collection handle.
    pub fn collection(&self) -> &Collection<M> {
        &self.collection
    }

    /// The database owning the collection.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// The operations facade of this model. It is created on the first
    /// call; every later call returns the same instance.
    pub fn operations(&self) -> &Operations<M> {
        self.operations.get_or_init(|| {
            debug!("creating operations for model `{}`", M::NAME);
            Operations::new(Arc::clone(&self.meta), self.collection.clone())
        })
    }

    /// Creates the indexes backing the unique fields, plus any additional
    /// indexes requested by `M::indexes()`.
    pub fn create_indexes(&self) -> Result<()> {
        let mut indexes = self.meta.unique_indexes();
        indexes.extend(M::indexes());
        self.collection.create_indexes(indexes)
    }
}

impl<M: Model> fmt::Debug for ModelDescriptor<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ModelDescriptor")
            .field("meta", &self.meta)
            .field("collection", &self.collection)
            .field("operations_created", &self.operations.get().is_some())
            .finish()
    }
}
