//! The schema holder: the database handle together with one cached
//! descriptor per registered model.

use std::any::{ Any, TypeId };
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::fmt;
use mongodb::db::{ Database, ThreadedDatabase };
use crate::{
    model::{ Model, ModelMeta, ModelDescriptor },
    ops::Operations,
    error::{ Error, ErrorKind, Result },
};

/// Type-erased view of a `ModelDescriptor`, for resolving models by name.
pub trait AnyModel: Any + Send + Sync + fmt::Debug {
    /// Metadata of the model.
    fn meta(&self) -> &ModelMeta;

    /// Creates the indexes of the model's collection.
    fn create_indexes(&self) -> Result<()>;

    /// Upcast for downcasting to the concrete `ModelDescriptor<M>`.
    fn as_any(&self) -> &dyn Any;
}

impl<M: Model> AnyModel for ModelDescriptor<M> where ModelDescriptor<M>: Send + Sync {
    fn meta(&self) -> &ModelMeta {
        ModelDescriptor::meta(self)
    }

    fn create_indexes(&self) -> Result<()> {
        ModelDescriptor::create_indexes(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A group of models loaded together, e.g. all models of an application.
/// The [`schema!`](../macro.schema.html) macro declares one conveniently.
pub trait Schema {
    /// Adds every model of the schema to `builder`.
    fn register(builder: SchemaBuilder) -> SchemaBuilder;
}

/// Declares a type implementing [`Schema`](schema/trait.Schema.html)
/// for a fixed list of models.
///
/// ```
/// # #[macro_use]
/// # extern crate mongo_helper;
/// # #[macro_use]
/// # extern crate serde_derive;
/// #
/// # use mongo_helper::prelude::*;
/// #
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Note {
///     text: String,
/// }
///
/// impl Model for Note {
///     const NAME: &'static str = "notes";
///
///     fn fields() -> Vec<FieldDescriptor> {
///         vec![FieldDescriptor::new("text", true, true)]
///     }
/// }
///
/// schema!(pub AppSchema { Note });
/// #
/// # fn main() {}
/// ```
#[macro_export]
macro_rules! schema {
    ($vis:vis $name:ident { $($model:ty),* $(,)* }) => {
        /// Generated schema type listing its models.
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $name;

        impl $crate::schema::Schema for $name {
            fn register(builder: $crate::schema::SchemaBuilder) -> $crate::schema::SchemaBuilder {
                builder $(.model::<$model>())*
            }
        }
    }
}

/// Collects model registrations before building a `SchemaHolder`.
pub struct SchemaBuilder {
    /// The database the models' collections live in.
    database: Database,
    /// Descriptors built so far, with their Rust type.
    models: Vec<(TypeId, Result<Arc<dyn AnyModel>>)>,
}

impl SchemaBuilder {
    /// Starts an empty schema over `database`.
    pub fn new(database: Database) -> Self {
        SchemaBuilder {
            database,
            models: Vec::new(),
        }
    }

    /// Registers model `M`. Errors (e.g. invalid field metadata) are
    /// reported by `build()`.
    pub fn model<M: Model>(mut self) -> Self where ModelDescriptor<M>: Send + Sync {
        let descriptor = ModelDescriptor::<M>::of(&self.database)
            .map(|descriptor| -> Arc<dyn AnyModel> { Arc::new(descriptor) });

        self.models.push((TypeId::of::<M>(), descriptor));
        self
    }

    /// Registers every model of schema `S`.
    pub fn schema<S: Schema>(self) -> Self {
        S::register(self)
    }

    /// Finishes registration. Fails on the first invalid model, or if two
    /// registrations share a model name.
    pub fn build(self) -> Result<SchemaHolder> {
        let mut models: HashMap<&'static str, Arc<dyn AnyModel>> = HashMap::new();
        let mut names = HashMap::new();

        for (type_id, descriptor) in self.models {
            let descriptor = descriptor?;
            let name = descriptor.meta().name();

            match models.entry(name) {
                Entry::Occupied(entry) => {
                    return Err(Error::new(
                        ErrorKind::DuplicateModel,
                        format!("model name `{}` is used by both `{}` and `{}`",
                                name,
                                entry.get().meta().type_name(),
                                descriptor.meta().type_name())
                    ).for_model(name));
                }
                Entry::Vacant(entry) => {
                    entry.insert(descriptor);
                    names.insert(type_id, name);
                }
            }
        }

        debug!("schema for database `{}` holds {} model(s)", self.database.name, models.len());

        Ok(SchemaHolder {
            database: self.database,
            models,
            names,
        })
    }
}

impl fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("database", &self.database.name)
            .field("num_models", &self.models.len())
            .finish()
    }
}

/// Owns the database handle and one descriptor per model. Read-only once
/// built; share it by reference or inside an `Arc`.
pub struct SchemaHolder {
    /// The database the models' collections live in.
    database: Database,
    /// Descriptors by model name.
    models: HashMap<&'static str, Arc<dyn AnyModel>>,
    /// Model names by Rust type.
    names: HashMap<TypeId, &'static str>,
}

impl SchemaHolder {
    /// Starts registering models over `database`.
    pub fn builder(database: Database) -> SchemaBuilder {
        SchemaBuilder::new(database)
    }

    /// Loads every model of schema `S`.
    pub fn load<S: Schema>(database: Database) -> Result<Self> {
        Self::builder(database).schema::<S>().build()
    }

    /// The database handle.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Resolves the descriptor of model `M`.
    pub fn model<M: Model>(&self) -> Result<&ModelDescriptor<M>> {
        let name = self.names.get(&TypeId::of::<M>()).ok_or_else(|| Error::new(
            ErrorKind::UnknownModel,
            format!("model type `{}` is not registered", std::any::type_name::<M>())
        ))?;

        self.typed_model_by_name(name)
    }

    /// Resolves a model by name, without knowing its Rust type.
    pub fn model_by_name(&self, name: &str) -> Result<&dyn AnyModel> {
        self.models
            .get(name)
            .map(|descriptor| &**descriptor)
            .ok_or_else(|| Error::new(
                ErrorKind::UnknownModel,
                format!("no model named `{}` is registered", name)
            ))
    }

    /// Resolves a model by name as the descriptor of Rust type `M`.
    pub fn typed_model_by_name<M: Model>(&self, name: &str) -> Result<&ModelDescriptor<M>> {
        let descriptor = self.model_by_name(name)?;

        descriptor.as_any().downcast_ref().ok_or_else(|| Error::new(
            ErrorKind::ModelTypeMismatch,
            format!("model `{}` is of type `{}`, not `{}`",
                    name,
                    descriptor.meta().type_name(),
                    std::any::type_name::<M>())
        ).for_model(descriptor.meta().name()))
    }

    /// Shortcut for the cached operations of model `M`.
    pub fn operations<M: Model>(&self) -> Result<&Operations<M>> {
        self.model::<M>().map(ModelDescriptor::operations)
    }

    /// All registered models.
    pub fn models(&self) -> impl Iterator<Item = &dyn AnyModel> {
        self.models.values().map(|descriptor| &**descriptor)
    }

    /// The number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no model is registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Creates the indexes of every registered model.
    pub fn create_indexes(&self) -> Result<()> {
        for descriptor in self.models.values() {
            debug!("creating indexes of `{}`", descriptor.meta().name());
            descriptor.create_indexes()?;
        }

        Ok(())
    }

    /// Creates the collection of every registered model that does not exist
    /// yet, then the indexes of all of them.
    pub fn initialize(&self) -> Result<()> {
        let existing = self.database.collection_names(None)?;

        for name in self.models.keys() {
            if !existing.iter().any(|existing| existing.as_str() == *name) {
                debug!("creating collection `{}`", name);
                self.database.create_collection(name, None)?;
            }
        }

        self.create_indexes()
    }
}

impl fmt::Debug for SchemaHolder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names: Vec<_> = self.models.keys().collect();
        names.sort();

        f.debug_struct("SchemaHolder")
            .field("database", &self.database.name)
            .field("models", &names)
            .finish()
    }
}
