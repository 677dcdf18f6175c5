//! Typed operation facades of a model: create, find (including unique
//! lookups), update and delete.
//!
//! Every facade implements [`Operation`](trait.Operation.html), which
//! gives access to the model metadata and the collection. The verbs
//! themselves live in small traits (`CreateOne`, `FindUnique`, ...) whose
//! convenience methods are provided in terms of one or two required
//! methods, so bring them into scope via the prelude.

mod create;
mod find;
mod update;
mod delete;

use std::fmt;
use std::sync::Arc;
use serde::Serialize;
use bson::Document;
use crate::{
    coll::Collection,
    model::{ Model, ModelMeta },
    filters,
    error::Result,
};

pub use self::create::{ CreateOne, CreateMany, CreateOperations };
pub use self::find::{ FindMany, FindUnique, FindOperations };
pub use self::update::{ UpdateOne, UpdateMany, UpdateOperations };
pub use self::delete::{ DeleteOne, DeleteMany, DeleteOperations };

/// The state shared by all operation facades of one model.
pub struct OperationBase<M: Model> {
    /// Metadata of the model, shared with its descriptor.
    meta: Arc<ModelMeta>,
    /// The collection the operations are issued against.
    collection: Collection<M>,
}

impl<M: Model> OperationBase<M> {
    /// Bundles the metadata and the collection handle.
    pub fn new(meta: Arc<ModelMeta>, collection: Collection<M>) -> Self {
        OperationBase { meta, collection }
    }
}

impl<M: Model> Clone for OperationBase<M> {
    fn clone(&self) -> Self {
        OperationBase {
            meta: Arc::clone(&self.meta),
            collection: self.collection.clone(),
        }
    }
}

impl<M: Model> fmt::Debug for OperationBase<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("OperationBase")
            .field("model", &self.meta.name())
            .field("collection", &self.collection)
            .finish()
    }
}

/// Common interface of the operation facades of model `M`.
pub trait Operation<M: Model> {
    /// The shared state backing this facade.
    fn base(&self) -> &OperationBase<M>;

    /// Metadata of the model.
    fn meta(&self) -> &ModelMeta {
        &self.base().meta
    }

    /// The collection handle operations are delegated to.
    fn collection(&self) -> &Collection<M> {
        &self.base().collection
    }

    /// The first unique field of the model, in declaration order.
    fn first_unique_field_name(&self) -> Result<&str> {
        self.meta().first_unique_field_name()
    }

    /// Filter matching `value` in the first unique field.
    fn unique_filter<V: Serialize + ?Sized>(&self, value: &V) -> Result<Document> {
        filters::eq(self.first_unique_field_name()?, value)
    }
}

/// Implements `Operation` and `Debug` for a facade wrapping an `OperationBase`.
macro_rules! impl_operation {
    ($($ty:ident,)*) => {$(
        impl<M: Model> Operation<M> for $ty<M> {
            fn base(&self) -> &OperationBase<M> {
                &self.base
            }
        }

        impl<M: Model> ::std::fmt::Debug for $ty<M> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}<{}>", stringify!($ty), M::NAME)
            }
        }
    )*}
}

impl_operation! {
    CreateOperations,
    FindOperations,
    UpdateOperations,
    DeleteOperations,
}

/// All operation facades of one model. Obtained from
/// `ModelDescriptor::operations()`, which creates it once and caches it.
pub struct Operations<M: Model> {
    /// Insertions.
    create: CreateOperations<M>,
    /// Queries and unique lookups.
    find: FindOperations<M>,
    /// Updates.
    update: UpdateOperations<M>,
    /// Deletions.
    delete: DeleteOperations<M>,
}

impl<M: Model> Operations<M> {
    /// Creates every facade over the same metadata and collection.
    pub fn new(meta: Arc<ModelMeta>, collection: Collection<M>) -> Self {
        let base = OperationBase::new(meta, collection);

        Operations {
            create: CreateOperations { base: base.clone() },
            find: FindOperations { base: base.clone() },
            update: UpdateOperations { base: base.clone() },
            delete: DeleteOperations { base },
        }
    }

    /// Insertions.
    pub fn create(&self) -> &CreateOperations<M> {
        &self.create
    }

    /// Queries, including unique-field lookups.
    pub fn find(&self) -> &FindOperations<M> {
        &self.find
    }

    /// Updates of existing documents.
    pub fn update(&self) -> &UpdateOperations<M> {
        &self.update
    }

    /// Deletions.
    pub fn delete(&self) -> &DeleteOperations<M> {
        &self.delete
    }
}

impl<M: Model> fmt::Debug for Operations<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Operations<{}>", M::NAME)
    }
}
