//! Deletion of documents.

use serde::Serialize;
use bson::Document;
use crate::{
    model::Model,
    error::Result,
};
use super::{ Operation, OperationBase };

/// Deletion of a single document.
pub trait DeleteOne<M: Model>: Operation<M> {
    /// Deletes the first document matching `filter`.
    /// Returns `true` if one was found and deleted.
    fn one(&self, filter: Document) -> Result<bool>;

    /// Deletes the first document matching `filter` and returns it.
    fn one_and_get(&self, filter: Document) -> Result<Option<M>>;

    /// Deletes the document whose first unique field equals `value`.
    fn by_unique<V: Serialize + ?Sized>(&self, value: &V) -> Result<bool> {
        self.one(self.unique_filter(value)?)
    }
}

/// Deletion of every matching document.
pub trait DeleteMany<M: Model>: Operation<M> {
    /// Deletes all documents matching `filter`, returning their number.
    fn many(&self, filter: Document) -> Result<usize>;

    /// Empties the collection, returning the number of deleted documents.
    fn all(&self) -> Result<usize> {
        self.many(Document::new())
    }
}

/// Deletion facade of model `M`.
pub struct DeleteOperations<M: Model> {
    /// Metadata and collection handle.
    pub(super) base: OperationBase<M>,
}

impl<M: Model> DeleteOne<M> for DeleteOperations<M> {
    fn one(&self, filter: Document) -> Result<bool> {
        self.collection().delete_one(filter)
    }

    fn one_and_get(&self, filter: Document) -> Result<Option<M>> {
        self.collection().find_one_and_delete(filter)
    }
}

impl<M: Model> DeleteMany<M> for DeleteOperations<M> {
    fn many(&self, filter: Document) -> Result<usize> {
        self.collection().delete_many(filter)
    }
}
