//! Queries: general ones and lookups by unique field.

use serde::Serialize;
use bson::Document;
use crate::{
    cursor::Cursor,
    model::Model,
    filters,
    error::{ Error, ErrorKind, Result },
};
use super::{ Operation, OperationBase };

/// General queries.
pub trait FindMany<M: Model>: Operation<M> {
    /// All documents matching `filter`.
    fn many(&self, filter: Document) -> Result<Cursor<M>>;

    /// The first document matching `filter`, if any.
    fn first(&self, filter: Document) -> Result<Option<M>>;

    /// The number of documents matching `filter`.
    fn count(&self, filter: Document) -> Result<usize>;

    /// Every document of the collection.
    fn all(&self) -> Result<Cursor<M>> {
        self.many(Document::new())
    }

    /// All documents whose `field` equals `value`.
    fn by<V: Serialize + ?Sized>(&self, field: &str, value: &V) -> Result<Cursor<M>> {
        self.many(filters::eq(field, value)?)
    }

    /// Whether any document matches `filter`.
    fn exists(&self, filter: Document) -> Result<bool> {
        self.first(filter).map(|found| found.is_some())
    }
}

/// Lookups expected to match at most one document.
pub trait FindUnique<M: Model>: Operation<M> {
    /// The document matching `filter`, if any.
    fn unique(&self, filter: Document) -> Result<Option<M>>;

    /// The document whose `field` equals `value`, if any.
    fn unique_by<V: Serialize + ?Sized>(&self, field: &str, value: &V) -> Result<Option<M>> {
        self.unique(filters::eq(field, value)?)
    }

    /// The document whose first unique field equals `value`, if any.
    /// Fails with `MissingUniqueField` if the model has no unique field.
    fn unique_by_unique<V: Serialize + ?Sized>(&self, value: &V) -> Result<Option<M>> {
        self.unique(self.unique_filter(value)?)
    }

    /// Like `unique()`, but a missing document is a `NotFound` error.
    fn unique_or_err(&self, filter: Document) -> Result<M> {
        let message = format!("failed to find data matching {}", filter);

        self.unique(filter)?.ok_or_else(
            || Error::new(ErrorKind::NotFound, message).for_model(M::NAME)
        )
    }

    /// Like `unique_by()`, but a missing document is a `NotFound` error.
    fn unique_by_or_err<V: Serialize + ?Sized>(&self, field: &str, value: &V) -> Result<M> {
        self.unique_or_err(filters::eq(field, value)?)
    }
}

/// Query facade of model `M`.
pub struct FindOperations<M: Model> {
    /// Metadata and collection handle.
    pub(super) base: OperationBase<M>,
}

impl<M: Model> FindMany<M> for FindOperations<M> {
    fn many(&self, filter: Document) -> Result<Cursor<M>> {
        self.collection().find_many(filter)
    }

    fn first(&self, filter: Document) -> Result<Option<M>> {
        self.collection().find_one(filter)
    }

    fn count(&self, filter: Document) -> Result<usize> {
        self.collection().count(filter)
    }
}

impl<M: Model> FindUnique<M> for FindOperations<M> {
    fn unique(&self, filter: Document) -> Result<Option<M>> {
        self.collection().find_one(filter)
    }
}
