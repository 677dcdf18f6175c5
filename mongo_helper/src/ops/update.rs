//! Updates of existing documents by means of update operators.

use serde::Serialize;
use bson::Document;
use crate::{
    coll::{ UpdateOneResult, UpdateManyResult },
    model::Model,
    updates,
    error::Result,
};
use super::{ Operation, OperationBase };

/// Updates of a single document. Every update is checked against the
/// model's field metadata first: only update operators are accepted, and
/// immutable fields can't be touched.
pub trait UpdateOne<M: Model>: Operation<M> {
    /// Applies `update` to the first document matching `filter`.
    fn one(&self, filter: Document, update: Document) -> Result<UpdateOneResult>;

    /// Applies `update` to the first document matching `filter`, and
    /// returns that document in its updated state.
    fn one_and_get(&self, filter: Document, update: Document) -> Result<Option<M>>;

    /// Sets `field` to `value` in the first document matching `filter`.
    fn set<V: Serialize + ?Sized>(&self, filter: Document, field: &str, value: &V) -> Result<UpdateOneResult> {
        self.one(filter, updates::set(field, value)?)
    }

    /// Sets `field` to `value` in the document whose first unique field
    /// equals `unique_value`.
    fn set_by_unique<U, V>(&self, unique_value: &U, field: &str, value: &V) -> Result<UpdateOneResult>
        where U: Serialize + ?Sized,
              V: Serialize + ?Sized,
    {
        self.one(self.unique_filter(unique_value)?, updates::set(field, value)?)
    }
}

/// Updates of every matching document.
pub trait UpdateMany<M: Model>: Operation<M> {
    /// Applies `update` to every document matching `filter`.
    fn many(&self, filter: Document, update: Document) -> Result<UpdateManyResult>;

    /// Sets `field` to `value` in every document matching `filter`.
    fn set_many<V: Serialize + ?Sized>(&self, filter: Document, field: &str, value: &V) -> Result<UpdateManyResult> {
        self.many(filter, updates::set(field, value)?)
    }
}

/// Update facade of model `M`.
pub struct UpdateOperations<M: Model> {
    /// Metadata and collection handle.
    pub(super) base: OperationBase<M>,
}

impl<M: Model> UpdateOne<M> for UpdateOperations<M> {
    fn one(&self, filter: Document, update: Document) -> Result<UpdateOneResult> {
        self.meta().check_update(&update)?;
        self.collection().update_one(filter, update)
    }

    fn one_and_get(&self, filter: Document, update: Document) -> Result<Option<M>> {
        self.meta().check_update(&update)?;
        self.collection().find_one_and_update(filter, update)
    }
}

impl<M: Model> UpdateMany<M> for UpdateOperations<M> {
    fn many(&self, filter: Document, update: Document) -> Result<UpdateManyResult> {
        self.meta().check_update(&update)?;
        self.collection().update_many(filter, update)
    }
}
