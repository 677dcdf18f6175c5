//! Insertion of new documents.

use std::borrow::Borrow;
use bson::Bson;
use crate::{
    model::Model,
    error::Result,
};
use super::{ Operation, OperationBase };

/// Inserts a single document.
pub trait CreateOne<M: Model>: Operation<M> {
    /// Inserts `datum`, returning the `_id` it was stored under.
    fn one(&self, datum: &M) -> Result<Bson>;
}

/// Inserts documents in bulk.
pub trait CreateMany<M: Model>: Operation<M> {
    /// Inserts every item of `data`, returning their `_id`s in order.
    /// Inserting nothing is not an error.
    fn many<I>(&self, data: I) -> Result<Vec<Bson>>
        where I: IntoIterator,
              I::Item: Borrow<M>;
}

/// Insertion facade of model `M`.
pub struct CreateOperations<M: Model> {
    /// Metadata and collection handle.
    pub(super) base: OperationBase<M>,
}

impl<M: Model> CreateOne<M> for CreateOperations<M> {
    fn one(&self, datum: &M) -> Result<Bson> {
        self.collection().insert_one(datum)
    }
}

impl<M: Model> CreateMany<M> for CreateOperations<M> {
    fn many<I>(&self, data: I) -> Result<Vec<Bson>>
        where I: IntoIterator,
              I::Item: Borrow<M>,
    {
        self.collection().insert_many(data)
    }
}
