//! A MongoDB collection of a single model type.

use std::borrow::Borrow;
use std::marker::PhantomData;
use std::sync::Arc;
use std::fmt;
use bson::{ Bson, Document, from_bson };
use mongodb::coll::options::{
    IndexModel,
    UpdateOptions,
    FindOneAndDeleteOptions,
    FindOneAndUpdateOptions,
    ReturnDocument,
};
use mongodb::coll::results::UpdateResult;
use crate::{
    cursor::Cursor,
    model::Model,
    bsn::*,
    utils::*,
    error::{ Error, ErrorKind::MissingId, Result, ResultExt },
};

/// A statically-typed (homogeneous) `MongoDB` collection handle.
///
/// Cloning is cheap; clones share the underlying driver collection.
pub struct Collection<M: Model> {
    /// The backing `MongoDB` collection.
    inner: Arc<mongodb::coll::Collection>,
    /// Just here so that the type parameter is used.
    _marker: PhantomData<fn() -> M>,
}

impl<M: Model> Collection<M> {
    /// The name of the collection, which is also the name of the model.
    pub fn name(&self) -> &'static str {
        M::NAME
    }

    /// Creates the given indexes on the underlying `MongoDB` collection.
    pub fn create_indexes(&self, indexes: Vec<IndexModel>) -> Result<()> {
        if indexes.is_empty() {
            Ok(())
        } else {
            debug!("creating {} index(es) on {}", indexes.len(), M::NAME);
            self.inner
                .create_indexes(indexes)
                .map(drop)
                .chain(|| format!("can't create indexes on {}", M::NAME))
        }
    }

    /// Deletes the collection.
    pub fn drop(&self) -> Result<()> {
        mongodb::coll::Collection::drop(&self.inner).chain(|| format!("can't drop {}", M::NAME))
    }

    /// Returns the number of documents matching the filter.
    pub fn count(&self, filter: Document) -> Result<usize> {
        trace!("{}::count({})", M::NAME, filter);
        self.inner
            .count(filter.into(), M::count_options().into())
            .chain(|| format!("error in {}::count()", M::NAME))
            .and_then(|n| int_to_usize_with_msg(n, "# of counted documents"))
    }

    /// Retrieves a single document satisfying the filter, if one exists.
    pub fn find_one(&self, filter: Document) -> Result<Option<M>> {
        trace!("{}::find_one({})", M::NAME, filter);
        self.inner
            .find_one(filter.into(), M::query_options().into())
            .chain(|| format!("error in {}::find_one()", M::NAME))
            .and_then(|opt| opt.map_or(Ok(None), |doc| deserialize_document(doc).map(Some)))
    }

    /// Retrieves all documents satisfying the filter.
    pub fn find_many(&self, filter: Document) -> Result<Cursor<M>> {
        trace!("{}::find_many({})", M::NAME, filter);
        self.inner
            .find(filter.into(), M::query_options().into())
            .chain(|| format!("error in {}::find_many()", M::NAME))
            .map(Cursor::from)
    }

    /// Inserts a single document. Returns the ID assigned to it.
    pub fn insert_one(&self, entity: &M) -> Result<Bson> {
        let doc = serialize_document(entity)?;
        let write_concern = M::insert_options().write_concern;
        let message = || format!("error in {}::insert_one()", M::NAME);

        trace!("{}::insert_one({})", M::NAME, doc);
        self.inner
            .insert_one(doc, write_concern)
            .chain(&message)
            .and_then(|result| {
                if let Some(error) = result.write_exception {
                    Err(Error::with_cause(message(), error))
                } else {
                    result.inserted_id.ok_or_else(
                        || Error::new(MissingId, message() + ": missing `inserted_id`")
                    )
                }
            })
    }

    /// Inserts many documents. Returns their IDs in insertion order.
    pub fn insert_many<I>(&self, entities: I) -> Result<Vec<Bson>>
        where I: IntoIterator,
              I::Item: Borrow<M>,
    {
        let docs = serialize_documents::<M, _>(entities)?;
        let n_docs = docs.len();
        let message = || format!("error in {}::insert_many()", M::NAME);

        // MongoDB complains if you try to insert 0 documents, but that's silly.
        if n_docs == 0 {
            return Ok(Vec::new());
        }

        trace!("{}::insert_many({} documents)", M::NAME, n_docs);
        self.inner
            .insert_many(docs, M::insert_options().into())
            .chain(&message)
            .and_then(|result| {
                if let Some(error) = result.bulk_write_exception {
                    Err(Error::with_cause(message(), error))
                } else if let Some(ids) = result.inserted_ids {
                    let ids: Vec<_> = ids.into_iter().map(|(_, id)| id).collect();

                    if ids.len() == n_docs {
                        Ok(ids)
                    } else {
                        let msg = format!("{}: {} documents given, but {} IDs returned",
                                          message(), n_docs, ids.len());
                        Err(Error::new(MissingId, msg))
                    }
                } else {
                    Err(Error::new(MissingId, message() + ": missing `inserted_ids`"))
                }
            })
    }

    /// Updates a single document using update operators.
    pub fn update_one(&self, filter: Document, update: Document) -> Result<UpdateOneResult> {
        let message = || format!("error in {}::update_one()", M::NAME);

        trace!("{}::update_one({}, {})", M::NAME, filter, update);
        self.inner
            .update_one(filter, update, self.update_options().into())
            .chain(&message)
            .and_then(UpdateOneResult::from_raw)
    }

    /// Updates every document matching the filter using update operators.
    pub fn update_many(&self, filter: Document, update: Document) -> Result<UpdateManyResult> {
        let message = || format!("error in {}::update_many()", M::NAME);

        trace!("{}::update_many({}, {})", M::NAME, filter, update);
        self.inner
            .update_many(filter, update, self.update_options().into())
            .chain(&message)
            .and_then(|result| {
                if let Some(error) = result.write_exception {
                    Err(Error::with_cause(message(), error))
                } else {
                    let num_matched = int_to_usize_with_msg(result.matched_count, "# of matched documents")?;
                    let num_modified = int_to_usize_with_msg(result.modified_count, "# of modified documents")?;
                    Ok(UpdateManyResult { num_matched, num_modified })
                }
            })
    }

    /// Non-upserting update options with the model's write concern.
    fn update_options(&self) -> UpdateOptions {
        UpdateOptions {
            upsert: Some(false),
            write_concern: M::update_options().into(),
        }
    }

    /// Deletes one document. Returns `true` if one was found and deleted.
    pub fn delete_one(&self, filter: Document) -> Result<bool> {
        let message = || format!("error in {}::delete_one()", M::NAME);

        trace!("{}::delete_one({})", M::NAME, filter);
        self.inner
            .delete_one(filter, M::delete_options().into())
            .chain(&message)
            .and_then(|result| {
                if let Some(error) = result.write_exception {
                    Err(Error::with_cause(message(), error))
                } else {
                    Ok(result.deleted_count > 0)
                }
            })
    }

    /// Deletes many documents. Returns the number of deleted documents.
    pub fn delete_many(&self, filter: Document) -> Result<usize> {
        let message = || format!("error in {}::delete_many()", M::NAME);

        trace!("{}::delete_many({})", M::NAME, filter);
        self.inner
            .delete_many(filter, M::delete_options().into())
            .chain(&message)
            .and_then(|result| {
                if let Some(error) = result.write_exception {
                    Err(Error::with_cause(message(), error))
                } else {
                    int_to_usize_with_msg(result.deleted_count, "# of deleted documents")
                }
            })
    }

    /// Deletes a single document matching the filter, returning it if it
    /// was found.
    pub fn find_one_and_delete(&self, filter: Document) -> Result<Option<M>> {
        let query_options = M::query_options();
        let options = FindOneAndDeleteOptions {
            max_time_ms: query_options.max_time_ms,
            projection: query_options.projection,
            sort: query_options.sort,
            write_concern: M::delete_options().into(),
        };

        trace!("{}::find_one_and_delete({})", M::NAME, filter);
        self.inner
            .find_one_and_delete(filter, options.into())
            .chain(|| format!("error in {}::find_one_and_delete()", M::NAME))
            .and_then(|opt| opt.map_or(Ok(None), |doc| deserialize_document(doc).map(Some)))
    }

    /// Updates a single document matching the filter and returns it in its
    /// updated state, if it was found.
    pub fn find_one_and_update(&self, filter: Document, update: Document) -> Result<Option<M>> {
        let query_options = M::query_options();
        let options = FindOneAndUpdateOptions {
            return_document: Some(ReturnDocument::After),
            max_time_ms: query_options.max_time_ms,
            projection: query_options.projection,
            sort: query_options.sort,
            upsert: Some(false),
            ..Default::default()
        };

        trace!("{}::find_one_and_update({}, {})", M::NAME, filter, update);
        self.inner
            .find_one_and_update(filter, update, options.into())
            .chain(|| format!("error in {}::find_one_and_update()", M::NAME))
            .and_then(|opt| opt.map_or(Ok(None), |doc| deserialize_document(doc).map(Some)))
    }
}

/// Decodes a raw document returned by the driver into a model value.
fn deserialize_document<M: Model>(doc: Document) -> Result<M> {
    from_bson(Bson::Document(doc))
        .chain(|| format!("can't deserialize {}", M::NAME))
}

impl<M: Model> Clone for Collection<M> {
    fn clone(&self) -> Self {
        Collection {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<M: Model> fmt::Debug for Collection<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Collection<{}>", M::NAME)
    }
}

#[doc(hidden)]
impl<M: Model> From<mongodb::coll::Collection> for Collection<M> {
    fn from(collection: mongodb::coll::Collection) -> Self {
        Collection {
            inner: Arc::new(collection),
            _marker: PhantomData,
        }
    }
}

/// The outcome of a successful `update_one()` operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpdateOneResult {
    /// Whether a document matched the filter.
    pub matched: bool,
    /// Whether the matched document was actually modified.
    pub modified: bool,
}

impl UpdateOneResult {
    /// Converts a MongoDB `UpdateResult` to an `UpdateOneResult`.
    fn from_raw(result: UpdateResult) -> Result<Self> {
        if let Some(error) = result.write_exception {
            Err(Error::with_cause("couldn't perform single update", error))
        } else {
            Ok(UpdateOneResult {
                matched: result.matched_count > 0,
                modified: result.modified_count > 0,
            })
        }
    }
}

/// The outcome of a successful `update_many()` operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpdateManyResult {
    /// The number of documents matched by the filter.
    pub num_matched: usize,
    /// The number of documents modified by the update specification.
    pub num_modified: usize,
}
