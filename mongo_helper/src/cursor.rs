//! Typed, generic wrapper around MongoDB `Cursor`s.

use std::iter::FromIterator;
use std::marker::PhantomData;
use std::fmt::{ self, Write };
use serde::Deserialize;
use bson::{ Bson, Document, from_bson };
use crate::error::{ Error, ErrorKind, Result, ResultExt };

/// A typed wrapper around the MongoDB `Cursor` type.
pub struct Cursor<T> {
    /// The underlying MongoDB cursor.
    inner: mongodb::cursor::Cursor,
    /// Just here so that the type parameter is used.
    _marker: PhantomData<fn() -> T>,
}

impl<T> Cursor<T> where T: for<'a> Deserialize<'a> {
    /// Reads the remaining documents available in the current batch.
    pub fn next_batch<C: FromIterator<T>>(&mut self) -> Result<C> {
        self.inner
            .drain_current_batch()
            .chain("couldn't retrieve next batch")
            .and_then(deserialize_many)
    }

    /// Retrieves the next at most `n` documents.
    pub fn next_n<C: FromIterator<T>>(&mut self, n: usize) -> Result<C> {
        self.inner
            .next_n(n)
            .chain("couldn't retrieve documents")
            .and_then(deserialize_many)
    }

    /// Checks whether there are any more documents for the cursor to yield.
    pub fn has_next(&mut self) -> Result<bool> {
        self.inner.has_next().chain("cursor error")
    }
}

/// Tries to deserialize a single document.
fn deserialize_one<T>(mut doc: Document) -> Result<T> where T: for<'a> Deserialize<'a> {
    // The driver hands us back an `Ok(Document)` even if the document
    // itself represents an error. We catch this here.
    if let Some(Bson::String(mut errmsg)) = doc.remove("$err") {
        if let Ok(code) = doc.get_i32("code") {
            write!(errmsg, " (code: {})", code).ok();
        } else if let Ok(code) = doc.get_i64("code") {
            write!(errmsg, " (code: {})", code).ok();
        }

        return Err(Error::new(ErrorKind::MongoDbError, errmsg));
    }

    from_bson(Bson::Document(doc)).map_err(From::from)
}

/// Tries to deserialize a vector of documents.
fn deserialize_many<T, C>(docs: Vec<Document>) -> Result<C>
    where T: for<'a> Deserialize<'a>,
          C: FromIterator<T>,
{
    docs.into_iter().map(deserialize_one).collect()
}

impl<T> Iterator for Cursor<T> where T: for<'a> Deserialize<'a> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|result| {
                result
                    .chain("can't step Cursor")
                    .and_then(deserialize_one)
            })
    }
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Cursor").finish()
    }
}

#[doc(hidden)]
impl<T> From<mongodb::cursor::Cursor> for Cursor<T> {
    fn from(inner: mongodb::cursor::Cursor) -> Self {
        Cursor {
            inner,
            _marker: PhantomData,
        }
    }
}
