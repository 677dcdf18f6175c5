//! Builders for query filter documents.
//!
//! ```
//! # #[macro_use]
//! # extern crate bson;
//! # extern crate mongo_helper;
//! #
//! # use mongo_helper::filters;
//! # use mongo_helper::error::Result;
//! #
//! # fn main() -> Result<()> {
//! let filter = filters::and(vec![
//!     filters::eq("username", "jdoe")?,
//!     filters::exists("email", true),
//! ]);
//!
//! assert_eq!(filter, doc!{
//!     "$and": [
//!         { "username": "jdoe" },
//!         { "email": { "$exists": true } },
//!     ]
//! });
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use bson::{ Bson, Document };
use crate::{
    bsn::serialize_value,
    error::Result,
};

/// Wraps a single `key: value` pair into a document.
fn single<K: Into<String>>(key: K, value: Bson) -> Document {
    let mut doc = Document::new();
    doc.insert(key, value);
    doc
}

/// Wraps `{ operator: value }` as the condition on `field`.
fn condition(field: &str, operator: &str, value: Bson) -> Document {
    single(field, Bson::Document(single(operator, value)))
}

/// Matches documents in which `field` equals `value`.
pub fn eq<V: Serialize + ?Sized>(field: &str, value: &V) -> Result<Document> {
    serialize_value(value).map(|value| single(field, value))
}

/// Matches documents in which `field` does not equal `value`.
pub fn ne<V: Serialize + ?Sized>(field: &str, value: &V) -> Result<Document> {
    serialize_value(value).map(|value| condition(field, "$ne", value))
}

/// Matches documents in which `field` equals any of `values`.
pub fn in_<I, V>(field: &str, values: I) -> Result<Document>
    where I: IntoIterator<Item = V>,
          V: Serialize,
{
    values
        .into_iter()
        .map(|value| serialize_value(&value))
        .collect::<Result<Vec<_>>>()
        .map(|values| condition(field, "$in", Bson::Array(values)))
}

/// Matches documents in which `field` is present (or absent).
pub fn exists(field: &str, present: bool) -> Document {
    condition(field, "$exists", Bson::Boolean(present))
}

/// Matches documents satisfying all of `filters`.
pub fn and(filters: Vec<Document>) -> Document {
    logical("$and", filters)
}

/// Matches documents satisfying any of `filters`.
pub fn or(filters: Vec<Document>) -> Document {
    logical("$or", filters)
}

/// Combines several filters under a logical operator.
fn logical(operator: &str, filters: Vec<Document>) -> Document {
    let clauses = filters.into_iter().map(Bson::Document).collect();
    single(operator, Bson::Array(clauses))
}

#[cfg(test)]
mod tests {
    use std::u64;
    use crate::error::{ ErrorExt, ErrorKind, Result };
    use super::*;

    #[test]
    fn comparison_filters() -> Result<()> {
        assert_eq!(eq("age", &42)?, doc!{ "age": 42 });
        assert_eq!(ne("name", "root")?, doc!{ "name": { "$ne": "root" } });
        assert_eq!(in_("tag", vec!["a", "b"])?, doc!{ "tag": { "$in": ["a", "b"] } });
        assert_eq!(exists("deleted", false), doc!{ "deleted": { "$exists": false } });

        Ok(())
    }

    #[test]
    fn logical_filters() -> Result<()> {
        let filter = or(vec![eq("a", &1)?, eq("b", &2)?]);
        assert_eq!(filter, doc!{ "$or": [{ "a": 1 }, { "b": 2 }] });
        assert_eq!(and(Vec::new()), doc!{ "$and": [] });

        Ok(())
    }

    #[test]
    fn unrepresentable_values_are_rejected() {
        assert_eq!(eq("counter", &u64::MAX).unwrap_err().kind(),
                   ErrorKind::BsonNumberRepr);
        assert_eq!(in_("counter", vec![1, u64::MAX]).unwrap_err().kind(),
                   ErrorKind::BsonNumberRepr);
    }
}
