//! Builders for update documents consisting of update operators.

use serde::Serialize;
use bson::{ Bson, Document };
use crate::{
    bsn::serialize_value,
    error::Result,
};

/// Wraps `{ operator: { field: value } }`.
fn operator(operator: &str, field: &str, value: Bson) -> Document {
    let mut target = Document::new();
    target.insert(field, value);

    let mut update = Document::new();
    update.insert(operator, target);
    update
}

/// Sets `field` to `value`.
pub fn set<V: Serialize + ?Sized>(field: &str, value: &V) -> Result<Document> {
    serialize_value(value).map(|value| operator("$set", field, value))
}

/// Removes `field` from the document.
pub fn unset(field: &str) -> Document {
    operator("$unset", field, Bson::String(String::new()))
}

/// Increments the numeric `field` by `amount`.
pub fn inc<V: Serialize + ?Sized>(field: &str, amount: &V) -> Result<Document> {
    serialize_value(amount).map(|amount| operator("$inc", field, amount))
}

/// Merges several update documents into one. Targets of the same operator
/// are merged; a later target of the same field wins.
pub fn combine(updates: Vec<Document>) -> Document {
    let mut combined = Document::new();

    for update in updates {
        for (op, targets) in update {
            if let Bson::Document(targets) = targets {
                if let Some(&mut Bson::Document(ref mut existing)) = combined.get_mut(&op) {
                    for (field, value) in targets {
                        existing.insert(field, value);
                    }
                    continue;
                }
                combined.insert(op, targets);
            } else {
                combined.insert(op, targets);
            }
        }
    }

    combined
}

#[cfg(test)]
mod tests {
    use crate::error::Result;
    use super::*;

    #[test]
    fn single_operator_updates() -> Result<()> {
        assert_eq!(set("name", "Jane")?, doc!{ "$set": { "name": "Jane" } });
        assert_eq!(inc("visits", &1)?, doc!{ "$inc": { "visits": 1 } });
        assert_eq!(unset("nickname"), doc!{ "$unset": { "nickname": "" } });

        Ok(())
    }

    #[test]
    fn combined_updates_merge_operators() -> Result<()> {
        let update = combine(vec![
            set("name", "Jane")?,
            inc("visits", &1)?,
            set("email", "jane@example.com")?,
            set("name", "Janet")?,
        ]);

        let set = update.get_document("$set")?;

        assert_eq!(update.len(), 2);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get_str("name")?, "Janet");
        assert_eq!(set.get_str("email")?, "jane@example.com");
        assert_eq!(update.get_document("$inc")?, &doc!{ "visits": 1 });

        Ok(())
    }
}
