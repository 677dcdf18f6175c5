#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate mongo_helper_derive;
extern crate mongo_helper;

use mongo_helper::prelude::*;

/// This could have been a function, but making it a macro results in the
/// error messages pointing to the actual line number of the invocation,
/// which is much better in a test suite.
macro_rules! assert_model_impl {
    (Model: $Model:ident, name: $name:expr, fields: [$(($field:expr, $unique:expr, $mutable:expr)),*]) => {
        assert_eq!(<$Model as Model>::NAME, $name);
        assert_eq!(
            <$Model as Model>::fields(),
            vec![$(FieldDescriptor::new($field, $unique, $mutable)),*]
        );
    }
}

#[test]
fn model_simple() {
    #[derive(Debug, Clone, Serialize, Deserialize, Model)]
    struct Simple {
        _id: ObjectId,
    }

    assert_model_impl!(Model: Simple, name: "Simple", fields: [("_id", false, false)]);
}

#[test]
fn model_with_multiple_fields() {
    #[derive(Debug, Clone, Serialize, Deserialize, Model)]
    struct MultiField {
        _id: ObjectId,
        name: String,
        tags: Vec<String>,
    }

    assert_model_impl!(Model: MultiField, name: "MultiField", fields: [
        ("_id", false, false),
        ("name", false, true),
        ("tags", false, true)
    ]);
}

#[test]
fn model_renamed_by_serde() {
    #[derive(Debug, Clone, Serialize, Deserialize, Model)]
    #[serde(rename = "Renamed")]
    struct Original {
        _id: ObjectId,
        other_field: Vec<String>,
    }

    assert_model_impl!(Model: Original, name: "Renamed", fields: [
        ("_id", false, false),
        ("other_field", false, true)
    ]);
}

#[test]
fn model_named_explicitly() {
    #[derive(Debug, Clone, Serialize, Deserialize, Model)]
    #[serde(rename = "SerdeName")]
    #[model(name = "people")]
    struct Person {
        #[serde(rename = "_id")]
        id: ObjectId,
        name: String,
    }

    assert_model_impl!(Model: Person, name: "people", fields: [
        ("_id", false, false),
        ("name", false, true)
    ]);
}

#[test]
fn model_unique_and_immutable_fields() {
    #[derive(Debug, Clone, Serialize, Deserialize, Model)]
    #[model(name = "accounts")]
    struct Account {
        #[model(unique, immutable)]
        login: String,
        #[model(unique)]
        email: String,
        #[model(immutable)]
        created_at: i64,
        #[model(unique = false, immutable = false)]
        nickname: String,
    }

    assert_model_impl!(Model: Account, name: "accounts", fields: [
        ("login", true, false),
        ("email", true, true),
        ("created_at", false, false),
        ("nickname", false, true)
    ]);
}

#[test]
fn model_respects_serde_renaming() {
    #[derive(Debug, Clone, Serialize, Deserialize, Model)]
    #[serde(rename_all = "camelCase")]
    struct Renamed {
        #[serde(rename = "_id")]
        id: ObjectId,
        #[model(unique)]
        user_name: String,
        #[serde(rename = "mail")]
        email_address: String,
    }

    assert_model_impl!(Model: Renamed, name: "Renamed", fields: [
        ("_id", false, false),
        ("userName", true, true),
        ("mail", false, true)
    ]);
}

#[test]
fn model_uses_serialize_half_of_split_renames() {
    #[derive(Debug, Clone, Serialize, Deserialize, Model)]
    #[serde(rename(serialize = "letters", deserialize = "Letter"))]
    #[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
    struct Letter {
        _id: ObjectId,
        #[model(unique)]
        #[serde(rename(serialize = "mail", deserialize = "email"))]
        email: String,
        sent_at: i64,
        #[serde(rename(deserialize = "legacyBody"))]
        body_text: String,
    }

    assert_model_impl!(Model: Letter, name: "letters", fields: [
        ("_id", false, false),
        ("mail", true, true),
        ("sentAt", false, true),
        ("bodyText", false, true)
    ]);
}

#[test]
fn model_skips_unserialized_fields() {
    #[derive(Debug, Clone, Default, Serialize, Deserialize, Model)]
    struct Cached {
        _id: i64,
        #[serde(skip)]
        cache: Vec<u8>,
        #[serde(skip_serializing)]
        password: String,
        #[serde(skip_deserializing)]
        computed: u32,
    }

    assert_model_impl!(Model: Cached, name: "Cached", fields: [
        ("_id", false, false),
        ("computed", false, true)
    ]);
}

#[test]
fn derived_model_meta() -> MongoHelperResult<()> {
    #[derive(Debug, Clone, Serialize, Deserialize, Model)]
    #[model(name = "products")]
    struct Product {
        _id: ObjectId,
        #[model(unique, immutable)]
        sku: String,
        #[model(unique)]
        slug: String,
        price: u32,
    }

    let meta = ModelMeta::of::<Product>()?;

    assert_eq!(meta.name(), "products");
    assert_eq!(meta.uniques(), ["sku", "slug"]);
    assert_eq!(meta.first_unique_field_name()?, "sku");

    meta.check_update(&doc!{ "$set": { "slug": "new-slug", "price": 10 } })?;

    let error = meta.check_update(&doc!{ "$set": { "sku": "X" } }).unwrap_err();
    assert_eq!(error.kind(), MongoHelperErrorKind::ImmutableField);

    Ok(())
}
