//! Integration tests for checking high-level functionality of the most
//! important moving parts against a live server. Namely, these tests
//! exercise the following modules:
//! * [`schema`](schema/index.html)
//! * [`coll`](coll/index.html)
//! * [`cursor`](cursor/index.html)
//! * [`ops`](ops/index.html)
//!
//! They spawn their own `mongod` process, so they are ignored by default.
//! Run them with `cargo test -- --ignored` on a machine with MongoDB
//! installed.

#[macro_use]
extern crate scopeguard;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate mongo_helper_derive;
#[macro_use]
extern crate mongo_helper;

use std::env::temp_dir;
use std::fs::create_dir_all;
use std::sync::Mutex;
use std::collections::HashSet;
use std::process::{ Command, Child, Stdio };
use mongo_helper::error::Result;
use mongo_helper::prelude::*;
use mongo_helper::{ filters, updates };

/// Used for killing the MongoDB server process once all tests have run.
struct ProcessGuard {
    handle: Child,
    owners: HashSet<&'static str>,
}

impl ProcessGuard {
    fn new(handle: Child, owners: &[&'static str]) -> Self {
        ProcessGuard {
            handle: handle,
            owners: owners.iter().map(|&item| item).collect(),
        }
    }

    fn resign(&mut self, owner: &str) {
        let pid = self.handle.id();

        println!("=== ProcessGuard(#{}): Resigning owner '{}'", pid, owner);
        self.owners.remove(owner);

        if self.owners.is_empty() {
            println!("=== ProcessGuard(#{}): All owners resigned; killing", pid);
            self.handle.kill().expect("couldn't kill child process");
        }
    }
}

macro_rules! implement_tests {
    ($(#[test] $(#[$attr:meta])* fn $test_name:ident() $(-> $ret_ty:ty)? $test_code:block)*) => {
        lazy_static! {
            static ref DB_SERVER_GUARD: Mutex<ProcessGuard> = {
                let dbpath = {
                    let mut tmp = temp_dir();
                    tmp.push(DB_NAME);
                    create_dir_all(&tmp).expect("couldn't create DB temp dir");
                    tmp
                };
                let owners = [$(stringify!($test_name),)*];
                let process = Command::new("mongod")
                    .arg("--noscripting")
                    .arg("--dbpath")
                    .arg(&dbpath)
                    .arg("--port")
                    .arg(DB_PORT)
                    .stdout(Stdio::piped())
                    .spawn()
                    .expect("couldn't start DB server; do you have Mongo installed?");

                Mutex::new(ProcessGuard::new(process, &owners))
            };
        }

        $(
            #[test]
            #[ignore]
            $(#[$attr])*
            fn $test_name() $(-> $ret_ty)? {
                defer!({
                    DB_SERVER_GUARD.lock().unwrap().resign(stringify!($test_name));
                });
                $test_code
            }
        )*
    }
}

/// Not Quite Random
static DB_PORT: &str = "12986";
/// Database (and temporary directory) name.
static DB_NAME: &str = "mongo_helper_test_db";

lazy_static! {
    /// We don't care that the schema is not RAII-destroyed. Its resources
    /// (eg. memory, socket descriptors) will be cleaned up by the OS.
    /// The important thing is that the server process is shut down so we
    /// don't spam the process space with useless servers.
    static ref SCHEMA: SchemaHolder = {
        // The guard starts the server on first access.
        lazy_static::initialize(&DB_SERVER_GUARD);

        let helper = MongoHelper::with_uri(&format!("mongodb://localhost:{}/", DB_PORT))
            .expect("can't connect to mongod server");
        let schema = helper.load::<TestSchema>(DB_NAME).expect("can't load schema");

        schema.initialize().expect("can't create collections and indexes");
        schema
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Model)]
#[model(name = "users")]
struct User {
    _id: ObjectId,
    #[model(unique, immutable)]
    username: String,
    #[model(unique)]
    email: String,
    legal_name: String,
    karma: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Model)]
#[model(name = "groups")]
struct Group {
    _id: ObjectId,
    #[model(unique)]
    name: String,
    description: String,
}

schema!(TestSchema { User, Group });

/// The operations of `M`, on an emptied collection.
fn empty_ops<M: Model>() -> Result<&'static Operations<M>> {
    let ops = SCHEMA.operations::<M>()?;
    ops.delete().all()?;
    Ok(ops)
}

fn user(username: &str, email: &str, karma: i32) -> Result<User> {
    Ok(User {
        _id: ObjectId::new().expect("can't generate ObjectId"),
        username: username.to_owned(),
        email: email.to_owned(),
        legal_name: username.to_uppercase(),
        karma,
    })
}

// Finally, the actual tests.

implement_tests!{
    #[test]
    fn create_find_delete() -> Result<()> {
        let groups = empty_ops::<Group>()?;

        let group_1 = Group {
            _id: ObjectId::new().expect("can't generate ObjectId"),
            name: String::from("Fancy FinTech, Inc."),
            description: String::from("IoT AI on the quantum blockchain"),
        };
        let group_2 = Group {
            _id: ObjectId::new().expect("can't generate ObjectId"),
            name: String::from("PHP Shop, Ltd."),
            description: String::from("It pays the bills"),
        };

        // No documents before insertion
        assert!(groups.find().first(doc!{})?.is_none());
        assert!(!groups.find().all()?.has_next()?);
        assert_eq!(groups.find().count(doc!{})?, 0);

        // Can insert but don't allow duplicates
        let id_1 = groups.create().one(&group_1)?;
        assert_eq!(id_1, Bson::ObjectId(group_1._id.clone()));
        assert!(groups.create().many(vec![&group_1]).is_err());

        let ids_2 = groups.create().many(vec![&group_2])?;
        assert_eq!(ids_2, [Bson::ObjectId(group_2._id.clone())]);
        assert!(groups.create().one(&group_2).is_err());

        // Inserting nothing is fine
        assert!(groups.create().many(Vec::<Group>::new())?.is_empty());

        // Can retrieve documents after insertion
        assert_eq!(groups.find().unique_by_unique("PHP Shop, Ltd.")?.as_ref(), Some(&group_2));
        assert_eq!(
            groups.find().many(filters::eq("_id", &group_1._id)?)?.collect::<Result<Vec<_>>>()?,
            vec![group_1.clone()]
        );
        assert!(groups.find().exists(filters::eq("name", "Fancy FinTech, Inc.")?)?);
        assert!(!groups.find().exists(filters::eq("name", "Nobody")?)?);

        // Can delete after insertion, too
        assert!(groups.delete().by_unique("PHP Shop, Ltd.")?);
        assert!(!groups.delete().by_unique("PHP Shop, Ltd.")?);
        assert_eq!(groups.delete().one_and_get(filters::eq("_id", &group_1._id)?)?, Some(group_1));
        assert_eq!(groups.delete().all()?, 0);

        // No documents after deletion
        assert!(groups.find().first(doc!{})?.is_none());
        assert_eq!(groups.find().count(doc!{})?, 0);

        Ok(())
    }

    #[test]
    fn unique_lookups() -> Result<()> {
        let users = empty_ops::<User>()?;
        let alice = user("alice", "alice@example.com", 10)?;
        let bob = user("bob", "bob@example.com", 3)?;

        users.create().many(vec![&alice, &bob])?;

        // The unique index on `username` is enforced by the server.
        assert!(users.create().one(&user("alice", "other@example.com", 0)?).is_err());

        // `username` is the first unique field.
        assert_eq!(users.find().unique_by_unique("bob")?, Some(bob.clone()));
        assert_eq!(users.find().unique_by("email", "alice@example.com")?, Some(alice.clone()));
        assert_eq!(users.find().unique(filters::eq("karma", &3)?)?, Some(bob.clone()));
        assert_eq!(users.find().unique_by_unique("carol")?, None);

        let error = users.find().unique_or_err(filters::eq("username", "carol")?).unwrap_err();
        assert_eq!(error.kind(), MongoHelperErrorKind::NotFound);

        let error = users.find().unique_by_or_err("email", "carol@example.com").unwrap_err();
        assert_eq!(error.kind(), MongoHelperErrorKind::NotFound);

        assert_eq!(users.find().unique_by_or_err("email", "bob@example.com")?, bob);

        Ok(())
    }

    #[test]
    fn updates_and_queries() -> Result<()> {
        let users = empty_ops::<User>()?;
        let names = ["ann", "ben", "cid", "dot"];
        let all_users = names
            .iter()
            .enumerate()
            .map(|(i, name)| user(name, &format!("{}@example.com", name), i as i32))
            .collect::<Result<Vec<_>>>()?;

        assert_eq!(users.create().many(&all_users)?.len(), names.len());

        // Single updates
        let result = users.update().set_by_unique("ann", "legal_name", "Ann Smith")?;
        assert_eq!(result, UpdateOneResult { matched: true, modified: true });

        let result = users.update().set(filters::eq("username", "nobody")?, "karma", &1)?;
        assert_eq!(result, UpdateOneResult { matched: false, modified: false });

        let updated = users.update().one_and_get(
            filters::eq("username", "ben")?,
            updates::combine(vec![
                updates::inc("karma", &100)?,
                updates::set("email", "benjamin@example.com")?,
            ]),
        )?;
        assert_eq!(updated.map(|u| (u.karma, u.email)),
                   Some((101, String::from("benjamin@example.com"))));

        // Immutable fields can't be touched
        assert!(users.update().set_by_unique("cid", "username", "sid").is_err());
        assert_eq!(users.find().unique_by_unique("cid")?.map(|u| u.username),
                   Some(String::from("cid")));

        // Bulk updates
        let result = users.update().many(filters::exists("karma", true), updates::inc("karma", &1)?)?;
        assert_eq!(result, UpdateManyResult { num_matched: 4, num_modified: 4 });

        let result = users.update().set_many(
            filters::in_("username", &["cid", "dot"])?,
            "legal_name",
            "anonymous",
        )?;
        assert_eq!(result.num_matched, 2);

        // Queries
        let anonymous: Vec<User> = users.find()
            .by("legal_name", "anonymous")?
            .collect::<Result<_>>()?;
        let mut anonymous_names: Vec<_> = anonymous.into_iter().map(|u| u.username).collect();
        anonymous_names.sort();
        assert_eq!(anonymous_names, ["cid", "dot"]);

        let popular = users.find().count(doc!{ "karma": { "$gt": 3 } })?;
        assert_eq!(popular, 2);

        let either = filters::or(vec![
            filters::eq("username", "ann")?,
            filters::eq("username", "dot")?,
        ]);
        assert_eq!(users.find().count(either)?, 2);

        // Bulk deletion
        assert_eq!(users.delete().many(filters::ne("username", "ann")?)?, 3);
        assert_eq!(users.find().count(doc!{})?, 1);

        Ok(())
    }

    #[test]
    fn cursor_batches() -> Result<()> {
        let users = empty_ops::<User>()?;
        let all_users = (0..10)
            .map(|i| user(&format!("user{}", i), &format!("user{}@example.com", i), i))
            .collect::<Result<Vec<_>>>()?;

        users.create().many(&all_users)?;

        let mut cursor = users.find().all()?;
        let first: Vec<User> = cursor.next_n(3)?;
        assert_eq!(first.len(), 3);

        let rest: Vec<User> = cursor.collect::<Result<_>>()?;
        assert_eq!(first.len() + rest.len(), all_users.len());

        Ok(())
    }

    #[test]
    fn keep_server_alive() {}
}
