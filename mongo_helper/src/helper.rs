//! The entry point: a MongoDB client that hands out schema holders.

use std::fmt;
use mongodb::{ Client, ClientOptions, ThreadedClient };
use mongodb::db::Database;
use crate::{
    config::HelperConfig,
    schema::{ Schema, SchemaBuilder, SchemaHolder },
    error::{ Result, ResultExt },
};

/// Wraps a `mongodb::Client`. Cloning is cheap; clones share the
/// connection pool.
///
/// ```no_run
/// # #[macro_use]
/// # extern crate mongo_helper;
/// # #[macro_use]
/// # extern crate serde_derive;
/// #
/// # use mongo_helper::prelude::*;
/// #
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Customer {
///     email: String,
///     name: String,
/// }
///
/// impl Model for Customer {
///     const NAME: &'static str = "customers";
///
///     fn fields() -> Vec<FieldDescriptor> {
///         vec![
///             FieldDescriptor::new("email", true, false),
///             FieldDescriptor::new("name", false, true),
///         ]
///     }
/// }
///
/// # fn main() -> MongoHelperResult<()> {
/// let helper = MongoHelper::with_uri("mongodb://localhost:27017")?;
/// let schema = helper.schema("shop").model::<Customer>().build()?;
/// let customers = schema.operations::<Customer>()?;
///
/// customers.create().one(&Customer {
///     email: "ada@example.com".into(),
///     name: "Ada".into(),
/// })?;
///
/// let ada = customers.find().unique_by_unique("ada@example.com")?;
/// assert_eq!(ada.map(|c| c.name), Some(String::from("Ada")));
/// #
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MongoHelper {
    /// The underlying driver client.
    client: Client,
}

impl MongoHelper {
    /// Connects using a connection string.
    pub fn with_uri(uri: &str) -> Result<Self> {
        debug!("connecting to {}", uri);
        Client::with_uri(uri)
            .map(Self::from_client)
            .chain(|| format!("can't connect to {}", uri))
    }

    /// Connects using a connection string and explicit driver options.
    pub fn with_uri_and_options(uri: &str, options: ClientOptions) -> Result<Self> {
        debug!("connecting to {} with custom options", uri);
        Client::with_uri_and_options(uri, options)
            .map(Self::from_client)
            .chain(|| format!("can't connect to {}", uri))
    }

    /// Connects to a single server.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        debug!("connecting to {}:{}", host, port);
        Client::connect(host, port)
            .map(Self::from_client)
            .chain(|| format!("can't connect to {}:{}", host, port))
    }

    /// Wraps an already-configured driver client.
    pub fn from_client(client: Client) -> Self {
        MongoHelper { client }
    }

    /// Connects as described by `config`.
    pub fn from_config(config: &HelperConfig) -> Result<Self> {
        Self::with_uri_and_options(&config.uri, config.client_options())
    }

    /// Fresh driver options, for use with `with_uri_and_options()`.
    pub fn client_options() -> ClientOptions {
        ClientOptions::new()
    }

    /// The underlying driver client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// A handle to the named database.
    pub fn database(&self, name: &str) -> Database {
        self.client.db(name)
    }

    /// Starts registering models over the named database.
    pub fn schema(&self, database: &str) -> SchemaBuilder {
        SchemaHolder::builder(self.database(database))
    }

    /// Loads every model of schema `S` over the named database.
    pub fn load<S: Schema>(&self, database: &str) -> Result<SchemaHolder> {
        SchemaHolder::load::<S>(self.database(database))
    }

    /// Loads schema `S` over the database named by `config`, creating the
    /// indexes of its models if `config` asks for it.
    pub fn load_configured<S: Schema>(&self, config: &HelperConfig) -> Result<SchemaHolder> {
        let schema = self.load::<S>(&config.database)?;

        if config.create_indexes {
            schema.create_indexes()?;
        }

        Ok(schema)
    }
}

impl fmt::Debug for MongoHelper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MongoHelper").finish()
    }
}
