//! Connection configuration, loadable from JSON.

use std::fs;
use std::path::Path;
use mongodb::ClientOptions;
use crate::error::{ Error, ErrorKind, Result, ResultExt };

/// Where and how to connect, and what to do with the schema once loaded.
///
/// ```
/// # extern crate mongo_helper;
/// #
/// # use mongo_helper::config::HelperConfig;
/// #
/// # fn main() -> mongo_helper::error::Result<()> {
/// let config = HelperConfig::from_json_str(r#"{
///     "uri": "mongodb://localhost:27017",
///     "database": "shop",
///     "create_indexes": true
/// }"#)?;
///
/// assert_eq!(config.database, "shop");
/// assert!(config.log_file.is_none());
/// #
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HelperConfig {
    /// Connection string of the deployment.
    #[serde(default = "default_uri")]
    pub uri: String,
    /// Name of the database holding the models' collections.
    pub database: String,
    /// The driver writes its command log here when set.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Overrides the driver's server selection timeout.
    #[serde(default)]
    pub server_selection_timeout_ms: Option<i64>,
    /// Create the indexes of every model right after loading the schema.
    #[serde(default)]
    pub create_indexes: bool,
}

/// The connection string used when the configuration does not name one.
fn default_uri() -> String {
    String::from("mongodb://localhost:27017")
}

impl HelperConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).chain("can't parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .chain(|| format!("can't read configuration file `{}`", path.display()))?;

        debug!("loading configuration from `{}`", path.display());

        Self::from_json_str(&json)
    }

    /// Driver options corresponding to this configuration.
    pub fn client_options(&self) -> ClientOptions {
        let mut options = match self.log_file {
            Some(ref file) => ClientOptions::with_log_file(file),
            None => ClientOptions::new(),
        };

        if let Some(timeout) = self.server_selection_timeout_ms {
            options.server_selection_timeout_ms = timeout;
        }

        options
    }

    /// Rejects values the driver would only choke on later.
    fn validate(&self) -> Result<()> {
        if self.uri.is_empty() {
            return Err(Error::new(ErrorKind::Config, "`uri` must not be empty"));
        }
        if self.database.is_empty() {
            return Err(Error::new(ErrorKind::Config, "`database` must not be empty"));
        }
        match self.server_selection_timeout_ms {
            Some(timeout) if timeout <= 0 => Err(Error::new(
                ErrorKind::Config,
                format!("`server_selection_timeout_ms` must be positive, got {}", timeout)
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorExt;
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() -> Result<()> {
        let config = HelperConfig::from_json_str(r#"{ "database": "inventory" }"#)?;

        assert_eq!(config, HelperConfig {
            uri: default_uri(),
            database: String::from("inventory"),
            log_file: None,
            server_selection_timeout_ms: None,
            create_indexes: false,
        });

        Ok(())
    }

    #[test]
    fn timeout_is_passed_to_the_driver() -> Result<()> {
        let config = HelperConfig::from_json_str(r#"{
            "database": "inventory",
            "server_selection_timeout_ms": 2500
        }"#)?;

        assert_eq!(config.client_options().server_selection_timeout_ms, 2500);

        Ok(())
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        let config_errors = vec![
            r#"{ "database": "" }"#,
            r#"{ "database": "x", "uri": "" }"#,
            r#"{ "database": "x", "server_selection_timeout_ms": 0 }"#,
        ];

        for json in config_errors {
            let error = HelperConfig::from_json_str(json).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Config, "{}", json);
        }

        let error = HelperConfig::from_json_str(r#"{ "database": "x", "port": 1 }"#).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::JsonTranscoding);

        let error = HelperConfig::from_json_file("/nonexistent/helper.json").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Io);
    }
}
