#[macro_use]
extern crate mongo_helper_derive;
extern crate mongo_helper;
#[macro_use]
extern crate serde_derive;
extern crate serde;

use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, Model)] //~ ERROR proc-macro derive panicked
struct Profile { //~| `#[serde(flatten)]` fields are not supported in models
    _id: i64,
    #[serde(flatten)]
    extra: HashMap<String, String>,
}

fn main() {}
