#[macro_use]
extern crate mongo_helper_derive;
extern crate mongo_helper;
#[macro_use]
extern crate serde_derive;
extern crate serde;

#[derive(Debug, Clone, Serialize, Deserialize, Model)] //~ ERROR proc-macro derive panicked
#[model(collection = "accounts")] //~| unknown key `collection` in `#[model(...)]`
struct Account {
    _id: i64,
}

fn main() {}
