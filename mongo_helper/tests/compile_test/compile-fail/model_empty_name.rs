#[macro_use]
extern crate mongo_helper_derive;
extern crate mongo_helper;
#[macro_use]
extern crate serde_derive;
extern crate serde;

#[derive(Debug, Clone, Serialize, Deserialize, Model)] //~ ERROR proc-macro derive panicked
#[model(name = "")]
struct Nameless { //~| its name must not be empty
    _id: i64,
}

fn main() {}
