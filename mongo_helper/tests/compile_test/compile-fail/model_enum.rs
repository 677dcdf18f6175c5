#[macro_use]
extern crate mongo_helper_derive;
extern crate mongo_helper;
#[macro_use]
extern crate serde_derive;
extern crate serde;

#[derive(Debug, Clone, Serialize, Deserialize, Model)] //~ ERROR proc-macro derive panicked
enum Shape { //~| only `struct`s map to top-level documents
    Circle { _id: i64, radius: f64 },
    Square { _id: i64, side: f64 },
}

fn main() {}
