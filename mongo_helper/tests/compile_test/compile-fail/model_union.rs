#[macro_use]
extern crate mongo_helper_derive;
extern crate mongo_helper;
#[macro_use]
extern crate serde_derive;
extern crate serde;

#[derive(Clone, Copy, Model)] //~ ERROR proc-macro derive panicked
union Bits { //~| only `struct`s map to top-level documents
    signed: i32,
    unsigned: u32,
}

fn main() {}
