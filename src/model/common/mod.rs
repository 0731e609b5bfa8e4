//! Types that are serialised identically for the API and the database.

mod house;

pub use house::{House, UnknownHouse};
