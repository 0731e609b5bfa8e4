//! The house sorting quiz: the catalog of questions, and the engine that turns a member's
//! answers into a house.

pub mod catalog;
pub mod engine;
pub mod score;
pub mod seed;
pub mod store;

pub use catalog::list_questions_with_answers;
pub use engine::SortingHat;
pub use store::{CatalogStore, MongoCatalog, SessionProvider, UserStore};
