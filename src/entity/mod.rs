pub mod documents;

pub use documents::Entity as Documents;
