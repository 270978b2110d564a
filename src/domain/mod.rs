pub mod item;
pub mod term;

pub use item::ExtractedItem;
pub use term::SearchTerm;
