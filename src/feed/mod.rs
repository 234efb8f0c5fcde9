mod entry;
mod extract;
mod source;
pub mod tokens;

pub use entry::FeedEntry;
pub use extract::FeedEntries;
pub use source::{FeedReader, FeedSource};
