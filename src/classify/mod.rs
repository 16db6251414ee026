//! Classification rules for incident rows.
//!
//! Both classifiers are total functions over ordered rule tables: the first
//! matching rule wins, and anything unmatched falls through to a catch-all.

pub mod message;
pub mod path;

pub use message::classify_message;
pub use path::classify_path;
