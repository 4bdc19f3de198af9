//! Normalized repository records and their storage projections.
//!
//! A [`Record`] is built from a [`RawListing`] on every sync pass and is the
//! only thing store adapters ever see. Two projections exist:
//!
//! - [`RepoView`] - the relational / read API shape (topics as one string)
//! - [`CachePayload`] - the key-value value shape (topics as an array)

mod convert;
mod projection;
mod types;

pub use convert::{split_description, split_full_name, to_record};
pub use projection::{CachePayload, RepoView, join_topics, split_topics};
pub use types::{DAY_FORMAT, RawListing, Record};
