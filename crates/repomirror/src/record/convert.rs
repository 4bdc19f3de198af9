//! Conversion from remote listings to normalized records.

use super::types::{RawListing, Record};

/// Split a full name into `(owner, name)` on the first `/`.
///
/// Without a `/` the whole string is the owner and the name is empty.
pub fn split_full_name(full_name: &str) -> (String, String) {
    match full_name.split_once('/') {
        Some((owner, name)) => (owner.to_string(), name.to_string()),
        None => (full_name.to_string(), String::new()),
    }
}

/// Split a description into `(category, description)` on the first `:`.
///
/// Without a `:` the category is empty and the description is kept whole.
pub fn split_description(description: &str) -> (String, String) {
    match description.split_once(':') {
        Some((category, rest)) => (category.to_string(), rest.to_string()),
        None => (String::new(), description.to_string()),
    }
}

/// Convert a remote listing into a [`Record`]. Never fails.
pub fn to_record(listing: RawListing) -> Record {
    let (owner, name) = split_full_name(&listing.full_name);
    let (category, description) = split_description(&listing.description);

    Record {
        name,
        owner,
        full_name: listing.full_name,
        category,
        description,
        raw_description: listing.description,
        html_url: listing.html_url,
        homepage: listing.homepage,
        topics: listing.topics,
        created_at: listing.created_at.map(|t| t.date_naive()),
        updated_at: listing.updated_at.map(|t| t.date_naive()),
        uid: listing.id,
    }
}
