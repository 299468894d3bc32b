//! Search resolution over the in-memory record sequence.
//!
//! Lookup by ID, with optional augmentation of the description by the
//! record's photo URL. Augmentation happens on a clone; the stored record
//! is never mutated by a search.

use crate::error::{Error, Result};
use crate::store::{find_by_id, Record};

/// Parse the `include_photo` form/query value.
///
/// HTML checkboxes submit `"on"`; API clients send `"true"` or a JSON
/// boolean. Everything else, including absence, is falsy.
pub fn include_photo_requested(value: Option<&str>) -> bool {
    matches!(value, Some("on") | Some("true"))
}

/// Look up a record by ID, optionally appending a photo reference to the
/// returned copy's description.
pub fn search(records: &[Record], id: u64, include_photo: bool) -> Result<Record> {
    let record = find_by_id(records, id).ok_or(Error::NotFound)?;
    let mut found = record.clone();

    if include_photo {
        if let Some(url) = &found.photo_url {
            let description = found.description.take().unwrap_or_default();
            found.description = Some(format!("{} (Photo: {})", description, url));
        }
    }

    Ok(found)
}
