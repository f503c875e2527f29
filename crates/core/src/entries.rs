//! Editing of ordered text lists (allergies, medications).
//!
//! There is no partial-array update on the wire: callers build the new list with these helpers
//! and send it wholesale in a [`crate::PatientUpdate`].

/// Returns `entries` with `entry` appended at the end.
///
/// The entry is trimmed first; a blank entry leaves the list unchanged.
pub fn append_entry(entries: &[String], entry: &str) -> Vec<String> {
    let mut next = entries.to_vec();
    let entry = entry.trim();
    if !entry.is_empty() {
        next.push(entry.to_string());
    }
    next
}

/// Returns `entries` without the element at `index`, preserving the order of the rest.
///
/// An out-of-range index leaves the list unchanged.
pub fn remove_entry(entries: &[String], index: usize) -> Vec<String> {
    let mut next = entries.to_vec();
    if index < next.len() {
        next.remove(index);
    }
    next
}
