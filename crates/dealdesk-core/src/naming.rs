//! Company folder naming
//!
//! Folder state lives entirely in the directory name:
//!
//! - active:   `"<deal_number> <company_name> (id_<company_id>)"`
//! - archived: `"(Архив)<name without deal_number>"`
//!
//! Every rewrite here is literal text replacement of *all* occurrences, not
//! structured parsing. A deal number that also appears inside the company name
//! is removed from there too on archive, and activation only strips the exact
//! `"(Архив) "` sequence (marker followed by one space).
//!
//! All functions are pure; the folder store applies their output with a single
//! rename.

use crate::constants::ARCHIVE_MARKER;

/// The id marker embedded in every company folder name.
pub fn id_marker(company_id: &str) -> String {
    format!("(id_{})", company_id)
}

/// Name of a freshly created (active) company folder.
pub fn canonical_name(company_name: &str, company_id: &str, deal_number: &str) -> String {
    format!("{} {} {}", deal_number, company_name, id_marker(company_id))
}

/// Name after archiving: every occurrence of `deal_number` is removed and the
/// archive marker is prepended without a separator.
pub fn archived_name(current: &str, deal_number: &str) -> String {
    format!("{}{}", ARCHIVE_MARKER, current.replace(deal_number, ""))
}

/// Name after activation: every `"(Архив) "` is removed and `deal_number`
/// plus one space is prepended.
pub fn activated_name(current: &str, deal_number: &str) -> String {
    let marker_with_space = format!("{} ", ARCHIVE_MARKER);
    format!("{} {}", deal_number, current.replace(&marker_with_space, ""))
}

/// Whether a folder name carries the archive marker.
pub fn is_archived(name: &str) -> bool {
    name.starts_with(ARCHIVE_MARKER)
}

/// Whether a folder name embeds the id marker for `company_id`.
pub fn embeds_id(name: &str, company_id: &str) -> bool {
    name.contains(&id_marker(company_id))
}
