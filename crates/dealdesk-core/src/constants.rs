//! Fixed names shared by the naming codec, the folder store and the API.

/// Prefix marking a company folder as archived.
pub const ARCHIVE_MARKER: &str = "(Архив)";

/// Subdirectories created under every company folder, in creation order.
pub const SUBDIRECTORIES: [&str; 6] = [
    "БКИ",
    "Договоры",
    "Документы клиента",
    "Документы продавца",
    "Заключение",
    "Расчет и КП",
];

/// Subdirectory that receives attached commercial offers.
pub const OFFER_SUBDIRECTORY: &str = "Расчет и КП";

/// Prefix of hidden temporary files written during atomic offer writes.
pub const TEMP_FILE_PREFIX: &str = ".dealdesk-";

/// Suffix of hidden temporary files written during atomic offer writes.
pub const TEMP_FILE_SUFFIX: &str = ".part";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_subdirectory_is_part_of_the_tree() {
        assert!(SUBDIRECTORIES.contains(&OFFER_SUBDIRECTORY));
    }
}
