//! Response messages returned by the HTTP handlers.
//!
//! Folder messages are in Russian; offer messages are in English. Clients match
//! on them, so keep the wording stable.

pub const FOLDER_CREATED: &str = "Папка успешно создана.";
pub const FOLDER_DELETED: &str = "Папка успешно удалена.";
pub const FOLDER_ARCHIVED: &str = "Папка успешно обновлена до архива.";
pub const FOLDER_ACTIVATED: &str = "Папка успешно обновлена до активного состояния.";

pub const OFFER_UPLOADED: &str = "File uploaded successfully";
pub const OFFER_CREATED: &str = "File created successfully";
