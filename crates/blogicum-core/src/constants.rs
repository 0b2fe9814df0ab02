//! Limits shared by the domain, the forms and the storage schema.

/// Maximum length of titles, names, slugs and comment text.
pub const MAX_CHAR_FIELD: u64 = 256;

/// Maximum length of usernames and personal names.
pub const MAX_NAME_FIELD: u64 = 150;

/// Display labels are cut to this many characters.
pub const LABEL_LENGTH: usize = 30;

/// Posts per listing page.
pub const POSTS_PER_PAGE: u64 = 10;
