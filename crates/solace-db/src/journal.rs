pub mod journal_entry;
pub mod journal_media;
