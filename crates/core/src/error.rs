use thiserror::Error;

/// Fatal conditions raised while turning a Hoarder export into a Linkwarden import.
///
/// Malformed individual entries never produce one of these; they are skipped or
/// coerced to defaults instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("The Hoarder export does not contain a 'bookmarks' key.")]
    MissingBookmarks,

    #[error("'bookmarks' should be a list in the Hoarder export.")]
    BookmarksNotList,

    #[error("No link-type bookmarks were found in the Hoarder export.")]
    NoLinkBookmarks,
}
