//! Extensions that ship with lumen.

pub mod browser_bookmarks;
pub mod deepl_translator;

pub use browser_bookmarks::BrowserBookmarks;
pub use deepl_translator::DeeplTranslator;
