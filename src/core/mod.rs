//! Core data model shared by extensions, the host and frontends.
//!
//! - [`search_result`] - result items, actions, images and translation references
//! - [`action_utility`] - factories for the standard actions

pub mod action_utility;
pub mod search_result;

pub use search_result::{Image, SearchResultItem, SearchResultItemAction, TranslationRef};
