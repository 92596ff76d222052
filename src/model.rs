//! Canonical data model for extracted verses.
//!
//! The verse extractor produces this shape; the CLI serializes it as JSON.

use serde::{Deserialize, Serialize};

/// One verse record, in document order.
///
/// `chapter` is the carried-forward chapter label, `verse` the verse number
/// label, and `contents` the stripped verse text (inline verse-num, footnote,
/// and heading tags survive stripping).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub chapter: String,
    pub verse: String,
    pub contents: String,
}
