//! Text codecs used by mpv-handler.
//!
//! - [`ini`]: format-preserving INI configuration documents.
//! - [`percent`]: URL query-component percent-decoding.

pub mod ini;
pub mod percent;
