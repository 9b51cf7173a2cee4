//! Chart publication.
//!
//! - `datawrapper`: the upload → metadata → publish stage chain against the
//!   Datawrapper v3 API, plus the description/metadata builders.

pub mod datawrapper;

pub use datawrapper::*;
