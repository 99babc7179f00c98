//! File-based overrides
//!
//! An override document always wins over the persisted value. Resolution
//! returns the effective settings together with their provenance so callers
//! can tell which values are locked by the document.

mod document;
mod resolve;

pub use document::{OverrideDocument, OverrideError, WILDCARD_BUCKET};
pub use resolve::{EffectiveSettings, resolve};
