//! # pguard_dictionary
//!
//! Dictionary consolidation for pguard.
//!
//! An environment carries an ordered stack of dictionaries. This crate flattens
//! the stack into one mapping (earlier dictionaries override later ones) and
//! resolves `{{KEY}}` references inside values until none remain:
//!
//! - Self-referencing entries are rejected
//! - References to unknown keys are rejected
//! - Longer reference cycles are diagnosed and reported with their path
//!
//! ## Example
//!
//! ```rust
//! use pguard_dictionary::{resolve, Dictionary};
//!
//! let base = Dictionary::from_entries("base", [("FOO", "foo"), ("BAR", "{{FOO}} and bar")]);
//! let overrides = Dictionary::from_entries("overrides", [("FOO", "overridden foo")]);
//!
//! let consolidated = resolve(&[overrides, base]).unwrap();
//! assert_eq!(consolidated.get("BAR"), Some("overridden foo and bar"));
//! ```

pub mod dictionary;
pub mod error;
pub mod resolver;
pub mod scanner;

pub use dictionary::{ConsolidatedDictionary, Dictionary, FileFormat};
pub use error::{DictionaryError, DictionaryResult};
pub use resolver::{resolve, DictionaryResolver, ResolverOptions, DEFAULT_MAX_PASSES};
pub use scanner::{PlaceholderMatch, PlaceholderScanner, PLACEHOLDER_PATTERN};
