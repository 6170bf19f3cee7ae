//! # toon-codec
//!
//! Encoder and decoder for the flat dialect of **TOON (Token-Oriented Object
//! Notation)** used to store skill records compactly.
//!
//! A document is a sequence of top-level fields. Each field holds a scalar,
//! a `|`-separated list of scalars, or a table of flat records whose header
//! names the columns once so rows carry only values. Well-known field names
//! may be written as single letters (`N` for `name`, `D` for `description`,
//! ...), which typically saves a further handful of tokens per record.
//!
//! ## Quick start
//!
//! ```rust
//! use toon_codec::{decode, encode, Document, ToonValue};
//!
//! let mut doc = Document::new();
//! doc.insert("name", ToonValue::from("code-review"));
//! doc.insert("stable", ToonValue::from(true));
//!
//! let toon = encode(&doc).unwrap();
//! assert_eq!(toon, "name: code-review\nstable: T\n");
//! assert_eq!(decode(&toon).unwrap(), doc);
//!
//! // Abbreviated keys decode to the same document.
//! assert_eq!(decode("N:code-review\nstable: true").unwrap(), doc);
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] — `Document` → TOON string
//! - [`decoder`] — TOON string → `Document` (line state machine)
//! - [`keys`] — abbreviated key alphabet
//! - [`json`] — JSON ↔ `Document` bridge
//! - [`types`] — `Scalar` / `ToonValue` / `Document` value model
//! - [`error`] — Error types for parse/encode failures

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod keys;
pub mod types;

pub use decoder::{decode, decode_with_diagnostics, Diagnostic, DiagnosticKind};
pub use encoder::{encode, encode_with, EncodeOptions, KeyStyle};
pub use error::ToonError;
pub use json::{decode_to_json, encode_json, from_json, to_json};
pub use types::{Document, Fields, Row, Scalar, ToonValue};
