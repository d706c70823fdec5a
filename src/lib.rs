//! An EditorConfig Core: a glob-to-regex pattern compiler and cascade
//! resolver for `.editorconfig` files.
//!
//! # Examples
//!
//! ```no_run
//! use editorconfig_core::{resolve, property::IndentStyle};
//!
//! // Must be an absolute, normalized path. The file need not exist.
//! let path = "/home/myself/README.md";
//!
//! let properties = resolve(path.as_ref()).unwrap();
//!
//! let indent_style = properties.indent_style();
//! assert!(matches!(indent_style, None | Some(IndentStyle::Tab | IndentStyle::Space)));
//! ```
//!
//! # Notes
//!
//! - Option names are lower-cased at parse time.
//! - Values are kept verbatim, except for the ["Supported"](https://editorconfig.org/#supported-properties)
//!   properties, which are canonicalized after the cascade is merged.
//!
//! # CLI
//!
//! This package also contains a binary crate: a small EditorConfig CLI
//! built on top of this library, useful both for compatibility testing
//! against [editorconfig-core-test] and for ad hoc inspection from the
//! shell.
//!
//! [editorconfig-core-test]: https://github.com/editorconfig/editorconfig-core-test

mod error;
mod glob;
mod ini;
pub mod property;
mod resolve;
mod version;

pub use crate::error::Error;
pub use crate::property::PropertyMap;
pub use crate::resolve::{resolve, resolve_with_options, Options};
pub use crate::version::{Version, MAX_VERSION};
