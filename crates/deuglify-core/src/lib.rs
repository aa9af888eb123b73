#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Un-minify JavaScript: expand compacted statements, then give ambiguous
//! single-character bindings unique names.

pub mod config;
pub mod error;
pub mod expand;
pub mod mangle;
pub mod transform;
pub mod version;

pub use config::Config;
pub use error::{Error, Result};
pub use expand::{expand, ExpandStats};
pub use mangle::{mangle, short_id, MangleOutcome, UnsafeConstruct};
pub use transform::{deuglify, deuglify_str, transform, Output, TransformReport};
pub use version::{version_string, VERSION};
