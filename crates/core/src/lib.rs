//! Core library for gradlecheck
//!
//! Loads, resolves, and validates Android application build descriptors:
//!
//! - **Loading**: TOML descriptor text into a typed [`descriptor::BuildDescriptor`]
//! - **Resolution**: symbolic `flutter.*` references substituted from an
//!   injected [`catalog::VersionCatalog`]
//! - **Validation**: SDK version ordering, compatibility levels, identifier
//!   shape, dependency/BOM coverage, plus non-blocking warnings
//! - **Error handling**: coded errors with field names, context, and
//!   recovery suggestions
//!
//! The pipeline is one-way and pure; all file IO belongs to the caller.
//!
//! # Example
//!
//! ```rust
//! use gradlecheck_core::{catalog, loader, validate};
//!
//! let raw = r#"
//! namespace = "com.example.app"
//! applicationId = "com.example.app"
//! compileSdk = 34
//! minSdk = 21
//! targetSdk = 34
//! versionCode = 1
//! versionName = "1.0.0"
//! "#;
//!
//! let descriptor = loader::parse(raw).expect("parse");
//! let resolved = catalog::resolve(&descriptor, &catalog::VersionCatalog::default()).expect("resolve");
//! let validated = validate::validate(resolved).expect("validate");
//! assert_eq!(validated.descriptor().min_sdk, 21);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod validate;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{resolve, VersionCatalog};
    pub use crate::descriptor::{BuildDescriptor, Dependency, JavaLevel, ResolvedDescriptor, SdkValue};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::loader::{parse, serialize};
    pub use crate::validate::{check, validate, ValidatedDescriptor, ValidationResult};
}
