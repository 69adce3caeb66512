//! Descriptor validation
//!
//! Checks the internal consistency of a resolved descriptor: SDK version
//! ordering, compatibility levels, identifier shape, and dependency/BOM
//! coverage. Errors abort the build; warnings surface questionable but
//! legal configuration (a release variant signed with the debug profile
//! is reported, never rewritten).

use crate::descriptor::{plugins, DependencyScope, ResolvedDescriptor};
use crate::error::{Error, ErrorCode, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Reverse-domain identifier: at least two dot-separated segments, each
/// starting with a letter.
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$").unwrap());

/// A single validation finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Finding code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Accumulated validation findings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Fail-fast conversion: the first error decides the error code
    pub fn to_result(&self) -> Result<()> {
        match self.errors.first() {
            None => Ok(()),
            Some(first) => {
                let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
                Err(Error::new(
                    error_code_for(&first.code),
                    format!("Validation failed: {}", messages.join("; ")),
                )
                .with_field(first.field.clone()))
            }
        }
    }
}

fn error_code_for(finding_code: &str) -> ErrorCode {
    match finding_code {
        codes::SDK_RANGE_INVALID => ErrorCode::SdkRangeInvalid,
        codes::COMPATIBILITY_MISMATCH => ErrorCode::CompatibilityMismatch,
        codes::UNRESOLVED_REFERENCE => ErrorCode::UnresolvedReference,
        codes::MISSING_REQUIRED_FIELD => ErrorCode::MissingRequiredField,
        codes::INVALID_IDENTIFIER => ErrorCode::InvalidIdentifier,
        codes::INVALID_VALUE => ErrorCode::InvalidValue,
        _ => ErrorCode::ValidationFailed,
    }
}

/// Finding codes emitted by the validator
pub mod codes {
    pub const SDK_RANGE_INVALID: &str = "SDK_RANGE_INVALID";
    pub const COMPATIBILITY_MISMATCH: &str = "COMPATIBILITY_MISMATCH";
    pub const UNRESOLVED_REFERENCE: &str = "UNRESOLVED_REFERENCE";
    pub const MISSING_REQUIRED_FIELD: &str = "MISSING_REQUIRED_FIELD";
    pub const INVALID_IDENTIFIER: &str = "INVALID_IDENTIFIER";
    pub const INVALID_VALUE: &str = "INVALID_VALUE";

    pub const RELEASE_SIGNED_WITH_DEBUG: &str = "RELEASE_SIGNED_WITH_DEBUG";
    pub const APPLICATION_ID_MISMATCH: &str = "APPLICATION_ID_MISMATCH";
    pub const PLUGIN_ORDER: &str = "PLUGIN_ORDER";
    pub const VERSION_NAME_NOT_SEMVER: &str = "VERSION_NAME_NOT_SEMVER";
    pub const DESUGARING_WITHOUT_LIBRARY: &str = "DESUGARING_WITHOUT_LIBRARY";
    pub const DUPLICATE_DEPENDENCY: &str = "DUPLICATE_DEPENDENCY";
}

/// A descriptor that passed validation
///
/// Only constructible through [`validate`], so holding one proves the
/// invariants checked there. The transition is one-way; the inner
/// descriptor is read-only.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedDescriptor {
    descriptor: ResolvedDescriptor,
    warnings: Vec<ValidationError>,
}

impl ValidatedDescriptor {
    /// The validated descriptor
    pub fn descriptor(&self) -> &ResolvedDescriptor {
        &self.descriptor
    }

    /// Warnings surfaced during validation (non-blocking)
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Consume the wrapper
    pub fn into_inner(self) -> ResolvedDescriptor {
        self.descriptor
    }
}

/// Run every check and accumulate findings without failing
pub fn check(descriptor: &ResolvedDescriptor) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.merge(check_identifiers(descriptor));
    result.merge(check_sdk_range(descriptor));
    result.merge(check_compatibility(descriptor));
    result.merge(check_versions(descriptor));
    result.merge(check_plugins(descriptor));
    result.merge(check_dependencies(descriptor));
    result.merge(check_signing(descriptor));
    result
}

/// Validate a resolved descriptor, consuming it on success
///
/// Fails fast with the first error's code; warnings ride along on the
/// validated descriptor.
pub fn validate(descriptor: ResolvedDescriptor) -> Result<ValidatedDescriptor> {
    let result = check(&descriptor);
    result.to_result()?;
    Ok(ValidatedDescriptor {
        descriptor,
        warnings: result.warnings.clone(),
    })
}

fn check_identifiers(descriptor: &ResolvedDescriptor) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (field, value) in [
        ("namespace", &descriptor.namespace),
        ("applicationId", &descriptor.application_id),
    ] {
        if value.trim().is_empty() {
            result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: codes::MISSING_REQUIRED_FIELD.to_string(),
                expected: Some("non-empty value".to_string()),
                actual: Some("empty".to_string()),
            });
        } else if !IDENTIFIER.is_match(value) {
            result.add_error(ValidationError {
                field: field.to_string(),
                message: "Must be a reverse-domain identifier (e.g. com.example.app)".to_string(),
                code: codes::INVALID_IDENTIFIER.to_string(),
                expected: Some("reverse-domain identifier".to_string()),
                actual: Some(value.clone()),
            });
        }
    }

    if descriptor.application_id != descriptor.namespace {
        result.add_warning(ValidationError {
            field: "applicationId".to_string(),
            message: "applicationId differs from namespace".to_string(),
            code: codes::APPLICATION_ID_MISMATCH.to_string(),
            expected: Some(descriptor.namespace.clone()),
            actual: Some(descriptor.application_id.clone()),
        });
    }

    result
}

fn check_sdk_range(descriptor: &ResolvedDescriptor) -> ValidationResult {
    let mut result = ValidationResult::new();

    if descriptor.min_sdk > descriptor.target_sdk {
        result.add_error(ValidationError {
            field: "minSdk".to_string(),
            message: format!(
                "minSdk ({}) must not exceed targetSdk ({})",
                descriptor.min_sdk, descriptor.target_sdk
            ),
            code: codes::SDK_RANGE_INVALID.to_string(),
            expected: Some(format!("<= {}", descriptor.target_sdk)),
            actual: Some(descriptor.min_sdk.to_string()),
        });
    }

    if descriptor.target_sdk > descriptor.compile_sdk {
        result.add_error(ValidationError {
            field: "targetSdk".to_string(),
            message: format!(
                "targetSdk ({}) must not exceed compileSdk ({})",
                descriptor.target_sdk, descriptor.compile_sdk
            ),
            code: codes::SDK_RANGE_INVALID.to_string(),
            expected: Some(format!("<= {}", descriptor.compile_sdk)),
            actual: Some(descriptor.target_sdk.to_string()),
        });
    }

    result
}

fn check_compatibility(descriptor: &ResolvedDescriptor) -> ValidationResult {
    let mut result = ValidationResult::new();
    let options = &descriptor.compile_options;

    if options.source_compatibility != options.target_compatibility {
        result.add_error(ValidationError {
            field: "sourceCompatibility".to_string(),
            message: format!(
                "sourceCompatibility ({}) and targetCompatibility ({}) must be identical",
                options.source_compatibility, options.target_compatibility
            ),
            code: codes::COMPATIBILITY_MISMATCH.to_string(),
            expected: Some(options.target_compatibility.to_string()),
            actual: Some(options.source_compatibility.to_string()),
        });
    }

    result
}

fn check_versions(descriptor: &ResolvedDescriptor) -> ValidationResult {
    let mut result = ValidationResult::new();

    if descriptor.version_code == 0 {
        result.add_error(ValidationError {
            field: "versionCode".to_string(),
            message: "versionCode must be a positive integer".to_string(),
            code: codes::INVALID_VALUE.to_string(),
            expected: Some(">= 1".to_string()),
            actual: Some("0".to_string()),
        });
    }

    // versionName is display-only, so a non-semver value is a warning
    if semver::Version::parse(&descriptor.version_name).is_err() {
        result.add_warning(ValidationError {
            field: "versionName".to_string(),
            message: "versionName is not a semantic version".to_string(),
            code: codes::VERSION_NAME_NOT_SEMVER.to_string(),
            expected: Some("MAJOR.MINOR.PATCH".to_string()),
            actual: Some(descriptor.version_name.clone()),
        });
    }

    result
}

fn check_plugins(descriptor: &ResolvedDescriptor) -> ValidationResult {
    let mut result = ValidationResult::new();

    // The Flutter Gradle plugin must come after the Android and Kotlin
    // plugins. The build tool is the enforcer; we only surface it.
    let position = |id: &str| descriptor.plugins.iter().position(|p| p == id);
    if let Some(flutter_pos) = position(plugins::FLUTTER_GRADLE) {
        for platform_plugin in [plugins::ANDROID_APPLICATION, plugins::KOTLIN_ANDROID] {
            if let Some(pos) = position(platform_plugin) {
                if pos > flutter_pos {
                    result.add_warning(ValidationError {
                        field: "plugins".to_string(),
                        message: format!(
                            "'{}' is declared before '{}'; the Flutter plugin must be applied after the Android and Kotlin plugins",
                            plugins::FLUTTER_GRADLE, platform_plugin
                        ),
                        code: codes::PLUGIN_ORDER.to_string(),
                        expected: Some(format!("{} after {}", plugins::FLUTTER_GRADLE, platform_plugin)),
                        actual: Some(descriptor.plugins.join(", ")),
                    });
                }
            }
        }
    }

    result
}

fn check_dependencies(descriptor: &ResolvedDescriptor) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (index, dep) in descriptor.dependencies.iter().enumerate() {
        let field = format!("dependencies[{}]", index);

        if dep.id.trim().is_empty() {
            result.add_error(ValidationError {
                field,
                message: "Dependency identifier is required".to_string(),
                code: codes::MISSING_REQUIRED_FIELD.to_string(),
                expected: Some("group:artifact coordinate".to_string()),
                actual: Some("empty".to_string()),
            });
            continue;
        }

        if dep.platform && dep.version.is_none() {
            result.add_error(ValidationError {
                field,
                message: format!("Platform (BOM) entry '{}' must pin a version", dep.id),
                code: codes::INVALID_VALUE.to_string(),
                expected: Some("pinned version".to_string()),
                actual: Some("none".to_string()),
            });
            continue;
        }

        // Version-less entries defer to a BOM covering their group
        if dep.version.is_none() && !dep.platform {
            let covered = descriptor
                .dependencies
                .iter()
                .any(|bom| bom.platform && bom.version.is_some() && bom.group() == dep.group());
            if !covered {
                result.add_error(ValidationError {
                    field,
                    message: format!(
                        "'{}' has no version and no platform (BOM) entry covers group '{}'",
                        dep.id,
                        dep.group()
                    ),
                    code: codes::UNRESOLVED_REFERENCE.to_string(),
                    expected: Some(format!("platform entry for group '{}'", dep.group())),
                    actual: Some("none".to_string()),
                });
            }
        }

        let duplicate = descriptor.dependencies[..index].iter().any(|d| d.id == dep.id);
        if duplicate {
            result.add_warning(ValidationError {
                field: format!("dependencies[{}]", index),
                message: format!("Duplicate dependency '{}'", dep.id),
                code: codes::DUPLICATE_DEPENDENCY.to_string(),
                expected: None,
                actual: Some(dep.id.clone()),
            });
        }
    }

    if descriptor.compile_options.enable_core_library_desugaring {
        let has_desugaring_dep = descriptor
            .dependencies
            .iter()
            .any(|d| d.scope == DependencyScope::CoreLibraryDesugaring);
        if !has_desugaring_dep {
            result.add_warning(ValidationError {
                field: "enableCoreLibraryDesugaring".to_string(),
                message: "Desugaring is enabled but no coreLibraryDesugaring dependency is declared"
                    .to_string(),
                code: codes::DESUGARING_WITHOUT_LIBRARY.to_string(),
                expected: Some("a coreLibraryDesugaring-scoped dependency".to_string()),
                actual: Some("none".to_string()),
            });
        }
    }

    result
}

fn check_signing(descriptor: &ResolvedDescriptor) -> ValidationResult {
    let mut result = ValidationResult::new();

    // Possibly intentional for placeholder projects, so never auto-fixed
    if descriptor.signing_configs.get("release").map(String::as_str) == Some("debug") {
        result.add_warning(ValidationError {
            field: "signingConfigs.release".to_string(),
            message: "Release variant is signed with the debug profile".to_string(),
            code: codes::RELEASE_SIGNED_WITH_DEBUG.to_string(),
            expected: Some("a dedicated release signing profile".to_string()),
            actual: Some("debug".to_string()),
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{resolve, VersionCatalog};
    use crate::descriptor::{BuildDescriptor, Dependency, JavaLevel};
    use proptest::prelude::*;

    fn resolved_default() -> ResolvedDescriptor {
        resolve(&BuildDescriptor::default(), &VersionCatalog::default()).unwrap()
    }

    #[test]
    fn test_stock_descriptor_is_valid() {
        let validated = validate(resolved_default()).unwrap();
        assert_eq!(
            validated.descriptor().application_id,
            validated.descriptor().namespace
        );
        // The stock descriptor aliases release signing to debug
        assert!(validated
            .warnings()
            .iter()
            .any(|w| w.code == codes::RELEASE_SIGNED_WITH_DEBUG));
    }

    #[test]
    fn test_sdk_range_rejected() {
        let mut descriptor = resolved_default();
        descriptor.min_sdk = 21;
        descriptor.target_sdk = 19;
        descriptor.compile_sdk = 34;

        let err = validate(descriptor).unwrap_err();
        assert_eq!(err.code, ErrorCode::SdkRangeInvalid);
        assert_eq!(err.field.as_deref(), Some("minSdk"));
    }

    #[test]
    fn test_target_above_compile_rejected() {
        let mut descriptor = resolved_default();
        descriptor.min_sdk = 21;
        descriptor.target_sdk = 35;
        descriptor.compile_sdk = 34;

        let err = validate(descriptor).unwrap_err();
        assert_eq!(err.code, ErrorCode::SdkRangeInvalid);
        assert_eq!(err.field.as_deref(), Some("targetSdk"));
    }

    #[test]
    fn test_compatibility_mismatch_rejected() {
        let mut descriptor = resolved_default();
        descriptor.compile_options.source_compatibility = JavaLevel::V11;
        descriptor.compile_options.target_compatibility = JavaLevel::V17;

        let err = validate(descriptor).unwrap_err();
        assert_eq!(err.code, ErrorCode::CompatibilityMismatch);
    }

    #[test]
    fn test_versionless_dependency_without_bom_rejected() {
        let mut descriptor = resolved_default();
        descriptor.dependencies = vec![Dependency {
            id: "firebase-auth".to_string(),
            version: None,
            platform: false,
            scope: Default::default(),
        }];

        let err = validate(descriptor).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnresolvedReference);
    }

    #[test]
    fn test_bom_covers_same_group_only() {
        let mut descriptor = resolved_default();
        descriptor.dependencies.push(Dependency {
            id: "com.squareup.okhttp3:okhttp".to_string(),
            version: None,
            platform: false,
            scope: Default::default(),
        });

        // firebase-bom does not cover okhttp's group
        let result = check(&descriptor);
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, codes::UNRESOLVED_REFERENCE);
    }

    #[test]
    fn test_bom_without_version_rejected() {
        let mut descriptor = resolved_default();
        descriptor.dependencies = vec![Dependency {
            id: "com.google.firebase:firebase-bom".to_string(),
            version: None,
            platform: true,
            scope: Default::default(),
        }];

        let result = check(&descriptor);
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, codes::INVALID_VALUE);
    }

    #[test]
    fn test_bad_namespace_rejected() {
        let mut descriptor = resolved_default();
        descriptor.namespace = "not a namespace".to_string();

        let err = validate(descriptor).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidIdentifier);
    }

    #[test]
    fn test_empty_namespace_is_missing_field() {
        let mut descriptor = resolved_default();
        descriptor.namespace = String::new();

        let err = validate(descriptor).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
    }

    #[test]
    fn test_zero_version_code_rejected() {
        let mut descriptor = resolved_default();
        descriptor.version_code = 0;

        let err = validate(descriptor).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidValue);
    }

    #[test]
    fn test_flutter_plugin_order_warns() {
        let mut descriptor = resolved_default();
        descriptor.plugins = vec![
            plugins::FLUTTER_GRADLE.to_string(),
            plugins::ANDROID_APPLICATION.to_string(),
            plugins::KOTLIN_ANDROID.to_string(),
        ];

        let result = check(&descriptor);
        assert!(result.is_valid());
        assert!(result
            .warnings()
            .iter()
            .any(|w| w.code == codes::PLUGIN_ORDER));
    }

    #[test]
    fn test_application_id_drift_warns() {
        let mut descriptor = resolved_default();
        descriptor.application_id = "com.example.other".to_string();

        let result = check(&descriptor);
        assert!(result.is_valid());
        assert!(result
            .warnings()
            .iter()
            .any(|w| w.code == codes::APPLICATION_ID_MISMATCH));
    }

    #[test]
    fn test_non_semver_version_name_warns() {
        let mut descriptor = resolved_default();
        descriptor.version_name = "1.0".to_string();

        let result = check(&descriptor);
        assert!(result.is_valid());
        assert!(result
            .warnings()
            .iter()
            .any(|w| w.code == codes::VERSION_NAME_NOT_SEMVER));
    }

    #[test]
    fn test_desugaring_without_library_warns() {
        let mut descriptor = resolved_default();
        descriptor
            .dependencies
            .retain(|d| d.scope != DependencyScope::CoreLibraryDesugaring);

        let result = check(&descriptor);
        assert!(result
            .warnings()
            .iter()
            .any(|w| w.code == codes::DESUGARING_WITHOUT_LIBRARY));
    }

    proptest! {
        /// Any triple accepted by validation satisfies min <= target <= compile,
        /// and any violating triple is rejected with SDK_RANGE_INVALID.
        #[test]
        fn prop_sdk_range_invariant(min in 1u32..50, target in 1u32..50, compile in 1u32..50) {
            let mut descriptor = resolved_default();
            descriptor.min_sdk = min;
            descriptor.target_sdk = target;
            descriptor.compile_sdk = compile;

            let result = check(&descriptor);
            let range_ok = min <= target && target <= compile;
            let has_range_error = result
                .errors()
                .iter()
                .any(|e| e.code == codes::SDK_RANGE_INVALID);
            prop_assert_eq!(range_ok, !has_range_error);
        }
    }
}
