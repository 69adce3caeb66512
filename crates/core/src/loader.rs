//! Build descriptor parsing
//!
//! Turns raw configuration text into an unvalidated [`BuildDescriptor`].
//! The loader never touches the filesystem; callers hand it bytes they
//! already read. Malformed text fails with `SyntaxInvalid`, absent
//! required fields with `MissingRequiredField`.

use crate::descriptor::BuildDescriptor;
use crate::error::{Error, Result};

/// Parse descriptor configuration text
pub fn parse(raw: &str) -> Result<BuildDescriptor> {
    toml::from_str(raw).map_err(classify_parse_error)
}

/// Serialize a descriptor back to configuration text
///
/// `parse(serialize(d))` yields a descriptor equal to `d`.
pub fn serialize(descriptor: &BuildDescriptor) -> Result<String> {
    toml::to_string_pretty(descriptor).map_err(|e| {
        Error::syntax(format!("Failed to serialize descriptor: {}", e)).with_source(e)
    })
}

/// Distinguish a missing required field from general syntax breakage
fn classify_parse_error(err: toml::de::Error) -> Error {
    let message = err.message().to_string();
    if let Some(rest) = message.strip_prefix("missing field `") {
        let field = rest.split('`').next().unwrap_or("");
        return Error::missing_field(field).with_source(err);
    }
    Error::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DependencyScope, SdkValue};
    use crate::error::ErrorCode;

    const FULL_DESCRIPTOR: &str = r#"
namespace = "com.example.studybuddy"
applicationId = "com.example.studybuddy"
compileSdk = "flutter.compileSdkVersion"
minSdk = "flutter.minSdkVersion"
targetSdk = "flutter.targetSdkVersion"
ndkVersion = "flutter.ndkVersion"
versionCode = "flutter.versionCode"
versionName = "flutter.versionName"
plugins = [
    "com.android.application",
    "kotlin-android",
    "dev.flutter.flutter-gradle-plugin",
    "com.google.gms.google-services",
]

[compileOptions]
sourceCompatibility = "11"
targetCompatibility = "11"
jvmTarget = "11"
enableCoreLibraryDesugaring = true

[signingConfigs]
debug = "debug"
release = "debug"

[[dependencies]]
id = "com.google.firebase:firebase-bom"
version = "33.2.0"
platform = true

[[dependencies]]
id = "com.google.firebase:firebase-auth"

[[dependencies]]
id = "com.google.firebase:firebase-firestore"

[[dependencies]]
id = "com.android.tools:desugar_jdk_libs"
version = "2.0.3"
scope = "coreLibraryDesugaring"
"#;

    #[test]
    fn test_parse_full_descriptor() {
        let d = parse(FULL_DESCRIPTOR).unwrap();
        assert_eq!(d.namespace, "com.example.studybuddy");
        assert_eq!(d.application_id, d.namespace);
        assert_eq!(
            d.compile_sdk,
            SdkValue::Reference("flutter.compileSdkVersion".to_string())
        );
        assert_eq!(d.plugins.len(), 4);
        assert_eq!(d.dependencies.len(), 4);
        assert!(d.dependencies[0].platform);
        assert_eq!(
            d.dependencies[3].scope,
            DependencyScope::CoreLibraryDesugaring
        );
        assert_eq!(d.signing_configs.get("release").map(String::as_str), Some("debug"));
    }

    #[test]
    fn test_parse_literal_sdk_versions() {
        let d = parse(
            r#"
namespace = "com.example.app"
applicationId = "com.example.app"
compileSdk = 34
minSdk = 21
targetSdk = 34
"#,
        )
        .unwrap();
        assert_eq!(d.compile_sdk, SdkValue::Literal(34));
        assert_eq!(d.min_sdk, SdkValue::Literal(21));
    }

    #[test]
    fn test_parse_malformed_text_is_syntax_error() {
        let err = parse("namespace = [unclosed").unwrap_err();
        assert_eq!(err.code, ErrorCode::SyntaxInvalid);
    }

    #[test]
    fn test_parse_missing_namespace() {
        let err = parse("applicationId = \"com.example.app\"").unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
        assert_eq!(err.field.as_deref(), Some("namespace"));
    }

    #[test]
    fn test_serialize_parse_round_trip() {
        let original = parse(FULL_DESCRIPTOR).unwrap();
        let text = serialize(&original).unwrap();
        let reparsed = parse(&text).unwrap();
        assert_eq!(original, reparsed);
    }
}
