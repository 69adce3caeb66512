//! Build descriptor schema
//!
//! Typed model of an Android application module's build configuration:
//! plugins, SDK versions, compatibility levels, identifiers, dependencies,
//! and signing references. Defaults mirror a stock Flutter application
//! module. All types round-trip through serde.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Well-known Gradle plugin identifiers
pub mod plugins {
    pub const ANDROID_APPLICATION: &str = "com.android.application";
    pub const KOTLIN_ANDROID: &str = "kotlin-android";
    pub const FLUTTER_GRADLE: &str = "dev.flutter.flutter-gradle-plugin";
    pub const GOOGLE_SERVICES: &str = "com.google.gms.google-services";
}

/// Prefix marking a symbolic toolchain reference (e.g. `flutter.minSdkVersion`)
pub const TOOLCHAIN_REF_PREFIX: &str = "flutter.";

/// An SDK-version-like value: either a concrete integer or a symbolic
/// reference resolved later against the injected version catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SdkValue {
    Literal(u32),
    Reference(String),
}

impl SdkValue {
    /// The concrete value, if already literal
    pub fn literal(&self) -> Option<u32> {
        match self {
            SdkValue::Literal(v) => Some(*v),
            SdkValue::Reference(_) => None,
        }
    }
}

impl fmt::Display for SdkValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdkValue::Literal(v) => write!(f, "{}", v),
            SdkValue::Reference(r) => write!(f, "{}", r),
        }
    }
}

/// Java language compatibility level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JavaLevel {
    #[serde(rename = "1.8")]
    V8,
    #[serde(rename = "11")]
    V11,
    #[serde(rename = "17")]
    V17,
    #[serde(rename = "21")]
    V21,
}

impl fmt::Display for JavaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JavaLevel::V8 => "1.8",
            JavaLevel::V11 => "11",
            JavaLevel::V17 => "17",
            JavaLevel::V21 => "21",
        };
        f.write_str(s)
    }
}

/// Dependency configuration scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyScope {
    Implementation,
    CoreLibraryDesugaring,
}

impl Default for DependencyScope {
    fn default() -> Self {
        DependencyScope::Implementation
    }
}

/// A declared build dependency
///
/// An entry without an explicit version must be covered by a `platform`
/// (bill-of-materials) entry sharing its group; validation enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Coordinate identifier, conventionally `group:artifact`
    pub id: String,

    /// Pinned version; `None` defers to a platform (BOM) entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Whether this entry is a platform (bill-of-materials) import
    #[serde(default)]
    pub platform: bool,

    #[serde(default)]
    pub scope: DependencyScope,
}

impl Dependency {
    /// The group portion of the coordinate (text before the first `:`),
    /// or the whole identifier when no group is present.
    pub fn group(&self) -> &str {
        self.id.split(':').next().unwrap_or(&self.id)
    }

    /// The artifact portion of the coordinate
    pub fn artifact(&self) -> &str {
        self.id.split(':').nth(1).unwrap_or(&self.id)
    }
}

/// Compatibility options for the compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    #[serde(default = "default_java_level")]
    pub source_compatibility: JavaLevel,

    #[serde(default = "default_java_level")]
    pub target_compatibility: JavaLevel,

    /// Kotlin JVM bytecode target
    #[serde(default = "default_java_level")]
    pub jvm_target: JavaLevel,

    /// Whether core library desugaring is enabled
    #[serde(default = "default_true")]
    pub enable_core_library_desugaring: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            source_compatibility: default_java_level(),
            target_compatibility: default_java_level(),
            jvm_target: default_java_level(),
            enable_core_library_desugaring: true,
        }
    }
}

fn default_java_level() -> JavaLevel {
    JavaLevel::V11
}

fn default_true() -> bool {
    true
}

/// Unvalidated build descriptor as parsed from configuration text
///
/// SDK version fields, `versionCode`, `versionName`, and `ndkVersion` may
/// hold symbolic `flutter.*` references; the catalog resolution pass turns
/// these into concrete values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDescriptor {
    /// Reverse-domain namespace for generated code
    pub namespace: String,

    /// Application identifier; conventionally equal to the namespace
    pub application_id: String,

    #[serde(default = "default_compile_sdk")]
    pub compile_sdk: SdkValue,

    #[serde(default = "default_min_sdk")]
    pub min_sdk: SdkValue,

    #[serde(default = "default_target_sdk")]
    pub target_sdk: SdkValue,

    #[serde(default = "default_ndk_version", skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,

    #[serde(default = "default_version_code")]
    pub version_code: SdkValue,

    #[serde(default = "default_version_name")]
    pub version_name: String,

    /// Ordered plugin list; order matters to the consuming build tool
    #[serde(default = "default_plugins")]
    pub plugins: Vec<String>,

    #[serde(default)]
    pub compile_options: CompileOptions,

    /// Build variant name -> signing profile name (resolved externally)
    #[serde(default = "default_signing_configs")]
    pub signing_configs: BTreeMap<String, String>,

    #[serde(default = "default_dependencies")]
    pub dependencies: Vec<Dependency>,
}

impl Default for BuildDescriptor {
    fn default() -> Self {
        Self {
            namespace: "com.example.studybuddy".to_string(),
            application_id: "com.example.studybuddy".to_string(),
            compile_sdk: default_compile_sdk(),
            min_sdk: default_min_sdk(),
            target_sdk: default_target_sdk(),
            ndk_version: default_ndk_version(),
            version_code: default_version_code(),
            version_name: default_version_name(),
            plugins: default_plugins(),
            compile_options: CompileOptions::default(),
            signing_configs: default_signing_configs(),
            dependencies: default_dependencies(),
        }
    }
}

fn default_compile_sdk() -> SdkValue {
    SdkValue::Reference("flutter.compileSdkVersion".to_string())
}

fn default_min_sdk() -> SdkValue {
    SdkValue::Reference("flutter.minSdkVersion".to_string())
}

fn default_target_sdk() -> SdkValue {
    SdkValue::Reference("flutter.targetSdkVersion".to_string())
}

fn default_ndk_version() -> Option<String> {
    Some("flutter.ndkVersion".to_string())
}

fn default_version_code() -> SdkValue {
    SdkValue::Reference("flutter.versionCode".to_string())
}

fn default_version_name() -> String {
    "flutter.versionName".to_string()
}

fn default_plugins() -> Vec<String> {
    vec![
        plugins::ANDROID_APPLICATION.to_string(),
        plugins::KOTLIN_ANDROID.to_string(),
        plugins::FLUTTER_GRADLE.to_string(),
        plugins::GOOGLE_SERVICES.to_string(),
    ]
}

fn default_dependencies() -> Vec<Dependency> {
    vec![
        Dependency {
            id: "com.google.firebase:firebase-bom".to_string(),
            version: Some("33.2.0".to_string()),
            platform: true,
            scope: DependencyScope::Implementation,
        },
        Dependency {
            id: "com.google.firebase:firebase-auth".to_string(),
            version: None,
            platform: false,
            scope: DependencyScope::Implementation,
        },
        Dependency {
            id: "com.google.firebase:firebase-firestore".to_string(),
            version: None,
            platform: false,
            scope: DependencyScope::Implementation,
        },
        Dependency {
            id: "com.android.tools:desugar_jdk_libs".to_string(),
            version: Some("2.0.3".to_string()),
            platform: false,
            scope: DependencyScope::CoreLibraryDesugaring,
        },
    ]
}

fn default_signing_configs() -> BTreeMap<String, String> {
    let mut configs = BTreeMap::new();
    configs.insert("debug".to_string(), "debug".to_string());
    configs.insert("release".to_string(), "debug".to_string());
    configs
}

/// Build descriptor with every symbolic reference substituted
///
/// Produced by [`crate::catalog::resolve`]; still unvalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDescriptor {
    pub namespace: String,
    pub application_id: String,
    pub compile_sdk: u32,
    pub min_sdk: u32,
    pub target_sdk: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,
    pub version_code: u32,
    pub version_name: String,
    pub plugins: Vec<String>,
    pub compile_options: CompileOptions,
    pub signing_configs: BTreeMap<String, String>,
    pub dependencies: Vec<Dependency>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_mirror_stock_flutter_module() {
        let d = BuildDescriptor::default();
        assert_eq!(d.application_id, d.namespace);
        assert_eq!(
            d.min_sdk,
            SdkValue::Reference("flutter.minSdkVersion".to_string())
        );
        assert_eq!(d.plugins.len(), 4);
        assert!(d.compile_options.enable_core_library_desugaring);
    }

    #[test]
    fn test_dependency_group_and_artifact() {
        let dep = Dependency {
            id: "com.google.firebase:firebase-auth".to_string(),
            version: None,
            platform: false,
            scope: DependencyScope::Implementation,
        };
        assert_eq!(dep.group(), "com.google.firebase");
        assert_eq!(dep.artifact(), "firebase-auth");

        let bare = Dependency {
            id: "firebase-auth".to_string(),
            version: None,
            platform: false,
            scope: DependencyScope::Implementation,
        };
        assert_eq!(bare.group(), "firebase-auth");
    }

    #[test]
    fn test_sdk_value_untagged_serde() {
        #[derive(Deserialize)]
        struct Holder {
            v: SdkValue,
        }

        let literal: Holder = toml::from_str("v = 34").unwrap();
        assert_eq!(literal.v, SdkValue::Literal(34));

        let reference: Holder = toml::from_str("v = \"flutter.minSdkVersion\"").unwrap();
        assert_eq!(
            reference.v,
            SdkValue::Reference("flutter.minSdkVersion".to_string())
        );
    }

    #[test]
    fn test_java_level_serde_names() {
        assert_eq!(JavaLevel::V11.to_string(), "11");
        let json = serde_json::to_string(&JavaLevel::V17).unwrap();
        assert_eq!(json, "\"17\"");
    }

    #[test]
    fn test_descriptor_round_trip_equality() {
        let original = BuildDescriptor::default();
        let text = toml::to_string(&original).unwrap();
        let reparsed: BuildDescriptor = toml::from_str(&text).unwrap();
        assert_eq!(original, reparsed);
    }
}
