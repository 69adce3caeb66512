//! Toolchain version catalog and symbolic reference resolution
//!
//! The build toolchain supplies ambient version values (`flutter.minSdkVersion`
//! and friends). Rather than reading them from global state, the catalog is
//! explicit injected configuration, which keeps resolution pure and testable.

use crate::descriptor::{BuildDescriptor, ResolvedDescriptor, SdkValue, TOOLCHAIN_REF_PREFIX};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Concrete toolchain values the descriptor's symbolic references resolve to
///
/// Defaults track a stock Flutter stable toolchain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionCatalog {
    #[serde(default = "default_compile_sdk_version")]
    pub compile_sdk_version: u32,

    #[serde(default = "default_min_sdk_version")]
    pub min_sdk_version: u32,

    #[serde(default = "default_target_sdk_version")]
    pub target_sdk_version: u32,

    #[serde(default = "default_ndk_version")]
    pub ndk_version: String,

    #[serde(default = "default_version_code")]
    pub version_code: u32,

    #[serde(default = "default_version_name")]
    pub version_name: String,
}

impl Default for VersionCatalog {
    fn default() -> Self {
        Self {
            compile_sdk_version: default_compile_sdk_version(),
            min_sdk_version: default_min_sdk_version(),
            target_sdk_version: default_target_sdk_version(),
            ndk_version: default_ndk_version(),
            version_code: default_version_code(),
            version_name: default_version_name(),
        }
    }
}

fn default_compile_sdk_version() -> u32 {
    34
}

fn default_min_sdk_version() -> u32 {
    21
}

fn default_target_sdk_version() -> u32 {
    34
}

fn default_ndk_version() -> String {
    "26.1.10909125".to_string()
}

fn default_version_code() -> u32 {
    1
}

fn default_version_name() -> String {
    "1.0.0".to_string()
}

impl VersionCatalog {
    /// Parse a catalog from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw)
            .map_err(|e| Error::catalog(format!("Invalid version catalog: {}", e.message())).with_source(e))
    }

    /// Look up an integer-valued toolchain reference
    pub fn lookup_int(&self, reference: &str) -> Option<u32> {
        match reference {
            "flutter.compileSdkVersion" => Some(self.compile_sdk_version),
            "flutter.minSdkVersion" => Some(self.min_sdk_version),
            "flutter.targetSdkVersion" => Some(self.target_sdk_version),
            "flutter.versionCode" => Some(self.version_code),
            _ => None,
        }
    }

    /// Look up a string-valued toolchain reference
    pub fn lookup_str(&self, reference: &str) -> Option<&str> {
        match reference {
            "flutter.ndkVersion" => Some(&self.ndk_version),
            "flutter.versionName" => Some(&self.version_name),
            _ => None,
        }
    }
}

/// Substitute every symbolic reference in the descriptor with a concrete
/// value from the catalog. Fails with `UnresolvedReference` naming the
/// offending field when a reference is not in the catalog.
pub fn resolve(descriptor: &BuildDescriptor, catalog: &VersionCatalog) -> Result<ResolvedDescriptor> {
    let compile_sdk = resolve_int(&descriptor.compile_sdk, "compileSdk", catalog)?;
    let min_sdk = resolve_int(&descriptor.min_sdk, "minSdk", catalog)?;
    let target_sdk = resolve_int(&descriptor.target_sdk, "targetSdk", catalog)?;
    let version_code = resolve_int(&descriptor.version_code, "versionCode", catalog)?;
    let version_name = resolve_str(&descriptor.version_name, "versionName", catalog)?;
    let ndk_version = match &descriptor.ndk_version {
        Some(value) => Some(resolve_str(value, "ndkVersion", catalog)?),
        None => None,
    };

    Ok(ResolvedDescriptor {
        namespace: descriptor.namespace.clone(),
        application_id: descriptor.application_id.clone(),
        compile_sdk,
        min_sdk,
        target_sdk,
        ndk_version,
        version_code,
        version_name,
        plugins: descriptor.plugins.clone(),
        compile_options: descriptor.compile_options.clone(),
        signing_configs: descriptor.signing_configs.clone(),
        dependencies: descriptor.dependencies.clone(),
    })
}

fn resolve_int(value: &SdkValue, field: &str, catalog: &VersionCatalog) -> Result<u32> {
    match value {
        SdkValue::Literal(v) => Ok(*v),
        SdkValue::Reference(r) => catalog
            .lookup_int(r)
            .ok_or_else(|| Error::unresolved_reference(field, r)),
    }
}

fn resolve_str(value: &str, field: &str, catalog: &VersionCatalog) -> Result<String> {
    if value.starts_with(TOOLCHAIN_REF_PREFIX) {
        catalog
            .lookup_str(value)
            .map(str::to_string)
            .ok_or_else(|| Error::unresolved_reference(field, value))
    } else {
        Ok(value.to_string())
    }
}
