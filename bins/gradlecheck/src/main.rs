//! gradlecheck - Android build descriptor validator
//!
//! Parses a build descriptor, resolves symbolic toolchain references
//! against a version catalog, and validates internal consistency before
//! the real build tool is invoked.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gradlecheck_cli::output::{format_field, Status};
use gradlecheck_cli::report;
use gradlecheck_core::catalog::{self, VersionCatalog};
use gradlecheck_core::descriptor::BuildDescriptor;
use gradlecheck_core::error::{exit_codes, Error};
use gradlecheck_core::{loader, validate};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gradlecheck")]
#[command(about = "Validate Android build descriptors")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, resolve, and validate a descriptor
    Validate {
        /// Path to the descriptor file
        descriptor: PathBuf,

        /// Version catalog file supplying toolchain values
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Emit findings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve symbolic references and print the concrete descriptor
    Resolve {
        /// Path to the descriptor file
        descriptor: PathBuf,

        /// Version catalog file supplying toolchain values
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Emit the resolved descriptor as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a parsed descriptor without resolving or validating
    Inspect {
        /// Path to the descriptor file
        descriptor: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Validate {
            descriptor,
            catalog,
            json,
        } => run_validate(&descriptor, catalog.as_deref(), json),
        Commands::Resolve {
            descriptor,
            catalog,
            json,
        } => run_resolve(&descriptor, catalog.as_deref(), json),
        Commands::Inspect { descriptor } => run_inspect(&descriptor),
    };

    std::process::exit(result);
}

fn run_validate(descriptor_path: &Path, catalog_path: Option<&Path>, json: bool) -> i32 {
    let resolved = match load_and_resolve(descriptor_path, catalog_path) {
        Ok(resolved) => resolved,
        Err(e) => return report_error(&e, json),
    };

    let result = validate::check(&resolved);
    if json {
        report::print_results_json(&result)
    } else {
        report::print_results(&result)
    }
}

fn run_resolve(descriptor_path: &Path, catalog_path: Option<&Path>, json: bool) -> i32 {
    let resolved = match load_and_resolve(descriptor_path, catalog_path) {
        Ok(resolved) => resolved,
        Err(e) => return report_error(&e, json),
    };

    let rendered = if json {
        serde_json::to_string_pretty(&resolved).map_err(Error::from)
    } else {
        toml::to_string_pretty(&resolved)
            .map_err(|e| Error::validation(format!("Failed to render descriptor: {}", e)))
    };

    match rendered {
        Ok(text) => {
            println!("{}", text);
            exit_codes::SUCCESS
        }
        Err(e) => report_error(&e, json),
    }
}

fn run_inspect(descriptor_path: &Path) -> i32 {
    let descriptor = match load_descriptor(descriptor_path) {
        Ok(descriptor) => descriptor,
        Err(e) => return report_error(&e, false),
    };

    Status::header(&format!("Descriptor: {}", descriptor_path.display()));
    println!("{}", format_field("namespace", &descriptor.namespace));
    println!("{}", format_field("applicationId", &descriptor.application_id));
    println!("{}", format_field("compileSdk", &descriptor.compile_sdk.to_string()));
    println!("{}", format_field("minSdk", &descriptor.min_sdk.to_string()));
    println!("{}", format_field("targetSdk", &descriptor.target_sdk.to_string()));
    if let Some(ndk) = &descriptor.ndk_version {
        println!("{}", format_field("ndkVersion", ndk));
    }
    println!("{}", format_field("versionCode", &descriptor.version_code.to_string()));
    println!("{}", format_field("versionName", &descriptor.version_name));
    println!(
        "{}",
        format_field(
            "sourceCompatibility",
            &descriptor.compile_options.source_compatibility.to_string()
        )
    );
    println!(
        "{}",
        format_field(
            "targetCompatibility",
            &descriptor.compile_options.target_compatibility.to_string()
        )
    );

    Status::header("Plugins");
    for plugin in &descriptor.plugins {
        println!("  - {}", plugin);
    }

    Status::header("Dependencies");
    for dep in &descriptor.dependencies {
        let version = dep
            .version
            .as_deref()
            .unwrap_or("(from platform BOM)");
        let marker = if dep.platform { " [platform]" } else { "" };
        println!("  - {} {}{}", dep.id, version, marker);
    }

    Status::header("Signing");
    for (variant, profile) in &descriptor.signing_configs {
        println!("{}", format_field(variant, profile));
    }

    exit_codes::SUCCESS
}

fn load_descriptor(path: &Path) -> gradlecheck_core::Result<BuildDescriptor> {
    tracing::debug!(path = %path.display(), "loading descriptor");
    let raw = std::fs::read_to_string(path)?;
    loader::parse(&raw)
}

fn load_catalog(path: Option<&Path>) -> gradlecheck_core::Result<VersionCatalog> {
    match path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading version catalog");
            let raw = std::fs::read_to_string(p)?;
            VersionCatalog::from_toml_str(&raw)
        }
        None => Ok(VersionCatalog::default()),
    }
}

fn load_and_resolve(
    descriptor_path: &Path,
    catalog_path: Option<&Path>,
) -> gradlecheck_core::Result<gradlecheck_core::descriptor::ResolvedDescriptor> {
    let descriptor = load_descriptor(descriptor_path)?;
    let catalog = load_catalog(catalog_path)?;
    catalog::resolve(&descriptor, &catalog)
}

fn report_error(err: &Error, json: bool) -> i32 {
    if json {
        match serde_json::to_string_pretty(&err.to_report()) {
            Ok(text) => println!("{}", text),
            Err(_) => Status::error(&err.to_string()),
        }
    } else {
        Status::error(&err.to_string());
    }

    match err.code.category() {
        "Parse" => exit_codes::PARSE_ERROR,
        "Resolution" => exit_codes::RESOLUTION_ERROR,
        "Validation" => exit_codes::VALIDATION_ERROR,
        _ => exit_codes::FAILURE,
    }
}
