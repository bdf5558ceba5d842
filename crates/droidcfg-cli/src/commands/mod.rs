//! CLI command implementations.

pub mod fmt;
pub mod show;

use anyhow::{Context, Result};
use droidcfg_config::{
    ConfigError, ConfigResult, PluginCatalog, ProjectMetadata, SigningConfigSet, apply_plugins,
    resolve_variable,
};
use droidcfg_core::ResolvedDescriptor;
use tracing::debug;

use crate::LoadArgs;

/// Build the metadata provider described by the command-line flags.
pub fn metadata(args: &LoadArgs) -> Result<ProjectMetadata> {
    let mut metadata = ProjectMetadata::new();

    if let Some(path) = &args.properties {
        metadata
            .merge_properties_file(path)
            .with_context(|| format!("reading {}", path.display()))?;
    }
    if let Some(build_name) = &args.build_name {
        metadata.apply_build_name(build_name)?;
    }
    if !args.no_flutter_defaults {
        metadata.apply_flutter_defaults();
    }
    metadata.populate_env();

    debug!(keys = ?metadata.keys(), "Project metadata ready");
    Ok(metadata)
}

pub fn signing_registry(args: &LoadArgs) -> Result<SigningConfigSet> {
    match &args.signing {
        Some(path) => SigningConfigSet::from_file(path)
            .with_context(|| format!("reading signing registry {}", path.display())),
        None => Ok(SigningConfigSet::with_debug()),
    }
}

/// Load a descriptor, keeping [`ConfigError`] intact for reporting.
pub fn load(args: &LoadArgs) -> Result<ConfigResult<ResolvedDescriptor>> {
    let metadata = metadata(args)?;
    let registry = signing_registry(args)?;
    Ok(droidcfg_config::load_file(
        &args.file,
        Some(&metadata),
        &registry,
    ))
}

fn fail(err: &ConfigError) -> ! {
    println!("Configuration error ({:?}): {}", err.kind(), err);
    std::process::exit(1);
}

/// Load and validate, optionally checking plugin order too.
pub fn check(args: &LoadArgs, check_plugins: bool) -> Result<ConfigResult<ResolvedDescriptor>> {
    let descriptor = match load(args)? {
        Ok(descriptor) => descriptor,
        Err(e) => return Ok(Err(e)),
    };

    if check_plugins {
        if let Err(e) = apply_plugins(&descriptor.plugins, &PluginCatalog::android()) {
            return Ok(Err(e));
        }
    }
    Ok(Ok(descriptor))
}

pub fn validate(args: &LoadArgs, check_plugins: bool) -> Result<()> {
    if let Err(e) = check(args, check_plugins)? {
        fail(&e);
    }
    println!("Configuration is valid");
    Ok(())
}

pub fn resolve_value(name: &str, args: &LoadArgs) -> Result<ConfigResult<String>> {
    let metadata = metadata(args)?;
    Ok(resolve_variable(name, Some(&metadata)))
}

pub fn resolve(name: &str, args: &LoadArgs) -> Result<()> {
    match resolve_value(name, args)? {
        Ok(value) => {
            println!("{}", value);
            Ok(())
        }
        Err(e) => fail(&e),
    }
}
