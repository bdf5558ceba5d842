//! Resolved descriptor display.

use anyhow::{Result, bail};
use droidcfg_core::ResolvedDescriptor;
use std::fmt::Write;

use super::{fail, load};
use crate::LoadArgs;

pub fn show(args: &LoadArgs, json: bool, variant: Option<&str>) -> Result<()> {
    let mut descriptor = match load(args)? {
        Ok(descriptor) => descriptor,
        Err(e) => fail(&e),
    };

    if let Some(name) = variant {
        descriptor = select_variant(descriptor, name)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    } else {
        print!("{}", render(&descriptor));
    }
    Ok(())
}

/// Narrow a descriptor to one build type, folding its suffixes into the
/// application id and version name.
pub fn select_variant(mut d: ResolvedDescriptor, name: &str) -> Result<ResolvedDescriptor> {
    let Some(mut selected) = d.variant(name).cloned() else {
        bail!("no build type named '{}'", name);
    };
    d.application_id = d.application_id_for(&selected);
    d.version_name = d.version_name_for(&selected);
    selected.application_id_suffix = None;
    selected.version_name_suffix = None;
    d.build_variants = vec![selected];
    Ok(d)
}

pub fn render(d: &ResolvedDescriptor) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "namespace:      {}", d.namespace);
    let _ = writeln!(out, "applicationId:  {}", d.application_id);
    let _ = writeln!(out, "version:        {} ({})", d.version_name, d.version_code);
    let _ = writeln!(
        out,
        "sdk:            min {} / target {} / compile {}",
        d.min_sdk, d.target_sdk, d.compile_sdk
    );
    let _ = writeln!(
        out,
        "java:           source {} / target {}",
        d.source_compatibility, d.target_compatibility
    );
    if let Some(jvm_target) = d.jvm_target {
        let _ = writeln!(out, "jvmTarget:      {}", jvm_target.jvm_target());
    }

    let _ = writeln!(out, "plugins:");
    for (i, plugin) in d.plugins.iter().enumerate() {
        match &plugin.version {
            Some(version) => {
                let _ = writeln!(out, "  {}. {} ({})", i + 1, plugin.id, version);
            }
            None => {
                let _ = writeln!(out, "  {}. {}", i + 1, plugin.id);
            }
        }
    }

    let _ = writeln!(out, "buildTypes:");
    for variant in &d.build_variants {
        let _ = writeln!(
            out,
            "  {}: {} [{}] signed with {}",
            variant.name,
            d.application_id_for(variant),
            d.version_name_for(variant),
            variant.signing_config.as_deref().unwrap_or("(none)")
        );
    }

    if let Some(source) = &d.flutter_source {
        let _ = writeln!(out, "flutter source: {}", source);
    }
    out
}
