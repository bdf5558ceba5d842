//! Core domain types and traits for droidcfg.
//!
//! This crate contains:
//! - The build descriptor model (parsed and resolved forms)
//! - Java language levels
//! - Signing configurations and the registry trait
//! - Plugin declarations and the resolver trait
//! - The project-metadata provider trait

pub mod descriptor;
pub mod error;
pub mod java;
pub mod metadata;
pub mod plugin;
pub mod signing;

pub use descriptor::{BuildVariant, ConfigDescriptor, FieldValue, ResolvedDescriptor};
pub use error::{Error, Result};
pub use java::JavaVersion;
pub use metadata::MetadataProvider;
pub use plugin::{PluginDecl, PluginId, PluginResolver, PluginSpec, Requirement};
pub use signing::{SigningConfig, SigningRegistry};
