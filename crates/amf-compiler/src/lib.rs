//! AMF (Academy Color Encoding System Metadata File) compilation.
//!
//! This crate turns an AMF document attached to a piece of footage into a
//! standalone, self-contained reference configuration: it reads the AMF's
//! input/output/look records, resolves them against a starting reference
//! config (an OCIO-shaped collaborator of color spaces, roles, displays,
//! looks, shared views and named transforms), and produces a new config
//! plus a compact [`AMFInfo`] summary of what was found.
//!
//! # Quick Start
//!
//! ```ignore
//! use amf_compiler::{compile_amf, CompileOptions};
//!
//! let outcome = compile_amf("shot.amf", CompileOptions::default())?;
//! println!("{:#?}", outcome.info);
//! let issues = amf_compiler::validate_config(&outcome.config);
//! ```
//!
//! # Loading a Reference Config Directly
//!
//! ```ignore
//! use amf_compiler::Config;
//!
//! let config = Config::from_file("path/to/config.ocio")?;
//!
//! for cs in config.colorspaces() {
//!     println!("{}: {:?}", cs.name(), cs.encoding());
//! }
//! ```
//!
//! # Roles
//!
//! Roles provide semantic access to color spaces:
//!
//! ```
//! use amf_compiler::builtin;
//!
//! let config = builtin::studio_config_v2_1_0_aces_v1_3_ocio_v2_3();
//!
//! let linear = config.colorspace("scene_linear").unwrap();
//! assert_eq!(linear.name(), "ACEScg");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod config;
mod config_builder;
mod colorspace;
mod transform;
mod display;
mod look;
mod role;
mod context;
mod resolve;
mod compile;

pub mod builtin;
pub mod validate;

// Re-exports
pub use error::{AmfError, AmfResult};
pub use config::{
    Config, ConfigVersion, FileRule, NamedTransform, SharedView, SharedViewColorSpace,
    ViewingRule,
};
pub use config_builder::ConfigBuilder;
pub use colorspace::{ColorSpace, Encoding, Family, BitDepth, AllocationInfo, AllocationType, ColorSpaceBuilder};
pub use transform::{
    Transform, TransformDirection, Interpolation,
    MatrixTransform, CdlTransform, CdlStyle, FileTransform,
    ColorSpaceTransform, LookTransform, DisplayViewTransform, GroupTransform,
};
pub use display::{Display, View, ViewTransform, DisplayManager};
pub use look::{Look, LookManager, parse_looks};
pub use role::{Roles, names as role_names};
pub use context::Context;
pub use validate::{check as validate_config, Issue, Severity, IssueCategory, has_errors, has_warnings};
pub use resolve::CAMERA_MAPPING;
pub use compile::{compile_amf, AMFInfo, CompileOptions, CompileOutcome};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_access() {
        let config = builtin::studio_config_v2_1_0_aces_v1_3_ocio_v2_3();

        let linear = config.colorspace("scene_linear").unwrap();
        assert_eq!(linear.name(), "ACEScg");
    }

    #[test]
    fn context_variables() {
        let mut ctx = Context::new();
        ctx.set("SHOT", "sh010");

        let resolved = ctx.resolve("/shows/$SHOT/luts/grade.cube");
        assert_eq!(resolved, "/shows/sh010/luts/grade.cube");
    }

    #[test]
    fn builtin_has_aces_and_working_spaces() {
        let config = builtin::studio_config_v2_1_0_aces_v1_3_ocio_v2_3();

        assert!(config.colorspace("ACES2065-1").is_some());
        assert!(config.colorspace("ACEScg").is_some());
        assert!(config.colorspace("ACEScct").is_some());
        assert!(config.roles().has_reference());
    }
}
