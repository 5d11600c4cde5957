//! # amf-lut
//!
//! AMF (ACES Metadata File) document model and streaming XML reader.
//!
//! This crate provides the AMF Intermediate Model ([`Aim`]) and the
//! streaming `quick-xml`-based router ([`read_amf`]/[`parse_amf_str`]) that
//! builds it: which input transform converted camera-native values into
//! ACES, which output transform produced the monitored image, and which
//! look transforms (CDLs, LUTs, or named grades) were applied in between.
//! It only recognizes the *shape* of the document -- resolving
//! `transformId` references against a reference config, evaluating CDLs,
//! or reading LUT pixel data is the compiler's job, built on top of the
//! [`Aim`] this crate produces.
//!
//! # Dependencies
//!
//! - [`quick_xml`] - streaming XML parsing
//! - [`thiserror`] - error handling
//!
//! # Used By
//!
//! - `amf-compiler` - AMF-to-OCIO config compilation

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod amf;
mod error;

pub use error::{LutError, LutResult};
pub use amf::{
    Aim, AmfRecord, AmfInputRecord, AmfOutputRecord, AmfLookRecord,
    AmfParseError, AmfParseResult, parse_amf_str, read_amf,
};
