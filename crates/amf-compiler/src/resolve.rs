//! Reference-config lookups (C3).
//!
//! An AMF document never names a color space or view transform directly --
//! it carries an opaque ACES `transformId` URN (e.g.
//! `urn:ampas:aces:transformId:IDT.ARRI.Alexa-v3-logC-EI800.a1.v1`) that the
//! reference config's authors embedded, verbatim, in the `description`
//! field of whichever color space, view transform, or look implements it.
//! Resolving an id is therefore a linear substring scan over descriptions,
//! not a name lookup. This mirrors the reference implementation's lookup
//! and inherits its fragility: a description that happens to contain a
//! transform id as a false-positive substring will be matched too.
//!
//! This module also carries the fixed table mapping log-encoded camera
//! color spaces to their linear-scene-referred companions, used when an
//! AMF's input resolves to a camera log space and both the log and linear
//! variants need importing together.

use crate::colorspace::ColorSpace;
use crate::config::Config;
use crate::display::ViewTransform;
use crate::look::Look;

/// Searches the reference config for a color space whose description
/// contains `aces_id` as a substring. Case- and whitespace-sensitive,
/// matching the source AMF tooling.
pub fn search_colorspaces<'a>(reference: &'a Config, aces_id: &str) -> Option<&'a ColorSpace> {
    reference
        .colorspaces()
        .iter()
        .find(|cs| cs.description().contains(aces_id))
}

/// Searches the reference config for a view transform whose description
/// contains `aces_id` as a substring.
pub fn search_view_transforms<'a>(reference: &'a Config, aces_id: &str) -> Option<&'a ViewTransform> {
    reference
        .displays()
        .view_transforms()
        .iter()
        .find(|vt| vt.description().contains(aces_id))
}

/// Searches the reference config for a look whose description contains
/// `aces_id` as a substring, returning an editable copy since the caller
/// renames and re-registers it under the AMF's own look naming scheme.
pub fn search_look_transforms(reference: &Config, aces_id: &str) -> Option<Look> {
    reference
        .looks()
        .all()
        .iter()
        .find(|look| look.get_description().contains(aces_id))
        .cloned()
}

/// One entry in [`CAMERA_MAPPING`]: a log-encoded camera color space name
/// paired with its linear-scene-referred companion.
#[derive(Debug, Clone, Copy)]
pub struct CameraMapping {
    /// Name of the log-encoded camera color space, as it appears in the
    /// reference config.
    pub log_name: &'static str,
    /// Name of the companion linear color space to import alongside it.
    pub linear_name: &'static str,
    /// ACES `transformId` substring the log color space's description
    /// carries in the reference config (what an AMF `transformId` is
    /// matched against).
    pub transform_id: &'static str,
}

/// Fixed log-camera-space -> linear-companion table.
///
/// When an AMF's input transform resolves to one of these log color
/// spaces, the compiler also imports the paired linear space so that
/// clips graded from either encoding land on the same working space.
pub const CAMERA_MAPPING: &[CameraMapping] = &[
    CameraMapping {
        log_name: "ARRI LogC3 (EI800)",
        linear_name: "Linear ARRI Wide Gamut 3",
        transform_id: "urn:ampas:aces:transformId:IDT.ARRI.Alexa-v3-logC-EI800.a1.v1",
    },
    CameraMapping {
        log_name: "ARRI LogC4",
        linear_name: "Linear ARRI Wide Gamut 4",
        transform_id: "urn:ampas:aces:transformId:IDT.ARRI.ARRI-LogC4.a1.v1",
    },
    CameraMapping {
        log_name: "BMDFilm Gen5",
        linear_name: "Linear BMD Wide Gamut Gen5",
        transform_id: "urn:ampas:aces:transformId:IDT.BlackmagicDesign.BMDFilm-WideGamut-Gen5.a1.v1",
    },
    CameraMapping {
        log_name: "Canon Log 2 Cinema Gamut",
        linear_name: "Linear Canon Cinema Gamut",
        transform_id: "urn:ampas:aces:transformId:IDT.Canon.Canon-Log2-CinemaGamut-D55.a1.v1",
    },
    CameraMapping {
        log_name: "Canon Log 3 Cinema Gamut",
        linear_name: "Linear Canon Cinema Gamut",
        transform_id: "urn:ampas:aces:transformId:IDT.Canon.Canon-Log3-CinemaGamut-D55.a1.v1",
    },
    CameraMapping {
        log_name: "V-Log V-Gamut",
        linear_name: "Linear V-Gamut",
        transform_id: "urn:ampas:aces:transformId:IDT.Panasonic.VLog-VGamut.a1.v1",
    },
    CameraMapping {
        log_name: "Log3G10 REDWideGamutRGB",
        linear_name: "Linear REDWideGamutRGB",
        transform_id: "urn:ampas:aces:transformId:IDT.RED.Log3G10-REDWideGamutRGB.a1.v1",
    },
    CameraMapping {
        log_name: "S-Log3 S-Gamut3",
        linear_name: "Linear S-Gamut3",
        transform_id: "urn:ampas:aces:transformId:IDT.Sony.SLog3-SGamut3.a1.v1",
    },
    CameraMapping {
        log_name: "S-Log3 S-Gamut3.Cine",
        linear_name: "Linear S-Gamut3.Cine",
        transform_id: "urn:ampas:aces:transformId:IDT.Sony.SLog3-SGamut3Cine.a1.v1",
    },
    CameraMapping {
        log_name: "S-Log3 Venice S-Gamut3",
        linear_name: "Linear Venice S-Gamut3",
        transform_id: "urn:ampas:aces:transformId:IDT.Sony.Venice-SLog3-SGamut3.a1.v1",
    },
    CameraMapping {
        log_name: "S-Log3 Venice S-Gamut3.Cine",
        linear_name: "Linear Venice S-Gamut3.Cine",
        transform_id: "urn:ampas:aces:transformId:IDT.Sony.Venice-SLog3-SGamut3Cine.a1.v1",
    },
];

/// Looks up the linear companion for a log-encoded camera color space
/// name, if `name` (case-insensitively) matches an entry in
/// [`CAMERA_MAPPING`].
pub fn linear_companion_for(name: &str) -> Option<&'static str> {
    CAMERA_MAPPING
        .iter()
        .find(|entry| entry.log_name.eq_ignore_ascii_case(name))
        .map(|entry| entry.linear_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorspace::ColorSpace;

    fn sample_config() -> Config {
        let mut config = Config::new();
        config.add_colorspace(
            ColorSpace::builder("Input - ARRI - Linear - Alexa Wide Gamut")
                .description("urn:ampas:aces:transformId:IDT.ARRI.Alexa-v3-logC-EI800.a1.v1")
                .build(),
        );
        config
    }

    #[test]
    fn finds_colorspace_by_transform_id_substring() {
        let config = sample_config();
        let found = search_colorspaces(&config, "IDT.ARRI.Alexa-v3-logC-EI800.a1.v1");
        assert!(found.is_some());
        assert_eq!(found.unwrap().name(), "Input - ARRI - Linear - Alexa Wide Gamut");
    }

    #[test]
    fn no_match_returns_none() {
        let config = sample_config();
        assert!(search_colorspaces(&config, "IDT.Sony.SLog3-SGamut3.a1.v1").is_none());
    }

    #[test]
    fn camera_mapping_has_linear_companion() {
        assert_eq!(
            linear_companion_for("ARRI LogC3 (EI800)"),
            Some("Linear ARRI Wide Gamut 3")
        );
        assert_eq!(linear_companion_for("not a camera space"), None);
    }

    #[test]
    fn camera_mapping_table_is_nonempty_and_unique() {
        assert_eq!(CAMERA_MAPPING.len(), 11);
        let mut names: Vec<&str> = CAMERA_MAPPING.iter().map(|e| e.log_name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CAMERA_MAPPING.len());
    }
}
