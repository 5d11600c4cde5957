//! Built-in reference configuration.
//!
//! The compiler resolves every AMF `transformId` against a *reference
//! config*: a collaborator shaped like an OCIO config, whose color
//! spaces, view transforms, and looks carry known ACES transform ids in
//! their descriptions. [`studio_config_v2_1_0_aces_v1_3_ocio_v2_3`] is the
//! bundled default so callers don't need to source one externally; a
//! caller can always supply their own via [`crate::Config::from_file`]
//! instead.
//!
//! The transforms attached to built-in color spaces are placeholders --
//! this crate only ever emits configs, it never evaluates them against
//! pixels, so the exact IDT/ODT math is not modeled here.

use crate::colorspace::{ColorSpace, Encoding, Family};
use crate::config::{Config, ConfigVersion};
use crate::config_builder::ConfigBuilder;
use crate::display::{Display, View, ViewTransform};
use crate::resolve::CAMERA_MAPPING;
use crate::role::names as role;
use crate::transform::{MatrixTransform, Transform};

const ACES_AP0_TO_XYZ: [f64; 16] = [
    0.9525523959, 0.0, 0.0000936786, 0.0,
    0.3439664498, 0.7281660966, -0.0721325464, 0.0,
    0.0, 0.0, 1.0088251844, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

fn aces_colorspaces() -> Vec<ColorSpace> {
    vec![
        ColorSpace::builder("ACES2065-1")
            .alias("aces")
            .family(Family::Aces)
            .encoding(Encoding::SceneLinear)
            .description("urn:ampas:aces:transformId:ACES.AP0.Reference.a1.v1 -- ACES2065-1, AP0 primaries, linear")
            .to_reference(Transform::identity())
            .build(),
        ColorSpace::builder("ACEScg")
            .family(Family::Scene)
            .encoding(Encoding::SceneLinear)
            .description("urn:ampas:aces:transformId:ACES.AP1.RRT.a1.v1 -- ACEScg, AP1 primaries, linear")
            .to_reference(Transform::matrix(ACES_AP0_TO_XYZ))
            .build(),
        ColorSpace::builder("ACEScct")
            .family(Family::Scene)
            .encoding(Encoding::Log)
            .description("urn:ampas:aces:transformId:ACES.AP1.ACEScct.a1.v1 -- ACEScct, AP1 primaries, log with toe")
            .build(),
        ColorSpace::builder("ACEScc")
            .family(Family::Scene)
            .encoding(Encoding::Log)
            .description("urn:ampas:aces:transformId:ACES.AP1.ACEScc.a1.v1 -- ACEScc, AP1 primaries, log")
            .build(),
        ColorSpace::builder("CIE-XYZ-D65")
            .family(Family::Utility)
            .encoding(Encoding::SceneLinear)
            .description("urn:ampas:aces:transformId:ACES.CIE-XYZ-D65.Reference.a1.v1 -- CIE XYZ, D65 white point")
            .to_reference(Transform::matrix(ACES_AP0_TO_XYZ).inverse())
            .build(),
        ColorSpace::builder("Raw")
            .family(Family::Utility)
            .encoding(Encoding::Data)
            .description("Passthrough, non-color data")
            .build(),
    ]
}

/// Builds the camera log color spaces (and their linear companions) named
/// in [`CAMERA_MAPPING`].
fn camera_colorspaces() -> Vec<ColorSpace> {
    let mut spaces = Vec::with_capacity(CAMERA_MAPPING.len() * 2);
    for entry in CAMERA_MAPPING {
        spaces.push(
            ColorSpace::builder(entry.log_name)
                .family(Family::Input)
                .encoding(Encoding::Log)
                .description(format!("{} -- log-encoded camera space", entry.transform_id))
                .build(),
        );
        spaces.push(
            ColorSpace::builder(entry.linear_name)
                .family(Family::Input)
                .encoding(Encoding::SceneLinear)
                .description(format!(
                    "{} -- linear scene-referred companion of {}",
                    entry.linear_name, entry.log_name
                ))
                .to_reference(Transform::matrix(MatrixTransform::IDENTITY))
                .build(),
        );
    }
    spaces
}

fn sdr_display_colorspaces() -> Vec<ColorSpace> {
    vec![
        ColorSpace::builder("sRGB - Display")
            .family(Family::Display)
            .encoding(Encoding::Sdr)
            .description("urn:ampas:aces:transformId:ODT.Academy.sRGB_D60sim_100nits_dim.a1.v1")
            .build(),
        ColorSpace::builder("Rec.709 - Display")
            .family(Family::Display)
            .encoding(Encoding::Sdr)
            .description("urn:ampas:aces:transformId:ODT.Academy.Rec709_100nits_dim.a1.v1")
            .build(),
        ColorSpace::builder("Rec.2020 - Display")
            .family(Family::Display)
            .encoding(Encoding::Hdr)
            .description("urn:ampas:aces:transformId:ODT.Academy.Rec2020_1000nits_15nits.a1.v1")
            .build(),
        ColorSpace::builder("P3-D65 - Display")
            .family(Family::Display)
            .encoding(Encoding::Sdr)
            .description("urn:ampas:aces:transformId:ODT.Academy.P3D65_108nits_7.2nits_ST2084.a1.v1")
            .build(),
    ]
}

/// Shared view transform used by displays that have no dedicated Output
/// Transform -- e.g. an AMF with an empty `outputTransform` falls back to
/// this purely technical view.
fn untonemapped_view_transform() -> ViewTransform {
    ViewTransform::new("Un-tone-mapped")
        .with_family("aces")
        .with_description("Reference rendering with no tone mapping applied, for technical review")
        .with_from_scene_reference(Transform::identity())
}

/// Builds each display together with its own Output Transform view
/// transform. The view transform's description carries the *same*
/// `transformId` substring as the display's color space, since a real AMF
/// combined RRT+ODT id is expected to resolve both halves of the pair from
/// one lookup.
fn displays_with_output_transforms() -> Vec<(Display, ViewTransform)> {
    let entries = [
        ("sRGB", "sRGB - Display", "urn:ampas:aces:transformId:ODT.Academy.sRGB_D60sim_100nits_dim.a1.v1", true),
        ("Rec.709", "Rec.709 - Display", "urn:ampas:aces:transformId:ODT.Academy.Rec709_100nits_dim.a1.v1", true),
        ("Rec.2020", "Rec.2020 - Display", "urn:ampas:aces:transformId:ODT.Academy.Rec2020_1000nits_15nits.a1.v1", false),
        ("P3-D65", "P3-D65 - Display", "urn:ampas:aces:transformId:ODT.Academy.P3D65_108nits_7.2nits_ST2084.a1.v1", false),
    ];

    entries
        .into_iter()
        .map(|(display_name, cs_name, aces_id, with_untonemapped)| {
            let vt_name = format!("{display_name} Output Transform");
            let vt = ViewTransform::new(vt_name.clone())
                .with_family("aces")
                .with_description(format!("{aces_id} -- RRT + ODT combined view transform"))
                .with_from_scene_reference(Transform::identity());

            let mut display = Display::new(display_name);
            display.add_view(View::new("Output Transform", cs_name).with_view_transform(vt_name));
            if with_untonemapped {
                display.add_view(View::new("Un-tone-mapped", cs_name).with_view_transform("Un-tone-mapped"));
            }
            display.add_view(View::new("Raw", "Raw"));
            (display, vt)
        })
        .collect()
}

/// Builds the bundled default reference config: ACES 1.3 color spaces and
/// roles, the camera log/linear spaces in [`CAMERA_MAPPING`], and
/// sRGB/Rec.709/Rec.2020/P3-D65 displays backed by an Output Transform and
/// Un-tone-mapped view transform.
///
/// This is a realistic *shape* of a studio ACES/OCIO config, not a byte-for-
/// byte reproduction of any particular vendor's release -- its job is to
/// give every AMF `transformId` this crate is expected to resolve a
/// matching description to be found against.
pub fn studio_config_v2_1_0_aces_v1_3_ocio_v2_3() -> Config {
    let mut builder = ConfigBuilder::new("Studio Config - ACES 1.3 - OCIO 2.3")
        .version(ConfigVersion::new(2, 3))
        .description("Built-in reference config for ACES Metadata File compilation")
        .set_role(role::REFERENCE, "ACES2065-1")
        .set_role(role::SCENE_LINEAR, "ACEScg")
        .set_role(role::ACES_INTERCHANGE, "ACES2065-1")
        .set_role(role::CIE_XYZ_D65_INTERCHANGE, "CIE-XYZ-D65")
        .set_role(role::COLOR_TIMING, "ACEScct")
        .set_role(role::COMPOSITING_LOG, "ACEScct")
        .set_role(role::DATA, "Raw");

    for cs in aces_colorspaces() {
        builder = builder.add_colorspace(cs);
    }
    for cs in camera_colorspaces() {
        builder = builder.add_colorspace(cs);
    }
    for cs in sdr_display_colorspaces() {
        builder = builder.add_colorspace(cs);
    }

    let display_output_transforms = displays_with_output_transforms();
    for (display, _) in &display_output_transforms {
        builder = builder.add_display(display.clone());
    }

    let mut config = builder
        .build()
        .expect("built-in reference config must satisfy its own builder invariants");

    for (_, vt) in display_output_transforms {
        config.displays_mut().add_view_transform(vt);
    }
    config.displays_mut().add_view_transform(untonemapped_view_transform());

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_aces_core_spaces() {
        let config = studio_config_v2_1_0_aces_v1_3_ocio_v2_3();
        assert!(config.colorspace("ACES2065-1").is_some());
        assert!(config.colorspace("ACEScg").is_some());
        assert!(config.colorspace("ACEScct").is_some());
        assert!(config.colorspace("ACEScc").is_some());
        assert!(config.colorspace("CIE-XYZ-D65").is_some());
        assert!(config.colorspace("Raw").is_some());
    }

    #[test]
    fn seeds_roles() {
        let config = studio_config_v2_1_0_aces_v1_3_ocio_v2_3();
        assert_eq!(config.roles().reference(), Some("ACES2065-1"));
        assert_eq!(config.roles().scene_linear(), Some("ACEScg"));
        assert!(!config.roles().contains("default"));
    }

    #[test]
    fn seeds_all_camera_mapping_entries() {
        let config = studio_config_v2_1_0_aces_v1_3_ocio_v2_3();
        for entry in CAMERA_MAPPING {
            assert!(
                config.colorspace(entry.log_name).is_some(),
                "missing log colorspace {}",
                entry.log_name
            );
            assert!(
                config.colorspace(entry.linear_name).is_some(),
                "missing linear colorspace {}",
                entry.linear_name
            );
        }
    }

    #[test]
    fn seeds_displays_and_view_transforms() {
        let config = studio_config_v2_1_0_aces_v1_3_ocio_v2_3();
        assert_eq!(config.displays().len(), 4);
        assert!(config.displays().display("sRGB").is_some());
        assert!(config.displays().view_transform("sRGB Output Transform").is_some());
        assert!(config.displays().view_transform("Un-tone-mapped").is_some());
    }

    #[test]
    fn resolves_by_transform_id() {
        let config = studio_config_v2_1_0_aces_v1_3_ocio_v2_3();
        let found = crate::resolve::search_colorspaces(
            &config,
            "IDT.ARRI.Alexa-v3-logC-EI800.a1.v1",
        );
        assert_eq!(found.unwrap().name(), "ARRI LogC3 (EI800)");
    }
}
