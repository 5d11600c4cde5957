//! Config Builder (C4) and Working-Location Reassembler (C5).
//!
//! [`compile_amf`] is the single entry point that ties the whole crate
//! together: it reads an AMF document, resolves its input/output/look
//! records against a reference config via [`crate::resolve`], and returns a
//! standalone built config plus a compact [`AMFInfo`] summary.

use std::path::{Path, PathBuf};

use amf_lut::{read_amf, AmfInputRecord, AmfLookRecord, AmfOutputRecord};

use crate::builtin;
use crate::colorspace::{ColorSpace, Family};
use crate::config::{Config, NamedTransform, SharedView};
use crate::display::View;
use crate::error::{AmfError, AmfResult};
use crate::look::Look;
use crate::resolve;
use crate::role::names as role;
use crate::transform::{
    CdlStyle, CdlTransform, ColorSpaceTransform, DisplayViewTransform, FileTransform,
    Interpolation, LookTransform, Transform, TransformDirection,
};

/// Summary of what a compilation found, mirroring the built config without
/// requiring callers to re-derive it by inspecting colorspaces/roles.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AMFInfo {
    /// Role name synthesized for this clip (`amf_clip_<sanitizedClipName>`).
    pub clip_identifier: String,
    /// Human-readable clip name read from `aces:clipId`.
    pub clip_name: String,
    /// Color space chosen to represent the clip's input pixels.
    pub input_colorspace_name: String,
    /// Color space the pixels are currently in, after accounting for
    /// whatever output/look transforms were already applied.
    pub clip_colorspace_name: String,
    /// Active display chosen for this clip.
    pub display_name: String,
    /// Active view chosen for this clip.
    pub view_name: String,
    /// Count of look transforms marked as already applied to pixels.
    pub num_looks_applied: usize,
}

/// Options controlling a single [`compile_amf`] call.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Path to a reference config file. Falls back to the bundled
    /// `studio-config-v2.1.0_aces-v1.3_ocio-v2.3` when `None`.
    pub reference_config_path: Option<PathBuf>,
}

/// Result of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    /// The built config.
    pub config: Config,
    /// Summary of the clip's resolved color pipeline.
    pub info: AMFInfo,
}

/// Reads `path` as an AMF document, resolves it against a reference config,
/// and returns the built config plus a populated [`AMFInfo`].
pub fn compile_amf(path: impl AsRef<Path>, options: CompileOptions) -> AmfResult<CompileOutcome> {
    let path = path.as_ref();
    let aim = read_amf(path).map_err(|e| AmfError::XmlParseError {
        line: e.line,
        reason: e.message,
    })?;
    let reference = match &options.reference_config_path {
        Some(p) => Config::from_file(p)?,
        None => builtin::studio_config_v2_1_0_aces_v1_3_ocio_v2_3(),
    };
    let amf_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    compile_aim(&aim, &reference, &amf_dir)
}

fn compile_aim(aim: &amf_lut::Aim, reference: &Config, amf_dir: &Path) -> AmfResult<CompileOutcome> {
    let ref_version = reference.version();
    if !ref_version.is_at_least(2, 3) {
        return Err(AmfError::UnsupportedRefVersion {
            line: 0,
            major: ref_version.major,
            minor: ref_version.minor,
        });
    }
    if reference.colorspace("ACES2065-1").is_none() {
        return Err(AmfError::MissingRefAces { line: 0 });
    }

    let clip_name = aim
        .clip_id
        .first("aces:clipName")
        .unwrap_or("Unknown Clip")
        .to_string();
    let clip_role = format!("amf_clip_{}", sanitize_clip_name(&clip_name));

    let mut config = init_config(reference, amf_dir);

    let mut display_name = String::from("Unknown");
    let mut view_name = String::from("Unknown");

    let input_colorspace_name = process_input(
        &mut config,
        reference,
        &aim.input,
        &clip_name,
        amf_dir,
        &mut display_name,
    )?;

    process_output(
        &mut config,
        reference,
        &aim.output,
        &clip_name,
        amf_dir,
        &mut display_name,
        &mut view_name,
    )?;

    let (look_entries, num_looks_applied) = process_looks(
        &mut config,
        reference,
        &aim.looks,
        &clip_name,
        amf_dir,
        aim.num_looks_before_working_location,
    )?;

    if aim.num_looks_before_working_location.is_some() {
        reassemble_working_location(
            &mut config,
            &clip_name,
            &input_colorspace_name,
            &aim.input,
            &aim.output,
            &look_entries,
            aim.num_looks_before_working_location.unwrap(),
            num_looks_applied,
            &display_name,
            &view_name,
        );
    }

    let clip_colorspace_name = if was_applied(aim.output.attr("applied")) {
        display_name.clone()
    } else if num_looks_applied > 0 {
        "ACES2065-1".to_string()
    } else {
        input_colorspace_name.clone()
    };
    config.set_role(&clip_role, clip_colorspace_name.clone());

    let info = AMFInfo {
        clip_identifier: clip_role,
        clip_name,
        input_colorspace_name,
        clip_colorspace_name,
        display_name,
        view_name,
        num_looks_applied,
    };

    Ok(CompileOutcome { config, info })
}

/// 4.4.1 -- raw config, ACES core color spaces, the six roles (`default`
/// simply never set), file rules, the seed look, and the search path.
fn init_config(reference: &Config, amf_dir: &Path) -> Config {
    let mut config = Config::new();
    config.set_version(2, 3);

    for name in ["ACES2065-1", "ACEScg", "ACEScct", "CIE-XYZ-D65", "Raw"] {
        if let Some(cs) = reference.colorspace(name) {
            config.add_colorspace(cs.clone());
        }
    }

    config.set_role(role::SCENE_LINEAR, "ACEScg");
    config.set_role(role::ACES_INTERCHANGE, "ACES2065-1");
    config.set_role(role::CIE_XYZ_D65_INTERCHANGE, "CIE-XYZ-D65");
    config.set_role(role::COLOR_TIMING, "ACEScct");
    config.set_role(role::COMPOSITING_LOG, "ACEScct");
    // `default` is deliberately left unset.

    config.set_inactive_colorspaces(["CIE-XYZ-D65"]);
    config.set_file_rules("ACES2065-1");

    let mut shot_looks = ColorSpaceTransform::new("$SHOT_LOOKS", "ACES2065-1");
    shot_looks.data_bypass = true;
    let seed_look = Look::new("ACES Look Transform")
        .process_space("ACES2065-1")
        .transform(Transform::ColorSpace(shot_looks));
    config.add_look(seed_look);

    config.add_environment_var("SHOT_LOOKS", "ACES2065-1");
    config.add_search_path(amf_dir);

    config
}

/// 4.4.2 -- input-transform processing.
fn process_input(
    config: &mut Config,
    reference: &Config,
    input: &AmfInputRecord,
    clip_name: &str,
    amf_dir: &Path,
    display_name: &mut String,
) -> AmfResult<String> {
    let mut input_colorspace_name: Option<String> = None;

    for (tag, value) in &input.tld_elements {
        if tag.eq_ignore_ascii_case("aces:transformId") {
            if let Some(cs) = resolve::search_colorspaces(reference, value) {
                let cs = cs.clone();
                let name = cs.name().to_string();
                if let Some(linear) = resolve::linear_companion_for(&name) {
                    if let Some(lin_cs) = reference.colorspace(linear) {
                        import_colorspace(config, lin_cs.clone());
                    }
                }
                import_colorspace(config, cs);
                input_colorspace_name = Some(name);
            }
        } else if tag.eq_ignore_ascii_case("aces:file") {
            verify_lut_path(amf_dir, value, 0)?;
            let cs_name = format!("AMF Input Transform -- {clip_name}");
            let cs = ColorSpace::builder(cs_name.clone())
                .family(Family::Input)
                .family_name(format!("AMF/{clip_name}"))
                .category("file-io")
                .description(format!("AMF input file transform: {value}"))
                .to_reference(Transform::FileTransform(file_transform(value, None)))
                .build();
            config.add_colorspace(cs);
            input_colorspace_name = Some(cs_name);
        }
    }

    if input.is_inverse {
        let ids: Vec<&str> = input.all_sub("aces:transformId").collect();
        let files: Vec<&str> = input.all_sub("aces:file").collect();

        if let Some(id) = ids.first() {
            if let Some((dcs, vt)) = resolve_output_pair(config, reference, id) {
                let dvt = DisplayViewTransform {
                    src: "ACES2065-1".to_string(),
                    display: dcs.name().to_string(),
                    view: vt.name().to_string(),
                    looks_bypass: true,
                    direction: TransformDirection::Inverse,
                };
                let cs_name = format!("AMF Input Transform -- {clip_name}");
                let cs = ColorSpace::builder(cs_name.clone())
                    .family(Family::Input)
                    .family_name(format!("AMF/{clip_name}"))
                    .to_reference(Transform::DisplayView(dvt))
                    .build();
                config.add_colorspace(cs);
                input_colorspace_name = Some(cs_name);
            }
        } else if let Some(odt_file) = files.first() {
            // The first sub-element file belongs to the inverse ODT marker;
            // the second (if present) belongs to the inverse RRT marker --
            // each read from its own index rather than reusing index 0.
            let rrt_file = files.get(1).copied();
            let (cs_name, d) =
                compose_inverse_lut_pair(config, amf_dir, clip_name, odt_file, rrt_file)?;
            input_colorspace_name = Some(cs_name);
            *display_name = d;
        }
    }

    match input_colorspace_name {
        Some(name) => Ok(name),
        None if input.is_empty() => Ok("ACES2065-1".to_string()),
        None => Err(AmfError::MissingInputTransform { line: 0 }),
    }
}

/// 4.4.3 -- output-transform processing (forward, symmetric to 4.4.2).
fn process_output(
    config: &mut Config,
    reference: &Config,
    output: &AmfOutputRecord,
    clip_name: &str,
    amf_dir: &Path,
    display_name: &mut String,
    view_name: &mut String,
) -> AmfResult<()> {
    if output.is_empty() {
        config.add_display_view("None", View::new("Raw", "Raw"));
        if let Some(vt) = reference.view_transform("Un-tone-mapped") {
            config.add_view_transform(vt.clone());
        }
        config.set_active_displays(["None"]);
        config.set_active_views(["Raw"]);
        *display_name = "None".to_string();
        *view_name = "Raw".to_string();
        return Ok(());
    }

    let mut resolved = false;

    for (tag, value) in &output.tld_elements {
        if tag.eq_ignore_ascii_case("aces:transformId") {
            if let Some((dcs, vt)) = resolve_output_pair(config, reference, value) {
                *display_name = dcs.name().to_string();
                *view_name = vt.name().to_string();
                config.set_active_displays([display_name.clone()]);
                config.set_active_views([view_name.clone()]);
                resolved = true;
            }
        } else if tag.eq_ignore_ascii_case("aces:file") {
            let (_, d, v) = compose_forward_lut_pair(config, amf_dir, clip_name, value, None)?;
            *display_name = d;
            *view_name = v;
            resolved = true;
        }
    }

    if !resolved && !output.sub_elements.is_empty() {
        let files: Vec<&str> = output.all_sub("aces:file").collect();
        if let Some(odt_file) = files.first() {
            let rrt_file = files.get(1).copied();
            let (_, d, v) =
                compose_forward_lut_pair(config, amf_dir, clip_name, odt_file, rrt_file)?;
            *display_name = d;
            *view_name = v;
        } else if let Some(id) = output.all_sub("aces:transformId").collect::<Vec<_>>().first() {
            if let Some((dcs, vt)) = resolve_output_pair(config, reference, id) {
                *display_name = dcs.name().to_string();
                *view_name = vt.name().to_string();
                config.set_active_displays([display_name.clone()]);
                config.set_active_views([view_name.clone()]);
            }
        }
    }

    Ok(())
}

/// 4.4.4 -- resolves `aces_id` to a color space and a view transform,
/// imports both, and wires up the shared view / display binding. Returns
/// the resolved pair so callers (input-inverse, output-forward) can decide
/// what else to do with it.
fn resolve_output_pair(
    config: &mut Config,
    reference: &Config,
    aces_id: &str,
) -> Option<(ColorSpace, crate::display::ViewTransform)> {
    let dcs = resolve::search_colorspaces(reference, aces_id)?.clone();
    let vt = resolve::search_view_transforms(reference, aces_id)?.clone();

    import_colorspace(config, dcs.clone());
    if config.view_transform(vt.name()).is_none() {
        config.add_view_transform(vt.clone());
    }

    let shared_view = SharedView::new(vt.name(), vt.name()).with_looks("ACES Look Transform");
    config.add_shared_view(shared_view);
    config.add_display_shared_view(dcs.name(), vt.name());

    Some((dcs, vt))
}

fn compose_inverse_lut_pair(
    config: &mut Config,
    amf_dir: &Path,
    clip_name: &str,
    odt_file: &str,
    rrt_file: Option<&str>,
) -> AmfResult<(String, String)> {
    verify_lut_path(amf_dir, odt_file, 0)?;
    let mut transforms = Vec::new();
    if let Some(rrt_file) = rrt_file {
        verify_lut_path(amf_dir, rrt_file, 0)?;
        transforms.push(Transform::file(rrt_file).inverse());
    }
    transforms.push(Transform::file(odt_file).inverse());

    let cs_name = format!("AMF Input Transform LUT -- {clip_name}");
    let cs = ColorSpace::builder(cs_name.clone())
        .family(Family::Input)
        .family_name(format!("AMF/{clip_name}"))
        .category("file-io")
        .from_reference(Transform::group(transforms))
        .build();
    config.add_colorspace(cs);

    let mut inactive: Vec<String> = config.inactive_colorspaces().to_vec();
    inactive.push(cs_name.clone());
    config.set_inactive_colorspaces(inactive);

    let display_name = odt_file.to_string();
    config.add_display_view(display_name.clone(), View::new("Output Transform", &cs_name));
    config.set_active_displays([display_name.clone()]);
    config.set_active_views(["Output Transform"]);

    Ok((cs_name, display_name))
}

fn compose_forward_lut_pair(
    config: &mut Config,
    amf_dir: &Path,
    clip_name: &str,
    odt_file: &str,
    rrt_file: Option<&str>,
) -> AmfResult<(String, String, String)> {
    verify_lut_path(amf_dir, odt_file, 0)?;
    let mut transforms = Vec::new();
    if let Some(rrt_file) = rrt_file {
        verify_lut_path(amf_dir, rrt_file, 0)?;
        transforms.push(Transform::file(rrt_file));
    }
    transforms.push(Transform::file(odt_file));

    let cs_name = format!("AMF Output Transform LUT -- {clip_name}");
    let cs = ColorSpace::builder(cs_name.clone())
        .family(Family::Output)
        .family_name(format!("AMF/{clip_name}"))
        .category("file-io")
        .from_reference(Transform::group(transforms))
        .build();
    config.add_colorspace(cs);

    let mut inactive: Vec<String> = config.inactive_colorspaces().to_vec();
    inactive.push(cs_name.clone());
    config.set_inactive_colorspaces(inactive);

    let display_name = odt_file.to_string();
    let view_name = "Output Transform".to_string();
    config.add_display_view(display_name.clone(), View::new(&view_name, &cs_name));
    config.set_active_displays([display_name.clone()]);
    config.set_active_views([view_name.clone()]);

    Ok((cs_name, display_name, view_name))
}

/// 4.4.6 -- look processing. Returns the list of `(lookName, wasApplied)`
/// for every AMF look (seed excluded) plus the total applied count.
fn process_looks(
    config: &mut Config,
    reference: &Config,
    looks: &[AmfLookRecord],
    clip_name: &str,
    amf_dir: &Path,
    num_looks_before_working_location: Option<usize>,
) -> AmfResult<(Vec<(String, bool)>, usize)> {
    let mut entries = Vec::with_capacity(looks.len());
    let mut num_applied = 0usize;

    for (idx, look) in looks.iter().enumerate() {
        let applied = was_applied(look.attr("applied"));
        if applied {
            num_applied += 1;
        }
        let location = num_looks_before_working_location.map(|n| {
            if idx < n {
                "Pre-working-location"
            } else {
                "Post-working-location"
            }
        });
        let name = look_label(idx, location, applied, clip_name);

        if let Some(id) = look.first("aces:transformId") {
            if let Some(found) = resolve::search_look_transforms(reference, id) {
                config.add_look(rename_look(found, &name));
                entries.push((name, applied));
                continue;
            }
        }

        if let Some(file) = look.first("aces:file") {
            verify_lut_path(amf_dir, file, 0)?;
            let ccc_id = look.first("cdl:ColorCorrectionRef");
            let description = match ccc_id {
                Some(id) => format!("{file} ({id})"),
                None => file.to_string(),
            };
            let transform = Transform::FileTransform(file_transform(file, ccc_id));
            let look_obj = Look::new(name.clone())
                .process_space("ACES2065-1")
                .description(description)
                .transform(transform);
            config.add_look(look_obj);
            entries.push((name, applied));
            continue;
        }

        // No transformId or file: fall back to CDL (SOP/Sat, optionally
        // wrapped in a CDL working-space color-space conversion).
        let slope = look
            .first("cdl:Slope")
            .map(parse_triplet)
            .unwrap_or([1.0, 1.0, 1.0]);
        let offset = look
            .first("cdl:Offset")
            .map(parse_triplet)
            .unwrap_or([0.0, 0.0, 0.0]);
        let power = look
            .first("cdl:Power")
            .map(parse_triplet)
            .unwrap_or([1.0, 1.0, 1.0]);
        // An absent Saturation node is treated as the CDL identity (1.0)
        // rather than the empty-string-parses-to-zero behavior of the
        // source tooling.
        let saturation = look
            .first("cdl:Saturation")
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(1.0);

        let cdl = Transform::Cdl(CdlTransform {
            slope,
            offset,
            power,
            saturation,
            style: CdlStyle::default(),
            direction: TransformDirection::Forward,
        });

        let to_t = look
            .first("aces:toCdlWorkingSpace")
            .and_then(|id| resolve::search_colorspaces(reference, id))
            .map(|cs| Transform::ColorSpace(ColorSpaceTransform::new("ACES2065-1", cs.name())));
        let from_t = look
            .first("aces:fromCdlWorkingSpace")
            .and_then(|id| resolve::search_colorspaces(reference, id))
            .map(|cs| Transform::ColorSpace(ColorSpaceTransform::new(cs.name(), "ACES2065-1")));

        let composed = match (to_t, from_t) {
            (None, None) => Transform::group(vec![cdl]),
            (Some(to), Some(from)) => Transform::group(vec![to, cdl, from]),
            (Some(to), None) => {
                let inv = to.clone().inverse();
                Transform::group(vec![to, cdl, inv])
            }
            (None, Some(from)) => {
                let inv = from.clone().inverse();
                Transform::group(vec![inv, cdl, from])
            }
        };

        let look_obj = Look::new(name.clone())
            .process_space("ACES2065-1")
            .description("ASC CDL")
            .transform(composed);
        config.add_look(look_obj);
        entries.push((name, applied));
    }

    let unapplied_names: Vec<String> = entries
        .iter()
        .filter(|(name, _)| !name.contains("Applied)"))
        .map(|(name, _)| name.clone())
        .collect();

    if !unapplied_names.is_empty() {
        let group = Transform::group(
            unapplied_names
                .iter()
                .map(|name| {
                    Transform::Look(LookTransform {
                        src: "ACES2065-1".to_string(),
                        dst: "ACES2065-1".to_string(),
                        looks: name.clone(),
                        skip_color_space_conversion: false,
                        direction: TransformDirection::Forward,
                    })
                })
                .collect(),
        );
        let nt_name = format!("AMF Unapplied Look Transforms -- {clip_name}");
        let nt = NamedTransform::new(nt_name.clone())
            .with_family(format!("AMF/{clip_name}"))
            .with_forward_transform(group);
        config.add_named_transform(nt);
        config.add_environment_var("SHOT_LOOKS", nt_name);
    }

    Ok((entries, num_applied))
}

/// 4.5 -- synthesizes `AMF Clip to Working Space Transform -- <clipName>`.
#[allow(clippy::too_many_arguments)]
fn reassemble_working_location(
    config: &mut Config,
    clip_name: &str,
    input_colorspace_name: &str,
    input: &AmfInputRecord,
    output: &AmfOutputRecord,
    look_entries: &[(String, bool)],
    num_looks_before_working_location: usize,
    num_looks_applied: usize,
    display_name: &str,
    view_name: &str,
) {
    let output_applied = was_applied(output.attr("applied"));

    let working_forward = if output_applied {
        false
    } else {
        num_looks_applied <= num_looks_before_working_location
    };

    let mut transforms = Vec::new();

    if working_forward {
        if !was_applied(input.attr("applied")) {
            let mut cst = ColorSpaceTransform::new(input_colorspace_name, "ACES2065-1");
            cst.data_bypass = true;
            transforms.push(Transform::ColorSpace(cst));
        }
        for (idx, (name, applied)) in look_entries.iter().enumerate() {
            let position = idx + 1;
            if position <= num_looks_before_working_location && !*applied && name != "ACES Look Transform" {
                transforms.push(Transform::Look(LookTransform {
                    src: "ACES2065-1".to_string(),
                    dst: "ACES2065-1".to_string(),
                    looks: name.clone(),
                    skip_color_space_conversion: false,
                    direction: TransformDirection::Forward,
                }));
            }
        }
    } else {
        if output_applied {
            transforms.push(Transform::DisplayView(DisplayViewTransform {
                src: "ACES2065-1".to_string(),
                display: display_name.to_string(),
                view: view_name.to_string(),
                looks_bypass: false,
                direction: TransformDirection::Inverse,
            }));
        }
        for (rev_idx, (name, applied)) in look_entries.iter().rev().enumerate() {
            let position = rev_idx + 1;
            if *applied && position <= num_looks_before_working_location {
                transforms.push(Transform::Look(LookTransform {
                    src: "ACES2065-1".to_string(),
                    dst: "ACES2065-1".to_string(),
                    looks: name.clone(),
                    skip_color_space_conversion: false,
                    direction: TransformDirection::Inverse,
                }));
            }
        }
    }

    if transforms.is_empty() {
        transforms.push(Transform::identity());
    }

    let nt_name = format!("AMF Clip to Working Space Transform -- {clip_name}");
    let nt = NamedTransform::new(nt_name)
        .with_family(format!("AMF/{clip_name}"))
        .with_forward_transform(Transform::group(transforms));
    config.add_named_transform(nt);
}

fn import_colorspace(config: &mut Config, cs: ColorSpace) {
    if config.colorspace(cs.name()).is_none() {
        config.add_colorspace(cs);
    }
}

fn verify_lut_path(amf_dir: &Path, raw_path: &str, line: u32) -> AmfResult<()> {
    let candidate = Path::new(raw_path);
    let exists = if candidate.is_absolute() {
        candidate.exists()
    } else {
        amf_dir.join(candidate).exists()
    };
    if exists {
        Ok(())
    } else {
        Err(AmfError::InvalidLutPath {
            line,
            path: candidate.to_path_buf(),
        })
    }
}

fn file_transform(path: &str, ccc_id: Option<&str>) -> FileTransform {
    FileTransform {
        src: PathBuf::from(path),
        ccc_id: ccc_id.map(str::to_string),
        interpolation: Interpolation::Best,
        direction: TransformDirection::Forward,
    }
}

fn parse_triplet(s: &str) -> [f64; 3] {
    let mut parts = s.split_whitespace().map(|v| v.parse::<f64>().unwrap_or(0.0));
    [
        parts.next().unwrap_or(0.0),
        parts.next().unwrap_or(0.0),
        parts.next().unwrap_or(0.0),
    ]
}

fn rename_look(found: Look, new_name: &str) -> Look {
    let mut renamed = Look::new(new_name.to_string()).description(found.get_description().to_string());
    if let Some(ps) = found.get_process_space() {
        renamed = renamed.process_space(ps.to_string());
    }
    if let Some(t) = found.get_transform() {
        renamed = renamed.transform(t.clone());
    }
    if let Some(it) = found.get_inverse_transform() {
        renamed = renamed.inverse_transform(it.clone());
    }
    renamed
}

fn look_label(idx: usize, location: Option<&str>, applied: bool, clip_name: &str) -> String {
    let qualifier = match (location, applied) {
        (Some(loc), true) => format!(" ({loc} and Applied)"),
        (Some(loc), false) => format!(" ({loc})"),
        (None, true) => " (Applied)".to_string(),
        (None, false) => String::new(),
    };
    format!("AMF Look {idx}{qualifier} -- {clip_name}")
}

fn was_applied(attr: Option<&str>) -> bool {
    attr.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn sanitize_clip_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use amf_lut::parse_amf_str;
    use std::io::Write;

    fn reference() -> Config {
        builtin::studio_config_v2_1_0_aces_v1_3_ocio_v2_3()
    }

    const S1: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0">
  <aces:clipId>
    <aces:clipName>A001C001</aces:clipName>
  </aces:clipId>
  <aces:pipeline>
    <aces:inputTransform>
      <aces:transformId>urn:ampas:aces:transformId:IDT.ARRI.Alexa-v3-logC-EI800.a1.v1</aces:transformId>
    </aces:inputTransform>
    <aces:outputTransform>
      <aces:transformId>urn:ampas:aces:transformId:ODT.Academy.Rec709_100nits_dim.a1.v1</aces:transformId>
    </aces:outputTransform>
  </aces:pipeline>
</aces:amf>
"#;

    #[test]
    fn s1_resolves_input_and_output_pair() {
        let aim = parse_amf_str(S1).unwrap();
        let reference = reference();
        let outcome = compile_aim(&aim, &reference, Path::new(".")).unwrap();

        assert_eq!(outcome.info.input_colorspace_name, "ARRI LogC3 (EI800)");
        assert!(outcome.config.colorspace("Linear ARRI Wide Gamut 3").is_some());
        assert!(outcome.config.colorspace("ARRI LogC3 (EI800)").is_some());
        assert_eq!(outcome.info.clip_identifier, "amf_clip_A001C001");
        assert_eq!(outcome.config.looks().len(), 1);
        outcome.config.validate().unwrap();
    }

    const S_EMPTY_OUTPUT: &str = r#"<?xml version="1.0"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0">
  <aces:pipeline>
    <aces:inputTransform>
      <aces:transformId>urn:ampas:aces:transformId:IDT.ARRI.Alexa-v3-logC-EI800.a1.v1</aces:transformId>
    </aces:inputTransform>
  </aces:pipeline>
</aces:amf>
"#;

    #[test]
    fn empty_output_falls_back_to_none_raw() {
        let aim = parse_amf_str(S_EMPTY_OUTPUT).unwrap();
        let reference = reference();
        let outcome = compile_aim(&aim, &reference, Path::new(".")).unwrap();

        assert_eq!(outcome.info.display_name, "None");
        assert_eq!(outcome.info.view_name, "Raw");
        assert_eq!(outcome.config.active_displays(), ["None"]);
        assert!(outcome.config.displays().display("None").is_some());
    }

    const S_NO_INPUT_NO_OUTPUT: &str = r#"<?xml version="1.0"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0"><aces:pipeline/></aces:amf>
"#;

    #[test]
    fn empty_input_defaults_to_aces() {
        let aim = parse_amf_str(S_NO_INPUT_NO_OUTPUT).unwrap();
        let reference = reference();
        let outcome = compile_aim(&aim, &reference, Path::new(".")).unwrap();
        assert_eq!(outcome.info.input_colorspace_name, "ACES2065-1");
    }

    const S2: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0" xmlns:cdl="urn:ASC:CDL:v1.2">
  <aces:pipeline>
    <aces:inputTransform>
      <aces:transformId>urn:ampas:aces:transformId:IDT.ARRI.Alexa-v3-logC-EI800.a1.v1</aces:transformId>
    </aces:inputTransform>
    <aces:lookTransform applied="false">
      <aces:description>Warm</aces:description>
      <cdl:SOPNode>
        <cdl:Slope>1.1 1.0 0.9</cdl:Slope>
        <cdl:Offset>0.0 0.0 0.0</cdl:Offset>
        <cdl:Power>1.0 1.0 1.0</cdl:Power>
      </cdl:SOPNode>
      <cdl:SatNode>
        <cdl:Saturation>1.2</cdl:Saturation>
      </cdl:SatNode>
    </aces:lookTransform>
    <aces:outputTransform>
      <aces:transformId>urn:ampas:aces:transformId:ODT.Academy.Rec709_100nits_dim.a1.v1</aces:transformId>
    </aces:outputTransform>
  </aces:pipeline>
</aces:amf>
"#;

    #[test]
    fn s2_unapplied_look_synthesizes_named_transform() {
        let aim = parse_amf_str(S2).unwrap();
        let reference = reference();
        let outcome = compile_aim(&aim, &reference, Path::new(".")).unwrap();

        assert_eq!(outcome.config.looks().len(), 2);
        let nt_name = format!("AMF Unapplied Look Transforms -- {}", outcome.info.clip_name);
        assert!(outcome.config.named_transform(&nt_name).is_some());
        assert_eq!(outcome.config.context().get("SHOT_LOOKS"), Some(nt_name));
        assert_eq!(outcome.info.num_looks_applied, 0);
    }

    #[test]
    fn s3_applied_look_has_no_unapplied_named_transform() {
        let applied = S2.replace(r#"applied="false""#, r#"applied="true""#);
        let aim = parse_amf_str(&applied).unwrap();
        let reference = reference();
        let outcome = compile_aim(&aim, &reference, Path::new(".")).unwrap();

        assert_eq!(outcome.info.num_looks_applied, 1);
        let nt_name = format!("AMF Unapplied Look Transforms -- {}", outcome.info.clip_name);
        assert!(outcome.config.named_transform(&nt_name).is_none());
        assert_eq!(outcome.config.context().get("SHOT_LOOKS"), Some("ACES2065-1".to_string()));
    }

    const S4: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0" xmlns:cdl="urn:ASC:CDL:v1.2">
  <aces:pipeline>
    <aces:inputTransform>
      <aces:transformId>urn:ampas:aces:transformId:IDT.ARRI.Alexa-v3-logC-EI800.a1.v1</aces:transformId>
    </aces:inputTransform>
    <aces:lookTransform applied="false">
      <cdl:SOPNode>
        <cdl:Slope>1.0 1.0 1.0</cdl:Slope>
        <cdl:Offset>0.0 0.0 0.0</cdl:Offset>
        <cdl:Power>1.0 1.0 1.0</cdl:Power>
      </cdl:SOPNode>
    </aces:lookTransform>
    <aces:workingLocation/>
    <aces:outputTransform>
      <aces:transformId>urn:ampas:aces:transformId:ODT.Academy.Rec709_100nits_dim.a1.v1</aces:transformId>
    </aces:outputTransform>
  </aces:pipeline>
</aces:amf>
"#;

    #[test]
    fn s4_working_location_builds_forward_group() {
        let aim = parse_amf_str(S4).unwrap();
        assert_eq!(aim.num_looks_before_working_location, Some(1));
        let reference = reference();
        let outcome = compile_aim(&aim, &reference, Path::new(".")).unwrap();

        let nt_name = format!("AMF Clip to Working Space Transform -- {}", outcome.info.clip_name);
        let nt = outcome.config.named_transform(&nt_name).expect("named transform present");
        match nt.forward_transform() {
            Some(Transform::Group(g)) => {
                assert_eq!(g.transforms.len(), 2);
                assert!(matches!(g.transforms[0], Transform::ColorSpace(_)));
                assert!(matches!(g.transforms[1], Transform::Look(_)));
            }
            other => panic!("expected group transform, got {other:?}"),
        }
    }

    #[test]
    fn cdl_sop_without_sat_defaults_to_identity_saturation() {
        let xml = r#"<?xml version="1.0"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0" xmlns:cdl="urn:ASC:CDL:v1.2">
  <aces:pipeline>
    <aces:lookTransform applied="true">
      <cdl:SOPNode>
        <cdl:Slope>1.1 1.0 0.9</cdl:Slope>
        <cdl:Offset>0.0 0.0 0.0</cdl:Offset>
        <cdl:Power>1.0 1.0 1.0</cdl:Power>
      </cdl:SOPNode>
    </aces:lookTransform>
  </aces:pipeline>
</aces:amf>
"#;
        let aim = parse_amf_str(xml).unwrap();
        let reference = reference();
        let outcome = compile_aim(&aim, &reference, Path::new(".")).unwrap();

        let look = outcome
            .config
            .looks()
            .all()
            .iter()
            .find(|l| l.get_description() == "ASC CDL")
            .expect("CDL look present");
        match look.get_transform() {
            Some(Transform::Group(g)) => match &g.transforms[0] {
                Transform::Cdl(cdl) => assert_eq!(cdl.saturation, 1.0),
                other => panic!("expected CDL transform, got {other:?}"),
            },
            other => panic!("expected group transform, got {other:?}"),
        }
    }

    #[test]
    fn s5_file_input_resolves_relative_to_amf_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cube_path = dir.path().join("foo.cube");
        std::fs::File::create(&cube_path)
            .unwrap()
            .write_all(b"LUT_3D_SIZE 2\n")
            .unwrap();

        let xml = r#"<?xml version="1.0"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0">
  <aces:pipeline>
    <aces:inputTransform>
      <aces:file>./foo.cube</aces:file>
    </aces:inputTransform>
  </aces:pipeline>
</aces:amf>
"#;
        let aim = parse_amf_str(xml).unwrap();
        let reference = reference();
        let outcome = compile_aim(&aim, &reference, dir.path()).unwrap();

        let cs_name = &outcome.info.input_colorspace_name;
        assert!(cs_name.starts_with("AMF Input Transform -- "));
        let cs = outcome.config.colorspace(cs_name).unwrap();
        match cs.to_reference() {
            Some(Transform::FileTransform(ft)) => {
                assert_eq!(ft.src, PathBuf::from("./foo.cube"));
            }
            other => panic!("expected file transform, got {other:?}"),
        }
        assert!(outcome.config.search_paths().contains(&dir.path().to_path_buf()));
    }

    #[test]
    fn missing_lut_file_is_rejected() {
        let xml = r#"<?xml version="1.0"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0">
  <aces:pipeline>
    <aces:inputTransform>
      <aces:file>./does_not_exist.cube</aces:file>
    </aces:inputTransform>
  </aces:pipeline>
</aces:amf>
"#;
        let aim = parse_amf_str(xml).unwrap();
        let reference = reference();
        let dir = tempfile::tempdir().unwrap();
        let err = compile_aim(&aim, &reference, dir.path()).unwrap_err();
        assert!(matches!(err, AmfError::InvalidLutPath { .. }));
    }

    #[test]
    fn s6_rejects_reference_config_below_2_3() {
        let mut reference = reference();
        reference.set_version(2, 2);
        let aim = parse_amf_str(S1).unwrap();
        let err = compile_aim(&aim, &reference, Path::new(".")).unwrap_err();
        assert!(matches!(
            err,
            AmfError::UnsupportedRefVersion { major: 2, minor: 2, .. }
        ));
    }

    #[test]
    fn clip_role_sanitizes_non_alnum_characters() {
        let xml = r#"<?xml version="1.0"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0">
  <aces:clipId><aces:clipName>A001-C001 (take 2)</aces:clipName></aces:clipId>
  <aces:pipeline/>
</aces:amf>
"#;
        let aim = parse_amf_str(xml).unwrap();
        let reference = reference();
        let outcome = compile_aim(&aim, &reference, Path::new(".")).unwrap();
        assert_eq!(outcome.info.clip_identifier, "amf_clip_A001C001take2");
    }

    #[test]
    fn inverse_odt_rrt_lut_pair_picks_distinct_files() {
        let xml = r#"<?xml version="1.0"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0">
  <aces:pipeline>
    <aces:inputTransform>
      <aces:inverseOutputDeviceTransform>
        <aces:file>./odt.cube</aces:file>
      </aces:inverseOutputDeviceTransform>
      <aces:inverseReferenceRenderingTransform>
        <aces:file>./rrt.cube</aces:file>
      </aces:inverseReferenceRenderingTransform>
    </aces:inputTransform>
  </aces:pipeline>
</aces:amf>
"#;
        let dir = tempfile::tempdir().unwrap();
        for name in ["odt.cube", "rrt.cube"] {
            std::fs::File::create(dir.path().join(name)).unwrap();
        }
        let aim = parse_amf_str(xml).unwrap();
        let reference = reference();
        let outcome = compile_aim(&aim, &reference, dir.path()).unwrap();

        let cs_name = &outcome.info.input_colorspace_name;
        let cs = outcome.config.colorspace(cs_name).unwrap();
        match cs.from_reference() {
            Some(Transform::Group(g)) => {
                assert_eq!(g.transforms.len(), 2);
                let paths: Vec<&PathBuf> = g
                    .transforms
                    .iter()
                    .map(|t| match t {
                        Transform::FileTransform(ft) => &ft.src,
                        _ => panic!("expected file transform"),
                    })
                    .collect();
                assert_ne!(paths[0], paths[1]);
            }
            other => panic!("expected group transform, got {other:?}"),
        }
    }
}
