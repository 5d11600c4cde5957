//! Reference configuration: parsing, programmatic construction, and the
//! capability surface the AMF compiler builds against.
//!
//! This module treats the "reference config" as the black-box collaborator
//! described by the AMF compiler's external interface: a mutable bag of
//! color spaces, roles, displays/views, looks, shared views, viewing rules,
//! and named transforms that can be created raw, from a built-in seed, or
//! parsed from a `.ocio`-shaped YAML file, then edited in place while the
//! compiler builds the final answer.
//!
//! # Example
//!
//! ```ignore
//! use amf_compiler::Config;
//!
//! let config = Config::from_file("aces_1.3/config.ocio")?;
//!
//! for cs in config.colorspaces() {
//!     println!("{}: {:?}", cs.name(), cs.encoding());
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use serde::Deserialize;

use crate::colorspace::{ColorSpace, Encoding, Family};
use crate::context::Context;
use crate::display::{Display, DisplayManager, View, ViewTransform};
use crate::error::{AmfError, AmfResult};
use crate::look::{Look, LookManager};
use crate::role::Roles;
use crate::transform::Transform;

/// Reference configuration.
///
/// The main entry point for color management. A config defines:
/// - Color spaces and their transforms
/// - Roles (semantic mappings)
/// - Displays, views, and shared views
/// - Looks and named transforms
#[derive(Debug, Clone)]
pub struct Config {
    /// Config name.
    name: String,
    /// Config description.
    description: String,
    /// Config version.
    version: ConfigVersion,
    /// Search paths for LUTs.
    search_paths: Vec<PathBuf>,
    /// Working directory (config file location).
    working_dir: PathBuf,
    /// All color spaces.
    colorspaces: Vec<ColorSpace>,
    /// Role mappings.
    roles: Roles,
    /// Display/view configuration.
    displays: DisplayManager,
    /// Looks.
    looks: LookManager,
    /// Active displays (subset to show in UI).
    active_displays: Vec<String>,
    /// Active views (subset to show in UI).
    active_views: Vec<String>,
    /// Shared views (OCIO v2.3+), referenced from displays by name.
    shared_views: Vec<SharedView>,
    /// Viewing rules (OCIO v2.0+).
    viewing_rules: Vec<ViewingRule>,
    /// Named transforms (OCIO v2.0+).
    named_transforms: Vec<NamedTransform>,
    /// Inactive color spaces (hidden from UI).
    inactive_colorspaces: Vec<String>,
    /// File rules for automatic color space detection.
    file_rules: Vec<FileRule>,
    /// Environment/context.
    context: Context,
    /// Strict parsing mode.
    #[allow(dead_code)]
    strict_parsing: bool,
}

/// Config format version.
///
/// Modeled as an explicit `(major, minor)` pair rather than a coarse
/// two-variant enum: the compiler needs to reject any reference config
/// whose minor version is below 3 within the 2.x line, which a `V1`/`V2`
/// enum cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigVersion {
    /// Major version component.
    pub major: u32,
    /// Minor version component.
    pub minor: u32,
}

impl Default for ConfigVersion {
    fn default() -> Self {
        Self { major: 1, minor: 0 }
    }
}

impl ConfigVersion {
    /// Creates a version from major/minor components.
    #[inline]
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Checks whether this version is at least `major.minor`.
    #[inline]
    pub fn is_at_least(&self, major: u32, minor: u32) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

/// File rule for automatic color space assignment.
#[derive(Debug, Clone)]
pub struct FileRule {
    /// Rule name.
    pub name: String,
    /// File pattern (glob or regex).
    pub pattern: String,
    /// Extension filter.
    pub extension: Option<String>,
    /// Assigned color space.
    pub colorspace: String,
}

impl FileRule {
    /// Creates a catch-all rule assigning every file to `colorspace`.
    pub fn default_rule(colorspace: impl Into<String>) -> Self {
        Self {
            name: "Default".into(),
            pattern: String::new(),
            extension: None,
            colorspace: colorspace.into(),
        }
    }
}

/// A named transform (OCIO v2.0+): a forward/inverse transform pair that
/// is not tied to a color space, referenced by name.
#[derive(Debug, Clone)]
pub struct NamedTransform {
    /// Name.
    name: String,
    /// Description.
    description: String,
    /// Family (for categorization/grouping), e.g. `AMF/<clipName>`.
    family: String,
    /// Forward transform.
    forward_transform: Option<Transform>,
    /// Inverse transform.
    inverse_transform: Option<Transform>,
}

impl NamedTransform {
    /// Creates a new named transform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            family: String::new(),
            forward_transform: None,
            inverse_transform: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Sets the family.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Sets the forward transform.
    pub fn with_forward_transform(mut self, t: Transform) -> Self {
        self.forward_transform = Some(t);
        self
    }

    /// Sets the inverse transform.
    pub fn with_inverse_transform(mut self, t: Transform) -> Self {
        self.inverse_transform = Some(t);
        self
    }

    /// Returns the name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the family.
    #[inline]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Returns the forward transform.
    #[inline]
    pub fn forward_transform(&self) -> Option<&Transform> {
        self.forward_transform.as_ref()
    }

    /// Returns the inverse transform.
    #[inline]
    pub fn inverse_transform(&self) -> Option<&Transform> {
        self.inverse_transform.as_ref()
    }
}

/// The color space a [`SharedView`] resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedViewColorSpace {
    /// Resolve to whichever display color space this view is bound to
    /// (OCIO's `<USE_DISPLAY_NAME>` sentinel).
    UseDisplayName,
    /// An explicit, fixed color space name.
    Explicit(String),
}

/// A shared view (OCIO v2.3+): a view definition registered once and bound
/// to one or more displays by name, rather than being duplicated per
/// display.
#[derive(Debug, Clone)]
pub struct SharedView {
    /// Name.
    name: String,
    /// Associated view transform name, if any.
    view_transform: Option<String>,
    /// Color space this view resolves to.
    colorspace: SharedViewColorSpace,
    /// Looks applied by this view.
    looks: Option<String>,
    /// Description.
    description: String,
}

impl SharedView {
    /// Creates a shared view bound to a view transform, resolving its
    /// color space to whichever display it's attached to.
    pub fn new(name: impl Into<String>, view_transform: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            view_transform: Some(view_transform.into()),
            colorspace: SharedViewColorSpace::UseDisplayName,
            looks: None,
            description: String::new(),
        }
    }

    /// Sets an explicit color space instead of `<USE_DISPLAY_NAME>`.
    pub fn with_colorspace(mut self, name: impl Into<String>) -> Self {
        self.colorspace = SharedViewColorSpace::Explicit(name.into());
        self
    }

    /// Sets the look(s) applied by this view.
    pub fn with_looks(mut self, looks: impl Into<String>) -> Self {
        self.looks = Some(looks.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Returns the name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the view transform name.
    #[inline]
    pub fn view_transform(&self) -> Option<&str> {
        self.view_transform.as_deref()
    }

    /// Returns the color space binding.
    #[inline]
    pub fn colorspace(&self) -> &SharedViewColorSpace {
        &self.colorspace
    }

    /// Returns the look(s) applied.
    #[inline]
    pub fn looks(&self) -> Option<&str> {
        self.looks.as_deref()
    }

    /// Resolves the effective color space name for a given display.
    pub fn resolve_colorspace<'a>(&'a self, display_colorspace: &'a str) -> &'a str {
        match &self.colorspace {
            SharedViewColorSpace::UseDisplayName => display_colorspace,
            SharedViewColorSpace::Explicit(name) => name,
        }
    }
}

/// A viewing rule (OCIO v2.0+): restricts which views are applicable to a
/// given color space or encoding.
#[derive(Debug, Clone, Default)]
pub struct ViewingRule {
    /// Rule name.
    pub name: String,
    /// Color spaces this rule applies to.
    pub colorspaces: Vec<String>,
    /// Encodings this rule applies to.
    pub encodings: Vec<String>,
}

impl ViewingRule {
    /// Creates a new, empty viewing rule.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colorspaces: Vec::new(),
            encodings: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates a new empty configuration ("create-raw").
    pub fn new() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            version: ConfigVersion::default(),
            search_paths: Vec::new(),
            working_dir: PathBuf::from("."),
            colorspaces: Vec::new(),
            roles: Roles::new(),
            displays: DisplayManager::new(),
            looks: LookManager::new(),
            active_displays: Vec::new(),
            active_views: Vec::new(),
            shared_views: Vec::new(),
            viewing_rules: Vec::new(),
            named_transforms: Vec::new(),
            inactive_colorspaces: Vec::new(),
            file_rules: Vec::new(),
            context: Context::new(),
            strict_parsing: false,
        }
    }

    /// Internal constructor used by [`crate::ConfigBuilder::build`].
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_builder(
        name: String,
        description: String,
        version: ConfigVersion,
        search_paths: Vec<PathBuf>,
        working_dir: PathBuf,
        colorspaces: Vec<ColorSpace>,
        roles: Roles,
        displays: DisplayManager,
        looks: LookManager,
        active_displays: Vec<String>,
        active_views: Vec<String>,
        shared_views: Vec<SharedView>,
        viewing_rules: Vec<ViewingRule>,
        named_transforms: Vec<NamedTransform>,
        inactive_colorspaces: Vec<String>,
        file_rules: Vec<FileRule>,
        context: Context,
    ) -> Self {
        Self {
            name,
            description,
            version,
            search_paths,
            working_dir,
            colorspaces,
            roles,
            displays,
            looks,
            active_displays,
            active_views,
            shared_views,
            viewing_rules,
            named_transforms,
            inactive_colorspaces,
            file_rules,
            context,
            strict_parsing: true,
        }
    }

    /// Loads configuration from a file ("create-from-file").
    pub fn from_file(path: impl AsRef<Path>) -> AmfResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AmfError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let working_dir = path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::from_yaml_str(&content, working_dir)
    }

    /// Loads configuration from YAML string.
    pub fn from_yaml_str(yaml: &str, working_dir: PathBuf) -> AmfResult<Self> {
        let raw: RawConfig = serde_yaml::from_str(yaml)?;
        Self::from_raw(raw, working_dir)
    }

    /// Constructs config from parsed raw data.
    fn from_raw(raw: RawConfig, working_dir: PathBuf) -> AmfResult<Self> {
        let (major, minor) = parse_version(&raw.ocio_profile_version)?;

        let mut config = Self {
            name: raw.name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            version: ConfigVersion::new(major, minor),
            working_dir: working_dir.clone(),
            search_paths: raw
                .search_path
                .map(|s| {
                    s.split(':')
                        .filter(|p| !p.is_empty())
                        .map(|p| working_dir.join(p))
                        .collect()
                })
                .unwrap_or_default(),
            colorspaces: Vec::new(),
            roles: Roles::new(),
            displays: DisplayManager::new(),
            looks: LookManager::new(),
            active_displays: raw.active_displays.unwrap_or_default(),
            active_views: raw.active_views.unwrap_or_default(),
            shared_views: Vec::new(),
            viewing_rules: Vec::new(),
            named_transforms: Vec::new(),
            inactive_colorspaces: raw.inactive_colorspaces.unwrap_or_default(),
            file_rules: Vec::new(),
            context: Context::new(),
            strict_parsing: raw.strictparsing.unwrap_or(true),
        };

        if let Some(roles) = raw.roles {
            for (role, cs) in roles {
                config.roles.define(role, cs);
            }
        }

        if let Some(colorspaces) = raw.colorspaces {
            for raw_cs in colorspaces {
                config.colorspaces.push(parse_colorspace(raw_cs));
            }
        }

        if let Some(displays) = raw.displays {
            for (name, views) in displays {
                let mut display = Display::new(&name);
                for raw_view in views {
                    let view = View::new(&raw_view.name, &raw_view.colorspace)
                        .with_look(raw_view.looks.unwrap_or_default());
                    display.add_view(view);
                }
                config.displays.add_display(display);
            }
        }

        if let Some(looks) = raw.looks {
            for raw_look in looks {
                let look = Look::new(&raw_look.name)
                    .process_space(raw_look.process_space.unwrap_or_default())
                    .description(raw_look.description.unwrap_or_default());
                config.looks.add(look);
            }
        }

        if let Some(view_transforms) = raw.view_transforms {
            for raw_vt in view_transforms {
                let vt = ViewTransform::new(&raw_vt.name)
                    .with_description(raw_vt.description.unwrap_or_default());
                config.displays.add_view_transform(vt);
            }
        }

        if let Some(file_rules) = raw.file_rules {
            for raw_rule in file_rules {
                config.file_rules.push(FileRule {
                    name: raw_rule.name,
                    pattern: raw_rule.pattern.unwrap_or_default(),
                    extension: raw_rule.extension,
                    colorspace: raw_rule.colorspace,
                });
            }
        }

        Ok(config)
    }

    /// Returns config name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the config description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns config version.
    #[inline]
    pub fn version(&self) -> ConfigVersion {
        self.version
    }

    /// Sets the config version.
    pub fn set_version(&mut self, major: u32, minor: u32) {
        self.version = ConfigVersion::new(major, minor);
    }

    /// Returns the working directory.
    #[inline]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Returns all search paths.
    #[inline]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Adds a LUT search path.
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    /// Returns all color spaces.
    #[inline]
    pub fn colorspaces(&self) -> &[ColorSpace] {
        &self.colorspaces
    }

    /// Gets a color space by index.
    pub fn colorspace_by_index(&self, index: usize) -> Option<&ColorSpace> {
        self.colorspaces.get(index)
    }

    /// Gets a color space by name (or alias, or role).
    pub fn colorspace(&self, name: &str) -> Option<&ColorSpace> {
        if let Some(cs_name) = self.roles.get(name) {
            if let Some(cs) = self.colorspaces.iter().find(|cs| cs.matches_name(cs_name)) {
                return Some(cs);
            }
        }
        self.colorspaces.iter().find(|cs| cs.matches_name(name))
    }

    /// Returns color space names.
    pub fn colorspace_names(&self) -> impl Iterator<Item = &str> {
        self.colorspaces.iter().map(|cs| cs.name())
    }

    /// Adds a color space to the config.
    pub fn add_colorspace(&mut self, cs: ColorSpace) {
        self.colorspaces.push(cs);
    }

    /// Removes a color space by name.
    pub fn remove_colorspace(&mut self, name: &str) {
        self.colorspaces.retain(|cs| !cs.matches_name(name));
    }

    /// Returns the roles mapping.
    #[inline]
    pub fn roles(&self) -> &Roles {
        &self.roles
    }

    /// Sets a role mapping.
    pub fn set_role(&mut self, role: impl Into<String>, colorspace: impl Into<String>) {
        self.roles.define(role, colorspace);
    }

    /// Returns the display manager.
    #[inline]
    pub fn displays(&self) -> &DisplayManager {
        &self.displays
    }

    /// Returns a mutable reference to the display manager.
    #[inline]
    pub fn displays_mut(&mut self) -> &mut DisplayManager {
        &mut self.displays
    }

    /// Adds (or extends) a view on a display, creating the display if it
    /// doesn't exist yet.
    pub fn add_display_view(&mut self, display: impl Into<String>, view: View) {
        let display = display.into();
        match self.displays.display_mut(&display) {
            Some(d) => d.add_view(view),
            None => {
                let mut d = Display::new(display);
                d.add_view(view);
                self.displays.add_display(d);
            }
        }
    }

    /// Registers a shared view, guarding against duplicate registration by
    /// name (case-insensitive).
    pub fn add_shared_view(&mut self, view: SharedView) {
        if !self.shared_views.iter().any(|v| v.name.eq_ignore_ascii_case(&view.name)) {
            self.shared_views.push(view);
        }
    }

    /// Returns all registered shared views.
    #[inline]
    pub fn shared_views(&self) -> &[SharedView] {
        &self.shared_views
    }

    /// Looks up a shared view by name.
    pub fn shared_view(&self, name: &str) -> Option<&SharedView> {
        self.shared_views.iter().find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// Binds an already-registered shared view to a display, creating the
    /// display if it doesn't exist yet. No-op if the display already has
    /// that shared view bound.
    pub fn add_display_shared_view(&mut self, display: impl Into<String>, shared_view_name: &str) {
        let display = display.into();
        if self.displays.display(&display).is_none() {
            self.displays.add_display(Display::new(display.clone()));
        }
        if let Some(d) = self.displays.display_mut(&display) {
            d.add_shared_view(shared_view_name);
        }
    }

    /// Adds a view transform.
    pub fn add_view_transform(&mut self, vt: ViewTransform) {
        self.displays.add_view_transform(vt);
    }

    /// Gets a view transform by name.
    pub fn view_transform(&self, name: &str) -> Option<&ViewTransform> {
        self.displays.view_transform(name)
    }

    /// Gets a view transform by index.
    pub fn view_transform_by_index(&self, index: usize) -> Option<&ViewTransform> {
        self.displays.view_transform_by_index(index)
    }

    /// Removes a view from a display.
    pub fn remove_display_view(&mut self, display: &str, view: &str) {
        self.displays.remove_display_view(display, view);
    }

    /// Returns the look manager.
    #[inline]
    pub fn looks(&self) -> &LookManager {
        &self.looks
    }

    /// Adds a look to the config.
    pub fn add_look(&mut self, look: Look) {
        self.looks.add(look);
    }

    /// Gets a look by index.
    pub fn look_by_index(&self, index: usize) -> Option<&Look> {
        self.looks.all().get(index)
    }

    /// Adds a named transform.
    pub fn add_named_transform(&mut self, nt: NamedTransform) {
        self.named_transforms.push(nt);
    }

    /// Returns all named transforms.
    #[inline]
    pub fn named_transforms(&self) -> &[NamedTransform] {
        &self.named_transforms
    }

    /// Gets a named transform by name.
    pub fn named_transform(&self, name: &str) -> Option<&NamedTransform> {
        self.named_transforms.iter().find(|nt| nt.name.eq_ignore_ascii_case(name))
    }

    /// Returns all viewing rules.
    #[inline]
    pub fn viewing_rules(&self) -> &[ViewingRule] {
        &self.viewing_rules
    }

    /// Adds a viewing rule.
    pub fn add_viewing_rule(&mut self, rule: ViewingRule) {
        self.viewing_rules.push(rule);
    }

    /// Returns active display names.
    #[inline]
    pub fn active_displays(&self) -> &[String] {
        &self.active_displays
    }

    /// Sets the active displays (subset shown in UI).
    pub fn set_active_displays(&mut self, displays: impl IntoIterator<Item = impl Into<String>>) {
        self.active_displays = displays.into_iter().map(Into::into).collect();
    }

    /// Returns active view names.
    #[inline]
    pub fn active_views(&self) -> &[String] {
        &self.active_views
    }

    /// Sets the active views (subset shown in UI).
    pub fn set_active_views(&mut self, views: impl IntoIterator<Item = impl Into<String>>) {
        self.active_views = views.into_iter().map(Into::into).collect();
    }

    /// Returns inactive color space names.
    #[inline]
    pub fn inactive_colorspaces(&self) -> &[String] {
        &self.inactive_colorspaces
    }

    /// Sets the inactive color spaces (hidden from UI).
    pub fn set_inactive_colorspaces(&mut self, names: impl IntoIterator<Item = impl Into<String>>) {
        self.inactive_colorspaces = names.into_iter().map(Into::into).collect();
    }

    /// Returns the default display name.
    pub fn default_display(&self) -> Option<&str> {
        self.active_displays
            .first()
            .map(String::as_str)
            .or_else(|| self.displays.default_display())
    }

    /// Returns the default view for a display.
    pub fn default_view(&self, display: &str) -> Option<&str> {
        self.displays
            .display(display)
            .and_then(|d| d.default_view())
    }

    /// Gets the context.
    #[inline]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Gets mutable context.
    #[inline]
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Sets an environment/context variable.
    pub fn add_environment_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.set(key, value);
    }

    /// Replaces the file rules with a single default-color-space rule.
    pub fn set_file_rules(&mut self, default_colorspace: impl Into<String>) {
        self.file_rules = vec![FileRule::default_rule(default_colorspace)];
    }

    /// Returns the file rules.
    #[inline]
    pub fn file_rules(&self) -> &[FileRule] {
        &self.file_rules
    }

    /// Resolves a file path using search paths.
    pub fn resolve_file(&self, filename: &str) -> Option<PathBuf> {
        let path = PathBuf::from(filename);
        if path.is_absolute() && path.exists() {
            return Some(path);
        }

        let path = self.working_dir.join(filename);
        if path.exists() {
            return Some(path);
        }

        for search_path in &self.search_paths {
            let path = search_path.join(filename);
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Gets color space from file rules.
    pub fn colorspace_from_filepath(&self, filepath: &str) -> Option<&str> {
        for rule in &self.file_rules {
            if let Some(ext) = &rule.extension {
                if !filepath.ends_with(ext) {
                    continue;
                }
            }
            if rule.pattern.is_empty() || filepath.contains(&rule.pattern) {
                return Some(&rule.colorspace);
            }
        }
        None
    }

    /// Creates an independent editable copy of this config.
    pub fn create_editable_copy(&self) -> Self {
        self.clone()
    }

    /// Validates the config, returning the first error-level issue found.
    pub fn validate(&self) -> AmfResult<()> {
        let issues = crate::validate::check(self);
        if crate::validate::has_errors(&issues) {
            let message = issues
                .iter()
                .filter(|i| i.severity == crate::validate::Severity::Error)
                .map(|i| i.message.clone())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AmfError::Validation(message));
        }
        Ok(())
    }
}

fn parse_version(raw: &str) -> AmfResult<(u32, u32)> {
    let mut parts = raw.split('.');
    let major: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AmfError::UnsupportedVersion { version: raw.to_string() })?;
    let minor: u32 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    if major != 1 && major != 2 {
        return Err(AmfError::UnsupportedVersion { version: raw.to_string() });
    }
    Ok((major, minor))
}

fn parse_colorspace(raw: RawColorSpace) -> ColorSpace {
    let mut builder = ColorSpace::builder(&raw.name);

    if let Some(desc) = raw.description {
        builder = builder.description(desc);
    }
    if let Some(family) = raw.family {
        builder = builder.family(Family::parse(&family));
    }
    if let Some(encoding) = raw.encoding {
        builder = builder.encoding(Encoding::parse(&encoding));
    }
    if raw.isdata == Some(true) {
        builder = builder.is_data(true);
    }
    if let Some(aliases) = raw.aliases {
        for alias in aliases {
            builder = builder.alias(alias);
        }
    }

    // Reference-config transform bodies (to_reference/from_reference) are
    // not parsed: the compiler imports color spaces by reference rather
    // than re-deriving their internal transform chains.
    builder.build()
}

// ============================================================================
// Raw YAML structures for serde
// ============================================================================

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct RawConfig {
    ocio_profile_version: String,
    name: Option<String>,
    description: Option<String>,
    search_path: Option<String>,
    strictparsing: Option<bool>,
    roles: Option<HashMap<String, String>>,
    colorspaces: Option<Vec<RawColorSpace>>,
    displays: Option<HashMap<String, Vec<RawView>>>,
    active_displays: Option<Vec<String>>,
    active_views: Option<Vec<String>>,
    inactive_colorspaces: Option<Vec<String>>,
    looks: Option<Vec<RawLook>>,
    view_transforms: Option<Vec<RawViewTransform>>,
    file_rules: Option<Vec<RawFileRule>>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct RawColorSpace {
    name: String,
    description: Option<String>,
    family: Option<String>,
    encoding: Option<String>,
    bitdepth: Option<String>,
    isdata: Option<bool>,
    aliases: Option<Vec<String>>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct RawView {
    name: String,
    colorspace: String,
    looks: Option<String>,
    view_transform: Option<String>,
    rule: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct RawLook {
    name: String,
    process_space: Option<String>,
    description: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct RawViewTransform {
    name: String,
    description: Option<String>,
    family: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFileRule {
    name: String,
    pattern: Option<String>,
    extension: Option<String>,
    colorspace: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_CONFIG: &str = r#"
ocio_profile_version: 2.3

roles:
  reference: Linear
  scene_linear: Linear
  default: sRGB

colorspaces:
  - name: Linear
    family: Scene
    encoding: scene-linear
    description: Linear reference

  - name: sRGB
    family: Display
    encoding: sdr-video
    description: sRGB display

displays:
  sRGB:
    - name: Raw
      colorspace: Linear
    - name: sRGB
      colorspace: sRGB
"#;

    #[test]
    fn parse_minimal_config() {
        let config = Config::from_yaml_str(MINIMAL_CONFIG, PathBuf::from(".")).unwrap();

        assert_eq!(config.version(), ConfigVersion::new(2, 3));
        assert_eq!(config.colorspaces().len(), 2);
        assert!(config.colorspace("Linear").is_some());
        assert!(config.colorspace("sRGB").is_some());
    }

    #[test]
    fn roles_lookup() {
        let config = Config::from_yaml_str(MINIMAL_CONFIG, PathBuf::from(".")).unwrap();

        let cs = config.colorspace("scene_linear").unwrap();
        assert_eq!(cs.name(), "Linear");
    }

    #[test]
    fn displays_parsed() {
        let config = Config::from_yaml_str(MINIMAL_CONFIG, PathBuf::from(".")).unwrap();

        let displays = config.displays();
        assert!(displays.display("sRGB").is_some());

        let display = displays.display("sRGB").unwrap();
        assert_eq!(display.views().len(), 2);
    }

    #[test]
    fn version_at_least() {
        let v = ConfigVersion::new(2, 3);
        assert!(v.is_at_least(2, 3));
        assert!(v.is_at_least(2, 1));
        assert!(!v.is_at_least(2, 4));
    }

    #[test]
    fn colorspace_not_found() {
        let config = Config::from_yaml_str(MINIMAL_CONFIG, PathBuf::from(".")).unwrap();
        assert!(config.colorspace("NonExistent").is_none());
    }

    #[test]
    fn shared_view_dedup_and_binding() {
        let mut config = Config::new();
        config.add_shared_view(SharedView::new("Output Transform", "Output Transform"));
        config.add_shared_view(SharedView::new("Output Transform", "Output Transform"));
        assert_eq!(config.shared_views().len(), 1);

        config.add_display_shared_view("sRGB", "Output Transform");
        config.add_display_shared_view("sRGB", "Output Transform");
        assert_eq!(
            config.displays().display("sRGB").unwrap().shared_view_names().count(),
            1
        );
    }

    #[test]
    fn shared_view_resolves_display_name() {
        let view = SharedView::new("Output Transform", "Output Transform");
        assert_eq!(view.resolve_colorspace("sRGB - Display"), "sRGB - Display");

        let explicit = view.with_colorspace("Raw");
        assert_eq!(explicit.resolve_colorspace("sRGB - Display"), "Raw");
    }
}
