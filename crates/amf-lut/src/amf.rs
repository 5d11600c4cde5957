//! Streaming parser for ACES Metadata Files (AMF).
//!
//! An AMF document describes how a single clip was transformed on-set and
//! on-screen: which input transform converted camera-native values into
//! ACES, which output transform produced the monitored image, and which
//! look transforms (CDLs, LUTs, or named grades) were applied in between.
//!
//! This module only recognizes and records the shape of the document (the
//! XML Event Router). It does not resolve `transformId` references against
//! a reference config, evaluate CDLs, or read LUT pixel data -- that is the
//! job of the compiler built on top of the [`Aim`] this module produces.
//!
//! Tag and attribute names are compared case-insensitively (AMF documents
//! in the wild disagree on casing), but the original spelling is preserved
//! in every value stored on the [`Aim`] so diagnostics can quote it back.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt;
use std::path::Path;

/// A parse failure, tagged with the one-based line number it occurred on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmfParseError {
    /// One-based line number in the source document. Zero when the error
    /// predates parsing (e.g. the file could not be opened).
    pub line: u32,
    /// Human-readable description of the failure.
    pub message: String,
}

impl fmt::Display for AmfParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for AmfParseError {}

/// Result type for AMF parsing.
pub type AmfParseResult<T> = Result<T, AmfParseError>;

/// Attribute/sub-element bag shared by the clip-id and look-transform
/// records, which have no nested top-level-descendant structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmfRecord {
    /// XML attributes on the record's own start tag, in document order.
    pub attributes: Vec<(String, String)>,
    /// `(tagName, text)` pairs for every leaf element encountered while
    /// inside this record, in document order.
    pub sub_elements: Vec<(String, String)>,
}

impl AmfRecord {
    /// True when neither attributes nor sub-elements were recorded.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.sub_elements.is_empty()
    }

    /// Looks up an attribute by case-insensitive name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the first sub-element text for a case-insensitive tag name.
    pub fn first(&self, tag: &str) -> Option<&str> {
        self.sub_elements
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(tag))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates every sub-element matching a case-insensitive tag name.
    pub fn all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.sub_elements
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(tag))
            .map(|(_, v)| v.as_str())
    }
}

/// The `aces:inputTransform` record.
///
/// Text encountered while the top-level-descendant (TLD) stack's top is
/// `aces:inputTransform` itself lands in `tld_elements`; text encountered
/// inside a nested `aces:inverse{OutputDevice,ReferenceRendering}Transform`
/// block lands in `sub_elements` instead, keeping the outer and inverted
/// inner transform from being tangled together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmfInputRecord {
    /// Attributes on `<aces:inputTransform>` itself (e.g. `applied`).
    pub attributes: Vec<(String, String)>,
    /// Leaf elements belonging to the nested inverse-ODT/RRT block.
    pub sub_elements: Vec<(String, String)>,
    /// Leaf elements belonging directly to the outer `inputTransform`.
    pub tld_elements: Vec<(String, String)>,
    /// Set once an `aces:inverseOutputDeviceTransform` or
    /// `aces:inverseReferenceRenderingTransform` is seen: signals the LUT
    /// file pass to compose its `GroupTransform` as an inverse.
    pub is_inverse: bool,
    /// Transient parser bookkeeping: the stack of nested transform tags
    /// currently open. Empty once parsing completes.
    tld_stack: Vec<String>,
}

impl AmfInputRecord {
    /// True when nothing at all was recorded for this transform.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.sub_elements.is_empty() && self.tld_elements.is_empty()
    }

    /// Looks up an attribute by case-insensitive name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the first outer-transform leaf matching a tag name.
    pub fn tld(&self, tag: &str) -> Option<&str> {
        self.tld_elements
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(tag))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates every outer-transform leaf matching a tag name, in order.
    pub fn all_tld<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tld_elements
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(tag))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the first nested-inverse leaf matching a tag name.
    pub fn sub(&self, tag: &str) -> Option<&str> {
        self.sub_elements
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(tag))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates every nested-inverse leaf matching a tag name, in order.
    pub fn all_sub<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.sub_elements
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(tag))
            .map(|(_, v)| v.as_str())
    }
}

/// The `aces:outputTransform` record. Mirrors [`AmfInputRecord`] but never
/// carries `is_inverse` -- the output side is always built forward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmfOutputRecord {
    /// Attributes on `<aces:outputTransform>` itself (e.g. `applied`).
    pub attributes: Vec<(String, String)>,
    /// Leaf elements belonging to the nested ODT/RRT block.
    pub sub_elements: Vec<(String, String)>,
    /// Leaf elements belonging directly to the outer `outputTransform`.
    pub tld_elements: Vec<(String, String)>,
    tld_stack: Vec<String>,
}

impl AmfOutputRecord {
    /// True when nothing at all was recorded for this transform.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.sub_elements.is_empty() && self.tld_elements.is_empty()
    }

    /// Looks up an attribute by case-insensitive name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the first outer-transform leaf matching a tag name.
    pub fn tld(&self, tag: &str) -> Option<&str> {
        self.tld_elements
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(tag))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates every outer-transform leaf matching a tag name, in order.
    pub fn all_tld<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tld_elements
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(tag))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the first nested leaf matching a tag name.
    pub fn sub(&self, tag: &str) -> Option<&str> {
        self.sub_elements
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(tag))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates every nested leaf matching a tag name, in order.
    pub fn all_sub<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.sub_elements
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(tag))
            .map(|(_, v)| v.as_str())
    }
}

/// One resolved look-transform record (`aces:lookTransform`). Alias of the
/// plain attribute/sub-element bag since look transforms have no TLD
/// structure of their own -- CDL nodes, `transformId`, `file`, and
/// `cdl:ColorCorrectionRef` all sit as flat siblings under it.
pub type AmfLookRecord = AmfRecord;

/// The AMF Intermediate Model: everything the XML Event Router (C1) was
/// able to read out of the document, before any reference resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aim {
    /// `aces:clipId` (clip name + uuid, as leaf sub-elements).
    pub clip_id: AmfRecord,
    /// `aces:inputTransform`.
    pub input: AmfInputRecord,
    /// `aces:outputTransform`.
    pub output: AmfOutputRecord,
    /// `aces:lookTransform` records, in document order.
    pub looks: Vec<AmfLookRecord>,
    /// Number of look records already appended when `aces:workingLocation`
    /// was encountered inside `aces:pipeline`; `None` if that tag never
    /// appeared. Modeled as `Option<usize>` rather than a sentinel integer.
    pub num_looks_before_working_location: Option<usize>,
}

/// Parses an AMF document already loaded into memory.
pub fn parse_amf_str(content: &str) -> AmfParseResult<Aim> {
    let mut xml = Reader::from_str(content);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut router = Router::default();

    loop {
        let pos = xml.buffer_position();
        let event = xml.read_event_into(&mut buf).map_err(|e| AmfParseError {
            line: line_at(content, pos),
            message: format!("XML error: {e}"),
        })?;

        match event {
            Event::Eof => break,
            Event::Start(e) => {
                let name = tag_name(&e);
                let attrs = collect_attrs(&e, content, pos)?;
                router.on_start(&name, attrs);
            }
            Event::Empty(e) => {
                let name = tag_name(&e);
                let attrs = collect_attrs(&e, content, pos)?;
                router.on_start(&name, attrs);
                router.on_end(&name);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                router.on_end(&name);
            }
            Event::Text(e) => {
                let text = e.decode().map_err(|err| AmfParseError {
                    line: line_at(content, pos),
                    message: format!("invalid character data: {err}"),
                })?;
                router.on_text(&text);
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(router.aim)
}

/// Reads and parses an AMF document from disk.
pub fn read_amf(path: &Path) -> AmfParseResult<Aim> {
    let content = std::fs::read_to_string(path).map_err(|e| AmfParseError {
        line: 0,
        message: format!("cannot read {}: {e}", path.display()),
    })?;
    parse_amf_str(&content)
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn collect_attrs(e: &BytesStart, content: &str, pos: usize) -> AmfParseResult<Vec<(String, String)>> {
    e.attributes()
        .map(|a| {
            let a = a.map_err(|err| AmfParseError {
                line: line_at(content, pos),
                message: format!("malformed attribute: {err}"),
            })?;
            let key = String::from_utf8_lossy(a.key.as_ref()).to_string();
            let value = String::from_utf8_lossy(&a.value).to_string();
            Ok((key, value))
        })
        .collect()
}

fn line_at(content: &str, byte_pos: usize) -> u32 {
    let pos = byte_pos.min(content.len());
    1 + content.as_bytes()[..pos].iter().filter(|&&b| b == b'\n').count() as u32
}

/// Tag names the router special-cases. Everything else falls through to
/// `currentElement` tracking and generic text routing.
const TAG_CLIP_ID: &str = "aces:clipid";
const TAG_INPUT_TRANSFORM: &str = "aces:inputtransform";
const TAG_OUTPUT_TRANSFORM: &str = "aces:outputtransform";
const TAG_LOOK_TRANSFORM: &str = "aces:looktransform";
const TAG_PIPELINE: &str = "aces:pipeline";
const TAG_WORKING_LOCATION: &str = "aces:workinglocation";
const TAG_INVERSE_ODT: &str = "aces:inverseoutputdevicetransform";
const TAG_INVERSE_RRT: &str = "aces:inversereferencerenderingtransform";
const TAG_ODT: &str = "aces:outputdevicetransform";
const TAG_RRT: &str = "aces:referencerenderingtransform";
const TAG_CDL_REF: &str = "cdl:colorcorrectionref";

#[derive(Debug, Default)]
struct Router {
    aim: Aim,
    inside_input: bool,
    inside_output: bool,
    inside_look: bool,
    inside_clip_id: bool,
    inside_pipeline: bool,
    current_element: Option<String>,
    current_look: AmfLookRecord,
}

impl Router {
    fn on_start(&mut self, name: &str, attrs: Vec<(String, String)>) {
        let lname = name.to_ascii_lowercase();
        match lname.as_str() {
            TAG_CLIP_ID => {
                self.inside_clip_id = true;
            }
            TAG_INPUT_TRANSFORM => {
                self.inside_input = true;
                self.aim.input.attributes = attrs;
                self.aim.input.tld_stack.push(name.to_string());
            }
            TAG_OUTPUT_TRANSFORM => {
                self.inside_output = true;
                self.aim.output.attributes = attrs;
                self.aim.output.tld_stack.push(name.to_string());
            }
            TAG_LOOK_TRANSFORM => {
                self.inside_look = true;
                self.current_look = AmfLookRecord {
                    attributes: attrs,
                    sub_elements: Vec::new(),
                };
            }
            TAG_PIPELINE => {
                self.inside_pipeline = true;
            }
            TAG_WORKING_LOCATION => {
                if self.inside_pipeline && self.aim.num_looks_before_working_location.is_none() {
                    self.aim.num_looks_before_working_location = Some(self.aim.looks.len());
                }
            }
            TAG_INVERSE_ODT | TAG_INVERSE_RRT | TAG_ODT | TAG_RRT => {
                if self.inside_input {
                    if lname == TAG_INVERSE_ODT || lname == TAG_INVERSE_RRT {
                        self.aim.input.is_inverse = true;
                    }
                    self.aim.input.tld_stack.push(name.to_string());
                } else if self.inside_output {
                    self.aim.output.tld_stack.push(name.to_string());
                }
            }
            TAG_CDL_REF if self.inside_look => {
                if let Some((_, value)) = attrs.into_iter().next() {
                    self.current_look
                        .sub_elements
                        .push(("cdl:ColorCorrectionRef".to_string(), value));
                }
            }
            _ => {
                self.current_element = Some(name.to_string());
            }
        }
    }

    fn on_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let tag = self.current_element.clone().unwrap_or_default();
        let value = text.to_string();

        if self.inside_input {
            let nested = self
                .aim
                .input
                .tld_stack
                .last()
                .is_some_and(|top| !top.eq_ignore_ascii_case("aces:inputTransform"));
            if nested {
                self.aim.input.sub_elements.push((tag, value));
            } else {
                self.aim.input.tld_elements.push((tag, value));
            }
        } else if self.inside_output {
            let nested = self
                .aim
                .output
                .tld_stack
                .last()
                .is_some_and(|top| !top.eq_ignore_ascii_case("aces:outputTransform"));
            if nested {
                self.aim.output.sub_elements.push((tag, value));
            } else {
                self.aim.output.tld_elements.push((tag, value));
            }
        } else if self.inside_look {
            self.current_look.sub_elements.push((tag, value));
        } else if self.inside_clip_id {
            self.aim.clip_id.sub_elements.push((tag, value));
        }
    }

    fn on_end(&mut self, name: &str) {
        let lname = name.to_ascii_lowercase();
        match lname.as_str() {
            TAG_CLIP_ID => self.inside_clip_id = false,
            TAG_INPUT_TRANSFORM => {
                self.aim.input.tld_stack.pop();
                self.inside_input = false;
            }
            TAG_OUTPUT_TRANSFORM => {
                self.aim.output.tld_stack.pop();
                self.inside_output = false;
            }
            TAG_LOOK_TRANSFORM => {
                self.inside_look = false;
                let look = std::mem::take(&mut self.current_look);
                self.aim.looks.push(look);
            }
            TAG_PIPELINE => self.inside_pipeline = false,
            TAG_INVERSE_ODT | TAG_INVERSE_RRT | TAG_ODT | TAG_RRT => {
                if self.inside_input {
                    self.aim.input.tld_stack.pop();
                } else if self.inside_output {
                    self.aim.output.tld_stack.pop();
                }
            }
            _ => {}
        }
        self.current_element = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S1: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0">
  <aces:clipId>
    <aces:clipName>A001C001</aces:clipName>
    <aces:uuid>urn:uuid:deadbeef</aces:uuid>
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
    fn parses_clip_id() {
        let aim = parse_amf_str(S1).unwrap();
        assert_eq!(aim.clip_id.first("aces:clipName"), Some("A001C001"));
        assert_eq!(aim.clip_id.first("aces:uuid"), Some("urn:uuid:deadbeef"));
    }

    #[test]
    fn parses_input_and_output_transform_ids() {
        let aim = parse_amf_str(S1).unwrap();
        assert!(!aim.input.is_empty());
        assert!(aim
            .input
            .tld("aces:transformId")
            .unwrap()
            .contains("IDT.ARRI"));
        assert!(aim
            .output
            .tld("aces:transformId")
            .unwrap()
            .contains("ODT.Academy"));
        assert!(aim.looks.is_empty());
        assert_eq!(aim.num_looks_before_working_location, None);
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
        <cdl:Saturation>0.9</cdl:Saturation>
      </cdl:SatNode>
    </aces:lookTransform>
    <aces:workingLocation/>
    <aces:outputTransform>
      <aces:transformId>urn:ampas:aces:transformId:ODT.Academy.Rec709_100nits_dim.a1.v1</aces:transformId>
    </aces:outputTransform>
  </aces:pipeline>
</aces:amf>
"#;

    #[test]
    fn parses_look_transform_cdl_and_working_location() {
        let aim = parse_amf_str(S2).unwrap();
        assert_eq!(aim.looks.len(), 1);

        let look = &aim.looks[0];
        assert_eq!(look.attr("applied"), Some("false"));
        assert_eq!(look.first("aces:description"), Some("Warm"));
        assert_eq!(look.first("cdl:Slope"), Some("1.1 1.0 0.9"));
        assert_eq!(look.first("cdl:Saturation"), Some("0.9"));

        assert_eq!(aim.num_looks_before_working_location, Some(1));
    }

    const S_INVERSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0">
  <aces:pipeline>
    <aces:inputTransform>
      <aces:inverseOutputDeviceTransform>
        <aces:file>luts/inv_odt.cube</aces:file>
      </aces:inverseOutputDeviceTransform>
      <aces:inverseReferenceRenderingTransform>
        <aces:file>luts/inv_rrt.cube</aces:file>
      </aces:inverseReferenceRenderingTransform>
    </aces:inputTransform>
  </aces:pipeline>
</aces:amf>
"#;

    #[test]
    fn nested_inverse_transform_elements_route_to_sub_elements() {
        let aim = parse_amf_str(S_INVERSE).unwrap();
        assert!(aim.input.is_inverse);
        assert!(aim.input.tld_elements.is_empty());
        assert_eq!(aim.input.all_sub("aces:file").count(), 2);
        assert_eq!(aim.input.sub("aces:file"), Some("luts/inv_odt.cube"));
    }

    #[test]
    fn empty_document_yields_empty_records() {
        let aim = parse_amf_str(
            r#"<?xml version="1.0"?><aces:amf xmlns:aces="urn:ampas:aces:amf:1.0"/>"#,
        )
        .unwrap();
        assert!(aim.clip_id.is_empty());
        assert!(aim.input.is_empty());
        assert!(aim.output.is_empty());
        assert!(aim.looks.is_empty());
    }

    #[test]
    fn malformed_xml_reports_a_line_number() {
        let err = parse_amf_str("<aces:amf>\n  <aces:clipId>\n").unwrap_err();
        assert!(err.line >= 1);
    }

    #[test]
    fn color_correction_ref_recorded_on_look() {
        let xml = r#"<?xml version="1.0"?>
<aces:amf xmlns:aces="urn:ampas:aces:amf:1.0" xmlns:cdl="urn:ASC:CDL:v1.2">
  <aces:pipeline>
    <aces:lookTransform applied="true">
      <cdl:ColorCorrectionRef ref="cc0001"/>
    </aces:lookTransform>
  </aces:pipeline>
</aces:amf>
"#;
        let aim = parse_amf_str(xml).unwrap();
        assert_eq!(aim.looks[0].first("cdl:ColorCorrectionRef"), Some("cc0001"));
    }
}
