//! Transform definitions for color space conversions.
//!
//! Transforms describe operations that recolor pixels when moving between
//! color spaces, looks, and display/view pairs. The AMF compiler only ever
//! *constructs* these values — evaluating or rendering them against actual
//! pixels is a host-side concern and out of scope here.
//!
//! Transforms can be chained via `GroupTransform`.

use std::path::PathBuf;

/// Transform application direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformDirection {
    /// Forward transform.
    #[default]
    Forward,
    /// Inverse transform.
    Inverse,
}

impl TransformDirection {
    /// Returns the opposite direction.
    #[inline]
    pub fn inverse(self) -> Self {
        match self {
            Self::Forward => Self::Inverse,
            Self::Inverse => Self::Forward,
        }
    }
}

/// Interpolation method for file-based LUT transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Nearest neighbor.
    Nearest,
    /// Linear interpolation (default for 1D).
    Linear,
    /// Tetrahedral interpolation (default for 3D).
    Tetrahedral,
    /// Best available (context-dependent).
    #[default]
    Best,
}

/// Color transform definition.
///
/// This enum covers the transform value types the reference-config
/// collaborator is required to support (file, color-space, display/view,
/// group, look, CDL, matrix).
#[derive(Debug, Clone)]
pub enum Transform {
    /// 4x4 matrix transform.
    Matrix(MatrixTransform),

    /// File-based transform (LUT reference).
    FileTransform(FileTransform),

    /// CDL (slope/offset/power/sat).
    Cdl(CdlTransform),

    /// Reference to named color space.
    ColorSpace(ColorSpaceTransform),

    /// Reference to named look.
    Look(LookTransform),

    /// Reference to display/view.
    DisplayView(DisplayViewTransform),

    /// Group of chained transforms.
    Group(GroupTransform),
}

impl Transform {
    /// Creates a matrix transform from a 4x4 array.
    pub fn matrix(m: [f64; 16]) -> Self {
        Self::Matrix(MatrixTransform {
            matrix: m,
            offset: [0.0; 4],
            direction: TransformDirection::Forward,
        })
    }

    /// Creates an identity matrix transform.
    pub fn identity() -> Self {
        Self::matrix(MatrixTransform::IDENTITY)
    }

    /// Creates a group transform.
    pub fn group(transforms: Vec<Transform>) -> Self {
        Self::Group(GroupTransform {
            transforms,
            direction: TransformDirection::Forward,
        })
    }

    /// Creates a file transform (LUT reference).
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::FileTransform(FileTransform {
            src: path.into(),
            ccc_id: None,
            interpolation: Interpolation::default(),
            direction: TransformDirection::Forward,
        })
    }

    /// Returns the inverse of this transform.
    pub fn inverse(self) -> Self {
        match self {
            Self::Matrix(mut t) => {
                t.direction = t.direction.inverse();
                Self::Matrix(t)
            }
            Self::FileTransform(mut t) => {
                t.direction = t.direction.inverse();
                Self::FileTransform(t)
            }
            Self::Cdl(mut t) => {
                t.direction = t.direction.inverse();
                Self::Cdl(t)
            }
            Self::ColorSpace(mut t) => {
                t.direction = t.direction.inverse();
                Self::ColorSpace(t)
            }
            Self::Look(mut t) => {
                t.direction = t.direction.inverse();
                Self::Look(t)
            }
            Self::DisplayView(mut t) => {
                t.direction = t.direction.inverse();
                Self::DisplayView(t)
            }
            Self::Group(mut t) => {
                t.direction = t.direction.inverse();
                t.transforms.reverse();
                Self::Group(t)
            }
        }
    }
}

/// 4x4 matrix + offset transform.
#[derive(Debug, Clone)]
pub struct MatrixTransform {
    /// 4x4 matrix in row-major order.
    pub matrix: [f64; 16],
    /// RGBA offset.
    pub offset: [f64; 4],
    /// Direction.
    pub direction: TransformDirection,
}

impl MatrixTransform {
    /// Identity matrix.
    pub const IDENTITY: [f64; 16] = [
        1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    ];
}

/// File-based transform (LUT, etc.).
#[derive(Debug, Clone)]
pub struct FileTransform {
    /// Source file path.
    pub src: PathBuf,
    /// CDL correction ID (for .ccc/.cdl files).
    pub ccc_id: Option<String>,
    /// Interpolation method.
    pub interpolation: Interpolation,
    /// Direction.
    pub direction: TransformDirection,
}

/// CDL (ASC Color Decision List) transform.
#[derive(Debug, Clone)]
pub struct CdlTransform {
    /// Per-channel slope [R, G, B].
    pub slope: [f64; 3],
    /// Per-channel offset [R, G, B].
    pub offset: [f64; 3],
    /// Per-channel power [R, G, B].
    pub power: [f64; 3],
    /// Saturation (1.0 = no change).
    pub saturation: f64,
    /// CDL style.
    pub style: CdlStyle,
    /// Direction.
    pub direction: TransformDirection,
}

/// CDL style (order of operations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CdlStyle {
    /// ASC CDL v1.2 standard (default).
    #[default]
    AscCdl,
    /// No clamping.
    NoClamp,
}

impl Default for CdlTransform {
    fn default() -> Self {
        Self {
            slope: [1.0, 1.0, 1.0],
            offset: [0.0, 0.0, 0.0],
            power: [1.0, 1.0, 1.0],
            saturation: 1.0,
            style: CdlStyle::default(),
            direction: TransformDirection::Forward,
        }
    }
}

/// Reference to a named color space.
#[derive(Debug, Clone)]
pub struct ColorSpaceTransform {
    /// Source color space name.
    pub src: String,
    /// Destination color space name.
    pub dst: String,
    /// Whether non-color (data) pixels bypass the conversion.
    pub data_bypass: bool,
    /// Direction.
    pub direction: TransformDirection,
}

impl ColorSpaceTransform {
    /// Creates a forward color-space transform with no data bypass.
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            data_bypass: false,
            direction: TransformDirection::Forward,
        }
    }
}

/// Reference to a named look.
#[derive(Debug, Clone)]
pub struct LookTransform {
    /// Source color space.
    pub src: String,
    /// Destination color space.
    pub dst: String,
    /// Look names (comma-separated for multiple).
    pub looks: String,
    /// Whether the src->dst color-space conversion itself should be skipped.
    pub skip_color_space_conversion: bool,
    /// Direction.
    pub direction: TransformDirection,
}

/// Display/view transform reference.
#[derive(Debug, Clone)]
pub struct DisplayViewTransform {
    /// Source color space.
    pub src: String,
    /// Display name.
    pub display: String,
    /// View name.
    pub view: String,
    /// Whether to bypass the view's looks.
    pub looks_bypass: bool,
    /// Direction.
    pub direction: TransformDirection,
}

/// Group of chained transforms.
#[derive(Debug, Clone, Default)]
pub struct GroupTransform {
    /// Ordered list of transforms.
    pub transforms: Vec<Transform>,
    /// Direction (affects iteration order).
    pub direction: TransformDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_inverse() {
        assert_eq!(TransformDirection::Forward.inverse(), TransformDirection::Inverse);
        assert_eq!(TransformDirection::Inverse.inverse(), TransformDirection::Forward);
    }

    #[test]
    fn matrix_transform() {
        let t = Transform::matrix(MatrixTransform::IDENTITY);
        if let Transform::Matrix(m) = t {
            assert_eq!(m.matrix[0], 1.0);
            assert_eq!(m.direction, TransformDirection::Forward);
        } else {
            panic!("expected Matrix");
        }
    }

    #[test]
    fn group_inverse_reverses_order() {
        let g = Transform::group(vec![
            Transform::identity(),
            Transform::file("test.cube"),
        ]);
        let inv = g.inverse();
        if let Transform::Group(g) = inv {
            assert_eq!(g.direction, TransformDirection::Inverse);
            assert_eq!(g.transforms.len(), 2);
            assert!(matches!(g.transforms[0], Transform::FileTransform(_)));
            assert!(matches!(g.transforms[1], Transform::Matrix(_)));
        } else {
            panic!("expected Group");
        }
    }

    #[test]
    fn cdl_default_is_identity() {
        let cdl = CdlTransform::default();
        assert_eq!(cdl.slope, [1.0, 1.0, 1.0]);
        assert_eq!(cdl.offset, [0.0, 0.0, 0.0]);
        assert_eq!(cdl.power, [1.0, 1.0, 1.0]);
        assert_eq!(cdl.saturation, 1.0);
    }

    #[test]
    fn look_transform_inverse_toggles_direction_only() {
        let t = Transform::Look(LookTransform {
            src: "ACES".into(),
            dst: "ACES".into(),
            looks: "Warm".into(),
            skip_color_space_conversion: false,
            direction: TransformDirection::Forward,
        });
        let inv = t.inverse();
        if let Transform::Look(l) = inv {
            assert_eq!(l.direction, TransformDirection::Inverse);
            assert_eq!(l.looks, "Warm");
        } else {
            panic!("expected Look");
        }
    }
}
