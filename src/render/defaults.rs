//! Default sizes and settings (pixels unless noted)

/// Canvas size used when the caller does not request one
pub const CANVAS_SIZE: f64 = 500.0;
/// Decimal places kept in emitted markup
pub const PRECISION: usize = 2;
/// Threshold below which a rotation system counts as singular
pub const TOLERANCE: f64 = 1e-9;

pub const STROKE: &str = "black";
pub const FILL: &str = "none";
pub const STROKE_WIDTH: f64 = 1.0;

/// Arrow-head half-angle in degrees
pub const ARROW_ARC: f64 = 30.0;
/// Arrow-head size as a fraction of the arrow's length
pub const ARROW_HEAD: f64 = 0.15;
/// Cardinal-spline tension (0 = straight segments, 1 = full tangent)
pub const SPLINE_CURVE: f64 = 0.5;

/// Stroke used for debug overlay boxes
pub const DEBUG_STROKE: &str = "red";
pub const DEBUG_DASH: &str = "3,3";

/// Width, in ems, of a character whose table entry is 100
pub const CHAR_EM: f64 = 0.57;
/// Width, in ems, of every character in monospace text
pub const MONO_EM: f64 = 0.6;
pub const TEXT_FILL: &str = "black";

/// Frame padding and margin, in units of the child's width
pub const FRAME_PADDING: f64 = 0.0;
pub const FRAME_MARGIN: f64 = 0.0;
