// ---------------------------------------------------------------------------
// Layout and rendering constants
// ---------------------------------------------------------------------------

pub const APP_TITLE: &str = "Eddington – Curve Fitting";

/// Main window size in logical points.
pub const WINDOW_SIZE: [f32; 2] = [1000.0, 760.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [640.0, 480.0];

pub const SMALL_PADDING: f32 = 5.0;
pub const BIG_PADDING: f32 = 15.0;

/// Native figure size in pixels (6.4in × 4.8in at 100 dpi).
pub const FIGURE_WIDTH: u32 = 640;
pub const FIGURE_HEIGHT: u32 = 480;
pub const FIGURE_DPI: f64 = 100.0;

/// Figure windows are taller than the figure to leave room for the buttons.
pub const FIGURE_WINDOW_HEIGHT_RATIO: f32 = 1.35;

/// Number of samples used to draw a fitted curve.
pub const CURVE_SAMPLES: usize = 200;

/// Fraction of the data span added on each side of the x range.
pub const X_RANGE_PADDING: f64 = 0.1;
