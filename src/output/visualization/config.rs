//! Plot configuration shared across visualization modules
//!
//! Style is always passed explicitly to each plotting function; nothing is
//! kept in global state.

use plotters::prelude::*;

/// Configuration for customizing plots
///
/// Used by both surface (3D) and profile comparison (2D) plots.
///
/// # Fields
///
/// - `width`, `height`: Dimensions in pixels
/// - `title`: Plot title (surface plots build theirs from the frame when empty)
/// - `xlabel`, `ylabel`: Axis labels
/// - `line_color`: Line color for single-series plots
/// - `series_colors`: Optional colors for multi-series plots (one per series)
/// - `background`: Background color
/// - `line_width`: Line thickness in pixels
/// - `show_grid`: Whether to show grid lines
/// - `pitch`, `yaw`: 3D view angles in radians
///
/// # Example
///
/// ```rust
/// use advect_rs::output::visualization::PlotConfig;
/// use plotters::prelude::*;
///
/// let mut config = PlotConfig::surface("Gaussian pulse");
/// config.width = 1920;
/// config.height = 1080;
/// config.line_color = BLUE;
/// assert_eq!(config.title, "Gaussian pulse");
/// ```
#[derive(Clone, Debug)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Plot title (default: "Plot")
    pub title: String,

    /// X-axis label (default: auto-set by plot type)
    pub xlabel: String,

    /// Y-axis label (default: "Concentration (unids)")
    pub ylabel: String,

    /// Line color for single-series plots (default: RED)
    pub line_color: RGBColor,

    /// Optional colors for multi-series plots (one per series)
    ///
    /// If None, uses the default palette: [RED, BLUE, GREEN, MAGENTA, CYAN, ...]
    pub series_colors: Option<Vec<RGBColor>>,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    /// Show grid lines (default: true)
    pub show_grid: bool,

    /// Elevation of the 3D view in radians (default: 0.45)
    pub pitch: f64,

    /// Azimuth of the 3D view in radians (default: 0.35)
    pub yaw: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Plot".to_string(),
            xlabel: String::new(), // Set by specific plot type
            ylabel: "Concentration (unids)".to_string(),
            line_color: RED,
            series_colors: None,
            background: WHITE,
            line_width: 2,
            show_grid: true,
            pitch: 0.45,
            yaw: 0.35,
        }
    }
}

/// Helper trait to accept both `String` and `None` for optional titles
pub trait IntoOptionalTitle {
    fn into_optional_title(self) -> Option<String>;
}

impl IntoOptionalTitle for &str {
    fn into_optional_title(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoOptionalTitle for String {
    fn into_optional_title(self) -> Option<String> {
        Some(self)
    }
}

impl<T: IntoOptionalTitle> IntoOptionalTitle for Option<T> {
    fn into_optional_title(self) -> Option<String> {
        self.and_then(|t| t.into_optional_title())
    }
}

/// Constant for no title (default title will be used)
///
/// # Example
///
/// ```rust,ignore
/// let config = PlotConfig::surface(NO_TITLE);
/// ```
pub const NO_TITLE: Option<&str> = None;

impl PlotConfig {
    /// Config for 3D surface frames
    ///
    /// 1000 × 800 pixels, xlabel "X". An empty title (the default) lets
    /// [`plot_surface`](super::plot_surface) build one from the frame.
    pub fn surface(title: impl IntoOptionalTitle) -> Self {
        Self {
            width: 1000,
            height: 800,
            xlabel: "X".to_string(),
            title: title.into_optional_title().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Config for numerical vs analytical profile plots
    ///
    /// Sets xlabel to "Position (m)" and title to custom value or "Profile Comparison"
    pub fn profile_comparison(title: impl IntoOptionalTitle) -> Self {
        Self {
            xlabel: "Position (m)".to_string(),
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Profile Comparison".to_string()),
            ..Self::default()
        }
    }

    /// Config with custom series colors
    pub fn series_colors(colors: Vec<RGBColor>) -> Self {
        Self {
            series_colors: Some(colors),
            ..Self::default()
        }
    }

    /// Get color for series at index i
    ///
    /// Uses custom colors if provided, otherwise falls back to default palette
    pub(crate) fn get_series_color(&self, series_index: usize) -> RGBColor {
        if let Some(colors) = &self.series_colors {
            if series_index < colors.len() {
                return colors[series_index];
            }
        }

        const DEFAULT_COLORS: [RGBColor; 8] = [
            RED,
            BLUE,
            GREEN,
            MAGENTA,
            CYAN,
            BLACK,
            RGBColor(255, 165, 0), // Orange
            RGBColor(128, 0, 128), // Purple
        ];

        DEFAULT_COLORS[series_index % DEFAULT_COLORS.len()]
    }
}

/// Diverging blue-grey-red color for `value` in `[-bound, bound]`
///
/// Values outside the bound saturate.
pub(crate) fn diverging_color(value: f64, bound: f64) -> RGBColor {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const HOT: (f64, f64, f64) = (180.0, 4.0, 38.0);

    let ratio = if bound > 0.0 {
        (value / bound).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let (from, to, t) = if ratio < 0.0 {
        (NEUTRAL, COLD, -ratio)
    } else {
        (NEUTRAL, HOT, ratio)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;

    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

// =================================================================================================
// Tests
// =================================================================================================
