//! Display configuration for animators.
//!
//! Every struct has documented defaults and `with_*` builder methods. All of
//! them (de)serialize with `#[serde(default)]`, so a partial JSON document only
//! needs the fields it changes.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::{Color, Colormap};
use crate::normalization::NormSpec;
use crate::{AnimoError, AnimoResult};

/// Figure-level options shared by every animator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Figure size in pixels (width, height)
    pub figsize: (u32, u32),
    /// Delay between frames in milliseconds
    pub interval_ms: u64,
    /// Frame count override; `None` takes it from the data
    pub nframes: Option<usize>,
    /// Figure title
    pub title: Option<String>,
    /// Background color
    pub background: Color,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            figsize: (600, 400),
            interval_ms: 100,
            nframes: None,
            title: None,
            background: Color::WHITE,
        }
    }
}

impl FigureConfig {
    /// Defaults for image animations: a taller 500x600 figure
    pub fn for_images() -> Self {
        Self {
            figsize: (500, 600),
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON, filling unspecified fields with defaults
    pub fn from_json(json: &str) -> AnimoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the figure size in pixels
    pub const fn with_figsize(mut self, width: u32, height: u32) -> Self {
        self.figsize = (width, height);
        self
    }

    /// Set the delay between frames
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = interval.as_millis() as u64;
        self
    }

    /// Override the frame count
    pub const fn with_nframes(mut self, nframes: usize) -> Self {
        self.nframes = Some(nframes);
        self
    }

    /// Set the figure title
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Delay between frames
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub(crate) fn validate(&self) -> AnimoResult<()> {
        if self.interval_ms == 0 {
            return Err(AnimoError::invalid_parameter("interval", "must be > 0 ms"));
        }
        if self.figsize.0 == 0 || self.figsize.1 == 0 {
            return Err(AnimoError::invalid_parameter(
                "figsize",
                format!("must be non-zero, got {:?}", self.figsize),
            ));
        }
        Ok(())
    }
}

/// Line dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// Continuous stroke (`-`)
    #[default]
    Solid,
    /// Long dashes (`--`)
    Dashed,
    /// Dots (`:`)
    Dotted,
    /// Alternating dash and dot (`-.`)
    DashDot,
}

impl FromStr for LineStyle {
    type Err = AnimoError;

    fn from_str(s: &str) -> AnimoResult<Self> {
        match s {
            "-" | "solid" => Ok(Self::Solid),
            "--" | "dashed" => Ok(Self::Dashed),
            ":" | "dotted" => Ok(Self::Dotted),
            "-." | "dashdot" => Ok(Self::DashDot),
            other => Err(AnimoError::invalid_config(format!(
                "unknown line style '{other}'"
            ))),
        }
    }
}

/// Marker drawn at every data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    /// No marker
    #[default]
    None,
    /// Filled circle (`o`)
    Circle,
    /// Filled square (`s`)
    Square,
    /// Upward triangle (`^`)
    Triangle,
    /// Diagonal cross (`x`)
    Cross,
}

impl FromStr for Marker {
    type Err = AnimoError;

    fn from_str(s: &str) -> AnimoResult<Self> {
        match s {
            "" | "none" => Ok(Self::None),
            "o" | "circle" => Ok(Self::Circle),
            "s" | "square" => Ok(Self::Square),
            "^" | "triangle" => Ok(Self::Triangle),
            "x" | "cross" => Ok(Self::Cross),
            other => Err(AnimoError::invalid_config(format!("unknown marker '{other}'"))),
        }
    }
}

/// Legend placement inside the axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendLoc {
    /// Resolved to upper right when drawing
    Best,
    /// Top right corner
    #[default]
    UpperRight,
    /// Top left corner
    UpperLeft,
    /// Bottom left corner
    LowerLeft,
    /// Bottom right corner
    LowerRight,
    /// Middle of the left edge
    CenterLeft,
    /// Middle of the right edge
    CenterRight,
    /// Middle of the bottom edge
    LowerCenter,
    /// Middle of the top edge
    UpperCenter,
    /// Center of the axes
    Center,
}

impl FromStr for LegendLoc {
    type Err = AnimoError;

    fn from_str(s: &str) -> AnimoResult<Self> {
        let loc = match s.replace('_', " ").as_str() {
            "best" => Self::Best,
            "upper right" => Self::UpperRight,
            "upper left" => Self::UpperLeft,
            "lower left" => Self::LowerLeft,
            "lower right" => Self::LowerRight,
            "center left" => Self::CenterLeft,
            "center right" | "right" => Self::CenterRight,
            "lower center" => Self::LowerCenter,
            "upper center" => Self::UpperCenter,
            "center" => Self::Center,
            other => {
                return Err(AnimoError::invalid_config(format!(
                    "unknown legend location '{other}'"
                )));
            }
        };
        Ok(loc)
    }
}

/// Legend options for a line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    /// Draw the legend
    pub show: bool,
    /// Where to draw it
    pub loc: LegendLoc,
    /// Title row above the entries
    pub title: Option<String>,
}

/// Style of an animated line. Fixed once the line is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// Stroke width in pixels
    pub linewidth: u32,
    /// Line color; `None` picks from the default color cycle
    pub color: Option<Color>,
    /// Dash pattern
    pub linestyle: LineStyle,
    /// Marker at each point
    pub marker: Marker,
    /// Marker size in pixels
    pub marker_size: u32,
    /// Legend entry
    pub label: Option<String>,
    /// Drawing order; lines default to 1, above images
    pub zorder: i32,
    /// Legend attached when the line is created
    pub legend: LegendConfig,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            linewidth: 2,
            color: None,
            linestyle: LineStyle::Solid,
            marker: Marker::None,
            marker_size: 4,
            label: None,
            zorder: 1,
            legend: LegendConfig::default(),
        }
    }
}

impl LineConfig {
    /// Set the stroke width in pixels
    pub const fn with_linewidth(mut self, linewidth: u32) -> Self {
        self.linewidth = linewidth;
        self
    }

    /// Set a fixed line color
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the dash pattern
    pub const fn with_linestyle(mut self, linestyle: LineStyle) -> Self {
        self.linestyle = linestyle;
        self
    }

    /// Set the point marker
    pub const fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    /// Set the legend entry
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Set the drawing order
    pub const fn with_zorder(mut self, zorder: i32) -> Self {
        self.zorder = zorder;
        self
    }

    /// Show a legend at `loc`, optionally titled
    pub fn with_legend(mut self, loc: LegendLoc, title: Option<&str>) -> Self {
        self.legend = LegendConfig {
            show: true,
            loc,
            title: title.map(str::to_string),
        };
        self
    }
}

/// Text shown on top of an image, one string per frame or the same for all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameText {
    /// The same text on every frame
    Static(String),
    /// Entry `i` is shown on frame `i`
    PerFrame(Vec<String>),
}

impl FrameText {
    /// Text for frame `index`, empty if a per-frame list runs short
    pub fn text(&self, index: usize) -> &str {
        match self {
            Self::Static(text) => text,
            Self::PerFrame(texts) => texts.get(index).map(String::as_str).unwrap_or(""),
        }
    }

    /// Number of frames covered, `None` for static text
    pub fn nframes(&self) -> Option<usize> {
        match self {
            Self::Static(_) => None,
            Self::PerFrame(texts) => Some(texts.len()),
        }
    }
}

/// Placement and look of the per-frame text annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Position in axes-relative coordinates, (0, 0) bottom left
    pub position: (f64, f64),
    /// Font size in pixels
    pub size: u32,
    /// Text color
    pub color: Color,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            position: (0.05, 0.92),
            size: 14,
            color: Color::BLACK,
        }
    }
}

/// Display options of an animated image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Colormap, `terrain_r` by default
    pub colormap: Colormap,
    /// Normalization applied before the colormap
    pub norm: NormSpec,
    /// Lower bound for the linear and log normalizations
    pub vmin: Option<f64>,
    /// Upper bound for the linear and log normalizations
    pub vmax: Option<f64>,
    /// Label of the horizontal axis
    pub xlabel: Option<String>,
    /// Label of the vertical axis
    pub ylabel: Option<String>,
    /// Axis label font size in pixels
    pub label_size: u32,
    /// Annotation text
    pub text: Option<FrameText>,
    /// Where and how the annotation is drawn
    pub annotation: AnnotationConfig,
    /// Draw a color bar
    pub colorbar: bool,
    /// Drawing order; images default to 0
    pub zorder: i32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            colormap: Colormap::default(),
            norm: NormSpec::Linear,
            vmin: None,
            vmax: None,
            xlabel: None,
            ylabel: None,
            label_size: 15,
            text: None,
            annotation: AnnotationConfig::default(),
            colorbar: false,
            zorder: 0,
        }
    }
}

impl ImageConfig {
    /// Set the colormap
    pub fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }

    /// Set the normalization
    pub const fn with_norm(mut self, norm: NormSpec) -> Self {
        self.norm = norm;
        self
    }

    /// Set the value range of the linear and log normalizations
    pub const fn with_limits(mut self, vmin: Option<f64>, vmax: Option<f64>) -> Self {
        self.vmin = vmin;
        self.vmax = vmax;
        self
    }

    /// Set both axis labels
    pub fn with_labels(mut self, xlabel: &str, ylabel: &str) -> Self {
        self.xlabel = Some(xlabel.to_string());
        self.ylabel = Some(ylabel.to_string());
        self
    }

    /// Set the annotation text
    pub fn with_text(mut self, text: FrameText) -> Self {
        self.text = Some(text);
        self
    }

    /// Toggle the color bar
    pub const fn with_colorbar(mut self, colorbar: bool) -> Self {
        self.colorbar = colorbar;
        self
    }

    /// Set the drawing order
    pub const fn with_zorder(mut self, zorder: i32) -> Self {
        self.zorder = zorder;
        self
    }
}

/// One style for every item of a multi animator, or one per item.
#[derive(Debug, Clone, PartialEq)]
pub enum Styles<C> {
    /// Every item uses this config
    Shared(C),
    /// One config per item, in order
    PerItem(Vec<C>),
}

impl<C: Default> Default for Styles<C> {
    fn default() -> Self {
        Self::Shared(C::default())
    }
}

impl<C: Clone> Styles<C> {
    /// Expand into exactly `n` configs.
    pub fn expand(self, n: usize) -> AnimoResult<Vec<C>> {
        match self {
            Self::Shared(config) => Ok(vec![config; n]),
            Self::PerItem(configs) if configs.len() == n => Ok(configs),
            Self::PerItem(configs) => Err(AnimoError::invalid_config(format!(
                "{} styles given for {n} items",
                configs.len()
            ))),
        }
    }
}
