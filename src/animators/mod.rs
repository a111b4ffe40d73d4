//! Animators: figures whose artists are created once and then updated per frame.
//!
//! A *series* ([`LineSeries`], [`ImageSeries`]) owns exactly one drawable and
//! knows how to create it (`Unbound`) or mutate it in place (`Bound`). An
//! *animator* owns a [`Figure`] plus one or more series and implements
//! [`Animate`], which is all the playback driver needs.
//!
//! ```rust
//! use animo::{Animate, FixedAxis, LineAnimator};
//! use ndarray::{Array1, Array2};
//!
//! let x = Array1::linspace(0.0, 1.0, 16);
//! let y = Array2::from_shape_fn((4, 16), |(i, j)| (i * j) as f64);
//! let mut animator = LineAnimator::new(x, y, FixedAxis::X)?;
//! assert_eq!(animator.nframes(), 4);
//!
//! let first = animator.render_frame(0)?;
//! assert_eq!(first.len(), 1);
//! # Ok::<(), animo::AnimoError>(())
//! ```

pub mod composite;
pub mod image;
pub mod line;
pub mod multi;

#[cfg(test)]
mod tests;

pub use composite::CompositeAnimator;
pub use image::{ImageAnimator, ImageHandles, ImageSeries};
pub use line::{FixedAxis, LineAnimator, LineSeries};
pub use multi::{MultiImageAnimator, MultiLineAnimator};

use std::path::Path;
use std::time::Duration;

use crate::color::{Color, Colormap};
use crate::config::{FigureConfig, FrameText, LineStyle};
use crate::figure::{ArtistId, Figure};
use crate::normalization::NormSpec;
use crate::playback::{DisplayMode, HtmlDisplay, Playback, PlaybackDriver};
use crate::{AnimoError, AnimoResult};

/// Lifecycle of a single series: nothing drawn yet, or drawn with handle `H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesState<H> {
    /// Nothing drawn yet
    #[default]
    Unbound,
    /// Drawn; later updates mutate the artists behind `H`
    Bound(H),
}

impl<H: Copy> SeriesState<H> {
    /// Whether the series has drawn its artist
    pub const fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }

    /// The handle, if the series has been drawn
    pub const fn handle(&self) -> Option<H> {
        match self {
            Self::Unbound => None,
            Self::Bound(handle) => Some(*handle),
        }
    }
}

/// A typed change to one configuration field of an animator.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// Delay between frames, must be non-zero
    Interval(Duration),
    /// Figure size in pixels
    FigSize(u32, u32),
    /// Frame count; every series must cover it
    Nframes(usize),
    /// Image colormap
    Colormap(Colormap),
    /// Image normalization, re-resolved on the next draw
    Normalization(NormSpec),
    /// Stroke width in pixels
    LineWidth(u32),
    /// Line color
    LineColor(Color),
    /// Line dash pattern
    LineStyle(LineStyle),
    /// Legend entry of a line
    Label(String),
    /// Show the legend
    Legend(bool),
    /// Image annotation text
    Text(FrameText),
    /// Draw a color bar next to the image
    Colorbar(bool),
    /// Drawing order; higher is drawn later
    ZOrder(i32),
}

impl Param {
    /// Field name used in errors and logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Interval(_) => "interval",
            Self::FigSize(..) => "figsize",
            Self::Nframes(_) => "nframes",
            Self::Colormap(_) => "colormap",
            Self::Normalization(_) => "normalization",
            Self::LineWidth(_) => "linewidth",
            Self::LineColor(_) => "color",
            Self::LineStyle(_) => "linestyle",
            Self::Label(_) => "label",
            Self::Legend(_) => "legend",
            Self::Text(_) => "text",
            Self::Colorbar(_) => "colorbar",
            Self::ZOrder(_) => "zorder",
        }
    }

    pub(crate) fn unsupported(&self, component: &str) -> AnimoError {
        AnimoError::invalid_config(format!(
            "{component} has no '{}' parameter",
            self.name()
        ))
    }
}

/// Apply a figure-level parameter. Returns `false` when `param` is not one.
///
/// `Nframes` is left to the animator, which must check it against its series.
pub(crate) fn apply_figure_param(
    config: &mut FigureConfig,
    figure: &mut Figure,
    param: &Param,
) -> AnimoResult<bool> {
    match *param {
        Param::Interval(interval) => {
            if interval.as_millis() == 0 {
                return Err(AnimoError::invalid_parameter("interval", "must be > 0 ms"));
            }
            config.interval_ms = interval.as_millis() as u64;
            Ok(true)
        }
        Param::FigSize(width, height) => {
            if width == 0 || height == 0 {
                return Err(AnimoError::invalid_parameter(
                    "figsize",
                    format!("must be non-zero, got ({width}, {height})"),
                ));
            }
            config.figsize = (width, height);
            figure.set_size(width, height);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Something the playback driver can step through frame by frame.
pub trait Animate {
    /// Number of frames in one pass of the animation
    fn nframes(&self) -> usize;

    /// Delay between frames
    fn interval(&self) -> Duration;

    /// The figure in its current state
    fn figure(&self) -> &Figure;

    /// Advance to `frame`: create the artists on the first call, mutate them afterwards.
    fn update(&mut self, frame: usize) -> AnimoResult<&Figure>;

    /// Draw `frame` as new artists for a static preview, returning their handles.
    fn render_frame(&mut self, frame: usize) -> AnimoResult<Vec<ArtistId>>;

    /// Change one configuration field.
    fn set_param(&mut self, param: Param) -> AnimoResult<()>;

    /// Record every frame and hand the result to the requested display.
    fn play(&mut self, mode: DisplayMode) -> AnimoResult<Playback> {
        let animation = PlaybackDriver::new(self.nframes(), self.interval()).run(self)?;
        match mode {
            DisplayMode::Raw => Ok(Playback::Raw(animation)),
            DisplayMode::Html(options) => {
                Ok(Playback::Html(HtmlDisplay::new(&animation, options)?))
            }
        }
    }

    /// Render `frame` as a still image at `path`.
    fn view_frame(&mut self, frame: usize, path: &Path) -> AnimoResult<()> {
        self.render_frame(frame)?;
        self.figure().save_png(path)
    }
}

/// Frame count from an explicit override or the first source that knows one.
pub(crate) fn infer_nframes(
    explicit: Option<usize>,
    sources: impl IntoIterator<Item = Option<usize>>,
) -> AnimoResult<usize> {
    explicit
        .or_else(|| sources.into_iter().flatten().next())
        .ok_or_else(|| {
            AnimoError::invalid_parameter("nframes", "no varying data to infer it from")
        })
}

#[cfg(test)]
mod state_tests {
    use super::*;

    #[test]
    fn test_series_state() {
        let unbound: SeriesState<ArtistId> = SeriesState::Unbound;
        assert!(!unbound.is_bound());
        let id = ArtistId { axes: 0, index: 3 };
        assert_eq!(SeriesState::Bound(id).handle(), Some(id));
    }

    #[test]
    fn test_infer_nframes() {
        assert_eq!(infer_nframes(Some(7), [Some(3)]).unwrap(), 7);
        assert_eq!(infer_nframes(None, [None, Some(3), Some(9)]).unwrap(), 3);
        assert!(matches!(
            infer_nframes(None, [None]),
            Err(AnimoError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_figure_params() {
        let mut config = FigureConfig::default();
        let mut figure = Figure::new(&config);
        assert!(apply_figure_param(&mut config, &mut figure, &Param::FigSize(300, 200)).unwrap());
        assert_eq!(figure.size(), (300, 200));
        assert!(
            apply_figure_param(&mut config, &mut figure, &Param::Interval(Duration::from_millis(40)))
                .unwrap()
        );
        assert_eq!(config.interval_ms, 40);
        assert!(apply_figure_param(&mut config, &mut figure, &Param::Interval(Duration::ZERO)).is_err());
        assert!(!apply_figure_param(&mut config, &mut figure, &Param::Legend(true)).unwrap());
    }
}
