//! Animated 1D lines.

use std::str::FromStr;
use std::time::Duration;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::{Animate, Param, SeriesState, apply_figure_param, infer_nframes};
use crate::color::Color;
use crate::config::{FigureConfig, LineConfig};
use crate::error::check_frame;
use crate::figure::{ArtistId, Figure, Line2D};
use crate::frames::Frames;
use crate::{AnimoError, AnimoResult};

/// Which coordinate stays at its frame-0 values while the other varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedAxis {
    /// x is read from frame 0, y varies
    #[default]
    X,
    /// y is read from frame 0, x varies
    Y,
    /// Both coordinates vary
    #[serde(rename = "none")]
    Neither,
}

impl FromStr for FixedAxis {
    type Err = AnimoError;

    fn from_str(s: &str) -> AnimoResult<Self> {
        match s {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "none" => Ok(Self::Neither),
            other => Err(AnimoError::invalid_config(format!(
                "fixed axis must be 'x', 'y' or 'none', got '{other}'"
            ))),
        }
    }
}

impl FixedAxis {
    /// Frame to read (x, y) from when showing `frame`
    const fn source_frames(self, frame: usize) -> (usize, usize) {
        match self {
            Self::X => (0, frame),
            Self::Y => (frame, 0),
            Self::Neither => (frame, frame),
        }
    }
}

/// One animated line on one axes of a figure.
#[derive(Debug, Clone)]
pub struct LineSeries {
    x: Frames,
    y: Frames,
    fixed: FixedAxis,
    nframes: usize,
    config: LineConfig,
    color: Color,
    axes: usize,
    state: SeriesState<ArtistId>,
}

impl LineSeries {
    /// Create an unbound series.
    ///
    /// `nframes` defaults to the frame count of the first source that varies
    /// under `fixed`.
    pub fn new(
        x: impl Into<Frames>,
        y: impl Into<Frames>,
        fixed: FixedAxis,
        nframes: Option<usize>,
        config: LineConfig,
    ) -> AnimoResult<Self> {
        let (x, y) = (x.into(), y.into());
        if x.npoints() != y.npoints() {
            return Err(AnimoError::dimension_mismatch(format!(
                "x frames hold {} points but y frames hold {}",
                x.npoints(),
                y.npoints()
            )));
        }

        let varying = match fixed {
            FixedAxis::X => vec![y.nframes()],
            FixedAxis::Y => vec![x.nframes()],
            FixedAxis::Neither => vec![x.nframes(), y.nframes()],
        };
        let nframes = infer_nframes(nframes, varying)?;

        let series = Self {
            color: config.color.unwrap_or(Color::cycle(0)),
            x,
            y,
            fixed,
            nframes,
            config,
            axes: 0,
            state: SeriesState::Unbound,
        };
        series.check_nframes(nframes)?;
        Ok(series)
    }

    /// Place the series on another axes of the figure.
    pub(crate) const fn on_axes(mut self, axes: usize) -> Self {
        self.axes = axes;
        self
    }

    /// Use `color` unless the config names one.
    pub(crate) const fn with_default_color(mut self, color: Color) -> Self {
        if self.config.color.is_none() {
            self.color = color;
        }
        self
    }

    pub(crate) fn with_zorder(mut self, zorder: i32) -> Self {
        self.config.zorder = zorder;
        self
    }

    /// Number of frames animated
    pub const fn nframes(&self) -> usize {
        self.nframes
    }

    /// Which coordinate is held at frame 0
    pub const fn fixed(&self) -> FixedAxis {
        self.fixed
    }

    /// Whether the line exists yet, and its handle
    pub const fn state(&self) -> SeriesState<ArtistId> {
        self.state
    }

    /// Current line style
    pub const fn config(&self) -> &LineConfig {
        &self.config
    }

    /// Resolved line color
    pub const fn color(&self) -> Color {
        self.color
    }

    pub(crate) fn check_nframes(&self, nframes: usize) -> AnimoResult<()> {
        // A fixed side only needs frame 0.
        let (x_frames, y_frames) = self.fixed.source_frames(nframes);
        self.x.ensure_covers(x_frames.max(1), "x")?;
        self.y.ensure_covers(y_frames.max(1), "y")
    }

    pub(crate) fn set_nframes(&mut self, nframes: usize) -> AnimoResult<()> {
        self.check_nframes(nframes)?;
        self.nframes = nframes;
        Ok(())
    }

    fn coords(&self, frame: usize) -> AnimoResult<(ArrayView1<'_, f64>, ArrayView1<'_, f64>)> {
        check_frame(frame, self.nframes)?;
        let (xi, yi) = self.fixed.source_frames(frame);
        Ok((self.x.frame(xi)?, self.y.frame(yi)?))
    }

    /// Draw `frame` as a new styled line and bind the series to it.
    pub fn draw(&mut self, figure: &mut Figure, frame: usize) -> AnimoResult<ArtistId> {
        let (x, y) = self.coords(frame)?;
        let line = Line2D::new(x, y, &self.config, self.color)?;
        let axes = figure.axes_mut(self.axes)?;
        if self.config.legend.show {
            axes.legend = Some(self.config.legend.clone());
        }
        let id = axes.add_line(line);
        self.state = SeriesState::Bound(id);
        Ok(id)
    }

    /// Show `frame`: create the line from frame 0 on the first call, move its data afterwards.
    pub fn update(&mut self, figure: &mut Figure, frame: usize) -> AnimoResult<()> {
        match self.state {
            SeriesState::Unbound => {
                check_frame(frame, self.nframes)?;
                let id = self.draw(figure, 0)?;
                debug!(axes = id.axes, index = id.index, "line series bound");
            }
            SeriesState::Bound(id) => {
                let (x, y) = self.coords(frame)?;
                figure.line_mut(id)?.set_data(x, y)?;
                trace!(frame, "line data updated");
            }
        }
        Ok(())
    }

    pub(crate) fn set_param(&mut self, param: &Param) -> AnimoResult<()> {
        match param {
            Param::LineWidth(width) => self.config.linewidth = *width,
            Param::LineColor(color) => {
                self.config.color = Some(*color);
                self.color = *color;
            }
            Param::LineStyle(style) => self.config.linestyle = *style,
            Param::Label(label) => self.config.label = Some(label.clone()),
            Param::Legend(show) => self.config.legend.show = *show,
            Param::ZOrder(zorder) => self.config.zorder = *zorder,
            other => return Err(other.unsupported("a line series")),
        }
        if self.state.is_bound() {
            warn!(
                parameter = param.name(),
                "line already drawn; style applies to lines created from now on"
            );
        }
        Ok(())
    }
}

/// A figure with a single animated line.
#[derive(Debug, Clone)]
pub struct LineAnimator {
    figure: Figure,
    config: FigureConfig,
    series: LineSeries,
}

impl LineAnimator {
    /// Animate `y` against `x` with default styles.
    pub fn new(x: impl Into<Frames>, y: impl Into<Frames>, fixed: FixedAxis) -> AnimoResult<Self> {
        Self::with_config(x, y, fixed, LineConfig::default(), FigureConfig::default())
    }

    /// Animate `y` against `x` with explicit line and figure options.
    pub fn with_config(
        x: impl Into<Frames>,
        y: impl Into<Frames>,
        fixed: FixedAxis,
        line: LineConfig,
        config: FigureConfig,
    ) -> AnimoResult<Self> {
        config.validate()?;
        let series = LineSeries::new(x, y, fixed, config.nframes, line)?;
        Ok(Self {
            figure: Figure::new(&config),
            config,
            series,
        })
    }

    /// Animate into axes `axes` of an existing figure.
    ///
    /// Whatever `figure` already holds is kept and drawn underneath the
    /// animated line; the figure's own size wins over `config.figsize`.
    pub fn on_figure(
        figure: Figure,
        axes: usize,
        x: impl Into<Frames>,
        y: impl Into<Frames>,
        fixed: FixedAxis,
        line: LineConfig,
        mut config: FigureConfig,
    ) -> AnimoResult<Self> {
        figure.axes(axes)?;
        config.figsize = figure.size();
        config.validate()?;
        let series = LineSeries::new(x, y, fixed, config.nframes, line)?.on_axes(axes);
        debug!(axes, artists = figure.artist_count(), "line animator on existing figure");
        Ok(Self {
            figure,
            config,
            series,
        })
    }

    /// The animated line
    pub const fn series(&self) -> &LineSeries {
        &self.series
    }

    /// Give the figure back, with everything drawn so far
    pub fn into_figure(self) -> Figure {
        self.figure
    }
}

impl Animate for LineAnimator {
    fn nframes(&self) -> usize {
        self.series.nframes()
    }

    fn interval(&self) -> Duration {
        self.config.interval()
    }

    fn figure(&self) -> &Figure {
        &self.figure
    }

    fn update(&mut self, frame: usize) -> AnimoResult<&Figure> {
        self.series.update(&mut self.figure, frame)?;
        Ok(&self.figure)
    }

    fn render_frame(&mut self, frame: usize) -> AnimoResult<Vec<ArtistId>> {
        Ok(vec![self.series.draw(&mut self.figure, frame)?])
    }

    fn set_param(&mut self, param: Param) -> AnimoResult<()> {
        if apply_figure_param(&mut self.config, &mut self.figure, &param)? {
            return Ok(());
        }
        match param {
            Param::Nframes(nframes) => {
                self.series.set_nframes(nframes)?;
                self.config.nframes = Some(nframes);
                Ok(())
            }
            other => self.series.set_param(&other),
        }
    }
}
