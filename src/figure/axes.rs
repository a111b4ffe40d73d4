//! A single plotting area and the artists drawn on it.

use tracing::debug;

use super::artists::{Artist, ArtistId, Colorbar, Line2D, QuadMesh, TextArtist};
use crate::config::LegendConfig;
use crate::{AnimoError, AnimoResult};

/// Bounds for plot data in 2D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    /// Left edge
    pub x_min: f64,
    /// Right edge
    pub x_max: f64,
    /// Bottom edge
    pub y_min: f64,
    /// Top edge
    pub y_max: f64,
}

impl PlotBounds {
    /// Create bounds from their edges
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Bounds of a point cloud, `None` if it has no finite point
    pub fn of_points(points: &[(f64, f64)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::new(first.0, first.0, first.1, first.1);
        for &(x, y) in rest {
            bounds.expand_to_include(&Self::new(x, x, y, y));
        }
        Some(bounds)
    }

    /// Grow to cover `other` as well
    pub fn expand_to_include(&mut self, other: &PlotBounds) {
        self.x_min = self.x_min.min(other.x_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_min = self.y_min.min(other.y_min);
        self.y_max = self.y_max.max(other.y_max);
    }

    /// Widen each span by `margin_percent` of its length on both sides
    pub fn with_margin(&self, margin_percent: f64) -> Self {
        let x_margin = (self.x_max - self.x_min) * margin_percent;
        let y_margin = (self.y_max - self.y_min) * margin_percent;
        Self {
            x_min: self.x_min - x_margin,
            x_max: self.x_max + x_margin,
            y_min: self.y_min - y_margin,
            y_max: self.y_max + y_margin,
        }
    }

    /// Widen zero-width spans so they can be drawn.
    pub fn non_degenerate(&self) -> Self {
        let widen = |lo: f64, hi: f64| {
            if hi > lo {
                (lo, hi)
            } else {
                (lo - 0.5, hi + 0.5)
            }
        };
        let (x_min, x_max) = widen(self.x_min, self.x_max);
        let (y_min, y_max) = widen(self.y_min, self.y_max);
        Self::new(x_min, x_max, y_min, y_max)
    }
}

/// Margin added around line data when autoscaling.
const LINE_MARGIN: f64 = 0.05;

/// One plotting area: artists, limits, labels and an optional legend.
///
/// Limits autoscale when an artist is added, never when an existing artist's
/// data changes, so an animation keeps a steady frame of reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    index: usize,
    artists: Vec<Artist>,
    data_limits: Option<PlotBounds>,
    has_mesh: bool,
    xlim: Option<(f64, f64)>,
    ylim: Option<(f64, f64)>,
    /// Label below the x axis
    pub xlabel: Option<String>,
    /// Label left of the y axis
    pub ylabel: Option<String>,
    /// Axis label font size in pixels
    pub label_size: u32,
    /// Caption above the plotting area
    pub title: Option<String>,
    /// Legend of the labeled lines, if shown
    pub legend: Option<LegendConfig>,
}

impl Axes {
    pub(crate) const fn new(index: usize) -> Self {
        Self {
            index,
            artists: Vec::new(),
            data_limits: None,
            has_mesh: false,
            xlim: None,
            ylim: None,
            xlabel: None,
            ylabel: None,
            label_size: 15,
            title: None,
            legend: None,
        }
    }

    /// Position of this axes in its figure
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Artists in insertion order
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    /// Number of artists
    pub fn len(&self) -> usize {
        self.artists.len()
    }

    /// Whether nothing has been drawn here
    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    fn push(&mut self, artist: Artist) -> ArtistId {
        let id = ArtistId {
            axes: self.index,
            index: self.artists.len(),
        };
        debug!(kind = artist.kind(), axes = id.axes, index = id.index, "artist created");
        self.artists.push(artist);
        id
    }

    fn autoscale(&mut self, bounds: PlotBounds) {
        match &mut self.data_limits {
            Some(limits) => limits.expand_to_include(&bounds),
            None => self.data_limits = Some(bounds),
        }
    }

    /// Add a line and grow the data limits to fit it.
    pub fn add_line(&mut self, line: Line2D) -> ArtistId {
        if let Some(bounds) = PlotBounds::of_points(&line.points()) {
            self.autoscale(bounds);
        }
        self.push(Artist::Line(line))
    }

    /// Add a mesh; its grid extent becomes part of the data limits.
    pub fn add_mesh(&mut self, mesh: QuadMesh) -> ArtistId {
        let (x_min, x_max, y_min, y_max) = mesh.extent();
        self.autoscale(PlotBounds::new(x_min, x_max, y_min, y_max));
        self.has_mesh = true;
        self.push(Artist::Mesh(mesh))
    }

    /// Add an annotation. Text never changes the limits.
    pub fn add_text(&mut self, text: TextArtist) -> ArtistId {
        self.push(Artist::Text(text))
    }

    /// Attach a color bar to a mesh on this axes.
    pub fn add_colorbar(&mut self, mesh: ArtistId) -> AnimoResult<ArtistId> {
        self.mesh(mesh)?;
        Ok(self.push(Artist::Colorbar(Colorbar { mesh })))
    }

    /// Fix the x range instead of autoscaling
    pub fn set_xlim(&mut self, lo: f64, hi: f64) {
        self.xlim = Some((lo, hi));
    }

    /// Fix the y range instead of autoscaling
    pub fn set_ylim(&mut self, lo: f64, hi: f64) {
        self.ylim = Some((lo, hi));
    }

    /// Limits used for drawing: explicit limits first, then the autoscaled
    /// data limits. Line-only axes get a small margin; meshes fit tightly.
    pub fn view_limits(&self) -> PlotBounds {
        let data = self
            .data_limits
            .map(|limits| {
                if self.has_mesh {
                    limits
                } else {
                    limits.with_margin(LINE_MARGIN)
                }
            })
            .unwrap_or(PlotBounds::new(0.0, 1.0, 0.0, 1.0));
        let (x_min, x_max) = self.xlim.unwrap_or((data.x_min, data.x_max));
        let (y_min, y_max) = self.ylim.unwrap_or((data.y_min, data.y_max));
        PlotBounds::new(x_min, x_max, y_min, y_max).non_degenerate()
    }

    /// Artist handles sorted by z-order; ties keep insertion order.
    pub fn draw_order(&self) -> Vec<ArtistId> {
        let mut order: Vec<usize> = (0..self.artists.len()).collect();
        order.sort_by_key(|&i| self.artists[i].zorder());
        order
            .into_iter()
            .map(|index| ArtistId {
                axes: self.index,
                index,
            })
            .collect()
    }

    /// The artist behind `id`, of any kind
    pub fn artist(&self, id: ArtistId) -> AnimoResult<&Artist> {
        if id.axes != self.index {
            return Err(AnimoError::UnknownArtist(id));
        }
        self.artists.get(id.index).ok_or(AnimoError::UnknownArtist(id))
    }

    fn artist_mut(&mut self, id: ArtistId) -> AnimoResult<&mut Artist> {
        if id.axes != self.index {
            return Err(AnimoError::UnknownArtist(id));
        }
        self.artists
            .get_mut(id.index)
            .ok_or(AnimoError::UnknownArtist(id))
    }

    /// The line behind `id`
    pub fn line(&self, id: ArtistId) -> AnimoResult<&Line2D> {
        match self.artist(id)? {
            Artist::Line(line) => Ok(line),
            _ => Err(AnimoError::UnknownArtist(id)),
        }
    }

    /// Mutable access to the line behind `id`
    pub fn line_mut(&mut self, id: ArtistId) -> AnimoResult<&mut Line2D> {
        match self.artist_mut(id)? {
            Artist::Line(line) => Ok(line),
            _ => Err(AnimoError::UnknownArtist(id)),
        }
    }

    /// The mesh behind `id`
    pub fn mesh(&self, id: ArtistId) -> AnimoResult<&QuadMesh> {
        match self.artist(id)? {
            Artist::Mesh(mesh) => Ok(mesh),
            _ => Err(AnimoError::UnknownArtist(id)),
        }
    }

    /// Mutable access to the mesh behind `id`
    pub fn mesh_mut(&mut self, id: ArtistId) -> AnimoResult<&mut QuadMesh> {
        match self.artist_mut(id)? {
            Artist::Mesh(mesh) => Ok(mesh),
            _ => Err(AnimoError::UnknownArtist(id)),
        }
    }

    /// The annotation behind `id`
    pub fn text(&self, id: ArtistId) -> AnimoResult<&TextArtist> {
        match self.artist(id)? {
            Artist::Text(text) => Ok(text),
            _ => Err(AnimoError::UnknownArtist(id)),
        }
    }

    /// Mutable access to the annotation behind `id`
    pub fn text_mut(&mut self, id: ArtistId) -> AnimoResult<&mut TextArtist> {
        match self.artist_mut(id)? {
            Artist::Text(text) => Ok(text),
            _ => Err(AnimoError::UnknownArtist(id)),
        }
    }

    /// The first color bar on this axes, if any
    pub fn colorbar(&self) -> Option<&Colorbar> {
        self.artists.iter().find_map(|artist| match artist {
            Artist::Colorbar(colorbar) => Some(colorbar),
            _ => None,
        })
    }
}
