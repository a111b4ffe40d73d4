//! Retained drawing surface: a figure holding a grid of axes, each holding artists.
//!
//! Animators create artists once and keep their [`ArtistId`] handles; later
//! frames mutate those artists in place. Drawing is delegated to plotters (see
//! the `render` submodule), so a figure can be rendered to any plotters backend
//! at any point, and cloned to snapshot a frame.
//!
//! ```rust
//! use animo::figure::{Figure, Line2D};
//! use animo::{Color, FigureConfig, LineConfig};
//! use ndarray::array;
//!
//! let mut figure = Figure::new(&FigureConfig::default());
//! let line = Line2D::new(
//!     array![0.0, 1.0].view(),
//!     array![0.0, 1.0].view(),
//!     &LineConfig::default(),
//!     Color::cycle(0),
//! )?;
//! let id = figure.axes_mut(0)?.add_line(line);
//! assert_eq!(figure.line(id)?.xdata().len(), 2);
//! # Ok::<(), animo::AnimoError>(())
//! ```

pub mod artists;
pub mod axes;
pub mod render;

pub use artists::{Artist, ArtistId, Colorbar, Line2D, QuadMesh, TextArtist};
pub use axes::{Axes, PlotBounds};
pub use render::dash_segments;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::config::FigureConfig;
use crate::{AnimoError, AnimoResult};

/// Arrangement of axes in a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Rows of axes
    pub rows: usize,
    /// Axes per row
    pub cols: usize,
}

impl GridLayout {
    /// A `rows x cols` grid; both must be at least 1
    pub fn new(rows: usize, cols: usize) -> AnimoResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(AnimoError::invalid_parameter(
                "layout",
                format!("grid must be at least 1x1, got {rows}x{cols}"),
            ));
        }
        Ok(Self { rows, cols })
    }

    /// One row holding `n` axes
    pub fn row(n: usize) -> Self {
        Self {
            rows: 1,
            cols: n.max(1),
        }
    }

    /// Number of axes the grid holds
    pub const fn cells(&self) -> usize {
        self.rows * self.cols
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self { rows: 1, cols: 1 }
    }
}

/// A drawing surface of fixed pixel size holding one or more axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    size: (u32, u32),
    background: Color,
    title: Option<String>,
    layout: GridLayout,
    axes: Vec<Axes>,
}

impl Figure {
    /// A figure with a single axes
    pub fn new(config: &FigureConfig) -> Self {
        Self::with_layout(config, GridLayout::default())
    }

    /// A figure with one axes per grid cell, numbered row by row
    pub fn with_layout(config: &FigureConfig, layout: GridLayout) -> Self {
        Self {
            size: config.figsize,
            background: config.background,
            title: config.title.clone(),
            layout,
            axes: (0..layout.cells()).map(Axes::new).collect(),
        }
    }

    /// A white, untitled `rows x cols` grid of axes at `size` pixels
    pub fn subplots(rows: usize, cols: usize, size: (u32, u32)) -> AnimoResult<Self> {
        let config = FigureConfig::default().with_figsize(size.0, size.1);
        Ok(Self::with_layout(&config, GridLayout::new(rows, cols)?))
    }

    /// Size in pixels (width, height)
    pub const fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Resize; takes effect on the next render
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    /// Background color
    pub const fn background(&self) -> Color {
        self.background
    }

    /// Figure title, drawn above the axes
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Arrangement of the axes
    pub const fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Every axes, row by row
    pub fn all_axes(&self) -> &[Axes] {
        &self.axes
    }

    /// Axes number `index`, counted row by row
    pub fn axes(&self, index: usize) -> AnimoResult<&Axes> {
        let count = self.axes.len();
        self.axes.get(index).ok_or_else(|| {
            AnimoError::invalid_parameter("axes", format!("index {index} of {count} axes"))
        })
    }

    /// Mutable access to axes number `index`
    pub fn axes_mut(&mut self, index: usize) -> AnimoResult<&mut Axes> {
        let count = self.axes.len();
        self.axes.get_mut(index).ok_or_else(|| {
            AnimoError::invalid_parameter("axes", format!("index {index} of {count} axes"))
        })
    }

    /// Total number of artists across all axes
    pub fn artist_count(&self) -> usize {
        self.axes.iter().map(Axes::len).sum()
    }

    /// The line behind `id`, on whichever axes holds it
    pub fn line(&self, id: ArtistId) -> AnimoResult<&Line2D> {
        self.axes(id.axes)?.line(id)
    }

    /// Mutable access to the line behind `id`
    pub fn line_mut(&mut self, id: ArtistId) -> AnimoResult<&mut Line2D> {
        self.axes_mut(id.axes)?.line_mut(id)
    }

    /// The mesh behind `id`
    pub fn mesh(&self, id: ArtistId) -> AnimoResult<&QuadMesh> {
        self.axes(id.axes)?.mesh(id)
    }

    /// Mutable access to the mesh behind `id`
    pub fn mesh_mut(&mut self, id: ArtistId) -> AnimoResult<&mut QuadMesh> {
        self.axes_mut(id.axes)?.mesh_mut(id)
    }

    /// The annotation behind `id`
    pub fn text(&self, id: ArtistId) -> AnimoResult<&TextArtist> {
        self.axes(id.axes)?.text(id)
    }

    /// Mutable access to the annotation behind `id`
    pub fn text_mut(&mut self, id: ArtistId) -> AnimoResult<&mut TextArtist> {
        self.axes_mut(id.axes)?.text_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subplot_numbering() {
        let figure = Figure::with_layout(&FigureConfig::default(), GridLayout::new(2, 3).unwrap());
        assert_eq!(figure.all_axes().len(), 6);
        assert_eq!(figure.axes(4).unwrap().index(), 4);
        assert!(figure.axes(6).is_err());
    }

    #[test]
    fn test_layout_validation() {
        assert!(GridLayout::new(0, 2).is_err());
        assert_eq!(GridLayout::row(0), GridLayout { rows: 1, cols: 1 });
        assert_eq!(GridLayout::row(3).cells(), 3);
        assert!(Figure::subplots(0, 1, (100, 100)).is_err());
        let figure = Figure::subplots(2, 1, (100, 200)).unwrap();
        assert_eq!((figure.size(), figure.all_axes().len()), ((100, 200), 2));
    }

    #[test]
    fn test_figure_takes_config() {
        let config = FigureConfig::default().with_figsize(320, 240).with_title("demo");
        let figure = Figure::new(&config);
        assert_eq!(figure.size(), (320, 240));
        assert_eq!(figure.title(), Some("demo"));
        assert_eq!(figure.artist_count(), 0);
    }
}
