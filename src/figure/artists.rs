//! Drawable artifacts held by an [`Axes`](super::Axes).
//!
//! Artists are created once and then mutated in place; geometry that depends
//! on the style (dash pattern, marker shape) is fixed at creation.

use std::sync::Arc;

use ndarray::{Array1, Array2, ArrayView1};

use crate::color::{Color, Colormap};
use crate::config::{LineConfig, LineStyle, Marker};
use crate::normalization::Normalization;
use crate::{AnimoError, AnimoResult};

/// Stable handle to an artist: the axes it lives on and its slot there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtistId {
    /// Index of the axes in its figure
    pub axes: usize,
    /// Slot of the artist on that axes
    pub index: usize,
}

/// A polyline with a fixed style.
#[derive(Debug, Clone, PartialEq)]
pub struct Line2D {
    xdata: Array1<f64>,
    ydata: Array1<f64>,
    /// Stroke and marker color
    pub color: Color,
    /// Stroke width in pixels
    pub linewidth: u32,
    /// Dash pattern
    pub linestyle: LineStyle,
    /// Marker at each point
    pub marker: Marker,
    /// Marker size in pixels
    pub marker_size: u32,
    /// Legend entry
    pub label: Option<String>,
    /// Drawing order
    pub zorder: i32,
}

impl Line2D {
    /// Create a line styled by `config`; `color` is the resolved line color.
    pub fn new(
        x: ArrayView1<'_, f64>,
        y: ArrayView1<'_, f64>,
        config: &LineConfig,
        color: Color,
    ) -> AnimoResult<Self> {
        let mut line = Self {
            xdata: Array1::zeros(0),
            ydata: Array1::zeros(0),
            color,
            linewidth: config.linewidth,
            linestyle: config.linestyle,
            marker: config.marker,
            marker_size: config.marker_size,
            label: config.label.clone(),
            zorder: config.zorder,
        };
        line.set_data(x, y)?;
        Ok(line)
    }

    /// Replace the coordinates, keeping the style.
    pub fn set_data(&mut self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> AnimoResult<()> {
        if x.len() != y.len() {
            return Err(AnimoError::dimension_mismatch(format!(
                "x has {} points but y has {}",
                x.len(),
                y.len()
            )));
        }
        self.xdata = x.to_owned();
        self.ydata = y.to_owned();
        Ok(())
    }

    /// Current x coordinates
    pub fn xdata(&self) -> ArrayView1<'_, f64> {
        self.xdata.view()
    }

    /// Current y coordinates
    pub fn ydata(&self) -> ArrayView1<'_, f64> {
        self.ydata.view()
    }

    /// Finite (x, y) pairs in drawing order
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.xdata
            .iter()
            .zip(self.ydata.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(&x, &y)| (x, y))
            .collect()
    }
}

/// A grid of colored quadrilaterals.
///
/// An `r x c` coordinate grid bounds `(r-1) x (c-1)` cells, so the mesh only
/// ever holds that many values. The grids never change after creation and are
/// shared between clones; only the cell values are copied.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadMesh {
    xgrid: Arc<Array2<f64>>,
    ygrid: Arc<Array2<f64>>,
    values: Array2<f64>,
    /// Colormap applied to normalized values
    pub colormap: Colormap,
    /// Maps cell values onto `[0, 1]`
    pub norm: Normalization,
    /// Drawing order
    pub zorder: i32,
}

impl QuadMesh {
    /// Create a mesh over `xgrid`/`ygrid` (same shape) with cell values `values`.
    pub fn new(
        xgrid: impl Into<Arc<Array2<f64>>>,
        ygrid: impl Into<Arc<Array2<f64>>>,
        values: Array2<f64>,
        colormap: Colormap,
        norm: Normalization,
        zorder: i32,
    ) -> AnimoResult<Self> {
        let (xgrid, ygrid) = (xgrid.into(), ygrid.into());
        if xgrid.dim() != ygrid.dim() {
            return Err(AnimoError::dimension_mismatch(format!(
                "x grid is {:?} but y grid is {:?}",
                xgrid.dim(),
                ygrid.dim()
            )));
        }
        let (rows, cols) = xgrid.dim();
        if rows < 2 || cols < 2 {
            return Err(AnimoError::shape(
                "a grid of at least 2x2",
                format!("{rows}x{cols}"),
            ));
        }
        if values.dim() != (rows - 1, cols - 1) {
            return Err(AnimoError::dimension_mismatch(format!(
                "{rows}x{cols} grid needs {}x{} cell values, got {:?}",
                rows - 1,
                cols - 1,
                values.dim()
            )));
        }
        Ok(Self {
            xgrid,
            ygrid,
            values,
            colormap,
            norm,
            zorder,
        })
    }

    /// Number of cells along each axis
    pub fn cell_shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Replace the cell values from a flat, row-major slice.
    pub fn set_array(&mut self, values: &[f64]) -> AnimoResult<()> {
        let (rows, cols) = self.values.dim();
        if values.len() != rows * cols {
            return Err(AnimoError::dimension_mismatch(format!(
                "mesh has {} cells, got {} values",
                rows * cols,
                values.len()
            )));
        }
        for (cell, &v) in self.values.iter_mut().zip(values) {
            *cell = v;
        }
        Ok(())
    }

    /// Current cell values
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// x coordinate of every grid corner
    pub fn xgrid(&self) -> &Array2<f64> {
        &self.xgrid
    }

    /// Whether `other` draws on the very same coordinate grid
    pub fn shares_grid(&self, other: &QuadMesh) -> bool {
        Arc::ptr_eq(&self.xgrid, &other.xgrid) && Arc::ptr_eq(&self.ygrid, &other.ygrid)
    }

    /// y coordinate of every grid corner
    pub fn ygrid(&self) -> &Array2<f64> {
        &self.ygrid
    }

    /// Data-space corners and value of every cell
    pub fn cells(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64), f64)> + '_ {
        self.values.indexed_iter().map(|((i, j), &v)| {
            (
                (self.xgrid[[i, j]], self.ygrid[[i, j]]),
                (self.xgrid[[i + 1, j + 1]], self.ygrid[[i + 1, j + 1]]),
                v,
            )
        })
    }

    /// Extent of the coordinate grid as (x_min, x_max, y_min, y_max)
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        let range = |a: &Array2<f64>| {
            a.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        let (x0, x1) = range(&*self.xgrid);
        let (y0, y1) = range(&*self.ygrid);
        (x0, x1, y0, y1)
    }
}

/// Text placed in axes-relative coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TextArtist {
    text: String,
    /// Axes-relative anchor, (0, 0) bottom left
    pub position: (f64, f64),
    /// Font size in pixels
    pub size: u32,
    /// Text color
    pub color: Color,
    /// Drawing order, above meshes and lines by default
    pub zorder: i32,
}

impl TextArtist {
    /// Create text anchored at an axes-relative `position`.
    pub fn new(text: &str, position: (f64, f64), size: u32, color: Color) -> Self {
        Self {
            text: text.to_string(),
            position,
            size,
            color,
            zorder: 3,
        }
    }

    /// The text currently shown
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text, keeping position and style.
    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
        }
    }
}

/// A color scale strip describing one mesh on the same axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colorbar {
    /// The mesh whose normalization and colormap it shows
    pub mesh: ArtistId,
}

/// Any artist an axes can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    /// A polyline
    Line(Line2D),
    /// A color mesh
    Mesh(QuadMesh),
    /// An annotation
    Text(TextArtist),
    /// A color bar, always drawn last
    Colorbar(Colorbar),
}

impl Artist {
    /// Drawing order of the wrapped artist
    pub const fn zorder(&self) -> i32 {
        match self {
            Self::Line(line) => line.zorder,
            Self::Mesh(mesh) => mesh.zorder,
            Self::Text(text) => text.zorder,
            Self::Colorbar(_) => i32::MAX,
        }
    }

    /// Short kind name used in logs and errors
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Line(_) => "line",
            Self::Mesh(_) => "mesh",
            Self::Text(_) => "text",
            Self::Colorbar(_) => "colorbar",
        }
    }
}
