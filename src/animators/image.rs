//! Animated 2D images drawn as color meshes.
//!
//! The coordinate grid is built once from the row and column coordinates.
//! Each frame is flipped up-down before display, and because an `r x c` grid
//! bounds `(r-1) x (c-1)` cells the last row and column of every frame are
//! dropped, both when the mesh is created and when it is updated.

use std::sync::Arc;
use std::time::Duration;

use ndarray::{Array1, Array2, ArrayD, s};
use num_traits::ToPrimitive;
use tracing::{debug, trace, warn};

use super::{Animate, Param, SeriesState, apply_figure_param};
use crate::config::{FigureConfig, FrameText, ImageConfig};
use crate::error::check_frame;
use crate::figure::{ArtistId, Figure, QuadMesh, TextArtist};
use crate::frames::ImageStack;
use crate::normalization::{Normalization, resolve_with_limits};
use crate::{AnimoError, AnimoResult};

/// Artists drawn for one image series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHandles {
    /// The color mesh
    pub mesh: ArtistId,
    /// The per-frame annotation
    pub text: ArtistId,
    /// The color bar, when one was asked for
    pub colorbar: Option<ArtistId>,
}

/// `(X, Y)` with `X[i, j] = a[j]` and `Y[i, j] = b[i]`
fn meshgrid(a: &Array1<f64>, b: &Array1<f64>) -> (Array2<f64>, Array2<f64>) {
    let shape = (b.len(), a.len());
    (
        Array2::from_shape_fn(shape, |(_, j)| a[j]),
        Array2::from_shape_fn(shape, |(i, _)| b[i]),
    )
}

/// One animated image on one axes of a figure.
#[derive(Debug, Clone)]
pub struct ImageSeries {
    stack: ImageStack,
    xgrid: Arc<Array2<f64>>,
    ygrid: Arc<Array2<f64>>,
    nframes: usize,
    config: ImageConfig,
    norm: Option<Normalization>,
    axes: usize,
    state: SeriesState<ImageHandles>,
}

impl ImageSeries {
    /// Create an unbound series over `stack` with index coordinates.
    pub fn new(stack: ImageStack, config: ImageConfig) -> AnimoResult<Self> {
        Self::with_coords(stack, None, None, None, config)
    }

    /// Create an unbound series.
    ///
    /// `x` gives one coordinate per row and `y` one per column; both default
    /// to `0..n`. `nframes` defaults to the stack's frame count.
    pub fn with_coords(
        stack: ImageStack,
        x: Option<Array1<f64>>,
        y: Option<Array1<f64>>,
        nframes: Option<usize>,
        config: ImageConfig,
    ) -> AnimoResult<Self> {
        let (rows, cols) = stack.frame_shape();
        let x = x.unwrap_or_else(|| Array1::range(0.0, rows as f64, 1.0));
        let y = y.unwrap_or_else(|| Array1::range(0.0, cols as f64, 1.0));
        if x.len() != rows || y.len() != cols {
            return Err(AnimoError::dimension_mismatch(format!(
                "{rows}x{cols} frames need {rows} x and {cols} y coordinates, got {} and {}",
                x.len(),
                y.len()
            )));
        }
        let (xgrid, ygrid) = meshgrid(&y, &x);

        let nframes = nframes.unwrap_or(stack.nframes());
        let series = Self {
            stack,
            xgrid: Arc::new(xgrid),
            ygrid: Arc::new(ygrid),
            nframes,
            config,
            norm: None,
            axes: 0,
            state: SeriesState::Unbound,
        };
        series.check_nframes(nframes)?;
        series.check_text(series.config.text.as_ref(), nframes)?;
        Ok(series)
    }

    pub(crate) const fn on_axes(mut self, axes: usize) -> Self {
        self.axes = axes;
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

    /// Whether the mesh exists yet, and its handles
    pub const fn state(&self) -> SeriesState<ImageHandles> {
        self.state
    }

    /// Current display options
    pub const fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// The frames being shown
    pub const fn stack(&self) -> &ImageStack {
        &self.stack
    }

    pub(crate) fn check_nframes(&self, nframes: usize) -> AnimoResult<()> {
        let available = self.stack.nframes();
        if nframes > available {
            return Err(AnimoError::dimension_mismatch(format!(
                "image stack holds {available} frames but {nframes} were requested"
            )));
        }
        Ok(())
    }

    fn check_text(&self, text: Option<&FrameText>, nframes: usize) -> AnimoResult<()> {
        match text.and_then(FrameText::nframes) {
            Some(available) if available < nframes => {
                Err(AnimoError::dimension_mismatch(format!(
                    "{available} annotation strings for {nframes} frames"
                )))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn set_nframes(&mut self, nframes: usize) -> AnimoResult<()> {
        self.check_nframes(nframes)?;
        self.check_text(self.config.text.as_ref(), nframes)?;
        self.nframes = nframes;
        Ok(())
    }

    fn frame_text(&self, frame: usize) -> &str {
        self.config
            .text
            .as_ref()
            .map_or("", |text| text.text(frame))
    }

    /// Cell values shown for `frame`: flipped up-down, last row and column dropped.
    fn cell_values(&self, frame: usize) -> AnimoResult<Array2<f64>> {
        check_frame(frame, self.nframes)?;
        let flipped = self.stack.frame(frame)?.slice_move(s![..;-1, ..]);
        let cells = flipped.slice(s![..-1, ..-1]);
        let shape = cells.dim();
        Array2::from_shape_vec(shape, cells.iter().copied().collect())
            .map_err(|e| AnimoError::shape(format!("{shape:?} cells"), e.to_string()))
    }

    /// The normalization in use, resolved from frame 0 the first time it is needed.
    fn normalization(&mut self) -> AnimoResult<Normalization> {
        if let Some(norm) = self.norm {
            return Ok(norm);
        }
        let first = self.cell_values(0)?;
        let norm = resolve_with_limits(
            first.view(),
            &self.config.norm,
            self.config.vmin,
            self.config.vmax,
        )?;
        debug!(?norm, "image normalization resolved");
        self.norm = Some(norm);
        Ok(norm)
    }

    /// Draw `frame` as a new mesh (plus annotation and color bar) and bind
    /// the series to it.
    pub fn draw(&mut self, figure: &mut Figure, frame: usize) -> AnimoResult<ImageHandles> {
        let values = self.cell_values(frame)?;
        let norm = self.normalization()?;
        let mesh = QuadMesh::new(
            Arc::clone(&self.xgrid),
            Arc::clone(&self.ygrid),
            values,
            self.config.colormap.clone(),
            norm,
            self.config.zorder,
        )?;
        let annotation = &self.config.annotation;
        let text = TextArtist::new(
            self.frame_text(frame),
            annotation.position,
            annotation.size,
            annotation.color,
        );

        let axes = figure.axes_mut(self.axes)?;
        axes.xlabel.clone_from(&self.config.xlabel);
        axes.ylabel.clone_from(&self.config.ylabel);
        axes.label_size = self.config.label_size;
        let mesh = axes.add_mesh(mesh);
        let text = axes.add_text(text);
        let colorbar = if self.config.colorbar {
            Some(axes.add_colorbar(mesh)?)
        } else {
            None
        };

        let handles = ImageHandles {
            mesh,
            text,
            colorbar,
        };
        self.state = SeriesState::Bound(handles);
        Ok(handles)
    }

    /// Show `frame`: create the mesh from frame 0 on the first call, replace
    /// its cell values and the annotation afterwards.
    pub fn update(&mut self, figure: &mut Figure, frame: usize) -> AnimoResult<()> {
        match self.state {
            SeriesState::Unbound => {
                check_frame(frame, self.nframes)?;
                let handles = self.draw(figure, 0)?;
                debug!(
                    axes = handles.mesh.axes,
                    index = handles.mesh.index,
                    "image series bound"
                );
            }
            SeriesState::Bound(handles) => {
                let values = self.cell_values(frame)?;
                figure
                    .mesh_mut(handles.mesh)?
                    .set_array(&values.into_raw_vec_and_offset().0)?;
                figure
                    .text_mut(handles.text)?
                    .set_text(self.frame_text(frame));
                trace!(frame, "image cells updated");
            }
        }
        Ok(())
    }

    pub(crate) fn set_param(&mut self, param: &Param) -> AnimoResult<()> {
        match param {
            Param::Colormap(colormap) => self.config.colormap = colormap.clone(),
            Param::Normalization(norm) => {
                self.config.norm = *norm;
                self.norm = None;
            }
            Param::Text(text) => {
                self.check_text(Some(text), self.nframes)?;
                self.config.text = Some(text.clone());
                return Ok(());
            }
            Param::Colorbar(colorbar) => self.config.colorbar = *colorbar,
            Param::ZOrder(zorder) => self.config.zorder = *zorder,
            other => return Err(other.unsupported("an image series")),
        }
        if self.state.is_bound() {
            warn!(
                parameter = param.name(),
                "image already drawn; style applies to meshes created from now on"
            );
        }
        Ok(())
    }
}

/// A figure with a single animated image.
#[derive(Debug, Clone)]
pub struct ImageAnimator {
    figure: Figure,
    config: FigureConfig,
    series: ImageSeries,
}

impl ImageAnimator {
    /// Animate `stack` with default styles on a 500x600 figure.
    pub fn new(stack: ImageStack) -> AnimoResult<Self> {
        Self::with_config(stack, ImageConfig::default(), FigureConfig::for_images())
    }

    /// Animate a 3D array whose frames run along `axis`.
    pub fn from_array<T: ToPrimitive>(data: ArrayD<T>, axis: usize) -> AnimoResult<Self> {
        Self::new(ImageStack::from_dyn(data, axis)?)
    }

    /// Animate `stack` with explicit image and figure options.
    pub fn with_config(
        stack: ImageStack,
        image: ImageConfig,
        config: FigureConfig,
    ) -> AnimoResult<Self> {
        Self::with_coords(stack, None, None, image, config)
    }

    /// Like [`with_config`](Self::with_config) with explicit row (`x`) and
    /// column (`y`) coordinates.
    pub fn with_coords(
        stack: ImageStack,
        x: Option<Array1<f64>>,
        y: Option<Array1<f64>>,
        image: ImageConfig,
        config: FigureConfig,
    ) -> AnimoResult<Self> {
        config.validate()?;
        let series = ImageSeries::with_coords(stack, x, y, config.nframes, image)?;
        Ok(Self {
            figure: Figure::new(&config),
            config,
            series,
        })
    }

    /// Animate into axes `axes` of an existing figure.
    ///
    /// Artists already on `figure` are kept; the figure's own size wins over
    /// `config.figsize`.
    pub fn on_figure(
        figure: Figure,
        axes: usize,
        stack: ImageStack,
        image: ImageConfig,
        mut config: FigureConfig,
    ) -> AnimoResult<Self> {
        figure.axes(axes)?;
        config.figsize = figure.size();
        config.validate()?;
        let series = ImageSeries::with_coords(stack, None, None, config.nframes, image)?.on_axes(axes);
        debug!(axes, artists = figure.artist_count(), "image animator on existing figure");
        Ok(Self {
            figure,
            config,
            series,
        })
    }

    /// The animated image
    pub const fn series(&self) -> &ImageSeries {
        &self.series
    }

    /// Give the figure back, with everything drawn so far
    pub fn into_figure(self) -> Figure {
        self.figure
    }
}

impl Animate for ImageAnimator {
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
        let handles = self.series.draw(&mut self.figure, frame)?;
        Ok([Some(handles.mesh), Some(handles.text), handles.colorbar]
            .into_iter()
            .flatten()
            .collect())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::NormSpec;
    use ndarray::{Array3, array};

    fn stack(nframes: usize) -> ImageStack {
        let data = Array3::from_shape_fn((nframes, 3, 3), |(k, i, j)| (k * 9 + i * 3 + j) as f64);
        ImageStack::new(data, 0).unwrap()
    }

    #[test]
    fn test_meshgrid_orientation() {
        let (xgrid, ygrid) = meshgrid(&array![0.0, 1.0, 2.0], &array![10.0, 20.0]);
        assert_eq!(xgrid, array![[0.0, 1.0, 2.0], [0.0, 1.0, 2.0]]);
        assert_eq!(ygrid, array![[10.0, 10.0, 10.0], [20.0, 20.0, 20.0]]);
    }

    #[test]
    fn test_cells_are_flipped_and_cropped() {
        let series = ImageSeries::new(stack(1), ImageConfig::default()).unwrap();
        assert_eq!(series.cell_values(0).unwrap(), array![[6.0, 7.0], [3.0, 4.0]]);
    }

    #[test]
    fn test_update_replaces_cells_and_text() {
        let config = ImageConfig::default().with_text(FrameText::PerFrame(vec![
            "t = 0".to_string(),
            "t = 1".to_string(),
        ]));
        let mut animator =
            ImageAnimator::with_config(stack(2), config, FigureConfig::for_images()).unwrap();
        animator.update(0).unwrap();
        animator.update(1).unwrap();

        let handles = animator.series().state().handle().unwrap();
        let mesh = animator.figure().mesh(handles.mesh).unwrap();
        assert_eq!(mesh.values(), &array![[15.0, 16.0], [12.0, 13.0]]);
        let text = animator.figure().text(handles.text).unwrap();
        assert_eq!(text.text(), "t = 1");
        assert_eq!(animator.figure().artist_count(), 2);
    }

    #[test]
    fn test_normalization_fixed_at_first_frame() {
        let mut animator = ImageAnimator::new(stack(3)).unwrap();
        animator.update(0).unwrap();
        animator.update(2).unwrap();
        let handles = animator.series().state().handle().unwrap();
        let mesh = animator.figure().mesh(handles.mesh).unwrap();
        assert_eq!(mesh.norm, Normalization::Linear { vmin: 3.0, vmax: 7.0 });
    }

    #[test]
    fn test_explicit_limits_win() {
        let config = ImageConfig::default().with_limits(Some(-1.0), Some(1.0));
        let mut animator =
            ImageAnimator::with_config(stack(1), config, FigureConfig::for_images()).unwrap();
        animator.update(0).unwrap();
        let mesh_id = animator.series().state().handle().unwrap().mesh;
        assert_eq!(
            animator.figure().mesh(mesh_id).unwrap().norm,
            Normalization::Linear { vmin: -1.0, vmax: 1.0 }
        );
    }

    #[test]
    fn test_coordinates_must_match_frames() {
        let result = ImageSeries::with_coords(
            stack(1),
            Some(array![0.0, 1.0]),
            None,
            None,
            ImageConfig::default(),
        );
        assert!(matches!(result, Err(AnimoError::DimensionMismatch(_))));
    }

    #[test]
    fn test_short_annotation_list() {
        let config = ImageConfig::default().with_text(FrameText::PerFrame(vec!["a".to_string()]));
        assert!(matches!(
            ImageSeries::new(stack(2), config),
            Err(AnimoError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_colorbar_and_labels() {
        let config = ImageConfig::default()
            .with_colorbar(true)
            .with_labels("x (mm)", "y (mm)");
        let mut animator =
            ImageAnimator::with_config(stack(1), config, FigureConfig::for_images()).unwrap();
        let ids = animator.render_frame(0).unwrap();
        assert_eq!(ids.len(), 3);
        let axes = animator.figure().axes(0).unwrap();
        assert_eq!(axes.xlabel.as_deref(), Some("x (mm)"));
        assert_eq!(axes.colorbar().map(|c| c.mesh), Some(ids[0]));
    }

    #[test]
    fn test_on_figure_draws_into_chosen_axes() {
        let mut figure = Figure::subplots(2, 1, (300, 500)).unwrap();
        let title = figure
            .axes_mut(1)
            .unwrap()
            .add_text(TextArtist::new("kept", (0.5, 0.5), 12, crate::color::Color::BLACK));

        let mut animator = ImageAnimator::on_figure(
            figure,
            1,
            stack(2),
            ImageConfig::default(),
            FigureConfig::for_images(),
        )
        .unwrap();
        animator.update(0).unwrap();
        animator.update(1).unwrap();

        let handles = animator.series().state().handle().unwrap();
        assert_eq!(handles.mesh.axes, 1);
        let figure = animator.figure();
        assert_eq!(figure.mesh(handles.mesh).unwrap().values(), &array![[15.0, 16.0], [12.0, 13.0]]);
        assert_eq!(figure.text(title).unwrap().text(), "kept");
        assert!(figure.axes(0).unwrap().is_empty());
        assert_eq!(figure.size(), (300, 500));

        let result = ImageAnimator::on_figure(
            Figure::new(&FigureConfig::default()),
            1,
            stack(2),
            ImageConfig::default(),
            FigureConfig::default(),
        );
        assert!(matches!(result, Err(AnimoError::InvalidParameter { .. })));
    }

    #[test]
    fn test_set_param() {
        let mut animator = ImageAnimator::new(stack(2)).unwrap();
        animator
            .set_param(Param::Normalization(NormSpec::midpoint(4.0, 0.0, 8.0)))
            .unwrap();
        assert!(matches!(
            animator.set_param(Param::Label("x".to_string())),
            Err(AnimoError::InvalidConfig(_))
        ));
        assert!(matches!(
            animator.set_param(Param::Nframes(3)),
            Err(AnimoError::DimensionMismatch(_))
        ));
        animator.update(0).unwrap();
        let mesh_id = animator.series().state().handle().unwrap().mesh;
        assert!(matches!(
            animator.figure().mesh(mesh_id).unwrap().norm,
            Normalization::Midpoint { midpoint, .. } if midpoint == 4.0
        ));
    }
}
