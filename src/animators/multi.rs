//! Animators driving several series of the same kind at once.

use std::time::Duration;

use super::{Animate, FixedAxis, ImageSeries, LineSeries, Param, apply_figure_param};
use crate::color::Color;
use crate::config::{FigureConfig, ImageConfig, LineConfig, Styles};
use crate::figure::{ArtistId, Figure, GridLayout};
use crate::frames::{Frames, ImageStack};
use crate::{AnimoError, AnimoResult};

/// Several lines sharing one axes.
///
/// Lines without an explicit color take successive entries of the default
/// color cycle, so they stay distinguishable. With the legend on, unlabeled
/// lines are labeled `series {i}`.
#[derive(Debug, Clone)]
pub struct MultiLineAnimator {
    figure: Figure,
    config: FigureConfig,
    series: Vec<LineSeries>,
}

impl MultiLineAnimator {
    /// Animate `ys[i]` against `xs[i]` for every `i`.
    ///
    /// `nframes` comes from the configuration, else from the first pair.
    pub fn new<X, Y>(
        xs: Vec<X>,
        ys: Vec<Y>,
        fixed: FixedAxis,
        styles: Styles<LineConfig>,
        config: FigureConfig,
    ) -> AnimoResult<Self>
    where
        X: Into<Frames>,
        Y: Into<Frames>,
    {
        config.validate()?;
        if xs.is_empty() || ys.is_empty() {
            return Err(AnimoError::invalid_parameter(
                "series",
                "at least one dataset is required",
            ));
        }
        if xs.len() != ys.len() {
            return Err(AnimoError::dimension_mismatch(format!(
                "{} x datasets but {} y datasets",
                xs.len(),
                ys.len()
            )));
        }

        let styles = styles.expand(xs.len())?;
        let mut series: Vec<LineSeries> = Vec::with_capacity(xs.len());
        for (i, ((x, y), mut style)) in xs.into_iter().zip(ys).zip(styles).enumerate() {
            if style.legend.show && style.label.is_none() {
                style.label = Some(format!("series {i}"));
            }
            let nframes = config.nframes.or(series.first().map(LineSeries::nframes));
            let item = LineSeries::new(x, y, fixed, nframes, style)?.with_default_color(Color::cycle(i));
            series.push(item);
        }

        Ok(Self {
            figure: Figure::new(&config),
            config,
            series,
        })
    }

    /// The lines, in drawing order
    pub fn series(&self) -> &[LineSeries] {
        &self.series
    }
}

impl Animate for MultiLineAnimator {
    fn nframes(&self) -> usize {
        self.series.first().map_or(0, LineSeries::nframes)
    }

    fn interval(&self) -> Duration {
        self.config.interval()
    }

    fn figure(&self) -> &Figure {
        &self.figure
    }

    fn update(&mut self, frame: usize) -> AnimoResult<&Figure> {
        for series in &mut self.series {
            series.update(&mut self.figure, frame)?;
        }
        Ok(&self.figure)
    }

    fn render_frame(&mut self, frame: usize) -> AnimoResult<Vec<ArtistId>> {
        self.series
            .iter_mut()
            .map(|series| series.draw(&mut self.figure, frame))
            .collect()
    }

    /// Series parameters apply to every line.
    fn set_param(&mut self, param: Param) -> AnimoResult<()> {
        if apply_figure_param(&mut self.config, &mut self.figure, &param)? {
            return Ok(());
        }
        if let Param::Nframes(nframes) = param {
            for series in &self.series {
                series.check_nframes(nframes)?;
            }
            for series in &mut self.series {
                series.set_nframes(nframes)?;
            }
            self.config.nframes = Some(nframes);
            return Ok(());
        }
        for series in &mut self.series {
            series.set_param(&param)?;
        }
        Ok(())
    }
}

/// Several images, one per axes of a grid.
#[derive(Debug, Clone)]
pub struct MultiImageAnimator {
    figure: Figure,
    config: FigureConfig,
    series: Vec<ImageSeries>,
}

impl MultiImageAnimator {
    /// `layout` defaults to a single row with one axes per stack.
    pub fn new(
        stacks: Vec<ImageStack>,
        styles: Styles<ImageConfig>,
        layout: Option<GridLayout>,
        config: FigureConfig,
    ) -> AnimoResult<Self> {
        config.validate()?;
        if stacks.is_empty() {
            return Err(AnimoError::invalid_parameter(
                "stacks",
                "at least one image stack is required",
            ));
        }
        let layout = layout.unwrap_or(GridLayout::row(stacks.len()));
        if layout.cells() < stacks.len() {
            return Err(AnimoError::invalid_parameter(
                "layout",
                format!(
                    "{}x{} grid cannot hold {} images",
                    layout.rows,
                    layout.cols,
                    stacks.len()
                ),
            ));
        }

        let styles = styles.expand(stacks.len())?;
        let mut series: Vec<ImageSeries> = Vec::with_capacity(stacks.len());
        for (i, (stack, style)) in stacks.into_iter().zip(styles).enumerate() {
            let nframes = config.nframes.or(series.first().map(ImageSeries::nframes));
            series.push(ImageSeries::with_coords(stack, None, None, nframes, style)?.on_axes(i));
        }

        Ok(Self {
            figure: Figure::with_layout(&config, layout),
            config,
            series,
        })
    }

    /// The images, one per axes
    pub fn series(&self) -> &[ImageSeries] {
        &self.series
    }
}

impl Animate for MultiImageAnimator {
    fn nframes(&self) -> usize {
        self.series.first().map_or(0, ImageSeries::nframes)
    }

    fn interval(&self) -> Duration {
        self.config.interval()
    }

    fn figure(&self) -> &Figure {
        &self.figure
    }

    fn update(&mut self, frame: usize) -> AnimoResult<&Figure> {
        for series in &mut self.series {
            series.update(&mut self.figure, frame)?;
        }
        Ok(&self.figure)
    }

    fn render_frame(&mut self, frame: usize) -> AnimoResult<Vec<ArtistId>> {
        let mut ids = Vec::new();
        for series in &mut self.series {
            let handles = series.draw(&mut self.figure, frame)?;
            ids.push(handles.mesh);
            ids.push(handles.text);
            ids.extend(handles.colorbar);
        }
        Ok(ids)
    }

    /// Series parameters apply to every image.
    fn set_param(&mut self, param: Param) -> AnimoResult<()> {
        if apply_figure_param(&mut self.config, &mut self.figure, &param)? {
            return Ok(());
        }
        if let Param::Nframes(nframes) = param {
            for series in &self.series {
                series.check_nframes(nframes)?;
            }
            for series in &mut self.series {
                series.set_nframes(nframes)?;
            }
            self.config.nframes = Some(nframes);
            return Ok(());
        }
        for series in &mut self.series {
            series.set_param(&param)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LegendLoc;
    use ndarray::{Array1, Array2, Array3};

    fn wave(nframes: usize, phase: f64) -> Array2<f64> {
        Array2::from_shape_fn((nframes, 8), |(i, j)| (i as f64 + j as f64 + phase).sin())
    }

    fn stack(nframes: usize) -> ImageStack {
        ImageStack::new(Array3::<f64>::ones((nframes, 4, 5)), 0).unwrap()
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        let lines = MultiLineAnimator::new(
            Vec::<Array1<f64>>::new(),
            Vec::<Array2<f64>>::new(),
            FixedAxis::X,
            Styles::default(),
            FigureConfig::default(),
        );
        assert!(matches!(lines, Err(AnimoError::InvalidParameter { .. })));

        let images = MultiImageAnimator::new(
            Vec::new(),
            Styles::default(),
            None,
            FigureConfig::default(),
        );
        assert!(matches!(images, Err(AnimoError::InvalidParameter { .. })));
    }

    #[test]
    fn test_style_count_must_match() {
        let result = MultiLineAnimator::new(
            vec![Array1::<f64>::zeros(8), Array1::<f64>::zeros(8)],
            vec![wave(3, 0.0), wave(3, 1.0)],
            FixedAxis::X,
            Styles::PerItem(vec![LineConfig::default()]),
            FigureConfig::default(),
        );
        assert!(matches!(result, Err(AnimoError::InvalidConfig(_))));
    }

    #[test]
    fn test_frame_count_follows_first_item() {
        let result = MultiLineAnimator::new(
            vec![Array1::<f64>::zeros(8), Array1::<f64>::zeros(8)],
            vec![wave(4, 0.0), wave(2, 1.0)],
            FixedAxis::X,
            Styles::default(),
            FigureConfig::default(),
        );
        assert!(matches!(result, Err(AnimoError::DimensionMismatch(_))));

        let animator = MultiLineAnimator::new(
            vec![Array1::<f64>::zeros(8), Array1::<f64>::zeros(8)],
            vec![wave(4, 0.0), wave(2, 1.0)],
            FixedAxis::X,
            Styles::default(),
            FigureConfig::default().with_nframes(2),
        )
        .unwrap();
        assert_eq!(animator.nframes(), 2);
    }

    #[test]
    fn test_default_labels_with_legend() {
        let style = LineConfig::default().with_legend(LegendLoc::UpperLeft, None);
        let mut animator = MultiLineAnimator::new(
            vec![Array1::<f64>::zeros(8), Array1::<f64>::zeros(8)],
            vec![wave(3, 0.0), wave(3, 1.0)],
            FixedAxis::X,
            Styles::Shared(style),
            FigureConfig::default(),
        )
        .unwrap();
        animator.update(0).unwrap();
        let labels: Vec<_> = animator
            .series()
            .iter()
            .map(|s| s.config().label.clone().unwrap())
            .collect();
        assert_eq!(labels, vec!["series 0", "series 1"]);
        assert_eq!(animator.series()[1].color(), Color::cycle(1));
    }

    #[test]
    fn test_images_get_one_axes_each() {
        let mut animator = MultiImageAnimator::new(
            vec![stack(3), stack(3), stack(3)],
            Styles::Shared(ImageConfig::default().with_colorbar(true)),
            Some(GridLayout::new(2, 2).unwrap()),
            FigureConfig::default(),
        )
        .unwrap();
        animator.update(0).unwrap();
        animator.update(2).unwrap();

        let axes = animator.figure().all_axes();
        assert_eq!(axes.len(), 4);
        for (i, series) in animator.series().iter().enumerate() {
            let handles = series.state().handle().unwrap();
            assert_eq!(handles.mesh.axes, i);
            assert!(axes[i].colorbar().is_some());
        }
        assert!(axes[3].is_empty());
    }

    #[test]
    fn test_layout_too_small() {
        let result = MultiImageAnimator::new(
            vec![stack(1), stack(1), stack(1)],
            Styles::default(),
            Some(GridLayout::row(2)),
            FigureConfig::default(),
        );
        assert!(matches!(result, Err(AnimoError::InvalidParameter { .. })));
    }
}
