//! An image with a line drawn on top of it, on one axes.

use std::time::Duration;

use super::{Animate, ImageSeries, LineSeries, Param, apply_figure_param};
use crate::config::FigureConfig;
use crate::figure::{ArtistId, Figure};
use crate::{AnimoError, AnimoResult};

const IMAGE_ZORDER: i32 = 0;
const LINE_ZORDER: i32 = 1;

/// One image and one line sharing a single axes.
///
/// The image always sits below the line, and every update moves the image
/// before the line.
#[derive(Debug, Clone)]
pub struct CompositeAnimator {
    figure: Figure,
    config: FigureConfig,
    image: ImageSeries,
    line: LineSeries,
}

impl CompositeAnimator {
    /// Combine two unbound series. The frame count is the configured one,
    /// else the image's; both series must cover it.
    pub fn new(image: ImageSeries, line: LineSeries, config: FigureConfig) -> AnimoResult<Self> {
        config.validate()?;
        if image.state().is_bound() || line.state().is_bound() {
            return Err(AnimoError::invalid_parameter(
                "series",
                "series must not have been drawn yet",
            ));
        }

        let nframes = config.nframes.unwrap_or(image.nframes());
        let mut image = image.on_axes(0).with_zorder(IMAGE_ZORDER);
        image.set_nframes(nframes)?;
        let mut line = line.on_axes(0).with_zorder(LINE_ZORDER);
        line.set_nframes(nframes)?;

        Ok(Self {
            figure: Figure::new(&config),
            config,
            image,
            line,
        })
    }

    /// The image drawn underneath
    pub const fn image(&self) -> &ImageSeries {
        &self.image
    }

    /// The line drawn on top
    pub const fn line(&self) -> &LineSeries {
        &self.line
    }
}

impl Animate for CompositeAnimator {
    fn nframes(&self) -> usize {
        self.image.nframes()
    }

    fn interval(&self) -> Duration {
        self.config.interval()
    }

    fn figure(&self) -> &Figure {
        &self.figure
    }

    fn update(&mut self, frame: usize) -> AnimoResult<&Figure> {
        self.image.update(&mut self.figure, frame)?;
        self.line.update(&mut self.figure, frame)?;
        Ok(&self.figure)
    }

    fn render_frame(&mut self, frame: usize) -> AnimoResult<Vec<ArtistId>> {
        let handles = self.image.draw(&mut self.figure, frame)?;
        let line = self.line.draw(&mut self.figure, frame)?;
        let mut ids = vec![handles.mesh, handles.text];
        ids.extend(handles.colorbar);
        ids.push(line);
        Ok(ids)
    }

    /// Series parameters go to whichever series has them; `ZOrder` is fixed.
    fn set_param(&mut self, param: Param) -> AnimoResult<()> {
        if apply_figure_param(&mut self.config, &mut self.figure, &param)? {
            return Ok(());
        }
        match param {
            Param::Nframes(nframes) => {
                self.image.check_nframes(nframes)?;
                self.line.check_nframes(nframes)?;
                self.image.set_nframes(nframes)?;
                self.line.set_nframes(nframes)?;
                self.config.nframes = Some(nframes);
                Ok(())
            }
            Param::ZOrder(_) => Err(param.unsupported("a composite animator")),
            Param::Colormap(_) | Param::Normalization(_) | Param::Text(_) | Param::Colorbar(_) => {
                self.image.set_param(&param)
            }
            other => self.line.set_param(&other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animators::FixedAxis;
    use crate::config::{ImageConfig, LineConfig};
    use crate::frames::ImageStack;
    use ndarray::{Array1, Array2, Array3};

    fn parts(image_frames: usize, line_frames: usize) -> (ImageSeries, LineSeries) {
        let stack = ImageStack::new(Array3::<f64>::zeros((image_frames, 4, 4)), 0).unwrap();
        let image = ImageSeries::new(stack, ImageConfig::default().with_zorder(7)).unwrap();
        let line = LineSeries::new(
            Array1::linspace(0.0, 3.0, 4),
            Array2::<f64>::ones((line_frames, 4)),
            FixedAxis::X,
            None,
            LineConfig::default().with_zorder(-2),
        )
        .unwrap();
        (image, line)
    }

    #[test]
    fn test_zorders_are_forced() {
        let (image, line) = parts(3, 3);
        let mut animator = CompositeAnimator::new(image, line, FigureConfig::default()).unwrap();
        animator.update(0).unwrap();
        let mesh = animator.image().state().handle().unwrap().mesh;
        let line = animator.line().state().handle().unwrap();
        assert_eq!(animator.figure().mesh(mesh).unwrap().zorder, IMAGE_ZORDER);
        assert_eq!(animator.figure().line(line).unwrap().zorder, LINE_ZORDER);
    }

    #[test]
    fn test_line_must_cover_image_frames() {
        let (image, line) = parts(4, 2);
        assert!(matches!(
            CompositeAnimator::new(image, line, FigureConfig::default()),
            Err(AnimoError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_param_routing() {
        let (image, line) = parts(2, 2);
        let mut animator = CompositeAnimator::new(image, line, FigureConfig::default()).unwrap();
        animator.set_param(Param::Colorbar(true)).unwrap();
        animator.set_param(Param::LineWidth(5)).unwrap();
        assert!(animator.image().config().colorbar);
        assert_eq!(animator.line().config().linewidth, 5);
        assert!(matches!(
            animator.set_param(Param::ZOrder(3)),
            Err(AnimoError::InvalidConfig(_))
        ));
    }
}
