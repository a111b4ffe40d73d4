//! The playback loop and the recorded animation.

use std::path::{Path, PathBuf};
use std::time::Duration;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
use plotters::prelude::*;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::animators::Animate;
use crate::figure::Figure;
use crate::{AnimoError, AnimoResult};

/// Calls `update(i)` for every frame in order and records the figure after each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackDriver {
    nframes: usize,
    interval: Duration,
}

impl PlaybackDriver {
    /// A driver stepping through `nframes` frames
    pub const fn new(nframes: usize, interval: Duration) -> Self {
        Self { nframes, interval }
    }

    /// A driver matching the animator's own frame count and interval
    pub fn for_animator<A: Animate + ?Sized>(animator: &A) -> Self {
        Self::new(animator.nframes(), animator.interval())
    }

    /// Frames stepped through per run
    pub const fn nframes(&self) -> usize {
        self.nframes
    }

    /// Delay between frames
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the animation once. The first failing update stops the loop.
    pub fn run<A: Animate + ?Sized>(&self, animator: &mut A) -> AnimoResult<Animation> {
        info!(
            nframes = self.nframes,
            interval_ms = self.interval.as_millis() as u64,
            "recording animation"
        );
        let mut frames = Vec::with_capacity(self.nframes);
        for frame in 0..self.nframes {
            frames.push(animator.update(frame)?.clone());
        }
        info!(frames = frames.len(), "recording finished");
        Ok(Animation {
            frames,
            interval: self.interval,
        })
    }
}

/// Still image format for [`Animation::save_frames`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Portable Network Graphics
    Png,
    /// Scalable Vector Graphics
    Svg,
}

impl ImageFormat {
    /// File extension, without the dot
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// A recorded animation: one figure snapshot per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    frames: Vec<Figure>,
    interval: Duration,
}

impl Animation {
    /// Number of recorded frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Delay between frames
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Every snapshot, in frame order
    pub fn frames(&self) -> &[Figure] {
        &self.frames
    }

    /// Snapshot of frame `index`
    pub fn frame(&self, index: usize) -> AnimoResult<&Figure> {
        self.frames
            .get(index)
            .ok_or(AnimoError::frame_out_of_range(index, self.frames.len()))
    }

    /// Pixel size of the frames, `None` for an empty animation
    pub fn size(&self) -> Option<(u32, u32)> {
        self.frames.first().map(Figure::size)
    }

    fn require_frames(&self) -> AnimoResult<&Figure> {
        self.frames
            .first()
            .ok_or_else(|| AnimoError::invalid_parameter("animation", "has no frames"))
    }

    /// Write an animated GIF that loops forever with a delay of one interval per frame.
    pub fn save_gif<P: AsRef<Path>>(&self, path: P) -> AnimoResult<()> {
        let path = path.as_ref();
        let first = self.require_frames()?;
        let delay_ms = u32::try_from(self.interval.as_millis()).unwrap_or(u32::MAX);
        let root = BitMapBackend::gif(path, first.size(), delay_ms)
            .map_err(AnimoError::render)?
            .into_drawing_area();

        #[cfg(feature = "progress")]
        let bar = {
            let bar = ProgressBar::new(self.frames.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        };

        for (index, frame) in self.frames.iter().enumerate() {
            frame.draw(&root)?;
            root.present().map_err(AnimoError::render)?;
            debug!(frame = index, "gif frame encoded");
            #[cfg(feature = "progress")]
            bar.inc(1);
        }

        #[cfg(feature = "progress")]
        bar.finish_and_clear();
        info!(path = %path.display(), frames = self.frames.len(), "gif written");
        Ok(())
    }

    /// Write every frame as a numbered still into `dir`, creating it if needed.
    pub fn save_frames<P: AsRef<Path>>(
        &self,
        dir: P,
        format: ImageFormat,
    ) -> AnimoResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let width = self.frames.len().saturating_sub(1).to_string().len();

        let mut paths = Vec::with_capacity(self.frames.len());
        for (index, frame) in self.frames.iter().enumerate() {
            let path = dir.join(format!("frame_{index:0width$}.{}", format.extension()));
            match format {
                ImageFormat::Png => frame.save_png(&path)?,
                ImageFormat::Svg => frame.save_svg(&path)?,
            }
            paths.push(path);
        }
        info!(dir = %dir.display(), frames = paths.len(), "frames written");
        Ok(paths)
    }

    /// Render every frame to an SVG document.
    #[cfg(feature = "parallel")]
    pub fn to_svg_frames(&self) -> AnimoResult<Vec<String>> {
        self.frames.par_iter().map(Figure::to_svg_string).collect()
    }

    /// Render every frame to an SVG document.
    #[cfg(not(feature = "parallel"))]
    pub fn to_svg_frames(&self) -> AnimoResult<Vec<String>> {
        self.frames.iter().map(Figure::to_svg_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animators::{FixedAxis, LineAnimator};
    use crate::config::FigureConfig;
    use ndarray::{Array1, Array2};

    fn animator(nframes: usize) -> LineAnimator {
        let x = Array1::linspace(0.0, 1.0, 5);
        let y = Array2::from_shape_fn((nframes, 5), |(i, j)| (i + j) as f64);
        let config = FigureConfig::default().with_interval(Duration::from_millis(40));
        LineAnimator::with_config(x, y, FixedAxis::X, Default::default(), config).unwrap()
    }

    #[test]
    fn test_driver_snapshots_every_frame() {
        let mut animator = animator(4);
        let animation = PlaybackDriver::for_animator(&animator)
            .run(&mut animator)
            .unwrap();
        assert_eq!(animation.frame_count(), 4);
        assert_eq!(animation.interval(), Duration::from_millis(40));
        assert_eq!(animation.size(), Some((600, 400)));

        let ydata = |i: usize| {
            let figure = animation.frame(i).unwrap();
            let id = crate::figure::ArtistId { axes: 0, index: 0 };
            figure.line(id).unwrap().ydata().to_owned()
        };
        assert_eq!(ydata(0)[0], 0.0);
        assert_eq!(ydata(3)[0], 3.0);
        assert!(animation.frame(4).is_err());
    }

    #[test]
    fn test_driver_stops_at_first_error() {
        let mut animator = animator(2);
        let result = PlaybackDriver::new(5, Duration::from_millis(10)).run(&mut animator);
        assert!(matches!(
            result,
            Err(AnimoError::FrameOutOfRange { index: 2, nframes: 2 })
        ));
    }

    #[test]
    fn test_empty_animation_has_nothing_to_export() {
        let animation = Animation {
            frames: Vec::new(),
            interval: Duration::from_millis(100),
        };
        assert_eq!(animation.size(), None);
        assert!(matches!(
            animation.save_gif(std::env::temp_dir().join("animo_empty.gif")),
            Err(AnimoError::InvalidParameter { .. })
        ));
        assert!(animation.to_svg_frames().unwrap().is_empty());
    }

    #[test]
    fn test_image_format_extension() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Svg.extension(), "svg");
    }
}
