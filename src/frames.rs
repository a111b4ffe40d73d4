//! Frame sources: numeric arrays indexed by frame number.
//!
//! [`Frames`] feeds line animators one coordinate row per frame, either from a
//! `[frame, position]` array or from a single row reused for every frame.
//! [`ImageStack`] feeds image animators one 2D slice per frame.

use ndarray::{Array1, Array2, Array3, ArrayD, ArrayView1, ArrayView2, Axis, Ix1, Ix2, Ix3};
use num_traits::ToPrimitive;

use crate::{AnimoError, AnimoResult};

fn to_f64<T: ToPrimitive>(value: &T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Coordinate data for one axis of a line animation.
#[derive(Debug, Clone, PartialEq)]
pub enum Frames {
    /// Row `i` holds the coordinates of frame `i`.
    Varying(Array2<f64>),
    /// The same coordinates for every frame.
    Fixed(Array1<f64>),
}

impl Frames {
    /// Per-frame coordinates indexed `[frame, position]`
    pub const fn varying(data: Array2<f64>) -> Self {
        Self::Varying(data)
    }

    /// One row broadcast across all frames
    pub const fn fixed(data: Array1<f64>) -> Self {
        Self::Fixed(data)
    }

    /// Build from an array of any numeric element type and rank 1 or 2.
    pub fn from_array<T: ToPrimitive>(data: ArrayD<T>) -> AnimoResult<Self> {
        match data.ndim() {
            1 => {
                let data = data
                    .into_dimensionality::<Ix1>()
                    .map_err(|e| AnimoError::shape("1 or 2 dimensions", e.to_string()))?;
                Ok(Self::Fixed(data.map(to_f64)))
            }
            2 => {
                let data = data
                    .into_dimensionality::<Ix2>()
                    .map_err(|e| AnimoError::shape("1 or 2 dimensions", e.to_string()))?;
                Ok(Self::Varying(data.map(to_f64)))
            }
            n => Err(AnimoError::shape(
                "1 or 2 dimensions",
                format!("{n} dimensions"),
            )),
        }
    }

    /// Number of frames this source can serve, `None` if it serves any index.
    pub fn nframes(&self) -> Option<usize> {
        match self {
            Self::Varying(data) => Some(data.nrows()),
            Self::Fixed(_) => None,
        }
    }

    /// Number of points per frame
    pub fn npoints(&self) -> usize {
        match self {
            Self::Varying(data) => data.ncols(),
            Self::Fixed(data) => data.len(),
        }
    }

    /// Coordinates of frame `index`.
    pub fn frame(&self, index: usize) -> AnimoResult<ArrayView1<'_, f64>> {
        match self {
            Self::Varying(data) => {
                if index >= data.nrows() {
                    return Err(AnimoError::frame_out_of_range(index, data.nrows()));
                }
                Ok(data.row(index))
            }
            Self::Fixed(data) => Ok(data.view()),
        }
    }

    /// Check that this source covers `nframes` frames.
    pub(crate) fn ensure_covers(&self, nframes: usize, what: &str) -> AnimoResult<()> {
        match self.nframes() {
            Some(available) if available < nframes => Err(AnimoError::dimension_mismatch(format!(
                "{what} holds {available} frames but {nframes} were requested"
            ))),
            _ => Ok(()),
        }
    }
}

impl From<Array2<f64>> for Frames {
    fn from(data: Array2<f64>) -> Self {
        Self::Varying(data)
    }
}

impl From<Array1<f64>> for Frames {
    fn from(data: Array1<f64>) -> Self {
        Self::Fixed(data)
    }
}

/// A stack of 2D images with the frame axis first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStack {
    data: Array3<f64>,
}

impl ImageStack {
    /// Create a stack from a 3D array whose frames run along `axis`.
    ///
    /// The frame axis is rolled to the front; the other two keep their order.
    pub fn new<T: ToPrimitive>(data: Array3<T>, axis: usize) -> AnimoResult<Self> {
        if axis >= 3 {
            return Err(AnimoError::invalid_parameter(
                "axis",
                format!("must be 0, 1 or 2, got {axis}"),
            ));
        }
        let mut data = data.map(to_f64);
        for i in (0..axis).rev() {
            data.swap_axes(i, i + 1);
        }
        let data = data.as_standard_layout().into_owned();

        let (_, rows, cols) = data.dim();
        if rows < 2 || cols < 2 {
            return Err(AnimoError::shape(
                "frames of at least 2x2",
                format!("{rows}x{cols}"),
            ));
        }
        Ok(Self { data })
    }

    /// Create a stack from an array of unknown rank; anything but 3 dimensions fails.
    pub fn from_dyn<T: ToPrimitive>(data: ArrayD<T>, axis: usize) -> AnimoResult<Self> {
        if data.ndim() != 3 {
            return Err(AnimoError::shape(
                "3 dimensions",
                format!("{} dimensions", data.ndim()),
            ));
        }
        let data = data
            .into_dimensionality::<Ix3>()
            .map_err(|e| AnimoError::shape("3 dimensions", e.to_string()))?;
        Self::new(data, axis)
    }

    /// Number of frames in the stack
    pub fn nframes(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Rows and columns of every frame
    pub fn frame_shape(&self) -> (usize, usize) {
        let (_, rows, cols) = self.data.dim();
        (rows, cols)
    }

    /// Frame `index` as a `[row, col]` view.
    pub fn frame(&self, index: usize) -> AnimoResult<ArrayView2<'_, f64>> {
        let nframes = self.nframes();
        if index >= nframes {
            return Err(AnimoError::frame_out_of_range(index, nframes));
        }
        Ok(self.data.index_axis(Axis(0), index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn, array};

    #[test]
    fn test_fixed_frames_serve_any_index() {
        let frames = Frames::fixed(array![0.0, 1.0, 2.0]);
        assert_eq!(frames.nframes(), None);
        assert_eq!(frames.frame(42).unwrap(), array![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_varying_frames_bounds() {
        let frames = Frames::varying(array![[0.0, 1.0], [2.0, 3.0]]);
        assert_eq!(frames.nframes(), Some(2));
        assert_eq!(frames.npoints(), 2);
        assert_eq!(frames.frame(1).unwrap(), array![2.0, 3.0]);
        assert!(matches!(
            frames.frame(2),
            Err(AnimoError::FrameOutOfRange { index: 2, nframes: 2 })
        ));
        assert!(frames.ensure_covers(2, "y").is_ok());
        assert!(matches!(
            frames.ensure_covers(3, "y"),
            Err(AnimoError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_frames_from_integer_array() {
        let data = Array::from_shape_vec(IxDyn(&[2, 3]), vec![1i32, 2, 3, 4, 5, 6]).unwrap();
        let frames = Frames::from_array(data).unwrap();
        assert_eq!(frames.frame(1).unwrap(), array![4.0, 5.0, 6.0]);

        let cube = Array::<f32, _>::zeros(IxDyn(&[2, 2, 2]));
        assert!(matches!(
            Frames::from_array(cube),
            Err(AnimoError::Shape { .. })
        ));
    }

    #[test]
    fn test_image_stack_rolls_frame_axis() {
        // 2 rows x 4 frames x 3 cols, frames along axis 1.
        let data = Array3::from_shape_fn((2, 4, 3), |(r, f, c)| (100 * f + 10 * r + c) as f64);
        let stack = ImageStack::new(data, 1).unwrap();
        assert_eq!(stack.nframes(), 4);
        assert_eq!(stack.frame_shape(), (2, 3));
        let frame = stack.frame(3).unwrap();
        assert_eq!(frame[[1, 2]], 312.0);
        assert_eq!(frame[[0, 0]], 300.0);
    }

    #[test]
    fn test_image_stack_last_axis() {
        let data = Array3::from_shape_fn((2, 3, 5), |(r, c, f)| (100 * f + 10 * r + c) as f64);
        let stack = ImageStack::new(data, 2).unwrap();
        assert_eq!(stack.nframes(), 5);
        assert_eq!(stack.frame_shape(), (2, 3));
        assert_eq!(stack.frame(4).unwrap()[[1, 2]], 412.0);
    }

    #[test]
    fn test_image_stack_rejects_bad_input() {
        let flat = Array::<f64, _>::zeros(IxDyn(&[4, 4]));
        assert!(matches!(
            ImageStack::from_dyn(flat, 0),
            Err(AnimoError::Shape { .. })
        ));
        let hyper = Array::<f64, _>::zeros(IxDyn(&[2, 4, 4, 4]));
        assert!(matches!(
            ImageStack::from_dyn(hyper, 0),
            Err(AnimoError::Shape { .. })
        ));
        assert!(matches!(
            ImageStack::new(Array3::<f64>::zeros((2, 3, 3)), 3),
            Err(AnimoError::InvalidParameter { .. })
        ));
        assert!(matches!(
            ImageStack::new(Array3::<f64>::zeros((2, 1, 3)), 0),
            Err(AnimoError::Shape { .. })
        ));
    }
}
