//! Behavior shared by every animator: binding, frame bounds and update order.

use ndarray::{Array1, Array2, Array3};

use crate::frames::ImageStack;

mod lifecycle_tests;
mod shape_tests;

/// `nframes` frames of a travelling sine wave over 32 points
pub(crate) fn sine_frames(nframes: usize) -> (Array1<f64>, Array2<f64>) {
    let x = Array1::linspace(0.0, 2.0 * std::f64::consts::PI, 32);
    let y = Array2::from_shape_fn((nframes, 32), |(i, j)| (x[j] - 0.2 * i as f64).sin());
    (x, y)
}

/// `nframes` 6x5 frames whose values grow with the frame index
pub(crate) fn ramp_stack(nframes: usize) -> ImageStack {
    let data = Array3::from_shape_fn((nframes, 6, 5), |(k, i, j)| (k + i * j) as f64);
    ImageStack::new(data, 0).expect("valid stack")
}
