use ndarray::{ArrayD, IxDyn};

use crate::AnimoError;
use crate::animators::{Animate, FixedAxis, ImageAnimator, LineAnimator};
use crate::frames::{Frames, ImageStack};

#[test]
fn test_image_animator_requires_three_dimensions() {
    let flat = ArrayD::<f32>::zeros(IxDyn(&[4, 4]));
    assert!(matches!(
        ImageAnimator::from_array(flat, 0),
        Err(AnimoError::Shape { .. })
    ));

    let deep = ArrayD::<u8>::zeros(IxDyn(&[2, 3, 4, 5]));
    assert!(matches!(
        ImageAnimator::from_array(deep, 0),
        Err(AnimoError::Shape { .. })
    ));
}

#[test]
fn test_image_frames_along_last_axis() {
    let data = ArrayD::<i32>::zeros(IxDyn(&[3, 4, 7]));
    let animator = ImageAnimator::from_array(data, 2).unwrap();
    assert_eq!(animator.nframes(), 7);
    assert_eq!(animator.series().stack().frame_shape(), (3, 4));
}

#[test]
fn test_axis_out_of_range() {
    let data = ArrayD::<f64>::zeros(IxDyn(&[3, 3, 3]));
    assert!(matches!(
        ImageStack::from_dyn(data, 3),
        Err(AnimoError::InvalidParameter { .. })
    ));
}

#[test]
fn test_tiny_frames_are_rejected() {
    let data = ArrayD::<f64>::zeros(IxDyn(&[5, 1, 3]));
    assert!(matches!(
        ImageAnimator::from_array(data, 0),
        Err(AnimoError::Shape { .. })
    ));
}

#[test]
fn test_line_frames_from_generic_arrays() {
    let x = Frames::from_array(ArrayD::<i16>::zeros(IxDyn(&[10]))).unwrap();
    let y = Frames::from_array(ArrayD::<f32>::zeros(IxDyn(&[3, 10]))).unwrap();
    let mut animator = LineAnimator::new(x, y, FixedAxis::X).unwrap();
    assert_eq!(animator.nframes(), 3);
    assert!(matches!(
        animator.update(3),
        Err(AnimoError::FrameOutOfRange { index: 3, nframes: 3 })
    ));

    let cube = ArrayD::<f64>::zeros(IxDyn(&[2, 2, 2]));
    assert!(matches!(
        Frames::from_array(cube),
        Err(AnimoError::Shape { .. })
    ));
}
