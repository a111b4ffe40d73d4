use ndarray::Array1;

use super::{ramp_stack, sine_frames};
use crate::animators::{Animate, FixedAxis, ImageAnimator, LineAnimator, MultiLineAnimator};
use crate::config::{FigureConfig, Styles};
use crate::figure::Artist;

#[test]
fn test_line_binding_is_stable() {
    let (x, y) = sine_frames(10);
    let mut animator = LineAnimator::new(x, y, FixedAxis::X).unwrap();
    animator.update(0).unwrap();
    let id = animator.series().state().handle().unwrap();
    let count = animator.figure().artist_count();

    for frame in 1..animator.nframes() {
        animator.update(frame).unwrap();
        assert_eq!(animator.series().state().handle(), Some(id));
        assert_eq!(animator.figure().artist_count(), count);
    }
}

#[test]
fn test_image_binding_is_stable() {
    let mut animator = ImageAnimator::new(ramp_stack(5)).unwrap();
    animator.update(0).unwrap();
    let handles = animator.series().state().handle().unwrap();
    let count = animator.figure().artist_count();

    for frame in [4, 2, 3] {
        animator.update(frame).unwrap();
        assert_eq!(animator.series().state().handle(), Some(handles));
        assert_eq!(animator.figure().artist_count(), count);
    }
}

#[test]
fn test_fixed_x_keeps_first_frame() {
    let (_, y) = sine_frames(6);
    let x = y.mapv(|v| v * 3.0);
    let first_x: Array1<f64> = x.row(0).to_owned();
    let mut animator = LineAnimator::new(x, y.clone(), FixedAxis::X).unwrap();

    for frame in 0..6 {
        animator.update(frame).unwrap();
        let id = animator.series().state().handle().unwrap();
        let line = animator.figure().line(id).unwrap();
        assert_eq!(line.xdata(), first_x);
        if frame > 0 {
            assert_eq!(line.ydata(), y.row(frame));
        }
    }
}

#[test]
fn test_multi_line_draws_distinct_lines() {
    let datasets: Vec<_> = (0..3).map(|_| sine_frames(8)).collect();
    let xs = datasets.iter().map(|(x, _)| x.clone()).collect();
    let ys = datasets.into_iter().map(|(_, y)| y).collect();
    let mut animator = MultiLineAnimator::new(
        xs,
        ys,
        FixedAxis::X,
        Styles::default(),
        FigureConfig::default(),
    )
    .unwrap();

    for frame in 0..animator.nframes() {
        animator.update(frame).unwrap();
    }

    let axes = animator.figure().axes(0).unwrap();
    let colors: Vec<_> = axes
        .artists()
        .iter()
        .filter_map(|artist| match artist {
            Artist::Line(line) => Some(line.color),
            _ => None,
        })
        .collect();
    assert_eq!(colors.len(), 3);
    assert_ne!(colors[0], colors[1]);
    assert_ne!(colors[1], colors[2]);
    assert_eq!(animator.figure().all_axes().len(), 1);
}

#[test]
fn test_first_update_may_start_anywhere() {
    let (x, y) = sine_frames(4);
    let mut animator = LineAnimator::new(x, y.clone(), FixedAxis::X).unwrap();
    // The creation path always draws frame 0.
    animator.update(3).unwrap();
    let id = animator.series().state().handle().unwrap();
    assert_eq!(animator.figure().line(id).unwrap().ydata(), y.row(0));
}
