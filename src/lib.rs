// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)] // Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # animo
//!
//! Animated line plots, image sequences and composites of the two, with the
//! figure setup, per-frame updates and playback loop handled for you.
//!
//! ## Overview
//!
//! An animator owns a [`Figure`] and one or more *series*. On the first
//! update a series creates its artist (a line, or a color mesh with its
//! annotation); later updates only move data into that artist. The
//! [`PlaybackDriver`] steps an animator through its frames and records a
//! snapshot per frame, which can then be exported or shown in an HTML player.
//!
//! | Animator                | Draws                                          |
//! |-------------------------|------------------------------------------------|
//! | [`LineAnimator`]        | one line, with x or y held at frame 0          |
//! | [`ImageAnimator`]       | one image stack as a color mesh                |
//! | [`MultiLineAnimator`]   | several lines on one axes                      |
//! | [`MultiImageAnimator`]  | several image stacks, one axes each            |
//! | [`CompositeAnimator`]   | an image with a line on top                    |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use animo::{Animate, DisplayMode, FixedAxis, LineAnimator, Playback};
//! use ndarray::{Array1, Array2};
//!
//! let x = Array1::linspace(0.0, 6.28, 100);
//! let y = Array2::from_shape_fn((50, 100), |(i, j)| (x[j] - 0.1 * i as f64).sin());
//!
//! let mut animator = LineAnimator::new(x, y, FixedAxis::X)?;
//! if let Playback::Raw(animation) = animator.play(DisplayMode::Raw)? {
//!     animation.save_gif("wave.gif")?;
//! }
//! # Ok::<(), animo::AnimoError>(())
//! ```
//!
//! ## Features
//!
//! - `parallel`: render SVG frames on a rayon thread pool
//! - `progress`: show an indicatif progress bar while encoding GIFs
//!
//! ## Logging
//!
//! The crate emits `tracing` events (artist creation, binding, recording and
//! export) and never installs a subscriber.

pub mod animators;
pub mod color;
pub mod config;
pub mod error;
pub mod figure;
pub mod frames;
pub mod normalization;
pub mod playback;

pub use animators::{
    Animate, CompositeAnimator, FixedAxis, ImageAnimator, ImageSeries, LineAnimator, LineSeries,
    MultiImageAnimator, MultiLineAnimator, Param, SeriesState,
};
pub use color::{Color, Colormap};
pub use config::{
    AnnotationConfig, FigureConfig, FrameText, ImageConfig, LegendConfig, LegendLoc, LineConfig,
    LineStyle, Marker, Styles,
};
pub use error::{AnimoError, AnimoResult};
pub use figure::{ArtistId, Figure, GridLayout};
pub use frames::{Frames, ImageStack};
pub use normalization::{NormSpec, Normalization, resolve_normalization};
pub use playback::{
    Animation, DisplayMode, HtmlDisplay, HtmlOptions, ImageFormat, LoopMode, Playback,
    PlaybackDriver,
};
