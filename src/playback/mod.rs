//! Recording an animator frame by frame and handing the result to a display.
//!
//! [`PlaybackDriver`] steps an [`Animate`](crate::Animate) implementor through
//! every frame and keeps a snapshot of the figure after each step. The
//! resulting [`Animation`] can be exported directly (GIF, PNG or SVG frames)
//! or wrapped in an [`HtmlDisplay`] for interactive viewing.

pub mod driver;
pub mod html;

pub use driver::{Animation, ImageFormat, PlaybackDriver};
pub use html::{HtmlDisplay, HtmlOptions, LoopMode};

/// How a played animation is presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Return the recorded animation as is
    #[default]
    Raw,
    /// Build an interactive HTML player
    Html(HtmlOptions),
}

/// Result of [`Animate::play`](crate::Animate::play).
#[derive(Debug, Clone)]
pub enum Playback {
    /// The recorded animation
    Raw(Animation),
    /// An interactive player
    Html(HtmlDisplay),
}

impl Playback {
    /// The recorded animation, if no display adapter was requested
    pub fn into_animation(self) -> Option<Animation> {
        match self {
            Self::Raw(animation) => Some(animation),
            Self::Html(_) => None,
        }
    }

    /// The HTML player, if one was requested
    pub fn into_html(self) -> Option<HtmlDisplay> {
        match self {
            Self::Raw(_) => None,
            Self::Html(display) => Some(display),
        }
    }
}
