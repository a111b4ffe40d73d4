//! Color normalization: mapping data values onto `[0, 1]` before a colormap lookup.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::{AnimoError, AnimoResult};

/// How image values are normalized, as requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormSpec {
    /// Min–max normalization.
    #[default]
    Linear,
    /// Logarithmic normalization over the positive value range.
    Log,
    /// Piecewise-linear normalization with a fixed midpoint.
    Midpoint {
        /// Value mapped to 0.5, default 0.
        #[serde(default)]
        midpoint: Option<f64>,
        /// Value mapped to 0, default the data minimum.
        #[serde(default)]
        vmin: Option<f64>,
        /// Value mapped to 1, default the data maximum.
        #[serde(default)]
        vmax: Option<f64>,
        /// Clamp the output into `[0, 1]`.
        #[serde(default)]
        clip: bool,
    },
}

impl NormSpec {
    /// A midpoint normalization with every bound given.
    pub const fn midpoint(midpoint: f64, vmin: f64, vmax: f64) -> Self {
        Self::Midpoint {
            midpoint: Some(midpoint),
            vmin: Some(vmin),
            vmax: Some(vmax),
            clip: false,
        }
    }
}

/// A normalization with all bounds resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// `vmin -> 0`, `vmax -> 1`, linear in between.
    Linear {
        /// Value mapped to 0
        vmin: f64,
        /// Value mapped to 1
        vmax: f64,
    },
    /// Linear in the logarithm of the value; non-positive values map to NaN.
    Log {
        /// Smallest positive value, mapped to 0
        vmin: f64,
        /// Value mapped to 1
        vmax: f64,
    },
    /// Two linear pieces meeting at `midpoint -> 0.5`.
    Midpoint {
        /// Value mapped to 0
        vmin: f64,
        /// Value mapped to 0.5
        midpoint: f64,
        /// Value mapped to 1
        vmax: f64,
        /// Clamp the output into `[0, 1]`
        clip: bool,
    },
}

impl Normalization {
    /// Map a data value onto the colormap domain.
    ///
    /// Values outside the bounds map outside `[0, 1]` unless clipping was asked
    /// for; the colormap clamps them. Non-positive values under a log
    /// normalization map to NaN.
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            Self::Linear { vmin, vmax } => {
                if vmax == vmin {
                    0.0
                } else {
                    (value - vmin) / (vmax - vmin)
                }
            }
            Self::Log { vmin, vmax } => {
                if value <= 0.0 {
                    f64::NAN
                } else if vmax == vmin {
                    0.0
                } else {
                    (value.ln() - vmin.ln()) / (vmax.ln() - vmin.ln())
                }
            }
            Self::Midpoint {
                vmin,
                midpoint,
                vmax,
                clip,
            } => {
                let t = if value <= midpoint {
                    0.5 * (value - vmin) / (midpoint - vmin)
                } else {
                    0.5 + 0.5 * (value - midpoint) / (vmax - midpoint)
                };
                if clip { t.clamp(0.0, 1.0) } else { t }
            }
        }
    }

    /// Data value that maps onto `t`, used to label color bars.
    pub fn inverse(&self, t: f64) -> f64 {
        match *self {
            Self::Linear { vmin, vmax } => vmin + t * (vmax - vmin),
            Self::Log { vmin, vmax } => (vmin.ln() + t * (vmax.ln() - vmin.ln())).exp(),
            Self::Midpoint {
                vmin,
                midpoint,
                vmax,
                ..
            } => {
                if t <= 0.5 {
                    vmin + 2.0 * t * (midpoint - vmin)
                } else {
                    midpoint + 2.0 * (t - 0.5) * (vmax - midpoint)
                }
            }
        }
    }

    /// Values mapped to 0 and 1
    pub const fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::Linear { vmin, vmax }
            | Self::Log { vmin, vmax }
            | Self::Midpoint { vmin, vmax, .. } => (vmin, vmax),
        }
    }
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Resolve `mode` against the values of one frame.
pub fn resolve_normalization(
    frame_data: ArrayView2<'_, f64>,
    mode: &NormSpec,
) -> AnimoResult<Normalization> {
    resolve_with_limits(frame_data, mode, None, None)
}

/// Resolve `mode`, letting explicit `vmin`/`vmax` override the data range of
/// the linear and log modes.
pub fn resolve_with_limits(
    frame_data: ArrayView2<'_, f64>,
    mode: &NormSpec,
    vmin: Option<f64>,
    vmax: Option<f64>,
) -> AnimoResult<Normalization> {
    match *mode {
        NormSpec::Linear => {
            let (lo, hi) = bounds_or_data(frame_data, vmin, vmax, |_| true)?;
            Ok(Normalization::Linear { vmin: lo, vmax: hi })
        }
        NormSpec::Log => {
            let (lo, hi) = bounds_or_data(frame_data, vmin, vmax, |v| v > 0.0)?;
            if lo <= 0.0 || hi <= 0.0 {
                return Err(AnimoError::normalization(format!(
                    "log normalization needs positive bounds, got [{lo}, {hi}]"
                )));
            }
            Ok(Normalization::Log { vmin: lo, vmax: hi })
        }
        NormSpec::Midpoint {
            midpoint,
            vmin: spec_vmin,
            vmax: spec_vmax,
            clip,
        } => {
            let (lo, hi) = bounds_or_data(frame_data, spec_vmin, spec_vmax, |_| true)?;
            let mid = midpoint.unwrap_or(0.0);
            if !(lo < mid && mid < hi) {
                return Err(AnimoError::normalization(format!(
                    "midpoint normalization needs vmin < midpoint < vmax, got {lo} / {mid} / {hi}"
                )));
            }
            Ok(Normalization::Midpoint {
                vmin: lo,
                midpoint: mid,
                vmax: hi,
                clip,
            })
        }
    }
}

fn bounds_or_data(
    frame_data: ArrayView2<'_, f64>,
    vmin: Option<f64>,
    vmax: Option<f64>,
    keep: impl Fn(f64) -> bool,
) -> AnimoResult<(f64, f64)> {
    if let (Some(lo), Some(hi)) = (vmin, vmax) {
        return Ok((lo, hi));
    }
    let (data_lo, data_hi) = finite_range(frame_data.iter().copied().filter(|&v| keep(v)))
        .ok_or_else(|| AnimoError::normalization("no usable values to derive bounds from"))?;
    Ok((vmin.unwrap_or(data_lo), vmax.unwrap_or(data_hi)))
}
