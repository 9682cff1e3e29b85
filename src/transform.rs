//! Index-to-pixel translation for the track transform.

use crate::config::Direction;

/// Measured box sizes the transform math depends on. Slide width includes the
/// first slide's horizontal margins; all slides are assumed equal width.
/// Re-measured by the shell at init and after a resize.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Geometry {
    pub slide_width: f64,
    pub container_width: f64,
}

impl Geometry {
    pub fn new(slide_width: f64, container_width: f64) -> Self {
        Self {
            slide_width,
            container_width,
        }
    }

    pub fn track_width(&self, working_len: usize) -> f64 {
        self.slide_width * working_len as f64
    }
}

/// Pixel offset that brings the slide at `dom_index` into view. Rtl shifts
/// the whole strip so its right edge aligns with the container's right edge.
pub fn compute_x(dom_index: usize, working_len: usize, geometry: Geometry, direction: Direction) -> f64 {
    let base = -geometry.slide_width * dom_index as f64;
    match direction {
        Direction::Ltr => base,
        Direction::Rtl => base + (geometry.track_width(working_len) - geometry.container_width),
    }
}

/// Minimum drag displacement that commits to a neighbouring slide.
pub fn commit_threshold(slide_width: f64) -> f64 {
    40.0_f64.max(slide_width * 0.15)
}
