//! Reference images of exported plans.
//!
//! Rendering is a side effect of assembly. The assembler picks a [`Viewport`]
//! according to the [`RenderMode`] and hands it to a [`PlanRenderer`]:
//!
//! - `plain` draws the plan's raw bounding box;
//! - `letterboxed` first squares the bounding box with [`compose`], so every
//!   image shares the plan's true aspect ratio inside a square frame.

mod svg;

pub use self::svg::SvgRenderer;

use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::geometry::Bounds;
use crate::plan::Plan;

/// The region of plan space an image shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
}

impl Viewport {
    /// The bounding box itself, unsquared.
    pub fn from_bounds(bounds: &Bounds) -> Self {
        Self {
            xlim: (bounds.min_x, bounds.max_x),
            ylim: (bounds.min_y, bounds.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.xlim.1 - self.xlim.0
    }

    pub fn height(&self) -> f64 {
        self.ylim.1 - self.ylim.0
    }
}

/// Squares a bounding box around its center.
///
/// The longer side is kept as-is and the shorter side is widened
/// symmetrically to match it. A square input is returned unchanged.
///
/// ```
/// use resplan_export::geometry::Bounds;
/// use resplan_export::render::compose;
///
/// let vp = compose(&Bounds::from_xyxy(0.0, 0.0, 10.0, 4.0));
/// assert_eq!(vp.xlim, (0.0, 10.0));
/// assert_eq!(vp.ylim, (-3.0, 7.0));
/// ```
pub fn compose(bounds: &Bounds) -> Viewport {
    let (w, h) = (bounds.width(), bounds.height());
    let (cx, cy) = bounds.center();

    if w > h {
        Viewport {
            xlim: (bounds.min_x, bounds.max_x),
            ylim: (cy - w / 2.0, cy + w / 2.0),
        }
    } else {
        Viewport {
            xlim: (cx - h / 2.0, cx + h / 2.0),
            ylim: (bounds.min_y, bounds.max_y),
        }
    }
}

/// Whether and how reference images are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderMode {
    /// Draw nothing.
    #[default]
    None,
    /// Draw the raw bounding box.
    Plain,
    /// Draw the bounding box squared around its center.
    Letterboxed,
}

impl RenderMode {
    /// The viewport for a plan with the given bounds, or `None` when images
    /// are disabled.
    pub fn viewport(self, bounds: &Bounds) -> Option<Viewport> {
        match self {
            RenderMode::None => None,
            RenderMode::Plain => Some(Viewport::from_bounds(bounds)),
            RenderMode::Letterboxed => Some(compose(bounds)),
        }
    }
}

/// Draws one plan into an image file under `dir`.
pub trait PlanRenderer {
    fn render(
        &self,
        plan: &Plan,
        index: usize,
        viewport: &Viewport,
        dir: &Path,
    ) -> Result<(), ExportError>;
}

/// Renderer that writes nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl PlanRenderer for NullRenderer {
    fn render(&self, _: &Plan, _: usize, _: &Viewport, _: &Path) -> Result<(), ExportError> {
        Ok(())
    }
}

/// File name of the image for the plan at `index`.
pub fn image_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("plan_{index}.svg"))
}
