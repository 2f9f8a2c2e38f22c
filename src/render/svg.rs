//! SVG reference images.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use geo::{Coord, LineString};
use log::{debug, error};
use svg::node::element::{Circle, Group, Path as SvgPath, Rectangle};
use svg::Document;

use super::{image_path, PlanRenderer, Viewport};
use crate::error::ExportError;
use crate::geometry::AtomicGeometry;
use crate::plan::{Category, Plan};

/// Categories in painting order: rooms first, openings last.
const DRAW_ORDER: [Category; 9] = [
    Category::Living,
    Category::Bedroom,
    Category::Bathroom,
    Category::Kitchen,
    Category::Balcony,
    Category::Wall,
    Category::Door,
    Category::Window,
    Category::FrontDoor,
];

fn category_color(category: Category) -> &'static str {
    match category {
        Category::Living => "#d9d9d9",
        Category::Bedroom => "#66c2a5",
        Category::Bathroom => "#fc8d62",
        Category::Kitchen => "#8da0cb",
        Category::Door => "#e78ac3",
        Category::Window => "#a6d854",
        Category::Wall => "#ffd92f",
        Category::FrontDoor => "#a63603",
        Category::Balcony => "#b3b3b3",
    }
}

/// Draws plans as square SVG images, one file per plan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvgRenderer {
    /// Width and height of the canvas in pixels.
    pub size: f64,
    /// Blank margin kept on every side of the drawing.
    pub padding: f64,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            size: 800.0,
            padding: 20.0,
        }
    }
}

/// Maps plan coordinates onto the canvas, flipping the y axis.
struct Projection {
    origin: Coord<f64>,
    scale: f64,
    padding: f64,
    size: f64,
}

impl Projection {
    fn new(renderer: &SvgRenderer, viewport: &Viewport) -> Self {
        let drawable = renderer.size - 2.0 * renderer.padding;
        // A zero extent (single point, flat line) places no constraint.
        let scale = [viewport.width(), viewport.height()]
            .into_iter()
            .filter(|extent| *extent > 0.0 && extent.is_finite())
            .map(|extent| drawable / extent)
            .reduce(f64::min)
            .unwrap_or(1.0);

        Self {
            origin: Coord {
                x: viewport.xlim.0,
                y: viewport.ylim.0,
            },
            scale,
            padding: renderer.padding,
            size: renderer.size,
        }
    }

    fn project(&self, c: Coord<f64>) -> (f64, f64) {
        (
            self.padding + (c.x - self.origin.x) * self.scale,
            self.size - self.padding - (c.y - self.origin.y) * self.scale,
        )
    }

    /// Appends one ring or line as path commands.
    fn trace(&self, data: &mut String, line: &LineString<f64>, close: bool) {
        for (i, c) in line.coords().enumerate() {
            let (x, y) = self.project(*c);
            let op = if i == 0 { 'M' } else { 'L' };
            if !data.is_empty() {
                data.push(' ');
            }
            data.push_str(&format!("{op} {x:.2} {y:.2}"));
        }
        if close && line.0.len() > 1 {
            data.push_str(" Z");
        }
    }

    fn draw(&self, geom: &AtomicGeometry, color: &str) -> Group {
        let group = Group::new();
        match geom {
            AtomicGeometry::Polygon(poly) => {
                let mut data = String::new();
                self.trace(&mut data, poly.exterior(), true);
                for hole in poly.interiors() {
                    self.trace(&mut data, hole, true);
                }
                group.add(
                    SvgPath::new()
                        .set("d", data)
                        .set("fill", color)
                        .set("fill-rule", "evenodd")
                        .set("stroke", "black")
                        .set("stroke-width", 1),
                )
            }
            AtomicGeometry::LineString(line) => {
                let mut data = String::new();
                self.trace(&mut data, line, false);
                group.add(
                    SvgPath::new()
                        .set("d", data)
                        .set("fill", "none")
                        .set("stroke", color)
                        .set("stroke-width", 2),
                )
            }
            AtomicGeometry::Point(p) => {
                let (cx, cy) = self.project(p.0);
                group.add(
                    Circle::new()
                        .set("cx", format!("{cx:.2}"))
                        .set("cy", format!("{cy:.2}"))
                        .set("r", 3)
                        .set("fill", color)
                        .set("stroke", "black")
                        .set("stroke-width", 0.5),
                )
            }
        }
    }
}

impl SvgRenderer {
    /// Builds the SVG document for a plan without touching the filesystem.
    pub fn document(&self, plan: &Plan, viewport: &Viewport) -> Result<Document, ExportError> {
        let projection = Projection::new(self, viewport);

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", self.size, self.size))
            .set("width", self.size)
            .set("height", self.size)
            .add(
                Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", "white"),
            );

        for category in DRAW_ORDER {
            let atoms = plan.atoms(category)?;
            if atoms.is_empty() {
                continue;
            }
            let color = category_color(category);
            let mut layer = Group::new().set("class", category.as_str());
            for geom in &atoms {
                layer = layer.add(projection.draw(geom, color));
            }
            doc = doc.add(layer);
        }

        Ok(doc)
    }
}

impl PlanRenderer for SvgRenderer {
    fn render(
        &self,
        plan: &Plan,
        index: usize,
        viewport: &Viewport,
        dir: &Path,
    ) -> Result<(), ExportError> {
        let doc = self.document(plan, viewport)?;

        fs::create_dir_all(dir).map_err(|source| ExportError::Render {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = image_path(dir, index);
        let written = File::create(&path).and_then(|mut f| write!(f, "{doc}"));
        if let Err(source) = written {
            error!(path:? = path, err:err = source; "Failed to write plan image");
            return Err(ExportError::Render { path, source });
        }

        debug!(index = index, path:? = path; "Wrote plan image");
        Ok(())
    }
}
