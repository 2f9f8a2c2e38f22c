//! Per-plan export assembly.
//!
//! [`Assembler::assemble`] turns one dataset plan into a [`PlanExportRecord`]:
//!
//! 1. copy the plan and normalize its keys;
//! 2. for each category in canonical order, flatten and encode as WKT,
//!    skipping categories that are absent or yield no geometry;
//! 3. derive and serialize the adjacency graph;
//! 4. compute bounds over every emitted geometry (`[0, 0, 0, 0]` if none);
//! 5. draw a reference image when a render mode is selected.
//!
//! The key normalizer, graph deriver and renderer are injected, so each can
//! be swapped for its no-op counterpart.

mod report;

pub use report::{ExportReport, PlanFailure};

use std::path::PathBuf;

use log::debug;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::ExportError;
use crate::geometry::{bounds, wkt, AtomicGeometry, Bounds};
use crate::graph::{serialize, ContactGraph, GraphDeriver, ReferenceGraph};
use crate::plan::{CanonicalKeys, Category, KeyNormalizer, Plan};
use crate::render::{NullRenderer, PlanRenderer, RenderMode};

/// Default directory for reference images.
pub const DEFAULT_IMAGE_DIR: &str = "reference_images";

/// One plan in the export bundle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlanExportRecord {
    /// Position of the plan in the source dataset.
    pub id: usize,
    pub geometries: CategoryGeometries,
    pub reference_graph: ReferenceGraph,
    pub bounds: Bounds,
}

/// WKT strings per category, kept in canonical category order.
///
/// Serializes as a JSON object whose keys appear in that order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryGeometries(Vec<(Category, Vec<String>)>);

impl CategoryGeometries {
    pub fn get(&self, category: Category) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, wkts)| wkts.as_slice())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryGeometries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, wkts) in &self.0 {
            map.serialize_entry(category.as_str(), wkts)?;
        }
        map.end()
    }
}

/// Builds export records from plans.
pub struct Assembler {
    normalizer: Box<dyn KeyNormalizer>,
    deriver: Box<dyn GraphDeriver>,
    renderer: Box<dyn PlanRenderer>,
    render_mode: RenderMode,
    image_dir: PathBuf,
}

impl Default for Assembler {
    fn default() -> Self {
        Self {
            normalizer: Box::new(CanonicalKeys),
            deriver: Box::new(ContactGraph::default()),
            renderer: Box::new(NullRenderer),
            render_mode: RenderMode::None,
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
        }
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(mut self, normalizer: impl KeyNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn with_deriver(self, deriver: impl GraphDeriver + 'static) -> Self {
        self.with_boxed_deriver(Box::new(deriver))
    }

    /// Like [`with_deriver`](Self::with_deriver), for a deriver chosen at run time.
    pub fn with_boxed_deriver(mut self, deriver: Box<dyn GraphDeriver>) -> Self {
        self.deriver = deriver;
        self
    }

    /// Sets the renderer and how its viewport is chosen.
    pub fn with_renderer(mut self, renderer: impl PlanRenderer + 'static, mode: RenderMode) -> Self {
        self.renderer = Box::new(renderer);
        self.render_mode = mode;
        self
    }

    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = dir.into();
        self
    }

    /// Exports the plan found at `index` in the dataset.
    ///
    /// The input plan is not modified. Errors are tagged with `index`.
    pub fn assemble(&self, plan: &Plan, index: usize) -> Result<PlanExportRecord, ExportError> {
        self.assemble_inner(plan, index)
            .map_err(|e| e.in_plan(index))
    }

    fn assemble_inner(&self, plan: &Plan, index: usize) -> Result<PlanExportRecord, ExportError> {
        let mut plan = plan.clone();
        self.normalizer.normalize(&mut plan);

        let mut geometries = Vec::new();
        let mut pool: Vec<AtomicGeometry> = Vec::new();
        for category in Category::ALL {
            let atoms = plan.atoms(category)?;
            if atoms.is_empty() {
                continue;
            }
            if atoms.iter().any(|g| !g.is_finite()) {
                return Err(ExportError::malformed(
                    category.as_str(),
                    "coordinates must be finite numbers",
                ));
            }
            geometries.push((category, atoms.iter().map(wkt::encode).collect()));
            pool.extend(atoms);
        }

        let graph = self.deriver.derive(&plan)?;
        let reference_graph = serialize(&graph)?;
        let bounds = bounds(&pool).unwrap_or_default();

        debug!(
            index = index,
            categories = geometries.len(),
            nodes = reference_graph.nodes.len(),
            edges = reference_graph.edges.len();
            "Assembled plan"
        );

        if let Some(viewport) = self.render_mode.viewport(&bounds) {
            self.renderer
                .render(&plan, index, &viewport, &self.image_dir)?;
        }

        Ok(PlanExportRecord {
            id: index,
            geometries: CategoryGeometries(geometries),
            reference_graph,
            bounds,
        })
    }
}
