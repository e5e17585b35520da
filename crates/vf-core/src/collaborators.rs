//! Contracts for the external layers the compositor coordinates
//!
//! The compositor forwards the shared coordinate tuple (size, adjusted
//! size, adjusted position, margin) and the scales unchanged to every
//! collaborator; none of the coordinate math is re-derived per layer.

use crate::annotation::{Annotation, HoverReporter};
use crate::frame::{AnnotationRule, InteractionBehaviors, LegendSettings, Margin};
use crate::pipeline::{MarkLayerKind, RenderPipeline};
use crate::raster::CanvasHandle;
use crate::scale::{FrameScales, ProjectedCoordinateNames};
use crate::scene::SceneNode;

/// Everything the mark-rendering collaborator receives for one pass
pub struct MarkContext<'a> {
    pub render_pipeline: &'a RenderPipeline,
    pub render_order: &'a [MarkLayerKind],
    pub size: [f64; 2],
    pub adjusted_size: [f64; 2],
    pub adjusted_position: [f64; 2],
    pub margin: Margin,
    pub scales: &'a FrameScales,
    pub projected_coordinates: &'a ProjectedCoordinateNames,
    pub title: Option<&'a SceneNode>,
    /// The raster handle published on the previous pass, if any
    pub canvas: Option<CanvasHandle>,
    pub matte: Option<&'a SceneNode>,
    pub hover: HoverReporter,
}

/// Vector output of the mark layers plus any annotations they generate
#[derive(Debug, Clone, Default)]
pub struct MarkSurface {
    pub nodes: Vec<SceneNode>,
    pub generated_annotations: Vec<Annotation>,
}

/// Draws the data marks into the raster and/or vector surface.
///
/// The render pipeline and render order are opaque to the compositor;
/// only this collaborator interprets them.
pub trait MarkCollaborator: Send {
    fn render(&mut self, ctx: MarkContext<'_>) -> anyhow::Result<MarkSurface>;
}

/// Everything the annotation/legend collaborator receives
pub struct AnnotationContext<'a> {
    /// The merged list: explicit, then layer-generated, then hover
    pub annotations: &'a [Annotation],
    pub legend_settings: Option<&'a LegendSettings>,
    pub margin: Margin,
    pub size: [f64; 2],
    pub position: [f64; 2],
    pub svg_rule: &'a AnnotationRule,
    pub html_rule: &'a AnnotationRule,
    pub render_pipeline: &'a RenderPipeline,
    /// Side channel for internally detected hover (e.g. voronoi neighbors)
    pub hover: HoverReporter,
}

/// Renders the merged annotation list and the optional legend
pub trait AnnotationCollaborator: Send {
    fn render(&mut self, ctx: AnnotationContext<'_>) -> anyhow::Result<SceneNode>;
}

/// Everything the interaction collaborator receives
pub struct InteractionContext<'a> {
    pub scales: &'a FrameScales,
    pub projected_coordinates: &'a ProjectedCoordinateNames,
    /// Full frame size (the outer container)
    pub frame_size: [f64; 2],
    /// Overlay size (the adjusted plot size)
    pub size: [f64; 2],
    pub position: [f64; 2],
    pub margin: Margin,
    pub points: &'a [serde_json::Value],
    pub behaviors: &'a InteractionBehaviors,
    pub render_pipeline: &'a RenderPipeline,
    pub hover: HoverReporter,
}

/// Hit-tests pointer gestures and reports hover state.
///
/// No output is required; an overlay node may be returned for hosts that
/// render a visible hit area. Handlers and hover reports fire as side
/// effects.
pub trait InteractionCollaborator: Send {
    fn mount(&mut self, ctx: InteractionContext<'_>) -> anyhow::Result<Option<SceneNode>>;
}
