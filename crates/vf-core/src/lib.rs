//! Core types and collaborator contracts for the frame compositor
//!
//! This crate provides the data model shared by every layer of a frame:
//! geometry and configuration, scales, annotations and the hover channel,
//! the raster-surface handle, the scene-graph output types, and the
//! contracts the compositor exposes to its external collaborators.

pub mod annotation;
pub mod collaborators;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod raster;
pub mod scale;
pub mod scene;

// Re-export commonly used types
pub use annotation::{Annotation, HoverReporter, HoverState, Provenance};
pub use collaborators::{
    AnnotationCollaborator, AnnotationContext, InteractionCollaborator, InteractionContext,
    MarkCollaborator, MarkContext, MarkSurface,
};
pub use error::FrameError;
pub use frame::{
    AnnotationRule, FrameConfig, GraphicBuilder, GraphicSource, InteractionBehaviors,
    LegendSettings, Margin, MatteConfig, PointerHandler, TitleConfig,
};
pub use pipeline::{MarkLayerKind, RenderPipeline};
pub use raster::{CanvasHandle, RasterSurface};
pub use scale::{FrameScales, LinearScale, ProjectedCoordinateNames, Scale};
pub use scene::{
    AnnotationOverlay, DefsBlock, FrameLayer, FrameScene, GroupNode, InteractionOverlay,
    PathNode, RasterNode, SceneNode, TextAnchor, TextNode, VectorSurface,
};
