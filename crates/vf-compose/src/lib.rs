//! Layered compositor for interactive data-visualization frames
//!
//! Owns one coordinate space (size, margin, scales) and assembles the
//! fixed layer stack: raster surface, vector surface (defs, background,
//! marks, title, foreground), interaction overlay, and annotation/legend
//! overlay. Mark rendering, annotation layout, and hit-testing are
//! delegated to external collaborators behind the contracts in `vf-core`.

pub mod aggregator;
pub mod broker;
pub mod compositor;
pub mod matte;

pub use aggregator::AnnotationAggregator;
pub use broker::CanvasContextBroker;
pub use compositor::{generate_frame_title, FrameCollaborators, LayerCompositor};
pub use matte::{build_defs, build_matte, plot_area_path};
