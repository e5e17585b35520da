//! Frame configuration, supplied anew on every render pass
//!
//! Apart from hover state and the canvas handle, the compositor holds no
//! state between passes; everything here is recomputed from the current
//! configuration each time.

use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::error::FrameError;
use crate::pipeline::{MarkLayerKind, RenderPipeline};
use crate::scale::{FrameScales, ProjectedCoordinateNames};
use crate::scene::SceneNode;

/// Margin around the plot area
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same inset on all four sides
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// All four fields finite and non-negative
    pub fn is_valid(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// A graphic builder invoked with the frame size and margin
pub type GraphicBuilder = Box<dyn Fn([f64; 2], Margin) -> SceneNode + Send + Sync>;

/// A static graphic or one derived from the frame geometry
pub enum GraphicSource {
    Static(SceneNode),
    Derived(GraphicBuilder),
}

impl GraphicSource {
    /// Resolve to a concrete graphic for this pass
    pub fn resolve(&self, size: [f64; 2], margin: Margin) -> SceneNode {
        match self {
            GraphicSource::Static(node) => node.clone(),
            GraphicSource::Derived(build) => build(size, margin),
        }
    }
}

/// How the plot-area backdrop is produced, resolved once per render
#[derive(Default)]
pub enum MatteConfig {
    /// No matte
    #[default]
    Disabled,
    /// Filled rectangle tracing the margin-inset plot area
    Auto,
    /// Host-supplied builder invoked with (size, margin)
    Custom(GraphicBuilder),
    /// Pre-built graphic used verbatim
    Prebuilt(SceneNode),
}

impl MatteConfig {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, MatteConfig::Disabled)
    }
}

/// Title configuration, resolved once per render
#[derive(Default)]
pub enum TitleConfig {
    #[default]
    None,
    /// Plain string rendered centered at the top of the frame
    Text(String),
    /// Pre-built title graphic used verbatim
    Node(SceneNode),
    /// Builder invoked with the frame size
    Derived(Box<dyn Fn([f64; 2]) -> SceneNode + Send + Sync>),
}

/// Host-supplied legend settings, forwarded opaquely to the annotation
/// collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendSettings(pub serde_json::Value);

/// Handler for a host pointer event, invoked with the event datum
pub type PointerHandler = Box<dyn Fn(&serde_json::Value) + Send + Sync>;

/// Custom pointer behaviors forwarded to the interaction collaborator
#[derive(Default)]
pub struct InteractionBehaviors {
    pub on_click: Option<PointerHandler>,
    pub on_hover: Option<PointerHandler>,
    pub on_double_click: Option<PointerHandler>,
}

/// Rule invoked per merged annotation with its index and the full render
/// pipeline for cross-referencing source mark layers
pub type AnnotationRule =
    Box<dyn Fn(&Annotation, usize, &RenderPipeline) -> Option<SceneNode> + Send + Sync>;

/// Declarative configuration for one frame
pub struct FrameConfig {
    pub name: String,
    pub class_name: String,
    /// Defs-identifier override; falls back to the frame name
    pub frame_key: Option<String>,
    pub size: [f64; 2],
    pub margin: Margin,
    pub adjusted_position: [f64; 2],
    /// Defaults to `size` when not overridden
    pub adjusted_size: Option<[f64; 2]>,
    pub title: TitleConfig,
    pub matte: MatteConfig,
    pub additional_defs: Vec<SceneNode>,
    pub background_graphics: Option<GraphicSource>,
    pub foreground_graphics: Option<GraphicSource>,
    pub axes_tick_lines: Option<SceneNode>,
    /// Opt-in raster surface under the vector surface
    pub canvas_rendering: bool,
    pub annotations: Vec<Annotation>,
    pub legend_settings: Option<LegendSettings>,
    /// Projected data points forwarded to the interaction collaborator
    pub points: Vec<serde_json::Value>,
    pub render_pipeline: RenderPipeline,
    pub render_order: Vec<MarkLayerKind>,
    pub projected_coordinates: ProjectedCoordinateNames,
    pub scales: FrameScales,
    pub interaction: InteractionBehaviors,
    pub svg_rule: AnnotationRule,
    pub html_rule: AnnotationRule,
    pub before_elements: Option<SceneNode>,
    pub after_elements: Option<SceneNode>,
    pub download_button: Option<SceneNode>,
}

impl FrameConfig {
    /// A frame of the given size with every optional piece absent
    pub fn new(size: [f64; 2]) -> Self {
        Self {
            name: String::new(),
            class_name: String::new(),
            frame_key: None,
            size,
            margin: Margin::default(),
            adjusted_position: [0.0, 0.0],
            adjusted_size: None,
            title: TitleConfig::None,
            matte: MatteConfig::Disabled,
            additional_defs: Vec::new(),
            background_graphics: None,
            foreground_graphics: None,
            axes_tick_lines: None,
            canvas_rendering: false,
            annotations: Vec::new(),
            legend_settings: None,
            points: Vec::new(),
            render_pipeline: RenderPipeline::new(),
            render_order: Vec::new(),
            projected_coordinates: ProjectedCoordinateNames::default(),
            scales: FrameScales::default(),
            interaction: InteractionBehaviors::default(),
            svg_rule: Box::new(|_, _, _| None),
            html_rule: Box::new(|_, _, _| None),
            before_elements: None,
            after_elements: None,
            download_button: None,
        }
    }

    /// The effective plot size after the optional override
    pub fn adjusted_size_or_default(&self) -> [f64; 2] {
        self.adjusted_size.unwrap_or(self.size)
    }

    /// Fail fast when mandatory geometry is malformed; every downstream
    /// layer divides the coordinate space using exactly these numbers.
    pub fn validate_geometry(&self) -> Result<(), FrameError> {
        let [width, height] = self.size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(FrameError::InvalidSize { width, height });
        }
        if !self.margin.is_valid() {
            return Err(FrameError::InvalidMargin(self.margin));
        }
        Ok(())
    }
}
