//! Scene-graph output of the compositor
//!
//! The compositor emits a retained scene the host walks to paint the
//! frame. Nodes mirror the vector primitives the layers produce; the
//! typed `FrameLayer` entries make the fixed z-order contract explicit.

use crate::raster::CanvasHandle;

/// Horizontal anchoring for text nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// A named group of child nodes, optionally translated
#[derive(Debug, Clone)]
pub struct GroupNode {
    pub class: String,
    pub transform: Option<[f64; 2]>,
    pub aria_hidden: bool,
    pub children: Vec<SceneNode>,
}

impl GroupNode {
    /// An empty, untranslated, visible group
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            transform: None,
            aria_hidden: false,
            children: Vec::new(),
        }
    }
}

/// A filled vector path
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    pub class: String,
    pub d: String,
    pub fill: Option<String>,
    pub transform: Option<[f64; 2]>,
}

/// A positioned text run
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub class: String,
    pub content: String,
    pub position: [f64; 2],
    pub anchor: TextAnchor,
}

/// The raster surface slot in the layer stack
#[derive(Debug, Clone)]
pub struct RasterNode {
    pub size: [f64; 2],
    pub position: [f64; 2],
    pub handle: Option<CanvasHandle>,
}

/// Defs/filter block carrying the matte clip and any extra definitions.
/// The identifier must be unique among frames sharing a document.
#[derive(Debug, Clone)]
pub struct DefsBlock {
    pub id: String,
    pub matte_clip: Option<Box<SceneNode>>,
    pub additional: Vec<SceneNode>,
}

/// One node in the composed scene
#[derive(Debug, Clone)]
pub enum SceneNode {
    Group(GroupNode),
    Path(PathNode),
    Text(TextNode),
    Raster(RasterNode),
    Defs(DefsBlock),
}

/// The vector surface stacked above the raster surface
#[derive(Debug, Clone)]
pub struct VectorSurface {
    pub size: [f64; 2],
    pub children: Vec<SceneNode>,
}

/// The pointer/gesture hit-testing overlay
#[derive(Debug, Clone)]
pub struct InteractionOverlay {
    pub size: [f64; 2],
    pub position: [f64; 2],
    pub node: Option<SceneNode>,
}

/// The annotation/legend overlay, mounted only when it has content
#[derive(Debug, Clone)]
pub struct AnnotationOverlay {
    pub size: [f64; 2],
    pub position: [f64; 2],
    pub node: SceneNode,
}

/// One z-ordered entry in the frame container, outermost first
#[derive(Debug, Clone)]
pub enum FrameLayer {
    Raster(RasterNode),
    Vector(VectorSurface),
    Interaction(InteractionOverlay),
    Annotations(AnnotationOverlay),
}

/// Complete output of one compose pass.
///
/// `layers` all share one absolutely-positioned container of `size`
/// dimensions; the decorative slots sit outside it and take no part in
/// coordinate math.
#[derive(Debug, Clone)]
pub struct FrameScene {
    pub class: String,
    pub size: [f64; 2],
    pub before_elements: Option<SceneNode>,
    pub layers: Vec<FrameLayer>,
    pub download_button: Option<SceneNode>,
    pub after_elements: Option<SceneNode>,
}

impl FrameScene {
    /// The raster layer, when canvas rendering is enabled
    pub fn raster(&self) -> Option<&RasterNode> {
        self.layers.iter().find_map(|layer| match layer {
            FrameLayer::Raster(node) => Some(node),
            _ => None,
        })
    }

    /// The vector surface
    pub fn vector(&self) -> Option<&VectorSurface> {
        self.layers.iter().find_map(|layer| match layer {
            FrameLayer::Vector(surface) => Some(surface),
            _ => None,
        })
    }

    /// The interaction overlay
    pub fn interaction(&self) -> Option<&InteractionOverlay> {
        self.layers.iter().find_map(|layer| match layer {
            FrameLayer::Interaction(overlay) => Some(overlay),
            _ => None,
        })
    }

    /// The annotation overlay, when it was mounted
    pub fn annotations(&self) -> Option<&AnnotationOverlay> {
        self.layers.iter().find_map(|layer| match layer {
            FrameLayer::Annotations(overlay) => Some(overlay),
            _ => None,
        })
    }
}
