//! Fixed z-order assembly and single-computation coordinate propagation
//!
//! One compositor instance owns one frame's persistent state: the hover
//! slot (through the aggregator), the raster surface, and the handle
//! broker. Everything else is recomputed from the configuration supplied
//! to each `compose` call.

use tracing::trace;
use uuid::Uuid;

use vf_core::annotation::HoverReporter;
use vf_core::collaborators::{
    AnnotationCollaborator, AnnotationContext, InteractionCollaborator, InteractionContext,
    MarkCollaborator, MarkContext,
};
use vf_core::error::FrameError;
use vf_core::frame::{FrameConfig, TitleConfig};
use vf_core::raster::CanvasHandle;
use vf_core::scene::{
    AnnotationOverlay, FrameLayer, FrameScene, GroupNode, InteractionOverlay, RasterNode,
    SceneNode, TextAnchor, TextNode, VectorSurface,
};

use crate::aggregator::AnnotationAggregator;
use crate::broker::CanvasContextBroker;
use crate::matte::{build_defs, build_matte};

/// The external layers a frame delegates to
pub struct FrameCollaborators {
    pub marks: Box<dyn MarkCollaborator>,
    pub annotations: Box<dyn AnnotationCollaborator>,
    pub interaction: Box<dyn InteractionCollaborator>,
}

/// Top-level compositor for one frame instance
pub struct LayerCompositor {
    instance_id: Uuid,
    collaborators: FrameCollaborators,
    aggregator: AnnotationAggregator,
    broker: CanvasContextBroker,
    surface: Option<CanvasHandle>,
    pending_render: bool,
}

impl LayerCompositor {
    pub fn new(collaborators: FrameCollaborators) -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            collaborators,
            aggregator: AnnotationAggregator::new(),
            broker: CanvasContextBroker::new(),
            surface: None,
            pending_render: false,
        }
    }

    /// The shared hover entry point; last write wins
    pub fn hover_reporter(&self) -> HoverReporter {
        self.aggregator.reporter()
    }

    /// Whether the last pass published a new canvas handle and scheduled
    /// exactly one follow-up pass. Reading the flag clears it.
    pub fn take_pending_render(&mut self) -> bool {
        std::mem::take(&mut self.pending_render)
    }

    /// Compose one full pass from the supplied configuration
    pub fn compose(&mut self, config: &FrameConfig) -> Result<FrameScene, FrameError> {
        config.validate_geometry()?;

        // The coordinate tuple every sized child receives, computed once.
        let size = config.size;
        let adjusted_size = config.adjusted_size_or_default();
        let adjusted_position = config.adjusted_position;
        let margin = config.margin;
        trace!(width = size[0], height = size[1], name = %config.name, "composing frame");

        // Raster surface lifecycle: created on mount, dropped on unmount,
        // reallocated when the frame size changes so the backing buffer
        // always covers the full frame.
        if config.canvas_rendering {
            let stale = self
                .surface
                .as_ref()
                .map_or(true, |handle| !handle.matches_size(size));
            if stale {
                self.surface = Some(CanvasHandle::for_size(size));
            }
        } else {
            self.surface = None;
        }
        self.broker.request_handle(self.surface.clone());

        let generated_title = generate_frame_title(&config.title, size);
        let background = config
            .background_graphics
            .as_ref()
            .map(|graphic| graphic.resolve(size, margin));
        let foreground = config
            .foreground_graphics
            .as_ref()
            .map(|graphic| graphic.resolve(size, margin));

        let matte = build_matte(&config.matte, size, margin, &config.name);
        let identifier = self.defs_identifier(config);
        let defs = build_defs(matte.as_ref(), &identifier, &config.additional_defs);

        // Marks draw with the handle published on the previous pass.
        let mark_surface = self.collaborators.marks.render(MarkContext {
            render_pipeline: &config.render_pipeline,
            render_order: &config.render_order,
            size,
            adjusted_size,
            adjusted_position,
            margin,
            scales: &config.scales,
            projected_coordinates: &config.projected_coordinates,
            title: generated_title.as_ref(),
            canvas: self.broker.published(),
            matte: matte.as_ref(),
            hover: self.aggregator.reporter(),
        })?;

        let mut layers = Vec::with_capacity(4);

        if let Some(handle) = &self.surface {
            layers.push(FrameLayer::Raster(RasterNode {
                size,
                position: [0.0, 0.0],
                handle: Some(handle.clone()),
            }));
        }

        let mut children: Vec<SceneNode> = Vec::new();
        if let Some(defs) = defs {
            children.push(SceneNode::Defs(defs));
        }
        if let Some(graphic) = background {
            children.push(SceneNode::Group(GroupNode {
                class: "background-graphics".to_string(),
                transform: None,
                aria_hidden: true,
                children: vec![graphic],
            }));
        }
        if let Some(ticks) = &config.axes_tick_lines {
            children.push(SceneNode::Group(GroupNode {
                class: "axis-tick-lines".to_string(),
                transform: Some([
                    adjusted_position[0] + margin.left,
                    adjusted_position[1] + margin.top,
                ]),
                aria_hidden: true,
                children: vec![ticks.clone()],
            }));
        }
        children.extend(mark_surface.nodes);
        if let Some(title) = generated_title {
            children.push(SceneNode::Group(GroupNode {
                class: "frame-title".to_string(),
                transform: None,
                aria_hidden: false,
                children: vec![title],
            }));
        }
        if let Some(graphic) = foreground {
            children.push(SceneNode::Group(GroupNode {
                class: "foreground-graphics".to_string(),
                transform: None,
                aria_hidden: true,
                children: vec![graphic],
            }));
        }
        layers.push(FrameLayer::Vector(VectorSurface { size, children }));

        let overlay_node = self.collaborators.interaction.mount(InteractionContext {
            scales: &config.scales,
            projected_coordinates: &config.projected_coordinates,
            frame_size: size,
            size: adjusted_size,
            position: adjusted_position,
            margin,
            points: &config.points,
            behaviors: &config.interaction,
            render_pipeline: &config.render_pipeline,
            hover: self.aggregator.reporter(),
        })?;
        layers.push(FrameLayer::Interaction(InteractionOverlay {
            size: adjusted_size,
            position: adjusted_position,
            node: overlay_node,
        }));

        let merged = self
            .aggregator
            .merge(&config.annotations, &mark_surface.generated_annotations);
        if AnnotationAggregator::overlay_required(&merged, config.legend_settings.as_ref()) {
            let overlay_position = [
                adjusted_position[0] + margin.left,
                adjusted_position[1] + margin.top,
            ];
            let node = self.collaborators.annotations.render(AnnotationContext {
                annotations: &merged,
                legend_settings: config.legend_settings.as_ref(),
                margin,
                size: adjusted_size,
                position: overlay_position,
                svg_rule: &config.svg_rule,
                html_rule: &config.html_rule,
                render_pipeline: &config.render_pipeline,
                hover: self.aggregator.reporter(),
            })?;
            layers.push(FrameLayer::Annotations(AnnotationOverlay {
                size: adjusted_size,
                position: overlay_position,
                node,
            }));
        }

        // Post-commit reconciliation; at most one extra pass per identity
        // change, then steady state.
        if self.broker.commit() {
            self.pending_render = true;
        }

        Ok(FrameScene {
            class: frame_class(&config.class_name, &config.name),
            size,
            before_elements: config.before_elements.clone(),
            layers,
            download_button: config.download_button.clone(),
            after_elements: config.after_elements.clone(),
        })
    }

    /// Defs identifier chain: explicit key, then the frame name, then
    /// this instance's id, so frames sharing a document never collide.
    fn defs_identifier(&self, config: &FrameConfig) -> String {
        if let Some(key) = &config.frame_key {
            return key.clone();
        }
        if !config.name.is_empty() {
            return config.name.clone();
        }
        self.instance_id.to_string()
    }
}

/// Resolve the title configuration once per pass
pub fn generate_frame_title(title: &TitleConfig, size: [f64; 2]) -> Option<SceneNode> {
    match title {
        TitleConfig::None => None,
        TitleConfig::Text(text) if text.is_empty() => None,
        TitleConfig::Text(text) => Some(SceneNode::Text(TextNode {
            class: "frame-title".to_string(),
            content: text.clone(),
            position: [size[0] / 2.0, 25.0],
            anchor: TextAnchor::Middle,
        })),
        TitleConfig::Node(node) => Some(node.clone()),
        TitleConfig::Derived(build) => Some(build(size)),
    }
}

fn frame_class(class_name: &str, name: &str) -> String {
    [class_name, "frame", name]
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use serde_json::json;

    use vf_core::annotation::{Annotation, HoverState};
    use vf_core::collaborators::MarkSurface;
    use vf_core::frame::{LegendSettings, Margin, MatteConfig};

    /// Records what the mark collaborator saw on each pass
    #[derive(Clone, Default)]
    struct MarkProbe {
        canvas_seen: Arc<Mutex<Vec<bool>>>,
        adjusted_sizes: Arc<Mutex<Vec<[f64; 2]>>>,
        generated: Vec<Annotation>,
    }

    impl MarkCollaborator for MarkProbe {
        fn render(&mut self, ctx: MarkContext<'_>) -> anyhow::Result<MarkSurface> {
            self.canvas_seen.lock().push(ctx.canvas.is_some());
            self.adjusted_sizes.lock().push(ctx.adjusted_size);
            Ok(MarkSurface {
                nodes: vec![SceneNode::Group(GroupNode::new("data-visualization"))],
                generated_annotations: self.generated.clone(),
            })
        }
    }

    struct StubAnnotations;

    impl AnnotationCollaborator for StubAnnotations {
        fn render(&mut self, ctx: AnnotationContext<'_>) -> anyhow::Result<SceneNode> {
            let mut group = GroupNode::new("annotation-layer");
            for (index, annotation) in ctx.annotations.iter().enumerate() {
                if let Some(node) = (ctx.svg_rule)(annotation, index, ctx.render_pipeline) {
                    group.children.push(node);
                }
            }
            Ok(SceneNode::Group(group))
        }
    }

    struct StubInteraction;

    impl InteractionCollaborator for StubInteraction {
        fn mount(&mut self, _ctx: InteractionContext<'_>) -> anyhow::Result<Option<SceneNode>> {
            Ok(None)
        }
    }

    fn compositor_with(probe: MarkProbe) -> LayerCompositor {
        LayerCompositor::new(FrameCollaborators {
            marks: Box::new(probe),
            annotations: Box::new(StubAnnotations),
            interaction: Box::new(StubInteraction),
        })
    }

    fn compositor() -> LayerCompositor {
        compositor_with(MarkProbe::default())
    }

    fn base_config() -> FrameConfig {
        let mut config = FrameConfig::new([400.0, 300.0]);
        config.margin = Margin::new(10.0, 10.0, 20.0, 30.0);
        config
    }

    #[test]
    fn test_container_matches_frame_size() {
        let scene = compositor().compose(&base_config()).unwrap();
        assert_eq!(scene.size, [400.0, 300.0]);
        let vector = scene.vector().unwrap();
        assert_eq!(vector.size, [400.0, 300.0]);
    }

    #[test]
    fn test_adjusted_size_defaults_to_size() {
        let probe = MarkProbe::default();
        let mut compositor = compositor_with(probe.clone());
        compositor.compose(&base_config()).unwrap();
        assert_eq!(probe.adjusted_sizes.lock()[0], [400.0, 300.0]);
    }

    #[test]
    fn test_auto_matte_geometry_in_defs() {
        let mut config = base_config();
        config.name = "chart".to_string();
        config.matte = MatteConfig::Auto;

        let scene = compositor().compose(&config).unwrap();
        let vector = scene.vector().unwrap();
        let defs = match &vector.children[0] {
            SceneNode::Defs(defs) => defs,
            other => panic!("expected defs first, got {other:?}"),
        };
        assert_eq!(defs.id, "chart");
        match defs.matte_clip.as_deref().unwrap() {
            SceneNode::Path(path) => {
                assert_eq!(path.d, "M0,0 L360,0 L360,270 L0,270 Z");
                assert_eq!(path.transform, Some([30.0, 10.0]));
            }
            other => panic!("expected path matte, got {other:?}"),
        }
    }

    #[test]
    fn test_auto_matte_geometry_unchanged_with_raster_surface() {
        let mut config = base_config();
        config.name = "chart".to_string();
        config.matte = MatteConfig::Auto;
        config.canvas_rendering = true;

        let scene = compositor().compose(&config).unwrap();
        assert!(scene.raster().is_some());
        let defs = match &scene.vector().unwrap().children[0] {
            SceneNode::Defs(defs) => defs,
            other => panic!("expected defs first, got {other:?}"),
        };
        match defs.matte_clip.as_deref().unwrap() {
            SceneNode::Path(path) => {
                assert_eq!(path.d, "M0,0 L360,0 L360,270 L0,270 Z");
                assert_eq!(path.transform, Some([30.0, 10.0]));
            }
            other => panic!("expected path matte, got {other:?}"),
        }
    }

    #[test]
    fn test_frame_key_overrides_defs_identifier() {
        let mut config = base_config();
        config.name = "chart".to_string();
        config.frame_key = Some("doc-7".to_string());
        config.matte = MatteConfig::Auto;

        let scene = compositor().compose(&config).unwrap();
        match &scene.vector().unwrap().children[0] {
            SceneNode::Defs(defs) => assert_eq!(defs.id, "doc-7"),
            other => panic!("expected defs, got {other:?}"),
        }
    }

    #[test]
    fn test_annotation_overlay_omitted_when_empty() {
        let scene = compositor().compose(&base_config()).unwrap();
        assert!(scene.annotations().is_none());
    }

    #[test]
    fn test_annotation_overlay_mounted_for_legend_alone() {
        let mut config = base_config();
        config.legend_settings = Some(LegendSettings(json!({ "title": "series" })));
        let scene = compositor().compose(&config).unwrap();
        assert!(scene.annotations().is_some());
    }

    #[test]
    fn test_annotation_overlay_position_includes_margin() {
        let mut config = base_config();
        config.annotations = vec![Annotation::explicit(json!({ "id": "e" }))];
        let scene = compositor().compose(&config).unwrap();
        let overlay = scene.annotations().unwrap();
        assert_eq!(overlay.position, [30.0, 10.0]);
        assert_eq!(overlay.size, [400.0, 300.0]);
    }

    #[test]
    fn test_hover_sequence_replaces_not_accumulates() {
        let mut compositor = compositor();
        let reporter = compositor.hover_reporter();
        let config = base_config();

        reporter.report(HoverState::Single(Annotation::hover(json!({ "id": "a" }))));
        let scene = compositor.compose(&config).unwrap();
        assert!(scene.annotations().is_some());

        reporter.report(HoverState::Single(Annotation::hover(json!({ "id": "b" }))));
        compositor.compose(&config).unwrap();
        let merged = compositor.aggregator.merge(&config.annotations, &[]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].body["id"], "b");

        reporter.report(HoverState::Empty);
        let scene = compositor.compose(&config).unwrap();
        assert!(scene.annotations().is_none());
    }

    #[test]
    fn test_layer_generated_annotations_feed_overlay() {
        let probe = MarkProbe {
            generated: vec![Annotation::layer_generated(json!({ "id": "g" }))],
            ..MarkProbe::default()
        };
        let mut compositor = compositor_with(probe);
        let scene = compositor.compose(&base_config()).unwrap();
        assert!(scene.annotations().is_some());
    }

    #[test]
    fn test_canvas_handle_exactly_one_extra_pass() {
        let probe = MarkProbe::default();
        let mut compositor = compositor_with(probe.clone());
        let mut config = base_config();
        config.canvas_rendering = true;

        let scene = compositor.compose(&config).unwrap();
        assert!(scene.raster().is_some());
        assert!(compositor.take_pending_render());

        compositor.compose(&config).unwrap();
        assert!(!compositor.take_pending_render());

        compositor.compose(&config).unwrap();
        assert!(!compositor.take_pending_render());

        // Marks lag the handle by exactly one pass, then observe it.
        assert_eq!(*probe.canvas_seen.lock(), vec![false, true, true]);
    }

    #[test]
    fn test_resize_reallocates_raster_surface() {
        let mut compositor = compositor();
        let mut config = base_config();
        config.canvas_rendering = true;
        compositor.compose(&config).unwrap();
        assert!(compositor.take_pending_render());
        compositor.compose(&config).unwrap();
        assert!(!compositor.take_pending_render());

        config.size = [800.0, 600.0];
        let scene = compositor.compose(&config).unwrap();
        let raster = scene.raster().unwrap();
        assert_eq!(raster.size, [800.0, 600.0]);

        // The backing buffer covers the new bounds; writes there stick.
        let surface = raster.handle.as_ref().unwrap().surface();
        assert_eq!((surface.width(), surface.height()), (800, 600));
        surface.put_pixel(500, 400, [255, 0, 0, 255]);
        assert_eq!(surface.pixel(500, 400), Some([255, 0, 0, 255]));

        // Fresh identity: exactly one follow-up pass, then steady state.
        assert!(compositor.take_pending_render());
        compositor.compose(&config).unwrap();
        assert!(!compositor.take_pending_render());
    }

    #[test]
    fn test_canvas_unmount_schedules_one_pass() {
        let mut compositor = compositor();
        let mut config = base_config();
        config.canvas_rendering = true;
        compositor.compose(&config).unwrap();
        assert!(compositor.take_pending_render());
        compositor.compose(&config).unwrap();
        assert!(!compositor.take_pending_render());

        config.canvas_rendering = false;
        let scene = compositor.compose(&config).unwrap();
        assert!(scene.raster().is_none());
        assert!(compositor.take_pending_render());
        compositor.compose(&config).unwrap();
        assert!(!compositor.take_pending_render());
    }

    #[test]
    fn test_title_omitted_and_literal_string() {
        let scene = compositor().compose(&base_config()).unwrap();
        let has_title = scene.vector().unwrap().children.iter().any(|child| {
            matches!(child, SceneNode::Group(group) if group.class == "frame-title")
        });
        assert!(!has_title);

        let mut config = base_config();
        config.title = TitleConfig::Text("Monthly totals".to_string());
        let scene = compositor().compose(&config).unwrap();
        let title = scene
            .vector()
            .unwrap()
            .children
            .iter()
            .find_map(|child| match child {
                SceneNode::Group(group) if group.class == "frame-title" => {
                    group.children.first()
                }
                _ => None,
            })
            .unwrap();
        match title {
            SceneNode::Text(text) => {
                assert_eq!(text.content, "Monthly totals");
                assert_eq!(text.position, [200.0, 25.0]);
                assert_eq!(text.anchor, TextAnchor::Middle);
            }
            other => panic!("expected text title, got {other:?}"),
        }
    }

    #[test]
    fn test_fixed_layer_order() {
        let mut config = base_config();
        config.canvas_rendering = true;
        config.annotations = vec![Annotation::explicit(json!({ "id": "e" }))];

        let mut compositor = compositor();
        let scene = compositor.compose(&config).unwrap();
        let kinds: Vec<_> = scene
            .layers
            .iter()
            .map(|layer| match layer {
                FrameLayer::Raster(_) => "raster",
                FrameLayer::Vector(_) => "vector",
                FrameLayer::Interaction(_) => "interaction",
                FrameLayer::Annotations(_) => "annotations",
            })
            .collect();
        assert_eq!(kinds, vec!["raster", "vector", "interaction", "annotations"]);
    }

    #[test]
    fn test_invalid_size_fails_fast() {
        let mut compositor = compositor();
        let config = FrameConfig::new([0.0, 300.0]);
        assert!(matches!(
            compositor.compose(&config),
            Err(FrameError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_decorative_slots_outside_container() {
        let mut config = base_config();
        config.before_elements = Some(SceneNode::Group(GroupNode::new("frame-before-elements")));
        config.download_button = Some(SceneNode::Group(GroupNode::new("download")));

        let scene = compositor().compose(&config).unwrap();
        assert!(scene.before_elements.is_some());
        assert!(scene.download_button.is_some());
        assert!(scene.after_elements.is_none());
    }

    #[test]
    fn test_frame_class_composition() {
        assert_eq!(frame_class("", ""), "frame");
        assert_eq!(frame_class("dashboard", "chart"), "dashboard frame chart");
    }
}
