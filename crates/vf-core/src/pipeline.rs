//! Mark-layer pipeline configuration, forwarded opaquely to the mark layer

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The closed set of mark-layer kinds a frame can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkLayerKind {
    Pieces,
    Summaries,
    Connectors,
    Edges,
    Nodes,
    Areas,
    Lines,
    Points,
}

impl MarkLayerKind {
    /// Every mark-layer kind, in default drawing order
    pub const ALL: [MarkLayerKind; 8] = [
        MarkLayerKind::Areas,
        MarkLayerKind::Connectors,
        MarkLayerKind::Summaries,
        MarkLayerKind::Lines,
        MarkLayerKind::Pieces,
        MarkLayerKind::Edges,
        MarkLayerKind::Nodes,
        MarkLayerKind::Points,
    ];
}

/// Per-kind drawing configuration.
///
/// Contents are host-defined and treated as opaque; the compositor only
/// forwards them to the mark collaborator and the annotation rules.
pub type RenderPipeline = IndexMap<MarkLayerKind, serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(json!(MarkLayerKind::Pieces), json!("pieces"));
        assert_eq!(json!(MarkLayerKind::Summaries), json!("summaries"));
    }

    #[test]
    fn test_pipeline_preserves_insertion_order() {
        let mut pipeline = RenderPipeline::new();
        pipeline.insert(MarkLayerKind::Lines, json!({}));
        pipeline.insert(MarkLayerKind::Points, json!({}));
        let kinds: Vec<_> = pipeline.keys().copied().collect();
        assert_eq!(kinds, vec![MarkLayerKind::Lines, MarkLayerKind::Points]);
    }
}
