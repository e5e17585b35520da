//! Matte geometry and the defs/filter block
//!
//! The matte is the backdrop traced over the plot area (the frame size
//! inset by the margin on all four sides). Pure geometry; no side
//! effects.

use vf_core::frame::{Margin, MatteConfig};
use vf_core::scene::{DefsBlock, PathNode, SceneNode};

/// Closed path tracing the plot area in plot-local coordinates
pub fn plot_area_path(size: [f64; 2], margin: Margin) -> String {
    let width = size[0] - margin.left - margin.right;
    let height = size[1] - margin.top - margin.bottom;
    format!("M0,0 L{width},0 L{width},{height} L0,{height} Z")
}

/// Resolve the matte configuration into a graphic, if any.
///
/// The Auto rectangle is translated by (margin.left, margin.top) so that
/// it lands at the plot-area offset within the un-inset frame container.
pub fn build_matte(
    matte: &MatteConfig,
    size: [f64; 2],
    margin: Margin,
    name: &str,
) -> Option<SceneNode> {
    match matte {
        MatteConfig::Disabled => None,
        MatteConfig::Auto => Some(SceneNode::Path(PathNode {
            class: format!("{name}-matte"),
            d: plot_area_path(size, margin),
            fill: Some("white".to_string()),
            transform: Some([margin.left, margin.top]),
        })),
        MatteConfig::Custom(build) => Some(build(size, margin)),
        MatteConfig::Prebuilt(node) => Some(node.clone()),
    }
}

/// Emit the defs block only when there is something to put in it
pub fn build_defs(
    matte: Option<&SceneNode>,
    identifier: &str,
    additional: &[SceneNode],
) -> Option<DefsBlock> {
    if matte.is_none() && additional.is_empty() {
        return None;
    }
    Some(DefsBlock {
        id: identifier.to_string(),
        matte_clip: matte.cloned().map(Box::new),
        additional: additional.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vf_core::scene::{GroupNode, TextAnchor, TextNode};

    const SIZE: [f64; 2] = [400.0, 300.0];

    fn margin() -> Margin {
        Margin::new(10.0, 10.0, 20.0, 30.0)
    }

    #[test]
    fn test_auto_matte_traces_inset_rectangle() {
        let node = build_matte(&MatteConfig::Auto, SIZE, margin(), "chart").unwrap();
        match node {
            SceneNode::Path(path) => {
                assert_eq!(path.d, "M0,0 L360,0 L360,270 L0,270 Z");
                assert_eq!(path.transform, Some([30.0, 10.0]));
                assert_eq!(path.fill.as_deref(), Some("white"));
                assert_eq!(path.class, "chart-matte");
            }
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_disabled_matte_produces_nothing() {
        assert!(build_matte(&MatteConfig::Disabled, SIZE, margin(), "").is_none());
    }

    #[test]
    fn test_custom_matte_invoked_with_geometry() {
        let config = MatteConfig::Custom(Box::new(|size, margin| {
            SceneNode::Text(TextNode {
                class: "probe".to_string(),
                content: format!("{}x{} left={}", size[0], size[1], margin.left),
                position: [0.0, 0.0],
                anchor: TextAnchor::Start,
            })
        }));
        match build_matte(&config, SIZE, margin(), "").unwrap() {
            SceneNode::Text(text) => assert_eq!(text.content, "400x300 left=30"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_prebuilt_matte_used_verbatim() {
        let prebuilt = MatteConfig::Prebuilt(SceneNode::Group(GroupNode::new("custom-matte")));
        match build_matte(&prebuilt, SIZE, margin(), "").unwrap() {
            SceneNode::Group(group) => assert_eq!(group.class, "custom-matte"),
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn test_defs_omitted_without_content() {
        assert!(build_defs(None, "chart", &[]).is_none());
    }

    #[test]
    fn test_defs_emitted_for_matte_or_additional() {
        let matte = build_matte(&MatteConfig::Auto, SIZE, margin(), "chart");
        let defs = build_defs(matte.as_ref(), "chart", &[]).unwrap();
        assert_eq!(defs.id, "chart");
        assert!(defs.matte_clip.is_some());

        let extra = [SceneNode::Group(GroupNode::new("gradient"))];
        let defs = build_defs(None, "chart", &extra).unwrap();
        assert!(defs.matte_clip.is_none());
        assert_eq!(defs.additional.len(), 1);
    }
}
