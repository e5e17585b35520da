//! Merges explicit, layer-generated, and hover annotations
//!
//! Owns the single-slot hover channel. Hover reports fully replace the
//! previous state; the merge reads whatever the slot holds at compose
//! time, so a leave event reporting Empty is reflected on the very next
//! pass.

use vf_core::annotation::{Annotation, HoverReporter, Provenance};
use vf_core::frame::LegendSettings;

/// Merges annotation sources into one ordered, de-duplicated list
#[derive(Default)]
pub struct AnnotationAggregator {
    hover: HoverReporter,
}

impl AnnotationAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared hover entry point handed to both the interaction
    /// collaborator and the annotation collaborator
    pub fn reporter(&self) -> HoverReporter {
        self.hover.clone()
    }

    /// Ordered merge: explicit, then layer-generated, then the flattened
    /// hover contents. Duplicate bodies keep their first occurrence. The
    /// result is stable across passes while the inputs are unchanged.
    pub fn merge(&self, explicit: &[Annotation], layer_generated: &[Annotation]) -> Vec<Annotation> {
        let hover = self.hover.current().annotations();
        let mut merged: Vec<Annotation> =
            Vec::with_capacity(explicit.len() + layer_generated.len() + hover.len());

        let sources = [
            (explicit, Provenance::Explicit),
            (layer_generated, Provenance::LayerGenerated),
        ];
        for (annotations, provenance) in sources {
            for annotation in annotations {
                push_unique(&mut merged, annotation.clone().with_provenance(provenance));
            }
        }
        for annotation in hover {
            push_unique(&mut merged, annotation);
        }
        merged
    }

    /// The omit-when-empty policy: the overlay is mounted only when the
    /// merged list has content or a legend is configured.
    pub fn overlay_required(merged: &[Annotation], legend: Option<&LegendSettings>) -> bool {
        !merged.is_empty() || legend.is_some()
    }
}

fn push_unique(merged: &mut Vec<Annotation>, annotation: Annotation) {
    if merged.iter().all(|existing| existing.body != annotation.body) {
        merged.push(annotation);
    }
}
