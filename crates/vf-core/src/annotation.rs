//! Annotation records and the single-slot hover channel

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Where an annotation came from; controls its position in the merged list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Explicit,
    LayerGenerated,
    Hover,
}

/// Opaque overlay record tagged by provenance.
///
/// The body is host-defined; the compositor only orders and forwards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub provenance: Provenance,
    pub body: serde_json::Value,
}

impl Annotation {
    /// An annotation supplied directly by the host
    pub fn explicit(body: serde_json::Value) -> Self {
        Self {
            provenance: Provenance::Explicit,
            body,
        }
    }

    /// An annotation produced by a mark layer during rendering
    pub fn layer_generated(body: serde_json::Value) -> Self {
        Self {
            provenance: Provenance::LayerGenerated,
            body,
        }
    }

    /// An annotation sourced from transient hover state
    pub fn hover(body: serde_json::Value) -> Self {
        Self {
            provenance: Provenance::Hover,
            body,
        }
    }

    /// Retag this annotation with a new provenance
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }
}

/// The currently highlighted annotation(s), replaced wholesale per event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum HoverState {
    #[default]
    Empty,
    Single(Annotation),
    Multiple(Vec<Annotation>),
}

impl HoverState {
    /// True when this state contributes nothing to the merged list
    pub fn is_empty(&self) -> bool {
        match self {
            HoverState::Empty => true,
            HoverState::Single(_) => false,
            HoverState::Multiple(list) => list.is_empty(),
        }
    }

    /// Flatten into the annotations this state contributes, tagged Hover
    pub fn annotations(&self) -> Vec<Annotation> {
        match self {
            HoverState::Empty => Vec::new(),
            HoverState::Single(annotation) => {
                vec![annotation.clone().with_provenance(Provenance::Hover)]
            }
            HoverState::Multiple(list) => list
                .iter()
                .cloned()
                .map(|a| a.with_provenance(Provenance::Hover))
                .collect(),
        }
    }
}

/// Cloneable handle over the single hover slot.
///
/// Both the interaction collaborator and the annotation collaborator's
/// internal hover mechanism write through this entry point. Last write
/// wins; reports are never queued or merged with the previous value.
#[derive(Clone, Default)]
pub struct HoverReporter {
    slot: Arc<RwLock<HoverState>>,
}

impl HoverReporter {
    /// Create a reporter over a fresh, empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the hover state wholesale
    pub fn report(&self, state: HoverState) {
        *self.slot.write() = state;
    }

    /// A leave or cancel event; equivalent to reporting Empty
    pub fn clear(&self) {
        self.report(HoverState::Empty);
    }

    /// Snapshot the current hover state
    pub fn current(&self) -> HoverState {
        self.slot.read().clone()
    }
}
