//! Palette: node and edge classes to shapes, colors and line styles

use crate::model::{LogicalKind, Manifestation};
use crate::view::{EdgeClass, NodeClass};

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb`
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeLook {
    pub shape: &'static str,
    pub style: &'static str,
    pub fill: Rgb,
    pub border: Rgb,
    /// Relative node size for force-directed import
    pub size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeLook {
    pub color: Rgb,
    pub style: &'static str,
    pub penwidth: f64,
}

pub fn node_look(class: NodeClass) -> NodeLook {
    match class {
        NodeClass::Thesis => NodeLook {
            shape: "box",
            style: "rounded,filled",
            fill: Rgb(0xda, 0xe8, 0xfc),
            border: Rgb(0x6c, 0x8e, 0xbf),
            size: 20.0,
        },
        NodeClass::Proposition => NodeLook {
            shape: "doubleoctagon",
            style: "rounded,filled",
            fill: Rgb(0xf9, 0xed, 0xff),
            border: Rgb(0x96, 0x73, 0xa6),
            size: 15.0,
        },
        NodeClass::Step => NodeLook {
            shape: "box",
            style: "filled",
            fill: Rgb(0xd5, 0xe8, 0xd4),
            border: Rgb(0x82, 0xb3, 0x66),
            size: 10.0,
        },
        NodeClass::Extrinsic {
            manifestation: Manifestation::Explicit,
        } => NodeLook {
            shape: "cylinder",
            style: "filled",
            fill: Rgb(0xec, 0xd4, 0xbb),
            border: Rgb(0xb3, 0x9c, 0x84),
            size: 8.0,
        },
        NodeClass::Extrinsic { .. } => NodeLook {
            shape: "cylinder",
            style: "dashed,filled",
            fill: Rgb(0xf6, 0xed, 0xe6),
            border: Rgb(0xb3, 0xa8, 0x9a),
            size: 8.0,
        },
    }
}

pub fn edge_look(class: EdgeClass) -> EdgeLook {
    let structural = Rgb(0x99, 0x99, 0x99);
    match class {
        EdgeClass::Containment => EdgeLook {
            color: structural,
            style: "solid",
            penwidth: 1.0,
        },
        EdgeClass::Ordering => EdgeLook {
            color: structural,
            style: "dashed",
            penwidth: 1.0,
        },
        EdgeClass::Correspondence => EdgeLook {
            color: Rgb(0xd7, 0x9c, 0x02),
            style: "dotted",
            penwidth: 1.2,
        },
        EdgeClass::Logical { kind } => {
            let (color, style) = match kind {
                LogicalKind::Entailment => (Rgb(0x69, 0x69, 0x69), "solid"),
                LogicalKind::Contrast => (Rgb(0xb8, 0x54, 0x50), "solid"),
                LogicalKind::Confirmation => (Rgb(0x82, 0xb3, 0x66), "solid"),
                LogicalKind::Etiology => (Rgb(0x00, 0x8b, 0x8b), "solid"),
                LogicalKind::Analogy => (Rgb(0x96, 0x73, 0xa6), "dashed"),
                LogicalKind::Reference => (Rgb(0x70, 0x82, 0x38), "dotted"),
            };
            EdgeLook {
                color,
                style,
                penwidth: 1.5,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(Rgb(0x00, 0x8b, 0x8b).hex(), "#008b8b");
    }

    #[test]
    fn tacit_extrinsic_elements_are_dashed() {
        let implicit = node_look(NodeClass::Extrinsic {
            manifestation: Manifestation::Implicit,
        });
        let explicit = node_look(NodeClass::Extrinsic {
            manifestation: Manifestation::Explicit,
        });
        assert!(implicit.style.contains("dashed"));
        assert!(!explicit.style.contains("dashed"));
        assert_eq!(implicit.shape, explicit.shape);
    }
}
