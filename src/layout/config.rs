use crate::error::Result;
use crate::model::NodeKind;
use serde::{Deserialize, Serialize};

/// Box sizes and spacing used by the auto-layout.
///
/// Every field has a default, so a configuration file only needs the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Box of start, action and end nodes.
    pub linear_width: f64,
    pub linear_height: f64,
    /// Bounding box of branch nodes.
    pub branch_width: f64,
    pub branch_height: f64,
    /// The root is centered horizontally on `origin_x`, its top edge at `origin_y`.
    pub origin_x: f64,
    pub origin_y: f64,
    /// Space between a start/action/end node and its children.
    pub vertical_gap: f64,
    /// Space between a branch node and its slots.
    pub branch_vertical_gap: f64,
    /// Distance between sibling centers, and between a branch and its side slots.
    pub horizontal_gap: f64,
    /// Minimum clearance kept between the bounding boxes of sibling subtrees.
    pub sibling_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            linear_width: 280.0,
            linear_height: 120.0,
            branch_width: 280.0,
            branch_height: 120.0,
            origin_x: 500.0,
            origin_y: 80.0,
            vertical_gap: 80.0,
            branch_vertical_gap: 80.0,
            horizontal_gap: 320.0,
            sibling_margin: 40.0,
        }
    }
}

impl LayoutConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Width and height of a node's box.
    pub fn box_size(&self, kind: NodeKind) -> (f64, f64) {
        match kind {
            NodeKind::Branch => (self.branch_width, self.branch_height),
            NodeKind::Start | NodeKind::Action | NodeKind::End => {
                (self.linear_width, self.linear_height)
            }
        }
    }

    /// Vertical space between a node of `kind` and its children.
    pub fn gap_below(&self, kind: NodeKind) -> f64 {
        match kind {
            NodeKind::Branch => self.branch_vertical_gap,
            NodeKind::Start | NodeKind::Action | NodeKind::End => self.vertical_gap,
        }
    }
}

/// Bounds applied to manual resizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeLimits {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_width: 200.0,
            max_width: 500.0,
            min_height: 100.0,
            max_height: 300.0,
        }
    }
}

impl SizeLimits {
    /// Clamps a requested size into the limits. The minimum wins when the
    /// limits are inverted.
    pub fn clamp(&self, width: f64, height: f64) -> (f64, f64) {
        (
            width.min(self.max_width).max(self.min_width),
            height.min(self.max_height).max(self.min_height),
        )
    }
}
