// crates/trellis-layout/src/query.rs
//! Geometric queries over an arranged tree.

use glam::Vec2;
use trellis_core::{Axis, ControlKey, LayoutRect, Result};

use crate::context::LayoutContext;

impl LayoutContext {
    /// Bounding box of the children of `key`, margins included, for scroll ranges.
    ///
    /// Children with a fixed size are measured at that size rather than at their arranged
    /// size, since the container may have clipped them. `None` when there are no children.
    pub fn measure_content(&self, key: ControlKey) -> Result<Option<LayoutRect>> {
        self.store.validate(key)?;

        let mut bounds: Option<LayoutRect> = None;
        for child in self.store.children(key) {
            let record = self.store.node(child);
            let mut rect = *self.store.bounds(child);
            for axis in Axis::ALL {
                let d = axis.index();
                if record.fixed_size[d] > 0.0 {
                    rect.size[d] = record.fixed_size[d];
                }
            }
            let rect = rect.outset(record.margins);
            bounds = Some(match bounds {
                Some(bounds) => bounds.union(&rect),
                None => rect,
            });
        }
        Ok(bounds)
    }

    /// Deepest control under `point`, starting at the root.
    pub fn hit_test(&self, point: Vec2) -> Option<ControlKey> {
        self.hit_node(ControlKey::ROOT, point)
    }

    pub fn hit_test_from(&self, key: ControlKey, point: Vec2) -> Result<Option<ControlKey>> {
        self.store.validate(key)?;
        Ok(self.hit_node(key, point))
    }

    fn hit_node(&self, key: ControlKey, point: Vec2) -> Option<ControlKey> {
        if !self.store.bounds(key).contains(point) {
            return None;
        }
        // Later siblings are drawn on top.
        let mut child = self.store.node(key).last_child;
        while child.is_valid() {
            if let Some(hit) = self.hit_node(child, point) {
                return Some(hit);
            }
            child = self.store.node(child).previous_sibling;
        }
        Some(key)
    }
}
