// crates/trellis-layout/src/snapshot.rs
//! Diagnostic dump of a layout tree to and from JSON.
//!
//! A snapshot holds every control's inputs plus the rect it was last arranged at, so a
//! tree captured from a running application can be replayed by the command-line tools.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trellis_core::{
    ContainerFlags, ControlKey, LayoutError, LayoutFlags, LayoutRect, LayoutTag, Result, Spacing, UNSET_SIZE,
};

use crate::context::LayoutContext;

pub const SNAPSHOT_VERSION: u32 = 1;

fn unset_size() -> Vec2 {
    UNSET_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub key: ControlKey,
    #[serde(default)]
    pub parent: ControlKey,
    #[serde(default)]
    pub container_flags: u32,
    #[serde(default)]
    pub layout_flags: u32,
    #[serde(default)]
    pub margins: Spacing,
    #[serde(default)]
    pub padding: Spacing,
    #[serde(default = "unset_size")]
    pub fixed_size: Vec2,
    #[serde(default = "unset_size")]
    pub minimum_size: Vec2,
    #[serde(default = "unset_size")]
    pub maximum_size: Vec2,
    #[serde(default)]
    pub floating_position: Vec2,
    #[serde(default)]
    pub tag: LayoutTag,
    #[serde(default)]
    pub rect: LayoutRect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub version: u32,
    pub nodes: Vec<NodeSnapshot>,
}

impl LayoutSnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LayoutError::Snapshot(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LayoutError::Snapshot(e.to_string()))
    }
}

impl LayoutContext {
    /// Capture the tree. Controls reachable from the root come first in depth-first order,
    /// so rebuilding in list order restores sibling order; unattached controls follow.
    pub fn snapshot(&self) -> LayoutSnapshot {
        let mut order = self.store.descendants(ControlKey::ROOT);
        let mut attached = vec![false; self.store.len()];
        for key in &order {
            attached[key.index()] = true;
        }
        order.extend(
            (0..self.store.len())
                .map(ControlKey::new)
                .filter(|key| !attached[key.index()]),
        );

        let nodes = order
            .into_iter()
            .map(|key| {
                let record = self.store.node(key);
                NodeSnapshot {
                    key,
                    parent: record.parent,
                    container_flags: record.container_flags.bits(),
                    layout_flags: record.layout_flags.difference(LayoutFlags::INTERNAL).bits(),
                    margins: record.margins,
                    padding: record.padding,
                    fixed_size: record.fixed_size,
                    minimum_size: record.minimum_size,
                    maximum_size: record.maximum_size,
                    floating_position: record.floating_position,
                    tag: record.tag,
                    rect: *self.store.bounds(key),
                }
            })
            .collect();

        LayoutSnapshot { version: SNAPSHOT_VERSION, nodes }
    }

    /// Rebuild a context from a snapshot. Keys must be exactly `0..n` with the root at 0,
    /// and every structural rule of the live API applies.
    pub fn from_snapshot(snapshot: &LayoutSnapshot) -> Result<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LayoutError::Snapshot(format!(
                "unsupported version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }

        let count = snapshot.nodes.len();
        let mut seen = vec![false; count];
        for node in &snapshot.nodes {
            let index = node.key.index();
            if node.key.is_invalid() || index >= count || seen[index] {
                return Err(LayoutError::Snapshot(format!("unexpected key {}", node.key)));
            }
            seen[index] = true;
        }
        if count == 0 {
            return Err(LayoutError::Snapshot("no root control".to_string()));
        }

        let mut ctx = LayoutContext::with_capacity(count);
        for _ in 1..count {
            ctx.create();
        }

        for node in &snapshot.nodes {
            let key = node.key;
            let container_flags = ContainerFlags::from_bits(node.container_flags)
                .ok_or_else(|| LayoutError::Snapshot(format!("unknown container flags on {key}")))?;
            if !container_flags.is_empty() {
                ctx.set_container_flags(key, container_flags)?;
            }
            let layout_flags = LayoutFlags::from_bits(node.layout_flags)
                .ok_or_else(|| LayoutError::Snapshot(format!("unknown layout flags on {key}")))?;
            ctx.set_layout_flags(key, layout_flags)?;
            ctx.set_size(key, node.fixed_size)?;
            ctx.set_minimum_size(key, node.minimum_size)?;
            ctx.set_maximum_size(key, node.maximum_size)?;
            ctx.set_margins(key, node.margins)?;
            ctx.set_padding(key, node.padding)?;
            ctx.set_floating_position(key, node.floating_position)?;
            ctx.set_tag(key, node.tag)?;
            ctx.set_rect(key, node.rect)?;
        }

        for node in &snapshot.nodes {
            if node.parent.is_valid() {
                ctx.insert_at_end(node.parent, node.key)?;
            }
        }

        debug!("Restored layout snapshot with {} controls", count);
        Ok(ctx)
    }

    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.snapshot().to_json()?;
        fs::write(path.as_ref(), json)
            .map_err(|e| LayoutError::Snapshot(format!("{}: {}", path.as_ref().display(), e)))
    }

    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())
            .map_err(|e| LayoutError::Snapshot(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_snapshot(&LayoutSnapshot::from_json(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (LayoutContext, ControlKey, ControlKey, ControlKey) {
        let mut ctx = LayoutContext::new();
        ctx.set_size(ControlKey::ROOT, Vec2::new(200.0, 100.0)).unwrap();
        let row = ctx.create_child(ControlKey::ROOT).unwrap();
        ctx.set_container_flags(row, ContainerFlags::ROW | ContainerFlags::WRAP).unwrap();
        ctx.set_layout_flags(row, LayoutFlags::FILL).unwrap();
        // Sibling order differs from key order on purpose.
        let b = ctx.create();
        let a = ctx.create();
        ctx.insert_at_end(row, b).unwrap();
        ctx.insert_at_start(row, a).unwrap();
        ctx.set_size(a, Vec2::new(120.0, 20.0)).unwrap();
        ctx.set_size(b, Vec2::new(120.0, 20.0)).unwrap();
        ctx.set_margins(b, Spacing::uniform(2.0)).unwrap();
        ctx.update();
        (ctx, row, a, b)
    }

    #[test]
    fn test_snapshot_restores_structure_and_rects() {
        let (ctx, row, a, b) = sample();
        let restored = LayoutContext::from_snapshot(&ctx.snapshot()).unwrap();

        assert_eq!(restored.children(row).collect::<Vec<_>>(), vec![a, b]);
        for key in [ControlKey::ROOT, row, a, b] {
            assert_eq!(restored.rect(key), ctx.rect(key));
        }
        assert_eq!(restored.record(b).unwrap().margins, Spacing::uniform(2.0));
        // Break markers are recomputed, never restored.
        assert!(ctx.layout_flags(b).unwrap().contains(LayoutFlags::BREAK));
        assert!(!restored.layout_flags(b).unwrap().contains(LayoutFlags::BREAK));
        assert!(restored.layout_flags(b).unwrap().contains(LayoutFlags::FIXED_WIDTH));
    }

    #[test]
    fn test_restored_tree_lays_out_identically() {
        let (ctx, ..) = sample();
        let mut restored = LayoutContext::from_snapshot(&ctx.snapshot()).unwrap();
        restored.update();
        assert_eq!(restored.store().rects(), ctx.store().rects());
    }

    #[test]
    fn test_unattached_controls_survive() {
        let mut ctx = LayoutContext::new();
        let loose = ctx.create();
        ctx.set_tag(loose, LayoutTag(42)).unwrap();
        let restored = LayoutContext::from_snapshot(&ctx.snapshot()).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.record(loose).unwrap().tag, LayoutTag(42));
        assert!(restored.record(loose).unwrap().parent.is_invalid());
    }

    #[test]
    fn test_rejects_malformed_snapshots() {
        let (ctx, ..) = sample();

        let mut wrong_version = ctx.snapshot();
        wrong_version.version = 99;
        assert!(matches!(LayoutContext::from_snapshot(&wrong_version), Err(LayoutError::Snapshot(_))));

        let mut duplicate = ctx.snapshot();
        duplicate.nodes[1].key = duplicate.nodes[2].key;
        assert!(matches!(LayoutContext::from_snapshot(&duplicate), Err(LayoutError::Snapshot(_))));

        let mut bad_flags = ctx.snapshot();
        bad_flags.nodes[1].container_flags = (ContainerFlags::ROW | ContainerFlags::COLUMN).bits();
        assert!(matches!(
            LayoutContext::from_snapshot(&bad_flags),
            Err(LayoutError::InvalidContainerFlags(_))
        ));

        let mut root_child = ctx.snapshot();
        root_child.nodes[0].parent = ControlKey(1);
        assert_eq!(LayoutContext::from_snapshot(&root_child).err(), Some(LayoutError::RootInsertion));

        let empty = LayoutSnapshot { version: SNAPSHOT_VERSION, nodes: Vec::new() };
        assert!(LayoutContext::from_snapshot(&empty).is_err());
    }

    #[test]
    fn test_json_uses_defaults_for_missing_fields() {
        let json = r#"{ "version": 1, "nodes": [ { "key": 0, "parent": 4294967295 }, { "key": 1, "parent": 0 } ] }"#;
        let snapshot = LayoutSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.nodes[1].fixed_size, UNSET_SIZE);
        let ctx = LayoutContext::from_snapshot(&snapshot).unwrap();
        assert_eq!(ctx.first_child(ControlKey::ROOT), Ok(ControlKey(1)));
        assert!(LayoutSnapshot::from_json("{").is_err());
    }
}
