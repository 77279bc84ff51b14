// crates/trellis-layout/src/record.rs
use glam::Vec2;
use trellis_core::{
    Arrangement, Axis, ContainerFlags, ControlKey, LayoutError, LayoutFlags, LayoutRect, LayoutTag,
    Result, Spacing, UNSET_SIZE,
};

/// Everything the layout passes know about one control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRecord {
    pub key: ControlKey,
    pub container_flags: ContainerFlags,
    pub layout_flags: LayoutFlags,

    pub parent: ControlKey,
    pub first_child: ControlKey,
    pub last_child: ControlKey,
    pub previous_sibling: ControlKey,
    pub next_sibling: ControlKey,

    pub margins: Spacing,
    pub padding: Spacing,

    // Negative components are unset.
    pub fixed_size: Vec2,
    pub minimum_size: Vec2,
    pub maximum_size: Vec2,

    /// Offset inside the parent's content rect, used only with `LayoutFlags::FLOATING`.
    pub floating_position: Vec2,
    /// Content size from the last size pass, padding included.
    pub computed_content_size: Vec2,

    pub tag: LayoutTag,
}

impl LayoutRecord {
    pub fn new(key: ControlKey) -> Self {
        Self {
            key,
            container_flags: ContainerFlags::empty(),
            layout_flags: LayoutFlags::empty(),
            parent: ControlKey::INVALID,
            first_child: ControlKey::INVALID,
            last_child: ControlKey::INVALID,
            previous_sibling: ControlKey::INVALID,
            next_sibling: ControlKey::INVALID,
            margins: Spacing::ZERO,
            padding: Spacing::ZERO,
            fixed_size: UNSET_SIZE,
            minimum_size: UNSET_SIZE,
            maximum_size: UNSET_SIZE,
            floating_position: Vec2::ZERO,
            computed_content_size: Vec2::ZERO,
            tag: LayoutTag::NONE,
        }
    }

    pub fn arrangement(&self) -> Arrangement {
        self.container_flags.arrangement()
    }

    /// Minimum on `axis`, raised to the content size when the control prevents crushing.
    pub fn effective_minimum(&self, axis: Axis) -> f32 {
        let minimum = self.minimum_size[axis.index()];
        if self.container_flags.prevents_crush(axis) {
            minimum.max(self.computed_content_size[axis.index()])
        } else {
            minimum
        }
    }

    pub fn maximum(&self, axis: Axis) -> f32 {
        self.maximum_size[axis.index()]
    }

    pub fn has_children(&self) -> bool {
        self.first_child.is_valid()
    }
}

/// Flat storage for one layout tree: records and rects, indexed by key in lockstep.
#[derive(Debug, Clone)]
pub struct RecordStore {
    pub(crate) records: Vec<LayoutRecord>,
    pub(crate) rects: Vec<LayoutRect>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut store = Self {
            records: Vec::with_capacity(capacity.max(1)),
            rects: Vec::with_capacity(capacity.max(1)),
        };
        store.push_root();
        store
    }

    fn push_root(&mut self) {
        let mut root = LayoutRecord::new(ControlKey::ROOT);
        root.tag = LayoutTag::ROOT;
        self.records.push(root);
        self.rects.push(LayoutRect::default());
    }

    /// Drop every control except a freshly reset root.
    pub fn clear(&mut self) {
        self.records.clear();
        self.rects.clear();
        self.push_root();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Never true, the root always exists.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Allocate the next slot. The new control has no parent and no layout settings.
    pub fn create(&mut self) -> ControlKey {
        let key = ControlKey::new(self.records.len());
        self.records.push(LayoutRecord::new(key));
        self.rects.push(LayoutRect::default());
        key
    }

    pub fn contains(&self, key: ControlKey) -> bool {
        key.is_valid() && key.index() < self.records.len()
    }

    pub fn validate(&self, key: ControlKey) -> Result<ControlKey> {
        if self.contains(key) {
            Ok(key)
        } else {
            Err(LayoutError::InvalidKey(key))
        }
    }

    pub fn record(&self, key: ControlKey) -> Result<&LayoutRecord> {
        self.validate(key)?;
        Ok(&self.records[key.index()])
    }

    pub fn record_mut(&mut self, key: ControlKey) -> Result<&mut LayoutRecord> {
        self.validate(key)?;
        Ok(&mut self.records[key.index()])
    }

    pub fn rect(&self, key: ControlKey) -> Result<LayoutRect> {
        self.validate(key)?;
        Ok(self.rects[key.index()])
    }

    pub fn rect_mut(&mut self, key: ControlKey) -> Result<&mut LayoutRect> {
        self.validate(key)?;
        Ok(&mut self.rects[key.index()])
    }

    pub fn records(&self) -> &[LayoutRecord] {
        &self.records
    }

    pub fn rects(&self) -> &[LayoutRect] {
        &self.rects
    }

    // Unchecked accessors for the passes. Keys reaching them were validated when they
    // entered the tree.

    pub(crate) fn node(&self, key: ControlKey) -> &LayoutRecord {
        &self.records[key.index()]
    }

    pub(crate) fn node_mut(&mut self, key: ControlKey) -> &mut LayoutRecord {
        &mut self.records[key.index()]
    }

    pub(crate) fn bounds(&self, key: ControlKey) -> &LayoutRect {
        &self.rects[key.index()]
    }

    pub(crate) fn bounds_mut(&mut self, key: ControlKey) -> &mut LayoutRect {
        &mut self.rects[key.index()]
    }

    /// Rect minus padding, the space children are arranged in.
    pub(crate) fn content_bounds(&self, key: ControlKey) -> LayoutRect {
        self.bounds(key).inset(self.node(key).padding)
    }
}
