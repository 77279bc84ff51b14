// crates/trellis-layout/src/context.rs
use std::time::Instant;

use glam::Vec2;
use tracing::debug;
use trellis_core::{
    Axis, ContainerFlags, ControlKey, LayoutFlags, LayoutRect, LayoutTag, Result, Spacing, UNSET,
};

use crate::arrange::RowPlacement;
use crate::record::{LayoutRecord, RecordStore};
use crate::tree::Children;

/// One layout tree plus the scratch space its passes need.
///
/// The tree is meant to be rebuilt every frame: `clear`, create and insert controls, set
/// their flags and constraints, `update`, then read the rects back.
#[derive(Debug)]
pub struct LayoutContext {
    pub(crate) store: RecordStore,
    pub(crate) placements: Vec<RowPlacement>,
    pub(crate) debug: bool,
    /// Set when a wrapping column broke into runs during the current Y pass.
    pub(crate) column_runs_found: bool,
    /// Second pass of an update: wrapping columns keep the runs found by the first.
    pub(crate) keep_column_breaks: bool,
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutContext {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: RecordStore::with_capacity(capacity),
            placements: Vec::new(),
            debug: false,
            column_runs_found: false,
            keep_column_breaks: false,
        }
    }

    /// Log every placement at trace level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn root(&self) -> ControlKey {
        ControlKey::ROOT
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn create(&mut self) -> ControlKey {
        self.store.create()
    }

    /// Create a control and append it to `parent`.
    pub fn create_child(&mut self, parent: ControlKey) -> Result<ControlKey> {
        self.store.validate(parent)?;
        let key = self.store.create();
        self.store.insert_at_end(parent, key)?;
        Ok(key)
    }

    pub fn insert_at_end(&mut self, parent: ControlKey, child: ControlKey) -> Result<()> {
        self.store.insert_at_end(parent, child)
    }

    pub fn insert_at_start(&mut self, parent: ControlKey, child: ControlKey) -> Result<()> {
        self.store.insert_at_start(parent, child)
    }

    pub fn insert_before(&mut self, next: ControlKey, child: ControlKey) -> Result<()> {
        self.store.insert_before(next, child)
    }

    pub fn insert_after(&mut self, previous: ControlKey, child: ControlKey) -> Result<()> {
        self.store.insert_after(previous, child)
    }

    // Setters

    pub fn set_container_flags(&mut self, key: ControlKey, flags: ContainerFlags) -> Result<()> {
        let flags = flags.validate()?;
        self.store.record_mut(key)?.container_flags = flags;
        Ok(())
    }

    /// Replace the caller-owned layout flags. Fixed and break markers are kept.
    pub fn set_layout_flags(&mut self, key: ControlKey, flags: LayoutFlags) -> Result<()> {
        let record = self.store.record_mut(key)?;
        let internal = record.layout_flags & LayoutFlags::INTERNAL;
        record.layout_flags = flags.difference(LayoutFlags::INTERNAL) | internal;
        Ok(())
    }

    /// Fix the size per axis. Components that are zero or negative leave that axis to
    /// the content.
    pub fn set_size(&mut self, key: ControlKey, size: Vec2) -> Result<()> {
        let record = self.store.record_mut(key)?;
        for axis in Axis::ALL {
            let d = axis.index();
            let fixed = LayoutFlags::fixed(axis);
            if size[d] > 0.0 {
                record.fixed_size[d] = size[d];
                record.layout_flags.insert(fixed);
            } else {
                record.fixed_size[d] = UNSET;
                record.layout_flags.remove(fixed);
            }
        }
        Ok(())
    }

    pub fn set_minimum_size(&mut self, key: ControlKey, size: Vec2) -> Result<()> {
        self.store.record_mut(key)?.minimum_size = size;
        Ok(())
    }

    pub fn set_maximum_size(&mut self, key: ControlKey, size: Vec2) -> Result<()> {
        self.store.record_mut(key)?.maximum_size = size;
        Ok(())
    }

    pub fn set_margins(&mut self, key: ControlKey, margins: Spacing) -> Result<()> {
        self.store.record_mut(key)?.margins = margins;
        Ok(())
    }

    pub fn set_padding(&mut self, key: ControlKey, padding: Spacing) -> Result<()> {
        self.store.record_mut(key)?.padding = padding;
        Ok(())
    }

    pub fn set_floating_position(&mut self, key: ControlKey, position: Vec2) -> Result<()> {
        self.store.record_mut(key)?.floating_position = position;
        Ok(())
    }

    pub fn set_tag(&mut self, key: ControlKey, tag: LayoutTag) -> Result<()> {
        self.store.record_mut(key)?.tag = tag;
        Ok(())
    }

    /// Overwrite a rect, e.g. to seed a subtree root before `update_subtree`.
    pub fn set_rect(&mut self, key: ControlKey, rect: LayoutRect) -> Result<()> {
        *self.store.rect_mut(key)? = rect;
        Ok(())
    }

    // Passes

    /// Size and arrange the whole tree, X before Y.
    ///
    /// Wrapping columns only learn their runs while Y is arranged, which is too late for
    /// their width. When any of them broke, the passes run a second time with those runs
    /// kept, so siblings and descendants see the final width on X.
    pub fn update(&mut self) {
        let started = Instant::now();
        let passes = self.run_passes(|ctx| {
            for axis in Axis::ALL {
                ctx.calc_size(ControlKey::ROOT, axis);
                ctx.arrange(ControlKey::ROOT, axis, None);
            }
        });
        debug!("Layout updated: {} controls, {} passes in {:?}", self.store.len(), passes, started.elapsed());
    }

    fn run_passes(&mut self, mut passes: impl FnMut(&mut Self)) -> u32 {
        self.keep_column_breaks = false;
        self.column_runs_found = false;
        passes(self);
        if !self.column_runs_found {
            return 1;
        }

        self.keep_column_breaks = true;
        passes(self);
        self.keep_column_breaks = false;
        2
    }

    /// Re-run layout for the subtree under `key` only.
    ///
    /// The subtree root keeps the position it was given by its parent's last arrangement,
    /// unless it floats, in which case it is floated against the parent's content rect.
    pub fn update_subtree(&mut self, key: ControlKey) -> Result<()> {
        self.store.validate(key)?;
        let started = Instant::now();
        let had_break = self.store.node(key).layout_flags.contains(LayoutFlags::BREAK);
        let parent = self.store.node(key).parent;

        let passes = self.run_passes(|ctx| {
            for axis in Axis::ALL {
                let d = axis.index();
                let previous = ctx.store.bounds(key).position[d];
                ctx.calc_size(key, axis);

                let mut clip = None;
                if parent.is_valid() {
                    let span = ctx.store.content_span(parent, axis);
                    if ctx.store.node(key).layout_flags.is_floating() {
                        ctx.apply_floating_position(key, axis, span);
                    } else {
                        ctx.store.bounds_mut(key).position[d] = previous;
                    }
                    if ctx.store.node(parent).container_flags.constrains_size() {
                        clip = Some(span);
                    }
                }
                ctx.arrange(key, axis, clip);
            }
        });

        // The break marker belongs to the parent's runs, which were not rebuilt.
        self.store.node_mut(key).layout_flags.set(LayoutFlags::BREAK, had_break);

        debug!("Subtree {} updated, {} passes in {:?}", key, passes, started.elapsed());
        Ok(())
    }

    // Reads

    pub fn record(&self, key: ControlKey) -> Result<&LayoutRecord> {
        self.store.record(key)
    }

    pub fn rect(&self, key: ControlKey) -> Result<LayoutRect> {
        self.store.rect(key)
    }

    /// Rect minus padding.
    pub fn content_rect(&self, key: ControlKey) -> Result<LayoutRect> {
        self.store.validate(key)?;
        Ok(self.store.content_bounds(key))
    }

    pub fn computed_content_size(&self, key: ControlKey) -> Result<Vec2> {
        Ok(self.store.record(key)?.computed_content_size)
    }

    pub fn container_flags(&self, key: ControlKey) -> Result<ContainerFlags> {
        Ok(self.store.record(key)?.container_flags)
    }

    pub fn layout_flags(&self, key: ControlKey) -> Result<LayoutFlags> {
        Ok(self.store.record(key)?.layout_flags)
    }

    pub fn parent(&self, key: ControlKey) -> Result<ControlKey> {
        Ok(self.store.record(key)?.parent)
    }

    pub fn first_child(&self, key: ControlKey) -> Result<ControlKey> {
        Ok(self.store.record(key)?.first_child)
    }

    pub fn last_child(&self, key: ControlKey) -> Result<ControlKey> {
        Ok(self.store.record(key)?.last_child)
    }

    pub fn previous_sibling(&self, key: ControlKey) -> Result<ControlKey> {
        Ok(self.store.record(key)?.previous_sibling)
    }

    pub fn next_sibling(&self, key: ControlKey) -> Result<ControlKey> {
        Ok(self.store.record(key)?.next_sibling)
    }

    pub fn children(&self, key: ControlKey) -> Children<'_> {
        self.store.children(key)
    }
}
