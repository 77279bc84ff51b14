// crates/trellis-layout/src/size.rs
//! Bottom-up size computation, one axis at a time.
//!
//! After `calc_size(key, axis)` every control in the subtree has its extent on `axis`
//! written to its rect and its position set to its leading margin. The arrangement pass
//! turns those positions into absolute coordinates.

use trellis_core::{constrain, Arrangement, Axis, ControlKey, LayoutFlags};

use crate::context::LayoutContext;
use crate::record::RecordStore;

impl LayoutContext {
    pub(crate) fn calc_size(&mut self, key: ControlKey, axis: Axis) {
        let mut child = self.store.node(key).first_child;
        while child.is_valid() {
            self.calc_size(child, axis);
            child = self.store.node(child).next_sibling;
        }

        let d = axis.index();
        if axis == Axis::X && !self.keeps_break(key) {
            // Break markers describe the previous frame's runs.
            self.store.node_mut(key).layout_flags.remove(LayoutFlags::BREAK);
        }

        let record = *self.store.node(key);
        self.store.bounds_mut(key).position[d] = record.margins.start(axis);

        let fixed = record.fixed_size[d];
        if fixed > 0.0 {
            // NOTE: computed_content_size is not refreshed for fixed-size controls, so
            // prevent-crush on them sees whatever was cached before.
            self.store.bounds_mut(key).size[d] = constrain(fixed, record.minimum_size[d], record.maximum_size[d]);
            return;
        }

        let need = match record.arrangement() {
            Arrangement::RowWrap | Arrangement::ColumnWrap => {
                if record.arrangement().primary_axis() == Some(axis) {
                    self.store.wrapped_stacked_size(key, axis)
                } else {
                    self.store.wrapped_overlaid_size(key, axis)
                }
            }
            Arrangement::Row | Arrangement::Column => {
                if record.arrangement().primary_axis() == Some(axis) {
                    self.store.stacked_size(key, axis)
                } else {
                    self.store.overlaid_size(key, axis)
                }
            }
            Arrangement::Free => self.store.overlaid_size(key, axis),
        };

        let content = need + record.padding.sum(axis);
        let record = self.store.node_mut(key);
        record.computed_content_size[d] = content;
        let minimum = record.effective_minimum(axis);
        let maximum = record.maximum(axis);
        self.store.bounds_mut(key).size[d] = constrain(content, minimum, maximum);
    }

    /// Runs of a wrapping column found by the first pass of this update.
    fn keeps_break(&self, key: ControlKey) -> bool {
        let parent = self.store.node(key).parent;
        self.keep_column_breaks
            && parent.is_valid()
            && self.store.node(parent).arrangement() == Arrangement::ColumnWrap
    }
}

impl RecordStore {
    /// Margin box extent of a sized child.
    pub(crate) fn outer_extent(&self, key: ControlKey, axis: Axis) -> f32 {
        let margins = self.node(key).margins;
        margins.start(axis) + self.bounds(key).extent(axis) + margins.end(axis)
    }

    /// How far a floating child reaches into its parent.
    fn floating_extent(&self, key: ControlKey, axis: Axis) -> f32 {
        self.node(key).floating_position[axis.index()] + self.outer_extent(key, axis)
    }

    pub(crate) fn stacked_size(&self, key: ControlKey, axis: Axis) -> f32 {
        let mut total = 0.0f32;
        let mut baseline = 0.0f32;
        for child in self.children(key) {
            let flags = self.node(child).layout_flags;
            if flags.is_floating() {
                baseline = baseline.max(self.floating_extent(child, axis));
            } else if flags.is_stacked() {
                baseline = baseline.max(self.outer_extent(child, axis));
            } else {
                total += self.outer_extent(child, axis);
            }
        }
        total.max(baseline)
    }

    pub(crate) fn overlaid_size(&self, key: ControlKey, axis: Axis) -> f32 {
        let mut need = 0.0f32;
        for child in self.children(key) {
            let extent = if self.node(child).layout_flags.is_floating() {
                self.floating_extent(child, axis)
            } else {
                self.outer_extent(child, axis)
            };
            need = need.max(extent);
        }
        need
    }

    /// Along the wrap axis: the longest run wins.
    pub(crate) fn wrapped_stacked_size(&self, key: ControlKey, axis: Axis) -> f32 {
        let mut need_size_this_block = 0.0f32;
        let mut need_size_total = 0.0f32;
        let mut baseline = 0.0f32;
        for child in self.children(key) {
            let flags = self.node(child).layout_flags;
            if flags.is_floating() {
                baseline = baseline.max(self.floating_extent(child, axis));
                continue;
            }
            if flags.is_stacked() {
                baseline = baseline.max(self.outer_extent(child, axis));
                continue;
            }
            if flags.starts_run() {
                need_size_total = need_size_total.max(need_size_this_block);
                need_size_this_block = 0.0;
            }
            need_size_this_block += self.outer_extent(child, axis);
        }
        need_size_total.max(need_size_this_block).max(baseline)
    }

    /// Across the wrap axis: runs are laid side by side.
    pub(crate) fn wrapped_overlaid_size(&self, key: ControlKey, axis: Axis) -> f32 {
        let mut need_size_this_block = 0.0f32;
        let mut need_size_total = 0.0f32;
        let mut baseline = 0.0f32;
        for child in self.children(key) {
            let flags = self.node(child).layout_flags;
            if flags.is_floating() {
                baseline = baseline.max(self.floating_extent(child, axis));
                continue;
            }
            if flags.in_flow() && flags.starts_run() {
                need_size_total += need_size_this_block;
                need_size_this_block = 0.0;
            }
            need_size_this_block = need_size_this_block.max(self.outer_extent(child, axis));
        }
        (need_size_total + need_size_this_block).max(baseline)
    }
}
