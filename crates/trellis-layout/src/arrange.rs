// crates/trellis-layout/src/arrange.rs
//! Top-down placement, one axis at a time.
//!
//! Sizes coming out of the size pass are treated as requests. Stacking containers build
//! runs of children along their primary axis and hand out leftover space (or take it away),
//! overlays align children inside the full content span. Every control's rect ends up in
//! absolute coordinates.

use tracing::trace;
use trellis_core::{constrain, is_set, Alignment, Anchor, Arrangement, Axis, ControlKey, LayoutFlags};

use crate::context::LayoutContext;
use crate::record::RecordStore;

/// Overflow tolerance when deciding whether a child still fits on the current run.
pub const BREAK_EPSILON: f32 = 0.1;

/// One-dimensional slice of a rect: where a region starts on an axis and how long it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Span {
    pub offset: f32,
    pub space: f32,
}

impl Span {
    pub fn end(&self) -> f32 {
        self.offset + self.space
    }
}

/// A run found by the row builder. `end` is the first child of the next run, or invalid.
#[derive(Debug, Clone, Copy)]
struct StackedRow {
    start: ControlKey,
    end: ControlKey,
    used: f32,
    fillers: u32,
    squeezed: u32,
    total: u32,
}

/// Scratch entry for the two placement passes over a run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowPlacement {
    key: ControlKey,
    size: f32,
    unclamped_filler: bool,
}

impl RecordStore {
    pub(crate) fn content_span(&self, key: ControlKey, axis: Axis) -> Span {
        let content = self.content_bounds(key);
        Span {
            offset: content.start(axis),
            space: content.extent(axis),
        }
    }
}

impl LayoutContext {
    /// Place the children of `key` on `axis`, then recurse. `clip` is the parent's content
    /// span when the parent constrains its children.
    pub(crate) fn arrange(&mut self, key: ControlKey, axis: Axis, clip: Option<Span>) {
        let d = axis.index();
        if let Some(clip) = clip {
            let rect = self.store.bounds_mut(key);
            let limit = (clip.end() - rect.position[d]).max(0.0);
            if rect.size[d] > limit {
                rect.size[d] = limit;
            }
        }

        let record = *self.store.node(key);
        match record.arrangement() {
            // A wrapping column lays its runs out on X from the breaks of the previous
            // Y pass. `update` repeats the passes once when those were not known yet.
            Arrangement::RowWrap | Arrangement::ColumnWrap => {
                if record.arrangement().primary_axis() == Some(axis) {
                    self.arrange_stacked(key, axis, true);
                } else {
                    let span = self.store.content_span(key, axis);
                    self.arrange_wrapped_overlay_squeezed(key, axis, span);
                }
            }
            Arrangement::Row | Arrangement::Column => {
                if record.arrangement().primary_axis() == Some(axis) {
                    self.arrange_stacked(key, axis, false);
                } else {
                    let span = self.store.content_span(key, axis);
                    let constrain_size = record.container_flags.constrains_size();
                    self.arrange_overlay_squeezed_range(axis, record.first_child, ControlKey::INVALID, span, constrain_size);
                }
            }
            Arrangement::Free => self.arrange_overlay(key, axis),
        }

        self.arrange_children(key, axis);
    }

    fn arrange_children(&mut self, key: ControlKey, axis: Axis) {
        let record = *self.store.node(key);
        let span = self.store.content_span(key, axis);
        let clip = record.container_flags.constrains_size().then_some(span);

        let mut child = record.first_child;
        while child.is_valid() {
            if self.store.node(child).layout_flags.is_floating() {
                self.apply_floating_position(child, axis, span);
            }
            self.arrange(child, axis, clip);
            child = self.store.node(child).next_sibling;
        }
    }

    pub(crate) fn apply_floating_position(&mut self, key: ControlKey, axis: Axis, span: Span) {
        let record = *self.store.node(key);
        let d = axis.index();
        let start = record.margins.start(axis);
        let rect = self.store.bounds_mut(key);
        rect.position[d] = span.offset + record.floating_position[d] + start;
        if record.layout_flags.fills(axis) {
            let available = (span.space - record.margins.sum(axis)).max(0.0);
            rect.size[d] = constrain(available, record.effective_minimum(axis), record.maximum(axis));
        }
    }

    /// Free containers: every child aligned on its own inside the content span.
    fn arrange_overlay(&mut self, key: ControlKey, axis: Axis) {
        let span = self.store.content_span(key, axis);
        let d = axis.index();

        let mut child = self.store.node(key).first_child;
        while child.is_valid() {
            let record = *self.store.node(child);
            child = record.next_sibling;
            if record.layout_flags.is_floating() {
                continue;
            }

            let start = record.margins.start(axis);
            let end = record.margins.end(axis);
            let rect = self.store.bounds_mut(record.key);
            let position = match record.layout_flags.anchor(axis) {
                Anchor::Center => start + (span.space - start - end - rect.size[d]) / 2.0,
                Anchor::End => span.space - rect.size[d] - end,
                Anchor::Fill => {
                    let available = (span.space - start - end).max(0.0);
                    rect.size[d] = constrain(available, record.effective_minimum(axis), record.maximum(axis));
                    start
                }
                Anchor::Start => start,
            };
            rect.position[d] = span.offset + position;
        }
    }

    fn arrange_overlay_squeezed_range(
        &mut self,
        axis: Axis,
        start: ControlKey,
        end: ControlKey,
        span: Span,
        constrain_size: bool,
    ) {
        let mut child = start;
        while child != end {
            let record = *self.store.node(child);
            if !record.layout_flags.is_floating() {
                self.place_squeezed(child, axis, span, constrain_size);
            }
            child = record.next_sibling;
        }
    }

    /// Align one child inside `span`, shrinking it to the available space first.
    fn place_squeezed(&mut self, key: ControlKey, axis: Axis, span: Span, constrain_size: bool) {
        let record = *self.store.node(key);
        let d = axis.index();
        let start = record.margins.start(axis);
        let end = record.margins.end(axis);
        let available = (span.space - start - end).max(0.0);
        let anchor = record.layout_flags.anchor(axis);

        let rect = self.store.bounds_mut(key);
        let size = match anchor {
            Anchor::Fill => available,
            _ => rect.size[d].min(available),
        };
        let mut maximum = record.maximum(axis);
        if constrain_size {
            maximum = if is_set(maximum) { maximum.min(available) } else { available };
        }
        let size = constrain(size, record.effective_minimum(axis), maximum);

        let position = match anchor {
            Anchor::Center => start + (available - size) / 2.0,
            Anchor::End => span.space - size - end,
            Anchor::Start | Anchor::Fill => start,
        };
        rect.position[d] = span.offset + position;
        rect.size[d] = size;
    }

    /// Cross-axis placement for wrapping containers. Runs are laid side by side starting
    /// at `span.offset`.
    fn arrange_wrapped_overlay_squeezed(&mut self, key: ControlKey, axis: Axis, span: Span) {
        let constrain_size = self.store.node(key).container_flags.constrains_size();
        let first = self.store.node(key).first_child;

        let mut offset = span.offset;
        let mut need = 0.0f32;
        let mut run_start = first;
        let mut child = first;
        while child.is_valid() {
            let flags = self.store.node(child).layout_flags;
            if !flags.is_floating() {
                if flags.in_flow() && flags.starts_run() && child != run_start {
                    self.arrange_overlay_squeezed_range(axis, run_start, child, Span { offset, space: need }, constrain_size);
                    offset += need;
                    run_start = child;
                    need = 0.0;
                }
                need = need.max(self.store.outer_extent(child, axis));
            }
            child = self.store.node(child).next_sibling;
        }
        self.arrange_overlay_squeezed_range(axis, run_start, ControlKey::INVALID, Span { offset, space: need }, constrain_size);
    }

    fn arrange_stacked(&mut self, key: ControlKey, axis: Axis, wrap: bool) {
        let record = *self.store.node(key);
        let span = self.store.content_span(key, axis);
        let alignment = record.container_flags.alignment();

        if wrap {
            let mut child = record.first_child;
            while child.is_valid() {
                let child_record = self.store.node_mut(child);
                child_record.layout_flags.remove(LayoutFlags::BREAK);
                child = child_record.next_sibling;
            }
        }

        let mut start = record.first_child;
        while start.is_valid() {
            let row = self.build_stacked_row(start, axis, span.space, wrap);
            self.arrange_stacked_row(&row, axis, span, alignment, wrap);
            start = row.end;
        }

        // Stacked children sit on top of the runs and take the whole span.
        let constrain_size = record.container_flags.constrains_size();
        let mut child = record.first_child;
        while child.is_valid() {
            let flags = self.store.node(child).layout_flags;
            if flags.is_stacked() && !flags.is_floating() {
                self.place_squeezed(child, axis, span, constrain_size);
            }
            child = self.store.node(child).next_sibling;
        }
    }

    /// Collect the run starting at `start`. A child that would overflow (or forces a
    /// break) ends the run unless it is the first one on it.
    fn build_stacked_row(&mut self, start: ControlKey, axis: Axis, space: f32, wrap: bool) -> StackedRow {
        let mut row = StackedRow {
            start,
            end: ControlKey::INVALID,
            used: 0.0,
            fillers: 0,
            squeezed: 0,
            total: 0,
        };

        let mut child = start;
        while child.is_valid() {
            let record = *self.store.node(child);
            let flags = record.layout_flags;
            if flags.in_flow() {
                let fills = flags.fills(axis);
                let mut extend = row.used + record.margins.sum(axis);
                if !fills {
                    extend += self.store.bounds(child).extent(axis);
                }

                let forced = flags.contains(LayoutFlags::FORCE_BREAK);
                if wrap && row.total > 0 && (extend > space + BREAK_EPSILON || forced) {
                    row.end = child;
                    self.store.node_mut(child).layout_flags.insert(LayoutFlags::BREAK);
                    if axis == Axis::Y {
                        self.column_runs_found = true;
                    }
                    break;
                }

                if fills {
                    row.fillers += 1;
                } else if !flags.is_fixed(axis) {
                    row.squeezed += 1;
                }
                row.used = extend;
                row.total += 1;
            }
            child = record.next_sibling;
        }
        row
    }

    fn arrange_stacked_row(&mut self, row: &StackedRow, axis: Axis, span: Span, alignment: Alignment, wrap: bool) {
        let d = axis.index();
        let extra = span.space - row.used;

        let mut filler = 0.0f32;
        let mut spacer = 0.0f32;
        let mut extra_margin = 0.0f32;
        let mut eater = 0.0f32;

        if extra > 0.0 {
            if row.fillers > 0 {
                filler = extra / row.fillers as f32;
            } else if row.total > 0 {
                match alignment {
                    Alignment::Justify => {
                        // The last run of a wrapping container is never stretched.
                        if row.total > 1 && (!wrap || row.end.is_valid()) {
                            spacer = extra / (row.total - 1) as f32;
                        }
                    }
                    Alignment::End => extra_margin = extra,
                    Alignment::Center => extra_margin = extra / 2.0,
                    Alignment::Start => {}
                }
            }
        } else if !wrap && row.squeezed > 0 {
            eater = extra / row.squeezed as f32;
        }

        let mut placements = std::mem::take(&mut self.placements);
        placements.clear();

        // Pass 0: ideal sizes and how much the clamps took away from them.
        let mut extra_from_constraints = 0.0f32;
        let mut unclamped_fillers = 0u32;
        let mut child = row.start;
        while child != row.end {
            let record = *self.store.node(child);
            child = record.next_sibling;
            let flags = record.layout_flags;
            if !flags.in_flow() {
                continue;
            }

            let fills = flags.fills(axis);
            let current = self.store.bounds(record.key).size[d];
            let ideal = if fills {
                filler
            } else if flags.is_fixed(axis) {
                current
            } else {
                (current + eater).max(0.0)
            };
            let size = constrain(ideal, record.effective_minimum(axis), record.maximum(axis));
            extra_from_constraints += ideal - size;

            let unclamped_filler = fills && size == ideal;
            if unclamped_filler {
                unclamped_fillers += 1;
            }
            placements.push(RowPlacement {
                key: record.key,
                size,
                unclamped_filler,
            });
        }

        // Pass 1: hand what the clamps freed (or took) to the fillers that were not clamped.
        let share = if unclamped_fillers > 0 {
            extra_from_constraints / unclamped_fillers as f32
        } else {
            0.0
        };
        let mut cursor = span.offset;
        for placement in &placements {
            let record = *self.store.node(placement.key);
            let mut size = placement.size;
            if placement.unclamped_filler && share != 0.0 {
                size = constrain(size + share, record.effective_minimum(axis), record.maximum(axis));
            }
            self.check_constraints(placement.key, axis, size);

            cursor += record.margins.start(axis) + extra_margin;
            let rect = self.store.bounds_mut(placement.key);
            rect.position[d] = cursor;
            rect.size[d] = size;
            cursor += size + record.margins.end(axis);
            extra_margin = spacer;

            if self.debug {
                trace!("Placed {} on {:?}: start {:.1}, size {:.1}", placement.key, axis, rect.position[d], size);
            }
        }

        self.placements = placements;
    }
}
