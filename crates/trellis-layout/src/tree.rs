// crates/trellis-layout/src/tree.rs
//! Splicing controls into the first-child/next-sibling forest.
//!
//! Only unparented, non-root controls can be inserted. Nothing is ever removed from a
//! tree; the whole store is cleared instead.

use trellis_core::{ControlKey, LayoutError, Result};

use crate::record::RecordStore;

impl RecordStore {
    fn check_insertable(&self, child: ControlKey) -> Result<()> {
        self.validate(child)?;
        if child == ControlKey::ROOT {
            return Err(LayoutError::RootInsertion);
        }
        if self.node(child).parent.is_valid() {
            return Err(LayoutError::AlreadyParented(child));
        }
        Ok(())
    }

    fn check_anchor(&self, anchor: ControlKey, child: ControlKey) -> Result<ControlKey> {
        self.validate(anchor)?;
        self.check_insertable(child)?;
        if anchor == child {
            return Err(LayoutError::SelfInsertion(child));
        }
        let parent = self.node(anchor).parent;
        if parent.is_invalid() {
            return Err(LayoutError::NoParent(anchor));
        }
        Ok(parent)
    }

    /// Append `child` as the last child of `parent`.
    pub fn insert_at_end(&mut self, parent: ControlKey, child: ControlKey) -> Result<()> {
        self.validate(parent)?;
        self.check_insertable(child)?;
        if parent == child {
            return Err(LayoutError::SelfInsertion(child));
        }

        let last = self.node(parent).last_child;
        if last.is_valid() {
            return self.insert_after(last, child);
        }

        let record = self.node_mut(parent);
        record.first_child = child;
        record.last_child = child;
        self.node_mut(child).parent = parent;
        Ok(())
    }

    /// Prepend `child` as the first child of `parent`.
    pub fn insert_at_start(&mut self, parent: ControlKey, child: ControlKey) -> Result<()> {
        self.validate(parent)?;
        let first = self.node(parent).first_child;
        if first.is_valid() {
            self.insert_before(first, child)
        } else {
            self.insert_at_end(parent, child)
        }
    }

    pub fn insert_after(&mut self, previous: ControlKey, child: ControlKey) -> Result<()> {
        let parent = self.check_anchor(previous, child)?;
        let next = self.node(previous).next_sibling;

        {
            let record = self.node_mut(child);
            record.parent = parent;
            record.previous_sibling = previous;
            record.next_sibling = next;
        }
        if next.is_valid() {
            self.node_mut(next).previous_sibling = child;
        } else {
            self.node_mut(parent).last_child = child;
        }
        self.node_mut(previous).next_sibling = child;
        Ok(())
    }

    pub fn insert_before(&mut self, next: ControlKey, child: ControlKey) -> Result<()> {
        let parent = self.check_anchor(next, child)?;
        let previous = self.node(next).previous_sibling;

        {
            let record = self.node_mut(child);
            record.parent = parent;
            record.previous_sibling = previous;
            record.next_sibling = next;
        }
        if previous.is_valid() {
            self.node_mut(previous).next_sibling = child;
        } else {
            self.node_mut(parent).first_child = child;
        }
        self.node_mut(next).previous_sibling = child;
        Ok(())
    }

    /// Children of `key` in sibling order. Yields nothing for an invalid key.
    pub fn children(&self, key: ControlKey) -> Children<'_> {
        let next = if self.contains(key) {
            self.node(key).first_child
        } else {
            ControlKey::INVALID
        };
        Children { store: self, next }
    }

    /// `key` followed by all of its descendants, depth first.
    pub fn descendants(&self, key: ControlKey) -> Vec<ControlKey> {
        let mut result = Vec::new();
        if !self.contains(key) {
            return result;
        }
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            result.push(current);
            let mut child = self.node(current).last_child;
            while child.is_valid() {
                stack.push(child);
                child = self.node(child).previous_sibling;
            }
        }
        result
    }
}

pub struct Children<'a> {
    store: &'a RecordStore,
    next: ControlKey,
}

impl<'a> Iterator for Children<'a> {
    type Item = ControlKey;

    fn next(&mut self) -> Option<ControlKey> {
        let current = self.next.valid()?;
        self.next = self.store.node(current).next_sibling;
        Some(current)
    }
}
