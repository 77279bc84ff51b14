// crates/trellis-layout/src/constraints.rs
use trellis_core::{is_set, Axis, ControlKey, LayoutError, Result};

use crate::context::LayoutContext;
use crate::record::LayoutRecord;

/// How far a size may drift past its bounds before it counts as a violation.
pub const CONSTRAINT_EPSILON: f32 = 0.5;

/// Bounds `size` breaks, if any. A minimum above the maximum wins, like in `constrain`.
fn violated_bounds(record: &LayoutRecord, axis: Axis, size: f32) -> Option<(f32, f32)> {
    let minimum = record.effective_minimum(axis);
    let maximum = record.maximum(axis);
    let too_small = is_set(minimum) && size < minimum - CONSTRAINT_EPSILON;
    let too_large = is_set(maximum) && maximum >= minimum && size > maximum + CONSTRAINT_EPSILON;
    (too_small || too_large).then_some((minimum, maximum))
}

impl LayoutContext {
    #[cfg(any(debug_assertions, feature = "check-constraints"))]
    pub(crate) fn check_constraints(&self, key: ControlKey, axis: Axis, size: f32) {
        if let Some((minimum, maximum)) = violated_bounds(self.store.node(key), axis, size) {
            panic!("control {key} placed with {axis:?} size {size} outside [{minimum}, {maximum}]");
        }
    }

    #[cfg(not(any(debug_assertions, feature = "check-constraints")))]
    #[inline(always)]
    pub(crate) fn check_constraints(&self, _key: ControlKey, _axis: Axis, _size: f32) {}

    /// Check every attached control against its minimum and maximum size.
    ///
    /// Children of `CONSTRAIN_SIZE` containers are skipped since their parent is allowed
    /// to clip them below their minimum.
    pub fn verify_constraints(&self) -> Result<()> {
        for key in self.store.descendants(ControlKey::ROOT) {
            let record = self.store.node(key);
            if record.parent.is_valid() && self.store.node(record.parent).container_flags.constrains_size() {
                continue;
            }
            for axis in Axis::ALL {
                let size = self.store.bounds(key).extent(axis);
                if let Some((minimum, maximum)) = violated_bounds(record, axis, size) {
                    return Err(LayoutError::ConstraintViolation { key, axis, size, minimum, maximum });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use trellis_core::{ContainerFlags, LayoutRect};

    use super::*;

    #[test]
    fn test_bounds_with_epsilon() {
        let mut record = LayoutRecord::new(ControlKey(1));
        record.minimum_size = Vec2::new(50.0, -1.0);
        record.maximum_size = Vec2::new(100.0, 20.0);

        assert_eq!(violated_bounds(&record, Axis::X, 49.6), None);
        assert_eq!(violated_bounds(&record, Axis::X, 49.0), Some((50.0, 100.0)));
        assert_eq!(violated_bounds(&record, Axis::X, 100.4), None);
        assert_eq!(violated_bounds(&record, Axis::Y, 21.0), Some((-1.0, 20.0)));
        assert_eq!(violated_bounds(&record, Axis::Y, 0.0), None);
    }

    #[test]
    fn test_minimum_above_maximum_only_checks_minimum() {
        let mut record = LayoutRecord::new(ControlKey(1));
        record.minimum_size = Vec2::new(80.0, -1.0);
        record.maximum_size = Vec2::new(30.0, -1.0);
        assert_eq!(violated_bounds(&record, Axis::X, 80.0), None);
    }

    #[test]
    fn test_verify_reports_tampered_rect() {
        let mut ctx = LayoutContext::new();
        let key = ctx.create_child(ControlKey::ROOT).unwrap();
        ctx.set_maximum_size(key, Vec2::new(40.0, -1.0)).unwrap();
        ctx.update();
        assert_eq!(ctx.verify_constraints(), Ok(()));

        ctx.set_rect(key, LayoutRect::new(0.0, 0.0, 60.0, 10.0)).unwrap();
        assert_eq!(
            ctx.verify_constraints(),
            Err(LayoutError::ConstraintViolation {
                key,
                axis: Axis::X,
                size: 60.0,
                minimum: -1.0,
                maximum: 40.0,
            })
        );
    }

    #[test]
    fn test_verify_skips_clipped_children() {
        let mut ctx = LayoutContext::new();
        let clip = ctx.create_child(ControlKey::ROOT).unwrap();
        ctx.set_container_flags(clip, ContainerFlags::ROW | ContainerFlags::CONSTRAIN_SIZE).unwrap();
        ctx.set_size(clip, Vec2::new(20.0, 20.0)).unwrap();
        let child = ctx.create_child(clip).unwrap();
        ctx.set_minimum_size(child, Vec2::new(50.0, -1.0)).unwrap();
        ctx.update();

        assert!(ctx.rect(child).unwrap().size.x < 50.0);
        assert_eq!(ctx.verify_constraints(), Ok(()));
    }
}
