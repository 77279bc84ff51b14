// crates/trellis-core/src/geometry.rs
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sentinel for an unset size, minimum or maximum. Any negative value counts as unset.
pub const UNSET: f32 = -1.0;

/// Both axes unset.
pub const UNSET_SIZE: Vec2 = Vec2::new(UNSET, UNSET);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Bit distance between the X and Y variants of a per-axis flag.
    pub fn flag_shift(self) -> u32 {
        self.index() as u32 * 2
    }
}

/// True when `value` is a real constraint rather than the unset sentinel.
pub fn is_set(value: f32) -> bool {
    value >= 0.0
}

/// Clamp `value` into `[minimum, maximum]`, ignoring negative bounds.
///
/// The maximum is applied first, so a minimum larger than the maximum wins.
pub fn constrain(value: f32, minimum: f32, maximum: f32) -> f32 {
    let mut result = value;
    if is_set(maximum) {
        result = result.min(maximum);
    }
    if is_set(minimum) {
        result = result.max(minimum);
    }
    result
}

/// Four-sided spacing used for margins and padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Spacing {
    pub const ZERO: Spacing = Spacing { left: 0.0, top: 0.0, right: 0.0, bottom: 0.0 };

    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    /// Leading edge on `axis` (left or top).
    pub fn start(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }

    /// Trailing edge on `axis` (right or bottom).
    pub fn end(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.right,
            Axis::Y => self.bottom,
        }
    }

    pub fn sum(&self, axis: Axis) -> f32 {
        self.start(axis) + self.end(axis)
    }
}

/// Axis-aligned rectangle in absolute layout coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutRect {
    pub position: Vec2,
    pub size: Vec2,
}

impl LayoutRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_vecs(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    pub fn start(&self, axis: Axis) -> f32 {
        self.position[axis.index()]
    }

    pub fn extent(&self, axis: Axis) -> f32 {
        self.size[axis.index()]
    }

    pub fn end(&self, axis: Axis) -> f32 {
        self.start(axis) + self.extent(axis)
    }

    pub fn right(&self) -> f32 {
        self.end(Axis::X)
    }

    pub fn bottom(&self) -> f32 {
        self.end(Axis::Y)
    }

    /// Edges are inclusive.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.position.x
            && point.x <= self.right()
            && point.y >= self.position.y
            && point.y <= self.bottom()
    }

    pub fn union(&self, other: &LayoutRect) -> LayoutRect {
        let min = self.position.min(other.position);
        let max = Vec2::new(self.right(), self.bottom()).max(Vec2::new(other.right(), other.bottom()));
        LayoutRect::from_vecs(min, max - min)
    }

    pub fn intersect(&self, other: &LayoutRect) -> Option<LayoutRect> {
        let min = self.position.max(other.position);
        let max = Vec2::new(self.right(), self.bottom()).min(Vec2::new(other.right(), other.bottom()));
        if min.x < max.x && min.y < max.y {
            Some(LayoutRect::from_vecs(min, max - min))
        } else {
            None
        }
    }

    /// Shrink by `spacing` on every side. Sizes never go negative.
    pub fn inset(&self, spacing: Spacing) -> LayoutRect {
        let position = self.position + Vec2::new(spacing.left, spacing.top);
        let size = (self.size - Vec2::new(spacing.sum(Axis::X), spacing.sum(Axis::Y))).max(Vec2::ZERO);
        LayoutRect::from_vecs(position, size)
    }

    pub fn outset(&self, spacing: Spacing) -> LayoutRect {
        let position = self.position - Vec2::new(spacing.left, spacing.top);
        let size = self.size + Vec2::new(spacing.sum(Axis::X), spacing.sum(Axis::Y));
        LayoutRect::from_vecs(position, size)
    }
}
