// crates/trellis-core/src/flags.rs
use bitflags::bitflags;

use crate::{Axis, LayoutError, Result};

bitflags! {
    /// How a control arranges its own children.
    ///
    /// Exactly one of `ROW`/`COLUMN` must be present once a control is configured as a
    /// container. A control whose container flags were never written is a free container
    /// and overlays its children.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ContainerFlags: u32 {
        const ROW = 1 << 0;
        const COLUMN = 1 << 1;
        const WRAP = 1 << 2;
        const ALIGN_START = 1 << 3;
        const ALIGN_END = 1 << 4;
        const ALIGN_JUSTIFY = Self::ALIGN_START.bits() | Self::ALIGN_END.bits();
        /// Children are clipped to this control's content rect.
        const CONSTRAIN_SIZE = 1 << 5;
        const PREVENT_CRUSH_X = 1 << 6;
        const PREVENT_CRUSH_Y = 1 << 8;
    }
}

bitflags! {
    /// How a control sits inside its parent.
    ///
    /// Per-axis bits come in pairs and the Y pair sits two bits above the X pair, so
    /// shifting by [`Axis::flag_shift`] turns a Y query into an X one.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayoutFlags: u32 {
        const ANCHOR_LEFT = 1 << 0;
        const ANCHOR_RIGHT = 1 << 1;
        const ANCHOR_TOP = 1 << 2;
        const ANCHOR_BOTTOM = 1 << 3;
        const FILL_ROW = Self::ANCHOR_LEFT.bits() | Self::ANCHOR_RIGHT.bits();
        const FILL_COLUMN = Self::ANCHOR_TOP.bits() | Self::ANCHOR_BOTTOM.bits();
        const FILL = Self::FILL_ROW.bits() | Self::FILL_COLUMN.bits();

        // Maintained from the fixed size.
        const FIXED_WIDTH = 1 << 4;
        const FIXED_HEIGHT = 1 << 6;

        /// Always start a new run at this control when the parent wraps.
        const FORCE_BREAK = 1 << 8;
        /// Written by the row builder where a run ended.
        const BREAK = 1 << 9;
        const FLOATING = 1 << 10;
        const STACKED = 1 << 11;

        const INTERNAL = Self::FIXED_WIDTH.bits() | Self::FIXED_HEIGHT.bits() | Self::BREAK.bits();
    }
}

/// Box model selected by a control's container flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    Free,
    Row,
    Column,
    RowWrap,
    ColumnWrap,
}

impl Arrangement {
    /// Axis children are stacked along, `None` for free containers.
    pub fn primary_axis(self) -> Option<Axis> {
        match self {
            Arrangement::Row | Arrangement::RowWrap => Some(Axis::X),
            Arrangement::Column | Arrangement::ColumnWrap => Some(Axis::Y),
            Arrangement::Free => None,
        }
    }

    pub fn wraps(self) -> bool {
        matches!(self, Arrangement::RowWrap | Arrangement::ColumnWrap)
    }
}

/// Main-axis distribution of leftover space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Center,
    Start,
    End,
    Justify,
}

/// Placement of a child on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    Start,
    End,
    Fill,
}

impl ContainerFlags {
    pub fn arrangement(self) -> Arrangement {
        let wrap = self.contains(ContainerFlags::WRAP);
        match (self.contains(ContainerFlags::ROW), self.contains(ContainerFlags::COLUMN)) {
            (true, false) if wrap => Arrangement::RowWrap,
            (true, false) => Arrangement::Row,
            (false, true) if wrap => Arrangement::ColumnWrap,
            (false, true) => Arrangement::Column,
            _ => Arrangement::Free,
        }
    }

    pub fn alignment(self) -> Alignment {
        let start = self.contains(ContainerFlags::ALIGN_START);
        let end = self.contains(ContainerFlags::ALIGN_END);
        match (start, end) {
            (true, true) => Alignment::Justify,
            (true, false) => Alignment::Start,
            (false, true) => Alignment::End,
            (false, false) => Alignment::Center,
        }
    }

    pub fn prevents_crush(self, axis: Axis) -> bool {
        let flag = ContainerFlags::from_bits_retain(ContainerFlags::PREVENT_CRUSH_X.bits() << axis.flag_shift());
        self.contains(flag)
    }

    pub fn constrains_size(self) -> bool {
        self.contains(ContainerFlags::CONSTRAIN_SIZE)
    }

    /// Reject flag words that name both or neither of Row and Column.
    pub fn validate(self) -> Result<Self> {
        if self.contains(ContainerFlags::ROW) == self.contains(ContainerFlags::COLUMN) {
            return Err(LayoutError::InvalidContainerFlags(self));
        }
        Ok(self)
    }
}

impl LayoutFlags {
    const AXIS_MASK: LayoutFlags = LayoutFlags::from_bits_retain(
        LayoutFlags::FILL_ROW.bits() | LayoutFlags::FIXED_WIDTH.bits(),
    );

    /// Per-axis bits for `axis`, moved to their X positions.
    pub fn on_axis(self, axis: Axis) -> LayoutFlags {
        LayoutFlags::from_bits_retain(self.bits() >> axis.flag_shift()) & Self::AXIS_MASK
    }

    pub fn fixed(axis: Axis) -> LayoutFlags {
        LayoutFlags::from_bits_retain(LayoutFlags::FIXED_WIDTH.bits() << axis.flag_shift())
    }

    pub fn anchor(self, axis: Axis) -> Anchor {
        let flags = self.on_axis(axis);
        match (flags.contains(LayoutFlags::ANCHOR_LEFT), flags.contains(LayoutFlags::ANCHOR_RIGHT)) {
            (true, true) => Anchor::Fill,
            (true, false) => Anchor::Start,
            (false, true) => Anchor::End,
            (false, false) => Anchor::Center,
        }
    }

    pub fn fills(self, axis: Axis) -> bool {
        self.anchor(axis) == Anchor::Fill
    }

    pub fn is_fixed(self, axis: Axis) -> bool {
        self.on_axis(axis).contains(LayoutFlags::FIXED_WIDTH)
    }

    pub fn is_floating(self) -> bool {
        self.contains(LayoutFlags::FLOATING)
    }

    pub fn is_stacked(self) -> bool {
        self.contains(LayoutFlags::STACKED)
    }

    /// Whether a run starts at this control, forced or found by the row builder.
    pub fn starts_run(self) -> bool {
        self.intersects(LayoutFlags::FORCE_BREAK | LayoutFlags::BREAK)
    }

    /// Floating and stacked controls never take part in row building.
    pub fn in_flow(self) -> bool {
        !self.intersects(LayoutFlags::FLOATING | LayoutFlags::STACKED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrangement_dispatch() {
        assert_eq!(ContainerFlags::empty().arrangement(), Arrangement::Free);
        assert_eq!(ContainerFlags::ROW.arrangement(), Arrangement::Row);
        assert_eq!((ContainerFlags::COLUMN | ContainerFlags::WRAP).arrangement(), Arrangement::ColumnWrap);
        assert_eq!((ContainerFlags::ROW | ContainerFlags::COLUMN).arrangement(), Arrangement::Free);
        assert_eq!(Arrangement::RowWrap.primary_axis(), Some(Axis::X));
        assert_eq!(Arrangement::Free.primary_axis(), None);
    }

    #[test]
    fn test_validate_requires_one_direction() {
        assert!(ContainerFlags::ROW.validate().is_ok());
        assert!((ContainerFlags::COLUMN | ContainerFlags::ALIGN_END).validate().is_ok());
        assert_eq!(
            ContainerFlags::WRAP.validate(),
            Err(LayoutError::InvalidContainerFlags(ContainerFlags::WRAP))
        );
        assert!((ContainerFlags::ROW | ContainerFlags::COLUMN).validate().is_err());
    }

    #[test]
    fn test_alignment_bits() {
        assert_eq!(ContainerFlags::ROW.alignment(), Alignment::Center);
        assert_eq!((ContainerFlags::ROW | ContainerFlags::ALIGN_START).alignment(), Alignment::Start);
        assert_eq!((ContainerFlags::ROW | ContainerFlags::ALIGN_END).alignment(), Alignment::End);
        assert_eq!((ContainerFlags::ROW | ContainerFlags::ALIGN_JUSTIFY).alignment(), Alignment::Justify);
    }

    #[test]
    fn test_axis_shift_reads_y_pair() {
        let flags = LayoutFlags::ANCHOR_BOTTOM | LayoutFlags::FIXED_HEIGHT;
        assert_eq!(flags.on_axis(Axis::Y), LayoutFlags::ANCHOR_RIGHT | LayoutFlags::FIXED_WIDTH);
        assert_eq!(flags.on_axis(Axis::X), LayoutFlags::empty());
        assert_eq!(flags.anchor(Axis::Y), Anchor::End);
        assert_eq!(flags.anchor(Axis::X), Anchor::Center);
        assert!(flags.is_fixed(Axis::Y));
        assert!(!flags.is_fixed(Axis::X));
    }

    #[test]
    fn test_fill_and_prevent_crush_per_axis() {
        let flags = LayoutFlags::FILL_COLUMN | LayoutFlags::ANCHOR_LEFT;
        assert!(flags.fills(Axis::Y));
        assert_eq!(flags.anchor(Axis::X), Anchor::Start);
        assert_eq!(LayoutFlags::fixed(Axis::Y), LayoutFlags::FIXED_HEIGHT);

        let container = ContainerFlags::COLUMN | ContainerFlags::PREVENT_CRUSH_Y;
        assert!(container.prevents_crush(Axis::Y));
        assert!(!container.prevents_crush(Axis::X));
    }
}
