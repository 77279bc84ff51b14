// crates/trellis-core/src/lib.rs
pub mod key;
pub mod geometry;
pub mod flags;

pub use key::*;
pub use geometry::*;
pub use flags::*;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LayoutError {
    #[error("Invalid control key: {0}")]
    InvalidKey(ControlKey),

    #[error("Control {0} already has a parent")]
    AlreadyParented(ControlKey),

    #[error("The root control cannot be inserted into the tree")]
    RootInsertion,

    #[error("Control {0} cannot be inserted relative to itself")]
    SelfInsertion(ControlKey),

    #[error("Control {0} has no parent to insert a sibling under")]
    NoParent(ControlKey),

    #[error("Container flags must contain exactly one of Row or Column, got {0:?}")]
    InvalidContainerFlags(ContainerFlags),

    #[error("Control {key} violates its {axis:?} constraints: size {size} outside [{minimum}, {maximum}]")]
    ConstraintViolation {
        key: ControlKey,
        axis: Axis,
        size: f32,
        minimum: f32,
        maximum: f32,
    },

    #[error("Invalid layout snapshot: {0}")]
    Snapshot(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
