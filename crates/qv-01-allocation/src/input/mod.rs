//! Drag/Increment Input Adapter

pub mod drag;
pub mod pointer;

pub use drag::{DragState, InputAdapter, RowView};
pub use pointer::{ContainerRect, RowLayout};
