//! # Quadratic Allocation Engine (qv-01)
//!
//! Holds a voter's per-option percentage points and derives the displayed
//! quadratic vote weight from them. Also owns the pointer/button input that
//! edits an allocation.
//!
//! ## Architecture
//!
//! ```text
//!  pointer-down / move / up ──→ ┐
//!                               ├──→ InputAdapter ──→ Allocation (pure)
//!  +/- buttons ───────────────→ ┘        │                 │
//!                                        ↓                 ↓
//!                            PointerListeners     weight_distribution()
//!                            (attach / release)   → Voting Session submit
//! ```
//!
//! ## Domain Invariants
//!
//! | # | Invariant | Description |
//! |---|-----------|-------------|
//! | 1 | Bounded points | Each option holds 0..=100 percentage points |
//! | 2 | Derived weight | `weight = sqrt(percentage)`, never stored independently |
//! | 3 | Budget | Total above 100 is representable but not submittable |
//! | 4 | Locking | While over budget, options at 0% cannot be raised |
//! | 5 | Single drag | At most one row is dragging at a time |
//! | 6 | Listener release | Global listeners are released on drag end and teardown |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Allocation Model (pure transitions)
//! - `input/` - Drag/Increment Input Adapter and pointer geometry
//! - `ports/` - Outbound pointer-listener port
//! - `adapters/` - Counting listener registry for headless hosts and tests
//!
//! ## Usage
//!
//! ```ignore
//! use qv_01_allocation::{Allocation, ContainerRect, InputAdapter, TrackingPointerListeners};
//!
//! let mut alloc = Allocation::seed(&poll.options, prior.map(|p| &p.weight_distribution));
//! let mut input = InputAdapter::new(Arc::new(TrackingPointerListeners::new()), alloc.len());
//!
//! input.pointer_down(&alloc, 0)?;
//! if let Some(next) = input.pointer_move(&alloc, x, &ContainerRect::new(left, width)) {
//!     alloc = next;
//! }
//! input.pointer_up();
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod input;
pub mod ports;

pub use adapters::TrackingPointerListeners;
pub use domain::{quadratic_weight, Allocation, AllocationEntry};
pub use error::{InputError, InputResult};
pub use input::{ContainerRect, DragState, InputAdapter, RowLayout, RowView};
pub use ports::{ListenerHandle, PointerListeners};
