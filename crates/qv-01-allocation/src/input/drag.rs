//! Drag/Increment Input Adapter
//!
//! Turns pointer drags and +/- presses into Allocation Model calls.
//!
//! ## Row State Machine
//!
//! ```text
//! [Idle] ──pointer-down on handle──→ [Dragging]   (listeners attached)
//!                                       │  ↺ pointer-move: set_percentage
//!   ↑                                   │
//!   └──── pointer-up anywhere / cancel ─┘         (listeners released)
//! ```
//!
//! At most one row is `Dragging`. Pointer moves are routed to the row found
//! by scanning for the dragging state. The +/- buttons bypass the state
//! machine and call the model directly.

use crate::domain::Allocation;
use crate::error::{InputError, InputResult};
use crate::input::pointer::RowLayout;
use crate::ports::outbound::{ListenerHandle, PointerListeners};
use serde::Serialize;
use shared_types::MAX_PERCENTAGE;
use std::sync::Arc;
use tracing::{debug, trace};

/// Per-row drag state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Everything a view needs to render one allocation row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RowView {
    pub label: String,
    pub percentage: u8,
    pub weight: f64,
    pub is_dragging: bool,
    pub is_locked: bool,
    pub can_increment: bool,
    pub can_decrement: bool,
}

/// Input adapter for one voting view.
///
/// Owns the global-listener registration while a drag is active; dropping
/// the adapter (view teardown) releases it.
pub struct InputAdapter<L: PointerListeners> {
    listeners: Arc<L>,
    rows: Vec<DragState>,
    capture: Option<ListenerHandle>,
}

impl<L: PointerListeners> InputAdapter<L> {
    pub fn new(listeners: Arc<L>, rows: usize) -> Self {
        Self {
            listeners,
            rows: vec![DragState::Idle; rows],
            capture: None,
        }
    }

    /// Resize for a freshly seeded allocation. Cancels any active drag.
    pub fn reset_rows(&mut self, rows: usize) {
        self.cancel();
        self.rows = vec![DragState::Idle; rows];
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn state(&self, row: usize) -> DragState {
        self.rows.get(row).copied().unwrap_or_default()
    }

    pub fn is_dragging(&self, row: usize) -> bool {
        self.state(row) == DragState::Dragging
    }

    /// Row currently owning the pointer.
    pub fn dragging_row(&self) -> Option<usize> {
        self.rows.iter().position(|s| *s == DragState::Dragging)
    }

    pub fn has_active_capture(&self) -> bool {
        self.capture.is_some()
    }

    /// Pointer pressed on `row`'s drag handle.
    pub fn pointer_down(&mut self, allocation: &Allocation, row: usize) -> InputResult<()> {
        if row >= self.rows.len() || row >= allocation.len() {
            return Err(InputError::RowOutOfRange {
                row,
                rows: self.rows.len(),
            });
        }

        match self.dragging_row() {
            Some(active) if active == row => return Ok(()),
            Some(active) => return Err(InputError::DragInProgress { active }),
            None => {}
        }

        if allocation.is_option_locked(row) {
            return Err(InputError::RowLocked { row });
        }

        self.rows[row] = DragState::Dragging;
        self.capture = Some(self.listeners.attach());
        debug!(row, "drag started");
        Ok(())
    }

    /// Global pointer move.
    ///
    /// Returns the updated allocation, or `None` when no row is dragging, the
    /// row has no layout, the container is collapsed, or the value did not
    /// change.
    pub fn pointer_move<R>(
        &mut self,
        allocation: &Allocation,
        pointer_x: f64,
        layout: &R,
    ) -> Option<Allocation>
    where
        R: RowLayout + ?Sized,
    {
        let row = self.dragging_row()?;
        if row >= allocation.len() {
            return None;
        }

        let percentage = layout.container_rect(row)?.percentage_at(pointer_x)?;
        if allocation.entry(row).percentage() == percentage {
            return None;
        }

        trace!(row, percentage, "drag move");
        Some(allocation.set_percentage(row, i32::from(percentage)))
    }

    /// Global pointer release; ends any drag.
    pub fn pointer_up(&mut self) {
        if let Some(row) = self.dragging_row() {
            debug!(row, "drag ended");
        }
        self.release();
    }

    /// Abort a drag without a pointer-up (view transition, focus loss).
    pub fn cancel(&mut self) {
        if let Some(row) = self.dragging_row() {
            debug!(row, "drag cancelled");
        }
        self.release();
    }

    fn release(&mut self) {
        for state in &mut self.rows {
            *state = DragState::Idle;
        }
        // Dropping the handle detaches the global listeners.
        self.capture = None;
    }

    /// `+` button enabled: below 100 and not locked.
    pub fn can_increment(&self, allocation: &Allocation, row: usize) -> bool {
        row < allocation.len()
            && allocation.entry(row).percentage() < MAX_PERCENTAGE
            && !allocation.is_option_locked(row)
    }

    /// `-` button enabled: above 0.
    pub fn can_decrement(&self, allocation: &Allocation, row: usize) -> bool {
        row < allocation.len() && allocation.entry(row).percentage() > 0
    }

    /// `+` pressed. A disabled button leaves the allocation unchanged.
    pub fn increment(&self, allocation: &Allocation, row: usize) -> Allocation {
        if !self.can_increment(allocation, row) {
            return allocation.clone();
        }
        allocation.increment(row)
    }

    /// `-` pressed. A disabled button leaves the allocation unchanged.
    pub fn decrement(&self, allocation: &Allocation, row: usize) -> Allocation {
        if !self.can_decrement(allocation, row) {
            return allocation.clone();
        }
        allocation.decrement(row)
    }

    pub fn row_view(&self, allocation: &Allocation, row: usize) -> RowView {
        let entry = allocation.entry(row);
        RowView {
            label: entry.option().label.clone(),
            percentage: entry.percentage(),
            weight: entry.weight(),
            is_dragging: self.is_dragging(row),
            is_locked: allocation.is_option_locked(row),
            can_increment: self.can_increment(allocation, row),
            can_decrement: self.can_decrement(allocation, row),
        }
    }

    pub fn row_views(&self, allocation: &Allocation) -> Vec<RowView> {
        (0..allocation.len())
            .map(|row| self.row_view(allocation, row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TrackingPointerListeners;
    use crate::input::pointer::ContainerRect;
    use shared_types::PollOption;

    fn setup(labels: &[&str]) -> (InputAdapter<TrackingPointerListeners>, TrackingPointerListeners, Allocation) {
        let listeners = TrackingPointerListeners::new();
        let options: Vec<PollOption> = labels.iter().map(|l| PollOption::from_label(*l)).collect();
        let alloc = Allocation::seed(&options, None);
        let adapter = InputAdapter::new(Arc::new(listeners.clone()), options.len());
        (adapter, listeners, alloc)
    }

    #[test]
    fn test_drag_lifecycle_attaches_and_releases_listeners() {
        let (mut input, listeners, alloc) = setup(&["A", "B"]);

        input.pointer_down(&alloc, 0).unwrap();
        assert!(input.is_dragging(0));
        assert_eq!(listeners.active(), 1);

        let rect = ContainerRect::new(0.0, 200.0);
        let alloc = input.pointer_move(&alloc, 120.0, &rect).unwrap();
        assert_eq!(alloc.entry(0).percentage(), 60);

        input.pointer_up();
        assert_eq!(input.dragging_row(), None);
        assert_eq!(listeners.active(), 0);
    }

    #[test]
    fn test_move_tracks_outside_the_row() {
        let (mut input, _listeners, alloc) = setup(&["A"]);
        input.pointer_down(&alloc, 0).unwrap();

        let rect = ContainerRect::new(50.0, 100.0);
        let far_right = input.pointer_move(&alloc, 10_000.0, &rect).unwrap();
        assert_eq!(far_right.entry(0).percentage(), 100);

        let far_left = input.pointer_move(&far_right, -10_000.0, &rect).unwrap();
        assert_eq!(far_left.entry(0).percentage(), 0);
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let (mut input, _listeners, alloc) = setup(&["A"]);
        let rect = ContainerRect::new(0.0, 100.0);
        assert!(input.pointer_move(&alloc, 40.0, &rect).is_none());
    }

    #[test]
    fn test_move_routes_to_dragging_row_only() {
        let (mut input, _listeners, alloc) = setup(&["A", "B"]);
        input.pointer_down(&alloc, 1).unwrap();

        let layout = vec![ContainerRect::new(0.0, 100.0), ContainerRect::new(0.0, 50.0)];
        let alloc = input.pointer_move(&alloc, 25.0, &layout).unwrap();

        assert_eq!(alloc.entry(0).percentage(), 0);
        assert_eq!(alloc.entry(1).percentage(), 50);
    }

    #[test]
    fn test_second_drag_is_rejected() {
        let (mut input, listeners, alloc) = setup(&["A", "B"]);
        input.pointer_down(&alloc, 0).unwrap();

        assert_eq!(
            input.pointer_down(&alloc, 1),
            Err(InputError::DragInProgress { active: 0 })
        );
        assert!(input.pointer_down(&alloc, 0).is_ok());
        assert_eq!(listeners.attached_total(), 1);
    }

    #[test]
    fn test_locked_row_cannot_start_drag() {
        let (mut input, listeners, alloc) = setup(&["A", "B", "C"]);
        let alloc = alloc.set_percentage(0, 80).set_percentage(1, 30);

        assert_eq!(input.pointer_down(&alloc, 2), Err(InputError::RowLocked { row: 2 }));
        assert_eq!(listeners.active(), 0);
        assert!(input.pointer_down(&alloc, 1).is_ok());
    }

    #[test]
    fn test_out_of_range_row_is_rejected() {
        let (mut input, _listeners, alloc) = setup(&["A"]);
        assert_eq!(
            input.pointer_down(&alloc, 4),
            Err(InputError::RowOutOfRange { row: 4, rows: 1 })
        );
    }

    #[test]
    fn test_dropping_adapter_releases_capture() {
        let (mut input, listeners, alloc) = setup(&["A"]);
        input.pointer_down(&alloc, 0).unwrap();
        assert_eq!(listeners.active(), 1);

        drop(input);
        assert_eq!(listeners.active(), 0);
    }

    #[test]
    fn test_reset_rows_cancels_drag() {
        let (mut input, listeners, alloc) = setup(&["A", "B"]);
        input.pointer_down(&alloc, 0).unwrap();

        input.reset_rows(3);
        assert_eq!(input.rows(), 3);
        assert_eq!(input.dragging_row(), None);
        assert_eq!(listeners.active(), 0);
    }

    #[test]
    fn test_buttons_disable_at_bounds_and_when_locked() {
        let (input, _listeners, alloc) = setup(&["A", "B"]);

        assert!(!input.can_decrement(&alloc, 0));
        assert_eq!(input.decrement(&alloc, 0), alloc);

        let full = alloc.set_percentage(0, 100);
        assert!(!input.can_increment(&full, 0));
        assert_eq!(input.increment(&full, 0), full);

        // 100 exactly is within budget, so B is still raisable.
        assert!(input.can_increment(&full, 1));
        let over = input.increment(&full, 1);
        assert_eq!(over.total_percentage(), 101);
        assert!(input.can_decrement(&over, 1));
    }

    #[test]
    fn test_increment_blocked_for_locked_row() {
        let (input, _listeners, alloc) = setup(&["A", "B", "C"]);
        let alloc = alloc.set_percentage(0, 90).set_percentage(1, 20);

        assert!(!input.can_increment(&alloc, 2));
        assert_eq!(input.increment(&alloc, 2), alloc);
        assert!(input.can_decrement(&alloc, 1));
        assert_eq!(input.decrement(&alloc, 1).entry(1).percentage(), 19);
    }

    #[test]
    fn test_row_views_reflect_state() {
        let (mut input, _listeners, alloc) = setup(&["A", "B"]);
        let alloc = alloc.set_percentage(0, 100).set_percentage(1, 10);
        input.pointer_down(&alloc, 0).unwrap();

        let views = input.row_views(&alloc);
        assert!(views[0].is_dragging);
        assert!(!views[0].can_increment);
        assert_eq!(views[0].weight, 10.0);
        assert!(!views[1].is_dragging);
        assert!(!views[1].is_locked);
        assert!(views[1].can_decrement);
    }
}
