//! Pointer geometry: maps a horizontal pointer position inside a row's
//! container onto a percentage.

use shared_types::MAX_PERCENTAGE;

/// Horizontal extent of a row's slider container, in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub width: f64,
}

impl ContainerRect {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// `clamp(round((x - left) / width * 100), 0, 100)`.
    ///
    /// `None` for a collapsed container or a non-finite pointer position.
    pub fn percentage_at(&self, pointer_x: f64) -> Option<u8> {
        if !(self.width > 0.0) || !self.width.is_finite() || !pointer_x.is_finite() {
            return None;
        }
        let raw = ((pointer_x - self.left) / self.width * 100.0).round();
        Some(raw.clamp(0.0, f64::from(MAX_PERCENTAGE)) as u8)
    }
}

/// Layout lookup supplied by the view on every pointer move.
pub trait RowLayout {
    fn container_rect(&self, row: usize) -> Option<ContainerRect>;
}

/// Every row shares the same container geometry.
impl RowLayout for ContainerRect {
    fn container_rect(&self, _row: usize) -> Option<ContainerRect> {
        Some(*self)
    }
}

impl RowLayout for [ContainerRect] {
    fn container_rect(&self, row: usize) -> Option<ContainerRect> {
        self.get(row).copied()
    }
}

impl RowLayout for Vec<ContainerRect> {
    fn container_rect(&self, row: usize) -> Option<ContainerRect> {
        self.get(row).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_inside_container() {
        let rect = ContainerRect::new(100.0, 200.0);
        assert_eq!(rect.percentage_at(100.0), Some(0));
        assert_eq!(rect.percentage_at(200.0), Some(50));
        assert_eq!(rect.percentage_at(300.0), Some(100));
        assert_eq!(rect.percentage_at(221.5), Some(61));
    }

    #[test]
    fn test_percentage_clamps_outside_container() {
        let rect = ContainerRect::new(100.0, 200.0);
        assert_eq!(rect.percentage_at(-50.0), Some(0));
        assert_eq!(rect.percentage_at(900.0), Some(100));
    }

    #[test]
    fn test_collapsed_container_yields_nothing() {
        assert_eq!(ContainerRect::new(0.0, 0.0).percentage_at(10.0), None);
        assert_eq!(ContainerRect::new(0.0, -3.0).percentage_at(10.0), None);
        assert_eq!(ContainerRect::new(0.0, 100.0).percentage_at(f64::NAN), None);
    }

    #[test]
    fn test_row_layout_lookup() {
        let rows = vec![ContainerRect::new(0.0, 10.0), ContainerRect::new(5.0, 20.0)];
        assert_eq!(rows.container_rect(1), Some(ContainerRect::new(5.0, 20.0)));
        assert_eq!(rows.container_rect(2), None);
        assert!(ContainerRect::new(0.0, 1.0).container_rect(42).is_some());
    }
}
