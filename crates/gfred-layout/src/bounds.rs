//! Bounding box of a computed layout.

use serde::{Deserialize, Serialize};

use crate::position::Position;

/// Axis-aligned box enclosing a set of positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutBounds {
    pub min: Position,
    pub max: Position,
}

impl LayoutBounds {
    /// Bounds of `positions`, or `None` when there are none.
    pub fn from_positions<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Same box grown by `margin` on every side.
    #[must_use]
    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min: Position::new(self.min.x - margin, self.min.y - margin),
            max: Position::new(self.max.x + margin, self.max.y + margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_no_bounds() {
        assert!(LayoutBounds::from_positions(Vec::new()).is_none());
    }

    #[test]
    fn test_bounds_of_points() {
        let bounds = LayoutBounds::from_positions([
            Position::new(1.0, 5.0),
            Position::new(-3.0, 2.0),
            Position::new(4.0, -1.0),
        ])
        .unwrap();
        assert_eq!(bounds.width(), 7.0);
        assert_eq!(bounds.height(), 6.0);
        assert_eq!(bounds.center(), Position::new(0.5, 2.0));
        assert_eq!(bounds.padded(1.0).width(), 9.0);
    }
}
