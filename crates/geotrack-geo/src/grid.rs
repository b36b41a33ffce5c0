//! Fixed-size latitude/longitude grid used to index live positions.

use geotrack_core::models::{BoundingBox, Coordinate};

/// One cell of a regular grid with `cell_degrees` sized sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub row: i64,
    pub col: i64,
}

impl GridCell {
    /// Cell containing `coord`
    pub fn of(coord: Coordinate, cell_degrees: f64) -> Self {
        Self {
            row: ((coord.lat + 90.0) / cell_degrees).floor() as i64,
            col: ((coord.lon + 180.0) / cell_degrees).floor() as i64,
        }
    }

    /// Number of cells [`GridCell::covering`] would yield for `bbox`
    pub fn covering_count(bbox: &BoundingBox, cell_degrees: f64) -> u64 {
        let (low, high) = Self::corners(bbox, cell_degrees);
        let rows = (high.row - low.row + 1).max(0) as u64;
        let cols = (high.col - low.col + 1).max(0) as u64;
        rows.saturating_mul(cols)
    }

    /// Every cell overlapping `bbox`, row-major
    pub fn covering(bbox: &BoundingBox, cell_degrees: f64) -> impl Iterator<Item = GridCell> {
        let (low, high) = Self::corners(bbox, cell_degrees);
        (low.row..=high.row)
            .flat_map(move |row| (low.col..=high.col).map(move |col| GridCell { row, col }))
    }

    fn corners(bbox: &BoundingBox, cell_degrees: f64) -> (GridCell, GridCell) {
        (
            Self::of(Coordinate::new(bbox.min_lat, bbox.min_lon), cell_degrees),
            Self::of(Coordinate::new(bbox.max_lat, bbox.max_lon), cell_degrees),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_of() {
        let cell = GridCell::of(Coordinate::new(0.005, 0.005), 0.01);
        assert_eq!((cell.row, cell.col), (9000, 18000));

        let neighbour = GridCell::of(Coordinate::new(0.015, 0.005), 0.01);
        assert_eq!(neighbour.row, cell.row + 1);
        assert_eq!(neighbour.col, cell.col);
    }

    #[test]
    fn test_covering_includes_every_corner() {
        let bbox = BoundingBox::new(9.0, 38.7, 9.05, 38.75);
        let cells: Vec<_> = GridCell::covering(&bbox, 0.01).collect();

        assert_eq!(cells.len() as u64, GridCell::covering_count(&bbox, 0.01));
        for corner in [
            Coordinate::new(bbox.min_lat, bbox.min_lon),
            Coordinate::new(bbox.min_lat, bbox.max_lon),
            Coordinate::new(bbox.max_lat, bbox.min_lon),
            Coordinate::new(bbox.max_lat, bbox.max_lon),
        ] {
            assert!(cells.contains(&GridCell::of(corner, 0.01)));
        }
    }

    #[test]
    fn test_covering_degenerate_box() {
        let bbox = BoundingBox::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(GridCell::covering_count(&bbox, 0.5), 1);
        assert_eq!(GridCell::covering(&bbox, 0.5).count(), 1);
    }
}
