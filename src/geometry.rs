use crate::error::EngineError;
use crate::location::Location;

/// Inclusive rectangular extent of a polygon's vertices, used to size the
/// per-region backing stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: u8,
    pub max_x: u8,
    pub min_y: u8,
    pub max_y: u8,
}

impl Bounds {
    pub fn of(vertices: &[Location]) -> Option<Bounds> {
        let first = vertices.first()?;
        let mut bounds = Bounds {
            min_x: first.x(),
            max_x: first.x(),
            min_y: first.y(),
            max_y: first.y(),
        };
        for v in &vertices[1..] {
            bounds.min_x = bounds.min_x.min(v.x());
            bounds.max_x = bounds.max_x.max(v.x());
            bounds.min_y = bounds.min_y.min(v.y());
            bounds.max_y = bounds.max_y.max(v.y());
        }
        Some(bounds)
    }

    pub fn width(&self) -> usize {
        (self.max_x - self.min_x) as usize + 1
    }

    pub fn height(&self) -> usize {
        (self.max_y - self.min_y) as usize + 1
    }

    pub fn contains(&self, loc: Location) -> bool {
        (self.min_x..=self.max_x).contains(&loc.x()) && (self.min_y..=self.max_y).contains(&loc.y())
    }

    /// Translate a board coordinate into indices of a bounds-sized store.
    /// Callers must check [`Bounds::contains`] first.
    #[inline]
    pub fn local(&self, loc: Location) -> (usize, usize) {
        (
            (loc.x() - self.min_x) as usize,
            (loc.y() - self.min_y) as usize,
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = Location> + '_ {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| Location::from_xy(x, y)))
    }
}

/// Twice the signed area of a polygon (shoelace). Zero means degenerate.
pub fn polygon_area2(vertices: &[Location]) -> i32 {
    let n = vertices.len();
    let mut area2 = 0i32;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        area2 += a.x() as i32 * b.y() as i32 - b.x() as i32 * a.y() as i32;
    }
    area2
}

/// Lattice points along an edge, endpoints included.
///
/// This is a closed-form interpolation, not a general line rasterizer:
/// only horizontal, vertical, and 45 degree diagonal edges are supported,
/// and anything else is rejected so a region can never silently
/// mis-rasterize. The result is a set, identical for (a, b) and (b, a).
pub fn edge_lattice_points(a: Location, b: Location) -> Result<Vec<Location>, EngineError> {
    let (start, finish) = if b.x() < a.x() { (b, a) } else { (a, b) };

    if start.x() == finish.x() {
        let (y0, y1) = (start.y().min(finish.y()), start.y().max(finish.y()));
        return Ok((y0..=y1).map(|y| Location::from_xy(start.x(), y)).collect());
    }
    if start.y() == finish.y() {
        return Ok((start.x()..=finish.x())
            .map(|x| Location::from_xy(x, start.y()))
            .collect());
    }

    let dx = finish.x() as i16 - start.x() as i16;
    let dy = finish.y() as i16 - start.y() as i16;
    if dy.abs() != dx {
        return Err(EngineError::UnsupportedEdgeSlope(a, b));
    }
    let step = dy.signum() as i8;
    Ok((0..=dx)
        .map(|i| {
            Location::from_xy(
                (start.x() as i16 + i) as u8,
                (start.y() as i16 + i * step as i16) as u8,
            )
        })
        .collect())
}

/// Ray-casting point-in-polygon test: cast a horizontal ray from (x, y)
/// and count edge crossings. Horizontal edges never satisfy the half-open
/// crossing condition, so they cannot double-count.
pub fn point_in_polygon(x: f64, y: f64, vertices: &[Location]) -> bool {
    let n = vertices.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (vertices[i].x() as f64, vertices[i].y() as f64);
        let (xj, yj) = (vertices[j].x() as f64, vertices[j].y() as f64);
        if (yi > y) != (yj > y) {
            let x_intersect = (y - yi) * (xj - xi) / (yj - yi) + xi;
            if x < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnv::FnvHashSet;

    fn loc(x: u8, y: u8) -> Location {
        Location::from_xy(x, y)
    }

    #[test]
    fn interpolation_symmetric_and_idempotent() {
        let cases = [
            (loc(0, 13), loc(7, 13)), // horizontal
            (loc(7, 13), loc(7, 6)),  // vertical
            (loc(7, 6), loc(0, 13)),  // 45 degrees down
            (loc(7, 6), loc(13, 12)), // 45 degrees up
        ];
        for (a, b) in cases {
            let forward: FnvHashSet<Location> =
                edge_lattice_points(a, b).unwrap().into_iter().collect();
            let backward: FnvHashSet<Location> =
                edge_lattice_points(b, a).unwrap().into_iter().collect();
            assert_eq!(forward, backward);
            let again: FnvHashSet<Location> =
                edge_lattice_points(a, b).unwrap().into_iter().collect();
            assert_eq!(forward, again);
        }
    }

    #[test]
    fn interpolation_counts() {
        assert_eq!(edge_lattice_points(loc(0, 13), loc(7, 13)).unwrap().len(), 8);
        assert_eq!(edge_lattice_points(loc(7, 13), loc(7, 6)).unwrap().len(), 8);
        let diag = edge_lattice_points(loc(7, 6), loc(0, 13)).unwrap();
        assert_eq!(diag.len(), 8);
        assert!(diag.contains(&loc(3, 10)));
    }

    #[test]
    fn non_45_degree_edges_rejected() {
        assert!(matches!(
            edge_lattice_points(loc(0, 0), loc(2, 1)),
            Err(EngineError::UnsupportedEdgeSlope(_, _))
        ));
        assert!(matches!(
            edge_lattice_points(loc(5, 5), loc(6, 9)),
            Err(EngineError::UnsupportedEdgeSlope(_, _))
        ));
    }

    #[test]
    fn ray_cast_triangle() {
        let triangle = [loc(0, 13), loc(7, 13), loc(7, 6)];
        assert!(point_in_polygon(6.0, 12.0, &triangle));
        assert!(point_in_polygon(5.0, 10.0, &triangle));
        assert!(!point_in_polygon(1.0, 7.0, &triangle));
        assert!(!point_in_polygon(10.0, 10.0, &triangle));
    }

    #[test]
    fn shoelace_flags_degenerate() {
        assert_eq!(polygon_area2(&[loc(1, 1), loc(5, 5), loc(3, 3)]), 0);
        assert_ne!(polygon_area2(&[loc(0, 13), loc(7, 13), loc(7, 6)]), 0);
    }
}
