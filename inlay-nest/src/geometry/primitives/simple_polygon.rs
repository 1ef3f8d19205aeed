use anyhow::{Result, bail, ensure};
use itertools::Itertools;

use crate::geometry::Transformation;
use crate::geometry::geo_traits::{CollidesWith, Transformable};
use crate::geometry::primitives::{Edge, Point, Rect};
use crate::util::FPA;

/// A Simple Polygon is a polygon that does not intersect itself and contains no holes.
/// [read more](https://en.wikipedia.org/wiki/Simple_polygon)
#[derive(Clone, Debug, PartialEq)]
pub struct SPolygon {
    /// Vertices of the polygon, ordered counterclockwise
    pub vertices: Vec<Point>,
    /// Bounding box
    pub bbox: Rect,
    /// Area of its interior
    pub area: f32,
}

impl SPolygon {
    /// Create a new simple polygon from a set of points.
    /// Fails on fewer than 3 points, non-finite coordinates, duplicate points, zero area
    /// or self-intersection.
    pub fn new(mut points: Vec<Point>) -> Result<Self> {
        if points.len() < 3 {
            bail!("simple polygon must have at least 3 points: {points:?}");
        }
        ensure!(
            points.iter().all(|p| p.0.is_finite() && p.1.is_finite()),
            "simple polygon has non-finite coordinates: {points:?}"
        );
        if points.iter().unique().count() != points.len() {
            bail!("simple polygon should not contain duplicate points: {points:?}");
        }

        let area = match SPolygon::calculate_area(&points) {
            0.0 => bail!("simple polygon has no area: {points:?}"),
            area if area < 0.0 => {
                //edges should always be ordered counterclockwise (positive area)
                points.reverse();
                -area
            }
            area => area,
        };
        ensure!(area.is_finite(), "simple polygon area overflows: {points:?}");

        if SPolygon::self_intersects(&points) {
            bail!("simple polygon intersects itself");
        }

        let bbox = SPolygon::generate_bounding_box(&points);

        Ok(SPolygon {
            vertices: points,
            bbox,
            area,
        })
    }

    pub fn vertex(&self, i: usize) -> Point {
        self.vertices[i]
    }

    pub fn edge(&self, i: usize) -> Edge {
        let j = (i + 1) % self.n_vertices();
        Edge {
            start: self.vertices[i],
            end: self.vertices[j],
        }
    }

    pub fn edge_iter(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.n_vertices()).map(move |i| self.edge(i))
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn generate_bounding_box(points: &[Point]) -> Rect {
        Rect::from_points(points).expect("polygon has no points")
    }

    //https://en.wikipedia.org/wiki/Shoelace_formula
    //counterclockwise = positive area, clockwise = negative area
    pub fn calculate_area(points: &[Point]) -> f32 {
        let mut sigma: f32 = 0.0;
        for i in 0..points.len() {
            let j = (i + 1) % points.len();
            let (x_i, y_i) = points[i].into();
            let (x_j, y_j) = points[j].into();
            sigma += (y_i + y_j) * (x_i - x_j)
        }
        0.5 * sigma
    }

    /// Checks every pair of non-adjacent edges for an intersection.
    fn self_intersects(points: &[Point]) -> bool {
        let n = points.len();
        let edge = |i: usize| Edge {
            start: points[i],
            end: points[(i + 1) % n],
        };
        (0..n).tuple_combinations().any(|(i, j)| {
            let (e_i, e_j) = (edge(i), edge(j));
            !e_i.is_adjacent_to(&e_j) && e_i.collides_with(&e_j)
        })
    }
}

impl Transformable for SPolygon {
    fn transform(&mut self, t: &Transformation) -> &mut Self {
        //destructuring pattern to ensure that the code is updated when the struct changes
        let SPolygon {
            vertices,
            bbox,
            area: _,
        } = self;

        vertices.iter_mut().for_each(|p| {
            p.transform(t);
        });

        *bbox = SPolygon::generate_bounding_box(vertices);

        self
    }
}

impl CollidesWith<Point> for SPolygon {
    fn collides_with(&self, point: &Point) -> bool {
        //based on the ray casting algorithm: https://en.wikipedia.org/wiki/Point_in_polygon#Ray_casting_algorithm
        if !self.bbox.collides_with(point) {
            return false;
        }
        //horizontal ray shot to the right, to a point that is certainly outside the shape
        let point_outside = Point(self.bbox.x_max + self.bbox.width(), point.1);
        let ray = Edge {
            start: *point,
            end: point_outside,
        };

        let mut n_intersections = 0;
        for edge in self.edge_iter() {
            let (s_x, s_y) = (FPA(edge.start.0), FPA(edge.start.1));
            let (e_x, e_y) = (FPA(edge.end.0), FPA(edge.end.1));
            let (p_x, p_y) = (FPA(point.0), FPA(point.1));

            if (s_y == p_y && s_x > p_x) || (e_y == p_y && e_x > p_x) {
                //the ray passes through (or dangerously close to) a vertex,
                //only count the edge if it lies below the ray
                if s_y < p_y || e_y < p_y {
                    n_intersections += 1;
                }
            } else if ray.collides_with(&edge) {
                n_intersections += 1;
            }
        }

        n_intersections % 2 == 1
    }
}

impl CollidesWith<SPolygon> for SPolygon {
    /// Two polygons collide if any of their edges intersect or one contains the other.
    fn collides_with(&self, other: &SPolygon) -> bool {
        if !self.bbox.collides_with(&other.bbox) {
            return false;
        }
        let edges_cross = self
            .edge_iter()
            .filter(|e| {
                e.x_max() >= other.bbox.x_min
                    && e.x_min() <= other.bbox.x_max
                    && e.y_max() >= other.bbox.y_min
                    && e.y_min() <= other.bbox.y_max
            })
            .any(|e| other.edge_iter().any(|o| e.collides_with(&o)));

        edges_cross
            || self.collides_with(&other.vertex(0))
            || other.collides_with(&self.vertex(0))
    }
}

impl From<Rect> for SPolygon {
    fn from(r: Rect) -> Self {
        SPolygon {
            vertices: vec![
                Point(r.x_min, r.y_min),
                Point(r.x_max, r.y_min),
                Point(r.x_max, r.y_max),
                Point(r.x_min, r.y_max),
            ],
            bbox: r,
            area: r.area(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn square(x: f32, y: f32, size: f32) -> SPolygon {
        SPolygon::from(Rect::try_new(x, y, x + size, y + size).unwrap())
    }

    #[test]
    fn clockwise_input_is_reversed() {
        let cw = vec![Point(0.0, 0.0), Point(0.0, 1.0), Point(1.0, 1.0), Point(1.0, 0.0)];
        let poly = SPolygon::new(cw).unwrap();
        assert_eq!(poly.area, 1.0);
        assert!(SPolygon::calculate_area(&poly.vertices) > 0.0);
    }

    #[test_case(vec![Point(0.0, 0.0), Point(1.0, 1.0)]; "two points")]
    #[test_case(vec![Point(0.0, 0.0), Point(1.0, 1.0), Point(2.0, 2.0)]; "collinear")]
    #[test_case(vec![Point(0.0, 0.0), Point(1.0, 0.0), Point(1.0, 0.0), Point(0.0, 1.0)]; "duplicate point")]
    #[test_case(vec![Point(0.0, 0.0), Point(4.0, 4.0), Point(4.0, 0.0), Point(0.0, 2.0)]; "bow tie")]
    #[test_case(vec![Point(0.0, 0.0), Point(f32::INFINITY, 0.0), Point(0.0, 1.0)]; "infinite vertex")]
    #[test_case(vec![Point(0.0, 0.0), Point(f32::NAN, 0.0), Point(0.0, 1.0)]; "nan vertex")]
    #[test_case(vec![Point(0.0, 0.0), Point(3e38, 0.0), Point(0.0, 3e38)]; "area overflow")]
    fn degenerate_polygons_are_rejected(points: Vec<Point>) {
        assert!(SPolygon::new(points).is_err());
    }

    #[test]
    fn point_containment() {
        let poly = square(0.0, 0.0, 10.0);
        assert!(poly.collides_with(&Point(5.0, 5.0)));
        assert!(!poly.collides_with(&Point(15.0, 5.0)));
        assert!(!poly.collides_with(&Point(-1.0, 5.0)));
    }

    #[test_case(square(0.0, 0.0, 10.0), square(5.0, 5.0, 10.0), true; "overlapping")]
    #[test_case(square(0.0, 0.0, 10.0), square(20.0, 0.0, 10.0), false; "separated")]
    #[test_case(square(0.0, 0.0, 10.0), square(2.0, 2.0, 3.0), true; "contained")]
    #[test_case(square(2.0, 2.0, 3.0), square(0.0, 0.0, 10.0), true; "containing")]
    fn polygon_collisions(a: SPolygon, b: SPolygon, expected: bool) {
        assert_eq!(a.collides_with(&b), expected);
        assert_eq!(b.collides_with(&a), expected);
    }
}
