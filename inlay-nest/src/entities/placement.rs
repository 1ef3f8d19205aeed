use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::geometry::geo_traits::Transformable;
use crate::geometry::primitives::{Rect, SPolygon};
use crate::geometry::{DTransformation, Transformation};

/// Position of a shape on the surface: the approximated outline is first rotated about the
/// origin by `rotation` degrees, then translated by (`x`, `y`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    /// Rotation in degrees
    pub rotation: f32,
}

impl Placement {
    pub fn new(x: f32, y: f32, rotation: f32) -> Self {
        Placement { x, y, rotation }
    }

    pub fn d_transf(&self) -> DTransformation {
        DTransformation::new(self.rotation.to_radians(), (self.x, self.y))
    }

    /// The outline transformed to its position on the surface
    pub fn realize(&self, outline: &SPolygon) -> SPolygon {
        outline.transform_clone(&self.d_transf().compose())
    }

    /// Samples a placement keeping the bounding box of the realized polygon inside `area`.
    ///
    /// A rotation is drawn uniformly from the `allowed_rotations` (degrees) for which the rotated
    /// outline fits `area`, followed by a uniform translation. An empty rotation set only allows 0°.
    /// Returns `None` if the outline does not fit `area` under any allowed rotation.
    pub fn sample(
        outline: &SPolygon,
        area: &Rect,
        allowed_rotations: &[f32],
        rng: &mut impl Rng,
    ) -> Option<Placement> {
        let rotations = match allowed_rotations.is_empty() {
            true => &[0.0][..],
            false => allowed_rotations,
        };

        let fitting = rotations
            .iter()
            .map(|&r| {
                let rotated = outline.transform_clone(&Transformation::from_rotation(r.to_radians()));
                (r, rotated.bbox)
            })
            .filter(|(_, bbox)| bbox.width() <= area.width() && bbox.height() <= area.height())
            .collect::<Vec<_>>();

        let &(rotation, bbox) = fitting.choose(rng)?;

        let x_max = f32::max(area.x_min, area.x_max - bbox.width());
        let y_max = f32::max(area.y_min, area.y_max - bbox.height());
        let x = rng.random_range(area.x_min..=x_max);
        let y = rng.random_range(area.y_min..=y_max);

        Some(Placement::new(x - bbox.x_min, y - bbox.y_min, rotation))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::prelude::SmallRng;
    use test_case::test_case;

    use super::*;
    use crate::util::FPA;

    fn bar() -> SPolygon {
        SPolygon::from(Rect::try_new(0.0, 0.0, 30.0, 5.0).unwrap())
    }

    #[test]
    fn realize_rotates_before_translating() {
        let realized = Placement::new(10.0, 0.0, 90.0).realize(&bar());
        assert_eq!(FPA(realized.bbox.x_min), FPA(5.0));
        assert_eq!(FPA(realized.bbox.x_max), FPA(10.0));
        assert_eq!(FPA(realized.bbox.y_min), FPA(0.0));
        assert_eq!(FPA(realized.bbox.y_max), FPA(30.0));
        assert_eq!(FPA(realized.area), FPA(150.0));
    }

    #[test_case(&[0.0, 90.0, 180.0, 270.0]; "quarter turns")]
    #[test_case(&[45.0]; "diagonal")]
    #[test_case(&[]; "no rotations")]
    fn sampled_placement_stays_inside(rotations: &[f32]) {
        let mut rng = SmallRng::seed_from_u64(0);
        let area = Rect::try_new(-50.0, 20.0, 50.0, 100.0).unwrap();
        for _ in 0..100 {
            let placement = Placement::sample(&bar(), &area, rotations, &mut rng).unwrap();
            let realized = placement.realize(&bar());
            assert!(area.almost_contains(&realized.bbox));
            match rotations.is_empty() {
                true => assert_eq!(placement.rotation, 0.0),
                false => assert!(rotations.contains(&placement.rotation)),
            }
        }
    }

    #[test]
    fn only_fitting_rotations_are_sampled() {
        let mut rng = SmallRng::seed_from_u64(1);
        let area = Rect::try_new(0.0, 0.0, 40.0, 10.0).unwrap();
        for _ in 0..50 {
            let placement = Placement::sample(&bar(), &area, &[0.0, 90.0], &mut rng).unwrap();
            assert_eq!(placement.rotation, 0.0);
        }
    }

    #[test]
    fn no_fit_gives_none() {
        let mut rng = SmallRng::seed_from_u64(2);
        let area = Rect::try_new(0.0, 0.0, 10.0, 10.0).unwrap();
        assert_eq!(Placement::sample(&bar(), &area, &[0.0, 90.0], &mut rng), None);
    }

    #[test]
    fn exact_fit_is_placed_at_the_corner() {
        let mut rng = SmallRng::seed_from_u64(3);
        let area = Rect::try_new(100.0, 100.0, 130.0, 105.0).unwrap();
        let placement = Placement::sample(&bar(), &area, &[0.0], &mut rng).unwrap();
        assert_eq!(FPA(placement.x), FPA(100.0));
        assert_eq!(FPA(placement.y), FPA(100.0));
    }
}
