//! Acceleration from the active wells at a point.
//!
//! Each well contributes a softened inverse-square pull toward its center
//! plus a perpendicular swirl term, so particles spiral in instead of
//! falling straight onto the well. Contributions superpose linearly.

use crate::config::SimConfig;
use crate::well::Well;
use glam::DVec2;

/// The constants of the well force model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceField {
    pub softening: f64,
    pub radial_scale: f64,
    /// `swirl_scale * swirl_factor`.
    pub swirl_gain: f64,
}

impl ForceField {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            softening: config.softening,
            radial_scale: config.radial_scale,
            swirl_gain: config.swirl_scale * config.swirl_factor,
        }
    }

    /// Contribution of a single well at `pos`.
    ///
    /// With `d2 = |well - pos|^2 + softening`, the radial magnitude is
    /// `strength / d2 * radial_scale` and the swirl magnitude is
    /// `strength / d2 * swirl_gain`, rotated 90 degrees counter-clockwise
    /// from the inward direction. Finite everywhere while softening > 0.
    pub fn well_acceleration(&self, pos: DVec2, well: &Well) -> DVec2 {
        let d = well.position - pos;
        let d2 = d.length_squared() + self.softening;
        let dir = d / d2.sqrt();
        let f = well.strength / d2;
        dir * (f * self.radial_scale) + dir.perp() * (f * self.swirl_gain)
    }

    /// Sum of every well's contribution at `pos`.
    pub fn acceleration_at(&self, pos: DVec2, wells: &[Well]) -> DVec2 {
        wells
            .iter()
            .fold(DVec2::ZERO, |acc, w| acc + self.well_acceleration(pos, w))
    }
}

impl Default for ForceField {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::well::WellId;

    fn well_at(x: f64, y: f64, strength: f64) -> Well {
        Well {
            id: WellId::Touch(0),
            position: DVec2::new(x, y),
            strength,
            start_time: 0.0,
        }
    }

    #[test]
    fn no_wells_no_acceleration() {
        let a = ForceField::default().acceleration_at(DVec2::new(3.0, 4.0), &[]);
        assert_eq!(a, DVec2::ZERO);
    }

    #[test]
    fn radial_magnitude_matches_softened_inverse_square() {
        let field = ForceField::default();
        let s = 3.0;
        let d = 100.0;
        let pos = DVec2::new(200.0, 300.0);
        let well = well_at(200.0 + d, 300.0, s);
        let a = field.well_acceleration(pos, &well);
        let inward = (well.position - pos).normalize();
        let radial = a.dot(inward);
        // softening makes |dir| slightly below one
        let expected = s / (d * d + 400.0) * 150.0 * d / (d * d + 400.0).sqrt();
        assert!((radial - expected).abs() < 1e-12, "{radial} vs {expected}");
        let loose = s / (d * d + 400.0) * 150.0;
        assert!((radial - loose).abs() / loose < 0.03);
    }

    #[test]
    fn swirl_is_perpendicular_and_counter_clockwise() {
        let field = ForceField::default();
        let pos = DVec2::ZERO;
        let a = field.well_acceleration(pos, &well_at(50.0, 0.0, 2.0));
        // inward is +x, so swirl is +y
        assert!(a.x > 0.0);
        assert!(a.y > 0.0);
        let ratio = a.y / a.x;
        assert!((ratio - 40.0 * 0.45 / 150.0).abs() < 1e-12);
    }

    #[test]
    fn coincident_well_is_finite_and_zero() {
        let field = ForceField::default();
        let a = field.well_acceleration(DVec2::new(10.0, 10.0), &well_at(10.0, 10.0, 6.0));
        assert!(a.is_finite());
        assert_eq!(a, DVec2::ZERO);
    }

    #[test]
    fn wells_superpose_linearly() {
        let field = ForceField::default();
        let pos = DVec2::new(100.0, 100.0);
        let a = well_at(150.0, 80.0, 2.0);
        let b = well_at(20.0, 140.0, 5.0);
        let sum = field.acceleration_at(pos, &[a, b]);
        let parts = field.well_acceleration(pos, &a) + field.well_acceleration(pos, &b);
        assert!((sum - parts).length() < 1e-15);
    }

    #[test]
    fn symmetric_wells_cancel_radially() {
        let field = ForceField::default();
        let pos = DVec2::new(0.0, 0.0);
        let sum = field.acceleration_at(pos, &[well_at(-30.0, 0.0, 4.0), well_at(30.0, 0.0, 4.0)]);
        assert!(sum.length() < 1e-12);
    }

    #[test]
    fn zero_strength_well_exerts_nothing() {
        let field = ForceField::default();
        let a = field.well_acceleration(DVec2::new(1.0, 2.0), &well_at(5.0, 5.0, 0.0));
        assert_eq!(a, DVec2::ZERO);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn peak_acceleration_is_bounded(
                px in -1000.0_f64..1000.0,
                py in -1000.0_f64..1000.0,
                wx in -1000.0_f64..1000.0,
                wy in -1000.0_f64..1000.0,
                s in 0.0_f64..10.0,
            ) {
                let field = ForceField::default();
                let a = field.well_acceleration(DVec2::new(px, py), &well_at(wx, wy, s));
                prop_assert!(a.is_finite());
                // |dir| < 1, d2 >= 400
                let bound = s / 400.0 * (150.0 + 40.0 * 0.45);
                prop_assert!(a.length() <= bound + 1e-12, "|a| = {} > {bound}", a.length());
            }

            #[test]
            fn radial_term_points_inward(
                px in -500.0_f64..500.0,
                py in -500.0_f64..500.0,
                s in 0.1_f64..10.0,
            ) {
                let field = ForceField::default();
                let pos = DVec2::new(px, py);
                let well = well_at(0.0, 0.0, s);
                prop_assume!(pos.length() > 1e-6);
                let a = field.well_acceleration(pos, &well);
                prop_assert!(a.dot(-pos) > 0.0);
            }
        }
    }
}
