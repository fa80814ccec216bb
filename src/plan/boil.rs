use serde::Serialize;

use crate::plan::error::PlanError;
use crate::units::{Gravity, Quantity, Vol};

/// Relative tolerance for checking a user-supplied volume pair against the
/// model, with an absolute floor for near-zero volumes.
const VOLUME_TOLERANCE: f64 = 1e-6;

/// Fixed-rate evaporation plus fixed-percentage cooling contraction.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BoilModel {
    /// Volume boiled off per hour.
    pub boil_off_rate: Quantity<Vol>,
    pub duration_min: f64,
    pub shrinkage_pct: f64,
}

/// The kettle cannot hold the planned draw; boiling longer makes room.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CapacityNotice {
    pub shortfall: Quantity<Vol>,
    pub extra_min: f64,
    pub new_duration_min: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BoilSummary {
    pub preboil_gravity: Gravity,
    pub postboil_gravity: Gravity,
    pub start_volume: Quantity<Vol>,
    pub final_volume: Quantity<Vol>,
}

impl BoilModel {
    pub fn boil_off(&self) -> Quantity<Vol> {
        self.boil_off_rate * (self.duration_min / 60.0)
    }

    pub fn shrinkage_factor(&self) -> f64 {
        1.0 - self.shrinkage_pct / 100.0
    }

    pub fn final_from_start(&self, start: Quantity<Vol>) -> Quantity<Vol> {
        (start - self.boil_off()) * self.shrinkage_factor()
    }

    pub fn start_from_final(&self, final_volume: Quantity<Vol>) -> Quantity<Vol> {
        final_volume / self.shrinkage_factor() + self.boil_off()
    }

    /// Fill in whichever of the pre-boil/post-boil pair is missing. When
    /// both are supplied they must agree with the model within tolerance.
    pub fn resolve_volumes(
        &self,
        start: Option<Quantity<Vol>>,
        final_volume: Option<Quantity<Vol>>,
    ) -> Result<(Quantity<Vol>, Quantity<Vol>), PlanError> {
        match (start, final_volume) {
            (None, None) => Err(PlanError::MissingVolume),
            (Some(s), None) => Ok((s, self.final_from_start(s))),
            (None, Some(f)) => Ok((self.start_from_final(f), f)),
            (Some(s), Some(f)) => {
                let expected = self.final_from_start(s);
                if roughly_equal(expected.base(), f.base()) {
                    Ok((s, f))
                } else {
                    Err(PlanError::InconsistentVolumes {
                        start: s,
                        final_volume: f,
                        expected_final: expected,
                    })
                }
            }
        }
    }

    /// When the planner wants more wort than the kettle holds, recommend
    /// how much longer to boil instead of failing.
    pub fn capacity_notice(
        &self,
        drawn_volume: Quantity<Vol>,
        start_volume: Quantity<Vol>,
    ) -> Option<CapacityNotice> {
        if drawn_volume <= start_volume {
            return None;
        }
        let shortfall = drawn_volume - start_volume;
        let extra_min = shortfall.base() / self.boil_off_rate.base() * 60.0;
        Some(CapacityNotice {
            shortfall,
            extra_min,
            new_duration_min: self.duration_min + extra_min,
        })
    }

    /// Gravities and volumes entering and leaving the boil. Sugar is
    /// conserved, so the pre-boil gravity is the target scaled by the
    /// volume ratio.
    pub fn summary(
        &self,
        target: Gravity,
        start_volume: Quantity<Vol>,
        final_volume: Quantity<Vol>,
    ) -> BoilSummary {
        let preboil_points = target.points() * final_volume.base() / start_volume.base();
        BoilSummary {
            preboil_gravity: Gravity::from_points(preboil_points),
            postboil_gravity: target,
            start_volume,
            final_volume,
        }
    }
}

fn roughly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::max(1e-9, VOLUME_TOLERANCE * f64::max(a.abs(), b.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::vol;

    fn model() -> BoilModel {
        BoilModel {
            boil_off_rate: Quantity::of(0.785, vol::GAL),
            duration_min: 60.0,
            shrinkage_pct: 4.0,
        }
    }

    #[test]
    fn test_boil_off_scales_with_duration() {
        let mut m = model();
        assert!((m.boil_off().in_unit(vol::GAL) - 0.785).abs() < 1e-9);
        m.duration_min = 90.0;
        assert!((m.boil_off().in_unit(vol::GAL) - 1.1775).abs() < 1e-9);
    }

    #[test]
    fn test_forward_inverse_idempotence() {
        let m = model();
        let start = Quantity::of(6.5, vol::GAL);
        let round_tripped = m.start_from_final(m.final_from_start(start));
        assert!((round_tripped.base() - start.base()).abs() < 1e-9);

        let final_volume = Quantity::of(5.0, vol::GAL);
        let round_tripped = m.final_from_start(m.start_from_final(final_volume));
        assert!((round_tripped.base() - final_volume.base()).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_requires_a_volume() {
        let err = model().resolve_volumes(None, None).unwrap_err();
        assert!(matches!(err, PlanError::MissingVolume));
    }

    #[test]
    fn test_resolve_derives_missing_side() {
        let m = model();
        let (start, final_volume) = m
            .resolve_volumes(Some(Quantity::of(6.5, vol::GAL)), None)
            .unwrap();
        assert!((final_volume.base() - m.final_from_start(start).base()).abs() < 1e-12);

        let (start, final_volume) = m
            .resolve_volumes(None, Some(Quantity::of(5.0, vol::GAL)))
            .unwrap();
        assert!((start.base() - m.start_from_final(final_volume).base()).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_accepts_consistent_pair_within_tolerance() {
        let m = model();
        let start = Quantity::of(6.5, vol::GAL);
        // Nudge the derived figure by less than the tolerance.
        let final_volume = m.final_from_start(start) * (1.0 + 1e-8);
        assert!(m.resolve_volumes(Some(start), Some(final_volume)).is_ok());
    }

    #[test]
    fn test_resolve_rejects_inconsistent_pair() {
        let m = model();
        let err = m
            .resolve_volumes(
                Some(Quantity::of(6.5, vol::GAL)),
                Some(Quantity::of(6.5, vol::GAL)),
            )
            .unwrap_err();
        assert!(matches!(err, PlanError::InconsistentVolumes { .. }));
    }

    #[test]
    fn test_capacity_notice_only_when_short() {
        let m = model();
        assert!(m
            .capacity_notice(Quantity::of(5.0, vol::GAL), Quantity::of(6.5, vol::GAL))
            .is_none());

        let notice = m
            .capacity_notice(Quantity::of(7.285, vol::GAL), Quantity::of(6.5, vol::GAL))
            .expect("draw exceeds kettle");
        assert!((notice.extra_min - 60.0).abs() < 1e-6);
        assert!((notice.new_duration_min - 120.0).abs() < 1e-6);
        assert!(notice.extra_min > 0.0);
    }

    #[test]
    fn test_summary_gravities() {
        let m = model();
        let target = Gravity::from_points(50.0);
        let summary = m.summary(
            target,
            Quantity::of(6.0, vol::GAL),
            Quantity::of(5.0, vol::GAL),
        );
        assert!((summary.preboil_gravity.points() - 50.0 * 5.0 / 6.0).abs() < 1e-9);
        assert_eq!(summary.postboil_gravity, target);
    }
}
