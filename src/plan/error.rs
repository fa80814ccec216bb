use std::fmt;

use crate::units::{vol, Gravity, Quantity, Vol};

#[derive(Debug, Clone)]
pub enum PlanError {
    /// The lots cannot supply enough sugar for the requested batch.
    /// `max_batch_size` is the largest post-boil volume the lots could
    /// reach at `target`.
    Infeasible {
        max_batch_size: Quantity<Vol>,
        target: Gravity,
    },
    /// Neither the pre-boil nor the post-boil volume was supplied.
    MissingVolume,
    /// Both volumes were supplied but disagree with the boil-off and
    /// shrinkage model.
    InconsistentVolumes {
        start: Quantity<Vol>,
        final_volume: Quantity<Vol>,
        expected_final: Quantity<Vol>,
    },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Infeasible {
                max_batch_size,
                target,
            } => write!(
                f,
                "Not enough sugar in the runnings: at {} the largest possible batch is {:.3} gal",
                target,
                max_batch_size.in_unit(vol::GAL)
            ),
            PlanError::MissingVolume => write!(
                f,
                "At least one of the pre-boil or post-boil volume must be supplied"
            ),
            PlanError::InconsistentVolumes {
                start,
                final_volume,
                expected_final,
            } => write!(
                f,
                "Pre-boil {:.3} gal and post-boil {:.3} gal disagree with the boil model (expected post-boil {:.3} gal)",
                start.in_unit(vol::GAL),
                final_volume.in_unit(vol::GAL),
                expected_final.in_unit(vol::GAL)
            ),
        }
    }
}

impl std::error::Error for PlanError {}
