use serde::Serialize;
use std::cmp::Ordering;

use crate::plan::error::PlanError;
use crate::plan::lot::Lot;
use crate::units::{Gravity, Quantity, Vol};

/// How much of one lot to collect. `lot` is the index of the lot in the
/// caller's input order, so a renderer can number draws however it likes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LotDraw {
    pub lot: usize,
    pub volume: Quantity<Vol>,
}

/// A feasible collection plan. Only lots that are actually used appear in
/// `entries`; every entry is the lot's full volume except possibly the
/// last, which may be fractional.
#[derive(Debug, Clone, Serialize)]
pub struct BlendPlan {
    pub entries: Vec<LotDraw>,
    pub drawn_volume: Quantity<Vol>,
    pub topoff: Quantity<Vol>,
}

/// Decide how much of each lot to collect so the pooled wort, boiled down
/// from `start_volume` to `final_volume`, lands on `target`.
///
/// Lots are consumed richest-first (a stable sort, so equal gravities keep
/// their input order) unless `keep_order` is set. Gravity points are
/// conserved through the boil, so the sugar requirement is
/// `target.points() × final_volume` regardless of the draw volume.
pub fn plan_blend(
    target: Gravity,
    final_volume: Quantity<Vol>,
    start_volume: Quantity<Vol>,
    lots: &[Lot],
    keep_order: bool,
) -> Result<BlendPlan, PlanError> {
    let mut order: Vec<usize> = (0..lots.len()).collect();
    if !keep_order {
        order.sort_by(|&a, &b| {
            lots[b]
                .gravity
                .partial_cmp(&lots[a].gravity)
                .unwrap_or(Ordering::Equal)
        });
    }

    let needed_sugar = target.points() * final_volume.base();

    // Prefix sums over the consumption order; index k covers the first k lots.
    let mut total_sugars = vec![0.0];
    let mut total_volumes = vec![0.0];
    let mut sugar_acc = 0.0;
    let mut volume_acc = 0.0;
    for &i in &order {
        sugar_acc += lots[i].sugar();
        volume_acc += lots[i].volume.base();
        total_sugars.push(sugar_acc);
        total_volumes.push(volume_acc);
    }

    let supplied = total_sugars[lots.len()];
    if supplied < needed_sugar {
        return Err(PlanError::Infeasible {
            max_batch_size: Quantity::from_base(supplied / target.points()),
            target,
        });
    }

    // First prefix that meets the requirement; exact ties take the smaller
    // index, so an exactly-sufficient prefix is used in full.
    let k = total_sugars
        .iter()
        .position(|&t| t >= needed_sugar)
        .unwrap_or(lots.len());

    if k == 0 {
        // Nothing to draw; the batch is all top-off water.
        return Ok(BlendPlan {
            entries: Vec::new(),
            drawn_volume: Quantity::zero(),
            topoff: clamp_topoff(start_volume, Quantity::zero()),
        });
    }

    // The requirement is crossed inside lot k-1: interpolate cumulative
    // sugar linearly within it (exact, since a lot's gravity is uniform).
    let fraction = (needed_sugar - total_sugars[k - 1]) / (total_sugars[k] - total_sugars[k - 1]);
    let fractional_volume = lots[order[k - 1]].volume * fraction;

    let mut entries: Vec<LotDraw> = order[..k - 1]
        .iter()
        .filter(|&&i| lots[i].volume.base() > 0.0)
        .map(|&i| LotDraw {
            lot: i,
            volume: lots[i].volume,
        })
        .collect();
    entries.push(LotDraw {
        lot: order[k - 1],
        volume: fractional_volume,
    });

    let drawn_volume = Quantity::from_base(total_volumes[k - 1]) + fractional_volume;

    Ok(BlendPlan {
        entries,
        drawn_volume,
        topoff: clamp_topoff(start_volume, drawn_volume),
    })
}

fn clamp_topoff(start: Quantity<Vol>, drawn: Quantity<Vol>) -> Quantity<Vol> {
    if start > drawn {
        start - drawn
    } else {
        Quantity::zero()
    }
}
