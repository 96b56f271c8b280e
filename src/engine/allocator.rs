use tracing::{debug, instrument, warn};

use crate::engine::error::{RouterError, RouterResult};
use crate::engine::types::{Allocation, AllocationPlan, VenueSet};

/// Greedily fill `requested` shares across `ranked`, best venue first.
///
/// Each venue takes `min(volume, remaining)`. Venues with nothing to give are
/// skipped without stopping the walk.
#[instrument(skip(ranked), fields(venues = ranked.len()))]
pub fn allocate(ranked: &VenueSet, requested: i64) -> RouterResult<AllocationPlan> {
    let requested = match u64::try_from(requested) {
        Ok(q) if q > 0 => q,
        _ => return Err(RouterError::InvalidQuantity { quantity: requested }),
    };

    let mut remaining = requested;
    let mut allocations = Vec::new();

    for venue in ranked {
        if remaining == 0 {
            break;
        }
        let quantity = venue.volume.min(remaining);
        if quantity == 0 {
            debug!(venue = %venue.identifier, "Skipping venue with no volume");
            continue;
        }
        remaining -= quantity;
        debug!(venue = %venue.identifier, quantity, score = venue.score, remaining, "Allocated");
        allocations.push(Allocation { venue: venue.identifier.clone(), quantity, score: venue.score });
    }

    if remaining > 0 {
        warn!(requested, remaining, "Unable to fully fill order");
    }

    Ok(AllocationPlan { requested, allocations, remaining_unfilled: remaining })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Venue;

    fn ranked(volumes: &[u64]) -> VenueSet {
        let venues = volumes
            .iter()
            .enumerate()
            .map(|(i, vol)| {
                let mut v = Venue::new(&format!("V{}", i), 100.0, 1.0, *vol);
                v.score = 1.0 - i as f64 * 0.1;
                v
            })
            .collect();
        VenueSet::new(venues).unwrap()
    }

    #[test]
    fn test_fills_in_rank_order() {
        let plan = allocate(&ranked(&[400, 800, 700]), 1000).unwrap();
        assert_eq!(plan.allocations.len(), 2);
        assert_eq!(plan.allocations[0], Allocation { venue: "V0".into(), quantity: 400, score: 1.0 });
        assert_eq!(plan.allocations[1].quantity, 600);
        assert!(plan.is_fully_filled());
    }

    #[test]
    fn test_zero_volume_does_not_halt() {
        let plan = allocate(&ranked(&[0, 50, 0, 30]), 70).unwrap();
        let venues: Vec<&str> = plan.allocations.iter().map(|a| a.venue.as_str()).collect();
        assert_eq!(venues, vec!["V1", "V3"]);
        assert_eq!(plan.quantity_for("V3"), Some(20));
        assert_eq!(plan.remaining_unfilled, 0);
    }

    #[test]
    fn test_partial_fill() {
        let plan = allocate(&ranked(&[10, 20]), 100).unwrap();
        assert_eq!(plan.allocated(), 30);
        assert_eq!(plan.remaining_unfilled, 70);
        assert_eq!(plan.requested, 100);
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let set = ranked(&[10]);
        assert!(matches!(allocate(&set, 0), Err(RouterError::InvalidQuantity { quantity: 0 })));
        assert!(matches!(allocate(&set, -5), Err(RouterError::InvalidQuantity { quantity: -5 })));
    }
}
