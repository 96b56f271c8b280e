// Human-readable rendering of snapshots and routing decisions.

use std::time::Duration;

use hdrhistogram::Histogram;
use itertools::Itertools;

use crate::engine::ranker::Ranker;
use crate::engine::router::RouteDecision;
use crate::engine::types::{AllocationPlan, VenueSet};

const TABLE_TOP: &str = "┌─────────┬──────────┬──────────┬──────────┬──────────┐";
const TABLE_HEAD: &str = "│ Exchange│   Price  │ Latency  │ Volume   │ Score    │";
const TABLE_RULE: &str = "├─────────┼──────────┼──────────┼──────────┼──────────┤";
const TABLE_BOTTOM: &str = "└─────────┴──────────┴──────────┴──────────┴──────────┘";

pub fn venue_table(venues: &VenueSet) -> String {
    let rows = venues.iter().map(|v| {
        format!(
            "│ {:<7} │ {:>8.2} │ {:>8.2} │ {:>8} │ {:>8.2} │",
            v.identifier, v.price, v.latency, v.volume, v.score
        )
    });
    let mut lines = [TABLE_TOP.to_string(), TABLE_HEAD.to_string(), TABLE_RULE.to_string()]
        .into_iter()
        .chain(rows)
        .chain(std::iter::once(TABLE_BOTTOM.to_string()));
    format!("{}\n", lines.join("\n"))
}

pub fn allocation_report(plan: &AllocationPlan) -> String {
    let fills = plan
        .allocations
        .iter()
        .map(|a| format!("✅ {}: Allocated {} shares (Score: {:.2})\n", a.venue, a.quantity, a.score))
        .join("");
    let outcome = if plan.is_fully_filled() {
        "🎉 Order fully fulfilled.".to_string()
    } else {
        format!("❌ Unable to fully fulfill the order. {} shares remaining.", plan.remaining_unfilled)
    };
    format!("Allocating {} shares based on ranking:\n\n{}\n{}\n", plan.requested, fills, outcome)
}

pub fn decision_report(decision: &RouteDecision) -> String {
    let ranking = decision.ranked.iter().map(|v| v.identifier.as_str()).join(" > ");
    format!(
        "Ranking ({}): {}\n\n{}\n{}Execution time: {:.3} ms\n",
        decision.strategy.name(),
        ranking,
        venue_table(&decision.ranked),
        allocation_report(&decision.plan),
        millis(decision.elapsed)
    )
}

/// Latency summary over repeated routing passes (recorded in microseconds).
pub fn latency_summary(histogram: &Histogram<u64>) -> String {
    format!(
        "Routing latency over {} runs: p50 {} us | p99 {} us | max {} us",
        histogram.len(),
        histogram.value_at_quantile(0.50),
        histogram.value_at_quantile(0.99),
        histogram.max()
    )
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Allocation, Venue};

    #[test]
    fn test_venue_table_rows() {
        let set = VenueSet::new(vec![Venue::new("SGX", 101.5, 5.2, 700)]).unwrap();
        let table = venue_table(&set);
        assert!(table.contains("│ SGX     │   101.50 │     5.20 │      700 │     0.00 │"));
        assert_eq!(table.lines().count(), 5);
    }

    #[test]
    fn test_allocation_report() {
        let mut plan = AllocationPlan {
            requested: 500,
            allocations: vec![Allocation { venue: "TSE".into(), quantity: 400, score: 0.5 }],
            remaining_unfilled: 100,
        };
        let text = allocation_report(&plan);
        assert!(text.contains("✅ TSE: Allocated 400 shares (Score: 0.50)"));
        assert!(text.contains("100 shares remaining"));

        plan.remaining_unfilled = 0;
        assert!(allocation_report(&plan).contains("Order fully fulfilled"));
    }

    #[test]
    fn test_decision_report_sections() {
        let decision = crate::engine::router::SmartOrderRouter::default()
            .route(VenueSet::new(vec![Venue::new("SGX", 101.5, 5.2, 700)]).unwrap(), 1000)
            .unwrap();
        let text = decision_report(&decision);
        assert!(text.starts_with("Ranking (partition): SGX\n\n┌"));
        assert!(text.contains("✅ SGX: Allocated 700 shares"));
        assert!(text.contains("300 shares remaining.\nExecution time:"));
        assert!(text.ends_with(" ms\n"));
    }

    #[test]
    fn test_latency_summary() {
        let mut histogram = Histogram::<u64>::new(3).unwrap();
        for us in [10, 20, 30] {
            histogram.saturating_record(us);
        }
        let text = latency_summary(&histogram);
        assert!(text.starts_with("Routing latency over 3 runs"));
        assert!(text.contains("max 30 us"));
    }
}
