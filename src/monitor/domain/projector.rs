//! Linear growth projection.

use super::{aggregator::ClusterTotals, model::ClusterSnapshot};

/// How many more VMs shaped like the average running VM still fit.
///
/// Returns 0 when nothing is running, when no resource is consumed at all,
/// or when free capacity is negative.
pub fn predict_growth(snapshot: &ClusterSnapshot) -> u64 {
    project(&ClusterTotals::from_snapshot(snapshot))
}

pub fn project(totals: &ClusterTotals) -> u64 {
    if totals.vms_running == 0 {
        return 0;
    }
    let running = totals.vms_running as f64;

    let limit = [
        (totals.cpu_free, totals.cpu_used),
        (totals.mem_free, totals.mem_used),
        (totals.disk_free, totals.disk_used),
    ]
    .into_iter()
    .filter_map(|(free, used)| {
        let average = used / running;
        (average > 0.0).then(|| free / average)
    })
    .fold(f64::INFINITY, f64::min);

    if !limit.is_finite() || limit <= 0.0 {
        return 0;
    }
    limit.floor() as u64
}
