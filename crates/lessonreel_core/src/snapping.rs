use crate::timeline::Timeline;

/// Find the nearest snap point within the threshold.
/// Returns the snapped position if within threshold, otherwise `None`.
pub fn find_snap_point(position: f64, snap_points: &[f64], threshold: f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;

    for &point in snap_points {
        let dist = (position - point).abs();
        if dist <= threshold && best.map_or(true, |(_, d)| dist < d) {
            best = Some((point, dist));
        }
    }

    best.map(|(point, _)| point)
}

/// Collect snap points from a timeline: zero, the playhead, and element edges.
pub fn collect_snap_points(timeline: &Timeline, exclude_id: Option<uuid::Uuid>) -> Vec<f64> {
    let mut points = vec![0.0, timeline.current_time()];

    for element in timeline.elements() {
        if Some(element.id()) == exclude_id {
            continue;
        }
        points.push(element.position_start());
        points.push(element.position_end());
    }

    points.sort_by(|a, b| a.total_cmp(b));
    points.dedup();
    points
}

/// Snap a moved span `[start, start + length)` so that either edge lands on
/// a snap point. The closer edge wins; returns the (possibly unchanged) start.
pub fn snap_span(start: f64, length: f64, snap_points: &[f64], threshold: f64) -> f64 {
    let by_start = find_snap_point(start, snap_points, threshold).map(|p| (p, (p - start).abs()));
    let end = start + length;
    let by_end = find_snap_point(end, snap_points, threshold)
        .map(|p| (p - length, (p - end).abs()));

    match (by_start, by_end) {
        (Some((s, ds)), Some((e, de))) => {
            if de < ds {
                e
            } else {
                s
            }
        }
        (Some((s, _)), None) => s,
        (None, Some((e, _))) => e,
        (None, None) => start,
    }
}
