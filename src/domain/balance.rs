// Front/rear balance of stroke peaks
use super::analysis::{Balance, BalanceSeries};
use super::stats::{linear_fit, to_percent};
use super::telemetry::{Stroke, Wheel};

const DEFAULT_RANGE_END: f64 = 100.0;

/// Peak travel (percent of max) against peak velocity for one wheel, sorted by travel.
fn balance_series(strokes: &[Stroke], max_travel_mm: f64, wheel: Wheel) -> BalanceSeries {
    if max_travel_mm == 0.0 && !strokes.is_empty() {
        tracing::warn!("Max {} travel is 0, balance travel percentages will be 0", wheel);
    }

    let mut points: Vec<(f64, f64)> = strokes
        .iter()
        .map(|s| (to_percent(s.stat.max_travel, max_travel_mm), s.stat.max_velocity))
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (travel, velocity): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
    let trend = match linear_fit(&travel, &velocity) {
        Some((slope, intercept)) => travel.iter().map(|x| slope * x + intercept).collect(),
        None => vec![f64::NAN; travel.len()],
    };

    BalanceSeries {
        travel,
        velocity,
        trend,
    }
}

fn range_end(front: &BalanceSeries, rear: &BalanceSeries) -> f64 {
    let end = match (front.travel.last(), rear.travel.last()) {
        (Some(f), Some(r)) => f.max(*r),
        (Some(v), None) | (None, Some(v)) => *v,
        (None, None) => DEFAULT_RANGE_END,
    };

    if end.is_finite() && end > 0.0 {
        end
    } else {
        DEFAULT_RANGE_END
    }
}

/// Balance between the front and rear strokes of one class.
pub fn balance(
    front_strokes: &[Stroke],
    rear_strokes: &[Stroke],
    front_max_travel: f64,
    rear_max_travel: f64,
) -> Balance {
    let front = balance_series(front_strokes, front_max_travel, Wheel::Front);
    let rear = balance_series(rear_strokes, rear_max_travel, Wheel::Rear);
    let range_end = range_end(&front, &rear);

    Balance {
        front,
        rear,
        range_end,
    }
}
