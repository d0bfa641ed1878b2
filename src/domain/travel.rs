// Travel histogram and travel summary statistics
use super::analysis::TravelHistogram;
use super::stats::{mean, percentile, to_percent};
use super::telemetry::Strokes;

/// Gap between neighbouring histogram bars, in travel percentage points.
pub const BAR_GAP_PERCENT: f64 = 0.75;
/// Bars never shrink below this fraction of their bin width.
const MIN_BAR_FRACTION: f64 = 0.1;

/// Travel histogram over `strokes`.
///
/// `travel` is the (possibly windowed) travel series and `selection_start` the
/// absolute index of its first sample; stroke indices are absolute.
pub fn travel_histogram(
    strokes: &Strokes,
    travel: &[f64],
    bins_mm: &[f64],
    max_travel_mm: f64,
    selection_start: usize,
) -> TravelHistogram {
    if max_travel_mm == 0.0 {
        tracing::warn!("Max travel is 0, travel percentages will be 0");
    }

    let mut histogram = TravelHistogram {
        time_percent: time_distribution(strokes, bins_mm),
        bottomouts: strokes.iter().map(|s| s.stat.bottomouts).sum(),
        ..Default::default()
    };
    fill_bin_geometry(&mut histogram, bins_mm, max_travel_mm);

    let samples = stroke_samples(strokes, travel, selection_start);
    if let (Some(avg), Some(p95)) = (mean(&samples), percentile(&samples, 95.0)) {
        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        histogram.avg_mm = avg;
        histogram.max_mm = max;
        histogram.p95_mm = p95;
        histogram.avg_percent = to_percent(avg, max_travel_mm);
        histogram.max_percent = to_percent(max, max_travel_mm);
        histogram.p95_percent = to_percent(p95, max_travel_mm);
    }

    histogram
}

/// Share of in-stroke time spent in each travel bin, in percent.
fn time_distribution(strokes: &Strokes, bins_mm: &[f64]) -> Vec<f64> {
    let bin_count = bins_mm.len().saturating_sub(1);
    let mut hist = vec![0.0; bin_count];
    if bin_count == 0 {
        return hist;
    }

    let mut total = 0usize;
    for stroke in strokes.iter() {
        total += stroke.stat.count;
        for &idx in &stroke.digitized_travel {
            hist[idx.min(bin_count - 1)] += 1.0;
        }
    }

    let total = total as f64;
    hist.iter_mut().for_each(|h| *h = to_percent(*h, total));
    hist
}

fn fill_bin_geometry(histogram: &mut TravelHistogram, bins_mm: &[f64], max_travel_mm: f64) {
    let bin_count = bins_mm.len().saturating_sub(1);
    histogram.travel_mids_mm = bins_mm
        .windows(2)
        .map(|edge| (edge[0] + edge[1]) / 2.0)
        .collect();

    if max_travel_mm > 0.0 {
        histogram.travel_mids_percent = histogram
            .travel_mids_mm
            .iter()
            .map(|mid| mid / max_travel_mm * 100.0)
            .collect();
        histogram.bin_widths_percent = bins_mm
            .windows(2)
            .map(|edge| {
                let full = (edge[1] - edge[0]) / max_travel_mm * 100.0;
                (full - BAR_GAP_PERCENT).max(full * MIN_BAR_FRACTION)
            })
            .collect();
    } else {
        histogram.travel_mids_percent = vec![0.0; bin_count];
        histogram.bin_widths_percent = vec![0.0; bin_count];
    }
}

/// Travel samples covered by `strokes`, clamped to the selected window.
fn stroke_samples(strokes: &Strokes, travel: &[f64], selection_start: usize) -> Vec<f64> {
    let mut samples = Vec::new();
    for stroke in strokes.iter() {
        let start = stroke.start.saturating_sub(selection_start);
        let end = (stroke.end + 1)
            .saturating_sub(selection_start)
            .min(travel.len());
        if start < end {
            samples.extend_from_slice(&travel[start..end]);
        }
    }
    samples
}
