// Velocity histograms, velocity statistics and speed bands
use super::analysis::{NormalCurve, VelocityBands, VelocityHistogram, VelocityStats};
use super::stats::{linspace, mean, normal_pdf, percentile, std_dev, to_percent};
use super::telemetry::{Stroke, Strokes};

/// Number of travel buckets the velocity histograms are split into.
pub const TRAVEL_BUCKETS: usize = 10;
/// Samples on the fitted normal curve.
const NORMAL_CURVE_POINTS: usize = 100;
const ZERO_SPREAD: f64 = 1e-9;

/// Bin edges of a velocity axis.
struct VelocityAxis<'a> {
    edges: &'a [f64],
}

impl<'a> VelocityAxis<'a> {
    fn new(edges: &'a [f64]) -> Self {
        Self { edges }
    }

    fn bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    fn step(&self) -> f64 {
        if self.edges.len() > 1 {
            self.edges[1] - self.edges[0]
        } else {
            1.0
        }
    }

    fn centers(&self) -> Vec<f64> {
        let half = self.step() / 2.0;
        self.edges
            .iter()
            .take(self.bins())
            .map(|edge| edge + half)
            .collect()
    }

    fn center(&self, bin: usize) -> f64 {
        (self.edges[bin] + self.edges[bin + 1]) / 2.0
    }
}

/// Coarse travel buckets and the divider mapping a travel bin onto one.
fn travel_buckets(travel_bins: &[f64]) -> (usize, usize) {
    let bins = travel_bins.len().saturating_sub(1);
    if bins == 0 {
        (1, 1)
    } else {
        (TRAVEL_BUCKETS, bins.div_ceil(TRAVEL_BUCKETS).max(1))
    }
}

/// Largest column sum over travel buckets, the stacked bar height.
fn largest_bin(hist: &[Vec<f64>]) -> f64 {
    let columns = hist.first().map_or(0, Vec::len);
    (0..columns)
        .map(|col| hist.iter().map(|row| row[col]).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Travel-bucketed velocity histograms with statistics and normal overlays.
pub fn velocity_histogram(
    strokes: &Strokes,
    velocity: &[f64],
    travel_bins: &[f64],
    velocity_bins: &[f64],
    fine_velocity_bins: &[f64],
    high_speed_threshold: f64,
) -> VelocityHistogram {
    let coarse_axis = VelocityAxis::new(velocity_bins);
    let fine_axis = VelocityAxis::new(fine_velocity_bins);
    let (buckets, divider) = travel_buckets(travel_bins);
    let fine_limit = high_speed_threshold + fine_axis.step() / 2.0;

    let mut coarse = vec![vec![0.0; coarse_axis.bins()]; buckets];
    let mut fine = vec![vec![0.0; fine_axis.bins()]; buckets];
    let mut total = 0usize;

    for stroke in strokes.iter().filter(|s| s.stat.count > 0) {
        total += stroke.stat.count;

        let samples = stroke
            .stat
            .count
            .min(stroke.digitized_travel.len())
            .min(stroke.digitized_velocity.len())
            .min(stroke.fine_digitized_velocity.len());

        for i in 0..samples {
            let bucket = (stroke.digitized_travel[i] / divider).min(buckets - 1);

            if coarse_axis.bins() > 0 {
                let bin = stroke.digitized_velocity[i].min(coarse_axis.bins() - 1);
                coarse[bucket][bin] += 1.0;
            }

            if fine_axis.bins() > 0 {
                let bin = stroke.fine_digitized_velocity[i].min(fine_axis.bins() - 1);
                let center = fine_axis.center(bin);
                if -fine_limit < center && center < fine_limit {
                    fine[bucket][bin] += 1.0;
                }
            }
        }
    }

    let total = total as f64;
    for row in coarse.iter_mut().chain(fine.iter_mut()) {
        row.iter_mut().for_each(|v| *v = to_percent(*v, total));
    }

    VelocityHistogram {
        coarse_largest_bin: largest_bin(&coarse),
        fine_largest_bin: largest_bin(&fine),
        coarse,
        fine,
        coarse_centers: coarse_axis.centers(),
        fine_centers: fine_axis.centers(),
        travel_divider: divider,
        normal: normal_curve(strokes, velocity, coarse_axis.step()),
        fine_normal: normal_curve(strokes, velocity, fine_axis.step()),
        stats: velocity_stats(strokes, velocity),
    }
}

/// Velocity samples of every stroke that fits inside the series.
fn stroke_velocities<'a>(
    strokes: impl Iterator<Item = &'a Stroke> + 'a,
    velocity: &'a [f64],
) -> impl Iterator<Item = f64> + 'a {
    strokes
        .filter_map(move |s| s.sample_range(velocity.len()))
        .flat_map(move |range| velocity[range].iter().copied())
}

/// Average, peak and 95th percentile velocity for compressions and rebounds.
///
/// The rebound percentile is taken over magnitudes and negated.
pub fn velocity_stats(strokes: &Strokes, velocity: &[f64]) -> VelocityStats {
    let mut stats = VelocityStats::default();

    if !strokes.compressions.is_empty() {
        let sum: f64 = strokes.compressions.iter().map(|s| s.stat.sum_velocity).sum();
        let count: usize = strokes.compressions.iter().map(|s| s.stat.count).sum();
        if count > 0 {
            stats.avg_compression = sum / count as f64;
        }
        stats.max_compression = strokes
            .compressions
            .iter()
            .map(|s| s.stat.max_velocity)
            .fold(f64::NEG_INFINITY, f64::max);

        let positive: Vec<f64> = stroke_velocities(strokes.compressions.iter(), velocity)
            .filter(|v| *v > 0.0)
            .collect();
        stats.p95_compression = percentile(&positive, 95.0).unwrap_or(f64::NAN);
    }

    if !strokes.rebounds.is_empty() {
        let sum: f64 = strokes.rebounds.iter().map(|s| s.stat.sum_velocity).sum();
        let count: usize = strokes.rebounds.iter().map(|s| s.stat.count).sum();
        if count > 0 {
            stats.avg_rebound = sum / count as f64;
        }
        stats.max_rebound = strokes
            .rebounds
            .iter()
            .map(|s| s.stat.max_velocity)
            .fold(f64::INFINITY, f64::min);

        let magnitudes: Vec<f64> = stroke_velocities(strokes.rebounds.iter(), velocity)
            .filter(|v| *v < 0.0)
            .map(f64::abs)
            .collect();
        stats.p95_rebound = percentile(&magnitudes, 95.0).map_or(f64::NAN, |p| -p);
    }

    stats
}

/// Normal distribution fitted to in-stroke velocities, scaled to histogram percent.
pub fn normal_curve(strokes: &Strokes, velocity: &[f64], step: f64) -> NormalCurve {
    let samples: Vec<f64> = stroke_velocities(strokes.iter(), velocity).collect();
    let (Some(mu), Some(sigma)) = (mean(&samples), std_dev(&samples)) else {
        return NormalCurve::default();
    };

    let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < ZERO_SPREAD {
        let height = if sigma == 0.0 { step * 100.0 } else { 0.0 };
        return NormalCurve {
            pdf: vec![height],
            velocity: vec![min],
        };
    }

    let points = linspace(min, max, NORMAL_CURVE_POINTS);
    let pdf = if sigma > ZERO_SPREAD {
        points
            .iter()
            .map(|v| normal_pdf(*v, mu, sigma) * step * 100.0)
            .collect()
    } else {
        vec![0.0; points.len()]
    };

    NormalCurve {
        pdf,
        velocity: points,
    }
}

/// Share of in-stroke samples in the low/high speed compression/rebound bands.
pub fn velocity_bands(strokes: &Strokes, velocity: &[f64], high_speed_threshold: f64) -> VelocityBands {
    if velocity.is_empty() {
        return VelocityBands::default();
    }

    let (mut lsc, mut hsc, mut lsr, mut hsr) = (0usize, 0usize, 0usize, 0usize);
    for stroke in strokes.iter() {
        let Some(range) = stroke.sample_range(velocity.len()) else {
            continue;
        };
        let samples = &velocity[range];
        let low = samples
            .iter()
            .filter(|v| v.abs() < high_speed_threshold)
            .count();
        let high = samples.len() - low;

        if stroke.is_compression() {
            lsc += low;
            hsc += high;
        } else {
            lsr += low;
            hsr += high;
        }
    }

    let total = (lsc + hsc + lsr + hsr) as f64;
    VelocityBands {
        lsc: to_percent(lsc as f64, total),
        hsc: to_percent(hsc as f64, total),
        lsr: to_percent(lsr as f64, total),
        hsr: to_percent(hsr as f64, total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::StrokeStat;

    fn stroke(start: usize, end: usize, max_velocity: f64) -> Stroke {
        Stroke {
            start,
            end,
            stat: StrokeStat {
                count: end - start + 1,
                max_velocity,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn digitized(mut s: Stroke, travel: Vec<usize>, coarse: Vec<usize>, fine: Vec<usize>) -> Stroke {
        s.digitized_travel = travel;
        s.digitized_velocity = coarse;
        s.fine_digitized_velocity = fine;
        s
    }

    fn edges(start: f64, step: f64, count: usize) -> Vec<f64> {
        (0..count).map(|i| start + step * i as f64).collect()
    }

    #[test]
    fn test_bands_split_by_threshold() {
        let strokes = Strokes::new(vec![stroke(0, 3, 250.0)], Vec::new());
        let bands = velocity_bands(&strokes, &[50.0, 250.0, 50.0, 250.0], 200.0);

        assert_eq!(bands.lsc, 50.0);
        assert_eq!(bands.hsc, 50.0);
        assert_eq!(bands.lsr, 0.0);
        assert_eq!(bands.hsr, 0.0);
    }

    #[test]
    fn test_bands_classify_by_stroke_sign() {
        let velocity = [100.0, 300.0, -100.0, -300.0, -50.0, 0.0];
        let strokes = Strokes::new(vec![stroke(0, 1, 300.0)], vec![stroke(2, 4, -300.0)]);

        let bands = velocity_bands(&strokes, &velocity, 200.0);

        assert!((bands.lsc - 20.0).abs() < 1e-9);
        assert!((bands.hsc - 20.0).abs() < 1e-9);
        assert!((bands.lsr - 40.0).abs() < 1e-9);
        assert!((bands.hsr - 20.0).abs() < 1e-9);
        assert!((bands.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_bands_empty_and_out_of_bounds() {
        let strokes = Strokes::new(vec![stroke(0, 10, 1.0)], Vec::new());
        assert_eq!(velocity_bands(&strokes, &[], 200.0), VelocityBands::default());
        assert_eq!(velocity_bands(&strokes, &[1.0, 2.0], 200.0), VelocityBands::default());
    }

    #[test]
    fn test_stats_per_class() {
        let velocity = [100.0, 300.0, 200.0, -100.0, -400.0, -200.0];
        let mut compression = stroke(0, 2, 300.0);
        compression.stat.sum_velocity = 600.0;
        let mut rebound = stroke(3, 5, -400.0);
        rebound.stat.sum_velocity = -700.0;
        let strokes = Strokes::new(vec![compression], vec![rebound]);

        let stats = velocity_stats(&strokes, &velocity);

        assert!((stats.avg_compression - 200.0).abs() < 1e-9);
        assert_eq!(stats.max_compression, 300.0);
        assert!((stats.p95_compression - 290.0).abs() < 1e-9);
        assert!((stats.avg_rebound + 700.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.max_rebound, -400.0);
        assert!((stats.p95_rebound + 380.0).abs() < 1e-9);
    }

    #[test]
    fn test_stats_missing_class_is_nan() {
        let strokes = Strokes::new(vec![stroke(0, 1, 5.0)], Vec::new());
        let stats = velocity_stats(&strokes, &[1.0, 5.0]);

        assert!(stats.max_compression.is_finite());
        assert!(stats.avg_rebound.is_nan());
        assert!(stats.max_rebound.is_nan());
        assert!(stats.p95_rebound.is_nan());
    }

    #[test]
    fn test_stats_extreme_peaks_across_strokes() {
        let strokes = Strokes::new(
            vec![stroke(0, 0, 120.0), stroke(1, 1, 480.0)],
            vec![stroke(2, 2, -90.0), stroke(3, 3, -510.0)],
        );
        let stats = velocity_stats(&strokes, &[120.0, 480.0, -90.0, -510.0]);
        assert_eq!(stats.max_compression, 480.0);
        assert_eq!(stats.max_rebound, -510.0);
    }

    #[test]
    fn test_normal_curve_empty() {
        let curve = normal_curve(&Strokes::default(), &[1.0, 2.0], 10.0);
        assert!(curve.pdf.is_empty());
        assert!(curve.velocity.is_empty());
    }

    #[test]
    fn test_normal_curve_zero_spread() {
        let strokes = Strokes::new(vec![stroke(0, 3, 7.0)], Vec::new());
        let curve = normal_curve(&strokes, &[7.0; 4], 10.0);
        assert_eq!(curve.velocity, vec![7.0]);
        assert_eq!(curve.pdf, vec![1000.0]);
    }

    #[test]
    fn test_normal_curve_shape() {
        let velocity: Vec<f64> = (-50..=50).map(|v| v as f64).collect();
        let strokes = Strokes::new(vec![stroke(0, 100, 50.0)], Vec::new());

        let curve = normal_curve(&strokes, &velocity, 1.0);

        assert_eq!(curve.pdf.len(), 100);
        assert_eq!(curve.velocity.len(), 100);
        assert_eq!(curve.velocity[0], -50.0);
        assert_eq!(curve.velocity[99], 50.0);
        assert!(curve.pdf.iter().all(|p| p.is_finite() && *p > 0.0));
        assert!(curve.pdf[50] > curve.pdf[0]);
    }

    #[test]
    fn test_histogram_percentages_sum_to_hundred() {
        let travel_bins = edges(0.0, 10.0, 21);
        let velocity_bins = edges(-1000.0, 100.0, 21);
        let fine_bins = edges(-1000.0, 20.0, 101);
        let compression = digitized(
            stroke(0, 3, 300.0),
            vec![0, 5, 19, 25],
            vec![10, 11, 13, 40],
            vec![50, 52, 55, 60],
        );
        let rebound = digitized(stroke(4, 5, -150.0), vec![3, 4], vec![9, 8], vec![49, 45]);
        let strokes = Strokes::new(vec![compression], vec![rebound]);

        let hist = velocity_histogram(&strokes, &[0.0; 6], &travel_bins, &velocity_bins, &fine_bins, 200.0);

        assert_eq!(hist.travel_divider, 2);
        assert_eq!(hist.coarse.len(), TRAVEL_BUCKETS);
        assert_eq!(hist.coarse[0].len(), 20);
        let coarse_sum: f64 = hist.coarse.iter().flatten().sum();
        assert!((coarse_sum - 100.0).abs() < 1e-6);

        // Travel bin 25 clamps into the last bucket, velocity bin 40 into the last column.
        assert!((hist.coarse[9][19] - 100.0 / 6.0).abs() < 1e-9);
        // Travel bins 3 and 4 share bucket 1.
        assert!((hist.coarse[1][9] - 100.0 / 6.0).abs() < 1e-9);
        assert!((hist.coarse[2][8] - 100.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_fine_histogram_limited_to_low_speed() {
        let travel_bins = edges(0.0, 10.0, 11);
        let velocity_bins = edges(-1000.0, 100.0, 21);
        let fine_bins = edges(-1000.0, 20.0, 101);
        // Fine bin 50 is centered at 10 mm/s, bin 70 at 410 mm/s, bin 39 at -210 mm/s.
        let strokes = Strokes::new(
            vec![digitized(stroke(0, 2, 410.0), vec![0, 0, 0], vec![10, 10, 14], vec![50, 70, 39])],
            Vec::new(),
        );

        let hist = velocity_histogram(&strokes, &[0.0; 3], &travel_bins, &velocity_bins, &fine_bins, 200.0);

        let fine_sum: f64 = hist.fine.iter().flatten().sum();
        assert!((fine_sum - 100.0 / 3.0).abs() < 1e-9);
        assert!((hist.fine[0][50] - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(hist.fine_centers.len(), 100);
        assert!((hist.fine_centers[50] - 10.0).abs() < 1e-9);
        assert!((hist.coarse_largest_bin - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_empty_inputs() {
        let hist = velocity_histogram(&Strokes::default(), &[], &[], &[], &[], 200.0);

        assert_eq!(hist.travel_divider, 1);
        assert_eq!(hist.coarse, vec![Vec::<f64>::new()]);
        assert!(hist.coarse_centers.is_empty());
        assert_eq!(hist.coarse_largest_bin, 0.0);
        assert!(hist.normal.pdf.is_empty());
        assert!(hist.stats.avg_compression.is_nan());
    }

    #[test]
    fn test_histogram_all_zero_without_samples() {
        let travel_bins = edges(0.0, 10.0, 11);
        let velocity_bins = edges(-100.0, 50.0, 5);
        let hist = velocity_histogram(&Strokes::default(), &[], &travel_bins, &velocity_bins, &velocity_bins, 200.0);

        assert!(hist.coarse.iter().flatten().all(|v| *v == 0.0));
        assert_eq!(hist.coarse_centers, vec![-75.0, -25.0, 25.0, 75.0]);
    }
}
