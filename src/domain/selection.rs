// Time-range selection and stroke filtering
use super::telemetry::{Stroke, Strokes};

/// A requested time window in seconds, as supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeRange {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl TimeRange {
    pub fn new(start: Option<f64>, end: Option<f64>) -> Self {
        Self { start, end }
    }
}

/// Sample-index window the engines operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The whole session; strokes are used unfiltered.
    Full { len: usize },
    /// Half-open window `[start, end)` with `0 <= start < end < len`.
    Window { start: usize, end: usize },
}

impl Selection {
    /// Convert a seconds-based range to sample indices.
    ///
    /// An absent, non-finite or out-of-bounds range degrades to `Full`.
    pub fn from_seconds(range: TimeRange, sample_rate: u32, count: usize) -> Self {
        let full = Selection::Full { len: count };

        let (Some(start_s), Some(end_s)) = (range.start, range.end) else {
            return full;
        };

        let start = to_index(start_s, sample_rate);
        let end = to_index(end_s, sample_rate);

        match (start, end) {
            (Some(start), Some(end)) if start >= 0 && start < end && (end as usize) < count => {
                Selection::Window {
                    start: start as usize,
                    end: end as usize,
                }
            }
            _ => {
                tracing::warn!(
                    "Discarding invalid selection {:?}..{:?} s for {} samples",
                    range.start,
                    range.end,
                    count
                );
                full
            }
        }
    }

    pub fn start(&self) -> usize {
        match self {
            Selection::Full { .. } => 0,
            Selection::Window { start, .. } => *start,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Selection::Full { .. })
    }

    /// The part of `series` covered by this selection.
    pub fn slice<'a>(&self, series: &'a [f64]) -> &'a [f64] {
        match *self {
            Selection::Full { .. } => series,
            Selection::Window { start, end } => {
                let end = end.min(series.len());
                let start = start.min(end);
                &series[start..end]
            }
        }
    }

    /// Strokes visible under this selection.
    pub fn strokes(&self, strokes: &Strokes) -> Strokes {
        match *self {
            Selection::Full { .. } => strokes.clone(),
            Selection::Window { start, end } => filter_strokes(strokes, start, end),
        }
    }
}

fn to_index(seconds: f64, sample_rate: u32) -> Option<i64> {
    let index = (seconds * sample_rate as f64).floor();
    if index.is_finite() && index >= i64::MIN as f64 && index <= i64::MAX as f64 {
        Some(index as i64)
    } else {
        None
    }
}

fn contained(stroke: &Stroke, start: usize, end: usize) -> bool {
    stroke.start > start && stroke.end < end
}

/// Keep only strokes strictly inside `[start, end)`. Stroke contents are copied as-is.
pub fn filter_strokes(strokes: &Strokes, start: usize, end: usize) -> Strokes {
    let pick = |list: &[Stroke]| -> Vec<Stroke> {
        list.iter()
            .filter(|s| contained(s, start, end))
            .cloned()
            .collect()
    };

    Strokes::new(pick(&strokes.compressions), pick(&strokes.rebounds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(start: usize, end: usize) -> Stroke {
        Stroke {
            start,
            end,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_window() {
        let selection = Selection::from_seconds(TimeRange::new(Some(1.0), Some(2.5)), 100, 1000);
        assert_eq!(selection, Selection::Window { start: 100, end: 250 });
        assert_eq!(selection.start(), 100);
    }

    #[test]
    fn test_floor_conversion() {
        let selection = Selection::from_seconds(TimeRange::new(Some(0.019), Some(0.999)), 100, 1000);
        assert_eq!(selection, Selection::Window { start: 1, end: 99 });
    }

    #[test]
    fn test_invalid_ranges_degrade_to_full() {
        let full = Selection::Full { len: 1000 };
        let cases = [
            TimeRange::new(None, Some(2.0)),
            TimeRange::new(Some(1.0), None),
            TimeRange::new(Some(2.0), Some(2.0)),
            TimeRange::new(Some(3.0), Some(2.0)),
            TimeRange::new(Some(-0.5), Some(2.0)),
            TimeRange::new(Some(1.0), Some(10.0)),
            TimeRange::new(Some(0.0), Some(10.0)),
            TimeRange::new(Some(f64::NAN), Some(2.0)),
            TimeRange::new(Some(0.0), Some(f64::INFINITY)),
        ];
        for range in cases {
            assert_eq!(Selection::from_seconds(range, 100, 1000), full, "{:?}", range);
        }
    }

    #[test]
    fn test_slice_window() {
        let series: Vec<f64> = (0..10).map(|v| v as f64).collect();
        let selection = Selection::Window { start: 2, end: 5 };
        assert_eq!(selection.slice(&series), &[2.0, 3.0, 4.0]);
        assert_eq!(Selection::Full { len: 10 }.slice(&series).len(), 10);
    }

    #[test]
    fn test_filter_strict_containment() {
        let strokes = Strokes::new(
            vec![stroke(10, 20), stroke(25, 40), stroke(50, 60)],
            vec![stroke(21, 24), stroke(40, 49), stroke(60, 70)],
        );

        let filtered = filter_strokes(&strokes, 10, 60);

        assert_eq!(filtered.compressions, vec![stroke(25, 40)]);
        assert_eq!(filtered.rebounds, vec![stroke(21, 24), stroke(40, 49)]);
    }

    #[test]
    fn test_filter_is_subset() {
        let strokes = Strokes::new(
            (0..50).map(|i| stroke(i * 4, i * 4 + 3)).collect(),
            (0..50).map(|i| stroke(i * 4 + 2, i * 4 + 5)).collect(),
        );

        for (start, end) in [(0, 200), (13, 77), (100, 101), (199, 200)] {
            let filtered = filter_strokes(&strokes, start, end);
            for s in filtered.iter() {
                assert!(s.start > start && s.end < end);
                assert!(strokes.iter().any(|o| o == s));
            }
        }
    }

    #[test]
    fn test_full_selection_keeps_strokes() {
        let strokes = Strokes::new(vec![stroke(0, 999)], Vec::new());
        let selection = Selection::Full { len: 1000 };
        assert!(selection.is_full());
        assert_eq!(selection.strokes(&strokes), strokes);
    }
}
