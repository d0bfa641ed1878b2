// Analysis result domain models
use serde::Serialize;

/// Power spectrum of the travel signal, truncated to the display band.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Spectrum {
    pub freqs: Vec<f64>,
    pub spectrum: Vec<f64>,
}

impl Spectrum {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Time spent per travel bucket plus travel summary statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TravelHistogram {
    pub travel_mids_mm: Vec<f64>,
    pub travel_mids_percent: Vec<f64>,
    pub time_percent: Vec<f64>,
    pub bin_widths_percent: Vec<f64>,
    pub avg_mm: f64,
    pub max_mm: f64,
    pub p95_mm: f64,
    pub avg_percent: f64,
    pub max_percent: f64,
    pub p95_percent: f64,
    pub bottomouts: u32,
}

/// Fitted normal distribution, sampled for an overlay line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalCurve {
    pub pdf: Vec<f64>,
    pub velocity: Vec<f64>,
}

/// Per-class velocity summary. NaN marks a class with no strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VelocityStats {
    pub avg_compression: f64,
    pub max_compression: f64,
    pub p95_compression: f64,
    pub avg_rebound: f64,
    pub max_rebound: f64,
    pub p95_rebound: f64,
}

impl Default for VelocityStats {
    fn default() -> Self {
        Self {
            avg_compression: f64::NAN,
            max_compression: f64::NAN,
            p95_compression: f64::NAN,
            avg_rebound: f64::NAN,
            max_rebound: f64::NAN,
            p95_rebound: f64::NAN,
        }
    }
}

/// Travel-bucketed velocity distribution. Outer index is the coarse travel bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VelocityHistogram {
    pub coarse: Vec<Vec<f64>>,
    pub coarse_centers: Vec<f64>,
    pub coarse_largest_bin: f64,
    pub fine: Vec<Vec<f64>>,
    pub fine_centers: Vec<f64>,
    pub fine_largest_bin: f64,
    pub travel_divider: usize,
    pub normal: NormalCurve,
    pub fine_normal: NormalCurve,
    pub stats: VelocityStats,
}

/// Share of in-stroke samples per speed band, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VelocityBands {
    pub lsc: f64,
    pub hsc: f64,
    pub lsr: f64,
    pub hsr: f64,
}

impl VelocityBands {
    pub fn total(&self) -> f64 {
        self.lsc + self.hsc + self.lsr + self.hsr
    }
}

/// Stroke peaks of one wheel, sorted by travel, with a fitted trend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalanceSeries {
    pub travel: Vec<f64>,
    pub velocity: Vec<f64>,
    pub trend: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Balance {
    pub front: BalanceSeries,
    pub rear: BalanceSeries,
    pub range_end: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalanceAnalysis {
    pub compression: Balance,
    pub rebound: Balance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuspensionAnalysis {
    pub thist: TravelHistogram,
    pub vhist: VelocityHistogram,
    pub vbands: VelocityBands,
    pub fft: Spectrum,
}

/// Response payload for one session and selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionAnalysis {
    pub front: Option<SuspensionAnalysis>,
    pub rear: Option<SuspensionAnalysis>,
    pub balance: Option<BalanceAnalysis>,
}
