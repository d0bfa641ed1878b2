// Telemetry record domain model
use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` as the type's default, so absent arrays become empty vectors.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StrokeStat {
    #[serde(default)]
    pub sum_travel: f64,
    #[serde(default)]
    pub max_travel: f64,
    #[serde(default)]
    pub p95_travel: f64,
    #[serde(default)]
    pub sum_velocity: f64,
    #[serde(default)]
    pub max_velocity: f64,
    #[serde(default)]
    pub p95_velocity_compression: f64,
    #[serde(default)]
    pub p95_velocity_rebound: f64,
    #[serde(default)]
    pub bottomouts: u32,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Stroke {
    pub start: usize,
    pub end: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stat: StrokeStat,
    #[serde(default, deserialize_with = "null_as_default")]
    pub digitized_travel: Vec<usize>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub digitized_velocity: Vec<usize>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fine_digitized_velocity: Vec<usize>,
}

impl Stroke {
    /// Compression strokes carry a non-negative peak velocity.
    pub fn is_compression(&self) -> bool {
        self.stat.max_velocity >= 0.0
    }

    /// Inclusive sample range of this stroke, if it fits inside a series of `len` samples.
    pub fn sample_range(&self, len: usize) -> Option<std::ops::RangeInclusive<usize>> {
        if self.start <= self.end && self.end < len {
            Some(self.start..=self.end)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Strokes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub compressions: Vec<Stroke>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rebounds: Vec<Stroke>,
}

impl Strokes {
    pub fn new(compressions: Vec<Stroke>, rebounds: Vec<Stroke>) -> Self {
        Self {
            compressions,
            rebounds,
        }
    }

    /// Compressions followed by rebounds.
    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.compressions.iter().chain(self.rebounds.iter())
    }

    pub fn len(&self) -> usize {
        self.compressions.len() + self.rebounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compressions.is_empty() && self.rebounds.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Suspension {
    #[serde(default)]
    pub present: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub travel: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub velocity: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub strokes: Strokes,
    #[serde(default, deserialize_with = "null_as_default")]
    pub travel_bins: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub velocity_bins: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fine_velocity_bins: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Linkage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub head_angle: f64,
    #[serde(default)]
    pub max_front_stroke: f64,
    #[serde(default)]
    pub max_rear_stroke: f64,
    #[serde(default)]
    pub max_front_travel: f64,
    #[serde(default)]
    pub max_rear_travel: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Airtime {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wheel {
    Front,
    Rear,
}

impl std::fmt::Display for Wheel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Wheel::Front => write!(f, "front"),
            Wheel::Rear => write!(f, "rear"),
        }
    }
}

/// One decoded recording session. Immutable once decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Telemetry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub version: u32,
    pub sample_rate: u32,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub front: Suspension,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rear: Suspension,
    #[serde(default, deserialize_with = "null_as_default")]
    pub linkage: Linkage,
    #[serde(default, deserialize_with = "null_as_default")]
    pub airtimes: Vec<Airtime>,
}

impl Telemetry {
    pub fn suspension(&self, wheel: Wheel) -> &Suspension {
        match wheel {
            Wheel::Front => &self.front,
            Wheel::Rear => &self.rear,
        }
    }

    pub fn max_travel(&self, wheel: Wheel) -> f64 {
        match wheel {
            Wheel::Front => self.linkage.max_front_travel,
            Wheel::Rear => self.linkage.max_rear_travel,
        }
    }

    /// Number of samples in the session: front travel when present, rear otherwise.
    pub fn record_count(&self) -> usize {
        if self.front.present {
            self.front.travel.len()
        } else {
            self.rear.travel.len()
        }
    }

    /// Sampling period in seconds, zero when the sample rate is unusable.
    pub fn tick(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            1.0 / self.sample_rate as f64
        }
    }
}
