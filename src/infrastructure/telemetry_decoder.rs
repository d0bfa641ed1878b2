// Decoder for persisted session records
use crate::domain::telemetry::{Suspension, Telemetry, Wheel};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed telemetry record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sample rate must be positive when a wheel is present")]
    InvalidSampleRate,

    #[error("{wheel} stroke {start}..={end} is outside {len} travel samples")]
    StrokeOutOfBounds {
        wheel: Wheel,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("{wheel} stroke starting at {start} has digitized arrays of different lengths")]
    DigitizedLengthMismatch { wheel: Wheel, start: usize },
}

/// Decode and validate one session record.
pub fn decode_telemetry(bytes: &[u8]) -> Result<Telemetry, DecodeError> {
    let telemetry: Telemetry = serde_json::from_slice(bytes)?;
    validate(&telemetry)?;
    Ok(telemetry)
}

fn validate(telemetry: &Telemetry) -> Result<(), DecodeError> {
    if (telemetry.front.present || telemetry.rear.present) && telemetry.sample_rate == 0 {
        return Err(DecodeError::InvalidSampleRate);
    }

    for wheel in [Wheel::Front, Wheel::Rear] {
        let suspension = telemetry.suspension(wheel);
        if suspension.present {
            validate_strokes(suspension, wheel)?;
        }
    }
    Ok(())
}

fn validate_strokes(suspension: &Suspension, wheel: Wheel) -> Result<(), DecodeError> {
    let len = suspension.travel.len();

    for stroke in suspension.strokes.iter() {
        if stroke.sample_range(len).is_none() {
            return Err(DecodeError::StrokeOutOfBounds {
                wheel,
                start: stroke.start,
                end: stroke.end,
                len,
            });
        }

        let populated: Vec<usize> = [
            stroke.digitized_travel.len(),
            stroke.digitized_velocity.len(),
            stroke.fine_digitized_velocity.len(),
        ]
        .into_iter()
        .filter(|l| *l > 0)
        .collect();

        if populated.windows(2).any(|pair| pair[0] != pair[1]) {
            return Err(DecodeError::DigitizedLengthMismatch {
                wheel,
                start: stroke.start,
            });
        }
    }
    Ok(())
}
