// Frequency-domain analysis of suspension travel
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

use super::analysis::Spectrum;

/// Frequency resolution the transform length is chosen for, in Hz.
pub const TARGET_RESOLUTION: f64 = 0.025;
/// Highest frequency kept in the output, in Hz.
pub const CUTOFF_FREQUENCY: f64 = 10.0;
const CUTOFF_TOLERANCE: f64 = 1e-9;

/// Power spectrum of a travel series sampled every `tick` seconds.
///
/// Series shorter than one transform length get a single zero-padded FFT;
/// longer ones a Hann-windowed, half-overlapping averaged periodogram.
/// Never fails: degenerate input yields an empty spectrum.
pub fn travel_spectrum(travel: &[f64], tick: f64) -> Spectrum {
    if travel.is_empty() || !tick.is_finite() || tick <= 0.0 {
        return Spectrum::empty();
    }

    let fs = 1.0 / tick;
    let n = (fs / TARGET_RESOLUTION).ceil();
    if !n.is_finite() || n < 1.0 {
        return Spectrum::empty();
    }
    let n = n as usize;

    let mean = travel.iter().sum::<f64>() / travel.len() as f64;
    let balanced: Vec<f64> = travel.iter().map(|v| v - mean).collect();

    let power = if balanced.len() < n {
        padded_power(&balanced, n)
    } else {
        averaged_periodogram(&balanced, n)
    };

    let mut spectrum = Spectrum::empty();
    for (k, p) in power.into_iter().enumerate() {
        let freq = k as f64 * fs / n as f64;
        if freq > CUTOFF_FREQUENCY + CUTOFF_TOLERANCE {
            break;
        }
        spectrum.freqs.push(freq);
        spectrum.spectrum.push(finite_power(p));
    }

    tracing::debug!(
        "Computed {} spectrum bins from {} samples (nfft={})",
        spectrum.freqs.len(),
        travel.len(),
        n
    );
    spectrum
}

fn finite_power(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else if p == f64::INFINITY {
        f32::MAX as f64
    } else if p == f64::NEG_INFINITY {
        0.0
    } else {
        p
    }
}

/// One-sided squared magnitude of a forward FFT of `signal` zero-padded to `n`.
fn padded_power(signal: &[f64], n: usize) -> Vec<f64> {
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .take(n)
        .map(|&re| Complex::new(re, 0.0))
        .collect();
    buffer.resize(n, Complex::new(0.0, 0.0));
    fft.process(&mut buffer);

    buffer[..n / 2 + 1].iter().map(|c| c.norm_sqr()).collect()
}

/// Periodic Hann window of length `n`.
fn hann(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / n as f64).cos())
        .collect()
}

/// Welch estimate with segment length `n`, 50% overlap, per-segment mean removal
/// and power-spectrum scaling, averaged over segments.
fn averaged_periodogram(signal: &[f64], n: usize) -> Vec<f64> {
    let overlap = n / 2;
    let step = n - overlap;
    let segments = (signal.len() - overlap) / step;
    let bins = n / 2 + 1;

    let window = hann(n);
    let window_sum: f64 = window.iter().sum();
    let scale = 1.0 / (window_sum * window_sum);

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    let mut buffer = vec![Complex::new(0.0, 0.0); n];
    let mut accumulated = vec![0.0; bins];

    for segment in 0..segments {
        let chunk = &signal[segment * step..segment * step + n];
        let chunk_mean = chunk.iter().sum::<f64>() / n as f64;

        for ((slot, &x), &w) in buffer.iter_mut().zip(chunk).zip(&window) {
            *slot = Complex::new((x - chunk_mean) * w, 0.0);
        }
        fft.process(&mut buffer);

        for (acc, c) in accumulated.iter_mut().zip(&buffer[..bins]) {
            *acc += c.norm_sqr() * scale;
        }
    }

    // Fold the negative frequencies in; DC and (for even n) Nyquist appear once.
    let last_doubled = if n % 2 == 0 { bins - 1 } else { bins };
    for p in accumulated.iter_mut().take(last_doubled).skip(1) {
        *p *= 2.0;
    }

    let segments = segments.max(1) as f64;
    accumulated.iter().map(|p| p / segments).collect()
}
