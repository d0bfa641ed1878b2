// Session filter service - Runs every analysis engine over one session and selection
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::analysis::{BalanceAnalysis, SessionAnalysis, SuspensionAnalysis};
use crate::domain::balance::balance;
use crate::domain::selection::{Selection, TimeRange};
use crate::domain::spectrum::travel_spectrum;
use crate::domain::telemetry::{Telemetry, Wheel};
use crate::domain::travel::travel_histogram;
use crate::domain::velocity::{velocity_bands, velocity_histogram};
use crate::infrastructure::config::AnalysisSettings;
use anyhow::Context;
use std::sync::Arc;
use std::time::Instant;

fn analyze_wheel(
    telemetry: &Telemetry,
    wheel: Wheel,
    selection: Selection,
    high_speed_threshold: f64,
) -> Option<SuspensionAnalysis> {
    let suspension = telemetry.suspension(wheel);
    if !suspension.present {
        return None;
    }

    let strokes = selection.strokes(&suspension.strokes);
    let travel = selection.slice(&suspension.travel);

    tracing::debug!(
        "Analyzing {} wheel: {} of {} strokes, {} travel samples",
        wheel,
        strokes.len(),
        suspension.strokes.len(),
        travel.len()
    );

    Some(SuspensionAnalysis {
        thist: travel_histogram(
            &strokes,
            travel,
            &suspension.travel_bins,
            telemetry.max_travel(wheel),
            selection.start(),
        ),
        vhist: velocity_histogram(
            &strokes,
            &suspension.velocity,
            &suspension.travel_bins,
            &suspension.velocity_bins,
            &suspension.fine_velocity_bins,
            high_speed_threshold,
        ),
        vbands: velocity_bands(&strokes, &suspension.velocity, high_speed_threshold),
        fft: travel_spectrum(travel, telemetry.tick()),
    })
}

fn analyze_balance(telemetry: &Telemetry, selection: Selection) -> Option<BalanceAnalysis> {
    if !(telemetry.front.present && telemetry.rear.present) {
        return None;
    }

    let front = selection.strokes(&telemetry.front.strokes);
    let rear = selection.strokes(&telemetry.rear.strokes);
    let front_max = telemetry.max_travel(Wheel::Front);
    let rear_max = telemetry.max_travel(Wheel::Rear);

    Some(BalanceAnalysis {
        compression: balance(&front.compressions, &rear.compressions, front_max, rear_max),
        rebound: balance(&front.rebounds, &rear.rebounds, front_max, rear_max),
    })
}

/// Analyze `telemetry` over `range`; an absent or invalid range means the whole session.
pub fn filter_session(
    telemetry: &Telemetry,
    range: TimeRange,
    high_speed_threshold: f64,
) -> SessionAnalysis {
    let selection = Selection::from_seconds(range, telemetry.sample_rate, telemetry.record_count());

    SessionAnalysis {
        front: analyze_wheel(telemetry, Wheel::Front, selection, high_speed_threshold),
        rear: analyze_wheel(telemetry, Wheel::Rear, selection, high_speed_threshold),
        balance: analyze_balance(telemetry, selection),
    }
}

#[derive(Clone)]
pub struct SessionFilterService {
    repository: Arc<dyn TelemetryRepository>,
    settings: AnalysisSettings,
}

impl SessionFilterService {
    pub fn new(repository: Arc<dyn TelemetryRepository>, settings: AnalysisSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub async fn list_sessions(&self) -> anyhow::Result<Vec<String>> {
        self.repository.list_session_ids().await
    }

    /// Load a session and analyze it on a blocking worker. `None` if the session does not exist.
    pub async fn filter_session(
        &self,
        session_id: &str,
        range: TimeRange,
    ) -> anyhow::Result<Option<SessionAnalysis>> {
        let Some(telemetry) = self.repository.load_telemetry(session_id).await? else {
            return Ok(None);
        };

        let start_time = Instant::now();
        let threshold = self.settings.high_speed_threshold;
        let analysis = tokio::task::spawn_blocking(move || filter_session(&telemetry, range, threshold))
            .await
            .with_context(|| format!("analysis of session {} did not complete", session_id))?;

        tracing::debug!(
            "Filtered session {} in {}ms",
            session_id,
            start_time.elapsed().as_millis()
        );
        Ok(Some(analysis))
    }
}
