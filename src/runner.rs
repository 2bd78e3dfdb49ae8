//! Practice runner - polls the classifier and drives a practice session.
//!
//! The runner is the interaction loop around [`PracticeSession`]: it calls
//! the scorer on a fixed interval, submits each sample, broadcasts
//! [`PracticeEvent`]s for observers and applies the auto-advance policy.
//! Submits are strictly serialized; the runner is the session's only caller.

use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_stream::wrappers::BroadcastStream;

use crate::config::PracticeConfig;
use crate::error::SessionError;
use crate::grading::{GradeResult, SimilarityScorer};
use crate::session::{PracticeSession, PracticeStatus};
use crate::telemetry::{DiagnosticError, TelemetryHub};

/// Events published while practicing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PracticeEvent {
    Graded { label: String, result: GradeResult },
    Accepted { label: String },
    Advanced { from: String, to: String },
    ScorerError { label: String, message: String },
    Stopped { polls: u64 },
}

/// Polling driver around a practice session
pub struct PracticeRunner<S: SimilarityScorer> {
    session: PracticeSession,
    scorer: S,
    config: PracticeConfig,
    events: broadcast::Sender<PracticeEvent>,
    telemetry: Arc<TelemetryHub>,
    accepted_at: Option<Instant>,
}

impl<S: SimilarityScorer> PracticeRunner<S> {
    pub fn new(session: PracticeSession, scorer: S, config: PracticeConfig) -> Self {
        let (events, _) = broadcast::channel(64);
        let telemetry = Arc::new(TelemetryHub::new(256, 64, config.telemetry_window));
        Self {
            session,
            scorer,
            config,
            events,
            telemetry,
            accepted_at: None,
        }
    }

    /// Report into a shared hub instead of a private one
    pub fn with_telemetry(mut self, telemetry: Arc<TelemetryHub>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn telemetry(&self) -> &TelemetryHub {
        &self.telemetry
    }

    pub fn session(&self) -> &PracticeSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PracticeSession {
        &mut self.session
    }

    pub fn into_session(self) -> PracticeSession {
        self.session
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PracticeEvent> {
        self.events.subscribe()
    }

    /// Events as a stream; lagged receivers skip what they missed
    pub fn event_stream(&self) -> impl Stream<Item = PracticeEvent> {
        BroadcastStream::new(self.events.subscribe())
            .filter_map(|event| futures::future::ready(event.ok()))
    }

    fn emit(&self, event: PracticeEvent) {
        let _ = self.events.send(event);
    }

    /// Score and grade one frame ("Check Now")
    ///
    /// A failed scoring call counts as a no-signal frame.
    pub async fn check_once(&mut self) -> GradeResult {
        let label = self.session.target().to_string();

        let sample = match self.scorer.score(&label).await {
            Ok(response) => response.sample(),
            Err(err) => {
                tracing::warn!("[PracticeRunner] Scoring failed for {}: {:#}", label, err);
                self.telemetry.record_error(
                    DiagnosticError::ScorerUnavailable,
                    format!("{}: {}", label, err),
                );
                self.emit(PracticeEvent::ScorerError {
                    label: label.clone(),
                    message: err.to_string(),
                });
                None
            }
        };

        let before = self.session.status();
        let result = self.session.submit(sample);
        let after = self.session.status();

        self.telemetry.record_grade(&label, &result);
        self.emit(PracticeEvent::Graded {
            label: label.clone(),
            result: result.clone(),
        });

        if before != PracticeStatus::Accepted && after == PracticeStatus::Accepted {
            tracing::info!("[PracticeRunner] {} accepted", label);
            self.emit(PracticeEvent::Accepted {
                label: label.clone(),
            });
            if self.config.auto_advance {
                // infallible from ACCEPTED
                let _ = self.session.mark_advancing();
                self.accepted_at = Some(Instant::now());
            }
        } else if after == PracticeStatus::InProgress {
            self.accepted_at = None;
        }

        result
    }

    /// Advance if the auto-advance delay has elapsed
    ///
    /// # Returns
    /// The new target when an advance happened
    pub fn poll_advance(&mut self) -> Option<String> {
        if self.session.status() != PracticeStatus::Advancing {
            return None;
        }
        let since = self.accepted_at?;
        if since.elapsed() < Duration::from_millis(self.config.advance_delay_ms) {
            return None;
        }
        self.advance_now().ok()
    }

    /// Move to the next label immediately ("Next Sign")
    pub fn advance_now(&mut self) -> Result<String, SessionError> {
        let from = self.session.target().to_string();
        let to = self.session.advance()?;
        self.accepted_at = None;

        self.telemetry.record_advance(&from, &to);
        self.emit(PracticeEvent::Advanced {
            from,
            to: to.clone(),
        });
        Ok(to)
    }

    /// Jump to a specific label
    pub fn set_target(&mut self, label: &str) -> Result<(), SessionError> {
        self.session.set_target(label).inspect_err(|_| {
            self.telemetry.record_error(DiagnosticError::InvalidLabel, label.to_string());
        })?;
        self.accepted_at = None;
        Ok(())
    }

    /// Poll until `stop` flips to true (or its sender is dropped), or until
    /// `max_polls` scoring calls have been made
    ///
    /// # Returns
    /// Number of polls performed
    pub async fn run(&mut self, mut stop: watch::Receiver<bool>, max_polls: Option<u64>) -> u64 {
        let period = Duration::from_millis(self.config.poll_interval_ms.max(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "[PracticeRunner] Starting practice on {} (every {:?})",
            self.session.target(),
            period
        );

        let mut polls = 0u64;
        loop {
            if *stop.borrow() || max_polls.is_some_and(|max| polls >= max) {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    self.check_once().await;
                    self.poll_advance();
                    polls += 1;
                }
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("[PracticeRunner] Stopped after {} polls", polls);
        self.emit(PracticeEvent::Stopped { polls });
        polls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{EvalResponse, GradingConfig, ScriptedScorer, Tier};
    use crate::session::LabelSequence;
    use crate::telemetry::MetricEvent;

    struct FailingScorer;

    impl SimilarityScorer for FailingScorer {
        fn score<'a>(
            &'a mut self,
            _label: &'a str,
        ) -> futures::future::BoxFuture<'a, anyhow::Result<EvalResponse>> {
            Box::pin(futures::future::ready(Err(anyhow::anyhow!(
                "classifier timed out"
            ))))
        }
    }

    fn session() -> PracticeSession {
        let grading = GradingConfig {
            base_threshold: 0.82,
            user_tune_offset: 0.0,
            ..GradingConfig::default()
        };
        PracticeSession::new(grading, LabelSequence::new(["A", "B", "C"]).unwrap(), true).unwrap()
    }

    fn practice_config(auto_advance: bool) -> PracticeConfig {
        PracticeConfig {
            labels: LabelSequence::new(["A", "B", "C"]).unwrap(),
            poll_interval_ms: 1,
            auto_advance,
            advance_delay_ms: 0,
            ..PracticeConfig::default()
        }
    }

    #[tokio::test]
    async fn check_once_grades_and_emits() {
        let scorer = ScriptedScorer::from_samples(&[Some(0.95)]);
        let mut runner = PracticeRunner::new(session(), scorer, practice_config(false));
        let mut rx = runner.subscribe();

        let result = runner.check_once().await;
        assert_eq!(result.tier, Tier::Perfect);
        assert!(result.accepted);

        assert!(matches!(rx.try_recv().unwrap(), PracticeEvent::Graded { .. }));
        assert_eq!(
            rx.try_recv().unwrap(),
            PracticeEvent::Accepted {
                label: "A".to_string()
            }
        );
        assert_eq!(runner.session().status(), PracticeStatus::Accepted);
        assert_eq!(runner.poll_advance(), None);
    }

    #[tokio::test]
    async fn scorer_failure_counts_as_no_signal() {
        let mut runner = PracticeRunner::new(session(), FailingScorer, practice_config(false));
        let mut rx = runner.subscribe();

        let result = runner.check_once().await;
        assert_eq!(result.tier, Tier::NoSignal);
        assert!(matches!(
            rx.try_recv().unwrap(),
            PracticeEvent::ScorerError { .. }
        ));

        let snapshot = runner.telemetry().snapshot();
        assert!(snapshot.recent.iter().any(|event| matches!(
            event,
            MetricEvent::Error {
                code: DiagnosticError::ScorerUnavailable,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn auto_advance_moves_to_next_label() {
        let scorer = ScriptedScorer::from_samples(&[Some(0.95)]);
        let mut runner = PracticeRunner::new(session(), scorer, practice_config(true));

        runner.check_once().await;
        assert_eq!(runner.session().status(), PracticeStatus::Advancing);

        assert_eq!(runner.poll_advance().as_deref(), Some("B"));
        assert_eq!(runner.session().target(), "B");
        assert_eq!(runner.session().status(), PracticeStatus::Idle);
        assert_eq!(runner.session().completed(), 1);
    }

    #[test]
    fn manual_advance_and_invalid_target() {
        let scorer = ScriptedScorer::from_samples(&[]);
        let mut runner = PracticeRunner::new(session(), scorer, practice_config(false));
        assert_eq!(runner.advance_now().unwrap(), "B");
        assert!(runner.set_target("Z").is_err());
        assert_eq!(runner.session().target(), "B");
    }

    #[tokio::test]
    async fn shared_hub_sees_runner_events() {
        let hub = Arc::new(TelemetryHub::new(8, 16, 4));
        let scorer = ScriptedScorer::from_samples(&[Some(0.95)]);
        let mut runner = PracticeRunner::new(session(), scorer, practice_config(false))
            .with_telemetry(Arc::clone(&hub));

        runner.check_once().await;
        runner.advance_now().unwrap();

        let snapshot = hub.snapshot();
        assert!(matches!(snapshot.recent[0], MetricEvent::Grade { .. }));
        assert!(matches!(
            snapshot.recent.last(),
            Some(MetricEvent::Advance { .. })
        ));
    }

    #[tokio::test]
    async fn run_stops_after_max_polls() {
        let samples = [Some(0.5), Some(0.95), Some(0.95), None];
        let scorer = ScriptedScorer::from_samples(&samples);
        let mut runner = PracticeRunner::new(session(), scorer, practice_config(true));
        let (_stop_tx, stop_rx) = watch::channel(false);

        let polls = runner.run(stop_rx, Some(4)).await;
        assert_eq!(polls, 4);
        // median passes on the third poll, advanced right after with zero delay
        assert_eq!(runner.session().target(), "B");
        assert_eq!(runner.session().completed(), 1);
    }

    #[tokio::test]
    async fn run_stops_on_signal() {
        let scorer = ScriptedScorer::from_samples(&[]);
        let mut runner = PracticeRunner::new(session(), scorer, practice_config(false));
        let (stop_tx, stop_rx) = watch::channel(false);
        stop_tx.send(true).unwrap();

        let polls = runner.run(stop_rx, None).await;
        assert_eq!(polls, 0);
    }

    #[tokio::test]
    async fn event_stream_yields_published_events() {
        let scorer = ScriptedScorer::from_samples(&[Some(0.3)]);
        let mut runner = PracticeRunner::new(session(), scorer, practice_config(false));
        let stream = runner.event_stream();
        futures::pin_mut!(stream);

        runner.check_once().await;
        let first = stream.next().await.unwrap();
        assert!(matches!(first, PracticeEvent::Graded { ref label, .. } if label == "A"));
    }
}
