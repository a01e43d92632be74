// src/core/session/orchestrator.rs
//
// Analysis orchestrator: deduplicates submissions, runs one task per file on
// a worker pool, caches results and delivers completions over a channel.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use uuid::Uuid;

use super::cache::ResultCache;
use crate::config::AnalysisConfig;
use crate::core::analyzer::AudioAnalyzer;
use crate::core::error::{AnalysisFailure, Rejected, StageError};
use crate::detection::{AnalysisResult, AudioRef, VerdictSummary};

/// How often a blocking receive re-checks whether work is still pending
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Completion message for one accepted submission
#[derive(Debug, Clone)]
pub struct Completion {
    pub audio_ref: AudioRef,
    pub outcome: Result<AnalysisResult, AnalysisFailure>,
    /// The record as stored in the cache; failures become error-verdict rows
    record: AnalysisResult,
}

impl Completion {
    fn new(audio_ref: AudioRef, outcome: Result<AnalysisResult, AnalysisFailure>) -> Self {
        let record = match &outcome {
            Ok(result) => result.clone(),
            Err(failure) => AnalysisResult::failed(audio_ref.clone(), failure.clone()),
        };
        Self {
            audio_ref,
            outcome,
            record,
        }
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.record
    }

    pub fn into_result(self) -> AnalysisResult {
        self.record
    }

    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}

struct Envelope {
    session: Uuid,
    completion: Completion,
}

struct SessionState {
    id: Uuid,
    submitted: HashSet<String>,
    cache: ResultCache,
    in_flight: usize,
}

impl SessionState {
    fn new(max_spectrograms: Option<usize>) -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted: HashSet::new(),
            cache: ResultCache::new(max_spectrograms),
            in_flight: 0,
        }
    }
}

struct Shared {
    analyzer: AudioAnalyzer,
    state: Mutex<SessionState>,
    max_spectrograms: Option<usize>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owns the session: submitted identifiers, result cache and worker pool
pub struct Orchestrator {
    shared: Arc<Shared>,
    pool: rayon::ThreadPool,
    sender: Sender<Envelope>,
    receiver: Mutex<Receiver<Envelope>>,
}

impl Orchestrator {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("flacaudit-worker-{}", i))
            .build()
            .context("Failed to start analysis worker pool")?;

        let (sender, receiver) = mpsc::channel();
        let shared = Arc::new(Shared {
            analyzer: AudioAnalyzer::new(config),
            state: Mutex::new(SessionState::new(config.max_cached_spectrograms)),
            max_spectrograms: config.max_cached_spectrograms,
        });

        log::debug!("Started session {}", shared.lock().id);

        Ok(Self {
            shared,
            pool,
            sender,
            receiver: Mutex::new(receiver),
        })
    }

    /// Accept a file for analysis, at most once per session.
    ///
    /// The returned reference identifies the completion that will follow.
    pub fn submit<P: AsRef<Path>>(&self, path: P) -> std::result::Result<AudioRef, Rejected> {
        let audio_ref = AudioRef::new(path);

        let session = {
            let mut state = self.shared.lock();
            if !state.submitted.insert(audio_ref.id().to_string()) {
                log::debug!("Ignoring duplicate submission {}", audio_ref.id());
                return Err(Rejected::DuplicateIdentifier(audio_ref.id().to_string()));
            }
            state.in_flight += 1;
            state.id
        };

        let shared = Arc::clone(&self.shared);
        let sender = self.sender.clone();
        let task_ref = audio_ref.clone();
        self.pool
            .spawn(move || run_task(&shared, &sender, session, task_ref));

        Ok(audio_ref)
    }

    /// Look up a completed result of the current session
    pub fn get_cached_result(&self, audio_ref: &AudioRef) -> Option<AnalysisResult> {
        self.shared.lock().cache.get(audio_ref.id())
    }

    /// Snapshot of every completed result in the current session
    pub fn results(&self) -> Vec<AnalysisResult> {
        self.shared.lock().cache.values().cloned().collect()
    }

    /// Verdict counts over completed results
    pub fn summary(&self) -> VerdictSummary {
        VerdictSummary::from_results(self.shared.lock().cache.values())
    }

    /// Clear the cache and identifier set and start a fresh session.
    ///
    /// Tasks still running belong to the old session; their results are
    /// dropped when they finish.
    pub fn reset_session(&self) {
        let mut state = self.shared.lock();
        let old = state.id;
        if state.in_flight > 0 {
            log::info!(
                "Resetting session {} with {} analyses in flight; their results will be discarded",
                old,
                state.in_flight
            );
        }
        *state = SessionState::new(self.shared.max_spectrograms);
        log::debug!("Session {} replaced by {}", old, state.id);
    }

    pub fn session_id(&self) -> Uuid {
        self.shared.lock().id
    }

    /// Accepted submissions of the current session that have not completed
    pub fn pending(&self) -> usize {
        self.shared.lock().in_flight
    }

    /// Number of identifiers accepted in the current session
    pub fn submitted_count(&self) -> usize {
        self.shared.lock().submitted.len()
    }

    /// Next completion if one is ready
    pub fn try_recv(&self) -> Option<Completion> {
        let receiver = self.receiver.lock().unwrap_or_else(PoisonError::into_inner);
        while let Ok(envelope) = receiver.try_recv() {
            if let Some(completion) = self.current(envelope) {
                return Some(completion);
            }
        }
        None
    }

    /// Wait up to `timeout` for the next completion
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Completion> {
        let receiver = self.receiver.lock().unwrap_or_else(PoisonError::into_inner);
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match receiver.recv_timeout(remaining) {
                Ok(envelope) => {
                    if let Some(completion) = self.current(envelope) {
                        return Some(completion);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }

    /// Block until the next completion; `None` once nothing is pending
    pub fn recv(&self) -> Option<Completion> {
        loop {
            if self.pending() == 0 {
                return self.try_recv();
            }
            if let Some(completion) = self.recv_timeout(POLL_INTERVAL) {
                return Some(completion);
            }
        }
    }

    /// Iterate completions until every accepted submission has reported
    pub fn completions(&self) -> impl Iterator<Item = Completion> + '_ {
        std::iter::from_fn(move || self.recv())
    }

    fn current(&self, envelope: Envelope) -> Option<Completion> {
        if envelope.session == self.shared.lock().id {
            Some(envelope.completion)
        } else {
            log::debug!(
                "Dropping completion for {} from an earlier session",
                envelope.completion.audio_ref.id()
            );
            None
        }
    }
}

/// Task body: analyze, then publish under the session lock
fn run_task(shared: &Shared, sender: &Sender<Envelope>, session: Uuid, audio_ref: AudioRef) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| shared.analyzer.analyze(&audio_ref)))
        .unwrap_or_else(|payload| {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(AnalysisFailure::new(
                audio_ref.path(),
                StageError::Transform(format!("analysis panicked: {}", msg)),
            ))
        });

    match &outcome {
        Ok(result) => log::info!(
            "{}: {} (cutoff {}, encoder {})",
            audio_ref.file_name(),
            result.verdict.label(),
            result.cutoff.display_khz(),
            result.encoder.label()
        ),
        Err(failure) => log::warn!("{}", failure),
    }

    let completion = Completion::new(audio_ref, outcome);

    let mut state = shared.lock();
    if state.id != session {
        log::warn!(
            "Discarding result for {} from reset session {}",
            completion.audio_ref.id(),
            session
        );
        return;
    }

    let evicted = state.cache.insert(completion.result().clone());
    if !evicted.is_empty() {
        log::debug!("Evicted {} cached spectrogram(s)", evicted.len());
    }
    state.in_flight = state.in_flight.saturating_sub(1);

    // sent under the lock so a reset cannot interleave between cache and channel
    if sender.send(Envelope { session, completion }).is_err() {
        log::debug!("Completion receiver dropped");
    }
}
