//! One user-initiated conversion of a selection.
//!
//! Runs are converted and written back one at a time, left to right. Each
//! write-back can change the buffer length, so a run's live offsets are only
//! read after every earlier run has been applied.

use crate::client::{ConversionClient, ConversionOutcome, FailureReason};
use crate::transport::Transport;
use nepfont_model::{
    segment_selection, Edit, ExcludedZone, FontKey, FontRegistry, OffsetTracker, Run,
    ScriptClassifier, ServiceSettings, Span, TextHost,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Written ahead of text converted into a legacy font so the boundary glyph
/// renders in that font rather than colliding with a Unicode code point.
pub const LEGACY_RUN_MARKER: char = 'a';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Segmenting,
    Converting(usize),
    Applying(usize),
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// The run as segmented, in pre-session offsets.
    pub run: Run,
    pub source: Option<FontKey>,
    pub outcome: ConversionOutcome,
    /// The write-back, when the conversion succeeded.
    pub edit: Option<Edit>,
}

impl RunReport {
    fn failed(run: &Run, source: Option<FontKey>, reason: FailureReason) -> Self {
        Self { run: run.clone(), source, outcome: ConversionOutcome::fail(reason), edit: None }
    }
}

/// What to tell the user after a session with at least one reportable failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureNotice {
    pub reason: FailureReason,
    pub address: String,
    pub message: String,
}

impl FailureNotice {
    pub fn for_reason(reason: FailureReason, settings: &ServiceSettings) -> Self {
        let (address, message) = match reason {
            FailureReason::LicenseExpired => {
                let address = settings.renew_address();
                let message =
                    format!("Nepali Font Service licence expired!\nGoto renew page: {address}");
                (address, message)
            }
            FailureReason::TrialExpired => {
                let address = settings.payment_address();
                let message =
                    format!("Nepali Font Service trial is over!\nGoto payment page: {address}");
                (address, message)
            }
            FailureReason::Transient | FailureReason::UnsupportedSource => {
                let address = settings.contact_address();
                let message =
                    format!("Unable to make font conversion. Goto contact page: {address}");
                (address, message)
            }
        };

        Self { reason, address, message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResult {
    pub destination: FontKey,
    pub runs: Vec<RunReport>,
    pub notice: Option<FailureNotice>,
}

impl SessionResult {
    pub fn converted(&self) -> usize {
        self.runs.iter().filter(|report| report.edit.is_some()).count()
    }

    pub fn first_failure(&self) -> Option<FailureReason> {
        self.runs
            .iter()
            .filter_map(|report| report.outcome.failure_reason())
            .find(|reason| reason.is_reportable())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("selection lies inside an excluded zone ({0:?})")]
    ExcludedSelection(ExcludedZone),
}

/// Sequences segmentation, per-run conversion and write-back.
#[derive(Debug)]
pub struct Orchestrator<'a, T> {
    registry: &'a FontRegistry,
    client: &'a ConversionClient<T>,
    settings: &'a ServiceSettings,
}

impl<'a, T: Transport> Orchestrator<'a, T> {
    pub fn new(
        registry: &'a FontRegistry,
        client: &'a ConversionClient<T>,
        settings: &'a ServiceSettings,
    ) -> Self {
        Self { registry, client, settings }
    }

    pub fn convert<H: TextHost>(
        &self,
        host: &mut H,
        selection: Span,
        destination: &FontKey,
    ) -> Result<SessionResult, SessionError> {
        if let Some(zone) = host.excluded_zone(selection) {
            return Err(SessionError::ExcludedSelection(zone));
        }

        let classifier = ScriptClassifier::new(self.registry);
        let mut runs: Vec<Run> = Vec::new();
        let mut reports: Vec<RunReport> = Vec::new();
        let mut tracker = OffsetTracker::new();
        let mut phase = Phase::Idle;

        loop {
            debug!(?phase, "conversion session");
            phase = match phase {
                Phase::Idle => Phase::Segmenting,
                Phase::Segmenting => {
                    let units = host.text_units(selection);
                    runs = segment_selection(&units, host.document_end());
                    if runs.is_empty() {
                        Phase::Done
                    } else {
                        Phase::Converting(0)
                    }
                }
                Phase::Converting(index) => {
                    let report =
                        self.convert_run(host, &classifier, &runs[index], &tracker, destination);
                    let succeeded = report.outcome.is_success();
                    reports.push(report);
                    if succeeded {
                        Phase::Applying(index)
                    } else {
                        next_run(index, runs.len())
                    }
                }
                Phase::Applying(index) => {
                    if let Some(report) = reports.last_mut() {
                        self.apply(host, &mut tracker, report, destination);
                    }
                    next_run(index, runs.len())
                }
                Phase::Done => break,
            };
        }

        let result = SessionResult { destination: destination.clone(), runs: reports, notice: None };
        let notice = result
            .first_failure()
            .map(|reason| FailureNotice::for_reason(reason, self.settings));

        info!(
            destination = %destination,
            runs = result.runs.len(),
            converted = result.converted(),
            failed = notice.is_some(),
            "conversion session finished"
        );

        Ok(SessionResult { notice, ..result })
    }

    fn convert_run<H: TextHost>(
        &self,
        host: &H,
        classifier: &ScriptClassifier<'_>,
        run: &Run,
        tracker: &OffsetTracker,
        destination: &FontKey,
    ) -> RunReport {
        if !tracker.accepts(run.span()) {
            warn!(start = run.start, "run precedes an applied edit, left unconverted");
            return RunReport::failed(run, None, FailureReason::Transient);
        }

        let text = match host.text(tracker.translate(run.span())) {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, start = run.start, "unable to read run from host");
                return RunReport::failed(run, None, FailureReason::Transient);
            }
        };

        let Some(source) = classifier.effective_source_font(&run.font_name, &text) else {
            debug!(font = %run.font_name, "skipping run with unsupported source font");
            return RunReport::failed(run, None, FailureReason::UnsupportedSource);
        };

        let outcome = self.client.convert(&source, destination, &text);
        if let Some(reason) = outcome.failure_reason() {
            warn!(?reason, start = run.start, "run left unconverted");
        }

        RunReport { run: run.clone(), source: Some(source), outcome, edit: None }
    }

    /// Writes a successful conversion into the host. A write-back the host
    /// refuses turns the run into a transient failure, leaving the tracked
    /// offsets untouched.
    fn apply<H: TextHost>(
        &self,
        host: &mut H,
        tracker: &mut OffsetTracker,
        report: &mut RunReport,
        destination: &FontKey,
    ) {
        let ConversionOutcome::Success { result_text } = &report.outcome else {
            return;
        };
        let edit = self.write_back(&report.run, result_text, destination);

        if let Err(err) = host.replace(tracker.translate(edit.span), &edit.text, &edit.font_name) {
            warn!(%err, start = edit.span.start, "host refused write-back");
            report.outcome = ConversionOutcome::fail(FailureReason::Transient);
            return;
        }

        tracker.record(&edit);
        report.edit = Some(edit);
    }

    fn write_back(&self, run: &Run, result_text: &str, destination: &FontKey) -> Edit {
        let font_name = self.registry.local_name_of(destination.as_str());
        let text = if self.registry.is_legacy_key(destination.as_str()) {
            format!("{LEGACY_RUN_MARKER}{result_text}")
        } else {
            result_text.to_owned()
        };

        Edit::new(run.span(), text, font_name)
    }
}

fn next_run(index: usize, run_count: usize) -> Phase {
    if index + 1 < run_count {
        Phase::Converting(index + 1)
    } else {
        Phase::Done
    }
}
