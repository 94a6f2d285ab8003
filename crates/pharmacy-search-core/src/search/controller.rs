//! Search session orchestration.
//!
//! ```text
//! Idle → Validating ─┬─→ Rejected ──────────────→ Idle
//!                    └─→ Executing ─┬─→ Succeeded → Idle
//!                                   └─→ Failed ───→ Idle
//! ```
//!
//! Every dispatched search carries a token. Only the completion whose token
//! matches the most recent dispatch is applied; anything older is dropped.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::{
    CriteriaValidator, FieldError, QuickSearch, ResultSynthesizer, SearchError, SearchExecutor,
    SearchResult, SynthesisReport, EMPTY_CRITERIA_MESSAGE,
};
use crate::export::{ExportArtifact, ResultExporter};
use crate::history::SearchHistoryStore;
use crate::models::{CriteriaModel, CriteriaSet, PatientRecord, SearchResultSet, SynthesizedStats};

/// Presentation collaborator: turns search outcomes into something visible.
pub trait SearchPresenter {
    /// A search succeeded; replace whatever is on screen.
    fn show_results(&mut self, results: &SearchResultSet, report: &SynthesisReport);

    /// The form was refused before any remote call.
    fn show_rejection(&mut self, rejection: &Rejection);

    /// The search failed after dispatch.
    fn show_error(&mut self, error: &SearchError);

    /// Remove any result view.
    fn clear_results(&mut self);
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Validating,
    Rejected,
    Executing,
    Succeeded,
    Failed,
}

/// Why a submit was refused locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Rejection {
    /// One or more fields failed their format rule
    Invalid(Vec<FieldError>),
    /// No field was filled in
    EmptyCriteria,
}

impl Rejection {
    /// User-facing messages, one per problem.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Rejection::Invalid(errors) => errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect(),
            Rejection::EmptyCriteria => vec![EMPTY_CRITERIA_MESSAGE.to_string()],
        }
    }
}

/// Result of driving one search through the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Succeeded(SynthesizedStats),
    Rejected(Rejection),
    Failed(SearchError),
    /// A newer search was dispatched before this one completed
    Superseded,
}

/// A validated search, ready to run outside the controller.
pub struct PendingSearch {
    token: u64,
    criteria: CriteriaSet,
    executor: SearchExecutor,
}

impl PendingSearch {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn criteria(&self) -> &CriteriaSet {
        &self.criteria
    }

    /// Perform the remote call. Blocks until the record API answers.
    pub fn run(self) -> CompletedSearch {
        CompletedSearch {
            token: self.token,
            result: self.executor.execute(&self.criteria),
        }
    }
}

/// Outcome of a [`PendingSearch`], to be handed back to the controller.
#[derive(Debug)]
pub struct CompletedSearch {
    token: u64,
    result: SearchResult<SearchResultSet>,
}

impl CompletedSearch {
    pub fn token(&self) -> u64 {
        self.token
    }
}

/// Results currently on display for one user session.
#[derive(Debug)]
pub struct SearchSession {
    id: Uuid,
    results: Option<SearchResultSet>,
    stats: Option<SynthesizedStats>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            results: None,
            stats: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn results(&self) -> Option<&SearchResultSet> {
        self.results.as_ref()
    }

    pub fn stats(&self) -> Option<SynthesizedStats> {
        self.stats
    }

    /// Look up a displayed record by its `"{store}-{patient}"` key.
    pub fn select(&self, display_key: &str) -> Option<&PatientRecord> {
        self.results.as_ref()?.find(display_key)
    }

    fn replace(&mut self, results: SearchResultSet, stats: SynthesizedStats) {
        self.results = Some(results);
        self.stats = Some(stats);
    }

    fn clear(&mut self) {
        self.results = None;
        self.stats = None;
    }
}

/// Orchestrates validation, execution, history, synthesis and presentation.
pub struct SearchController<P: SearchPresenter> {
    model: CriteriaModel,
    validator: CriteriaValidator,
    executor: SearchExecutor,
    history: SearchHistoryStore,
    synthesizer: ResultSynthesizer,
    exporter: ResultExporter,
    presenter: P,
    session: SearchSession,
    state: SearchState,
    latest_token: u64,
    in_flight: Option<u64>,
}

impl<P: SearchPresenter> SearchController<P> {
    pub fn new(executor: SearchExecutor, history: SearchHistoryStore, presenter: P) -> Self {
        Self {
            model: CriteriaModel::new(),
            validator: CriteriaValidator::new(),
            executor,
            history,
            synthesizer: ResultSynthesizer::new(),
            exporter: ResultExporter::new(),
            presenter,
            session: SearchSession::new(),
            state: SearchState::Idle,
            latest_token: 0,
            in_flight: None,
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: ResultSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn with_exporter(mut self, exporter: ResultExporter) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn model(&self) -> &CriteriaModel {
        &self.model
    }

    /// The search form; edit it before calling [`Self::submit`].
    pub fn model_mut(&mut self) -> &mut CriteriaModel {
        &mut self.model
    }

    pub fn history(&self) -> &SearchHistoryStore {
        &self.history
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    fn transition(&mut self, next: SearchState) {
        tracing::trace!(session = %self.session.id, from = ?self.state, to = ?next, "Search state");
        self.state = next;
    }

    fn settle(&mut self) {
        let next = if self.in_flight.is_some() {
            SearchState::Executing
        } else {
            SearchState::Idle
        };
        self.transition(next);
    }

    /// Validate the form and, if acceptable, dispatch a new search.
    ///
    /// A search already in flight is superseded by the new one.
    pub fn prepare(&mut self) -> Result<PendingSearch, Rejection> {
        self.transition(SearchState::Validating);

        let criteria = self.model.to_criteria_set();
        let errors = self.validator.validate(&criteria);
        let rejection = if !errors.is_empty() {
            Some(Rejection::Invalid(errors))
        } else if criteria.is_empty() {
            Some(Rejection::EmptyCriteria)
        } else {
            None
        };

        if let Some(rejection) = rejection {
            self.transition(SearchState::Rejected);
            self.presenter.show_rejection(&rejection);
            self.settle();
            return Err(rejection);
        }

        self.latest_token += 1;
        if let Some(previous) = self.in_flight.replace(self.latest_token) {
            tracing::debug!(previous, token = self.latest_token, "Superseding in-flight search");
        }
        self.transition(SearchState::Executing);

        Ok(PendingSearch {
            token: self.latest_token,
            criteria,
            executor: self.executor.clone(),
        })
    }

    /// Apply the outcome of a dispatched search.
    pub fn complete(&mut self, completed: CompletedSearch) -> SearchOutcome {
        if self.in_flight != Some(completed.token) {
            tracing::warn!(
                session = %self.session.id,
                token = completed.token,
                latest = self.latest_token,
                "Discarding superseded search response"
            );
            return SearchOutcome::Superseded;
        }
        self.in_flight = None;

        match completed.result {
            Ok(results) => {
                self.transition(SearchState::Succeeded);
                self.history.record(&results.criteria);

                let report = self.synthesizer.synthesize(&results);
                self.presenter.show_results(&results, &report);

                let stats = report.stats;
                tracing::info!(
                    session = %self.session.id,
                    results = stats.result_count,
                    stores = stats.distinct_store_count,
                    provinces = stats.distinct_province_count,
                    "Search succeeded"
                );
                self.session.replace(results, stats);
                self.settle();
                SearchOutcome::Succeeded(stats)
            }
            Err(error) => {
                self.transition(SearchState::Failed);
                tracing::warn!(session = %self.session.id, error = %error, "Search failed");
                self.session.clear();
                self.presenter.clear_results();
                self.presenter.show_error(&error);
                self.settle();
                SearchOutcome::Failed(error)
            }
        }
    }

    /// Validate, execute and apply a search from the current form.
    pub fn submit(&mut self) -> SearchOutcome {
        match self.prepare() {
            Ok(pending) => {
                let completed = pending.run();
                self.complete(completed)
            }
            Err(rejection) => SearchOutcome::Rejected(rejection),
        }
    }

    /// Load a past search into the form and run it again.
    ///
    /// Returns `None` when no history entry has that id.
    pub fn replay(&mut self, entry_id: i64) -> Option<SearchOutcome> {
        let criteria = self.history.replay(entry_id)?;
        self.model.apply(&criteria);
        Some(self.submit())
    }

    /// Reset the form to a single preset field and run it.
    pub fn quick_search(&mut self, preset: &QuickSearch) -> SearchOutcome {
        self.model.clear();
        self.model.apply(&preset.criteria());
        self.submit()
    }

    /// Render the current results for download; `None` when there is nothing to export.
    pub fn export(&self, date: NaiveDate) -> Option<ExportArtifact> {
        let results = self.session.results().filter(|r| !r.is_empty())?;
        Some(self.exporter.export(&results.records, date))
    }

    /// Look up a displayed record by its `"{store}-{patient}"` key.
    pub fn select(&self, display_key: &str) -> Option<&PatientRecord> {
        self.session.select(display_key)
    }

    /// Forget all remembered searches.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Empty the form and drop the current results.
    pub fn clear(&mut self) {
        self.model.clear();
        self.session.clear();
        self.presenter.clear_results();
    }
}
