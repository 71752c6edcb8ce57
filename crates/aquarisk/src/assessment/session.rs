//! Assessment session controller: the only stateful piece of the engine.
//! Drives submit → review → edit-and-rescore → save, with an error edge
//! back to input and a generation counter so a stale recompute can never
//! overwrite a newer one.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{
    FieldEdit, OperationalProfile, ProfileDraft, ProfileField, Provenance, ValidationError,
};
use super::extract::{ExtractionError, ProfileExtractor};
use super::normalize;
use super::recommend::{self, Recommendation, RecommendationCatalog};
use super::reference::ReferenceData;
use super::scoring::{RiskEngine, RiskProfile, ScoringModel};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Input,
    Processing,
    Review,
    Complete,
}

impl SessionState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Processing => "processing",
            Self::Review => "review",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw user input the session was opened with.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSubmission {
    FreeText(String),
    Structured(ProfileDraft),
}

/// One interactive assessment. Owned by exactly one flow at a time; all
/// mutation goes through `AssessmentService`.
#[derive(Debug)]
pub struct AssessmentSession {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    state: SessionState,
    raw: Option<RawSubmission>,
    draft: ProfileDraft,
    provenance_hints: BTreeMap<ProfileField, Provenance>,
    profile: Option<OperationalProfile>,
    risk: Option<RiskProfile>,
    recommendations: Vec<Recommendation>,
    generation: u64,
    last_error: Option<String>,
}

impl AssessmentSession {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            state: SessionState::Input,
            raw: None,
            draft: ProfileDraft::default(),
            provenance_hints: BTreeMap::new(),
            profile: None,
            risk: None,
            recommendations: Vec::new(),
            generation: 0,
            last_error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn profile(&self) -> Option<&OperationalProfile> {
        self.profile.as_ref()
    }

    pub fn risk(&self) -> Option<&RiskProfile> {
        self.risk.as_ref()
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Discard the session from any state and return to input.
    pub fn reset(&mut self) {
        let id = self.id.clone();
        let created_at = self.created_at;
        *self = Self::new(id);
        self.created_at = created_at;
    }

    /// Replace profile, scores, and recommendations atomically, but only if
    /// the outcome is not stale relative to the latest edit. Returns whether
    /// the outcome was applied.
    pub(crate) fn apply_outcome(&mut self, outcome: ScoredOutcome) -> bool {
        if outcome.generation < self.generation {
            return false;
        }
        self.profile = Some(outcome.profile);
        self.risk = Some(outcome.risk);
        self.recommendations = outcome.recommendations;
        true
    }

    pub fn review_view(&self) -> ReviewView {
        ReviewView {
            session_id: self.id.clone(),
            state: self.state,
            profile: self.profile.clone(),
            risk: self.risk.clone(),
            recommendations: self.recommendations.clone(),
            error: self.last_error.clone(),
        }
    }
}

/// Result of one full normalize/score/recommend pass, pinned to the edit
/// generation it was computed for.
#[derive(Debug, Clone)]
pub(crate) struct ScoredOutcome {
    pub(crate) generation: u64,
    pub(crate) profile: OperationalProfile,
    pub(crate) risk: RiskProfile,
    pub(crate) recommendations: Vec<Recommendation>,
}

/// Serializable snapshot of the session exposed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub session_id: SessionId,
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<OperationalProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskProfile>,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Persisted unit: profile, scores, and recommendations saved together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub session_id: SessionId,
    pub saved_at: DateTime<Utc>,
    pub profile: OperationalProfile,
    pub risk: RiskProfile,
    pub recommendations: Vec<Recommendation>,
}

/// Storage abstraction so the session flow can be exercised in isolation.
pub trait SessionStore: Send + Sync {
    fn persist(&self, record: AssessmentRecord) -> Result<(), StoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<AssessmentRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("assessment already persisted")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Error raised by the assessment flow.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("could not understand the description: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("cannot {operation} while the session is in the {state} state")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("wra-{id:06}"))
}

/// Service composing the extractor, the risk engine, the recommendation
/// catalog, and the session store.
pub struct AssessmentService<X, S> {
    extractor: Arc<X>,
    store: Arc<S>,
    engine: RiskEngine,
    catalog: RecommendationCatalog,
}

impl<X, S> AssessmentService<X, S>
where
    X: ProfileExtractor + 'static,
    S: SessionStore + 'static,
{
    pub fn new(extractor: Arc<X>, store: Arc<S>, model: ScoringModel) -> Self {
        Self {
            extractor,
            store,
            engine: RiskEngine::new(model, ReferenceData::standard()),
            catalog: RecommendationCatalog::standard(),
        }
    }

    pub fn engine(&self) -> &RiskEngine {
        &self.engine
    }

    pub fn open_session(&self) -> AssessmentSession {
        AssessmentSession::new(next_session_id())
    }

    /// Submit a free-text description: extract, normalize, score, and enter
    /// review. On extraction failure the session returns to input with a
    /// user-facing message; the user retries by resubmitting.
    pub fn submit_text(
        &self,
        session: &mut AssessmentSession,
        description: &str,
    ) -> Result<(), SessionError> {
        self.require_state(session, SessionState::Input, "submit")?;
        session.state = SessionState::Processing;

        let extracted = match self.extractor.extract(description) {
            Ok(extracted) => extracted,
            Err(error) => {
                session.state = SessionState::Input;
                session.last_error = Some(error.to_string());
                return Err(SessionError::Extraction(error));
            }
        };

        session.raw = Some(RawSubmission::FreeText(description.to_string()));
        session.draft = extracted.draft.clone();
        session.provenance_hints = extracted.provenance.clone();
        self.enter_review(session);
        Ok(())
    }

    /// Submit an explicit structured form. Validation failures are surfaced
    /// before any scoring happens.
    pub fn submit_form(
        &self,
        session: &mut AssessmentSession,
        draft: ProfileDraft,
    ) -> Result<(), SessionError> {
        self.require_state(session, SessionState::Input, "submit")?;
        session.state = SessionState::Processing;

        if let Err(error) = draft.validate() {
            session.state = SessionState::Input;
            session.last_error = Some(error.to_string());
            return Err(SessionError::Validation(error));
        }

        session.raw = Some(RawSubmission::Structured(draft.clone()));
        session.draft = draft;
        session.provenance_hints = BTreeMap::new();
        self.enter_review(session);
        Ok(())
    }

    /// Correct a single field during review. The field becomes `stated` and
    /// the whole pipeline re-runs from the updated draft; results replace
    /// the previous ones atomically.
    pub fn edit_field(
        &self,
        session: &mut AssessmentSession,
        edit: FieldEdit,
    ) -> Result<(), SessionError> {
        self.require_state(session, SessionState::Review, "edit a field")?;

        session.generation += 1;
        let field = edit.field();
        edit.apply(&mut session.draft);
        session.provenance_hints.insert(field, Provenance::Stated);

        let outcome = self.rescore(session);
        let applied = session.apply_outcome(outcome);
        if applied {
            info!(session = %session.id.0, field = field.label(), "rescored after field edit");
        }
        Ok(())
    }

    /// Persist the reviewed assessment as a unit. On store failure the
    /// session stays in review with its computed results retained so the
    /// user can retry the save.
    pub fn save(
        &self,
        session: &mut AssessmentSession,
    ) -> Result<AssessmentRecord, SessionError> {
        self.require_state(session, SessionState::Review, "save")?;

        let (Some(profile), Some(risk)) = (session.profile.clone(), session.risk.clone()) else {
            return Err(SessionError::InvalidState {
                operation: "save",
                state: session.state,
            });
        };
        let record = AssessmentRecord {
            session_id: session.id.clone(),
            saved_at: Utc::now(),
            profile,
            risk,
            recommendations: session.recommendations.clone(),
        };

        self.store.persist(record.clone())?;
        session.state = SessionState::Complete;
        info!(session = %session.id.0, overall = record.risk.overall, "assessment saved");
        Ok(record)
    }

    fn enter_review(&self, session: &mut AssessmentSession) {
        let outcome = self.rescore(session);
        session.apply_outcome(outcome);
        session.last_error = None;
        session.state = SessionState::Review;
    }

    /// One full normalize → score → recommend pass over the session draft.
    fn rescore(&self, session: &AssessmentSession) -> ScoredOutcome {
        let profile = normalize::normalize_tagged(
            &session.draft,
            &session.provenance_hints,
            self.engine.reference(),
        );
        let risk = self.engine.score(&profile);
        let recommendations = recommend::generate(
            &profile,
            &risk,
            &self.catalog,
            self.engine.model(),
            self.engine.reference(),
        );
        ScoredOutcome {
            generation: session.generation,
            profile,
            risk,
            recommendations,
        }
    }

    fn require_state(
        &self,
        session: &AssessmentSession,
        expected: SessionState,
        operation: &'static str,
    ) -> Result<(), SessionError> {
        if session.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: session.state,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::domain::{IndustrySector, TreatmentLevel};
    use super::super::extract::{ExtractedProfile, ExtractionError};
    use super::*;
    use std::sync::Mutex;

    struct StubExtractor {
        result: fn(&str) -> Result<ExtractedProfile, ExtractionError>,
    }

    impl ProfileExtractor for StubExtractor {
        fn extract(&self, description: &str) -> Result<ExtractedProfile, ExtractionError> {
            (self.result)(description)
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        records: Mutex<Vec<AssessmentRecord>>,
        fail_next: Mutex<bool>,
    }

    impl SessionStore for RecordingStore {
        fn persist(&self, record: AssessmentRecord) -> Result<(), StoreError> {
            if *self.fail_next.lock().expect("store mutex poisoned") {
                *self.fail_next.lock().expect("store mutex poisoned") = false;
                return Err(StoreError::Unavailable("disk full".to_string()));
            }
            self.records.lock().expect("store mutex poisoned").push(record);
            Ok(())
        }

        fn fetch(&self, id: &SessionId) -> Result<Option<AssessmentRecord>, StoreError> {
            Ok(self
                .records
                .lock()
                .expect("store mutex poisoned")
                .iter()
                .find(|record| &record.session_id == id)
                .cloned())
        }
    }

    fn extract_ok(_: &str) -> Result<ExtractedProfile, ExtractionError> {
        Ok(ExtractedProfile {
            draft: ProfileDraft {
                industry_sector: Some(IndustrySector::Semiconductors),
                country: Some("Taiwan".to_string()),
                disruption_history: Some(true),
                ..ProfileDraft::default()
            },
            provenance: BTreeMap::new(),
        })
    }

    fn extract_fail(_: &str) -> Result<ExtractedProfile, ExtractionError> {
        Err(ExtractionError::Unavailable("gateway timeout".to_string()))
    }

    fn service(
        result: fn(&str) -> Result<ExtractedProfile, ExtractionError>,
    ) -> AssessmentService<StubExtractor, RecordingStore> {
        AssessmentService::new(
            Arc::new(StubExtractor { result }),
            Arc::new(RecordingStore::default()),
            ScoringModel::baseline(),
        )
    }

    #[test]
    fn submit_text_reaches_review_with_scores_and_recommendations() {
        let service = service(extract_ok);
        let mut session = service.open_session();

        service
            .submit_text(&mut session, "three fabs in taiwan")
            .expect("submission succeeds");

        assert_eq!(session.state(), SessionState::Review);
        let risk = session.risk().expect("risk computed");
        assert_eq!(risk.physical.score, 82);
        assert!(!session.recommendations().is_empty());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn extraction_failure_returns_to_input_with_message() {
        let service = service(extract_fail);
        let mut session = service.open_session();

        let error = service
            .submit_text(&mut session, "anything")
            .expect_err("extraction fails");
        assert!(matches!(error, SessionError::Extraction(_)));
        assert_eq!(session.state(), SessionState::Input);
        assert!(session.last_error().expect("message set").contains("gateway"));
        assert!(session.profile().is_none());

        // Manual retry is just resubmitting from input.
        assert!(service.submit_text(&mut session, "again").is_err());
        assert_eq!(session.state(), SessionState::Input);
    }

    #[test]
    fn structured_submission_is_validated_before_scoring() {
        let service = service(extract_ok);
        let mut session = service.open_session();

        let error = service
            .submit_form(&mut session, ProfileDraft::default())
            .expect_err("draft is incomplete");
        assert!(matches!(error, SessionError::Validation(_)));
        assert_eq!(session.state(), SessionState::Input);
    }

    #[test]
    fn edit_field_rescores_from_the_full_updated_profile() {
        let service = service(extract_ok);
        let mut session = service.open_session();
        service
            .submit_text(&mut session, "fabs in taiwan")
            .expect("submission succeeds");

        let before = session.risk().expect("scored").regulatory.score;
        service
            .edit_field(&mut session, FieldEdit::TreatmentLevel(TreatmentLevel::None))
            .expect("edit succeeds");

        let after = session.risk().expect("rescored").regulatory.score;
        assert!(after > before, "weaker treatment must raise regulatory risk");
        assert_eq!(session.state(), SessionState::Review);

        let profile = session.profile().expect("profile present");
        assert!(!profile.is_inferred(ProfileField::TreatmentLevel));
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn edits_outside_review_are_rejected() {
        let service = service(extract_ok);
        let mut session = service.open_session();

        let error = service
            .edit_field(&mut session, FieldEdit::DisruptionHistory(false))
            .expect_err("session still collecting input");
        assert!(matches!(
            error,
            SessionError::InvalidState {
                state: SessionState::Input,
                ..
            }
        ));
    }

    #[test]
    fn stale_outcome_is_discarded() {
        let service = service(extract_ok);
        let mut session = service.open_session();
        service
            .submit_text(&mut session, "fabs in taiwan")
            .expect("submission succeeds");

        // Simulate a slow recompute finishing after a newer edit bumped the
        // generation.
        let stale = service.rescore(&session);
        service
            .edit_field(&mut session, FieldEdit::TreatmentLevel(TreatmentLevel::None))
            .expect("edit succeeds");

        let fresh = session.risk().expect("rescored").clone();
        assert!(!session.apply_outcome(stale));
        assert_eq!(session.risk(), Some(&fresh));
    }

    #[test]
    fn save_persists_the_assessment_as_a_unit() {
        let service = service(extract_ok);
        let mut session = service.open_session();
        service
            .submit_text(&mut session, "fabs in taiwan")
            .expect("submission succeeds");

        let record = service.save(&mut session).expect("save succeeds");
        assert_eq!(session.state(), SessionState::Complete);

        let fetched = service
            .store
            .fetch(&session.id)
            .expect("store reachable")
            .expect("record persisted");
        assert_eq!(fetched, record);
    }

    #[test]
    fn failed_save_keeps_results_for_retry() {
        let service = service(extract_ok);
        let mut session = service.open_session();
        service
            .submit_text(&mut session, "fabs in taiwan")
            .expect("submission succeeds");
        *service.store.fail_next.lock().expect("store mutex poisoned") = true;

        let error = service.save(&mut session).expect_err("store rejects");
        assert!(matches!(error, SessionError::Store(_)));
        assert_eq!(session.state(), SessionState::Review);
        assert!(session.risk().is_some(), "computed results are retained");

        service.save(&mut session).expect("retry succeeds");
        assert_eq!(session.state(), SessionState::Complete);
    }

    #[test]
    fn reset_discards_the_session_from_any_state() {
        let service = service(extract_ok);
        let mut session = service.open_session();
        service
            .submit_text(&mut session, "fabs in taiwan")
            .expect("submission succeeds");

        session.reset();
        assert_eq!(session.state(), SessionState::Input);
        assert!(session.profile().is_none());
        assert!(session.recommendations().is_empty());
        assert_eq!(session.generation(), 0);
    }
}
