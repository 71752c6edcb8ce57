//! Integration specifications for the interactive assessment flow: free-text
//! intake, review, field corrections, and persistence, driven through the
//! public service facade.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use aquarisk::assessment::{
        AssessmentRecord, AssessmentService, KeywordExtractor, ScoringModel, SessionId,
        SessionStore, StoreError,
    };

    #[derive(Default)]
    pub(super) struct MemoryStore {
        records: Mutex<HashMap<SessionId, AssessmentRecord>>,
        pub(super) fail_next: Mutex<bool>,
    }

    impl SessionStore for MemoryStore {
        fn persist(&self, record: AssessmentRecord) -> Result<(), StoreError> {
            let mut fail = self.fail_next.lock().expect("lock");
            if *fail {
                *fail = false;
                return Err(StoreError::Unavailable("storage offline".to_string()));
            }
            let mut guard = self.records.lock().expect("lock");
            if guard.contains_key(&record.session_id) {
                return Err(StoreError::Conflict);
            }
            guard.insert(record.session_id.clone(), record);
            Ok(())
        }

        fn fetch(&self, id: &SessionId) -> Result<Option<AssessmentRecord>, StoreError> {
            Ok(self.records.lock().expect("lock").get(id).cloned())
        }
    }

    pub(super) fn build_service() -> (
        AssessmentService<KeywordExtractor, MemoryStore>,
        Arc<MemoryStore>,
    ) {
        let store = Arc::new(MemoryStore::default());
        let service = AssessmentService::new(
            Arc::new(KeywordExtractor),
            store.clone(),
            ScoringModel::baseline(),
        );
        (service, store)
    }

    pub(super) const FAB_DESCRIPTION: &str =
        "We run 3 fabs in Taiwan on municipal water. The 2021 drought forced \
         rationing, and we already run reverse osmosis for ultrapure water.";
}

mod intake {
    use super::common::*;
    use aquarisk::assessment::{
        IndustrySector, ProfileDraft, ProfileField, SessionError, SessionState,
    };

    #[test]
    fn free_text_submission_reaches_review_with_full_results() {
        let (service, _) = build_service();
        let mut session = service.open_session();

        service
            .submit_text(&mut session, FAB_DESCRIPTION)
            .expect("description is extractable");

        assert_eq!(session.state(), SessionState::Review);
        let profile = session.profile().expect("profile normalized");
        assert_eq!(profile.industry_sector, IndustrySector::Semiconductors);
        assert_eq!(profile.facility_count, 3);
        // Stated fields keep their provenance; benchmark fills are flagged.
        assert!(!profile.is_inferred(ProfileField::Country));
        assert!(profile.is_inferred(ProfileField::AnnualWaterVolume));

        let risk = session.risk().expect("risk scored");
        assert_eq!(risk.physical.score, 82);
        assert!(!session.recommendations().is_empty());
    }

    #[test]
    fn unusable_text_returns_to_input_with_a_message() {
        let (service, _) = build_service();
        let mut session = service.open_session();

        let error = service
            .submit_text(&mut session, "we are vaguely worried about water")
            .expect_err("no sector or country present");

        assert!(matches!(error, SessionError::Extraction(_)));
        assert_eq!(session.state(), SessionState::Input);
        assert!(session.last_error().is_some());
        assert!(session.risk().is_none());
    }

    #[test]
    fn incomplete_form_submission_is_rejected_before_scoring() {
        let (service, _) = build_service();
        let mut session = service.open_session();

        let draft = ProfileDraft {
            industry_sector: Some(IndustrySector::Mining),
            ..ProfileDraft::default()
        };
        let error = service
            .submit_form(&mut session, draft)
            .expect_err("country is required");

        assert!(matches!(error, SessionError::Validation(_)));
        assert_eq!(session.state(), SessionState::Input);
    }

    #[test]
    fn session_ids_are_unique_and_prefixed() {
        let (service, _) = build_service();
        let first = service.open_session();
        let second = service.open_session();

        assert!(first.id.0.starts_with("wra-"));
        assert_ne!(first.id, second.id);
    }
}

mod review {
    use super::common::*;
    use aquarisk::assessment::{FieldEdit, ProfileField, SessionError, SessionState, TreatmentLevel};

    #[test]
    fn field_edit_rescores_and_marks_the_field_stated() {
        let (service, _) = build_service();
        let mut session = service.open_session();
        service
            .submit_text(&mut session, FAB_DESCRIPTION)
            .expect("submission succeeds");

        let regulatory_before = session.risk().expect("scored").regulatory.score;
        service
            .edit_field(&mut session, FieldEdit::TreatmentLevel(TreatmentLevel::None))
            .expect("edit applies in review");

        let risk = session.risk().expect("rescored");
        assert!(risk.regulatory.score > regulatory_before);
        let profile = session.profile().expect("profile present");
        assert_eq!(profile.treatment_level, TreatmentLevel::None);
        assert!(!profile.is_inferred(ProfileField::TreatmentLevel));
        assert_eq!(session.state(), SessionState::Review);
    }

    #[test]
    fn edits_are_rejected_outside_review() {
        let (service, _) = build_service();
        let mut session = service.open_session();

        let error = service
            .edit_field(&mut session, FieldEdit::DisruptionHistory(true))
            .expect_err("session has no results yet");
        assert!(matches!(error, SessionError::InvalidState { .. }));
    }

    #[test]
    fn reset_discards_results_from_review() {
        let (service, _) = build_service();
        let mut session = service.open_session();
        service
            .submit_text(&mut session, FAB_DESCRIPTION)
            .expect("submission succeeds");

        session.reset();
        assert_eq!(session.state(), SessionState::Input);
        assert!(session.profile().is_none());
        assert!(session.recommendations().is_empty());
    }
}

mod persistence {
    use super::common::*;
    use aquarisk::assessment::{SessionError, SessionState, SessionStore};

    #[test]
    fn save_persists_profile_scores_and_recommendations_together() {
        let (service, store) = build_service();
        let mut session = service.open_session();
        service
            .submit_text(&mut session, FAB_DESCRIPTION)
            .expect("submission succeeds");

        let record = service.save(&mut session).expect("save succeeds");
        assert_eq!(session.state(), SessionState::Complete);

        let stored = store
            .fetch(&session.id)
            .expect("store reachable")
            .expect("record persisted");
        assert_eq!(stored, record);
        assert_eq!(stored.risk.overall, record.risk.overall);
        assert_eq!(stored.recommendations, record.recommendations);
    }

    #[test]
    fn failed_save_retains_review_results_for_retry() {
        let (service, store) = build_service();
        let mut session = service.open_session();
        service
            .submit_text(&mut session, FAB_DESCRIPTION)
            .expect("submission succeeds");

        *store.fail_next.lock().expect("lock") = true;
        let error = service.save(&mut session).expect_err("store is offline");
        assert!(matches!(error, SessionError::Store(_)));
        assert_eq!(session.state(), SessionState::Review);
        assert!(session.risk().is_some());

        service.save(&mut session).expect("retry succeeds");
        assert_eq!(session.state(), SessionState::Complete);
    }

    #[test]
    fn completed_sessions_cannot_be_saved_twice() {
        let (service, _) = build_service();
        let mut session = service.open_session();
        service
            .submit_text(&mut session, FAB_DESCRIPTION)
            .expect("submission succeeds");
        service.save(&mut session).expect("first save succeeds");

        let error = service.save(&mut session).expect_err("session is complete");
        assert!(matches!(
            error,
            SessionError::InvalidState {
                state: SessionState::Complete,
                ..
            }
        ));
    }

    #[test]
    fn record_round_trips_through_json() {
        let (service, _) = build_service();
        let mut session = service.open_session();
        service
            .submit_text(&mut session, FAB_DESCRIPTION)
            .expect("submission succeeds");
        let record = service.save(&mut session).expect("save succeeds");

        let json = serde_json::to_string(&record).expect("record serializes");
        let decoded: aquarisk::assessment::AssessmentRecord =
            serde_json::from_str(&json).expect("record deserializes");
        assert_eq!(decoded, record);
    }
}
