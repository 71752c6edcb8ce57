//! Industrial water-risk assessment: profile intake, normalization, scoring
//! across five risk dimensions, recommendation generation, and the review
//! session that ties them together.

pub mod domain;
pub mod extract;
pub mod normalize;
pub mod recommend;
pub mod reference;
pub mod router;
pub mod scoring;
pub mod session;

pub use domain::{
    Contaminant, DischargeMethod, Dimension, FieldEdit, IndustrySector, IntakeQuality,
    OperationalProfile, ProfileDraft, ProfileField, Provenance, TestingFrequency, TreatmentLevel,
    UpstreamSource, ValidationError, WaterSource,
};
pub use extract::{ExtractedProfile, ExtractionError, KeywordExtractor, ProfileExtractor};
pub use normalize::{normalize, normalize_extracted};
pub use recommend::{Priority, Recommendation, RecommendationCatalog};
pub use reference::{ExampleProject, IndustryBenchmark, LookupTier, ReferenceData, TechnologyTag};
pub use router::assessment_router;
pub use scoring::{DimensionScore, RiskEngine, RiskProfile, ScoringModel};
pub use session::{
    AssessmentRecord, AssessmentService, AssessmentSession, ReviewView, SessionError, SessionId,
    SessionState, SessionStore, StoreError,
};
