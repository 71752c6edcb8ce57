use aquarisk::assessment::{
    AssessmentRecord, Contaminant, IndustrySector, IntakeQuality, SessionId, SessionStore,
    StoreError, TreatmentLevel, WaterSource,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    records: Arc<Mutex<HashMap<SessionId, AssessmentRecord>>>,
}

impl SessionStore for InMemorySessionStore {
    fn persist(&self, record: AssessmentRecord) -> Result<(), StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        if guard.contains_key(&record.session_id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.session_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<AssessmentRecord>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

pub(crate) fn parse_sector(raw: &str) -> Result<IndustrySector, String> {
    Ok(IndustrySector::parse(raw))
}

pub(crate) fn parse_treatment(raw: &str) -> Result<TreatmentLevel, String> {
    TreatmentLevel::parse(raw)
        .ok_or_else(|| format!("'{raw}' is not a treatment level (none, basic, advanced, zld)"))
}

pub(crate) fn parse_intake_quality(raw: &str) -> Result<IntakeQuality, String> {
    IntakeQuality::parse(raw).ok_or_else(|| {
        format!("'{raw}' is not an intake quality (excellent, good, fair, poor, unknown)")
    })
}

pub(crate) fn parse_water_source(raw: &str) -> Result<WaterSource, String> {
    WaterSource::parse(raw).ok_or_else(|| format!("'{raw}' is not a known water source"))
}

pub(crate) fn parse_contaminant(raw: &str) -> Result<Contaminant, String> {
    Contaminant::parse(raw).ok_or_else(|| format!("'{raw}' is not a known contaminant"))
}
