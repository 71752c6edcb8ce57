//! Fills unset profile fields from the industry benchmark table, tagging
//! every field `stated` or `inferred`. Normalization never fails: unknown
//! sectors fall through to the generic benchmark instead of erroring.

use std::collections::BTreeMap;

use super::domain::{
    IndustrySector, OperationalProfile, ProfileDraft, ProfileField, Provenance, TestingFrequency,
};
use super::extract::ExtractedProfile;
use super::reference::ReferenceData;

/// Normalize a structured-form draft: every present field is `stated`.
pub fn normalize(draft: &ProfileDraft, reference: &ReferenceData) -> OperationalProfile {
    normalize_tagged(draft, &BTreeMap::new(), reference)
}

/// Normalize an extracted draft, honoring the collaborator's per-field
/// confidence: a present field the extractor marked `inferred` stays
/// inferred.
pub fn normalize_extracted(
    extracted: &ExtractedProfile,
    reference: &ReferenceData,
) -> OperationalProfile {
    normalize_tagged(&extracted.draft, &extracted.provenance, reference)
}

pub(crate) fn normalize_tagged(
    draft: &ProfileDraft,
    hints: &BTreeMap<ProfileField, Provenance>,
    reference: &ReferenceData,
) -> OperationalProfile {
    let mut provenance = BTreeMap::new();
    let mut tag = |field: ProfileField, present: bool, map: &mut BTreeMap<_, _>| {
        let value = if present {
            hints.get(&field).copied().unwrap_or(Provenance::Stated)
        } else {
            Provenance::Inferred
        };
        map.insert(field, value);
    };

    let industry_sector = draft.industry_sector.unwrap_or(IndustrySector::Other);
    tag(
        ProfileField::IndustrySector,
        draft.industry_sector.is_some(),
        &mut provenance,
    );

    let benchmark = reference.benchmark(industry_sector);

    let country = draft
        .country
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("Unknown")
        .to_string();
    tag(ProfileField::Country, draft.country.is_some(), &mut provenance);

    let region = draft
        .region
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    tag(ProfileField::Region, region.is_some(), &mut provenance);

    let facility_count = draft.facility_count.unwrap_or(1).max(1);
    tag(
        ProfileField::FacilityCount,
        draft.facility_count.is_some(),
        &mut provenance,
    );

    let water_sources = match &draft.water_sources {
        Some(sources) if !sources.is_empty() => sources.clone(),
        _ => benchmark.typical_sources.to_vec(),
    };
    tag(
        ProfileField::WaterSources,
        draft
            .water_sources
            .as_ref()
            .is_some_and(|sources| !sources.is_empty()),
        &mut provenance,
    );

    let annual_water_volume_m3 = draft.annual_water_volume_m3.unwrap_or_else(|| {
        benchmark.water_use_m3_per_facility * f64::from(facility_count)
    });
    tag(
        ProfileField::AnnualWaterVolume,
        draft.annual_water_volume_m3.is_some(),
        &mut provenance,
    );

    let treatment_level = draft
        .treatment_level
        .unwrap_or(benchmark.typical_treatment);
    tag(
        ProfileField::TreatmentLevel,
        draft.treatment_level.is_some(),
        &mut provenance,
    );

    let intake_quality = draft
        .intake_quality
        .unwrap_or(benchmark.typical_intake_quality);
    tag(
        ProfileField::IntakeQuality,
        draft.intake_quality.is_some(),
        &mut provenance,
    );

    let contaminants = draft.contaminants.clone().unwrap_or_default();
    tag(
        ProfileField::Contaminants,
        draft.contaminants.is_some(),
        &mut provenance,
    );

    let discharge_method = draft
        .discharge_method
        .unwrap_or(benchmark.typical_discharge);
    tag(
        ProfileField::DischargeMethod,
        draft.discharge_method.is_some(),
        &mut provenance,
    );

    let discharge_compliance_concerns = draft.discharge_compliance_concerns.unwrap_or(false);
    tag(
        ProfileField::DischargeComplianceConcerns,
        draft.discharge_compliance_concerns.is_some(),
        &mut provenance,
    );

    let upstream_sources = draft.upstream_sources.clone().unwrap_or_default();
    tag(
        ProfileField::UpstreamSources,
        draft.upstream_sources.is_some(),
        &mut provenance,
    );

    let testing_frequency = draft
        .testing_frequency
        .unwrap_or(TestingFrequency::NeverOrUnknown);
    tag(
        ProfileField::TestingFrequency,
        draft.testing_frequency.is_some(),
        &mut provenance,
    );

    let disruption_history = draft.disruption_history.unwrap_or(false);
    tag(
        ProfileField::DisruptionHistory,
        draft.disruption_history.is_some(),
        &mut provenance,
    );

    OperationalProfile {
        industry_sector,
        country,
        region,
        facility_count,
        water_sources,
        annual_water_volume_m3,
        treatment_level,
        intake_quality,
        contaminants,
        discharge_method,
        discharge_compliance_concerns,
        upstream_sources,
        testing_frequency,
        disruption_history,
        provenance,
    }
}
