//! Boundary to the free-text understanding collaborator. The engine only
//! depends on the `ProfileExtractor` trait; the network-backed service can
//! be swapped for the deterministic `KeywordExtractor` in tests and demos.

use std::collections::BTreeMap;

use super::domain::{
    Contaminant, IndustrySector, ProfileDraft, ProfileField, Provenance, TestingFrequency,
    TreatmentLevel, WaterSource,
};

/// Best-effort structured profile extracted from prose, with per-field
/// confidence: fields the collaborator read directly are `stated`, fields it
/// guessed are `inferred`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedProfile {
    pub draft: ProfileDraft,
    pub provenance: BTreeMap<ProfileField, Provenance>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("description is empty")]
    EmptyDescription,
    #[error("extraction service unavailable: {0}")]
    Unavailable(String),
    #[error("could not build a usable profile: {0}")]
    Unusable(String),
}

/// Single request/response per submission; callers treat failures as final
/// and let the user retry by resubmitting.
pub trait ProfileExtractor: Send + Sync {
    fn extract(&self, description: &str) -> Result<ExtractedProfile, ExtractionError>;
}

/// Deterministic keyword-driven extractor. Mirrors the hint vocabulary the
/// hosted text-understanding service is prompted with, so offline demos and
/// tests behave like the production path on plain descriptions.
#[derive(Debug, Default, Clone)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    fn sector_of(text: &str) -> Option<IndustrySector> {
        const HINTS: &[(&str, IndustrySector)] = &[
            ("semiconductor", IndustrySector::Semiconductors),
            ("chip", IndustrySector::Semiconductors),
            ("wafer", IndustrySector::Semiconductors),
            ("fab", IndustrySector::Semiconductors),
            ("data center", IndustrySector::DataCenters),
            ("datacenter", IndustrySector::DataCenters),
            ("server farm", IndustrySector::DataCenters),
            ("pharma", IndustrySector::Pharmaceuticals),
            ("drug", IndustrySector::Pharmaceuticals),
            ("medicine", IndustrySector::Pharmaceuticals),
            ("brewery", IndustrySector::FoodAndBeverage),
            ("bottling", IndustrySector::FoodAndBeverage),
            ("beverage", IndustrySector::FoodAndBeverage),
            ("dairy", IndustrySector::FoodAndBeverage),
            ("food", IndustrySector::FoodAndBeverage),
            ("mining", IndustrySector::Mining),
            ("mine", IndustrySector::Mining),
            ("farm", IndustrySector::Agriculture),
            ("irrigation", IndustrySector::Agriculture),
            ("orchard", IndustrySector::Agriculture),
            ("textile", IndustrySector::Textiles),
            ("dye", IndustrySector::Textiles),
            ("chemical", IndustrySector::Chemicals),
            ("power plant", IndustrySector::Energy),
            ("power station", IndustrySector::Energy),
            ("refinery", IndustrySector::Energy),
            ("factory", IndustrySector::Manufacturing),
            ("manufactur", IndustrySector::Manufacturing),
            ("plant", IndustrySector::Manufacturing),
        ];

        HINTS
            .iter()
            .find(|(needle, _)| text.contains(needle))
            .map(|(_, sector)| *sector)
    }

    fn country_of(text: &str) -> Option<String> {
        const COUNTRIES: &[&str] = &[
            "Taiwan",
            "India",
            "Saudi Arabia",
            "United Arab Emirates",
            "South Africa",
            "Australia",
            "Chile",
            "Mexico",
            "Spain",
            "Singapore",
            "United States",
            "Germany",
            "Netherlands",
            "Ireland",
            "Japan",
            "China",
            "Brazil",
            "Canada",
            "France",
            "United Kingdom",
        ];

        COUNTRIES
            .iter()
            .find(|country| text.contains(&country.to_ascii_lowercase()))
            .map(|country| (*country).to_string())
    }

    fn sources_of(text: &str) -> Vec<WaterSource> {
        let mut sources = Vec::new();
        let mut push = |source: WaterSource| {
            if !sources.contains(&source) {
                sources.push(source);
            }
        };

        if text.contains("municipal") || text.contains("city water") {
            push(WaterSource::MunicipalSupply);
        }
        if text.contains("groundwater") || text.contains("borehole") || text.contains("well water")
        {
            push(WaterSource::Groundwater);
        }
        if text.contains("river") || text.contains("surface water") || text.contains("lake") {
            push(WaterSource::SurfaceWater);
        }
        if text.contains("recycled") || text.contains("reclaimed") {
            push(WaterSource::RecycledReclaimed);
        }
        if text.contains("desalinat") {
            push(WaterSource::Desalinated);
        }
        if text.contains("rainwater") {
            push(WaterSource::Rainwater);
        }
        sources
    }

    fn treatment_of(text: &str) -> Option<TreatmentLevel> {
        if text.contains("zero liquid") || text.contains("zld") {
            Some(TreatmentLevel::ZeroLiquidDischarge)
        } else if text.contains("reverse osmosis")
            || text.contains("ultrapure")
            || text.contains("advanced treatment")
        {
            Some(TreatmentLevel::Advanced)
        } else if text.contains("no treatment") || text.contains("untreated") {
            Some(TreatmentLevel::None)
        } else if text.contains("basic treatment") {
            Some(TreatmentLevel::Basic)
        } else {
            None
        }
    }

    fn contaminants_of(text: &str) -> Vec<Contaminant> {
        let mut found = Vec::new();
        let mut push = |contaminant: Contaminant| {
            if !found.contains(&contaminant) {
                found.push(contaminant);
            }
        };

        if text.contains("pfas") || text.contains("forever chemical") {
            push(Contaminant::Pfas);
        }
        if text.contains("heavy metal")
            || text.contains("arsenic")
            || text.contains("lead")
            || text.contains("chromium")
        {
            push(Contaminant::HeavyMetals);
        }
        if text.contains("pesticide") || text.contains("solvent") {
            push(Contaminant::OrganicCompounds);
        }
        if text.contains("nitrate") {
            push(Contaminant::Nitrates);
        }
        if text.contains("salinity") || text.contains("high tds") {
            push(Contaminant::DissolvedSalts);
        }
        found
    }

    fn testing_of(text: &str) -> Option<TestingFrequency> {
        if text.contains("continuous monitoring") || text.contains("online monitoring") {
            Some(TestingFrequency::Continuous)
        } else if text.contains("test daily") || text.contains("daily testing") {
            Some(TestingFrequency::Daily)
        } else if text.contains("weekly") {
            Some(TestingFrequency::Weekly)
        } else if text.contains("monthly") {
            Some(TestingFrequency::Monthly)
        } else if text.contains("once a year") || text.contains("annual") {
            Some(TestingFrequency::AnnualOrLess)
        } else if text.contains("never test") || text.contains("don't test") {
            Some(TestingFrequency::NeverOrUnknown)
        } else {
            None
        }
    }

    fn disruptions_of(text: &str) -> Option<bool> {
        const HINTS: &[&str] = &[
            "drought",
            "shortage",
            "scarcity",
            "restriction",
            "disruption",
            "curtail",
            "rationing",
        ];
        HINTS.iter().any(|needle| text.contains(needle)).then_some(true)
    }

    fn facility_count_of(text: &str) -> Option<u32> {
        const FACILITY_WORDS: &[&str] = &[
            "facilities", "facility", "plants", "plant", "sites", "site", "fabs", "fab",
        ];

        let words: Vec<&str> = text.split_whitespace().collect();
        for window in words.windows(2) {
            let [count, noun] = window else { continue };
            if FACILITY_WORDS.contains(noun) {
                if let Ok(value) = count.parse::<u32>() {
                    if value > 0 {
                        return Some(value);
                    }
                }
            }
        }
        None
    }
}

impl ProfileExtractor for KeywordExtractor {
    fn extract(&self, description: &str) -> Result<ExtractedProfile, ExtractionError> {
        if description.trim().is_empty() {
            return Err(ExtractionError::EmptyDescription);
        }
        let text = description.to_ascii_lowercase();

        let mut draft = ProfileDraft::default();
        let mut provenance = BTreeMap::new();
        let mut stated = |field: ProfileField, map: &mut BTreeMap<ProfileField, Provenance>| {
            map.insert(field, Provenance::Stated);
        };

        if let Some(sector) = Self::sector_of(&text) {
            draft.industry_sector = Some(sector);
            stated(ProfileField::IndustrySector, &mut provenance);
        }
        if let Some(country) = Self::country_of(&text) {
            draft.country = Some(country);
            stated(ProfileField::Country, &mut provenance);
        }
        let sources = Self::sources_of(&text);
        if !sources.is_empty() {
            draft.water_sources = Some(sources);
            stated(ProfileField::WaterSources, &mut provenance);
        }
        if let Some(treatment) = Self::treatment_of(&text) {
            draft.treatment_level = Some(treatment);
            stated(ProfileField::TreatmentLevel, &mut provenance);
        }
        let contaminants = Self::contaminants_of(&text);
        if !contaminants.is_empty() {
            draft.contaminants = Some(contaminants);
            stated(ProfileField::Contaminants, &mut provenance);
        }
        if let Some(frequency) = Self::testing_of(&text) {
            draft.testing_frequency = Some(frequency);
            stated(ProfileField::TestingFrequency, &mut provenance);
        }
        if let Some(disrupted) = Self::disruptions_of(&text) {
            draft.disruption_history = Some(disrupted);
            stated(ProfileField::DisruptionHistory, &mut provenance);
        }
        if let Some(count) = Self::facility_count_of(&text) {
            draft.facility_count = Some(count);
            stated(ProfileField::FacilityCount, &mut provenance);
        }

        if draft.industry_sector.is_none() {
            return Err(ExtractionError::Unusable(
                "could not determine the industry sector".to_string(),
            ));
        }
        if draft.country.is_none() {
            return Err(ExtractionError::Unusable(
                "could not determine the country of operation".to_string(),
            ));
        }

        Ok(ExtractedProfile { draft, provenance })
    }
}
