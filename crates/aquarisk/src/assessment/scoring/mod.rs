mod dimensions;
pub mod model;

pub use model::{
    DimensionWeights, FinancialRules, PhysicalRules, RegulatoryRules, ReputationalRules,
    ScoringModel, TriggerThresholds, WaterQualityRules,
};

use serde::{Deserialize, Serialize};

use super::domain::{Dimension, OperationalProfile};
use super::reference::{LookupTier, ReferenceData};

/// Bounded score for one risk dimension plus the ranked factors behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: Dimension,
    /// Clamped to [0, 100].
    pub score: u8,
    /// Human-readable contributing factors, most significant first.
    pub factors: Vec<String>,
}

/// Full risk assessment: the five dimension scores, the weighted composite,
/// and the physical-risk lookup tier that was used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub physical: DimensionScore,
    pub regulatory: DimensionScore,
    pub reputational: DimensionScore,
    pub financial: DimensionScore,
    pub water_quality: DimensionScore,
    /// Weighted composite, rounded once, clamped to [0, 100].
    pub overall: u8,
    pub physical_lookup: LookupTier,
    /// Name of the scoring model that produced this profile.
    pub model: String,
}

impl RiskProfile {
    pub fn dimension(&self, dimension: Dimension) -> &DimensionScore {
        match dimension {
            Dimension::Physical => &self.physical,
            Dimension::Regulatory => &self.regulatory,
            Dimension::Reputational => &self.reputational,
            Dimension::Financial => &self.financial,
            Dimension::WaterQuality => &self.water_quality,
        }
    }

    /// Dimension scores in display order.
    pub fn scores(&self) -> [&DimensionScore; 5] {
        [
            &self.physical,
            &self.regulatory,
            &self.reputational,
            &self.financial,
            &self.water_quality,
        ]
    }
}

/// Stateless scorer applying one immutable model to normalized profiles.
pub struct RiskEngine {
    model: ScoringModel,
    reference: ReferenceData,
}

impl RiskEngine {
    pub fn new(model: ScoringModel, reference: ReferenceData) -> Self {
        Self { model, reference }
    }

    /// Engine with the production model and standard reference tables.
    pub fn standard() -> Self {
        Self::new(ScoringModel::baseline(), ReferenceData::standard())
    }

    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Score a normalized profile. Pure arithmetic over closed vocabularies;
    /// cannot fail for any `OperationalProfile`.
    pub fn score(&self, profile: &OperationalProfile) -> RiskProfile {
        let (physical, physical_lookup) =
            dimensions::physical(profile, &self.reference, &self.model);
        let regulatory = dimensions::regulatory(profile, &self.model);
        let reputational = dimensions::reputational(profile, &self.model);
        let financial = dimensions::financial(profile, &self.model, physical.score);
        let water_quality = dimensions::water_quality(profile, &self.model);

        let overall = aggregate(
            &self.model.weights,
            [
                physical.score,
                regulatory.score,
                reputational.score,
                financial.score,
                water_quality.score,
            ],
        );

        RiskProfile {
            physical,
            regulatory,
            reputational,
            financial,
            water_quality,
            overall,
            physical_lookup,
            model: self.model.name().to_string(),
        }
    }
}

/// Weighted composite of the five scores, rounded once at the end.
fn aggregate(weights: &DimensionWeights, scores: [u8; 5]) -> u8 {
    let [physical, regulatory, reputational, financial, water_quality] =
        scores.map(f64::from);

    let weighted = physical * weights.physical
        + regulatory * weights.regulatory
        + reputational * weights.reputational
        + financial * weights.financial
        + water_quality * weights.water_quality;

    weighted.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::super::domain::{
        Contaminant, DischargeMethod, IndustrySector, IntakeQuality, ProfileField, Provenance,
        TestingFrequency, TreatmentLevel, UpstreamSource, WaterSource,
    };
    use super::super::domain::OperationalProfile;
    use super::*;
    use std::collections::BTreeMap;

    fn stated_everywhere() -> BTreeMap<ProfileField, Provenance> {
        let mut map = BTreeMap::new();
        map.insert(ProfileField::IndustrySector, Provenance::Stated);
        map.insert(ProfileField::Country, Provenance::Stated);
        map
    }

    fn profile(sector: IndustrySector, country: &str) -> OperationalProfile {
        OperationalProfile {
            industry_sector: sector,
            country: country.to_string(),
            region: None,
            facility_count: 1,
            water_sources: vec![WaterSource::MunicipalSupply],
            annual_water_volume_m3: 500_000.0,
            treatment_level: TreatmentLevel::Advanced,
            intake_quality: IntakeQuality::Good,
            contaminants: Vec::new(),
            discharge_method: DischargeMethod::MunicipalSewer,
            discharge_compliance_concerns: false,
            upstream_sources: Vec::new(),
            testing_frequency: TestingFrequency::Continuous,
            disruption_history: false,
            provenance: stated_everywhere(),
        }
    }

    #[test]
    fn unknown_country_uses_default_baseline() {
        let engine = RiskEngine::standard();
        let risk = engine.score(&profile(IndustrySector::Semiconductors, "Freedonia"));

        assert_eq!(risk.physical.score, 35);
        assert_eq!(risk.physical_lookup, LookupTier::DefaultEstimation);
    }

    #[test]
    fn known_country_with_disruptions_adds_on_top_of_baseline() {
        let engine = RiskEngine::standard();
        let mut profile = profile(IndustrySector::Semiconductors, "Taiwan");
        profile.disruption_history = true;

        let risk = engine.score(&profile);
        assert_eq!(risk.physical_lookup, LookupTier::CountryMatch);
        assert_eq!(risk.physical.score, 72 + 10);
    }

    #[test]
    fn region_entry_outranks_country_baseline() {
        let engine = RiskEngine::standard();
        let mut profile = profile(IndustrySector::DataCenters, "United States");
        profile.region = Some("Arizona".to_string());

        let risk = engine.score(&profile);
        assert_eq!(risk.physical_lookup, LookupTier::RegionMatch);
        assert_eq!(risk.physical.score, 82);
    }

    #[test]
    fn groundwater_without_municipal_backup_raises_physical() {
        let engine = RiskEngine::standard();

        let mut sole = profile(IndustrySector::Agriculture, "Freedonia");
        sole.water_sources = vec![WaterSource::Groundwater];
        assert_eq!(engine.score(&sole).physical.score, 40);

        let mut mixed = sole.clone();
        mixed.water_sources = vec![WaterSource::Groundwater, WaterSource::MunicipalSupply];
        assert_eq!(engine.score(&mixed).physical.score, 35);
    }

    #[test]
    fn untreated_food_and_beverage_trips_regulatory_and_reputational() {
        let engine = RiskEngine::standard();
        let mut profile = profile(IndustrySector::FoodAndBeverage, "Freedonia");
        profile.treatment_level = TreatmentLevel::None;

        let risk = engine.score(&profile);
        assert_eq!(risk.regulatory.score, 30 + 25 + 20);
        assert_eq!(risk.reputational.score, 30 + 25 + 15);
    }

    #[test]
    fn financial_compounds_only_above_physical_trigger() {
        let engine = RiskEngine::standard();

        // Taiwan baseline 72 > 60 trigger.
        let scarce = profile(IndustrySector::Semiconductors, "Taiwan");
        let risk = engine.score(&scarce);
        assert_eq!(risk.financial.score, 30 + 20 + 15);

        // Default baseline 35 stays below the trigger.
        let slack = profile(IndustrySector::Semiconductors, "Freedonia");
        let risk = engine.score(&slack);
        assert_eq!(risk.financial.score, 30 + 20);
    }

    #[test]
    fn severe_contaminants_and_monitoring_gap_accumulate() {
        let engine = RiskEngine::standard();
        let mut profile = profile(IndustrySector::Manufacturing, "Freedonia");
        profile.intake_quality = IntakeQuality::Unknown;
        profile.contaminants = vec![Contaminant::Pfas, Contaminant::HeavyMetals];
        profile.testing_frequency = TestingFrequency::NeverOrUnknown;

        let risk = engine.score(&profile);
        // 35 intake + 6 contaminants + 10 severe + 15 monitoring.
        assert_eq!(risk.water_quality.score, 66);
    }

    #[test]
    fn contaminant_growth_never_lowers_water_quality_score() {
        let engine = RiskEngine::standard();
        let mut profile = profile(IndustrySector::Manufacturing, "Freedonia");

        let mut last = engine.score(&profile).water_quality.score;
        let additions = [
            Contaminant::Sediment,
            Contaminant::Nitrates,
            Contaminant::Microbial,
            Contaminant::DissolvedSalts,
            Contaminant::OrganicCompounds,
            Contaminant::Pfas,
            Contaminant::HeavyMetals,
        ];
        for contaminant in additions {
            profile.contaminants.push(contaminant);
            let score = engine.score(&profile).water_quality.score;
            assert!(score >= last, "adding {contaminant:?} lowered the score");
            last = score;
        }
    }

    #[test]
    fn upstream_sources_capped_and_none_known_ignored() {
        let engine = RiskEngine::standard();
        let mut profile = profile(IndustrySector::Manufacturing, "Freedonia");
        profile.upstream_sources = vec![UpstreamSource::NoneKnown];
        let baseline = engine.score(&profile).water_quality.score;

        profile.upstream_sources = vec![
            UpstreamSource::IndustrialDischarge,
            UpstreamSource::AgriculturalRunoff,
            UpstreamSource::MiningActivity,
            UpstreamSource::LandfillLeachate,
        ];
        let loaded = engine.score(&profile).water_quality.score;
        // Four sources, capped at 15.
        assert_eq!(loaded, baseline + 15);
    }

    #[test]
    fn overall_is_the_weighted_sum_rounded_once() {
        let engine = RiskEngine::standard();
        let risk = engine.score(&profile(IndustrySector::Other, "Freedonia"));

        let expected = (f64::from(risk.physical.score) * 0.25
            + f64::from(risk.regulatory.score) * 0.20
            + f64::from(risk.reputational.score) * 0.15
            + f64::from(risk.financial.score) * 0.20
            + f64::from(risk.water_quality.score) * 0.20)
            .round() as u8;
        assert_eq!(risk.overall, expected);
    }

    #[test]
    fn scoring_is_deterministic() {
        let engine = RiskEngine::standard();
        let mut profile = profile(IndustrySector::Mining, "Chile");
        profile.region = Some("Antofagasta".to_string());
        profile.contaminants = vec![Contaminant::HeavyMetals];
        profile.disruption_history = true;

        let first = engine.score(&profile);
        let second = engine.score(&profile);
        assert_eq!(first, second);
    }

    #[test]
    fn all_scores_stay_in_bounds_under_worst_case_input() {
        let engine = RiskEngine::standard();
        let mut profile = profile(IndustrySector::FoodAndBeverage, "Saudi Arabia");
        profile.water_sources = vec![WaterSource::Groundwater];
        profile.treatment_level = TreatmentLevel::None;
        profile.intake_quality = IntakeQuality::Poor;
        profile.contaminants = vec![
            Contaminant::Pfas,
            Contaminant::HeavyMetals,
            Contaminant::OrganicCompounds,
            Contaminant::Nitrates,
            Contaminant::DissolvedSalts,
            Contaminant::Microbial,
            Contaminant::Sediment,
        ];
        profile.discharge_method = DischargeMethod::DirectToSurfaceWater;
        profile.discharge_compliance_concerns = true;
        profile.upstream_sources = vec![
            UpstreamSource::IndustrialDischarge,
            UpstreamSource::AgriculturalRunoff,
            UpstreamSource::MunicipalWastewater,
            UpstreamSource::MiningActivity,
            UpstreamSource::LandfillLeachate,
        ];
        profile.testing_frequency = TestingFrequency::NeverOrUnknown;
        profile.disruption_history = true;

        let risk = engine.score(&profile);
        for score in risk.scores() {
            assert!(score.score <= 100, "{:?} out of bounds", score.dimension);
        }
        assert!(risk.overall <= 100);
        // Poor intake 50 + 15 cap + 10 severe + 15 upstream + 15 monitoring.
        assert_eq!(risk.water_quality.score, 100);
    }

    #[test]
    fn factors_are_ranked_most_significant_first() {
        let engine = RiskEngine::standard();
        let mut profile = profile(IndustrySector::Semiconductors, "Freedonia");
        profile.disruption_history = true;

        let risk = engine.score(&profile);
        // Baseline 35 outranks the +10 disruption adjustment.
        assert!(risk.physical.factors[0].contains("baseline"));
        assert!(risk.physical.factors[1].contains("disruption"));
    }
}
