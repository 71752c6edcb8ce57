//! Recommendation catalog and generator. Rules map a risk dimension (and
//! optionally a profile condition) to a candidate action; the generator
//! selects, deduplicates, ranks, and truncates.

use serde::{Deserialize, Serialize};

use super::domain::{Contaminant, Dimension, OperationalProfile, TestingFrequency};
use super::reference::{ExampleProject, ReferenceData, TechnologyTag};
use super::scoring::{RiskProfile, ScoringModel};

/// Hard cap on recommendations returned per assessment.
pub const MAX_RECOMMENDATIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

/// Prioritized, actionable remediation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub priority: Priority,
    pub description: String,
    pub expected_impact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<ExampleProject>,
}

/// Extra gate on a catalog rule beyond the dimension threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RuleCondition {
    ContaminantPresent(Contaminant),
    DischargeConcerns,
    InfrequentTesting,
}

impl RuleCondition {
    fn holds(self, profile: &OperationalProfile) -> bool {
        match self {
            Self::ContaminantPresent(contaminant) => profile.contaminants.contains(&contaminant),
            Self::DischargeConcerns => profile.discharge_compliance_concerns,
            Self::InfrequentTesting => matches!(
                profile.testing_frequency,
                TestingFrequency::Monthly
                    | TestingFrequency::AnnualOrLess
                    | TestingFrequency::NeverOrUnknown
            ),
        }
    }
}

struct CatalogRule {
    dimension: Dimension,
    condition: Option<RuleCondition>,
    title: &'static str,
    priority: Priority,
    description: &'static str,
    expected_impact: &'static str,
    technology: Option<TechnologyTag>,
}

/// Static table mapping risk dimensions and severities to candidate actions.
pub struct RecommendationCatalog {
    rules: Vec<CatalogRule>,
}

impl RecommendationCatalog {
    pub fn standard() -> Self {
        Self {
            rules: vec![
                CatalogRule {
                    dimension: Dimension::Physical,
                    condition: None,
                    title: "Diversify Water Sources",
                    priority: Priority::High,
                    description: "Add alternative supplies such as recycled water or rainwater harvesting to reduce dependency on stressed sources.",
                    expected_impact: "Reduces single-source exposure and keeps production running through regional restrictions.",
                    technology: Some(TechnologyTag::ReuseRecycling),
                },
                CatalogRule {
                    dimension: Dimension::Financial,
                    condition: None,
                    title: "Water Efficiency Projects",
                    priority: Priority::Medium,
                    description: "Implement water reuse and recycling systems to reduce operating costs and supply risk.",
                    expected_impact: "Lowers intake volume and shields operating margin from water price volatility.",
                    technology: Some(TechnologyTag::ReuseRecycling),
                },
                CatalogRule {
                    dimension: Dimension::Regulatory,
                    condition: None,
                    title: "Upgrade Treatment Systems",
                    priority: Priority::High,
                    description: "Invest in advanced water treatment to meet evolving discharge regulations and PFAS standards.",
                    expected_impact: "Builds compliance headroom ahead of tightening permit limits.",
                    technology: Some(TechnologyTag::MembraneTreatment),
                },
                CatalogRule {
                    dimension: Dimension::Regulatory,
                    condition: Some(RuleCondition::DischargeConcerns),
                    title: "Wastewater Treatment Upgrade",
                    priority: Priority::High,
                    description: "Upgrade discharge treatment; membrane bioreactors deliver consistent compliance with permit limits.",
                    expected_impact: "Closes the gap between current effluent quality and permit requirements.",
                    technology: Some(TechnologyTag::MembraneTreatment),
                },
                CatalogRule {
                    dimension: Dimension::Reputational,
                    condition: None,
                    title: "Strengthen Water Stewardship Reporting",
                    priority: Priority::Medium,
                    description: "Formalize water stewardship programs and transparent reporting to stakeholders.",
                    expected_impact: "Demonstrates credible stewardship before scrutiny escalates.",
                    technology: None,
                },
                CatalogRule {
                    dimension: Dimension::WaterQuality,
                    condition: None,
                    title: "Advanced Intake Treatment",
                    priority: Priority::High,
                    description: "Deploy RO/UF treatment on intake water to address quality concerns and protect operational reliability.",
                    expected_impact: "Stabilizes feedwater quality and prevents contamination-driven downtime.",
                    technology: Some(TechnologyTag::MembraneTreatment),
                },
                CatalogRule {
                    dimension: Dimension::WaterQuality,
                    condition: Some(RuleCondition::ContaminantPresent(Contaminant::Pfas)),
                    title: "PFAS Treatment Compliance",
                    priority: Priority::High,
                    description: "PFAS regulations are tightening globally; install specialized PFAS treatment to ensure compliance and avoid liability.",
                    expected_impact: "Removes a fast-moving regulatory liability from the effluent stream.",
                    technology: Some(TechnologyTag::PfasTreatment),
                },
                CatalogRule {
                    dimension: Dimension::WaterQuality,
                    condition: Some(RuleCondition::InfrequentTesting),
                    title: "Continuous Quality Monitoring",
                    priority: Priority::Medium,
                    description: "Install real-time water quality monitoring to detect contamination early and prevent operational disruptions.",
                    expected_impact: "Turns quality excursions into early warnings instead of production losses.",
                    technology: Some(TechnologyTag::Monitoring),
                },
            ],
        }
    }
}

/// Match dimension scores against the catalog, then dedupe by title, sort by
/// priority (stable insertion order breaks ties), and truncate.
///
/// When no dimension exceeds its trigger threshold a small default set is
/// returned instead: an efficiency audit, plus a supply-resilience review
/// when physical risk is more than background.
pub fn generate(
    profile: &OperationalProfile,
    risk: &RiskProfile,
    catalog: &RecommendationCatalog,
    model: &ScoringModel,
    reference: &ReferenceData,
) -> Vec<Recommendation> {
    let triggered: Vec<Dimension> = Dimension::evaluation_order()
        .into_iter()
        .filter(|dimension| {
            risk.dimension(*dimension).score > model.thresholds.for_dimension(*dimension)
        })
        .collect();

    if triggered.is_empty() {
        return default_set(risk);
    }

    let mut selected: Vec<Recommendation> = Vec::new();
    for dimension in Dimension::evaluation_order() {
        let above_threshold = triggered.contains(&dimension);
        for rule in catalog
            .rules
            .iter()
            .filter(|rule| rule.dimension == dimension)
        {
            let applies = match rule.condition {
                None => above_threshold,
                Some(condition) => condition.holds(profile),
            };
            if !applies {
                continue;
            }
            if selected.iter().any(|existing| existing.title == rule.title) {
                continue;
            }
            selected.push(Recommendation {
                title: rule.title.to_string(),
                priority: rule.priority,
                description: rule.description.to_string(),
                expected_impact: rule.expected_impact.to_string(),
                example: rule
                    .technology
                    .and_then(|tag| reference.example_for(tag))
                    .cloned(),
            });
        }
    }

    selected.sort_by_key(|recommendation| recommendation.priority.rank());
    selected.truncate(MAX_RECOMMENDATIONS);
    selected
}

fn default_set(risk: &RiskProfile) -> Vec<Recommendation> {
    let mut selected = vec![Recommendation {
        title: "Water Efficiency Audit".to_string(),
        priority: Priority::Medium,
        description: "Commission a site-wide water balance and efficiency audit to establish a usage baseline.".to_string(),
        expected_impact: "Identifies quick wins and baselines consumption ahead of future projects.".to_string(),
        example: None,
    }];

    if risk.physical.score > 30 {
        selected.push(Recommendation {
            title: "Supply Resilience Review".to_string(),
            priority: Priority::Low,
            description: "Review supply redundancy and drought contingency plans for each facility.".to_string(),
            expected_impact: "Surfaces single points of failure before the next regional shortage.".to_string(),
            example: None,
        });
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::super::domain::{
        DischargeMethod, IndustrySector, IntakeQuality, OperationalProfile, TestingFrequency,
        TreatmentLevel, WaterSource,
    };
    use super::super::scoring::RiskEngine;
    use super::*;
    use std::collections::BTreeMap;

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
            provenance: BTreeMap::new(),
        }
    }

    fn generate_for(profile: &OperationalProfile) -> Vec<Recommendation> {
        let engine = RiskEngine::standard();
        let catalog = RecommendationCatalog::standard();
        let risk = engine.score(profile);
        generate(profile, &risk, &catalog, engine.model(), engine.reference())
    }

    #[test]
    fn quiet_profile_gets_only_the_default_audit() {
        // Netherlands baseline 25 keeps physical at background level.
        let recommendations = generate_for(&profile(IndustrySector::Other, "Netherlands"));

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].title, "Water Efficiency Audit");
    }

    #[test]
    fn default_set_adds_resilience_review_when_physical_above_background() {
        // Unknown country: default baseline 35 > 30.
        let recommendations = generate_for(&profile(IndustrySector::Other, "Freedonia"));

        let titles: Vec<_> = recommendations
            .iter()
            .map(|recommendation| recommendation.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["Water Efficiency Audit", "Supply Resilience Review"]
        );
    }

    #[test]
    fn high_physical_risk_triggers_source_diversification() {
        let mut profile = profile(IndustrySector::Manufacturing, "Saudi Arabia");
        profile.disruption_history = true;

        let recommendations = generate_for(&profile);
        assert!(recommendations
            .iter()
            .any(|recommendation| recommendation.title == "Diversify Water Sources"));
        assert!(recommendations[0].priority == Priority::High);
    }

    #[test]
    fn list_is_capped_and_sorted_by_priority() {
        let mut profile = profile(IndustrySector::FoodAndBeverage, "Saudi Arabia");
        profile.treatment_level = TreatmentLevel::None;
        profile.discharge_compliance_concerns = true;
        profile.intake_quality = IntakeQuality::Poor;
        profile.contaminants = vec![Contaminant::Pfas];
        profile.testing_frequency = TestingFrequency::NeverOrUnknown;
        profile.disruption_history = true;

        let recommendations = generate_for(&profile);
        assert!(recommendations.len() <= MAX_RECOMMENDATIONS);

        let ranks: Vec<_> = recommendations
            .iter()
            .map(|recommendation| recommendation.priority.rank())
            .collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted, "priorities must be non-increasing");
    }

    #[test]
    fn titles_are_unique() {
        let mut profile = profile(IndustrySector::Mining, "Chile");
        profile.region = Some("Antofagasta".to_string());
        profile.treatment_level = TreatmentLevel::None;
        profile.discharge_compliance_concerns = true;

        let recommendations = generate_for(&profile);
        let mut titles: Vec<_> = recommendations
            .iter()
            .map(|recommendation| recommendation.title.clone())
            .collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), recommendations.len());
    }

    #[test]
    fn pfas_rule_attaches_the_pfas_example_project() {
        let mut profile = profile(IndustrySector::Chemicals, "Saudi Arabia");
        profile.contaminants = vec![Contaminant::Pfas];
        profile.intake_quality = IntakeQuality::Poor;
        profile.testing_frequency = TestingFrequency::Continuous;

        let recommendations = generate_for(&profile);
        let pfas = recommendations
            .iter()
            .find(|recommendation| recommendation.title == "PFAS Treatment Compliance")
            .expect("pfas rule fires");
        let example = pfas.example.as_ref().expect("example attached");
        assert_eq!(example.technology, TechnologyTag::PfasTreatment);
    }
}
