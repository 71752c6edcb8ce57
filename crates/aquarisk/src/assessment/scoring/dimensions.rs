//! The five dimension scorers. Each is a pure function of the normalized
//! profile, the reference tables, and the scoring model, and records the
//! factors that drove the score so assessments stay auditable.

use std::collections::BTreeSet;

use super::super::domain::{Dimension, OperationalProfile, TreatmentLevel, UpstreamSource, WaterSource};
use super::super::reference::{LookupTier, ReferenceData};
use super::model::ScoringModel;
use super::DimensionScore;

/// Accumulates factor descriptions with their point contributions, then
/// emits them most significant first.
struct FactorLog {
    entries: Vec<(u32, String)>,
    total: u32,
}

impl FactorLog {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            total: 0,
        }
    }

    fn add(&mut self, points: u8, description: String) {
        self.total += u32::from(points);
        self.entries.push((u32::from(points), description));
    }

    fn finish(mut self, dimension: Dimension) -> DimensionScore {
        self.entries
            .sort_by_key(|(points, _)| std::cmp::Reverse(*points));
        DimensionScore {
            dimension,
            score: self.total.min(100) as u8,
            factors: self.entries.into_iter().map(|(_, text)| text).collect(),
        }
    }
}

/// Tiered lookup: region override, then country baseline, then the model's
/// default constant. Returns the tier used so the risk profile can report
/// its provenance.
pub(crate) fn physical(
    profile: &OperationalProfile,
    reference: &ReferenceData,
    model: &ScoringModel,
) -> (DimensionScore, LookupTier) {
    let mut log = FactorLog::new();

    let (baseline, tier) = match reference.water_stress(&profile.country, profile.region.as_deref())
    {
        Some(hit) => hit,
        None => (model.physical.default_baseline, LookupTier::DefaultEstimation),
    };

    let place = match (&tier, &profile.region) {
        (LookupTier::RegionMatch, Some(region)) => format!("{}, {}", region, profile.country),
        _ => profile.country.clone(),
    };
    match tier {
        LookupTier::DefaultEstimation => log.add(
            baseline,
            format!(
                "no water-stress data for {place}; default baseline {baseline} applied"
            ),
        ),
        _ => log.add(
            baseline,
            format!(
                "water-stress baseline {baseline} for {place} ({})",
                tier.label()
            ),
        ),
    }

    if profile.disruption_history {
        log.add(
            model.physical.disruption_history,
            "supply disruptions reported within the past five years".to_string(),
        );
    }

    let groundwater_only = profile.water_sources.contains(&WaterSource::Groundwater)
        && !profile.water_sources.contains(&WaterSource::MunicipalSupply);
    if groundwater_only {
        log.add(
            model.physical.sole_groundwater,
            "groundwater-dependent with no municipal backup".to_string(),
        );
    }

    (log.finish(Dimension::Physical), tier)
}

pub(crate) fn regulatory(profile: &OperationalProfile, model: &ScoringModel) -> DimensionScore {
    let rules = &model.regulatory;
    let mut log = FactorLog::new();

    log.add(rules.base, "baseline regulatory exposure".to_string());

    if rules.high_regulation_sectors.contains(&profile.industry_sector) {
        log.add(
            rules.high_regulation_sector,
            format!(
                "{} operates under tight water regulation",
                profile.industry_sector.label()
            ),
        );
    }

    if matches!(
        profile.treatment_level,
        TreatmentLevel::None | TreatmentLevel::Basic
    ) {
        log.add(
            rules.weak_treatment,
            format!(
                "treatment level '{}' leaves little headroom against discharge limits",
                profile.treatment_level.label()
            ),
        );
    }

    if profile.discharge_compliance_concerns {
        log.add(
            rules.compliance_concerns,
            "self-reported discharge compliance concerns".to_string(),
        );
    }

    if profile.discharge_method == super::super::domain::DischargeMethod::DirectToSurfaceWater {
        log.add(
            rules.surface_discharge,
            "discharges directly to surface water".to_string(),
        );
    }

    log.finish(Dimension::Regulatory)
}

pub(crate) fn reputational(profile: &OperationalProfile, model: &ScoringModel) -> DimensionScore {
    let rules = &model.reputational;
    let mut log = FactorLog::new();

    log.add(rules.base, "baseline reputational exposure".to_string());

    if rules.high_visibility_sectors.contains(&profile.industry_sector) {
        log.add(
            rules.high_visibility_sector,
            format!(
                "{} carries high public visibility on water use",
                profile.industry_sector.label()
            ),
        );
    }

    if profile.treatment_level == TreatmentLevel::None {
        log.add(
            rules.untreated,
            "no on-site treatment before discharge".to_string(),
        );
    }

    if profile.discharge_compliance_concerns {
        log.add(
            rules.compliance_concerns,
            "compliance concerns invite stakeholder scrutiny".to_string(),
        );
    }

    log.finish(Dimension::Reputational)
}

/// Takes the already-computed physical score: scarcity compounds into price
/// volatility once physical risk crosses the trigger.
pub(crate) fn financial(
    profile: &OperationalProfile,
    model: &ScoringModel,
    physical_score: u8,
) -> DimensionScore {
    let rules = &model.financial;
    let mut log = FactorLog::new();

    log.add(rules.base, "baseline financial exposure".to_string());

    if profile.disruption_history {
        log.add(
            rules.disruption_history,
            "past supply disruptions signal revenue exposure".to_string(),
        );
    }

    if rules.water_intensive_sectors.contains(&profile.industry_sector) {
        log.add(
            rules.water_intensive_sector,
            format!(
                "{} is a water-intensive sector",
                profile.industry_sector.label()
            ),
        );
    }

    if physical_score > rules.scarcity_trigger {
        log.add(
            rules.scarcity_compounding,
            format!(
                "physical risk {physical_score} compounds water price volatility"
            ),
        );
    }

    log.finish(Dimension::Financial)
}

pub(crate) fn water_quality(profile: &OperationalProfile, model: &ScoringModel) -> DimensionScore {
    let rules = &model.water_quality;
    let mut log = FactorLog::new();

    log.add(
        rules.intake_points(profile.intake_quality),
        format!(
            "intake water quality rated '{}'",
            profile.intake_quality.label()
        ),
    );

    let contaminants: BTreeSet<_> = profile.contaminants.iter().copied().collect();
    if !contaminants.is_empty() {
        let count = contaminants.len() as u8;
        let points = count
            .saturating_mul(rules.per_contaminant)
            .min(rules.contaminant_cap);
        log.add(points, format!("{count} contaminant(s) reported in intake"));

        if contaminants
            .iter()
            .any(|contaminant| rules.is_severe(*contaminant))
        {
            log.add(
                rules.severe_class,
                "severe contaminant class present (PFAS, heavy metals, or persistent organics)"
                    .to_string(),
            );
        }
    }

    let upstream: BTreeSet<_> = profile
        .upstream_sources
        .iter()
        .copied()
        .filter(|source| *source != UpstreamSource::NoneKnown)
        .collect();
    if !upstream.is_empty() {
        let count = upstream.len() as u8;
        let points = count
            .saturating_mul(rules.per_upstream_source)
            .min(rules.upstream_cap);
        log.add(
            points,
            format!("{count} upstream pollution source(s) reported"),
        );
    }

    let gap = rules.monitoring_gap(profile.testing_frequency);
    if gap > 0 {
        log.add(
            gap,
            format!(
                "monitoring gap: testing frequency '{}'",
                profile.testing_frequency.label()
            ),
        );
    }

    log.finish(Dimension::WaterQuality)
}
