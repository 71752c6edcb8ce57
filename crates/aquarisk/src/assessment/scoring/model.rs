//! Versioned scoring-model configuration. A `ScoringModel` is an immutable
//! bundle of weights, thresholds, baselines, and sector classifications;
//! swapping rule-sets means substituting the whole value, never patching a
//! single constant, so every score stays reproducible against a named model.

use super::super::domain::{Contaminant, Dimension, IndustrySector, IntakeQuality, TestingFrequency};

/// Fixed weight set combining the five dimension scores into `overall`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionWeights {
    pub physical: f64,
    pub regulatory: f64,
    pub reputational: f64,
    pub financial: f64,
    pub water_quality: f64,
}

impl DimensionWeights {
    pub fn sum(&self) -> f64 {
        self.physical + self.regulatory + self.reputational + self.financial + self.water_quality
    }

    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-9
    }
}

/// Per-dimension score thresholds above which recommendations trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerThresholds {
    pub physical: u8,
    pub regulatory: u8,
    pub reputational: u8,
    pub financial: u8,
    pub water_quality: u8,
}

impl TriggerThresholds {
    pub const fn for_dimension(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Physical => self.physical,
            Dimension::Regulatory => self.regulatory,
            Dimension::Reputational => self.reputational,
            Dimension::Financial => self.financial,
            Dimension::WaterQuality => self.water_quality,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalRules {
    /// Baseline used when neither a region nor a country stress entry exists.
    pub default_baseline: u8,
    pub disruption_history: u8,
    pub sole_groundwater: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegulatoryRules {
    pub base: u8,
    pub high_regulation_sectors: Vec<IndustrySector>,
    pub high_regulation_sector: u8,
    pub weak_treatment: u8,
    pub compliance_concerns: u8,
    pub surface_discharge: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReputationalRules {
    pub base: u8,
    pub high_visibility_sectors: Vec<IndustrySector>,
    pub high_visibility_sector: u8,
    pub untreated: u8,
    pub compliance_concerns: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialRules {
    pub base: u8,
    pub disruption_history: u8,
    pub water_intensive_sectors: Vec<IndustrySector>,
    pub water_intensive_sector: u8,
    /// Compounding adder applied when the physical score already exceeds the
    /// trigger: scarce water correlates with price volatility.
    pub scarcity_compounding: u8,
    pub scarcity_trigger: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaterQualityRules {
    pub intake_excellent: u8,
    pub intake_good: u8,
    pub intake_fair: u8,
    pub intake_poor: u8,
    pub intake_unknown: u8,
    pub per_contaminant: u8,
    pub contaminant_cap: u8,
    pub severe_contaminants: Vec<Contaminant>,
    pub severe_class: u8,
    pub per_upstream_source: u8,
    pub upstream_cap: u8,
    pub monitoring_continuous: u8,
    pub monitoring_daily: u8,
    pub monitoring_weekly: u8,
    pub monitoring_monthly: u8,
    pub monitoring_annual: u8,
    pub monitoring_never: u8,
}

impl WaterQualityRules {
    pub const fn intake_points(&self, quality: IntakeQuality) -> u8 {
        match quality {
            IntakeQuality::Excellent => self.intake_excellent,
            IntakeQuality::Good => self.intake_good,
            IntakeQuality::Fair => self.intake_fair,
            IntakeQuality::Poor => self.intake_poor,
            IntakeQuality::Unknown => self.intake_unknown,
        }
    }

    pub const fn monitoring_gap(&self, frequency: TestingFrequency) -> u8 {
        match frequency {
            TestingFrequency::Continuous => self.monitoring_continuous,
            TestingFrequency::Daily => self.monitoring_daily,
            TestingFrequency::Weekly => self.monitoring_weekly,
            TestingFrequency::Monthly => self.monitoring_monthly,
            TestingFrequency::AnnualOrLess => self.monitoring_annual,
            TestingFrequency::NeverOrUnknown => self.monitoring_never,
        }
    }

    pub fn is_severe(&self, contaminant: Contaminant) -> bool {
        self.severe_contaminants.contains(&contaminant)
    }
}

/// A complete, named rule-set for the risk engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringModel {
    name: &'static str,
    pub weights: DimensionWeights,
    pub thresholds: TriggerThresholds,
    pub physical: PhysicalRules,
    pub regulatory: RegulatoryRules,
    pub reputational: ReputationalRules,
    pub financial: FinancialRules,
    pub water_quality: WaterQualityRules,
}

impl ScoringModel {
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Resolve a model by its configured name.
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "baseline-v1" | "baseline" => Some(Self::baseline()),
            "conservative-v2" | "conservative" => Some(Self::conservative()),
            _ => None,
        }
    }

    /// The production rule-set.
    pub fn baseline() -> Self {
        Self {
            name: "baseline-v1",
            weights: DimensionWeights {
                physical: 0.25,
                regulatory: 0.20,
                reputational: 0.15,
                financial: 0.20,
                water_quality: 0.20,
            },
            thresholds: TriggerThresholds {
                physical: 60,
                regulatory: 60,
                reputational: 50,
                financial: 60,
                water_quality: 50,
            },
            physical: PhysicalRules {
                default_baseline: 35,
                disruption_history: 10,
                sole_groundwater: 5,
            },
            regulatory: RegulatoryRules {
                base: 30,
                high_regulation_sectors: vec![
                    IndustrySector::Semiconductors,
                    IndustrySector::Pharmaceuticals,
                    IndustrySector::Mining,
                    IndustrySector::FoodAndBeverage,
                ],
                high_regulation_sector: 25,
                weak_treatment: 20,
                compliance_concerns: 15,
                surface_discharge: 10,
            },
            reputational: ReputationalRules {
                base: 30,
                high_visibility_sectors: vec![
                    IndustrySector::FoodAndBeverage,
                    IndustrySector::Textiles,
                    IndustrySector::Mining,
                    IndustrySector::Agriculture,
                ],
                high_visibility_sector: 25,
                untreated: 15,
                compliance_concerns: 20,
            },
            financial: FinancialRules {
                base: 30,
                disruption_history: 25,
                water_intensive_sectors: vec![
                    IndustrySector::Semiconductors,
                    IndustrySector::DataCenters,
                    IndustrySector::Pharmaceuticals,
                    IndustrySector::FoodAndBeverage,
                ],
                water_intensive_sector: 20,
                scarcity_compounding: 15,
                scarcity_trigger: 60,
            },
            water_quality: WaterQualityRules {
                intake_excellent: 5,
                intake_good: 15,
                intake_fair: 30,
                intake_poor: 50,
                intake_unknown: 35,
                per_contaminant: 3,
                contaminant_cap: 15,
                severe_contaminants: vec![
                    Contaminant::Pfas,
                    Contaminant::HeavyMetals,
                    Contaminant::OrganicCompounds,
                ],
                severe_class: 10,
                per_upstream_source: 5,
                upstream_cap: 15,
                monitoring_continuous: 0,
                monitoring_daily: 2,
                monitoring_weekly: 5,
                monitoring_monthly: 10,
                monitoring_annual: 13,
                monitoring_never: 15,
            },
        }
    }

    /// Stricter variant weighting scarcity heavier and triggering earlier.
    /// Kept for A/B comparisons against `baseline-v1`.
    pub fn conservative() -> Self {
        let mut model = Self::baseline();
        model.name = "conservative-v2";
        model.weights = DimensionWeights {
            physical: 0.30,
            regulatory: 0.20,
            reputational: 0.10,
            financial: 0.20,
            water_quality: 0.20,
        };
        model.thresholds = TriggerThresholds {
            physical: 55,
            regulatory: 55,
            reputational: 45,
            financial: 55,
            water_quality: 45,
        };
        model
    }
}
