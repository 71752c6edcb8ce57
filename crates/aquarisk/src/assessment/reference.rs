//! Static lookup tables: industry benchmarks, the water-stress geography
//! table, and the example-project gallery attached to recommendations.
//! Loaded once via `ReferenceData::standard()` and treated as read-only.

use serde::{Deserialize, Serialize};

use super::domain::{
    Dimension, DischargeMethod, IndustrySector, IntakeQuality, TreatmentLevel, WaterSource,
};

/// Industry-typical values used to fill gaps in an incomplete profile.
#[derive(Debug, Clone)]
pub struct IndustryBenchmark {
    pub sector: IndustrySector,
    /// Typical annual water use per facility, m³.
    pub water_use_m3_per_facility: f64,
    pub typical_sources: &'static [WaterSource],
    pub typical_treatment: TreatmentLevel,
    pub typical_intake_quality: IntakeQuality,
    pub typical_discharge: DischargeMethod,
    pub key_risks: &'static [Dimension],
    pub description: &'static str,
}

/// Specificity level at which a physical-risk baseline was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupTier {
    RegionMatch,
    CountryMatch,
    DefaultEstimation,
}

impl LookupTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RegionMatch => "region match",
            Self::CountryMatch => "country match",
            Self::DefaultEstimation => "default estimation",
        }
    }
}

/// Technology tag used to match a recommendation to a comparable project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnologyTag {
    ReuseRecycling,
    MembraneTreatment,
    PfasTreatment,
    Monitoring,
    RainwaterHarvesting,
}

/// Comparable real-world project surfaced alongside a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleProject {
    pub name: String,
    pub technology: TechnologyTag,
    pub summary: String,
}

pub struct ReferenceData {
    benchmarks: Vec<IndustryBenchmark>,
    country_stress: Vec<(&'static str, u8)>,
    region_stress: Vec<(&'static str, &'static str, u8)>,
    example_projects: Vec<ExampleProject>,
}

impl ReferenceData {
    pub fn standard() -> Self {
        Self {
            benchmarks: standard_benchmarks(),
            country_stress: vec![
                ("Saudi Arabia", 86),
                ("United Arab Emirates", 84),
                ("India", 75),
                ("Taiwan", 72),
                ("Chile", 70),
                ("South Africa", 68),
                ("Mexico", 66),
                ("Australia", 64),
                ("Spain", 58),
                ("Singapore", 52),
                ("United States", 42),
                ("Germany", 34),
                ("Ireland", 28),
                ("Netherlands", 25),
            ],
            region_stress: vec![
                ("United States", "Arizona", 82),
                ("United States", "California", 74),
                ("United States", "Texas", 66),
                ("Taiwan", "Hsinchu", 78),
                ("India", "Tamil Nadu", 80),
                ("Chile", "Antofagasta", 85),
                ("Australia", "Queensland", 60),
                ("Spain", "Catalonia", 66),
            ],
            example_projects: vec![
                ExampleProject {
                    name: "High-plains beverage bottler closed-loop reuse".to_string(),
                    technology: TechnologyTag::ReuseRecycling,
                    summary: "Cut municipal intake 38% by recycling rinse and CIP water back into utility loops.".to_string(),
                },
                ExampleProject {
                    name: "Gulf-coast chemical park UF/RO intake upgrade".to_string(),
                    technology: TechnologyTag::MembraneTreatment,
                    summary: "Ultrafiltration plus reverse osmosis stabilized feedwater quality across seasonal turbidity swings.".to_string(),
                },
                ExampleProject {
                    name: "Upper-midwest plating facility PFAS capture retrofit".to_string(),
                    technology: TechnologyTag::PfasTreatment,
                    summary: "Granular activated carbon and ion-exchange train brought effluent under tightening PFAS limits.".to_string(),
                },
                ExampleProject {
                    name: "Delta agrifood processor online sensor network".to_string(),
                    technology: TechnologyTag::Monitoring,
                    summary: "Continuous conductivity and turbidity sensors caught intake excursions hours before batch impact.".to_string(),
                },
                ExampleProject {
                    name: "Monsoon-belt textile campus rooftop capture".to_string(),
                    technology: TechnologyTag::RainwaterHarvesting,
                    summary: "Rooftop harvesting and buffer storage now cover a fifth of dye-house demand in the wet season.".to_string(),
                },
            ],
        }
    }

    /// Benchmark for a sector; unknown sectors use the generic `Other` row.
    pub fn benchmark(&self, sector: IndustrySector) -> &IndustryBenchmark {
        self.benchmarks
            .iter()
            .find(|benchmark| benchmark.sector == sector)
            .unwrap_or_else(|| {
                self.benchmarks
                    .iter()
                    .find(|benchmark| benchmark.sector == IndustrySector::Other)
                    .expect("reference data always carries an Other benchmark")
            })
    }

    /// Tiered water-stress lookup: region override first, then the country
    /// baseline. Returns `None` when neither tier matches; the scorer falls
    /// back to the model's default baseline.
    pub fn water_stress(&self, country: &str, region: Option<&str>) -> Option<(u8, LookupTier)> {
        if let Some(region) = region {
            let hit = self.region_stress.iter().find(|(entry_country, entry_region, _)| {
                entry_country.eq_ignore_ascii_case(country.trim())
                    && entry_region.eq_ignore_ascii_case(region.trim())
            });
            if let Some((_, _, score)) = hit {
                return Some((*score, LookupTier::RegionMatch));
            }
        }

        self.country_stress
            .iter()
            .find(|(entry, _)| entry.eq_ignore_ascii_case(country.trim()))
            .map(|(_, score)| (*score, LookupTier::CountryMatch))
    }

    pub fn example_for(&self, technology: TechnologyTag) -> Option<&ExampleProject> {
        self.example_projects
            .iter()
            .find(|project| project.technology == technology)
    }
}

fn standard_benchmarks() -> Vec<IndustryBenchmark> {
    use Dimension::*;
    use IndustrySector::*;

    vec![
        IndustryBenchmark {
            sector: Semiconductors,
            water_use_m3_per_facility: 5_500_000.0,
            typical_sources: &[WaterSource::MunicipalSupply],
            typical_treatment: TreatmentLevel::Advanced,
            typical_intake_quality: IntakeQuality::Good,
            typical_discharge: DischargeMethod::MunicipalSewer,
            key_risks: &[Physical, Financial, Regulatory],
            description: "Semiconductor fabs require ultrapure water for wafer cleaning",
        },
        IndustryBenchmark {
            sector: DataCenters,
            water_use_m3_per_facility: 1_500_000.0,
            typical_sources: &[WaterSource::MunicipalSupply],
            typical_treatment: TreatmentLevel::Basic,
            typical_intake_quality: IntakeQuality::Good,
            typical_discharge: DischargeMethod::MunicipalSewer,
            key_risks: &[Physical, Reputational, Financial],
            description: "Data centers use water for evaporative cooling",
        },
        IndustryBenchmark {
            sector: FoodAndBeverage,
            water_use_m3_per_facility: 800_000.0,
            typical_sources: &[WaterSource::MunicipalSupply],
            typical_treatment: TreatmentLevel::Advanced,
            typical_intake_quality: IntakeQuality::Good,
            typical_discharge: DischargeMethod::MunicipalSewer,
            key_risks: &[Physical, Regulatory, Reputational],
            description: "Food & beverage uses water as ingredient and for cleaning",
        },
        IndustryBenchmark {
            sector: Pharmaceuticals,
            water_use_m3_per_facility: 500_000.0,
            typical_sources: &[WaterSource::MunicipalSupply],
            typical_treatment: TreatmentLevel::Advanced,
            typical_intake_quality: IntakeQuality::Excellent,
            typical_discharge: DischargeMethod::MunicipalSewer,
            key_risks: &[Regulatory, WaterQuality, Financial],
            description: "Pharma production depends on highly purified water",
        },
        IndustryBenchmark {
            sector: Chemicals,
            water_use_m3_per_facility: 2_000_000.0,
            typical_sources: &[WaterSource::MunicipalSupply, WaterSource::SurfaceWater],
            typical_treatment: TreatmentLevel::Basic,
            typical_intake_quality: IntakeQuality::Fair,
            typical_discharge: DischargeMethod::DirectToSurfaceWater,
            key_risks: &[Regulatory, Reputational, Physical],
            description: "Chemical manufacturing uses water for processing and cooling",
        },
        IndustryBenchmark {
            sector: Mining,
            water_use_m3_per_facility: 4_000_000.0,
            typical_sources: &[WaterSource::SurfaceWater, WaterSource::Groundwater],
            typical_treatment: TreatmentLevel::Basic,
            typical_intake_quality: IntakeQuality::Poor,
            typical_discharge: DischargeMethod::DirectToSurfaceWater,
            key_risks: &[Physical, Reputational, Regulatory],
            description: "Mining operations need water for processing and dust control",
        },
        IndustryBenchmark {
            sector: Textiles,
            water_use_m3_per_facility: 1_000_000.0,
            typical_sources: &[WaterSource::MunicipalSupply, WaterSource::Groundwater],
            typical_treatment: TreatmentLevel::Basic,
            typical_intake_quality: IntakeQuality::Fair,
            typical_discharge: DischargeMethod::MunicipalSewer,
            key_risks: &[Regulatory, Reputational, Physical],
            description: "Textile dyeing and finishing are water-intensive",
        },
        IndustryBenchmark {
            sector: Manufacturing,
            water_use_m3_per_facility: 500_000.0,
            typical_sources: &[WaterSource::MunicipalSupply],
            typical_treatment: TreatmentLevel::Basic,
            typical_intake_quality: IntakeQuality::Fair,
            typical_discharge: DischargeMethod::MunicipalSewer,
            key_risks: &[Physical, Financial, Regulatory],
            description: "General manufacturing uses water for cooling and processing",
        },
        IndustryBenchmark {
            sector: Agriculture,
            water_use_m3_per_facility: 2_000_000.0,
            typical_sources: &[WaterSource::SurfaceWater, WaterSource::Groundwater],
            typical_treatment: TreatmentLevel::None,
            typical_intake_quality: IntakeQuality::Fair,
            typical_discharge: DischargeMethod::GroundApplication,
            key_risks: &[Physical, Financial, Regulatory],
            description: "Agriculture draws water for irrigation and livestock",
        },
        IndustryBenchmark {
            sector: Energy,
            water_use_m3_per_facility: 3_000_000.0,
            typical_sources: &[WaterSource::SurfaceWater, WaterSource::MunicipalSupply],
            typical_treatment: TreatmentLevel::Basic,
            typical_intake_quality: IntakeQuality::Fair,
            typical_discharge: DischargeMethod::DirectToSurfaceWater,
            key_risks: &[Physical, Regulatory, Financial],
            description: "Power plants use water for cooling and steam generation",
        },
        IndustryBenchmark {
            sector: Other,
            water_use_m3_per_facility: 500_000.0,
            typical_sources: &[WaterSource::MunicipalSupply],
            typical_treatment: TreatmentLevel::Basic,
            typical_intake_quality: IntakeQuality::Fair,
            typical_discharge: DischargeMethod::MunicipalSewer,
            key_risks: &[Physical, Financial, Regulatory],
            description: "Water usage varies by operation type",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sector_falls_back_to_other_benchmark() {
        let reference = ReferenceData::standard();
        let benchmark = reference.benchmark(IndustrySector::Other);
        assert_eq!(benchmark.sector, IndustrySector::Other);
        assert_eq!(benchmark.water_use_m3_per_facility, 500_000.0);
    }

    #[test]
    fn region_override_takes_precedence_over_country_baseline() {
        let reference = ReferenceData::standard();

        let (score, tier) = reference
            .water_stress("United States", Some("Arizona"))
            .expect("region entry exists");
        assert_eq!(tier, LookupTier::RegionMatch);
        assert_eq!(score, 82);

        let (score, tier) = reference
            .water_stress("United States", Some("Vermont"))
            .expect("country entry exists");
        assert_eq!(tier, LookupTier::CountryMatch);
        assert_eq!(score, 42);

        assert!(reference.water_stress("Atlantis", None).is_none());
    }

    #[test]
    fn stress_lookup_ignores_case_and_padding() {
        let reference = ReferenceData::standard();
        let (score, tier) = reference
            .water_stress(" taiwan ", Some("hsinchu"))
            .expect("entry exists");
        assert_eq!((score, tier), (78, LookupTier::RegionMatch));
    }

    #[test]
    fn gallery_resolves_each_technology_tag() {
        let reference = ReferenceData::standard();
        for tag in [
            TechnologyTag::ReuseRecycling,
            TechnologyTag::MembraneTreatment,
            TechnologyTag::PfasTreatment,
            TechnologyTag::Monitoring,
            TechnologyTag::RainwaterHarvesting,
        ] {
            assert!(reference.example_for(tag).is_some(), "missing {tag:?}");
        }
    }
}
