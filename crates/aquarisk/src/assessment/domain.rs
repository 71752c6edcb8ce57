use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the five independent risk facets produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Physical,
    Regulatory,
    Reputational,
    Financial,
    WaterQuality,
}

impl Dimension {
    /// Display order for score breakdowns.
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Physical,
            Self::Regulatory,
            Self::Reputational,
            Self::Financial,
            Self::WaterQuality,
        ]
    }

    /// Order in which dimensions are evaluated when ranking recommendations;
    /// acts as the tie-break after priority.
    pub const fn evaluation_order() -> [Self; 5] {
        [
            Self::Physical,
            Self::Financial,
            Self::Regulatory,
            Self::Reputational,
            Self::WaterQuality,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Physical => "Physical",
            Self::Regulatory => "Regulatory",
            Self::Reputational => "Reputational",
            Self::Financial => "Financial",
            Self::WaterQuality => "Water Quality & Governance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndustrySector {
    Manufacturing,
    FoodAndBeverage,
    Pharmaceuticals,
    Semiconductors,
    Mining,
    Agriculture,
    Energy,
    DataCenters,
    Textiles,
    Chemicals,
    Other,
}

impl IndustrySector {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manufacturing => "Manufacturing",
            Self::FoodAndBeverage => "Food & Beverage",
            Self::Pharmaceuticals => "Pharmaceuticals",
            Self::Semiconductors => "Semiconductors",
            Self::Mining => "Mining",
            Self::Agriculture => "Agriculture",
            Self::Energy => "Energy",
            Self::DataCenters => "Data Centers",
            Self::Textiles => "Textiles",
            Self::Chemicals => "Chemicals",
            Self::Other => "Other",
        }
    }

    /// Lenient parse of human-readable sector names. Unknown values fold to
    /// `Other` so profile intake never rejects a sector string.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "manufacturing" => Self::Manufacturing,
            "food & beverage" | "food and beverage" => Self::FoodAndBeverage,
            "pharmaceuticals" | "pharma" => Self::Pharmaceuticals,
            "semiconductors" | "semiconductor" => Self::Semiconductors,
            "mining" => Self::Mining,
            "agriculture" => Self::Agriculture,
            "energy" => Self::Energy,
            "data centers" | "data center" => Self::DataCenters,
            "textiles" | "textile" => Self::Textiles,
            "chemicals" | "chemical" => Self::Chemicals,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterSource {
    MunicipalSupply,
    Groundwater,
    SurfaceWater,
    RecycledReclaimed,
    Desalinated,
    Rainwater,
}

impl WaterSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MunicipalSupply => "Municipal supply",
            Self::Groundwater => "Groundwater",
            Self::SurfaceWater => "Surface water",
            Self::RecycledReclaimed => "Recycled/reclaimed",
            Self::Desalinated => "Desalinated",
            Self::Rainwater => "Rainwater",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "municipal supply" | "municipal" => Some(Self::MunicipalSupply),
            "groundwater" => Some(Self::Groundwater),
            "surface water" => Some(Self::SurfaceWater),
            "recycled/reclaimed" | "recycled" | "reclaimed" => Some(Self::RecycledReclaimed),
            "desalinated" => Some(Self::Desalinated),
            "rainwater" => Some(Self::Rainwater),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentLevel {
    None,
    Basic,
    Advanced,
    ZeroLiquidDischarge,
}

impl TreatmentLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Basic => "Basic",
            Self::Advanced => "Advanced",
            Self::ZeroLiquidDischarge => "Zero Liquid Discharge",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "basic" => Some(Self::Basic),
            "advanced" => Some(Self::Advanced),
            "zero liquid discharge" | "zld" => Some(Self::ZeroLiquidDischarge),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
}

impl IntakeQuality {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(Self::Excellent),
            "good" => Some(Self::Good),
            "fair" => Some(Self::Fair),
            "poor" => Some(Self::Poor),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Closed contaminant vocabulary; the severe subset is defined by the
/// scoring model so model versions can reclassify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contaminant {
    Pfas,
    HeavyMetals,
    OrganicCompounds,
    Nitrates,
    DissolvedSalts,
    Microbial,
    Sediment,
}

impl Contaminant {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pfas => "PFAS / forever chemicals",
            Self::HeavyMetals => "Heavy metals (arsenic, lead, chromium)",
            Self::OrganicCompounds => "Organic compounds (pesticides, solvents)",
            Self::Nitrates => "Nitrates",
            Self::DissolvedSalts => "Dissolved salts / high TDS",
            Self::Microbial => "Microbial contamination",
            Self::Sediment => "Sediment / turbidity",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pfas" | "forever chemicals" => Some(Self::Pfas),
            "heavy metals" | "arsenic" | "lead" | "chromium" => Some(Self::HeavyMetals),
            "organic compounds" | "organics" | "pesticides" | "solvents" => {
                Some(Self::OrganicCompounds)
            }
            "nitrates" => Some(Self::Nitrates),
            "dissolved salts" | "high tds" | "tds" => Some(Self::DissolvedSalts),
            "microbial" => Some(Self::Microbial),
            "sediment" | "turbidity" => Some(Self::Sediment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DischargeMethod {
    MunicipalSewer,
    DirectToSurfaceWater,
    GroundApplication,
    OnSiteReuse,
}

impl DischargeMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MunicipalSewer => "Municipal sewer",
            Self::DirectToSurfaceWater => "Direct to surface water",
            Self::GroundApplication => "Ground application",
            Self::OnSiteReuse => "On-site reuse",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "municipal sewer" | "sewer" => Some(Self::MunicipalSewer),
            "direct to surface water" | "direct discharge" => Some(Self::DirectToSurfaceWater),
            "ground application" => Some(Self::GroundApplication),
            "on-site reuse" | "onsite reuse" | "reuse" => Some(Self::OnSiteReuse),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestingFrequency {
    Continuous,
    Daily,
    Weekly,
    Monthly,
    AnnualOrLess,
    NeverOrUnknown,
}

impl TestingFrequency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Continuous => "Continuous online monitoring",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::AnnualOrLess => "Annually or less",
            Self::NeverOrUnknown => "Never / don't know",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "continuous" => Some(Self::Continuous),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "annually" | "annual" | "annually or less" => Some(Self::AnnualOrLess),
            "never" | "unknown" => Some(Self::NeverOrUnknown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamSource {
    NoneKnown,
    IndustrialDischarge,
    AgriculturalRunoff,
    MunicipalWastewater,
    MiningActivity,
    LandfillLeachate,
}

impl UpstreamSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoneKnown => "None known",
            Self::IndustrialDischarge => "Industrial discharge",
            Self::AgriculturalRunoff => "Agricultural runoff",
            Self::MunicipalWastewater => "Municipal wastewater",
            Self::MiningActivity => "Mining activity",
            Self::LandfillLeachate => "Landfill leachate",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "none known" => Some(Self::NoneKnown),
            "industrial discharge" | "industrial" => Some(Self::IndustrialDischarge),
            "agricultural runoff" | "agricultural" => Some(Self::AgriculturalRunoff),
            "municipal wastewater" => Some(Self::MunicipalWastewater),
            "mining activity" | "mining" => Some(Self::MiningActivity),
            "landfill leachate" | "landfill" => Some(Self::LandfillLeachate),
            _ => None,
        }
    }
}

/// Marks whether a profile field was explicitly stated by the user or
/// inferred from a benchmark/default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Stated,
    Inferred,
}

impl Provenance {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stated => "stated",
            Self::Inferred => "inferred",
        }
    }
}

/// Field identifiers used for provenance tagging and validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    IndustrySector,
    Country,
    Region,
    FacilityCount,
    WaterSources,
    AnnualWaterVolume,
    TreatmentLevel,
    IntakeQuality,
    Contaminants,
    DischargeMethod,
    DischargeComplianceConcerns,
    UpstreamSources,
    TestingFrequency,
    DisruptionHistory,
}

impl ProfileField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::IndustrySector => "industry sector",
            Self::Country => "country",
            Self::Region => "region",
            Self::FacilityCount => "facility count",
            Self::WaterSources => "water sources",
            Self::AnnualWaterVolume => "annual water volume",
            Self::TreatmentLevel => "treatment level",
            Self::IntakeQuality => "intake water quality",
            Self::Contaminants => "primary contaminants",
            Self::DischargeMethod => "discharge method",
            Self::DischargeComplianceConcerns => "discharge compliance concerns",
            Self::UpstreamSources => "upstream pollution sources",
            Self::TestingFrequency => "testing frequency",
            Self::DisruptionHistory => "supply disruption history",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Partially-populated operational profile, as produced by a structured form
/// submission or the free-text extraction collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(default)]
    pub industry_sector: Option<IndustrySector>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub facility_count: Option<u32>,
    #[serde(default)]
    pub water_sources: Option<Vec<WaterSource>>,
    #[serde(default)]
    pub annual_water_volume_m3: Option<f64>,
    #[serde(default)]
    pub treatment_level: Option<TreatmentLevel>,
    #[serde(default)]
    pub intake_quality: Option<IntakeQuality>,
    #[serde(default)]
    pub contaminants: Option<Vec<Contaminant>>,
    #[serde(default)]
    pub discharge_method: Option<DischargeMethod>,
    #[serde(default)]
    pub discharge_compliance_concerns: Option<bool>,
    #[serde(default)]
    pub upstream_sources: Option<Vec<UpstreamSource>>,
    #[serde(default)]
    pub testing_frequency: Option<TestingFrequency>,
    #[serde(default)]
    pub disruption_history: Option<bool>,
}

impl ProfileDraft {
    /// Reject drafts missing the fields no benchmark can substitute.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.industry_sector.is_none() {
            return Err(ValidationError::MissingField(ProfileField::IndustrySector));
        }
        match &self.country {
            Some(country) if !country.trim().is_empty() => Ok(()),
            _ => Err(ValidationError::MissingField(ProfileField::Country)),
        }
    }
}

/// Validation failure for an explicit structured submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required field '{0}' is missing")]
    MissingField(ProfileField),
}

/// Fully-populated operational profile. Built only by the normalizer so the
/// closed-vocabulary and provenance invariants hold by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalProfile {
    pub industry_sector: IndustrySector,
    pub country: String,
    pub region: Option<String>,
    pub facility_count: u32,
    pub water_sources: Vec<WaterSource>,
    pub annual_water_volume_m3: f64,
    pub treatment_level: TreatmentLevel,
    pub intake_quality: IntakeQuality,
    pub contaminants: Vec<Contaminant>,
    pub discharge_method: DischargeMethod,
    pub discharge_compliance_concerns: bool,
    pub upstream_sources: Vec<UpstreamSource>,
    pub testing_frequency: TestingFrequency,
    pub disruption_history: bool,
    pub provenance: BTreeMap<ProfileField, Provenance>,
}

impl OperationalProfile {
    pub fn provenance_of(&self, field: ProfileField) -> Provenance {
        self.provenance
            .get(&field)
            .copied()
            .unwrap_or(Provenance::Inferred)
    }

    pub fn is_inferred(&self, field: ProfileField) -> bool {
        self.provenance_of(field) == Provenance::Inferred
    }
}

/// Single-field correction applied during review. Tagged variants keep the
/// edit surface closed over the profile vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldEdit {
    IndustrySector(IndustrySector),
    Country(String),
    Region(String),
    FacilityCount(u32),
    WaterSources(Vec<WaterSource>),
    AnnualWaterVolume(f64),
    TreatmentLevel(TreatmentLevel),
    IntakeQuality(IntakeQuality),
    Contaminants(Vec<Contaminant>),
    DischargeMethod(DischargeMethod),
    DischargeComplianceConcerns(bool),
    UpstreamSources(Vec<UpstreamSource>),
    TestingFrequency(TestingFrequency),
    DisruptionHistory(bool),
}

impl FieldEdit {
    pub const fn field(&self) -> ProfileField {
        match self {
            Self::IndustrySector(_) => ProfileField::IndustrySector,
            Self::Country(_) => ProfileField::Country,
            Self::Region(_) => ProfileField::Region,
            Self::FacilityCount(_) => ProfileField::FacilityCount,
            Self::WaterSources(_) => ProfileField::WaterSources,
            Self::AnnualWaterVolume(_) => ProfileField::AnnualWaterVolume,
            Self::TreatmentLevel(_) => ProfileField::TreatmentLevel,
            Self::IntakeQuality(_) => ProfileField::IntakeQuality,
            Self::Contaminants(_) => ProfileField::Contaminants,
            Self::DischargeMethod(_) => ProfileField::DischargeMethod,
            Self::DischargeComplianceConcerns(_) => ProfileField::DischargeComplianceConcerns,
            Self::UpstreamSources(_) => ProfileField::UpstreamSources,
            Self::TestingFrequency(_) => ProfileField::TestingFrequency,
            Self::DisruptionHistory(_) => ProfileField::DisruptionHistory,
        }
    }

    pub(crate) fn apply(self, draft: &mut ProfileDraft) {
        match self {
            Self::IndustrySector(value) => draft.industry_sector = Some(value),
            Self::Country(value) => draft.country = Some(value),
            Self::Region(value) => draft.region = Some(value),
            Self::FacilityCount(value) => draft.facility_count = Some(value),
            Self::WaterSources(value) => draft.water_sources = Some(value),
            Self::AnnualWaterVolume(value) => draft.annual_water_volume_m3 = Some(value),
            Self::TreatmentLevel(value) => draft.treatment_level = Some(value),
            Self::IntakeQuality(value) => draft.intake_quality = Some(value),
            Self::Contaminants(value) => draft.contaminants = Some(value),
            Self::DischargeMethod(value) => draft.discharge_method = Some(value),
            Self::DischargeComplianceConcerns(value) => {
                draft.discharge_compliance_concerns = Some(value)
            }
            Self::UpstreamSources(value) => draft.upstream_sources = Some(value),
            Self::TestingFrequency(value) => draft.testing_frequency = Some(value),
            Self::DisruptionHistory(value) => draft.disruption_history = Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_parse_is_lenient_and_falls_back_to_other() {
        assert_eq!(
            IndustrySector::parse("Food and Beverage"),
            IndustrySector::FoodAndBeverage
        );
        assert_eq!(
            IndustrySector::parse("  semiconductors "),
            IndustrySector::Semiconductors
        );
        assert_eq!(IndustrySector::parse("bottled unicorns"), IndustrySector::Other);
    }

    #[test]
    fn quality_vocabulary_parses_common_spellings() {
        assert_eq!(Contaminant::parse("PFAS"), Some(Contaminant::Pfas));
        assert_eq!(Contaminant::parse(" high TDS "), Some(Contaminant::DissolvedSalts));
        assert_eq!(Contaminant::parse("glitter"), None);

        assert_eq!(
            DischargeMethod::parse("sewer"),
            Some(DischargeMethod::MunicipalSewer)
        );
        assert_eq!(
            TestingFrequency::parse("never"),
            Some(TestingFrequency::NeverOrUnknown)
        );
        assert_eq!(
            UpstreamSource::parse("agricultural"),
            Some(UpstreamSource::AgriculturalRunoff)
        );
        assert_eq!(UpstreamSource::parse("volcanoes"), None);
    }

    #[test]
    fn draft_validation_requires_sector_and_country() {
        let mut draft = ProfileDraft::default();
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField(ProfileField::IndustrySector))
        );

        draft.industry_sector = Some(IndustrySector::Mining);
        draft.country = Some("   ".to_string());
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField(ProfileField::Country))
        );

        draft.country = Some("Chile".to_string());
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn field_edit_reports_its_field_and_applies() {
        let edit = FieldEdit::TreatmentLevel(TreatmentLevel::Advanced);
        assert_eq!(edit.field(), ProfileField::TreatmentLevel);

        let mut draft = ProfileDraft::default();
        edit.apply(&mut draft);
        assert_eq!(draft.treatment_level, Some(TreatmentLevel::Advanced));
    }

    #[test]
    fn field_edit_deserializes_from_tagged_json() {
        let edit: FieldEdit = serde_json::from_str(
            r#"{ "field": "disruption_history", "value": true }"#,
        )
        .expect("edit parses");
        assert_eq!(edit, FieldEdit::DisruptionHistory(true));
    }
}
