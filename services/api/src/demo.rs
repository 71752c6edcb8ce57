use crate::infra::{
    parse_contaminant, parse_intake_quality, parse_sector, parse_treatment, parse_water_source,
    InMemorySessionStore,
};
use aquarisk::assessment::{
    AssessmentService, AssessmentSession, Contaminant, Dimension, IndustrySector, IntakeQuality,
    KeywordExtractor, OperationalProfile, ProfileDraft, ProfileField, ScoringModel, TreatmentLevel,
    WaterSource,
};
use aquarisk::config::ConfigError;
use aquarisk::error::AppError;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    /// Free-text facility description to assess
    #[arg(long, conflicts_with_all = ["sector", "country"])]
    pub(crate) description: Option<String>,
    /// Industry sector (unknown values fall back to the generic benchmark)
    #[arg(long, value_parser = parse_sector, requires = "country")]
    pub(crate) sector: Option<IndustrySector>,
    /// Country of operation
    #[arg(long)]
    pub(crate) country: Option<String>,
    /// Sub-national region, if known
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Number of facilities
    #[arg(long)]
    pub(crate) facilities: Option<u32>,
    /// Water sources in use (repeatable)
    #[arg(long = "source", value_parser = parse_water_source)]
    pub(crate) sources: Vec<WaterSource>,
    /// Wastewater treatment level (none, basic, advanced, zld)
    #[arg(long, value_parser = parse_treatment)]
    pub(crate) treatment: Option<TreatmentLevel>,
    /// Intake water quality (excellent, good, fair, poor, unknown)
    #[arg(long, value_parser = parse_intake_quality)]
    pub(crate) intake_quality: Option<IntakeQuality>,
    /// Known contaminants in the intake water (repeatable)
    #[arg(long = "contaminant", value_parser = parse_contaminant)]
    pub(crate) contaminants: Vec<Contaminant>,
    /// The operation has experienced supply disruptions
    #[arg(long)]
    pub(crate) disruptions: bool,
    /// Scoring model version to apply
    #[arg(long, default_value = "baseline-v1")]
    pub(crate) model: String,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let model = ScoringModel::named(&args.model).ok_or(ConfigError::UnknownScoringModel {
        value: args.model.clone(),
    })?;
    let model_name = model.name();

    let service = AssessmentService::new(
        Arc::new(KeywordExtractor),
        Arc::new(InMemorySessionStore::default()),
        model,
    );
    let mut session = service.open_session();

    let submission = if let Some(description) = args.description {
        service.submit_text(&mut session, &description)
    } else {
        let draft = ProfileDraft {
            industry_sector: args.sector,
            country: args.country,
            region: args.region,
            facility_count: args.facilities,
            water_sources: (!args.sources.is_empty()).then_some(args.sources),
            treatment_level: args.treatment,
            intake_quality: args.intake_quality,
            contaminants: (!args.contaminants.is_empty()).then_some(args.contaminants),
            disruption_history: args.disruptions.then_some(true),
            ..ProfileDraft::default()
        };
        service.submit_form(&mut session, draft)
    };

    if let Err(err) = submission {
        println!("Assessment rejected: {err}");
        return Ok(());
    }

    println!("Water risk assessment (model {model_name})");
    if let Some(profile) = session.profile() {
        render_profile(profile, &session);
    }
    render_scores(&session);
    render_recommendations(&session);

    let record = service.save(&mut session)?;
    println!("\nSaved assessment {}", record.session_id.0);
    Ok(())
}

fn provenance_note(profile: &OperationalProfile, field: ProfileField) -> &'static str {
    if profile.is_inferred(field) {
        " (assumed)"
    } else {
        ""
    }
}

fn render_profile(profile: &OperationalProfile, _session: &AssessmentSession) {
    println!("\nOperational profile");
    println!(
        "- Sector: {}{}",
        profile.industry_sector.label(),
        provenance_note(profile, ProfileField::IndustrySector)
    );
    let location = match &profile.region {
        Some(region) => format!("{}, {}", region, profile.country),
        None => profile.country.clone(),
    };
    println!(
        "- Location: {}{}",
        location,
        provenance_note(profile, ProfileField::Country)
    );
    println!(
        "- Facilities: {}{}",
        profile.facility_count,
        provenance_note(profile, ProfileField::FacilityCount)
    );
    println!(
        "- Annual water volume: {:.0} m3{}",
        profile.annual_water_volume_m3,
        provenance_note(profile, ProfileField::AnnualWaterVolume)
    );
    let sources: Vec<&str> = profile
        .water_sources
        .iter()
        .map(|source| source.label())
        .collect();
    println!(
        "- Water sources: {}{}",
        sources.join(", "),
        provenance_note(profile, ProfileField::WaterSources)
    );
    println!(
        "- Treatment: {}{}",
        profile.treatment_level.label(),
        provenance_note(profile, ProfileField::TreatmentLevel)
    );
    println!(
        "- Intake quality: {}{}",
        profile.intake_quality.label(),
        provenance_note(profile, ProfileField::IntakeQuality)
    );
    println!(
        "- Testing: {}{}",
        profile.testing_frequency.label(),
        provenance_note(profile, ProfileField::TestingFrequency)
    );
    println!(
        "- Past disruptions: {}{}",
        if profile.disruption_history { "yes" } else { "no" },
        provenance_note(profile, ProfileField::DisruptionHistory)
    );
}

fn render_scores(session: &AssessmentSession) {
    let Some(risk) = session.risk() else {
        return;
    };

    println!("\nRisk scores (water stress: {})", risk.physical_lookup.label());
    for dimension in Dimension::ordered() {
        let score = risk.dimension(dimension);
        println!("- {}: {}", dimension.label(), score.score);
        for factor in &score.factors {
            println!("    {factor}");
        }
    }
    println!("Overall: {}", risk.overall);
}

fn render_recommendations(session: &AssessmentSession) {
    let recommendations = session.recommendations();
    if recommendations.is_empty() {
        println!("\nRecommendations: none");
        return;
    }

    println!("\nRecommendations");
    for recommendation in recommendations {
        println!(
            "- [{}] {}: {}",
            recommendation.priority.label(),
            recommendation.title,
            recommendation.description
        );
        println!("    Expected impact: {}", recommendation.expected_impact);
        if let Some(example) = &recommendation.example {
            println!("    Comparable project: {} ({})", example.name, example.summary);
        }
    }
}
