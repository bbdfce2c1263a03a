use crate::infra::{parse_assignment, FieldAssignment};
use clap::Args;
use loan_advisor::config::{AppConfig, ScoringConfig};
use loan_advisor::dashboard::{
    ensure_unique_values, field_label, option_tree, ApplicantProfile, DashboardView, FieldKind, HttpScoringClient,
    PredictionController, PredictionOutcome, ResultPresentation, ADVISORY_NOTICE, FORM_ORDER,
};
use loan_advisor::error::AppError;
use loan_advisor::telemetry;
use serde_json::json;
use std::sync::Arc;

/// Characters on each side of the zero axis in the text chart.
const HALF_BAR_WIDTH: usize = 20;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Override one profile field, e.g. --set person_income=82000 (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub(crate) set: Vec<FieldAssignment>,
    /// Override the scoring service base URL
    #[arg(long)]
    pub(crate) scoring_url: Option<String>,
    /// Print the profile and outcome as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        set,
        scoring_url,
        json,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(url) = scoring_url {
        config.scoring = ScoringConfig::from_base(&url)?;
    }
    telemetry::init(&config.telemetry)?;

    let profile = ApplicantProfile::default().apply_all(
        set.iter()
            .map(|assignment| (assignment.field.as_str(), assignment.value.as_str())),
    )?;

    let client = HttpScoringClient::new(&config.scoring);
    if !json {
        println!("Submitting applicant profile to {}", client.endpoint());
    }
    let controller = PredictionController::new(Arc::new(client));
    let outcome = controller.submit(&profile).await;

    if json {
        let payload = json!({
            "profile": profile,
            "outcome": outcome,
            "view": DashboardView::of(&controller.snapshot()),
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(text) => println!("{text}"),
            Err(err) => println!("Evaluation payload unavailable: {err}"),
        }
    } else {
        print!("{}", render_evaluation(&profile, &outcome));
        if let Some(settled_at) = controller.snapshot().settled_at {
            println!("Evaluated {}", settled_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    }

    Ok(())
}

pub(crate) fn run_fields() -> Result<(), AppError> {
    print!("{}", render_fields()?);
    Ok(())
}

/// Field listing; fails if any option set offers the same value twice.
pub(crate) fn render_fields() -> Result<String, AppError> {
    let mut out = String::from("Applicant fields\n");
    for field in FORM_ORDER {
        match field.kind() {
            FieldKind::Numeric => {
                out.push_str(&format!("- {} ({}): number\n", field, field_label(field)))
            }
            FieldKind::Categorical => {
                let options = option_tree(field)
                    .map(|tree| tree.options())
                    .unwrap_or_default();
                ensure_unique_values(&options)?;
                let choices = options
                    .into_iter()
                    .map(|option| format!("{} [{}]", option.value, option.label))
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("- {} ({}): {}\n", field, field_label(field), choices));
            }
        }
    }
    Ok(out)
}

pub(crate) fn render_evaluation(profile: &ApplicantProfile, outcome: &PredictionOutcome) -> String {
    let mut out = String::from("Loan advisor evaluation\n\nApplicant profile\n");
    for field in FORM_ORDER {
        let value = profile.value(field).input_text();
        let shown = if value.is_empty() { "(invalid)" } else { value.as_str() };
        out.push_str(&format!("- {}: {}\n", field_label(field), shown));
    }

    match outcome {
        PredictionOutcome::Pending => out.push_str("\nNo decision yet\n"),
        PredictionOutcome::Failed { message } => {
            out.push_str(&format!("\nAnalysis failed: {message}\n"));
        }
        PredictionOutcome::Succeeded(prediction) => {
            let view = ResultPresentation::from_prediction(prediction);
            out.push_str(&format!(
                "\n{} (confidence {})\n{}\n",
                view.headline, view.confidence_text, view.rationale
            ));

            if view.bars.is_empty() {
                out.push_str("\nDecision justification: none provided\n");
            } else {
                out.push_str("\nDecision justification\n");
                let label_width = view
                    .bars
                    .iter()
                    .map(|bar| bar.label.chars().count())
                    .max()
                    .unwrap_or(0);
                for bar in &view.bars {
                    out.push_str(&format!(
                        "  {:<label_width$} {} {:+.4}\n",
                        bar.label,
                        text_bar(bar.extent),
                        bar.weight,
                    ));
                }
            }

            out.push_str(&format!("\nTop strength: {}\n", view.top_strength_text()));
            out.push_str(&format!("Top risk factor: {}\n", view.top_risk_text()));
        }
    }

    out.push_str(&format!(
        "\nFor authorized advisor use only. {ADVISORY_NOTICE}\n"
    ));
    out
}

/// Two-sided bar: negative extents grow left of the axis, positive ones right.
fn text_bar(extent: f64) -> String {
    let cells = (extent.abs().min(1.0) * HALF_BAR_WIDTH as f64).round() as usize;
    let (left, right) = if extent < 0.0 { (cells, 0) } else { (0, cells) };
    format!(
        "{}{}|{}{}",
        " ".repeat(HALF_BAR_WIDTH - left),
        "-".repeat(left),
        "+".repeat(right),
        " ".repeat(HALF_BAR_WIDTH - right)
    )
}
