//! Pure mapping from a successful prediction to what the dashboard displays.

use serde::Serialize;

use super::outcome::{Attribution, Decision, Prediction};

/// Placeholder for a top pick that does not exist.
pub const NOT_AVAILABLE: &str = "N/A";

pub const SUPPORTIVE_COLOR: &str = "#10b981";
pub const ADVERSE_COLOR: &str = "#ef4444";

pub const ADVISORY_NOTICE: &str =
    "Decision support system, final authority resides with the Loan Committee.";

impl Decision {
    pub fn headline(self) -> &'static str {
        match self {
            Decision::Approved => "Loan Approved",
            Decision::Rejected => "Loan Rejected",
        }
    }

    pub fn rationale(self) -> &'static str {
        match self {
            Decision::Approved => {
                "This applicant meets the BPM risk tolerance criteria for this loan amount."
            }
            Decision::Rejected => {
                "Based on current risk modeling, we cannot approve this loan request at this time."
            }
        }
    }
}

/// Direction of an attribution, taken from the sign of its weight alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Supportive,
    Adverse,
    Neutral,
}

impl Impact {
    pub fn of(weight: f64) -> Self {
        if weight > 0.0 {
            Impact::Supportive
        } else if weight < 0.0 {
            Impact::Adverse
        } else {
            Impact::Neutral
        }
    }

    /// Bars are green only for positive weights; zero shares the adverse fill.
    pub fn color(self) -> &'static str {
        match self {
            Impact::Supportive => SUPPORTIVE_COLOR,
            Impact::Adverse | Impact::Neutral => ADVERSE_COLOR,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Impact::Supportive => "Positive Impact",
            Impact::Adverse | Impact::Neutral => "Negative Impact",
        }
    }
}

/// One bar of the horizontal attribution chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributionBar {
    pub feature_key: String,
    pub label: String,
    pub weight: f64,
    pub weight_text: String,
    pub impact: Impact,
    pub impact_label: &'static str,
    pub color: &'static str,
    /// Signed length relative to the largest magnitude, in `[-1, 1]`.
    pub extent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPresentation {
    pub verdict: Decision,
    pub headline: &'static str,
    pub rationale: &'static str,
    pub confidence_text: String,
    pub bars: Vec<AttributionBar>,
    pub top_strength: Option<String>,
    pub top_risk: Option<String>,
}

impl ResultPresentation {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        let attributions = &prediction.attributions;
        let scale = attributions
            .iter()
            .map(|attribution| attribution.weight.abs())
            .filter(|magnitude| magnitude.is_finite())
            .fold(0.0_f64, f64::max);

        let bars = attributions
            .iter()
            .map(|attribution| {
                let impact = Impact::of(attribution.weight);
                AttributionBar {
                    feature_key: attribution.feature_key.clone(),
                    label: attribution.display_label.clone(),
                    weight: attribution.weight,
                    weight_text: format!("{:.4}", attribution.weight),
                    impact,
                    impact_label: impact.label(),
                    color: impact.color(),
                    extent: relative_extent(attribution.weight, scale),
                }
            })
            .collect();

        Self {
            verdict: prediction.decision,
            headline: prediction.decision.headline(),
            rationale: prediction.decision.rationale(),
            confidence_text: confidence_text(prediction.confidence),
            bars,
            top_strength: first_label(attributions, Attribution::is_supportive),
            top_risk: first_label(attributions, Attribution::is_adverse),
        }
    }

    pub fn top_strength_text(&self) -> &str {
        self.top_strength.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn top_risk_text(&self) -> &str {
        self.top_risk.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// Probability as a percentage with one decimal place.
///
/// Exact ties round away from zero, so 12.25 shows as 12.3 rather than 12.2.
pub fn confidence_text(probability: f64) -> String {
    let percent = probability * 100.0;
    let rounded = (percent * 10.0).round() / 10.0;
    format!("{rounded:.1}%")
}

// First in service order, not largest by magnitude.
fn first_label(attributions: &[Attribution], keep: fn(&Attribution) -> bool) -> Option<String> {
    attributions
        .iter()
        .find(|attribution| keep(attribution))
        .map(|attribution| attribution.display_label.clone())
}

fn relative_extent(weight: f64, scale: f64) -> f64 {
    if scale > 0.0 && weight.is_finite() {
        weight / scale
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribution(key: &str, label: &str, weight: f64) -> Attribution {
        Attribution {
            feature_key: key.to_string(),
            display_label: label.to_string(),
            weight,
        }
    }

    fn approved() -> Prediction {
        Prediction {
            decision: Decision::Approved,
            confidence: 0.873,
            attributions: vec![
                attribution("credit_score", "Credit Score", 0.41),
                attribution("loan_percent_income", "Loan-to-Income", -0.22),
            ],
        }
    }

    #[test]
    fn approved_prediction_presents_verdict_and_picks() {
        let view = ResultPresentation::from_prediction(&approved());
        assert_eq!(view.verdict, Decision::Approved);
        assert_eq!(view.headline, "Loan Approved");
        assert_eq!(view.confidence_text, "87.3%");
        assert_eq!(view.top_strength_text(), "Credit Score");
        assert_eq!(view.top_risk_text(), "Loan-to-Income");
    }

    #[test]
    fn picks_are_first_by_order_not_magnitude() {
        let prediction = Prediction {
            decision: Decision::Rejected,
            confidence: 0.12,
            attributions: vec![
                attribution("person_age", "Person Age", 0.0),
                attribution("loan_int_rate", "Interest Rate", -0.05),
                attribution("person_income", "Income", 0.02),
                attribution("previous_loan_defaults_on_file", "Prior Default", -0.9),
                attribution("credit_score", "Credit Score", 0.6),
            ],
        };
        let view = ResultPresentation::from_prediction(&prediction);
        assert_eq!(view.top_strength_text(), "Income");
        assert_eq!(view.top_risk_text(), "Interest Rate");
        assert_eq!(view.headline, "Loan Rejected");
    }

    #[test]
    fn missing_picks_use_not_available_marker() {
        let prediction = Prediction {
            decision: Decision::Rejected,
            confidence: 0.4,
            attributions: vec![attribution("person_age", "Person Age", 0.0)],
        };
        let view = ResultPresentation::from_prediction(&prediction);
        assert_eq!(view.top_strength_text(), NOT_AVAILABLE);
        assert_eq!(view.top_risk_text(), NOT_AVAILABLE);
    }

    #[test]
    fn bars_keep_service_order_and_sign() {
        let view = ResultPresentation::from_prediction(&approved());
        let labels: Vec<_> = view.bars.iter().map(|bar| bar.label.as_str()).collect();
        assert_eq!(labels, ["Credit Score", "Loan-to-Income"]);

        assert_eq!(view.bars[0].color, SUPPORTIVE_COLOR);
        assert_eq!(view.bars[0].extent, 1.0);
        assert_eq!(view.bars[0].weight_text, "0.4100");
        assert_eq!(view.bars[1].color, ADVERSE_COLOR);
        assert_eq!(view.bars[1].impact_label, "Negative Impact");
        assert!(view.bars[1].extent < 0.0 && view.bars[1].extent > -1.0);
    }

    #[test]
    fn color_depends_on_sign_only() {
        assert_eq!(Impact::of(0.0001).color(), Impact::of(42.0).color());
        assert_eq!(Impact::of(-0.0001).color(), Impact::of(-42.0).color());
        assert_eq!(Impact::of(0.0), Impact::Neutral);
    }

    #[test]
    fn confidence_rounds_to_one_decimal() {
        assert_eq!(confidence_text(1.0), "100.0%");
        assert_eq!(confidence_text(0.0), "0.0%");
        assert_eq!(confidence_text(0.5), "50.0%");
        assert_eq!(confidence_text(0.873), "87.3%");
    }

    #[test]
    fn confidence_ties_round_up() {
        assert_eq!(confidence_text(0.1225), "12.3%");
        assert_eq!(confidence_text(0.0025), "0.3%");
    }

    #[test]
    fn empty_attributions_render_flat_chart() {
        let prediction = Prediction {
            decision: Decision::Approved,
            confidence: 0.99,
            attributions: Vec::new(),
        };
        let view = ResultPresentation::from_prediction(&prediction);
        assert!(view.bars.is_empty());
        assert_eq!(view.top_strength, None);
    }
}
