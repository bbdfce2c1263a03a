use serde::Serialize;
use tracing::warn;

use super::scoring::{PredictResponse, ScoringError};

/// Shown when a request fails without a usable service message.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "An unexpected error occurred while processing the request.";

/// Shown when the service reports success but leaves out part of the result.
pub const INCOMPLETE_RESULT_MESSAGE: &str =
    "The scoring service reported success but returned an incomplete result.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    /// Only an exact `1` approves; any other value takes the rejected branch.
    pub fn from_raw(raw: f64) -> Self {
        if raw == 1.0 {
            Decision::Approved
        } else {
            Decision::Rejected
        }
    }
}

/// One feature's signed contribution to a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribution {
    pub feature_key: String,
    pub display_label: String,
    pub weight: f64,
}

impl Attribution {
    pub fn is_supportive(&self) -> bool {
        self.weight > 0.0
    }

    pub fn is_adverse(&self) -> bool {
        self.weight < 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub decision: Decision,
    pub confidence: f64,
    /// Service order, never re-sorted.
    pub attributions: Vec<Attribution>,
}

/// Result of the latest prediction request. Replaced wholesale on each submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Pending,
    Succeeded(Prediction),
    Failed { message: String },
}

impl PredictionOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        PredictionOutcome::Failed {
            message: message.into(),
        }
    }

    pub fn from_response(response: PredictResponse) -> Self {
        if !response.is_success() {
            let message = response
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            return PredictionOutcome::failed(message);
        }

        let PredictResponse {
            prediction: Some(raw_decision),
            probability: Some(confidence),
            explanation: Some(explanation),
            ..
        } = response
        else {
            warn!("success response is missing prediction, probability or explanation");
            return PredictionOutcome::failed(INCOMPLETE_RESULT_MESSAGE);
        };

        let attributions = explanation
            .into_iter()
            .map(|entry| Attribution {
                feature_key: entry.feature,
                display_label: entry.display_name,
                weight: entry.value,
            })
            .collect();

        PredictionOutcome::Succeeded(Prediction {
            decision: Decision::from_raw(raw_decision),
            confidence,
            attributions,
        })
    }

    pub fn from_error(error: &ScoringError) -> Self {
        warn!(%error, "prediction request did not complete");
        PredictionOutcome::failed(GENERIC_FAILURE_MESSAGE)
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, PredictionOutcome::Pending)
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            PredictionOutcome::Succeeded(prediction) => Some(prediction),
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            PredictionOutcome::Failed { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::scoring::ExplanationEntry;

    fn success(explanation: Option<Vec<ExplanationEntry>>) -> PredictResponse {
        PredictResponse {
            status: "success".to_string(),
            prediction: Some(1.0),
            probability: Some(0.873),
            explanation,
            message: None,
        }
    }

    #[test]
    fn success_body_maps_to_prediction_in_service_order() {
        let outcome = PredictionOutcome::from_response(success(Some(vec![
            ExplanationEntry {
                feature: "loan_percent_income".to_string(),
                value: -0.22,
                display_name: "Loan-to-Income".to_string(),
            },
            ExplanationEntry {
                feature: "credit_score".to_string(),
                value: 0.41,
                display_name: "Credit Score".to_string(),
            },
        ])));

        let prediction = outcome.prediction().expect("succeeded");
        assert_eq!(prediction.decision, Decision::Approved);
        assert_eq!(prediction.confidence, 0.873);
        assert_eq!(prediction.attributions[0].feature_key, "loan_percent_income");
        assert!(prediction.attributions[0].is_adverse());
        assert!(prediction.attributions[1].is_supportive());
    }

    #[test]
    fn error_body_uses_service_message() {
        let outcome = PredictionOutcome::from_response(PredictResponse {
            status: "error".to_string(),
            message: Some("model unavailable".to_string()),
            ..PredictResponse::default()
        });
        assert_eq!(outcome.failure_message(), Some("model unavailable"));
    }

    #[test]
    fn error_body_without_message_falls_back() {
        let outcome = PredictionOutcome::from_response(PredictResponse {
            status: "degraded".to_string(),
            ..PredictResponse::default()
        });
        assert_eq!(outcome.failure_message(), Some(GENERIC_FAILURE_MESSAGE));
    }

    #[test]
    fn success_without_explanation_is_a_failure() {
        let outcome = PredictionOutcome::from_response(success(None));
        assert_eq!(outcome.failure_message(), Some(INCOMPLETE_RESULT_MESSAGE));
    }

    #[test]
    fn success_with_incomplete_entry_is_incomplete_result() {
        let response: PredictResponse = serde_json::from_str(
            r#"{"status":"success","prediction":1,"probability":0.9,
                "explanation":[{"feature":"credit_score","display_name":"Credit Score"}]}"#,
        )
        .expect("valid body");
        let outcome = PredictionOutcome::from_response(response);
        assert_eq!(outcome.failure_message(), Some(INCOMPLETE_RESULT_MESSAGE));
    }

    #[test]
    fn only_exact_one_approves() {
        assert_eq!(Decision::from_raw(1.0), Decision::Approved);
        assert_eq!(Decision::from_raw(0.0), Decision::Rejected);
        assert_eq!(Decision::from_raw(2.0), Decision::Rejected);
    }

    #[test]
    fn zero_weight_is_neither_supportive_nor_adverse() {
        let neutral = Attribution {
            feature_key: "person_age".to_string(),
            display_label: "Person Age".to_string(),
            weight: 0.0,
        };
        assert!(!neutral.is_supportive());
        assert!(!neutral.is_adverse());
    }

    #[test]
    fn serializes_with_state_tag() {
        let value = serde_json::to_value(PredictionOutcome::failed("boom")).expect("serializes");
        assert_eq!(value["state"], "failed");
        assert_eq!(value["message"], "boom");
        let pending = serde_json::to_value(PredictionOutcome::Pending).expect("serializes");
        assert_eq!(pending, serde_json::json!({ "state": "pending" }));
    }
}
