use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// A `field=value` pair given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldAssignment {
    pub(crate) field: String,
    pub(crate) value: String,
}

pub(crate) fn parse_assignment(raw: &str) -> Result<FieldAssignment, String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok(FieldAssignment {
        field: field.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_equals() {
        let assignment = parse_assignment("loan_intent=A=B").expect("parses");
        assert_eq!(assignment.field, "loan_intent");
        assert_eq!(assignment.value, "A=B");
    }

    #[test]
    fn keeps_empty_values() {
        let assignment = parse_assignment("credit_score=").expect("parses");
        assert_eq!(assignment.value, "");
    }

    #[test]
    fn rejects_missing_field_name() {
        assert!(parse_assignment("=700").is_err());
        assert!(parse_assignment("credit_score").is_err());
    }
}
