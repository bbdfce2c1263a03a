//! Labels and option trees for every applicant field.

use super::options::OptionTreeNode;
use super::profile::FieldName;

/// Order in which the dashboard form lays out its inputs.
pub const FORM_ORDER: [FieldName; 13] = [
    FieldName::PersonAge,
    FieldName::PersonGender,
    FieldName::PersonEducation,
    FieldName::PersonIncome,
    FieldName::PersonEmpExp,
    FieldName::PersonHomeOwnership,
    FieldName::LoanIntent,
    FieldName::LoanAmnt,
    FieldName::LoanIntRate,
    FieldName::LoanPercentIncome,
    FieldName::CbPersonCredHistLength,
    FieldName::CreditScore,
    FieldName::PreviousLoanDefaultsOnFile,
];

pub fn field_label(field: FieldName) -> &'static str {
    match field {
        FieldName::PersonAge => "Age",
        FieldName::PersonGender => "Gender",
        FieldName::PersonEducation => "Education Level",
        FieldName::PersonIncome => "Annual Income ($)",
        FieldName::PersonEmpExp => "Exp. (Years)",
        FieldName::PersonHomeOwnership => "Home Ownership",
        FieldName::LoanAmnt => "Loan Amount ($)",
        FieldName::LoanIntent => "Loan Intent",
        FieldName::LoanIntRate => "Interest Rate (%)",
        FieldName::LoanPercentIncome => "Loan-to-Income Ratio",
        FieldName::CbPersonCredHistLength => "Credit History (Years)",
        FieldName::CreditScore => "Credit Score",
        FieldName::PreviousLoanDefaultsOnFile => "Previous Default on File?",
    }
}

/// Declarative choices for a categorical field; `None` for numeric fields.
pub fn option_tree(field: FieldName) -> Option<OptionTreeNode> {
    let (placeholder, items): (&str, &[(&str, &str)]) = match field {
        FieldName::PersonGender => ("Gender", &[("male", "Male"), ("female", "Female")]),
        FieldName::PersonEducation => (
            "Education",
            &[
                ("High School", "High School"),
                ("Associate", "Associate"),
                ("Bachelor", "Bachelor"),
                ("Master", "Master"),
                ("Doctorate", "Doctorate"),
            ],
        ),
        FieldName::PersonHomeOwnership => (
            "Ownership",
            &[
                ("RENT", "Rent"),
                ("MORTGAGE", "Mortgage"),
                ("OWN", "Own"),
                ("OTHER", "Other"),
            ],
        ),
        FieldName::LoanIntent => (
            "Intent",
            &[
                ("PERSONAL", "Personal"),
                ("EDUCATION", "Education"),
                ("MEDICAL", "Medical"),
                ("VENTURE", "Venture"),
                ("HOMEIMPROVEMENT", "Home Improvement"),
                ("DEBTCONSOLIDATION", "Debt Consolidation"),
            ],
        ),
        FieldName::PreviousLoanDefaultsOnFile => ("Select", &[("No", "No"), ("Yes", "Yes")]),
        _ => return None,
    };

    Some(OptionTreeNode::content(vec![
        OptionTreeNode::trigger(placeholder),
        OptionTreeNode::content(
            items
                .iter()
                .map(|(value, label)| OptionTreeNode::item(*value, *label))
                .collect(),
        ),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::options::ensure_unique_values;
    use crate::dashboard::profile::{ApplicantProfile, FieldKind, FieldValue};

    #[test]
    fn categorical_fields_have_trees_and_numeric_fields_do_not() {
        for field in FieldName::ALL {
            assert_eq!(
                option_tree(field).is_some(),
                field.kind() == FieldKind::Categorical,
                "{field}"
            );
        }
    }

    #[test]
    fn option_sets_are_duplicate_free() {
        for field in FieldName::ALL {
            if let Some(tree) = option_tree(field) {
                ensure_unique_values(&tree.options()).expect("unique option values");
            }
        }
    }

    #[test]
    fn default_profile_is_representable_by_every_control() {
        let profile = ApplicantProfile::default();
        for field in FieldName::ALL {
            let (Some(tree), FieldValue::Text(current)) = (option_tree(field), profile.value(field))
            else {
                continue;
            };
            assert!(
                tree.options().iter().any(|option| option.value == current),
                "{field} default '{current}' has no matching option"
            );
        }
    }

    #[test]
    fn trigger_placeholder_is_not_an_option() {
        let tree = option_tree(FieldName::LoanIntent).expect("categorical");
        assert_eq!(tree.placeholder(), Some("Intent"));
        let options = tree.options();
        assert_eq!(options.len(), 6);
        assert_eq!(options[4].value, "HOMEIMPROVEMENT");
        assert_eq!(options[4].label, "Home Improvement");
    }

    #[test]
    fn form_order_covers_every_field_once() {
        for field in FieldName::ALL {
            assert_eq!(FORM_ORDER.iter().filter(|entry| **entry == field).count(), 1);
        }
    }
}
