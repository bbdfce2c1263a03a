use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Fields of the applicant profile, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    PersonAge,
    PersonGender,
    PersonEducation,
    PersonIncome,
    PersonEmpExp,
    PersonHomeOwnership,
    LoanAmnt,
    LoanIntent,
    LoanIntRate,
    LoanPercentIncome,
    CbPersonCredHistLength,
    CreditScore,
    PreviousLoanDefaultsOnFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

impl FieldName {
    pub const ALL: [FieldName; 13] = [
        FieldName::PersonAge,
        FieldName::PersonGender,
        FieldName::PersonEducation,
        FieldName::PersonIncome,
        FieldName::PersonEmpExp,
        FieldName::PersonHomeOwnership,
        FieldName::LoanAmnt,
        FieldName::LoanIntent,
        FieldName::LoanIntRate,
        FieldName::LoanPercentIncome,
        FieldName::CbPersonCredHistLength,
        FieldName::CreditScore,
        FieldName::PreviousLoanDefaultsOnFile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::PersonAge => "person_age",
            FieldName::PersonGender => "person_gender",
            FieldName::PersonEducation => "person_education",
            FieldName::PersonIncome => "person_income",
            FieldName::PersonEmpExp => "person_emp_exp",
            FieldName::PersonHomeOwnership => "person_home_ownership",
            FieldName::LoanAmnt => "loan_amnt",
            FieldName::LoanIntent => "loan_intent",
            FieldName::LoanIntRate => "loan_int_rate",
            FieldName::LoanPercentIncome => "loan_percent_income",
            FieldName::CbPersonCredHistLength => "cb_person_cred_hist_length",
            FieldName::CreditScore => "credit_score",
            FieldName::PreviousLoanDefaultsOnFile => "previous_loan_defaults_on_file",
        }
    }

    pub fn parse(name: &str) -> Result<Self, FormError> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == trimmed)
            .ok_or_else(|| FormError::UnknownField {
                name: name.to_string(),
            })
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FieldName::PersonGender
            | FieldName::PersonEducation
            | FieldName::PersonHomeOwnership
            | FieldName::LoanIntent
            | FieldName::PreviousLoanDefaultsOnFile => FieldKind::Categorical,
            _ => FieldKind::Numeric,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("unknown applicant field '{name}'")]
    UnknownField { name: String },
}

/// Current value of one profile field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Text to place back into an input control. NaN leaves the input blank.
    pub fn input_text(&self) -> String {
        match self {
            FieldValue::Number(number) if number.is_nan() => String::new(),
            FieldValue::Number(number) => number.to_string(),
            FieldValue::Text(text) => (*text).to_string(),
        }
    }
}

/// Applicant financial profile submitted for scoring.
///
/// Every field always holds a value; the only way to obtain a profile is the
/// fixed default snapshot, refined through [`ApplicantProfile::update`]. Serializes
/// to the flat JSON body the scoring service expects. Non-finite numbers are
/// written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantProfile {
    person_age: f64,
    person_gender: String,
    person_education: String,
    person_income: f64,
    person_emp_exp: f64,
    person_home_ownership: String,
    loan_amnt: f64,
    loan_intent: String,
    loan_int_rate: f64,
    loan_percent_income: f64,
    cb_person_cred_hist_length: f64,
    credit_score: f64,
    previous_loan_defaults_on_file: String,
}

impl Default for ApplicantProfile {
    fn default() -> Self {
        Self {
            person_age: 30.0,
            person_gender: "male".to_string(),
            person_education: "Bachelor".to_string(),
            person_income: 50_000.0,
            person_emp_exp: 5.0,
            person_home_ownership: "RENT".to_string(),
            loan_amnt: 10_000.0,
            loan_intent: "PERSONAL".to_string(),
            loan_int_rate: 11.5,
            loan_percent_income: 0.2,
            cb_person_cred_hist_length: 5.0,
            credit_score: 700.0,
            previous_loan_defaults_on_file: "No".to_string(),
        }
    }
}

impl ApplicantProfile {
    pub fn value(&self, field: FieldName) -> FieldValue<'_> {
        match field {
            FieldName::PersonAge => FieldValue::Number(self.person_age),
            FieldName::PersonGender => FieldValue::Text(&self.person_gender),
            FieldName::PersonEducation => FieldValue::Text(&self.person_education),
            FieldName::PersonIncome => FieldValue::Number(self.person_income),
            FieldName::PersonEmpExp => FieldValue::Number(self.person_emp_exp),
            FieldName::PersonHomeOwnership => FieldValue::Text(&self.person_home_ownership),
            FieldName::LoanAmnt => FieldValue::Number(self.loan_amnt),
            FieldName::LoanIntent => FieldValue::Text(&self.loan_intent),
            FieldName::LoanIntRate => FieldValue::Number(self.loan_int_rate),
            FieldName::LoanPercentIncome => FieldValue::Number(self.loan_percent_income),
            FieldName::CbPersonCredHistLength => {
                FieldValue::Number(self.cb_person_cred_hist_length)
            }
            FieldName::CreditScore => FieldValue::Number(self.credit_score),
            FieldName::PreviousLoanDefaultsOnFile => {
                FieldValue::Text(&self.previous_loan_defaults_on_file)
            }
        }
    }

    /// Returns a copy with one field replaced; every other field is carried over.
    ///
    /// Numeric fields parse `raw` as a float and fall back to NaN when it does not
    /// parse. Categorical fields keep `raw` verbatim.
    pub fn update(&self, field: FieldName, raw: &str) -> ApplicantProfile {
        let mut next = self.clone();
        match field.kind() {
            FieldKind::Numeric => {
                let number = coerce_number(field, raw);
                if let Some(slot) = next.number_slot(field) {
                    *slot = number;
                }
            }
            FieldKind::Categorical => {
                if let Some(slot) = next.text_slot(field) {
                    *slot = raw.to_string();
                }
            }
        }
        next
    }

    pub fn update_named(&self, name: &str, raw: &str) -> Result<ApplicantProfile, FormError> {
        let field = FieldName::parse(name)?;
        Ok(self.update(field, raw))
    }

    /// Folds [`ApplicantProfile::update`] over `(field, raw)` pairs in order.
    pub fn apply_all<'a, I>(&self, pairs: I) -> Result<ApplicantProfile, FormError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .try_fold(self.clone(), |profile, (name, raw)| {
                profile.update_named(name, raw)
            })
    }

    fn number_slot(&mut self, field: FieldName) -> Option<&mut f64> {
        match field {
            FieldName::PersonAge => Some(&mut self.person_age),
            FieldName::PersonIncome => Some(&mut self.person_income),
            FieldName::PersonEmpExp => Some(&mut self.person_emp_exp),
            FieldName::LoanAmnt => Some(&mut self.loan_amnt),
            FieldName::LoanIntRate => Some(&mut self.loan_int_rate),
            FieldName::LoanPercentIncome => Some(&mut self.loan_percent_income),
            FieldName::CbPersonCredHistLength => Some(&mut self.cb_person_cred_hist_length),
            FieldName::CreditScore => Some(&mut self.credit_score),
            _ => None,
        }
    }

    fn text_slot(&mut self, field: FieldName) -> Option<&mut String> {
        match field {
            FieldName::PersonGender => Some(&mut self.person_gender),
            FieldName::PersonEducation => Some(&mut self.person_education),
            FieldName::PersonHomeOwnership => Some(&mut self.person_home_ownership),
            FieldName::LoanIntent => Some(&mut self.loan_intent),
            FieldName::PreviousLoanDefaultsOnFile => Some(&mut self.previous_loan_defaults_on_file),
            _ => None,
        }
    }
}

fn coerce_number(field: FieldName, raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(number) => number,
        Err(_) => {
            warn!(%field, raw, "numeric input did not parse; storing NaN");
            f64::NAN
        }
    }
}
