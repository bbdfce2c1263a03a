use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::debug;

use super::catalog::option_tree;
use super::controller::{ControllerSnapshot, PredictionController, SubmissionTicket};
use super::options::SelectControl;
use super::outcome::PredictionOutcome;
use super::page::{render_dashboard, DashboardView};
use super::profile::{ApplicantProfile, FieldKind, FieldName, FormError};
use super::scoring::ScoringClient;

/// State owned by one dashboard: the profile being edited and the outcome cell.
pub struct DashboardSession<C> {
    profile: Mutex<ApplicantProfile>,
    controller: PredictionController<C>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub profile: ApplicantProfile,
    #[serde(flatten)]
    pub controller: ControllerSnapshot,
    pub submit_enabled: bool,
    pub view: DashboardView,
}

impl<C> DashboardSession<C>
where
    C: ScoringClient + 'static,
{
    pub fn new(client: Arc<C>) -> Self {
        Self {
            profile: Mutex::new(ApplicantProfile::default()),
            controller: PredictionController::new(client),
        }
    }

    pub fn controller(&self) -> &PredictionController<C> {
        &self.controller
    }

    pub fn profile(&self) -> ApplicantProfile {
        self.lock_profile().clone()
    }

    pub fn update_field(&self, name: &str, raw: &str) -> Result<ApplicantProfile, FormError> {
        let mut profile = self.lock_profile();
        let next = profile.update_named(name, raw)?;
        *profile = next.clone();
        Ok(next)
    }

    /// Applies a posted form. Categorical values go through their select control,
    /// so a value the control does not offer leaves the field unchanged.
    pub fn apply_form(&self, pairs: &[(String, String)]) -> Result<ApplicantProfile, FormError> {
        let mut profile = self.lock_profile();
        let mut next = profile.clone();

        for (name, raw) in pairs {
            let field = FieldName::parse(name)?;
            match field.kind() {
                FieldKind::Numeric => next = next.update(field, raw),
                FieldKind::Categorical => {
                    let tree = option_tree(field);
                    let current = next.value(field).input_text();
                    let mut chosen = None;
                    let mut control = SelectControl::new(tree.as_ref(), current, |value: &str| {
                        chosen = Some(value.to_string())
                    });
                    if !control.select_value(raw) {
                        debug!(%field, value = raw.as_str(), "ignoring value not offered by control");
                    }
                    drop(control);
                    if let Some(value) = chosen {
                        next = next.update(field, &value);
                    }
                }
            }
        }

        *profile = next.clone();
        Ok(next)
    }

    /// Starts a submission of the current profile without waiting for it.
    pub fn start_submission(&self) -> SubmissionTicket {
        let (ticket, _handle) = self.controller.spawn_submit(self.profile());
        ticket
    }

    /// Submits the current profile and waits for its outcome.
    pub async fn evaluate(&self) -> PredictionOutcome {
        let profile = self.profile();
        self.controller.submit(&profile).await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let controller = self.controller.snapshot();
        SessionSnapshot {
            profile: self.profile(),
            submit_enabled: controller.submit_enabled(),
            view: DashboardView::of(&controller),
            controller,
        }
    }

    pub fn render_page(&self) -> String {
        let profile = self.profile();
        render_dashboard(&profile, &self.controller.snapshot())
    }

    fn lock_profile(&self) -> MutexGuard<'_, ApplicantProfile> {
        self.profile.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
