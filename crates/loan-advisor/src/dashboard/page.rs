//! Server-rendered dashboard page.

use std::fmt::Write as _;

use serde::Serialize;

use super::catalog::{field_label, option_tree, FORM_ORDER};
use super::controller::{ControllerSnapshot, RequestPhase};
use super::options::SelectControl;
use super::outcome::{Decision, PredictionOutcome};
use super::presentation::{ResultPresentation, ADVISORY_NOTICE};
use super::profile::{ApplicantProfile, FieldKind};

/// Seconds between reloads while a request is in flight.
const POLL_SECONDS: u32 = 1;

/// The mutually exclusive panels beside the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardView {
    Ready,
    Loading,
    Result(ResultPresentation),
    Error { message: String },
}

impl DashboardView {
    pub fn of(snapshot: &ControllerSnapshot) -> Self {
        if snapshot.phase == RequestPhase::Submitting {
            return DashboardView::Loading;
        }
        match &snapshot.outcome {
            PredictionOutcome::Pending => DashboardView::Ready,
            PredictionOutcome::Succeeded(prediction) => {
                DashboardView::Result(ResultPresentation::from_prediction(prediction))
            }
            PredictionOutcome::Failed { message } => DashboardView::Error {
                message: message.clone(),
            },
        }
    }
}

pub fn render_dashboard(profile: &ApplicantProfile, snapshot: &ControllerSnapshot) -> String {
    let view = DashboardView::of(snapshot);
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    if view == DashboardView::Loading {
        let _ = write!(html, "<meta http-equiv=\"refresh\" content=\"{POLL_SECONDS}\">");
    }
    html.push_str("<title>Loan Advisor</title><style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body>");
    html.push_str(
        "<header><h1>Banque Populaire du Monde</h1>\
         <p>Loan Advisor Intelligence Platform</p></header><main>",
    );

    render_form(&mut html, profile, snapshot.submit_enabled());

    html.push_str("<section class=\"outcome\">");
    match &view {
        DashboardView::Ready => html.push_str(
            "<div class=\"panel ready\"><h3>Ready for Assessment</h3>\
             <p>Complete the customer profile to generate a loan decision and risk analysis.</p></div>",
        ),
        DashboardView::Loading => html.push_str(
            "<div class=\"panel loading\"><p>Running advanced risk scoring...</p></div>",
        ),
        DashboardView::Result(presentation) => render_result(&mut html, presentation),
        DashboardView::Error { message } => {
            let _ = write!(
                html,
                "<div class=\"panel error\"><h3>Analysis Failed</h3><p>{}</p></div>",
                escape_html(message)
            );
        }
    }
    if let Some(settled_at) = snapshot.settled_at {
        let _ = write!(
            html,
            "<p class=\"settled\">Evaluated {}</p>",
            settled_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    html.push_str("</section></main>");

    let _ = write!(
        html,
        "<footer><p>For authorized advisor use only. {}</p></footer></body></html>",
        escape_html(ADVISORY_NOTICE)
    );
    html
}

fn render_form(html: &mut String, profile: &ApplicantProfile, submit_enabled: bool) {
    html.push_str(
        "<section class=\"form\"><h2>Customer Details</h2>\
         <form method=\"post\" action=\"/evaluate\">",
    );

    for field in FORM_ORDER {
        let name = field.as_str();
        let current = profile.value(field).input_text();
        let _ = write!(
            html,
            "<div class=\"field\"><label for=\"{name}\">{}</label>",
            escape_html(field_label(field))
        );
        match field.kind() {
            FieldKind::Categorical => {
                let tree = option_tree(field);
                let control = SelectControl::new(tree.as_ref(), current, |_: &str| {});
                html.push_str(&control.render_html(name));
            }
            FieldKind::Numeric => {
                let _ = write!(
                    html,
                    "<input type=\"number\" step=\"any\" id=\"{name}\" name=\"{name}\" value=\"{}\">",
                    escape_html(&current)
                );
            }
        }
        html.push_str("</div>");
    }

    if submit_enabled {
        html.push_str("<button type=\"submit\">Evaluate Application</button>");
    } else {
        html.push_str("<button type=\"submit\" disabled>Analyzing Risk...</button>");
    }
    html.push_str("</form></section>");
}

fn render_result(html: &mut String, presentation: &ResultPresentation) {
    let tone = match presentation.verdict {
        Decision::Approved => "approved",
        Decision::Rejected => "rejected",
    };
    let _ = write!(
        html,
        "<div class=\"panel verdict {tone}\"><h2>{}</h2>\
         <span class=\"badge\">Confidence: {}</span><p>{}</p></div>",
        presentation.headline,
        escape_html(&presentation.confidence_text),
        presentation.rationale
    );

    html.push_str(
        "<div class=\"panel chart\"><h3>Decision Justification (SHAP Analysis)</h3>\
         <p>Key factors contributing to this decision.</p>",
    );
    for bar in &presentation.bars {
        let width = bar.extent.abs() * 50.0;
        let (left, right) = if bar.extent < 0.0 {
            (width, 0.0)
        } else {
            (0.0, width)
        };
        let _ = write!(
            html,
            "<div class=\"bar\" title=\"{label}: {impact} (SHAP value: {weight})\">\
             <span class=\"bar-label\">{label}</span>\
             <span class=\"track\"><span class=\"fill\" style=\"margin-left:{offset:.2}%;width:{span:.2}%;background:{color}\"></span></span></div>",
            label = escape_html(&bar.label),
            impact = bar.impact_label,
            weight = bar.weight_text,
            offset = 50.0 - left,
            span = left + right,
            color = bar.color,
        );
    }
    let _ = write!(
        html,
        "<div class=\"picks\"><div class=\"pick strength\"><h4>Top Strength</h4><p>{}</p></div>\
         <div class=\"pick risk\"><h4>Top Risk Factor</h4><p>{}</p></div></div></div>",
        escape_html(presentation.top_strength_text()),
        escape_html(presentation.top_risk_text())
    );
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const STYLE: &str = "body{font-family:sans-serif;background:#f8fafc;margin:0;padding:2rem}\
main{display:grid;grid-template-columns:5fr 7fr;gap:2rem}\
.field{display:flex;flex-direction:column;margin-bottom:.75rem}\
.panel{background:#fff;border-radius:.75rem;padding:1.5rem;margin-bottom:1.5rem}\
.verdict.approved{border-top:.5rem solid #10b981}.verdict.rejected{border-top:.5rem solid #ef4444}\
.error{background:#fef2f2;color:#b91c1c}\
.bar{display:flex;align-items:center;margin:.25rem 0}.bar-label{width:10rem}\
.track{flex:1;background:#f1f5f9;height:1.5rem}.fill{display:block;height:100%;opacity:.8}\
.picks{display:grid;grid-template-columns:1fr 1fr;gap:1rem}\
button[disabled]{opacity:.6}footer{text-align:center;color:#94a3b8;margin-top:3rem}";
