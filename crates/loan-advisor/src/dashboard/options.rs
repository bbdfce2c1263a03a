//! Option trees for categorical fields.
//!
//! Categorical choices are authored as a declarative nesting (a trigger with a
//! placeholder, then a content container of items) and rendered through a plain
//! native `<select>`. [`resolve_options`] flattens the tree into the ordered
//! `(value, label)` list the native control needs, so callers never maintain a
//! second, parallel list of choices.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::Serialize;

use super::page::escape_html;

/// One selectable choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
    pub value: String,
    pub label: String,
}

/// Declarative node of an option tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionTreeNode {
    /// Wraps an ordered sequence of children; nesting is stripped on resolution.
    Content(Vec<OptionTreeNode>),
    /// A single choice. A missing label renders as empty text.
    Item { value: String, label: Option<String> },
    /// Layout markup carrying no choices (triggers, placeholders, separators).
    Markup { tag: String, text: Option<String> },
}

impl OptionTreeNode {
    pub fn content(children: Vec<OptionTreeNode>) -> Self {
        Self::Content(children)
    }

    pub fn item(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Item {
            value: value.into(),
            label: Some(label.into()),
        }
    }

    pub fn unlabeled(value: impl Into<String>) -> Self {
        Self::Item {
            value: value.into(),
            label: None,
        }
    }

    pub fn trigger(placeholder: impl Into<String>) -> Self {
        Self::Markup {
            tag: "trigger".to_string(),
            text: Some(placeholder.into()),
        }
    }

    pub fn markup(tag: impl Into<String>) -> Self {
        Self::Markup {
            tag: tag.into(),
            text: None,
        }
    }

    /// Text of the first trigger in the tree, used as the control's accessible name.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Content(children) => children.iter().find_map(OptionTreeNode::placeholder),
            Self::Markup { tag, text } if tag == "trigger" => text.as_deref(),
            _ => None,
        }
    }

    pub fn options(&self) -> Vec<OptionSpec> {
        resolve_options(Some(self))
    }
}

/// Flattens an option tree into its leaves, depth-first and left to right.
///
/// Markup nodes are skipped without error and an absent root resolves to no
/// options. Item values are passed through untouched.
pub fn resolve_options(root: Option<&OptionTreeNode>) -> Vec<OptionSpec> {
    let mut resolved = Vec::new();
    if let Some(node) = root {
        collect(node, &mut resolved);
    }
    resolved
}

fn collect(node: &OptionTreeNode, out: &mut Vec<OptionSpec>) {
    match node {
        OptionTreeNode::Content(children) => {
            for child in children {
                collect(child, out);
            }
        }
        OptionTreeNode::Item { value, label } => out.push(OptionSpec {
            value: value.clone(),
            label: label.clone().unwrap_or_default(),
        }),
        OptionTreeNode::Markup { .. } => {}
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionTreeError {
    #[error("option value '{value}' appears more than once")]
    DuplicateValue { value: String },
}

/// Checks that no two options share a value.
pub fn ensure_unique_values(options: &[OptionSpec]) -> Result<(), OptionTreeError> {
    let mut seen = HashSet::with_capacity(options.len());
    for option in options {
        if !seen.insert(option.value.as_str()) {
            return Err(OptionTreeError::DuplicateValue {
                value: option.value.clone(),
            });
        }
    }
    Ok(())
}

/// Native single-choice control backed by a resolved option tree.
///
/// Fully determined by the current value, the resolved options, and the change
/// callback; nothing is retained between renders.
pub struct SelectControl<F>
where
    F: FnMut(&str),
{
    value: String,
    placeholder: Option<String>,
    options: Vec<OptionSpec>,
    on_change: F,
}

impl<F> SelectControl<F>
where
    F: FnMut(&str),
{
    pub fn new(root: Option<&OptionTreeNode>, value: impl Into<String>, on_change: F) -> Self {
        Self {
            value: value.into(),
            placeholder: root.and_then(OptionTreeNode::placeholder).map(str::to_string),
            options: resolve_options(root),
            on_change,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.options
            .iter()
            .position(|option| option.value == self.value)
    }

    /// Picks choice `index`, handing its value (never its label) to the callback.
    /// Returns `false` without calling back when the index is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        let Some(option) = self.options.get(index) else {
            return false;
        };
        (self.on_change)(&option.value);
        true
    }

    /// Picks the choice whose value matches, as a submitted form field would.
    pub fn select_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|option| option.value == value) {
            Some(index) => self.select(index),
            None => false,
        }
    }

    pub fn render_html(&self, name: &str) -> String {
        let mut html = String::new();
        let _ = write!(html, "<select name=\"{}\" id=\"{}\"", escape_html(name), escape_html(name));
        if let Some(placeholder) = &self.placeholder {
            let _ = write!(html, " aria-label=\"{}\"", escape_html(placeholder));
        }
        html.push('>');
        for option in &self.options {
            let selected = if option.value == self.value {
                " selected"
            } else {
                ""
            };
            let _ = write!(
                html,
                "<option value=\"{}\"{}>{}</option>",
                escape_html(&option.value),
                selected,
                escape_html(&option.label)
            );
        }
        html.push_str("</select>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_tree() -> OptionTreeNode {
        OptionTreeNode::content(vec![
            OptionTreeNode::trigger("Intent"),
            OptionTreeNode::content(vec![
                OptionTreeNode::item("PERSONAL", "Personal"),
                OptionTreeNode::content(vec![
                    OptionTreeNode::item("EDUCATION", "Education"),
                    OptionTreeNode::markup("separator"),
                    OptionTreeNode::content(vec![OptionTreeNode::item("MEDICAL", "Medical")]),
                ]),
                OptionTreeNode::item("VENTURE", "Venture"),
            ]),
        ])
    }

    #[test]
    fn resolves_leaves_depth_first_regardless_of_nesting() {
        let values: Vec<_> = nested_tree()
            .options()
            .into_iter()
            .map(|option| option.value)
            .collect();
        assert_eq!(values, ["PERSONAL", "EDUCATION", "MEDICAL", "VENTURE"]);
    }

    #[test]
    fn resolution_is_repeatable() {
        let tree = nested_tree();
        assert_eq!(resolve_options(Some(&tree)), resolve_options(Some(&tree)));
    }

    #[test]
    fn absent_and_empty_trees_resolve_to_nothing() {
        assert!(resolve_options(None).is_empty());
        assert!(OptionTreeNode::content(Vec::new()).options().is_empty());
        assert!(OptionTreeNode::markup("div").options().is_empty());
    }

    #[test]
    fn missing_label_falls_back_to_empty_text() {
        let tree = OptionTreeNode::content(vec![OptionTreeNode::unlabeled("OTHER")]);
        assert_eq!(
            tree.options(),
            vec![OptionSpec {
                value: "OTHER".to_string(),
                label: String::new(),
            }]
        );
    }

    #[test]
    fn values_are_kept_as_opaque_text() {
        let tree = OptionTreeNode::content(vec![OptionTreeNode::item("007", "Seven")]);
        assert_eq!(tree.options()[0].value, "007");
    }

    #[test]
    fn select_reports_value_not_label() {
        let tree = nested_tree();
        let mut picked = Vec::new();
        let mut control = SelectControl::new(Some(&tree), "PERSONAL", |value: &str| {
            picked.push(value.to_string())
        });
        assert!(control.select(2));
        assert!(!control.select(9));
        drop(control);
        assert_eq!(picked, ["MEDICAL"]);
    }

    #[test]
    fn select_value_ignores_unknown_choices() {
        let tree = nested_tree();
        let mut picked = None;
        let mut control =
            SelectControl::new(Some(&tree), "PERSONAL", |value: &str| picked = Some(value.to_string()));
        assert!(!control.select_value("Venture"));
        assert!(control.select_value("VENTURE"));
        drop(control);
        assert_eq!(picked.as_deref(), Some("VENTURE"));
    }

    #[test]
    fn renders_native_select_with_current_value() {
        let tree = nested_tree();
        let control = SelectControl::new(Some(&tree), "EDUCATION", |_: &str| {});
        assert_eq!(control.selected_index(), Some(1));

        let html = control.render_html("loan_intent");
        assert!(html.starts_with("<select name=\"loan_intent\" id=\"loan_intent\" aria-label=\"Intent\">"));
        assert!(html.contains("<option value=\"EDUCATION\" selected>Education</option>"));
        assert_eq!(html.matches("<option").count(), 4);
    }

    #[test]
    fn duplicate_values_are_reported() {
        let options = OptionTreeNode::content(vec![
            OptionTreeNode::item("Yes", "Yes"),
            OptionTreeNode::item("Yes", "Affirmative"),
        ])
        .options();
        assert_eq!(
            ensure_unique_values(&options),
            Err(OptionTreeError::DuplicateValue {
                value: "Yes".to_string()
            })
        );
    }
}
