//! Conversion between stored values and what a control shows or reports
//!
//! Coercion is driven by the type already known for a leaf, never by the
//! text the user typed.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::schema::LeafType;

/// Option value of a multi-select that means "nothing selected"
pub const NO_SELECTION: &str = "--";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

/// State a control reports when the user edits it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    /// Text value (for a select: the first selected option)
    pub value: String,
    /// Option list of a multi-select, empty for plain inputs
    pub options: Vec<SelectOption>,
}

impl ControlState {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            options: Vec::new(),
        }
    }

    /// Multi-select state from its option values and the ones selected
    pub fn multi_select<S: AsRef<str>>(options: &[S], selected: &[S]) -> Self {
        let options: Vec<SelectOption> = options
            .iter()
            .map(|option| SelectOption {
                value: option.as_ref().to_string(),
                selected: selected.iter().any(|s| s.as_ref() == option.as_ref()),
            })
            .collect();
        let value = options
            .iter()
            .find(|o| o.selected)
            .map(|o| o.value.clone())
            .unwrap_or_default();

        Self { value, options }
    }

    /// Selected option values, without the no-selection sentinel
    pub fn selected_values(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.selected && o.value != NO_SELECTION)
            .map(|o| o.value.clone())
            .collect()
    }
}

/// What a bound control displays for a stored value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayValue {
    Text(String),
    /// Option values to mark as selected
    Selected(Vec<String>),
}

/// Convert a stored value into its display form.
///
/// `options` are the option values of the control; only used for lists.
pub fn decode_for_display(value: &Value, options: &[String]) -> DisplayValue {
    match value {
        Value::Bool(flag) => DisplayValue::Text(flag.to_string()),
        Value::Array(items) => DisplayValue::Selected(
            options
                .iter()
                .filter(|option| option.as_str() != NO_SELECTION)
                .filter(|option| items.iter().any(|item| item.as_str() == Some(option.as_str())))
                .cloned()
                .collect(),
        ),
        Value::String(text) => DisplayValue::Text(text.clone()),
        Value::Null => DisplayValue::Text(String::new()),
        other => DisplayValue::Text(other.to_string()),
    }
}

/// Convert a control's state into the value to store.
///
/// Without a known leaf type the raw text is stored as is.
pub fn encode_from_control(leaf_type: Option<LeafType>, control: &ControlState) -> Value {
    match leaf_type {
        Some(LeafType::Number) => parse_integer_prefix(&control.value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Some(LeafType::List) => Value::Array(
            control
                .selected_values()
                .into_iter()
                .map(Value::String)
                .collect(),
        ),
        Some(LeafType::Boolean) => Value::Bool(control.value == "true"),
        Some(LeafType::String) | None => Value::String(control.value.clone()),
    }
}

/// Leading integer of `text`, ignoring anything after it: `" 12ab"` -> 12.
///
/// No further validation is done; text without leading digits yields `None`.
/// Digit runs beyond the `i64` range are kept as the nearest float.
pub fn parse_integer_prefix(text: &str) -> Option<Number> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }

    match format!("{sign}{digits}").parse::<i64>() {
        Ok(n) => Some(Number::from(n)),
        Err(_) => digits
            .parse::<f64>()
            .ok()
            .and_then(|n| Number::from_f64(if sign == "-" { -n } else { n })),
    }
}
