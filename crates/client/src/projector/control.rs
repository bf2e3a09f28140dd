//! Per-attribute controls and their presentation heuristics.

use devsync_shared::AttributeValue;

/// Attribute whose string values come from a fixed option set.
pub const MODE_ATTRIBUTE: &str = "mode";

/// Options offered for [`MODE_ATTRIBUTE`].
pub const MODE_OPTIONS: [&str; 3] = ["auto", "heat", "cool"];

/// Slider bounds. Presentation only; nothing enforces them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl RangeBounds {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Bounds guessed from the attribute name by case-sensitive substring.
    /// First match wins.
    pub fn for_attribute(name: &str) -> Self {
        const RULES: [(&str, RangeBounds); 5] = [
            ("brightness", RangeBounds::new(0.0, 100.0, 1.0)),
            ("temperature", RangeBounds::new(0.0, 50.0, 0.1)),
            ("humidity", RangeBounds::new(0.0, 100.0, 0.1)),
            ("lux", RangeBounds::new(0.0, 2000.0, 1.0)),
            ("setpoint", RangeBounds::new(5.0, 35.0, 1.0)),
        ];

        RULES
            .iter()
            .find(|(needle, _)| name.contains(needle))
            .map(|(_, bounds)| *bounds)
            .unwrap_or(RangeBounds::new(0.0, 100.0, 1.0))
    }
}

/// The control an attribute is presented with, carrying its visual state.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Toggle { on: bool },
    /// Slider and numeric field showing the same value.
    Range { value: f64, bounds: RangeBounds },
    Select { value: String, options: Vec<String> },
    /// Inert textual display.
    Display { text: String },
}

impl Control {
    /// Pick the control family from the value's runtime type.
    pub fn for_value(attribute: &str, value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Bool(on) => Control::Toggle { on: *on },
            AttributeValue::Number(n) => Control::Range {
                value: *n,
                bounds: RangeBounds::for_attribute(attribute),
            },
            AttributeValue::Text(s) => Control::Select {
                value: s.clone(),
                options: select_options(attribute, s),
            },
            AttributeValue::Other(v) => Control::Display {
                text: v.to_string(),
            },
        }
    }

    /// Move the visual state to `value` without changing the control family.
    ///
    /// Returns `false` if the value's type does not fit this control; the
    /// caller should rebuild the binding instead.
    pub fn reflect(&mut self, value: &AttributeValue) -> bool {
        match (self, value) {
            (Control::Toggle { on }, AttributeValue::Bool(b)) => *on = *b,
            (Control::Range { value: current, .. }, AttributeValue::Number(n)) => *current = *n,
            (Control::Select { value: current, options }, AttributeValue::Text(s)) => {
                if !options.contains(s) {
                    // Placeholder selectors only ever offer the current value.
                    if options.len() == 1 {
                        options[0] = s.clone();
                    } else {
                        return false;
                    }
                }
                *current = s.clone();
            }
            (Control::Display { text }, AttributeValue::Other(v)) => *text = v.to_string(),
            _ => return false,
        }
        true
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Control::Toggle { .. } => "toggle",
            Control::Range { .. } => "range",
            Control::Select { .. } => "select",
            Control::Display { .. } => "display",
        }
    }
}

fn select_options(attribute: &str, current: &str) -> Vec<String> {
    if attribute == MODE_ATTRIBUTE {
        MODE_OPTIONS.iter().map(|s| s.to_string()).collect()
    } else {
        vec![current.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bounds_follow_name_heuristics_in_order() {
        assert_eq!(RangeBounds::for_attribute("brightness"), RangeBounds::new(0.0, 100.0, 1.0));
        assert_eq!(RangeBounds::for_attribute("temperature"), RangeBounds::new(0.0, 50.0, 0.1));
        assert_eq!(RangeBounds::for_attribute("humidity"), RangeBounds::new(0.0, 100.0, 0.1));
        assert_eq!(RangeBounds::for_attribute("lux"), RangeBounds::new(0.0, 2000.0, 1.0));
        assert_eq!(RangeBounds::for_attribute("setpoint"), RangeBounds::new(5.0, 35.0, 1.0));
        assert_eq!(RangeBounds::for_attribute("volume"), RangeBounds::new(0.0, 100.0, 1.0));
        assert_eq!(RangeBounds::for_attribute("Temperature"), RangeBounds::new(0.0, 100.0, 1.0));
        // "temperature_setpoint" hits temperature first.
        assert_eq!(
            RangeBounds::for_attribute("temperature_setpoint"),
            RangeBounds::new(0.0, 50.0, 0.1)
        );
    }

    #[test]
    fn control_family_follows_runtime_type() {
        assert_eq!(
            Control::for_value("power", &AttributeValue::Bool(true)),
            Control::Toggle { on: true }
        );
        assert_eq!(
            Control::for_value("brightness", &AttributeValue::Number(42.0)).kind(),
            "range"
        );
        assert_eq!(
            Control::for_value("mode", &AttributeValue::Text("heat".into())),
            Control::Select {
                value: "heat".into(),
                options: vec!["auto".into(), "heat".into(), "cool".into()],
            }
        );
        assert_eq!(
            Control::for_value("firmware", &AttributeValue::Text("1.2".into())),
            Control::Select {
                value: "1.2".into(),
                options: vec!["1.2".into()],
            }
        );
        assert_eq!(
            Control::for_value("history", &AttributeValue::Other(json!([1, 2]))),
            Control::Display { text: "[1,2]".into() }
        );
    }

    #[test]
    fn reflect_refuses_a_type_change() {
        let mut control = Control::Toggle { on: false };
        assert!(control.reflect(&AttributeValue::Bool(true)));
        assert_eq!(control, Control::Toggle { on: true });
        assert!(!control.reflect(&AttributeValue::Number(1.0)));
    }

    #[test]
    fn placeholder_selector_follows_new_value() {
        let mut control = Control::for_value("firmware", &AttributeValue::Text("1.2".into()));
        assert!(control.reflect(&AttributeValue::Text("1.3".into())));
        assert_eq!(
            control,
            Control::Select {
                value: "1.3".into(),
                options: vec!["1.3".into()],
            }
        );
    }
}
