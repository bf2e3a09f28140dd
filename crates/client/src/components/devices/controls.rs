//! Controls for one attribute. Inputs become intents; the shown values come
//! from the published card.

use dioxus::prelude::*;

use crate::projector::{Control, WidgetBinding};
use crate::ws::use_sync_handle;

#[component]
pub fn ControlRow(device: String, binding: WidgetBinding) -> Element {
    let attribute = binding.attribute.clone();

    rsx! {
        div { class: "control-row",
            label { class: "control-label", "{binding.attribute}" }
            div { class: "control-input",
                match binding.control {
                    Control::Toggle { on } => rsx! {
                        ToggleControl { device, attribute, on }
                    },
                    Control::Range { value, bounds } => rsx! {
                        RangeControl {
                            device,
                            attribute,
                            value,
                            min: bounds.min,
                            max: bounds.max,
                            step: bounds.step,
                        }
                    },
                    Control::Select { value, options } => rsx! {
                        SelectControl { device, attribute, value, options }
                    },
                    Control::Display { text } => rsx! {
                        span { class: "control-display", "{text}" }
                    },
                }
            }
        }
    }
}

#[component]
fn ToggleControl(device: String, attribute: String, on: bool) -> Element {
    let handle = use_sync_handle();

    rsx! {
        label { class: "switch",
            input {
                r#type: "checkbox",
                checked: on,
                onchange: move |_| handle.toggle(&device, &attribute),
            }
            span { class: "switch-track" }
        }
    }
}

/// Slider and numeric field kept in sync. The slider is debounced by the sync
/// task; the field sends on commit.
#[component]
fn RangeControl(
    device: String,
    attribute: String,
    value: f64,
    min: f64,
    max: f64,
    step: f64,
) -> Element {
    let slide_handle = use_sync_handle();
    let commit_handle = slide_handle.clone();
    let (slide_device, slide_attribute) = (device.clone(), attribute.clone());

    rsx! {
        input {
            class: "slider",
            r#type: "range",
            min: "{min}",
            max: "{max}",
            step: "{step}",
            value: "{value}",
            oninput: move |evt| {
                if let Ok(v) = evt.value().parse::<f64>() {
                    slide_handle.slide(&slide_device, &slide_attribute, v);
                }
            },
        }
        input {
            class: "number",
            r#type: "number",
            step: "{step}",
            value: "{value}",
            onchange: move |evt| commit_handle.commit_number(&device, &attribute, &evt.value()),
        }
    }
}

#[component]
fn SelectControl(
    device: String,
    attribute: String,
    value: String,
    options: Vec<String>,
) -> Element {
    let handle = use_sync_handle();

    rsx! {
        select {
            class: "select",
            value: "{value}",
            onchange: move |evt| handle.select(&device, &attribute, &evt.value()),
            for choice in options.iter() {
                option {
                    key: "{choice}",
                    value: "{choice}",
                    selected: *choice == value,
                    "{choice}"
                }
            }
        }
    }
}
