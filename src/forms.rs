//! Form validation plumbing
//!
//! Each view owns a plain form struct; validation produces per-control error
//! maps keyed by error kind (`required`, `min`, `max`, `server`). Backend
//! field errors are merged under the `server` key without touching the keys
//! other validators own, and are the only thing `clear_server_errors`
//! removes.

use std::collections::BTreeMap;

pub const REQUIRED: &str = "required";
pub const MIN: &str = "min";
pub const MAX: &str = "max";
pub const SERVER: &str = "server";

/// Error kinds for one control, e.g. `{"min": "...", "server": "..."}`
pub type ControlErrors = BTreeMap<&'static str, String>;

/// Validation state of a whole form, keyed by control name
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    controls: BTreeMap<String, ControlErrors>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn add(&mut self, control: &str, kind: &'static str, message: impl Into<String>) {
        self.controls
            .entry(control.to_string())
            .or_default()
            .insert(kind, message.into());
    }

    pub fn control(&self, name: &str) -> Option<&ControlErrors> {
        self.controls.get(name)
    }

    pub fn has(&self, control: &str, kind: &str) -> bool {
        self.controls
            .get(control)
            .is_some_and(|errors| errors.contains_key(kind))
    }

    /// Merge backend field errors under the `server` key
    pub fn apply_server_errors(&mut self, errors: &BTreeMap<String, String>) {
        for (field, message) in errors {
            self.add(field, SERVER, message.clone());
        }
    }

    /// Drop `server` entries only; client-side validator results stay intact
    pub fn clear_server_errors(&mut self) {
        for errors in self.controls.values_mut() {
            errors.remove(SERVER);
        }
        self.controls.retain(|_, errors| !errors.is_empty());
    }

    /// Keep `server` entries from a previous validation round while the
    /// client-side keys are being recomputed
    pub fn carry_server_errors_from(&mut self, previous: &FormErrors) {
        for (control, errors) in &previous.controls {
            if let Some(message) = errors.get(SERVER) {
                self.add(control, SERVER, message.clone());
            }
        }
    }

    /// Flat list for rendering, `(control, kind, message)`
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.controls.iter().flat_map(|(control, errors)| {
            errors
                .iter()
                .map(move |(kind, message)| (control.as_str(), *kind, message.as_str()))
        })
    }
}

pub fn require_text(errors: &mut FormErrors, control: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(control, REQUIRED, "Pflichtfeld");
    }
}

pub fn require_some<T>(errors: &mut FormErrors, control: &str, value: &Option<T>) {
    if value.is_none() {
        errors.add(control, REQUIRED, "Pflichtfeld");
    }
}

pub fn min_i32(errors: &mut FormErrors, control: &str, value: i32, min: i32) {
    if value < min {
        errors.add(control, MIN, format!("Mindestens {min}"));
    }
}

pub fn max_i32(errors: &mut FormErrors, control: &str, value: i32, max: i32) {
    if value > max {
        errors.add(control, MAX, format!("Höchstens {max}"));
    }
}

pub fn min_f64(errors: &mut FormErrors, control: &str, value: f64, min: f64) {
    if value < min {
        errors.add(control, MIN, format!("Mindestens {min}"));
    }
}
