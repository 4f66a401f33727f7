// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const BACKEND_UNREACHABLE_MESSAGE: &str =
    "Could not connect to backend. Make sure the prediction service is running!";

/// Wire key the prediction service uses for a pharmacy's name.
const PHARMACY_NAME_KEY: &str = "Medical Store Name";
const PHARMACY_ADDRESS_KEY: &str = "Address";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub symptoms: String,
    pub pincode: String,
}

/// Every way a submission can fail, collapsed into one kind. Status codes,
/// connection errors and decode errors are not distinguished once they reach
/// the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendUnreachable;

impl std::fmt::Display for BackendUnreachable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(BACKEND_UNREACHABLE_MESSAGE)
    }
}

impl std::error::Error for BackendUnreachable {}

pub type Outcome = Result<ResultPayload, BackendUnreachable>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pharmacy {
    pub name: String,
    pub address: String,
}

impl Pharmacy {
    fn from_value(value: &Value) -> Self {
        let Some(record) = value.as_object() else {
            return Self::default();
        };
        Self {
            name: first_text(record, &[PHARMACY_NAME_KEY, "name"]),
            address: first_text(record, &[PHARMACY_ADDRESS_KEY, "address"]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealPlan {
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry<T> {
    pub day: String,
    pub details: T,
}

/// Per-day details of a day-keyed plan. The implementing type decides both
/// how a day's JSON value is read and which lines it renders as.
pub trait PlanDetails: Sized {
    fn from_value(value: &Value) -> Self;
    fn detail_lines(&self) -> Vec<String>;
}

impl PlanDetails for String {
    fn from_value(value: &Value) -> Self {
        display_text(value)
    }

    fn detail_lines(&self) -> Vec<String> {
        vec![format!("🏋️ {self}")]
    }
}

impl PlanDetails for MealPlan {
    fn from_value(value: &Value) -> Self {
        let Some(meals) = value.as_object() else {
            return Self::default();
        };
        Self {
            breakfast: first_text(meals, &["breakfast"]),
            lunch: first_text(meals, &["lunch"]),
            dinner: first_text(meals, &["dinner"]),
        }
    }

    fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("🍳 Breakfast: {}", self.breakfast),
            format!("🍲 Lunch: {}", self.lunch),
            format!("🍛 Dinner: {}", self.dinner),
        ]
    }
}

pub type DayPlan<T> = Vec<DayEntry<T>>;

/// Recommendation response after normalization. `None` means the field was
/// missing or had the wrong JSON type; the renderer shows a placeholder for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPayload {
    pub disease: Option<String>,
    pub description: Option<String>,
    pub medications: Option<Vec<String>>,
    pub precautions: Option<Vec<String>>,
    pub diet: Option<DayPlan<MealPlan>>,
    pub workout: Option<DayPlan<String>>,
    pub calendar_links: Option<Vec<String>>,
    pub pharmacies: Option<Vec<Pharmacy>>,
}

impl ResultPayload {
    /// Reads a response body of unknown shape. Never fails: fields with the
    /// wrong type are dropped individually, and a body that is not an object
    /// yields a payload with every field absent.
    pub fn from_value(value: &Value) -> Self {
        let Some(body) = value.as_object() else {
            return Self::default();
        };

        Self {
            disease: scalar_text(body.get("disease")),
            description: scalar_text(body.get("description")),
            medications: sequence(body.get("medications"), display_text),
            precautions: sequence(body.get("precautions"), display_text),
            diet: day_plan(body.get("diet")),
            workout: day_plan(body.get("workout")),
            calendar_links: sequence(body.get("calendar_links"), display_text),
            pharmacies: sequence(body.get("pharmacies"), Pharmacy::from_value),
        }
    }
}

/// Text for a JSON value shown inline. Null and booleans show nothing; nested
/// arrays and objects show as compact JSON.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Null | Value::Bool(_) => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn sequence<T>(value: Option<&Value>, item: impl Fn(&Value) -> T) -> Option<Vec<T>> {
    let items = value?.as_array()?;
    Some(items.iter().map(item).collect())
}

fn day_plan<T: PlanDetails>(value: Option<&Value>) -> Option<DayPlan<T>> {
    let days = value?.as_object()?;
    Some(
        days.iter()
            .map(|(day, details)| DayEntry {
                day: day.clone(),
                details: T::from_value(details),
            })
            .collect(),
    )
}

fn first_text(record: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| record.get(*key))
        .map(display_text)
        .unwrap_or_default()
}
