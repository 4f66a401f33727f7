// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value, json};
use std::io::Read;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tiny_http::{Header, Response, Server};

pub const PREDICT_PATH: &str = "/predict";

const DISEASES: [&str; 8] = [
    "Common Cold",
    "Influenza",
    "Migraine",
    "Gastroenteritis",
    "Allergic Rhinitis",
    "Dengue",
    "Typhoid",
    "Hypertension",
];

const MEDICATIONS: [&str; 10] = [
    "Paracetamol",
    "Ibuprofen",
    "Cetirizine",
    "ORS",
    "Amoxicillin",
    "Omeprazole",
    "Loratadine",
    "Sumatriptan",
    "Azithromycin",
    "Vitamin C",
];

const PRECAUTIONS: [&str; 8] = [
    "Drink plenty of fluids",
    "Get adequate rest",
    "Avoid cold drinks",
    "Wash hands frequently",
    "Avoid crowded places",
    "Use a mosquito net",
    "Eat freshly cooked food",
    "Consult a doctor if symptoms persist",
];

const BREAKFASTS: [&str; 6] = ["Oats", "Idli", "Poha", "Upma", "Fruit bowl", "Dosa"];
const LUNCHES: [&str; 6] = [
    "Dal rice",
    "Curd rice",
    "Vegetable khichdi",
    "Roti sabzi",
    "Rajma chawal",
    "Lemon rice",
];
const DINNERS: [&str; 6] = [
    "Soup",
    "Khichdi",
    "Grilled paneer",
    "Moong dal",
    "Vegetable stew",
    "Chapati",
];

const WORKOUTS: [&str; 6] = [
    "Walk 20 minutes",
    "Light stretching",
    "Breathing exercises",
    "Yoga 15 minutes",
    "Rest day",
    "Cycling 10 minutes",
];

const PHARMACY_ADJECTIVES: [&str; 6] = [
    "Apollo", "Wellness", "Care", "City", "Sri Sai", "Lifeline",
];
const PHARMACY_SUFFIXES: [&str; 4] = ["Pharmacy", "Medicals", "Chemists", "Drug House"];
const STREETS: [&str; 6] = [
    "MG Road",
    "Ring Road",
    "Station Road",
    "Main Bazaar",
    "Park Street",
    "Temple Road",
];

const OPTIONAL_FIELDS: [&str; 8] = [
    "disease",
    "description",
    "medications",
    "precautions",
    "diet",
    "workout",
    "calendar_links",
    "pharmacies",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// How a faked field appears in a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Missing,
    Valid,
    WrongType,
}

/// Seeded generator for prediction response bodies, including the malformed
/// shapes a loosely typed service can send.
#[derive(Debug, Clone)]
pub struct PayloadFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl PayloadFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn shape(&mut self) -> FieldShape {
        match self.int_n(4) {
            0 => FieldShape::Missing,
            1 => FieldShape::WrongType,
            _ => FieldShape::Valid,
        }
    }

    pub fn disease(&mut self) -> String {
        self.pick(&DISEASES).to_owned()
    }

    pub fn medications(&mut self, count: usize) -> Value {
        Value::Array(
            (0..count)
                .map(|_| Value::String(self.pick(&MEDICATIONS).to_owned()))
                .collect(),
        )
    }

    pub fn precautions(&mut self, count: usize) -> Value {
        Value::Array(
            (0..count)
                .map(|_| Value::String(self.pick(&PRECAUTIONS).to_owned()))
                .collect(),
        )
    }

    pub fn diet(&mut self, days: usize) -> Value {
        let mut plan = Map::new();
        for day in 1..=days {
            plan.insert(
                day.to_string(),
                json!({
                    "breakfast": self.pick(&BREAKFASTS),
                    "lunch": self.pick(&LUNCHES),
                    "dinner": self.pick(&DINNERS),
                }),
            );
        }
        Value::Object(plan)
    }

    pub fn workout(&mut self, days: usize) -> Value {
        let mut plan = Map::new();
        for day in 1..=days {
            plan.insert(day.to_string(), Value::String(self.pick(&WORKOUTS).to_owned()));
        }
        Value::Object(plan)
    }

    pub fn calendar_links(&mut self, count: usize) -> Value {
        Value::Array(
            (0..count)
                .map(|index| {
                    Value::String(format!(
                        "https://calendar.example.com/event?slot={index}&id={}",
                        self.int_n(100_000)
                    ))
                })
                .collect(),
        )
    }

    pub fn pharmacies(&mut self, count: usize) -> Value {
        Value::Array(
            (0..count)
                .map(|_| {
                    json!({
                        "Medical Store Name": format!(
                            "{} {}",
                            self.pick(&PHARMACY_ADJECTIVES),
                            self.pick(&PHARMACY_SUFFIXES)
                        ),
                        "Address": format!("{} {}", self.int_n(400) + 1, self.pick(&STREETS)),
                    })
                })
                .collect(),
        )
    }

    /// A body where every field is present and well formed.
    pub fn full_payload(&mut self) -> Value {
        let disease = self.disease();
        let medications = self.int_n(4) + 1;
        let precautions = self.int_n(4) + 1;
        let days = self.int_n(3) + 1;
        let pharmacies = self.int_n(3) + 1;
        json!({
            "disease": disease,
            "description": format!("{disease} detected from the reported symptoms."),
            "medications": self.medications(medications),
            "precautions": self.precautions(precautions),
            "diet": self.diet(days),
            "workout": self.workout(days),
            "calendar_links": self.calendar_links(days * 2),
            "pharmacies": self.pharmacies(pharmacies),
        })
    }

    /// A body where each field is independently missing, valid (possibly
    /// empty) or of the wrong JSON type.
    pub fn payload(&mut self) -> Value {
        let mut body = Map::new();
        for field in OPTIONAL_FIELDS {
            let value = match self.shape() {
                FieldShape::Missing => continue,
                FieldShape::WrongType => self.wrong_type_for(field),
                FieldShape::Valid => self.valid_value_for(field),
            };
            body.insert(field.to_owned(), value);
        }
        Value::Object(body)
    }

    fn valid_value_for(&mut self, field: &str) -> Value {
        let count = self.int_n(5);
        match field {
            "disease" => Value::String(self.disease()),
            "description" => Value::String("Generated description.".to_owned()),
            "medications" => self.medications(count),
            "precautions" => self.precautions(count),
            "diet" => self.diet(count),
            "workout" => self.workout(count),
            "calendar_links" => self.calendar_links(count),
            _ => self.pharmacies(count),
        }
    }

    fn wrong_type_for(&mut self, field: &str) -> Value {
        let is_sequence = matches!(
            field,
            "medications" | "precautions" | "calendar_links" | "pharmacies"
        );
        match self.int_n(3) {
            0 => Value::Null,
            1 if is_sequence => json!({"0": "not a list"}),
            1 => json!(["not", "a", "mapping"]),
            _ => json!(true),
        }
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.int_n(values.len())]
    }
}

pub fn optional_fields() -> &'static [&'static str] {
    &OPTIONAL_FIELDS
}

/// Address nothing listens on; connections are refused immediately.
pub fn unreachable_endpoint() -> &'static str {
    "http://127.0.0.1:1/predict"
}

pub fn write_temp_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content)
        .with_context(|| format!("write temp config {}", path.display()))?;
    Ok((dir, path))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl MockResponse {
    pub fn json(body: &Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Prediction service stand-in. Answers the given responses in order, one
/// per request, then stops accepting connections.
pub struct MockPredictServer {
    endpoint: String,
    handle: JoinHandle<Result<Vec<RecordedRequest>>>,
}

impl MockPredictServer {
    pub fn start(responses: Vec<MockResponse>) -> Result<Self> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let endpoint = format!("http://{}{PREDICT_PATH}", server.server_addr());

        let handle = thread::spawn(move || {
            let mut recorded = Vec::with_capacity(responses.len());
            for canned in responses {
                let mut request = server.recv().context("receive mock request")?;
                let mut body = String::new();
                request
                    .as_reader()
                    .read_to_string(&mut body)
                    .context("read mock request body")?;
                let content_type = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Content-Type"))
                    .map(|header| header.value.as_str().to_owned());
                recorded.push(RecordedRequest {
                    method: request.method().to_string(),
                    url: request.url().to_owned(),
                    content_type,
                    body,
                });

                if !canned.delay.is_zero() {
                    thread::sleep(canned.delay);
                }
                let header = Header::from_bytes("Content-Type", "application/json")
                    .map_err(|_| anyhow!("build content type header"))?;
                let response = Response::from_string(canned.body)
                    .with_status_code(canned.status)
                    .with_header(header);
                // The client may have timed out and hung up already.
                let _ = request.respond(response);
            }
            Ok(recorded)
        });

        Ok(Self { endpoint, handle })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn finish(self) -> Result<Vec<RecordedRequest>> {
        self.handle
            .join()
            .map_err(|_| anyhow!("mock server thread panicked"))?
    }
}
