// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{DayEntry, PlanDetails, ResultPayload};

pub const NO_PLAN_PLACEHOLDER: &str = "No plan generated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Medications,
    Precautions,
    Diet,
    Workout,
    Calendar,
    Pharmacies,
}

impl SectionKind {
    pub const ALL: [Self; 6] = [
        Self::Medications,
        Self::Precautions,
        Self::Diet,
        Self::Workout,
        Self::Calendar,
        Self::Pharmacies,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Medications => "💊 Recommended Medications",
            Self::Precautions => "⚠️ Precautions",
            Self::Diet => "🥗 AI-Generated Diet Plan",
            Self::Workout => "🏋️ AI-Generated Workout Plan",
            Self::Calendar => "🗓️ Add to Calendar",
            Self::Pharmacies => "🏪 Nearby Pharmacies",
        }
    }

    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Medications => "No medications recommended",
            Self::Precautions => "No precautions listed",
            Self::Diet | Self::Workout => NO_PLAN_PLACEHOLDER,
            Self::Calendar => "No calendar links",
            Self::Pharmacies => "No pharmacies found",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionItem {
    Placeholder(&'static str),
    Text(String),
    Day { label: String, lines: Vec<String> },
    Link { label: String, url: String },
    Pharmacy { name: String, address: String },
}

impl SectionItem {
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub items: Vec<SectionItem>,
}

impl Section {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn data_items(&self) -> impl Iterator<Item = &SectionItem> {
        self.items.iter().filter(|item| !item.is_placeholder())
    }
}

/// Render-ready form of a [`ResultPayload`]: the heading, the description and
/// one section per [`SectionKind`] in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub heading: String,
    pub description: String,
    pub sections: Vec<Section>,
}

impl ResultView {
    pub fn from_payload(payload: &ResultPayload) -> Self {
        let sections = SectionKind::ALL
            .into_iter()
            .map(|kind| Section {
                kind,
                items: section_items(kind, payload),
            })
            .collect();

        Self {
            heading: format!("🩺 Disease: {}", payload.disease.as_deref().unwrap_or("")),
            description: payload.description.clone().unwrap_or_default(),
            sections,
        }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| section.kind == kind)
    }
}

fn section_items(kind: SectionKind, payload: &ResultPayload) -> Vec<SectionItem> {
    let mapped = match kind {
        SectionKind::Diet => return render_plan(payload.diet.as_deref()),
        SectionKind::Workout => return render_plan(payload.workout.as_deref()),
        SectionKind::Medications => safe_map(payload.medications.as_deref(), |_, medication| {
            SectionItem::Text(medication.clone())
        }),
        SectionKind::Precautions => safe_map(payload.precautions.as_deref(), |_, precaution| {
            SectionItem::Text(precaution.clone())
        }),
        SectionKind::Calendar => {
            safe_map(payload.calendar_links.as_deref(), |index, url| SectionItem::Link {
                label: calendar_label(index),
                url: url.clone(),
            })
        }
        SectionKind::Pharmacies => safe_map(payload.pharmacies.as_deref(), |_, pharmacy| {
            SectionItem::Pharmacy {
                name: pharmacy.name.clone(),
                address: pharmacy.address.clone(),
            }
        }),
    };
    mapped.unwrap_or_else(|| vec![SectionItem::Placeholder(kind.placeholder())])
}

/// Maps a sequence that may be absent. `None` tells the caller to show its
/// placeholder; a present but empty sequence maps to no items at all.
pub fn safe_map<T>(
    items: Option<&[T]>,
    render: impl Fn(usize, &T) -> SectionItem,
) -> Option<Vec<SectionItem>> {
    items.map(|items| {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| render(index, item))
            .collect()
    })
}

/// One fragment per day in the order the service sent them. An absent plan
/// or one without days becomes the single "No plan generated" placeholder.
pub fn render_plan<T: PlanDetails>(plan: Option<&[DayEntry<T>]>) -> Vec<SectionItem> {
    match plan {
        Some(days) if !days.is_empty() => days
            .iter()
            .map(|entry| SectionItem::Day {
                label: format!("Day {}", entry.day),
                lines: entry.details.detail_lines(),
            })
            .collect(),
        _ => vec![SectionItem::Placeholder(NO_PLAN_PLACEHOLDER)],
    }
}

/// Links alternate morning/breakfast slots, two per day.
pub fn calendar_label(index: usize) -> String {
    let day = index / 2 + 1;
    let slot = if index % 2 == 0 {
        "☀️ Morning"
    } else {
        "🍳 Breakfast"
    };
    format!("Day {day} {slot}")
}
