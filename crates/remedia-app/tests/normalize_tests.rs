// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use remedia_app::{ResultPayload, ResultView, SectionItem, SectionKind};
use remedia_testkit::PayloadFaker;
use serde_json::Value;

fn field_for(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Medications => "medications",
        SectionKind::Precautions => "precautions",
        SectionKind::Diet => "diet",
        SectionKind::Workout => "workout",
        SectionKind::Calendar => "calendar_links",
        SectionKind::Pharmacies => "pharmacies",
    }
}

fn is_plan(kind: SectionKind) -> bool {
    matches!(kind, SectionKind::Diet | SectionKind::Workout)
}

fn render(body: &Value) -> ResultView {
    ResultView::from_payload(&ResultPayload::from_value(body))
}

#[test]
fn sequence_sections_match_array_length_or_show_one_placeholder() {
    for seed in 0_u64..200_u64 {
        let mut faker = PayloadFaker::new(seed);
        let body = faker.payload();
        let view = render(&body);

        for kind in SectionKind::ALL.into_iter().filter(|kind| !is_plan(*kind)) {
            let section = view.section(kind).expect("every section is rendered");
            let data = section.data_items().count();
            let placeholders = section.items.len() - data;
            match body.get(field_for(kind)).and_then(Value::as_array) {
                Some(items) => {
                    assert_eq!(data, items.len(), "seed {seed} {kind:?}");
                    assert_eq!(placeholders, 0, "seed {seed} {kind:?}");
                }
                None => {
                    assert_eq!(data, 0, "seed {seed} {kind:?}");
                    assert_eq!(
                        section.items,
                        vec![SectionItem::Placeholder(kind.placeholder())],
                        "seed {seed} {kind:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn plan_sections_follow_mapping_keys_or_show_no_plan() {
    for seed in 0_u64..200_u64 {
        let mut faker = PayloadFaker::new(seed);
        let body = faker.payload();
        let view = render(&body);

        for kind in [SectionKind::Diet, SectionKind::Workout] {
            let section = view.section(kind).expect("plan section is rendered");
            let days = body
                .get(field_for(kind))
                .and_then(Value::as_object)
                .filter(|days| !days.is_empty());
            match days {
                Some(days) => {
                    let labels = section
                        .items
                        .iter()
                        .map(|item| match item {
                            SectionItem::Day { label, .. } => label.clone(),
                            other => panic!("seed {seed}: unexpected item {other:?}"),
                        })
                        .collect::<Vec<_>>();
                    let expected = days
                        .keys()
                        .map(|day| format!("Day {day}"))
                        .collect::<Vec<_>>();
                    assert_eq!(labels, expected, "seed {seed} {kind:?}");
                }
                None => {
                    assert_eq!(
                        section.items,
                        vec![SectionItem::Placeholder("No plan generated")],
                        "seed {seed} {kind:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn full_payload_renders_without_placeholders() {
    for seed in 1_u64..20_u64 {
        let mut faker = PayloadFaker::new(seed);
        let body = faker.full_payload();
        let view = render(&body);

        assert!(view.heading.starts_with("🩺 Disease: "));
        assert_ne!(view.heading, "🩺 Disease: ");
        assert!(!view.description.is_empty());
        for section in &view.sections {
            assert!(
                section.items.iter().all(|item| !item.is_placeholder()),
                "seed {seed} {:?}",
                section.kind
            );
        }
    }
}

#[test]
fn pharmacy_items_keep_service_names_in_order() {
    let mut faker = PayloadFaker::new(11);
    let pharmacies = faker.pharmacies(3);
    let body = serde_json::json!({ "pharmacies": pharmacies.clone() });
    let view = render(&body);

    let rendered = view
        .section(SectionKind::Pharmacies)
        .expect("pharmacies section")
        .items
        .iter()
        .map(|item| match item {
            SectionItem::Pharmacy { name, .. } => name.clone(),
            other => panic!("unexpected item {other:?}"),
        })
        .collect::<Vec<_>>();
    let expected = pharmacies
        .as_array()
        .expect("pharmacies array")
        .iter()
        .map(|record| record["Medical Store Name"].as_str().unwrap_or("").to_owned())
        .collect::<Vec<_>>();
    assert_eq!(rendered, expected);
}
