use crate::data::{Field, FieldValue, Observation};
use crate::utils::{signed_decimal_delta, signed_delta};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub field: Field,
    pub previous: Option<FieldValue>,
    pub current: Option<FieldValue>,
    pub rendered: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeReport {
    pub is_first_run: bool,
    pub changed: bool,
    pub changes: Vec<ChangeRecord>,
}

impl ChangeReport {
    fn baseline() -> Self {
        ChangeReport {
            is_first_run: true,
            changed: true,
            changes: vec![],
        }
    }
}

/// Compares every tracked field of `current` against `previous`.
///
/// Numbers compare by value, text compares literally, a number never equals
/// a string, and a field that is missing on one side counts as changed.
pub fn detect(previous: Option<&Observation>, current: &Observation) -> ChangeReport {
    let Some(previous) = previous else {
        return ChangeReport::baseline();
    };

    let changes: Vec<ChangeRecord> = Field::ALL
        .into_iter()
        .filter_map(|field| {
            let (old, new) = (previous.get(field), current.get(field));
            if old == new {
                return None;
            }
            Some(ChangeRecord {
                field,
                previous: old.cloned(),
                current: new.cloned(),
                rendered: render_change(field, old, new),
            })
        })
        .collect();

    ChangeReport {
        is_first_run: false,
        changed: !changes.is_empty(),
        changes,
    }
}

fn render_change(field: Field, old: Option<&FieldValue>, new: Option<&FieldValue>) -> String {
    let mut line = format!(
        "{} {}: {} → {}",
        field.emoji(),
        field.label(),
        field.display(old),
        field.display(new)
    );

    let delta = match (old, new) {
        (Some(FieldValue::Number(old)), Some(FieldValue::Number(new))) => {
            Some(signed_delta(new.saturating_sub(*old)))
        }
        (Some(old), Some(new)) => old
            .as_f64()
            .zip(new.as_f64())
            .map(|(old, new)| signed_decimal_delta(new - old)),
        _ => None,
    };
    if let Some(delta) = delta {
        line.push_str(&format!(" ({}{})", delta, field.unit()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Fields;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn observation(fields: Fields) -> Observation {
        let ts = DateTime::parse_from_rfc3339("2024-05-01T09:00:00+09:00").unwrap();
        Observation::new(fields, "https://kibidango.com/2879", ts)
    }

    fn full(supporters: i64) -> Observation {
        observation(Fields {
            amount: Some(FieldValue::Number(1_000_000)),
            supporters: Some(FieldValue::Number(supporters)),
            achievement_rate: Some(FieldValue::Number(80)),
            days_left: Some(FieldValue::Number(10)),
            activity_count: Some(FieldValue::Number(3)),
        })
    }

    #[test]
    fn test_first_run_is_baseline() {
        let report = detect(None, &full(100));
        assert_eq!(
            report,
            ChangeReport {
                is_first_run: true,
                changed: true,
                changes: vec![],
            }
        );
    }

    #[test]
    fn test_same_observation_has_no_changes() {
        let obs = full(100);
        let report = detect(Some(&obs), &obs);
        assert!(!report.is_first_run);
        assert!(!report.changed);
        assert!(report.changes.is_empty());
    }

    #[test]
    fn test_timestamp_is_not_tracked() {
        let old = full(100);
        let mut new = full(100);
        new.timestamp = DateTime::parse_from_rfc3339("2024-05-02T09:00:00+09:00").unwrap();
        assert!(!detect(Some(&old), &new).changed);
    }

    #[test]
    fn test_single_field_delta() {
        let report = detect(Some(&full(100)), &full(150));

        assert!(report.changed);
        assert_eq!(report.changes.len(), 1);
        let change = &report.changes[0];
        assert_eq!(change.field, Field::Supporters);
        assert_eq!(change.previous, Some(FieldValue::Number(100)));
        assert_eq!(change.current, Some(FieldValue::Number(150)));
        assert_eq!(change.rendered, "👥 支援者数: 100人 → 150人 (+50人)");
    }

    #[test]
    fn test_negative_delta_is_grouped() {
        let old = full(100);
        let mut new = full(100);
        new.fields.amount = Some(FieldValue::Number(800_000));

        let report = detect(Some(&old), &new);
        assert_eq!(
            report.changes[0].rendered,
            "💰 支援金額: 1,000,000円 → 800,000円 (-200,000円)"
        );
    }

    #[test]
    fn test_appearing_field_is_a_change() {
        let old = observation(Fields {
            amount: Some(FieldValue::Number(100)),
            ..Fields::default()
        });
        let new = observation(Fields {
            amount: Some(FieldValue::Number(100)),
            supporters: Some(FieldValue::Number(5)),
            ..Fields::default()
        });

        let report = detect(Some(&old), &new);
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].field, Field::Supporters);
        assert_eq!(report.changes[0].previous, None);
        assert_eq!(report.changes[0].current, Some(FieldValue::Number(5)));
        assert_eq!(report.changes[0].rendered, "👥 支援者数: N/A → 5人");
    }

    #[test]
    fn test_number_and_text_are_different() {
        let old = observation(Fields {
            supporters: Some(FieldValue::from("50")),
            ..Fields::default()
        });
        let new = observation(Fields {
            supporters: Some(FieldValue::Number(50)),
            ..Fields::default()
        });

        let report = detect(Some(&old), &new);
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].rendered, "👥 支援者数: 50 → 50人");
    }

    #[test]
    fn test_float_delta() {
        let old = observation(Fields {
            achievement_rate: Some(FieldValue::Float(80.1)),
            ..Fields::default()
        });
        let new = observation(Fields {
            achievement_rate: Some(FieldValue::Number(96)),
            ..Fields::default()
        });

        let report = detect(Some(&old), &new);
        assert_eq!(report.changes[0].rendered, "📈 達成率: 80.1% → 96% (+15.9%)");
    }

    #[test]
    fn test_integral_float_is_unchanged() {
        let old = observation(Fields {
            days_left: Some(FieldValue::Float(8.0)),
            ..Fields::default()
        });
        let new = observation(Fields {
            days_left: Some(FieldValue::Number(8)),
            ..Fields::default()
        });
        assert!(!detect(Some(&old), &new).changed);
    }

    #[test]
    fn test_all_fields_in_order() {
        let old = observation(Fields {
            amount: Some(FieldValue::from("1,000,000円")),
            supporters: Some(FieldValue::Number(50)),
            achievement_rate: Some(FieldValue::from("80%")),
            days_left: Some(FieldValue::Number(10)),
            activity_count: Some(FieldValue::Number(3)),
        });
        let new = observation(Fields {
            amount: Some(FieldValue::from("1,200,000円")),
            supporters: Some(FieldValue::Number(60)),
            achievement_rate: Some(FieldValue::from("96%")),
            days_left: Some(FieldValue::Number(8)),
            activity_count: Some(FieldValue::Number(4)),
        });

        let report = detect(Some(&old), &new);
        let rendered: Vec<&str> = report.changes.iter().map(|c| c.rendered.as_str()).collect();
        assert_eq!(
            rendered,
            vec![
                "💰 支援金額: 1,000,000円 → 1,200,000円",
                "👥 支援者数: 50人 → 60人 (+10人)",
                "📈 達成率: 80% → 96%",
                "⏰ 残り日数: 10日 → 8日 (-2日)",
                "📝 活動報告: 3件 → 4件 (+1件)",
            ]
        );
        assert_eq!(detect(Some(&old), &new), report);
    }
}
