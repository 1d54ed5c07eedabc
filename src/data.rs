use crate::utils::{group_decimal, group_thousands};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single extracted value. Older snapshots store display strings such as
/// `"1,234,567円"`, newer ones store the parsed number. Non-integer numbers
/// written by hand or by other tools load as `Float`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Text(_) => None,
        }
    }
}

/// Numbers compare by value whatever their representation, text only equals
/// identical text.
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Text(_), _) | (_, FieldValue::Text(_)) => false,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

/// Tracked fields, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Amount,
    Supporters,
    AchievementRate,
    DaysLeft,
    ActivityCount,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Amount,
        Field::Supporters,
        Field::AchievementRate,
        Field::DaysLeft,
        Field::ActivityCount,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Field::Amount => "amount",
            Field::Supporters => "supporters",
            Field::AchievementRate => "achievementRate",
            Field::DaysLeft => "daysLeft",
            Field::ActivityCount => "activityCount",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Field::Amount => "💰",
            Field::Supporters => "👥",
            Field::AchievementRate => "📈",
            Field::DaysLeft => "⏰",
            Field::ActivityCount => "📝",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Amount => "支援金額",
            Field::Supporters => "支援者数",
            Field::AchievementRate => "達成率",
            Field::DaysLeft => "残り日数",
            Field::ActivityCount => "活動報告",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Field::Amount => "円",
            Field::Supporters => "人",
            Field::AchievementRate => "%",
            Field::DaysLeft => "日",
            Field::ActivityCount => "件",
        }
    }

    /// Numbers get thousands separators and the unit, text is shown as
    /// extracted, missing values become `N/A`.
    pub fn display(&self, value: Option<&FieldValue>) -> String {
        match value {
            Some(FieldValue::Number(n)) => format!("{}{}", group_thousands(*n), self.unit()),
            Some(FieldValue::Float(f)) => format!("{}{}", group_decimal(*f), self.unit()),
            Some(FieldValue::Text(s)) => s.clone(),
            None => "N/A".to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fields {
    pub amount: Option<FieldValue>,
    pub supporters: Option<FieldValue>,
    #[serde(alias = "percentage")]
    pub achievement_rate: Option<FieldValue>,
    #[serde(alias = "remainingDays")]
    pub days_left: Option<FieldValue>,
    pub activity_count: Option<FieldValue>,
}

impl Fields {
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        match field {
            Field::Amount => self.amount.as_ref(),
            Field::Supporters => self.supporters.as_ref(),
            Field::AchievementRate => self.achievement_rate.as_ref(),
            Field::DaysLeft => self.days_left.as_ref(),
            Field::ActivityCount => self.activity_count.as_ref(),
        }
    }
}

/// One capture of the monitored page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(flatten)]
    pub fields: Fields,
    pub timestamp: DateTime<FixedOffset>,
    pub url: String,
}

impl Observation {
    pub fn new<U: Into<String>>(fields: Fields, url: U, timestamp: DateTime<FixedOffset>) -> Self {
        Observation {
            fields,
            timestamp,
            url: url.into(),
        }
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(field)
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Url             : {}", self.url)?;
        writeln!(f, "Timestamp       : {}", self.timestamp.to_rfc3339())?;
        for field in Field::ALL {
            writeln!(f, "{:<16}: {}", field.key(), field.display(self.get(field)))?;
        }
        Ok(())
    }
}
