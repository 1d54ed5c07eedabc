use crate::{
    data::{FieldValue, Fields},
    Extractor,
};
use lazy_regex::regex;
use lazy_static::lazy_static;
use scraper::{Html, Selector};

const E: &str = "Invalid selector";
lazy_static! {
    static ref AMOUNT: Selector = Selector::parse(".project-amount").expect(E);
    static ref AMOUNT_ANY: Selector = Selector::parse(r#"[class*="amount"]"#).expect(E);
    static ref SUPPORTERS: Selector = Selector::parse(".project-supporters").expect(E);
    static ref SUPPORTERS_ANY: Selector = Selector::parse(r#"[class*="supporter"]"#).expect(E);
    static ref ACHIEVEMENT: Selector = Selector::parse(".project-achievement").expect(E);
    static ref ACHIEVEMENT_ANY: Selector =
        Selector::parse(r#"[class*="achievement"]"#).expect(E);
    static ref REMAINING: Selector = Selector::parse(".project-remaining").expect(E);
    static ref REMAINING_ANY: Selector = Selector::parse(r#"[class*="remaining"]"#).expect(E);
    static ref ACTIVITY_COUNT: Selector = Selector::parse(".activity-count").expect(E);
    static ref ACTIVITY_ITEMS: Selector = Selector::parse(
        r#".activity-item, .report-item, [class*="activity"], [class*="report"]"#
    )
    .expect(E);
    static ref BODY: Selector = Selector::parse("body").expect(E);
}

#[derive(Debug)]
pub struct KibidangoExtractor;

impl Extractor for KibidangoExtractor {
    fn extract(&self, doc: &Html) -> Fields {
        Fields {
            amount: number_with_fallback(doc, &AMOUNT, &AMOUNT_ANY),
            supporters: number_with_fallback(doc, &SUPPORTERS, &SUPPORTERS_ANY),
            achievement_rate: number_with_fallback(doc, &ACHIEVEMENT, &ACHIEVEMENT_ANY),
            days_left: number_with_fallback(doc, &REMAINING, &REMAINING_ANY),
            activity_count: number_of(doc, &ACTIVITY_COUNT)
                .or_else(|| activity_count(doc))
                .map(FieldValue::Number),
        }
    }
}

/// Text of every element matching `primary`, falling back to the first
/// element matching `fallback`.
fn number_with_fallback(doc: &Html, primary: &Selector, fallback: &Selector) -> Option<FieldValue> {
    number_of(doc, primary)
        .or_else(|| {
            doc.select(fallback)
                .next()
                .and_then(|el| extract_number(&el.text().collect::<String>()))
        })
        .map(FieldValue::Number)
}

fn number_of(doc: &Html, selector: &Selector) -> Option<i64> {
    let text: String = doc.select(selector).flat_map(|el| el.text()).collect();
    extract_number(&text)
}

fn activity_count(doc: &Html) -> Option<i64> {
    let items = doc.select(&ACTIVITY_ITEMS).count();
    if items > 0 {
        return i64::try_from(items).ok();
    }

    let body: String = doc.select(&BODY).flat_map(|el| el.text()).collect();
    regex!(r"活動報告[：:]\s*([0-9]+)")
        .captures(&body)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First run of ASCII digits, thousands separators ignored.
pub(crate) fn extract_number(text: &str) -> Option<i64> {
    let text = text.replace(',', "");
    regex!(r"[0-9]+")
        .find(&text)
        .and_then(|m| m.as_str().parse().ok())
}
