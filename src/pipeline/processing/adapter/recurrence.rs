use std::collections::BTreeSet;

use chrono::{NaiveDate, Weekday};
use serde_json::Value;
use tracing::debug;

use super::dates::parse_day;
use super::reference::{as_number, RawDocument};
use crate::collation::Locale;
use crate::domain::{EventType, MonthlyRule, RecurrenceRule, WeekIndex};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Read the stored recurrence structure. Missing or malformed parts are left empty.
pub fn parse_rule(recurrence: Option<RawDocument<'_>>) -> RecurrenceRule {
    let Some(doc) = recurrence else {
        return RecurrenceRule::default();
    };

    let days: BTreeSet<u32> = doc
        .array("daysOfWeek")
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|code| {
            let day = parse_weekday(code);
            if day.is_none() {
                debug!(code, "Dropping unknown weekday code");
            }
            day
        })
        .map(|day| day.num_days_from_monday())
        .collect();

    RecurrenceRule {
        days_of_week: days.into_iter().map(|n| WEEK[n as usize]).collect(),
        repeat_until: parse_day(doc.get("repeatUntil")),
        monthly: parse_monthly(doc),
    }
}

fn parse_monthly(doc: RawDocument<'_>) -> Option<MonthlyRule> {
    let nth = doc
        .str("monthlyWeekIndex")
        .and_then(WeekIndex::parse)
        .zip(doc.str("monthlyWeekday").and_then(parse_weekday))
        .map(|(week, weekday)| MonthlyRule::NthWeekday { week, weekday });
    let day_of_month = doc
        .get("monthlyDayOfMonth")
        .and_then(as_number)
        .filter(|n| n.fract() == 0.0 && (1.0..=31.0).contains(n))
        .map(|n| MonthlyRule::DayOfMonth { day: n as u32 });

    match doc.str("monthlyMode").map(str::to_ascii_lowercase).as_deref() {
        Some("dayofmonth" | "day-of-month" | "day_of_month") => day_of_month.or(nth),
        _ => nth.or(day_of_month),
    }
}

/// Weekday from an English code (`mo`, `mon`, `monday`) or a German name
pub fn parse_weekday(code: &str) -> Option<Weekday> {
    let code = code.trim().to_lowercase();
    let day = match code.as_str() {
        "mo" | "montag" => Weekday::Mon,
        "tu" | "di" | "dienstag" => Weekday::Tue,
        "we" | "mi" | "mittwoch" => Weekday::Wed,
        "th" | "do" | "donnerstag" => Weekday::Thu,
        "fr" | "freitag" => Weekday::Fri,
        "sa" | "samstag" | "sonnabend" => Weekday::Sat,
        "su" | "so" | "sonntag" => Weekday::Sun,
        other => other.parse::<Weekday>().ok()?,
    };
    Some(day)
}

/// Builds the human-readable sentence for a stored recurrence rule
#[derive(Debug, Clone, Copy, Default)]
pub struct RecurrenceLabeler {
    locale: Locale,
}

impl RecurrenceLabeler {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Empty for one-time events
    pub fn label(&self, event_type: EventType, rule: &RecurrenceRule, time_label: &str) -> String {
        let stem = match event_type {
            EventType::OneTime => return String::new(),
            EventType::Daily => self.phrase(Phrase::Daily),
            EventType::Weekly if rule.days_of_week.is_empty() => self.phrase(Phrase::Weekly),
            EventType::Weekly => self.weekly_on(&rule.days_of_week),
            EventType::Monthly => match rule.monthly {
                Some(MonthlyRule::NthWeekday { week, weekday }) => self.monthly_nth(week, weekday),
                Some(MonthlyRule::DayOfMonth { day }) => self.monthly_day(day),
                None => self.phrase(Phrase::Monthly),
            },
            EventType::Yearly => self.phrase(Phrase::Yearly),
        };

        let mut label = stem;
        if !time_label.is_empty() {
            label.push_str(&self.time_suffix(time_label));
        }
        if let Some(until) = rule.repeat_until {
            label.push_str(&self.until_suffix(until));
        }
        label
    }

    fn phrase(&self, phrase: Phrase) -> String {
        let text = match (self.locale, phrase) {
            (Locale::De, Phrase::Daily) => "Täglich",
            (Locale::De, Phrase::Weekly) => "Wöchentlich",
            (Locale::De, Phrase::Monthly) => "Monatlich",
            (Locale::De, Phrase::Yearly) => "Jährlich",
            (Locale::En, Phrase::Daily) => "Daily",
            (Locale::En, Phrase::Weekly) => "Weekly",
            (Locale::En, Phrase::Monthly) => "Monthly",
            (Locale::En, Phrase::Yearly) => "Yearly",
        };
        text.to_string()
    }

    fn weekly_on(&self, days: &[Weekday]) -> String {
        let names: Vec<&str> = days.iter().map(|d| self.weekday_name(*d)).collect();
        let conjunction = match self.locale {
            Locale::De => "und",
            Locale::En => "and",
        };
        let list = match names.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} {conjunction} {last}", rest.join(", ")),
            _ => names.concat(),
        };
        match self.locale {
            Locale::De => format!("Jeden {list}"),
            Locale::En => format!("Every {list}"),
        }
    }

    fn monthly_nth(&self, week: WeekIndex, weekday: Weekday) -> String {
        let day = self.weekday_name(weekday);
        match self.locale {
            Locale::De => {
                let ordinal = match week {
                    WeekIndex::First => "ersten",
                    WeekIndex::Second => "zweiten",
                    WeekIndex::Third => "dritten",
                    WeekIndex::Fourth => "vierten",
                    WeekIndex::Last => "letzten",
                };
                format!("Monatlich am {ordinal} {day}")
            }
            Locale::En => {
                let ordinal = match week {
                    WeekIndex::First => "first",
                    WeekIndex::Second => "second",
                    WeekIndex::Third => "third",
                    WeekIndex::Fourth => "fourth",
                    WeekIndex::Last => "last",
                };
                format!("Monthly on the {ordinal} {day}")
            }
        }
    }

    fn monthly_day(&self, day: u32) -> String {
        match self.locale {
            Locale::De => format!("Monatlich am {day}."),
            Locale::En => format!("Monthly on the {day}."),
        }
    }

    fn time_suffix(&self, time_label: &str) -> String {
        match self.locale {
            Locale::De => format!(", jeweils {time_label}"),
            Locale::En => format!(", at {time_label}"),
        }
    }

    fn until_suffix(&self, until: NaiveDate) -> String {
        match self.locale {
            Locale::De => format!(", bis {}", until.format("%d.%m.%Y")),
            Locale::En => format!(", until {}", until.format("%B %-d, %Y")),
        }
    }

    fn weekday_name(&self, day: Weekday) -> &'static str {
        match (self.locale, day) {
            (Locale::De, Weekday::Mon) => "Montag",
            (Locale::De, Weekday::Tue) => "Dienstag",
            (Locale::De, Weekday::Wed) => "Mittwoch",
            (Locale::De, Weekday::Thu) => "Donnerstag",
            (Locale::De, Weekday::Fri) => "Freitag",
            (Locale::De, Weekday::Sat) => "Samstag",
            (Locale::De, Weekday::Sun) => "Sonntag",
            (Locale::En, Weekday::Mon) => "Monday",
            (Locale::En, Weekday::Tue) => "Tuesday",
            (Locale::En, Weekday::Wed) => "Wednesday",
            (Locale::En, Weekday::Thu) => "Thursday",
            (Locale::En, Weekday::Fri) => "Friday",
            (Locale::En, Weekday::Sat) => "Saturday",
            (Locale::En, Weekday::Sun) => "Sunday",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Phrase {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(value: serde_json::Value) -> RecurrenceRule {
        parse_rule(RawDocument::from_value(&value))
    }

    #[test]
    fn test_one_time_has_no_label() {
        let labeler = RecurrenceLabeler::new(Locale::De);
        assert_eq!(labeler.label(EventType::OneTime, &RecurrenceRule::default(), "18:00"), "");
    }

    #[test]
    fn test_weekly_with_days() {
        let labeler = RecurrenceLabeler::new(Locale::De);
        let rule = rule(json!({"daysOfWeek": ["fri", "mon", "wed", "mon"]}));
        assert_eq!(rule.days_of_week, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);
        assert_eq!(
            labeler.label(EventType::Weekly, &rule, "18:00 – 20:00"),
            "Jeden Montag, Mittwoch und Freitag, jeweils 18:00 – 20:00"
        );
    }

    #[test]
    fn test_weekly_single_day_and_generic() {
        let labeler = RecurrenceLabeler::new(Locale::En);
        let single = rule(json!({"daysOfWeek": ["TU"]}));
        assert_eq!(labeler.label(EventType::Weekly, &single, ""), "Every Tuesday");
        assert_eq!(labeler.label(EventType::Weekly, &RecurrenceRule::default(), ""), "Weekly");
    }

    #[test]
    fn test_daily_with_until() {
        let labeler = RecurrenceLabeler::new(Locale::De);
        let rule = rule(json!({"repeatUntil": "2025-12-31T00:00:00.000Z"}));
        assert_eq!(labeler.label(EventType::Daily, &rule, "10:00"), "Täglich, jeweils 10:00, bis 31.12.2025");

        let english = RecurrenceLabeler::new(Locale::En);
        assert_eq!(english.label(EventType::Daily, &rule, ""), "Daily, until December 31, 2025");
    }

    #[test]
    fn test_monthly_modes() {
        let labeler = RecurrenceLabeler::new(Locale::De);
        let nth = rule(json!({"monthlyWeekIndex": "last", "monthlyWeekday": "sat"}));
        assert_eq!(labeler.label(EventType::Monthly, &nth, ""), "Monatlich am letzten Samstag");

        let day = rule(json!({"monthlyDayOfMonth": 15}));
        assert_eq!(labeler.label(EventType::Monthly, &day, ""), "Monatlich am 15.");

        let out_of_range = rule(json!({"monthlyDayOfMonth": 32}));
        assert_eq!(labeler.label(EventType::Monthly, &out_of_range, ""), "Monatlich");
    }

    #[test]
    fn test_monthly_mode_selects_between_both() {
        let both = rule(json!({
            "monthlyMode": "dayOfMonth",
            "monthlyDayOfMonth": "3",
            "monthlyWeekIndex": "first",
            "monthlyWeekday": "monday"
        }));
        assert_eq!(both.monthly, Some(MonthlyRule::DayOfMonth { day: 3 }));
    }

    #[test]
    fn test_yearly() {
        let labeler = RecurrenceLabeler::new(Locale::En);
        assert_eq!(labeler.label(EventType::Yearly, &RecurrenceRule::default(), "19:30"), "Yearly, at 19:30");
    }

    #[test]
    fn test_parse_weekday_codes() {
        assert_eq!(parse_weekday("Mon"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("sunday"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("Donnerstag"), Some(Weekday::Thu));
        assert_eq!(parse_weekday("xyz"), None);
    }
}
