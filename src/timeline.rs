//! Launch timeline feasibility
//!
//! Compares the whole months between today and a target first term against
//! the minimum runway needed for approval, marketing and admissions.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Provenance for runway defaults
pub const TIMELINE_SOURCES: [&str; 2] = ["EDDY priors", "Accreditation manuals"];

/// Month lead times needed before a first start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunwayAssumptions {
    pub approval_months: u32,
    pub marketing_ramp: u32,
    pub admissions_lead: u32,
}

impl Default for RunwayAssumptions {
    fn default() -> Self {
        Self {
            approval_months: 6,
            marketing_ramp: 3,
            admissions_lead: 3,
        }
    }
}

impl RunwayAssumptions {
    /// Total lead time in months, saturating at `u32::MAX`
    pub fn minimum_runway(&self) -> u32 {
        self.approval_months
            .saturating_add(self.marketing_ramp)
            .saturating_add(self.admissions_lead)
    }

    fn explain(&self) -> String {
        format!(
            "Minimum runway ~{}m (approval {} + marketing {} + admissions {}).",
            self.minimum_runway(),
            self.approval_months,
            self.marketing_ramp,
            self.admissions_lead
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineStatus {
    Feasible,
    Tight,
    Unknown,
}

/// Result of a timeline check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineCheck {
    pub months_to_launch: Option<u32>,
    pub status: TimelineStatus,
    pub message: String,
    pub explain: String,
    pub sources: Vec<String>,
}

/// Parse a target start label into the first day of its month.
///
/// Accepts `YYYY-MM` or `<season> <year>` where season is spring (March),
/// summer (June), fall/autumn (September) or winter (January).
pub fn parse_target(label: &str) -> Option<NaiveDate> {
    let text = label.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    if text.len() == 7 && text.as_bytes()[4] == b'-' {
        let year = text[..4].parse::<i32>().ok();
        let month = text[5..].parse::<u32>().ok();
        if let Some(date) = year.zip(month).and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1)) {
            return Some(date);
        }
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    if let [season, year] = tokens.as_slice() {
        let month = season_month(season)?;
        let year = year.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    None
}

fn season_month(season: &str) -> Option<u32> {
    match season {
        "spring" => Some(3),
        "summer" => Some(6),
        "fall" | "autumn" => Some(9),
        "winter" => Some(1),
        _ => None,
    }
}

/// Whole months from `from` to `to`, floored on day of month, never negative
pub fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let mut total = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        total -= 1;
    }
    total.max(0) as u32
}

/// Check whether `target_start` leaves enough runway from `today`
pub fn check_timeline(today: NaiveDate, target_start: &str, runway: &RunwayAssumptions) -> TimelineCheck {
    let sources = TIMELINE_SOURCES.iter().map(|s| s.to_string()).collect();

    let Some(target) = parse_target(target_start) else {
        return TimelineCheck {
            months_to_launch: None,
            status: TimelineStatus::Unknown,
            message: "Timeline unknown (unrecognized target).".to_string(),
            explain: runway.explain(),
            sources,
        };
    };

    let months = months_between(today, target);
    let (status, verdict) = if months >= runway.minimum_runway() {
        (TimelineStatus::Feasible, "feasible")
    } else {
        (TimelineStatus::Tight, "tight for approval + marketing")
    };

    let season = if target_start.trim().is_empty() {
        target.format("%Y-%m").to_string()
    } else {
        target_start.trim().to_string()
    };

    TimelineCheck {
        months_to_launch: Some(months),
        status,
        message: format!("{} leaves ~{} months: {}.", season, months, verdict),
        explain: runway.explain(),
        sources,
    }
}

/// Parse `YYYY-MM-DD`, falling back to the current UTC date
pub fn today_or_now(today: Option<&str>) -> NaiveDate {
    today
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .unwrap_or_else(|| Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(parse_target("2026-09"), Some(date(2026, 9, 1)));
        assert_eq!(parse_target("2026-13"), None);
        assert_eq!(parse_target("20x6-09"), None);
    }

    #[test]
    fn test_parse_seasons() {
        assert_eq!(parse_target("Spring 2026"), Some(date(2026, 3, 1)));
        assert_eq!(parse_target("summer 2027"), Some(date(2027, 6, 1)));
        assert_eq!(parse_target("Fall 2026"), Some(date(2026, 9, 1)));
        assert_eq!(parse_target("AUTUMN 2026"), Some(date(2026, 9, 1)));
        assert_eq!(parse_target("Winter 2027"), Some(date(2027, 1, 1)));
    }

    #[test]
    fn test_parse_rejects_other_labels() {
        assert_eq!(parse_target(""), None);
        assert_eq!(parse_target("Fall"), None);
        assert_eq!(parse_target("Fall of 2026"), None);
        assert_eq!(parse_target("Fall next"), None);
        assert_eq!(parse_target("Monsoon 2026"), None);
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(date(2025, 1, 15), date(2026, 3, 1)), 13);
        assert_eq!(months_between(date(2025, 1, 1), date(2026, 3, 1)), 14);
        assert_eq!(months_between(date(2026, 3, 1), date(2025, 1, 1)), 0);
        assert_eq!(months_between(date(2026, 3, 1), date(2026, 3, 1)), 0);
    }

    #[test]
    fn test_feasible_and_tight() {
        let runway = RunwayAssumptions::default();
        assert_eq!(runway.minimum_runway(), 12);

        let feasible = check_timeline(date(2025, 1, 1), "Fall 2026", &runway);
        assert_eq!(feasible.status, TimelineStatus::Feasible);
        assert_eq!(feasible.months_to_launch, Some(20));
        assert_eq!(feasible.message, "Fall 2026 leaves ~20 months: feasible.");

        let tight = check_timeline(date(2026, 1, 10), "2026-09", &runway);
        assert_eq!(tight.status, TimelineStatus::Tight);
        assert_eq!(tight.months_to_launch, Some(7));
        assert!(tight.explain.contains("approval 6"));
    }

    #[test]
    fn test_oversized_runway_saturates() {
        let runway = RunwayAssumptions {
            approval_months: u32::MAX,
            marketing_ramp: 1,
            ..Default::default()
        };
        assert_eq!(runway.minimum_runway(), u32::MAX);

        let check = check_timeline(date(2025, 1, 1), "Fall 2025", &runway);
        assert_eq!(check.status, TimelineStatus::Tight);
        assert_eq!(check.months_to_launch, Some(8));
    }

    #[test]
    fn test_unknown_target() {
        let check = check_timeline(date(2025, 1, 1), "someday", &RunwayAssumptions::default());
        assert_eq!(check.status, TimelineStatus::Unknown);
        assert_eq!(check.months_to_launch, None);
        assert_eq!(check.sources, vec!["EDDY priors", "Accreditation manuals"]);
    }

    #[test]
    fn test_today_parsing() {
        assert_eq!(today_or_now(Some("2025-06-30")), date(2025, 6, 30));
        let fallback = today_or_now(Some("yesterday"));
        assert!(fallback.year() >= 2024);
    }
}
