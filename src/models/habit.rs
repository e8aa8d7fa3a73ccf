use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::EntityKind;

/// Recurrence pattern, discriminated by the `type` tag on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    /// Specific weekdays, 0 = Sunday through 6 = Saturday
    WeeklyDays { days: Vec<u8> },
    /// A target number of completions per week (1-7)
    WeeklyTarget { count: u8 },
    /// A target number of completions per month (1-31)
    MonthlyTarget { count: u8 },
}

impl Frequency {
    /// Validate variant payloads; the match is exhaustive so a new variant
    /// cannot ship without a rule here
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Frequency::Daily => Ok(()),
            Frequency::WeeklyDays { days } => {
                if days.is_empty() {
                    return Err("Please select at least one day".to_string());
                }
                if days.iter().any(|&day| day > 6) {
                    return Err("Weekdays must be between 0 and 6".to_string());
                }
                Ok(())
            }
            Frequency::WeeklyTarget { count } => {
                if !(1..=7).contains(count) {
                    return Err("Weekly target must be between 1 and 7".to_string());
                }
                Ok(())
            }
            Frequency::MonthlyTarget { count } => {
                if !(1..=31).contains(count) {
                    return Err("Monthly target must be between 1 and 31".to_string());
                }
                Ok(())
            }
        }
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Daily
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalTimeframe {
    Weekly,
    Monthly,
}

/// Optional numeric goal attached to a habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub target: f64,
    pub unit: String,
    pub timeframe: GoalTimeframe,
}

impl Goal {
    pub fn validate(&self) -> Result<(), String> {
        if self.target < 1.0 {
            return Err("Goal target must be at least 1".to_string());
        }
        if self.unit.trim().is_empty() {
            return Err("Goal unit is required".to_string());
        }
        Ok(())
    }
}

/// One day's progress entry; at most one per date, enforced by
/// `Habit::upsert_log` rather than by storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitLog {
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    /// Owner; set from the authenticated caller at creation, immutable
    pub user_id: String,
    pub name: String,
    pub color: String,
    pub frequency: Frequency,
    pub logs: Vec<HabitLog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    /// Epoch millis, stamped at creation
    pub created_at: i64,
}

impl EntityKind for Habit {
    const ENTITY_NAME: &'static str = "habit";
    const INDEX_NAME: &'static str = "habits";

    fn key_of(&self) -> String {
        self.id.clone()
    }

    fn initial_state(id: &str) -> Self {
        Habit {
            id: id.to_string(),
            user_id: String::new(),
            name: String::new(),
            color: "#000000".to_string(),
            frequency: Frequency::Daily,
            logs: Vec::new(),
            goal: None,
            created_at: 0,
        }
    }
}

impl Habit {
    /// Replace-or-insert a log entry keyed on its date
    ///
    /// Logging the same date twice replaces the earlier value, keeping the
    /// at-most-one-log-per-date invariant.
    pub fn upsert_log(&mut self, date: &str, value: f64) {
        self.logs.retain(|log| log.date != date);
        self.logs.push(HabitLog {
            date: date.to_string(),
            value,
        });
    }

    /// Check a color token is `#` followed by six hex digits
    pub fn validate_color(color: &str) -> bool {
        let Some(hex_part) = color.strip_prefix('#') else {
            return false;
        };
        hex_part.len() == 6 && hex_part.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Check a log date is a real `YYYY-MM-DD` calendar day
    pub fn validate_date(date: &str) -> bool {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_habit() -> Habit {
        Habit {
            id: "h1".to_string(),
            user_id: "u1".to_string(),
            name: "Read".to_string(),
            color: "#3b82f6".to_string(),
            frequency: Frequency::Daily,
            logs: Vec::new(),
            goal: None,
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_frequency_wire_format() {
        assert_eq!(
            serde_json::to_value(Frequency::Daily).unwrap(),
            json!({"type": "daily"})
        );
        assert_eq!(
            serde_json::to_value(Frequency::WeeklyDays { days: vec![1, 3] }).unwrap(),
            json!({"type": "weekly_days", "days": [1, 3]})
        );
        assert_eq!(
            serde_json::to_value(Frequency::WeeklyTarget { count: 3 }).unwrap(),
            json!({"type": "weekly_target", "count": 3})
        );
        assert_eq!(
            serde_json::to_value(Frequency::MonthlyTarget { count: 10 }).unwrap(),
            json!({"type": "monthly_target", "count": 10})
        );
    }

    #[test]
    fn test_frequency_validation_bounds() {
        assert!(Frequency::Daily.validate().is_ok());
        assert!(Frequency::WeeklyDays { days: vec![0, 6] }.validate().is_ok());
        assert!(Frequency::WeeklyDays { days: vec![] }.validate().is_err());
        assert!(Frequency::WeeklyDays { days: vec![7] }.validate().is_err());
        assert!(Frequency::WeeklyTarget { count: 1 }.validate().is_ok());
        assert!(Frequency::WeeklyTarget { count: 0 }.validate().is_err());
        assert!(Frequency::WeeklyTarget { count: 8 }.validate().is_err());
        assert!(Frequency::MonthlyTarget { count: 31 }.validate().is_ok());
        assert!(Frequency::MonthlyTarget { count: 32 }.validate().is_err());
    }

    #[test]
    fn test_goal_validation() {
        let goal = Goal {
            target: 5.0,
            unit: "pages".to_string(),
            timeframe: GoalTimeframe::Weekly,
        };
        assert!(goal.validate().is_ok());

        let bad_target = Goal { target: 0.5, ..goal.clone() };
        assert!(bad_target.validate().is_err());

        let bad_unit = Goal {
            unit: " ".to_string(),
            ..goal
        };
        assert!(bad_unit.validate().is_err());
    }

    #[test]
    fn test_upsert_log_replaces_same_date() {
        let mut habit = sample_habit();
        habit.upsert_log("2024-01-01", 1.0);
        habit.upsert_log("2024-01-01", 2.0);

        assert_eq!(habit.logs.len(), 1);
        assert_eq!(habit.logs[0].value, 2.0);
    }

    #[test]
    fn test_upsert_log_never_duplicates_dates() {
        let mut habit = sample_habit();
        habit.upsert_log("2024-01-01", 1.0);
        habit.upsert_log("2024-01-02", 1.0);
        habit.upsert_log("2024-01-03", 1.0);
        habit.upsert_log("2024-01-02", 5.0);

        let mut dates: Vec<&str> = habit.logs.iter().map(|log| log.date.as_str()).collect();
        dates.sort_unstable();
        dates.dedup();
        assert_eq!(dates.len(), habit.logs.len());
    }

    #[test]
    fn test_validate_color() {
        assert!(Habit::validate_color("#3b82f6"));
        assert!(Habit::validate_color("#ABCDEF"));
        assert!(!Habit::validate_color("3b82f6"));
        assert!(!Habit::validate_color("#3b82f"));
        assert!(!Habit::validate_color("#3b82fg"));
        assert!(!Habit::validate_color("#3b82f6a"));
    }

    #[test]
    fn test_validate_date() {
        assert!(Habit::validate_date("2024-01-01"));
        assert!(!Habit::validate_date("2024-13-01"));
        assert!(!Habit::validate_date("01-01-2024"));
        assert!(!Habit::validate_date("tomorrow"));
    }

    #[test]
    fn test_habit_wire_format_uses_camel_case() {
        let value = serde_json::to_value(sample_habit()).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["createdAt"], 1_700_000_000_000i64);
        assert!(value.get("goal").is_none());
    }
}
