use crate::data_structures::{LimitStatus, Record};
use crate::tracker::LimitTracker;

/// Calorie-intake reporting over a day-limit tracker.
pub struct CalorieTracker {
    tracker: LimitTracker,
}

impl CalorieTracker {
    pub fn new(limit: i64) -> Self {
        Self {
            tracker: LimitTracker::new(limit),
        }
    }

    pub fn add_record(&mut self, record: Record) {
        self.tracker.add_record(record);
    }

    pub fn tracker(&self) -> &LimitTracker {
        &self.tracker
    }

    pub fn describe_today(&self) -> String {
        format!("Сегодня получено {} калорий.", self.tracker.today_total())
    }

    pub fn describe_week(&self) -> String {
        format!(
            "За последнюю неделю получено {} калорий.",
            self.tracker.week_total()
        )
    }

    /// Reached and exceeded collapse into the same terse reply here; the
    /// spending report distinguishes them.
    pub fn describe_remaining(&self) -> String {
        let (remaining, status) = self.tracker.remaining();
        match status {
            LimitStatus::Reached | LimitStatus::Exceeded => "Хватит есть!".to_string(),
            LimitStatus::NotReached => format!(
                "Сегодня можно съесть ещё, но с общей калорийностью не более {remaining} кКал."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_eating_when_exceeded() {
        let mut calories = CalorieTracker::new(900);
        calories.add_record(Record::new(1000, "съел еду".to_string()));

        assert_eq!(calories.describe_remaining(), "Хватит есть!");
    }

    #[test]
    fn test_stop_eating_when_reached_exactly() {
        let mut calories = CalorieTracker::new(900);
        calories.add_record(Record::new(900, "обед".to_string()));

        assert_eq!(calories.describe_remaining(), "Хватит есть!");
    }

    #[test]
    fn test_remaining_allowance_named_when_under_limit() {
        let mut calories = CalorieTracker::new(2000);
        calories.add_record(Record::new(300, "завтрак".to_string()));

        let message = calories.describe_remaining();
        assert!(message.contains("1700"));
        assert!(message.contains("кКал"));
    }

    #[test]
    fn test_today_and_week_descriptions() {
        let mut calories = CalorieTracker::new(2000);
        calories.add_record(Record::new(450, "обед".to_string()));

        assert_eq!(calories.describe_today(), "Сегодня получено 450 калорий.");
        assert_eq!(
            calories.describe_week(),
            "За последнюю неделю получено 450 калорий."
        );
    }
}
