//! Due-date predicate for habits.

use chrono::NaiveDate;

use crate::model::Habit;

/// Whether `habit` is due on `date`.
///
/// Inactive habits are never due. Monthly habits are due every day since
/// no day of the month is pinned.
pub fn is_due(habit: &Habit, date: NaiveDate) -> bool {
    habit.active && habit.recurrence.selects(date)
}

/// Habits due on `date`, in list order.
pub fn due_on(habits: &[Habit], date: NaiveDate) -> Vec<&Habit> {
    habits.iter().filter(|h| is_due(h, date)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HabitCategory, Recurrence};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn habit(name: &str, recurrence: Recurrence) -> Habit {
        Habit::new(name, HabitCategory::Health, recurrence).unwrap()
    }

    #[test]
    fn daily_is_always_due() {
        let h = habit("Leer", Recurrence::Daily);
        assert!(is_due(&h, date("2026-01-04")));
        assert!(is_due(&h, date("2026-02-28")));
    }

    #[test]
    fn weekly_follows_target_days() {
        let h = habit("Fuerza", Recurrence::weekly([1, 4]).unwrap());
        assert!(is_due(&h, date("2026-01-05"))); // Monday
        assert!(!is_due(&h, date("2026-01-06"))); // Tuesday
        assert!(is_due(&h, date("2026-01-08"))); // Thursday
    }

    #[test]
    fn empty_and_full_weekly_sets() {
        let never = habit("Nunca", Recurrence::weekly([]).unwrap());
        let always = habit("Siempre", Recurrence::weekly(0..=6).unwrap());
        for offset in 0..7 {
            let day = date("2026-01-04") + chrono::Days::new(offset);
            assert!(!is_due(&never, day));
            assert!(is_due(&always, day));
        }
    }

    #[test]
    fn monthly_is_always_due() {
        let h = habit("Finanzas", Recurrence::Monthly);
        assert!(is_due(&h, date("2026-01-17")));
    }

    #[test]
    fn inactive_is_never_due() {
        let mut h = habit("Leer", Recurrence::Daily);
        h.active = false;
        assert!(!is_due(&h, date("2026-01-04")));
        assert!(due_on(&[h], date("2026-01-04")).is_empty());
    }
}
