//! Payment calendar for recurring plans.

use chrono::{Datelike, Months, NaiveDate};

use super::pac_model::PlanFrequency;

/// Last day of month a plan may trigger on; valid in every month.
pub const MAX_PLAN_DAY: u32 = 28;

/// Computes the next payment date strictly after `today`.
///
/// The calendar is anchored on the last execution when there is one, else on
/// the first slot on or after `start_date`. Slots fall on `day_of_month`
/// every `frequency.months()` months.
pub fn next_payment_date(
    frequency: PlanFrequency,
    day_of_month: u32,
    start_date: NaiveDate,
    last_execution: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let day = day_of_month.clamp(1, MAX_PLAN_DAY);
    let step = Months::new(frequency.months());

    let mut candidate = match last_execution {
        Some(last) => slot_in_month(last, day)?.checked_add_months(step)?,
        None => {
            let first = slot_in_month(start_date, day)?;
            if first < start_date {
                first.checked_add_months(Months::new(1))?
            } else {
                first
            }
        }
    };
    while candidate <= today {
        candidate = candidate.checked_add_months(step)?;
    }
    Some(candidate)
}

fn slot_in_month(date: NaiveDate, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_first_payment_on_or_after_start() {
        let today = d(2024, 1, 1);
        assert_eq!(
            next_payment_date(PlanFrequency::Monthly, 15, d(2024, 1, 10), None, today),
            Some(d(2024, 1, 15))
        );
        assert_eq!(
            next_payment_date(PlanFrequency::Monthly, 5, d(2024, 1, 10), None, today),
            Some(d(2024, 2, 5))
        );
    }

    #[test]
    fn test_next_date_is_strictly_after_today() {
        let today = d(2024, 3, 15);
        let next = next_payment_date(PlanFrequency::Monthly, 15, d(2024, 1, 1), None, today);
        assert_eq!(next, Some(d(2024, 4, 15)));
    }

    #[test]
    fn test_steps_from_last_execution_by_frequency() {
        let last = Some(d(2024, 1, 10));
        let today = d(2024, 1, 10);
        assert_eq!(
            next_payment_date(PlanFrequency::Monthly, 10, d(2023, 6, 1), last, today),
            Some(d(2024, 2, 10))
        );
        assert_eq!(
            next_payment_date(PlanFrequency::Quarterly, 10, d(2023, 6, 1), last, today),
            Some(d(2024, 4, 10))
        );
        assert_eq!(
            next_payment_date(PlanFrequency::Biannual, 10, d(2023, 6, 1), last, today),
            Some(d(2024, 7, 10))
        );
    }

    #[test]
    fn test_catches_up_past_missed_slots() {
        let next = next_payment_date(
            PlanFrequency::Quarterly,
            1,
            d(2023, 1, 1),
            Some(d(2023, 1, 1)),
            d(2024, 2, 20),
        );
        assert_eq!(next, Some(d(2024, 4, 1)));
    }

    #[test]
    fn test_year_rollover() {
        let next = next_payment_date(
            PlanFrequency::Monthly,
            28,
            d(2024, 1, 1),
            Some(d(2024, 12, 28)),
            d(2024, 12, 28),
        );
        assert_eq!(next, Some(d(2025, 1, 28)));
    }
}
