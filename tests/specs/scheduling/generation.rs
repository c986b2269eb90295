//! Instance generation horizons and dedup

use crate::prelude::*;
use chrono::{Datelike, Days};
use dues_core::generate;
use proptest::prelude::*;
use std::collections::HashSet;

#[test]
fn monthly_template_covers_three_months() {
    let now = at(2024, 1, 10, 9, 0);
    let rent = template(NewTemplate::monthly("Rent", money(1000), 15), "t-rent", now);

    let dues: Vec<_> = generate(&rent, now)
        .unwrap()
        .iter()
        .map(|c| c.due_date)
        .collect();

    assert_eq!(dues, vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)]);
}

#[test]
fn custom_days_skip_past_and_out_of_month_days() {
    // 2024 is a leap year; February has 29 days
    let now = at(2024, 2, 10, 9, 0);
    let cleaner = template(
        NewTemplate::custom_calendar("Cleaner", money(40), vec![1, 15, 31]),
        "t-cleaner",
        now,
    );

    let candidates = generate(&cleaner, now).unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].due_date, date(2024, 2, 15));
    assert_eq!(candidates[0].period_start, date(2024, 2, 15));
    assert_eq!(candidates[0].period_end, date(2024, 2, 15));
}

#[test]
fn monthly_day_past_month_end_clamps() {
    let now = at(2024, 1, 10, 9, 0);
    let card = template(NewTemplate::monthly("Card", money(200), 31), "t-card", now);

    let dues: Vec<_> = generate(&card, now)
        .unwrap()
        .iter()
        .map(|c| c.due_date)
        .collect();

    assert_eq!(dues, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]);
}

#[test]
fn daily_templates_generate_nothing() {
    let now = at(2024, 1, 10, 9, 0);
    let coffee = template(NewTemplate::daily("Coffee"), "t-coffee", now);

    assert!(generate(&coffee, now).unwrap().is_empty());
}

proptest! {
    #[test]
    fn weekly_output_is_bounded_and_on_the_right_day(
        offset in 0u64..3650,
        hour in 0u32..24,
        week_day in 0u8..7,
    ) {
        let now = (date(2020, 1, 1) + Days::new(offset)).and_hms_opt(hour, 30, 0).unwrap();
        let gym = template(NewTemplate::weekly("Gym", money(10), week_day), "t-gym", now);

        let candidates = generate(&gym, now).unwrap();

        prop_assert!(candidates.len() <= 4);
        prop_assert!(candidates.len() >= 3);
        for candidate in &candidates {
            prop_assert_eq!(
                candidate.due_date.weekday().num_days_from_sunday(),
                u32::from(week_day)
            );
            prop_assert!(candidate.due_date >= now.date());
        }
    }
}

#[tokio::test]
async fn repeated_generation_never_duplicates_a_period() {
    let world = World::at(at(2024, 1, 10, 9, 0));
    let now = world.clock.local_now();
    let rent = template(NewTemplate::monthly("Rent", money(1000), 15), "t-rent", now);
    let gym = template(NewTemplate::weekly("Gym", money(10), 5), "t-gym", now);

    for _ in 0..2 {
        for t in [&rent, &gym] {
            for candidate in generate(t, now).unwrap() {
                world
                    .dues
                    .obligations()
                    .insert_if_absent(candidate, now)
                    .await
                    .unwrap();
            }
        }
    }

    let open = world.open().await;
    let keys: HashSet<_> = open
        .iter()
        .map(|i| (i.template_id.clone(), i.period_start))
        .collect();
    assert_eq!(keys.len(), open.len());
    // 3 months of rent, 4 Fridays from the week of Jan 8
    assert_eq!(open.len(), 7);
}
