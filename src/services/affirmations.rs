// SPDX-License-Identifier: MIT

//! Daily affirmations, selected deterministically by calendar date so every
//! user sees the same affirmation all day.

use chrono::{Datelike, NaiveDate};

pub const AFFIRMATIONS: [&str; 20] = [
    "Every workout brings you closer to your strongest self. You've got this!",
    "Your body can do it. It's your mind you need to convince.",
    "Progress, not perfection. Every step counts.",
    "You are stronger than your excuses.",
    "The only bad workout is the one that didn't happen.",
    "Believe in yourself and push your limits.",
    "Your future self will thank you for working out today.",
    "Champions train, losers complain. You're a champion!",
    "Success starts with self-discipline. You've got this!",
    "Every rep, every set, every minute - you're investing in yourself.",
    "Strength doesn't come from what you can do. It comes from overcoming what you thought you couldn't.",
    "The pain you feel today will be the strength you feel tomorrow.",
    "Don't wish for it, work for it.",
    "Your only limit is your mind.",
    "Sweat is just fat crying.",
    "Make yourself proud.",
    "The body achieves what the mind believes.",
    "You're not just changing your body, you're changing your life.",
    "Every workout is a victory.",
    "Consistency is key. Keep showing up for yourself.",
];

/// Affirmation for a calendar date: day-of-year modulo list length.
pub fn affirmation_for_date(date: NaiveDate) -> &'static str {
    AFFIRMATIONS[date.ordinal0() as usize % AFFIRMATIONS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_within_a_day() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(affirmation_for_date(date), affirmation_for_date(date));
    }

    #[test]
    fn test_consecutive_days_rotate() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let next = date.succ_opt().unwrap();
        assert_ne!(affirmation_for_date(date), affirmation_for_date(next));
    }

    #[test]
    fn test_every_date_maps_to_a_known_affirmation() {
        let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for _ in 0..366 {
            assert!(AFFIRMATIONS.contains(&affirmation_for_date(date)));
            date = date.succ_opt().unwrap();
        }
    }
}
