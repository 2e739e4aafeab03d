//! Property-based tests for the booking engine using proptest.
//!
//! These check invariants that hold for *any* booking snapshot, not just the
//! hand-written scenarios in the other test files.

use std::collections::HashSet;

use booking_engine::{
    find_conflicts, group, has_gender_conflict, resolve, Booking, BookingStatus, DateNormalizer,
    DayKey, Gender,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_status() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        Just(BookingStatus::Blocked),
        Just(BookingStatus::Confirmed),
        Just(BookingStatus::CheckedIn),
        Just(BookingStatus::CheckedOut),
        Just(BookingStatus::Cancelled),
        Just(BookingStatus::Other("Pending".to_string())),
    ]
}

fn arb_room() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("R1".to_string()),
        Just("R2".to_string()),
        Just("R3".to_string()),
    ]
}

/// A day within a 90-day window starting 2024-02-15, spanning the March DST
/// changes in both Europe and North America.
fn arb_day() -> impl Strategy<Value = DayKey> {
    (0i64..90).prop_map(|offset| {
        let base = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        DayKey::new(base + Duration::days(offset))
    })
}

fn arb_bookings() -> impl Strategy<Value = Vec<Booking>> {
    prop::collection::vec((arb_room(), arb_day(), arb_status()), 0..60).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (room, day, status))| Booking::new(i.to_string(), room, day, status))
            .collect()
    })
}

fn arb_timezone() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("UTC"),
        Just("America/New_York"),
        Just("Europe/London"),
        Just("Africa/Lagos"),
        Just("Asia/Kolkata"),
        Just("Pacific/Auckland"),
    ]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Normalization is idempotent
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn normalization_is_idempotent(
        secs in 1_600_000_000i64..1_900_000_000,
        tz in arb_timezone(),
    ) {
        let n = DateNormalizer::from_timezone(tz).unwrap();
        let instant = Utc.timestamp_opt(secs, 0).unwrap();
        let rfc = instant.to_rfc3339();

        let once = n.normalize(rfc.as_str()).unwrap();
        prop_assert_eq!(n.normalize(once), Some(once));
        prop_assert_eq!(n.normalize(once.to_string().as_str()), Some(once));
        prop_assert_eq!(n.normalize(instant), Some(once));
    }
}

// ---------------------------------------------------------------------------
// Property 2: Cancelled bookings never conflict
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn all_cancelled_means_no_conflicts(
        mut bookings in arb_bookings(),
        room in arb_room(),
        start in arb_day(),
        len in 0i64..40,
    ) {
        for b in &mut bookings {
            b.status = BookingStatus::Cancelled;
        }
        let end = DayKey::new(start.date() + Duration::days(len));
        prop_assert!(find_conflicts(&room, start, end, &bookings).is_empty());
    }

    #[test]
    fn conflicts_are_sorted_unique_and_in_range(
        bookings in arb_bookings(),
        room in arb_room(),
        start in arb_day(),
        len in 0i64..40,
    ) {
        let end = DayKey::new(start.date() + Duration::days(len));
        let conflicts = find_conflicts(&room, start, end, &bookings);

        for pair in conflicts.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
        }
        for c in &conflicts {
            prop_assert!(c.date >= start && c.date <= end);
            prop_assert!(c.booking.occupies(&room, c.date));
        }
    }
}

// ---------------------------------------------------------------------------
// Properties 3 & 4: Groups are contiguous and partition the input
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn groups_are_contiguous(bookings in arb_bookings()) {
        for g in group(&bookings) {
            let span = g.start_date.days_until(g.end_date) + 1;
            prop_assert_eq!(span as usize, g.booking_ids.len());
            prop_assert_eq!(g.is_range, g.booking_ids.len() > 1);

            let expected: Vec<DayKey> = g.days().collect();
            let actual: Vec<DayKey> = g
                .booking_ids
                .iter()
                .map(|id| bookings.iter().find(|b| &b.id == id).unwrap().date.unwrap())
                .collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn groups_partition_the_input(bookings in arb_bookings()) {
        let groups = group(&bookings);

        let mut seen = HashSet::new();
        for g in &groups {
            for id in &g.booking_ids {
                prop_assert!(seen.insert(id.clone()), "booking {} in two groups", id);
                let b = bookings.iter().find(|b| &b.id == id).unwrap();
                prop_assert_eq!(&b.room_id, &g.room_id);
            }
        }
        prop_assert_eq!(seen.len(), bookings.len());
    }
}

// ---------------------------------------------------------------------------
// Property 5: Priority is order-independent across distinct ranks
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn blocked_always_wins(
        others in prop::collection::vec(arb_status(), 0..8),
        position in 0usize..9,
    ) {
        let day = DayKey::from_ymd(2024, 5, 1).unwrap();
        let mut cell: Vec<Booking> = others
            .into_iter()
            .filter(|s| !s.is_blocked())
            .enumerate()
            .map(|(i, s)| Booking::new(format!("o{}", i), "R1", day, s))
            .collect();
        let at = position.min(cell.len());
        cell.insert(at, Booking::new("blocked", "R1", day, BookingStatus::Blocked));

        prop_assert_eq!(resolve(&cell).map(|b| b.id.as_str()), Some("blocked"));
    }
}

// ---------------------------------------------------------------------------
// Property 6: Unknown gender never conflicts
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn ungendered_guests_never_conflict(
        bookings in arb_bookings(),
        room in arb_room(),
        day in arb_day(),
    ) {
        // arb_bookings() never records a gender.
        prop_assert!(!has_gender_conflict(&room, Some(&Gender::Male), day, &bookings));
        prop_assert!(!has_gender_conflict(&room, Some(&Gender::Female), day, &bookings));
    }
}
