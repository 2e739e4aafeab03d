//! Tests for REST request shapes and the create pre-flight.

use booking_engine::api::{
    preflight, unblock_requests, BookingsQuery, CancelRequest, ConflictResponse,
    CreateBookingRequest, Preflight,
};
use booking_engine::error::BookingError;
use booking_engine::{current_blocks, find_conflicts, Booking, BookingStatus, DayKey};

fn day(d: u32) -> DayKey {
    DayKey::from_ymd(2024, 5, d).unwrap()
}

fn block_request(from: u32, to: u32, force: Option<bool>) -> CreateBookingRequest {
    CreateBookingRequest {
        room_id: "R1".to_string(),
        check_in_date: day(from),
        check_out_date: day(to),
        status: BookingStatus::Blocked,
        notes: Some("Repainting".to_string()),
        force_block: force,
    }
}

fn r1_bookings() -> Vec<Booking> {
    vec![
        Booking::new("1", "R1", day(1), BookingStatus::Confirmed),
        Booking::new("2", "R1", day(2), BookingStatus::Confirmed),
        Booking::new("3", "R1", day(3), BookingStatus::Confirmed),
    ]
}

#[test]
fn preflight_clear_when_free() {
    let outcome = preflight(&block_request(10, 12, None), &r1_bookings()).unwrap();
    assert_eq!(outcome, Preflight::Clear);
    assert!(!outcome.needs_confirmation());
}

#[test]
fn preflight_reports_conflicts_for_confirmation() {
    let outcome = preflight(&block_request(2, 4, None), &r1_bookings()).unwrap();
    match &outcome {
        Preflight::Conflicts(conflicts) => assert_eq!(conflicts.len(), 2),
        other => panic!("expected conflicts, got {:?}", other),
    }
    assert!(outcome.needs_confirmation());
}

#[test]
fn forced_preflight_lists_what_will_be_cancelled() {
    let outcome = preflight(&block_request(2, 4, Some(true)), &r1_bookings()).unwrap();
    match outcome {
        Preflight::Forced(conflicts) => {
            let ids: Vec<&str> = conflicts.iter().map(|c| c.booking.id.as_str()).collect();
            assert_eq!(ids, vec!["2", "3"]);
        }
        other => panic!("expected forced, got {:?}", other),
    }
}

#[test]
fn reversed_request_is_rejected() {
    let err = preflight(&block_request(4, 2, None), &r1_bookings()).unwrap_err();
    assert!(matches!(err, BookingError::InvalidRange { .. }));
}

#[test]
fn create_request_uses_api_field_names() {
    let body = serde_json::to_value(block_request(2, 4, Some(true))).unwrap();
    assert_eq!(body["roomId"], "R1");
    assert_eq!(body["checkInDate"], "2024-05-02");
    assert_eq!(body["checkOutDate"], "2024-05-04");
    assert_eq!(body["status"], "Blocked");
    assert_eq!(body["forceBlock"], true);

    let unforced = serde_json::to_value(block_request(2, 4, None)).unwrap();
    assert!(unforced.get("forceBlock").is_none());
}

#[test]
fn conflict_response_round_trips_the_409_body() {
    let conflicts = find_conflicts("R1", day(2), day(3), &r1_bookings());
    let response = ConflictResponse::from_conflicts("R1", &conflicts);

    assert!(response.error.contains("2024-05-02, 2024-05-03"));
    let body = serde_json::to_string(&response).unwrap();
    assert!(body.contains("\"canForceBlock\":true"));

    let parsed: ConflictResponse =
        serde_json::from_str(r#"{"error":"Room busy","canForceBlock":false}"#).unwrap();
    assert!(!parsed.can_force_block);
}

#[test]
fn unblocking_a_range_deletes_each_night() {
    let bookings = vec![
        Booking::new("b1", "R1", day(1), BookingStatus::Blocked),
        Booking::new("b2", "R1", day(2), BookingStatus::Blocked),
    ];
    let blocks = current_blocks(&bookings);

    let requests = unblock_requests(&blocks[0]);

    let ids: Vec<&str> = requests.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b1", "b2"]);
    assert_eq!(requests[0].query_pairs(), vec![("id", "b1".to_string())]);
}

#[test]
fn bookings_query_pairs() {
    let query = BookingsQuery {
        year: 2024,
        month: 5,
        room_id: Some("R1".to_string()),
    };
    assert_eq!(
        query.query_pairs(),
        vec![
            ("year", "2024".to_string()),
            ("month", "5".to_string()),
            ("roomId", "R1".to_string()),
        ]
    );
}

#[test]
fn cancel_request_bodies_and_matching() {
    let by_trf = CancelRequest::ByTravelRequest {
        trf_id: "TRF-9".to_string(),
    };
    assert_eq!(serde_json::to_string(&by_trf).unwrap(), r#"{"trfId":"TRF-9"}"#);

    let by_staff: CancelRequest = serde_json::from_str(r#"{"staffId":"S-3"}"#).unwrap();
    assert_eq!(
        by_staff,
        CancelRequest::ByStaff {
            staff_id: "S-3".to_string()
        }
    );

    let mut booking = Booking::new("1", "R1", day(1), BookingStatus::Confirmed);
    booking.trf_id = Some("TRF-9".to_string());
    assert!(by_trf.matches(&booking));
    assert!(!by_staff.matches(&booking));
}
