//! Read-side analytics derived from room and booking sets.
//!
//! Pure functions — callers pass the snapshots they already hold.
//! Interval arithmetic is shared with the conflict engine.

use chrono::{DateTime, Utc};
use innkeep_core::models::booking::{Booking, BookingStatus};
use innkeep_core::models::room::{Room, RoomStatus};

use crate::overlap::{clamp, nights};

/// Revenue totals over a booking set. Cancelled bookings contribute
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevenueSummary {
    pub total: f64,
    pub paid: f64,
    pub pending: f64,
}

/// Occupied room-nights over `[start, end)` as a percentage of the
/// total room-nights the property could have sold in that window.
///
/// Each non-cancelled booking contributes the ceil-nights of its
/// overlap with the window. Returns 0 when there are no rooms or the
/// window is empty.
pub fn occupancy_rate(
    rooms: &[Room],
    bookings: &[Booking],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> f64 {
    if rooms.is_empty() {
        return 0.0;
    }

    let days = nights(start, end);
    if days <= 0 {
        return 0.0;
    }

    let mut occupied_room_nights = 0i64;
    for booking in bookings {
        if booking.status == BookingStatus::Cancelled {
            continue;
        }
        if let Some((overlap_start, overlap_end)) =
            clamp(booking.check_in, booking.check_out, start, end)
        {
            occupied_room_nights += nights(overlap_start, overlap_end);
        }
    }

    let total_room_nights = rooms.len() as i64 * days;
    occupied_room_nights as f64 / total_room_nights as f64 * 100.0
}

/// Total, paid, and pending revenue over a booking set.
pub fn revenue(bookings: &[Booking]) -> RevenueSummary {
    let mut total = 0.0;
    let mut paid = 0.0;

    for booking in bookings {
        if booking.status == BookingStatus::Cancelled {
            continue;
        }
        total += booking.total_cost;
        paid += booking.paid_amount;
    }

    RevenueSummary {
        total,
        paid,
        pending: total - paid,
    }
}

pub fn occupied_room_count(rooms: &[Room]) -> usize {
    rooms.iter().filter(|r| r.status == RoomStatus::Occupied).count()
}

pub fn available_room_count(rooms: &[Room]) -> usize {
    rooms
        .iter()
        .filter(|r| r.status == RoomStatus::Available)
        .count()
}

pub fn maintenance_room_count(rooms: &[Room]) -> usize {
    rooms
        .iter()
        .filter(|r| r.status == RoomStatus::Maintenance)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use innkeep_core::models::booking::PaymentStatus;
    use innkeep_core::models::room::RoomType;
    use uuid::Uuid;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn room(number: &str, status: RoomStatus) -> Room {
        Room {
            id: Uuid::new_v4(),
            room_number: number.into(),
            room_type: RoomType::Single,
            capacity: 1,
            price_per_night: 100.0,
            status,
            amenities: vec![],
            notes: None,
            created_at: day(0),
            updated_at: day(0),
        }
    }

    fn booking(from: i64, to: i64, status: BookingStatus, total: f64, paid: f64) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            guest_name: "Guest".into(),
            guest_contact: "555".into(),
            room_id: Uuid::new_v4(),
            check_in: day(from),
            check_out: day(to),
            status,
            payment_status: PaymentStatus::Unpaid,
            total_cost: total,
            paid_amount: paid,
            notes: None,
            created_at: day(0),
            updated_at: day(0),
        }
    }

    #[test]
    fn full_window_booking_on_one_of_two_rooms_is_half_occupancy() {
        let rooms = vec![
            room("101", RoomStatus::Available),
            room("102", RoomStatus::Available),
        ];
        let bookings = vec![booking(0, 7, BookingStatus::Reserved, 700.0, 0.0)];

        let rate = occupancy_rate(&rooms, &bookings, day(0), day(7));
        assert_eq!(rate, 50.0);
    }

    #[test]
    fn booking_outside_the_window_contributes_nothing() {
        let rooms = vec![room("101", RoomStatus::Available)];
        let bookings = vec![booking(10, 12, BookingStatus::Reserved, 200.0, 0.0)];

        assert_eq!(occupancy_rate(&rooms, &bookings, day(0), day(7)), 0.0);
    }

    #[test]
    fn booking_is_clamped_to_the_window() {
        let rooms = vec![room("101", RoomStatus::Available)];
        // Covers days 5..10; window is 0..7, so 2 nights count.
        let bookings = vec![booking(5, 10, BookingStatus::CheckedIn, 500.0, 0.0)];

        let rate = occupancy_rate(&rooms, &bookings, day(0), day(7));
        assert!((rate - 2.0 / 7.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn cancelled_bookings_do_not_occupy() {
        let rooms = vec![room("101", RoomStatus::Available)];
        let bookings = vec![booking(0, 7, BookingStatus::Cancelled, 700.0, 0.0)];

        assert_eq!(occupancy_rate(&rooms, &bookings, day(0), day(7)), 0.0);
    }

    #[test]
    fn empty_room_set_or_window_is_zero() {
        let bookings = vec![booking(0, 7, BookingStatus::Reserved, 700.0, 0.0)];
        assert_eq!(occupancy_rate(&[], &bookings, day(0), day(7)), 0.0);

        let rooms = vec![room("101", RoomStatus::Available)];
        assert_eq!(occupancy_rate(&rooms, &bookings, day(7), day(7)), 0.0);
        assert_eq!(occupancy_rate(&rooms, &bookings, day(7), day(0)), 0.0);
    }

    #[test]
    fn revenue_excludes_cancelled_bookings() {
        let bookings = vec![
            booking(0, 2, BookingStatus::CheckedOut, 300.0, 300.0),
            booking(2, 3, BookingStatus::Reserved, 150.0, 50.0),
            booking(3, 5, BookingStatus::CheckedIn, 300.0, 0.0),
            booking(5, 10, BookingStatus::Cancelled, 500.0, 500.0),
        ];

        let summary = revenue(&bookings);
        assert_eq!(summary.total, 750.0);
        assert_eq!(summary.paid, 350.0);
        assert_eq!(summary.pending, 400.0);
    }

    #[test]
    fn revenue_of_empty_set_is_zero() {
        let summary = revenue(&[]);
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.paid, 0.0);
        assert_eq!(summary.pending, 0.0);
    }

    #[test]
    fn status_counts() {
        let rooms = vec![
            room("101", RoomStatus::Available),
            room("102", RoomStatus::Occupied),
            room("103", RoomStatus::Occupied),
            room("104", RoomStatus::Maintenance),
        ];

        assert_eq!(available_room_count(&rooms), 1);
        assert_eq!(occupied_room_count(&rooms), 2);
        assert_eq!(maintenance_room_count(&rooms), 1);
    }
}
