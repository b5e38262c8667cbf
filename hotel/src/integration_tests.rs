use chrono::NaiveDate;
use hotel_orm::PersistenceError;

use crate::database::Database;
use crate::error::{InvariantViolation, ServiceError};
use crate::model::{Booking, BookingStatus, Customer, Gender, Room, RoomType, Service};
use crate::Hotel;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn hotel() -> Hotel {
    let db = Database::new_in_memory().await.unwrap();
    Hotel::with_gateway(db.into_gateway())
}

fn sample_customer(name: &str) -> Customer {
    Customer::new(name, format!("{}@example.com", name.to_lowercase()), Gender::Other)
        .with_phone("555-0199")
        .with_birthdate(date(1985, 11, 2))
}

async fn room_available(hotel: &Hotel, room_id: i64) -> bool {
    hotel.rooms.find_room(room_id).await.unwrap().unwrap().available
}

#[tokio::test]
async fn test_every_record_round_trips() {
    let hotel = hotel().await;

    let customer = sample_customer("Mira");
    let customer_id = hotel.customers.add_customer(&customer).await.unwrap();
    let stored = hotel.customers.find_customer(customer_id).await.unwrap().unwrap();
    assert_eq!(stored, Customer { id: Some(customer_id), ..customer });

    let room = Room::new(310, RoomType::Suite, 275.5);
    let room_id = hotel.rooms.add_room(&room).await.unwrap();
    let stored = hotel.rooms.find_room(room_id).await.unwrap().unwrap();
    assert_eq!(stored, Room { id: Some(room_id), ..room });

    let service = Service::new("Late checkout", 25.0);
    let service_id = hotel.services.add_service(&service).await.unwrap();
    let stored: Service = hotel.gateway().find(service_id).await.unwrap().unwrap();
    assert_eq!(stored, Service { id: Some(service_id), ..service });

    let booking = hotel
        .bookings
        .create_booking(customer_id, room_id, date(2025, 5, 1), date(2025, 5, 3), 551.0)
        .await
        .unwrap();
    let stored = hotel.bookings.get_booking(booking.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(stored, booking);
}

#[tokio::test]
async fn test_availability_follows_booking_lifecycle() {
    let hotel = hotel().await;
    let customer_id = hotel.customers.add_customer(&sample_customer("Ann")).await.unwrap();
    let room_id = hotel
        .rooms
        .add_room(&Room::new(101, RoomType::Single, 90.0))
        .await
        .unwrap();
    assert!(room_available(&hotel, room_id).await);

    let booking = hotel
        .bookings
        .create_booking(customer_id, room_id, date(2025, 1, 10), date(2025, 1, 12), 180.0)
        .await
        .unwrap();
    assert!(!room_available(&hotel, room_id).await);
    assert!(hotel.rooms.list_available_rooms().await.unwrap().is_empty());

    hotel.bookings.cancel_booking(booking.id.unwrap()).await.unwrap();
    assert!(room_available(&hotel, room_id).await);
    assert!(hotel.bookings.bookings_for_room(room_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_booking_leaves_no_trace() {
    let hotel = hotel().await;
    let first = hotel.customers.add_customer(&sample_customer("Bo")).await.unwrap();
    let second = hotel.customers.add_customer(&sample_customer("Cy")).await.unwrap();
    let room_id = hotel
        .rooms
        .add_room(&Room::new(102, RoomType::Double, 120.0))
        .await
        .unwrap();

    hotel
        .bookings
        .create_booking(first, room_id, date(2025, 2, 1), date(2025, 2, 5), 480.0)
        .await
        .unwrap();

    let err = hotel
        .bookings
        .create_booking(second, room_id, date(2025, 3, 1), date(2025, 3, 2), 120.0)
        .await
        .unwrap_err();
    assert!(err.is_invariant_violation());
    assert_eq!(err.invariant(), Some(&InvariantViolation::RoomUnavailable(room_id)));

    assert!(hotel.bookings.bookings_for_customer(second).await.unwrap().is_empty());
    assert_eq!(hotel.bookings.bookings_for_room(room_id).await.unwrap().len(), 1);
    assert!(!room_available(&hotel, room_id).await);
    assert!(!hotel.gateway().is_in_transaction().await);
}

#[tokio::test]
async fn test_customer_cascade_removes_every_booking() {
    let hotel = hotel().await;
    let customer_id = hotel.customers.add_customer(&sample_customer("Dee")).await.unwrap();
    let other_id = hotel.customers.add_customer(&sample_customer("Eli")).await.unwrap();

    let mut room_ids = Vec::new();
    for number in 201..=203 {
        let id = hotel
            .rooms
            .add_room(&Room::new(number, RoomType::Double, 100.0))
            .await
            .unwrap();
        room_ids.push(id);
    }
    for &room_id in &room_ids[..2] {
        hotel
            .bookings
            .create_booking(customer_id, room_id, date(2025, 4, 1), date(2025, 4, 2), 100.0)
            .await
            .unwrap();
    }
    hotel
        .bookings
        .create_booking(other_id, room_ids[2], date(2025, 4, 1), date(2025, 4, 2), 100.0)
        .await
        .unwrap();

    let removed = hotel.customers.delete_customer_with_bookings(customer_id).await.unwrap();
    assert_eq!(removed, 2);
    assert!(hotel.customers.find_customer(customer_id).await.unwrap().is_none());

    let leftover: Vec<Booking> = hotel
        .gateway()
        .query("SELECT * FROM booking WHERE customer_id = ?", &[customer_id.into()])
        .await
        .unwrap();
    assert!(leftover.is_empty());
    assert_eq!(hotel.bookings.bookings_for_customer(other_id).await.unwrap().len(), 1);

    let err = hotel.bookings.bookings_for_customer(customer_id).await.unwrap_err();
    assert_eq!(err.invariant(), Some(&InvariantViolation::CustomerNotFound(customer_id)));
}

#[tokio::test]
async fn test_room_cascade_removes_its_bookings() {
    let hotel = hotel().await;
    let customer_id = hotel.customers.add_customer(&sample_customer("Fay")).await.unwrap();
    let room_id = hotel
        .rooms
        .add_room(&Room::new(404, RoomType::Single, 70.0))
        .await
        .unwrap();
    hotel
        .bookings
        .create_booking(customer_id, room_id, date(2025, 8, 1), date(2025, 8, 4), 210.0)
        .await
        .unwrap();

    assert_eq!(hotel.rooms.delete_room_with_bookings(room_id).await.unwrap(), 1);
    assert!(hotel.rooms.find_room(room_id).await.unwrap().is_none());
    assert!(hotel.bookings.bookings_for_customer(customer_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_csv_import_all_or_nothing() {
    let hotel = hotel().await;
    let fields = ["name", "email", "phone", "gender", "birthdate"];

    let good = "name,email,phone,gender,birthdate\n\
                Gus,gus@example.com,555-0101,male,1979-03-14\n\
                Hana,hana@example.com,,FEMALE,\n";
    let count = hotel
        .importer
        .import_reader::<Customer, _>(good.as_bytes(), &fields)
        .await
        .unwrap();
    assert_eq!(count, 2);

    let customers = hotel.customers.list_customers().await.unwrap();
    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0].gender, Gender::Male);
    assert_eq!(customers[0].birthdate, Some(date(1979, 3, 14)));
    assert_eq!(customers[1].gender, Gender::Female);
    assert_eq!(customers[1].phone, None);
    assert_eq!(customers[1].birthdate, None);

    let bad = "name,email,phone,gender,birthdate\n\
               Ivo,ivo@example.com,555-0102,male,1990-01-01\n\
               Jun,jun@example.com,male\n";
    let err = hotel
        .importer
        .import_reader::<Customer, _>(bad.as_bytes(), &fields)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Import { line: 3, .. }));
    assert_eq!(hotel.customers.list_customers().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_status_transitions_drive_availability() {
    let hotel = hotel().await;
    let customer_id = hotel.customers.add_customer(&sample_customer("Kai")).await.unwrap();
    let room_id = hotel
        .rooms
        .add_room(&Room::new(501, RoomType::Suite, 300.0))
        .await
        .unwrap();
    let booking_id = hotel
        .bookings
        .create_booking(customer_id, room_id, date(2025, 9, 1), date(2025, 9, 2), 300.0)
        .await
        .unwrap()
        .id
        .unwrap();

    hotel
        .bookings
        .update_status(booking_id, BookingStatus::Cancelled)
        .await
        .unwrap();
    assert!(room_available(&hotel, room_id).await);

    for status in [BookingStatus::Active, BookingStatus::Completed] {
        hotel.bookings.update_status(booking_id, status).await.unwrap();
        assert!(!room_available(&hotel, room_id).await);
        let stored = hotel.bookings.get_booking(booking_id).await.unwrap().unwrap();
        assert_eq!(stored.status, status);
    }

    let err = hotel
        .bookings
        .update_status(999, BookingStatus::Completed)
        .await
        .unwrap_err();
    assert_eq!(err.invariant(), Some(&InvariantViolation::BookingNotFound(999)));
}

#[tokio::test]
async fn test_booking_services_join() {
    let hotel = hotel().await;
    let customer_id = hotel.customers.add_customer(&sample_customer("Lu")).await.unwrap();
    let room_id = hotel
        .rooms
        .add_room(&Room::new(12, RoomType::Double, 110.0))
        .await
        .unwrap();
    let booking_id = hotel
        .bookings
        .create_booking(customer_id, room_id, date(2025, 10, 1), date(2025, 10, 3), 220.0)
        .await
        .unwrap()
        .id
        .unwrap();
    let spa = hotel.services.add_service(&Service::new("Spa", 45.0)).await.unwrap();

    hotel.services.link_service(booking_id, spa).await.unwrap();
    let services = hotel.services.services_for_booking(booking_id).await.unwrap();
    assert_eq!(services, vec![Service { id: Some(spa), ..Service::new("Spa", 45.0) }]);
}

#[tokio::test]
async fn test_storage_failures_are_not_invariant_violations() {
    let hotel = hotel().await;
    hotel
        .gateway()
        .execute("DROP TABLE booking", &[])
        .await
        .unwrap();

    let err = hotel.bookings.bookings_for_room(1).await.unwrap_err();
    assert!(!err.is_invariant_violation());
    assert!(matches!(
        err,
        ServiceError::Persistence(PersistenceError::Database(_))
    ));
}

#[tokio::test]
async fn test_file_database_survives_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hotel.db");

    let hotel = Hotel::open(&path).await.unwrap();
    hotel
        .rooms
        .add_room(&Room::new(1, RoomType::Single, 50.0))
        .await
        .unwrap();
    hotel.close().await.unwrap();

    let hotel = Hotel::open(&path).await.unwrap();
    let rooms = hotel.rooms.list_rooms().await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].number, 1);
    hotel.close().await.unwrap();
}
