//! Bulk import of records from comma-separated files.
//!
//! The first line is a header and is skipped; the caller supplies the field
//! order instead. Values are split on `,` with no quoting support and trimmed
//! before conversion. A whole file is imported in one transaction: one bad
//! row and nothing from that file is kept.
//!
//! Imported rooms and bookings obey the same rules as the managers: a room
//! needs a unique number and positive price, and an active booking needs an
//! available room, which it then occupies.

use std::fs::File;
use std::future::Future;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use hotel_orm::{from_delimited_row, Entity, Gateway};

use crate::error::{Result, ServiceError};
use crate::manager::{check_new_room, finish, insert_booking, validate_booking};
use crate::model::{Booking, BookingService, Customer, Room, Service};

/// A record the importer can insert. Runs inside the import transaction.
pub trait Importable: Entity {
    fn import(self, gateway: &Gateway) -> impl Future<Output = Result<()>> {
        async move {
            gateway.create(&self).await?;
            Ok(())
        }
    }
}

impl Importable for Customer {}
impl Importable for Service {}
impl Importable for BookingService {}

impl Importable for Room {
    fn import(self, gateway: &Gateway) -> impl Future<Output = Result<()>> {
        async move {
            check_new_room(gateway, &self).await?;
            gateway.create(&self).await?;
            Ok(())
        }
    }
}

impl Importable for Booking {
    fn import(self, gateway: &Gateway) -> impl Future<Output = Result<()>> {
        async move {
            validate_booking(self.check_in, self.check_out, self.total_amount)?;
            insert_booking(gateway, self).await?;
            Ok(())
        }
    }
}

pub struct CsvImporter {
    gateway: Arc<Gateway>,
}

impl CsvImporter {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Import every data row of the file at `path` as an `E`. Returns the
    /// number of records inserted.
    pub async fn import_file<E: Importable>(
        &self,
        path: &Path,
        field_order: &[&str],
    ) -> Result<usize> {
        let file = File::open(path).map_err(|source| ServiceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let lines = read_lines(BufReader::new(file), &path.display().to_string())?;
        let count = self.import_lines::<E>(&lines, field_order).await?;
        tracing::info!(path = %path.display(), entity = E::ENTITY, count, "import finished");
        Ok(count)
    }

    /// Like [`CsvImporter::import_file`] for an already open source.
    pub async fn import_reader<E: Importable, R: BufRead>(
        &self,
        reader: R,
        field_order: &[&str],
    ) -> Result<usize> {
        let lines = read_lines(reader, "<input>")?;
        self.import_lines::<E>(&lines, field_order).await
    }

    async fn import_lines<E: Importable>(
        &self,
        lines: &[String],
        field_order: &[&str],
    ) -> Result<usize> {
        self.gateway.begin_transaction().await?;
        let result = self.insert_rows::<E>(lines, field_order).await;
        finish(&self.gateway, result).await
    }

    async fn insert_rows<E: Importable>(
        &self,
        lines: &[String],
        field_order: &[&str],
    ) -> Result<usize> {
        let mut count = 0;
        // Line numbers are 1-based and count the header.
        for (index, line) in lines.iter().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let line_number = index + 1;
            let raw: Vec<&str> = line.split(',').collect();
            let record: E = from_delimited_row(field_order, &raw).map_err(|source| {
                ServiceError::Import {
                    line: line_number,
                    source,
                }
            })?;
            record
                .import(&self.gateway)
                .await
                .map_err(|err| match err {
                    ServiceError::Invariant(source) => ServiceError::Rejected {
                        line: line_number,
                        source,
                    },
                    other => other,
                })?;
            count += 1;
        }
        Ok(count)
    }
}

fn read_lines<R: BufRead>(reader: R, label: &str) -> Result<Vec<String>> {
    reader
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|source| ServiceError::Io {
            path: label.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::error::InvariantViolation;
    use crate::manager::BookingManager;
    use crate::model::{BookingStatus, Gender, RoomType};
    use chrono::NaiveDate;
    use hotel_orm::MappingError;
    use std::io::Write;

    const ROOM_FIELDS: &[&str] = &["number", "room_type", "price_per_night", "available"];

    async fn setup() -> (Arc<Gateway>, CsvImporter) {
        let db = Database::new_in_memory().await.unwrap();
        let gateway = Arc::new(db.into_gateway());
        (gateway.clone(), CsvImporter::new(gateway))
    }

    async fn rooms(gateway: &Gateway) -> Vec<Room> {
        gateway
            .query("SELECT * FROM room ORDER BY room_number", &[])
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn imports_file_skipping_header_and_blank_lines() {
        let (gateway, importer) = setup().await;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "number,type,price,available").unwrap();
        writeln!(file, "101, single , 79.5, true").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "102,SUITE,250,false").unwrap();

        let count = importer
            .import_file::<Room>(file.path(), ROOM_FIELDS)
            .await
            .unwrap();
        assert_eq!(count, 2);

        let stored = rooms(&gateway).await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].room_type, RoomType::Single);
        assert_eq!(stored[0].price_per_night, 79.5);
        assert_eq!(stored[1].room_type, RoomType::Suite);
        assert!(!stored[1].available);
    }

    #[tokio::test]
    async fn bad_row_rolls_back_whole_file() {
        let (gateway, importer) = setup().await;
        let input = "number,type,price,available\n101,single,80,true\n102,double,90\n";

        let err = importer
            .import_reader::<Room, _>(input.as_bytes(), ROOM_FIELDS)
            .await
            .unwrap_err();
        match err {
            ServiceError::Import { line, source } => {
                assert_eq!(line, 3);
                assert!(matches!(
                    source,
                    MappingError::FieldCount {
                        expected: 4,
                        found: 3
                    }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(rooms(&gateway).await.is_empty());
        assert!(!gateway.is_in_transaction().await);
    }

    #[tokio::test]
    async fn unknown_enum_value_names_the_line() {
        let (_gateway, importer) = setup().await;
        let input = "h\n101,penthouse,80,true\n";
        let err = importer
            .import_reader::<Room, _>(input.as_bytes(), ROOM_FIELDS)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Import {
                line: 2,
                source: MappingError::UnknownVariant { .. }
            }
        ));
    }

    #[tokio::test]
    async fn header_only_imports_nothing() {
        let (_gateway, importer) = setup().await;
        let count = importer
            .import_reader::<Room, _>("number,type,price,available\n".as_bytes(), ROOM_FIELDS)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let (_gateway, importer) = setup().await;
        let err = importer
            .import_file::<Room>(Path::new("/nonexistent/rooms.csv"), ROOM_FIELDS)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Io { .. }));
    }

    const BOOKING_FIELDS: &[&str] = &[
        "customer_id",
        "room_id",
        "check_in",
        "check_out",
        "total_amount",
        "status",
    ];

    async fn guest_and_room(gateway: &Gateway) -> (i64, i64) {
        let customer_id = gateway
            .create(&Customer::new("Ines", "ines@example.com", Gender::Female))
            .await
            .unwrap();
        let room_id = gateway
            .create(&Room::new(301, RoomType::Double, 100.0))
            .await
            .unwrap();
        (customer_id, room_id)
    }

    async fn room_available(gateway: &Gateway, room_id: i64) -> bool {
        gateway.find::<Room>(room_id).await.unwrap().unwrap().available
    }

    #[tokio::test]
    async fn imported_active_booking_occupies_room() {
        let (gateway, importer) = setup().await;
        let (c, r) = guest_and_room(&gateway).await;
        let input = format!("h\n{c},{r},2025-01-01,2025-01-05,400,active\n");

        let count = importer
            .import_reader::<Booking, _>(input.as_bytes(), BOOKING_FIELDS)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert!(!room_available(&gateway, r).await);

        let err = BookingManager::new(gateway.clone())
            .create_booking(
                c,
                r,
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 2, 2).unwrap(),
                100.0,
            )
            .await
            .unwrap_err();
        assert_eq!(err.invariant(), Some(&InvariantViolation::RoomUnavailable(r)));
    }

    #[tokio::test]
    async fn imported_booking_with_bad_dates_or_amount_is_rejected() {
        let (gateway, importer) = setup().await;
        let (c, r) = guest_and_room(&gateway).await;

        let input = format!("h\n{c},{r},2025-01-05,2025-01-01,10,active\n");
        let err = importer
            .import_reader::<Booking, _>(input.as_bytes(), BOOKING_FIELDS)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Rejected {
                line: 2,
                source: InvariantViolation::InvalidStay { .. }
            }
        ));

        let input = format!("h\n{c},{r},2025-01-01,2025-01-05,-10,active\n");
        let err = importer
            .import_reader::<Booking, _>(input.as_bytes(), BOOKING_FIELDS)
            .await
            .unwrap_err();
        assert!(matches!(
            err.invariant(),
            Some(InvariantViolation::NegativeAmount(_))
        ));

        assert!(room_available(&gateway, r).await);
        let stored: Vec<Booking> = gateway.query("SELECT * FROM booking", &[]).await.unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn second_active_booking_for_room_rolls_back_file() {
        let (gateway, importer) = setup().await;
        let (c, r) = guest_and_room(&gateway).await;
        let input = format!(
            "h\n\
             {c},{r},2025-01-01,2025-01-05,400,active\n\
             {c},{r},2025-03-01,2025-03-02,100,active\n"
        );

        let err = importer
            .import_reader::<Booking, _>(input.as_bytes(), BOOKING_FIELDS)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Rejected {
                line: 3,
                source: InvariantViolation::RoomUnavailable(_)
            }
        ));
        assert!(room_available(&gateway, r).await);
        assert!(!gateway.is_in_transaction().await);
    }

    #[tokio::test]
    async fn historic_bookings_leave_room_alone() {
        let (gateway, importer) = setup().await;
        let (c, r) = guest_and_room(&gateway).await;
        let input = format!(
            "h\n\
             {c},{r},2024-01-01,2024-01-05,400,completed\n\
             {c},{r},2024-02-01,2024-02-02,0,cancelled\n"
        );

        let count = importer
            .import_reader::<Booking, _>(input.as_bytes(), BOOKING_FIELDS)
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert!(room_available(&gateway, r).await);

        let stored: Vec<Booking> = gateway
            .query("SELECT * FROM booking ORDER BY id", &[])
            .await
            .unwrap();
        assert_eq!(stored[0].status, BookingStatus::Completed);
        assert_eq!(stored[1].status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn imported_room_with_taken_number_is_rejected() {
        let (gateway, importer) = setup().await;
        let input = "h\n101,single,80,true\n101,suite,300,true\n";
        let err = importer
            .import_reader::<Room, _>(input.as_bytes(), ROOM_FIELDS)
            .await
            .unwrap_err();
        assert_eq!(err.invariant(), Some(&InvariantViolation::DuplicateRoomNumber(101)));
        assert!(rooms(&gateway).await.is_empty());
    }
}
