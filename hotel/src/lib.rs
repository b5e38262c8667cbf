//! Hotel bookkeeping on top of the `hotel-orm` persistence layer.
//!
//! | Module | Purpose |
//! |---|---|
//! | [`model`] | Room, Customer, Booking, Service records and their enumerations |
//! | [`manager`] | Transactional domain operations over the shared [`Gateway`] |
//! | [`csv_import`] | Bulk import of records from comma-separated files |
//! | [`database`] | Connection bootstrap and schema migrations |
//! | [`config`] | Database path resolution |
//! | [`error`] | Business-rule and service error types |

pub mod config;
pub mod csv_import;
pub mod database;
pub mod error;
pub mod manager;
pub mod model;

#[cfg(test)]
mod integration_tests;

use std::path::Path;
use std::sync::Arc;

use hotel_orm::{Gateway, PersistenceError};

use csv_import::CsvImporter;
use database::Database;
use manager::{BookingManager, BookingServiceManager, CustomerManager, RoomManager};

/// Every manager wired to one shared gateway.
pub struct Hotel {
    gateway: Arc<Gateway>,
    pub rooms: RoomManager,
    pub customers: CustomerManager,
    pub bookings: BookingManager,
    pub services: BookingServiceManager,
    pub importer: CsvImporter,
}

impl Hotel {
    pub async fn open(path: &Path) -> Result<Self, PersistenceError> {
        let db = Database::open(path).await?;
        Ok(Self::with_gateway(db.into_gateway()))
    }

    pub fn with_gateway(gateway: Gateway) -> Self {
        let gateway = Arc::new(gateway);
        Self {
            rooms: RoomManager::new(gateway.clone()),
            customers: CustomerManager::new(gateway.clone()),
            bookings: BookingManager::new(gateway.clone()),
            services: BookingServiceManager::new(gateway.clone()),
            importer: CsvImporter::new(gateway.clone()),
            gateway,
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Release the managers and close the connection.
    pub async fn close(self) -> Result<(), PersistenceError> {
        let Hotel {
            gateway,
            rooms,
            customers,
            bookings,
            services,
            importer,
        } = self;
        drop((rooms, customers, bookings, services, importer));
        match Arc::try_unwrap(gateway) {
            Ok(gateway) => gateway.close().await,
            Err(_) => {
                tracing::warn!("gateway still shared at close, leaving connection to drop");
                Ok(())
            }
        }
    }
}
