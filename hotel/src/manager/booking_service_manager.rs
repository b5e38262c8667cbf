use std::sync::Arc;

use hotel_orm::Gateway;

use crate::error::{InvariantViolation, Result};
use crate::model::{Booking, BookingService, Service};

pub struct BookingServiceManager {
    gateway: Arc<Gateway>,
}

impl BookingServiceManager {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn add_service(&self, service: &Service) -> Result<i64> {
        let id = self.gateway.create(service).await?;
        tracing::info!(id, name = %service.name, "service added");
        Ok(id)
    }

    pub async fn list_services(&self) -> Result<Vec<Service>> {
        Ok(self
            .gateway
            .query("SELECT * FROM service ORDER BY id", &[])
            .await?)
    }

    /// Attach a service to a booking and return the link id.
    pub async fn link_service(&self, booking_id: i64, service_id: i64) -> Result<i64> {
        if self.gateway.find::<Booking>(booking_id).await?.is_none() {
            return Err(InvariantViolation::BookingNotFound(booking_id).into());
        }
        if self.gateway.find::<Service>(service_id).await?.is_none() {
            return Err(InvariantViolation::ServiceNotFound(service_id).into());
        }

        let link = BookingService {
            id: None,
            booking_id,
            service_id,
        };
        Ok(self.gateway.create(&link).await?)
    }

    pub async fn services_for_booking(&self, booking_id: i64) -> Result<Vec<Service>> {
        Ok(self
            .gateway
            .query(
                "SELECT s.* FROM service s \
                 JOIN booking_service bs ON s.id = bs.service_id \
                 WHERE bs.booking_id = ? ORDER BY s.id",
                &[booking_id.into()],
            )
            .await?)
    }

    /// Remove every link between the booking and the service. Returns whether
    /// anything was removed.
    pub async fn unlink_service(&self, booking_id: i64, service_id: i64) -> Result<bool> {
        let removed = self
            .gateway
            .execute(
                "DELETE FROM booking_service WHERE booking_id = ? AND service_id = ?",
                &[booking_id.into(), service_id.into()],
            )
            .await?;
        Ok(removed > 0)
    }
}
