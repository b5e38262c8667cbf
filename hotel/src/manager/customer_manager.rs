use std::sync::Arc;

use hotel_orm::Gateway;

use super::{delete_bookings, finish, BOOKINGS_BY_CUSTOMER};
use crate::error::{InvariantViolation, Result};
use crate::model::{Booking, Customer};

pub struct CustomerManager {
    gateway: Arc<Gateway>,
}

impl CustomerManager {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn add_customer(&self, customer: &Customer) -> Result<i64> {
        let id = self.gateway.create(customer).await?;
        tracing::info!(id, email = %customer.email, "customer added");
        Ok(id)
    }

    pub async fn find_customer(&self, id: i64) -> Result<Option<Customer>> {
        Ok(self.gateway.find(id).await?)
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        Ok(self
            .gateway
            .query("SELECT * FROM customer ORDER BY id", &[])
            .await?)
    }

    pub async fn update_customer(&self, customer: &Customer) -> Result<()> {
        self.gateway.update(customer).await?;
        Ok(())
    }

    pub async fn delete_customer(&self, id: i64) -> Result<()> {
        self.gateway.delete::<Customer>(id).await?;
        Ok(())
    }

    /// Delete the customer and all of their bookings atomically. Returns the
    /// number of bookings removed.
    pub async fn delete_customer_with_bookings(&self, customer_id: i64) -> Result<usize> {
        self.gateway.begin_transaction().await?;
        let result = self.cascade_delete(customer_id).await;
        finish(&self.gateway, result).await
    }

    async fn cascade_delete(&self, customer_id: i64) -> Result<usize> {
        if self.gateway.find::<Customer>(customer_id).await?.is_none() {
            return Err(InvariantViolation::CustomerNotFound(customer_id).into());
        }

        let bookings: Vec<Booking> = self
            .gateway
            .query(BOOKINGS_BY_CUSTOMER, &[customer_id.into()])
            .await?;
        let deleted = delete_bookings(&self.gateway, &bookings).await?;
        self.gateway.delete::<Customer>(customer_id).await?;

        tracing::info!(customer_id, bookings = deleted, "customer deleted with bookings");
        Ok(deleted)
    }
}
