//! Payment endpoints: settling a pending booking.

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiResult};
use crate::api::bookings::Booking;

#[derive(Debug, Serialize)]
struct PaymentRequest<'a> {
    booking_id: i64,
    amount: i64,
    phone: &'a str,
}

/// Receipt returned once a payment is recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub id: i64,
    pub booking_id: i64,
    pub amount: i64,
}

impl ApiClient {
    /// Pays for a booking at the flat hourly rate.
    ///
    /// The amount is derived from the booking's hours; the server marks the
    /// booking as paid.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn pay_for_booking(&self, booking: &Booking) -> ApiResult<PaymentReceipt> {
        self.process_payment(booking.id, booking.amount(), &booking.phone)
            .await
    }

    /// Records a payment against a booking id.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn process_payment(
        &self,
        booking_id: i64,
        amount: i64,
        phone: &str,
    ) -> ApiResult<PaymentReceipt> {
        let body = PaymentRequest {
            booking_id,
            amount,
            phone,
        };
        self.post_json("/payments/process", &body, "Payment failed").await
    }
}
