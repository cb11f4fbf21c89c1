//! Async booking session: one wizard plus the services it talks to.
//!
//! The wizard lock is never held across an await on the payment gateway or
//! the booking sink. The charge itself runs on its own task so a caller that
//! goes away mid-payment cannot leave the wizard stuck with a payment in
//! flight.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::catalog::CatalogProvider;

use super::error::BookingError;
use super::payment::{PaymentDetails, PaymentGateway};
use super::record::BookingRecord;
use super::sink::BookingSink;
use super::wizard::BookingWizard;

/// Shared services every booking session uses
#[derive(Clone)]
pub struct BookingServices {
    pub catalog: Arc<dyn CatalogProvider>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub sink: Arc<dyn BookingSink>,
    /// Upper bound on a single gateway call
    pub payment_timeout: Duration,
}

pub struct BookingSession {
    id: Uuid,
    owner: Uuid,
    created_at: DateTime<Utc>,
    wizard: Mutex<BookingWizard>,
    gateway: Arc<dyn PaymentGateway>,
    sink: Arc<dyn BookingSink>,
    payment_timeout: Duration,
}

impl BookingSession {
    /// Open a session for `owner` with a draft for `vehicle_id`
    pub fn start(
        services: &BookingServices,
        owner: Uuid,
        vehicle_id: &str,
    ) -> Result<Arc<Self>, BookingError> {
        let mut wizard = BookingWizard::new(services.catalog.clone(), owner);
        wizard.select_vehicle(vehicle_id)?;

        let session = Self {
            id: Uuid::new_v4(),
            owner,
            created_at: Utc::now(),
            wizard: Mutex::new(wizard),
            gateway: services.gateway.clone(),
            sink: services.sink.clone(),
            payment_timeout: services.payment_timeout,
        };
        info!("Booking session {} opened for user {}", session.id, owner);
        Ok(Arc::new(session))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Lock the wizard for synchronous operations
    pub async fn wizard(&self) -> MutexGuard<'_, BookingWizard> {
        self.wizard.lock().await
    }

    pub async fn payment_in_flight(&self) -> bool {
        self.wizard.lock().await.payment_in_flight()
    }

    /// Charge the card for the current draft and, on success, hand the
    /// booking to the sink.
    ///
    /// Returns [`BookingError::Busy`] if another payment is still pending,
    /// [`BookingError::Timeout`] if the gateway does not answer in time and
    /// [`BookingError::Cancelled`] if the draft was abandoned meanwhile. If
    /// the sink fails the booking stays confirmed and [`Self::confirm`] can
    /// retry delivery.
    pub async fn submit_payment(
        self: &Arc<Self>,
        details: PaymentDetails,
    ) -> Result<BookingRecord, BookingError> {
        let session = Arc::clone(self);
        let record = tokio::spawn(async move { session.charge(details).await })
            .await
            .map_err(|e| {
                error!("Payment task for session {} failed: {}", self.id, e);
                BookingError::Cancelled
            })??;

        self.deliver(record).await
    }

    async fn charge(&self, details: PaymentDetails) -> Result<BookingRecord, BookingError> {
        let ticket = self.wizard.lock().await.begin_payment(details)?;
        let request = ticket.request().clone();

        let outcome = match tokio::time::timeout(self.payment_timeout, self.gateway.charge(request)).await {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(declined)) => Err(BookingError::Payment(declined.0)),
            Err(_) => {
                warn!(
                    "Payment gateway timed out after {:?} for session {}",
                    self.payment_timeout, self.id
                );
                Err(BookingError::Timeout(self.payment_timeout))
            }
        };

        self.wizard.lock().await.complete_payment(ticket, outcome)
    }

    /// Deliver a confirmed booking the sink has not yet accepted
    pub async fn confirm(&self) -> Result<BookingRecord, BookingError> {
        let record = {
            let wizard = self.wizard.lock().await;
            match wizard.record() {
                Some(record) if wizard.is_acknowledged() => return Ok(record.clone()),
                Some(record) => record.clone(),
                None => {
                    return Err(BookingError::precondition(
                        "no confirmed booking to submit",
                    ))
                }
            }
        };
        self.deliver(record).await
    }

    async fn deliver(&self, record: BookingRecord) -> Result<BookingRecord, BookingError> {
        match self.sink.submit(record.clone()).await {
            Ok(ack) => {
                self.wizard.lock().await.mark_acknowledged(ack.booking_id);
                Ok(record)
            }
            Err(e) => {
                error!(
                    "Booking sink rejected {} for session {}: {}",
                    record.reference, self.id, e
                );
                Err(BookingError::Sink(e.0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::payment::{PaymentDeclined, PaymentReceipt, PaymentRequest, SimulatedGateway};
    use crate::booking::sink::{Acknowledgement, InMemoryBookingStore, SinkError};
    use crate::booking::step::WizardStep;
    use crate::catalog::StaticCatalog;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn card() -> PaymentDetails {
        PaymentDetails {
            card_number: "5500 0000 0000 0004".to_string(),
            expiry: "03/30".to_string(),
            cvv: "999".to_string(),
        }
    }

    /// Gateway that waits until released
    struct GatedGateway {
        release: Notify,
        calls: AtomicUsize,
    }

    impl GatedGateway {
        fn new() -> Self {
            Self {
                release: Notify::new(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PaymentGateway for GatedGateway {
        async fn charge(&self, request: PaymentRequest) -> Result<PaymentReceipt, PaymentDeclined> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            Ok(PaymentReceipt {
                reference: "PAY-gated".to_string(),
                amount: request.amount,
                processed_at: Utc::now(),
            })
        }
    }

    struct DecliningGateway;

    #[async_trait]
    impl PaymentGateway for DecliningGateway {
        async fn charge(&self, _request: PaymentRequest) -> Result<PaymentReceipt, PaymentDeclined> {
            Err(PaymentDeclined("insufficient funds".to_string()))
        }
    }

    /// Sink that fails until switched on, then stores into an inner store
    #[derive(Default)]
    struct FlakySink {
        healthy: AtomicBool,
        inner: InMemoryBookingStore,
    }

    #[async_trait]
    impl BookingSink for FlakySink {
        async fn submit(&self, record: BookingRecord) -> Result<Acknowledgement, SinkError> {
            if !self.healthy.load(Ordering::SeqCst) {
                return Err(SinkError("storage offline".to_string()));
            }
            self.inner.submit(record).await
        }
    }

    fn services(gateway: Arc<dyn PaymentGateway>, sink: Arc<dyn BookingSink>) -> BookingServices {
        BookingServices {
            catalog: Arc::new(StaticCatalog::with_fixtures()),
            gateway,
            sink,
            payment_timeout: Duration::from_secs(5),
        }
    }

    async fn session_at_payment(services: &BookingServices) -> Arc<BookingSession> {
        let session = BookingSession::start(services, Uuid::new_v4(), "2").unwrap();
        {
            let mut wizard = session.wizard().await;
            wizard.set_locations("Tirupati", "Temple Road", "Airport").unwrap();
            wizard.advance().unwrap();
            wizard
                .set_date_range(
                    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
                )
                .unwrap();
            wizard.advance().unwrap();
        }
        session
    }

    async fn wait_for_calls(gateway: &GatedGateway, n: usize) {
        while gateway.calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_start_with_unknown_vehicle_fails() {
        let svc = services(
            Arc::new(SimulatedGateway::new(Duration::ZERO)),
            Arc::new(InMemoryBookingStore::new()),
        );
        assert!(matches!(
            BookingSession::start(&svc, Uuid::new_v4(), "404"),
            Err(BookingError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_successful_payment_stores_exactly_one_record() {
        let store = Arc::new(InMemoryBookingStore::new());
        let svc = services(Arc::new(SimulatedGateway::new(Duration::ZERO)), store.clone());
        let session = session_at_payment(&svc).await;

        let record = session.submit_payment(card()).await.unwrap();
        assert_eq!(record.total_amount, 3600);
        assert_eq!(record.user_id, session.owner());
        assert_eq!(session.wizard().await.step(), Some(WizardStep::Confirmation));

        // Confirming again is idempotent
        session.confirm().await.unwrap();
        assert_eq!(store.list_for_user(session.owner()).await, vec![record]);
    }

    #[tokio::test]
    async fn test_concurrent_payment_is_busy() {
        let gateway = Arc::new(GatedGateway::new());
        let store = Arc::new(InMemoryBookingStore::new());
        let svc = services(gateway.clone(), store.clone());
        let session = session_at_payment(&svc).await;

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.submit_payment(card()).await })
        };
        wait_for_calls(&gateway, 1).await;
        assert!(session.payment_in_flight().await);

        assert_eq!(
            session.submit_payment(card()).await.unwrap_err(),
            BookingError::Busy
        );
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);

        gateway.release.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(store.len().await, 1);
        assert!(!session.payment_in_flight().await);
    }

    #[tokio::test]
    async fn test_gateway_timeout_resets_flight_and_allows_retry() {
        let gateway = Arc::new(GatedGateway::new());
        let store = Arc::new(InMemoryBookingStore::new());
        let mut svc = services(gateway.clone(), store.clone());
        svc.payment_timeout = Duration::from_millis(50);
        let session = session_at_payment(&svc).await;

        assert_eq!(
            session.submit_payment(card()).await.unwrap_err(),
            BookingError::Timeout(Duration::from_millis(50))
        );
        assert!(!session.payment_in_flight().await);
        assert_eq!(session.wizard().await.step(), Some(WizardStep::Payment));
        assert!(store.is_empty().await);

        let retry = {
            let session = session.clone();
            tokio::spawn(async move { session.submit_payment(card()).await })
        };
        wait_for_calls(&gateway, 2).await;
        gateway.release.notify_one();
        assert!(retry.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_abandon_during_payment_discards_result() {
        let gateway = Arc::new(GatedGateway::new());
        let store = Arc::new(InMemoryBookingStore::new());
        let svc = services(gateway.clone(), store.clone());
        let session = session_at_payment(&svc).await;

        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.submit_payment(card()).await })
        };
        wait_for_calls(&gateway, 1).await;

        session.wizard().await.abandon();
        gateway.release.notify_one();

        assert_eq!(pending.await.unwrap().unwrap_err(), BookingError::Cancelled);
        assert!(store.is_empty().await);
        assert!(session.wizard().await.record().is_none());
    }

    #[tokio::test]
    async fn test_declined_payment_stays_on_payment_step() {
        let store = Arc::new(InMemoryBookingStore::new());
        let svc = services(Arc::new(DecliningGateway), store.clone());
        let session = session_at_payment(&svc).await;

        assert_eq!(
            session.submit_payment(card()).await.unwrap_err(),
            BookingError::Payment("insufficient funds".to_string())
        );
        let wizard = session.wizard().await;
        assert_eq!(wizard.step(), Some(WizardStep::Payment));
        assert!(!wizard.payment_in_flight());
        drop(wizard);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sink_failure_keeps_booking_and_confirm_retries() {
        let sink = Arc::new(FlakySink::default());
        let svc = services(Arc::new(SimulatedGateway::new(Duration::ZERO)), sink.clone());
        let session = session_at_payment(&svc).await;

        assert!(matches!(
            session.submit_payment(card()).await,
            Err(BookingError::Sink(_))
        ));
        {
            let wizard = session.wizard().await;
            assert_eq!(wizard.step(), Some(WizardStep::Confirmation));
            assert!(wizard.record().is_some());
            assert!(!wizard.is_acknowledged());
        }

        sink.healthy.store(true, Ordering::SeqCst);
        let record = session.confirm().await.unwrap();
        assert!(session.wizard().await.is_acknowledged());
        assert_eq!(sink.inner.list_for_user(session.owner()).await, vec![record]);
    }

    #[tokio::test]
    async fn test_confirm_without_booking_is_precondition() {
        let svc = services(
            Arc::new(SimulatedGateway::new(Duration::ZERO)),
            Arc::new(InMemoryBookingStore::new()),
        );
        let session = session_at_payment(&svc).await;
        assert!(matches!(
            session.confirm().await,
            Err(BookingError::Precondition(_))
        ));
    }
}
