use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::debug;

use dm_core::booking::{BookingRecord, BookingStatus};
use dm_core::errors::SessionError;
use dm_core::ports::{BookingRepositoryPort, ClockPort, ProfileRepositoryPort};
use dm_core::profile::Profile;

/// Window for the "new customers" figure.
const NEW_CUSTOMER_WINDOW_DAYS: i64 = 30;

/// How many bookings the overview lists.
const RECENT_BOOKINGS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Sum of amounts over completed bookings.
    pub total_revenue: i64,
    pub total_bookings: usize,
    /// Drivers currently online.
    pub active_drivers: usize,
    /// Customers created in the trailing window.
    pub new_customers: u64,
}

/// Everything the overview screen renders in one fetch.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub recent_bookings: Vec<BookingRecord>,
    pub bookings: Vec<BookingRecord>,
    pub drivers: Vec<Profile>,
}

/// Booking list filter of the admin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(BookingStatus),
}

/// Status filter plus case-insensitive search over name, id and phone.
pub fn filter_bookings<'a>(
    bookings: &'a [BookingRecord],
    filter: StatusFilter,
    search: &str,
) -> Vec<&'a BookingRecord> {
    bookings
        .iter()
        .filter(|booking| match filter {
            StatusFilter::All => true,
            StatusFilter::Only(status) => booking.status == status,
        })
        .filter(|booking| booking.matches_search(search))
        .collect()
}

/// Fetch and aggregate the admin overview.
pub struct LoadDashboard {
    bookings: Arc<dyn BookingRepositoryPort>,
    profiles: Arc<dyn ProfileRepositoryPort>,
    clock: Arc<dyn ClockPort>,
}

impl LoadDashboard {
    pub fn new(
        bookings: Arc<dyn BookingRepositoryPort>,
        profiles: Arc<dyn ProfileRepositoryPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            bookings,
            profiles,
            clock,
        }
    }

    pub async fn execute(&self) -> Result<DashboardSnapshot, SessionError> {
        let bookings = self.bookings.list().await?;
        let drivers = self.profiles.list_drivers().await?;
        let since = self.clock.now_utc() - Duration::days(NEW_CUSTOMER_WINDOW_DAYS);
        let new_customers = self.profiles.count_customers_since(since).await?;

        let total_revenue = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Completed)
            .filter_map(|b| b.amount)
            .sum();
        let stats = DashboardStats {
            total_revenue,
            total_bookings: bookings.len(),
            active_drivers: drivers.iter().filter(|d| d.is_online).count(),
            new_customers,
        };
        debug!(
            bookings = stats.total_bookings,
            drivers = drivers.len(),
            "dashboard loaded"
        );

        Ok(DashboardSnapshot {
            recent_bookings: bookings.iter().take(RECENT_BOOKINGS).cloned().collect(),
            stats,
            bookings,
            drivers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use dm_core::errors::GatewayError;
    use dm_core::identity::Role;
    use dm_core::ids::{BookingId, UserId};
    use dm_core::profile::ProfilePatch;

    struct FixedBookings(Vec<BookingRecord>);

    #[async_trait]
    impl BookingRepositoryPort for FixedBookings {
        async fn list(&self) -> Result<Vec<BookingRecord>, GatewayError> {
            Ok(self.0.clone())
        }

        async fn update_status(
            &self,
            _id: &BookingId,
            _status: BookingStatus,
        ) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    struct FixedProfiles {
        drivers: Vec<Profile>,
        new_customers: u64,
    }

    #[async_trait]
    impl ProfileRepositoryPort for FixedProfiles {
        async fn get(&self, _id: &UserId) -> Result<Profile, GatewayError> {
            Err(GatewayError::Rejected("profile not found".to_string()))
        }

        async fn update(
            &self,
            _id: &UserId,
            _patch: &ProfilePatch,
        ) -> Result<Profile, GatewayError> {
            Err(GatewayError::Rejected("read-only".to_string()))
        }

        async fn list_drivers(&self) -> Result<Vec<Profile>, GatewayError> {
            Ok(self.drivers.clone())
        }

        async fn count_customers_since(&self, since: DateTime<Utc>) -> Result<u64, GatewayError> {
            // The window must be the trailing 30 days of the injected clock.
            let expected = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
                - Duration::days(NEW_CUSTOMER_WINDOW_DAYS);
            assert_eq!(since, expected);
            Ok(self.new_customers)
        }
    }

    struct FixedClock;

    impl ClockPort for FixedClock {
        fn now_utc(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
        }
    }

    fn booking(id: &str, status: BookingStatus, amount: Option<i64>) -> BookingRecord {
        BookingRecord {
            id: BookingId::from(id),
            status,
            amount,
            ..BookingRecord::default()
        }
    }

    fn driver(id: &str, online: bool) -> Profile {
        Profile {
            id: UserId::from(id),
            role: Role::Driver,
            is_online: online,
            ..Profile::default()
        }
    }

    #[tokio::test]
    async fn test_revenue_counts_completed_bookings_only() {
        let bookings = vec![
            booking("b-1", BookingStatus::Completed, Some(1200)),
            booking("b-2", BookingStatus::Completed, Some(800)),
            booking("b-3", BookingStatus::Pending, Some(5000)),
            booking("b-4", BookingStatus::Completed, None),
            booking("b-5", BookingStatus::Cancelled, Some(300)),
            booking("b-6", BookingStatus::Confirmed, Some(900)),
        ];
        let load = LoadDashboard::new(
            Arc::new(FixedBookings(bookings)),
            Arc::new(FixedProfiles {
                drivers: vec![driver("d-1", true), driver("d-2", false), driver("d-3", true)],
                new_customers: 4,
            }),
            Arc::new(FixedClock),
        );

        let snapshot = load.execute().await.unwrap();
        assert_eq!(
            snapshot.stats,
            DashboardStats {
                total_revenue: 2000,
                total_bookings: 6,
                active_drivers: 2,
                new_customers: 4,
            }
        );
        assert_eq!(snapshot.recent_bookings.len(), RECENT_BOOKINGS);
        assert_eq!(snapshot.recent_bookings[0].id, BookingId::from("b-1"));
    }

    #[test]
    fn test_filter_bookings_by_status_and_search() {
        let mut pending = booking("b-1", BookingStatus::Pending, None);
        pending.customer_name = "Asha Rao".to_string();
        let mut completed = booking("b-2", BookingStatus::Completed, Some(100));
        completed.customer_name = "Ravi Kumar".to_string();
        let bookings = vec![pending, completed];

        let all = filter_bookings(&bookings, StatusFilter::All, "");
        assert_eq!(all.len(), 2);

        let only_pending =
            filter_bookings(&bookings, StatusFilter::Only(BookingStatus::Pending), "");
        assert_eq!(only_pending.len(), 1);
        assert_eq!(only_pending[0].customer_name, "Asha Rao");

        let searched = filter_bookings(&bookings, StatusFilter::All, "ravi");
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].customer_name, "Ravi Kumar");

        let none = filter_bookings(
            &bookings,
            StatusFilter::Only(BookingStatus::Pending),
            "ravi",
        );
        assert!(none.is_empty());
    }
}
