// 📊 Balance sync job - fetch points per account, prune accounts over the threshold
//
// Per account:
// 1. user data, up to `retry_limit` attempts (stop on success or HTTP 400)
// 2. balance, exactly once
// 3. both ok → log stats; total >= threshold → remove the account from the store
// 4. otherwise → warning, store untouched

use crate::config::Settings;
use crate::logging::{log, Severity};
use crate::service::{DashboardApi, ServiceResult, UserData};
use crate::store::{AccountRecord, AccountStore};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Threshold reached; `removed` lines were dropped from the store
    Pruned { total_points: f64, removed: usize },

    /// Synced, still below the threshold
    BelowThreshold { total_points: f64 },

    /// User data or balance could not be fetched
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub total: usize,
    pub pruned: usize,
    pub below_threshold: usize,
    pub unavailable: usize,
}

impl SyncReport {
    fn new(total: usize) -> Self {
        SyncReport {
            started_at: Utc::now(),
            finished_at: None,
            total,
            pruned: 0,
            below_threshold: 0,
            unavailable: 0,
        }
    }

    fn record(&mut self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Pruned { .. } => self.pruned += 1,
            SyncOutcome::BelowThreshold { .. } => self.below_threshold += 1,
            SyncOutcome::Unavailable => self.unavailable += 1,
        }
    }
}

/// Closed lower bound: exactly the threshold qualifies.
pub fn reached_threshold(total_points: f64, threshold: f64) -> bool {
    total_points >= threshold
}

pub struct BalanceSync<D> {
    settings: Settings,
    api: D,
    store: AccountStore,
}

impl<D: DashboardApi> BalanceSync<D> {
    pub fn new(settings: Settings, api: D, store: AccountStore) -> Self {
        BalanceSync {
            settings,
            api,
            store,
        }
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// Immediate retries, no backoff. Returns the last result and the attempt count.
    pub async fn fetch_user_data_with_retry(
        &self,
        record: &AccountRecord,
    ) -> (ServiceResult<UserData>, u32) {
        let limit = self.settings.retry_limit.max(1);
        let mut attempts = 0;

        loop {
            attempts += 1;
            let result = self.api.fetch_user_data(&record.email, &record.password).await;
            if result.success || result.is_bad_request() || attempts >= limit {
                return (result, attempts);
            }
            log(
                Severity::Warning,
                format!(
                    "Fetching user data for {} failed ({}/{}): {}",
                    record.email,
                    attempts,
                    limit,
                    result.error_message()
                ),
            );
        }
    }

    pub async fn sync_account(&self, record: &AccountRecord) -> SyncOutcome {
        log(Severity::Info, format!("Processing account: {}", record.email));

        let (user_data, _) = self.fetch_user_data_with_retry(record).await;
        let balance = self.api.fetch_balance(&record.email).await;

        let (user, balance) = match (user_data.success, user_data.data, balance.success, balance.data) {
            (true, Some(user), true, Some(balance)) => (user, balance),
            _ => {
                log(Severity::Warning, "Error: Can't sync new data. Skipping.");
                return SyncOutcome::Unavailable;
            }
        };

        log(
            Severity::Custom,
            format!(
                "Ref code: {} | Earning today: {:.2} | Total points: {:.2}",
                user.referral_code, balance.today_point_earned, balance.total_point_earned
            ),
        );

        let total_points = balance.total_point_earned;
        let threshold = self.settings.points_threshold;

        if reached_threshold(total_points, threshold) {
            log(
                Severity::Success,
                format!(
                    "Account {} has reached {:.2} points. Deleting account...",
                    record.email, threshold
                ),
            );
            let removed = self.store.remove_by_email(&record.email);
            SyncOutcome::Pruned {
                total_points,
                removed,
            }
        } else {
            log(
                Severity::Info,
                format!(
                    "Account {} has not yet reached {:.2} points. Skipping deletion.",
                    record.email, threshold
                ),
            );
            SyncOutcome::BelowThreshold { total_points }
        }
    }

    /// Sync every account present in the store at start-up, in file order.
    pub async fn run(&self) -> SyncReport {
        let accounts = self.store.load_all();
        let mut report = SyncReport::new(accounts.len());

        if accounts.is_empty() {
            log(Severity::Warning, "No accounts found in the file. Exiting...");
        }

        for record in &accounts {
            let outcome = self.sync_account(record).await;
            report.record(&outcome);
        }

        report.finished_at = Some(Utc::now());
        report
    }
}

// ============================================================================
// TESTS
// ============================================================================
