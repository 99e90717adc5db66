use super::result::ServiceResult;
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub referral_code: String,
    pub email: String,
    pub is_earning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub total_point_earned: f64,
    pub today_point_earned: f64,
}

/// Dashboard calls used by the balance sync job.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn fetch_user_data(&self, email: &str, password: &str) -> ServiceResult<UserData>;
    async fn fetch_balance(&self, email: &str) -> ServiceResult<Balance>;
}

pub const SIMULATED_REFERRAL_CODE: &str = "ABCD1234";
pub const SIMULATED_TODAY_POINTS: f64 = 150.00;
const SIMULATED_MAX_POINTS: f64 = 20000.0;

/// Stand-in dashboard: fixed user data, random total in [0, 20000).
#[derive(Debug, Clone, Default)]
pub struct SimulatedDashboard;

#[async_trait]
impl DashboardApi for SimulatedDashboard {
    async fn fetch_user_data(&self, email: &str, _password: &str) -> ServiceResult<UserData> {
        ServiceResult::ok(UserData {
            referral_code: SIMULATED_REFERRAL_CODE.to_string(),
            email: email.to_string(),
            is_earning: true,
        })
    }

    async fn fetch_balance(&self, _email: &str) -> ServiceResult<Balance> {
        let total = rand::thread_rng().gen_range(0.0..SIMULATED_MAX_POINTS);
        ServiceResult::ok(Balance {
            total_point_earned: total,
            today_point_earned: SIMULATED_TODAY_POINTS,
        })
    }
}
