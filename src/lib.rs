// Referral Batch - Core Library
// Shared by the `register` and `balance-sync` binaries and their tests

pub mod config;
pub mod logging;
pub mod register;
pub mod service;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use config::{Settings, MINIMUM_POINTS_THRESHOLD, RETRY_LIMIT};
pub use logging::{init_logging, log, Severity};
pub use register::{Registrar, RegistrationOutcome, RegistrationReport};
pub use service::{
    Balance, CaptchaSolver, DashboardApi, HttpProxyChecker, HttpRegistrationClient,
    PresetCaptcha, ProxyChecker, RegistrationApi, RegistrationRequest, ServiceResult,
    SimulatedDashboard, UserData,
};
pub use store::{load_lines, AccountRecord, AccountStore};
pub use sync::{reached_threshold, BalanceSync, SyncOutcome, SyncReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
