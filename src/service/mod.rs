// 🌐 External services - the collaborator boundary of both batch jobs
//
// Each seam is an async trait so the drivers can run against fakes in tests.

pub mod captcha;
pub mod dashboard;
pub mod proxy;
pub mod registration;
pub mod result;

pub use captcha::{CaptchaSolver, PresetCaptcha};
pub use dashboard::{Balance, DashboardApi, SimulatedDashboard, UserData};
pub use proxy::{HttpProxyChecker, ProxyChecker};
pub use registration::{HttpRegistrationClient, RegistrationApi, RegistrationRequest};
pub use result::ServiceResult;
