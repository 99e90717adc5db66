// 📝 Registration job - register.txt → registration endpoint → accounts.txt
//
// Per account, terminal on the first success or unrecoverable failure:
// 1. CAPTCHA token (none → abandon the account)
// 2. Positional proxy from proxy.txt, verified first (verification failure → no proxy)
// 3. Register; success appends `email|password` to the account store
//
// Accounts run strictly one after another, each exactly once per run.

use crate::config::Settings;
use crate::logging::{log, Severity};
use crate::service::{CaptchaSolver, ProxyChecker, RegistrationApi, RegistrationRequest};
use crate::store::{AccountRecord, AccountStore};
use chrono::{DateTime, Utc};

// ============================================================================
// OUTCOMES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Accepted upstream and appended to the store
    Registered,

    /// Accepted upstream, but the append to the store failed
    NotStored,

    /// HTTP 400 (the email most likely exists already)
    AlreadyExists,

    /// 2xx reply whose `result` was not "success"
    Rejected,

    /// Transport error or any other status
    Failed,

    /// No CAPTCHA token; nothing was sent
    CaptchaUnavailable,

    /// Line in register.txt had no `email|password` shape
    Malformed,
}

#[derive(Debug, Clone)]
pub struct RegistrationReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub total: usize,
    pub registered: usize,
    pub not_stored: usize,
    pub already_exists: usize,
    pub rejected: usize,
    pub failed: usize,
    pub captcha_unavailable: usize,
    pub malformed: usize,
}

impl RegistrationReport {
    fn new(total: usize) -> Self {
        RegistrationReport {
            started_at: Utc::now(),
            finished_at: None,
            total,
            registered: 0,
            not_stored: 0,
            already_exists: 0,
            rejected: 0,
            failed: 0,
            captcha_unavailable: 0,
            malformed: 0,
        }
    }

    fn record(&mut self, outcome: RegistrationOutcome) {
        match outcome {
            RegistrationOutcome::Registered => self.registered += 1,
            RegistrationOutcome::NotStored => self.not_stored += 1,
            RegistrationOutcome::AlreadyExists => self.already_exists += 1,
            RegistrationOutcome::Rejected => self.rejected += 1,
            RegistrationOutcome::Failed => self.failed += 1,
            RegistrationOutcome::CaptchaUnavailable => self.captcha_unavailable += 1,
            RegistrationOutcome::Malformed => self.malformed += 1,
        }
    }
}

// ============================================================================
// DRIVER
// ============================================================================

pub struct Registrar<C, P, R> {
    settings: Settings,
    captcha: C,
    proxy_checker: P,
    api: R,
    store: AccountStore,
}

impl<C, P, R> Registrar<C, P, R>
where
    C: CaptchaSolver,
    P: ProxyChecker,
    R: RegistrationApi,
{
    pub fn new(settings: Settings, captcha: C, proxy_checker: P, api: R, store: AccountStore) -> Self {
        Registrar {
            settings,
            captcha,
            proxy_checker,
            api,
            store,
        }
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// The proxy to register through, if proxies are enabled and this one answers.
    pub async fn resolve_proxy(&self, proxy: Option<&str>) -> Option<String> {
        if !self.settings.use_proxy {
            return None;
        }
        let proxy = proxy?;

        match self.proxy_checker.check_ip(proxy).await {
            Ok(ip) => {
                log(Severity::Info, format!("Proxy IP: {}", ip));
                Some(proxy.to_string())
            }
            Err(e) => {
                log(
                    Severity::Error,
                    format!("{:#}. Continuing without proxy.", e),
                );
                None
            }
        }
    }

    /// Run the three-step registration for one account. Never propagates an error.
    pub async fn register_one(
        &self,
        record: &AccountRecord,
        proxy: Option<&str>,
    ) -> RegistrationOutcome {
        let captcha_token = match self.captcha.solve().await {
            Some(token) => token,
            None => {
                log(Severity::Error, "Failed to solve CAPTCHA.");
                return RegistrationOutcome::CaptchaUnavailable;
            }
        };

        let request = RegistrationRequest {
            email: record.email.clone(),
            password: record.password.clone(),
            captcha_token,
            referral_code: self.settings.ref_code.clone(),
        };

        let proxy = self.resolve_proxy(proxy).await;
        let result = self.api.register(&request, proxy.as_deref()).await;

        if let Some(data) = &result.data {
            log(Severity::Info, format!("Response: {}", data));
        }

        if result.success {
            if !self.store.append_record(record) {
                log(
                    Severity::Error,
                    format!(
                        "Registration successful, but {} could not be added to {}",
                        record.serialize(),
                        self.store.path().display()
                    ),
                );
                return RegistrationOutcome::NotStored;
            }
            log(
                Severity::Success,
                format!(
                    "Registration successful! | Added account {} into {}",
                    record.email,
                    self.store.path().display()
                ),
            );
            return RegistrationOutcome::Registered;
        }

        if result.is_bad_request() {
            log(
                Severity::Error,
                format!("Maybe email {} already exists!", record.email),
            );
            return RegistrationOutcome::AlreadyExists;
        }

        // A 2xx without a readable body is a transport problem, not a rejection.
        if (200..300).contains(&result.status) && result.data.is_some() {
            log(
                Severity::Warning,
                format!("Registration failed: {}", result.error_message()),
            );
            return RegistrationOutcome::Rejected;
        }

        log(
            Severity::Error,
            format!("Error during registration: {}", result.error_message()),
        );
        RegistrationOutcome::Failed
    }

    /// Register every `email|password` line, pairing `proxies[i]` with line `i`.
    pub async fn run(&self, entries: &[String], proxies: &[String]) -> RegistrationReport {
        let mut report = RegistrationReport::new(entries.len());

        for (i, line) in entries.iter().enumerate() {
            let outcome = match AccountRecord::parse(line) {
                Some(record) => {
                    log(
                        Severity::Info,
                        format!("[{}/{}] Processing account: {}", i + 1, entries.len(), record.email),
                    );
                    // Shorter proxy list: the remaining accounts go direct.
                    let proxy = proxies.get(i).map(String::as_str);
                    self.register_one(&record, proxy).await
                }
                None => {
                    log(
                        Severity::Warning,
                        format!("[{}/{}] Skipping malformed line: {}", i + 1, entries.len(), line),
                    );
                    RegistrationOutcome::Malformed
                }
            };
            report.record(outcome);
            log(Severity::Info, "=====================");
        }

        log(Severity::Success, "All accounts processed.");
        report.finished_at = Some(Utc::now());
        report
    }
}

// ============================================================================
// TESTS
// ============================================================================
