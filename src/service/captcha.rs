use async_trait::async_trait;

/// Source of CAPTCHA tokens for registration.
///
/// `None` means no token is available; the caller abandons that account.
#[async_trait]
pub trait CaptchaSolver: Send + Sync {
    async fn solve(&self) -> Option<String>;
}

/// Hands out a token supplied by the operator (`captcha_token` setting).
#[derive(Debug, Clone, Default)]
pub struct PresetCaptcha {
    token: Option<String>,
}

impl PresetCaptcha {
    pub fn new(token: Option<String>) -> Self {
        PresetCaptcha {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[async_trait]
impl CaptchaSolver for PresetCaptcha {
    async fn solve(&self) -> Option<String> {
        self.token.clone()
    }
}
