//! Outbound mail. Actual delivery is left to the operator's mail pipeline;
//! this renders the message and records it on the log.

pub struct Mailer {
    app_url: String,
}

impl Mailer {
    pub fn new(app_url: impl Into<String>) -> Self {
        Self { app_url: app_url.into() }
    }

    pub fn send_verification(&self, email: &str, token: &str) {
        let link = format!("{}/verify-email?token={}", self.app_url, token);
        tracing::info!(to = email, subject = "Verify Your Email", %link, "queued verification mail");
    }

    pub fn send_password_reset(&self, email: &str, token: &str) {
        let link = format!("{}/reset-password?token={}", self.app_url, token);
        tracing::info!(to = email, subject = "Reset Password", %link, "queued password reset mail");
    }
}
