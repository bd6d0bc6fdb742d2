//! Banners

use jiff::{SignedDuration, Timestamp};

/// How long a success banner stays up.
pub const SUCCESS_TTL: SignedDuration = SignedDuration::from_secs(3);

/// A sticky error banner and a success banner that expires on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notices {
    error: Option<String>,
    success: Option<(String, Timestamp)>,
}

impl Notices {
    /// The error banner, if shown.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Show an error banner, replacing any previous one.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Hide the error banner.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Show a success message that expires [`SUCCESS_TTL`] after `now`.
    pub fn show_success(&mut self, message: impl Into<String>, now: Timestamp) {
        self.success = Some((message.into(), now));
    }

    /// The success message, unless it has outlived [`SUCCESS_TTL`] at `now`.
    pub fn success(&self, now: Timestamp) -> Option<&str> {
        self.success
            .as_ref()
            .filter(|(_, shown_at)| now.duration_since(*shown_at) < SUCCESS_TTL)
            .map(|(message, _)| message.as_str())
    }

    /// Drop a success message that has expired at `now`.
    pub fn expire(&mut self, now: Timestamp) {
        if self.success(now).is_none() {
            self.success = None;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.error = None;
        self.success = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_disappears_after_three_seconds() -> testresult::TestResult {
        let shown_at: Timestamp = "2025-01-01T09:00:00Z".parse()?;
        let mut notices = Notices::default();

        notices.show_success("Invoice updated successfully!", shown_at);

        let almost = shown_at.checked_add(SignedDuration::from_millis(2_999))?;
        let after = shown_at.checked_add(SUCCESS_TTL)?;

        assert_eq!(notices.success(almost), Some("Invoice updated successfully!"));
        assert_eq!(notices.success(after), None, "expired");

        notices.expire(almost);

        assert!(notices.success(shown_at).is_some(), "not yet expired");

        notices.expire(after);

        assert_eq!(notices.success(shown_at), None, "dropped once expired");

        Ok(())
    }

    #[test]
    fn error_stays_until_dismissed() {
        let mut notices = Notices::default();

        notices.set_error("Failed to delete invoice. Please try again.");

        assert_eq!(notices.error(), Some("Failed to delete invoice. Please try again."));

        notices.dismiss_error();

        assert_eq!(notices.error(), None);
    }
}
