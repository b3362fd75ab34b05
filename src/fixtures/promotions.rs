//! Promotion Fixtures

use jiff::Timestamp;
use serde::Deserialize;

use crate::{fixtures::FixtureError, pricing::PricingPolicy, promotions::QuizUnlock};

/// Stored quiz unlock from YAML
#[derive(Debug, Deserialize)]
pub struct QuizUnlockFixture {
    /// When the quiz was completed (RFC 3339)
    pub unlocked_at: Timestamp,

    /// When the discount lapses; defaults to the policy's quiz duration
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

impl QuizUnlockFixture {
    /// Convert into a validated unlock
    ///
    /// # Errors
    ///
    /// Returns an error if the window is empty or reversed.
    pub fn into_unlock(self, policy: &PricingPolicy) -> Result<QuizUnlock, FixtureError> {
        let unlock = match self.expires_at {
            Some(expires_at) => QuizUnlock::new(self.unlocked_at, expires_at)?,
            None => QuizUnlock::starting_at(self.unlocked_at, policy.quiz_duration)?,
        };

        Ok(unlock)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn expiry_defaults_to_policy_duration() -> TestResult {
        let fixture: QuizUnlockFixture =
            serde_norway::from_str("unlocked_at: \"2026-03-01T12:00:00Z\"")?;

        let unlock = fixture.into_unlock(&PricingPolicy::default())?;

        assert_eq!(unlock.expires_at(), "2026-03-02T12:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }

    #[test]
    fn reversed_window_is_rejected() -> TestResult {
        let fixture: QuizUnlockFixture = serde_norway::from_str(
            "unlocked_at: \"2026-03-01T12:00:00Z\"\nexpires_at: \"2026-03-01T11:00:00Z\"",
        )?;

        assert!(matches!(
            fixture.into_unlock(&PricingPolicy::default()),
            Err(FixtureError::Promotion(_))
        ));

        Ok(())
    }
}
