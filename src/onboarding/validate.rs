//! Input checks for the onboarding step forms, run before anything is sent.

use regex::Regex;

use crate::error::ValidationError;

/// Length of the emailed one-time code.
pub const EMAIL_OTP_LENGTH: usize = 6;

/// Compiled patterns for the onboarding step forms.
pub struct StepValidator {
    pan: Regex,
    otp: Regex,
    email: Regex,
}

impl Default for StepValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StepValidator {
    pub fn new() -> Self {
        Self {
            // AAAAA9999A: five letters, four digits, one check letter.
            pan: Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").unwrap(),
            otp: Regex::new(&format!(r"^[0-9]{{{EMAIL_OTP_LENGTH}}}$")).unwrap(),
            email: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap(),
        }
    }

    /// Normalize and check a PAN. Returns the uppercased value.
    pub fn pan(&self, input: &str) -> Result<String, ValidationError> {
        let normalized: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        if self.pan.is_match(&normalized) {
            Ok(normalized)
        } else {
            Err(ValidationError::InvalidPan)
        }
    }

    /// Check an emailed OTP. Surrounding whitespace is ignored.
    pub fn email_otp(&self, input: &str) -> Result<String, ValidationError> {
        let trimmed = input.trim();
        if self.otp.is_match(trimmed) {
            Ok(trimmed.to_string())
        } else {
            Err(ValidationError::InvalidOtp {
                expected: EMAIL_OTP_LENGTH,
            })
        }
    }

    /// Check the address the OTP is sent to.
    pub fn email(&self, input: &str) -> Result<String, ValidationError> {
        let trimmed = input.trim();
        if self.email.is_match(trimmed) {
            Ok(trimmed.to_ascii_lowercase())
        } else {
            Err(ValidationError::InvalidEmail(trimmed.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_is_normalized() {
        let v = StepValidator::new();
        assert_eq!(v.pan("abcde1234f").unwrap(), "ABCDE1234F");
        assert_eq!(v.pan(" ABCDE 1234 F ").unwrap(), "ABCDE1234F");
    }

    #[test]
    fn pan_rejects_bad_shapes() {
        let v = StepValidator::new();
        for bad in ["", "ABCDE1234", "ABCD12345F", "ABCDE12345", "ABCDE1234FF", "ABCDÉ1234F"] {
            assert_eq!(v.pan(bad), Err(ValidationError::InvalidPan), "{bad:?}");
        }
    }

    #[test]
    fn otp_requires_six_digits() {
        let v = StepValidator::new();
        assert_eq!(v.email_otp(" 042917 ").unwrap(), "042917");
        assert!(v.email_otp("42917").is_err());
        assert!(v.email_otp("0429170").is_err());
        assert!(v.email_otp("04291a").is_err());
    }

    #[test]
    fn email_is_lowercased() {
        let v = StepValidator::new();
        assert_eq!(v.email("Ops@Acme.Test").unwrap(), "ops@acme.test");
        assert!(matches!(
            v.email("not-an-email"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(v.email("a@b").is_err());
    }
}
