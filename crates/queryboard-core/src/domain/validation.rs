//! Validation - 投稿内容の検証
//!
//! # 検証順序
//! 1. 3 項目すべてが存在し空でない
//! 2. trim 後の question が 1..=1000 文字
//! 3. email が `local@domain.tld` 形式
//! 4. donation が 0.01 以上の数値
//!
//! 最初に失敗した項目のエラーだけを返します（副作用の前にすべて判定）。

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Longest accepted question, in characters after trimming.
pub const MAX_QUESTION_CHARS: usize = 1000;

/// Smallest accepted donation.
pub const MIN_DONATION: f64 = 0.01;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Client-fixable rejection. The `Display` text is returned to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("Question is too long (max {} characters)", MAX_QUESTION_CHARS)]
    QuestionTooLong,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid donation amount")]
    InvalidDonation,
}

/// Donation as sent by the form: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DonationInput {
    Number(f64),
    Text(String),
}

impl DonationInput {
    fn is_blank(&self) -> bool {
        matches!(self, DonationInput::Text(s) if s.is_empty())
    }

    fn amount(&self) -> Option<f64> {
        let amount = match self {
            DonationInput::Number(n) => *n,
            DonationInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        amount.is_finite().then_some(amount)
    }
}

/// Raw submission body (`POST /api/questions`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitQuestion {
    pub question: Option<String>,
    pub email: Option<String>,
    pub donation: Option<DonationInput>,
}

/// Submission that passed every check, already normalized for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub question: String,
    pub email: String,
    pub donation: f64,
}

impl SubmitQuestion {
    pub fn new(question: &str, email: &str, donation: DonationInput) -> Self {
        Self {
            question: Some(question.to_string()),
            email: Some(email.to_string()),
            donation: Some(donation),
        }
    }

    pub fn validate(&self) -> Result<ValidSubmission, ValidationError> {
        let (Some(question), Some(email), Some(donation)) =
            (&self.question, &self.email, &self.donation)
        else {
            return Err(ValidationError::MissingFields);
        };
        if question.is_empty() || email.is_empty() || donation.is_blank() {
            return Err(ValidationError::MissingFields);
        }

        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        if question.chars().count() > MAX_QUESTION_CHARS {
            return Err(ValidationError::QuestionTooLong);
        }

        let email = email.trim();
        if !EMAIL_PATTERN.is_match(email) {
            return Err(ValidationError::InvalidEmail);
        }

        let donation = donation
            .amount()
            .filter(|amount| *amount >= MIN_DONATION)
            .ok_or(ValidationError::InvalidDonation)?;

        Ok(ValidSubmission {
            question: question.to_string(),
            email: email.to_lowercase(),
            donation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn text(s: &str) -> DonationInput {
        DonationInput::Text(s.to_string())
    }

    #[test]
    fn valid_submission_is_normalized() {
        let input = SubmitQuestion::new("  What is Rust?  ", "  Alice@Example.COM ", text("5"));
        let valid = input.validate().unwrap();

        assert_eq!(valid.question, "What is Rust?");
        assert_eq!(valid.email, "alice@example.com");
        assert_eq!(valid.donation, 5.0);
    }

    #[test]
    fn numeric_donation_is_accepted() {
        let input = SubmitQuestion::new("q", "a@b.co", DonationInput::Number(0.01));
        assert_eq!(input.validate().unwrap().donation, 0.01);
    }

    #[test]
    fn missing_fields_are_rejected_first() {
        let input = SubmitQuestion {
            question: None,
            email: Some("not-an-email".to_string()),
            donation: Some(text("-1")),
        };
        assert_eq!(input.validate(), Err(ValidationError::MissingFields));
    }

    #[rstest]
    #[case::empty_question("", "a@b.co", text("1"))]
    #[case::empty_email("q", "", text("1"))]
    #[case::empty_donation("q", "a@b.co", text(""))]
    fn empty_strings_count_as_missing(
        #[case] question: &str,
        #[case] email: &str,
        #[case] donation: DonationInput,
    ) {
        let input = SubmitQuestion::new(question, email, donation);
        assert_eq!(input.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn whitespace_question_is_empty() {
        let input = SubmitQuestion::new("   \n\t", "a@b.co", text("1"));
        assert_eq!(input.validate(), Err(ValidationError::EmptyQuestion));
    }

    #[test]
    fn question_length_is_measured_after_trim() {
        let at_limit = format!("  {}  ", "x".repeat(MAX_QUESTION_CHARS));
        assert!(SubmitQuestion::new(&at_limit, "a@b.co", text("1")).validate().is_ok());

        let over = "x".repeat(MAX_QUESTION_CHARS + 1);
        assert_eq!(
            SubmitQuestion::new(&over, "a@b.co", text("1")).validate(),
            Err(ValidationError::QuestionTooLong)
        );
    }

    #[test]
    fn question_length_counts_characters_not_bytes() {
        let question = "é".repeat(MAX_QUESTION_CHARS);
        assert!(SubmitQuestion::new(&question, "a@b.co", text("1")).validate().is_ok());
    }

    #[rstest]
    #[case::no_dot("a@b")]
    #[case::no_at("ab.com")]
    #[case::no_local("@b.com")]
    #[case::inner_space("a b@c.com")]
    #[case::double_at("a@@b.com")]
    #[case::trailing_dot("a@b.")]
    fn malformed_email_is_rejected(#[case] email: &str) {
        let input = SubmitQuestion::new("q", email, text("1"));
        assert_eq!(input.validate(), Err(ValidationError::InvalidEmail));
    }

    #[rstest]
    #[case::zero(DonationInput::Number(0.0))]
    #[case::zero_text(text("0"))]
    #[case::negative(text("-5"))]
    #[case::below_minimum(DonationInput::Number(0.009))]
    #[case::not_a_number(text("abc"))]
    #[case::nan(text("NaN"))]
    #[case::infinite(text("inf"))]
    fn bad_donation_is_rejected(#[case] donation: DonationInput) {
        let input = SubmitQuestion::new("q", "a@b.co", donation);
        assert_eq!(input.validate(), Err(ValidationError::InvalidDonation));
    }

    #[test]
    fn surrounding_whitespace_is_not_part_of_the_email() {
        let valid = SubmitQuestion::new("q", " a@b.co", text("1")).validate().unwrap();
        assert_eq!(valid.email, "a@b.co");
    }

    #[rstest]
    #[case::trailing_letters("5abc")]
    #[case::two_numbers("5 5")]
    fn donation_text_must_be_a_whole_number(#[case] raw: &str) {
        let input = SubmitQuestion::new("q", "a@b.co", text(raw));
        assert_eq!(input.validate(), Err(ValidationError::InvalidDonation));
    }

    #[test]
    fn donation_deserializes_from_number_or_string() {
        let body: SubmitQuestion =
            serde_json::from_str(r#"{"question":"q","email":"a@b.co","donation":"2.50"}"#).unwrap();
        assert_eq!(body.donation, Some(text("2.50")));

        let body: SubmitQuestion =
            serde_json::from_str(r#"{"question":"q","email":"a@b.co","donation":3}"#).unwrap();
        assert_eq!(body.donation, Some(DonationInput::Number(3.0)));
    }

    #[test]
    fn error_messages_match_wire_text() {
        assert_eq!(
            ValidationError::QuestionTooLong.to_string(),
            "Question is too long (max 1000 characters)"
        );
        assert_eq!(ValidationError::MissingFields.to_string(), "All fields are required");
    }
}
