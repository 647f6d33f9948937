//! Converts raw request payloads into typed answer values.
//!
//! This is the only place an inverse-direction question is flipped; everything downstream
//! treats answer values as already pointing toward higher maturity.

use serde::{Deserialize, Serialize};

use super::domain::{AnswerType, AnswerValue, Question, QuestionCode, ScoreDirection};

/// Untyped answer body as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAnswer {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub skipped: bool,
}

impl RawAnswer {
    pub fn value(value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

/// One answer submission: the target question plus its raw payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question_code: QuestionCode,
    #[serde(flatten)]
    pub answer: RawAnswer,
    #[serde(default)]
    pub time_spent_seconds: u32,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum IngestError {
    #[error("question {code} requires a numeric value")]
    MissingValue { code: QuestionCode },
    #[error("question {code} value {value} is outside 0..=100")]
    OutOfRange { code: QuestionCode, value: f64 },
    #[error("question {code} requires non-empty text")]
    MissingText { code: QuestionCode },
}

/// Validate a raw answer against its question and produce the stored value.
pub fn ingest_answer(question: &Question, raw: &RawAnswer) -> Result<AnswerValue, IngestError> {
    if raw.skipped {
        return Ok(AnswerValue::Skipped);
    }

    let wrap: fn(u8) -> AnswerValue = match question.answer_type {
        AnswerType::Scale => |value| AnswerValue::Scale { value },
        AnswerType::MultiChoice => |value| AnswerValue::MultiChoice { value },
        AnswerType::FearToConfidence => |value| AnswerValue::FearToConfidence { value },
        AnswerType::Text => return ingest_text(question, raw),
    };

    let raw_value = raw.value.ok_or_else(|| IngestError::MissingValue {
        code: question.code.clone(),
    })?;
    if !raw_value.is_finite() || !(0.0..=100.0).contains(&raw_value) {
        return Err(IngestError::OutOfRange {
            code: question.code.clone(),
            value: raw_value,
        });
    }
    let rounded = raw_value.round() as u8;

    let value = match question.direction {
        ScoreDirection::Direct => rounded,
        ScoreDirection::Inverse => 100 - rounded,
    };

    Ok(wrap(value))
}

fn ingest_text(question: &Question, raw: &RawAnswer) -> Result<AnswerValue, IngestError> {
    match raw.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(AnswerValue::Text {
            text: text.to_string(),
        }),
        _ => Err(IngestError::MissingText {
            code: question.code.clone(),
        }),
    }
}
