use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use super::domain::{
    AssessmentId, AssessmentType, DimensionScores, OrganizationId, ScoredAssessment, UserId,
};
use super::scoring::overall_score;

#[derive(Debug)]
pub enum HistoryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
}

impl std::fmt::Display for HistoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryImportError::Io(err) => write!(f, "failed to read assessment history: {}", err),
            HistoryImportError::Csv(err) => write!(f, "invalid assessment history CSV: {}", err),
            HistoryImportError::InvalidRow { line, reason } => {
                write!(f, "invalid assessment history row {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for HistoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryImportError::Io(err) => Some(err),
            HistoryImportError::Csv(err) => Some(err),
            HistoryImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for HistoryImportError {
    fn from(err: std::io::Error) -> Self {
        HistoryImportError::Io(err)
    }
}

impl From<csv::Error> for HistoryImportError {
    fn from(err: csv::Error) -> Self {
        HistoryImportError::Csv(err)
    }
}

/// Loads completed assessments from a CSV export, one row per assessment.
///
/// Columns: `assessment_id,user_id,organization_id,industry,assessment_type,completed_at,
/// individual,leadership,cultural,embedding,velocity`. The overall score is recomputed from
/// the five dimension scores.
pub struct HistoryImporter;

impl HistoryImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ScoredAssessment>, HistoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ScoredAssessment>, HistoryImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut assessments = Vec::new();

        for (index, record) in csv_reader.deserialize::<HistoryRow>().enumerate() {
            let row = record?;
            // header is line 1
            assessments.push(row.into_scored(index as u64 + 2)?);
        }

        assessments.sort_by(|a, b| a.completed_at.cmp(&b.completed_at));
        Ok(assessments)
    }
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    assessment_id: String,
    user_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    organization_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    industry: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    assessment_type: Option<String>,
    completed_at: String,
    individual: u8,
    leadership: u8,
    cultural: u8,
    embedding: u8,
    velocity: u8,
}

impl HistoryRow {
    fn into_scored(self, line: u64) -> Result<ScoredAssessment, HistoryImportError> {
        let completed_at =
            parse_timestamp(&self.completed_at).ok_or_else(|| HistoryImportError::InvalidRow {
                line,
                reason: format!(
                    "{}: unrecognized completed_at {:?}",
                    self.assessment_id, self.completed_at
                ),
            })?;

        let assessment_type = match self.assessment_type.as_deref() {
            None => AssessmentType::Full,
            Some(raw) => AssessmentType::parse(raw).ok_or_else(|| {
                HistoryImportError::InvalidRow {
                    line,
                    reason: format!("{}: unknown assessment_type {raw:?}", self.assessment_id),
                }
            })?,
        };

        let scores = DimensionScores {
            individual: self.individual,
            leadership: self.leadership,
            cultural: self.cultural,
            embedding: self.embedding,
            velocity: self.velocity,
        };
        if let Some((dimension, score)) = scores.iter().find(|(_, score)| *score > 100) {
            return Err(HistoryImportError::InvalidRow {
                line,
                reason: format!(
                    "{}: {dimension} score {score} exceeds 100",
                    self.assessment_id
                ),
            });
        }

        Ok(ScoredAssessment {
            assessment_id: AssessmentId(self.assessment_id),
            user_id: UserId(self.user_id),
            organization_id: self.organization_id.map(OrganizationId),
            industry: self.industry,
            assessment_type,
            overall_score: overall_score(&scores),
            scores,
            completed_at,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
