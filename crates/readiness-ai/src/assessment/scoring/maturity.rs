use serde::{Deserialize, Serialize};

/// One named band over the 0-100 overall score range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityLevel {
    pub level: u8,
    pub name: String,
    pub min_score: u8,
    pub max_score: u8,
    pub description: String,
}

impl MaturityLevel {
    pub fn contains(&self, score: u8) -> bool {
        score >= self.min_score && score <= self.max_score
    }
}

/// Ordered band table; bands are disjoint integer ranges covering 0..=100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaturityScale {
    levels: Vec<MaturityLevel>,
}

impl MaturityScale {
    pub fn new(levels: Vec<MaturityLevel>) -> Self {
        Self { levels }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            band(
                0,
                "Unaware",
                0,
                20,
                "Limited awareness of AI opportunities; no coordinated adoption.",
            ),
            band(
                1,
                "Exploring",
                21,
                40,
                "Early curiosity and isolated experiments without a shared direction.",
            ),
            band(
                2,
                "Experimenting",
                41,
                60,
                "Active pilots across teams with emerging governance and skills.",
            ),
            band(
                3,
                "Scaling",
                61,
                80,
                "AI embedded in core processes with leadership sponsorship and measurement.",
            ),
            band(
                4,
                "Transforming",
                81,
                100,
                "AI-native operating model with continuous, organization-wide innovation.",
            ),
        ])
    }

    pub fn levels(&self) -> &[MaturityLevel] {
        &self.levels
    }

    /// First band containing the score. Scores above 100 clamp into the top band.
    pub fn classify(&self, score: u8) -> MaturityLevel {
        let score = score.min(100);
        self.levels
            .iter()
            .find(|level| level.contains(score))
            .or_else(|| self.levels.last())
            .cloned()
            .unwrap_or_default()
    }

    /// The band immediately above the given level, if any.
    pub fn next_after(&self, level: u8) -> Option<&MaturityLevel> {
        self.levels.iter().find(|band| band.level == level + 1)
    }

    /// Checks the bands are sorted, contiguous and span exactly 0..=100.
    pub(crate) fn check_contiguous(&self) -> Result<(), String> {
        let Some(first) = self.levels.first() else {
            return Err("maturity scale has no bands".to_string());
        };
        if first.level != 0 || first.min_score != 0 {
            return Err(format!(
                "maturity scale must start at 0 (starts at {})",
                first.min_score
            ));
        }

        for (index, pair) in self.levels.windows(2).enumerate() {
            let (lower, upper) = (&pair[0], &pair[1]);
            if lower.max_score < lower.min_score {
                return Err(format!("band {} has max below min", lower.name));
            }
            if u16::from(lower.max_score) + 1 != u16::from(upper.min_score) {
                return Err(format!(
                    "bands {} and {} are not contiguous",
                    lower.name, upper.name
                ));
            }
            if usize::from(upper.level) != index + 1 {
                return Err(format!("band {} is out of order", upper.name));
            }
        }

        match self.levels.last() {
            Some(last) if last.max_score == 100 && last.max_score >= last.min_score => Ok(()),
            Some(last) => Err(format!(
                "maturity scale must end at 100 (ends at {})",
                last.max_score
            )),
            None => Err("maturity scale has no bands".to_string()),
        }
    }
}

fn band(level: u8, name: &str, min_score: u8, max_score: u8, description: &str) -> MaturityLevel {
    MaturityLevel {
        level,
        name: name.to_string(),
        min_score,
        max_score,
        description: description.to_string(),
    }
}
