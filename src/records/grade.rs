use serde::{Serialize, Deserialize};
use super::Millis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub subject_id: String,
    /// Assessment name
    #[serde(rename = "type")]
    pub kind: String,
    pub score: f64,
    #[serde(default = "default_max_score")]
    pub max_score: f64,
    pub date: Millis,
    #[serde(default)]
    pub category: String,
}

fn default_max_score() -> f64 {
    100.0
}

impl Grade {
    /// Validated grade. Rejects non-finite values, non-positive maxima and
    /// scores outside 0..=max_score.
    pub fn new<S: Into<String>>(
        subject_id: &str,
        kind: S,
        score: f64,
        max_score: f64,
        date: Millis,
    ) -> Result<Self, crate::error::StudyError> {
        if !score.is_finite() || !max_score.is_finite() || max_score <= 0.0 {
            return Err(crate::error::StudyError::new(
                "Score and max score must be finite and max score positive",
                "validation",
            ));
        }
        if score < 0.0 || score > max_score {
            return Err(crate::error::StudyError::new(
                format!("Score {} is outside 0..={}", score, max_score),
                "validation",
            ));
        }
        Ok(Grade {
            id: super::new_id(),
            subject_id: subject_id.to_string(),
            kind: kind.into(),
            score,
            max_score,
            date,
            category: String::new(),
        })
    }

    pub fn with_category<S: Into<String>>(mut self, category: S) -> Self {
        self.category = category.into();
        self
    }

    /// Score normalized to 0..=100
    pub fn percentage(&self) -> f64 {
        self.score / self.max_score * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_score_above_max() {
        assert!(Grade::new("s", "Quiz", 11.0, 10.0, 0).is_err());
        assert!(Grade::new("s", "Quiz", 5.0, 0.0, 0).is_err());
        assert!(Grade::new("s", "Quiz", f64::NAN, 10.0, 0).is_err());
    }

    #[test]
    fn test_percentage() {
        let grade = Grade::new("s", "Quiz", 18.0, 20.0, 0).unwrap();
        assert!((grade.percentage() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_type_field_on_disk() {
        let json = r#"{"id":"g","subjectId":"s","type":"Midterm","score":70,"date":5,"extra":1}"#;
        let grade: Grade = serde_json::from_str(json).unwrap();
        assert_eq!(grade.kind, "Midterm");
        assert_eq!(grade.max_score, 100.0);
    }
}
