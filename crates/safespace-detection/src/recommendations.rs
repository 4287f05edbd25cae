//! Advisory text for a detection result, keyed by severity and category.
//! Consumed by the HTTP detection endpoint.

use safespace_core::detection::{Category, DetectionResult, DetectionSeverity};

/// Contextual recommendations for handling a detection.
pub fn for_result(result: &DetectionResult) -> Vec<String> {
    if !result.flagged {
        return vec!["Message appears appropriate for workplace communication".to_string()];
    }

    let mut recs: Vec<String> = match result.severity {
        DetectionSeverity::High => vec![
            "Immediate intervention may be required".to_string(),
            "Consider contacting Gender Violence Recovery Centre: 0709 558 000".to_string(),
            "Escalate to HR or management immediately".to_string(),
            "Document this incident for formal reporting".to_string(),
        ],
        DetectionSeverity::Medium => vec![
            "Message requires attention and possible intervention".to_string(),
            "Consider reaching out privately to check on involved parties".to_string(),
            "Provide educational resources about workplace conduct".to_string(),
            "Consider filing a report if the pattern continues".to_string(),
        ],
        DetectionSeverity::Low => vec![
            "Gentle reminder about respectful workplace communication".to_string(),
            "Share resources about inclusive language".to_string(),
            "Monitor for patterns of concerning behavior".to_string(),
        ],
    };

    for category in &result.categories {
        let extra = match category {
            Category::Sexual => {
                Some("Sexual harassment policies should be reviewed with involved parties")
            }
            Category::Harassment => Some("Anti-harassment training may be beneficial"),
            Category::Threats => Some("Safety assessment and immediate intervention required"),
            Category::Discrimination => {
                Some("Diversity and inclusion resources should be provided")
            }
            _ => None,
        };
        if let Some(extra) = extra {
            recs.push(extra.to_string());
        }
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use safespace_core::detection::{ChannelType, DetectionResult};

    #[test]
    fn unflagged_gets_single_all_clear() {
        let result = DetectionResult::empty("hash".into(), ChannelType::Public);
        let recs = for_result(&result);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("appropriate"));
    }

    #[test]
    fn threats_add_safety_assessment() {
        let mut result = DetectionResult::empty("hash".into(), ChannelType::Dm);
        result.flagged = true;
        result.severity = DetectionSeverity::Medium;
        result.categories = vec![Category::Threats];
        let recs = for_result(&result);
        assert!(recs.iter().any(|r| r.contains("Safety assessment")));
    }
}
