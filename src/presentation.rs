use serde::Serialize;

use crate::classification::ClassificationResult;

/// Symbolic styling for a classified reading
///
/// Consumers map these tokens to their own colours and icon sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Treatment {
    pub border_style: &'static str,
    pub icon: Option<&'static str>,
}

impl Treatment {
    pub fn for_result(result: ClassificationResult) -> Self {
        match result {
            ClassificationResult::Pass => Self {
                border_style: "success",
                icon: Some("check"),
            },
            ClassificationResult::Warning => Self {
                border_style: "warning",
                icon: Some("alert-triangle"),
            },
            ClassificationResult::Fail => Self {
                border_style: "destructive",
                icon: Some("x-circle"),
            },
            ClassificationResult::Unknown => Self {
                border_style: "neutral",
                icon: None,
            },
        }
    }
}

impl From<ClassificationResult> for Treatment {
    fn from(result: ClassificationResult) -> Self {
        Self::for_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_has_no_icon() {
        let treatment = Treatment::for_result(ClassificationResult::Unknown);
        assert_eq!(treatment.border_style, "neutral");
        assert!(treatment.icon.is_none());
    }

    #[test]
    fn test_each_result_has_distinct_style() {
        let styles: Vec<_> = ClassificationResult::ALL
            .iter()
            .map(|&r| Treatment::from(r).border_style)
            .collect();

        for (i, a) in styles.iter().enumerate() {
            for b in &styles[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
