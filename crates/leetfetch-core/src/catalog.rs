use std::fmt;

use serde::{Deserialize, Serialize};

/// Problem difficulty as reported by the catalog.
///
/// The snapshot endpoint reports numeric levels instead of names; anything
/// outside the known range maps to `Unknown`, as does an unrecognized name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Difficulty {
    /// Map the numeric levels used by the snapshot endpoint.
    pub fn from_level(level: i64) -> Self {
        match level {
            1 => Self::Easy,
            2 => Self::Medium,
            3 => Self::Hard,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Unknown => "Unknown",
        })
    }
}

/// One problem summary from the catalog.
///
/// Field names map to the wire format, so cached records and fresh responses
/// deserialize identically. `frontend_id` is the small user-facing number;
/// `id` is the internal one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "questionId")]
    pub id: String,
    #[serde(rename = "questionFrontendId")]
    pub frontend_id: String,
    pub title: String,
    #[serde(rename = "titleSlug")]
    pub slug: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(rename = "paidOnly", default)]
    pub paid_only: bool,
}

/// Full problem record, fetched per slug.
///
/// `content` is the raw HTML body; it is `None` (or empty) when the problem
/// is gated and no session credential was supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetail {
    #[serde(rename = "questionId")]
    pub id: String,
    #[serde(rename = "questionFrontendId")]
    pub frontend_id: String,
    pub title: String,
    #[serde(rename = "titleSlug")]
    pub slug: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(rename = "isPaidOnly", default)]
    pub paid_only: bool,
    #[serde(rename = "topicTags", default)]
    pub tags: Vec<TopicTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTag {
    pub name: String,
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_from_level() {
        assert_eq!(Difficulty::from_level(1), Difficulty::Easy);
        assert_eq!(Difficulty::from_level(2), Difficulty::Medium);
        assert_eq!(Difficulty::from_level(3), Difficulty::Hard);
        assert_eq!(Difficulty::from_level(0), Difficulty::Unknown);
        assert_eq!(Difficulty::from_level(7), Difficulty::Unknown);
    }

    #[test]
    fn unrecognized_difficulty_name_is_unknown() {
        let entry: CatalogEntry = serde_json::from_value(serde_json::json!({
            "questionId": "9",
            "questionFrontendId": "9",
            "title": "Palindrome Number",
            "titleSlug": "palindrome-number",
            "difficulty": "Trivial",
        }))
        .unwrap();
        assert_eq!(entry.difficulty, Difficulty::Unknown);
        assert!(!entry.paid_only);
    }

    #[test]
    fn detail_tolerates_gated_content() {
        let detail: ProblemDetail = serde_json::from_value(serde_json::json!({
            "questionId": "156",
            "questionFrontendId": "156",
            "title": "Binary Tree Upside Down",
            "titleSlug": "binary-tree-upside-down",
            "content": null,
            "difficulty": "Medium",
            "isPaidOnly": true,
            "topicTags": [],
        }))
        .unwrap();
        assert!(detail.paid_only);
        assert_eq!(detail.content, None);
    }
}
