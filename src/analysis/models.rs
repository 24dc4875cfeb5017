use serde::{Deserialize, Serialize};

/// Structured analysis of a single video, decoded from the model's JSON
/// payload. Every field is required: a payload missing any of them fails
/// decoding rather than producing a half-filled report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoData {
    pub video_title: String,
    pub channel_name: String,
    pub summary: String,
    /// Approximate view count; 0 when the model could not find one.
    pub views: u64,
    /// Ideally YYYY-MM-DD, free-form when the model only finds relative dates.
    pub published_date: String,
    pub key_topics: Vec<String>,
    pub timestamps: Vec<VideoTimestamp>,
    /// Free-form label such as "Positive" or "Educational".
    pub sentiment: String,
    pub channel_analysis: ChannelAnalysis,
    pub other_videos: Vec<RelatedVideo>,
}

/// A notable moment within the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTimestamp {
    /// "MM:SS"-style position.
    pub time: String,
    pub description: String,
}

/// Channel-level context around the analyzed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAnalysis {
    pub subscriber_count: String,
    pub content_strategy: String,
    pub total_views_estimate: String,
    pub frequent_topics: Vec<String>,
    pub success_factors: String,
}

/// Another recent video from the same channel, for comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedVideo {
    pub title: String,
    pub views: u64,
    pub summary: String,
}

/// A web source the model consulted while grounding the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingUrl {
    pub title: String,
    pub uri: String,
}

/// How long the generated summary should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    Medium,
    Long,
}

impl SummaryLength {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "short" | "s" => Some(SummaryLength::Short),
            "medium" | "m" => Some(SummaryLength::Medium),
            "long" | "l" => Some(SummaryLength::Long),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }
}

/// Output language for the generated analysis text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ko,
}

impl Language {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Some(Language::En),
            "ko" | "korean" => Some(Language::Ko),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Language::En => "en",
            Language::Ko => "ko",
        }
    }
}

// History entries written before the language option existed carry no
// language field; they decode as English.
impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}
