use serde_json::{json, Value};

/// The responseSchema constraint sent with every analysis request.
///
/// Mirrors `VideoData` field for field. Every property is listed in the
/// `required` array of its level, so the model cannot omit one and still
/// satisfy the schema; the strict decode on our side assumes this. Type
/// names are the uppercase spellings the REST endpoint expects.
pub fn video_analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "videoTitle": {
                "type": "STRING",
                "description": "The exact title of the YouTube video."
            },
            "channelName": {
                "type": "STRING",
                "description": "The name of the YouTube channel."
            },
            "summary": {
                "type": "STRING",
                "description": "The summary of the video content."
            },
            "views": {
                "type": "INTEGER",
                "description": "The approximate number of views for this specific video. If unknown, estimate based on search or put 0."
            },
            "publishedDate": {
                "type": "STRING",
                "description": "The exact publish date in YYYY-MM-DD format (e.g. '2023-10-25'). If exact date is not found, convert relative time (e.g. '2 days ago') to approximate YYYY-MM-DD date."
            },
            "keyTopics": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of 5-7 key keywords or topics discussed in the video."
            },
            "timestamps": {
                "type": "ARRAY",
                "description": "Key moments in the video with their estimated timestamps.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "time": {
                            "type": "STRING",
                            "description": "Time format like '01:30' or '12:45'"
                        },
                        "description": {
                            "type": "STRING",
                            "description": "Brief description of what happens at this time."
                        }
                    },
                    "required": ["time", "description"]
                }
            },
            "sentiment": {
                "type": "STRING",
                "description": "Overall sentiment of the video (e.g., Educational, Controversial, Positive, Entertaining)."
            },
            "channelAnalysis": {
                "type": "OBJECT",
                "properties": {
                    "subscriberCount": {
                        "type": "STRING",
                        "description": "Approximate subscriber count."
                    },
                    "contentStrategy": {
                        "type": "STRING",
                        "description": "A brief analysis of the channel's general content style and target audience."
                    },
                    "totalViewsEstimate": {
                        "type": "STRING",
                        "description": "Total channel views estimate."
                    },
                    "frequentTopics": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "List of 3-5 topics this creator frequently covers."
                    },
                    "successFactors": {
                        "type": "STRING",
                        "description": "Insight into what makes this creator's videos successful or unique."
                    }
                },
                "required": [
                    "subscriberCount",
                    "contentStrategy",
                    "totalViewsEstimate",
                    "frequentTopics",
                    "successFactors"
                ]
            },
            "otherVideos": {
                "type": "ARRAY",
                "description": "A list of 3-5 other popular or recent videos from the same channel for comparison.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "views": {
                            "type": "INTEGER",
                            "description": "View count for this other video."
                        },
                        "summary": {
                            "type": "STRING",
                            "description": "One sentence summary of this other video."
                        }
                    },
                    "required": ["title", "views", "summary"]
                }
            }
        },
        "required": [
            "videoTitle",
            "channelName",
            "summary",
            "views",
            "publishedDate",
            "keyTopics",
            "timestamps",
            "sentiment",
            "channelAnalysis",
            "otherVideos"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_names(value: &Value) -> Vec<&str> {
        value["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn every_top_level_property_is_required() {
        let schema = video_analysis_schema();
        let properties: Vec<&str> = schema["properties"]
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        let required = required_names(&schema);

        assert_eq!(properties.len(), 10);
        for name in properties {
            assert!(required.contains(&name), "{name} missing from required");
        }
    }

    #[test]
    fn nested_objects_require_all_their_fields() {
        let schema = video_analysis_schema();

        assert_eq!(
            required_names(&schema["properties"]["channelAnalysis"]),
            vec![
                "subscriberCount",
                "contentStrategy",
                "totalViewsEstimate",
                "frequentTopics",
                "successFactors"
            ]
        );
        assert_eq!(
            required_names(&schema["properties"]["timestamps"]["items"]),
            vec!["time", "description"]
        );
        assert_eq!(
            required_names(&schema["properties"]["otherVideos"]["items"]),
            vec!["title", "views", "summary"]
        );
    }

    #[test]
    fn type_names_use_the_rest_spelling() {
        let schema = video_analysis_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["views"]["type"], "INTEGER");
        assert_eq!(schema["properties"]["keyTopics"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["keyTopics"]["items"]["type"], "STRING");
    }

    #[test]
    fn schema_constrains_every_video_data_field() {
        // The decode side fails closed on missing fields, so the schema and
        // the struct have to agree on the field list.
        let schema = video_analysis_schema();
        let payload = serde_json::json!({
            "videoTitle": "t", "channelName": "c", "summary": "s", "views": 1,
            "publishedDate": "2025-01-01", "keyTopics": [], "timestamps": [],
            "sentiment": "Neutral",
            "channelAnalysis": {
                "subscriberCount": "1K", "contentStrategy": "x",
                "totalViewsEstimate": "1M", "frequentTopics": [], "successFactors": "y"
            },
            "otherVideos": []
        });

        for name in required_names(&schema) {
            assert!(payload.get(name).is_some(), "{name} absent from payload");
        }
        assert!(serde_json::from_value::<crate::analysis::VideoData>(payload).is_ok());
    }
}
