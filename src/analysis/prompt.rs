use crate::analysis::models::{Language, SummaryLength};

fn length_instruction(length: SummaryLength) -> &'static str {
    match length {
        SummaryLength::Short => "Keep the summary concise and brief, around 50 words.",
        SummaryLength::Medium => "Provide a standard comprehensive summary, around 150-200 words.",
        SummaryLength::Long => {
            "Provide a very detailed and in-depth summary, around 300-400 words, covering all nuances."
        }
    }
}

fn language_instruction(language: Language) -> &'static str {
    match language {
        Language::Ko => {
            "IMPORTANT: Provide the response entirely in Korean (Hangul). This includes the \
             summary, descriptions, channel strategy, success factors, key topics, and SENTIMENT \
             (e.g., '긍정적', '교육적'). Translate everything naturally."
        }
        Language::En => "Provide the response in English.",
    }
}

/// Assemble the analysis instruction sent alongside the response schema.
/// Pure: identical inputs produce byte-identical prompts, so request bodies
/// are reproducible for a given (url, id, length, language).
pub fn build_prompt(
    url: &str,
    video_id: Option<&str>,
    length: SummaryLength,
    language: Language,
) -> String {
    let search_target = match video_id {
        Some(id) => format!("the Video ID (\"{id}\") or the full URL"),
        None => "the full URL".to_string(),
    };

    let mut lines = vec![
        "You are an expert YouTube video analyzer.".to_string(),
        format!("Target Video URL: {url}"),
    ];
    if let Some(id) = video_id {
        lines.push(format!("Target Video ID: {id}"));
    }
    lines.push(String::new());
    lines.push("Your Task: Accurately analyze THIS specific video.".to_string());
    lines.push(String::new());
    lines.push("**Execution Steps**:".to_string());
    lines.push(format!(
        "1. **Search**: Use Google Search to find the *exact* video by searching for {search_target}."
    ));
    lines.push(
        "2. **Verify**: Ensure the title, views, and content you find match this specific video. \
         Do not use general channel info for the video summary."
            .to_string(),
    );
    lines.push("3. **Analyze**:".to_string());
    lines.push(format!(
        "   - **Summary**: Synthesize a clear summary from the search results (reviews, \
         transcripts, descriptions). {}",
        length_instruction(length)
    ));
    lines.push("   - **Timestamps**: Identify key moments.".to_string());
    lines.push(
        "   - **Metadata**: Find the **exact publish date** (convert to YYYY-MM-DD format) and \
         view count."
            .to_string(),
    );
    lines.push("   - **Channel**: Analyze the creator's broader strategy.".to_string());
    lines.push(String::new());
    lines.push(format!(
        "**Language Requirement**: {}",
        language_instruction(language)
    ));
    lines.push(String::new());
    lines.push("Output strictly in JSON format matching the schema provided.".to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    #[test]
    fn identical_inputs_produce_identical_prompts() {
        let a = build_prompt(URL, Some("dQw4w9WgXcQ"), SummaryLength::Medium, Language::En);
        let b = build_prompt(URL, Some("dQw4w9WgXcQ"), SummaryLength::Medium, Language::En);
        assert_eq!(a, b);
    }

    #[test]
    fn id_line_appears_only_when_an_id_was_recovered() {
        let with_id = build_prompt(URL, Some("dQw4w9WgXcQ"), SummaryLength::Medium, Language::En);
        assert!(with_id.contains("Target Video ID: dQw4w9WgXcQ"));
        assert!(with_id.contains("the Video ID (\"dQw4w9WgXcQ\")"));

        let without_id = build_prompt(URL, None, SummaryLength::Medium, Language::En);
        assert!(!without_id.contains("Target Video ID"));
        assert!(!without_id.contains("Video ID (\""));
        assert!(without_id.contains(&format!("Target Video URL: {URL}")));
    }

    #[test]
    fn each_length_gets_its_own_directive() {
        let short = build_prompt(URL, None, SummaryLength::Short, Language::En);
        assert!(short.contains("around 50 words"));

        let medium = build_prompt(URL, None, SummaryLength::Medium, Language::En);
        assert!(medium.contains("around 150-200 words"));

        let long = build_prompt(URL, None, SummaryLength::Long, Language::En);
        assert!(long.contains("around 300-400 words"));
        assert!(long.contains("covering all nuances"));
    }

    #[test]
    fn language_directive_switches_with_language() {
        let en = build_prompt(URL, None, SummaryLength::Medium, Language::En);
        assert!(en.contains("Provide the response in English."));
        assert!(!en.contains("Korean"));

        let ko = build_prompt(URL, None, SummaryLength::Medium, Language::Ko);
        assert!(ko.contains("entirely in Korean (Hangul)"));
        assert!(ko.contains("긍정적"));
    }
}
