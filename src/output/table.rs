use unicode_width::UnicodeWidthStr;

use crate::analysis::Analysis;
use crate::history::HistoryEntry;

/// Format a view count to a compact human-readable string.
pub fn format_views(views: u64) -> String {
    if views >= 1_000_000_000 {
        format!("{:.1}B", views as f64 / 1_000_000_000.0)
    } else if views >= 1_000_000 {
        format!("{:.1}M", views as f64 / 1_000_000.0)
    } else if views >= 1_000 {
        format!("{:.1}K", views as f64 / 1_000.0)
    } else {
        views.to_string()
    }
}

/// Truncate a string to fit within max_width (respecting unicode width).
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

/// Render the full analysis report.
pub fn print_analysis(analysis: &Analysis) {
    let data = &analysis.data;

    println!("Video: {}", data.video_title);
    println!("  Channel:   {}", data.channel_name);
    println!("  Published: {}", data.published_date);
    println!("  Views:     {}", format_views(data.views));
    println!("  Sentiment: {}", data.sentiment);

    if !data.summary.is_empty() {
        println!("\nSummary:");
        for line in data.summary.lines() {
            println!("  {line}");
        }
    }

    if !data.key_topics.is_empty() {
        println!("\nKey Topics:");
        println!("  {}", data.key_topics.join(", "));
    }

    if !data.timestamps.is_empty() {
        println!("\nTimestamps:");
        for ts in &data.timestamps {
            println!("  [{}] {}", ts.time, ts.description);
        }
    }

    let ch = &data.channel_analysis;
    println!("\nChannel Analysis:");
    println!("  Subscribers:     {}", ch.subscriber_count);
    println!("  Total Views:     {}", ch.total_views_estimate);
    println!("  Strategy:        {}", ch.content_strategy);
    if !ch.frequent_topics.is_empty() {
        println!("  Frequent Topics: {}", ch.frequent_topics.join(", "));
    }
    println!("  Success Factors: {}", ch.success_factors);

    if !data.other_videos.is_empty() {
        println!("\nOther Videos from the Channel:");
        for v in &data.other_videos {
            println!("  {:>8}  {}", format_views(v.views), truncate(&v.title, 62));
            if !v.summary.is_empty() {
                println!("            {}", truncate(&v.summary, 62));
            }
        }
    }

    if !analysis.sources.is_empty() {
        println!("\nSources:");
        for s in &analysis.sources {
            println!("  - {}", truncate(&s.title, 72));
            println!("    {}", s.uri);
        }
    }
}

/// Format saved history as a table.
pub fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No history yet. Run `tubeinsight analyze <URL>` first.");
        return;
    }

    println!(
        "{} saved analys{}:\n",
        entries.len(),
        if entries.len() == 1 { "is" } else { "es" }
    );

    println!(
        "  {:<38} {:<20} {:<17} {:<7} {:<4}",
        "TITLE", "CHANNEL", "WHEN", "LENGTH", "LANG"
    );
    println!("  {}", "-".repeat(90));

    for e in entries {
        println!(
            "  {:<38} {:<20} {:<17} {:<7} {:<4}",
            truncate(&e.title, 36),
            truncate(&e.channel_name, 18),
            e.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            e.length.as_str(),
            e.language.as_str(),
        );
        println!("  id: {}\n", e.id);
    }
}
