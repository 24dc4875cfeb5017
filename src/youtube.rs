/// YouTube video IDs are always 11 characters.
const VIDEO_ID_LEN: usize = 11;

/// Pull the video ID out of a YouTube URL.
///
/// Recognizes watch links (`watch?v=`, `&v=`), short links (`youtu.be/`),
/// embed and `/v/` links, legacy `/u/<char>/` links, and shorts. Returns
/// `None` for anything else; callers fall back to searching by the raw URL,
/// so an unrecognized shape is never an error.
pub fn extract_video_id(url: &str) -> Option<String> {
    let re = regex::Regex::new(
        r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=|shorts/)([^#&?]*)",
    )
    .unwrap();

    let id = re.captures(url)?.get(2)?.as_str();
    if id.len() == VIDEO_ID_LEN {
        Some(id.to_string())
    } else {
        None
    }
}
