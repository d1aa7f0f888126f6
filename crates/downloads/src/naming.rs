/// Lower-case `part` and replace anything outside `[a-z0-9-]` with `-`.
pub fn sanitize(part: &str) -> String {
    part.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '-',
        })
        .collect()
}

/// `{prefix}-{voice}.wav` for plain speech, `{prefix}-{voice}-{track}.wav` when mixed.
pub fn download_filename(prefix: &str, voice: &str, track_id: Option<&str>) -> String {
    let mut stem = format!("{}-{}", sanitize(prefix), sanitize(voice));
    if let Some(track) = track_id {
        stem.push('-');
        stem.push_str(&sanitize(track));
    }
    format!("{stem}.wav")
}
