/// Pull the video identifier out of a watch URL, a short link, or a bare id.
///
/// No validation is done on the result; an unusable id surfaces later as a
/// retrieval failure.
pub fn extract_video_id(url: &str) -> &str {
    if let Some((_, rest)) = url.split_once("v=") {
        return rest.split('&').next().unwrap_or(rest);
    }
    if url.contains("youtu.be") {
        return url.rsplit('/').next().unwrap_or(url);
    }
    url
}
