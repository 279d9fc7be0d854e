//! MIME type lookup for derived filenames

use crate::utils::filename;

/// MIME type for a filename, derived from its extension.
///
/// Unknown or missing extensions fall back to the generic binary type,
/// which also covers the extension-less generated fallback names.
pub fn mime_for_filename(name: &str) -> &'static str {
    match filename::extension(name).as_deref() {
        // Video containers
        Some("mp4") => "video/mp4",
        Some("mkv") => "video/x-matroska",
        Some("webm") => "video/webm",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("ts") => "video/mp2t",
        Some("flv") => "video/x-flv",
        Some("mpeg") | Some("mpg") => "video/mpeg",

        // Audio
        Some("m4a") => "audio/mp4",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("flac") => "audio/flac",
        Some("aac") => "audio/aac",
        Some("wav") => "audio/wav",

        // Sidecar files occasionally served alongside episodes
        Some("srt") => "application/x-subrip",
        Some("ass") => "text/plain",
        Some("zip") => "application/zip",

        _ => "application/octet-stream",
    }
}
