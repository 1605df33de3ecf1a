//! File classification.
//!
//! Two ordered lookups: path keywords first, then the file extension.
//! The first category in table order wins. No I/O happens here.

pub const OTHER: &str = "other";

/// Category -> keywords searched for anywhere in the lowercased path.
const PATH_KEYWORDS: &[(&str, &[&str])] = &[
    ("movie", &["movie", "movies", "film", "cinema", "flick"]),
    (
        "tv show",
        &["tv", "show", "shows", "series", "episode", "season"],
    ),
    ("book", &["book", "books", "novel", "textbook", "literature"]),
    (
        "audiobook",
        &["audiobook", "audiobooks", "audio book", "narration"],
    ),
    ("podcast", &["podcast", "podcasts", "episode", "broadcast"]),
    ("music", &["music", "album", "track", "song"]),
    ("image", &["image", "picture", "photo", "snapshot", "gallery"]),
    ("ebook", &["ebook", "e-book", "electronic book", "kindle", "pdf"]),
    ("compressed", &["zip", "archive", "compressed", "rar", "tar"]),
];

/// Category -> extensions, leading dot included.
const EXTENSIONS: &[(&str, &[&str])] = &[
    ("audio", &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".m4a"]),
    ("video", &[".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv"]),
    (
        "image",
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".svg"],
    ),
    ("plaintext", &[".txt", ".md", ".log", ".csv", ".json"]),
    (
        "document",
        &[
            ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".odt",
        ],
    ),
    ("ebook", &[".epub", ".mobi", ".azw"]),
    ("compressed", &[".zip", ".rar", ".tar", ".gz", ".7z"]),
];

/// Assigns a category label to a file from its path and extension.
///
/// `extension` carries its leading dot (`".mp4"`); both inputs are
/// compared case-insensitively.
pub fn classify(path: &str, extension: &str) -> &'static str {
    let path = path.to_lowercase();
    for &(category, keywords) in PATH_KEYWORDS {
        if keywords.iter().any(|keyword| path.contains(keyword)) {
            return category;
        }
    }

    let extension = extension.to_lowercase();
    for &(category, extensions) in EXTENSIONS {
        if extensions.contains(&extension.as_str()) {
            return category;
        }
    }

    OTHER
}
