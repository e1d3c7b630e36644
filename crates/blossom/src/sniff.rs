//! Media type detection from the leading bytes of a blob.
//!
//! Detection follows the signature tables of the WHATWG MIME sniffing
//! standard: a fixed list of patterns is tried in order against at most
//! [`SNIFF_LEN`] bytes and the first match wins. Content that matches no
//! signature and contains control bytes is reported as
//! [`OCTET_STREAM`].

/// The maximum number of leading bytes that are considered for detection.
pub const SNIFF_LEN: usize = 512;

/// The generic binary media type, used whenever nothing better is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// The extension used for media types without a known extension.
pub const FALLBACK_EXTENSION: &str = ".bin";

const HTML_UTF8: &str = "text/html; charset=utf-8";
const TEXT_UTF8: &str = "text/plain; charset=utf-8";

enum Signature {
    /// A case-insensitive HTML tag, optionally preceded by whitespace and
    /// followed by a space or `>`.
    Html(&'static [u8]),
    /// A byte pattern compared after masking the input.
    Masked {
        mask: &'static [u8],
        pattern: &'static [u8],
        skip_whitespace: bool,
        content_type: &'static str,
    },
    /// A literal prefix.
    Exact {
        prefix: &'static [u8],
        content_type: &'static str,
    },
    /// An ISO base media file with an `mp4` brand.
    Mp4,
    /// Anything without binary control bytes.
    Text,
}

// 34 arbitrary bytes followed by "LP".
const EOT_MASK: [u8; 36] = {
    let mut mask = [0u8; 36];
    mask[34] = 0xFF;
    mask[35] = 0xFF;
    mask
};
const EOT_PATTERN: [u8; 36] = {
    let mut pattern = [0u8; 36];
    pattern[34] = b'L';
    pattern[35] = b'P';
    pattern
};

const fn exact(prefix: &'static [u8], content_type: &'static str) -> Signature {
    Signature::Exact {
        prefix,
        content_type,
    }
}

const fn masked(
    mask: &'static [u8],
    pattern: &'static [u8],
    content_type: &'static str,
) -> Signature {
    Signature::Masked {
        mask,
        pattern,
        skip_whitespace: false,
        content_type,
    }
}

static SIGNATURES: &[Signature] = &[
    Signature::Html(b"<!DOCTYPE HTML"),
    Signature::Html(b"<HTML"),
    Signature::Html(b"<HEAD"),
    Signature::Html(b"<SCRIPT"),
    Signature::Html(b"<IFRAME"),
    Signature::Html(b"<H1"),
    Signature::Html(b"<DIV"),
    Signature::Html(b"<FONT"),
    Signature::Html(b"<TABLE"),
    Signature::Html(b"<A"),
    Signature::Html(b"<STYLE"),
    Signature::Html(b"<TITLE"),
    Signature::Html(b"<B"),
    Signature::Html(b"<BODY"),
    Signature::Html(b"<BR"),
    Signature::Html(b"<P"),
    Signature::Html(b"<!--"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF",
        pattern: b"<?xml",
        skip_whitespace: true,
        content_type: "text/xml; charset=utf-8",
    },
    exact(b"%PDF-", "application/pdf"),
    exact(b"%!PS-Adobe-", "application/postscript"),
    // Byte order marks
    masked(b"\xFF\xFF\x00\x00", b"\xFE\xFF\x00\x00", "text/plain; charset=utf-16be"),
    masked(b"\xFF\xFF\x00\x00", b"\xFF\xFE\x00\x00", "text/plain; charset=utf-16le"),
    masked(b"\xFF\xFF\xFF\x00", b"\xEF\xBB\xBF\x00", TEXT_UTF8),
    // Images
    exact(b"\x00\x00\x01\x00", "image/x-icon"),
    exact(b"\x00\x00\x02\x00", "image/x-icon"),
    exact(b"BM", "image/bmp"),
    exact(b"GIF87a", "image/gif"),
    exact(b"GIF89a", "image/gif"),
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        b"RIFF\x00\x00\x00\x00WEBPVP",
        "image/webp",
    ),
    exact(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    exact(b"\xFF\xD8\xFF", "image/jpeg"),
    // Audio and video
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        b"FORM\x00\x00\x00\x00AIFF",
        "audio/aiff",
    ),
    masked(b"\xFF\xFF\xFF", b"ID3", "audio/mpeg"),
    masked(b"\xFF\xFF\xFF\xFF\xFF", b"OggS\x00", "application/ogg"),
    masked(
        b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
        b"MThd\x00\x00\x00\x06",
        "audio/midi",
    ),
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        b"RIFF\x00\x00\x00\x00AVI ",
        "video/avi",
    ),
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        b"RIFF\x00\x00\x00\x00WAVE",
        "audio/wave",
    ),
    Signature::Mp4,
    exact(b"\x1A\x45\xDF\xA3", "video/webm"),
    // Fonts
    masked(&EOT_MASK, &EOT_PATTERN, "application/vnd.ms-fontobject"),
    exact(b"\x00\x01\x00\x00", "font/ttf"),
    exact(b"OTTO", "font/otf"),
    exact(b"ttcf", "font/collection"),
    exact(b"wOFF", "font/woff"),
    exact(b"wOF2", "font/woff2"),
    // Archives
    exact(b"\x1F\x8B\x08", "application/x-gzip"),
    exact(b"PK\x03\x04", "application/zip"),
    exact(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    exact(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    exact(b"\x00\x61\x73\x6D", "application/wasm"),
    Signature::Text,
];

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

fn is_binary(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

fn is_tag_terminator(b: u8) -> bool {
    b == b' ' || b == b'>'
}

impl Signature {
    fn matches(&self, data: &[u8], first_non_ws: usize) -> Option<&'static str> {
        match self {
            Signature::Exact {
                prefix,
                content_type,
            } => data.starts_with(prefix).then_some(*content_type),
            Signature::Masked {
                mask,
                pattern,
                skip_whitespace,
                content_type,
            } => {
                let data = if *skip_whitespace {
                    &data[first_non_ws..]
                } else {
                    data
                };
                if data.len() < pattern.len() {
                    return None;
                }
                let matched = pattern
                    .iter()
                    .zip(mask.iter())
                    .zip(data)
                    .all(|((p, m), d)| d & m == *p);
                matched.then_some(*content_type)
            }
            Signature::Html(tag) => {
                let data = &data[first_non_ws..];
                if data.len() < tag.len() + 1 {
                    return None;
                }
                let matched = tag.iter().zip(data).all(|(t, d)| {
                    if t.is_ascii_uppercase() {
                        d & 0xDF == *t
                    } else {
                        d == t
                    }
                });
                (matched && is_tag_terminator(data[tag.len()])).then_some(HTML_UTF8)
            }
            Signature::Mp4 => {
                if data.len() < 12 {
                    return None;
                }
                let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
                if data.len() < box_size || box_size % 4 != 0 || &data[4..8] != b"ftyp" {
                    return None;
                }
                // Skip the minor version at offset 12, every other word is a brand.
                (8..box_size)
                    .step_by(4)
                    .filter(|&offset| offset != 12)
                    .any(|offset| &data[offset..offset + 3] == b"mp4")
                    .then_some("video/mp4")
            }
            Signature::Text => data[first_non_ws..]
                .iter()
                .all(|b| !is_binary(*b))
                .then_some(TEXT_UTF8),
        }
    }
}

/// Determines the content type of `data`, including parameters such as the
/// charset of textual content.
///
/// At most the first [`SNIFF_LEN`] bytes are inspected. Empty input and input
/// that matches no signature yield [`OCTET_STREAM`].
pub fn detect_content_type(data: &[u8]) -> &'static str {
    if data.is_empty() {
        return OCTET_STREAM;
    }

    let data = &data[..data.len().min(SNIFF_LEN)];
    let first_non_ws = data
        .iter()
        .position(|b| !is_whitespace(*b))
        .unwrap_or(data.len());

    SIGNATURES
        .iter()
        .find_map(|signature| signature.matches(data, first_non_ws))
        .unwrap_or(OCTET_STREAM)
}

/// Determines the media type of `data` without any parameters, e.g.
/// `text/html` instead of `text/html; charset=utf-8`.
pub fn detect_media_type(data: &[u8]) -> String {
    essence(detect_content_type(data)).unwrap_or_else(|| OCTET_STREAM.to_owned())
}

/// Strips the parameters from a content type and lower-cases the remainder.
/// Returns `None` if the input is not a valid media type.
///
/// Only the part before the first `;` is considered, so malformed parameters
/// such as a bare `charset` do not invalidate the media type itself.
pub fn essence(content_type: &str) -> Option<String> {
    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    let mime: mime::Mime = media_type.parse().ok()?;
    Some(mime.essence_str().to_ascii_lowercase())
}

/// Returns the canonical file extension (including the leading dot) for a
/// media type. Parameters are ignored.
///
/// Extensions are looked up in the registry of [`mime_guess`]. When it lists
/// several extensions for a type the conventional one is preferred (`.jpg`,
/// `.html`, `.txt`), otherwise the lexicographically smallest candidate is
/// used. Unknown media types map to [`FALLBACK_EXTENSION`].
pub fn extension_for_media_type(media_type: &str) -> String {
    let Some(essence) = essence(media_type) else {
        return FALLBACK_EXTENSION.to_owned();
    };

    preferred_extension(&essence)
        .or_else(|| {
            mime_guess::get_mime_extensions_str(&essence)
                .and_then(|candidates| candidates.iter().min().copied())
        })
        .or_else(|| sniffed_extension(&essence))
        .map_or_else(|| FALLBACK_EXTENSION.to_owned(), |ext| format!(".{ext}"))
}

/// Types for which the registry lists several extensions and the
/// lexicographic choice is not the one in common use.
fn preferred_extension(essence: &str) -> Option<&'static str> {
    Some(match essence {
        "application/octet-stream" => "bin",
        "audio/mpeg" => "mp3",
        "audio/ogg" => "ogg",
        "image/jpeg" => "jpg",
        "text/html" => "html",
        "text/javascript" | "application/javascript" => "js",
        "text/plain" => "txt",
        "video/mp4" => "mp4",
        "video/mpeg" => "mpeg",
        _ => return None,
    })
}

/// Spellings produced by [`detect_content_type`] that are not registered
/// under the same name.
fn sniffed_extension(essence: &str) -> Option<&'static str> {
    Some(match essence {
        "application/ogg" => "ogx",
        "application/vnd.ms-fontobject" => "eot",
        "application/wasm" => "wasm",
        "application/x-gzip" => "gz",
        "application/x-rar-compressed" => "rar",
        "audio/aiff" => "aiff",
        "audio/midi" => "mid",
        "audio/wave" => "wav",
        "font/collection" => "ttc",
        "font/otf" => "otf",
        "font/ttf" => "ttf",
        "font/woff" => "woff",
        "font/woff2" => "woff2",
        "image/x-icon" => "ico",
        "video/avi" => "avi",
        _ => return None,
    })
}
