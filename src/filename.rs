//! Bidirectional mapping between picture filenames and structured identity.
//!
//! Every capture session writes pictures named
//!
//! ```text
//! stream-<camID>-<streamTime>-pic-N<picNum>-<captureTime>.jpg
//! ```
//!
//! where both timestamps carry microsecond precision
//! (`2023-05-30_21-34-27.872104`) and `picNum` is zero-padded to six digits.
//! Fixed-width fields make lexicographic filename order equal chronological
//! order, which the extractor relies on.

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::StreamError;

/// Timestamp layout shared by stream and capture times.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S%.6f";

/// A picture filename decoded into its identity and record fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedPicture {
    /// Full `stream-<camID>-<streamTime>` prefix.
    pub stream_name: String,
    pub cam_id: String,
    pub stream_time: NaiveDateTime,
    pub pic_num: u64,
    pub capture_time: NaiveDateTime,
}

fn picture_re() -> &'static Regex {
    // Compile once; anchored on both ends so callers never see partial matches.
    static PICTURE_RE: OnceLock<Regex> = OnceLock::new();
    PICTURE_RE.get_or_init(|| {
        let ts = r"\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2}\.\d{6}";
        Regex::new(&format!(
            r"^(stream-(\w+)-({ts}))-pic-N(\d+)-({ts})\.jpg$"
        ))
        .unwrap()
    })
}

/// Decode a picture filename, failing on any deviation from the grammar.
///
/// This is the single validated entry point for the filename protocol;
/// callers get a structured result or a typed error, never a raw match.
pub fn decode(filename: &str) -> Result<DecodedPicture, StreamError> {
    let parse_err = || StreamError::Parse {
        filename: filename.to_string(),
    };
    let caps = picture_re().captures(filename).ok_or_else(parse_err)?;

    let stream_time = parse_timestamp(&caps[3]).ok_or_else(parse_err)?;
    let capture_time = parse_timestamp(&caps[5]).ok_or_else(parse_err)?;
    let pic_num: u64 = caps[4].parse().map_err(|_| parse_err())?;

    Ok(DecodedPicture {
        stream_name: caps[1].to_string(),
        cam_id: caps[2].to_string(),
        stream_time,
        pic_num,
        capture_time,
    })
}

/// Encode a picture filename; exact inverse of [`decode`] for valid inputs.
pub fn encode(stream_name: &str, pic_num: u64, capture_time: NaiveDateTime) -> String {
    format!(
        "{}-pic-N{:06}-{}.jpg",
        stream_name,
        pic_num,
        format_timestamp(capture_time)
    )
}

pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
}
