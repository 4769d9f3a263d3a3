//! Stream metadata extraction.
//!
//! A stream is a directory of `.jpg` pictures written by one capture session.
//! `StreamMetadata::scan` validates the whole directory fail-fast: every
//! filename must decode under the grammar in [`crate::filename`] and share
//! one stream-name prefix, or no metadata is returned at all. Downstream
//! consumers see a fully valid, homogeneous stream or nothing.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StreamError;
use crate::filename;

/// Identity shared by every picture of one capture session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StreamIdentity {
    pub cam_id: String,
    /// `stream-<camID>-<streamTime>` for captured streams; synthetic streams
    /// append `-<distributionTag>`.
    pub stream_name: String,
    pub stream_time: NaiveDateTime,
}

/// One picture of a stream, decoded from its filename.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PictureRecord {
    pub pic_num: u64,
    pub capture_time: NaiveDateTime,
    pub source_path: PathBuf,
    pub file_size_bytes: u64,
}

/// Immutable snapshot of a stream directory taken at scan time.
///
/// Pictures are ordered by filename; fixed-width filename fields make that
/// order chronological.
#[derive(Clone, Debug, Serialize)]
pub struct StreamMetadata {
    pub identity: StreamIdentity,
    pub dir: PathBuf,
    pub pictures: Vec<PictureRecord>,
}

impl StreamMetadata {
    /// Scan a stream directory into an ordered, validated snapshot.
    pub fn scan(dir: impl AsRef<Path>) -> Result<Self, StreamError> {
        let dir = dir.as_ref();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StreamError::NotFound {
                    path: dir.to_path_buf(),
                })
            }
            Err(e) => return Err(StreamError::io(dir, e)),
        };

        let mut filenames: Vec<String> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StreamError::io(dir, e))?;
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".jpg") {
                    filenames.push(name.to_string());
                }
            }
        }
        if filenames.is_empty() {
            return Err(StreamError::EmptyStream {
                path: dir.to_path_buf(),
            });
        }
        filenames.sort();

        // The lexicographically first picture fixes the reference identity.
        let reference = filename::decode(&filenames[0])?;
        let identity = StreamIdentity {
            cam_id: reference.cam_id,
            stream_name: reference.stream_name,
            stream_time: reference.stream_time,
        };

        let offenders: Vec<String> = filenames
            .iter()
            .filter(|name| !name.starts_with(&identity.stream_name))
            .cloned()
            .collect();
        if !offenders.is_empty() {
            return Err(StreamError::InconsistentStream {
                expected: identity.stream_name,
                files: offenders,
            });
        }

        let mut pictures = Vec::with_capacity(filenames.len());
        for name in &filenames {
            let decoded = filename::decode(name)?;
            let source_path = dir.join(name);
            let file_size_bytes = fs::metadata(&source_path)
                .map_err(|e| StreamError::io(&source_path, e))?
                .len();
            pictures.push(PictureRecord {
                pic_num: decoded.pic_num,
                capture_time: decoded.capture_time,
                source_path,
                file_size_bytes,
            });
        }

        log::info!(
            "scanned stream '{}': {} pictures in '{}'",
            identity.stream_name,
            pictures.len(),
            dir.display()
        );
        Ok(StreamMetadata {
            identity,
            dir: dir.to_path_buf(),
            pictures,
        })
    }

    pub fn image_count(&self) -> usize {
        self.pictures.len()
    }

    /// Capture timestamps in picture order, for the timing statistics.
    pub fn capture_times(&self) -> Vec<NaiveDateTime> {
        self.pictures.iter().map(|p| p.capture_time).collect()
    }

    pub fn total_size_bytes(&self) -> u64 {
        self.pictures.iter().map(|p| p.file_size_bytes).sum()
    }
}
