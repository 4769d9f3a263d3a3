//! Synthetic delayed-stream generation.
//!
//! Generation is split into a pure planning step and a materialization step.
//! `plan` samples one delay per original picture and builds the complete
//! synthetic metadata in memory; `materialize` is the only part that touches
//! the filesystem. A target directory is written at most once: creation fails
//! if it already exists, and the `_SUCCESS` marker is written only after
//! every copy has succeeded. A directory without the marker must be treated
//! as incomplete regardless of how many files it contains.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use serde::{Serialize, Serializer};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::delay::DelayModel;
use crate::error::StreamError;
use crate::filename;
use crate::metadata::{PictureRecord, StreamIdentity, StreamMetadata};
use crate::timing::duration_to_ms;

/// Zero-byte sentinel written last; its presence is the sole signal that a
/// generated directory is complete and trustworthy.
pub const COMPLETION_MARKER: &str = "_SUCCESS";

/// A planned picture of the synthetic stream: the original record shifted by
/// a sampled delay, same `pic_num`, new filename.
#[derive(Clone, Debug, Serialize)]
pub struct SyntheticPictureRecord<'a> {
    pub pic_num: u64,
    pub capture_time: NaiveDateTime,
    pub filename: String,
    pub file_size_bytes: u64,
    #[serde(serialize_with = "serialize_delay_ms")]
    pub added_delay: Duration,
    /// Back-reference to the originating record; the plan never owns the
    /// original metadata.
    pub original: &'a PictureRecord,
}

/// A fully planned synthetic stream, built in memory before any I/O.
#[derive(Clone, Debug, Serialize)]
pub struct SyntheticStreamMetadata<'a> {
    /// New identity: `<originalStreamName>-<distributionTag>`.
    pub identity: StreamIdentity,
    pub pictures: Vec<SyntheticPictureRecord<'a>>,
    pub source: &'a StreamMetadata,
}

impl<'a> SyntheticStreamMetadata<'a> {
    /// Plan a delayed copy of `source` by sampling `model` once per picture.
    ///
    /// Pictures keep their original file order; sampled delays may make the
    /// encoded capture times non-monotonic relative to each other, and the
    /// plan deliberately does not re-sort them. Filenames keep the original
    /// stream-name prefix (the tagged composite is not a valid stream name
    /// under the codec grammar); the tag names the identity and its
    /// directory.
    pub fn plan<R: Rng + ?Sized>(
        source: &'a StreamMetadata,
        model: &DelayModel,
        rng: &mut R,
    ) -> Self {
        let original_name = &source.identity.stream_name;
        let pictures = source
            .pictures
            .iter()
            .map(|original| {
                let added_delay = model.sample(rng);
                let capture_time = original.capture_time + added_delay;
                SyntheticPictureRecord {
                    pic_num: original.pic_num,
                    capture_time,
                    filename: filename::encode(original_name, original.pic_num, capture_time),
                    file_size_bytes: original.file_size_bytes,
                    added_delay,
                    original,
                }
            })
            .collect();

        SyntheticStreamMetadata {
            identity: StreamIdentity {
                cam_id: source.identity.cam_id.clone(),
                stream_name: format!("{}-{}", original_name, model.tag()),
                stream_time: source.identity.stream_time,
            },
            pictures,
            source,
        }
    }

    pub fn image_count(&self) -> usize {
        self.pictures.len()
    }

    /// Directory the plan materializes into under `output_root`.
    pub fn target_dir(&self, output_root: &Path) -> PathBuf {
        output_root.join(&self.identity.stream_name)
    }

    /// Write the planned stream under `output_root`, copying every original
    /// picture verbatim, then drop the completion marker.
    ///
    /// Fails with [`StreamError::AlreadyExists`] without creating anything if
    /// the target directory is already present. A copy failure aborts in
    /// place; already-copied files are not rolled back and the marker is not
    /// written.
    pub fn materialize(&self, output_root: &Path) -> Result<PathBuf, StreamError> {
        let target = self.target_dir(output_root);
        if let Err(e) = fs::create_dir(&target) {
            return Err(match e.kind() {
                io::ErrorKind::AlreadyExists => StreamError::AlreadyExists { path: target },
                _ => StreamError::io(target, e),
            });
        }
        log::info!("created directory '{}'", target.display());

        for picture in &self.pictures {
            let dst = target.join(&picture.filename);
            fs::copy(&picture.original.source_path, &dst)
                .map_err(|e| StreamError::io(&picture.original.source_path, e))?;
            log::debug!(
                "copied '{}' -> '{}'",
                picture.original.source_path.display(),
                dst.display()
            );
        }

        let marker = target.join(COMPLETION_MARKER);
        File::create(&marker).map_err(|e| StreamError::io(&marker, e))?;
        log::info!(
            "materialized {} pictures into '{}' (marker written)",
            self.pictures.len(),
            target.display()
        );
        Ok(target)
    }
}

/// Whether `dir` carries the completion marker of a finished materialization.
pub fn is_complete(dir: &Path) -> bool {
    dir.join(COMPLETION_MARKER).is_file()
}

fn serialize_delay_ms<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration_to_ms(*d))
}
