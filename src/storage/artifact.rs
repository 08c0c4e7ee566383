//! Binary envelope for persisted model state.
//!
//! Every artifact is a fixed little-endian header followed by a bincode
//! payload:
//!
//! ```text
//! offset size field
//!      0    4 magic "MCAT"
//!      4    2 format version
//!      6    1 artifact kind
//!      7   16 training run id (UUID)
//!     23    8 created_at (Unix milliseconds, i64)
//!     31    8 payload length
//!     39    4 CRC32 of the payload
//!     43    - payload
//! ```
//!
//! Decoding validates the header before touching the payload, so a
//! truncated, tampered or mislabeled blob fails with a typed error rather
//! than producing a half-initialized model.

use std::fmt;
use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CategorizerError, Result};

/// Leading bytes of every artifact.
pub const MAGIC: &[u8; 4] = b"MCAT";

/// Envelope format version written by this build.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 4 + 2 + 1 + 16 + 8 + 8 + 4;

/// What an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ArtifactKind {
    /// A fitted [`TfIdfVectorizer`](crate::ml::TfIdfVectorizer).
    Vectorizer = 1,
    /// A fitted [`LinearSvc`](crate::ml::LinearSvc).
    Classifier = 2,
}

impl ArtifactKind {
    fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(ArtifactKind::Vectorizer),
            2 => Some(ArtifactKind::Classifier),
            _ => None,
        }
    }

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Vectorizer => "vectorizer",
            ArtifactKind::Classifier => "classifier",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Provenance stored in every artifact header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Training run that produced the artifact.
    pub run_id: Uuid,
    /// Creation time, millisecond precision.
    pub created_at: DateTime<Utc>,
}

impl ArtifactMetadata {
    /// Metadata for a new run: random id, current time.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4())
    }

    /// Metadata for an existing run id, stamped now.
    pub fn new(run_id: Uuid) -> Self {
        let now = Utc::now();
        // Truncate to what the header can hold.
        let created_at = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
        ArtifactMetadata { run_id, created_at }
    }
}

/// Wrap `value` in an artifact envelope.
pub fn encode<T: Serialize>(
    kind: ArtifactKind,
    metadata: &ArtifactMetadata,
    value: &T,
) -> Result<Vec<u8>> {
    let payload = bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| CategorizerError::serialization(format!("failed to encode {kind}: {e}")))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.write_u16::<LittleEndian>(FORMAT_VERSION)?;
    bytes.write_u8(kind as u8)?;
    bytes.extend_from_slice(metadata.run_id.as_bytes());
    bytes.write_i64::<LittleEndian>(metadata.created_at.timestamp_millis())?;
    bytes.write_u64::<LittleEndian>(payload.len() as u64)?;
    bytes.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
    bytes.extend_from_slice(&payload);

    Ok(bytes)
}

/// Validate the envelope and decode the payload as `T`.
pub fn decode<T: DeserializeOwned>(
    expected: ArtifactKind,
    bytes: &[u8],
) -> Result<(ArtifactMetadata, T)> {
    let header = read_header(bytes)?;

    if header.kind != expected {
        return Err(CategorizerError::corrupt(format!(
            "expected a {expected} artifact, found a {} artifact",
            header.kind
        )));
    }

    let payload = &bytes[HEADER_LEN..];
    if payload.len() as u64 != header.payload_len {
        return Err(CategorizerError::corrupt(format!(
            "payload length is {} bytes, header says {}",
            payload.len(),
            header.payload_len
        )));
    }
    let checksum = crc32fast::hash(payload);
    if checksum != header.checksum {
        return Err(CategorizerError::corrupt(format!(
            "checksum mismatch: computed {checksum:08x}, stored {:08x}",
            header.checksum
        )));
    }

    let (value, consumed) =
        bincode::serde::decode_from_slice::<T, _>(payload, bincode::config::standard()).map_err(
            |e| CategorizerError::corrupt(format!("failed to decode {expected} payload: {e}")),
        )?;
    if consumed != payload.len() {
        return Err(CategorizerError::corrupt(format!(
            "{} trailing bytes after {expected} payload",
            payload.len() - consumed
        )));
    }

    Ok((header.metadata, value))
}

/// Read only the header fields.
pub fn peek_metadata(bytes: &[u8]) -> Result<(ArtifactKind, ArtifactMetadata)> {
    let header = read_header(bytes)?;
    Ok((header.kind, header.metadata))
}

struct Header {
    kind: ArtifactKind,
    metadata: ArtifactMetadata,
    payload_len: u64,
    checksum: u32,
}

fn read_header(bytes: &[u8]) -> Result<Header> {
    if bytes.len() < HEADER_LEN {
        return Err(CategorizerError::corrupt(format!(
            "artifact is {} bytes, shorter than the {HEADER_LEN} byte header",
            bytes.len()
        )));
    }

    let truncated = |e: std::io::Error| CategorizerError::corrupt(format!("bad header: {e}"));
    let mut cursor = Cursor::new(bytes);

    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic).map_err(truncated)?;
    if &magic != MAGIC {
        return Err(CategorizerError::corrupt("bad magic bytes"));
    }

    let version = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
    if version != FORMAT_VERSION {
        return Err(CategorizerError::VersionMismatch {
            expected: FORMAT_VERSION,
            found: version,
        });
    }

    let kind_byte = cursor.read_u8().map_err(truncated)?;
    let kind = ArtifactKind::from_u8(kind_byte)
        .ok_or_else(|| CategorizerError::corrupt(format!("unknown artifact kind {kind_byte}")))?;

    let mut run_id = [0u8; 16];
    cursor.read_exact(&mut run_id).map_err(truncated)?;
    let millis = cursor.read_i64::<LittleEndian>().map_err(truncated)?;
    let created_at = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| CategorizerError::corrupt(format!("timestamp {millis} out of range")))?;
    let payload_len = cursor.read_u64::<LittleEndian>().map_err(truncated)?;
    let checksum = cursor.read_u32::<LittleEndian>().map_err(truncated)?;

    Ok(Header {
        kind,
        metadata: ArtifactMetadata {
            run_id: Uuid::from_bytes(run_id),
            created_at,
        },
        payload_len,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        terms: Vec<String>,
        weights: Vec<f64>,
    }

    fn payload() -> Payload {
        Payload {
            terms: vec!["parcel".into(), "refund".into()],
            weights: vec![1.5, -0.25],
        }
    }

    #[test]
    fn test_header_layout() {
        let metadata = ArtifactMetadata::generate();
        let bytes = encode(ArtifactKind::Classifier, &metadata, &payload()).unwrap();

        assert_eq!(&bytes[..4], MAGIC);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), FORMAT_VERSION);
        assert_eq!(bytes[6], ArtifactKind::Classifier as u8);
        assert_eq!(&bytes[7..23], metadata.run_id.as_bytes());

        let (kind, peeked) = peek_metadata(&bytes).unwrap();
        assert_eq!(kind, ArtifactKind::Classifier);
        assert_eq!(peeked, metadata);
    }

    #[test]
    fn test_decode_restores_value_and_metadata() {
        let metadata = ArtifactMetadata::generate();
        let bytes = encode(ArtifactKind::Vectorizer, &metadata, &payload()).unwrap();

        let (decoded_meta, decoded): (ArtifactMetadata, Payload) =
            decode(ArtifactKind::Vectorizer, &bytes).unwrap();
        assert_eq!(decoded, payload());
        assert_eq!(decoded_meta, metadata);
    }

    #[test]
    fn test_wrong_kind() {
        let bytes = encode(
            ArtifactKind::Vectorizer,
            &ArtifactMetadata::generate(),
            &payload(),
        )
        .unwrap();
        let result = decode::<Payload>(ArtifactKind::Classifier, &bytes);
        assert!(matches!(result, Err(CategorizerError::CorruptArtifact(_))));
    }

    #[test]
    fn test_corruption_is_detected() {
        let bytes = encode(
            ArtifactKind::Vectorizer,
            &ArtifactMetadata::generate(),
            &payload(),
        )
        .unwrap();

        let mut flipped = bytes.clone();
        let last = flipped.len() - 1;
        flipped[last] ^= 0xff;
        assert!(matches!(
            decode::<Payload>(ArtifactKind::Vectorizer, &flipped),
            Err(CategorizerError::CorruptArtifact(_))
        ));

        let truncated = &bytes[..bytes.len() - 3];
        assert!(matches!(
            decode::<Payload>(ArtifactKind::Vectorizer, truncated),
            Err(CategorizerError::CorruptArtifact(_))
        ));

        assert!(matches!(
            decode::<Payload>(ArtifactKind::Vectorizer, &bytes[..10]),
            Err(CategorizerError::CorruptArtifact(_))
        ));

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(matches!(
            decode::<Payload>(ArtifactKind::Vectorizer, &bad_magic),
            Err(CategorizerError::CorruptArtifact(_))
        ));

        let mut bad_kind = bytes;
        bad_kind[6] = 9;
        assert!(matches!(
            decode::<Payload>(ArtifactKind::Vectorizer, &bad_kind),
            Err(CategorizerError::CorruptArtifact(_))
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let mut bytes = encode(
            ArtifactKind::Vectorizer,
            &ArtifactMetadata::generate(),
            &payload(),
        )
        .unwrap();
        bytes[4..6].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());

        match decode::<Payload>(ArtifactKind::Vectorizer, &bytes) {
            Err(CategorizerError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, FORMAT_VERSION);
                assert_eq!(found, FORMAT_VERSION + 1);
            }
            other => panic!("expected version mismatch, got {other:?}"),
        }
    }
}
