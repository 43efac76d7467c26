//! Packed container, base64 envelope, and envelope files.
//!
//! A packed container is a sequence of entries with no separators:
//!
//! ```text
//! [tag = 4: 1 byte][length: 4 bytes LE][payload: length bytes] ...
//! ```
//!
//! - **Tag**: the width of the length field; only `4` is defined.
//! - **Length**: little-endian u32 byte count of the payload.
//! - **Payload**: raw bytes, possibly empty.
//!
//! The envelope is the base64 text of a container holding exactly
//! `[cipher, iv, salt]`.  It is the only thing Secretary ever persists.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::crypto::{IV_LEN, SALT_LEN, TAG_LEN};
use crate::errors::{SecretaryError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Tag byte announcing a 4-byte length field.
const LENGTH_TAG: u8 = 4;

/// Width of the length field in bytes.
const LENGTH_FIELD_LEN: usize = 4;

/// Fixed-size entry prefix: 1 (tag) + 4 (length).
const ENTRY_PREFIX_LEN: usize = 1 + LENGTH_FIELD_LEN;

/// Number of entries in a vault envelope.
const ENVELOPE_ENTRIES: usize = 3;

// ---------------------------------------------------------------------------
// Packed container
// ---------------------------------------------------------------------------

/// Pack an ordered list of buffers into one container.
pub fn pack<B: AsRef<[u8]>>(buffers: &[B]) -> Result<Vec<u8>> {
    let total = buffers
        .iter()
        .map(|b| ENTRY_PREFIX_LEN + b.as_ref().len())
        .sum();
    let mut out = Vec::with_capacity(total);

    for buffer in buffers {
        let data = buffer.as_ref();
        let len = u32::try_from(data.len()).map_err(|_| {
            SecretaryError::InvalidParameter(format!(
                "buffer of {} bytes exceeds the u32 length field",
                data.len()
            ))
        })?;
        out.push(LENGTH_TAG); // 1 byte
        out.extend_from_slice(&len.to_le_bytes()); // 4 bytes LE
        out.extend_from_slice(data);
    }

    Ok(out)
}

/// Unpack a container produced by `pack`.
///
/// Every read is bounds-checked: a truncated prefix, an unknown tag or
/// a length that runs past the end of `data` is an `InvalidEnvelope`.
pub fn unpack(data: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut entries = Vec::new();
    let mut cursor = 0;

    while cursor < data.len() {
        let prefix = data
            .get(cursor..cursor + ENTRY_PREFIX_LEN)
            .ok_or_else(|| {
                SecretaryError::InvalidEnvelope(format!(
                    "truncated entry header at offset {cursor}"
                ))
            })?;

        let tag = prefix[0];
        if tag != LENGTH_TAG {
            return Err(SecretaryError::InvalidEnvelope(format!(
                "unsupported length tag {tag} at offset {cursor}, expected {LENGTH_TAG}"
            )));
        }

        let mut len_bytes = [0u8; LENGTH_FIELD_LEN];
        len_bytes.copy_from_slice(&prefix[1..]);
        let len = usize::try_from(u32::from_le_bytes(len_bytes)).map_err(|_| {
            SecretaryError::InvalidEnvelope("entry length exceeds platform address space".into())
        })?;

        let start = cursor + ENTRY_PREFIX_LEN;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                SecretaryError::InvalidEnvelope(format!(
                    "entry at offset {cursor} claims {len} bytes but only {} remain",
                    data.len() - start
                ))
            })?;

        entries.push(data[start..end].to_vec());
        cursor = end;
    }

    Ok(entries)
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The three parts of a decoded envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeParts {
    pub cipher: Vec<u8>,
    pub iv: [u8; IV_LEN],
    pub salt: [u8; SALT_LEN],
}

/// Pack `(cipher, iv, salt)` and encode it as base64.
pub fn encode_envelope(cipher: &[u8], iv: &[u8; IV_LEN], salt: &[u8; SALT_LEN]) -> Result<String> {
    let packed = pack(&[cipher, &iv[..], &salt[..]])?;
    Ok(BASE64.encode(packed))
}

/// Decode a base64 envelope back into `(cipher, iv, salt)`.
///
/// Surrounding whitespace is ignored so envelopes read from files or
/// pasted from a terminal decode cleanly.
pub fn decode_envelope(envelope: &str) -> Result<EnvelopeParts> {
    let raw = BASE64
        .decode(envelope.trim())
        .map_err(|e| SecretaryError::InvalidEnvelope(format!("base64: {e}")))?;

    let entries = unpack(&raw)?;
    let [cipher, iv, salt]: [Vec<u8>; ENVELOPE_ENTRIES] =
        entries.try_into().map_err(|entries: Vec<Vec<u8>>| {
            SecretaryError::InvalidEnvelope(format!(
                "expected {ENVELOPE_ENTRIES} entries (cipher, iv, salt), found {}",
                entries.len()
            ))
        })?;

    if cipher.len() <= TAG_LEN {
        return Err(SecretaryError::InvalidEnvelope(format!(
            "cipher of {} bytes is too short to hold a seed",
            cipher.len()
        )));
    }
    let iv: [u8; IV_LEN] = iv.try_into().map_err(|iv: Vec<u8>| {
        SecretaryError::InvalidEnvelope(format!("iv must be {IV_LEN} bytes, got {}", iv.len()))
    })?;
    let salt: [u8; SALT_LEN] = salt.try_into().map_err(|salt: Vec<u8>| {
        SecretaryError::InvalidEnvelope(format!(
            "salt must be {SALT_LEN} bytes, got {}",
            salt.len()
        ))
    })?;

    Ok(EnvelopeParts { cipher, iv, salt })
}

// ---------------------------------------------------------------------------
// Envelope files
// ---------------------------------------------------------------------------

/// Write an envelope to disk **atomically**.
///
/// The text goes to a temp file in the same directory, which is then
/// renamed over the target so readers never see a half-written file.
pub fn write_envelope(path: &Path, envelope: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, format!("{envelope}\n"))?;

    // On Unix, restrict permissions to owner-only read/write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Read an envelope file, trimming the trailing newline.
pub fn read_envelope(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(SecretaryError::VaultNotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?.trim().to_string())
}

// ---------------------------------------------------------------------------
// Compression
// ---------------------------------------------------------------------------

/// Compress `data` with raw DEFLATE (no zlib or gzip framing).
#[cfg(feature = "compress")]
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::write::DeflateEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflate raw DEFLATE data produced by `compress`.
#[cfg(feature = "compress")]
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::DeflateDecoder;
    use std::io::Read;

    let mut out = Vec::new();
    DeflateDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| SecretaryError::InvalidEnvelope(format!("deflate: {e}")))?;
    Ok(out)
}
