use bincode::{decode_from_slice, encode_to_vec};

use crate::{
    compress::CompressionType,
    diff::{Change, ChangeSet},
    err::{Error, Result},
    util::create_bincode_config,
};

/// Encodes a change set as a JSON array of
/// `{"Field", "ChangeType", "OldValue", "NewValue"}` objects.
pub fn serialize(changes: &[Change]) -> Result<Vec<u8>> {
    serde_json::to_vec(changes).map_err(Error::format)
}

/// Decodes the output of [`serialize`]. Unknown change-type tags are rejected.
pub fn deserialize(bytes: &[u8]) -> Result<ChangeSet> {
    serde_json::from_slice(bytes).map_err(Error::format)
}

/// Compact binary encoding of a change set.
pub fn encode_compact(changes: &[Change]) -> Result<Vec<u8>> {
    encode_to_vec(changes, create_bincode_config()).map_err(Error::format)
}

pub fn decode_compact(bytes: &[u8]) -> Result<ChangeSet> {
    let (changes, read): (ChangeSet, usize) =
        decode_from_slice(bytes, create_bincode_config()).map_err(Error::format)?;
    if read != bytes.len() {
        return Err(Error::Format(format!(
            "{} trailing bytes",
            bytes.len() - read
        )));
    }
    Ok(changes)
}

/// Wire format of the payload inside a change-set file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Encoding {
    /// JSON array, readable and portable
    Json,
    /// bincode
    Compact,
}

impl Encoding {
    pub fn to_magic(&self) -> u8 {
        match self {
            Encoding::Json => 1,
            Encoding::Compact => 2,
        }
    }
    pub fn from_magic(magic: u8) -> Result<Self> {
        match magic {
            1 => Ok(Encoding::Json),
            2 => Ok(Encoding::Compact),
            _ => Err(Error::Format(format!("unsupported encoding magic {}", magic))),
        }
    }
    pub fn encode(&self, changes: &[Change]) -> Result<Vec<u8>> {
        match self {
            Encoding::Json => serialize(changes),
            Encoding::Compact => encode_compact(changes),
        }
    }
    pub fn decode(&self, bytes: &[u8]) -> Result<ChangeSet> {
        match self {
            Encoding::Json => deserialize(bytes),
            Encoding::Compact => decode_compact(bytes),
        }
    }
}

/// Layout of a change-set file: compression magic, encoding magic, then the
/// compressed payload.
pub fn to_file_bytes(
    changes: &[Change],
    encoding: Encoding,
    compression: CompressionType,
) -> Result<Vec<u8>> {
    let payload = encoding.encode(changes)?;
    let mut bytes = vec![compression.to_magic(), encoding.to_magic()];
    bytes.extend(compression.compress_all(payload)?);
    Ok(bytes)
}

pub fn from_file_bytes(bytes: &[u8]) -> Result<ChangeSet> {
    let [compression, encoding, payload @ ..] = bytes else {
        return Err(Error::Format("missing change-set header".to_string()));
    };
    let compression = CompressionType::from_magic(*compression)?;
    let encoding = Encoding::from_magic(*encoding)?;
    log::debug!("reading {:?} change set compressed with {}", encoding, compression);
    let payload = compression.decompress_all(payload)?;
    encoding.decode(&payload)
}
