//! Persisted configuration record
//!
//! A [`DeviceConfig`] stored in flash as postcard binary data behind a
//! magic/version header and a CRC32 over the serialized configuration.

use serde::{Deserialize, Serialize};

use super::types::{ConfigError, DeviceConfig};

/// Magic number identifying a configuration record
pub const RECORD_MAGIC: u32 = 0x4C55_4D4E; // "LUMN"

/// Current record format version
pub const RECORD_VERSION: u8 = 1;

/// Upper bound on an encoded record
pub const MAX_RECORD_SIZE: usize = 256;

/// Record load/store failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Storage holds erased flash
    Erased,
    /// Bytes are not a postcard record
    Decode,
    /// Output buffer too small
    Encode,
    /// Magic number mismatch
    BadMagic,
    /// Record written by another format version
    VersionMismatch(u8),
    /// CRC does not match the configuration
    Checksum,
    /// Record decoded but the configuration is unusable
    Invalid(ConfigError),
}

/// Configuration as stored in flash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub magic: u32,
    pub version: u8,
    pub config: DeviceConfig,
    /// CRC32 over the postcard encoding of `config`
    pub crc: u32,
}

impl ConfigRecord {
    /// Wrap a configuration in a fresh record
    pub fn new(config: DeviceConfig) -> Result<Self, RecordError> {
        Ok(Self {
            magic: RECORD_MAGIC,
            version: RECORD_VERSION,
            config,
            crc: config_crc(&config)?,
        })
    }

    /// Serialize into `buf`, returning the used prefix
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], RecordError> {
        postcard::to_slice(self, buf).map_err(|_| RecordError::Encode)
    }

    /// Parse and check a stored record, returning its configuration
    pub fn decode(bytes: &[u8]) -> Result<DeviceConfig, RecordError> {
        if bytes.is_empty() || bytes.iter().all(|&b| b == 0xFF) {
            return Err(RecordError::Erased);
        }

        let (record, _rest): (ConfigRecord, _) =
            postcard::take_from_bytes(bytes).map_err(|_| RecordError::Decode)?;

        if record.magic != RECORD_MAGIC {
            return Err(RecordError::BadMagic);
        }
        if record.version != RECORD_VERSION {
            return Err(RecordError::VersionMismatch(record.version));
        }
        if record.crc != config_crc(&record.config)? {
            return Err(RecordError::Checksum);
        }

        record.config.validate().map_err(RecordError::Invalid)?;
        Ok(record.config)
    }
}

fn config_crc(config: &DeviceConfig) -> Result<u32, RecordError> {
    let mut buf = [0u8; MAX_RECORD_SIZE];
    let used = postcard::to_slice(config, &mut buf).map_err(|_| RecordError::Encode)?;
    Ok(!crc32_update(0xFFFF_FFFF, used))
}

/// CRC32 update (IEEE 802.3 polynomial, reflected)
fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}
