//! Object types, canonical encoding, and content hashing.

use crate::{OdbError, Result};
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha1::{Digest, Sha1};
use std::fmt;

/// A 20-byte SHA-1 object identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId([u8; 20]);

impl Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl ObjectId {
    /// Creates an ObjectId from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an ObjectId from a 40-character lowercase hex string.
    ///
    /// Uppercase digits are rejected; lookups are case-sensitive.
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != 40 {
            return Err(OdbError::MalformedHeader(format!(
                "invalid object id length: {}",
                hex.len()
            )));
        }
        if hex.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(OdbError::MalformedHeader(format!(
                "object id must be lowercase hex: {hex}"
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex, &mut bytes)
            .map_err(|e| OdbError::MalformedHeader(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Computes the SHA-1 of a payload prefixed with its object header.
    ///
    /// The digest covers `"<kind> <size>\0"` followed by the payload, the
    /// same byte stream [`Object::encode`] produces, so identifiers are
    /// portable to any tool that hashes loose objects this way.
    pub fn hash_object(kind: ObjectKind, data: &[u8]) -> Self {
        let header = format!("{} {}\0", kind.as_str(), data.len());
        let mut hasher = Sha1::new();
        hasher.update(header.as_bytes());
        hasher.update(data);
        let result = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&result);
        Self(bytes)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Object kinds recognized by the database.
///
/// Only blobs are implemented. The `tree` and `commit` tags are reserved:
/// adding a variant here extends the codec without changing the encoding
/// of existing objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Opaque file content.
    Blob,
}

impl ObjectKind {
    /// Returns the tag written into the object header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
        }
    }

    /// Parses a kind tag from a header.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(Self::Blob),
            _ => Err(OdbError::UnsupportedType(s.to_string())),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An object: a kind tag plus an opaque payload, named by content.
#[derive(Debug, Clone)]
pub struct Object {
    /// The object's identifier, the SHA-1 of its encoded form.
    pub id: ObjectId,
    /// The kind tag recorded in the header.
    pub kind: ObjectKind,
    /// The raw payload (uncompressed, header stripped).
    pub data: Bytes,
}

impl Object {
    /// Creates a new object, computing its ID from the payload.
    pub fn new(kind: ObjectKind, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let id = ObjectId::hash_object(kind, &data);
        Self { id, kind, data }
    }

    /// Creates a blob object.
    pub fn blob(content: impl Into<Bytes>) -> Self {
        Self::new(ObjectKind::Blob, content)
    }

    /// Returns the payload length in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Serializes the object into its canonical byte form:
    /// `"<kind> <size>\0"` followed by the payload.
    pub fn encode(&self) -> Vec<u8> {
        let header = format!("{} {}\0", self.kind.as_str(), self.data.len());
        let mut out = Vec::with_capacity(header.len() + self.data.len());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&self.data);
        out
    }

    /// Parses an object from its canonical byte form.
    ///
    /// The size declared in the header must match the actual payload
    /// length; a disagreement is reported as [`OdbError::SizeMismatch`]
    /// rather than trusted.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let null_pos = bytes
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| OdbError::MalformedHeader("missing NUL terminator".to_string()))?;

        let header = std::str::from_utf8(&bytes[..null_pos])
            .map_err(|_| OdbError::MalformedHeader("header is not valid UTF-8".to_string()))?;

        let (kind, size) = header
            .split_once(' ')
            .ok_or_else(|| OdbError::MalformedHeader(format!("missing space in: {header:?}")))?;
        let kind = ObjectKind::parse(kind)?;

        if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OdbError::MalformedHeader(format!(
                "invalid size field: {size:?}"
            )));
        }
        let declared: usize = size
            .parse()
            .map_err(|_| OdbError::MalformedHeader(format!("size out of range: {size:?}")))?;

        let payload = &bytes[null_pos + 1..];
        if payload.len() != declared {
            return Err(OdbError::SizeMismatch {
                declared,
                actual: payload.len(),
            });
        }

        Ok(Self::new(kind, payload.to_vec()))
    }
}
