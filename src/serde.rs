//! Serialization helpers for decoded SCTE-35 values.

use data_encoding::BASE64;
use serde::Serializer;

/// Serializes raw bytes as a standard base64 string.
pub(crate) fn as_base64<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&BASE64.encode(bytes.as_ref()))
}

/// Serializes a descriptor identifier as text when it is printable, e.g. `"CUEI"`.
pub(crate) fn as_identifier<S>(identifier: &u32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&crate::fmt::format_identifier(*identifier))
}
