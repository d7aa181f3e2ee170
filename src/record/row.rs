use std::fmt;

use super::error::{TableError, TableResult};

/// Maximum byte width of the username column
pub const USERNAME_SIZE: usize = 32;

/// Maximum byte width of the email column
pub const EMAIL_SIZE: usize = 255;

const ID_SIZE: usize = 4;
const ID_OFFSET: usize = 0;
const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_SIZE;

/// Serialized width of one row: id, then the two text columns, each in a
/// statically reserved byte range
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SIZE + EMAIL_SIZE;

/// A single fixed-schema row. Construction validates the text columns
/// against their widths, so a `Row` always fits its serialized slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: u32,
    username: String,
    email: String,
}

impl Row {
    /// Create a row, validating both text columns against their byte widths
    pub fn new(
        id: u32,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> TableResult<Self> {
        let username = username.into();
        let email = email.into();

        if username.len() > USERNAME_SIZE {
            return Err(TableError::ValueTooLong {
                column: "username",
                len: username.len(),
                max: USERNAME_SIZE,
            });
        }
        if email.len() > EMAIL_SIZE {
            return Err(TableError::ValueTooLong {
                column: "email",
                len: email.len(),
                max: EMAIL_SIZE,
            });
        }

        Ok(Self {
            id,
            username,
            email,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Serialize into a ROW_SIZE slot: little-endian id, then each text
    /// column zero-padded to its full width. No length or type tags.
    pub(crate) fn serialize_into(&self, slot: &mut [u8]) {
        slot[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        write_padded(
            &mut slot[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE],
            &self.username,
        );
        write_padded(&mut slot[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE], &self.email);
    }

    /// Inverse of `serialize_into`: read the same byte ranges back
    pub(crate) fn deserialize(slot: &[u8]) -> TableResult<Self> {
        if slot.len() != ROW_SIZE {
            return Err(TableError::Deserialization(format!(
                "Expected {} bytes, got {}",
                ROW_SIZE,
                slot.len()
            )));
        }

        let mut id_bytes = [0u8; ID_SIZE];
        id_bytes.copy_from_slice(&slot[ID_OFFSET..ID_OFFSET + ID_SIZE]);
        let id = u32::from_le_bytes(id_bytes);

        let username = read_padded(
            &slot[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE],
            "username",
        )?;
        let email = read_padded(&slot[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE], "email")?;

        Ok(Self {
            id,
            username,
            email,
        })
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

fn write_padded(dst: &mut [u8], value: &str) {
    let bytes = value.as_bytes();
    dst[..bytes.len()].copy_from_slice(bytes);
    dst[bytes.len()..].fill(0);
}

fn read_padded(src: &[u8], column: &'static str) -> TableResult<String> {
    // The column width is reproduced exactly on disk; the string ends at the
    // first null byte (or fills the whole slot)
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8(src[..end].to_vec())
        .map_err(|e| TableError::Deserialization(format!("Invalid UTF-8 in {}: {}", column, e)))
}
