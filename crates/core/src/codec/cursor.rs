//! Opaque cursor encoding.
//!
//! A cursor is `base64(prefix + key)`. Decoding never fails loudly: any
//! input that is not a cursor produced by the same codec decodes to `None`,
//! and the resolver then behaves as if no cursor had been supplied.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::ports::Cursor;

/// Default bound on the textual key length inside a cursor.
///
/// Wide enough for any `i64` (sign plus 19 digits) or `u64`.
pub const DEFAULT_MAX_KEY_LEN: usize = 20;

/// Key types that can be carried inside a cursor.
///
/// `from_cursor_str(to_cursor_string(k))` must return `Some(k)`.
pub trait CursorKey: Ord + Clone {
    /// Render the key as cursor text.
    fn to_cursor_string(&self) -> String;

    /// Parse cursor text back into a key.
    fn from_cursor_str(s: &str) -> Option<Self>;
}

macro_rules! integer_cursor_key {
    ($($ty:ty),*) => {
        $(
            impl CursorKey for $ty {
                fn to_cursor_string(&self) -> String {
                    self.to_string()
                }

                fn from_cursor_str(s: &str) -> Option<Self> {
                    s.parse().ok()
                }
            }
        )*
    };
}

integer_cursor_key!(i32, i64, u32, u64);

impl CursorKey for String {
    fn to_cursor_string(&self) -> String {
        self.clone()
    }

    fn from_cursor_str(s: &str) -> Option<Self> {
        Some(s.to_owned())
    }
}

/// Collection-scoped cursor codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorCodec {
    prefix: String,
    max_key_len: usize,
}

impl CursorCodec {
    /// Create a codec with the given prefix and the default key length bound.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            max_key_len: DEFAULT_MAX_KEY_LEN,
        }
    }

    /// Override the key length bound.
    pub fn with_max_key_len(mut self, max_key_len: usize) -> Self {
        self.max_key_len = max_key_len;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn max_key_len(&self) -> usize {
        self.max_key_len
    }

    /// Whether `key` round-trips through this codec.
    pub fn fits<K: CursorKey>(&self, key: &K) -> bool {
        key.to_cursor_string().len() <= self.max_key_len
    }

    /// Encode a key into an opaque cursor.
    pub fn encode<K: CursorKey>(&self, key: &K) -> Cursor {
        let raw = format!("{}{}", self.prefix, key.to_cursor_string());
        Cursor::new(STANDARD.encode(raw))
    }

    /// Decode a cursor back into a key.
    ///
    /// Returns `None` for bad base64, non UTF-8 payloads, a foreign prefix,
    /// an oversize key or a key that does not parse. Empty key text is left
    /// to [`CursorKey::from_cursor_str`], so `decode` accepts exactly what
    /// [`fits`](Self::fits) accepts.
    pub fn decode<K: CursorKey>(&self, cursor: &str) -> Option<K> {
        // Reject oversize input before allocating for it.
        if cursor.len() > self.max_encoded_len() {
            return None;
        }

        let bytes = STANDARD.decode(cursor).ok()?;
        let text = String::from_utf8(bytes).ok()?;
        let key = text.strip_prefix(self.prefix.as_str())?;

        if key.len() > self.max_key_len {
            return None;
        }

        K::from_cursor_str(key)
    }

    /// The decoded key of `cursor`, or `default` when it is absent or invalid.
    pub fn resolve_offset<K: CursorKey>(&self, cursor: Option<&str>, default: K) -> K {
        cursor
            .and_then(|c| self.decode(c))
            .unwrap_or(default)
    }

    fn max_encoded_len(&self) -> usize {
        (self.prefix.len() + self.max_key_len).div_ceil(3) * 4
    }
}
