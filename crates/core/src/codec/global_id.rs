//! Globally unique object identifiers.
//!
//! A global ID is `base64("{kind}:{id}")`, so a single `node(id:)` lookup
//! can route to the right collection.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Build the global ID of an object of `kind` with local `id`.
pub fn encode_global_id(kind: &str, id: &str) -> String {
    STANDARD.encode(format!("{}:{}", kind, id))
}

/// Split a global ID into `(kind, id)`.
///
/// The kind ends at the first `:`; the local id may contain further colons.
/// Anything that is not a well-formed global ID yields `None`.
pub fn decode_global_id(global_id: &str) -> Option<(String, String)> {
    let bytes = STANDARD.decode(global_id).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let (kind, id) = text.split_once(':')?;

    if kind.is_empty() {
        return None;
    }

    Some((kind.to_owned(), id.to_owned()))
}
