// Purpose: voice state machines and the identifier-keyed voice pool.
// This layer knows nothing about threads; `engine` wraps it in the shared lock.

pub mod message;
pub mod params;
pub mod pool;
pub mod voice;

/// Identifier of one physical input key. Unique per key; the pool holds at
/// most one voice per identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub u32);

impl From<char> for KeyId {
    /// Keys named by a character use its lowercase code point.
    fn from(c: char) -> Self {
        KeyId(c.to_ascii_lowercase() as u32)
    }
}
