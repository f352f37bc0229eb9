// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed-size identity of a nested compute context.
use blake3::Hasher;

/// 128-bit hash that identifies an entire compute-context path.
///
/// A context path can be arbitrarily long (modifier → node group → repeat zone
/// iteration → nested group → ...), but its identity is always this fixed-size
/// value. That makes it cheap to store next to every logged value and cheap to
/// compare.
///
/// # Invariants
/// - Equality is exact equality of `(v1, v2)`.
/// - The default value `(0, 0)` is the starting point of every root context.
/// - [`mix_in`](Self::mix_in) is deterministic across processes and platforms:
///   both halves are serialized little-endian and no address- or time-dependent
///   state is involved.
///
/// Collisions are practically impossible for the number of contexts a single
/// evaluation creates, but they are not detected; consumers keyed by this type
/// silently merge colliding entries.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComputeContextHash {
    /// Low 64 bits. Also the bucket key when used in hash maps.
    pub v1: u64,
    /// High 64 bits.
    pub v2: u64,
}

impl ComputeContextHash {
    /// Identity of "no parent". Equal to [`Default::default`].
    pub const ZERO: Self = Self { v1: 0, v2: 0 };

    /// Builds an identity from its raw halves.
    #[must_use]
    pub const fn from_parts(v1: u64, v2: u64) -> Self {
        Self { v1, v2 }
    }

    /// Returns `true` for the all-zero identity.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.v1 == 0 && self.v2 == 0
    }

    /// Narrowed 64-bit hash used as a bucket key.
    ///
    /// Unequal identities may share this value; full equality on both halves
    /// disambiguates them.
    #[must_use]
    pub const fn hash(&self) -> u64 {
        self.v1
    }

    /// Canonical little-endian byte form (`v1 || v2`).
    #[must_use]
    pub fn to_le_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.v1.to_le_bytes());
        out[8..].copy_from_slice(&self.v2.to_le_bytes());
        out
    }

    /// Inverse of [`to_le_bytes`](Self::to_le_bytes).
    #[must_use]
    pub fn from_le_bytes(bytes: [u8; 16]) -> Self {
        let mut lo = [0u8; 8];
        let mut hi = [0u8; 8];
        lo.copy_from_slice(&bytes[..8]);
        hi.copy_from_slice(&bytes[8..]);
        Self {
            v1: u64::from_le_bytes(lo),
            v2: u64::from_le_bytes(hi),
        }
    }

    /// Folds `data` into this identity.
    ///
    /// The new value is the first 128 bits of `BLAKE3(v1_le || v2_le || data)`.
    /// Every call is a separate hash round, so mixing `a` then `b` differs from
    /// mixing `a || b` and from mixing `b` then `a`.
    pub fn mix_in(&mut self, data: &[u8]) {
        let mut hasher = Hasher::new();
        hasher.update(&self.to_le_bytes());
        hasher.update(data);
        let mut out = [0u8; 16];
        hasher.finalize_xof().fill(&mut out);
        *self = Self::from_le_bytes(out);
    }

    /// Mixes in a `u32` (little-endian).
    ///
    /// The typed helpers mix raw little-endian bytes with no type tag, so
    /// `mix_in_u32(7)` and `mix_in_i32(7)` yield the same identity. Variants
    /// are kept apart by the static type label mixed ahead of their fields.
    pub fn mix_in_u32(&mut self, value: u32) {
        self.mix_in(&value.to_le_bytes());
    }

    /// Mixes in an `i32` (little-endian).
    pub fn mix_in_i32(&mut self, value: i32) {
        self.mix_in(&value.to_le_bytes());
    }

    /// Mixes in a `u64` (little-endian).
    pub fn mix_in_u64(&mut self, value: u64) {
        self.mix_in(&value.to_le_bytes());
    }

    /// Mixes in the UTF-8 bytes of `value`.
    pub fn mix_in_str(&mut self, value: &str) {
        self.mix_in(value.as_bytes());
    }

    /// Returns a copy of `self` with `data` mixed in.
    #[must_use]
    pub fn mixed(mut self, data: &[u8]) -> Self {
        self.mix_in(data);
        self
    }
}

// Only `v1` feeds the hasher. Equal identities have equal `v1`, so this stays
// consistent with `Eq`.
impl std::hash::Hash for ComputeContextHash {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.v1);
    }
}

impl std::fmt::Display for ComputeContextHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.v1, self.v2)
    }
}
