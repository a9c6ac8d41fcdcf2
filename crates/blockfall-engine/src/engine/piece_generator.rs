use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Supplies the type of each newly spawned piece.
///
/// The random source draws every piece independently and uniformly over the
/// seven kinds, so repeats and droughts are possible. The sequence source
/// cycles through a fixed list, which is useful for replays and puzzles.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceGenerator, PieceKind};
///
/// let mut generator = PieceGenerator::from_sequence([PieceKind::T, PieceKind::I]);
/// assert_eq!(generator.next_kind(), PieceKind::T);
/// assert_eq!(generator.next_kind(), PieceKind::I);
/// assert_eq!(generator.next_kind(), PieceKind::T);
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    Random(Pcg32),
    Sequence { kinds: Vec<PieceKind>, next: usize },
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a random generator with a fresh seed.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            source: Source::Random(Pcg32::from_seed(seed.0)),
        }
    }

    /// Creates a generator that repeats `kinds` in order.
    ///
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    #[must_use]
    pub fn from_sequence<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "piece sequence must not be empty");
        Self {
            source: Source::Sequence { kinds, next: 0 },
        }
    }

    /// Draws the next piece type.
    pub fn next_kind(&mut self) -> PieceKind {
        match &mut self.source {
            Source::Random(rng) => rng.random(),
            Source::Sequence { kinds, next } => {
                let kind = kinds[*next];
                *next = (*next + 1) % kinds.len();
                kind
            }
        }
    }
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit seed for the piece generator's RNG. The same seed yields
/// the same piece sequence, enabling reproducible sessions and tests.
///
/// The seed is written as a 32-character hex string, both by [`fmt::Display`]
/// and by serde, and parsed back with [`FromStr`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceGenerator, PieceSeed};
///
/// let seed: PieceSeed = "0123456789abcdeffedcba9876543210".parse().unwrap();
/// let mut first = PieceGenerator::with_seed(seed);
/// let mut second = PieceGenerator::with_seed(seed);
///
/// for _ in 0..10 {
///     assert_eq!(first.next_kind(), second.next_kind());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex characters")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(error());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| error())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
