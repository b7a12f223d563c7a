//! Deterministic keystream for password derivation.
//!
//! A 64-byte seed is computed as SHA-512 over a domain tag and the
//! length-prefixed `(name, mnemonic, secret)` triple, then strengthened
//! by `rounds` iterations of double SHA-512 to slow down guessing.  The
//! stream itself is `HMAC-SHA512(seed, counter)` for counter = 0, 1, ...
//!
//! The same triple and round count always produce the same stream; a
//! change to any input produces an unrelated one.

use hmac::{Hmac, Mac};
use sha2::digest::generic_array::GenericArray;
use sha2::{Digest, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// SHA-512 digest length.
pub const HASH_LEN: usize = 64;

/// Default number of strengthening rounds.
pub const DEFAULT_ROUNDS: u32 = 10_000;

const DOMAIN: &[u8] = b"strongpass-keystream-v1";

/// Compute the strengthened seed for a derivation request.
pub fn derive_seed(
    name: &str,
    mnemonic: &str,
    secret: &[u8],
    rounds: u32,
) -> Zeroizing<[u8; HASH_LEN]> {
    let mut hasher = Sha512::new();
    hasher.update(DOMAIN);
    for part in [name.as_bytes(), mnemonic.as_bytes(), secret] {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }

    // Digests are written straight into the zeroizing buffers so no
    // intermediate copy is left behind.
    let mut seed = Zeroizing::new([0u8; HASH_LEN]);
    hasher.finalize_into(GenericArray::from_mut_slice(&mut seed[..]));

    let mut scratch = Zeroizing::new([0u8; HASH_LEN]);
    for _ in 0..rounds {
        Sha512::new_with_prefix(&seed[..])
            .finalize_into(GenericArray::from_mut_slice(&mut scratch[..]));
        Sha512::new_with_prefix(&scratch[..])
            .finalize_into(GenericArray::from_mut_slice(&mut seed[..]));
    }

    seed
}

/// An endless, deterministic byte stream keyed by a seed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Keystream {
    seed: [u8; HASH_LEN],
    block: [u8; HASH_LEN],
    pos: usize,
    counter: u64,
}

impl Keystream {
    pub fn new(seed: &[u8; HASH_LEN]) -> Self {
        let mut stream = Self {
            seed: *seed,
            block: [0u8; HASH_LEN],
            pos: HASH_LEN,
            counter: 0,
        };
        stream.refill();
        stream
    }

    /// Derive the seed for `(name, mnemonic, secret)` and start a stream on it.
    pub fn derive(name: &str, mnemonic: &str, secret: &[u8], rounds: u32) -> Self {
        let seed = derive_seed(name, mnemonic, secret, rounds);
        Self::new(&seed)
    }

    fn refill(&mut self) {
        // HMAC accepts keys of any length, so this cannot fail.
        let mut mac = Hmac::<Sha512>::new_from_slice(&self.seed)
            .unwrap_or_else(|_| unreachable!("HMAC takes keys of any size"));
        mac.update(&self.counter.to_le_bytes());
        let mut out = mac.finalize().into_bytes();
        self.block.copy_from_slice(&out);
        out.as_mut_slice().zeroize();
        self.counter += 1;
        self.pos = 0;
    }

    pub fn next_byte(&mut self) -> u8 {
        if self.pos >= HASH_LEN {
            self.refill();
        }
        let b = self.block[self.pos];
        self.pos += 1;
        b
    }

    /// A uniformly distributed index in `0..n`.
    ///
    /// Uses rejection sampling: draws that would bias the result toward
    /// small values are discarded and redrawn.
    pub fn next_below(&mut self, n: usize) -> usize {
        assert!(n > 0, "next_below needs a non-empty range");
        if n <= 256 {
            let zone = 256 - 256 % n;
            loop {
                let b = usize::from(self.next_byte());
                if b < zone {
                    return b % n;
                }
            }
        }

        let n = n as u64;
        let span = 1u64 << 32;
        let zone = span - span % n;
        loop {
            let mut word = [0u8; 4];
            for b in &mut word {
                *b = self.next_byte();
            }
            let v = u64::from(u32::from_le_bytes(word));
            if v < zone {
                return (v % n) as usize;
            }
        }
    }
}
