// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use num_bigint_dig::BigUint;
use num_traits::{One, Zero};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::math::{self, Primality};
use crate::{Error, Result};

/// Conventional public exponent, tried before any fallback scan.
pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65537;

/// Public half of a key pair: modulus `n` and public exponent `e`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPublicKey")]
pub struct PublicKey {
    #[serde(with = "crate::serde_decimal")]
    n: BigUint,
    #[serde(with = "crate::serde_decimal")]
    e: BigUint,
}

impl PublicKey {
    /// Construct a public key from its components.
    ///
    /// The modulus must be at least 2 and the exponent non-zero.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        if n <= BigUint::one() {
            return Err(Error::InvalidParameter("public modulus must be at least 2".into()));
        }
        if e.is_zero() {
            return Err(Error::InvalidParameter("public exponent must be non-zero".into()));
        }

        Ok(Self { n, e })
    }

    #[inline]
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    #[inline]
    pub fn e(&self) -> &BigUint {
        &self.e
    }
}

#[derive(Deserialize)]
struct RawPublicKey {
    #[serde(with = "crate::serde_decimal")]
    n: BigUint,
    #[serde(with = "crate::serde_decimal")]
    e: BigUint,
}

impl TryFrom<RawPublicKey> for PublicKey {
    type Error = Error;

    fn try_from(raw: RawPublicKey) -> Result<Self> {
        PublicKey::new(raw.n, raw.e)
    }
}

/// Private half of a key pair: modulus `n` and private exponent `d`.
///
/// The exponent is wiped from memory on drop.
#[derive(PartialEq, Eq, Zeroize, ZeroizeOnDrop, Clone)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct PrivateKey {
    #[zeroize(skip)]
    public_key: PublicKey,

    /// e·d ≡ 1 (mod λ)
    d: BigUint,
}

impl PrivateKey {
    /// Construct a private key for `public_key` with private exponent `d`.
    ///
    /// `d` must be non-zero and smaller than the modulus.
    pub fn new(public_key: PublicKey, d: BigUint) -> Result<Self> {
        if d.is_zero() || &d >= public_key.n() {
            return Err(Error::InvalidParameter(
                "private exponent must lie in [1, n)".into(),
            ));
        }

        Ok(Self { public_key, d })
    }

    #[inline]
    pub fn n(&self) -> &BigUint {
        self.public_key.n()
    }

    #[inline]
    pub fn d(&self) -> &BigUint {
        &self.d
    }

    #[inline]
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

#[cfg(not(feature = "expose-secret"))]
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("n", self.n())
            .field("d", &"<redacted>")
            .finish()
    }
}

impl Serialize for PrivateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PrivateKey", 2)?;
        state.serialize_field("n", &self.n().to_str_radix(10))?;
        state.serialize_field("d", &self.d.to_str_radix(10))?;
        state.end()
    }
}

/// Intermediate values of key generation, kept for inspection only.
///
/// None of these are needed to encrypt, decrypt, sign or verify. The
/// factorization is secret material and is wiped on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct KeyDiagnostics {
    #[serde(with = "crate::serde_decimal")]
    pub p: BigUint,
    #[serde(with = "crate::serde_decimal")]
    pub q: BigUint,
    /// λ = (p-1)(q-1)
    #[serde(rename = "phi_n", with = "crate::serde_decimal")]
    pub lambda: BigUint,
    #[serde(with = "crate::serde_decimal")]
    pub e: BigUint,
    #[serde(with = "crate::serde_decimal")]
    pub d: BigUint,
    /// Set when the preferred exponent was unusable and the odd scan chose `e`.
    pub exponent_fallback: bool,
}

#[cfg(not(feature = "expose-secret"))]
impl fmt::Debug for KeyDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyDiagnostics")
            .field("e", &self.e)
            .field("exponent_fallback", &self.exponent_fallback)
            .finish_non_exhaustive()
    }
}

/// A complete key pair together with the diagnostics of its construction.
///
/// Secret material is zeroized when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct KeyPair {
    #[zeroize(skip)]
    public: PublicKey,
    secret: PrivateKey,
    diagnostics: KeyDiagnostics,
}

impl KeyPair {
    /// Generate a key pair with default parameters.
    pub fn generate() -> Result<Self> {
        KeyPairBuilder::new().build()
    }

    /// Generate a key pair whose primes each have `bit_length` bits.
    pub fn generate_with_size(bit_length: usize) -> Result<Self> {
        KeyPairBuilder::new().bit_length(bit_length).build()
    }

    /// Derive a key pair from two known, distinct primes.
    ///
    /// `preferred_exponent` is used when it is below λ and coprime to it;
    /// otherwise the smallest suitable odd exponent from 3 upwards is chosen.
    pub fn from_primes(p: BigUint, q: BigUint, preferred_exponent: &BigUint) -> Result<Self> {
        if !math::is_prime(&p) || !math::is_prime(&q) {
            return Err(Error::InvalidParameter("p and q must both be prime".into()));
        }
        if p == q {
            return Err(Error::InvalidParameter("p and q must be distinct".into()));
        }

        derive(p, q, preferred_exponent)
    }

    #[inline]
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    #[inline]
    pub fn private_key(&self) -> &PrivateKey {
        &self.secret
    }

    #[inline]
    pub fn diagnostics(&self) -> &KeyDiagnostics {
        &self.diagnostics
    }
}

#[cfg(not(feature = "expose-secret"))]
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}

/// Builder for generating key pairs with configurable parameters.
#[derive(Debug, Clone)]
pub struct KeyPairBuilder {
    bit_length: usize,
    public_exponent: BigUint,
    primality: Primality,
}

impl KeyPairBuilder {
    /// Demonstration-sized default: each prime has 10 bits.
    pub const DEFAULT_BITS: usize = 10;

    /// Absolute minimum prime size accepted by the builder.
    pub const MIN_BITS: usize = math::MIN_PRIME_BITS;

    /// Create a builder with default parameters.
    pub fn new() -> Self {
        Self {
            bit_length: Self::DEFAULT_BITS,
            public_exponent: BigUint::from(DEFAULT_PUBLIC_EXPONENT),
            primality: Primality::default(),
        }
    }

    /// Set the bit length of each prime factor.
    pub fn bit_length(mut self, bits: usize) -> Self {
        self.bit_length = bits;
        self
    }

    /// Set the exponent tried before the fallback scan.
    pub fn public_exponent<E: Into<BigUint>>(mut self, e: E) -> Self {
        self.public_exponent = e.into();
        self
    }

    /// Set the primality test used while sampling primes.
    pub fn primality(mut self, primality: Primality) -> Self {
        self.primality = primality;
        self
    }

    /// Generate the key pair from an entropy-seeded generator.
    pub fn build(self) -> Result<KeyPair> {
        let mut rng = StdRng::from_entropy();
        self.build_with_rng(&mut rng)
    }

    /// Generate the key pair drawing all randomness from `rng`.
    pub fn build_with_rng<R: Rng + ?Sized>(self, rng: &mut R) -> Result<KeyPair> {
        if self.bit_length < Self::MIN_BITS {
            return Err(Error::InvalidParameter(format!(
                "bit length must be at least {}, got {}",
                Self::MIN_BITS,
                self.bit_length
            )));
        }
        if self.public_exponent < BigUint::from(3u32) {
            return Err(Error::InvalidParameter(
                "preferred public exponent must be at least 3".into(),
            ));
        }

        let p = math::generate_prime_with(self.bit_length, self.primality, rng)?;
        let mut q = math::generate_prime_with(self.bit_length, self.primality, rng)?;
        while q == p {
            q = math::generate_prime_with(self.bit_length, self.primality, rng)?;
        }
        tracing::debug!(%p, %q, bits = self.bit_length, "selected primes");

        derive(p, q, &self.public_exponent)
    }
}

impl Default for KeyPairBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a key pair from distinct primes, checking `e·d ≡ 1 (mod λ)`.
fn derive(p: BigUint, q: BigUint, preferred_exponent: &BigUint) -> Result<KeyPair> {
    let n = &p * &q;
    let lambda = (&p - 1u32) * (&q - 1u32);
    tracing::debug!(%n, %lambda, "computed modulus and totient");

    let (e, exponent_fallback) = select_public_exponent(preferred_exponent, &lambda)?;
    tracing::debug!(%e, exponent_fallback, "selected public exponent");

    let d = math::mod_inverse(&e, &lambda)?;
    if !((&e * &d) % &lambda).is_one() {
        return Err(Error::KeypairGenerationFailed(
            "private exponent does not invert the public exponent".into(),
        ));
    }
    tracing::debug!("derived private exponent");

    let public = PublicKey::new(n, e.clone())?;
    let secret = PrivateKey::new(public.clone(), d.clone())?;
    let diagnostics = KeyDiagnostics {
        p,
        q,
        lambda,
        e,
        d,
        exponent_fallback,
    };

    Ok(KeyPair {
        public,
        secret,
        diagnostics,
    })
}

/// Pick `preferred` when it is below λ and coprime to it, else scan odd
/// values from 3. Returns the exponent and whether the scan was used.
fn select_public_exponent(preferred: &BigUint, lambda: &BigUint) -> Result<(BigUint, bool)> {
    if preferred < lambda && math::gcd(preferred, lambda).is_one() {
        return Ok((preferred.clone(), false));
    }

    let mut e = BigUint::from(3u32);
    while &e < lambda {
        if math::gcd(&e, lambda).is_one() {
            return Ok((e, true));
        }
        e += 2u32;
    }

    Err(Error::KeypairGenerationFailed(format!(
        "no odd public exponent below {lambda} is coprime to it"
    )))
}
