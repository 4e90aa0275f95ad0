// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory mapping from usernames to key pairs.
//!
//! The registry is an explicit value handed to whoever needs multi-user
//! lookups; there is no process-wide store. A single `RwLock` guards the map,
//! so an entry is always observed either fully written or not at all.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::key::{KeyDiagnostics, KeyPair, PrivateKey, PublicKey};

/// A registered user and the key pair generated for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
    key_pair: KeyPair,
}

impl Identity {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    pub fn private_key(&self) -> &PrivateKey {
        self.key_pair.private_key()
    }

    /// Factorization and exponent details, for inspection only.
    pub fn diagnostics(&self) -> &KeyDiagnostics {
        self.key_pair.diagnostics()
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }
}

/// Thread-safe username → key pair store. Last write wins.
#[derive(Debug, Default)]
pub struct KeyRegistry {
    identities: RwLock<BTreeMap<String, Identity>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `key_pair` under `username`, replacing any previous entry.
    ///
    /// Returns the replaced identity, if there was one.
    pub fn register<U: Into<String>>(&self, username: U, key_pair: KeyPair) -> Option<Identity> {
        let username = username.into();
        let identity = Identity {
            username: username.clone(),
            key_pair,
        };

        let previous = self.identities.write().insert(username, identity);
        if let Some(previous) = &previous {
            tracing::debug!(username = previous.username(), "replaced existing key pair");
        }
        previous
    }

    /// Public key used to encrypt to, or verify signatures from, `username`.
    pub fn get_public(&self, username: &str) -> Result<PublicKey> {
        self.identities
            .read()
            .get(username)
            .map(|identity| identity.public_key().clone())
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    /// Private key, reserved for `username`'s own decryption and signing.
    pub fn get_private(&self, username: &str) -> Result<PrivateKey> {
        self.identities
            .read()
            .get(username)
            .map(|identity| identity.private_key().clone())
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    /// Full entry, including key generation diagnostics.
    pub fn identity(&self, username: &str) -> Result<Identity> {
        self.identities
            .read()
            .get(username)
            .cloned()
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    /// Every username with its public key, ordered by username.
    pub fn list(&self) -> Vec<(String, PublicKey)> {
        self.identities
            .read()
            .iter()
            .map(|(username, identity)| (username.clone(), identity.public_key().clone()))
            .collect()
    }

    pub fn remove(&self, username: &str) -> Result<Identity> {
        self.identities
            .write()
            .remove(username)
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    pub fn contains(&self, username: &str) -> bool {
        self.identities.read().contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.identities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyPairBuilder;
    use num_bigint_dig::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn keypair(seed: u64) -> KeyPair {
        KeyPairBuilder::new()
            .bit_length(8)
            .build_with_rng(&mut StdRng::seed_from_u64(seed))
            .unwrap()
    }

    #[test]
    fn register_and_lookup() {
        let registry = KeyRegistry::new();
        let alice = keypair(1);
        assert!(registry.register("Alice", alice.clone()).is_none());

        assert_eq!(&registry.get_public("Alice").unwrap(), alice.public_key());
        assert_eq!(&registry.get_private("Alice").unwrap(), alice.private_key());
        assert_eq!(registry.identity("Alice").unwrap().diagnostics(), alice.diagnostics());
        assert!(registry.contains("Alice"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn missing_user() {
        let registry = KeyRegistry::new();
        assert_eq!(registry.get_public("Carol"), Err(Error::UserNotFound("Carol".into())));
        assert!(matches!(registry.get_private("Carol"), Err(Error::UserNotFound(_))));
        assert!(matches!(registry.remove("Carol"), Err(Error::UserNotFound(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn last_write_wins() {
        let registry = KeyRegistry::new();
        let first = keypair(1);
        let second = keypair(2);

        registry.register("Alice", first.clone());
        let replaced = registry.register("Alice", second.clone()).unwrap();

        assert_eq!(replaced.key_pair(), &first);
        assert_eq!(&registry.get_public("Alice").unwrap(), second.public_key());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn list_is_sorted_and_public_only() {
        let registry = KeyRegistry::new();
        registry.register("Bob", keypair(2));
        registry.register("Alice", keypair(1));

        let listed = registry.list();
        let names: Vec<_> = listed.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob"]);
        assert_eq!(listed[1].1, registry.get_public("Bob").unwrap());
    }

    #[test]
    fn remove_destroys_entry() {
        let registry = KeyRegistry::new();
        registry.register("Alice", keypair(1));

        let removed = registry.remove("Alice").unwrap();
        assert_eq!(removed.username(), "Alice");
        assert!(!registry.contains("Alice"));
    }

    #[test]
    fn concurrent_registration() {
        let registry = KeyRegistry::new();
        let keys: Vec<KeyPair> = (0..16).map(keypair).collect();

        std::thread::scope(|scope| {
            for (i, key) in keys.iter().enumerate() {
                let registry = &registry;
                scope.spawn(move || {
                    registry.register(format!("user-{i}"), key.clone());
                    assert!(registry.get_public(&format!("user-{i}")).is_ok());
                });
            }
        });

        assert_eq!(registry.len(), keys.len());
        for (i, key) in keys.iter().enumerate() {
            let public = registry.get_public(&format!("user-{i}")).unwrap();
            assert_eq!(&public, key.public_key());
            assert!(public.n() > &BigUint::from(0u32));
        }
    }
}
