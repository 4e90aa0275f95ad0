#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;
use textbook_rsa::{KeyPair, KeyPairBuilder, Primality, Sign, Verify};

static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let key_pair = KEYPAIR.get_or_init(|| {
        KeyPairBuilder::new()
            .bit_length(32)
            .primality(Primality::MillerRabin { rounds: 20 })
            .build()
            .unwrap()
    });

    let Ok(signature) = key_pair.private_key().sign(data) else {
        assert!(data.is_empty(), "signing failed for non-empty input");
        return;
    };

    assert!(signature.value() < key_pair.public_key().n());
    assert!(key_pair.public_key().verify(data, &signature));
});
