#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint_dig::BigUint;
use std::sync::OnceLock;
use textbook_rsa::{Decrypt, Encrypt, Error, KeyPair};

static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let key_pair = KEYPAIR.get_or_init(|| KeyPair::generate_with_size(12).unwrap());
    let n = key_pair.public_key().n();

    let unit = BigUint::from_bytes_be(data);

    // Oversized units must be refused, never reduced
    if &unit >= n {
        assert!(matches!(
            key_pair.public_key().encrypt_unit(&unit),
            Err(Error::MessageTooLarge { .. })
        ));
        return;
    }

    let c = key_pair.public_key().encrypt_unit(&unit).expect("unit below modulus");
    assert!(&c < n);

    let decrypted = key_pair.private_key().decrypt_unit(&c).expect("ciphertext below modulus");
    assert_eq!(unit, decrypted);

    // Arbitrary UTF-8 round trips as long as every code point fits
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(ciphertext) = key_pair.public_key().encrypt_str(text) {
            assert_eq!(key_pair.private_key().decrypt_str(&ciphertext).unwrap(), text);
        }
    }
});
