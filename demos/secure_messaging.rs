//! Two users exchange encrypted and signed messages through a shared registry.
//!
//! Run with `RUST_LOG=textbook_rsa=debug cargo run --example secure_messaging`
//! to see each key generation step.

use textbook_rsa::{KeyRegistry, Result, SecureMessaging};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let registry = KeyRegistry::new();
    let service = SecureMessaging::new(&registry);

    for username in ["Alice", "Bob"] {
        let generation = service.generate_keypair(username, 8)?;
        let details = &generation.key_generation_details;
        println!(
            "{username}: p = {}, q = {}, n = {}, phi(n) = {}, e = {}, d = {}",
            details.p,
            details.q,
            generation.public_key.n(),
            details.lambda,
            details.e,
            details.d,
        );
    }

    for (sender, receiver, message) in [("Alice", "Bob", "HELLO"), ("Bob", "Alice", "HI")] {
        let ciphertext = service.send_message(sender, receiver, message)?;
        let units: Vec<String> = ciphertext.iter().map(|c| c.to_string()).collect();
        println!("{sender} -> {receiver}: {message:?} encrypted as [{}]", units.join(", "));

        let decrypted = service.receive_message(receiver, &ciphertext)?;
        println!("{receiver} decrypted {decrypted:?} (match: {})", decrypted == message);
    }

    let report = service.sign("Alice", "Meet at noon")?;
    println!(
        "Alice signed {:?}: sha256 = {}, signature = {}",
        report.message,
        report.hash_hex,
        report.signature.value()
    );

    let claims = [
        ("Alice", "Meet at noon"),
        ("Alice", "Meet at nine"),
        ("Bob", "Meet at noon"),
    ];
    for (claimed, message) in claims {
        let verification = service.verify(claimed, message, &report.signature)?;
        println!(
            "verify as {claimed} over {message:?}: {} (computed {}, recovered {})",
            verification.is_valid, verification.computed_hash, verification.recovered_hash
        );
    }

    for user in service.list_users() {
        println!("{}: n = {}, e = {}", user.username, user.public_key.n(), user.public_key.e());
    }

    Ok(())
}
