use rlwe_kex::errors::RlweKexError;
use rlwe_kex::keypair::{KeyGenerator, PublicKey};
use rlwe_kex::params::KexParams;
use rlwe_kex::reconcile::Reconciler;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use rand::SeedableRng;
use rand::rngs::StdRng;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("info"))
            .unwrap();
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_line_number(false)
            .with_file(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    });
}

#[test]
fn showcase_exchange_over_the_wire() -> Result<(), RlweKexError> {
    init_tracing();

    // Both sides load the same configuration.
    let params_json = KexParams::reference().to_json()?;
    let alice_params = KexParams::from_json(&params_json)?;
    let bob_params = KexParams::from_json(&params_json)?;
    let ring = alice_params.ring();

    let mut alice_generator = KeyGenerator::new(&alice_params, StdRng::seed_from_u64(2024));
    let mut bob_generator = KeyGenerator::new(&bob_params, StdRng::seed_from_u64(4202));

    // Alice publishes the base alongside her public key.
    let base = alice_generator.generate_base();
    let alice = alice_generator.generate_key_pair(&base);
    let base_wire = PublicKey::new(base).to_base64(&ring);
    let alice_wire = alice.public_key.to_base64(&ring);

    let bob_base = PublicKey::from_base64(&ring, &base_wire)?.polynomial;
    let bob = bob_generator.generate_key_pair(&bob_base);
    let bob_wire = bob.public_key.to_json()?;

    // Alice is designated first, so her public key is the reference.
    let alice_public_at_bob = PublicKey::from_base64(&ring, &alice_wire)?;
    let bob_public_at_alice = PublicKey::from_json(&ring, &bob_wire)?;
    assert_eq!(alice_public_at_bob, alice.public_key);
    assert_eq!(bob_public_at_alice, bob.public_key);

    let alice_key = Reconciler::new(&alice_params).compute_shared_key(
        &bob_public_at_alice,
        &alice.private_key,
        &alice.public_key,
    );
    let bob_key = Reconciler::new(&bob_params).compute_shared_key(
        &alice_public_at_bob,
        &bob.private_key,
        &alice_public_at_bob,
    );

    let agreement = alice_key.agreement(&bob_key);
    dbg!(agreement.rate(), &agreement.mismatched_positions);
    assert!(agreement.is_exact());

    // The first 256 bits key a symmetric cipher on both sides.
    let alice_bytes = alice_key.to_bytes();
    let bob_bytes = bob_key.to_bytes();
    assert_eq!(alice_bytes.len(), 128);

    let alice_cipher = Aes256Gcm::new_from_slice(&alice_bytes[..32]).expect("32-byte key");
    let bob_cipher = Aes256Gcm::new_from_slice(&bob_bytes[..32]).expect("32-byte key");
    let nonce = Nonce::from_slice(&[7u8; 12]);

    let message = "Привіт, Бобе! Shared key established.";
    let sealed = alice_cipher
        .encrypt(nonce, message.as_bytes())
        .expect("encrypt");
    let opened = bob_cipher.decrypt(nonce, sealed.as_slice()).expect("decrypt");

    assert_eq!(String::from_utf8_lossy(&opened), message);

    Ok(())
}
