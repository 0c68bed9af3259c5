use rlwe_kex::errors::RlweKexError;
use rlwe_kex::keypair::KeyGenerator;
use rlwe_kex::params::{GaussianParams, KexParams};
use rlwe_kex::reconcile::{Agreement, Reconciler};

use rand::SeedableRng;
use rand::rngs::StdRng;

/// One full session with independent randomness per party.
fn run_session(params: &KexParams, seed: u64) -> Agreement {
    let base = KeyGenerator::new(params, StdRng::seed_from_u64(seed)).generate_base();
    let alice = KeyGenerator::new(params, StdRng::seed_from_u64(seed ^ 0xA11CE)).generate_key_pair(&base);
    let bob = KeyGenerator::new(params, StdRng::seed_from_u64(seed ^ 0xB0B)).generate_key_pair(&base);

    let reconciler = Reconciler::new(params);
    let reference = &alice.public_key;
    let alice_key = reconciler.compute_shared_key(&bob.public_key, &alice.private_key, reference);
    let bob_key = reconciler.compute_shared_key(&alice.public_key, &bob.private_key, reference);

    alice_key.agreement(&bob_key)
}

fn assert_agreement_over_runs(runs: u64) {
    let params = KexParams::reference();
    let mut exact = 0;
    for seed in 0..runs {
        let agreement = run_session(&params, seed);
        assert!(
            agreement.rate() > 0.99,
            "run {} agreed on {}/{} positions",
            seed,
            agreement.matching,
            agreement.total
        );
        if agreement.is_exact() {
            exact += 1;
        }
    }
    // Per-coefficient noise is ~sqrt(2N), tiny next to q / 8.
    assert!(exact as f64 >= runs as f64 * 0.9, "{} of {} runs exact", exact, runs);
}

#[test]
fn reference_parameters_agree() {
    assert_agreement_over_runs(20);
}

#[test]
#[ignore = "1000 full sessions at N = 1024; run in release mode"]
fn reference_parameters_agree_over_thousand_runs() {
    assert_agreement_over_runs(1000);
}

#[test]
fn oversized_noise_is_flagged_abnormal() -> Result<(), RlweKexError> {
    let loud = GaussianParams::try_with(0.0, (1u64 << 24) as f64)?;
    let params = KexParams::reference().with_error_noise(loud)?;

    let agreement = run_session(&params, 5);
    assert!(agreement.is_abnormal(), "rate {}", agreement.rate());
    assert!(!agreement.is_exact());
    Ok(())
}
