// ABOUTME: SSH public key fingerprint computation.
// ABOUTME: Produces OpenSSH-style SHA256 fingerprints for authorized_keys lines.

use crate::error::{Result, StoreError};
use ssh_key::{HashAlg, PublicKey};

/// Compute the SHA256 fingerprint of an OpenSSH public key line.
///
/// Accepts `algorithm material [comment]` and returns the same string
/// `ssh-keygen -l` prints, e.g. `SHA256:4GoSQGyOar4dFU568foOjSU7YiGC8xFdBuGu/pJ/Pd4`.
///
/// # Errors
/// Returns `StoreError::ParseKey` if the material does not decode to a key
/// of the declared algorithm.
pub fn compute_fingerprint(line: &str) -> Result<String> {
    let public_key = PublicKey::from_openssh(line.trim()).map_err(StoreError::ParseKey)?;
    Ok(public_key.fingerprint(HashAlg::Sha256).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssh_key::{Algorithm, PrivateKey};

    /// Generate a fresh ed25519 key for testing.
    fn generate_test_key() -> PrivateKey {
        PrivateKey::random(&mut rand::thread_rng(), Algorithm::Ed25519)
            .expect("should generate ed25519 key")
    }

    #[test]
    fn test_known_key_fingerprint() {
        // Expected values taken from `ssh-keygen -lf`.
        let fp = compute_fingerprint(
            "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAILZCEPIFfUWoUa77jzhnggN9aeOYaRd1FBSxZT7Szbwm",
        )
        .expect("should compute fingerprint");
        assert_eq!(fp, "SHA256:I2sPNgGIl+Phl1jOab+W39IxsgendfoCXJCPrB2UCIs");
    }

    #[test]
    fn test_fingerprint_ignores_comment() {
        let key = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAILZCEPIFfUWoUa77jzhnggN9aeOYaRd1FBSxZT7Szbwm";
        let bare = compute_fingerprint(key).unwrap();
        let labelled = compute_fingerprint(&format!("{} gitlab-bob-key-3", key)).unwrap();
        assert_eq!(bare, labelled);
    }

    #[test]
    fn test_fingerprint_consistency() {
        let key = generate_test_key();
        let line = key.public_key().to_openssh().unwrap();

        let fp1 = compute_fingerprint(&line).expect("should compute fingerprint");
        let fp2 = compute_fingerprint(&line).expect("should compute fingerprint");

        assert_eq!(fp1, fp2, "fingerprint should be deterministic");
        assert!(fp1.starts_with("SHA256:"));
    }

    #[test]
    fn test_fingerprint_different_keys() {
        let line1 = generate_test_key().public_key().to_openssh().unwrap();
        let line2 = generate_test_key().public_key().to_openssh().unwrap();

        assert_ne!(
            compute_fingerprint(&line1).unwrap(),
            compute_fingerprint(&line2).unwrap(),
            "different keys should have different fingerprints"
        );
    }

    #[test]
    fn test_fingerprint_invalid_material() {
        let result = compute_fingerprint("ssh-ed25519 not-base64!!");
        assert!(matches!(result, Err(StoreError::ParseKey(_))));
    }
}
