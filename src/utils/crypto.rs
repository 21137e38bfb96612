use rand::RngCore;
use ring::digest::{Context, SHA256};

/// Number of digest bytes shown in a fingerprint
pub const FINGERPRINT_LEN: usize = 4;

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

/// Short hex tag identifying secret material without revealing it
pub fn fingerprint(data: &[u8]) -> String {
    let digest = sha256_digest(data);
    hex::encode(&digest[..FINGERPRINT_LEN])
}

pub fn random_bytes(length: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; length];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256_digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_fingerprint_is_short_prefix() {
        let fp = fingerprint(b"abc");
        assert_eq!(fp, "ba7816bf");
        assert_eq!(fp.len(), FINGERPRINT_LEN * 2);
    }

    #[test]
    fn test_random_bytes() {
        let a = random_bytes(32);
        let b = random_bytes(32);
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
