pub fn u8s_from_str(input: &str) -> [u8; 32] {
    blake3::hash(input.as_bytes()).into()
}

/// Derives an episode seed from `input`, with `nonce` folded into the first
/// eight bytes so one input yields a family of independent seeds.
pub fn seed_from_str(input: &str, nonce: u64) -> [u8; 32] {
    let mut seed = u8s_from_str(input);
    for (byte, nonce_byte) in seed.iter_mut().zip(nonce.to_le_bytes()) {
        *byte ^= nonce_byte;
    }
    seed
}
