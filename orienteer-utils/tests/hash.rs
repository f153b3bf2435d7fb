use orienteer_utils::*;

#[test]
fn test_u8s_from_str() {
    assert_eq!(u8s_from_str("settings"), u8s_from_str("settings"));
    assert_ne!(u8s_from_str("settings"), u8s_from_str("settings "));
    assert_eq!(
        u8s_from_str(""),
        *blake3::hash(b"").as_bytes()
    );
}

#[test]
fn test_seed_from_str() {
    let base = u8s_from_str("settings");
    assert_eq!(seed_from_str("settings", 0), base);

    let seed = seed_from_str("settings", 1337);
    assert_ne!(seed, base);
    assert_eq!(seed[8..], base[8..]);
    assert_eq!(seed[0], base[0] ^ 1337u64.to_le_bytes()[0]);
    assert_ne!(seed_from_str("settings", 1), seed_from_str("settings", 2));
}
