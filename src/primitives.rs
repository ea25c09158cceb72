// SRP-6a computations shared by the client and server sessions.
//
//   k  = H(N | PAD(g))
//   x  = H(s | H(I | ":" | P))
//   v  = g^x % N
//   A  = g^a % N
//   B  = (k*v + g^b) % N
//   u  = H(PAD(A) | PAD(B))
//   S  = (B - k*g^x)^(a + u*x) % N     (client)
//      = (A * v^u)^b % N               (server)
//   K  = H(S)
//   M1 = H(H(N) XOR H(g) | H(I) | s | A | B | K)
//   M2 = H(A | M1 | K)

use crate::codec::{identity_password, pad_to, to_bytes_be};
use crate::{AbortReason, GroupParams, HashAlgorithm, Result, SecretBytes, SrpError};

use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

/// Size of the ephemeral private exponents `a` and `b` (256 bits).
pub const PRIVATE_EXPONENT_BYTES: usize = 32;
/// Size of a freshly generated salt (128 bits).
pub const SALT_BYTES: usize = 16;

pub fn compute_k(n: &BigUint, g: &BigUint, n_len: usize, hash: HashAlgorithm) -> BigUint {
    let digest = hash.digest_parts(&[&to_bytes_be(n), &pad_to(g, n_len)]);
    BigUint::from_bytes_be(&digest)
}

/// The private key `x`. As sensitive as the password itself.
pub fn compute_x(
    salt: &[u8],
    identity: &[u8],
    password: &[u8],
    hash: HashAlgorithm,
) -> SecretBytes {
    let inner = SecretBytes::from(hash.digest_message(&identity_password(identity, password)));
    SecretBytes::from(hash.digest_parts(&[salt, inner.data()]))
}

pub fn compute_verifier(params: &GroupParams, x: &BigUint) -> BigUint {
    params.g().modpow(x, params.n())
}

/// Fails if `u` is zero; both sides must check before using it.
///
/// The zero branch has no test: it needs inputs that hash to all zero
/// bytes, which no supported hash can be made to produce.
pub fn compute_u(params: &GroupParams, a_pub: &BigUint, b_pub: &BigUint) -> Result<BigUint> {
    let digest = params
        .hash()
        .digest_parts(&[&params.pad(a_pub), &params.pad(b_pub)]);
    let u = BigUint::from_bytes_be(&digest);
    if u.is_zero() {
        return Err(SrpError::ProtocolAbort(AbortReason::ZeroScramblingParameter));
    }
    Ok(u)
}

pub fn compute_a_pub(params: &GroupParams, a: &BigUint) -> BigUint {
    params.g().modpow(a, params.n())
}

pub fn compute_b_pub(params: &GroupParams, b: &BigUint, v: &BigUint) -> BigUint {
    let n = params.n();
    (params.k() * v + params.g().modpow(b, n)) % n
}

/// Reduces a public value received from the peer modulo `N` and rejects
/// it if the result is zero.
pub fn reduce_public_value(params: &GroupParams, value: &[u8]) -> Result<BigUint> {
    let reduced = BigUint::from_bytes_be(value) % params.n();
    if reduced.is_zero() {
        return Err(SrpError::ProtocolAbort(AbortReason::ZeroPublicValue));
    }
    Ok(reduced)
}

/// `S = (B - k*g^x)^(a + u*x) % N`.
///
/// `b_pub` must already be reduced modulo `N`. The subtraction is done as
/// `(B + N - (k*g^x % N)) % N` so the base never goes negative.
pub fn client_premaster_secret(
    params: &GroupParams,
    b_pub: &BigUint,
    x: &BigUint,
    a: &BigUint,
    u: &BigUint,
) -> BigUint {
    let n = params.n();
    let kgx = (params.k() * params.g().modpow(x, n)) % n;
    let base = (b_pub + n - kgx) % n;
    let exponent = a + u * x;
    base.modpow(&exponent, n)
}

/// `S = (A * v^u)^b % N`.
pub fn server_premaster_secret(
    params: &GroupParams,
    a_pub: &BigUint,
    v: &BigUint,
    u: &BigUint,
    b: &BigUint,
) -> BigUint {
    let n = params.n();
    let base = (a_pub * v.modpow(u, n)) % n;
    base.modpow(b, n)
}

/// `K = H(S)` over the minimal encoding of `S`.
pub fn compute_session_key(hash: HashAlgorithm, premaster_secret: &BigUint) -> SecretBytes {
    let s = SecretBytes::from(to_bytes_be(premaster_secret));
    SecretBytes::from(hash.digest_message(&s))
}

pub fn xor_digests(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    if a.len() != b.len() {
        return Err(SrpError::DigestLengthMismatch);
    }
    Ok(a.iter().zip(b).map(|(x, y)| x ^ y).collect())
}

pub fn compute_m1(
    params: &GroupParams,
    identity: &[u8],
    salt: &[u8],
    a_pub: &BigUint,
    b_pub: &BigUint,
    key: &[u8],
) -> Result<Vec<u8>> {
    let hash = params.hash();
    let hn = hash.digest_message(&to_bytes_be(params.n()));
    let hg = hash.digest_message(&to_bytes_be(params.g()));
    let hn_xor_hg = xor_digests(&hn, &hg)?;
    let hi = hash.digest_message(identity);
    Ok(hash.digest_parts(&[
        &hn_xor_hg,
        &hi,
        salt,
        &to_bytes_be(a_pub),
        &to_bytes_be(b_pub),
        key,
    ]))
}

pub fn compute_m2(params: &GroupParams, a_pub: &BigUint, m1: &[u8], key: &[u8]) -> Vec<u8> {
    params
        .hash()
        .digest_parts(&[&to_bytes_be(a_pub), m1, key])
}

/// An ephemeral private exponent and `g` raised to it.
pub struct ModExpKeyPair {
    pub priv_key: SecretBytes,
    pub pub_key: BigUint,
}

impl ModExpKeyPair {
    pub fn private_exponent(&self) -> BigUint {
        BigUint::from_bytes_be(&self.priv_key)
    }
}

pub fn generate_modexp_keypair<R: RngCore + CryptoRng>(
    params: &GroupParams,
    rng: &mut R,
) -> Result<ModExpKeyPair> {
    let priv_key = generate_private_exponent(rng)?;
    let pub_key = compute_a_pub(params, &BigUint::from_bytes_be(&priv_key));
    Ok(ModExpKeyPair { pub_key, priv_key })
}

/// Draws a non-zero 256-bit exponent. A failing random source is an error,
/// never a fallback value.
pub fn generate_private_exponent<R: RngCore + CryptoRng>(rng: &mut R) -> Result<SecretBytes> {
    loop {
        let mut bytes = vec![0u8; PRIVATE_EXPONENT_BYTES];
        let filled = rng.try_fill_bytes(&mut bytes);
        let exponent = SecretBytes::from(bytes);
        filled.map_err(|_| SrpError::RandomSourceFailure)?;
        if exponent.iter().any(|&byte| byte != 0) {
            return Ok(exponent);
        }
    }
}

pub fn generate_salt<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Vec<u8>> {
    let mut salt = vec![0u8; SALT_BYTES];
    rng.try_fill_bytes(&mut salt)
        .map_err(|_| SrpError::RandomSourceFailure)?;
    Ok(salt)
}

/// A random source whose entropy has run out.
#[cfg(test)]
pub(crate) struct FailingRng;

#[cfg(test)]
impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        panic!("FailingRng has no entropy")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("FailingRng has no entropy")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("FailingRng has no entropy")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        Err(rand::Error::new("entropy source unavailable"))
    }
}

#[cfg(test)]
impl CryptoRng for FailingRng {}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::StandardGroup;

    use hex_literal::hex;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::rstest;

    // RFC 5054 Appendix B.
    const I: &[u8] = b"alice";
    const P: &[u8] = b"password123";
    const S: [u8; 16] = hex!("BEB25379 D1A8581E B5A72767 3A2441EE");
    const A: [u8; 32] = hex!(
        "60975527 035CF2AD 1989806F 0407210B C81EDC04 E2762A56 AFD529DD DA2D4393"
    );
    const B: [u8; 32] = hex!(
        "E487CB59 D31AC550 471E81F0 0F6928E0 1DDA08E9 74A004F4 9E61F5D1 05284D20"
    );
    const EXPECTED_X: [u8; 20] = hex!("94B7555A ABE9127C C58CCF49 93DB6CF8 4D16C124");
    const EXPECTED_V: [u8; 128] = hex!(
        "7E273DE8 696FFC4F 4E337D05 B4B375BE B0DDE156 9E8FA00A 9886D812
         9BADA1F1 822223CA 1A605B53 0E379BA4 729FDC59 F105B478 7E5186F5
         C671085A 1447B52A 48CF1970 B4FB6F84 00BBF4CE BFBB1681 52E08AB5
         EA53D15C 1AFF87B2 B9DA6E04 E058AD51 CC72BFC9 033B564E 26480D78
         E955A5E2 9E7AB245 DB2BE315 E2099AFB"
    );
    const EXPECTED_A_PUB: [u8; 128] = hex!(
        "61D5E490 F6F1B795 47B0704C 436F523D D0E560F0 C64115BB 72557EC4
         4352E890 3211C046 92272D8B 2D1A5358 A2CF1B6E 0BFCF99F 921530EC
         8E393561 79EAE45E 42BA92AE ACED8251 71E1E8B9 AF6D9C03 E1327F44
         BE087EF0 6530E69F 66615261 EEF54073 CA11CF58 58F0EDFD FE15EFEA
         B349EF5D 76988A36 72FAC47B 0769447B"
    );
    const EXPECTED_B_PUB: [u8; 128] = hex!(
        "BD0C6151 2C692C0C B6D041FA 01BB152D 4916A1E7 7AF46AE1 05393011
         BAF38964 DC46A067 0DD125B9 5A981652 236F99D9 B681CBF8 7837EC99
         6C6DA044 53728610 D0C6DDB5 8B318885 D7D82C7F 8DEB75CE 7BD4FBAA
         37089E6F 9C6059F3 88838E7A 00030B33 1EB76840 910440B1 B27AAEAE
         EB4012B7 D7665238 A8E3FB00 4B117B58"
    );
    const EXPECTED_U: [u8; 20] = hex!("CE38B959 3487DA98 554ED47D 70A7AE5F 462EF019");
    const EXPECTED_S: [u8; 128] = hex!(
        "B0DC82BA BCF30674 AE450C02 87745E79 90A3381F 63B387AA F271A10D
         233861E3 59B48220 F7C4693C 9AE12B0A 6F67809F 0876E2D0 13800D6C
         41BB59B6 D5979B5C 00A172B4 A2A5903A 0BDCAF8A 709585EB 2AFAFA8F
         3499B200 210DCC1F 10EB3394 3CD67FC8 8A2F39A4 BE5BEC4E C0A3212D
         C346D7E4 74B29EDE 8A469FFE CA686E5A"
    );

    fn rfc_params() -> GroupParams {
        GroupParams::from_standard(StandardGroup::G1024, HashAlgorithm::Sha1)
    }

    #[test]
    fn rfc_5054_test_vector_x_and_v() {
        let params = rfc_params();

        let x = compute_x(&S, I, P, HashAlgorithm::Sha1);
        let v = compute_verifier(&params, &BigUint::from_bytes_be(&x));

        assert_eq!(x.data(), EXPECTED_X);
        assert_eq!(v.to_bytes_be(), EXPECTED_V);
    }

    #[test]
    fn rfc_5054_test_vector_public_values_and_u() {
        let params = rfc_params();
        let v = BigUint::from_bytes_be(&EXPECTED_V);

        let a_pub = compute_a_pub(&params, &BigUint::from_bytes_be(&A));
        let b_pub = compute_b_pub(&params, &BigUint::from_bytes_be(&B), &v);
        let u = compute_u(&params, &a_pub, &b_pub).unwrap();

        assert_eq!(a_pub.to_bytes_be(), EXPECTED_A_PUB);
        assert_eq!(b_pub.to_bytes_be(), EXPECTED_B_PUB);
        assert_eq!(u.to_bytes_be(), EXPECTED_U);
    }

    #[test]
    fn rfc_5054_test_vector_premaster_secret() {
        let params = rfc_params();
        let x = BigUint::from_bytes_be(&EXPECTED_X);
        let v = BigUint::from_bytes_be(&EXPECTED_V);
        let a_pub = BigUint::from_bytes_be(&EXPECTED_A_PUB);
        let b_pub = BigUint::from_bytes_be(&EXPECTED_B_PUB);
        let u = BigUint::from_bytes_be(&EXPECTED_U);

        let client_s =
            client_premaster_secret(&params, &b_pub, &x, &BigUint::from_bytes_be(&A), &u);
        let server_s =
            server_premaster_secret(&params, &a_pub, &v, &u, &BigUint::from_bytes_be(&B));

        assert_eq!(client_s.to_bytes_be(), EXPECTED_S);
        assert_eq!(server_s.to_bytes_be(), EXPECTED_S);
    }

    #[test]
    fn rfc_5054_inputs_give_stable_key_and_evidence() {
        let params = rfc_params();
        let a_pub = BigUint::from_bytes_be(&EXPECTED_A_PUB);
        let b_pub = BigUint::from_bytes_be(&EXPECTED_B_PUB);

        let key = compute_session_key(HashAlgorithm::Sha1, &BigUint::from_bytes_be(&EXPECTED_S));
        let m1 = compute_m1(&params, I, &S, &a_pub, &b_pub, &key).unwrap();
        let m2 = compute_m2(&params, &a_pub, &m1, &key);

        assert_eq!(key.data(), hex!("017EEFA1 CEFC5C2E 626E2159 8987F31E 0F1B11BB"));
        assert_eq!(m1, hex!("3F3BC671 69EA7130 2599CF1B 0F5D408B 7B65D347"));
        assert_eq!(m2, hex!("9CAB3C57 5A11DE37 D3AC1421 A9F00923 6A48EB55"));
    }

    // The SHA-256 / 2048-bit vector used by other RFC 5054 implementations.
    #[test]
    fn sha256_2048_test_vector_session_key() {
        let params = GroupParams::from_standard(StandardGroup::G2048, HashAlgorithm::Sha256);
        let password = hex!(
            "CCAF1BCA 820E8E6B 392C0EBA 7014CC9C DF49A650 84B39A53 834CC090 92BCDA20"
        );
        let salt = hex!("BC01D972 31E5A4BC 79171C6D 83783FF2");
        let a = BigUint::from_bytes_be(&hex!(
            "81010101 01010101 01010101 01010101 01010101 01010101 01010101 01010101"
        ));
        let b = BigUint::from_bytes_be(&B);

        let x = compute_x(&salt, b"", &password, HashAlgorithm::Sha256);
        let x = BigUint::from_bytes_be(&x);
        let v = compute_verifier(&params, &x);
        let a_pub = compute_a_pub(&params, &a);
        let b_pub = compute_b_pub(&params, &b, &v);
        let u = compute_u(&params, &a_pub, &b_pub).unwrap();
        let client_key = compute_session_key(
            HashAlgorithm::Sha256,
            &client_premaster_secret(&params, &b_pub, &x, &a, &u),
        );
        let server_key = compute_session_key(
            HashAlgorithm::Sha256,
            &server_premaster_secret(&params, &a_pub, &v, &u, &b),
        );

        assert_eq!(
            params.k().to_bytes_be(),
            hex!("05B9E8EF 059C6B32 EA59FC1D 322D37F0 4AA30BAE 5AA9003B 8321E21D DB04E300")
        );
        assert_eq!(
            x.to_bytes_be(),
            hex!("FD1709C7 30244792 F33348CB FBBD4AB4 39AC8090 FCDDC474 46244073 0D85ADDB")
        );
        assert_eq!(
            u.to_bytes_be(),
            hex!("6B527E30 667D330D 84874755 1E17E271 BA465393 CA48264C D37E59DF 18267B37")
        );
        let expected_key =
            hex!("CD315DD4 2652B85B FFDD273E EF98FEDE 3C77E0AE 07898ABE A60FEEA6 EE706231");
        assert_eq!(client_key.data(), expected_key);
        assert_eq!(server_key.data(), expected_key);
    }

    #[test]
    fn client_premaster_normalises_negative_base() {
        // Choosing B smaller than k*g^x % N forces B - k*g^x below zero.
        let params = rfc_params();
        let x = BigUint::from(3u32);
        let a = BigUint::from(5u32);
        let u = BigUint::from(7u32);
        let n = params.n();
        let kgx = (params.k() * params.g().modpow(&x, n)) % n;
        let b_pub = BigUint::from(1u32);
        assert!(b_pub < kgx);

        let s = client_premaster_secret(&params, &b_pub, &x, &a, &u);

        let expected_base = (n + &b_pub - &kgx) % n;
        assert_eq!(s, expected_base.modpow(&(&a + &u * &x), n));
    }

    #[rstest]
    #[case(0u32)]
    #[case(1u32)]
    #[case(2u32)]
    fn reduce_public_value_rejects_multiples_of_n(#[case] multiple: u32) {
        let params = rfc_params();
        let value = (params.n() * multiple).to_bytes_be();

        let result = reduce_public_value(&params, &value);

        assert_eq!(
            result,
            Err(SrpError::ProtocolAbort(AbortReason::ZeroPublicValue))
        );
    }

    #[test]
    fn reduce_public_value_rejects_empty_input() {
        let params = rfc_params();

        assert_eq!(
            reduce_public_value(&params, &[]),
            Err(SrpError::ProtocolAbort(AbortReason::ZeroPublicValue))
        );
    }

    #[test]
    fn reduce_public_value_reduces_modulo_n() {
        let params = rfc_params();
        let value = params.n() + 5u32;

        let reduced = reduce_public_value(&params, &value.to_bytes_be()).unwrap();

        assert_eq!(reduced, BigUint::from(5u32));
    }

    #[test]
    fn xor_digests_rejects_mismatched_lengths() {
        assert_eq!(
            xor_digests(&[1, 2, 3], &[1, 2]),
            Err(SrpError::DigestLengthMismatch)
        );
    }

    #[test]
    fn xor_digests_combines_bytes() {
        assert_eq!(xor_digests(&[0xf0, 0x0f], &[0xff, 0xff]).unwrap(), vec![0x0f, 0xf0]);
    }

    #[test]
    fn compute_x_depends_on_every_input() {
        let x = compute_x(&S, I, P, HashAlgorithm::Sha256);

        assert_ne!(x.data(), compute_x(b"other salt", I, P, HashAlgorithm::Sha256).data());
        assert_ne!(x.data(), compute_x(&S, b"bob", P, HashAlgorithm::Sha256).data());
        assert_ne!(x.data(), compute_x(&S, I, b"password124", HashAlgorithm::Sha256).data());
    }

    #[test]
    fn compute_x_hashes_salt_then_identity_colon_password() {
        let inner = HashAlgorithm::Sha256.digest_message(b"alice:password123");
        let expected = HashAlgorithm::Sha256.digest_parts(&[&S, &inner]);

        let x = compute_x(&S, I, P, HashAlgorithm::Sha256);

        assert_eq!(x.data(), expected);
    }

    #[test]
    fn private_exponents_are_256_bits_and_fresh() {
        let mut rng = StdRng::from_seed([7; 32]);

        let first = generate_private_exponent(&mut rng).unwrap();
        let second = generate_private_exponent(&mut rng).unwrap();

        assert_eq!(first.len(), PRIVATE_EXPONENT_BYTES);
        assert_eq!(second.len(), PRIVATE_EXPONENT_BYTES);
        assert_ne!(first.data(), second.data());
    }

    #[test]
    fn salts_are_128_bits() {
        let mut rng = StdRng::from_seed([8; 32]);

        let salt = generate_salt(&mut rng).unwrap();

        assert_eq!(salt.len(), SALT_BYTES);
    }

    #[test]
    fn random_source_failure_is_reported() {
        let params = rfc_params();

        assert!(matches!(
            generate_private_exponent(&mut FailingRng),
            Err(SrpError::RandomSourceFailure)
        ));
        assert_eq!(
            generate_salt(&mut FailingRng),
            Err(SrpError::RandomSourceFailure)
        );
        assert!(matches!(
            generate_modexp_keypair(&params, &mut FailingRng),
            Err(SrpError::RandomSourceFailure)
        ));
    }

    #[test]
    fn modexp_keypair_public_is_g_to_the_private() {
        let params = rfc_params();
        let mut rng = StdRng::from_seed([9; 32]);

        let keys = generate_modexp_keypair(&params, &mut rng).unwrap();

        assert_eq!(
            keys.pub_key,
            params.g().modpow(&keys.private_exponent(), params.n())
        );
    }
}
