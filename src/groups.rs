// Group parameters: the safe prime N, the generator g and the hash H.
//
// The moduli below are RFC 5054 Appendix A. The 3072-bit and larger groups
// share their primes with the RFC 3526 MODP groups.

use crate::codec::{self, byte_len, pad_to};
use crate::prime::is_likely_prime;
use crate::primitives::compute_k;
use crate::{HashAlgorithm, Result, SrpError};

use num_bigint::BigUint;
use num_traits::One;

/// Smallest modulus accepted for a caller-supplied group.
pub const MIN_MODULUS_BITS: u64 = 1024;
pub const RECOMMENDED_GROUP_BITS: u32 = 2048;
pub const RECOMMENDED_HASH: HashAlgorithm = HashAlgorithm::Sha3_256;

const N_1024: &str = "\
    EEAF0AB9ADB38DD69C33F80AFA8FC5E86072618775FF3C0B9EA2314C9C256576\
    D674DF7496EA81D3383B4813D692C6E0E0D5D8E250B98BE48E495C1D6089DAD1\
    5DC7D7B46154D6B6CE8EF4AD69B15D4982559B297BCF1885C529F566660E57EC\
    68EDBC3C05726CC02FD4CBF4976EAA9AFD5138FE8376435B9FC61D2FC0EB06E3";

const N_1536: &str = "\
    9DEF3CAFB939277AB1F12A8617A47BBBDBA51DF499AC4C80BEEEA9614B19CC4D\
    5F4F5F556E27CBDE51C6A94BE4607A291558903BA0D0F84380B655BB9A22E8DC\
    DF028A7CEC67F0D08134B1C8B97989149B609E0BE3BAB63D47548381DBC5B1FC\
    764E3F4B53DD9DA1158BFD3E2B9C8CF56EDF019539349627DB2FD53D24B7C486\
    65772E437D6C7F8CE442734AF7CCB7AE837C264AE3A9BEB87F8A2FE9B8B5292E\
    5A021FFF5E91479E8CE7A28C2442C6F315180F93499A234DCF76E3FED135F9BB";

const N_2048: &str = "\
    AC6BDB41324A9A9BF166DE5E1389582FAF72B6651987EE07FC3192943DB56050\
    A37329CBB4A099ED8193E0757767A13DD52312AB4B03310DCD7F48A9DA04FD50\
    E8083969EDB767B0CF6095179A163AB3661A05FBD5FAAAE82918A9962F0B93B8\
    55F97993EC975EEAA80D740ADBF4FF747359D041D5C33EA71D281E446B14773B\
    CA97B43A23FB801676BD207A436C6481F1D2B9078717461A5B9D32E688F87748\
    544523B524B0D57D5EA77A2775D2ECFA032CFBDBF52FB3786160279004E57AE6\
    AF874E7303CE53299CCC041C7BC308D82A5698F3A8D0C38271AE35F8E9DBFBB6\
    94B5C803D89F7AE435DE236D525F54759B65E372FCD68EF20FA7111F9E4AFF73";

const N_3072: &str = "\
    FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
    020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
    4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
    EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
    98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
    9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
    E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718\
    3995497CEA956AE515D2261898FA051015728E5A8AAAC42DAD33170D04507A33\
    A85521ABDF1CBA64ECFB850458DBEF0A8AEA71575D060C7DB3970F85A6E1E4C7\
    ABF5AE8CDB0933D71E8C94E04A25619DCEE3D2261AD2EE6BF12FFA06D98A0864\
    D87602733EC86A64521F2B18177B200CBBE117577A615D6C770988C0BAD946E2\
    08E24FA074E5AB3143DB5BFCE0FD108E4B82D120A93AD2CAFFFFFFFFFFFFFFFF";

const N_4096: &str = "\
    FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
    020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
    4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
    EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
    98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
    9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
    E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718\
    3995497CEA956AE515D2261898FA051015728E5A8AAAC42DAD33170D04507A33\
    A85521ABDF1CBA64ECFB850458DBEF0A8AEA71575D060C7DB3970F85A6E1E4C7\
    ABF5AE8CDB0933D71E8C94E04A25619DCEE3D2261AD2EE6BF12FFA06D98A0864\
    D87602733EC86A64521F2B18177B200CBBE117577A615D6C770988C0BAD946E2\
    08E24FA074E5AB3143DB5BFCE0FD108E4B82D120A92108011A723C12A787E6D7\
    88719A10BDBA5B2699C327186AF4E23C1A946834B6150BDA2583E9CA2AD44CE8\
    DBBBC2DB04DE8EF92E8EFC141FBECAA6287C59474E6BC05D99B2964FA090C3A2\
    233BA186515BE7ED1F612970CEE2D7AFB81BDD762170481CD0069127D5B05AA9\
    93B4EA988D8FDDC186FFB7DC90A6C08F4DF435C934063199FFFFFFFFFFFFFFFF";

const N_6144: &str = "\
    FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
    020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
    4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
    EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
    98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
    9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
    E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718\
    3995497CEA956AE515D2261898FA051015728E5A8AAAC42DAD33170D04507A33\
    A85521ABDF1CBA64ECFB850458DBEF0A8AEA71575D060C7DB3970F85A6E1E4C7\
    ABF5AE8CDB0933D71E8C94E04A25619DCEE3D2261AD2EE6BF12FFA06D98A0864\
    D87602733EC86A64521F2B18177B200CBBE117577A615D6C770988C0BAD946E2\
    08E24FA074E5AB3143DB5BFCE0FD108E4B82D120A92108011A723C12A787E6D7\
    88719A10BDBA5B2699C327186AF4E23C1A946834B6150BDA2583E9CA2AD44CE8\
    DBBBC2DB04DE8EF92E8EFC141FBECAA6287C59474E6BC05D99B2964FA090C3A2\
    233BA186515BE7ED1F612970CEE2D7AFB81BDD762170481CD0069127D5B05AA9\
    93B4EA988D8FDDC186FFB7DC90A6C08F4DF435C93402849236C3FAB4D27C7026\
    C1D4DCB2602646DEC9751E763DBA37BDF8FF9406AD9E530EE5DB382F413001AE\
    B06A53ED9027D831179727B0865A8918DA3EDBEBCF9B14ED44CE6CBACED4BB1B\
    DB7F1447E6CC254B332051512BD7AF426FB8F401378CD2BF5983CA01C64B92EC\
    F032EA15D1721D03F482D7CE6E74FEF6D55E702F46980C82B5A84031900B1C9E\
    59E7C97FBEC7E8F323A97A7E36CC88BE0F1D45B7FF585AC54BD407B22B4154AA\
    CC8F6D7EBF48E1D814CC5ED20F8037E0A79715EEF29BE32806A1D58BB7C5DA76\
    F550AA3D8A1FBFF0EB19CCB1A313D55CDA56C9EC2EF29632387FE8D76E3C0468\
    043E8F663F4860EE12BF2D5B0B7474D6E694F91E6DCC4024FFFFFFFFFFFFFFFF";

const N_8192: &str = "\
    FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
    020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
    4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
    EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
    98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
    9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
    E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718\
    3995497CEA956AE515D2261898FA051015728E5A8AAAC42DAD33170D04507A33\
    A85521ABDF1CBA64ECFB850458DBEF0A8AEA71575D060C7DB3970F85A6E1E4C7\
    ABF5AE8CDB0933D71E8C94E04A25619DCEE3D2261AD2EE6BF12FFA06D98A0864\
    D87602733EC86A64521F2B18177B200CBBE117577A615D6C770988C0BAD946E2\
    08E24FA074E5AB3143DB5BFCE0FD108E4B82D120A92108011A723C12A787E6D7\
    88719A10BDBA5B2699C327186AF4E23C1A946834B6150BDA2583E9CA2AD44CE8\
    DBBBC2DB04DE8EF92E8EFC141FBECAA6287C59474E6BC05D99B2964FA090C3A2\
    233BA186515BE7ED1F612970CEE2D7AFB81BDD762170481CD0069127D5B05AA9\
    93B4EA988D8FDDC186FFB7DC90A6C08F4DF435C93402849236C3FAB4D27C7026\
    C1D4DCB2602646DEC9751E763DBA37BDF8FF9406AD9E530EE5DB382F413001AE\
    B06A53ED9027D831179727B0865A8918DA3EDBEBCF9B14ED44CE6CBACED4BB1B\
    DB7F1447E6CC254B332051512BD7AF426FB8F401378CD2BF5983CA01C64B92EC\
    F032EA15D1721D03F482D7CE6E74FEF6D55E702F46980C82B5A84031900B1C9E\
    59E7C97FBEC7E8F323A97A7E36CC88BE0F1D45B7FF585AC54BD407B22B4154AA\
    CC8F6D7EBF48E1D814CC5ED20F8037E0A79715EEF29BE32806A1D58BB7C5DA76\
    F550AA3D8A1FBFF0EB19CCB1A313D55CDA56C9EC2EF29632387FE8D76E3C0468\
    043E8F663F4860EE12BF2D5B0B7474D6E694F91E6DBE115974A3926F12FEE5E4\
    38777CB6A932DF8CD8BEC4D073B931BA3BC832B68D9DD300741FA7BF8AFC47ED\
    2576F6936BA424663AAB639C5AE4F5683423B4742BF1C978238F16CBE39D652D\
    E3FDB8BEFC848AD922222E04A4037C0713EB57A81A23F0C73473FC646CEA306B\
    4BCBC8862F8385DDFA9D4B7FA2C087E879683303ED5BDD3A062B3CF5B3A278A6\
    6D2A13F83F44F82DDF310EE074AB6A364597E899A0255DC164F31CC50846851D\
    F9AB48195DED7EA1B1D510BD7EE74D73FAF36BC31ECFA268359046F4EB879F92\
    4009438B481C6CD7889A002ED5EE382BC9190DA6FC026E479558E4475677E9AA\
    9E3050E2765694DFC81F56E880B96E7160C980DD98EDD3DFFFFFFFFFFFFFFFFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardGroup {
    G1024,
    G1536,
    G2048,
    G3072,
    G4096,
    G6144,
    G8192,
}

impl StandardGroup {
    pub const ALL: [StandardGroup; 7] = [
        StandardGroup::G1024,
        StandardGroup::G1536,
        StandardGroup::G2048,
        StandardGroup::G3072,
        StandardGroup::G4096,
        StandardGroup::G6144,
        StandardGroup::G8192,
    ];

    pub fn from_bits(bits: u32) -> Result<Self> {
        StandardGroup::ALL
            .into_iter()
            .find(|group| group.bits() == bits)
            .ok_or(SrpError::UnsupportedGroupSize(bits))
    }

    pub fn bits(&self) -> u32 {
        match self {
            StandardGroup::G1024 => 1024,
            StandardGroup::G1536 => 1536,
            StandardGroup::G2048 => 2048,
            StandardGroup::G3072 => 3072,
            StandardGroup::G4096 => 4096,
            StandardGroup::G6144 => 6144,
            StandardGroup::G8192 => 8192,
        }
    }

    pub fn generator(&self) -> u32 {
        match self {
            StandardGroup::G1024 | StandardGroup::G1536 | StandardGroup::G2048 => 2,
            StandardGroup::G3072 | StandardGroup::G4096 | StandardGroup::G6144 => 5,
            StandardGroup::G8192 => 19,
        }
    }

    pub fn modulus(&self) -> BigUint {
        let hex = match self {
            StandardGroup::G1024 => N_1024,
            StandardGroup::G1536 => N_1536,
            StandardGroup::G2048 => N_2048,
            StandardGroup::G3072 => N_3072,
            StandardGroup::G4096 => N_4096,
            StandardGroup::G6144 => N_6144,
            StandardGroup::G8192 => N_8192,
        };
        codec::parse_hex(hex).expect("standard group moduli are valid hex")
    }
}

/// Immutable parameters shared by every session of one deployment.
///
/// Nothing mutates a `GroupParams` after construction, so one value can be
/// borrowed by any number of sessions on any number of threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupParams {
    n: BigUint,
    g: BigUint,
    hash: HashAlgorithm,
    n_len: usize,
    k: BigUint,
    standard: Option<StandardGroup>,
}

impl GroupParams {
    /// One of the RFC 5054 groups, selected by modulus size.
    pub fn standard(bits: u32, hash: HashAlgorithm) -> Result<Self> {
        Ok(Self::from_standard(StandardGroup::from_bits(bits)?, hash))
    }

    pub fn from_standard(group: StandardGroup, hash: HashAlgorithm) -> Self {
        Self::build(
            group.modulus(),
            BigUint::from(group.generator()),
            hash,
            Some(group),
        )
    }

    /// `standard(RECOMMENDED_GROUP_BITS, RECOMMENDED_HASH)`.
    pub fn recommended() -> Self {
        Self::from_standard(StandardGroup::G2048, RECOMMENDED_HASH)
    }

    /// Builds parameters from a caller-supplied modulus and generator.
    ///
    /// `N` must be an odd probable prime of at least `MIN_MODULUS_BITS` bits
    /// and `1 < g < N - 1`. Whether `N` is a *safe* prime, and whether `g`
    /// generates a large subgroup, is not checked: that stays the caller's
    /// responsibility.
    pub fn custom(n_hex: &str, g: u32, hash: HashAlgorithm) -> Result<Self> {
        let n = codec::parse_hex(n_hex)?;
        Self::validated(n, BigUint::from(g), hash)
    }

    /// Parameters announced by a server in a standard Server Hello.
    ///
    /// A known RFC 5054 group is accepted directly, anything else goes
    /// through the same checks as `custom`.
    pub fn from_server_hello(n: &[u8], g: &[u8], hash: HashAlgorithm) -> Result<Self> {
        let n = codec::from_bytes_be(n);
        let g = codec::from_bytes_be(g);
        let known = StandardGroup::ALL.into_iter().find(|group| {
            BigUint::from(group.generator()) == g && group.modulus() == n
        });
        match known {
            Some(group) => Ok(Self::from_standard(group, hash)),
            None => Self::validated(n, g, hash),
        }
    }

    fn validated(n: BigUint, g: BigUint, hash: HashAlgorithm) -> Result<Self> {
        if n.bits() < MIN_MODULUS_BITS {
            return Err(SrpError::WeakGroupParameters(
                "modulus is shorter than 1024 bits",
            ));
        }
        if !n.bit(0) {
            return Err(SrpError::WeakGroupParameters("modulus is even"));
        }
        if g <= BigUint::one() {
            return Err(SrpError::WeakGroupParameters(
                "generator must be greater than 1",
            ));
        }
        if g >= &n - 1u32 {
            return Err(SrpError::WeakGroupParameters(
                "generator must be less than N - 1",
            ));
        }
        if !is_likely_prime(&n, &mut rand::thread_rng()) {
            return Err(SrpError::WeakGroupParameters("modulus is not prime"));
        }
        log::debug!("accepted custom {}-bit group", n.bits());
        Ok(Self::build(n, g, hash, None))
    }

    fn build(n: BigUint, g: BigUint, hash: HashAlgorithm, standard: Option<StandardGroup>) -> Self {
        let n_len = byte_len(&n);
        let k = compute_k(&n, &g, n_len, hash);
        Self {
            n,
            g,
            hash,
            n_len,
            k,
            standard,
        }
    }

    /// PAD(x): the big-endian bytes of `x` left-padded with zeros to the
    /// byte length of `N`. Every hash input that RFC 5054 pads goes through
    /// here. `x` must be less than `N`.
    pub fn pad(&self, x: &BigUint) -> Vec<u8> {
        pad_to(x, self.n_len)
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    /// The SRP-6a multiplier `k = H(N | PAD(g))`.
    pub fn k(&self) -> &BigUint {
        &self.k
    }

    /// Byte length of `N`, the width of PAD.
    pub fn modulus_len(&self) -> usize {
        self.n_len
    }

    pub fn bits(&self) -> u64 {
        self.n.bits()
    }

    pub fn standard_group(&self) -> Option<StandardGroup> {
        self.standard
    }
}
