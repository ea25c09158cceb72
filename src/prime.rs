// Probabilistic primality testing for caller-supplied group moduli.

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};

/// Rounds for moduli handed to us by a caller or a peer, which we treat as
/// adversarial. The chance of a composite passing is at most 4^-40.
pub const MILLER_RABIN_ROUNDS: u32 = 40;

const SMALL_ODD_PRIMES: [u32; 100] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401,
    409, 419, 421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509,
    521, 523, 541, 547,
];

pub fn is_likely_prime<R: RandBigInt + ?Sized>(candidate_prime: &BigUint, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    if candidate_prime < &two {
        return false;
    }
    if candidate_prime == &two {
        return true;
    }
    if !candidate_prime.bit(0) {
        return false;
    }

    for small_prime in SMALL_ODD_PRIMES {
        let x = BigUint::from(small_prime);
        if candidate_prime == &x {
            return true;
        }
        if (candidate_prime % &x).is_zero() {
            return false;
        }
    }

    miller_rabin(candidate_prime, MILLER_RABIN_ROUNDS, rng)
}

fn miller_rabin<R: RandBigInt + ?Sized>(
    candidate_prime: &BigUint,
    n_rounds: u32,
    rng: &mut R,
) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let n_minus_one = candidate_prime - &one;

    // n - 1 = d * 2^r with d odd.
    let r = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> r;

    'witness: for _ in 0..n_rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, candidate_prime);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..r {
            x = x.modpow(&two, candidate_prime);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    use num_traits::Num;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::rstest;

    #[rstest]
    #[case(BigUint::from(2u64))]
    #[case(BigUint::from(37u64))]
    #[case(BigUint::from(557u64))]
    #[case(BigUint::from(1_000_000_007u64))]
    #[case(BigUint::from_str_radix(
        "122918091607895345462109112013423411099284103879272281586\
        0819946412949055199827238447096054805339148543003066133719\
        9085275880150614723662649630584506204331", 10).unwrap())
    ]
    #[case(BigUint::from_str_radix(
            "ffffffffffffffffc90fdaa22168c234c4c6628b80dc1cd129024\
            e088a67cc74020bbea63b139b22514a08798e3404ddef9519b3cd\
            3a431b302b0a6df25f14374fe1356d6d51c245e485b576625e7ec\
            6f44c42e9a637ed6b0bff5cb6f406b7edee386bfb5a899fa5ae9f\
            24117c4b1fe649286651ece45b3dc2007cb8a163bf0598da48361\
            c55d39a69163fa8fd24cf5f83655d23dca3ad961c62f356208552\
            bb9ed529077096966d670c354e4abc9804f1746c08ca237327fff\
            fffffffffffff", 16).unwrap())]
    fn is_likely_prime_identifies_primes(#[case] prime: BigUint) {
        let mut rng = StdRng::from_seed([101; 32]);

        assert!(is_likely_prime(&prime, &mut rng));
    }

    #[rstest]
    #[case(BigUint::from(0u64))]
    #[case(BigUint::from(1u64))]
    #[case(BigUint::from(4u64))]
    #[case(BigUint::from(1024u64))]
    #[case(BigUint::from(1025u64))]
    // Carmichael numbers fool a plain Fermat test.
    #[case(BigUint::from(561u64))]
    #[case(BigUint::from(41041u64))]
    #[case(BigUint::from(1_000_000_007u64 * 998_244_353u64))]
    fn is_likely_prime_identifies_non_primes(#[case] non_prime: BigUint) {
        let mut rng = StdRng::from_seed([101; 32]);

        assert!(!is_likely_prime(&non_prime, &mut rng));
    }
}
