//! GF(256) arithmetic and Reed–Solomon error correction for ECC200
//! (Stage 3, spec.md §4.8), over the primitive polynomial `0x12D`
//! (x⁸+x⁵+x³+x²+1) with generator `α=2`.

/// The ECC200 primitive polynomial, x⁸+x⁵+x³+x²+1.
const PRIMITIVE_POLY: u16 = 0x12D;
/// The field's multiplicative generator.
const GENERATOR: u8 = 2;

/// Precomputed `exp`/`log` tables for GF(256) multiplication without
/// per-call polynomial reduction.
struct Tables {
    exp: [u8; 512],
    log: [u8; 256],
}

fn build_tables() -> Tables {
    let mut exp = [0u8; 512];
    let mut log = [0u8; 256];

    let mut x: u16 = 1;
    for i in 0..255usize {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
    }
    // duplicate the cycle so exp[i] for i in 255..510 avoids a modulo
    for i in 255..512 {
        exp[i] = exp[i - 255];
    }
    Tables { exp, log }
}

thread_local! {
    static TABLES: Tables = build_tables();
}

/// Multiplies two GF(256) elements.
#[must_use]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    TABLES.with(|t| {
        let sum = usize::from(t.log[a as usize]) + usize::from(t.log[b as usize]);
        t.exp[sum]
    })
}

/// Raises the field generator (`α=2`) to the given power.
#[must_use]
pub fn pow_generator(exponent: u16) -> u8 {
    TABLES.with(|t| t.exp[(exponent as usize) % 255])
}

/// Returns the multiplicative inverse of a nonzero GF(256) element.
///
/// # Panics
///
/// Panics if `a == 0`, which has no inverse.
#[must_use]
pub fn inverse(a: u8) -> u8 {
    assert_ne!(a, 0, "0 has no multiplicative inverse in GF(256)");
    TABLES.with(|t| t.exp[255 - usize::from(t.log[a as usize])])
}

/// Multiplies two polynomials over GF(256), coefficients ordered from
/// highest to lowest degree.
fn poly_mul(p: &[u8], q: &[u8]) -> Vec<u8> {
    let mut result = vec![0u8; p.len() + q.len() - 1];
    for (i, &pc) in p.iter().enumerate() {
        if pc == 0 {
            continue;
        }
        for (j, &qc) in q.iter().enumerate() {
            result[i + j] ^= mul(pc, qc);
        }
    }
    result
}

/// Builds the degree-`n_ecc` ECC200 generator polynomial, with roots at
/// `α^1, α^2, ..., α^n_ecc` (coefficients highest-degree first, monic).
#[must_use]
pub fn generator_polynomial(n_ecc: usize) -> Vec<u8> {
    let mut g = vec![1u8];
    for i in 1..=n_ecc {
        let root = pow_generator(i as u16);
        g = poly_mul(&g, &[1, root]);
    }
    g
}

/// Computes `n_ecc` Reed–Solomon error-correction codewords for `data`
/// via polynomial long division by the generator polynomial.
#[must_use]
pub fn compute_ecc(data: &[u8], n_ecc: usize) -> Vec<u8> {
    let generator = generator_polynomial(n_ecc);
    let mut remainder = vec![0u8; data.len() + n_ecc];
    remainder[..data.len()].copy_from_slice(data);

    for i in 0..data.len() {
        let coef = remainder[i];
        if coef == 0 {
            continue;
        }
        for (j, &g) in generator.iter().enumerate() {
            remainder[i + j] ^= mul(g, coef);
        }
    }
    remainder[data.len()..].to_vec()
}

/// Evaluates a polynomial (highest-degree-first coefficients) at `x`
/// using Horner's method over GF(256).
fn poly_eval(poly: &[u8], x: u8) -> u8 {
    poly.iter().fold(0u8, |acc, &c| mul(acc, x) ^ c)
}
