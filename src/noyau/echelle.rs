// src/noyau/echelle.rs
//
// Noyaux “scalés” : entiers ×10^n (virgule fixe décimale), sans flottants.
// - π (Machin) et ln 2 (atanh) avec cache par nombre de chiffres
// - racine k-ième (plancher exact, donc exacte sur les puissances parfaites)
// - exp / ln / sin-cos / atan par séries, après réduction d’argument
//
// Convention : chaque noyau reçoit `digits` et rend un résultat juste à
// quelques unités du dernier chiffre près. Les couches du dessus (Reel)
// ajoutent leurs propres chiffres de garde.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Chiffres supplémentaires internes aux séries (erreurs de troncature).
const EXTRA: usize = 10;

/// Au-delà, exp() déborde : on refuse plutôt que de geler la machine.
pub const EXP_MAX: i64 = 100_000;

/* ------------------------ Décimal (scaled <-> rationnel) ------------------------ */

pub fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// 10^e en rationnel, e signé.
pub fn pow10_rationnel(e: i64) -> BigRational {
    let p = pow10(e.unsigned_abs() as usize);
    if e >= 0 {
        BigRational::from_integer(p)
    } else {
        BigRational::new(BigInt::one(), p)
    }
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal.
pub fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    if digits == 0 {
        return if neg {
            format!("-{int_part}")
        } else {
            format!("{int_part}")
        };
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    if neg {
        format!("-{int_part}.{frac}")
    } else {
        format!("{int_part}.{frac}")
    }
}

/// r -> entier “scalé” = trunc(r * 10^digits)
pub fn rational_scaled(r: &BigRational, digits: usize) -> BigInt {
    (r.numer() * pow10(digits)) / r.denom()
}

/// entier scalé -> rationnel exact (s / 10^digits)
pub fn scaled_rational(s: BigInt, digits: usize) -> BigRational {
    BigRational::new(s, pow10(digits))
}

/// Entier le plus proche de a/b (b > 0), moitiés vers +∞.
fn arrondi_div(a: &BigInt, b: &BigInt) -> BigInt {
    let deux = BigInt::from(2);
    (a * &deux + b).div_floor(&(b * &deux))
}

/// Exposant décimal e tel que 10^e <= |r| < 10^(e+1). r doit être non nul.
pub fn exposant10(r: &BigRational) -> i64 {
    let a = r.abs();
    let bits = a.numer().bits() as i64 - a.denom().bits() as i64;
    // estimation grossière (log10(2) ≈ 0.30103), puis ajustement exact
    let mut e = Integer::div_floor(&(bits * 30103), &100_000);
    loop {
        if a < pow10_rationnel(e) {
            e -= 1;
        } else if a >= pow10_rationnel(e + 1) {
            e += 1;
        } else {
            return e;
        }
    }
}

/* ------------------------ π (Machin) + ln 2 (atanh) + caches ------------------------ */

/// arctan(1/q) en entier scalé (troncature) via série:
/// atan(z) = z - z^3/3 + z^5/5 - ...
fn arctan_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    serie_inv_q_scaled(q, scale, true)
}

/// atanh(1/q) = z + z^3/3 + z^5/5 + ...
fn atanh_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    serie_inv_q_scaled(q, scale, false)
}

fn serie_inv_q_scaled(q: i64, scale: &BigInt, alterne: bool) -> BigInt {
    let q = BigInt::from(q);

    let mut k: usize = 0;
    let mut sign_pos = true;

    // q^(2k+1)
    let mut q_pow = q.clone();
    let mut sum = BigInt::zero();

    loop {
        let denom = BigInt::from((2 * k + 1) as i64);
        let d = &q_pow * &denom;

        let term = scale / &d;
        if term.is_zero() {
            break;
        }

        if sign_pos {
            sum += &term;
        } else {
            sum -= &term;
        }

        q_pow *= &q;
        q_pow *= &q;

        if alterne {
            sign_pos = !sign_pos;
        }
        k += 1;
    }

    sum
}

fn pi_scaled_compute(digits: usize) -> BigInt {
    let scale = pow10(digits + EXTRA);

    // Machin : π = 16*atan(1/5) - 4*atan(1/239)
    let a = arctan_inv_q_scaled(5, &scale);
    let b = arctan_inv_q_scaled(239, &scale);

    let pi = BigInt::from(16) * a - BigInt::from(4) * b;
    pi / pow10(EXTRA)
}

fn ln2_scaled_compute(digits: usize) -> BigInt {
    let scale = pow10(digits + EXTRA);

    // ln 2 = 2*atanh(1/3)
    let ln2 = BigInt::from(2) * atanh_inv_q_scaled(3, &scale);
    ln2 / pow10(EXTRA)
}

type Cache = OnceLock<Mutex<HashMap<usize, BigInt>>>;

static PI_CACHE: Cache = OnceLock::new();
static LN2_CACHE: Cache = OnceLock::new();

fn cached(cache: &'static Cache, nom: &str, digits: usize, calcul: fn(usize) -> BigInt) -> BigInt {
    let m = cache.get_or_init(|| Mutex::new(HashMap::new()));
    // un cache empoisonné reste cohérent : on ne l’écrit qu’avec des valeurs complètes
    let mut guard = m.lock().unwrap_or_else(|e| e.into_inner());

    if let Some(v) = guard.get(&digits) {
        return v.clone();
    }

    tracing::trace!(constante = nom, digits, "calcul (cache manquant)");
    let v = calcul(digits);
    guard.insert(digits, v.clone());
    v
}

pub fn pi_scaled_cached(digits: usize) -> BigInt {
    cached(&PI_CACHE, "pi", digits, pi_scaled_compute)
}

pub fn ln2_scaled_cached(digits: usize) -> BigInt {
    cached(&LN2_CACHE, "ln2", digits, ln2_scaled_compute)
}

/* ------------------------ Racines (plancher exact) ------------------------ */

/// floor( r^(1/k) * 10^digits ) pour r >= 0.
/// floor(floor(x)^(1/k)) == floor(x^(1/k)) : les puissances parfaites restent exactes.
pub fn racine_scaled(r: &BigRational, k: u32, digits: usize) -> BigInt {
    if r.is_zero() || r.is_negative() {
        return BigInt::zero();
    }
    let target = (r.numer() * pow10(k as usize * digits)) / r.denom();
    target.nth_root(k)
}

/* ------------------------ exp ------------------------ */

/// exp(x), rationnel à ~digits chiffres significatifs.
/// Réduction : x = k*ln2 + r, |r| <= ln2/2, puis exp(x) = 2^k * exp(r) (2^k exact).
/// None si |x| > EXP_MAX.
pub fn exp_rationnel(x: &BigRational, digits: usize) -> Option<BigRational> {
    if x.is_zero() {
        return Some(BigRational::one());
    }
    if x.abs() > BigRational::from_integer(BigInt::from(EXP_MAX)) {
        return None;
    }

    // k*ln2 : l’erreur sur ln2 est multipliée par |k| (<= 6 chiffres)
    let n2 = digits + EXTRA + 6;
    let scale = pow10(n2);
    let ln2 = ln2_scaled_cached(n2);

    let xs = rational_scaled(x, n2);
    let k = arrondi_div(&xs, &ln2);
    let r = xs - &k * &ln2;

    // Taylor : 1 + r + r^2/2! + ...
    let mut somme = scale.clone();
    let mut terme = scale.clone();
    let mut j: u32 = 1;
    loop {
        terme = (&terme * &r) / &scale / j;
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        j += 1;
    }

    let res = BigRational::new(somme, scale);
    let k = k.to_i64()?;
    let deux_k = BigRational::from_integer(BigInt::one() << k.unsigned_abs() as usize);
    Some(if k >= 0 { res * deux_k } else { res / deux_k })
}

/* ------------------------ ln ------------------------ */

/// ln(x) scalé (×10^digits) pour x > 0. None sinon.
/// Réduction : x = y * 2^k, y ∈ (1/2, 2), ln y = 2*atanh((y-1)/(y+1)).
pub fn ln_scaled(x: &BigRational, digits: usize) -> Option<BigInt> {
    if !x.is_positive() {
        return None;
    }

    let n2 = digits + EXTRA;
    let scale = pow10(n2);

    let k: i64 = x.numer().bits() as i64 - x.denom().bits() as i64;
    let deux_k = BigRational::from_integer(BigInt::one() << k.unsigned_abs() as usize);
    let y = if k >= 0 { x / &deux_k } else { x * &deux_k };

    let ys = rational_scaled(&y, n2);
    let z = (&ys - &scale) * &scale / (&ys + &scale);
    let z2 = &z * &z / &scale;

    // atanh(z) = z + z^3/3 + ...
    let mut p = z;
    let mut somme = BigInt::zero();
    let mut i: u32 = 0;
    loop {
        let t = &p / (2 * i + 1);
        if t.is_zero() {
            break;
        }
        somme += t;
        p = &p * &z2 / &scale;
        i += 1;
    }

    // k*ln2 avec 20 chiffres de plus (k tient sur 20 chiffres)
    let ln2 = ln2_scaled_cached(n2 + 20);
    let k_ln2 = BigInt::from(k) * ln2 / pow10(20);

    let total = BigInt::from(2) * somme + k_ln2;
    Some(total / pow10(EXTRA))
}

/* ------------------------ sin / cos ------------------------ */

/// (sin x, cos x) scalés (×10^digits). Réduction modulo 2π puis Taylor sur |r| <= π.
pub fn sin_cos_scaled(x: &BigRational, digits: usize) -> (BigInt, BigInt) {
    // la réduction consomme autant de chiffres que la partie entière de x
    let chiffres_entiers = x.abs().to_integer().to_str_radix(10).len();
    let n2 = digits + EXTRA + chiffres_entiers;
    let scale = pow10(n2);

    let deux_pi = pi_scaled_cached(n2) * 2;
    let xs = rational_scaled(x, n2);
    let m = arrondi_div(&xs, &deux_pi);
    let r = xs - m * &deux_pi;
    let r2 = &r * &r / &scale;

    // sin : r - r^3/3! + ...
    let mut sin = r.clone();
    let mut terme = r;
    let mut i: u32 = 1;
    loop {
        terme = -(&terme * &r2) / &scale / ((2 * i) * (2 * i + 1));
        if terme.is_zero() {
            break;
        }
        sin += &terme;
        i += 1;
    }

    // cos : 1 - r^2/2! + ...
    let mut cos = scale.clone();
    let mut terme = scale.clone();
    let mut i: u32 = 1;
    loop {
        terme = -(&terme * &r2) / &scale / ((2 * i - 1) * (2 * i));
        if terme.is_zero() {
            break;
        }
        cos += &terme;
        i += 1;
    }

    let reduction = pow10(n2 - digits);
    (sin / &reduction, cos / &reduction)
}

/* ------------------------ atan ------------------------ */

/// atan(x) scalé (×10^digits).
/// |x| > 1 : atan x = ±π/2 - atan(1/x). Sinon deux demi-angles puis série.
pub fn atan_scaled(x: &BigRational, digits: usize) -> BigInt {
    if x.is_zero() {
        return BigInt::zero();
    }
    let neg = x.is_negative();
    let ax = x.abs();

    let res = if ax > BigRational::one() {
        let demi_pi = pi_scaled_cached(digits) / 2;
        demi_pi - atan_scaled(&ax.recip(), digits)
    } else {
        let n2 = digits + EXTRA;
        let scale = pow10(n2);
        let scale2 = &scale * &scale;

        // a -> a / (1 + sqrt(1 + a^2)) : tan(θ/2), deux fois => |a| <= tan(π/16)
        let mut s = rational_scaled(&ax, n2);
        for _ in 0..2 {
            let t = (&scale2 + &s * &s).sqrt();
            s = &s * &scale / (&scale + t);
        }

        let s2 = &s * &s / &scale;
        let mut p = s;
        let mut somme = BigInt::zero();
        let mut i: u32 = 0;
        loop {
            let t = &p / (2 * i + 1);
            if t.is_zero() {
                break;
            }
            if i % 2 == 0 {
                somme += t;
            } else {
                somme -= t;
            }
            p = &p * &s2 / &scale;
            i += 1;
        }

        BigInt::from(4) * somme / pow10(EXTRA)
    };

    if neg {
        -res
    } else {
        res
    }
}
