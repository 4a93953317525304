//! src/noyau/reel.rs
//!
//! Réel exact à précision arbitraire, avec un état invalide explicite.
//!
//! Contrats :
//! - Add/Sub/Mul/Div et comparaisons sont exacts (BigRational).
//! - Toute opération avec un opérande invalide rend invalide.
//! - Deux invalides ne sont jamais égaux (ni à eux-mêmes).
//! - round/trunc travaillent sur la représentation décimale exacte,
//!   jamais sur une approximation binaire.
//! - Les fonctions transcendantes rendent un rationnel sur une grille 10^-n,
//!   n = précision de travail + GARDE.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::echelle::{
    atan_scaled, exp_rationnel, exposant10, ln_scaled, pi_scaled_cached, pow10, pow10_rationnel,
    racine_scaled, scaled_rational, sin_cos_scaled,
};
use super::erreur::ResultatNoyau;
use super::jetons::lire_rationnel;

/// Chiffres de garde ajoutés à la précision de travail dans les noyaux.
pub const GARDE: usize = 15;

/// Plus grand dénominateur (et numérateur) traité par racine exacte dans `pow`.
const RACINE_MAX: u32 = 64;

/// Ordre de grandeur décimal maximal d’une puissance entière, et nombre
/// maximal de décimales d’un arrondi.
pub const MAGNITUDE_MAX: i64 = 10_000;

#[derive(Clone, Debug)]
pub enum Reel {
    Valide(BigRational),
    Invalide,
}

impl PartialEq for Reel {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Reel::Valide(a), Reel::Valide(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Reel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Reel::Valide(a), Reel::Valide(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<i64> for Reel {
    fn from(n: i64) -> Self {
        Reel::Valide(BigRational::from_integer(BigInt::from(n)))
    }
}

impl From<BigInt> for Reel {
    fn from(n: BigInt) -> Self {
        Reel::Valide(BigRational::from_integer(n))
    }
}

impl From<BigRational> for Reel {
    fn from(r: BigRational) -> Self {
        Reel::Valide(r)
    }
}

/// Affichage brut (debug / traces) : fraction exacte.
impl fmt::Display for Reel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reel::Valide(r) => write!(f, "{r}"),
            Reel::Invalide => write!(f, "NaN"),
        }
    }
}

fn n_chiffres(precision: usize) -> usize {
    precision + GARDE
}

/// Chiffres gardés par une puissance entière : l’erreur d’arrondi croît comme n.
pub(crate) fn chiffres_puissance(precision: usize, n: &BigInt) -> usize {
    n_chiffres(precision) + n.magnitude().to_str_radix(10).len()
}

impl Reel {
    /* ------------------------ Construction ------------------------ */

    pub fn zero() -> Self {
        Reel::Valide(BigRational::zero())
    }

    pub fn un() -> Self {
        Reel::Valide(BigRational::one())
    }

    pub fn rationnel(num: i64, den: i64) -> Self {
        if den == 0 {
            return Reel::Invalide;
        }
        Reel::Valide(BigRational::new(BigInt::from(num), BigInt::from(den)))
    }

    /// Lecture stricte : l’erreur reste typée.
    pub fn lire(texte: &str) -> ResultatNoyau<Self> {
        lire_rationnel(texte).map(Reel::Valide)
    }

    /// Lecture tolérante : un littéral malformé devient invalide.
    pub fn depuis_texte(texte: &str) -> Self {
        match Self::lire(texte) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(cause = %e, "réel invalide");
                Reel::Invalide
            }
        }
    }

    /* ------------------------ Observateurs ------------------------ */

    pub fn est_valide(&self) -> bool {
        matches!(self, Reel::Valide(_))
    }

    pub fn valeur(&self) -> Option<&BigRational> {
        match self {
            Reel::Valide(r) => Some(r),
            Reel::Invalide => None,
        }
    }

    pub fn est_zero(&self) -> bool {
        matches!(self, Reel::Valide(r) if r.is_zero())
    }

    pub fn est_negatif(&self) -> bool {
        matches!(self, Reel::Valide(r) if r.is_negative())
    }

    pub fn est_positif(&self) -> bool {
        matches!(self, Reel::Valide(r) if r.is_positive())
    }

    pub fn est_entier(&self) -> bool {
        matches!(self, Reel::Valide(r) if r.is_integer())
    }

    pub fn vers_entier(&self) -> Option<BigInt> {
        match self {
            Reel::Valide(r) if r.is_integer() => Some(r.to_integer()),
            _ => None,
        }
    }

    /// Forme p/q réduite (q > 0), si valide.
    pub fn fraction(&self) -> Option<(BigInt, BigInt)> {
        self.valeur().map(|r| (r.numer().clone(), r.denom().clone()))
    }

    /// Comparaison exacte ; None si un opérande est invalide.
    pub fn comparer(&self, other: &Reel) -> Option<Ordering> {
        self.partial_cmp(other)
    }

    /* ------------------------ Opérations exactes ------------------------ */

    fn map(&self, f: impl FnOnce(&BigRational) -> BigRational) -> Reel {
        match self {
            Reel::Valide(r) => Reel::Valide(f(r)),
            Reel::Invalide => Reel::Invalide,
        }
    }

    pub fn abs(&self) -> Reel {
        self.map(|r| r.abs())
    }

    /// -1, 0 ou 1.
    pub fn signe(&self) -> Reel {
        self.map(|r| r.signum())
    }

    pub fn carre(&self) -> Reel {
        self.map(|r| r * r)
    }

    /// Puissance entière (exposant négatif : inverse, invalide sur 0).
    /// Exacte tant que les termes restent courts ; au-delà, chaque produit est
    /// arrondi à la précision de travail plus les chiffres de n.
    pub fn powi(&self, n: &BigInt, precision: usize) -> Reel {
        let r = match self {
            Reel::Valide(r) => r,
            Reel::Invalide => return Reel::Invalide,
        };
        if n.is_negative() && r.is_zero() {
            return Reel::Invalide;
        }

        // exponentiation rapide sur |n|
        let chiffres = chiffres_puissance(precision, n);
        let mut e = n.abs();
        let mut acc = Reel::un();
        let mut b = self.clone();
        let deux = BigInt::from(2);
        while !e.is_zero() {
            if e.is_odd() {
                acc = (&acc * &b).borner(chiffres);
            }
            e /= &deux;
            if !e.is_zero() {
                b = (&b * &b).borner(chiffres);
            }
        }

        if n.is_negative() {
            &Reel::un() / &acc
        } else {
            acc
        }
    }

    /// Arrondi à `chiffres` significatifs dès que numérateur ou dénominateur
    /// dépasse cette taille ; invalide au-delà de 10^±MAGNITUDE_MAX.
    pub fn borner(&self, chiffres: usize) -> Reel {
        let r = match self {
            Reel::Valide(r) => r,
            Reel::Invalide => return Reel::Invalide,
        };
        let seuil = 4 * chiffres as u64;
        if r.numer().bits() <= seuil && r.denom().bits() <= seuil {
            return self.clone();
        }
        let e = exposant10(r);
        if e.abs() > MAGNITUDE_MAX {
            tracing::debug!(exposant = e, "puissance hors bornes");
            return Reel::Invalide;
        }
        self.arrondi_significatif(chiffres)
    }

    /// round(x, n) : n chiffres fractionnaires, moitié loin de zéro.
    /// n négatif : arrondi aux dizaines, centaines, ...
    pub fn round(&self, n: i64) -> Reel {
        self.a_l_echelle(n, BigRational::round)
    }

    /// trunc(x, n) : troncature vers zéro à n chiffres fractionnaires.
    pub fn trunc(&self, n: i64) -> Reel {
        self.a_l_echelle(n, BigRational::trunc)
    }

    /// f(x · 10^n) / 10^n, sans construire 10^n quand le résultat est connu :
    /// nul si 10^-n dépasse |x| d’un facteur 10, x lui-même si son
    /// développement décimal s’arrête avant n chiffres.
    fn a_l_echelle(&self, n: i64, f: impl Fn(&BigRational) -> BigRational) -> Reel {
        self.map(|r| {
            if r.is_zero() {
                return r.clone();
            }
            if n < 0 && n.unsigned_abs() > (exposant10(r) + 1).max(0) as u64 {
                return BigRational::zero();
            }
            let bits = r.denom().bits();
            if n > 0 && n as u64 > bits && (pow10(bits as usize) % r.denom()).is_zero() {
                return r.clone();
            }
            let echelle = pow10_rationnel(n.min(MAGNITUDE_MAX));
            f(&(r * &echelle)) / &echelle
        })
    }

    pub fn floor(&self) -> Reel {
        self.map(|r| r.floor())
    }

    pub fn ceil(&self) -> Reel {
        self.map(|r| r.ceil())
    }

    /// Arrondi à `chiffres` chiffres significatifs (borne la taille des rationnels).
    pub fn arrondi_significatif(&self, chiffres: usize) -> Reel {
        self.map(|r| {
            if r.is_zero() {
                return r.clone();
            }
            let e = exposant10(r);
            let f = pow10_rationnel(chiffres as i64 - 1 - e);
            (r * &f).round() / &f
        })
    }

    /* ------------------------ Transcendantes (précision de travail) ------------------------ */

    pub fn pi(precision: usize) -> Reel {
        let n = n_chiffres(precision);
        Reel::Valide(scaled_rational(pi_scaled_cached(n), n))
    }

    /// √x, x >= 0 (invalide sinon). Exacte sur les carrés parfaits.
    pub fn sqrt(&self, precision: usize) -> Reel {
        match self {
            Reel::Valide(r) if !r.is_negative() => {
                let n = n_chiffres(precision);
                Reel::Valide(scaled_rational(racine_scaled(r, 2, n), n))
            }
            _ => Reel::Invalide,
        }
    }

    /// Racine cubique réelle, de signe celui de x.
    pub fn cbrt(&self, precision: usize) -> Reel {
        match self {
            Reel::Valide(r) => {
                let n = n_chiffres(precision);
                let s = scaled_rational(racine_scaled(&r.abs(), 3, n), n);
                Reel::Valide(if r.is_negative() { -s } else { s })
            }
            Reel::Invalide => Reel::Invalide,
        }
    }

    pub fn exp(&self, precision: usize) -> Reel {
        match self {
            Reel::Valide(r) => match exp_rationnel(r, n_chiffres(precision)) {
                Some(e) => Reel::Valide(e).arrondi_significatif(n_chiffres(precision)),
                None => Reel::Invalide,
            },
            Reel::Invalide => Reel::Invalide,
        }
    }

    /// ln x, x > 0 (invalide sinon).
    pub fn ln(&self, precision: usize) -> Reel {
        let n = n_chiffres(precision);
        match self.valeur().and_then(|r| ln_scaled(r, n)) {
            Some(s) => Reel::Valide(scaled_rational(s, n)),
            None => Reel::Invalide,
        }
    }

    pub fn sin_cos(&self, precision: usize) -> (Reel, Reel) {
        match self {
            Reel::Valide(r) => {
                let n = n_chiffres(precision);
                let (s, c) = sin_cos_scaled(r, n);
                (
                    Reel::Valide(scaled_rational(s, n)),
                    Reel::Valide(scaled_rational(c, n)),
                )
            }
            Reel::Invalide => (Reel::Invalide, Reel::Invalide),
        }
    }

    pub fn sin(&self, precision: usize) -> Reel {
        self.sin_cos(precision).0
    }

    pub fn cos(&self, precision: usize) -> Reel {
        self.sin_cos(precision).1
    }

    pub fn atan(&self, precision: usize) -> Reel {
        let n = n_chiffres(precision);
        self.map(|r| scaled_rational(atan_scaled(r, n), n))
    }

    /// atan2(y, x) dans (-π, π] ; atan2(0, 0) = 0.
    pub fn atan2(y: &Reel, x: &Reel, precision: usize) -> Reel {
        let (yv, xv) = match (y.valeur(), x.valeur()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Reel::Invalide,
        };
        let pi = Reel::pi(precision);

        if xv.is_zero() {
            return match yv.cmp(&BigRational::zero()) {
                Ordering::Greater => pi / Reel::from(2),
                Ordering::Less => -(pi / Reel::from(2)),
                Ordering::Equal => Reel::zero(),
            };
        }

        let base = Reel::Valide(yv / xv).atan(precision);
        if xv.is_positive() {
            base
        } else if yv.is_negative() {
            base - pi
        } else {
            base + pi
        }
    }

    /// x^y réel pour x > 0. Invalide sinon.
    /// y = p/q petit : racine q-ième puis puissance p (exact sur les puissances parfaites) ;
    /// sinon exp(y ln x).
    pub fn pow(&self, y: &Reel, precision: usize) -> Reel {
        let (x, (p, q)) = match (self.valeur(), y.fraction()) {
            (Some(x), Some(pq)) if x.is_positive() => (x, pq),
            _ => return Reel::Invalide,
        };

        if let (Some(p), Some(q)) = (p.to_i64(), q.to_u32()) {
            if q <= RACINE_MAX && p.unsigned_abs() <= RACINE_MAX as u64 {
                let n = n_chiffres(precision);
                let racine = racine_scaled(x, q, n);
                // x minuscule : la racine en virgule fixe perdrait ses chiffres
                if racine >= pow10(precision) {
                    return Reel::Valide(scaled_rational(racine, n))
                        .powi(&BigInt::from(p), precision)
                        .arrondi_significatif(n);
                }
            }
        }

        let l = self.ln(precision);
        (y * &l).exp(precision)
    }
}

/* ------------------------ Opérateurs ------------------------ */

impl<'a> Add<&'a Reel> for &'a Reel {
    type Output = Reel;
    fn add(self, rhs: &'a Reel) -> Reel {
        match (self, rhs) {
            (Reel::Valide(a), Reel::Valide(b)) => Reel::Valide(a + b),
            _ => Reel::Invalide,
        }
    }
}

impl<'a> Sub<&'a Reel> for &'a Reel {
    type Output = Reel;
    fn sub(self, rhs: &'a Reel) -> Reel {
        match (self, rhs) {
            (Reel::Valide(a), Reel::Valide(b)) => Reel::Valide(a - b),
            _ => Reel::Invalide,
        }
    }
}

impl<'a> Mul<&'a Reel> for &'a Reel {
    type Output = Reel;
    fn mul(self, rhs: &'a Reel) -> Reel {
        match (self, rhs) {
            (Reel::Valide(a), Reel::Valide(b)) => Reel::Valide(a * b),
            _ => Reel::Invalide,
        }
    }
}

impl<'a> Div<&'a Reel> for &'a Reel {
    type Output = Reel;
    fn div(self, rhs: &'a Reel) -> Reel {
        match (self, rhs) {
            (Reel::Valide(_), Reel::Valide(b)) if b.is_zero() => Reel::Invalide,
            (Reel::Valide(a), Reel::Valide(b)) => Reel::Valide(a / b),
            _ => Reel::Invalide,
        }
    }
}

impl Add for Reel {
    type Output = Reel;
    fn add(self, rhs: Reel) -> Reel {
        &self + &rhs
    }
}

impl Sub for Reel {
    type Output = Reel;
    fn sub(self, rhs: Reel) -> Reel {
        &self - &rhs
    }
}

impl Mul for Reel {
    type Output = Reel;
    fn mul(self, rhs: Reel) -> Reel {
        &self * &rhs
    }
}

impl Div for Reel {
    type Output = Reel;
    fn div(self, rhs: Reel) -> Reel {
        &self / &rhs
    }
}

impl Neg for &Reel {
    type Output = Reel;
    fn neg(self) -> Reel {
        self.map(|r| -r)
    }
}

impl Neg for Reel {
    type Output = Reel;
    fn neg(self) -> Reel {
        -&self
    }
}
