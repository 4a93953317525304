//! src/noyau/complexe.rs
//!
//! Complexe = paire de Reel, arithmétique fermée sur le plan.
//!
//! Contrats :
//! - Invalide dès qu’une partie l’est (on normalise alors les deux parties).
//! - Une entrée réelle reste sur l’axe réel quand la fonction réelle existe
//!   (partie imaginaire exactement nulle, pas un bruit 1e-80).
//! - `raise` : seule la puissance fractionnaire d’un réel négatif dépend du
//!   mode complexe ; tout le reste est indépendant du contexte.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Signed;

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::contexte::Contexte;
use super::erreur::ResultatNoyau;
use super::jetons::lire_complexe;
use super::reel::{chiffres_puissance, Reel, GARDE};

#[derive(Clone, Debug, PartialEq)]
pub struct Complexe {
    re: Reel,
    im: Reel,
}

impl From<Reel> for Complexe {
    fn from(re: Reel) -> Self {
        Complexe::new(re, Reel::zero())
    }
}

impl From<i64> for Complexe {
    fn from(n: i64) -> Self {
        Complexe::from(Reel::from(n))
    }
}

impl Complexe {
    pub fn new(re: Reel, im: Reel) -> Self {
        if re.est_valide() && im.est_valide() {
            Self { re, im }
        } else {
            Self::invalide()
        }
    }

    pub fn invalide() -> Self {
        Self {
            re: Reel::Invalide,
            im: Reel::Invalide,
        }
    }

    pub fn zero() -> Self {
        Complexe::from(Reel::zero())
    }

    pub fn un() -> Self {
        Complexe::from(Reel::un())
    }

    /// L’unité imaginaire j.
    pub fn j() -> Self {
        Complexe::new(Reel::zero(), Reel::un())
    }

    pub fn lire(texte: &str) -> ResultatNoyau<Self> {
        let (re, im) = lire_complexe(texte)?;
        Ok(Complexe::new(Reel::from(re), Reel::from(im)))
    }

    pub fn depuis_texte(texte: &str) -> Self {
        match Self::lire(texte) {
            Ok(z) => z,
            Err(e) => {
                tracing::debug!(cause = %e, "complexe invalide");
                Self::invalide()
            }
        }
    }

    /* ------------------------ Observateurs ------------------------ */

    pub fn re(&self) -> &Reel {
        &self.re
    }

    pub fn im(&self) -> &Reel {
        &self.im
    }

    pub fn est_valide(&self) -> bool {
        self.re.est_valide() && self.im.est_valide()
    }

    /// Partie imaginaire exactement nulle.
    pub fn est_reel(&self) -> bool {
        self.im.est_zero()
    }

    pub fn est_zero(&self) -> bool {
        self.re.est_zero() && self.im.est_zero()
    }

    /* ------------------------ Projections ------------------------ */

    pub fn real(&self) -> Complexe {
        Complexe::from(self.re.clone())
    }

    pub fn imag(&self) -> Complexe {
        Complexe::from(self.im.clone())
    }

    pub fn conj(&self) -> Complexe {
        Complexe::new(self.re.clone(), -&self.im)
    }

    /// Module |z| = √(re² + im²), réel positif.
    pub fn abs(&self, precision: usize) -> Reel {
        if !self.est_valide() {
            return Reel::Invalide;
        }
        if self.im.est_zero() {
            return self.re.abs();
        }
        if self.re.est_zero() {
            return self.im.abs();
        }
        self.norme2().sqrt(precision)
    }

    /// re² + im², exact.
    fn norme2(&self) -> Reel {
        &self.re.carre() + &self.im.carre()
    }

    /// Argument principal, dans (-π, π].
    pub fn arg(&self, precision: usize) -> Reel {
        Reel::atan2(&self.im, &self.re, precision)
    }

    fn borne(self, precision: usize) -> Complexe {
        let n = precision + GARDE;
        Complexe::new(
            self.re.arrondi_significatif(n),
            self.im.arrondi_significatif(n),
        )
    }

    /* ------------------------ Puissances / racines ------------------------ */

    /// z^n, n entier (négatif : inverse, invalide sur 0) ; exact tant que les
    /// parties restent courtes, bornées ensuite comme `Reel::powi`.
    pub fn powi(&self, n: &BigInt, precision: usize) -> Complexe {
        if !self.est_valide() {
            return Complexe::invalide();
        }
        if self.est_reel() {
            return Complexe::from(self.re.powi(n, precision));
        }
        if n.is_negative() {
            return &Complexe::un() / &self.powi(&-n, precision);
        }

        let chiffres = chiffres_puissance(precision, n);
        let mut e = n.clone();
        let mut acc = Complexe::un();
        let mut b = self.clone();
        let deux = BigInt::from(2);
        while e.is_positive() {
            if e.is_odd() {
                acc = (&acc * &b).borner(chiffres);
            }
            e /= &deux;
            if e.is_positive() {
                b = (&b * &b).borner(chiffres);
            }
        }
        acc
    }

    fn borner(&self, chiffres: usize) -> Complexe {
        Complexe::new(self.re.borner(chiffres), self.im.borner(chiffres))
    }

    /// Racine carrée, branche principale (Re >= 0, coupure sur l’axe réel négatif).
    pub fn sqrt(&self, precision: usize) -> Complexe {
        if !self.est_valide() {
            return Complexe::invalide();
        }
        if self.est_reel() {
            return if self.re.est_negatif() {
                Complexe::new(Reel::zero(), (-&self.re).sqrt(precision))
            } else {
                Complexe::from(self.re.sqrt(precision))
            };
        }

        let r = self.abs(precision);
        let deux = Reel::from(2);
        let re = ((&r + &self.re) / deux.clone()).sqrt(precision);
        let im = ((&r - &self.re) / deux).sqrt(precision);
        let im = if self.im.est_negatif() { -im } else { im };
        Complexe::new(re, im)
    }

    /// Racine cubique : réelle pour une entrée réelle (quel que soit le mode),
    /// branche principale sinon.
    pub fn cbrt(&self, precision: usize) -> Complexe {
        if !self.est_valide() {
            return Complexe::invalide();
        }
        if self.est_reel() {
            return Complexe::from(self.re.cbrt(precision));
        }
        (&self.ln(precision) / &Complexe::from(3)).exp(precision)
    }

    /// Puissance générale base^exposant.
    pub fn raise(&self, exposant: &Complexe, ctx: &Contexte) -> Complexe {
        if !self.est_valide() || !exposant.est_valide() {
            return Complexe::invalide();
        }
        let p = ctx.precision_travail();

        // exposant entier : multiplications répétées (exactes tant que courtes)
        if exposant.est_reel() {
            if let Some(n) = exposant.re.vers_entier() {
                return self.powi(&n, p);
            }
        }

        if self.est_zero() {
            return if exposant.re.est_positif() {
                Complexe::zero()
            } else {
                Complexe::invalide()
            };
        }

        if self.est_reel() && exposant.est_reel() {
            // base réelle positive : branche réelle, sans ambiguïté
            if self.re.est_positif() {
                return Complexe::from(self.re.pow(&exposant.re, p));
            }

            // base réelle négative, exposant p/q avec q impair : racine réelle (mode réel)
            if !ctx.mode_complexe {
                if let Some((num, den)) = exposant.re.fraction() {
                    if den.is_odd() {
                        let module = (-&self.re).pow(&exposant.re, p);
                        let module = if num.is_odd() { -module } else { module };
                        return Complexe::from(module);
                    }
                }
            }
        }

        // branche principale : exp(w · Log z)
        (exposant * &self.ln(p)).exp(p)
    }

    /* ------------------------ Exponentielle / logarithme ------------------------ */

    pub fn exp(&self, precision: usize) -> Complexe {
        if !self.est_valide() {
            return Complexe::invalide();
        }
        let module = self.re.exp(precision);
        if self.est_reel() {
            return Complexe::from(module);
        }
        let (s, c) = self.im.sin_cos(precision);
        Complexe::new(&module * &c, &module * &s).borne(precision)
    }

    /// Log principal : ln|z| + j·arg z. Invalide sur 0.
    pub fn ln(&self, precision: usize) -> Complexe {
        if !self.est_valide() || self.est_zero() {
            return Complexe::invalide();
        }
        if self.est_reel() && self.re.est_positif() {
            return Complexe::from(self.re.ln(precision));
        }
        // ln|z| = ln(re² + im²) / 2, sans passer par la racine
        let re = self.norme2().ln(precision) / Reel::from(2);
        Complexe::new(re, self.arg(precision))
    }

    /* ------------------------ Trigonométrie ------------------------ */

    /// (cosh b, sinh b) pour b réel.
    fn ch_sh(b: &Reel, precision: usize) -> (Reel, Reel) {
        let e = b.exp(precision);
        let e_inv = &Reel::un() / &e;
        let deux = Reel::from(2);
        (
            (&e + &e_inv) / deux.clone(),
            (&e - &e_inv) / deux,
        )
    }

    pub fn sin(&self, precision: usize) -> Complexe {
        if !self.est_valide() {
            return Complexe::invalide();
        }
        if self.est_reel() {
            return Complexe::from(self.re.sin(precision));
        }
        let (s, c) = self.re.sin_cos(precision);
        let (ch, sh) = Self::ch_sh(&self.im, precision);
        Complexe::new(&s * &ch, &c * &sh).borne(precision)
    }

    pub fn cos(&self, precision: usize) -> Complexe {
        if !self.est_valide() {
            return Complexe::invalide();
        }
        if self.est_reel() {
            return Complexe::from(self.re.cos(precision));
        }
        let (s, c) = self.re.sin_cos(precision);
        let (ch, sh) = Self::ch_sh(&self.im, precision);
        Complexe::new(&c * &ch, -(&s * &sh)).borne(precision)
    }

    pub fn tan(&self, precision: usize) -> Complexe {
        (&self.sin(precision) / &self.cos(precision)).borne(precision)
    }

    pub fn sinh(&self, precision: usize) -> Complexe {
        let e = self.exp(precision);
        let e_inv = &Complexe::un() / &e;
        (&(&e - &e_inv) / &Complexe::from(2)).borne(precision)
    }

    pub fn cosh(&self, precision: usize) -> Complexe {
        let e = self.exp(precision);
        let e_inv = &Complexe::un() / &e;
        (&(&e + &e_inv) / &Complexe::from(2)).borne(precision)
    }

    pub fn tanh(&self, precision: usize) -> Complexe {
        (&self.sinh(precision) / &self.cosh(precision)).borne(precision)
    }

    /// |x| <= 1 pour un réel : la fonction réelle existe.
    fn dans_intervalle_unite(&self) -> bool {
        self.est_reel() && self.re.abs() <= Reel::un()
    }

    /// asin z = -j · ln(jz + √(1 - z²))
    pub fn asin(&self, precision: usize) -> Complexe {
        if !self.est_valide() {
            return Complexe::invalide();
        }
        if self.dans_intervalle_unite() {
            let c = (&Reel::un() - &self.re.carre()).sqrt(precision);
            return Complexe::from(Reel::atan2(&self.re, &c, precision));
        }
        let j = Complexe::j();
        let racine = (&Complexe::un() - &(self * self)).sqrt(precision);
        let l = (&(&j * self) + &racine).ln(precision);
        (-&(&j * &l)).borne(precision)
    }

    /// acos z = π/2 - asin z
    pub fn acos(&self, precision: usize) -> Complexe {
        let demi_pi = Complexe::from(Reel::pi(precision) / Reel::from(2));
        (&demi_pi - &self.asin(precision)).borne(precision)
    }

    /// atan z = (j/2) · (ln(1 - jz) - ln(1 + jz)) ; invalide en ±j.
    pub fn atan(&self, precision: usize) -> Complexe {
        if !self.est_valide() {
            return Complexe::invalide();
        }
        if self.est_reel() {
            return Complexe::from(self.re.atan(precision));
        }
        let j = Complexe::j();
        let jz = &j * self;
        let a = (&Complexe::un() - &jz).ln(precision);
        let b = (&Complexe::un() + &jz).ln(precision);
        let demi_j = Complexe::new(Reel::zero(), Reel::rationnel(1, 2));
        (&demi_j * &(&a - &b)).borne(precision)
    }
}

/* ------------------------ Opérateurs ------------------------ */

impl<'a> Add<&'a Complexe> for &'a Complexe {
    type Output = Complexe;
    fn add(self, rhs: &'a Complexe) -> Complexe {
        Complexe::new(&self.re + &rhs.re, &self.im + &rhs.im)
    }
}

impl<'a> Sub<&'a Complexe> for &'a Complexe {
    type Output = Complexe;
    fn sub(self, rhs: &'a Complexe) -> Complexe {
        Complexe::new(&self.re - &rhs.re, &self.im - &rhs.im)
    }
}

impl<'a> Mul<&'a Complexe> for &'a Complexe {
    type Output = Complexe;
    fn mul(self, rhs: &'a Complexe) -> Complexe {
        // (a+bj)(c+dj) = (ac - bd) + (ad + bc)j
        let (a, b, c, d) = (&self.re, &self.im, &rhs.re, &rhs.im);
        Complexe::new(&(a * c) - &(b * d), &(a * d) + &(b * c))
    }
}

impl<'a> Div<&'a Complexe> for &'a Complexe {
    type Output = Complexe;
    fn div(self, rhs: &'a Complexe) -> Complexe {
        // (a+bj)/(c+dj) = ((ac + bd) + (bc - ad)j) / (c² + d²)
        let (a, b, c, d) = (&self.re, &self.im, &rhs.re, &rhs.im);
        let n = rhs.norme2();
        if n.est_zero() {
            return Complexe::invalide();
        }
        Complexe::new(
            &(&(a * c) + &(b * d)) / &n,
            &(&(b * c) - &(a * d)) / &n,
        )
    }
}

impl Add for Complexe {
    type Output = Complexe;
    fn add(self, rhs: Complexe) -> Complexe {
        &self + &rhs
    }
}

impl Sub for Complexe {
    type Output = Complexe;
    fn sub(self, rhs: Complexe) -> Complexe {
        &self - &rhs
    }
}

impl Mul for Complexe {
    type Output = Complexe;
    fn mul(self, rhs: Complexe) -> Complexe {
        &self * &rhs
    }
}

impl Div for Complexe {
    type Output = Complexe;
    fn div(self, rhs: Complexe) -> Complexe {
        &self / &rhs
    }
}

impl Neg for &Complexe {
    type Output = Complexe;
    fn neg(self) -> Complexe {
        Complexe::new(-&self.re, -&self.im)
    }
}

impl Neg for Complexe {
    type Output = Complexe;
    fn neg(self) -> Complexe {
        -&self
    }
}
