//! src/noyau/fonctions.rs
//!
//! Bibliothèque de fonctions sur les quantités.
//!
//! Contrats :
//! - Le contexte est lu à chaque appel (précision, mode complexe, mode angle).
//! - Fonctions “scalaires” (round, trunc, exp, sin...) : argument sans dimension
//!   exigé, sinon quantité invalide.
//! - abs / real / imag / conj conservent la dimension.
//! - sqrt / cbrt multiplient les exposants par 1/2, 1/3.
//! - raise : exposant sans dimension ; base dimensionnée => exposant rationnel
//!   borné (les exposants d’unité restent exacts et finis).

use num_rational::Rational64;
use num_traits::ToPrimitive;

use super::complexe::Complexe;
use super::contexte::{Contexte, ModeAngle};
use super::erreur::Erreur;
use super::quantite::Quantite;
use super::reel::Reel;

/// Plus grand dénominateur accepté pour l’exposant d’une base dimensionnée.
const DENOMINATEUR_MAX: i64 = 1_000_000;

/// Au-delà, lg/lb passent par les logarithmes approchés.
const LOG_ENTIER_MAX: i64 = 4096;

pub struct Fonctions<'c> {
    ctx: &'c Contexte,
}

impl<'c> Fonctions<'c> {
    pub fn new(ctx: &'c Contexte) -> Self {
        Self { ctx }
    }

    fn p(&self) -> usize {
        self.ctx.precision_travail()
    }

    /// Argument sans dimension, valeur neuve sans dimension.
    /// Un résultat invalide né d’un argument valide est tracé comme erreur de domaine.
    fn scalaire(
        &self,
        q: &Quantite,
        nom: &'static str,
        f: impl FnOnce(&Complexe) -> Complexe,
    ) -> Quantite {
        if !q.est_valide() {
            return Quantite::nan();
        }
        if !q.est_sans_dimension() {
            return Quantite::invalide(Erreur::domaine(nom));
        }
        let z = f(q.valeur());
        if !z.est_valide() {
            return Quantite::invalide(Erreur::domaine(nom));
        }
        Quantite::from(z)
    }

    /// Même chose, partie par partie sur des réels (round, trunc, floor, ceil).
    fn par_partie(&self, q: &Quantite, nom: &'static str, f: impl Fn(&Reel) -> Reel) -> Quantite {
        self.scalaire(q, nom, |z| Complexe::new(f(z.re()), f(z.im())))
    }

    /// Radians par unité d’angle du contexte (None en radians).
    fn facteur_angle(&self) -> Option<Complexe> {
        let diviseur = match self.ctx.mode_angle {
            ModeAngle::Radian => return None,
            ModeAngle::Degre => 180,
            ModeAngle::Grade => 200,
        };
        Some(Complexe::from(Reel::pi(self.p()) / Reel::from(diviseur)))
    }

    fn vers_radians(&self, z: &Complexe) -> Complexe {
        match self.facteur_angle() {
            Some(f) => z * &f,
            None => z.clone(),
        }
    }

    fn depuis_radians(&self, z: Complexe) -> Complexe {
        match self.facteur_angle() {
            Some(f) => &z / &f,
            None => z,
        }
    }

    /* ------------------------ Constantes / projections ------------------------ */

    pub fn pi(&self) -> Quantite {
        Quantite::from(Reel::pi(self.p()))
    }

    pub fn abs(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        q.map_valeur(|z| Complexe::from(z.abs(p)))
    }

    pub fn real(&self, q: &Quantite) -> Quantite {
        q.map_valeur(Complexe::real)
    }

    pub fn imag(&self, q: &Quantite) -> Quantite {
        q.map_valeur(Complexe::imag)
    }

    pub fn conj(&self, q: &Quantite) -> Quantite {
        q.map_valeur(Complexe::conj)
    }

    /// Argument principal, dans l’unité d’angle du contexte. Sans dimension ; invalide en 0.
    pub fn arg(&self, q: &Quantite) -> Quantite {
        if !q.est_valide() {
            return Quantite::nan();
        }
        if q.valeur().est_zero() {
            return Quantite::invalide(Erreur::domaine("arg"));
        }
        let a = Complexe::from(q.valeur().arg(self.p()));
        Quantite::from(self.depuis_radians(a))
    }

    /* ------------------------ Arrondis ------------------------ */

    pub fn round(&self, q: &Quantite, n: i64) -> Quantite {
        self.par_partie(q, "round", |r| r.round(n))
    }

    pub fn trunc(&self, q: &Quantite, n: i64) -> Quantite {
        self.par_partie(q, "trunc", |r| r.trunc(n))
    }

    pub fn floor(&self, q: &Quantite) -> Quantite {
        self.par_partie(q, "floor", Reel::floor)
    }

    pub fn ceil(&self, q: &Quantite) -> Quantite {
        self.par_partie(q, "ceil", Reel::ceil)
    }

    /// Signe : -1, 0, 1 pour un réel ; z/|z| pour un complexe.
    pub fn sgn(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "sgn", |z| {
            if z.est_reel() {
                Complexe::from(z.re().signe())
            } else {
                z / &Complexe::from(z.abs(p))
            }
        })
    }

    /* ------------------------ Puissances ------------------------ */

    fn racine(&self, q: &Quantite, nom: &'static str, indice: i64, valeur: Complexe) -> Quantite {
        match q.dimension().puissance(Rational64::new(1, indice)) {
            Some(d) => Quantite::new(valeur, d),
            None => Quantite::invalide(Erreur::dimension(nom)),
        }
    }

    /// Racine carrée, branche principale ; exposants d’unité divisés par 2.
    pub fn sqrt(&self, q: &Quantite) -> Quantite {
        if !q.est_valide() {
            return Quantite::nan();
        }
        self.racine(q, "sqrt", 2, q.valeur().sqrt(self.p()))
    }

    /// Racine cubique (réelle sur un réel) ; exposants d’unité divisés par 3.
    pub fn cbrt(&self, q: &Quantite) -> Quantite {
        if !q.est_valide() {
            return Quantite::nan();
        }
        self.racine(q, "cbrt", 3, q.valeur().cbrt(self.p()))
    }

    /// base^exposant.
    pub fn raise(&self, base: &Quantite, exposant: &Quantite) -> Quantite {
        if !base.est_valide() || !exposant.est_valide() {
            return Quantite::nan();
        }
        if !exposant.est_sans_dimension() {
            return Quantite::invalide(Erreur::dimension("puissance"));
        }

        if base.est_sans_dimension() {
            let z = base.valeur().raise(exposant.valeur(), self.ctx);
            if !z.est_valide() {
                return Quantite::invalide(Erreur::domaine("puissance"));
            }
            return Quantite::from(z);
        }

        match exposant_borne(exposant.valeur()) {
            Some(n) => base.puissance(n, self.ctx),
            None => Quantite::invalide(Erreur::domaine("puissance")),
        }
    }

    /* ------------------------ Exponentielle / logarithmes ------------------------ */

    pub fn exp(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "exp", |z| z.exp(p))
    }

    pub fn ln(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "ln", |z| z.ln(p))
    }

    /// Logarithme décimal.
    pub fn lg(&self, q: &Quantite) -> Quantite {
        self.log_base(q, "lg", 10)
    }

    /// Logarithme binaire.
    pub fn lb(&self, q: &Quantite) -> Quantite {
        self.log_base(q, "lb", 2)
    }

    fn log_base(&self, q: &Quantite, nom: &'static str, base: i64) -> Quantite {
        let p = self.p();
        self.scalaire(q, nom, |z| {
            // puissance exacte de la base : résultat entier exact
            if let Some(n) = logarithme_entier(z, base) {
                return Complexe::from(n);
            }
            &z.ln(p) / &Complexe::from(Reel::from(base).ln(p))
        })
    }

    /* ------------------------ Trigonométrie ------------------------ */

    pub fn sin(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "sin", |z| self.vers_radians(z).sin(p))
    }

    pub fn cos(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "cos", |z| self.vers_radians(z).cos(p))
    }

    pub fn tan(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "tan", |z| self.vers_radians(z).tan(p))
    }

    /// cot = cos / sin ; invalide là où sin s’annule exactement (0).
    pub fn cot(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "cot", |z| {
            let x = self.vers_radians(z);
            &x.cos(p) / &x.sin(p)
        })
    }

    pub fn asin(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "asin", |z| self.depuis_radians(z.asin(p)))
    }

    pub fn acos(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "acos", |z| self.depuis_radians(z.acos(p)))
    }

    pub fn atan(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "atan", |z| self.depuis_radians(z.atan(p)))
    }

    pub fn sinh(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "sinh", |z| z.sinh(p))
    }

    pub fn cosh(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "cosh", |z| z.cosh(p))
    }

    pub fn tanh(&self, q: &Quantite) -> Quantite {
        let p = self.p();
        self.scalaire(q, "tanh", |z| z.tanh(p))
    }
}

/// Exposant réel p/q avec |p| et q dans i64 et q <= DENOMINATEUR_MAX.
fn exposant_borne(z: &Complexe) -> Option<Rational64> {
    if !z.est_reel() {
        return None;
    }
    let (num, den) = z.re().fraction()?;
    let num = num.to_i64()?;
    let den = den.to_i64()?;
    if den > DENOMINATEUR_MAX {
        return None;
    }
    Some(Rational64::new(num, den))
}

/// n tel que z = base^n exactement (z réel positif, n entier), sinon None.
fn logarithme_entier(z: &Complexe, base: i64) -> Option<i64> {
    if !z.est_reel() || !z.re().est_positif() {
        return None;
    }
    let b = Reel::from(base);
    let (mut x, inverse) = if z.re() >= &Reel::un() {
        (z.re().clone(), false)
    } else {
        (&Reel::un() / z.re(), true)
    };
    let mut n = 0i64;
    while x > Reel::un() {
        let y = &x / &b;
        if !y.est_entier() || n >= LOG_ENTIER_MAX {
            return None;
        }
        x = y;
        n += 1;
    }
    if x != Reel::un() {
        return None;
    }
    Some(if inverse { -n } else { n })
}
