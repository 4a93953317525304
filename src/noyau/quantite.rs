//! src/noyau/quantite.rs
//!
//! Quantité = valeur complexe + dimension + unité d’affichage optionnelle.
//!
//! Contrats :
//! - L’unité d’affichage ne sert qu’au rendu : jamais à l’égalité ni aux calculs.
//! - Addition/soustraction : dimensions égales exigées, sinon quantité invalide.
//! - Quantité invalide = valeur invalide + dimension vide ; elle contamine tout.
//! - Aucune opération ne panique : les erreurs finissent en sentinelle (tracée).

use num_bigint::BigInt;
use num_rational::{BigRational, Rational64};

use std::ops::{Add, Div, Mul, MulAssign, Neg, Sub};

use super::complexe::Complexe;
use super::contexte::Contexte;
use super::dimension::Dimension;
use super::erreur::Erreur;
use super::reel::Reel;

/// Unité choisie pour le rendu : valeur affichée = valeur / echelle, suivie de `nom`.
#[derive(Clone, Debug, PartialEq)]
pub struct UniteAffichage {
    pub echelle: Reel,
    pub nom: String,
}

#[derive(Clone, Debug)]
pub struct Quantite {
    valeur: Complexe,
    dimension: Dimension,
    unite_affichage: Option<UniteAffichage>,
}

impl PartialEq for Quantite {
    fn eq(&self, other: &Self) -> bool {
        self.valeur == other.valeur && self.dimension == other.dimension
    }
}

impl From<Complexe> for Quantite {
    fn from(valeur: Complexe) -> Self {
        Quantite::new(valeur, Dimension::sans_dimension())
    }
}

impl From<Reel> for Quantite {
    fn from(r: Reel) -> Self {
        Quantite::from(Complexe::from(r))
    }
}

impl From<i64> for Quantite {
    fn from(n: i64) -> Self {
        Quantite::from(Complexe::from(n))
    }
}

impl Quantite {
    pub fn new(valeur: Complexe, dimension: Dimension) -> Self {
        if !valeur.est_valide() {
            return Self::nan();
        }
        Self {
            valeur,
            dimension,
            unite_affichage: None,
        }
    }

    /// Sentinelle, sans trace (propagation d’un opérande déjà invalide).
    pub fn nan() -> Self {
        Self {
            valeur: Complexe::invalide(),
            dimension: Dimension::sans_dimension(),
            unite_affichage: None,
        }
    }

    /// Sentinelle née ici : on trace la cause.
    pub fn invalide(cause: Erreur) -> Self {
        tracing::debug!(cause = %cause, "quantité invalide");
        Self::nan()
    }

    /// Littéral numérique ("123.45", "3+4j", "0x1F"...) sans dimension.
    pub fn depuis_texte(texte: &str) -> Self {
        match Complexe::lire(texte) {
            Ok(z) => Quantite::from(z),
            Err(e) => Self::invalide(e),
        }
    }

    /// Littéral numérique suivi d’une unité : "5" meter -> 5 meter.
    pub fn avec_unite(texte: &str, unite: &Quantite) -> Self {
        &Self::depuis_texte(texte) * unite
    }

    /* ------------------------ Observateurs ------------------------ */

    pub fn valeur(&self) -> &Complexe {
        &self.valeur
    }

    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    pub fn unite_affichage(&self) -> Option<&UniteAffichage> {
        self.unite_affichage.as_ref()
    }

    pub fn est_valide(&self) -> bool {
        self.valeur.est_valide()
    }

    pub fn est_sans_dimension(&self) -> bool {
        self.dimension.est_sans_dimension()
    }

    /// Même dimension (les deux valides).
    pub fn est_compatible(&self, other: &Quantite) -> bool {
        self.est_valide() && other.est_valide() && self.dimension == other.dimension
    }

    /// Même dimension, valeur neuve : l’unité d’affichage ne suit pas.
    fn avec_valeur(&self, valeur: Complexe) -> Quantite {
        Quantite::new(valeur, self.dimension.clone())
    }

    /// Applique `f` à la valeur en gardant la dimension (abs, real, imag, conj...).
    pub fn map_valeur(&self, f: impl FnOnce(&Complexe) -> Complexe) -> Quantite {
        if !self.est_valide() {
            return Self::nan();
        }
        self.avec_valeur(f(&self.valeur))
    }

    /* ------------------------ Unité d’affichage ------------------------ */

    pub fn set_unite_affichage(&mut self, echelle: Reel, nom: &str) {
        if !self.est_valide() {
            return;
        }
        self.unite_affichage = Some(UniteAffichage {
            echelle,
            nom: nom.to_string(),
        });
    }

    pub fn avec_unite_affichage(mut self, echelle: Reel, nom: &str) -> Self {
        self.set_unite_affichage(echelle, nom);
        self
    }

    pub fn sans_unite_affichage(mut self) -> Self {
        self.unite_affichage = None;
        self
    }

    /// Conversion “in” : exprime self dans `unite` (même dimension, valeur réelle non nulle).
    pub fn convertir(&self, unite: &Quantite, nom: &str) -> Quantite {
        if !self.est_valide() || !unite.est_valide() {
            return Self::nan();
        }
        if self.dimension != unite.dimension {
            return Self::invalide(Erreur::dimension("conversion"));
        }
        if !unite.valeur.est_reel() || unite.valeur.est_zero() {
            return Self::invalide(Erreur::domaine("conversion"));
        }
        self.clone()
            .avec_unite_affichage(unite.valeur.re().clone(), nom)
    }

    /* ------------------------ Puissance rationnelle ------------------------ */

    /// a^n, n rationnel exact : dimension × n, valeur par Complexe::raise.
    /// Base dimensionnée réelle négative et dénominateur pair : aucune branche
    /// n’a de sens physique, invalide dans les deux modes.
    pub fn puissance(&self, n: Rational64, ctx: &Contexte) -> Quantite {
        if !self.est_valide() {
            return Self::nan();
        }
        if *n.denom() % 2 == 0
            && !self.est_sans_dimension()
            && self.valeur.est_reel()
            && self.valeur.re().est_negatif()
        {
            return Self::invalide(Erreur::domaine("puissance"));
        }

        let dimension = match self.dimension.puissance(n) {
            Some(d) => d,
            None => return Self::invalide(Erreur::dimension("puissance")),
        };
        let exposant = Complexe::from(Reel::from(BigRational::new(
            BigInt::from(*n.numer()),
            BigInt::from(*n.denom()),
        )));
        Quantite::new(self.valeur.raise(&exposant, ctx), dimension)
    }
}

/* ------------------------ Opérateurs ------------------------ */

impl<'a> Add<&'a Quantite> for &'a Quantite {
    type Output = Quantite;
    fn add(self, rhs: &'a Quantite) -> Quantite {
        if !self.est_valide() || !rhs.est_valide() {
            return Quantite::nan();
        }
        if self.dimension != rhs.dimension {
            return Quantite::invalide(Erreur::dimension("addition"));
        }
        self.avec_valeur(&self.valeur + &rhs.valeur)
    }
}

impl<'a> Sub<&'a Quantite> for &'a Quantite {
    type Output = Quantite;
    fn sub(self, rhs: &'a Quantite) -> Quantite {
        if !self.est_valide() || !rhs.est_valide() {
            return Quantite::nan();
        }
        if self.dimension != rhs.dimension {
            return Quantite::invalide(Erreur::dimension("soustraction"));
        }
        self.avec_valeur(&self.valeur - &rhs.valeur)
    }
}

impl<'a> Mul<&'a Quantite> for &'a Quantite {
    type Output = Quantite;
    fn mul(self, rhs: &'a Quantite) -> Quantite {
        if !self.est_valide() || !rhs.est_valide() {
            return Quantite::nan();
        }
        match self.dimension.produit(&rhs.dimension) {
            Some(d) => Quantite::new(&self.valeur * &rhs.valeur, d),
            None => Quantite::invalide(Erreur::dimension("multiplication")),
        }
    }
}

impl<'a> Div<&'a Quantite> for &'a Quantite {
    type Output = Quantite;
    fn div(self, rhs: &'a Quantite) -> Quantite {
        if !self.est_valide() || !rhs.est_valide() {
            return Quantite::nan();
        }
        if rhs.valeur.est_zero() {
            return Quantite::invalide(Erreur::domaine("division"));
        }
        match self.dimension.quotient(&rhs.dimension) {
            Some(d) => Quantite::new(&self.valeur / &rhs.valeur, d),
            None => Quantite::invalide(Erreur::dimension("division")),
        }
    }
}

impl Add for Quantite {
    type Output = Quantite;
    fn add(self, rhs: Quantite) -> Quantite {
        &self + &rhs
    }
}

impl Sub for Quantite {
    type Output = Quantite;
    fn sub(self, rhs: Quantite) -> Quantite {
        &self - &rhs
    }
}

impl Mul for Quantite {
    type Output = Quantite;
    fn mul(self, rhs: Quantite) -> Quantite {
        &self * &rhs
    }
}

impl Div for Quantite {
    type Output = Quantite;
    fn div(self, rhs: Quantite) -> Quantite {
        &self / &rhs
    }
}

impl MulAssign<Quantite> for Quantite {
    fn mul_assign(&mut self, rhs: Quantite) {
        *self = &*self * &rhs;
    }
}

/// La négation garde l’unité d’affichage.
impl Neg for &Quantite {
    type Output = Quantite;
    fn neg(self) -> Quantite {
        if !self.est_valide() {
            return Quantite::nan();
        }
        let mut q = self.avec_valeur(-&self.valeur);
        q.unite_affichage = self.unite_affichage.clone();
        q
    }
}

impl Neg for Quantite {
    type Output = Quantite;
    fn neg(self) -> Quantite {
        -&self
    }
}
