//! src/noyau/dimension.rs
//!
//! Vecteur d’exposants rationnels exacts sur les dimensions de base SI.
//!
//! - Exposant absent <=> exposant nul (jamais de zéro stocké).
//! - Exposants réduits par pgcd (Rational64), dénominateur > 0.
//! - Arithmétique vérifiée : un débordement rend None (la quantité devient invalide).

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, Zero};

use std::collections::BTreeMap;

/// Dimensions de base, dans l’ordre d’affichage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DimensionBase {
    Longueur,
    Masse,
    Temps,
    Courant,
    Temperature,
    Matiere,
    Intensite,
}

impl DimensionBase {
    pub const TOUTES: [DimensionBase; 7] = [
        DimensionBase::Longueur,
        DimensionBase::Masse,
        DimensionBase::Temps,
        DimensionBase::Courant,
        DimensionBase::Temperature,
        DimensionBase::Matiere,
        DimensionBase::Intensite,
    ];

    /// Nom de l’unité canonique (affichage).
    pub fn unite(self) -> &'static str {
        match self {
            DimensionBase::Longueur => "meter",
            DimensionBase::Masse => "kilogram",
            DimensionBase::Temps => "second",
            DimensionBase::Courant => "ampere",
            DimensionBase::Temperature => "kelvin",
            DimensionBase::Matiere => "mole",
            DimensionBase::Intensite => "candela",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimension {
    exposants: BTreeMap<DimensionBase, Rational64>,
}

impl Dimension {
    pub fn sans_dimension() -> Self {
        Self::default()
    }

    /// Une dimension de base à l’exposant 1.
    pub fn base(d: DimensionBase) -> Self {
        Self::depuis(&[(d, 1)])
    }

    /// Construction à partir d’exposants entiers (table des unités dérivées).
    pub fn depuis(exposants: &[(DimensionBase, i64)]) -> Self {
        let mut dim = Self::default();
        for &(d, e) in exposants {
            dim.poser(d, Rational64::from_integer(e));
        }
        dim
    }

    fn poser(&mut self, d: DimensionBase, e: Rational64) {
        if e.is_zero() {
            self.exposants.remove(&d);
        } else {
            self.exposants.insert(d, e);
        }
    }

    pub fn est_sans_dimension(&self) -> bool {
        self.exposants.is_empty()
    }

    pub fn exposant(&self, d: DimensionBase) -> Rational64 {
        self.exposants.get(&d).copied().unwrap_or_else(Rational64::zero)
    }

    /// Facteurs non nuls, dans l’ordre d’affichage.
    pub fn iter(&self) -> impl Iterator<Item = (DimensionBase, Rational64)> + '_ {
        self.exposants.iter().map(|(d, e)| (*d, *e))
    }

    fn combine(
        &self,
        other: &Self,
        op: impl Fn(&Rational64, &Rational64) -> Option<Rational64>,
    ) -> Option<Self> {
        let mut out = Self::default();
        for d in DimensionBase::TOUTES {
            let e = op(&self.exposant(d), &other.exposant(d))?;
            out.poser(d, e);
        }
        Some(out)
    }

    /// Dimension d’un produit : somme composante par composante.
    pub fn produit(&self, other: &Self) -> Option<Self> {
        self.combine(other, |a, b| a.checked_add(b))
    }

    /// Dimension d’un quotient : différence composante par composante.
    pub fn quotient(&self, other: &Self) -> Option<Self> {
        self.combine(other, |a, b| a.checked_sub(b))
    }

    /// Dimension d’une puissance rationnelle : produit de chaque exposant par n.
    pub fn puissance(&self, n: Rational64) -> Option<Self> {
        let mut out = Self::default();
        for (d, e) in self.iter() {
            out.poser(d, e.checked_mul(&n)?);
        }
        Some(out)
    }
}
