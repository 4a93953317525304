//! Noyau numérique avec unités
//!
//! Organisation interne :
//! - erreur.rs     : causes d’invalidité (lecture, domaine, dimension)
//! - contexte.rs   : configuration passée à chaque appel
//! - echelle.rs    : noyaux en entiers scalés (π, ln 2, racines, exp, ln, sin/cos, atan)
//! - jetons.rs     : lecture des littéraux numériques
//! - reel.rs       : réel exact (rationnel) ou invalide
//! - complexe.rs   : paire de réels, fonctions sur le plan
//! - dimension.rs  : exposants rationnels sur les dimensions de base
//! - quantite.rs   : valeur + dimension + unité d’affichage
//! - unites.rs     : registre des unités nommées
//! - fonctions.rs  : bibliothèque de fonctions (contrôle des dimensions, branches)
//! - format.rs     : rendu texte (f/e/n/g, bases 2/8/16, suffixe d’unité)

pub mod complexe;
pub mod contexte;
pub mod dimension;
pub mod echelle;
pub mod erreur;
pub mod fonctions;
pub mod format;
pub mod jetons;
pub mod quantite;
pub mod reel;
pub mod unites;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use complexe::Complexe;
pub use contexte::{Contexte, ModeAngle};
pub use dimension::{Dimension, DimensionBase};
pub use erreur::{Erreur, ResultatNoyau};
pub use fonctions::Fonctions;
pub use format::{format_quantite, formater};
pub use quantite::{Quantite, UniteAffichage};
pub use reel::Reel;
