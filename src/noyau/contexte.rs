//! src/noyau/contexte.rs
//!
//! Configuration de calcul, passée explicitement à chaque appel.
//!
//! Contrats :
//! - Le noyau lit le contexte à chaque appel, sans jamais le copier ni le cacher.
//! - Le contexte ne change jamais une opération non ambiguë (algèbre des unités,
//!   puissances entières) : seul le choix de branche des puissances fractionnaires
//!   d’un réel négatif dépend de `mode_complexe`.
//! - La persistance (préférences) appartient à l’application : on se contente
//!   de dériver serde.

use serde::{Deserialize, Serialize};

/// Précision de travail par défaut (chiffres significatifs décimaux).
pub const PRECISION_DEFAUT: usize = 78;

/// Garde-fou : on ne descend jamais sous 50 chiffres (formatage haute précision).
pub const PRECISION_MIN: usize = 50;

/// Interprétation des angles pour sin/cos/tan et leurs réciproques.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeAngle {
    #[default]
    Radian,
    Degre,
    Grade,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contexte {
    /// Branche des puissances ambiguës : réelle (false) ou principale complexe (true).
    pub mode_complexe: bool,

    /// Précision de travail (chiffres significatifs).
    pub precision: usize,

    pub mode_angle: ModeAngle,

    /// Code de format par défaut ('f', 'e', 'n', 'g', 'b', 'o', 'h').
    pub format: char,

    /// Nombre de chiffres par défaut à l’affichage (None = automatique).
    pub precision_affichage: Option<usize>,
}

impl Default for Contexte {
    fn default() -> Self {
        Self {
            mode_complexe: false,
            precision: PRECISION_DEFAUT,
            mode_angle: ModeAngle::Radian,
            format: 'f',
            precision_affichage: None,
        }
    }
}

impl Contexte {
    /// Précision effectivement utilisée par les noyaux (bornée par le bas).
    pub fn precision_travail(&self) -> usize {
        self.precision.max(PRECISION_MIN)
    }

    pub fn avec_mode_complexe(mut self, on: bool) -> Self {
        self.mode_complexe = on;
        self
    }

    pub fn avec_mode_angle(mut self, mode: ModeAngle) -> Self {
        self.mode_angle = mode;
        self
    }
}
