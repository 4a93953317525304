// src/noyau/erreur.rs
//
// Les trois causes d’invalidité du noyau.
// Aucune n’arrive jusqu’à l’appelant : elles finissent toutes en sentinelle
// “NaN” (voir Quantite::invalide). On les garde typées pour les lecteurs
// (Reel::lire, Complexe::lire) et pour les traces.

use thiserror::Error;

pub type ResultatNoyau<T> = Result<T, Erreur>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Erreur {
    #[error("littéral numérique invalide: {texte:?}")]
    Lecture { texte: String },

    #[error("argument hors domaine pour {fonction}")]
    Domaine { fonction: &'static str },

    #[error("dimensions incompatibles pour {operation}")]
    Dimension { operation: &'static str },
}

impl Erreur {
    pub fn lecture(texte: &str) -> Self {
        Erreur::Lecture {
            texte: texte.to_string(),
        }
    }

    pub fn domaine(fonction: &'static str) -> Self {
        Erreur::Domaine { fonction }
    }

    pub fn dimension(operation: &'static str) -> Self {
        Erreur::Dimension { operation }
    }
}
