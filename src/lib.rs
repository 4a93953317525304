// src/lib.rs
//
// Moteur numérique d’une calculatrice scientifique avec unités physiques.
// - réels et complexes en précision arbitraire (rationnels exacts)
// - algèbre dimensionnelle exacte (exposants rationnels)
// - fonctions avec contrôle des dimensions et choix de branche déterministe
// - rendu texte exact (bases 2/8/16, précision, suffixe d’unité)
//
// Aucune opération ne panique : toute erreur devient une quantité invalide,
// qui se propage et s’affiche "NaN".

pub mod noyau;

pub use noyau::{
    format_quantite, formater, unites, Complexe, Contexte, Dimension, DimensionBase, Erreur,
    Fonctions, ModeAngle, Quantite, Reel, UniteAffichage,
};
