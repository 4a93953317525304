// src/noyau/unites.rs
//
// Registre des unités nommées.
// - base SI (magnitude 1, une dimension à l’exposant 1)
// - dérivées SI (magnitude 1, exposants fixes)
// - quelques unités hors SI (dimension canonique, magnitude ≠ 1)
//
// Le registre est construit une seule fois (OnceLock) puis seulement lu :
// chaque appel rend une copie indépendante, égale en valeur.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::complexe::Complexe;
use super::dimension::{Dimension, DimensionBase};
use super::quantite::Quantite;
use super::reel::Reel;

use DimensionBase::{Courant, Longueur, Masse, Temps};

type Exposants = &'static [(DimensionBase, i64)];

/// Dérivées SI : (nom, exposants). Ordre = priorité de reconnaissance à l’affichage.
const DERIVEES: &[(&str, Exposants)] = &[
    ("newton", &[(Masse, 1), (Longueur, 1), (Temps, -2)]),
    ("joule", &[(Masse, 1), (Longueur, 2), (Temps, -2)]),
    ("watt", &[(Masse, 1), (Longueur, 2), (Temps, -3)]),
    ("pascal", &[(Masse, 1), (Longueur, -1), (Temps, -2)]),
    ("coulomb", &[(Courant, 1), (Temps, 1)]),
    ("volt", &[(Masse, 1), (Longueur, 2), (Temps, -3), (Courant, -1)]),
    ("ohm", &[(Masse, 1), (Longueur, 2), (Temps, -3), (Courant, -2)]),
    ("siemens", &[(Masse, -1), (Longueur, -2), (Temps, 3), (Courant, 2)]),
    ("farad", &[(Masse, -1), (Longueur, -2), (Temps, 4), (Courant, 2)]),
    ("tesla", &[(Masse, 1), (Temps, -2), (Courant, -1)]),
    ("weber", &[(Masse, 1), (Longueur, 2), (Temps, -2), (Courant, -1)]),
    ("henry", &[(Masse, 1), (Longueur, 2), (Temps, -2), (Courant, -2)]),
];

/// Dérivées absentes de la reconnaissance (dimension partagée : s^-1 = Hz = Bq).
const DERIVEES_NON_RECONNUES: &[(&str, Exposants)] = &[("hertz", &[(Temps, -1)])];

/// Hors SI : (nom, magnitude exacte en unités SI, exposants).
const HORS_SI: &[(&str, &str, Exposants)] = &[
    ("gram", "0.001", &[(Masse, 1)]),
    ("minute", "60", &[(Temps, 1)]),
    ("hour", "3600", &[(Temps, 1)]),
    ("liter", "0.001", &[(Longueur, 3)]),
    ("foot", "0.3048", &[(Longueur, 1)]),
    ("inch", "0.0254", &[(Longueur, 1)]),
];

static REGISTRE: OnceLock<HashMap<&'static str, Quantite>> = OnceLock::new();

fn construit_registre() -> HashMap<&'static str, Quantite> {
    tracing::trace!("construction du registre d’unités");
    let mut table = HashMap::new();

    for d in DimensionBase::TOUTES {
        table.insert(d.unite(), Quantite::new(Complexe::un(), Dimension::base(d)));
    }
    for (nom, exposants) in DERIVEES.iter().chain(DERIVEES_NON_RECONNUES) {
        table.insert(*nom, Quantite::new(Complexe::un(), Dimension::depuis(exposants)));
    }
    for (nom, magnitude, exposants) in HORS_SI {
        let valeur = Complexe::from(Reel::depuis_texte(magnitude));
        table.insert(*nom, Quantite::new(valeur, Dimension::depuis(exposants)));
    }
    table
}

fn registre() -> &'static HashMap<&'static str, Quantite> {
    REGISTRE.get_or_init(construit_registre)
}

/// Unité par nom ("meter", "joule", "foot"...). None si inconnue.
pub fn unite(nom: &str) -> Option<Quantite> {
    registre().get(nom).cloned()
}

/// Noms connus, triés (complétion côté application).
pub fn noms() -> Vec<&'static str> {
    let mut v: Vec<&'static str> = registre().keys().copied().collect();
    v.sort_unstable();
    v
}

/// Nom de l’unité dérivée dont la dimension est exactement `dim`, si elle existe.
pub fn nom_derive(dim: &Dimension) -> Option<&'static str> {
    DERIVEES
        .iter()
        .find(|(_, exposants)| Dimension::depuis(exposants) == *dim)
        .map(|(nom, _)| *nom)
}

fn nommee(nom: &str) -> Quantite {
    // les noms ci-dessous sont tous dans les tables : la sentinelle ne sort jamais
    unite(nom).unwrap_or_else(Quantite::nan)
}

/* ------------------------ Base ------------------------ */

pub fn meter() -> Quantite {
    nommee("meter")
}

pub fn kilogram() -> Quantite {
    nommee("kilogram")
}

pub fn second() -> Quantite {
    nommee("second")
}

pub fn ampere() -> Quantite {
    nommee("ampere")
}

pub fn kelvin() -> Quantite {
    nommee("kelvin")
}

pub fn mole() -> Quantite {
    nommee("mole")
}

pub fn candela() -> Quantite {
    nommee("candela")
}

/* ------------------------ Dérivées ------------------------ */

pub fn newton() -> Quantite {
    nommee("newton")
}

pub fn joule() -> Quantite {
    nommee("joule")
}

pub fn watt() -> Quantite {
    nommee("watt")
}

pub fn pascal() -> Quantite {
    nommee("pascal")
}

pub fn coulomb() -> Quantite {
    nommee("coulomb")
}

pub fn volt() -> Quantite {
    nommee("volt")
}

pub fn ohm() -> Quantite {
    nommee("ohm")
}

pub fn siemens() -> Quantite {
    nommee("siemens")
}

pub fn farad() -> Quantite {
    nommee("farad")
}

pub fn tesla() -> Quantite {
    nommee("tesla")
}

pub fn weber() -> Quantite {
    nommee("weber")
}

pub fn henry() -> Quantite {
    nommee("henry")
}

pub fn hertz() -> Quantite {
    nommee("hertz")
}

/* ------------------------ Hors SI ------------------------ */

pub fn gram() -> Quantite {
    nommee("gram")
}

pub fn minute() -> Quantite {
    nommee("minute")
}

pub fn hour() -> Quantite {
    nommee("hour")
}

pub fn liter() -> Quantite {
    nommee("liter")
}

pub fn foot() -> Quantite {
    nommee("foot")
}

pub fn inch() -> Quantite {
    nommee("inch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_rational::Rational64;

    #[test]
    fn bases_magnitude_un() {
        for d in DimensionBase::TOUTES {
            let u = unite(d.unite()).unwrap();
            assert_eq!(u.valeur(), &Complexe::un());
            assert_eq!(u.dimension(), &Dimension::base(d));
        }
    }

    #[test]
    fn derivees_composees_des_bases() {
        assert_eq!(coulomb(), ampere() * second());
        assert_eq!(
            joule(),
            kilogram() * meter() * meter() / (second() * second())
        );
        assert_eq!(newton() * meter(), joule());
        assert_eq!(volt() * ampere(), watt());
        assert_eq!(volt() / ampere(), ohm());
        assert_eq!(
            hertz().dimension().exposant(DimensionBase::Temps),
            Rational64::from_integer(-1)
        );
    }

    #[test]
    fn appels_repetes_egaux_et_independants() {
        let mut a = meter();
        let b = meter();
        assert_eq!(a, b);
        a.set_unite_affichage(Reel::depuis_texte("0.3048"), "foot");
        assert!(meter().unite_affichage().is_none());
    }

    #[test]
    fn reconnaissance_des_derivees() {
        assert_eq!(nom_derive(coulomb().dimension()), Some("coulomb"));
        assert_eq!(nom_derive((newton() * meter()).dimension()), Some("joule"));
        assert_eq!(nom_derive(hertz().dimension()), None);
        assert_eq!(nom_derive(meter().dimension()), None);
        assert_eq!(nom_derive((kilogram() / second()).dimension()), None);
    }

    #[test]
    fn hors_si() {
        assert_eq!(hour(), Quantite::from(60i64) * minute());
        assert_eq!(liter(), Quantite::depuis_texte("0.001") * meter() * meter() * meter());
        assert!(unite("parsec").is_none());
        assert!(noms().contains(&"foot"));
    }
}
