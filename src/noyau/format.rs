// src/noyau/format.rs
//
// Rendu texte d’une quantité.
// - codes : 'f' fixe, 'e' scientifique, 'n' ingénieur, 'g' général,
//           'b' / 'o' / 'h' binaire, octal, hexadécimal (préfixes 0b, 0o, 0x)
// - précision absente : 20 chiffres, zéros finaux retirés
// - complexe : re±imj (partie imaginaire nulle omise)
// - suffixe d’unité : nom, nom², nom^n, nom^(p/q), séparés par des espaces
// - invalide : "NaN", sans suffixe, quels que soient le code et la précision

use num_bigint::BigInt;
use num_rational::{BigRational, Rational64};
use num_traits::{One, Signed, Zero};

use std::fmt;

use super::complexe::Complexe;
use super::contexte::Contexte;
use super::dimension::Dimension;
use super::echelle::{exposant10, pow10, pow10_rationnel, scaled_to_decimal};
use super::quantite::Quantite;
use super::unites::nom_derive;

/// Chiffres affichés en précision automatique.
const CHIFFRES_AUTO: usize = 20;

const CODES: &str = "fengboh";

/// Texte d’un réel rendu, et s’il s’affiche comme zéro.
struct Rendu {
    texte: String,
    nul: bool,
}

/* ------------------------ Entrées publiques ------------------------ */

/// Rendu avec le code et la précision par défaut du contexte.
pub fn formater(q: &Quantite, ctx: &Contexte) -> String {
    format_quantite(q, ctx.format, ctx.precision_affichage, ctx)
}

/// Rendu d’une quantité : `code` choisit la numération, `precision` (si Some)
/// remplace la précision par défaut pour cet appel seulement.
pub fn format_quantite(q: &Quantite, code: char, precision: Option<usize>, ctx: &Contexte) -> String {
    if !q.est_valide() {
        return "NaN".to_string();
    }
    let code = code_effectif(code, ctx);

    let (valeur, suffixe) = match q.unite_affichage() {
        Some(u) => (
            q.valeur() / &Complexe::from(u.echelle.clone()),
            u.nom.clone(),
        ),
        None => (q.valeur().clone(), suffixe_unites(q.dimension())),
    };
    if !valeur.est_valide() {
        return "NaN".to_string();
    }

    let (re, im) = match (valeur.re().valeur(), valeur.im().valeur()) {
        (Some(re), Some(im)) => (
            format_reel(re, code, precision),
            format_reel(im, code, precision),
        ),
        _ => return "NaN".to_string(),
    };

    let nombre = match (re.nul, im.nul) {
        (_, true) => re.texte,
        (true, false) => format!("{}j", im.texte),
        (false, false) => {
            let signe = if im.texte.starts_with('-') { "" } else { "+" };
            if suffixe.is_empty() {
                format!("{}{signe}{}j", re.texte, im.texte)
            } else {
                format!("({}{signe}{}j)", re.texte, im.texte)
            }
        }
    };

    if suffixe.is_empty() {
        nombre
    } else {
        format!("{nombre} {suffixe}")
    }
}

impl fmt::Display for Quantite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&formater(self, &Contexte::default()))
    }
}

/// Code inconnu : celui du contexte, puis 'f'.
fn code_effectif(code: char, ctx: &Contexte) -> char {
    if CODES.contains(code) {
        code
    } else if CODES.contains(ctx.format) {
        ctx.format
    } else {
        'f'
    }
}

/* ------------------------ Suffixe d’unité ------------------------ */

/// Nom d’unité dérivée si la dimension en est exactement une, sinon produit des bases.
pub fn suffixe_unites(dim: &Dimension) -> String {
    if let Some(nom) = nom_derive(dim) {
        return nom.to_string();
    }
    dim.iter()
        .map(|(d, e)| facteur(d.unite(), e))
        .collect::<Vec<_>>()
        .join(" ")
}

fn facteur(nom: &str, e: Rational64) -> String {
    if e.is_integer() {
        match e.to_integer() {
            1 => nom.to_string(),
            2 => format!("{nom}²"),
            n => format!("{nom}^{n}"),
        }
    } else {
        format!("{nom}^({}/{})", e.numer(), e.denom())
    }
}

/* ------------------------ Réels ------------------------ */

fn format_reel(r: &BigRational, code: char, precision: Option<usize>) -> Rendu {
    match code {
        'e' => format_scientifique(r, precision, 1),
        'n' => format_scientifique(r, precision, 3),
        'g' => format_general(r, precision),
        'b' => format_radix(r, 2, "0b", precision),
        'o' => format_radix(r, 8, "0o", precision),
        'h' => format_radix(r, 16, "0x", precision),
        _ => format_fixe(r, precision),
    }
}

/// round(r · 10^chiffres), moitié loin de zéro.
fn arrondi_scale(r: &BigRational, chiffres: i64) -> BigInt {
    (r * pow10_rationnel(chiffres)).round().to_integer()
}

/// "1.2300" -> "1.23", "4.000" -> "4".
fn sans_zeros_finaux(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

fn format_fixe(r: &BigRational, precision: Option<usize>) -> Rendu {
    let chiffres = precision.unwrap_or(CHIFFRES_AUTO);
    let s = arrondi_scale(r, chiffres as i64);
    let nul = s.is_zero();
    let texte = scaled_to_decimal(s, chiffres);
    Rendu {
        texte: if precision.is_none() {
            sans_zeros_finaux(texte)
        } else {
            texte
        },
        nul,
    }
}

/// Mantisse × 10^e, e multiple de `pas` (1 : scientifique, 3 : ingénieur).
fn format_scientifique(r: &BigRational, precision: Option<usize>, pas: i64) -> Rendu {
    if r.is_zero() {
        let mantisse = scaled_to_decimal(BigInt::zero(), precision.unwrap_or(0));
        return Rendu {
            texte: format!("{mantisse}e0"),
            nul: true,
        };
    }

    let ((m, frac), e) = mantisse_exposant(r, precision, pas);
    let texte = scaled_to_decimal(m, frac);
    let texte = if precision.is_none() {
        sans_zeros_finaux(texte)
    } else {
        texte
    };
    Rendu {
        texte: format!("{texte}e{e}"),
        nul: false,
    }
}

/// ((mantisse scalée, chiffres fractionnaires), exposant). r non nul.
fn mantisse_exposant(r: &BigRational, precision: Option<usize>, pas: i64) -> ((BigInt, usize), i64) {
    let mut e10 = exposant10(r);
    loop {
        let e = e10.div_euclid(pas) * pas;
        let entiers = (e10 - e + 1) as usize;
        let frac = match precision {
            Some(p) => p,
            None => CHIFFRES_AUTO.saturating_sub(entiers),
        };
        let m = arrondi_scale(r, frac as i64 - e);
        // 9.99.. arrondi à 10.0 : un chiffre entier de trop, on refait avec e10 + 1
        if m.abs() >= pow10(frac + entiers) {
            e10 += 1;
            continue;
        }
        return ((m, frac), e);
    }
}

/// Fixe si 10^-5 <= |r| < 10^chiffres, scientifique sinon ; zéros finaux toujours retirés.
fn format_general(r: &BigRational, precision: Option<usize>) -> Rendu {
    let significatifs = precision.unwrap_or(CHIFFRES_AUTO).max(1);
    if r.is_zero() {
        return Rendu {
            texte: "0".to_string(),
            nul: true,
        };
    }

    let ((m, frac), e) = mantisse_exposant(r, Some(significatifs - 1), 1);
    if e < -5 || e >= significatifs as i64 {
        let texte = sans_zeros_finaux(scaled_to_decimal(m, frac));
        return Rendu {
            texte: format!("{texte}e{e}"),
            nul: false,
        };
    }

    let frac = (significatifs as i64 - 1 - e).max(0) as usize;
    Rendu {
        texte: sans_zeros_finaux(scaled_to_decimal(arrondi_scale(r, frac as i64), frac)),
        nul: false,
    }
}

/// Nombre de chiffres fractionnaires en base `base` couvrant 10^-max(p, 20).
fn chiffres_radix(base: u32, precision: Option<usize>) -> usize {
    let decimal = precision.unwrap_or(CHIFFRES_AUTO).max(CHIFFRES_AUTO);
    let cible = pow10(decimal);
    let b = BigInt::from(base);
    let mut k = 0;
    let mut p = BigInt::one();
    while p < cible {
        p *= &b;
        k += 1;
    }
    k
}

/// Partie fractionnaire tronquée (pas arrondie), zéros finaux retirés.
fn format_radix(r: &BigRational, base: u32, prefixe: &str, precision: Option<usize>) -> Rendu {
    let k = chiffres_radix(base, precision);
    let a = r.abs();
    let entier = a.trunc().to_integer();
    let frac = (a.fract() * BigRational::from_integer(BigInt::from(base).pow(k as u32)))
        .trunc()
        .to_integer();

    let nul = entier.is_zero() && frac.is_zero();
    let signe = if r.is_negative() && !nul { "-" } else { "" };

    let mut texte = format!("{signe}{prefixe}{}", entier.to_str_radix(base));
    if !frac.is_zero() {
        let mut f = frac.to_str_radix(base);
        while f.len() < k {
            f.insert(0, '0');
        }
        texte.push('.');
        texte.push_str(f.trim_end_matches('0'));
    }
    Rendu { texte, nul }
}
