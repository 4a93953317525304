// src/noyau/jetons.rs
//
// Lecture des littéraux numériques (sans flottants) :
// - décimal : [+-] chiffres [. chiffres] [e|E [+-] chiffres]
// - bases   : [+-] 0x.. | 0o.. | 0b.. (partie fractionnaire admise)
// - complexe: "a+bj", "a-bj", "bj", "j" (i accepté comme unité imaginaire)
//
// Toute autre forme est une erreur de lecture : c’est l’appelant qui décide
// de la transformer en sentinelle invalide.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::echelle::pow10_rationnel;
use super::erreur::{Erreur, ResultatNoyau};

/// Lit un réel exact.
pub fn lire_rationnel(texte: &str) -> ResultatNoyau<BigRational> {
    let s = texte.trim();
    let chars: Vec<char> = s.chars().collect();
    let err = || Erreur::lecture(texte);

    let mut i: usize = 0;

    // Signe
    let mut neg = false;
    if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
        neg = chars[i] == '-';
        i += 1;
    }

    // Préfixe de base
    let mut base: u32 = 10;
    if i + 1 < chars.len() && chars[i] == '0' {
        base = match chars[i + 1] {
            'x' | 'X' => 16,
            'o' | 'O' => 8,
            'b' | 'B' => 2,
            _ => 10,
        };
        if base != 10 {
            i += 2;
        }
    }

    // Partie entière
    let start = i;
    while i < chars.len() && chars[i].is_digit(base) {
        i += 1;
    }
    let int_str: String = chars[start..i].iter().collect();

    // Partie fractionnaire
    let mut frac_str = String::new();
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        let start_f = i;
        while i < chars.len() && chars[i].is_digit(base) {
            i += 1;
        }
        frac_str = chars[start_f..i].iter().collect();
    }

    if int_str.is_empty() && frac_str.is_empty() {
        return Err(err());
    }

    // Exposant décimal (base 10 seulement : en hexa, 'e' est un chiffre)
    let mut exposant: i64 = 0;
    if base == 10 && i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        i += 1;
        let start_e = i;
        if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
            i += 1;
        }
        let chiffres_e = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i == chiffres_e {
            return Err(err());
        }
        let e_str: String = chars[start_e..i].iter().collect();
        exposant = e_str.parse::<i64>().map_err(|_| err())?;
        // garde-fou : 10^exposant doit rester calculable
        if exposant.abs() > 1_000_000 {
            return Err(err());
        }
    }

    if i != chars.len() {
        return Err(err());
    }

    // mantisse entière = int_str ++ frac_str, divisée par base^len(frac)
    let tous: String = format!("{int_str}{frac_str}");
    let mantisse = BigInt::parse_bytes(tous.as_bytes(), base).ok_or_else(err)?;
    let denom = BigInt::from(base).pow(frac_str.len() as u32);

    let mut r = BigRational::new(mantisse, denom);
    if exposant != 0 {
        r *= pow10_rationnel(exposant);
    }
    if neg {
        r = -r;
    }
    Ok(r)
}

/// Lit un complexe exact (re, im).
pub fn lire_complexe(texte: &str) -> ResultatNoyau<(BigRational, BigRational)> {
    let s = texte.trim();
    let chars: Vec<char> = s.chars().collect();

    let dernier = match chars.last() {
        Some(c) => *c,
        None => return Err(Erreur::lecture(texte)),
    };

    if dernier != 'j' && dernier != 'i' {
        return Ok((lire_rationnel(s)?, BigRational::zero()));
    }

    let corps: String = chars[..chars.len() - 1].iter().collect();
    let corps_chars: Vec<char> = corps.chars().collect();

    // séparateur re/im : dernier +/- qui n’est ni en tête ni un signe d’exposant
    let hexa = corps.to_ascii_lowercase().contains("0x");
    let mut coupe: Option<usize> = None;
    for k in (1..corps_chars.len()).rev() {
        let c = corps_chars[k];
        if c != '+' && c != '-' {
            continue;
        }
        let prec = corps_chars[k - 1];
        if !hexa && (prec == 'e' || prec == 'E') {
            continue;
        }
        coupe = Some(k);
        break;
    }

    let (re_txt, im_txt): (String, String) = match coupe {
        Some(k) => (
            corps_chars[..k].iter().collect(),
            corps_chars[k..].iter().collect(),
        ),
        None => (String::new(), corps.clone()),
    };

    let re = if re_txt.trim().is_empty() {
        BigRational::zero()
    } else {
        lire_rationnel(&re_txt)?
    };

    // "j", "+j", "-j" : coefficient implicite 1
    let im = match im_txt.trim() {
        "" | "+" => BigRational::one(),
        "-" => -BigRational::one(),
        t => lire_rationnel(t).map_err(|_| Erreur::lecture(texte))?,
    };

    Ok((re, im))
}
