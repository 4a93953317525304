//! Tests scientifiques (campagne) : invariants + scénarios de référence + limites contrôlées.
//!
//! But : figer le comportement observable du moteur (texte rendu) sur des cas
//! connus, sans faire chauffer la machine.
//! - une propriété ou un scénario par test
//! - comparaisons sur le texte rendu (c’est le contrat vu par l’application)
//! - budget temps global sur les tests de stress
//!
//! Valeurs attendues vérifiées à 50 chiffres (2^π, 2^0.6, (-2)^0.6 principal).

use std::time::{Duration, Instant};

use num_rational::Rational64;

use super::contexte::Contexte;
use super::dimension::DimensionBase;
use super::fonctions::Fonctions;
use super::format::format_quantite;
use super::quantite::Quantite;
use super::reel::Reel;
use super::unites::{ampere, candela, coulomb, foot, joule, kilogram, meter, mole, second};

fn q(s: &str) -> Quantite {
    Quantite::depuis_texte(s)
}

fn rendu(x: &Quantite) -> String {
    format_quantite(x, 'f', None, &Contexte::default())
}

fn reel() -> Contexte {
    Contexte::default()
}

fn complexe() -> Contexte {
    Contexte::default().avec_mode_complexe(true)
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Algèbre des dimensions ------------------------ */

#[test]
fn sci_somme_dimensions_egales() {
    assert_eq!(rendu(&(&meter() + &meter())), "2 meter");
    assert_eq!(rendu(&(&(&q("3") * &mole()) - &(&q("2.5") * &mole()))), "0.5 mole");

    let a = &q("1.5") * &joule();
    let b = &q("2") * &(&(&kilogram() * &meter()) * &(&meter() / &(&second() * &second())));
    let s = &a + &b;
    assert_eq!(s.dimension(), a.dimension());
    assert_eq!(rendu(&s), "3.5 joule");
}

#[test]
fn sci_somme_dimensions_differentes_nan() {
    assert_eq!(rendu(&(&candela() + &second())), "NaN");
    assert_eq!(rendu(&(&meter() - &kilogram())), "NaN");
    assert_eq!(rendu(&(&meter() + &q("1"))), "NaN");
}

#[test]
fn sci_produit_quotient_dimensions() {
    assert_eq!(rendu(&meter()), "1 meter");
    assert_eq!(rendu(&(&q("5") * &meter())), "5 meter");
    assert_eq!(rendu(&-&(&q("5") * &meter())), "-5 meter");
    assert_eq!(rendu(&(&meter() * &meter())), "1 meter²");
    assert_eq!(rendu(&(&kilogram() / &second())), "1 kilogram second^-1");

    let a = &kilogram() * &meter();
    let b = &second() * &second();
    for d in DimensionBase::TOUTES {
        assert_eq!(
            (&a * &b).dimension().exposant(d),
            a.dimension().exposant(d) + b.dimension().exposant(d)
        );
        assert_eq!(
            (&a / &b).dimension().exposant(d),
            a.dimension().exposant(d) - b.dimension().exposant(d)
        );
    }
}

/* ------------------------ Arrondis ------------------------ */

#[test]
fn sci_trunc_idempotent() {
    let ctx = reel();
    let f = Fonctions::new(&ctx);
    for x in ["1.27499", "-1.27499", "0", "123456.789012", "-0.0000009", "3+4.56j"] {
        for n in [-2, 0, 1, 3, 7] {
            let une = f.trunc(&q(x), n);
            let deux = f.trunc(&une, n);
            assert_eq!(une, deux, "x={x} n={n}");
        }
    }
}

#[test]
fn sci_round_trunc_scalaires() {
    let ctx = reel();
    let f = Fonctions::new(&ctx);
    assert_eq!(rendu(&f.round(&q("1.234"), 1)), "1.2");
    assert_eq!(rendu(&f.trunc(&q("1.274"), 1)), "1.2");
    // moitié : loin de zéro
    assert_eq!(rendu(&f.round(&q("0.125"), 2)), "0.13");
    assert_eq!(rendu(&f.round(&q("-0.125"), 2)), "-0.13");
}

#[test]
fn sci_round_trunc_dimensionnes_nan() {
    let ctx = reel();
    let f = Fonctions::new(&ctx);
    let j = &q("1.234") * &joule();
    assert_eq!(rendu(&f.round(&j, 1)), "NaN");
    assert_eq!(rendu(&f.trunc(&j, 1)), "NaN");
}

/* ------------------------ Branches des puissances ------------------------ */

#[test]
fn sci_base_negative_denominateur_impair() {
    let base = &q("-2") * &ampere();
    let e = q("0.6");

    let off = reel();
    assert_eq!(
        rendu(&Fonctions::new(&off).raise(&base, &e)),
        "-1.51571656651039808235 ampere^(3/5)"
    );

    let on = complexe();
    assert_eq!(
        rendu(&Fonctions::new(&on).raise(&base, &e)),
        "(-0.46838217770735830743+1.44153211743623063689j) ampere^(3/5)"
    );
}

#[test]
fn sci_base_negative_denominateur_pair() {
    // dimensionnée : aucune branche, dans les deux modes
    let base = &q("-2") * &ampere();
    for ctx in [reel(), complexe()] {
        assert_eq!(rendu(&Fonctions::new(&ctx).raise(&base, &q("1.5"))), "NaN");
    }

    // sans dimension : branche principale, dans les deux modes
    for ctx in [reel(), complexe()] {
        assert_eq!(rendu(&Fonctions::new(&ctx).raise(&q("-4"), &q("0.5"))), "2j");
    }
}

#[test]
fn sci_base_negative_exposant_irrationnel() {
    let f_off = reel();
    let f_on = complexe();
    let off = Fonctions::new(&f_off);
    let on = Fonctions::new(&f_on);

    let a = off.raise(&q("-2"), &off.pi());
    let b = on.raise(&q("-2"), &on.pi());
    assert_eq!(a, b);
    assert!(!a.valeur().est_reel());
}

#[test]
fn sci_mode_complexe_sans_effet_hors_ambiguite() {
    let f_off = reel();
    let f_on = complexe();
    let off = Fonctions::new(&f_off);
    let on = Fonctions::new(&f_on);

    assert_eq!(rendu(&off.raise(&q("2"), &off.pi())), "8.82497782707628762386");
    assert_eq!(rendu(&on.raise(&q("2"), &on.pi())), "8.82497782707628762386");

    let m = &q("-3") * &meter();
    assert_eq!(off.raise(&m, &q("3")), on.raise(&m, &q("3")));
    assert_eq!(rendu(&off.raise(&m, &q("3"))), "-27 meter^3");

    assert_eq!(&meter() * &second(), &second() * &meter());
    assert_eq!(rendu(&off.cbrt(&q("-8"))), rendu(&on.cbrt(&q("-8"))));
}

#[test]
fn sci_base_dimensionnee_exposant_non_borne_nan() {
    let ctx = reel();
    let f = Fonctions::new(&ctx);
    assert_eq!(rendu(&f.raise(&(&q("2") * &ampere()), &f.pi())), "NaN");
    assert_eq!(rendu(&f.raise(&meter(), &meter())), "NaN");
}

/* ------------------------ Racines et exposants fractionnaires ------------------------ */

#[test]
fn sci_racines_dimensionnees() {
    let ctx = reel();
    let f = Fonctions::new(&ctx);
    assert_eq!(rendu(&f.sqrt(&(&q("36") * &second()))), "6 second^(1/2)");
    assert_eq!(rendu(&f.cbrt(&(&q("125") * &second()))), "5 second^(1/3)");
    assert_eq!(rendu(&f.sqrt(&(&q("36") * &(&second() * &second())))), "6 second");

    let r = f.sqrt(&(&q("2") * &second()));
    assert_eq!(
        r.dimension().exposant(DimensionBase::Temps),
        Rational64::new(1, 2)
    );
    // (√s)² = s
    assert_eq!(
        rendu(&f.raise(&f.sqrt(&(&q("4") * &second())), &q("2"))),
        "4 second"
    );
}

/* ------------------------ Fonctions ------------------------ */

#[test]
fn sci_fonctions_reference() {
    let ctx = reel();
    let f = Fonctions::new(&ctx);
    assert_eq!(rendu(&f.sin(&f.pi())), "0");
    assert_eq!(rendu(&f.sin(&meter())), "NaN");

    let z = &q("3+4j") * &meter();
    assert_eq!(rendu(&f.abs(&z)), "5 meter");
    assert_eq!(rendu(&f.real(&z)), "3 meter");
    assert_eq!(rendu(&f.imag(&z)), "4 meter");
    assert_eq!(rendu(&f.exp(&q("0"))), "1");
    assert_eq!(rendu(&f.ln(&f.exp(&q("2")))), "2");
}

/* ------------------------ Rendu ------------------------ */

#[test]
fn sci_litteral_complexe() {
    assert_eq!(rendu(&q("123.45+654j")), "123.45+654j");
    assert_eq!(rendu(&q("2.5")), "2.5");
    assert_eq!(rendu(&q("abc")), "NaN");
}

#[test]
fn sci_unite_affichage_foot() {
    let mut x = &q("123") * &meter();
    x.set_unite_affichage(Reel::depuis_texte("0.3"), "foot");
    assert_eq!(rendu(&x), "410 foot");

    // rendu seulement : valeur et dimension inchangées
    assert_eq!(x, &q("123") * &meter());

    let en_pieds = (&q("0.6096") * &meter()).convertir(&foot(), "foot");
    assert_eq!(rendu(&en_pieds), "2 foot");
}

#[test]
fn sci_binaire_puis_unite() {
    let ctx = reel();
    let x = q("12365234.45647");
    let attendu = "0b101111001010110110110010.0111010011011011001101111100100110011010111010010010010011110010001";
    assert_eq!(format_quantite(&x, 'b', Some(10), &ctx), attendu);

    let c = &x * &coulomb();
    assert_eq!(format_quantite(&c, 'b', Some(10), &ctx), format!("{attendu} coulomb"));
}

#[test]
fn sci_nan_quel_que_soit_le_code() {
    let ctx = reel();
    let nan = &candela() + &second();
    for code in ['f', 'e', 'n', 'g', 'b', 'o', 'h'] {
        for p in [None, Some(0), Some(10), Some(60)] {
            assert_eq!(format_quantite(&nan, code, p, &ctx), "NaN");
        }
    }
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_somme_longue() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);

    let pas = &q("0.5") * &meter();
    let mut acc = &q("0") * &meter();
    for _ in 0..800 {
        acc = &acc + &pas;
        budget(t0, max);
    }
    assert_eq!(rendu(&acc), "400 meter");
}

#[test]
fn sci_stress_grande_puissance() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);

    let ctx = reel();
    let f = Fonctions::new(&ctx);
    let x = f.raise(&(&q("2") * &meter()), &q("200"));
    budget(t0, max);

    let y = f.raise(&x, &Quantite::from(Reel::rationnel(1, 200)));
    budget(t0, max);
    assert_eq!(rendu(&y), "2 meter");
}

#[test]
fn sci_stress_puissance_entiere_longue() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);

    let ctx = reel();
    let f = Fonctions::new(&ctx);
    let x = f.raise(&q("1.0000001"), &q("200000"));
    budget(t0, max);
    assert!(rendu(&x).starts_with("1.020201339006554538"), "{}", rendu(&x));

    // même chose, exposant négatif et base dimensionnée
    let y = f.raise(&(&q("1.0000001") * &meter()), &q("-200000"));
    budget(t0, max);
    assert!(rendu(&y).starts_with("0.980198674286953910"), "{}", rendu(&y));
    assert!(rendu(&y).ends_with(" meter^-200000"));
}
