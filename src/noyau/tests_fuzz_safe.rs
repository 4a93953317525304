//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le moteur sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée, valeurs petites (rationnels courts, exposants bornés)
//! - budget temps global
//! - invariants clés : aucune panique, l’invalide contamine tout,
//!   et une quantité invalide s’affiche "NaN" quel que soit le format

use std::time::{Duration, Instant};

use super::contexte::Contexte;
use super::fonctions::Fonctions;
use super::format::format_quantite;
use super::quantite::Quantite;
use super::reel::Reel;
use super::unites;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération (bornée) ------------------------ */

const CODES: [char; 7] = ['f', 'e', 'n', 'g', 'b', 'o', 'h'];

fn gen_litteral(rng: &mut Rng) -> String {
    let a = rng.pick(13) as i64 - 6;
    let b = rng.pick(100);
    match rng.pick(6) {
        0 => format!("{a}"),
        1 => format!("{a}.{b}"),
        2 => format!("{a}+{b}j"),
        3 => format!("{b}j"),
        4 => format!("0x{:x}", b),
        // littéral malformé : doit finir en NaN, jamais en panique
        _ => format!("{a}..{b}"),
    }
}

fn gen_unite(rng: &mut Rng) -> Quantite {
    match rng.pick(8) {
        0 => unites::meter(),
        1 => unites::second(),
        2 => unites::kilogram(),
        3 => unites::ampere(),
        4 => unites::joule(),
        5 => unites::foot(),
        _ => Quantite::from(1i64),
    }
}

fn gen_quantite(rng: &mut Rng) -> Quantite {
    let v = Quantite::depuis_texte(&gen_litteral(rng));
    &v * &gen_unite(rng)
}

fn gen_expr(rng: &mut Rng, f: &Fonctions<'_>, depth: usize) -> Quantite {
    if depth == 0 {
        return gen_quantite(rng);
    }

    let a = gen_expr(rng, f, depth - 1);
    match rng.pick(12) {
        0 => &a + &gen_expr(rng, f, depth - 1),
        1 => &a - &gen_expr(rng, f, depth - 1),
        2 => &a * &gen_expr(rng, f, depth - 1),
        3 => &a / &gen_expr(rng, f, depth - 1),
        4 => {
            // exposant borné : entier ou fraction courte
            let n = rng.pick(7) as i64 - 3;
            let d = rng.pick(3) as i64 + 1;
            f.raise(&a, &Quantite::from(Reel::rationnel(n, d)))
        }
        5 => f.sqrt(&a),
        6 => f.cbrt(&a),
        7 => f.abs(&a),
        8 => f.round(&a, rng.pick(4) as i64),
        9 => f.sin(&a),
        10 => -&a,
        _ => f.conj(&a),
    }
}

fn rendus(q: &Quantite, ctx: &Contexte) -> Vec<String> {
    CODES
        .iter()
        .map(|&c| format_quantite(q, c, None, ctx))
        .collect()
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_nan() {
    let t0 = Instant::now();
    let max = Duration::from_secs(60);

    let ctx = Contexte::default();
    let f = Fonctions::new(&ctx);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut rng_bis = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_nan = 0usize;

    for _ in 0..60 {
        budget(t0, max);

        let x = gen_expr(&mut rng, &f, 3);
        let y = gen_expr(&mut rng_bis, &f, 3);

        // même seed => mêmes sorties
        let rx = rendus(&x, &ctx);
        assert_eq!(rx, rendus(&y, &ctx));

        if x.est_valide() {
            seen_ok += 1;
            assert!(rx.iter().all(|s| s != "NaN"), "{rx:?}");
        } else {
            seen_nan += 1;
            assert!(rx.iter().all(|s| s == "NaN"), "{rx:?}");
        }
    }

    // un mix des deux, sinon le fuzz ne “balaye” rien
    assert!(seen_ok > 2, "trop peu de succès: {seen_ok}");
    assert!(seen_nan > 0, "aucun NaN vu: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_invalide_contamine() {
    let t0 = Instant::now();
    let max = Duration::from_secs(30);

    let ctx = Contexte::default();
    let f = Fonctions::new(&ctx);
    let nan = Quantite::depuis_texte("1..2");
    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..80 {
        budget(t0, max);

        let x = gen_quantite(&mut rng);
        let (g, d) = if rng.coin() { (&nan, &x) } else { (&x, &nan) };
        for r in [g + d, g - d, g * d, g / d, f.raise(g, d)] {
            assert!(!r.est_valide());
            assert_eq!(format_quantite(&r, 'f', Some(5), &ctx), "NaN");
        }
        for r in [f.sqrt(&nan), f.abs(&nan), f.sin(&nan), -&nan] {
            assert!(!r.est_valide());
        }
    }
}

#[test]
fn fuzz_safe_dimensions_incompatibles() {
    let t0 = Instant::now();
    let max = Duration::from_secs(30);

    let mut rng = Rng::new(0x5EED_u64);
    let ctx = Contexte::default();

    for _ in 0..100 {
        budget(t0, max);

        let a = gen_quantite(&mut rng);
        let b = gen_quantite(&mut rng);
        let s = &a + &b;
        if a.est_valide() && b.est_valide() {
            assert_eq!(s.est_valide(), a.dimension() == b.dimension());
            if s.est_valide() {
                assert_eq!(s.dimension(), a.dimension());
            }
        } else {
            assert_eq!(format_quantite(&s, 'g', None, &ctx), "NaN");
        }
    }
}

#[test]
fn fuzz_safe_mode_complexe_bascule() {
    let t0 = Instant::now();
    let max = Duration::from_secs(60);

    let off = Contexte::default();
    let on = Contexte::default().avec_mode_complexe(true);
    let f_off = Fonctions::new(&off);
    let f_on = Fonctions::new(&on);
    let mut rng = Rng::new(0xFACADE_u64);

    for _ in 0..40 {
        budget(t0, max);

        let base = gen_quantite(&mut rng);
        let n = rng.pick(9) as i64 - 4;
        let e = Quantite::from(n);

        // exposant entier : le mode ne change rien
        let a = f_off.raise(&base, &e);
        let b = f_on.raise(&base, &e);
        assert_eq!(a.est_valide(), b.est_valide());
        assert_eq!(format_quantite(&a, 'g', None, &off), format_quantite(&b, 'g', None, &on));

        // algèbre des unités : idem (le produit ne lit même pas le contexte)
        let u = gen_unite(&mut rng);
        let p = &base * &u;
        assert_eq!(format_quantite(&p, 'f', None, &off), format_quantite(&p, 'f', None, &on));
    }
}
