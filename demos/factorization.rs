//! Polynomial Factorization
//!
//! This example demonstrates:
//! - Arithmetic in prime and extension fields
//! - Square-free factorization
//! - Berlekamp's algorithm
//! - Full factorization into irreducible factors
//!
//! Run with: cargo run --example factorization

use ffactor::{
    berlekamp, ExtensionField, FieldElement, FiniteField, Poly, PrimeField, Result,
};

fn main() -> Result<()> {
    let f17 = PrimeField::new(17)?;

    println!("=== Polynomial Factorization over {} ===\n", f17);

    // --- Field arithmetic ---
    println!("--- Field Arithmetic ---\n");

    let a = f17.get(5);
    let b = f17.get(-3);
    println!("a = {}, b = {}", a, b);
    println!("a + b = {}", a.try_add(&b)?);
    println!("a * b = {}", a.try_mul(&b)?);
    println!("a^-1 = {}", a.inverse()?);
    println!();

    // --- Square-Free Factorization ---
    println!("--- Square-Free Factorization ---\n");

    // f(x) = (x - 1)^2 * (x - 2) * (x - 3)^3
    let x_minus_1 = f17.poly(&[-1, 1]);
    let x_minus_2 = f17.poly(&[-2, 1]);
    let x_minus_3 = f17.poly(&[-3, 1]);

    let f = x_minus_1
        .try_mul(&x_minus_1)?
        .try_mul(&x_minus_2)?
        .try_mul(&x_minus_3)?
        .try_mul(&x_minus_3)?
        .try_mul(&x_minus_3)?;

    println!("f(x) = (x-1)^2 * (x-2) * (x-3)^3");
    println!("f(x) = {}", f);
    println!();

    println!("Square-free factorization:");
    for (factor, multiplicity) in f.square_free_factorization()? {
        println!("  {}  (multiplicity {})", factor, multiplicity);
    }
    println!();

    // --- Berlekamp ---
    println!("--- Berlekamp ---\n");

    // g(x) = (x - 1)(x - 2)(x^2 - 3); x^2 - 3 is irreducible since 3 is not a square mod 17
    let quadratic = f17.poly(&[-3, 0, 1]);
    let g = x_minus_1.try_mul(&x_minus_2)?.try_mul(&quadratic)?;

    println!("g(x) = (x-1)(x-2)(x^2-3)");
    println!("g(x) = {}", g);
    println!("irreducible factors:");
    for factor in berlekamp(&g)? {
        println!("  {}", factor);
    }
    println!();

    // --- Full Factorization ---
    println!("--- Full Factorization ---\n");

    let h = x_minus_1.try_mul(&x_minus_1)?.try_mul(&quadratic)?.scale(&f17.get(4))?;
    println!("h(x) = 4 * (x-1)^2 * (x^2-3)");
    println!("h(x) = {}", h);

    let factors = h.factor()?;
    println!("Complete factorization:");
    for (factor, multiplicity) in &factors {
        println!("  {}  (multiplicity {})", factor, multiplicity);
    }

    let mut reconstructed = Poly::constant(f17.one());
    for (factor, multiplicity) in &factors {
        for _ in 0..*multiplicity {
            reconstructed = reconstructed.try_mul(factor)?;
        }
    }
    println!("Reconstruction matches: {}", reconstructed == h.monic()?);
    println!();

    // --- Extension fields ---
    println!("--- Factoring over an Extension Field ---\n");

    let f3 = PrimeField::new(3)?;
    let f9 = ExtensionField::new(f3.poly(&[1, 0, 1]))?;
    println!("Working in {} ({} elements)", f9, f9.size());

    let p = f9.poly(&[2, 1, 1]);
    println!("p(x) = {} is irreducible over {}: {}", p, f3, f3.poly(&[2, 1, 1]).is_irreducible()?);
    println!("over {} it splits as:", f9);
    for factor in berlekamp(&p)? {
        println!("  {}", factor);
    }

    Ok(())
}
