//! Benchmarks for curve arithmetic, signing and derivation

use coinkey::bip32::{ExtendedPrivateKey, Network, HARDENED_OFFSET};
use coinkey::ec::{FIELD_ELEMENT_SIZE, SCALAR_SIZE};
use coinkey::{
    base_point_g, derive_public_key, random_private_key, scalar_mult_base_g, sign,
    verify, FieldElement, Point, Scalar,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::OsRng;
use rand::RngCore;

/// Generate a random field element for benchmarking
fn random_field_element() -> FieldElement {
    let mut bytes = [0u8; FIELD_ELEMENT_SIZE];
    loop {
        OsRng.fill_bytes(&mut bytes);
        if let Ok(fe) = FieldElement::from_bytes(&bytes) {
            return fe;
        }
    }
}

/// Generate a random point on the curve for benchmarking
fn random_point() -> Point {
    scalar_mult_base_g(&random_private_key(&mut OsRng))
}

fn bench_field_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("field");

    let a = random_field_element();
    let b = random_field_element();

    group.bench_function("add", |bench| {
        bench.iter(|| black_box(&a).add(black_box(&b)));
    });

    group.bench_function("mul", |bench| {
        bench.iter(|| black_box(&a).mul(black_box(&b)));
    });

    group.bench_function("square", |bench| {
        bench.iter(|| black_box(&a).square());
    });

    group.bench_function("invert", |bench| {
        bench.iter(|| black_box(&a).invert().expect("inversion should succeed"));
    });

    group.bench_function("sqrt", |bench| {
        // Use a known square for consistent benchmarking
        let square = a.square();
        bench.iter(|| black_box(&square).sqrt());
    });

    group.finish();
}

fn bench_point_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("point");

    let p1 = random_point();
    let p2 = random_point();

    group.bench_function("add", |bench| {
        bench.iter(|| black_box(&p1).add(black_box(&p2)));
    });

    group.bench_function("double", |bench| {
        bench.iter(|| black_box(&p1).double());
    });

    group.bench_function("serialize_compressed", |bench| {
        bench.iter(|| black_box(&p1).serialize_compressed());
    });

    group.bench_function("deserialize_compressed", |bench| {
        let compressed = p1.serialize_compressed();
        bench.iter(|| {
            Point::deserialize_compressed(black_box(&compressed))
                .expect("decompression should succeed")
        });
    });

    group.finish();
}

fn bench_scalar_multiplication(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_mult");

    let scalar = random_private_key(&mut OsRng);
    let point = random_point();
    let base_g = base_point_g();

    group.bench_function("base_point", |bench| {
        bench.iter(|| scalar_mult_base_g(black_box(&scalar)));
    });

    group.bench_function("random_point", |bench| {
        bench.iter(|| black_box(&point).mul(black_box(&scalar)));
    });

    group.bench_function("small_scalar", |bench| {
        let mut small_bytes = [0u8; SCALAR_SIZE];
        small_bytes[31] = 42;
        let small_scalar = Scalar::new(small_bytes).expect("scalar creation should succeed");
        bench.iter(|| black_box(&base_g).mul(black_box(&small_scalar)));
    });

    group.finish();
}

fn bench_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ecdsa");

    let secret = random_private_key(&mut OsRng);
    let public = derive_public_key(&secret);
    let msg_hash = [0x42u8; 32];
    let signature = sign(&msg_hash, &secret).expect("signing should succeed");

    group.bench_function("sign", |bench| {
        bench.iter(|| sign(black_box(&msg_hash), black_box(&secret)));
    });

    group.bench_function("verify", |bench| {
        bench.iter(|| verify(black_box(&msg_hash), black_box(&signature), black_box(&public)));
    });

    group.finish();
}

fn bench_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("bip32");
    group.sample_size(20);

    let mut seed = [0u8; 32];
    OsRng.fill_bytes(&mut seed);
    let master = ExtendedPrivateKey::master_from_seed(&seed, Network::Mainnet)
        .expect("master derivation should succeed");

    group.bench_function("master_from_seed", |bench| {
        bench.iter(|| {
            ExtendedPrivateKey::master_from_seed(black_box(&seed), Network::Mainnet)
                .expect("master derivation should succeed")
        });
    });

    group.bench_function("derive_hardened_child", |bench| {
        bench.iter(|| {
            black_box(&master)
                .derive_child(HARDENED_OFFSET)
                .expect("derivation should succeed")
        });
    });

    group.bench_function("derive_normal_child", |bench| {
        bench.iter(|| {
            black_box(&master)
                .derive_child(0)
                .expect("derivation should succeed")
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_field_arithmetic,
    bench_point_operations,
    bench_scalar_multiplication,
    bench_signing,
    bench_derivation
);
criterion_main!(benches);
