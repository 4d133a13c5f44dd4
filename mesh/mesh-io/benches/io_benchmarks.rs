//! Benchmarks for mesh-io operations.
//!
//! Run with: cargo bench -p mesh-io
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-io -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-io -- --baseline main

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_io::{StlEncoding, load_stl, parse_stl, save_stl, write_stl};
use mesh_types::{Facet, FacetMesh};
use tempfile::tempdir;

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Create a rippled height field with `2 * n * n` facets.
#[allow(clippy::cast_precision_loss)]
fn create_terrain(n: usize) -> FacetMesh {
    let height = |i: usize, j: usize| {
        let (x, y) = (i as f64 * 0.1, j as f64 * 0.1);
        x.sin().mul_add(2.0, y.cos() * 3.0)
    };
    let corner = |i: usize, j: usize| [i as f64, j as f64, height(i, j)];

    let mut mesh = FacetMesh::with_capacity(2 * n * n);
    for i in 0..n {
        for j in 0..n {
            mesh.facets.push(Facet::from_arrays(
                corner(i, j),
                corner(i + 1, j),
                corner(i + 1, j + 1),
            ));
            mesh.facets.push(Facet::from_arrays(
                corner(i, j),
                corner(i + 1, j + 1),
                corner(i, j + 1),
            ));
        }
    }
    mesh
}

// =============================================================================
// I/O Benchmarks
// =============================================================================

fn bench_io(c: &mut Criterion) {
    let mut group = c.benchmark_group("IO");

    let terrain = create_terrain(100); // 20k triangles
    let temp_dir = tempdir().expect("failed to create temp dir");

    let mut binary = Vec::new();
    write_stl(&terrain, &mut binary, StlEncoding::Binary).expect("failed to encode binary");
    let mut ascii = Vec::new();
    write_stl(&terrain, &mut ascii, StlEncoding::Ascii).expect("failed to encode ASCII");

    let stl_path = temp_dir.path().join("bench_terrain.stl");
    save_stl(&terrain, &stl_path, StlEncoding::Binary).expect("failed to save STL");

    group.throughput(Throughput::Elements(terrain.facets.len() as u64));

    // Parse benchmarks
    group.bench_function("parse_binary", |b| b.iter(|| parse_stl(black_box(&binary))));

    group.bench_function("parse_ascii", |b| b.iter(|| parse_stl(black_box(&ascii))));

    group.bench_function("load_stl", |b| b.iter(|| load_stl(black_box(&stl_path))));

    // Write benchmarks
    group.bench_function("write_binary", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(binary.len());
            write_stl(black_box(&terrain), &mut out, StlEncoding::Binary)
        });
    });

    let out_stl = temp_dir.path().join("bench_out.stl");
    group.bench_function("save_stl", |b| {
        b.iter(|| save_stl(black_box(&terrain), black_box(&out_stl), StlEncoding::Binary));
    });

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_io);
criterion_main!(benches);
