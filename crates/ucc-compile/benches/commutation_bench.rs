//! Benchmarks for commutation analysis
//!
//! Run with: cargo bench -p ucc-compile

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ucc_compile::CompileResult;
use ucc_compile::commutation::{
    CheckerConfig, CommutationAnalysis, CommutationChecker, CommutationOracle, QubitPlacement,
};
use ucc_ir::{Circuit, Instruction, QubitId};

/// Stand-in for a matrix check: non-commuting unless both act on one qubit.
fn single_qubit_backend(
    first: &Instruction,
    second: &Instruction,
    _: &QubitPlacement,
) -> CompileResult<bool> {
    Ok(first.qubits.len() == 1 && second.qubits.len() == 1)
}

fn checker() -> CommutationChecker {
    CommutationChecker::new(CheckerConfig::default())
        .unwrap()
        .with_backend(single_qubit_backend)
}

/// Layered circuit mixing diagonal, X-axis and entangling gates.
fn layered(num_qubits: u32, layers: u32) -> Circuit {
    let mut circuit = Circuit::with_size("layered", num_qubits, 0);
    for layer in 0..layers {
        for q in 0..num_qubits {
            circuit.rz(0.1 * f64::from(layer + 1), QubitId(q)).unwrap();
            circuit.sx(QubitId(q)).unwrap();
        }
        for q in (layer % 2..num_qubits.saturating_sub(1)).step_by(2) {
            circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
        }
    }
    circuit
}

/// Benchmark analysis of QFT circuits (table-dominated)
fn bench_qft(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis_qft");

    for n in &[4_u32, 8, 16, 32] {
        let circuit = Circuit::qft(*n).unwrap();
        group.bench_with_input(BenchmarkId::new("sequential", n), &circuit, |b, circuit| {
            b.iter(|| {
                CommutationAnalysis::with_oracle(checker())
                    .build(black_box(circuit.dag()))
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark sequential versus parallel wire scans
fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis_layered");

    for n in &[8_u32, 32, 64] {
        let circuit = layered(*n, 20);
        for parallel in [false, true] {
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, n), &circuit, |b, circuit| {
                b.iter(|| {
                    CommutationAnalysis::with_oracle(checker())
                        .with_parallel(parallel)
                        .build(black_box(circuit.dag()))
                        .unwrap()
                });
            });
        }
    }

    group.finish();
}

/// Benchmark the oracle fast paths and a warm cache
fn bench_oracle(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle");

    let rz = Instruction::single_qubit_gate(ucc_ir::StandardGate::Rz(0.5.into()), QubitId(0));
    let cz = Instruction::two_qubit_gate(ucc_ir::StandardGate::CZ, QubitId(0), QubitId(1));
    let h = Instruction::single_qubit_gate(ucc_ir::StandardGate::H, QubitId(0));
    let cx = Instruction::two_qubit_gate(ucc_ir::StandardGate::CX, QubitId(0), QubitId(1));
    let far = Instruction::single_qubit_gate(ucc_ir::StandardGate::H, QubitId(5));

    let oracle = checker();
    group.bench_function("disjoint", |b| {
        b.iter(|| oracle.commutes(black_box(&h), black_box(&far)).unwrap());
    });
    group.bench_function("table", |b| {
        b.iter(|| oracle.commutes(black_box(&rz), black_box(&cz)).unwrap());
    });
    group.bench_function("cached", |b| {
        b.iter(|| oracle.commutes(black_box(&h), black_box(&cx)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_qft, bench_parallel, bench_oracle);
criterion_main!(benches);
