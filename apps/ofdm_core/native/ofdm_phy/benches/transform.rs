//! Transform and receiver benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ofdm_phy::*;
use rustfft::num_complex::Complex64;

fn default_symbol() -> (OfdmConfig, Vec<Complex64>) {
    let config = OfdmConfig::standard().unwrap();
    let bits: Vec<u8> = (0..config.payload_bits()).map(|i| (i % 3 == 0) as u8).collect();
    let (data, _) = modulate(&bits, config.modulation()).unwrap();
    let symbol = build_symbol(&data, config.grid(), config.pilot_value()).unwrap();
    (config, symbol)
}

fn benchmark_time_domain_64(c: &mut Criterion) {
    let (config, symbol) = default_symbol();
    let transform = OfdmTransform::new(config.subcarriers(), config.cp_len()).unwrap();

    c.bench_function("ifft_cp_64_subcarriers", |b| {
        b.iter(|| black_box(transform.to_time_domain(&symbol).unwrap()))
    });
}

fn benchmark_receiver_64(c: &mut Criterion) {
    let (config, symbol) = default_symbol();
    let transform = OfdmTransform::new(config.subcarriers(), config.cp_len()).unwrap();
    let wave = transform.to_time_domain(&symbol).unwrap();
    let rx = config.channel().apply(&wave, 1).unwrap().samples;
    let receiver = Receiver::new(&config).unwrap();

    c.bench_function("receive_64_subcarriers", |b| {
        b.iter(|| black_box(receiver.process(&rx).unwrap()))
    });
}

criterion_group!(benches, benchmark_time_domain_64, benchmark_receiver_64);
criterion_main!(benches);
