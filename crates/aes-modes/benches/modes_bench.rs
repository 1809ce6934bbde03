use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use aes_modes::{
    cbc_crypt_in_place, ctr_crypt_in_place, data_unit_from_sector, Aes, CtrState, Direction,
    XtsContext,
};

fn bench_streaming(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
    let mut key = [0u8; 16];
    rng.fill_bytes(&mut key);
    let cipher = Aes::with_key(&key).expect("valid key");

    let mut group = c.benchmark_group("streaming");
    group.throughput(Throughput::Bytes(4096));
    group.bench_function("cbc_encrypt_4k", |b| {
        let mut data = vec![0u8; 4096];
        rng.fill_bytes(&mut data);
        b.iter(|| {
            let mut iv = [0u8; 16];
            cbc_crypt_in_place(&cipher, Direction::Encrypt, &mut iv, &mut data).expect("cbc");
        });
    });
    group.bench_function("ctr_4k", |b| {
        let mut data = vec![0u8; 4096];
        b.iter(|| {
            let mut state = CtrState::new([0u8; 16]);
            ctr_crypt_in_place(&cipher, &mut state, &mut data).expect("ctr");
        });
    });
    group.finish();
}

fn bench_xts(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
    let mut key = [0u8; 64];
    rng.fill_bytes(&mut key);
    let mut ctx = XtsContext::new();
    ctx.set_key_enc(&key).expect("valid key");

    let mut group = c.benchmark_group("xts");
    for len in [512usize, 4096, 4100] {
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_function(format!("encrypt_{len}"), |b| {
            let mut data = vec![0u8; len];
            rng.fill_bytes(&mut data);
            b.iter(|| {
                ctx.crypt_xts_in_place(Direction::Encrypt, &data_unit_from_sector(42), &mut data)
                    .expect("xts");
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_streaming, bench_xts);
criterion_main!(benches);
