//! Decode and encode throughput

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use hls_playlist::{decode_from, MasterPlaylist, MediaPlaylist};

const MASTER: &str = include_str!("../sample-playlists/master-apple.m3u8");

fn live_playlist(segments: usize) -> String {
    let mut text = String::from("#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:10\n#EXT-X-MEDIA-SEQUENCE:0\n");
    for n in 0..segments {
        text.push_str(&format!(
            "#EXT-X-PROGRAM-DATE-TIME:2024-01-01T00:{:02}:{:02}Z\n#EXTINF:10.000,\nsegment{}.ts\n",
            (n / 6) % 60,
            (n % 6) * 10,
            n
        ));
    }
    text
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    group.throughput(Throughput::Bytes(MASTER.len() as u64));
    group.bench_function("master", |b| {
        b.iter(|| {
            let mut p = MasterPlaylist::new();
            p.decode_from(black_box(MASTER.as_bytes()), false).unwrap();
            black_box(p)
        });
    });

    for segments in [100, 10_000] {
        let text = live_playlist(segments);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("media_{}", segments), |b| {
            b.iter(|| {
                let mut p = MediaPlaylist::new(0, 1024).unwrap();
                p.decode_from(black_box(text.as_bytes()), true).unwrap();
                black_box(p)
            });
        });
        group.bench_function(format!("autodetect_{}", segments), |b| {
            b.iter(|| black_box(decode_from(black_box(text.as_bytes()), false).unwrap()));
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    let mut live = MediaPlaylist::new(6, 16).unwrap();
    let mut n = 0u64;
    group.bench_function("live_append_encode", |b| {
        b.iter(|| {
            live.append(format!("segment{}.ts", n), 6.0, "").unwrap();
            n += 1;
            black_box(live.encode())
        });
    });

    let mut vod = MediaPlaylist::new(0, 1024).unwrap();
    vod.decode_from(live_playlist(10_000).as_bytes(), true).unwrap();
    vod.close();
    group.bench_function("vod_10000", |b| b.iter(|| black_box(vod.encode())));

    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
