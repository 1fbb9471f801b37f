#![no_main]

//! Fuzz target for playlist decoding.
//!
//! Feeds arbitrary bytes to every decode entry point in both modes and
//! renders whatever decodes successfully.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use hls_playlist::{decode_from, MasterPlaylist, MediaPlaylist};

#[derive(Arbitrary, Debug)]
struct DecodeInput {
    data: Vec<u8>,
    strict: bool,
    target: Target,
}

#[derive(Arbitrary, Debug)]
enum Target {
    Autodetect,
    Master,
    Media { window: u8, capacity: u8 },
}

fuzz_target!(|input: DecodeInput| {
    if input.data.len() > 64 * 1024 {
        return;
    }
    let data = &input.data[..];

    match input.target {
        Target::Autodetect => {
            if let Ok((playlist, _)) = decode_from(data, input.strict) {
                let _ = playlist.encode();
            }
        }
        Target::Master => {
            let mut p = MasterPlaylist::new();
            if p.decode_from(data, input.strict).is_ok() {
                let _ = p.encode();
            }
        }
        Target::Media { window, capacity } => {
            let Ok(mut p) = MediaPlaylist::new(window as usize, capacity as usize) else {
                return;
            };
            if p.decode_from(data, input.strict).is_ok() {
                let _ = p.encode();
                let _ = p.append("fuzz.ts", 1.0, "");
            }
        }
    }
});
