//! Scenario tests
//!
//! Decoding of the manifests under `sample-playlists/`:
//! - Master playlists (variants, renditions, i-frame streams)
//! - Media playlists (byte ranges, cues, date-times, discontinuities)
//! - Custom tag decoders
//! - Malformed input in strict and lenient mode
//! - Decode/encode round trips

pub mod custom_tags;
pub mod fixtures;
