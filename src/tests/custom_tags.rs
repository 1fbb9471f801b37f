//! Custom tag decoders

use std::sync::Arc;

use super::fixtures::*;
use crate::custom::{CustomDecoder, TagScope};
use crate::decode::decode_with;
use crate::error::PlaylistError;
use crate::playlist::{MasterPlaylist, MediaPlaylist};
use crate::types::ListType;

fn media_decoders() -> Vec<Arc<dyn CustomDecoder>> {
    vec![
        Arc::new(MockDecoder::new(
            "#CUSTOM-PLAYLIST-TAG:",
            TagScope::Playlist,
            "#CUSTOM-PLAYLIST-TAG:42",
        )),
        Arc::new(MockDecoder::new(
            "#CUSTOM-SEGMENT-TAG:",
            TagScope::Segment,
            "#CUSTOM-SEGMENT-TAG:NAME=\"Yoda\",JEDI=YES",
        )),
        Arc::new(MockDecoder::new(
            "#CUSTOM-SEGMENT-TAG-B",
            TagScope::Segment,
            "#CUSTOM-SEGMENT-TAG-B",
        )),
    ]
}

#[test]
fn test_master_decoder_error_aborts() {
    let decoder = Arc::new(MockDecoder::failing(
        "#CUSTOM-PLAYLIST-TAG:",
        TagScope::Playlist,
        "Error decoding tag",
    ));
    let err = decode_with(MASTER_CUSTOM_TAGS.as_bytes(), true, vec![decoder]).unwrap_err();
    match err {
        PlaylistError::CustomTag { tag, source } => {
            assert_eq!(tag, "#CUSTOM-PLAYLIST-TAG:");
            assert_eq!(source.to_string(), "Error decoding tag");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_master_custom_tag() {
    let decoder = Arc::new(MockDecoder::new(
        "#CUSTOM-PLAYLIST-TAG:",
        TagScope::Playlist,
        "#CUSTOM-PLAYLIST-TAG:42",
    ));
    let (playlist, list_type) =
        decode_with(MASTER_CUSTOM_TAGS.as_bytes(), true, vec![decoder]).unwrap();
    assert_eq!(list_type, ListType::Master);
    let p = playlist.into_master().unwrap();
    assert_eq!(p.custom.len(), 1);
    assert!(p.custom.contains_key("#CUSTOM-PLAYLIST-TAG:"));
    assert!(p.to_string().contains("#CUSTOM-PLAYLIST-TAG:42\n"));
}

#[test]
fn test_master_segment_scope_lands_on_playlist() {
    let decoder = Arc::new(MockDecoder::new(
        "#CUSTOM-PLAYLIST-TAG:",
        TagScope::Segment,
        "#CUSTOM-PLAYLIST-TAG:42",
    ));
    let mut p = MasterPlaylist::new().with_custom_decoders(vec![decoder]);
    p.decode_from(MASTER_CUSTOM_TAGS.as_bytes(), true).unwrap();
    assert!(p.custom.contains_key("#CUSTOM-PLAYLIST-TAG:"));
}

#[test]
fn test_media_decoder_error_aborts() {
    let decoder = Arc::new(MockDecoder::failing(
        "#CUSTOM-PLAYLIST-TAG:",
        TagScope::Playlist,
        "Error decoding tag",
    ));
    let err = decode_with(MEDIA_CUSTOM_TAGS.as_bytes(), true, vec![decoder]).unwrap_err();
    assert!(matches!(err, PlaylistError::CustomTag { .. }));
    assert!(!err.is_format_error());
}

#[test]
fn test_media_custom_tags() {
    let (playlist, list_type) =
        decode_with(MEDIA_CUSTOM_TAGS.as_bytes(), true, media_decoders()).unwrap();
    assert_eq!(list_type, ListType::Media);
    let p = playlist.into_media().unwrap();

    assert_eq!(p.custom.len(), 1);
    assert!(p.custom.contains_key("#CUSTOM-PLAYLIST-TAG:"));

    let names: Vec<Vec<&str>> = p
        .segments()
        .map(|s| s.custom.iter().map(|(name, _)| name).collect())
        .collect();
    assert_eq!(
        names,
        vec![
            vec![],
            vec!["#CUSTOM-SEGMENT-TAG:"],
            vec!["#CUSTOM-SEGMENT-TAG:", "#CUSTOM-SEGMENT-TAG-B"],
            vec![],
        ]
    );

    let text = p.to_string();
    assert!(text.contains("#EXT-X-TARGETDURATION:10\n"));
    assert!(text.contains("#EXT-X-VERSION:3\n#CUSTOM-PLAYLIST-TAG:42\n"));
    assert!(text.contains("#CUSTOM-SEGMENT-TAG:NAME=\"Yoda\",JEDI=YES\n#EXTINF:10.000,\nmedia1.ts\n"));
    assert!(text.contains(
        "#CUSTOM-SEGMENT-TAG:NAME=\"Yoda\",JEDI=YES\n#CUSTOM-SEGMENT-TAG-B\n#EXTINF:10.000,\nmedia2.ts\n"
    ));
}

#[test]
fn test_unregistered_custom_tags_are_ignored() {
    let mut p = MediaPlaylist::new(0, 4).unwrap();
    p.decode_from(MEDIA_CUSTOM_TAGS.as_bytes(), true).unwrap();
    assert!(p.custom.is_empty());
    assert!(p.segments().all(|s| s.custom.is_empty()));
    assert!(!p.to_string().contains("CUSTOM"));
}

#[test]
fn test_decoders_kept_on_playlist() {
    let mut p = MediaPlaylist::new(0, 4)
        .unwrap()
        .with_custom_decoders(media_decoders());
    assert_eq!(p.custom_decoders().len(), 3);
    p.decode_from(MEDIA_CUSTOM_TAGS.as_bytes(), true).unwrap();
    assert_eq!(p.segment(2).unwrap().custom.len(), 2);
}
