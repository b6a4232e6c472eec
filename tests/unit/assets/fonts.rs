use super::*;
use crate::test_support::{test_font, test_font_path};

#[test]
fn normalize_rel_path_cleans_and_rejects() {
    assert_eq!(
        normalize_rel_path("fonts\\Inter-Black.ttf").unwrap(),
        "fonts/Inter-Black.ttf"
    );
    assert_eq!(normalize_rel_path("./a//b/./c.mp3").unwrap(), "a/b/c.mp3");
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("C:/fonts/x.ttf").is_err());
    assert!(normalize_rel_path("fonts/../../x.ttf").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn resolve_joins_normalized_path() {
    let p = resolve_asset_path(Path::new("/assets"), "audio\\narration.mp3").unwrap();
    assert_eq!(p, Path::new("/assets/audio/narration.mp3"));
}

#[test]
fn garbage_bytes_are_not_a_font() {
    let err = FontBlob::from_bytes("junk.ttf", b"definitely not a font".to_vec()).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn missing_font_file_is_reported() {
    let err = PreparedFonts::load(&FontConfig::default(), Path::new("/nonexistent-assets"))
        .unwrap_err();
    assert!(err.to_string().contains("Inter-Black.ttf"), "{err}");
}

#[test]
fn label_font_reuses_words_font_when_unset() {
    let Some(path) = test_font_path() else {
        return;
    };
    let root = path.parent().unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    let cfg = FontConfig {
        words: name.clone(),
        label: None,
    };
    let fonts = PreparedFonts::load(&cfg, root).unwrap();
    assert!(Arc::ptr_eq(&fonts.words.bytes, &fonts.label.bytes));
    assert!(!fonts.words.family.is_empty());
    assert_eq!(fonts.font_for(FontRole::Label).source, name);
}

#[test]
fn real_font_resolves_a_family() {
    let Some(font) = test_font() else {
        return;
    };
    assert!(!font.family.is_empty());
    assert!(format!("{font:?}").contains("bytes_len"));
}
