use texwriter::syntax::{SyntaxStyles, TagKind};
use texwriter::theme::{
    list_available_themes, Color, Theme, ThemeSource, BUILTIN_THEMES, DEFAULT_DARK_YAML,
    DEFAULT_LIGHT_YAML,
};

#[test]
fn test_color_from_hex_6() {
    let color = Color::from_hex("#008000").unwrap();
    assert_eq!(color.r, 0x00);
    assert_eq!(color.g, 0x80);
    assert_eq!(color.b, 0x00);
    assert_eq!(color.a, 255);
}

#[test]
fn test_color_from_hex_8() {
    let color = Color::from_hex("#D3D3D380").unwrap();
    assert_eq!(color.r, 0xD3);
    assert_eq!(color.a, 0x80);
}

#[test]
fn test_color_from_hex_invalid() {
    assert!(Color::from_hex("#12345").is_err());
    assert!(Color::from_hex("#GGGGGG").is_err());
    assert!(Color::from_hex("#ééé").is_err());
}

#[test]
fn test_default_light_is_reference_styling() {
    let theme = Theme::from_yaml(DEFAULT_LIGHT_YAML).unwrap();
    assert_eq!(theme.name, "Default Light");
    assert_eq!(theme.syntax, SyntaxStyles::reference());
    assert_eq!(Theme::default().syntax, SyntaxStyles::reference());
}

#[test]
fn test_default_dark_yaml_parses() {
    let theme = Theme::from_yaml(DEFAULT_DARK_YAML).unwrap();
    assert_eq!(theme.name, "Default Dark");
    assert!(theme.syntax.get(TagKind::InlineMath).background.is_some());
    assert!(theme.syntax.get(TagKind::Comment).foreground.is_some());
}

#[test]
fn test_from_builtin() {
    let theme = Theme::from_builtin("default-dark").unwrap();
    assert_eq!(theme.name, "Default Dark");

    let result = Theme::from_builtin("nonexistent");
    assert!(result.is_err());
}

#[test]
fn test_all_builtin_themes_parse() {
    for builtin in BUILTIN_THEMES {
        let theme = Theme::from_yaml(builtin.yaml)
            .unwrap_or_else(|e| panic!("Failed to parse theme '{}': {}", builtin.id, e));
        assert!(
            !theme.name.is_empty(),
            "Theme '{}' has empty name",
            builtin.id
        );
    }
}

#[test]
fn test_missing_categories_are_unstyled() {
    let yaml = r##"
version: 1
name: "Comments Only"
syntax:
  comment:
    foreground: "#FF0000"
"##;
    let theme = Theme::from_yaml(yaml).unwrap();
    assert_eq!(
        theme.syntax.get(TagKind::Comment).foreground,
        Some(Color::rgb(0xFF, 0, 0))
    );
    assert_eq!(theme.syntax.get(TagKind::Command).foreground, None);
}

#[test]
fn test_bad_color_rejected() {
    let yaml = r##"
version: 1
name: "Broken"
syntax:
  command:
    foreground: "green"
"##;
    assert!(Theme::from_yaml(yaml).is_err());
}

#[test]
fn test_builtins_listed() {
    let themes = list_available_themes();
    for builtin in BUILTIN_THEMES {
        assert!(
            themes.iter().any(|t| t.id == builtin.id),
            "missing {}",
            builtin.id
        );
    }
    assert!(themes
        .iter()
        .filter(|t| t.source == ThemeSource::Builtin)
        .all(|t| !t.name.is_empty()));
}
