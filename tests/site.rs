use tvscrape_rs::locate::Target;
use tvscrape_rs::{RecordFormat, ScrapeError, SiteConfig};

#[test]
fn presets_are_complete() {
    for id in tvscrape_rs::site::PRESET_IDS {
        let site = SiteConfig::preset(id).unwrap();
        assert_eq!(site.id, *id);
        assert!(!site.locate.markers.is_empty());
        assert_eq!(site.normalize.default_section, "Otros");
    }
}

#[test]
fn unknown_preset_is_a_config_error() {
    let err = SiteConfig::preset("nope").unwrap_err();
    assert!(matches!(err, ScrapeError::Config(_)));
    assert!(err.to_string().contains("canales"));
}

#[test]
fn target_follows_record_format() {
    let agenda = SiteConfig::preset("agenda").unwrap();
    assert_eq!(agenda.format, RecordFormat::EventsMarkup);
    assert_eq!(agenda.locate_rules().target, Target::Markup);

    let canales = SiteConfig::preset("canales").unwrap();
    assert_eq!(canales.locate_rules().target, Target::Literal);
}

#[test]
fn loads_custom_site_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.toml");
    std::fs::write(
        &path,
        r#"
id = "otro"
start_url = "https://otro.example/tv/"
format = "channels"

[locate]
reference = "lista"
markers = ['var\s+lista\s*=']

[normalize]
slot_prefix = "link"
default_section = "Varios"

[[normalize.sections]]
title = "Fútbol"
keywords = ["futbol", "gol"]

[normalize.display_names]
"tv-uno" = "TV Uno"
"#,
    )
    .unwrap();

    let site = SiteConfig::load(&path).unwrap();
    assert_eq!(site.id, "otro");
    assert_eq!(site.start_url.as_str(), "https://otro.example/tv/");
    assert_eq!(site.locate.reference.as_deref(), Some("lista"));
    assert_eq!(site.locate.markers, vec![r"var\s+lista\s*="]);
    assert_eq!(site.normalize.slot_prefix, "link");
    assert_eq!(site.normalize.default_section, "Varios");
    assert_eq!(site.normalize.sections.len(), 1);
    assert_eq!(site.normalize.display_names["tv-uno"], "TV Uno");
    // tables not mentioned keep their defaults
    assert!(site.normalize.images.contains_key("Espn"));
}

#[test]
fn site_without_any_locate_rule_is_rejected() {
    let err = SiteConfig::from_toml(
        r#"
id = "vacio"
start_url = "https://x.example/"
format = "events-literal"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ScrapeError::Config(_)));
}

#[test]
fn relative_image_base_is_rejected() {
    let err = SiteConfig::from_toml(
        r#"
id = "logos"
start_url = "https://x.example/"
format = "channels"

[locate]
markers = ['var\s+canales\s*=']

[normalize]
image_base = "/assets/logos/"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ScrapeError::Config(_)));
    assert!(err.to_string().contains("image_base"));
}

#[test]
fn invalid_toml_is_reported() {
    let err = SiteConfig::from_toml("id = ").unwrap_err();
    assert!(matches!(err, ScrapeError::Toml(_)));
}

#[test]
fn overrides_replace_rules() {
    let site = SiteConfig::preset("canales")
        .unwrap()
        .with_marker(r"var\s+tv\s*=")
        .with_reference("tv");
    assert_eq!(site.locate.markers, vec![r"var\s+tv\s*="]);
    assert_eq!(site.locate.reference.as_deref(), Some("tv"));
}
