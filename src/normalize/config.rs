use serde::Deserialize;
use std::collections::BTreeMap;

/// Immutable tables the normalizer works from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Channel-record keys starting with this prefix hold stream URLs.
    pub slot_prefix: String,
    /// Known irregular names, keyed by lowercase raw key without its variant suffix.
    pub display_names: BTreeMap<String, String>,
    /// Image URL per display name.
    pub images: BTreeMap<String, String>,
    /// Base for generated image URLs: `{image_base}{NAME}.png`.
    pub image_base: String,
    /// Evaluated in order; the first rule with a matching keyword wins.
    pub sections: Vec<SectionRule>,
    pub default_section: String,
}

/// Keyword-to-section rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionRule {
    pub title: String,
    pub keywords: Vec<String>,
}

impl SectionRule {
    fn new(title: &str, keywords: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Case-insensitive substring match against a display name.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.keywords
            .iter()
            .any(|k| name.contains(&k.to_lowercase()))
    }
}

const LOGO_BASE: &str = "https://gh.alangulotv.blog/assets/logos/";

fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        let display_names = table(&[
            ("tyc-sports", "TyC Sports"),
            ("tnt-sports", "TNT Sports"),
            ("tnt", "TNT"),
            ("dsports", "DSports"),
            ("directv-sports", "DirecTV Sports"),
            ("tn", "TN Todo Noticias"),
            ("c5n", "C5N"),
            ("a24", "A24"),
            ("cnn", "CNN"),
            ("tv-publica", "TV Pública"),
            ("america-tv", "América TV"),
            ("eltrece", "El Trece"),
            ("hbo", "HBO"),
            ("axn", "AXN"),
            ("fx", "FX"),
            ("amc", "AMC"),
            ("nat-geo", "Nat Geo"),
        ]);

        let logo = |file: &str| format!("{LOGO_BASE}{file}");
        let images = [
            ("Espn", "espn.png"),
            ("Espn 2", "espn2.png"),
            ("Espn 3", "espn3.png"),
            ("Espn Premium", "espn-premium.png"),
            ("Fox Sports", "fox-sports.png"),
            ("TyC Sports", "tyc-sports.png"),
            ("TNT Sports", "tnt-sports.png"),
            ("DSports", "dsports.png"),
            ("TV Pública", "tv-publica.png"),
            ("Telefe", "telefe.png"),
            ("El Trece", "eltrece.png"),
            ("TN Todo Noticias", "tn.png"),
        ]
        .iter()
        .map(|(name, file)| (name.to_string(), logo(file)))
        .collect();

        let sections = vec![
            SectionRule::new(
                "Deportes",
                &[
                    "espn", "fox sports", "tyc", "tnt sports", "dsports", "directv sports",
                    "win sports", "gol tv", "goltv", "sport", "deportes", "f1", "nba", "futbol", "fútbol",
                ],
            ),
            SectionRule::new(
                "Noticias",
                &["noticias", "news", "c5n", "a24", "cnn", "canal 26", "cronica", "crónica"],
            ),
            SectionRule::new(
                "Infantil",
                &["disney", "cartoon", "nick", "kids", "junior"],
            ),
            SectionRule::new(
                "Documentales",
                &["discovery", "history", "nat geo", "animal planet"],
            ),
            SectionRule::new(
                "Películas y Series",
                &["hbo", "cinemax", "star", "universal", "warner", "tnt", "space", "axn", "paramount", "fx", "amc", "cine"],
            ),
            SectionRule::new(
                "Aire",
                &["telefe", "el trece", "america", "américa", "tv pública", "tv publica", "canal 9", "net tv"],
            ),
        ];

        Self {
            slot_prefix: "repro".to_string(),
            display_names,
            images,
            image_base: LOGO_BASE.to_string(),
            sections,
            default_section: "Otros".to_string(),
        }
    }
}
