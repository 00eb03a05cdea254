mod common;

use httpmock::Method::GET;
use regex::Regex;
use tvscrape_rs::locate::{Target, find_reference, locate, scan_inline};
use tvscrape_rs::{LiteralKind, LocateRules, Located, ScrapeError};

fn literal_rules(reference: Option<&str>, markers: &[&str]) -> LocateRules {
    LocateRules {
        reference: reference.map(str::to_string),
        markers: markers.iter().map(|m| m.to_string()).collect(),
        ..LocateRules::default()
    }
}

#[tokio::test]
async fn inline_marker_is_found_without_extra_fetch() {
    let server = common::setup_server();
    let html = common::html_with_script(
        r#"var other = {"x": 1};
window.channelsList = {"espn": {"repro1": "https://x/1"}};"#,
    );
    let page = common::page(&server.url("/canales/"), &html);

    let rules = literal_rules(Some("canales"), &[r"window\.channelsList\s*="]);
    let located = locate(&common::fast_client(), &page, &rules).await.unwrap();

    let Located::Literal(literal) = located else {
        panic!("expected a literal");
    };
    assert_eq!(literal.source, page.url);
    assert_eq!(literal.kind, LiteralKind::Object);
    assert_eq!(literal.json().unwrap(), r#"{"espn":{"repro1":"https://x/1"}}"#);
}

#[tokio::test]
async fn referenced_script_is_fetched_with_referer() {
    let server = common::setup_server();
    let script = server.mock(|when, then| {
        when.method(GET)
            .path("/static/js/Canales.min.js")
            .header("referer", server.url("/site/index.html"));
        then.status(200)
            .body("var channels = {\"tyc\": {\"repro1\": \"live/tyc.m3u8\"}};");
    });
    let html = r#"<html><head>
<script src="/static/js/vendor.js"></script>
<script src="/static/js/Canales.min.js"></script>
</head><body></body></html>"#;
    let page = common::page(&server.url("/site/index.html"), html);

    let rules = literal_rules(Some("canales"), &[r"var\s+channels\s*="]);
    let located = locate(&common::fast_client(), &page, &rules).await.unwrap();

    script.assert();
    assert_eq!(located.source().path(), "/static/js/Canales.min.js");
    let Located::Literal(literal) = located else {
        panic!("expected a literal");
    };
    assert_eq!(
        literal.parse().unwrap()["tyc"]["repro1"],
        "live/tyc.m3u8"
    );
}

#[tokio::test]
async fn falls_back_to_inline_scan_when_reference_lacks_marker() {
    let server = common::setup_server();
    server.mock(|when, then| {
        when.method(GET).path("/js/canales.js");
        then.status(200).body("console.log('nothing here');");
    });
    let html = format!(
        r#"<script src="/js/canales.js"></script>{}"#,
        common::html_with_script(r#"const canales = [{"name": "tn", "repro1": "https://x"}];"#)
    );
    let page = common::page(&server.url("/"), &html);

    let rules = literal_rules(Some("canales"), &[r"const\s+canales\s*="]);
    let located = locate(&common::fast_client(), &page, &rules).await.unwrap();
    assert_eq!(located.source(), &page.url);
}

#[tokio::test]
async fn nothing_to_follow_and_no_marker_is_a_locate_error() {
    let server = common::setup_server();
    let html = common::html_with_script("var unrelated = {\"a\": 1};");
    let page = common::page(&server.url("/"), &html);

    let rules = literal_rules(Some("canales"), &[r"window\.channelsList\s*="]);
    let err = locate(&common::fast_client(), &page, &rules)
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::Locate(_)), "{err}");
}

#[tokio::test]
async fn markup_target_follows_iframe() {
    let server = common::setup_server();
    let agenda = server.mock(|when, then| {
        when.method(GET).path("/embed/agenda.html");
        then.status(200)
            .body(r#"<div class="match-container"><span class="time">10:00</span></div>"#);
    });
    let html = r#"<html><body><iframe src="embed/agenda.html" width="100%"></iframe></body></html>"#;
    let page = common::page(&server.url("/agenda-2"), html);

    let rules = LocateRules {
        reference: Some("AGENDA".into()),
        markers: vec![r#"class=["']match-container["']"#.into()],
        target: Target::Markup,
        ..LocateRules::default()
    };
    let located = locate(&common::fast_client(), &page, &rules).await.unwrap();

    agenda.assert();
    let Located::Markup(doc) = located else {
        panic!("expected markup");
    };
    assert_eq!(doc.url.path(), "/embed/agenda.html");
    assert!(doc.text.contains("match-container"));
}

#[test]
fn template_built_iframe_gets_a_fresh_cache_buster() {
    let script = r#"
        const cacheBuster = new Date().getTime();
        const base = "https://embed.example.com/";
        document.getElementById('agenda').innerHTML =
            '<iframe src="' + base + 'agenda.html?v=' + cacheBuster + '" frameborder="0"></iframe>';
    "#;
    let page = common::page(
        "https://site.example.com/agenda-2/",
        &common::html_with_script(script),
    );
    let rules = LocateRules {
        reference: Some("agenda".into()),
        cache_busters: vec!["cacheBuster".into()],
        ..LocateRules::default()
    };

    let url = find_reference(&page, &rules).unwrap();
    assert_eq!(url.host_str(), Some("embed.example.com"));
    assert_eq!(url.path(), "/agenda.html");
    let token = url.query().and_then(|q| q.strip_prefix("v=")).unwrap();
    assert!(!token.is_empty() && token.chars().all(|c| c.is_ascii_digit()), "{token}");
}

#[test]
fn configured_cache_buster_is_substituted_in_src_assignment() {
    let script = r#"
        var frame = document.createElement('iframe');
        frame.src = '/partials/agenda.php?t=' + stamp;
        document.body.appendChild(frame);
    "#;
    let page = common::page(
        "https://site.example.com/agenda-2/",
        &common::html_with_script(script),
    );
    let rules = LocateRules {
        reference: Some("agenda".into()),
        cache_busters: vec!["stamp".into()],
        ..LocateRules::default()
    };

    let url = find_reference(&page, &rules).unwrap();
    assert_eq!(url.path(), "/partials/agenda.php");
    assert!(url.query().unwrap().starts_with("t="));
}

#[test]
fn unresolvable_template_is_not_followed() {
    let script = r#"document.body.innerHTML = '<iframe src="/agenda?u=' + userToken + '"></iframe>';"#;
    let page = common::page(
        "https://site.example.com/",
        &common::html_with_script(script),
    );
    let rules = LocateRules {
        reference: Some("agenda".into()),
        ..LocateRules::default()
    };
    assert!(find_reference(&page, &rules).is_none());

    let script = r#"frame.src = `/agenda?t=${Date.now()}`;"#;
    let page = common::page(
        "https://site.example.com/",
        &common::html_with_script(script),
    );
    assert!(find_reference(&page, &rules).is_none());
}

#[test]
fn bare_script_resource_is_scanned_whole() {
    let page = common::page(
        "https://gh.example.com/assets/script.js",
        "function f() {}\nconst agendaEventos = [{\"hora\": \"10:00\"}];\nf();",
    );
    let markers = [Regex::new(r"agendaEventos\s*=").unwrap()];
    let literal = scan_inline(&page, &markers).unwrap();
    assert_eq!(literal.kind, LiteralKind::Array);
    assert_eq!(literal.json().unwrap(), r#"[{"hora":"10:00"}]"#);
}

#[test]
fn marker_without_literal_is_skipped() {
    let html = common::html_with_script("window.channelsList = fetchLater();")
        + &common::html_with_script("window.channelsList = {\"a\": {}};");
    let page = common::page("https://site.example.com/", &html);
    let markers = [Regex::new(r"window\.channelsList\s*=").unwrap()];
    let literal = scan_inline(&page, &markers).unwrap();
    assert_eq!(literal.json().unwrap(), r#"{"a":{}}"#);
}
