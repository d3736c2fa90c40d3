//! End-to-end scenarios driven through the public API

use pretty_assertions::assert_eq;
use soc_dashboard::dashboard::clipboard::{ClipboardBackend, CopyPath};
use soc_dashboard::dashboard::form::{BannerKind, FieldKind, SUCCESS_MESSAGE};
use soc_dashboard::dashboard::tone::TonePlayer;
use soc_dashboard::{Dashboard, DashboardConfig, DashboardError, Section, FEED_CAPACITY};
use std::time::Duration;

struct Silent;

impl TonePlayer for Silent {
    fn play_boot_tone(&mut self) -> Result<(), DashboardError> {
        Ok(())
    }
}

struct NullClipboard;

impl ClipboardBackend for NullClipboard {
    fn copy(&mut self, _text: &str) -> Result<CopyPath, DashboardError> {
        Ok(CopyPath::Osc52)
    }
}

fn dashboard(config: DashboardConfig) -> Dashboard {
    Dashboard::builder(config)
        .seed(42)
        .tone(Silent)
        .clipboard(NullClipboard)
        .build()
}

#[test]
fn boot_then_first_section_then_live_feed() {
    let mut d = dashboard(DashboardConfig::default());
    assert!(!d.is_booted());
    assert!(d.feed.is_empty());

    d.advance(Duration::from_millis(8000));
    assert!(d.is_booted());
    assert_eq!(d.feed.len(), 3);

    d.advance(Duration::from_millis(100));
    assert_eq!(d.nav.active_nav_entries(), vec![Section::Profile]);

    d.advance(Duration::from_secs(300));
    assert_eq!(d.feed.len(), FEED_CAPACITY);
}

#[test]
fn operator_session() {
    let mut d = dashboard(DashboardConfig::default());
    d.advance(Duration::from_secs(9));

    assert!(d.switch_section("nowhere").is_err());
    assert_eq!(d.current_section(), Section::Profile);

    d.execute("arsenal");
    assert_eq!(d.current_section(), Section::Arsenal);

    d.execute("clear");
    assert_eq!(d.feed.len(), 2);

    d.copy_target(0).expect("null clipboard never fails");
    assert_eq!(d.feed.latest().map(|i| i.source.as_str()), Some("CLIPBOARD"));
}

#[test]
fn contact_form_transmission() {
    let mut d = Dashboard::builder(DashboardConfig::default())
        .seed(7)
        .tone(Silent)
        .clipboard(NullClipboard)
        .skip_boot(true)
        .build();

    d.form.set_value(FieldKind::Name, "Grace");
    d.form.set_value(FieldKind::Email, "grace@navy.mil");
    d.form.set_value(FieldKind::Subject, "COBOL");
    d.form.set_value(FieldKind::Message, "Found a moth in relay 70.");
    d.submit_form().expect("valid form");

    d.advance(Duration::from_secs(4));
    let banner = d.form.banner().expect("banner");
    assert_eq!(banner.kind, BannerKind::Success);
    assert_eq!(banner.message, SUCCESS_MESSAGE);
    assert_eq!(
        d.feed.iter().filter(|i| i.source == "COMM-SEC").count(),
        1
    );
    assert!(d.form.fields.iter().all(|f| f.value.is_empty()));
}

#[test]
fn matrix_leaves_no_timers() {
    let mut d = Dashboard::builder(DashboardConfig::default())
        .seed(7)
        .tone(Silent)
        .skip_boot(true)
        .build();
    d.set_viewport(100, 30);
    d.advance(Duration::from_secs(5));
    let baseline = d.pending_tasks();

    let out = d.execute("matrix");
    assert!(out.found);
    assert!(d.matrix.is_active());

    d.advance(Duration::from_secs(10));
    assert!(!d.matrix.is_active());
    assert_eq!(d.pending_tasks(), baseline);
}

#[test]
fn custom_config_drives_content() {
    let config = DashboardConfig::from_json(
        r#"{
            "operator": { "handle": "neo", "host": "zion", "title": "The One" },
            "boot_lines": []
        }"#,
    )
    .expect("valid config");
    let mut d = dashboard(config);
    assert!(d.is_booted());

    let out = d.execute("whoami");
    assert_eq!(out.response, "neo@zion: The One");
}
