//! Commit message rules, one case per branch of the priority table.

use cadence_core::message::{commit_message, matching_rule, RULES};
use rstest::rstest;

#[rstest]
#[case::database_sql(&["db/init.sql"], "Add database schema and documentation files")]
#[case::database_word(&["docs/schema.png"], "Add database schema and documentation files")]
#[case::database_erd(&["erd.pdf"], "Add database schema and documentation files")]
#[case::config_manifest(&["package.json", "README.md"], "Initialize project configuration files")]
#[case::config_ignore(&[".gitignore"], "Initialize project configuration files")]
#[case::config_test_runner(&["jest.config.js"], "Initialize project configuration files")]
#[case::page_structure(&["About.HTML", "styles/about.css"], "Add about page HTML structure")]
#[case::page_functionality(&["index.html", "scripts/app.js"], "Implement index page functionality")]
#[case::module(&["src/util.js", "scripts/Cart.js"], "Add cart module implementation")]
#[case::js_dir_module(&["js/router.ts"], "Add router module implementation")]
#[case::utility_scripts(&["src/helpers.js"], "Add utility scripts and helpers")]
#[case::styling(&["styles/main.css", "styles/reset.scss"], "Add styling and CSS files")]
#[case::assets(&["assets/logo.png"], "Add assets and media files")]
#[case::nested_assets_dir_is_not_top_level(&["public/images/logo.png"], "Add project files (1 files)")]
#[case::tests(&["spec/login_test.py"], "Add unit and integration tests")]
#[case::docs(&["README.md", "CHANGELOG.md"], "Add project documentation")]
#[case::unknown(&["LICENSE", "Makefile", "data.bin"], "Add project files (3 files)")]
fn message_for_batch(#[case] files: &[&str], #[case] expected: &str) {
    assert_eq!(commit_message(files), expected);
}

#[rstest]
#[case(&["index.html", "schema.sql"])]
#[case(&["package.json", "database/seed.sql"])]
#[case(&["scripts/app.js", "docs/er-diagram.png", "styles/site.css"])]
#[case(&["assets/logo.png", "tests/db.test.js", "models/Schema.ts"])]
fn database_wins_over_everything(#[case] files: &[&str]) {
    assert_eq!(
        commit_message(files),
        "Add database schema and documentation files"
    );
}

#[test]
fn config_beats_pages() {
    assert_eq!(matching_rule(&["index.html", "package.json"]).name, "config");
}

#[test]
fn styling_beats_assets_and_docs() {
    assert_eq!(
        matching_rule(&["assets/font.woff", "theme.less", "NOTES.md"]).name,
        "styling"
    );
}

#[test]
fn assets_beat_tests() {
    assert_eq!(
        matching_rule(&["assets/test-pattern.png"]).name,
        "assets"
    );
}

#[test]
fn page_name_comes_from_first_markup_file() {
    assert_eq!(
        commit_message(&["pages/Contact.htm", "pages/about.html"]),
        "Add contact page HTML structure"
    );
}

#[test]
fn every_rule_is_reachable_by_name() {
    let probes: &[&[&str]] = &[
        &["x.sql"],
        &["package.json"],
        &["a.html"],
        &["a.html", "a.js"],
        &["a.js"],
        &["a.css"],
        &["assets/a.png"],
        &["test_a.py"],
        &["a.md"],
        &["a.bin"],
    ];
    let names: Vec<_> = probes.iter().map(|p| matching_rule(*p).name).collect();
    let expected: Vec<_> = RULES.iter().map(|r| r.name).collect();
    assert_eq!(names, expected);
}

#[test]
fn message_is_deterministic() {
    let files = ["index.html", "scripts/app.js", "styles/main.css"];
    assert_eq!(commit_message(&files), commit_message(&files));
}
