//! Stash ingestion and linking tests.

use camino::Utf8PathBuf;
use fs_err as fs;
use pretty_assertions::assert_eq;
use recipelint_stash::{SharedModel, Stash, StashError};
use tempfile::TempDir;

fn create_temp_layer() -> (TempDir, Utf8PathBuf) {
    let td = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).expect("utf8");

    fs::create_dir_all(root.join("recipes")).unwrap();
    fs::create_dir_all(root.join("appends")).unwrap();
    fs::write(
        root.join("recipes/foo_1.0.bb"),
        "SUMMARY = \"foo\"\nrequire foo.inc\n",
    )
    .unwrap();
    fs::write(root.join("recipes/foo.inc"), "LICENSE = \"MIT\"\n").unwrap();
    fs::write(root.join("appends/foo_%.bbappend"), "PR = \"r1\"\n").unwrap();
    fs::write(root.join("appends/bar_2.0.bbappend"), "PR = \"r2\"\n").unwrap();

    (td, root)
}

fn ingest(root: &Utf8PathBuf, files: &[&str]) -> Stash {
    let mut stash = Stash::new();
    for f in files {
        stash.add_file(&root.join(f)).expect("add file");
    }
    stash.finalize();
    stash
}

#[test]
fn recipes_and_lone_appends_are_classified() {
    let (_td, root) = create_temp_layer();
    let stash = ingest(
        &root,
        &[
            "appends/bar_2.0.bbappend",
            "recipes/foo_1.0.bb",
            "appends/foo_%.bbappend",
        ],
    );

    assert_eq!(stash.recipes(), vec![root.join("recipes/foo_1.0.bb")]);
    assert_eq!(
        stash.lone_appends(),
        vec![root.join("appends/bar_2.0.bbappend")]
    );
}

#[test]
fn recipe_links_cover_includes_and_matched_appends() {
    let (_td, root) = create_temp_layer();
    let stash = ingest(&root, &["recipes/foo_1.0.bb", "appends/foo_%.bbappend"]);

    assert_eq!(
        stash.links_for_file(&root.join("recipes/foo_1.0.bb")),
        vec![
            root.join("recipes/foo.inc"),
            root.join("appends/foo_%.bbappend")
        ]
    );
    assert_eq!(
        stash.links_for_file(&root.join("appends/foo_%.bbappend")),
        vec![root.join("recipes/foo_1.0.bb"), root.join("recipes/foo.inc")]
    );
    // An include only links back to the file that pulls it in.
    assert_eq!(
        stash.links_for_file(&root.join("recipes/foo.inc")),
        vec![root.join("recipes/foo_1.0.bb")]
    );
}

#[test]
fn recipes_sharing_an_include_stay_apart() {
    let (_td, root) = create_temp_layer();
    fs::write(
        root.join("recipes/foo_2.0.bb"),
        "require foo.inc\nPV = \"2.0\"\n",
    )
    .unwrap();
    let stash = ingest(
        &root,
        &[
            "recipes/foo_1.0.bb",
            "recipes/foo_2.0.bb",
            "appends/foo_%.bbappend",
        ],
    );

    assert_eq!(
        stash.links_for_file(&root.join("recipes/foo_1.0.bb")),
        vec![
            root.join("recipes/foo.inc"),
            root.join("appends/foo_%.bbappend")
        ]
    );
    let pv: Vec<&str> = stash
        .items_for(&root.join("recipes/foo_1.0.bb"), false)
        .into_iter()
        .filter(|i| i.variable_name() == Some("PV"))
        .map(|i| i.text())
        .collect();
    assert!(pv.is_empty(), "foo_2.0.bb leaked into foo_1.0.bb: {pv:?}");
}

#[test]
fn items_for_respects_nolink() {
    let (_td, root) = create_temp_layer();
    let stash = ingest(&root, &["recipes/foo_1.0.bb", "appends/foo_%.bbappend"]);
    let recipe = root.join("recipes/foo_1.0.bb");

    let own: Vec<&str> = stash
        .items_for(&recipe, true)
        .into_iter()
        .map(|i| i.text())
        .collect();
    assert_eq!(own, vec!["SUMMARY = \"foo\"\n", "require foo.inc\n"]);

    let all: Vec<Option<&str>> = stash
        .items_for(&recipe, false)
        .into_iter()
        .map(|i| i.variable_name())
        .collect();
    assert_eq!(all, vec![Some("SUMMARY"), None, Some("LICENSE"), Some("PR")]);
}

#[test]
fn mutations_are_visible_to_later_queries() {
    let (_td, root) = create_temp_layer();
    let mut stash = ingest(&root, &["recipes/foo_1.0.bb"]);
    let recipe = root.join("recipes/foo_1.0.bb");

    for item in stash.items_for_mut(&recipe, false) {
        if item.variable_name() == Some("LICENSE") {
            item.set_text("LICENSE = \"BSD-3-Clause\"\n".to_string());
        }
    }

    let inc = stash.items_for(&root.join("recipes/foo.inc"), true);
    assert_eq!(inc[0].text(), "LICENSE = \"BSD-3-Clause\"\n");
    assert_eq!(inc[0].origin(), root.join("recipes/foo.inc").as_path());
}

#[test]
fn unreadable_file_is_reported_and_skipped() {
    let (_td, root) = create_temp_layer();
    let mut stash = Stash::new();

    let err = stash
        .add_file(&root.join("recipes/missing_1.0.bb"))
        .unwrap_err();
    let StashError::Unreadable { path, .. } = &err;
    assert_eq!(path, &root.join("recipes/missing_1.0.bb"));

    stash.add_file(&root.join("recipes/foo_1.0.bb")).unwrap();
    stash.finalize();
    assert_eq!(stash.recipes(), vec![root.join("recipes/foo_1.0.bb")]);
}

#[test]
fn finalize_twice_does_not_duplicate_lone_appends() {
    let (_td, root) = create_temp_layer();
    let mut stash = ingest(&root, &["appends/bar_2.0.bbappend"]);
    stash.finalize();
    assert_eq!(stash.lone_appends().len(), 1);
}
