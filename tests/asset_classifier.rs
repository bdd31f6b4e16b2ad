// tests/asset_classifier.rs

use std::path::{Path, PathBuf};

use mashwatch::asset::{AssetKind, SourceAsset, artifact_path_for, is_monitorable};
use proptest::prelude::*;

#[test]
fn scripts_and_stylesheets_are_monitorable() {
    assert!(is_monitorable(Path::new("/p/src/app.js")));
    assert!(is_monitorable(Path::new("/p/src/site.css")));
    assert!(is_monitorable(Path::new("jquery.ui.js")));
}

#[test]
fn other_extensions_are_not() {
    assert!(!is_monitorable(Path::new("/p/src/app.ts")));
    assert!(!is_monitorable(Path::new("/p/src/readme")));
    assert!(!is_monitorable(Path::new("/p/src/app.JS")));
    assert!(!is_monitorable(Path::new("/p/src/app.js.map")));
    assert!(!is_monitorable(Path::new("/p/src/js")));
}

#[test]
fn hidden_files_are_not() {
    assert!(!is_monitorable(Path::new("/p/src/.app.js")));
    assert!(!is_monitorable(Path::new("/p/src/.css")));
    assert!(!is_monitorable(Path::new("/p/src/.#app.js")));
}

#[test]
fn already_minified_files_are_not() {
    assert!(!is_monitorable(Path::new("/p/src/app.min.js")));
    assert!(!is_monitorable(Path::new("/p/src/site.min.css")));
}

#[test]
fn kind_is_derived_from_the_extension() {
    let js = SourceAsset::from_path("/p/a.js").unwrap();
    let css = SourceAsset::from_path("/p/a.css").unwrap();
    assert_eq!(js.kind(), AssetKind::Script);
    assert_eq!(css.kind(), AssetKind::Stylesheet);
    assert!(SourceAsset::from_path("/p/a.min.js").is_none());
}

#[test]
fn artifact_sits_next_to_its_source() {
    assert_eq!(
        artifact_path_for(Path::new("/p/src/app.js")),
        Some(PathBuf::from("/p/src/app.min.js"))
    );
    assert_eq!(
        artifact_path_for(Path::new("/p/src/site.css")),
        Some(PathBuf::from("/p/src/site.min.css"))
    );
}

#[test]
fn only_the_file_name_is_rewritten() {
    assert_eq!(
        artifact_path_for(Path::new("/a/b/.js/c/foo.js")),
        Some(PathBuf::from("/a/b/.js/c/foo.min.js"))
    );
    assert_eq!(
        artifact_path_for(Path::new("/a/x.js/foo.css")),
        Some(PathBuf::from("/a/x.js/foo.min.css"))
    );
}

#[test]
fn no_artifact_for_unrecognized_files() {
    assert_eq!(artifact_path_for(Path::new("/p/src/app.ts")), None);
    assert_eq!(artifact_path_for(Path::new("/p/src/app.min.js")), None);
}

#[test]
fn kinds_never_share_an_artifact() {
    let js = artifact_path_for(Path::new("/p/a.js")).unwrap();
    let css = artifact_path_for(Path::new("/p/a.css")).unwrap();
    assert_ne!(js, css);
}

proptest! {
    #[test]
    fn hidden_names_are_never_monitorable(
        stem in "[a-zA-Z0-9_.-]{0,12}",
        ext in prop::sample::select(vec!["js", "css", "min.js", "txt"]),
    ) {
        let path = PathBuf::from(format!("/p/src/.{stem}.{ext}"));
        prop_assert!(!is_monitorable(&path));
    }

    #[test]
    fn artifacts_are_never_monitorable(
        dir in "(/[a-z.]{1,8}){0,3}",
        stem in "[a-zA-Z0-9_-][a-zA-Z0-9_.-]{0,12}",
        ext in prop::sample::select(vec!["js", "css"]),
    ) {
        let path = PathBuf::from(format!("{dir}/{stem}.{ext}"));
        prop_assume!(is_monitorable(&path));
        let artifact = artifact_path_for(&path).expect("source is monitorable");
        prop_assert!(!is_monitorable(&artifact));
        prop_assert_eq!(artifact_path_for(&artifact), None);
        prop_assert_eq!(artifact.parent(), path.parent());
    }
}
