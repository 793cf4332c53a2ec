use feedhunter_core::{
    collect_app_binaries, collect_framework_binaries, scan_bundle, BundleOptions, BundleTargets, Classifier, ReportOrigin,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_bin(path: &Path, urls: &[&str], padding: usize) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut data = vec![0u8; padding];
    for u in urls {
        data.extend_from_slice(u.as_bytes());
        data.push(0);
    }
    fs::write(path, data).unwrap();
    path.to_path_buf()
}

fn opts() -> BundleOptions {
    BundleOptions { threads: Some(2), arch_filter: false, ..BundleOptions::default() }
}

#[test]
fn main_binary_hit_skips_secondary_scan() {
    let dir = tempdir().unwrap();
    let main = write_bin(&dir.path().join("MacOS/App"), &["https://example.com/appcast.xml"], 16);
    let other = write_bin(&dir.path().join("Frameworks/Sparkle"), &["https://sparkle.example.com/release.xml"], 16);

    let targets = BundleTargets { main: Some(main), others: vec![other] };
    let report = scan_bundle(&targets, &Classifier::default(), &opts());
    assert_eq!(report.origin, ReportOrigin::Main);
    assert_eq!(report.scanned, 1);
    assert_eq!(report.urls.len(), 1);
    assert_eq!(report.urls[0].url, "https://example.com/appcast.xml");
}

#[test]
fn secondary_results_are_merged_by_priority() {
    let dir = tempdir().unwrap();
    let main = write_bin(&dir.path().join("MacOS/App"), &["no urls here"], 16);
    let a = write_bin(&dir.path().join("Frameworks/A"), &["https://a.example.com/downloads", "https://a.example.com/feed.xml"], 8);
    let b = write_bin(&dir.path().join("Frameworks/B"), &["https://a.example.com/downloads", "https://b.example.com/stable.xml"], 8);

    let targets = BundleTargets { main: Some(main), others: vec![a, b] };
    let report = scan_bundle(&targets, &Classifier::default(), &opts());
    assert_eq!(report.origin, ReportOrigin::Secondary);
    assert_eq!(report.scanned, 3);
    let urls: Vec<&str> = report.urls.iter().map(|c| c.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://b.example.com/stable.xml", "https://a.example.com/feed.xml", "https://a.example.com/downloads"]
    );
}

#[test]
fn oversize_and_missing_binaries_are_skipped() {
    let dir = tempdir().unwrap();
    let big = write_bin(&dir.path().join("MacOS/plugins/libbig.so"), &["https://big.example.com/appcast.xml"], 4096);
    let ok = write_bin(&dir.path().join("Frameworks/Small"), &["https://small.example.com/rss"], 8);
    let missing = dir.path().join("Frameworks/Missing");

    let options = BundleOptions { plugin_size_limit: Some(1024), ..opts() };
    let targets = BundleTargets { main: None, others: vec![big, ok, missing] };
    let report = scan_bundle(&targets, &Classifier::default(), &options);
    assert_eq!(report.scanned, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.urls.len(), 1);
    assert_eq!(report.urls[0].url, "https://small.example.com/rss");
}

#[test]
fn nothing_found_reports_none() {
    let dir = tempdir().unwrap();
    let main = write_bin(&dir.path().join("MacOS/App"), &["hello"], 4);
    let report = scan_bundle(&BundleTargets { main: Some(main), others: Vec::new() }, &Classifier::default(), &opts());
    assert_eq!(report.origin, ReportOrigin::None);
    assert!(report.urls.is_empty());
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// Foo.framework 的真实二进制比其资源文件小，但只有二进制会被选中
fn framework_tree(root: &Path) -> PathBuf {
    let fw = root.join("Demo.app/Contents/Frameworks");
    write_bin(&fw.join("Foo.framework/Versions/A/Foo"), &["https://foo.example.com/appcast.xml"], 100);
    write_bin(&fw.join("Foo.framework/Versions/A/Resources/Info.plist"), &["https://plist.example.com/updates"], 5000);
    write_bin(&fw.join("Foo.framework/Versions/A/Resources/Assets.car"), &[], 4000);
    write_bin(&fw.join("Sparkle.framework/Versions/A/Sparkle"), &["https://sparkle-project.org/appcast.xml"], 3000);
    write_bin(&fw.join("libavcodec.61.dylib"), &[], 2000);
    write_bin(&fw.join("libhelper.dylib"), &[], 500);
    write_bin(&fw.join("Updater.bundle/Contents/MacOS/Updater"), &[], 300);
    write_bin(&fw.join("notes.txt"), &[], 9000);
    fw
}

#[test]
fn framework_selection_resolves_real_binaries() {
    let dir = tempdir().unwrap();
    let fw = framework_tree(dir.path());

    let picked = collect_framework_binaries(&fw, 10);
    assert_eq!(names(&picked), vec!["libhelper.dylib", "Updater", "Foo"]);
    assert!(picked[2].ends_with("Foo.framework/Versions/A/Foo"));

    let top_two = collect_framework_binaries(&fw, 2);
    assert_eq!(names(&top_two), vec!["libhelper.dylib", "Updater"]);
    assert!(collect_framework_binaries(&dir.path().join("absent"), 5).is_empty());
}

#[test]
fn app_bundle_scan_reads_framework_binary_not_resources() {
    let dir = tempdir().unwrap();
    framework_tree(dir.path());
    let app = dir.path().join("Demo.app");
    write_bin(&app.join("Contents/MacOS/Demo"), &["nothing"], 64);

    let targets = collect_app_binaries(&app, None, &BundleOptions::default());
    assert_eq!(targets.main.as_deref(), Some(app.join("Contents/MacOS/Demo").as_path()));
    assert_eq!(names(&targets.others), vec!["libhelper.dylib", "Updater", "Foo"]);

    let report = scan_bundle(&targets, &Classifier::default(), &opts());
    assert_eq!(report.origin, ReportOrigin::Secondary);
    let urls: Vec<&str> = report.urls.iter().map(|c| c.url.as_str()).collect();
    assert_eq!(urls, vec!["https://foo.example.com/appcast.xml"]);
}

#[test]
fn missing_main_executable_is_not_selected() {
    let dir = tempdir().unwrap();
    framework_tree(dir.path());
    let targets = collect_app_binaries(&dir.path().join("Demo.app"), Some("Other"), &BundleOptions::default());
    assert!(targets.main.is_none());
    assert_eq!(targets.others.len(), 3);
}

#[cfg(unix)]
#[test]
fn plugins_rank_ui_names_first_and_need_exec_bit() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let app = dir.path().join("Player.app");
    let plugins = app.join("Contents/MacOS/plugins");
    let exec = |name: &str, size: usize| {
        let p = write_bin(&plugins.join(name), &[], size);
        fs::set_permissions(&p, fs::Permissions::from_mode(0o755)).unwrap();
    };
    exec("libqcocoa.dylib", 50);
    exec("libbig.so", 5000);
    exec("libmedium.so", 1000);
    exec("libqsqlite.dylib", 8000);
    write_bin(&plugins.join("readme.txt"), &[], 9000);

    let options = BundleOptions { max_plugins: 2, ..BundleOptions::default() };
    let targets = collect_app_binaries(&app, None, &options);
    assert!(targets.main.is_none());
    assert_eq!(names(&targets.others), vec!["libqcocoa.dylib", "libbig.so"]);
}
