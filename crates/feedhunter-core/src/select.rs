//! 应用包内待扫描二进制的挑选
//!
//! 目录约定（macOS .app）：
//! - 主可执行文件：`Contents/MacOS/<executable>`
//! - 次要二进制：`Contents/Frameworks` 下的 `X.framework/Versions/A/X`、`*.dylib`、
//!   `*.bundle/Contents/MacOS/<name>`（跳过 Sparkle*.framework），按大小降序取前 N 个
//! - 插件：`Contents/MacOS/plugins` 下的可执行文件，名称含 UI 关键词的排前面，各自按大小降序
//!
//! 所有候选都先经过名称过滤：命中更新相关白名单则必扫，否则命中排除表即跳过。
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::bundle::BundleTargets;
use crate::options::BundleOptions;

/// 与更新相关的名称：无视排除表，总是扫描
const PRIORITY_NAMES: &[&str] = &["update", "sparkle", "autoupdate", "updater", "upgrade"];

/// 基本不会内嵌 appcast 地址的库（运行时、编解码、网络、压缩等）
const EXCLUDED_NAMES: &[&str] = &[
    // Swift 运行时
    "libswift", "swift_concurrency",
    // 编解码
    "codec", "encoder", "decoder", "avcodec", "avformat",
    "h264", "h265", "vp9", "vpx", "aac", "mp3", "flac", "opus", "vorbis", "mpeg",
    "webrtc", "audio", "livekit",
    // 图像
    "webp", "tiff", "png", "jpeg", "gif", "freetype", "harfbuzz", "graphite",
    // 媒体处理
    "filter", "video", "demux", "mux", "spu", "lottie",
    // 硬件加速
    "vaapi", "vdpau", "cuda", "nvenc", "videotoolbox",
    // 容器格式
    "avi", "mp4", "mkv", "ogg", "bluray",
    // 网络协议
    "access", "stream", "http", "ftp", "rtsp", "network", "socket",
    // 压缩/加密
    "crypto", "ssl", "gnutls", "tls", "sodium", "brotli", "zstd",
    // 系统库
    "icu", "dbus", "glib", "gio", "gobject", "gthread", "kirigami", "libqt",
    // 开发工具
    "libclang", "liblto", "xcodebuildloader",
    // 数据库/文本
    "sqlite", "postgres", "xml", "hunspell",
    // C++ 运行时
    "double-conversion", "cares", "c++", "stdc++",
    // 监控/录制
    "sentry", "recording", "assettype",
];

/// 插件名中含这些词的优先（UI 层插件更可能带更新地址）
const UI_PLUGIN_NAMES: &[&str] = &["macosx", "cocoa", "ui", "qt", "update", "sparkle"];

/// 名称过滤：白名单优先，其次排除表（大小写不敏感）
pub fn should_scan_binary(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    if PRIORITY_NAMES.iter().any(|p| name.contains(p)) {
        return true;
    }
    !EXCLUDED_NAMES.iter().any(|p| name.contains(p))
}

/// 去掉最后一个扩展名后的文件名
fn stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase())
}

fn regular_file_size(path: &Path) -> Option<u64> {
    let md = std::fs::metadata(path).ok()?;
    if md.is_file() { Some(md.len()) } else { None }
}

#[cfg(unix)]
fn is_executable(md: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    md.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_md: &std::fs::Metadata) -> bool {
    true
}

/// 目录的直接子项（按路径排序，保证结果可复现）
fn children(dir: &Path) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .collect();
    out.sort();
    out
}

/// 大小降序、同大小按路径升序
fn sort_by_size_desc(items: &mut [(PathBuf, u64)]) {
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
}

/// 收集 `Contents/Frameworks` 下的次要二进制（最多 `max` 个）
pub fn collect_framework_binaries(frameworks_dir: &Path, max: usize) -> Vec<PathBuf> {
    let mut found: Vec<(PathBuf, u64)> = Vec::new();

    for entry in children(frameworks_dir) {
        let name = stem(&entry);
        let (binary, name_to_check) = match extension(&entry).as_deref() {
            Some("framework") => {
                if name.to_ascii_lowercase().starts_with("sparkle") {
                    continue;
                }
                (entry.join("Versions/A").join(&name), name)
            }
            Some("dylib") => (entry.clone(), name),
            Some("bundle") => (entry.join("Contents/MacOS").join(&name), name),
            _ => continue,
        };
        let size = match regular_file_size(&binary) { Some(s) => s, None => continue };
        if !should_scan_binary(&name_to_check) {
            debug!(path = %binary.display(), "framework binary excluded by name");
            continue;
        }
        found.push((binary, size));
    }

    sort_by_size_desc(&mut found);
    found.into_iter().take(max).map(|(p, _)| p).collect()
}

/// 收集 `Contents/MacOS/plugins` 下的可执行插件（最多 `max` 个，UI 类优先）
pub fn collect_plugin_binaries(plugins_dir: &Path, max: usize) -> Vec<PathBuf> {
    let mut priority: Vec<(PathBuf, u64)> = Vec::new();
    let mut remaining: Vec<(PathBuf, u64)> = Vec::new();

    for entry in children(plugins_dir) {
        let md = match std::fs::metadata(&entry) { Ok(md) => md, Err(_) => continue };
        if !md.is_file() || !is_executable(&md) {
            continue;
        }
        if !should_scan_binary(&stem(&entry)) {
            debug!(path = %entry.display(), "plugin excluded by name");
            continue;
        }
        let file_name = entry
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if UI_PLUGIN_NAMES.iter().any(|p| file_name.contains(p)) {
            priority.push((entry, md.len()));
        } else {
            remaining.push((entry, md.len()));
        }
    }

    sort_by_size_desc(&mut priority);
    sort_by_size_desc(&mut remaining);
    priority.into_iter().chain(remaining).take(max).map(|(p, _)| p).collect()
}

/// 缺省的可执行文件名：`Foo.app` → `Foo`
fn default_executable(app: &Path) -> String {
    stem(app)
}

/// 按 .app 目录约定挑选主二进制与次要二进制
/// 次要二进制顺序：framework 在前，插件在后
pub fn collect_app_binaries(app: &Path, executable: Option<&str>, opts: &BundleOptions) -> BundleTargets {
    let contents = app.join("Contents");
    let executable = executable.map(str::to_string).unwrap_or_else(|| default_executable(app));

    let main_path = contents.join("MacOS").join(&executable);
    let main = regular_file_size(&main_path).map(|_| main_path);

    let mut others = collect_framework_binaries(&contents.join("Frameworks"), opts.max_frameworks);
    others.extend(collect_plugin_binaries(&contents.join("MacOS/plugins"), opts.max_plugins));

    debug!(app = %app.display(), main = ?main, others = others.len(), "binaries selected");
    BundleTargets { main, others }
}
