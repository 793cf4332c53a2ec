use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use feedhunter_core::{
    collect_app_binaries, extract_file, scan_bundle, BundleOptions, BundleTargets, Candidate, Classifier, KeywordTables,
    UrlList,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "feedhunter", version, about = "从二进制文件中提取 appcast 更新源 URL")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 扫描单个二进制文件
    Scan {
        /// 输入文件（可执行文件或资源文件）
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// 扫描一个应用的多个二进制：主可执行文件优先，其余并行扫描
    Bundle {
        /// 应用包目录（.app）；按包内约定挑选主程序、framework 与插件
        #[arg(long)]
        app: Option<PathBuf>,

        /// 主可执行文件名（位于 Contents/MacOS 下）；缺省取 .app 的名字
        #[arg(long, requires = "app")]
        executable: Option<String>,

        /// 直接指定主可执行文件（覆盖 --app 挑出的主程序）
        #[arg(long)]
        main: Option<PathBuf>,

        /// 额外指定的次要二进制（可重复）
        #[arg(long = "binary")]
        binaries: Vec<PathBuf>,

        /// 线程数（"auto"=CPU 核心数）
        #[arg(long, default_value = "auto")]
        threads: String,

        /// framework 二进制上限（按大小降序）
        #[arg(long, default_value_t = 10)]
        max_frameworks: usize,

        /// 插件上限（UI 类优先）
        #[arg(long, default_value_t = 5)]
        max_plugins: usize,

        /// 关闭按本机架构过滤
        #[arg(long)]
        no_arch_filter: bool,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// 输出格式：text（每行一个 URL）或 json
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// 输出文件；缺省写到标准输出
    #[arg(long)]
    output: Option<PathBuf>,

    /// 关键词表（TOML）；缺省使用内置表
    #[arg(long)]
    keywords: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { input, common } => {
            info!(?input, "starting scan");
            let classifier = load_classifier(common.keywords.as_deref())?;
            let extraction = extract_file(&input, &classifier)
                .with_context(|| format!("extract appcast urls from {}", input.display()))?;

            let mut out = open_output(common.output.as_deref())?;
            match common.format {
                Format::Text => write_text(&mut out, &extraction.output)?,
                Format::Json => write_json(&mut out, &extraction.candidates)?,
            }
            out.flush().context("flush output")?;

            let s = &extraction.stats;
            info!(
                bytes = s.bytes_read,
                tokens = s.tokens_seen,
                accepted = s.candidates_accepted,
                duplicates = s.duplicates,
                dropped = s.dropped_at_capacity,
                skipped = s.output_skipped,
                "scan finished"
            );
        }
        Commands::Bundle { app, executable, main, binaries, threads, max_frameworks, max_plugins, no_arch_filter, common } => {
            let classifier = load_classifier(common.keywords.as_deref())?;
            let opts = BundleOptions {
                threads: parse_threads(&threads),
                max_frameworks,
                max_plugins,
                arch_filter: !no_arch_filter,
                ..BundleOptions::default()
            };

            let mut targets = match &app {
                Some(app) => collect_app_binaries(app, executable.as_deref(), &opts),
                None => BundleTargets::default(),
            };
            if main.is_some() {
                targets.main = main;
            }
            targets.others.extend(binaries);
            info!(main = ?targets.main, others = targets.others.len(), "starting bundle scan");

            let report = scan_bundle(&targets, &classifier, &opts);

            let mut out = open_output(common.output.as_deref())?;
            match common.format {
                Format::Text => {
                    for c in &report.urls {
                        writeln!(out, "{}", c.url)?;
                    }
                }
                Format::Json => write_json(&mut out, &report.urls)?,
            }
            out.flush().context("flush output")?;

            info!(origin = ?report.origin, scanned = report.scanned, skipped = report.skipped, urls = report.urls.len(), "bundle scan finished");
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写到 stderr，stdout 只留结果
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn load_classifier(keywords: Option<&Path>) -> Result<Classifier> {
    let tables = match keywords {
        Some(path) => KeywordTables::load(path)?,
        None => KeywordTables::default(),
    };
    Classifier::new(tables).context("build keyword automata")
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(File::create(p).context("create output file")?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn write_text(out: &mut dyn Write, list: &UrlList) -> Result<()> {
    out.write_all(list.as_bytes())?;
    Ok(())
}

fn write_json(out: &mut dyn Write, candidates: &[Candidate]) -> Result<()> {
    serde_json::to_writer(&mut *out, candidates)?;
    writeln!(out)?;
    Ok(())
}

/// 解析线程参数
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") { return None; }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}
