use clap::Parser;
use rec_convert::utils::error::ErrorSeverity;
use rec_convert::utils::{logger, validation::Validate};
use rec_convert::{
    ConfigProvider, ConversionEngine, ConvertOptions, DatasetConverter, DatasetLayout, TomlConfig,
    YelpDataset,
};

#[derive(Parser)]
#[command(name = "toml-convert")]
#[command(about = "Dataset conversion driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "convert-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be converted without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(args.verbose, config.log_format());

    tracing::info!("🚀 Starting TOML-based conversion");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    let dataset = YelpDataset::with_files(
        DatasetLayout::from_config(&config),
        ConvertOptions::from_config(&config),
        config.yelp_files(),
    )?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&config, &dataset)?;
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let mut engine = ConversionEngine::new_with_monitoring(dataset, monitor_enabled);

    match engine.run(config.targets()) {
        Ok(summaries) => {
            tracing::info!("✅ Conversion completed successfully!");
            println!("✅ Conversion completed successfully!");
            for summary in &summaries {
                println!(
                    "📁 {}: {} rows -> {}",
                    summary.target,
                    summary.rows_written,
                    summary.output_file.display()
                );
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Dataset: {}", config.dataset_name());
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!(
        "  Targets: {}",
        config
            .targets()
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Time Zone: {}", config.time_zone());
    println!("  Reuse Index: {}", config.reuse_index());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig, dataset: &YelpDataset) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");

    for target in config.targets() {
        let input = dataset.input_file(*target);
        let projection = dataset.projection(*target);

        println!();
        println!("📄 {}:", target);
        println!(
            "  Input: {} ({})",
            input.display(),
            if input.exists() { "found" } else { "MISSING" }
        );
        println!("  Columns: {}", projection.width());
        for (source, header) in projection
            .source()
            .fields()
            .iter()
            .zip(projection.header().fields())
        {
            if source.name == header.name {
                println!("    [{}] {}", header.index, header.header());
            } else {
                println!("    [{}] {} <- {}", header.index, header.header(), source.name);
            }
        }
    }

    let outputs = dataset.layout().get_output_files();
    println!();
    println!("💾 Output Files:");
    println!("  inter: {}", outputs.inter.display());
    println!("  item: {}", outputs.item.display());
    println!("  user: {}", outputs.user.display());
    println!("  user index: {}", dataset.user2index_file().display());
    println!("  item index: {}", dataset.item2index_file().display());

    println!();
    println!(
        "✅ Dry run analysis complete for '{}'. Use --verbose for more details during actual run.",
        dataset.dataset_name()
    );

    Ok(())
}
