use anyhow::Result;
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// 导入库模块
use colstats::config::Config;
use colstats::core::ValueType;
use colstats::ingest::{read_json_lines, Ingestor};
use colstats::stats::{BlockInfo, FrequencyTracker, ScopedRegistry};
use colstats::table::Table;
use colstats::utils::{logging, profiler, Profiler};
use colstats::version::version_info;

#[derive(Parser)]
#[clap(version, author = "Colstats Contributors")]
enum Cli {
    /// Ingest a JSON-lines file and print column statistics
    Ingest {
        #[clap(short, long)]
        table: String,
        #[clap(short, long)]
        file: PathBuf,
        #[clap(short, long, default_value = "config.toml")]
        config: String,
        /// Write per-block info files to the configured info_dir
        #[clap(long)]
        persist: bool,
    },
    /// Print a persisted block info file
    Inspect {
        #[clap(short, long)]
        path: PathBuf,
    },
    /// Print version and feature flags
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli {
        Cli::Ingest {
            table,
            file,
            config,
            persist,
        } => {
            let config = Config::load_or_default(&config)?;
            logging::init(&config.log)?;
            let result = run_ingest(&config, &table, &file, persist);
            logging::shutdown();
            result?;
        }
        Cli::Inspect { path } => {
            let info = BlockInfo::load(&path)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Cli::Version => {
            println!("{}", serde_json::to_string_pretty(&version_info())?);
        }
    }

    Ok(())
}

fn run_ingest(config: &Config, table_name: &str, file: &Path, persist: bool) -> Result<()> {
    let rows = read_json_lines(BufReader::new(File::open(file)?))?;

    let registry = ScopedRegistry::new();
    let table = Table::new(table_name);
    let ingestor = Ingestor::new(&registry, config.stats.clone());

    let mut profiler = profiler();
    profiler.start();
    let report = ingestor.ingest(&table, &rows)?;
    profiler.stop();

    println!("Ingested {} rows into {} blocks", report.rows, report.blocks.len());
    print!("{}", table.column_info());

    println!("Integer Column Stats\n");
    for name in table.columns_of_type(ValueType::Int) {
        let info = table.keys().get_id(&name).and_then(|id| table.get_int_info(id));
        if let Some(info) = info {
            println!(
                "  {:<24} count={} min={} max={} mean={:.3}",
                name, info.count, info.min, info.max, info.mean
            );
        }
    }

    println!("\nTop String Values\n");
    for value_type in [ValueType::Str, ValueType::Set] {
        for name in table.columns_of_type(value_type) {
            let Some(column) = table.keys().get_id(&name) else {
                continue;
            };
            // 各块频率表合并后只是近似的表级分布
            let mut merged = FrequencyTracker::new();
            for block in &report.blocks {
                if let Some(tracker) = registry.lookup_frequency(block, column) {
                    merged.merge(&tracker);
                }
            }
            let top: Vec<String> = merged
                .top(5)
                .into_iter()
                .map(|(id, count)| {
                    let value = table.strings().resolve(id).unwrap_or_default();
                    format!("{}({})", value, count)
                })
                .collect();
            println!("  {:<24} {}", name, top.join(", "));
        }
    }

    if persist {
        let paths = ingestor.persist(&report.blocks, Path::new(&config.stats.info_dir))?;
        println!("\nWrote {} block info files to {}", paths.len(), config.stats.info_dir);
    }

    Ok(())
}
