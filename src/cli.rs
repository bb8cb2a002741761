use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::HeapConfig;
use crate::heap::{CheckReport, HeapFile, PageStat};
use crate::metrics::{self, MetricsSnapshot};
use crate::query::{execute, QueryOutput};
use crate::record::Schema;

pub mod util;

use util::{hex_string, render_record, RecordSource};

#[derive(Parser, Debug)]
#[command(
    name = "heapdb",
    version,
    about = "Slotted-page heap files with a tiny table/query layer",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Создать пустой heap-файл (0 страниц). Ошибка, если файл уже есть.
    Create {
        #[arg(long)]
        path: PathBuf,
    },
    /// Вставить запись (first-fit). Значение: литерал, hex:..., @file или "-" (stdin).
    Insert {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        value: String,
    },
    /// Прочитать запись по (page, slot).
    Get {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        page: u64,
        #[arg(long)]
        slot: u16,
        /// Записать сырые байты в файл вместо печати.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Все записи в порядке (page, slot).
    Scan {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Число страниц, свободное место по страницам и счётчики процесса.
    Status {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Проверить целостность страниц. Ненулевой код выхода, если есть проблемы.
    Check {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Выполнить SELECT / INSERT над таблицами из JSON-схемы.
    Query {
        #[arg(long)]
        schema: PathBuf,
        query: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = HeapConfig::from_env();
    debug!("{}", cfg);

    match cli.cmd {
        Cmd::Create { path } => {
            HeapFile::create(&path, cfg)?;
            println!("created {}", path.display());
        }
        Cmd::Insert { path, value } => {
            let src = RecordSource::parse(&value);
            let bytes = src.load()?;
            let rid = HeapFile::with_config(&path, cfg).insert_record(&bytes)?;
            println!(
                "inserted {} B ({}) at page={} slot={}",
                bytes.len(),
                src.label(),
                rid.page,
                rid.slot
            );
        }
        Cmd::Get { path, page, slot, out } => {
            let bytes = HeapFile::with_config(&path, cfg).read_record(page, slot)?;
            match out {
                Some(p) => {
                    std::fs::write(&p, &bytes)
                        .with_context(|| format!("write {}", p.display()))?;
                    println!("wrote {} B to {}", bytes.len(), p.display());
                }
                None => println!("{}", render_record(&bytes)),
            }
        }
        Cmd::Scan { path, json } => cmd_scan(&HeapFile::with_config(&path, cfg), json)?,
        Cmd::Status { path, json } => cmd_status(&HeapFile::with_config(&path, cfg), json)?,
        Cmd::Check { path, json } => {
            let report = HeapFile::with_config(&path, cfg).check()?;
            print_check(&report, json)?;
            if !report.is_clean() {
                return Err(anyhow!(
                    "check failed: {} bad page(s), {} trailing byte(s)",
                    report.bad_pages.len(),
                    report.trailing_bytes
                ));
            }
        }
        Cmd::Query { schema, query, json } => {
            let schema = Schema::load(&schema)?;
            let out = execute(&query, &schema, &cfg)?;
            print_query(&out, json)?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ScanItem {
    page: u64,
    slot: u16,
    len: usize,
    hex: String,
}

fn cmd_scan(heap: &HeapFile, json: bool) -> Result<()> {
    if json {
        let mut items = Vec::new();
        heap.scan_stream(|rid, bytes| {
            items.push(ScanItem {
                page: rid.page,
                slot: rid.slot,
                len: bytes.len(),
                hex: hex_string(bytes),
            })
        })?;
        println!("{}", serde_json::to_string(&items)?);
        return Ok(());
    }

    let mut n = 0u64;
    heap.scan_stream(|rid, bytes| {
        n += 1;
        println!("{}:{}\t{}", rid.page, rid.slot, render_record(bytes));
    })?;
    println!("{} record(s)", n);
    Ok(())
}

#[derive(Serialize)]
struct StatusView<'a> {
    path: String,
    config: &'a HeapConfig,
    page_count: u64,
    pages: Vec<PageStat>,
    metrics: MetricsSnapshot,
}

fn cmd_status(heap: &HeapFile, json: bool) -> Result<()> {
    let pages = heap.page_stats()?;
    let view = StatusView {
        path: heap.path().display().to_string(),
        config: heap.config(),
        page_count: pages.len() as u64,
        pages,
        metrics: metrics::snapshot(),
    };

    if json {
        println!("{}", serde_json::to_string(&view)?);
        return Ok(());
    }

    println!("path       = {}", view.path);
    println!("config     = {}", view.config);
    println!("page_count = {}", view.page_count);
    for p in &view.pages {
        println!(
            "  page {:>6}: slots={:<4} fso={:<5} free={}",
            p.page, p.slot_count, p.free_space_offset, p.free_space
        );
    }
    let m = &view.metrics;
    println!(
        "metrics    = read={} written={} appended={} inserted={} avg_probe={:.2}",
        m.pages_read,
        m.pages_written,
        m.pages_appended,
        m.records_inserted,
        m.avg_probe_len()
    );
    Ok(())
}

fn print_check(report: &CheckReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }
    println!("path           = {}", report.path);
    println!("file_len       = {}", report.file_len);
    println!("pages          = {}", report.pages);
    println!("trailing_bytes = {}", report.trailing_bytes);
    println!("ok_pages       = {}", report.ok_pages);
    println!("records        = {}", report.records);
    for bad in &report.bad_pages {
        for issue in &bad.issues {
            println!("  page {}: {:?}", bad.page, issue);
        }
    }
    println!("{}", if report.is_clean() { "OK" } else { "DAMAGED" });
    Ok(())
}

fn print_query(out: &QueryOutput, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(out)?);
        return Ok(());
    }
    match out {
        QueryOutput::Rows { rows } => {
            for r in rows {
                println!("{}", r);
            }
            println!("{} row(s)", rows.len());
        }
        QueryOutput::Inserted { page, slot } => {
            println!("inserted at page={} slot={}", page, slot);
        }
    }
    Ok(())
}
