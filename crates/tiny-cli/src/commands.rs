use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tiny_mapping::{EntryKind, MappingFile};
use tiny_merge::{merge_files, MergeConfig, MergeReport};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args, &cli.format),
        Command::Check(args) => cmd_check(args, &cli.format),
    }
}

fn load_config(args: &MergeArgs) -> anyhow::Result<MergeConfig> {
    let mut config = match &args.config {
        Some(path) => MergeConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MergeConfig::new(),
    };
    config.extend_fallback_order(args.fallback_order.iter().cloned());
    Ok(config)
}

fn cmd_merge(args: MergeArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let report = merge_files(&args.input_a, &args.input_b, &args.output, &config)
        .with_context(|| {
            format!(
                "failed to merge {} and {}",
                args.input_a.display(),
                args.input_b.display()
            )
        })?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report, &args),
    }
    Ok(())
}

fn print_report(report: &MergeReport, args: &MergeArgs) {
    println!(
        "{} Merged {} + {} → {}",
        "✓".green().bold(),
        args.input_a.display().to_string().bold(),
        args.input_b.display().to_string().bold(),
        args.output.display().to_string().yellow()
    );
    println!("  Namespaces: {}", report.namespaces.join(", ").cyan());
    println!(
        "  Records: {} ({} classes, {} fields, {} methods)",
        report.records().to_string().bold(),
        report.classes,
        report.fields,
        report.methods
    );
    if report.orphans_skipped > 0 {
        println!(
            "  {} {} undefined placeholder class(es) skipped",
            "!".yellow().bold(),
            report.orphans_skipped
        );
    }
}

#[derive(Serialize)]
struct CheckSummary<'a> {
    namespaces: &'a [String],
    classes: usize,
    fields: usize,
    methods: usize,
    placeholders: usize,
}

fn cmd_check(args: CheckArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let file = MappingFile::from_path(&args.input)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    let tree = file.tree();
    let summary = CheckSummary {
        namespaces: file.namespaces(),
        classes: tree.count(EntryKind::Class),
        fields: tree.count(EntryKind::Field),
        methods: tree.count(EntryKind::Method),
        placeholders: tree.iter().filter(|(_, e)| e.is_placeholder()).count(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => {
            println!("{} {}", "✓".green().bold(), args.input.display().to_string().bold());
            println!("  Canonical: {}", file.canonical().yellow());
            println!("  Namespaces: {}", summary.namespaces.join(", ").cyan());
            println!(
                "  Classes: {}, fields: {}, methods: {}",
                summary.classes, summary.fields, summary.methods
            );
            if summary.placeholders > 0 {
                println!("  Placeholders: {}", summary.placeholders.to_string().yellow());
            }
        }
    }
    Ok(())
}
