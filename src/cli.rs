use serde::Serialize;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::data::level::Level;
use crate::data::registry::check_registry;
use crate::data::validate::{validate_catalog, ValidationReport, ValidationSeverity};
use crate::engine::cp::Ivs;
use crate::engine::raid::RaidChartRow;
use crate::engine::{Calculator, IvCandidate};
use crate::error::{EngineError, QueryError};
use crate::query::{parse_ivs, parse_iv_query, parse_level, parse_u32};

const USAGE: &str =
    "usage: ivcalc <cp|maxcp|iv|raidcp|raidchart|types|moves|effect|validate> [args] [--table]";
const TABLE_FLAG: &str = "--table";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Cp,
    MaxCp,
    Iv,
    RaidCp,
    RaidChart,
    Types,
    Moves,
    Effect,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("cp") => Some(Command::Cp),
        Some("maxcp") => Some(Command::MaxCp),
        Some("iv") => Some(Command::Iv),
        Some("raidcp") => Some(Command::RaidCp),
        Some("raidchart") => Some(Command::RaidChart),
        Some("types") | Some("type") => Some(Command::Types),
        Some("moves") => Some(Command::Moves),
        Some("effect") => Some(Command::Effect),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("usage: ivcalc {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("page {page} does not exist, chart has {pages} page(s)")]
    PageOutOfRange { page: usize, pages: usize },

    #[error("failed to serialize result: {0}")]
    Output(#[from] serde_json::Error),

    #[error("validation failed: {0} error(s)")]
    Invalid(usize),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::Query(_) | Self::PageOutOfRange { .. } => 2,
            Self::Engine(_) | Self::Output(_) | Self::Invalid(_) => 1,
        }
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let as_table = args.iter().any(|arg| arg == TABLE_FLAG);
    let rest: Vec<&str> = args
        .iter()
        .skip(2)
        .map(String::as_str)
        .filter(|arg| *arg != TABLE_FLAG)
        .collect();

    let config = match EngineConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };
    let calculator = match Calculator::from_config(&config) {
        Ok(calculator) => calculator,
        Err(err) => {
            eprintln!("startup failed: {err}");
            return 1;
        }
    };

    let outcome = match command {
        Command::Cp => handle_cp(&calculator, &rest, as_table),
        Command::MaxCp => handle_max_cp(&calculator, &rest, as_table),
        Command::Iv => handle_iv(&calculator, &rest, as_table),
        Command::RaidCp => handle_raid_cp(&calculator, &rest, as_table),
        Command::RaidChart => handle_raid_chart(&calculator, &rest, as_table),
        Command::Types => handle_types(&calculator, &rest, as_table),
        Command::Moves => handle_moves(&calculator, &rest, as_table),
        Command::Effect => handle_effect(&calculator, &rest, as_table),
        Command::Validate => handle_validate(&calculator, &config, as_table),
    };

    match outcome {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            err.exit_code()
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn creature_arg<'a>(rest: &[&'a str], usage: &'static str) -> Result<&'a str, CliError> {
    rest.first().copied().ok_or(CliError::Usage(usage))
}

#[derive(Debug, Serialize)]
struct CpReport {
    creature: String,
    level: Level,
    #[serde(flatten)]
    ivs: Ivs,
    cp: u32,
    hp: u32,
}

fn handle_cp(calculator: &Calculator, rest: &[&str], as_table: bool) -> Result<(), CliError> {
    const CP_USAGE: &str = "cp <name> <level> <attack> <defense> <stamina>";
    let [name, level, attack, defense, stamina] = rest else {
        return Err(CliError::Usage(CP_USAGE));
    };
    let level = parse_level(level)?;
    let ivs = parse_ivs(attack, defense, stamina)?;

    let report = CpReport {
        creature: calculator.creature(name)?.name.clone(),
        level,
        ivs,
        cp: calculator.cp(name, level.value(), ivs)?,
        hp: calculator.hp(name, level.value(), ivs.stamina)?,
    };

    if as_table {
        println!("creature\tlevel\tattack\tdefense\tstamina\tcp\thp");
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            report.creature,
            report.level,
            ivs.attack,
            ivs.defense,
            ivs.stamina,
            report.cp,
            report.hp
        );
        return Ok(());
    }
    print_json(&report)
}

#[derive(Debug, Serialize)]
struct MaxCpReport {
    creature: String,
    max_cp: u32,
}

fn handle_max_cp(calculator: &Calculator, rest: &[&str], as_table: bool) -> Result<(), CliError> {
    let name = creature_arg(rest, "maxcp <name>")?;
    let report = MaxCpReport {
        creature: calculator.creature(name)?.name.clone(),
        max_cp: calculator.max_cp(name)?,
    };
    if as_table {
        println!("creature\tmax_cp");
        println!("{}\t{}", report.creature, report.max_cp);
        return Ok(());
    }
    print_json(&report)
}

fn print_candidate_rows(candidates: &[IvCandidate]) {
    println!("level\tattack\tdefense\tstamina\tpercent\tcp");
    for candidate in candidates {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            candidate.level,
            candidate.ivs.attack,
            candidate.ivs.defense,
            candidate.ivs.stamina,
            candidate.percent,
            candidate.cp
        );
    }
}

fn handle_iv(calculator: &Calculator, rest: &[&str], as_table: bool) -> Result<(), CliError> {
    let Some((name, query_args)) = rest.split_first() else {
        return Err(CliError::Usage("iv <name> <cp> [level|stardust] [a|d|s] [hp=<n>]"));
    };
    let query = parse_iv_query(query_args)?;
    let solution = calculator.iv(name, &query)?;

    if !as_table {
        return print_json(&solution);
    }
    if solution.is_empty() {
        println!(
            "no possible IV combinations for {} at CP {}",
            solution.creature, solution.cp
        );
        return Ok(());
    }
    print_candidate_rows(&solution.candidates);
    if solution.truncated {
        println!(
            "showing {} of {} matches",
            solution.candidates.len(),
            solution.total_matches
        );
    }
    Ok(())
}

fn handle_raid_cp(calculator: &Calculator, rest: &[&str], as_table: bool) -> Result<(), CliError> {
    let name = creature_arg(rest, "raidcp <name> [cp]")?;

    let Some(raw_cp) = rest.get(1) else {
        let ranges = calculator.raid_cp_range(name)?;
        if as_table {
            println!("level\tmin\tmax");
            for range in &ranges {
                println!("{}\t{}\t{}", range.level, range.min, range.max);
            }
            return Ok(());
        }
        return print_json(&ranges);
    };

    let cp = parse_u32("cp", raw_cp)?;
    let matches = calculator.raid_iv(name, cp)?;
    if !as_table {
        return print_json(&matches);
    }
    if matches.is_empty() {
        println!(
            "no possible raid IV combinations for {} at CP {}",
            matches.creature, matches.cp
        );
        return Ok(());
    }
    print_candidate_rows(&matches.candidates);
    Ok(())
}

#[derive(Debug, Serialize)]
struct RaidChartPage<'a> {
    creature: &'a str,
    levels: &'a [Level],
    page: usize,
    pages: usize,
    rows: &'a [RaidChartRow],
}

fn handle_raid_chart(
    calculator: &Calculator,
    rest: &[&str],
    as_table: bool,
) -> Result<(), CliError> {
    let name = creature_arg(rest, "raidchart <name> [page]")?;
    let page = rest
        .get(1)
        .map(|raw| parse_u32("page", raw).map(|page| page as usize))
        .transpose()?;

    let chart = calculator.raid_chart(name)?;
    let pages = chart.pages();
    let rows: &[RaidChartRow] = match page {
        Some(page) => pages
            .get(page.wrapping_sub(1))
            .copied()
            .ok_or(CliError::PageOutOfRange {
                page,
                pages: pages.len(),
            })?,
        None => &chart.rows,
    };

    if as_table {
        let mut header = String::from("attack\tdefense\tstamina\tpercent");
        for level in &chart.levels {
            header.push_str(&format!("\tcp@{level}"));
        }
        println!("{header}");
        for row in rows {
            let mut line = format!(
                "{}\t{}\t{}\t{}",
                row.ivs.attack, row.ivs.defense, row.ivs.stamina, row.percent
            );
            for level_cp in &row.cps {
                line.push_str(&format!("\t{}", level_cp.cp));
            }
            println!("{line}");
        }
        return Ok(());
    }

    match page {
        Some(page) => print_json(&RaidChartPage {
            creature: &chart.creature,
            levels: &chart.levels,
            page,
            pages: pages.len(),
            rows,
        }),
        None => print_json(&chart),
    }
}

#[derive(Debug, Serialize)]
struct TypesReport {
    creature: String,
    types: Vec<String>,
}

fn handle_types(calculator: &Calculator, rest: &[&str], as_table: bool) -> Result<(), CliError> {
    let name = creature_arg(rest, "types <name>")?;
    let report = TypesReport {
        creature: calculator.creature(name)?.name.clone(),
        types: calculator.types(name)?,
    };
    if as_table {
        for type_name in &report.types {
            println!("{}\t{type_name}", report.creature);
        }
        return Ok(());
    }
    print_json(&report)
}

fn handle_moves(calculator: &Calculator, rest: &[&str], as_table: bool) -> Result<(), CliError> {
    let name = creature_arg(rest, "moves <name>")?;
    let moves = calculator.moves(name)?;
    if as_table {
        for fast in &moves.fast {
            println!("fast\t{fast}");
        }
        for charge in &moves.charge {
            println!("charge\t{charge}");
        }
        return Ok(());
    }
    print_json(&moves)
}

fn handle_effect(calculator: &Calculator, rest: &[&str], as_table: bool) -> Result<(), CliError> {
    let name = creature_arg(rest, "effect <name|type>")?;
    let summary = calculator.effect(name)?;
    if as_table {
        for (label, names) in [
            ("super_effective", &summary.super_effective),
            ("not_very_effective", &summary.not_very_effective),
            ("weak_to", &summary.weak_to),
            ("resistant_to", &summary.resistant_to),
        ] {
            println!("{label}\t{}", names.join(", "));
        }
        return Ok(());
    }
    print_json(&summary)
}

fn handle_validate(
    calculator: &Calculator,
    config: &EngineConfig,
    as_table: bool,
) -> Result<(), CliError> {
    let catalog = calculator.catalog();
    let mut report = validate_catalog(catalog);
    match catalog.registry() {
        Some(registry) => {
            for problem in check_registry(&config.data_dir, registry) {
                report.push(ValidationSeverity::Error, "registry", problem);
            }
        }
        None => report.push(
            ValidationSeverity::Warning,
            "registry",
            "registry.json missing or unreadable",
        ),
    }

    if as_table {
        for diagnostic in &report.diagnostics {
            println!(
                "{}\t{}\t{}",
                diagnostic.severity, diagnostic.context, diagnostic.message
            );
        }
    } else {
        print_json(&report)?;
    }
    finish_validation(&report)
}

fn finish_validation(report: &ValidationReport) -> Result<(), CliError> {
    if report.has_errors() {
        return Err(CliError::Invalid(report.count(ValidationSeverity::Error)));
    }
    eprintln!(
        "validation passed: {} warning(s), {} note(s)",
        report.count(ValidationSeverity::Warning),
        report.count(ValidationSeverity::Info)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command(&args(&["ivcalc", "iv"])), Some(Command::Iv));
        assert_eq!(parse_command(&args(&["ivcalc", "type"])), Some(Command::Types));
        assert_eq!(parse_command(&args(&["ivcalc", "raidchart"])), Some(Command::RaidChart));
        assert_eq!(parse_command(&args(&["ivcalc", "fight"])), None);
        assert_eq!(parse_command(&args(&["ivcalc"])), None);
    }

    #[test]
    fn unknown_command_is_usage_error() {
        assert_eq!(run_with_args(&args(&["ivcalc", "fight"])), 2);
    }

    #[test]
    fn input_errors_exit_with_two() {
        assert_eq!(CliError::Usage("iv").exit_code(), 2);
        assert_eq!(CliError::Query(QueryError::Missing("cp")).exit_code(), 2);
        assert_eq!(
            CliError::Engine(EngineError::UnknownCreature("x".to_string())).exit_code(),
            1
        );
    }
}
