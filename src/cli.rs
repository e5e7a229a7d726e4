use std::path::Path;

use serde_json::Value;
use tracing::error;

use crate::config::Config;
use crate::data::{validate_records, validate_table_file, CountryTable, TableFile, BUILTIN_COUNTRIES};
use crate::estimate::{
    estimate_equipment, global_ranking, EquipmentCategory, EstimateSource, Rng,
};
use crate::server;
use crate::server::api;
use crate::views::{project_category, projection_rows, StatCategory, YearOrder};

const USAGE: &str = "usage: milstat <serve|countries|view|equipment|rankings|projections|validate>
  view <category> <country>... [--ascending] [--csv]
  equipment <country>... [--randomized] [--seed N]
  rankings <category> [--table]
  validate [path]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Countries,
    View,
    Equipment,
    Rankings,
    Projections,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("countries") => Some(Command::Countries),
        Some("view") => Some(Command::View),
        Some("equipment") => Some(Command::Equipment),
        Some("rankings") => Some(Command::Rankings),
        Some("projections") => Some(Command::Projections),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Countries) => with_table(|table| print_json(api::countries_payload(table))),
        Some(Command::View) => with_table(|table| handle_view(table, args)),
        Some(Command::Equipment) => with_table(|table| handle_equipment(table, args)),
        Some(Command::Rankings) => with_table(|table| handle_rankings(table, args)),
        Some(Command::Projections) => with_table(|table| {
            print_json(serde_json::to_string_pretty(&projection_rows(table)))
        }),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Positional arguments after the command, plus `--flag` switches and `--seed <n>`.
#[derive(Debug, Default)]
struct CommandArgs<'a> {
    positional: Vec<&'a str>,
    flags: Vec<&'a str>,
    seed: Option<&'a str>,
}

impl<'a> CommandArgs<'a> {
    fn parse(args: &'a [String]) -> Self {
        let mut parsed = Self::default();
        let mut rest = args.iter().skip(2).map(String::as_str);
        while let Some(arg) = rest.next() {
            match arg {
                "--seed" => parsed.seed = rest.next(),
                flag if flag.starts_with("--") => parsed.flags.push(flag),
                value => parsed.positional.push(value),
            }
        }
        parsed
    }

    fn has(&self, flag: &str) -> bool {
        self.flags.contains(&flag)
    }
}

fn with_table(run: impl FnOnce(&CountryTable) -> i32) -> i32 {
    match Config::from_env().load_table() {
        Ok(table) => run(&table),
        Err(err) => {
            error!("failed to load country table: {err}");
            eprintln!("failed to load country table: {err}");
            1
        }
    }
}

fn print_json<E: std::fmt::Display>(payload: Result<String, E>) -> i32 {
    match payload {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

fn handle_serve() -> i32 {
    match server::run_server(&Config::from_env()) {
        Ok(()) => 0,
        Err(err) => {
            error!("server error: {err}");
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_view(table: &CountryTable, args: &[String]) -> i32 {
    let parsed = CommandArgs::parse(args);
    let Some((category, countries)) = parsed.positional.split_first() else {
        eprintln!("usage: milstat view <category> <country>... [--ascending] [--csv]");
        return 2;
    };
    let category = match category.parse::<StatCategory>() {
        Ok(category) => category,
        Err(err) => {
            eprintln!("{err}");
            return 2;
        }
    };
    let order = if parsed.has("--ascending") {
        YearOrder::Ascending
    } else {
        YearOrder::FirstSeen
    };

    let view = match project_category(table, category, countries, order) {
        Ok(view) => view,
        Err(err) => {
            eprintln!("view failed: {err}");
            return 1;
        }
    };
    for note in &view.notes {
        if let Ok(note) = serde_json::to_string(note) {
            eprintln!("note: {note}");
        }
    }

    if parsed.has("--csv") {
        match rows_to_csv(&view.rows) {
            Ok(csv) => {
                print!("{csv}");
                0
            }
            Err(err) => {
                eprintln!("failed to write csv: {err}");
                1
            }
        }
    } else {
        print_json(serde_json::to_string_pretty(&view.rows))
    }
}

/// Header is every key in first-seen order across rows; absent cells are left empty.
pub fn rows_to_csv(rows: &[Value]) -> Result<String, csv::Error> {
    let mut header: Vec<&str> = Vec::new();
    for row in rows {
        if let Some(object) = row.as_object() {
            for key in object.keys() {
                if !header.contains(&key.as_str()) {
                    header.push(key);
                }
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header)?;
    for row in rows {
        let record: Vec<String> = header
            .iter()
            .map(|key| match row.get(*key) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(text)) => text.clone(),
                Some(other) => other.to_string(),
            })
            .collect();
        writer.write_record(&record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn handle_equipment(table: &CountryTable, args: &[String]) -> i32 {
    let parsed = CommandArgs::parse(args);
    if parsed.positional.is_empty() {
        eprintln!("usage: milstat equipment <country>... [--randomized] [--seed N]");
        return 2;
    }

    let result = if parsed.has("--randomized") || parsed.seed.is_some() {
        let seed = match parsed.seed.map(str::parse::<u64>) {
            Some(Ok(seed)) => seed,
            Some(Err(err)) => {
                eprintln!("invalid seed: {err}");
                return 2;
            }
            None => match Rng::from_entropy() {
                Ok(mut rng) => rng.next_u64(),
                Err(err) => {
                    eprintln!("entropy unavailable: {err}");
                    return 1;
                }
            },
        };
        let mut rng = Rng::new(seed);
        estimate_equipment(table, &parsed.positional, EstimateSource::Randomized(&mut rng))
    } else {
        estimate_equipment(table, &parsed.positional, EstimateSource::Deterministic)
    };

    match result {
        Ok(estimates) => print_json(serde_json::to_string_pretty(&estimates)),
        Err(err) => {
            eprintln!("estimate failed: {err}");
            1
        }
    }
}

fn handle_rankings(table: &CountryTable, args: &[String]) -> i32 {
    let parsed = CommandArgs::parse(args);
    let Some(raw) = parsed.positional.first() else {
        eprintln!("usage: milstat rankings <category> [--table]");
        return 2;
    };
    let category = match raw.parse::<EquipmentCategory>() {
        Ok(category) => category,
        Err(err) => {
            eprintln!("{err}");
            return 2;
        }
    };
    let ranking = global_ranking(table, category);

    if parsed.has("--table") {
        println!("rank\tcountry\tquantity\tpower_rating");
        for entry in &ranking {
            println!(
                "{}\t{}\t{}\t{:.1}",
                entry.rank, entry.country, entry.quantity, entry.power_rating
            );
        }
        0
    } else {
        print_json(serde_json::to_string_pretty(&ranking))
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let path = args.get(2).map(String::as_str);
    let report = match path {
        Some(path) => validate_table_file(Path::new(path)).map_err(|err| err.to_string()),
        None => serde_json::from_str::<TableFile>(BUILTIN_COUNTRIES)
            .map(|file| validate_records(&file.countries))
            .map_err(|err| err.to_string()),
    };
    let label = path.unwrap_or("<builtin>");

    match report {
        Ok(report) => {
            for warning in report.warnings() {
                eprintln!("- {warning}");
            }
            if report.has_errors() {
                eprintln!("validation failed: {} issue(s)", report.error_count());
                for diag in report.diagnostics.iter().filter(|diag| {
                    diag.severity == crate::data::ValidationSeverity::Error
                }) {
                    eprintln!("- {diag}");
                }
                1
            } else {
                println!("validation passed: {label}");
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}
