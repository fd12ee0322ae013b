//! Seeding tool: create the world tables in a SQLite file and fill them with
//! the synthetic world dataset.
//!
//! Usage:
//!   cargo run -p world-probe --bin seed-world -- --db <path> [--cities <n>] [--force]
//!
//! `--cities` may not be smaller than the built-in sample cities it always
//! includes. If the file already holds world data, `--force` is required to
//! replace it.

use anyhow::{Context, bail};
use rusqlite::Connection;
use std::env;
use std::path::PathBuf;
use std::time::Instant;
use world_probe::populate::{DatasetParams, generate_synthetic, insert_world, sample_world};
use world_probe::schema::{clear_tables, configure_connection, create_tables, has_world_data};

struct Args {
    db: PathBuf,
    params: DatasetParams,
    force: bool,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut db: Option<PathBuf> = None;
    let mut params = DatasetParams::world_sized();
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    bail!("--db requires a path argument");
                };
                db = Some(PathBuf::from(path));
            }
            "--cities" => {
                i += 1;
                let Some(count) = args.get(i) else {
                    bail!("--cities requires a number");
                };
                params.city_count = count
                    .parse()
                    .with_context(|| format!("invalid city count '{count}'"))?;
                let minimum = sample_world().cities.len();
                if params.city_count < minimum {
                    bail!("--cities must be at least {minimum}, got {}", params.city_count);
                }
            }
            "--force" => force = true,
            other => bail!("unknown argument '{other}'"),
        }
        i += 1;
    }

    let Some(db) = db else {
        bail!("missing --db <path>");
    };
    Ok(Args { db, params, force })
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let args = parse_args(&args)?;

    world_core::initialize_logger(log::LevelFilter::Info, None)?;

    let mut conn = Connection::open(&args.db)
        .with_context(|| format!("open {}", args.db.display()))?;
    configure_connection(&conn)?;

    if has_world_data(&conn)? {
        if !args.force {
            bail!(
                "{} already holds world data. Use --force to overwrite.",
                args.db.display()
            );
        }
        log::warn!("Replacing existing world data in {}", args.db.display());
        clear_tables(&conn)?;
    }
    create_tables(&conn)?;

    let t = Instant::now();
    let data = generate_synthetic(&args.params);
    insert_world(&mut conn, &data)?;
    log::info!("Seeded {} in {:.2?}", args.db.display(), t.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        std::iter::once("seed-world")
            .chain(parts.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parses_all_flags() {
        let args = parse_args(&argv(&["--db", "w.sqlite", "--cities", "100", "--force"])).unwrap();
        assert_eq!(args.db, PathBuf::from("w.sqlite"));
        assert_eq!(args.params.city_count, 100);
        assert!(args.force);
    }

    #[test]
    fn db_is_required() {
        assert!(parse_args(&argv(&["--force"])).is_err());
        assert!(parse_args(&argv(&["--db"])).is_err());
    }

    #[test]
    fn city_count_below_the_sample_cities_is_rejected() {
        let minimum = sample_world().cities.len();
        let too_few = (minimum - 1).to_string();
        assert!(parse_args(&argv(&["--db", "w.sqlite", "--cities", &too_few])).is_err());

        let exact = minimum.to_string();
        let args = parse_args(&argv(&["--db", "w.sqlite", "--cities", &exact])).unwrap();
        assert_eq!(generate_synthetic(&args.params).cities.len(), minimum);
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(parse_args(&argv(&["--db", "w.sqlite", "--turbo"])).is_err());
    }
}
