use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use clap::{Args, Parser, Subcommand, ValueEnum};

use record_diff::{
    ChangeSet, ChangeType, DynamicRecord, Error, Result, Shape, apply,
    codec::{Encoding, from_file_bytes, to_file_bytes},
    compare,
    compress::CompressionType,
    config::{Config, LogConfig, init_config},
    describe, filter, merge, revert,
};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// The number of threads in parallel computing, 0 for one per core
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Compression type of written change-set files
    #[arg(short, long, default_value = "zlib")]
    compression_type: CompressionType,

    /// Encoding of written change-set files
    #[arg(short, long, default_value = "json")]
    encoding: Encoding,

    /// Use verbose output (-vvv also writes record-diff.log)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two records which have the same shape
    Diff(DiffArgs),
    /// Apply a change set to a record
    Patch(PatchArgs),
    /// Invert a change set
    Revert(RevertArgs),
    /// Merge change sets, later ones win per field
    Squash(SquashArgs),
    /// Keep the changes of some types or fields
    Filter(FilterArgs),
    /// Print a change set
    Show(ShowArgs),
}

#[derive(Debug, Args)]
struct DiffArgs {
    /// Path to shape file
    shape: PathBuf,
    /// Path to old record
    old: PathBuf,
    /// Path to new record
    new: PathBuf,
    /// Path to save change-set file
    diff: PathBuf,
}

#[derive(Debug, Args)]
struct PatchArgs {
    /// Path to shape file
    shape: PathBuf,
    /// Path to base record
    base: PathBuf,
    /// Path to change-set file
    diff: PathBuf,
    /// Path to save patched record, stdout if omitted
    patched: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct RevertArgs {
    /// Path to change-set file
    diff: PathBuf,
    /// Path to save reverted change-set file
    reverted: PathBuf,
}

#[derive(Debug, Args)]
struct SquashArgs {
    /// Path to base change-set file
    base: PathBuf,
    /// Paths to squashing change-set files, applied in order
    #[arg(required = true)]
    squashing: Vec<PathBuf>,
    /// Path to save squashed change-set file
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// Path to change-set file
    diff: PathBuf,
    /// Path to save filtered change-set file
    filtered: PathBuf,
    /// Change types to keep
    #[arg(long = "type")]
    types: Vec<ChangeTypeArg>,
    /// Fields to keep
    #[arg(long = "field")]
    fields: Vec<String>,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Path to change-set file
    diff: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChangeTypeArg {
    Added,
    Modified,
    Deleted,
}

impl From<ChangeTypeArg> for ChangeType {
    fn from(value: ChangeTypeArg) -> Self {
        match value {
            ChangeTypeArg::Added => ChangeType::Added,
            ChangeTypeArg::Modified => ChangeType::Modified,
            ChangeTypeArg::Deleted => ChangeType::Deleted,
        }
    }
}

fn invalid_input(path: &Path, err: serde_json::Error) -> Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("{}: {}", path.display(), err)).into()
}

fn read_shape(path: &Path) -> Result<Arc<Shape>> {
    let bytes = fs::read(path)?;
    let shape: Shape = serde_json::from_slice(&bytes).map_err(|e| invalid_input(path, e))?;
    Ok(Arc::new(shape))
}

fn read_record(shape: &Arc<Shape>, path: &Path) -> Result<DynamicRecord> {
    let bytes = fs::read(path)?;
    let json = serde_json::from_slice(&bytes).map_err(|e| invalid_input(path, e))?;
    DynamicRecord::from_json(Arc::clone(shape), json)
}

fn read_changes(path: &Path) -> Result<ChangeSet> {
    log::info!("reading change set {}...", path.display());
    from_file_bytes(&fs::read(path)?)
}

fn write_changes(cli: &Cli, changes: &ChangeSet, path: &Path) -> Result<()> {
    log::info!("writing change set {}...", path.display());
    let bytes = to_file_bytes(changes, cli.encoding, cli.compression_type)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Diff(args) => {
            let shape = read_shape(&args.shape)?;
            log::info!("reading records...");
            let old = read_record(&shape, &args.old)?;
            let new = read_record(&shape, &args.new)?;
            log::info!("comparing...");
            let changes = compare(&old, &new)?;
            write_changes(cli, &changes, &args.diff)?;
        }
        Commands::Patch(args) => {
            let shape = read_shape(&args.shape)?;
            let base = read_record(&shape, &args.base)?;
            let changes = read_changes(&args.diff)?;
            log::info!("patching...");
            let patched = apply(&base, &changes)?;
            let json = serde_json::to_vec_pretty(&patched.to_json()).map_err(io::Error::from)?;
            match &args.patched {
                Some(path) => fs::write(path, json)?,
                None => {
                    let mut writer = BufWriter::new(io::stdout().lock());
                    writer.write_all(&json)?;
                    writer.write_all(b"\n")?;
                    writer.flush()?;
                }
            }
        }
        Commands::Revert(args) => {
            let changes = read_changes(&args.diff)?;
            log::info!("reverting...");
            write_changes(cli, &revert(&changes), &args.reverted)?;
        }
        Commands::Squash(args) => {
            let mut sets = vec![read_changes(&args.base)?];
            for path in &args.squashing {
                sets.push(read_changes(path)?);
            }
            log::info!("squashing...");
            let refs: Vec<&[_]> = sets.iter().map(Vec::as_slice).collect();
            write_changes(cli, &merge(&refs), &args.output)?;
        }
        Commands::Filter(args) => {
            let changes = read_changes(&args.diff)?;
            let types: Vec<ChangeType> = args.types.iter().map(|&t| t.into()).collect();
            let fields: Vec<&str> = args.fields.iter().map(String::as_str).collect();
            let filtered = filter(&changes, &types, &fields).into_owned();
            write_changes(cli, &filtered, &args.filtered)?;
        }
        Commands::Show(args) => {
            let changes = read_changes(&args.diff)?;
            println!("{}", describe(&changes));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_config(Config {
        log_config: LogConfig::Verbose(cli.verbose),
        threads: cli.threads,
    });
    log::debug!("cli args: {:#?}", cli);
    match run(&cli) {
        Ok(()) => {
            log::info!("success");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
