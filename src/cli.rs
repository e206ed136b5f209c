use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum, error::ErrorKind};
use tracing::info;

use crate::config::{LengthRange, OutputOrder, SamplerConfig, TrimPolicy};
use crate::constants::cli::{PROGRAM_NAME, STDIO_PATH};
use crate::errors::SamplerError;
use crate::pipeline;
use crate::report::SampleSummary;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TrimPolicyArg {
    StrictlyAbove,
    AtLeast,
}

impl From<TrimPolicyArg> for TrimPolicy {
    fn from(value: TrimPolicyArg) -> Self {
        match value {
            TrimPolicyArg::StrictlyAbove => TrimPolicy::StrictlyAbove,
            TrimPolicyArg::AtLeast => TrimPolicy::AtLeast,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputOrderArg {
    Corpus,
    Round,
    Label,
}

impl From<OutputOrderArg> for OutputOrder {
    fn from(value: OutputOrderArg) -> Self {
        match value {
            OutputOrderArg::Corpus => OutputOrder::Corpus,
            OutputOrderArg::Round => OutputOrder::Round,
            OutputOrderArg::Label => OutputOrder::Label,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = PROGRAM_NAME,
    disable_help_subcommand = true,
    about = "Draw a document-balanced random sample of sentences from a token TSV",
    long_about = "Read a tab-separated token stream (header line, then one token per line with doc_id, an unused column, and sent_id first), keep sentences whose length is in [MIN_LEN, MAX_LEN), and sample them round-robin across documents until SAMPLE_SIZE tokens are reached.",
    after_help = "Use '-' for INPUT or OUTPUT to read stdin or write stdout. Set RUST_LOG=debug for per-round progress on stderr."
)]
struct SampleCli {
    #[arg(value_name = "INPUT", help = "Token TSV to sample from")]
    input: PathBuf,
    #[arg(value_name = "OUTPUT", help = "Where to write the sampled token TSV")]
    output: PathBuf,
    #[arg(value_name = "MIN_LEN", help = "Inclusive minimum sentence length in tokens")]
    minimum_len: usize,
    #[arg(value_name = "MAX_LEN", help = "Exclusive maximum sentence length in tokens")]
    maximum_len: usize,
    #[arg(
        value_name = "SAMPLE_SIZE",
        allow_negative_numbers = true,
        help = "Token budget of the sample; values <= 0 produce an empty sample"
    )]
    sample_size: i64,
    #[arg(
        long = "force-sample-size",
        help = "Trim the last round toward SAMPLE_SIZE instead of keeping it whole"
    )]
    force_sample_size: bool,
    #[arg(
        long = "trim-policy",
        value_enum,
        default_value_t = TrimPolicyArg::StrictlyAbove,
        requires = "force_sample_size",
        help = "Stopping rule used by --force-sample-size"
    )]
    trim_policy: TrimPolicyArg,
    #[arg(
        long = "output-order",
        value_enum,
        default_value_t = OutputOrderArg::Corpus,
        help = "Order of sampled sentences in OUTPUT"
    )]
    output_order: OutputOrderArg,
    #[arg(long, help = "Optional deterministic seed; a fresh seed is drawn and logged otherwise")]
    seed: Option<u64>,
    #[arg(
        long = "summary-json",
        value_name = "PATH",
        help = "Optional path for a JSON summary of the run"
    )]
    summary_json: Option<PathBuf>,
}

impl SampleCli {
    fn config(&self) -> SamplerConfig {
        SamplerConfig {
            length: LengthRange::new(self.minimum_len, self.maximum_len),
            sample_size: self.sample_size,
            force_sample_size: self.force_sample_size,
            trim_policy: self.trim_policy.into(),
            output_order: self.output_order.into(),
            seed: self.seed,
        }
    }
}

/// Parse `args_iter` (without the program name) and run one sampling pass.
pub fn run_sample<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    let Some(cli) =
        parse_cli::<SampleCli, _>(std::iter::once(PROGRAM_NAME.to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let config = cli.config();
    let reader = open_input(&cli.input)?;
    let mut writer = open_output(&cli.output)?;
    let summary = pipeline::run(reader, &mut writer, &config)?;

    if let Some(path) = &cli.summary_json {
        write_summary(path, &summary)?;
        info!(path = %path.display(), "wrote sample summary");
    }
    Ok(())
}

fn open_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    if path == Path::new(STDIO_PATH) {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

fn open_output(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new(STDIO_PATH) {
        Ok(Box::new(BufWriter::new(io::stdout())))
    } else {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }
}

fn write_summary(path: &Path, summary: &SampleSummary) -> Result<(), SamplerError> {
    let mut writer = BufWriter::new(File::create(path)?);
    summary.write_json(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Outcome of argument parsing that is not a usage error.
enum Parsed<T> {
    Run(T),
    /// `--help` or `--version`; holds the text clap would print.
    Exit(clap::Error),
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match try_parse::<T, I>(args)? {
        Parsed::Run(cli) => Ok(Some(cli)),
        Parsed::Exit(info) => {
            info.print()?;
            Ok(None)
        }
    }
}

fn try_parse<T, I>(args: I) -> Result<Parsed<T>, clap::Error>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Parsed::Run(cli)),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Ok(Parsed::Exit(err))
        }
        Err(err) => Err(err),
    }
}
