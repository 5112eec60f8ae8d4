use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;

use bifm_rust::alphabet::{Alphabet, AminoAcid, Dna4, Dna5};
use bifm_rust::config::{IndexConfig, DEFAULT_SAMPLING_STRIDE};
use bifm_rust::index::{BiFMIndex, IndexMeta};
use bifm_rust::io::fasta::FastaReader;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "bifm", author, version, about = "Bidirectional FM-index: build once, count and locate many times", arg_required_else_help = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum AlphabetArg {
    Dna4,
    Dna5,
    Protein,
}

#[derive(clap::Args, Debug)]
struct QueryArgs {
    /// Path to index file (.bifm)
    #[arg(short = 'i', long = "index")]
    index: PathBuf,
    /// Alphabet the index was built with
    #[arg(short, long, value_enum, default_value_t = AlphabetArg::Dna4)]
    alphabet: AlphabetArg,
    /// Queries given on the command line
    queries: Vec<String>,
    /// FASTA file with additional queries
    #[arg(short = 'q', long = "query-file")]
    query_file: Option<PathBuf>,
    /// Output path (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    threads: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a bidirectional FM-index from a FASTA reference
    Index {
        /// Reference FASTA file
        reference: PathBuf,
        /// Output prefix; the index is written to <prefix>.bifm
        #[arg(short, long, default_value = "ref")]
        output: String,
        #[arg(short, long, value_enum, default_value_t = AlphabetArg::Dna4)]
        alphabet: AlphabetArg,
        /// Suffix array sampling stride (locate cost vs. index size)
        #[arg(short = 's', long = "stride", default_value_t = DEFAULT_SAMPLING_STRIDE)]
        stride: u32,
    },
    /// Print the number of occurrences of each query
    Count(QueryArgs),
    /// Print every occurrence (sequence name, 0-based offset) of each query
    Locate(QueryArgs),
    /// Print a summary of an index file
    Stats {
        index: PathBuf,
        #[arg(short, long, value_enum, default_value_t = AlphabetArg::Dna4)]
        alphabet: AlphabetArg,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    match cli.command {
        Commands::Index { reference, output, alphabet, stride } => {
            let config = IndexConfig::with_sampling_stride(stride);
            match alphabet {
                AlphabetArg::Dna4 => run_index::<Dna4>(&reference, &output, config),
                AlphabetArg::Dna5 => run_index::<Dna5>(&reference, &output, config),
                AlphabetArg::Protein => run_index::<AminoAcid>(&reference, &output, config),
            }
        }
        Commands::Count(args) => dispatch_query(&args, false),
        Commands::Locate(args) => dispatch_query(&args, true),
        Commands::Stats { index, alphabet } => match alphabet {
            AlphabetArg::Dna4 => run_stats::<Dna4>(&index),
            AlphabetArg::Dna5 => run_stats::<Dna5>(&index),
            AlphabetArg::Protein => run_stats::<AminoAcid>(&index),
        },
    }
}

fn run_index<A: Alphabet>(reference: &Path, output: &str, config: IndexConfig) -> Result<()> {
    let fh = std::fs::File::open(reference)
        .map_err(|e| anyhow!("cannot open reference FASTA '{}': {}", reference.display(), e))?;
    let records = FastaReader::new(std::io::BufReader::new(fh)).read_all()?;
    if records.is_empty() {
        bail!("FASTA file '{}' contains no sequences", reference.display());
    }

    let total_len: usize = records.iter().map(|r| r.seq.len()).sum();
    log::info!("reference: {}", reference.display());
    log::info!("sequences: {}, total_len: {}", records.len(), total_len);

    let mut idx = BiFMIndex::<A>::build(records.iter().map(|r| &r.seq), config)
        .with_context(|| format!("cannot index '{}'", reference.display()))?;
    idx.set_meta(IndexMeta {
        reference_file: Some(reference.display().to_string()),
        sequence_names: records.into_iter().map(|r| r.id).collect(),
        build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
        build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
    });

    let out_path = format!("{}.bifm", output);
    idx.save_to_file(&out_path)
        .map_err(|e| anyhow!("cannot write index to '{}': {}", out_path, e))?;
    log::info!("index saved: {}", out_path);
    Ok(())
}

fn dispatch_query(args: &QueryArgs, with_positions: bool) -> Result<()> {
    match args.alphabet {
        AlphabetArg::Dna4 => run_query::<Dna4>(args, with_positions),
        AlphabetArg::Dna5 => run_query::<Dna5>(args, with_positions),
        AlphabetArg::Protein => run_query::<AminoAcid>(args, with_positions),
    }
}

/// (name, sequence) pairs from the command line and the optional query file
fn collect_queries(args: &QueryArgs) -> Result<Vec<(String, Vec<u8>)>> {
    let mut queries: Vec<(String, Vec<u8>)> =
        args.queries.iter().map(|q| (q.clone(), q.as_bytes().to_vec())).collect();
    if let Some(path) = &args.query_file {
        let fh = std::fs::File::open(path)
            .map_err(|e| anyhow!("cannot open query FASTA '{}': {}", path.display(), e))?;
        for rec in FastaReader::new(std::io::BufReader::new(fh)) {
            let rec = rec?;
            queries.push((rec.id, rec.seq));
        }
    }
    if queries.is_empty() {
        bail!("no queries given");
    }
    Ok(queries)
}

fn run_query<A: Alphabet>(args: &QueryArgs, with_positions: bool) -> Result<()> {
    let idx = BiFMIndex::<A>::load_from_file(&args.index)?;
    let queries = collect_queries(args)?;
    log::info!("loaded {} ({} sequences), {} queries", args.index.display(), idx.sequence_count(), queries.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads.max(1))
        .build()
        .context("cannot start worker threads")?;

    // 每个查询各自持有一个游标，索引只读共享
    let lines: Vec<String> = pool.install(|| {
        queries
            .par_iter()
            .map(|(name, seq)| format_query::<A>(&idx, name, seq, with_positions))
            .collect()
    });

    let mut out = open_output(args.out.as_deref())?;
    for line in lines {
        out.write_all(line.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// 输出文件；未指定时写到 stdout
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let out: Box<dyn Write> = match path {
        Some(p) => {
            let fh = std::fs::File::create(p).with_context(|| format!("cannot create '{}'", p.display()))?;
            Box::new(std::io::BufWriter::new(fh))
        }
        None => Box::new(std::io::BufWriter::new(std::io::stdout())),
    };
    Ok(out)
}

fn format_query<A: Alphabet>(idx: &BiFMIndex<A>, name: &str, seq: &[u8], with_positions: bool) -> String {
    let mut cur = idx.cursor();
    let count = match cur.extend_right_seq(seq) {
        Ok(count) => count,
        Err(e) => {
            log::warn!("query '{}' skipped: {}", name, e);
            return format!("{}\terror\t{}\n", name, e);
        }
    };
    if !with_positions {
        return format!("{}\t{}\n", name, count);
    }
    let names = &idx.meta().sequence_names;
    let mut hits: Vec<_> = cur.locate().collect();
    hits.sort_unstable();
    let mut s = String::new();
    for hit in hits {
        let seq_name = names.get(hit.sequence).cloned().unwrap_or_else(|| hit.sequence.to_string());
        s.push_str(&format!("{}\t{}\t{}\n", name, seq_name, hit.offset));
    }
    s
}

fn run_stats<A: Alphabet>(path: &Path) -> Result<()> {
    let idx = BiFMIndex::<A>::load_from_file(path)?;
    let meta = idx.meta();
    println!("alphabet:\t{}", idx.alphabet_name());
    println!("text_len:\t{}", idx.size());
    println!("sequences:\t{}", idx.sequence_count());
    println!("stride:\t{}", idx.config().sampling_stride);
    println!(
        "sa_samples:\t{} fwd / {} rev",
        idx.forward().ssa.num_samples(),
        idx.reverse().ssa.num_samples()
    );
    if let Some(r) = &meta.reference_file {
        println!("reference:\t{}", r);
    }
    if let Some(t) = &meta.build_timestamp {
        println!("built:\t{}", t);
    }
    if let Some(a) = &meta.build_args {
        println!("command:\t{}", a);
    }
    for i in 0..idx.sequence_count() {
        let len = idx.sequence_bounds(i).map_or(0, |r| r.len());
        let name = meta.sequence_names.get(i).map_or("-", String::as_str);
        println!("seq\t{}\t{}\t{}", i, name, len);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritable_output_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("missing").join("hits.tsv");
        let err = open_output(Some(&bad)).err().unwrap();
        assert!(err.to_string().contains("hits.tsv"), "{}", err);

        let good = dir.path().join("hits.tsv");
        let mut out = open_output(Some(&good)).unwrap();
        out.write_all(b"q\t1\n").unwrap();
        out.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&good).unwrap(), "q\t1\n");
    }

    #[test]
    fn format_query_reports_count_and_bad_symbols() {
        let idx = BiFMIndex::<Dna4>::build(["ACGTACGT"], IndexConfig::default()).unwrap();
        assert_eq!(format_query(&idx, "q1", b"ACG", false), "q1\t2\n");
        assert_eq!(format_query(&idx, "q2", b"CGTA", true), "q2\t0\t1\n");
        assert!(format_query(&idx, "q3", b"ANG", false).starts_with("q3\terror\t"));
    }
}
