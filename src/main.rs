//! *The binary is available only if rdfsort is built with the `"cli"` feature.*
use clap::{Parser, ValueEnum};
use color_eyre::config::HookBuilder;
use color_eyre::eyre::{Report, WrapErr, bail};
use fs_err::File;
use log::info;
use rdfsort::{InlineViolation, MemberConstraint, Options, SortedIndex, TripleIndex};
use sophia::api::source::TripleSource;
use sophia::api::term::SimpleTerm;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Members {
    Any,
    Iri,
    Literal,
}

impl From<Members> for MemberConstraint {
    fn from(m: Members) -> Self {
        match m {
            Members::Any => MemberConstraint::Any,
            Members::Iri => MemberConstraint::Iri,
            Members::Literal => MemberConstraint::Literal,
        }
    }
}

/// sort an RDF graph canonically and write it as N-Triples
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    /// nest blank nodes at their point of use, fails if they are shared or cyclic
    inline: bool,

    #[arg(long, requires = "inline")]
    /// sort without inlining instead of failing when blank nodes cannot be inlined
    fallback: bool,

    #[arg(long, value_enum, default_value_t = Members::Any)]
    /// values accepted as members when recognizing RDF collections
    members: Members,

    #[arg(long)]
    /// do not cache blank node comparisons
    no_memo: bool,

    #[arg(short, long)]
    /// write nothing, fail if the output file (or the input file if there is none) is not in canonical form
    check: bool,

    /// the RDF file to sort, parsed as Turtle if it ends with .ttl and as N-Triples otherwise
    input_file: String,
    /// the N-Triples file to create, if not given it is written to stdout
    output_file: Option<String>,
}

type SimpleGraph = Vec<[SimpleTerm<'static>; 3]>;

fn read_graph(filename: &str) -> Result<SimpleGraph, Report> {
    let file = File::open(filename).with_context(|| format!("Error opening input file {filename}"))?;
    let reader = BufReader::new(file);
    let graph = if Path::new(filename).extension().is_some_and(|e| e == "ttl") {
        sophia::turtle::parser::turtle::parse_bufread(reader).collect_triples()
    } else {
        sophia::turtle::parser::nt::parse_bufread(reader).collect_triples()
    };
    graph.with_context(|| format!("Error parsing {filename}"))
}

fn main() -> Result<(), Report> {
    HookBuilder::default().display_env_section(false).install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let options = Options::new()
        .with_inline_blank_nodes(args.inline)
        .with_collection_members(args.members.into())
        .with_inline_violation(if args.fallback { InlineViolation::FallBack } else { InlineViolation::Fail })
        .with_memoize(!args.no_memo);

    let graph = read_graph(&args.input_file)?;
    let index = TripleIndex::from_graph(&graph).wrap_err("Error indexing the input graph")?;
    info!("Loaded {} triples from {}", index.len(), args.input_file);
    let sorted = SortedIndex::build(&index, &options).wrap_err("Error sorting the input graph")?;
    let mut nt = Vec::new();
    sorted.write_nt(&mut nt)?;

    if args.check {
        let target = args.output_file.as_deref().unwrap_or(&args.input_file);
        let existing = fs_err::read(target)?;
        if existing != nt {
            bail!("{target} is not in canonical form");
        }
        info!("{target} is in canonical form");
        return Ok(());
    }
    match args.output_file {
        Some(filename) => {
            let file = File::create(&filename).with_context(|| format!("Error creating output file {filename}"))?;
            let mut writer = BufWriter::new(file);
            writer.write_all(&nt)?;
            writer.flush()?;
            info!("Wrote {} triples to {filename}", sorted.len());
        }
        None => std::io::stdout().lock().write_all(&nt)?,
    }
    Ok(())
}
