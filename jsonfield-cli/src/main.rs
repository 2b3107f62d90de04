use clap::{Parser, Subcommand};
use jsonfield::mapper::{JsonFieldMapper, JsonFieldMapping};
use jsonfield::query::{Capability, QueryKind, QueryRequest};
use jsonfield::stream::{JsonTokenStream, ValueTokenStream};
use jsonfield::{keyed_value, JsonIndex};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jsonfield", about = "Flatten JSON objects into keyword tokens")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct FieldArgs {
    /// Mapping definition file, e.g. {"type": "json", "ignore_above": 256}
    #[arg(long)]
    mapping: Option<PathBuf>,
    #[arg(long, env = "JSONFIELD_FIELD", default_value = "json_field")]
    field: String,
    /// Input file with one or more JSON objects; stdin when omitted
    input: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tokens produced for each input object, one JSON line each
    Flatten(FieldArgs),
    /// Index the input objects and count the ones matching a query
    Search {
        #[command(flatten)]
        args: FieldArgs,
        /// Leaf value to look for
        #[arg(long, conflicts_with = "exists")]
        value: Option<String>,
        /// Dotted key path the value must sit under
        #[arg(long, requires = "value")]
        key: Option<String>,
        /// Match every object that produced at least one token
        #[arg(long)]
        exists: bool,
    },
    /// List query kinds and whether json fields support them
    Capabilities,
}

fn load_mapper(args: &FieldArgs) -> Result<JsonFieldMapper, Box<dyn std::error::Error>> {
    let mapping = match &args.mapping {
        Some(path) => JsonFieldMapping::load(path)?,
        None => JsonFieldMapping::default(),
    };
    Ok(mapping.into_builder(&args.field)?.build())
}

fn read_values(input: Option<&Path>) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(BufReader::new(std::io::stdin())),
    };
    read_from(reader)
}

fn read_from<R: Read>(reader: R) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let mut values = Vec::new();
    for value in serde_json::Deserializer::from_reader(reader).into_iter::<Value>() {
        values.push(value?);
    }
    Ok(values)
}

fn run_flatten(args: &FieldArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mapper = load_mapper(args)?;
    let values = read_values(args.input.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for (doc, value) in values.iter().enumerate() {
        let mut stream = ValueTokenStream::new(value);
        stream.next_token()?;
        for token in mapper.parse(&mut stream)? {
            let line = json!({
                "doc": doc,
                "field": &*token.field,
                "kind": token.kind,
                "value": token.text(),
            });
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

fn run_search(
    args: &FieldArgs,
    value: Option<&str>,
    key: Option<&str>,
    exists: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = match (value, key) {
        _ if exists => QueryRequest::Exists,
        (Some(value), Some(key)) => QueryRequest::Term(keyed_value(key, value)),
        (Some(value), None) => QueryRequest::Term(value.to_string()),
        (None, _) => return Err("one of --value or --exists is required".into()),
    };

    let mapper = load_mapper(args)?;
    let field = mapper.name().to_string();
    let docs: Vec<Value> = read_values(args.input.as_deref())?
        .into_iter()
        .map(|value| {
            let mut doc = serde_json::Map::new();
            doc.insert(field.clone(), value);
            Value::Object(doc)
        })
        .collect();

    let index = JsonIndex::create_in_ram(mapper)?;
    index.add_documents(&docs)?;
    println!("{}", index.count(&request)?);
    Ok(())
}

fn run_capabilities() {
    for kind in QueryKind::ALL {
        let status = match kind.capability() {
            Capability::Supported => "supported",
            Capability::Rejected => "rejected",
        };
        println!("{}\t{}", kind.name(), status);
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Flatten(args) => run_flatten(args),
        Command::Search {
            args,
            value,
            key,
            exists,
        } => run_search(args, value.as_deref(), key.as_deref(), *exists),
        Command::Capabilities => {
            run_capabilities();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}
