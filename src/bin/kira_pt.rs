use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing::error;
use tracing_subscriber::EnvFilter;

use kira_pathway_translator::config::{ConfigLoader, ResolvedConfig};
use kira_pathway_translator::convert::{Converter, model_base_name};
use kira_pathway_translator::domain::Species;
use kira_pathway_translator::error::KiraError;
use kira_pathway_translator::knowledge::{KnowledgeHttpClient, fetch_mappings};
use kira_pathway_translator::mapper::{KeggGeneTable, SymbolTable, load_tables};
use kira_pathway_translator::model::PathwayModel;
use kira_pathway_translator::output::{
    AugmentResult, ConvertResult, JsonOutput, JsonPathwayWriter, ListResult, PathwayWriter,
    read_pathway,
};
use kira_pathway_translator::store::Store;

#[derive(Parser)]
#[command(name = "kira-pt")]
#[command(about = "Translate BioPAX pathway models into KEGG-style pathway graphs")]
#[command(version, author)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Translate a model into one file per pathway")]
    Convert(ConvertArgs),
    #[command(about = "Add the model's relations to an existing pathway")]
    Augment(AugmentArgs),
    #[command(about = "List the pathways of a model")]
    List(ListArgs),
    #[command(about = "List built-in species")]
    Species,
    #[command(about = "Download mapping tables into the local cache")]
    FetchMappings(FetchArgs),
}

#[derive(Args, Clone)]
struct MappingArgs {
    #[arg(long)]
    config: Option<String>,
    #[arg(long)]
    species: Option<String>,
    #[arg(long, help = "NCBI gene_info table (plain or .gz)")]
    symbols: Option<Utf8PathBuf>,
    #[arg(long, help = "KEGG ncbi-geneid conv table (plain or .gz)")]
    kegg: Option<Utf8PathBuf>,
}

#[derive(Args, Clone)]
struct ConvertArgs {
    model: Utf8PathBuf,
    #[command(flatten)]
    mapping: MappingArgs,
    #[arg(long)]
    out: Option<Utf8PathBuf>,
    #[arg(long, help = "Merge the whole model into a single pathway")]
    single: bool,
    #[arg(long, help = "Write extended entry information")]
    extended: bool,
    #[arg(long, help = "Translate only the pathway with this name or record id")]
    pathway: Option<String>,
    #[arg(long)]
    self_reactions: bool,
}

#[derive(Args, Clone)]
struct AugmentArgs {
    model: Utf8PathBuf,
    #[arg(long)]
    target: Utf8PathBuf,
    #[command(flatten)]
    mapping: MappingArgs,
    #[arg(long, help = "Write the augmented pathway here instead of over the target")]
    out: Option<Utf8PathBuf>,
    #[arg(long)]
    single: bool,
    #[arg(long)]
    self_reactions: bool,
}

#[derive(Args, Clone)]
struct ListArgs {
    model: Utf8PathBuf,
}

#[derive(Args, Clone)]
struct FetchArgs {
    #[arg(long)]
    species: String,
    #[arg(long)]
    force: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(kira) = report.downcast_ref::<KiraError>() {
            return ExitCode::from(map_exit_code(kira));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &KiraError) -> u8 {
    match error {
        KiraError::UnsupportedSchema(_)
        | KiraError::ModelUnavailable { .. }
        | KiraError::MapperInit { .. }
        | KiraError::UnknownSpecies(_)
        | KiraError::MissingSpecies
        | KiraError::PathwayNotFound(_)
        | KiraError::ConfigRead(_)
        | KiraError::ConfigParse(_) => 2,
        KiraError::KnowledgeHttp(_) | KiraError::KnowledgeStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => run_convert(args),
        Commands::Augment(args) => run_augment(args),
        Commands::List(args) => run_list(args),
        Commands::Species => JsonOutput::print_json(&Species::builtin()).into_diagnostic(),
        Commands::FetchMappings(args) => run_fetch(args),
    }
}

fn run_convert(args: ConvertArgs) -> miette::Result<()> {
    let config = ConfigLoader::resolve(args.mapping.config.as_deref())?;
    let species = resolve_species(&args.mapping, &config)?;
    let model = load_model(&args.model)?;
    let (symbols, genes) = resolve_tables(&args.mapping, &config, &species)?;

    let mut options = config.options;
    options.single_mode |= args.single;
    options.write_entry_extended |= args.extended;
    options.add_self_reactions |= args.self_reactions;
    options.augment_original_pathway = false;

    let writer = JsonPathwayWriter::new(args.out.unwrap_or(config.output_dir));
    let mut converter = Converter::new(symbols, genes, species.clone(), options);
    let mut written = Vec::new();
    match args.pathway.as_deref() {
        Some(name) => {
            let pathway = converter.translate_named(&model, name)?;
            written.push(writer.write(&pathway, options.write_entry_extended)?.to_string());
        }
        None => {
            let base_name = model_base_name(&args.model);
            for pathway in converter.translate(&model, &base_name)? {
                written.push(writer.write(&pathway, options.write_entry_extended)?.to_string());
            }
        }
    }

    JsonOutput::print_convert(&ConvertResult {
        model: args.model.to_string(),
        level: model.level().to_string(),
        species: species.organism_code,
        written,
    })
    .into_diagnostic()
}

fn run_augment(args: AugmentArgs) -> miette::Result<()> {
    let config = ConfigLoader::resolve(args.mapping.config.as_deref())?;
    let species = resolve_species(&args.mapping, &config)?;
    let model = load_model(&args.model)?;
    let mut target = read_pathway(&args.target)?;
    let (symbols, genes) = resolve_tables(&args.mapping, &config, &species)?;

    let mut options = config.options;
    options.single_mode |= args.single;
    options.add_self_reactions |= args.self_reactions;
    options.augment_original_pathway = true;

    let mut converter = Converter::new(symbols, genes, species, options);
    let tally = converter.augment(&model, &mut target)?;

    let destination = args.out.unwrap_or_else(|| args.target.clone());
    let content = serde_json::to_vec_pretty(&target).into_diagnostic()?;
    Store::write_bytes_atomic(&destination, &content)?;

    JsonOutput::print_augment(&AugmentResult {
        model: args.model.to_string(),
        target: destination.to_string(),
        entries: target.entries.len(),
        relations: target.relations.len(),
        tally,
    })
    .into_diagnostic()
}

fn run_list(args: ListArgs) -> miette::Result<()> {
    let model = load_model(&args.model)?;
    JsonOutput::print_list(&ListResult {
        model: args.model.to_string(),
        level: model.level().to_string(),
        pathways: model.summaries(),
    })
    .into_diagnostic()
}

fn run_fetch(args: FetchArgs) -> miette::Result<()> {
    let species: Species = args.species.parse()?;
    let store = Store::new()?;
    let client = KnowledgeHttpClient::new()?;
    let result = fetch_mappings(&store, &client, &species, args.force)?;
    JsonOutput::print_fetch(&result).into_diagnostic()
}

fn resolve_species(args: &MappingArgs, config: &ResolvedConfig) -> Result<Species, KiraError> {
    match (&args.species, &config.species) {
        (Some(value), _) => value.parse(),
        (None, Some(species)) => Ok(species.clone()),
        (None, None) => Err(KiraError::MissingSpecies),
    }
}

fn load_model(path: &Utf8Path) -> Result<PathwayModel, KiraError> {
    PathwayModel::from_json_file(path).inspect_err(|err| {
        error!(model = %path, error = %err, "cannot continue without a model");
    })
}

fn resolve_tables(
    args: &MappingArgs,
    config: &ResolvedConfig,
    species: &Species,
) -> Result<(SymbolTable, KeggGeneTable), KiraError> {
    let store = Store::new()?;
    let symbols = args
        .symbols
        .clone()
        .or_else(|| config.mappings.gene_symbols.clone())
        .unwrap_or_else(|| store.gene_info_path(species));
    let genes = args
        .kegg
        .clone()
        .or_else(|| config.mappings.gene_ids.clone())
        .unwrap_or_else(|| store.kegg_conv_path(species));
    load_tables(&symbols, &genes, species).inspect_err(|err| {
        error!(species = %species.organism_code, error = %err, "mapper initialization failed");
    })
}
