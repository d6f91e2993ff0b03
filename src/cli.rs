use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use qrels_browser::filter::{CriteriaSelection, LabelSelection};
use qrels_browser::session::SessionConfig;

#[derive(Parser, Debug)]
#[command(
    name = "qrels",
    version,
    about = "Browse per-shot relevance judgments by query, judgement and stratum"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Queries(QueriesArgs),
    Results(ResultsArgs),
    Labels(LabelsArgs),
    Browse(BrowseArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ParseMode {
    Lenient,
    Strict,
}

impl ParseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    #[arg(long, default_value = "trecvid")]
    pub dataset: String,

    #[arg(long, value_enum, default_value_t = ParseMode::Lenient)]
    pub parse_mode: ParseMode,
}

impl DataArgs {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            strict: self.parse_mode == ParseMode::Strict,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct QueriesArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CriteriaArgs {
    #[arg(long = "judgement")]
    pub judgements: Vec<String>,

    #[arg(long = "stratum")]
    pub strata: Vec<String>,

    #[arg(long, default_value_t = false, conflicts_with = "judgements")]
    pub no_judgements: bool,

    #[arg(long, default_value_t = false, conflicts_with = "strata")]
    pub no_strata: bool,
}

impl CriteriaArgs {
    pub fn selection(&self) -> CriteriaSelection {
        CriteriaSelection {
            judgements: dimension(&self.judgements, self.no_judgements),
            strata: dimension(&self.strata, self.no_strata),
        }
    }
}

fn dimension(labels: &[String], none: bool) -> LabelSelection {
    if none {
        LabelSelection::only(Vec::<String>::new())
    } else if labels.is_empty() {
        LabelSelection::All
    } else {
        LabelSelection::only(labels.iter().cloned())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ResultsArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long)]
    pub query: String,

    #[command(flatten)]
    pub criteria: CriteriaArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LabelsArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long)]
    pub query: String,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BrowseArgs {
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    #[arg(long)]
    pub dataset: Option<String>,

    #[arg(long, value_enum, default_value_t = ParseMode::Lenient)]
    pub parse_mode: ParseMode,
}
