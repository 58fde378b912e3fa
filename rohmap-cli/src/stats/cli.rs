use clap::{Arg, ArgAction, Command, value_parser};

pub const STATS_CMD: &str = "stats";

pub fn create_stats_cli() -> Command {
    Command::new(STATS_CMD)
        .about("Summarise genotype tables: calls, chromosomes, no-call rate and mean confidence.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("files")
                .num_args(1..)
                .required(true)
                .help("Genotype tables (.txt or .txt.gz)"),
        )
        .arg(
            Arg::new("quality-filter")
                .long("quality-filter")
                .value_parser(value_parser!(f64))
                .help("Drop calls whose confidence value is above this"),
        )
        .arg(
            Arg::new("chrom-sizes")
                .long("chrom-sizes")
                .help("Path to chrom.sizes file used instead of the built-in lengths"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print JSON instead of a table"),
        )
}
