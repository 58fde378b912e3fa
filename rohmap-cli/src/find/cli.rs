use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const FIND_CMD: &str = "find";

pub fn create_find_cli() -> Command {
    Command::new(FIND_CMD)
        .about("Find runs of homozygosity shared by all affected samples.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("affected")
                .short('a')
                .long("affected")
                .num_args(1..)
                .required(true)
                .help("Genotype tables of affected samples (.txt or .txt.gz)"),
        )
        .arg(
            Arg::new("unaffected")
                .short('u')
                .long("unaffected")
                .num_args(1..)
                .help("Genotype tables of unaffected samples"),
        )
        .arg(
            arg!(-c --config <CONFIG>)
                .required(false)
                .help("TOML file with search parameters. Flags below override it"),
        )
        .arg(
            Arg::new("chromosomes")
                .long("chromosomes")
                .value_delimiter(',')
                .help("Comma separated chromosomes to search (default: all in the affected samples)"),
        )
        .arg(
            Arg::new("autosomes-only")
                .long("autosomes-only")
                .action(ArgAction::SetTrue)
                .help("Only search numbered chromosomes"),
        )
        .arg(
            arg!(-w --window <WINDOW>)
                .required(false)
                .value_parser(value_parser!(usize))
                .help("Scan window size in calls (minimum 10)"),
        )
        .arg(
            Arg::new("region-length")
                .long("region-length")
                .value_parser(value_parser!(f64))
                .help("Minimum candidate length in Mb"),
        )
        .arg(
            Arg::new("het-cutoff")
                .long("het-cutoff")
                .value_parser(value_parser!(f64))
                .help("Heterozygous fraction at which a window stops being homozygous"),
        )
        .arg(
            Arg::new("discordance-cutoff")
                .long("discordance-cutoff")
                .value_parser(value_parser!(f64))
                .help("Discordant fraction at which two samples stop being concordant"),
        )
        .arg(
            Arg::new("refine-window")
                .long("refine-window")
                .value_parser(value_parser!(usize))
                .help("Boundary refinement window in calls (default: window / 10)"),
        )
        .arg(
            Arg::new("refine-cutoff")
                .long("refine-cutoff")
                .value_parser(value_parser!(f64))
                .help("Heterozygous fraction that pins a region edge"),
        )
        .arg(
            Arg::new("min-report-length")
                .long("min-report-length")
                .value_parser(value_parser!(u32))
                .help("Minimum reported region length in bp"),
        )
        .arg(
            Arg::new("min-report-calls")
                .long("min-report-calls")
                .value_parser(value_parser!(usize))
                .help("Minimum called genotypes inside a reported region"),
        )
        .arg(
            Arg::new("no-concordance")
                .long("no-concordance")
                .action(ArgAction::SetTrue)
                .help("Skip the genotype concordance checks"),
        )
        .arg(
            Arg::new("quality-filter")
                .long("quality-filter")
                .value_parser(value_parser!(f64))
                .help("Drop calls whose confidence value is above this"),
        )
        .arg(
            arg!(--build <BUILD>)
                .required(false)
                .help("Genome build for chromosome lengths (default: hg19)"),
        )
        .arg(
            Arg::new("chrom-sizes")
                .long("chrom-sizes")
                .help("Path to chrom.sizes file used instead of the built-in lengths"),
        )
        .arg(
            Arg::new("extend-to-chrom-end")
                .long("extend-to-chrom-end")
                .action(ArgAction::SetTrue)
                .help("Extend regions that reach the last call to the chromosome end"),
        )
        .arg(
            arg!(-f --format <FORMAT>)
                .required(false)
                .default_value("bed")
                .help("Output format: bed, coords, ids or json"),
        )
        .arg(
            arg!(-o --output <OUTPUT>)
                .required(false)
                .help("Output path, gzipped when it ends in .gz (default: stdout)"),
        )
}
