use super::{DEFAULT_METRIC, DEFAULT_ZIP_CODES, VERSION};
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// Takes the CLI arguments that control the query and plotting of the housing time series.
/// It is safe to unwrap clap cli_args.get_one when a default is given
/// because the default will be used when no argument is passed (i.e., it is always Some<T>).
/// The config has no default here, it depends on the location of the running program.
pub fn parse_cli() -> (Option<PathBuf>, String, Vec<String>, String) {
    let arg_config = Arg::new("config")
        .help("json file with the database UserName, Password and HostName")
        .long_help("json file with the database UserName, Password and HostName; \
        by default ../data/config/mariadb.json relative to the directory of this program")
        .short('c')
        .long("config")
        .num_args(1)
        .value_parser(value_parser!(PathBuf));

    let arg_metric = Arg::new("metric")
        .help("name of the metric passed to the stored procedure")
        .short('m')
        .long("metric")
        .num_args(1)
        .default_value(DEFAULT_METRIC);

    let arg_zip = Arg::new("zip_codes")
        .help("zip codes to plot, one chart each")
        .short('z')
        .long("zip")
        .num_args(1..)
        .action(ArgAction::Append)
        .default_values(DEFAULT_ZIP_CODES);

    let arg_loglevel = Arg::new("loglevel")
        .help("log level, overridden by RUST_LOG")
        .short('l')
        .long("loglevel")
        .num_args(1)
        .value_parser(["error", "warn", "info", "debug", "trace"])
        .default_value("info");

    let cli_args = Command::new("plot_zip_code")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot the housing time series of zip codes with their linear trends")
        .arg(arg_config)
        .arg(arg_metric)
        .arg(arg_zip)
        .arg(arg_loglevel)
        .get_matches();

    let config: Option<PathBuf> = cli_args.get_one::<PathBuf>("config").cloned();
    let metric: String = cli_args.get_one::<String>("metric").unwrap().to_owned();
    let zip_codes: Vec<String> = cli_args
        .get_many::<String>("zip_codes")
        .unwrap()
        .cloned()
        .collect();
    let loglevel: String = cli_args.get_one::<String>("loglevel").unwrap().to_owned();

    return (config, metric, zip_codes, loglevel);
}
