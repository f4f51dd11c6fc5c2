use crate::CLAP_STYLING;
use clap::arg;
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("smrange")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("smrange")
        .styles(CLAP_STYLING)
        .about("Extract article references from a news website's sitemaps within a time range")
        .arg(
            arg!(-s --"site" <URL>)
                .required(true)
                .help("The url for the website (must start with http:// or https://)")
                .value_parser(clap::value_parser!(Url)),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Output format")
                .value_parser(["json", "xml"])
                .default_value("json"),
        )
        .arg(
            arg!(-d --"daysago" <DAYS>)
                .required(false)
                .help("Defines the oldest date of an article that will be selected")
                .value_parser(clap::value_parser!(i64))
                .default_value("2")
                .conflicts_with_all(["start", "end"]),
        )
        .arg(
            arg!(--"start" <DATETIME>)
                .required(false)
                .help("Explicit window start (ISO-8601), inclusive; requires --end")
                .requires("end"),
        )
        .arg(
            arg!(--"end" <DATETIME>)
                .required(false)
                .help("Explicit window end (ISO-8601), inclusive; requires --start")
                .requires("start"),
        )
        .arg(
            arg!(--"notz")
                .required(false)
                .help("Strip the timezone from the dates before selection (more fault-tolerant)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"lenient")
                .required(false)
                .help("Use the fault-tolerant HTML parser for malformed feeds")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-t --"timeout" <SECS>)
                .required(false)
                .help("Per-request timeout in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save the report to a file (default: print to stdout)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
}
