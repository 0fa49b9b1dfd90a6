use colored::Colorize;

use crud_sqlgen::cli::CommandLineInterface;
use crud_sqlgen::logging::init_logging;

fn main() {
    let cli = CommandLineInterface::load();
    init_logging(cli.verbose());
    if let Err(error) = cli.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
