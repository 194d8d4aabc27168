use clap::Parser as ClapParser;
use faxc_drv::Cli;

fn main() {
    let cli = Cli::parse();
    faxc_drv::init_logging(cli.verbose);

    if let Err(err) = faxc_drv::run(&cli).map_err(anyhow::Error::from) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}
