use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = emailing::cli::Cli::parse();
    emailing::logging::init(cli.verbose);

    if let Err(err) = emailing::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
