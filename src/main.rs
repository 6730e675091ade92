mod cli;

#[tokio::main]
async fn main() {
    let (config, addr) = match cli::run() {
        cli::RunOutcome::Serve { config, listen } => (config, listen),
        cli::RunOutcome::Exit(code) => std::process::exit(code),
    };

    println!("listening on http://{addr}");

    noticast::serve(addr, config).await;
}
