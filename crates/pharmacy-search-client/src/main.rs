use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    pharmacy_search_client::cli::run()
}
