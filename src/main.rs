use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match covid_map_sync::app::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
