use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match native_vrf_worker::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %error, "Worker stopped");
            eprintln!("native-vrf-worker: {error}");
            ExitCode::FAILURE
        }
    }
}
