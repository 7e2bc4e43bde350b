use std::process::ExitCode;

use homestead_engine::run_app;
use tracing::error;

use super::bootstrap;

pub(crate) fn run() -> ExitCode {
    let app = match bootstrap::build_app() {
        Ok(app) => app,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = run_app(app.config, app.scene) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
