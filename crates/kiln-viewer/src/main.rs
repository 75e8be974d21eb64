mod geometry;
mod viewer;

use anyhow::{Context as _, Result};
use kiln_engine::config::DEFAULT_CONFIG_PATH;
use kiln_engine::logging::{LoggingConfig, init_logging};
use kiln_engine::{Application, Context, EngineError};

use crate::viewer::Viewer;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut ctx = Context::new();
    ctx.load_config(DEFAULT_CONFIG_PATH);

    let mut app = Application::new(&mut ctx);
    app.initialize().context("failed to initialize application")?;

    match app.run(Viewer::new) {
        Ok(()) => Ok(()),
        Err(EngineError::GlInit(message)) => {
            log::error!("failed to initialize OpenGL: {message}");
            Ok(())
        }
        Err(e) => Err(e).context("application terminated with an error"),
    }
}
