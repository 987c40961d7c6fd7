mod app;

use clap::Parser;

use crate::app::IgoApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let app = IgoApp::parse();
    app.run()
}
