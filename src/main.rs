//! Release Packager - cross-compile and archive one release per target.

use release_packager::cli;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    process::exit(cli::run().await);
}
