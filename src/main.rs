//! gforge binary entry point.

use anyhow::Result;

fn main() -> Result<()> {
    graphforge::cli::run()
}
