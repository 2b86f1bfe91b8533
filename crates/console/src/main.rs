use std::io::{self, Read};

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    taskdeck_observability::init();

    let script = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read session script {}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read session script from stdin")?;
            buf
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    taskdeck_console::run(&script, &mut out)
}
