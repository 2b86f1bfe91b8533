//! `taskdeck-console`: drives a session script through the RBAC engine and
//! prints what the TaskDeck shell would show after each step.

pub mod script;
pub mod shell;

use std::io::Write;

use anyhow::Context;

pub use script::Step;
pub use shell::Shell;

/// Run a JSON-lines script, writing the shell's output to `out`.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn run(script: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let mut shell = Shell::new();
    shell.render(out)?;

    for (index, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step: Step = serde_json::from_str(line)
            .with_context(|| format!("line {}: invalid step", index + 1))?;
        tracing::debug!(line = index + 1, ?step, "applying step");
        shell
            .apply(step, out)
            .with_context(|| format!("line {}: step failed", index + 1))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_a_full_script() {
        let script = r#"
# guest browses, then a manager signs in
{"op":"login","response":{"success":true,"data":{"id":"user-uuid-1","email":"g@example.com","role":"Guest","token":"t"}}}
{"op":"check","resource":"settings","action":"read"}
{"op":"login","response":{"success":true,"data":{"id":"user-uuid-2","email":"m@example.com","firstName":"Maria","role":"Manager","token":"t"}}}
{"op":"logout"}
"#;
        let mut out = Vec::new();
        run(script, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("signed in as g@example.com (Guest)"));
        assert!(out.contains("settings:read = denied"));
        assert!(out.contains("signed in as Maria (Manager)"));
        assert!(out.contains("+ New Task"));
        assert!(out.ends_with(
            "> signed out\n\
             \x20 - Dashboard\n\
             \x20 - My Tasks\n\
             \x20 - New Task\n\
             \x20 - Projects\n\
             \x20 - Team\n\
             \x20 - Settings\n\
             \x20 ~ Delete task -> Delete task (no permission)\n\
             \x20 ~ Export project -> You don't have permission to perform this action.\n"
        ));
    }

    #[test]
    fn reports_the_failing_line() {
        let mut out = Vec::new();
        let err = run("{\"op\":\"logout\"}\n{\"op\":\"dance\"}", &mut out).unwrap_err();
        assert!(format!("{:#}", err).starts_with("line 2: invalid step"));
    }
}
