//! `{{ env.VAR }}` placeholder expansion over a raw TOML string, applied
//! before parsing so config structs stay plain `String`/`SecretString`.

use std::sync::OnceLock;

use regex::Regex;

/// Expand `{{ env.VAR }}` placeholders in `input`. Lines starting with `#`
/// are passed through unchanged so commented-out config keys never force a
/// missing-variable error.
pub fn expand_env(input: &str) -> Result<String, String> {
    fn pattern() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"\{\{\s*env\.([a-zA-Z0-9_]+)\s*\}\}").expect("valid regex"))
    }

    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut last_end = 0;
        for captures in pattern().captures_iter(line) {
            let overall = captures.get(0).expect("group 0 always matches");
            let var_name = captures.get(1).expect("one capture group").as_str();

            output.push_str(&line[last_end..overall.start()]);
            match std::env::var(var_name) {
                Ok(value) => output.push_str(&value),
                Err(_) => return Err(format!("environment variable not found: `{var_name}`")),
            }
            last_end = overall.end();
        }
        output.push_str(&line[last_end..]);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}
