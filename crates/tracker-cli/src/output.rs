use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print markdown so the shell prompt never lands on the last line.
pub fn print_markdown(doc: &str) {
    if doc.ends_with('\n') {
        print!("{doc}");
    } else {
        println!("{doc}");
    }
}
