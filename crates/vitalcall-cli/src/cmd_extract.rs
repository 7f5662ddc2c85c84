use std::io::Read;
use std::path::Path;

/// `vitalcall extract [FILE]`
pub fn execute(file: Option<&Path>) -> anyhow::Result<()> {
    let transcript = read_transcript(file)?;
    let info = vitalcall_core::extract(&transcript);
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

/// Read from `file`, or stdin when `file` is `None` or `-`.
fn read_transcript(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
