use crate::SessionArgs;

pub fn run(args: &SessionArgs) -> Result<(), String> {
    let engine = super::start_engine(args)?;
    let json = serde_json::to_string_pretty(&engine.constraints())
        .map_err(|e| format!("failed to serialize constraints: {e}"))?;
    println!("{json}");
    Ok(())
}
