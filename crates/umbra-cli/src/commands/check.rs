use std::path::Path;

use colored::Colorize;
use umbra_core::WorldData;

pub fn run(dir: &Path) -> Result<(), String> {
    let data = WorldData::from_dir(dir).map_err(|e| format!("{}: {e}", dir.display()))?;

    println!(
        "  {} for '{}'.",
        "All checks passed".green(),
        dir.display()
    );
    println!(
        "  {} rooms, {} objects, {} puzzles, {} scripts",
        data.rooms.len(),
        data.objects.len(),
        data.puzzles.len(),
        data.scripts.len()
    );
    println!("  Start room: {}", data.rules.start_room);

    Ok(())
}
