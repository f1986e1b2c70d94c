use anyhow::Result;

use super::AppContext;

pub async fn run(ctx: &AppContext, refresh: bool) -> Result<()> {
    let data = ctx.profile_service().dashboard(refresh).await?;

    let width = 30usize;
    let filled = (data.level_progress() * width as f64).round() as usize;

    println!("\n╔══════════════════════════════════════════════╗");
    println!("║ Level {:<3} [{}{}] ║", data.level, "█".repeat(filled), "░".repeat(width - filled));
    println!("║ XP: {:>10} / {:<10}                   ║", data.xp, data.next_level_xp);
    println!("╚══════════════════════════════════════════════╝");

    if !data.missions.is_empty() {
        println!("\nMissions:");
        for mission in &data.missions {
            let mark = if mission.completed { "✓" } else { " " };
            println!("  [{}] {} (+{} xp)", mark, mission.title, mission.xp);
        }
    }

    if !data.badges.is_empty() {
        println!("\nBadges:");
        for badge in &data.badges {
            match badge.earned_at {
                Some(at) => println!("  ★ {} ({})", badge.name, at.format("%Y-%m-%d")),
                None => println!("  ☆ {}", badge.name),
            }
        }
    }

    Ok(())
}
